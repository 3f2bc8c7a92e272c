// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! The CE lookahead buffer and its run-length-encoded offset log.

use smallvec::SmallVec;

/// Maps buffered-CE positions back to source offsets. Buffered CEs from
/// one expansion, digit run or decomposed syllable legitimately share
/// one source offset, so runs are stored compressed. Invariant: the
/// repeat counts sum to the length of the buffer the log describes.
#[derive(Clone, Debug, Default)]
pub(crate) struct OffsetLog {
    runs: SmallVec<[(usize, u32); 2]>,
}

impl OffsetLog {
    pub(crate) fn clear(&mut self) {
        self.runs.clear();
    }

    /// Records `count` consecutive CEs sharing `offset`.
    pub(crate) fn push_run(&mut self, offset: usize, count: u32) {
        if count == 0 {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.0 == offset {
                last.1 += count;
                return;
            }
        }
        self.runs.push((offset, count));
    }

    /// The source offset recorded for the CE at buffer position `pos`.
    pub(crate) fn offset_at(&self, pos: usize) -> Option<usize> {
        let mut remaining = pos as u64;
        for &(offset, count) in &self.runs {
            if remaining < count as u64 {
                return Some(offset);
            }
            remaining -= count as u64;
        }
        None
    }
}

/// Pending CEs produced by an expansion, a digit run, Hangul
/// decomposition or implicit-weight synthesis, served one at a time in
/// either direction. Grows on demand; there is no fixed capacity.
#[derive(Clone, Debug, Default)]
pub(crate) struct CeBuffer {
    ces: SmallVec<[u32; 16]>,
    /// Forward serving reads `ces[pos]` and increments; backward
    /// serving decrements and reads. An exhausted buffer resets.
    pos: usize,
    log: OffsetLog,
}

impl CeBuffer {
    pub(crate) fn is_empty(&self) -> bool {
        self.ces.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.ces.clear();
        self.pos = 0;
        self.log.clear();
    }

    /// Stores a run for forward serving and returns the first CE; the
    /// serving position is left past it.
    pub(crate) fn fill_forward(&mut self, ces: &[u32], offset: usize) -> u32 {
        debug_assert!(!ces.is_empty());
        self.ces.clear();
        self.ces.extend_from_slice(ces);
        self.log.clear();
        self.log.push_run(offset, ces.len() as u32);
        self.pos = 1;
        self.ces.first().copied().unwrap_or(0)
    }

    /// Stores a run for backward serving and returns the last CE; the
    /// serving position is left before it.
    pub(crate) fn fill_backward(&mut self, ces: &[u32], offset: usize) -> u32 {
        debug_assert!(!ces.is_empty());
        self.ces.clear();
        self.ces.extend_from_slice(ces);
        self.log.clear();
        self.log.push_run(offset, ces.len() as u32);
        self.pos = self.ces.len().saturating_sub(1);
        self.ces.last().copied().unwrap_or(0)
    }

    /// The next pending CE in forward order, if any; clears the buffer
    /// once it runs off the end.
    pub(crate) fn serve_forward(&mut self) -> Option<u32> {
        if self.ces.is_empty() {
            return None;
        }
        if let Some(&ce) = self.ces.get(self.pos) {
            self.pos += 1;
            return Some(ce);
        }
        self.clear();
        None
    }

    /// The next pending CE in backward order, if any; clears the buffer
    /// once it runs off the start.
    pub(crate) fn serve_backward(&mut self) -> Option<u32> {
        if self.ces.is_empty() {
            return None;
        }
        if self.pos > 0 {
            self.pos -= 1;
            return Some(self.ces.get(self.pos).copied().unwrap_or(0));
        }
        self.clear();
        None
    }

    /// The logged source offset for the CE the backward serving
    /// position rests on, while the buffer is active.
    pub(crate) fn backward_offset(&self) -> Option<usize> {
        if self.ces.is_empty() {
            return None;
        }
        self.log.offset_at(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_serving_order() {
        let mut buffer = CeBuffer::default();
        assert_eq!(buffer.fill_forward(&[1, 2, 3], 5), 1);
        assert_eq!(buffer.serve_forward(), Some(2));
        assert_eq!(buffer.serve_forward(), Some(3));
        assert_eq!(buffer.serve_forward(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn backward_serving_order() {
        let mut buffer = CeBuffer::default();
        assert_eq!(buffer.fill_backward(&[1, 2, 3], 5), 3);
        assert_eq!(buffer.serve_backward(), Some(2));
        assert_eq!(buffer.serve_backward(), Some(1));
        assert_eq!(buffer.serve_backward(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn direction_pivot_rereads_current() {
        let mut buffer = CeBuffer::default();
        // Forward fill served 1; turning around must re-serve 1.
        assert_eq!(buffer.fill_forward(&[1, 2], 0), 1);
        assert_eq!(buffer.serve_backward(), Some(1));
        // And turning forward again re-serves it once more.
        assert_eq!(buffer.serve_forward(), Some(1));
    }

    #[test]
    fn log_offsets_compress() {
        let mut log = OffsetLog::default();
        log.push_run(4, 2);
        log.push_run(4, 1);
        log.push_run(9, 1);
        assert_eq!(log.offset_at(0), Some(4));
        assert_eq!(log.offset_at(2), Some(4));
        assert_eq!(log.offset_at(3), Some(9));
        assert_eq!(log.offset_at(4), None);
    }
}
