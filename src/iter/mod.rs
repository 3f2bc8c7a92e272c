// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! The collation element iterator.
//!
//! [`CollationElements`] walks a UTF-16 string in either direction and
//! produces one 32-bit collation element at a time, consulting the
//! table set through a chain that never fails: the tailoring, then the
//! root table, then algorithmic implicit weights. Contractions,
//! expansions, digit runs and Hangul syllables buffer pending CEs in a
//! lookahead buffer; spans of input that are not in FCD order are
//! decomposed into a scratch buffer and re-read from there.

use alloc::vec::Vec;

use crate::elements::{self, CollationElement, Tag};
use crate::provider::{CollationData, CollationError, Collator};

mod buffer;
mod contraction;
pub(crate) mod cursor;
mod fcd;
mod numeric;
mod synth;

use buffer::CeBuffer;
use cursor::SourceCursor;

/// Start of the Hangul syllable block, for the ignorable-retry loop.
const HANGUL_BLOCK_START: u16 = 0xAC00;
/// End (inclusive) of the Hangul syllable block.
const HANGUL_BLOCK_END: u16 = 0xD7AF;

/// The normalization scratch buffer. While `pos` is `Some`, code units
/// are read from `units` instead of the source cursor; `None` means the
/// cursor is the active input. Exactly one of the two is active at any
/// time.
#[derive(Clone, Debug, Default)]
struct NormBuffer {
    units: Vec<u16>,
    /// Number of units consumed from the front; the next forward read
    /// serves `units[pos]`, the next backward read serves
    /// `units[pos - 1]`.
    pos: Option<usize>,
}

impl NormBuffer {
    fn clear(&mut self) {
        self.units.clear();
        self.pos = None;
    }
}

/// A copy of all rollback-relevant iterator state. Speculative matching
/// (contractions, prefixes, digit runs) takes a checkpoint on entry and
/// restores it wholesale on failure, so no partial consumption is ever
/// visible.
#[derive(Clone, Debug)]
struct Checkpoint {
    source_index: usize,
    fcd_start: usize,
    fcd_limit: usize,
    norm_pos: Option<usize>,
    norm_units: Vec<u16>,
}

impl Checkpoint {
    /// Steps the checkpointed position one unit back, used when a
    /// chained contraction records a fallback past an already-matched
    /// unit.
    fn retreat(&mut self) {
        match self.norm_pos {
            Some(p) => self.norm_pos = Some(p.saturating_sub(1)),
            None => self.source_index = self.source_index.saturating_sub(1),
        }
    }
}

/// An iterator over the collation elements of one string.
///
/// Created by [`Collator::collation_elements`]. Forward and backward
/// iteration enumerate exactly reversed CE sequences; changing
/// direction mid-iteration re-returns the CE at the pivot once (the
/// same contract as the forward/backward overlap of the classic ICU
/// iterator).
///
/// The iterator owns all of its mutable state and holds only shared
/// references to the immutable tables, so any number of iterators may
/// run concurrently over the same table set.
#[derive(Clone, Debug)]
pub struct CollationElements<'a, 't> {
    collator: Collator<'a>,
    numeric: bool,
    normalizing: bool,
    source: SourceCursor<'t>,
    forwards: bool,
    norm: NormBuffer,
    /// Start of the most recently verified-or-normalized FCD span.
    fcd_start: usize,
    /// Limit of that span; 0 while no span has been established (a
    /// span limit is always past at least one unit).
    fcd_limit: usize,
    buffer: CeBuffer,
}

impl<'a, 't> CollationElements<'a, 't> {
    pub(crate) fn new(collator: Collator<'a>, text: &'t [u16]) -> Self {
        let options = collator.options();
        let mut iter = CollationElements {
            collator,
            numeric: options.numeric,
            normalizing: options.normalization,
            source: SourceCursor::new(text),
            forwards: true,
            norm: NormBuffer::default(),
            fcd_start: 0,
            fcd_limit: 0,
            buffer: CeBuffer::default(),
        };
        iter.update_internal_state();
        iter
    }

    /// A nested iterator used for backward contraction verification;
    /// FCD checking is off because the candidate text has already been
    /// read through the normalizing layer.
    fn new_raw(collator: Collator<'a>, text: &'t [u16]) -> Self {
        let mut iter = Self::new(collator, text);
        iter.normalizing = false;
        iter
    }

    /// The next collation element, or `None` at the end of the text.
    pub fn next(&mut self) -> Option<CollationElement> {
        self.next_raw().map(CollationElement::from_bits)
    }

    /// The previous collation element, or `None` at the start.
    pub fn previous(&mut self) -> Option<CollationElement> {
        self.previous_raw().map(CollationElement::from_bits)
    }

    /// Resets the iterator to the beginning of the text.
    pub fn reset(&mut self) {
        self.source.set_index(0);
        self.update_internal_state();
    }

    /// Rebinds the iterator to new text, positioned at the start.
    pub fn set_text(&mut self, text: &'t [u16]) {
        self.source = SourceCursor::new(text);
        self.update_internal_state();
    }

    /// The source offset of the collation element a call to `next`
    /// would return.
    ///
    /// After [`set_offset`](Self::set_offset) landed inside a
    /// contraction this reports the snapped position (the contraction's
    /// first unit), not the requested one. While buffered CEs from one
    /// producing span are being served backward, all of them report the
    /// span's start offset.
    pub fn get_offset(&self) -> usize {
        if !self.forwards {
            if let Some(offset) = self.buffer.backward_offset() {
                return offset;
            }
        }
        self.position_offset()
    }

    /// Positions the iterator so that the next call to `next` returns
    /// the collation element covering the unit at `offset`.
    ///
    /// An offset inside a contraction snaps back to the contraction's
    /// first unit; an offset on a trail surrogate snaps to its lead.
    /// Out-of-range offsets are rejected and leave the state untouched.
    pub fn set_offset(&mut self, offset: usize) -> Result<(), CollationError> {
        if offset > self.source.len() {
            return Err(CollationError::OffsetOutOfRange {
                offset,
                len: self.source.len(),
            });
        }
        self.source.set_index(offset);
        if let Some(unit) = self.source.current() {
            if self.is_unsafe_unit(unit) {
                if cursor::is_trail(unit) {
                    // Move up to the lead of the pair, if it is one.
                    match self.source.previous() {
                        Some(lead) if cursor::is_lead(lead) => {}
                        Some(_) => self.source.set_index(offset),
                        None => {}
                    }
                } else {
                    // Back up to a safe unit, then iterate forward
                    // until we pass the requested offset.
                    let mut unit = unit;
                    while self.source.index() > 0 {
                        if !self.is_unsafe_unit(unit) {
                            break;
                        }
                        match self.source.previous() {
                            Some(u) => unit = u,
                            None => break,
                        }
                    }
                    self.update_internal_state();
                    let mut prev_offset = self.source.index();
                    while self.source.index() <= offset {
                        prev_offset = self.source.index();
                        if self.next_raw().is_none() {
                            break;
                        }
                    }
                    self.source.set_index(prev_offset);
                }
            }
        }
        self.update_internal_state();
        let landed = self.source.index();
        if landed == 0 {
            self.forwards = false;
        } else if landed == self.source.len() {
            self.forwards = true;
        }
        Ok(())
    }

    /// Positions the iterator at `offset` without the contraction
    /// snap-back of [`set_offset`](Self::set_offset); `get_offset` then
    /// reports exactly the offset that was set.
    pub fn set_exact_offset(&mut self, offset: usize) -> Result<(), CollationError> {
        if offset > self.source.len() {
            return Err(CollationError::OffsetOutOfRange {
                offset,
                len: self.source.len(),
            });
        }
        self.source.set_index(offset);
        self.update_internal_state();
        Ok(())
    }

    // Orchestration ------------------------------------------------------

    pub(crate) fn next_raw(&mut self) -> Option<u32> {
        self.forwards = true;
        if let Some(ce) = self.buffer.serve_forward() {
            return Some(ce);
        }
        loop {
            let unit = self.next_unit()?;
            let mut result = self.collator.tailoring().ce32(unit as u32);
            if !elements::is_special(result) {
                return Some(result);
            }
            if result != elements::NOT_FOUND {
                result = self.next_special(self.collator.tailoring(), result, unit);
            }
            if result == elements::NOT_FOUND {
                // No usable CE in the tailoring; fall back to the root.
                if let Some(root) = self.collator.root() {
                    result = root.ce32(unit as u32);
                    if elements::is_special(result) && result != elements::NOT_FOUND {
                        result = self.next_special(root, result, unit);
                    }
                }
                if result == elements::NOT_FOUND {
                    result = self.next_implicit(unit as u32);
                }
            }
            // A tailored-jamo Hangul syllable reports an ignorable and
            // queues its jamo in the normalization buffer; go around.
            if result == 0 && (HANGUL_BLOCK_START..=HANGUL_BLOCK_END).contains(&unit) {
                continue;
            }
            return Some(result);
        }
    }

    pub(crate) fn previous_raw(&mut self) -> Option<u32> {
        if self.source.index() == 0 && self.forwards && self.norm.pos.is_none() {
            // Fresh or reset iterator: backward iteration starts from
            // the end.
            self.source.set_index(self.source.len());
            self.update_internal_state();
        }
        self.forwards = false;
        if let Some(ce) = self.buffer.serve_backward() {
            return Some(ce);
        }
        loop {
            let unit = self.previous_unit()?;
            let tailoring = self.collator.tailoring();
            let mut result;
            if tailoring.is_contraction_end(unit) && !self.is_backwards_start() {
                result = self.previous_special(
                    tailoring,
                    CollationElement::special(Tag::Contraction, 0).to_bits(),
                    unit,
                );
            } else {
                result = tailoring.ce32(unit as u32);
                if elements::is_special(result) && result != elements::NOT_FOUND {
                    result = self.previous_special(tailoring, result, unit);
                }
            }
            if result == elements::NOT_FOUND {
                if let Some(root) = self.collator.root() {
                    if root.is_contraction_end(unit) && !self.is_backwards_start() {
                        result = self.previous_special(
                            root,
                            CollationElement::special(Tag::Contraction, 0).to_bits(),
                            unit,
                        );
                    } else {
                        result = root.ce32(unit as u32);
                        if elements::is_special(result) && result != elements::NOT_FOUND {
                            result = self.previous_special(root, result, unit);
                        }
                    }
                }
            }
            if result == 0 && (HANGUL_BLOCK_START..=HANGUL_BLOCK_END).contains(&unit) {
                continue;
            }
            if result == elements::NOT_FOUND {
                result = self.previous_implicit(unit as u32);
            }
            return Some(result);
        }
    }

    /// Dispatches a special CE during forward iteration. Loops for
    /// chained specials (a contraction resolving to an expansion, a
    /// surrogate pair resolving to anything).
    fn next_special(&mut self, data: &CollationData<'a>, ce: u32, unit: u16) -> u32 {
        let mut data = data;
        let mut ce = ce;
        let mut cp = unit as u32;
        let entry_checkpoint = self.checkpoint();
        loop {
            let Some(tag) = elements::tag_of(ce) else {
                debug_assert!(false, "reserved tag escaped validation");
                return elements::NOT_FOUND;
            };
            match tag {
                Tag::NotFound => return ce,
                Tag::Charset => return elements::NOT_FOUND,
                Tag::LeadSurrogate => {
                    if self.is_end() {
                        return elements::NOT_FOUND;
                    }
                    let checkpoint = self.checkpoint();
                    let Some(trail) = self.next_unit() else {
                        return elements::NOT_FOUND;
                    };
                    if !cursor::is_trail(trail) {
                        self.restore(&checkpoint);
                        return elements::NOT_FOUND;
                    }
                    cp = cursor::combine(unit, trail);
                    ce = data.ce32(cp);
                    if ce == elements::NOT_FOUND {
                        if let Some(root) = self.collator.root() {
                            if !core::ptr::eq(data, root) {
                                data = root;
                                ce = root.ce32(cp);
                            }
                        }
                    }
                    if ce == elements::NOT_FOUND {
                        return self.next_implicit(cp);
                    }
                }
                Tag::TrailSurrogate => return elements::NOT_FOUND,
                Tag::SpecialPrefix => {
                    ce = self.next_special_prefix(data, ce, &entry_checkpoint);
                }
                Tag::Contraction => ce = self.next_contraction(data, ce),
                Tag::LongPrimary => return self.next_long_primary(ce),
                Tag::Expansion => return self.next_expansion(data, ce),
                Tag::Digit => ce = self.next_digit(data, ce),
                Tag::CjkImplicit | Tag::Implicit => return self.next_implicit(cp),
                Tag::HangulSyllable => return self.next_hangul(data, unit),
            }
            if !elements::is_special(ce) {
                return ce;
            }
        }
    }

    /// Dispatches a special CE during backward iteration.
    fn previous_special(&mut self, data: &CollationData<'a>, ce: u32, unit: u16) -> u32 {
        let mut ce = ce;
        loop {
            let Some(tag) = elements::tag_of(ce) else {
                debug_assert!(false, "reserved tag escaped validation");
                return elements::NOT_FOUND;
            };
            match tag {
                Tag::NotFound => return ce,
                Tag::Charset => return elements::NOT_FOUND,
                Tag::SpecialPrefix => ce = self.previous_special_prefix(data, ce),
                Tag::Contraction => {
                    if self.is_backwards_start() {
                        // Start of text: this unit cannot end anything;
                        // resolve to the entry's default.
                        ce = data.contraction_ce(elements::payload_of(ce));
                    } else {
                        return self.previous_contraction(data, unit);
                    }
                }
                Tag::LongPrimary => return self.previous_long_primary(ce),
                Tag::Expansion => return self.previous_expansion(data, ce),
                Tag::Digit => ce = self.previous_digit(data, ce),
                Tag::HangulSyllable => return self.previous_hangul(data, unit),
                Tag::LeadSurrogate => return elements::NOT_FOUND,
                Tag::TrailSurrogate => return self.previous_surrogate(data, unit),
                Tag::CjkImplicit | Tag::Implicit => return self.previous_implicit(unit as u32),
            }
            if !elements::is_special(ce) {
                return ce;
            }
        }
    }

    // Shared state helpers ----------------------------------------------

    fn update_internal_state(&mut self) {
        self.norm.clear();
        self.buffer.clear();
        self.fcd_limit = 0;
        self.fcd_start = self.source.len();
        self.forwards = true;
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            source_index: self.source.index(),
            fcd_start: self.fcd_start,
            fcd_limit: self.fcd_limit,
            norm_pos: self.norm.pos,
            norm_units: if self.norm.pos.is_some() {
                self.norm.units.clone()
            } else {
                Vec::new()
            },
        }
    }

    fn restore(&mut self, checkpoint: &Checkpoint) {
        self.source.set_index(checkpoint.source_index);
        self.fcd_start = checkpoint.fcd_start;
        self.fcd_limit = checkpoint.fcd_limit;
        self.norm.pos = checkpoint.norm_pos;
        self.norm.units.clear();
        if checkpoint.norm_pos.is_some() {
            self.norm.units.extend_from_slice(&checkpoint.norm_units);
        }
    }

    /// Steps one unit back without any normalization bookkeeping. Only
    /// valid immediately after a forward read.
    fn go_back_one(&mut self) {
        match self.norm.pos {
            Some(p) => self.norm.pos = Some(p.saturating_sub(1)),
            None => {
                let index = self.source.index();
                self.source.set_index(index.saturating_sub(1));
            }
        }
    }

    /// Steps one unit forward without any normalization bookkeeping.
    /// Only valid immediately after a backward read.
    fn go_forward_one(&mut self) {
        match self.norm.pos {
            Some(p) => self.norm.pos = Some(p + 1),
            None => {
                let index = self.source.index();
                self.source.set_index(index + 1);
            }
        }
    }

    fn is_backwards_start(&self) -> bool {
        match self.norm.pos {
            None => self.source.index() == 0,
            Some(p) => p == 0 && self.fcd_start == 0,
        }
    }

    fn is_end(&self) -> bool {
        match self.norm.pos {
            Some(p) => p == self.norm.units.len() && self.fcd_limit == self.source.len(),
            None => self.source.index() == self.source.len(),
        }
    }

    /// The current character position, accounting for the scratch
    /// buffer: while reading normalized text, forward iteration stands
    /// at the span limit and backward iteration at the span start.
    fn position_offset(&self) -> usize {
        if self.norm.pos.is_some() {
            if self.forwards {
                self.fcd_limit
            } else {
                self.fcd_start
            }
        } else {
            self.source.index()
        }
    }

    fn is_unsafe_unit(&self, unit: u16) -> bool {
        self.collator.tailoring().is_unsafe(unit as u32)
            || self
                .collator
                .root()
                .is_some_and(|root| root.is_unsafe(unit as u32))
    }

    fn combining_class(&self, cp: u32) -> u8 {
        self.collator.normalization().ccc(cp)
    }

    /// The decimal digit value of `cp`, resolved through the table
    /// chain, or `None` if it is not a digit.
    fn digit_value(&self, cp: u32) -> Option<u8> {
        let mut ce = self.collator.tailoring().ce32(cp);
        if ce == elements::NOT_FOUND {
            if let Some(root) = self.collator.root() {
                ce = root.ce32(cp);
            }
        }
        if elements::is_special(ce) && elements::tag_of(ce) == Some(Tag::Digit) {
            Some(((elements::payload_of(ce) >> 20) & 0xF) as u8)
        } else {
            None
        }
    }
}
