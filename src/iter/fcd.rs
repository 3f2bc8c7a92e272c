// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Incremental FCD checking and on-demand normalization.
//!
//! Code units are read through [`CollationElements::next_unit`] /
//! [`CollationElements::previous_unit`], which verify that the span
//! around the current position is in FCD order before handing units
//! out. Only spans that fail the check are decomposed, into the scratch
//! buffer, which then temporarily becomes the active input. The
//! backward check identifies exactly the same span boundaries as the
//! forward check would, which is what keeps the two iteration
//! directions in agreement.

use alloc::vec::Vec;

use super::cursor;
use super::CollationElements;
use crate::provider::NormalizationData;

/// Below this unit value the trail combining class is always zero, so
/// no check is needed at all.
const TRAIL_CC_ZERO_LIMIT: u16 = 0xC0;
/// Below this unit value the lead combining class is always zero; a
/// span can only fail FCD if a unit at or above it follows.
const LEAD_CC_ZERO_LIMIT: u16 = 0x300;

impl<'a, 't> CollationElements<'a, 't> {
    /// The next code unit in FCD order, normalizing first if required.
    pub(super) fn next_unit(&mut self) -> Option<u16> {
        if let Some(p) = self.norm.pos {
            return if let Some(&unit) = self.norm.units.get(p) {
                self.norm.pos = Some(p + 1);
                Some(unit)
            } else {
                // Scratch buffer exhausted: resume the source at the
                // span limit.
                self.source.set_index(self.fcd_limit);
                self.norm.clear();
                self.next_unit()
            };
        }

        let result = self.source.next()?;
        let start = self.source.index();
        if result < TRAIL_CC_ZERO_LIMIT || !self.normalizing || self.fcd_limit >= start {
            return Some(result);
        }
        if result < LEAD_CC_ZERO_LIMIT {
            // Only a following reorderable unit can spoil the span.
            match self.source.current() {
                Some(next) if next >= LEAD_CC_ZERO_LIMIT => {}
                _ => return Some(result),
            }
        }
        if !self.fcd_check(result, start) {
            self.normalize_span();
            let first = self.norm.units.first().copied();
            self.norm.pos = Some(1);
            return first;
        }
        Some(result)
    }

    /// The previous code unit in FCD order, normalizing first if
    /// required.
    pub(super) fn previous_unit(&mut self) -> Option<u16> {
        if let Some(p) = self.norm.pos {
            if let Some(prev) = p.checked_sub(1) {
                self.norm.pos = Some(prev);
                return self.norm.units.get(prev).copied();
            }
            // At the start of the scratch buffer: route back to the
            // text before the span.
            self.norm.clear();
            if self.fcd_start == 0 {
                self.source.set_index(0);
                return None;
            }
            self.fcd_limit = self.fcd_start;
            self.source.set_index(self.fcd_start);
            return self.previous_unit();
        }

        let result = self.source.previous()?;
        let start = self.source.index();
        if result < LEAD_CC_ZERO_LIMIT
            || !self.normalizing
            || self.fcd_start <= start
            || start == 0
        {
            return Some(result);
        }
        if let Some(before) = self.source.previous() {
            if before < TRAIL_CC_ZERO_LIMIT {
                // The preceding unit cannot carry a trail class; the
                // single-unit span is trivially ordered.
                self.source.next();
                return Some(result);
            }
        }
        if !self.fcd_check_backwards(result, start) {
            self.normalize_span();
            let len = self.norm.units.len();
            self.norm.pos = Some(len);
            return self.previous_unit();
        }
        self.source.set_index(start);
        Some(result)
    }

    /// Forward FCD verification. `offset` is the index just past `unit`.
    /// Establishes the span `[fcd_start, fcd_limit)` ending at the next
    /// zero-lead-class character and reports whether the combining
    /// classes inside it are non-decreasing. The cursor is left just
    /// past `unit`.
    fn fcd_check(&mut self, unit: u16, offset: usize) -> bool {
        let norm = self.collator.normalization();
        let mut passes = true;
        self.fcd_start = offset - 1;
        self.source.set_index(offset);

        let fcd = if cursor::is_lead(unit) {
            match self.source.next() {
                Some(trail) if cursor::is_trail(trail) => {
                    norm.fcd16(cursor::combine(unit, trail))
                }
                Some(_) => {
                    self.source.previous();
                    0
                }
                None => 0,
            }
        } else {
            norm.fcd16(unit as u32)
        };

        let mut limit;
        let mut prev_trail_cc = fcd & 0xFF;
        if prev_trail_cc == 0 {
            limit = self.source.index();
        } else {
            // The span continues until a zero-lead-class character.
            loop {
                let Some(cp) = self.source.next_code_point() else {
                    limit = self.source.index();
                    break;
                };
                let fcd = norm.fcd16(cp);
                let lead_cc = fcd >> 8;
                if lead_cc == 0 {
                    limit = self.source.index() - cursor::unit_len(cp);
                    break;
                }
                if lead_cc < prev_trail_cc {
                    passes = false;
                }
                prev_trail_cc = fcd & 0xFF;
            }
        }
        self.fcd_limit = limit;
        self.source.set_index(self.fcd_start + 1);
        passes
    }

    /// Backward FCD verification, the mirror of
    /// [`fcd_check`](Self::fcd_check). `offset` is the index of `unit`.
    /// Scans back to the nearest zero-lead-class character so that the
    /// span boundaries match what a forward pass would have found. The
    /// cursor is left at the span limit.
    fn fcd_check_backwards(&mut self, unit: u16, offset: usize) -> bool {
        let norm = self.collator.normalization();
        let mut offset = offset;
        self.fcd_limit = offset + 1;
        self.source.set_index(offset);

        let fcd = if !cursor::is_trail(unit) {
            norm.fcd16(unit as u32)
        } else {
            match self.source.previous() {
                Some(lead) if cursor::is_lead(lead) => {
                    offset -= 1;
                    norm.fcd16(cursor::combine(lead, unit))
                }
                Some(_) => {
                    self.source.next();
                    0
                }
                None => 0,
            }
        };

        let mut passes = true;
        if fcd != 0 {
            let mut lead_cc = fcd >> 8;
            loop {
                if lead_cc == 0 {
                    offset = self.source.index();
                    break;
                }
                let Some(cp) = self.source.previous_code_point() else {
                    offset = self.source.index();
                    break;
                };
                let fcd = norm.fcd16(cp);
                let prev_trail_cc = fcd & 0xFF;
                if lead_cc < prev_trail_cc {
                    passes = false;
                } else if fcd == 0 {
                    offset = self.source.index() + cursor::unit_len(cp);
                    break;
                }
                lead_cc = fcd >> 8;
            }
        }
        self.fcd_start = offset;
        self.source.set_index(self.fcd_limit);
        passes
    }

    /// Decomposes the current span into the scratch buffer, with
    /// canonical reordering. The caller selects the serving direction.
    pub(super) fn normalize_span(&mut self) {
        let norm = self.collator.normalization();
        let span = self.source.slice(self.fcd_start, self.fcd_limit);
        let mut out: Vec<u16> = Vec::with_capacity(span.len());
        let mut i = 0;
        while i < span.len() {
            let unit = match span.get(i) {
                Some(&u) => u,
                None => break,
            };
            let cp = if cursor::is_lead(unit) {
                match span.get(i + 1) {
                    Some(&trail) if cursor::is_trail(trail) => cursor::combine(unit, trail),
                    _ => unit as u32,
                }
            } else {
                unit as u32
            };
            norm.decompose_into(cp, &mut out);
            i += cursor::unit_len(cp);
        }
        canonical_reorder(&mut out, norm);
        self.norm.units = out;
    }
}

/// Sorts sequences of non-starters into non-decreasing combining-class
/// order, stably, leaving starters in place.
fn canonical_reorder(units: &mut Vec<u16>, norm: &NormalizationData) {
    let mut cps: Vec<(u32, u8)> = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let Some(&unit) = units.get(i) else { break };
        let cp = if cursor::is_lead(unit) {
            match units.get(i + 1) {
                Some(&trail) if cursor::is_trail(trail) => cursor::combine(unit, trail),
                _ => unit as u32,
            }
        } else {
            unit as u32
        };
        cps.push((cp, norm.ccc(cp)));
        i += cursor::unit_len(cp);
    }

    for i in 1..cps.len() {
        let Some(&(_, cc)) = cps.get(i) else { break };
        if cc == 0 {
            continue;
        }
        let mut j = i;
        while j > 0 {
            let Some(&(_, prev_cc)) = cps.get(j - 1) else {
                break;
            };
            if prev_cc == 0 || prev_cc <= cc {
                break;
            }
            cps.swap(j - 1, j);
            j -= 1;
        }
    }

    units.clear();
    for &(cp, _) in &cps {
        cursor::push_units(units, cp);
    }
}
