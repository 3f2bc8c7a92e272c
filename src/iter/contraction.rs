// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Contraction, discontiguous-contraction and prefix matching.
//!
//! Forward matching walks the sorted candidate list of a contraction
//! entry greedily, chaining into follow-on entries for longer matches
//! and rolling the iterator back from a checkpoint when a speculative
//! match fails. Discontiguous matching sets non-matching combining
//! marks aside and re-queues them through the scratch buffer once a
//! later mark completes the contraction, so no input is ever dropped.
//! Backward matching replays the candidate span through a nested
//! forward iterator, which is what guarantees that both directions
//! resolve overlapping contractions identically.

use alloc::vec::Vec;

use super::cursor;
use super::{Checkpoint, CollationElements};
use crate::elements::{self, Tag};
use crate::provider::CollationData;

fn is_contraction_tag(ce: u32) -> bool {
    elements::is_special(ce) && elements::tag_of(ce) == Some(Tag::Contraction)
}

fn is_special_prefix_tag(ce: u32) -> bool {
    elements::is_special(ce) && elements::tag_of(ce) == Some(Tag::SpecialPrefix)
}

impl<'a, 't> CollationElements<'a, 't> {
    /// Resolves a contraction-tagged CE going forward: longest match
    /// wins, chained entries extend the match, and a failed match
    /// restores every bit of cursor and buffer state from the entry
    /// checkpoint.
    pub(super) fn next_contraction(&mut self, data: &CollationData<'a>, ce: u32) -> u32 {
        let mut checkpoint = self.checkpoint();
        let mut fallback_ce = data.contraction_ce(elements::payload_of(ce));
        let mut ce = ce;
        loop {
            let entry = elements::payload_of(ce);
            let mut offset = entry;

            if self.is_end() {
                ce = data.contraction_ce(offset);
                if ce == elements::NOT_FOUND {
                    ce = fallback_ce;
                    self.restore(&checkpoint);
                }
                break;
            }

            let (max_cc, all_same) = data.contraction_header(entry);
            let Some(unit) = self.next_unit() else {
                ce = data.contraction_ce(offset);
                if ce == elements::NOT_FOUND {
                    ce = fallback_ce;
                    self.restore(&checkpoint);
                }
                break;
            };
            // Candidates are sorted; skip everything smaller.
            offset += 1;
            while unit > data.contraction_unit(offset) {
                offset += 1;
            }

            if unit == data.contraction_unit(offset) {
                ce = data.contraction_ce(offset);
            } else {
                // Not in the candidate list. A combining mark within
                // the entry's class bound may still begin a
                // discontiguous match.
                let mut miss = unit as u32;
                if cursor::is_lead(unit) && !self.is_end() {
                    match self.next_unit() {
                        Some(trail) if cursor::is_trail(trail) => {
                            miss = cursor::combine(unit, trail);
                        }
                        Some(_) => self.go_back_one(),
                        None => {}
                    }
                }
                let miss_cc = self.combining_class(miss);
                let blocked = max_cc == 0
                    || miss_cc == 0
                    || miss_cc > max_cc
                    || (all_same && miss_cc == max_cc)
                    || self.is_end();
                if blocked {
                    self.go_back_one();
                    if miss > 0xFFFF {
                        self.go_back_one();
                    }
                    ce = data.contraction_ce(entry);
                } else {
                    // Discontiguous only makes sense if another mark
                    // follows the one we would skip.
                    let following_cc = match self.next_unit() {
                        Some(next) => {
                            self.go_back_one();
                            self.combining_class(next as u32)
                        }
                        None => 0,
                    };
                    if following_cc == 0 {
                        self.go_back_one();
                        if miss > 0xFFFF {
                            self.go_back_one();
                        }
                        ce = data.contraction_ce(entry);
                    } else {
                        ce = self.next_discontiguous(data, entry);
                    }
                }
            }

            if ce == elements::NOT_FOUND {
                // Nothing matched; give back everything we consumed.
                self.restore(&checkpoint);
                ce = fallback_ce;
                break;
            }
            if !is_contraction_tag(ce) {
                break;
            }
            // Chained entry: remember the so-far completed match so a
            // failure further in falls back to it, positioned before
            // the unit we just matched.
            if data.contraction_ce(entry) != elements::NOT_FOUND {
                fallback_ce = data.contraction_ce(entry);
                checkpoint = self.checkpoint();
                checkpoint.retreat();
            }
        }
        ce
    }

    /// Attempts a discontiguous match against `entry`: the just-read
    /// mark did not match, but marks of lower combining class may be
    /// skipped over while preserving canonical equivalence. Skipped
    /// marks are accumulated and re-queued for independent iteration
    /// when a later mark completes the match.
    fn next_discontiguous(&mut self, data: &CollationData<'a>, entry: u32) -> u32 {
        let mut current_entry = entry;
        let mut multi = false;
        let mut skipped: Vec<u16> = Vec::new();
        let first = self.just_consumed_code_point();
        cursor::push_units(&mut skipped, first);
        let mut cc = self.combining_class(first);
        let mut prev_cc: u8 = 0;
        let mut checkpoint = self.checkpoint();
        let mut prev_was_lead = false;

        loop {
            let read = self.next_unit();
            let Some(unit) = read else {
                if multi {
                    self.set_discontiguous(skipped);
                    return data.contraction_ce(current_entry);
                }
                break;
            };

            // Combining classes belong to code points; matching reads
            // code units. Track the class across surrogate pairs.
            if cursor::is_surrogate(unit) {
                if prev_was_lead {
                    // Trail of the pair whose class we already know;
                    // keep both classes as they are.
                    prev_was_lead = false;
                } else {
                    prev_cc = cc;
                    cc = 0;
                    if cursor::is_lead(unit) {
                        if let Some(trail) = self.next_unit() {
                            if cursor::is_trail(trail) {
                                cc = self.combining_class(cursor::combine(unit, trail));
                                prev_was_lead = true;
                            }
                            self.go_back_one();
                        }
                    }
                }
            } else {
                prev_cc = cc;
                cc = self.combining_class(unit as u32);
                prev_was_lead = false;
            }

            if cc == 0 {
                // Base character: no more marks to move around.
                if multi {
                    self.previous_unit();
                    self.set_discontiguous(skipped);
                    return data.contraction_ce(current_entry);
                }
                break;
            }

            let mut offset = current_entry + 1;
            while unit > data.contraction_unit(offset) {
                offset += 1;
            }

            // A mark of the same class as its predecessor is blocked.
            if unit != data.contraction_unit(offset) || cc == prev_cc {
                skipped.push(unit);
                continue;
            }

            let ce = data.contraction_ce(offset);
            if ce == elements::NOT_FOUND {
                break;
            }
            if is_contraction_tag(ce) {
                current_entry = elements::payload_of(ce);
                if data.contraction_ce(current_entry) != elements::NOT_FOUND {
                    multi = true;
                    checkpoint = self.checkpoint();
                }
            } else {
                self.set_discontiguous(skipped);
                return ce;
            }
        }

        // No discontiguous match: restore to just past the base
        // character's first mark and resolve to the entry default.
        self.restore(&checkpoint);
        self.previous_unit();
        data.contraction_ce(entry)
    }

    /// Re-queues skipped characters so they are iterated independently
    /// after a discontiguous match, by placing them at the front of the
    /// active scratch buffer.
    fn set_discontiguous(&mut self, skipped: Vec<u16>) {
        match self.norm.pos {
            Some(p) => {
                let p = p.min(self.norm.units.len());
                self.norm.units.splice(0..p, skipped);
            }
            None => {
                self.fcd_limit = self.source.index();
                self.norm.units = skipped;
            }
        }
        self.norm.pos = Some(0);
    }

    /// The code point ending at the current read position.
    fn just_consumed_code_point(&mut self) -> u32 {
        match self.norm.pos {
            None => {
                let cp = self.source.previous_code_point().unwrap_or(0);
                self.source.next_code_point();
                cp
            }
            Some(p) => {
                let Some(i) = p.checked_sub(1) else { return 0 };
                let unit = self.norm.units.get(i).copied().unwrap_or(0);
                if cursor::is_trail(unit) {
                    if let Some(j) = i.checked_sub(1) {
                        if let Some(&lead) = self.norm.units.get(j) {
                            if cursor::is_lead(lead) {
                                return cursor::combine(lead, unit);
                            }
                        }
                    }
                } else if cursor::is_lead(unit) {
                    if let Some(&trail) = self.norm.units.get(p) {
                        if cursor::is_trail(trail) {
                            return cursor::combine(unit, trail);
                        }
                    }
                }
                unit as u32
            }
        }
    }

    /// Resolves a special-prefix CE: scans *backward* from the entry
    /// point through the contraction table (prefix context is stored
    /// reversed) before the forward CE is finalized. The one case where
    /// forward iteration looks behind itself; bounded and checkpointed
    /// like a contraction.
    pub(super) fn next_special_prefix(
        &mut self,
        data: &CollationData<'a>,
        ce: u32,
        entry_checkpoint: &Checkpoint,
    ) -> u32 {
        let resume = self.checkpoint();
        self.restore(entry_checkpoint);
        // Look at the character where we entered.
        self.previous_unit();
        let mut ce = ce;
        loop {
            let entry = elements::payload_of(ce);
            let mut offset = entry;
            if self.is_backwards_start() {
                ce = data.contraction_ce(offset);
                break;
            }
            let Some(prev) = self.previous_unit() else {
                ce = data.contraction_ce(offset);
                break;
            };
            while prev > data.contraction_unit(offset) {
                offset += 1;
            }
            ce = if prev == data.contraction_unit(offset) {
                data.contraction_ce(offset)
            } else {
                data.contraction_ce(entry)
            };
            if !is_special_prefix_tag(ce) {
                break;
            }
        }
        if ce != elements::NOT_FOUND {
            self.restore(&resume);
        } else {
            self.restore(entry_checkpoint);
        }
        ce
    }

    /// The backward counterpart of
    /// [`next_special_prefix`](Self::next_special_prefix); only the CE
    /// changes, consumption stays at one unit.
    pub(super) fn previous_special_prefix(&mut self, data: &CollationData<'a>, ce: u32) -> u32 {
        let resume = self.checkpoint();
        let mut ce = ce;
        loop {
            let entry = elements::payload_of(ce);
            let mut offset = entry;
            if self.is_backwards_start() {
                ce = data.contraction_ce(offset);
                break;
            }
            let Some(prev) = self.previous_unit() else {
                ce = data.contraction_ce(offset);
                break;
            };
            while prev > data.contraction_unit(offset) {
                offset += 1;
            }
            if prev == data.contraction_unit(offset) {
                ce = data.contraction_ce(offset);
            } else {
                // Completely ignorable code points inside a prefix are
                // transparent; skip them and keep scanning.
                if data.ce32(prev as u32) == 0 {
                    continue;
                }
                if cursor::is_surrogate(prev) {
                    if self.is_backwards_start() {
                        continue;
                    }
                    match self.previous_unit() {
                        Some(lead) if cursor::is_lead(lead) => {
                            if data.ce32(cursor::combine(lead, prev)) == 0 {
                                continue;
                            }
                            self.next_unit();
                        }
                        Some(_) => {
                            // Lone surrogate: transparent.
                            self.next_unit();
                            continue;
                        }
                        None => continue,
                    }
                }
                ce = data.contraction_ce(entry);
            }
            if !is_special_prefix_tag(ce) {
                break;
            }
        }
        self.restore(&resume);
        ce
    }

    /// Resolves a contraction ending at the current unit going
    /// backward: the maximal span of contraction-interior units is
    /// assembled and replayed through a nested forward iterator, and
    /// its CEs are served in reverse from the lookahead buffer. This
    /// guarantees results identical to the forward path.
    pub(super) fn previous_contraction(&mut self, data: &CollationData<'a>, unit: u16) -> u32 {
        let mut span: Vec<u16> = Vec::new();
        let mut ch = unit;
        let mut at_start = false;
        let mut prevch = self.previous_unit();
        while data.is_unsafe(ch as u32) {
            span.insert(0, ch);
            match prevch {
                None => {
                    at_start = true;
                    break;
                }
                Some(p) => ch = p,
            }
            if self.is_backwards_start() {
                at_start = true;
                break;
            }
            prevch = self.previous_unit();
        }
        if !at_start {
            // Undo the read past the base character.
            self.next_unit();
        }
        span.insert(0, ch);

        let region_start = self.position_offset();
        let mut ces: Vec<u32> = Vec::new();
        {
            let mut nested = CollationElements::new_raw(self.collator, &span);
            while let Some(ce) = nested.next_raw() {
                ces.push(ce);
            }
        }
        if ces.is_empty() {
            debug_assert!(false, "non-empty span produced no CEs");
            return elements::NOT_FOUND;
        }
        self.buffer.fill_backward(&ces, region_start)
    }
}
