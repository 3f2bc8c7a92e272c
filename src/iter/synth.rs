// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Expansion, long-primary, Hangul and implicit-weight synthesis.
//!
//! Hangul syllables are taken apart arithmetically (no table); code
//! points with no mapping anywhere receive a deterministic implicit
//! primary computed from the code point value alone, split across two
//! CEs, so that every string has a total order even over completely
//! unassigned characters.

use smallvec::SmallVec;

use super::cursor;
use super::CollationElements;
use crate::elements::{self, BYTE_COMMON, CONTINUATION_MARKER, PRIMARY_MASK};
use crate::provider::CollationData;

const HANGUL_SYLLABLE_BASE: u32 = 0xAC00;
const HANGUL_LEAD_BASE: u32 = 0x1100;
const HANGUL_VOWEL_BASE: u32 = 0x1161;
const HANGUL_TRAIL_BASE: u32 = 0x11A7;
const HANGUL_VOWEL_COUNT: u32 = 21;
const HANGUL_TRAIL_COUNT: u32 = 28;

// The implicit-weight ranges, reordered so that the unified ideographs
// sort first, then the compatibility ideographs, then extensions, then
// everything else.
const CJK_BASE: u32 = 0x4E00;
const CJK_LIMIT: u32 = 0x9FFF + 1;
const CJK_COMPAT_BASE: u32 = 0xF900;
const CJK_COMPAT_LIMIT: u32 = 0xFA2D + 1;
const CJK_A_BASE: u32 = 0x3400;
const CJK_A_LIMIT: u32 = 0x4DB5 + 1;
const CJK_B_BASE: u32 = 0x2_0000;
const CJK_B_LIMIT: u32 = 0x2_A6D6 + 1;
/// Bias keeping every non-CJK code point above the swapped CJK ranges.
const NON_CJK_OFFSET: u32 = 0x12_0000;

/// Reorders code points into implicit-weight space: URO < compatibility
/// < extension A < extension B < all remaining code points.
fn swap_cjk(cp: u32) -> u32 {
    let mut base = 0;
    if (CJK_BASE..CJK_LIMIT).contains(&cp) {
        return cp - CJK_BASE;
    }
    base += CJK_LIMIT - CJK_BASE;
    if (CJK_COMPAT_BASE..CJK_COMPAT_LIMIT).contains(&cp) {
        return cp - CJK_COMPAT_BASE + base;
    }
    base += CJK_COMPAT_LIMIT - CJK_COMPAT_BASE;
    if (CJK_A_BASE..CJK_A_LIMIT).contains(&cp) {
        return cp - CJK_A_BASE + base;
    }
    base += CJK_A_LIMIT - CJK_A_BASE;
    if (CJK_B_BASE..CJK_B_LIMIT).contains(&cp) {
        return cp - CJK_B_BASE + base;
    }
    cp + NON_CJK_OFFSET
}

/// The raw implicit weight of a code point: the first CE's primary in
/// the high 16 bits and the continuation CE's primary in the low 16.
/// Strictly monotonic in `swap_cjk` order; the lead stays below the
/// special-CE bit pattern and the continuation primary is never zero.
pub(crate) fn implicit_weight(cp: u32) -> u32 {
    let raw = swap_cjk(cp);
    let first = 0xE000 + (raw >> 15);
    let second = ((raw & 0x7FFF) << 1) | 1;
    (first << 16) | second
}

/// Splits a raw implicit weight into its two CEs.
fn implicit_ces(cp: u32) -> [u32; 2] {
    let raw = implicit_weight(cp);
    [
        (raw & PRIMARY_MASK) | (BYTE_COMMON << 8) | BYTE_COMMON,
        ((raw & 0xFFFF) << 16) | CONTINUATION_MARKER,
    ]
}

impl<'a, 't> CollationElements<'a, 't> {
    /// A long-primary CE packs three primary bytes with common
    /// secondary and tertiary weights; unpack into a lead CE and one
    /// continuation.
    pub(super) fn next_long_primary(&mut self, ce: u32) -> u32 {
        let ces = long_primary_ces(ce);
        self.buffer.fill_forward(&ces, self.position_offset())
    }

    pub(super) fn previous_long_primary(&mut self, ce: u32) -> u32 {
        let ces = long_primary_ces(ce);
        self.buffer.fill_backward(&ces, self.position_offset())
    }

    /// Buffers an expansion run. Single-CE runs are returned without
    /// touching the buffer.
    pub(super) fn next_expansion(&mut self, data: &CollationData<'a>, ce: u32) -> u32 {
        let ces = expansion_ces(data, ce);
        match ces.as_slice() {
            [] => 0,
            [only] => *only,
            _ => self.buffer.fill_forward(&ces, self.position_offset()),
        }
    }

    pub(super) fn previous_expansion(&mut self, data: &CollationData<'a>, ce: u32) -> u32 {
        let ces = expansion_ces(data, ce);
        match ces.as_slice() {
            [] => 0,
            [only] => *only,
            _ => self.buffer.fill_backward(&ces, self.position_offset()),
        }
    }

    /// Implicit weight synthesis, forward.
    pub(super) fn next_implicit(&mut self, cp: u32) -> u32 {
        let ces = implicit_ces(cp);
        self.buffer.fill_forward(&ces, self.position_offset())
    }

    /// Implicit weight synthesis, backward.
    pub(super) fn previous_implicit(&mut self, cp: u32) -> u32 {
        let ces = implicit_ces(cp);
        self.buffer.fill_backward(&ces, self.position_offset())
    }

    /// An unpaired trail surrogate during backward iteration: pair it
    /// with a preceding lead if there is one and re-resolve the
    /// supplementary code point, otherwise treat it as unassigned.
    pub(super) fn previous_surrogate(&mut self, data: &CollationData<'a>, unit: u16) -> u32 {
        if self.is_backwards_start() {
            return elements::NOT_FOUND;
        }
        let Some(prev) = self.previous_unit() else {
            return elements::NOT_FOUND;
        };
        if !cursor::is_lead(prev) {
            // Lone trail surrogate; give the unit back.
            self.next_unit();
            return elements::NOT_FOUND;
        }
        let cp = cursor::combine(prev, unit);
        let mut data = data;
        let mut ce = data.ce32(cp);
        if ce == elements::NOT_FOUND {
            if let Some(root) = self.collator.root() {
                if !core::ptr::eq(data, root) {
                    data = root;
                    ce = root.ce32(cp);
                }
            }
        }
        if ce == elements::NOT_FOUND {
            return self.previous_implicit(cp);
        }
        if !elements::is_special(ce) {
            return ce;
        }
        self.previous_special(data, ce, unit)
    }

    /// A precomposed Hangul syllable, forward: decompose into jamo by
    /// arithmetic, look each jamo up directly, and buffer the CEs. If
    /// jamo carry tailored mappings, route the decomposed jamo through
    /// the scratch buffer instead and report an ignorable so the
    /// orchestrator re-enters.
    pub(super) fn next_hangul(&mut self, data: &CollationData<'a>, unit: u16) -> u32 {
        let (lead, vowel, trail) = decompose_hangul(unit as u32);
        if !data.jamo_special() {
            let mut ces: SmallVec<[u32; 4]> = SmallVec::new();
            ces.push(self.jamo_ce(data, lead));
            ces.push(self.jamo_ce(data, vowel));
            if trail != HANGUL_TRAIL_BASE {
                ces.push(self.jamo_ce(data, trail));
            }
            return self.buffer.fill_forward(&ces, self.position_offset());
        }
        // Tailored jamo: reprocess through the normal path. Hangul
        // syllables pass the FCD check, so the scratch buffer is free.
        self.norm.units.clear();
        self.norm.units.push(lead as u16);
        self.norm.units.push(vowel as u16);
        if trail != HANGUL_TRAIL_BASE {
            self.norm.units.push(trail as u16);
        }
        self.norm.pos = Some(0);
        self.fcd_limit = self.source.index();
        self.fcd_start = self.fcd_limit.saturating_sub(1);
        0
    }

    /// A precomposed Hangul syllable, backward.
    pub(super) fn previous_hangul(&mut self, data: &CollationData<'a>, unit: u16) -> u32 {
        let (lead, vowel, trail) = decompose_hangul(unit as u32);
        if !data.jamo_special() {
            let mut ces: SmallVec<[u32; 4]> = SmallVec::new();
            ces.push(self.jamo_ce(data, lead));
            ces.push(self.jamo_ce(data, vowel));
            if trail != HANGUL_TRAIL_BASE {
                ces.push(self.jamo_ce(data, trail));
            }
            return self.buffer.fill_backward(&ces, self.position_offset());
        }
        self.norm.units.clear();
        self.norm.units.push(lead as u16);
        self.norm.units.push(vowel as u16);
        if trail != HANGUL_TRAIL_BASE {
            self.norm.units.push(trail as u16);
        }
        self.norm.pos = Some(self.norm.units.len());
        self.fcd_start = self.source.index();
        self.fcd_limit = self.fcd_start + 1;
        0
    }

    /// The CE of a conjoining jamo on the fast (untailored) path,
    /// resolved through the table chain; jamo with non-direct mappings
    /// require the tailored-jamo route instead.
    fn jamo_ce(&self, data: &CollationData<'a>, jamo: u32) -> u32 {
        let mut ce = data.ce32(jamo);
        if ce == elements::NOT_FOUND {
            if let Some(root) = self.collator.root() {
                ce = root.ce32(jamo);
            }
        }
        if ce == elements::NOT_FOUND {
            debug_assert!(false, "jamo unmapped on the fast path");
            return 0;
        }
        debug_assert!(
            !elements::is_special(ce),
            "special jamo mapping requires the tailored-jamo path"
        );
        ce
    }
}

/// Arithmetic decomposition of a precomposed syllable into
/// (lead, vowel, trail) jamo; the trail equals the trail base when the
/// syllable has none.
fn decompose_hangul(syllable: u32) -> (u32, u32, u32) {
    debug_assert!(syllable >= HANGUL_SYLLABLE_BASE);
    let index = syllable.saturating_sub(HANGUL_SYLLABLE_BASE);
    let trail = index % HANGUL_TRAIL_COUNT;
    let rest = index / HANGUL_TRAIL_COUNT;
    let vowel = rest % HANGUL_VOWEL_COUNT;
    let lead = rest / HANGUL_VOWEL_COUNT;
    (
        HANGUL_LEAD_BASE + lead,
        HANGUL_VOWEL_BASE + vowel,
        HANGUL_TRAIL_BASE + trail,
    )
}

fn long_primary_ces(ce: u32) -> [u32; 2] {
    let payload = elements::payload_of(ce);
    [
        ((payload & 0xFFFF00) << 8) | (BYTE_COMMON << 8) | BYTE_COMMON,
        ((payload & 0xFF) << 24) | CONTINUATION_MARKER,
    ]
}

fn expansion_ces(data: &CollationData, ce: u32) -> SmallVec<[u32; 8]> {
    let payload = elements::payload_of(ce);
    let offset = payload >> 4;
    let count = payload & 0xF;
    let mut ces: SmallVec<[u32; 8]> = SmallVec::new();
    if count != 0 {
        for i in 0..count {
            ces.push(data.expansion_ce(offset + i));
        }
    } else {
        // Null-terminated long run.
        let mut at = offset;
        loop {
            let value = data.expansion_ce(at);
            if value == 0 {
                break;
            }
            ces.push(value);
            at += 1;
        }
    }
    ces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hangul_decomposition_arithmetic() {
        // U+AC00 = 가 = ᄀ + ᅡ, no trailing consonant.
        assert_eq!(decompose_hangul(0xAC00), (0x1100, 0x1161, 0x11A7));
        // U+D7A3 = 힣 = ᄒ + ᅵ + ᇂ, the last syllable.
        assert_eq!(decompose_hangul(0xD7A3), (0x1112, 0x1175, 0x11C2));
        // U+AC01 = 각 has the first real trailing consonant.
        assert_eq!(decompose_hangul(0xAC01), (0x1100, 0x1161, 0x11A8));
    }

    #[test]
    fn implicit_weight_monotonic_per_range() {
        for window in [
            [0x4E00u32, 0x4E01, 0x9FFE],          // URO
            [0x3400, 0x3401, 0x4DB4],             // extension A
            [0x2_0000, 0x2_0001, 0x2_A6D5],       // extension B
            [0xE000, 0xE001, 0x10_FFFF],          // everything else
        ] {
            let mut last = None;
            for &cp in &window {
                let weight = implicit_weight(cp);
                if let Some(prev) = last {
                    assert!(weight > prev, "not monotonic at U+{cp:04X}");
                }
                last = Some(weight);
            }
        }
    }

    #[test]
    fn implicit_lead_primary_below_special_range() {
        for cp in [0u32, 0x4E00, 0x10_FFFF] {
            let first_primary = implicit_weight(cp) >> 16;
            assert!(first_primary >= 0xE000);
            assert!(first_primary < 0xF000);
        }
    }

    #[test]
    fn uro_sorts_before_extension_a() {
        assert!(implicit_weight(0x9FFF) < implicit_weight(0x3400));
        assert!(implicit_weight(0x4DB5 - 1) < implicit_weight(0x2_0000));
        assert!(implicit_weight(0x2_A6D5) < implicit_weight(0x0041));
    }
}
