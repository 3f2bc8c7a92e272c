// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Low-level assembly of the collation and normalization tables.
//!
//! The builders here take *already computed* CEs, contraction entries
//! and decompositions — the output of a tailoring compiler — and pack
//! them into the immutable table structs, computing the derived sets
//! (unsafe characters, contraction ends, maximum expansion sizes) and
//! validating every cross-reference. Rule parsing and weight assignment
//! happen elsewhere.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use icu_collections::codepointinvlist::CodePointInversionListBuilder;
use zerovec::ZeroVec;

use crate::elements::{self, CollationElement, Tag};
use crate::provider::trie::{BLOCK_MASK, BLOCK_SHIFT, BLOCK_SIZE, INDEX_LEN};
use crate::provider::{
    CodePointMap, CollationData, CollationDataError, NormalizationData, CONTRACTION_SENTINEL,
};

/// Builds a [`CodePointMap`] by accumulating individual mappings.
#[derive(Debug, Clone)]
pub struct CodePointMapBuilder {
    index: Vec<u16>,
    data: Vec<u32>,
    default: u32,
}

impl CodePointMapBuilder {
    /// An empty map; every code point resolves to `default`.
    pub fn new(default: u32) -> Self {
        CodePointMapBuilder {
            index: vec![0; INDEX_LEN as usize],
            // Block 0 is the shared null block.
            data: vec![default; BLOCK_SIZE as usize],
            default,
        }
    }

    /// Maps `cp` to `value`. Out-of-range code points are ignored.
    pub fn set(&mut self, cp: u32, value: u32) {
        if cp > 0x10_FFFF {
            debug_assert!(false, "code point out of range");
            return;
        }
        let block_slot = (cp >> BLOCK_SHIFT) as usize;
        #[allow(clippy::indexing_slicing)] // index sized to INDEX_LEN, cp checked
        let mut block = self.index[block_slot];
        if block == 0 {
            // Split off a fresh block for this range.
            block = (self.data.len() >> BLOCK_SHIFT as usize) as u16;
            let new_len = self.data.len() + BLOCK_SIZE as usize;
            self.data.resize(new_len, self.default);
            #[allow(clippy::indexing_slicing)]
            {
                self.index[block_slot] = block;
            }
        }
        let slot = ((block as u32) << BLOCK_SHIFT) | (cp & BLOCK_MASK);
        #[allow(clippy::indexing_slicing)] // slot is within the block just ensured
        {
            self.data[slot as usize] = value;
        }
    }

    /// Finishes the map.
    pub fn build(self) -> CodePointMap<'static> {
        CodePointMap::from_parts(
            ZeroVec::alloc_from_slice(&self.index),
            ZeroVec::alloc_from_slice(&self.data),
            self.default,
        )
    }
}

/// Accumulates mappings, contraction entries and expansion runs and
/// packs them into a validated [`CollationData`].
#[derive(Debug, Clone, Default)]
pub struct CollationDataBuilder {
    mappings: Vec<(u32, u32)>,
    contraction_units: Vec<u16>,
    contraction_ces: Vec<u32>,
    expansions: Vec<u32>,
    expansion_ends: BTreeMap<u32, u8>,
    unsafe_units: Vec<u32>,
    contraction_ends: Vec<u32>,
    jamo_special: bool,
}

impl CollationDataBuilder {
    /// An empty table set; every code point is unmapped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a code point to a CE (direct or special).
    pub fn map(&mut self, cp: u32, ce: CollationElement) {
        self.mappings.push((cp, ce.to_bits()));
    }

    /// Maps every code point of an inclusive range to a zero-payload
    /// special CE with the given tag.
    pub fn tag_range(&mut self, start: u32, end: u32, tag: Tag) {
        for cp in start..=end {
            self.map(cp, CollationElement::special(tag, 0));
        }
    }

    /// Installs the fixed special ranges: Hangul syllables, lead and
    /// trail surrogates.
    pub fn tag_special_ranges(&mut self) {
        self.tag_range(0xAC00, 0xD7A3, Tag::HangulSyllable);
        self.tag_range(0xD800, 0xDBFF, Tag::LeadSurrogate);
        self.tag_range(0xDC00, 0xDFFF, Tag::TrailSurrogate);
    }

    /// Appends an expansion run and returns the expansion CE referring
    /// to it. Runs of 16 CEs or more are stored null-terminated.
    pub fn expansion_element(&mut self, ces: &[CollationElement]) -> CollationElement {
        let offset = self.expansions.len() as u32;
        self.expansions.extend(ces.iter().map(|ce| ce.to_bits()));
        let count = if ces.len() < 16 {
            ces.len() as u32
        } else {
            self.expansions.push(0);
            0
        };
        if let Some(last) = ces.last() {
            let size = ces.len().min(u8::MAX as usize) as u8;
            let entry = self.expansion_ends.entry(last.to_bits()).or_insert(size);
            *entry = (*entry).max(size);
        }
        CollationElement::special(Tag::Expansion, (offset << 4) | count)
    }

    /// Maps a code point to an expansion run.
    pub fn map_expansion(&mut self, cp: u32, ces: &[CollationElement]) {
        let ce = self.expansion_element(ces);
        self.map(cp, ce);
    }

    /// Maps a decimal digit: `value` is its numeric value, `plain` the
    /// CE used when numeric collation is off.
    pub fn map_digit(&mut self, cp: u32, value: u8, plain: CollationElement) {
        debug_assert!(value < 10);
        let offset = self.expansions.len() as u32;
        self.expansions.push(plain.to_bits());
        let payload = ((value as u32) << 20) | offset;
        self.map(cp, CollationElement::special(Tag::Digit, payload));
    }

    /// Appends a contraction entry and returns its offset, for use as a
    /// `Contraction` payload or as the target of a chained pair.
    ///
    /// `max_combining_class`/`all_same_class` gate discontiguous
    /// matching; `default` is produced when no candidate matches;
    /// `pairs` are the candidate (code unit, CE) continuations.
    pub fn contraction_entry(
        &mut self,
        max_combining_class: u8,
        all_same_class: bool,
        default: CollationElement,
        pairs: &[(u16, CollationElement)],
    ) -> u32 {
        self.entry_impl(
            max_combining_class as u16 | ((all_same_class as u16) << 8),
            default,
            pairs,
            true,
        )
    }

    /// Appends a prefix entry (scanned backward from a special-prefix
    /// CE) and returns its offset. The pairs are *preceding* code
    /// units; they do not mark anything unsafe for forward iteration.
    pub fn prefix_entry(
        &mut self,
        default: CollationElement,
        pairs: &[(u16, CollationElement)],
    ) -> u32 {
        self.entry_impl(0, default, pairs, false)
    }

    fn entry_impl(
        &mut self,
        header: u16,
        default: CollationElement,
        pairs: &[(u16, CollationElement)],
        forward: bool,
    ) -> u32 {
        let entry = self.contraction_units.len() as u32;
        self.contraction_units.push(header);
        self.contraction_ces.push(default.to_bits());
        let mut sorted: Vec<(u16, CollationElement)> = pairs.into();
        sorted.sort_by_key(|&(unit, _)| unit);
        for (unit, ce) in sorted {
            debug_assert_ne!(unit, CONTRACTION_SENTINEL);
            self.contraction_units.push(unit);
            self.contraction_ces.push(ce.to_bits());
            if forward {
                self.unsafe_units.push(unit as u32);
                self.contraction_ends.push(unit as u32);
            }
        }
        self.contraction_units.push(CONTRACTION_SENTINEL);
        self.contraction_ces.push(elements::NOT_FOUND);
        entry
    }

    /// Marks a code unit as unsafe to set an offset at.
    pub fn add_unsafe(&mut self, unit: u32) {
        self.unsafe_units.push(unit);
    }

    /// Declares that conjoining jamo carry tailored mappings.
    pub fn set_jamo_special(&mut self, jamo_special: bool) {
        self.jamo_special = jamo_special;
    }

    /// Validates all cross-references and finishes the table set.
    pub fn build(self) -> Result<CollationData<'static>, CollationDataError> {
        // Offsets must stay addressable within the payload bit fields.
        if self.expansions.len() > (1 << 20) || self.contraction_units.len() > (1 << 24) {
            return Err(CollationDataError::PayloadOverflow);
        }
        for &(_, ce) in &self.mappings {
            self.validate_ce(ce)?;
        }
        for &ce in self.contraction_ces.iter().chain(self.expansions.iter()) {
            self.validate_ce(ce)?;
        }

        let mut trie = CodePointMapBuilder::new(elements::NOT_FOUND);
        for &(cp, ce) in &self.mappings {
            trie.set(cp, ce);
        }

        let mut unsafe_builder = CodePointInversionListBuilder::new();
        for &unit in &self.unsafe_units {
            unsafe_builder.add32(unit);
        }
        // An offset on a trail surrogate must snap to its lead.
        unsafe_builder.add_range32(0xDC00..=0xDFFF);
        let mut ends_builder = CodePointInversionListBuilder::new();
        for &unit in &self.contraction_ends {
            ends_builder.add32(unit);
        }

        let end_ces: Vec<u32> = self.expansion_ends.keys().copied().collect();
        let end_sizes: Vec<u8> = self.expansion_ends.values().copied().collect();

        Ok(CollationData {
            trie: trie.build(),
            contraction_units: ZeroVec::alloc_from_slice(&self.contraction_units),
            contraction_ces: ZeroVec::alloc_from_slice(&self.contraction_ces),
            expansions: ZeroVec::alloc_from_slice(&self.expansions),
            expansion_end_ces: ZeroVec::alloc_from_slice(&end_ces),
            expansion_end_sizes: ZeroVec::alloc_from_slice(&end_sizes),
            unsafe_set: unsafe_builder.build(),
            contraction_end_set: ends_builder.build(),
            jamo_special: self.jamo_special,
        })
    }

    fn validate_ce(&self, ce: u32) -> Result<(), CollationDataError> {
        if !elements::is_special(ce) {
            return Ok(());
        }
        let Some(tag) = elements::tag_of(ce) else {
            return Err(CollationDataError::ReservedTag {
                bits: ((ce >> 24) & 0xF) as u8,
            });
        };
        let payload = elements::payload_of(ce);
        match tag {
            Tag::Expansion => {
                let offset = payload >> 4;
                let count = payload & 0xF;
                let len = self.expansions.len();
                if count == 0 {
                    // Null-terminated: a zero CE must follow the offset.
                    let terminated = self
                        .expansions
                        .get(offset as usize..)
                        .is_some_and(|tail| tail.contains(&0));
                    if !terminated {
                        return Err(CollationDataError::ExpansionOffsetOutOfRange { offset, len });
                    }
                } else if (offset + count) as usize > len {
                    return Err(CollationDataError::ExpansionOffsetOutOfRange { offset, len });
                }
            }
            Tag::Contraction | Tag::SpecialPrefix => {
                let len = self.contraction_units.len();
                if payload as usize >= len {
                    return Err(CollationDataError::ContractionOffsetOutOfRange {
                        offset: payload,
                        len,
                    });
                }
                let terminated = self
                    .contraction_units
                    .get(payload as usize..)
                    .is_some_and(|tail| tail.contains(&CONTRACTION_SENTINEL));
                if !terminated {
                    return Err(CollationDataError::UnterminatedContraction { offset: payload });
                }
            }
            Tag::Digit => {
                let offset = payload & 0xF_FFFF;
                let len = self.expansions.len();
                if offset as usize >= len {
                    return Err(CollationDataError::ExpansionOffsetOutOfRange { offset, len });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Accumulates combining classes and full canonical decompositions and
/// packs them into [`NormalizationData`].
#[derive(Debug, Clone, Default)]
pub struct NormalizationDataBuilder {
    ccc: BTreeMap<u32, u8>,
    decompositions: BTreeMap<u32, Vec<u32>>,
}

impl NormalizationDataBuilder {
    /// An empty data set; everything is a non-decomposing starter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a non-zero canonical combining class.
    pub fn set_ccc(&mut self, cp: u32, ccc: u8) {
        self.ccc.insert(cp, ccc);
    }

    /// Records the *full* (recursively expanded) canonical
    /// decomposition of `cp`.
    pub fn set_decomposition(&mut self, cp: u32, decomposition: &[u32]) {
        self.decompositions.insert(cp, decomposition.into());
    }

    /// Finishes the data set, deriving FCD words from the recorded
    /// classes and decompositions.
    pub fn build(self) -> NormalizationData<'static> {
        let mut fcd = CodePointMapBuilder::new(0);
        for (&cp, &cc) in &self.ccc {
            fcd.set(cp, ((cc as u32) << 8) | cc as u32);
        }

        let ccc_of = |cp: u32| self.ccc.get(&cp).copied().unwrap_or(0) as u32;
        let mut index = CodePointMapBuilder::new(0);
        let mut units: Vec<u16> = Vec::new();
        for (&cp, decomp) in &self.decompositions {
            let (Some(&first), Some(&last)) = (decomp.first(), decomp.last()) else {
                continue;
            };
            fcd.set(cp, (ccc_of(first) << 8) | ccc_of(last));

            let start = units.len() as u32;
            for &c in decomp {
                if c <= 0xFFFF {
                    units.push(c as u16);
                } else {
                    units.push(crate::iter::cursor::lead_for(c));
                    units.push(crate::iter::cursor::trail_for(c));
                }
            }
            let len = units.len() as u32 - start;
            debug_assert!(len <= 0xFF);
            index.set(cp, (start << 8) | len);
        }

        NormalizationData {
            fcd: fcd.build(),
            decomposition_index: index.build(),
            decompositions: ZeroVec::alloc_from_slice(&units),
        }
    }
}
