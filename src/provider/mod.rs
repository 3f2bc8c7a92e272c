// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Read-only collation tables and the normalization-data collaborator.
//!
//! [`CollationData`] is the table set a tailoring compiler produces:
//! the code point → CE trie, the contraction and expansion tables, the
//! unsafe and contraction-end sets. [`NormalizationData`] is the
//! normalization collaborator: FCD words and canonical decompositions.
//! Both are immutable after construction and may be shared by any
//! number of iterators; [`builder`] assembles them from already
//! computed CEs (it performs no rule compilation).
//!
//! [`Collator`] binds a tailoring, an optional root (fallback) table
//! and options, and mints [`CollationElements`] iterators over source
//! text.
//!
//! [`CollationElements`]: crate::iter::CollationElements

use icu_collections::codepointinvlist::CodePointInversionList;
use zerofrom::ZeroFrom;
use zerovec::ZeroVec;

use crate::elements::{self, CollationElement};
use crate::iter::CollationElements;

pub mod builder;
mod error;
mod trie;

pub use error::{CollationDataError, CollationError};
pub use trie::CodePointMap;

/// Sentinel code unit terminating the candidate list of a contraction
/// entry. A noncharacter, so it never collides with real input.
pub(crate) const CONTRACTION_SENTINEL: u16 = 0xFFFF;

/// The immutable table set backing a collator.
///
/// Entry layout of the contraction table at offset `e`:
/// `units[e]` holds the entry header — the maximum combining class of
/// any discontiguous candidate in the low byte and the
/// all-marks-same-class flag in bit 8 — or zero for prefix entries;
/// `ces[e]` holds the default CE produced when nothing further matches.
/// `units[e + 1..]` are candidate code units in ascending order, each
/// paired with the CE in `ces`, terminated by [`CONTRACTION_SENTINEL`]
/// whose CE slot is the not-found marker.
#[derive(Debug, Clone, PartialEq, Eq, ZeroFrom)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CollationData<'data> {
    /// Code point → CE map; unmapped code points resolve to the
    /// not-found marker and fall through to the next table.
    #[cfg_attr(feature = "serde", serde(borrow))]
    trie: CodePointMap<'data>,
    /// Contraction candidate code units.
    #[cfg_attr(feature = "serde", serde(borrow))]
    contraction_units: ZeroVec<'data, u16>,
    /// CEs parallel to `contraction_units`.
    #[cfg_attr(feature = "serde", serde(borrow))]
    contraction_ces: ZeroVec<'data, u32>,
    /// Flat expansion CE runs; 0 terminates a null-terminated run.
    #[cfg_attr(feature = "serde", serde(borrow))]
    expansions: ZeroVec<'data, u32>,
    /// CEs that end at least one expansion, ascending.
    #[cfg_attr(feature = "serde", serde(borrow))]
    expansion_end_ces: ZeroVec<'data, u32>,
    /// Maximum expansion size parallel to `expansion_end_ces`.
    #[cfg_attr(feature = "serde", serde(borrow))]
    expansion_end_sizes: ZeroVec<'data, u8>,
    /// Code units that may occur past the first position of a
    /// contraction or otherwise make an offset unsafe to start at.
    #[cfg_attr(feature = "serde", serde(borrow))]
    unsafe_set: CodePointInversionList<'data>,
    /// Code units that can end a contraction; consulted by backward
    /// iteration before the per-unit trie lookup.
    #[cfg_attr(feature = "serde", serde(borrow))]
    contraction_end_set: CodePointInversionList<'data>,
    /// Whether conjoining jamo carry tailored (non-default) mappings,
    /// which forces decomposed Hangul through the normalization buffer.
    jamo_special: bool,
}

impl<'data> CollationData<'data> {
    /// The CE mapped to `cp`, possibly special-tagged, possibly the
    /// internal not-found marker.
    #[inline]
    pub(crate) fn ce32(&self, cp: u32) -> u32 {
        self.trie.get(cp)
    }

    /// Public lookup: the direct or special-tagged CE for a code point.
    pub fn lookup(&self, cp: u32) -> CollationElement {
        CollationElement::from_bits(self.trie.get(cp))
    }

    #[inline]
    pub(crate) fn contraction_unit(&self, offset: u32) -> u16 {
        self.contraction_units
            .get(offset as usize)
            .unwrap_or(CONTRACTION_SENTINEL)
    }

    #[inline]
    pub(crate) fn contraction_ce(&self, offset: u32) -> u32 {
        self.contraction_ces
            .get(offset as usize)
            .unwrap_or(elements::NOT_FOUND)
    }

    /// The discontiguous-matching header of a contraction entry:
    /// maximum combining class and the all-same-class flag.
    #[inline]
    pub(crate) fn contraction_header(&self, entry: u32) -> (u8, bool) {
        let header = self.contraction_unit(entry);
        (header as u8, (header >> 8) != 0)
    }

    #[inline]
    pub(crate) fn expansion_ce(&self, offset: u32) -> u32 {
        self.expansions.get(offset as usize).unwrap_or(0)
    }

    #[inline]
    pub(crate) fn is_unsafe(&self, unit: u32) -> bool {
        self.unsafe_set.contains32(unit)
    }

    #[inline]
    pub(crate) fn is_contraction_end(&self, unit: u16) -> bool {
        self.contraction_end_set.contains32(unit as u32)
    }

    #[inline]
    pub(crate) fn jamo_special(&self) -> bool {
        self.jamo_special
    }

    /// The maximum length of any expansion sequence ending with `ce`,
    /// or 1 if no expansion ends with it. Search code sizes its
    /// backward buffers from this.
    pub fn max_expansion(&self, ce: CollationElement) -> usize {
        let ce = ce.to_bits();
        match self.expansion_end_ces.binary_search(&ce) {
            Ok(i) => self.expansion_end_sizes.get(i).unwrap_or(1) as usize,
            Err(_) => 1,
        }
    }
}

/// FCD words and canonical decompositions, from the normalization data
/// collaborator.
///
/// The FCD word of a code point is `lead_cc << 8 | trail_cc` over its
/// canonical (NFD) decomposition; zero for code points that neither
/// reorder nor decompose.
#[derive(Debug, Clone, PartialEq, Eq, ZeroFrom)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct NormalizationData<'data> {
    /// Code point → FCD word.
    #[cfg_attr(feature = "serde", serde(borrow))]
    fcd: CodePointMap<'data>,
    /// Code point → `offset << 8 | len` into `decompositions`, or 0.
    #[cfg_attr(feature = "serde", serde(borrow))]
    decomposition_index: CodePointMap<'data>,
    /// Concatenated full canonical decompositions, UTF-16 code units.
    #[cfg_attr(feature = "serde", serde(borrow))]
    decompositions: ZeroVec<'data, u16>,
}

impl<'data> NormalizationData<'data> {
    /// The FCD word of `cp`: lead combining class in the high byte,
    /// trail combining class in the low byte.
    #[inline]
    pub fn fcd16(&self, cp: u32) -> u16 {
        self.fcd.get(cp) as u16
    }

    /// The canonical combining class of `cp`, served as the lead class
    /// of its FCD word (identical for code points without a
    /// decomposition, zero for decomposable starters).
    #[inline]
    pub fn ccc(&self, cp: u32) -> u8 {
        (self.fcd16(cp) >> 8) as u8
    }

    /// Appends the full canonical decomposition of `cp` (or `cp`
    /// itself) as UTF-16 code units.
    pub(crate) fn decompose_into(&self, cp: u32, out: &mut alloc::vec::Vec<u16>) {
        let packed = self.decomposition_index.get(cp);
        if packed == 0 {
            if cp <= 0xFFFF {
                out.push(cp as u16);
            } else {
                out.push(crate::iter::cursor::lead_for(cp));
                out.push(crate::iter::cursor::trail_for(cp));
            }
            return;
        }
        let start = (packed >> 8) as usize;
        let len = (packed & 0xFF) as usize;
        for i in start..start + len {
            // A malformed index is a data bug; degrade to dropping the
            // tail rather than panicking.
            let Some(unit) = self.decompositions.get(i) else {
                debug_assert!(false);
                break;
            };
            out.push(unit);
        }
    }
}

/// Options selecting iterator behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct CollatorOptions {
    /// Collate runs of decimal digits by numeric magnitude instead of
    /// digit by digit.
    pub numeric: bool,
    /// Perform incremental FCD checks and normalize non-conforming
    /// spans. Disabled only when input is known to be FCD.
    pub normalization: bool,
}

impl Default for CollatorOptions {
    fn default() -> Self {
        CollatorOptions {
            numeric: false,
            normalization: true,
        }
    }
}

/// Binds a tailoring table, an optional root (untailored fallback)
/// table, normalization data and options; mints collation element
/// iterators.
///
/// The collator holds only non-owning references; the same table set
/// may back any number of collators and iterators concurrently.
#[derive(Clone, Copy, Debug)]
pub struct Collator<'a> {
    tailoring: &'a CollationData<'a>,
    root: Option<&'a CollationData<'a>>,
    normalization: &'a NormalizationData<'a>,
    options: CollatorOptions,
}

impl<'a> Collator<'a> {
    /// A collator over one table set. `root` supplies the untailored
    /// fallback consulted when the tailoring has no mapping.
    pub fn new(
        tailoring: &'a CollationData<'a>,
        root: Option<&'a CollationData<'a>>,
        normalization: &'a NormalizationData<'a>,
        options: CollatorOptions,
    ) -> Self {
        Collator {
            tailoring,
            root,
            normalization,
            options,
        }
    }

    pub(crate) fn tailoring(&self) -> &'a CollationData<'a> {
        self.tailoring
    }

    pub(crate) fn root(&self) -> Option<&'a CollationData<'a>> {
        self.root
    }

    pub(crate) fn normalization(&self) -> &'a NormalizationData<'a> {
        self.normalization
    }

    pub(crate) fn options(&self) -> CollatorOptions {
        self.options
    }

    /// An iterator over the collation elements of `text` (UTF-16 code
    /// units), positioned at the start.
    pub fn collation_elements<'t>(&self, text: &'t [u16]) -> CollationElements<'a, 't> {
        CollationElements::new(*self, text)
    }

    /// See [`CollationData::max_expansion`]; consults the tailoring.
    pub fn max_expansion(&self, ce: CollationElement) -> usize {
        self.tailoring.max_expansion(ce)
    }
}
