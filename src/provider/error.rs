// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Custom error type(s) for the parent module.

use displaydoc::Display;

/// Construction-time validation failures for
/// [`CollationData`](super::CollationData).
#[derive(Copy, Clone, Display, Debug, PartialEq)]
#[non_exhaustive]
pub enum CollationDataError {
    /// An expansion CE references offset {offset} outside the expansion table of length {len}
    #[displaydoc(
        "An expansion CE references offset {offset} outside the expansion table of length {len}"
    )]
    ExpansionOffsetOutOfRange {
        /// The out-of-range offset.
        offset: u32,
        /// The expansion table length.
        len: usize,
    },
    /// A contraction CE references offset {offset} outside the contraction table of length {len}
    #[displaydoc(
        "A contraction CE references offset {offset} outside the contraction table of length {len}"
    )]
    ContractionOffsetOutOfRange {
        /// The out-of-range offset.
        offset: u32,
        /// The contraction table length.
        len: usize,
    },
    /// A contraction entry at offset {offset} is not terminated by the sentinel unit
    #[displaydoc("A contraction entry at offset {offset} is not terminated by the sentinel unit")]
    UnterminatedContraction {
        /// The entry offset.
        offset: u32,
    },
    /// A special CE carries the reserved tag bits {bits}
    #[displaydoc("A special CE carries the reserved tag bits {bits}")]
    ReservedTag {
        /// The invalid tag nibble.
        bits: u8,
    },
    /// A special CE payload does not fit the 24-bit payload field
    #[displaydoc("A special CE payload does not fit the 24-bit payload field")]
    PayloadOverflow,
}

impl core::error::Error for CollationDataError {}

/// Caller-visible failures of a
/// [`CollationElements`](crate::iter::CollationElements) operation.
///
/// Iteration itself never fails: lookup degrades through the tailoring →
/// root → implicit-weight chain. Only hard precondition violations are
/// reported, and they leave the iterator state untouched.
#[derive(Copy, Clone, Display, Debug, PartialEq)]
#[non_exhaustive]
pub enum CollationError {
    /// Offset {offset} is outside the source text of length {len}
    #[displaydoc("Offset {offset} is outside the source text of length {len}")]
    OffsetOutOfRange {
        /// The requested offset.
        offset: usize,
        /// The source text length in code units.
        len: usize,
    },
}

impl core::error::Error for CollationError {}
