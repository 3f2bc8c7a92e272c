// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Bidirectional collation element iteration for the Unicode Collation
//! Algorithm.
//!
//! A collation element (CE) is the 32-bit packed sort weight the UCA
//! assigns to one character or character sequence; comparing or
//! searching strings in linguistically meaningful order means comparing
//! their CE sequences rather than raw code points. This crate provides
//! the iteration engine that turns a UTF-16 string into its CE
//! sequence, scanning forward or backward with identical results:
//!
//! - greedy, context-sensitive contraction matching, including
//!   *discontiguous* contractions that tolerate intervening combining
//!   marks without dropping them;
//! - incremental normalization limited to spans that are not already
//!   in FCD order;
//! - arithmetic decomposition of precomposed Hangul syllables and
//!   deterministic implicit weights for unassigned and CJK code
//!   points, so lookup never fails;
//! - an optional numeric mode that orders runs of decimal digits by
//!   magnitude;
//! - an offset mapping from emitted CEs back to source positions, used
//!   by substring search.
//!
//! The tables the engine consults (trie, contraction and expansion
//! tables, FCD data) are produced by an external tailoring compiler and
//! handed over through [`provider`]; they are immutable and freely
//! shareable across threads, while every iterator owns its private
//! mutable state.
//!
//! # Examples
//!
//! ```
//! use collation_elements::provider::builder::{
//!     CollationDataBuilder, NormalizationDataBuilder,
//! };
//! use collation_elements::{CollationElement, Collator, CollatorOptions};
//!
//! let mut builder = CollationDataBuilder::new();
//! builder.map('a' as u32, CollationElement::from_weights(0x1000, 5, 5));
//! builder.map('b' as u32, CollationElement::from_weights(0x1100, 5, 5));
//! let data = builder.build().expect("valid tables");
//! let norm = NormalizationDataBuilder::new().build();
//!
//! let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
//! let text: Vec<u16> = "ab".encode_utf16().collect();
//! let mut elements = collator.collation_elements(&text);
//! assert_eq!(elements.next().map(|ce| ce.primary()), Some(0x1000));
//! assert_eq!(elements.next().map(|ce| ce.primary()), Some(0x1100));
//! assert_eq!(elements.next(), None);
//! ```

// https://github.com/unicode-org/icu4x/blob/main/documents/process/boilerplate.md#library-annotations
#![cfg_attr(not(any(test, doc)), no_std)]
#![cfg_attr(
    not(test),
    deny(
        clippy::indexing_slicing,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic
    )
)]
#![warn(missing_docs)]

extern crate alloc;

mod elements;
pub mod iter;
pub mod provider;

pub use elements::{CollationElement, Tag};
pub use iter::CollationElements;
pub use provider::{
    CollationData, CollationDataError, CollationError, Collator, CollatorOptions,
    NormalizationData,
};
