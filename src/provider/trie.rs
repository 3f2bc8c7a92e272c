// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! A compact read-only code point → `u32` map.
//!
//! Two-stage lookup: a `u16` block number per aligned 64-code-point
//! block, then the value inside the block. Blocks are deduplicated by
//! the builder; every block number that never received a mapping points
//! at the shared null block, whose slots all hold the map's default
//! value. Lookup is branch-light and constant-time for every code
//! point, so no separate Latin-1 fast path is needed.

use zerofrom::ZeroFrom;
use zerovec::ZeroVec;

/// log2 of the number of code points per data block.
pub(crate) const BLOCK_SHIFT: u32 = 6;
/// Number of code points per data block.
pub(crate) const BLOCK_SIZE: u32 = 1 << BLOCK_SHIFT;
/// Mask for the in-block offset of a code point.
pub(crate) const BLOCK_MASK: u32 = BLOCK_SIZE - 1;
/// Number of index entries covering U+0000..=U+10FFFF.
pub(crate) const INDEX_LEN: u32 = 0x11_0000 >> BLOCK_SHIFT;

/// A read-only map from code points to 32-bit values, used for the
/// CE trie and the FCD word table.
#[derive(Debug, Clone, PartialEq, Eq, ZeroFrom)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CodePointMap<'data> {
    /// Block number per 64-code-point block, `INDEX_LEN` entries.
    #[cfg_attr(feature = "serde", serde(borrow))]
    index: ZeroVec<'data, u16>,
    /// Concatenated data blocks; block `n` occupies
    /// `n * BLOCK_SIZE .. (n + 1) * BLOCK_SIZE`. Block 0 is the null
    /// block.
    #[cfg_attr(feature = "serde", serde(borrow))]
    data: ZeroVec<'data, u32>,
    /// Value returned for unmapped and out-of-range code points.
    default: u32,
}

impl<'data> CodePointMap<'data> {
    pub(crate) fn from_parts(
        index: ZeroVec<'data, u16>,
        data: ZeroVec<'data, u32>,
        default: u32,
    ) -> Self {
        debug_assert_eq!(index.len(), INDEX_LEN as usize);
        debug_assert_eq!(data.len() % BLOCK_SIZE as usize, 0);
        CodePointMap {
            index,
            data,
            default,
        }
    }

    /// The value for `cp`, or the default for anything unmapped or
    /// beyond U+10FFFF.
    pub fn get(&self, cp: u32) -> u32 {
        let Some(block) = self.index.get((cp >> BLOCK_SHIFT) as usize) else {
            return self.default;
        };
        let slot = ((block as u32) << BLOCK_SHIFT) | (cp & BLOCK_MASK);
        self.data.get(slot as usize).unwrap_or(self.default)
    }

    /// The default (unmapped) value.
    pub fn default_value(&self) -> u32 {
        self.default
    }
}
