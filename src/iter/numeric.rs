// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Numeric-mode synthesis of digit-run collation elements.
//!
//! With numeric collation on, a maximal run of decimal digits is
//! re-encoded so that primary-weight order equals numeric magnitude:
//! a scientific-notation-like form with a length byte and base-100
//! mantissa bytes riding in continuation CEs. Both directions collect
//! the run and feed one shared encoder, so the CE sequence is
//! byte-identical no matter which way the run was scanned.

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::cursor;
use super::CollationElements;
use crate::elements::{self, BYTE_COMMON, CONTINUATION_MARKER, PRIMARY_SHIFT, SECONDARY_SHIFT};
use crate::provider::CollationData;

/// Primary lead byte reserved for numeric-mode runs.
const NUMERIC_PRIMARY_LEAD: u32 = 0x27;

/// Encodes the decimal digits of one run (most significant first) as a
/// CE sequence ordered by magnitude.
///
/// Leading zeros are stripped; the significant digits are padded to
/// even length with one leading zero and packed as base-100 bytes
/// `pair * 2 + 6`; all-zero trailing pairs are dropped (the length byte
/// keeps the magnitude); the final byte is lowered by one so a run
/// that is a proper prefix of a longer one sorts first.
pub(super) fn encode_digit_run(digits: &[u8]) -> SmallVec<[u32; 4]> {
    let significant: &[u8] = match digits.iter().position(|&d| d != 0) {
        Some(first_non_zero) => digits.get(first_non_zero..).unwrap_or(&[]),
        None => &[],
    };

    let mut bytes: SmallVec<[u8; 8]> = SmallVec::new();
    let pair_count;
    if significant.is_empty() {
        // The run is all zeros; encode a single zero pair.
        bytes.push(6);
        pair_count = 1;
    } else {
        pair_count = (significant.len() + 1) / 2;
        let mut iter = significant.iter();
        if significant.len() % 2 == 1 {
            let &ones = iter.next().unwrap_or(&0);
            bytes.push(ones * 2 + 6);
        }
        while let (Some(&tens), Some(&ones)) = (iter.next(), iter.next()) {
            bytes.push((tens * 10 + ones) * 2 + 6);
        }
        while bytes.len() > 1 && bytes.last() == Some(&6) {
            bytes.pop();
        }
    }
    if let Some(last) = bytes.last_mut() {
        *last -= 1;
    }

    let mut ces: SmallVec<[u32; 4]> = SmallVec::new();
    let header = (NUMERIC_PRIMARY_LEAD << 8) | (0x80 + (pair_count as u32 & 0x7F));
    ces.push((header << PRIMARY_SHIFT) | (BYTE_COMMON << SECONDARY_SHIFT) | BYTE_COMMON);
    let mut i = 0;
    while i < bytes.len() {
        let mut primary = (bytes.get(i).copied().unwrap_or(0) as u32) << 8;
        if let Some(&b) = bytes.get(i + 1) {
            primary |= b as u32;
        }
        ces.push((primary << PRIMARY_SHIFT) | CONTINUATION_MARKER);
        i += 2;
    }
    ces
}

impl<'a, 't> CollationElements<'a, 't> {
    /// Resolves a digit-tagged CE going forward: in numeric mode the
    /// maximal digit run is consumed and re-encoded, otherwise the
    /// plain CE is read from the expansion table.
    pub(super) fn next_digit(&mut self, data: &CollationData<'a>, ce: u32) -> u32 {
        let payload = elements::payload_of(ce);
        if !self.numeric {
            return data.expansion_ce(payload & 0xF_FFFF);
        }

        let mut digits: Vec<u8> = Vec::new();
        digits.push(((payload >> 20) & 0xF) as u8);
        loop {
            if self.is_end() {
                break;
            }
            let checkpoint = self.checkpoint();
            let Some(unit) = self.next_unit() else { break };
            let mut next_cp = unit as u32;
            if cursor::is_lead(unit) && !self.is_end() {
                match self.next_unit() {
                    Some(trail) if cursor::is_trail(trail) => {
                        next_cp = cursor::combine(unit, trail);
                    }
                    Some(_) => self.go_back_one(),
                    None => {}
                }
            }
            match self.digit_value(next_cp) {
                Some(value) => digits.push(value),
                None => {
                    // Went one too far; give the character back.
                    self.restore(&checkpoint);
                    break;
                }
            }
        }

        let ces = encode_digit_run(&digits);
        self.buffer.fill_forward(&ces, self.position_offset())
    }

    /// Resolves a digit-tagged CE going backward: the run is collected
    /// to its start and passed through the same encoder as the forward
    /// direction.
    pub(super) fn previous_digit(&mut self, data: &CollationData<'a>, ce: u32) -> u32 {
        let payload = elements::payload_of(ce);
        if !self.numeric {
            return data.expansion_ce(payload & 0xF_FFFF);
        }

        // Digits collected last-to-first.
        let mut reversed: Vec<u8> = Vec::new();
        reversed.push(((payload >> 20) & 0xF) as u8);
        loop {
            if self.is_backwards_start() {
                break;
            }
            let checkpoint = self.checkpoint();
            let Some(prev) = self.previous_unit() else { break };
            let mut prev_cp = prev as u32;
            if cursor::is_trail(prev) && !self.is_backwards_start() {
                match self.previous_unit() {
                    Some(lead) if cursor::is_lead(lead) => {
                        prev_cp = cursor::combine(lead, prev);
                    }
                    Some(_) => self.go_forward_one(),
                    None => {}
                }
            }
            match self.digit_value(prev_cp) {
                Some(value) => reversed.push(value),
                None => {
                    self.restore(&checkpoint);
                    break;
                }
            }
        }

        reversed.reverse();
        let ces = encode_digit_run(&reversed);
        self.buffer.fill_backward(&ces, self.position_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primaries(ces: &[u32]) -> Vec<u32> {
        ces.iter().map(|&ce| ce >> 16).collect()
    }

    #[test]
    fn magnitude_orders_before_digits() {
        // 2 < 10 < 99 < 100 numerically.
        let two = encode_digit_run(&[2]);
        let ten = encode_digit_run(&[1, 0]);
        let ninety_nine = encode_digit_run(&[9, 9]);
        let hundred = encode_digit_run(&[1, 0, 0]);
        let mut keys: Vec<Vec<u32>> = [&two, &ten, &ninety_nine, &hundred]
            .iter()
            .map(|ces| primaries(ces))
            .collect();
        let expected = keys.clone();
        keys.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn leading_zeros_do_not_matter() {
        assert_eq!(encode_digit_run(&[0, 0, 7]), encode_digit_run(&[7]));
        assert_eq!(encode_digit_run(&[0, 4, 2]), encode_digit_run(&[4, 2]));
    }

    #[test]
    fn all_zero_runs_collapse() {
        assert_eq!(encode_digit_run(&[0]), encode_digit_run(&[0, 0, 0]));
    }

    #[test]
    fn continuation_marking() {
        let ces = encode_digit_run(&[1, 2, 3, 4, 5]);
        assert!(ces.len() > 1);
        for &ce in ces.iter().skip(1) {
            assert!(elements::is_continuation(ce));
        }
        assert!(!elements::is_continuation(ces[0]));
    }
}
