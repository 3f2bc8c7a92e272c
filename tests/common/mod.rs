// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

//! Shared table factory for the integration tests: a small root-like
//! table set with Latin letters, digits, combining marks, jamo and the
//! fixed special ranges, plus the normalization data the marks need.

#![allow(dead_code)] // each test binary uses its own subset

use collation_elements::provider::builder::{CollationDataBuilder, NormalizationDataBuilder};
use collation_elements::{CollationData, CollationElement, CollationElements, NormalizationData};

pub const ACUTE: u16 = 0x0301; // ccc 230
pub const MACRON: u16 = 0x0304; // ccc 230
pub const DIAERESIS: u16 = 0x0308; // ccc 230
pub const DOT_BELOW: u16 = 0x0323; // ccc 220
pub const CEDILLA: u16 = 0x0327; // ccc 202

pub fn letter_primary(c: char) -> u16 {
    0x2000 + (c as u16 - 'a' as u16) * 0x20
}

pub fn letter_ce(c: char) -> CollationElement {
    CollationElement::from_weights(letter_primary(c), 5, 5)
}

pub fn digit_plain_ce(value: u8) -> CollationElement {
    CollationElement::from_weights(0x1900 + value as u16 * 0x10, 5, 5)
}

pub fn mark_ce(mark: u16) -> CollationElement {
    // Marks weigh on the secondary level only.
    CollationElement::from_weights(0, 0x30 + (mark & 0x3F) as u8, 5)
}

/// A builder pre-loaded with the baseline mappings every test shares.
pub fn base_builder() -> CollationDataBuilder {
    let mut builder = CollationDataBuilder::new();
    for c in 'a'..='z' {
        builder.map(c as u32, letter_ce(c));
    }
    builder.map(' ' as u32, CollationElement::from_weights(0x0209, 5, 5));
    for value in 0u8..10 {
        builder.map_digit('0' as u32 + value as u32, value, digit_plain_ce(value));
    }
    for mark in [ACUTE, MACRON, DIAERESIS, DOT_BELOW, CEDILLA] {
        builder.map(mark as u32, mark_ce(mark));
        // Combining marks are never safe positions; the tailoring
        // compiler derives this from the normalization data.
        builder.add_unsafe(mark as u32);
    }
    for (i, lead) in (0x1100u32..=0x1112).enumerate() {
        builder.map(lead, CollationElement::from_weights(0x3000 + i as u16 * 8, 5, 5));
    }
    for (i, vowel) in (0x1161u32..=0x1175).enumerate() {
        builder.map(vowel, CollationElement::from_weights(0x3400 + i as u16 * 8, 5, 5));
    }
    for (i, trail) in (0x11A8u32..=0x11C2).enumerate() {
        builder.map(trail, CollationElement::from_weights(0x3800 + i as u16 * 8, 5, 5));
    }
    builder.tag_special_ranges();
    builder
}

pub fn base_data() -> CollationData<'static> {
    base_builder().build().expect("baseline tables are valid")
}

pub fn norm_data() -> NormalizationData<'static> {
    let mut builder = NormalizationDataBuilder::new();
    builder.set_ccc(ACUTE as u32, 230);
    builder.set_ccc(MACRON as u32, 230);
    builder.set_ccc(DIAERESIS as u32, 230);
    builder.set_ccc(DOT_BELOW as u32, 220);
    builder.set_ccc(CEDILLA as u32, 202);
    // Full canonical decompositions of the precomposed letters the
    // tests use.
    builder.set_decomposition(0xE4, &[0x61, DIAERESIS as u32]); // ä
    builder.set_decomposition(0xE9, &[0x65, ACUTE as u32]); // é
    builder.build()
}

pub fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

pub fn collect_forward(iter: &mut CollationElements) -> Vec<u32> {
    let mut ces = Vec::new();
    while let Some(ce) = iter.next() {
        ces.push(ce.to_bits());
    }
    ces
}

pub fn collect_backward(iter: &mut CollationElements) -> Vec<u32> {
    let mut ces = Vec::new();
    while let Some(ce) = iter.previous() {
        ces.push(ce.to_bits());
    }
    ces
}
