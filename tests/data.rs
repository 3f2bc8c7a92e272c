// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

mod common;

use collation_elements::provider::builder::CollationDataBuilder;
use collation_elements::{
    CollationDataError, CollationElement, Collator, CollatorOptions, Tag,
};
use common::*;

#[test]
fn weight_fields_round_trip_over_random_values() {
    // Deterministic pseudo-random sweep over non-special bit patterns.
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    for _ in 0..10_000 {
        // xorshift*
        state ^= state >> 12;
        state ^= state << 25;
        state ^= state >> 27;
        let bits = (state.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32;
        let primary = ((bits >> 16) as u16) & 0xEFFF; // keep below the special pattern
        let secondary = (bits >> 8) as u8;
        let tertiary = bits as u8;
        let ce = CollationElement::from_weights(primary, secondary, tertiary);
        assert_eq!(ce.primary(), primary as u32);
        assert_eq!(ce.secondary(), secondary as u32);
        assert_eq!(ce.tertiary(), tertiary as u32);
    }
}

#[test]
fn lookup_returns_mapped_and_unmapped() {
    let data = base_data();
    assert_eq!(data.lookup('a' as u32), letter_ce('a'));
    // Unmapped code points are not directly usable CEs; the iterator
    // resolves them through the fallback chain instead.
    let unmapped = data.lookup(0x2603);
    assert_ne!(unmapped, letter_ce('a'));
}

#[test]
fn max_expansion_reports_registered_sizes() {
    let mut builder = base_builder();
    let last = CollationElement::from_weights(0x5005, 5, 5);
    builder.map_expansion(
        0x1F0A1,
        &[
            CollationElement::from_weights(0x5001, 5, 5),
            CollationElement::from_weights(0x5003, 5, 5),
            last,
        ],
    );
    let data = builder.build().unwrap();
    assert_eq!(data.max_expansion(last), 3);
    assert_eq!(
        data.max_expansion(CollationElement::from_weights(0x5001, 5, 5)),
        1
    );
}

#[test]
fn reserved_tag_bits_are_rejected() {
    let mut builder = CollationDataBuilder::new();
    builder.map('x' as u32, CollationElement::from_bits(0xF300_0000));
    assert_eq!(
        builder.build().unwrap_err(),
        CollationDataError::ReservedTag { bits: 3 }
    );
}

#[test]
fn dangling_expansion_offset_is_rejected() {
    let mut builder = CollationDataBuilder::new();
    // Offset 0x40 with a count of 2, but the expansion table is empty.
    builder.map(
        'x' as u32,
        CollationElement::special(Tag::Expansion, (0x40 << 4) | 2),
    );
    assert!(matches!(
        builder.build().unwrap_err(),
        CollationDataError::ExpansionOffsetOutOfRange { .. }
    ));
}

#[test]
fn dangling_contraction_offset_is_rejected() {
    let mut builder = CollationDataBuilder::new();
    builder.map(
        'x' as u32,
        CollationElement::special(Tag::Contraction, 17),
    );
    assert!(matches!(
        builder.build().unwrap_err(),
        CollationDataError::ContractionOffsetOutOfRange { .. }
    ));
}

#[test]
fn ignorable_elements_are_returned_not_skipped() {
    let mut builder = base_builder();
    builder.map(0x00AD, CollationElement::IGNORABLE); // soft hyphen
    let data = builder.build().unwrap();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    let text = utf16("a\u{AD}b");
    let ces = collect_forward(&mut collator.collation_elements(&text));
    assert_eq!(
        ces,
        vec![
            letter_ce('a').to_bits(),
            0,
            letter_ce('b').to_bits(),
        ]
    );
}

#[test]
fn tailoring_falls_back_to_root() {
    // A tailoring that only reorders 'b'; everything else resolves
    // through the root.
    let mut tailoring_builder = CollationDataBuilder::new();
    tailoring_builder.map('b' as u32, CollationElement::from_weights(0x2FFF, 5, 5));
    let tailoring = tailoring_builder.build().unwrap();
    let root = base_data();
    let norm = norm_data();
    let collator = Collator::new(&tailoring, Some(&root), &norm, CollatorOptions::default());
    let text = utf16("ab");
    let ces = collect_forward(&mut collator.collation_elements(&text));
    assert_eq!(
        ces,
        vec![letter_ce('a').to_bits(), 0x2FFF_0505]
    );
}

#[test]
fn root_contractions_apply_under_a_tailoring() {
    let mut root_builder = base_builder();
    let ch = CollationElement::from_weights(0x2333, 5, 5);
    let entry = root_builder.contraction_entry(0, false, letter_ce('c'), &[('h' as u16, ch)]);
    root_builder.map('c' as u32, CollationElement::special(Tag::Contraction, entry));
    let root = root_builder.build().unwrap();
    let tailoring = CollationDataBuilder::new().build().unwrap();
    let norm = norm_data();
    let collator = Collator::new(&tailoring, Some(&root), &norm, CollatorOptions::default());

    let text = utf16("cha");
    let forward = collect_forward(&mut collator.collation_elements(&text));
    assert_eq!(forward, vec![ch.to_bits(), letter_ce('a').to_bits()]);
    let mut backward = collect_backward(&mut collator.collation_elements(&text));
    backward.reverse();
    assert_eq!(forward, backward);
}
