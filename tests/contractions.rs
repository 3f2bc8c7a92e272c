// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

mod common;

use collation_elements::provider::builder::CollationDataBuilder;
use collation_elements::{
    CollationData, CollationElement, Collator, CollatorOptions, Tag,
};
use common::*;

const CH_PRIMARY: u16 = 0x2333; // between c and d

fn ch_ce() -> CollationElement {
    CollationElement::from_weights(CH_PRIMARY, 5, 5)
}

/// Tables with a "ch" contraction: 'c' alone keeps its letter CE.
fn ch_data() -> CollationData<'static> {
    let mut builder = base_builder();
    let entry = builder.contraction_entry(0, false, letter_ce('c'), &[('h' as u16, ch_ce())]);
    builder.map('c' as u32, CollationElement::special(Tag::Contraction, entry));
    builder.build().unwrap()
}

fn assert_symmetric(collator: &Collator, text: &[u16]) {
    let forward = collect_forward(&mut collator.collation_elements(text));
    let mut backward = collect_backward(&mut collator.collation_elements(text));
    backward.reverse();
    assert_eq!(forward, backward, "forward/backward disagree on {text:04X?}");
}

#[test]
fn greedy_longest_match() {
    let data = ch_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    // "cha" is ch + a, never c + h + a.
    let text = utf16("cha");
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&text)),
        vec![ch_ce().to_bits(), letter_ce('a').to_bits()]
    );
}

#[test]
fn failed_match_falls_back_without_losing_input() {
    let data = ch_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    for (text, expected) in [
        ("ca", vec![letter_ce('c').to_bits(), letter_ce('a').to_bits()]),
        ("c", vec![letter_ce('c').to_bits()]),
        ("ch", vec![ch_ce().to_bits()]),
        (
            "cc",
            vec![letter_ce('c').to_bits(), letter_ce('c').to_bits()],
        ),
    ] {
        let units = utf16(text);
        assert_eq!(
            collect_forward(&mut collator.collation_elements(&units)),
            expected,
            "wrong CEs for {text:?}"
        );
    }
}

#[test]
fn contraction_symmetry() {
    let data = ch_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    for text in ["cha", "ca", "ch", "achb", "chch", "hc"] {
        assert_symmetric(&collator, &utf16(text));
    }
}

#[test]
fn chained_contraction_longest_wins() {
    // "c" < "ch" < "chl": the two-level chain must resolve greedily and
    // fall back to the completed shorter match when the chain breaks.
    let chl = CollationElement::from_weights(0x2345, 5, 5);
    let mut builder = base_builder();
    let inner = builder.contraction_entry(0, false, ch_ce(), &[('l' as u16, chl)]);
    let entry = builder.contraction_entry(
        0,
        false,
        letter_ce('c'),
        &[(
            'h' as u16,
            CollationElement::special(Tag::Contraction, inner),
        )],
    );
    builder.map('c' as u32, CollationElement::special(Tag::Contraction, entry));
    let data = builder.build().unwrap();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());

    let chl_text = utf16("chl");
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&chl_text)),
        vec![chl.to_bits()]
    );
    let cha_text = utf16("cha");
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&cha_text)),
        vec![ch_ce().to_bits(), letter_ce('a').to_bits()]
    );
    let ca_text = utf16("ca");
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&ca_text)),
        vec![letter_ce('c').to_bits(), letter_ce('a').to_bits()]
    );
    for text in ["chl", "cha", "ca", "chc", "lchlc"] {
        assert_symmetric(&collator, &utf16(text));
    }
}

#[test]
fn discontiguous_contraction_keeps_skipped_mark() {
    // c + acute contracts; a dot-below (lower class) intervenes. The
    // contraction must still match and the dot-below must be emitted
    // afterwards with its own CE.
    let c_acute = CollationElement::from_weights(0x2360, 5, 5);
    let mut builder = base_builder();
    let entry = builder.contraction_entry(230, true, letter_ce('c'), &[(ACUTE, c_acute)]);
    builder.map('c' as u32, CollationElement::special(Tag::Contraction, entry));
    let data = builder.build().unwrap();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());

    let text: Vec<u16> = vec!['c' as u16, DOT_BELOW, ACUTE, 'x' as u16];
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&text)),
        vec![
            c_acute.to_bits(),
            mark_ce(DOT_BELOW).to_bits(),
            letter_ce('x').to_bits(),
        ]
    );
    assert_symmetric(&collator, &text);

    // The contiguous form matches directly.
    let contiguous: Vec<u16> = vec!['c' as u16, ACUTE, 'x' as u16];
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&contiguous)),
        vec![c_acute.to_bits(), letter_ce('x').to_bits()]
    );

    // A mark of the same class as the contraction mark blocks it.
    let blocked: Vec<u16> = vec!['c' as u16, MACRON, ACUTE, 'x' as u16];
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&blocked)),
        vec![
            letter_ce('c').to_bits(),
            mark_ce(MACRON).to_bits(),
            mark_ce(ACUTE).to_bits(),
            letter_ce('x').to_bits(),
        ]
    );
}

#[test]
fn special_prefix_consults_preceding_context() {
    // A long-vowel mark sorts as a lengthened 'k' only after 'k'.
    let long_k = CollationElement::from_weights(0x2155, 5, 5);
    let dash = CollationElement::from_weights(0x0402, 5, 5);
    let mut builder = base_builder();
    let entry = builder.prefix_entry(dash, &[('k' as u16, long_k)]);
    builder.map(0x30FC, CollationElement::special(Tag::SpecialPrefix, entry));
    let data = builder.build().unwrap();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());

    let after_k: Vec<u16> = vec!['k' as u16, 0x30FC];
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&after_k)),
        vec![letter_ce('k').to_bits(), long_k.to_bits()]
    );
    let after_a: Vec<u16> = vec!['a' as u16, 0x30FC];
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&after_a)),
        vec![letter_ce('a').to_bits(), dash.to_bits()]
    );
    let alone: Vec<u16> = vec![0x30FC];
    assert_eq!(
        collect_forward(&mut collator.collation_elements(&alone)),
        vec![dash.to_bits()]
    );
    assert_symmetric(&collator, &after_k);
    assert_symmetric(&collator, &after_a);
}

#[test]
fn set_offset_snaps_to_contraction_start() {
    let data = ch_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    let text = utf16("acha");
    let mut iter = collator.collation_elements(&text);
    // Offset 2 is the 'h' inside the "ch" contraction.
    iter.set_offset(2).unwrap();
    assert_eq!(iter.get_offset(), 1);
    assert_eq!(iter.next(), Some(ch_ce()));
}

#[test]
fn set_offset_on_safe_position_is_exact() {
    let data = ch_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    let text = utf16("acha");
    let mut iter = collator.collation_elements(&text);
    iter.set_offset(3).unwrap();
    assert_eq!(iter.get_offset(), 3);
    assert_eq!(iter.next(), Some(common::letter_ce('a')));
}

#[test]
fn set_offset_out_of_range_is_an_error_and_state_is_kept() {
    let data = ch_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    let text = utf16("ab");
    let mut iter = collator.collation_elements(&text);
    let first = iter.next();
    let offset = iter.get_offset();
    assert!(iter.set_offset(3).is_err());
    assert_eq!(iter.get_offset(), offset);
    // Iteration continues as if nothing happened.
    assert_ne!(iter.next(), first);
}

#[test]
fn set_exact_offset_does_not_snap() {
    let data = ch_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    let text = utf16("acha");
    let mut iter = collator.collation_elements(&text);
    iter.set_exact_offset(2).unwrap();
    assert_eq!(iter.get_offset(), 2);
}
