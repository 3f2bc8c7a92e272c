// This file is part of ICU4X. For terms of use, please see the file
// called LICENSE at the top level of the ICU4X source tree
// (online at: https://github.com/unicode-org/icu4x/blob/main/LICENSE ).

mod common;

use collation_elements::{Collator, CollatorOptions};
use common::*;

fn numeric_options() -> CollatorOptions {
    let mut options = CollatorOptions::default();
    options.numeric = true;
    options
}

/// Collects the primaries of the CE sequence, dropping zero primaries
/// the way primary-strength comparison does.
fn primary_key(collator: &Collator, text: &str) -> Vec<u32> {
    let units = utf16(text);
    collect_forward(&mut collator.collation_elements(&units))
        .into_iter()
        .map(|ce| ce >> 16)
        .filter(|&primary| primary != 0)
        .collect()
}

#[test]
fn numeric_mode_orders_by_magnitude() {
    let data = base_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, numeric_options());
    // a2 < a10 by magnitude.
    assert!(primary_key(&collator, "a2") < primary_key(&collator, "a10"));
    assert!(primary_key(&collator, "a9") < primary_key(&collator, "a10"));
    assert!(primary_key(&collator, "a99") < primary_key(&collator, "a100"));
    assert!(primary_key(&collator, "a100") < primary_key(&collator, "a101"));
    // Equal magnitudes compare equal regardless of leading zeros.
    assert_eq!(primary_key(&collator, "a007"), primary_key(&collator, "a7"));
}

#[test]
fn plain_mode_orders_digit_by_digit() {
    let data = base_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, CollatorOptions::default());
    // Lexicographic digit comparison: "a10" < "a2".
    assert!(primary_key(&collator, "a10") < primary_key(&collator, "a2"));
    assert!(primary_key(&collator, "a007") < primary_key(&collator, "a7"));
    // The plain digit CEs come from the non-numeric table entry.
    assert_eq!(
        primary_key(&collator, "a12"),
        vec![
            letter_primary('a') as u32,
            digit_plain_ce(1).primary(),
            digit_plain_ce(2).primary(),
        ]
    );
}

#[test]
fn digit_runs_are_direction_independent() {
    let data = base_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, numeric_options());
    for text in ["7", "42", "007", "12345", "a10b", "x900y", "0", "000"] {
        let units = utf16(text);
        let forward = collect_forward(&mut collator.collation_elements(&units));
        let mut backward = collect_backward(&mut collator.collation_elements(&units));
        backward.reverse();
        assert_eq!(forward, backward, "digit run asymmetry in {text:?}");
    }
}

#[test]
fn numeric_run_is_maximal() {
    let data = base_data();
    let norm = norm_data();
    let collator = Collator::new(&data, None, &norm, numeric_options());
    // "12" is one run (one header CE + continuations), not two runs.
    let one_run = utf16("12");
    let ces = collect_forward(&mut collator.collation_elements(&one_run));
    let headers = ces
        .iter()
        .filter(|&&ce| (ce >> 24) == 0x27)
        .count();
    assert_eq!(headers, 1);

    // A letter breaks the run.
    let two_runs = utf16("1a2");
    let ces = collect_forward(&mut collator.collation_elements(&two_runs));
    let headers = ces.iter().filter(|&&ce| (ce >> 24) == 0x27).count();
    assert_eq!(headers, 2);
}

#[test]
fn numeric_mode_only_affects_digits() {
    let data = base_data();
    let norm = norm_data();
    let plain = Collator::new(&data, None, &norm, CollatorOptions::default());
    let numeric = Collator::new(&data, None, &norm, numeric_options());
    assert_eq!(
        primary_key(&plain, "mark"),
        primary_key(&numeric, "mark")
    );
}
