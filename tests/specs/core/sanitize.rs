// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invariant 8 and the sanitize property test (§8).

use adb_core::sanitize;
use proptest::prelude::*;

#[test]
fn sanitize_is_idempotent_on_fixed_examples() {
    for input in ["Team_One", "org-ACME.corp", "weird!!chars//", ""] {
        let once = sanitize(input);
        let twice = sanitize(&once);
        assert_eq!(once, twice);
    }
}

proptest! {
    #[test]
    fn sanitize_round_trips_into_the_safe_alphabet(s in ".{0,64}") {
        let once = sanitize(&s);
        let twice = sanitize(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-'));
    }

    #[test]
    fn sanitize_never_empties_a_nonempty_input(s in ".{1,64}") {
        prop_assert!(!sanitize(&s).is_empty());
    }
}
