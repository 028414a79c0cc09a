//! Property-based tests for name standardization, similarity, and tables.
//!
//! Run with: cargo test -p rig-naming -- proptest

use proptest::prelude::*;
use rig_naming::{
    expand_pattern, similarity_ratio, standardize_name, AliasSlot, BoneTable, Side,
};

// =============================================================================
// Strategies
// =============================================================================

/// A raw bone name: alphanumerics plus the separators standardization handles.
fn arb_raw_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-]{0,24}").expect("valid regex")
}

/// A name safe for table data: non-empty, no placeholders, no prefix magic.
fn arb_table_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][A-Za-z0-9_ ]{0,15}").expect("valid regex")
}

fn arb_slot() -> impl Strategy<Value = AliasSlot> {
    (
        arb_table_name(),
        prop::collection::vec(arb_table_name(), 0..4),
    )
        .prop_map(|(canonical, aliases)| AliasSlot::new(canonical, aliases))
}

fn arb_table() -> impl Strategy<Value = BoneTable> {
    (
        prop::collection::vec(arb_slot(), 0..6),
        prop::collection::vec(arb_table_name(), 0..4),
        prop::collection::vec(arb_table_name(), 0..4),
    )
        .prop_map(|(mut slots, junk, keep)| {
            // Deduplicate canonicals so the table validates.
            let mut seen = std::collections::HashSet::new();
            slots.retain(|s| seen.insert(s.canonical.clone()));
            BoneTable {
                slots,
                junk,
                keep,
                ..BoneTable::default()
            }
        })
}

// =============================================================================
// Property Tests: Similarity
// =============================================================================

proptest! {
    /// The ratio always lands in the unit interval.
    #[test]
    fn ratio_is_bounded(a in arb_raw_name(), b in arb_raw_name()) {
        let ratio = similarity_ratio(&a, &b);
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    /// Every string is identical to itself.
    #[test]
    fn ratio_of_self_is_one(a in arb_raw_name()) {
        prop_assert_eq!(similarity_ratio(&a, &a), 1.0);
    }

    /// Strings with no character in common never match at all.
    #[test]
    fn disjoint_alphabets_score_zero(a in "[a-m]{1,12}", b in "[n-z]{1,12}") {
        prop_assert_eq!(similarity_ratio(&a, &b), 0.0);
    }
}

// =============================================================================
// Property Tests: Standardization
// =============================================================================

proptest! {
    /// Standardized names carry no dashes.
    #[test]
    fn standardize_removes_dashes(raw in arb_raw_name()) {
        prop_assert!(!standardize_name(&raw).contains('-'));
    }

    /// Every character after a separator is uppercased.
    #[test]
    fn standardize_uppercases_after_boundaries(raw in arb_raw_name()) {
        let name = standardize_name(&raw);
        let mut boundary = true;
        for ch in name.chars() {
            if boundary {
                prop_assert!(!ch.is_ascii_lowercase(), "lowercase {ch:?} after boundary in {name:?}");
            }
            boundary = ch == ' ' || ch == '_';
        }
    }

    /// Standardization is stable once applied, for names without the
    /// stripped vendor prefix.
    #[test]
    fn standardize_is_idempotent(raw in "[A-Za-z][A-Za-z0-9 _\\-]{0,20}") {
        prop_assume!(!raw.to_lowercase().contains("valvebiped"));
        let once = standardize_name(&raw);
        prop_assert_eq!(standardize_name(&once), once.clone());
    }
}

// =============================================================================
// Property Tests: Pattern expansion
// =============================================================================

proptest! {
    /// Expanded patterns never leak a placeholder backslash.
    #[test]
    fn expansion_resolves_all_placeholders(
        stem in "[A-Za-z]{1,8}",
        form in prop::sample::select(vec![
            r"\Left {}", r"{}_\L", r"\L_{}", r"{}",
        ]),
    ) {
        let pattern = form.replace("{}", &stem);
        for (_, expanded) in expand_pattern(&pattern) {
            prop_assert!(!expanded.contains('\\'), "{expanded:?}");
        }
    }

    /// Sided patterns expand to exactly left-then-right.
    #[test]
    fn sided_expansion_orders_left_first(stem in "[A-Za-z]{1,8}") {
        let expanded = expand_pattern(&format!(r"{stem}_\L"));
        prop_assert_eq!(expanded.len(), 2);
        prop_assert_eq!(expanded[0].0, Some(Side::Left));
        prop_assert_eq!(expanded[1].0, Some(Side::Right));
    }
}

// =============================================================================
// Property Tests: Table round trip
// =============================================================================

proptest! {
    /// Any valid table survives JSON serialization unchanged.
    #[test]
    fn table_json_round_trip(table in arb_table()) {
        prop_assume!(table.validate().is_ok());
        let json = table.to_json_string().expect("serialize");
        let back = BoneTable::from_json_str(&json).expect("parse");
        prop_assert_eq!(back, table);
    }

    /// Matching never panics, whatever the input name.
    #[test]
    fn match_name_never_panics(table in arb_table(), name in arb_raw_name()) {
        let _ = table.match_name(&name);
    }
}

// =============================================================================
// Built-in table spot checks
// =============================================================================

#[test]
fn builtin_matches_standardized_mmd_names() {
    let table = BoneTable::builtin();
    for (raw, canonical) in [
        ("下半身", None),
        ("lower body", Some("Hips")),
        ("upper body", Some("Spine")),
        ("shoulder_l", Some("Left shoulder")),
        ("ValveBiped_Bip01_R_Calf", Some("Right knee")),
    ] {
        let name = standardize_name(raw);
        let got = table.match_name(&name).map(|m| m.canonical);
        assert_eq!(got.as_deref(), canonical, "raw {raw:?} -> {name:?}");
    }
}
