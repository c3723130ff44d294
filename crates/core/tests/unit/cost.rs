//! Cost Model and Aggregation Tests.
//!
//! Verifies cost-entry resolution (positional and named forms, the write
//! energy default, rejected values) and the per-level time/energy arithmetic
//! of the aggregator, including the DRAM multiplier and per-pixel
//! normalization.

use pretty_assertions::assert_eq;
use rstest::rstest;
use warpcache_core::common::CostModelError;
use warpcache_core::cost::{AccessCost, CostModel, RawAccessCost, aggregate};
use warpcache_core::stats::LevelStats;

const EPS: f64 = 1e-9;

fn stats(name: &str, load_hits: u64, load_misses: u64, store_hits: u64, store_misses: u64) -> LevelStats {
    LevelStats {
        name: name.to_string(),
        load_hits,
        load_misses,
        store_hits,
        store_misses,
    }
}

// ══════════════════════════════════════════════════════════
// 1. Resolution
// ══════════════════════════════════════════════════════════

#[test]
fn positional_and_named_forms_agree() {
    let model = CostModel::from_json(
        r#"{
            "levels": [
                [1.0, 2.0, 3.0],
                { "access_time_ns": 1.0, "read_energy_nj": 2.0, "write_energy_nj": 3.0 },
                { "access_time": 1.0, "read_energy": 2.0, "write_energy": 3.0 }
            ],
            "dram": [50.0, 25.0, 30.0]
        }"#,
    )
    .unwrap();
    let expected = AccessCost::new(1.0, 2.0, 3.0);
    assert_eq!(model.levels, vec![expected; 3]);
    assert_eq!(model.dram, AccessCost::new(50.0, 25.0, 30.0));
}

/// Omitted write energy resolves to zero rather than failing.
#[rstest]
#[case(RawAccessCost::Values(vec![1.0, 2.0]))]
#[case(RawAccessCost::Fields { access_time_ns: Some(1.0), read_energy_nj: Some(2.0), write_energy_nj: None })]
fn missing_write_energy_defaults_to_zero(#[case] raw: RawAccessCost) {
    assert_eq!(raw.resolve("L1"), Ok(AccessCost::new(1.0, 2.0, 0.0)));
}

#[rstest]
#[case::no_time(
    r#"{ "levels": [{ "read_energy": 1.0 }], "dram": [1.0, 1.0] }"#,
    CostModelError::MissingValue { entry: "L1".to_string(), field: "access_time_ns" }
)]
#[case::no_read(
    r#"{ "levels": [[1.0, 1.0]], "dram": { "access_time": 1.0 } }"#,
    CostModelError::MissingValue { entry: "DRAM".to_string(), field: "read_energy_nj" }
)]
#[case::one_value(
    r#"{ "levels": [[1.0, 1.0], [1.0]], "dram": [1.0, 1.0] }"#,
    CostModelError::BadArity { entry: "L2".to_string(), len: 1 }
)]
#[case::four_values(
    r#"{ "levels": [[1.0, 1.0, 1.0, 1.0]], "dram": [1.0, 1.0] }"#,
    CostModelError::BadArity { entry: "L1".to_string(), len: 4 }
)]
#[case::negative(
    r#"{ "levels": [[1.0, -0.5, 1.0]], "dram": [1.0, 1.0] }"#,
    CostModelError::InvalidValue { entry: "L1".to_string(), field: "read_energy_nj", value: -0.5 }
)]
fn rejects_invalid_entries(#[case] json: &str, #[case] expected: CostModelError) {
    assert_eq!(CostModel::from_json(json), Err(expected));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        CostModel::from_json("{ levels: }"),
        Err(CostModelError::Parse(_))
    ));
    assert!(matches!(
        CostModel::from_json(r#"{ "levels": [] }"#),
        Err(CostModelError::Parse(_))
    ));
}

#[test]
fn level_count_checked() {
    let model = CostModel::new(vec![AccessCost::new(1.0, 1.0, 1.0)], AccessCost::new(1.0, 1.0, 1.0));
    assert_eq!(model.check_levels(1), Ok(()));
    assert_eq!(
        model.check_levels(2),
        Err(CostModelError::LevelCountMismatch {
            expected: 2,
            got: 1,
        })
    );
}

#[test]
fn scaled_dram_leaves_levels_alone() {
    let model = CostModel::new(vec![AccessCost::new(1.0, 2.0, 3.0)], AccessCost::new(10.0, 20.0, 30.0));
    let scaled = model.scaled_dram(2.0);
    assert_eq!(scaled.levels, model.levels);
    assert_eq!(scaled.dram, AccessCost::new(20.0, 40.0, 60.0));
}

// ══════════════════════════════════════════════════════════
// 2. Aggregation
// ══════════════════════════════════════════════════════════

fn reference_model() -> CostModel {
    CostModel::new(
        vec![AccessCost::new(1.0, 2.0, 0.0), AccessCost::new(5.0, 3.0, 0.0)],
        AccessCost::new(50.0, 25.0, 0.0),
    )
}

/// 100 L1 loads, 10 L2 loads, 2 DRAM loads over 16 pixels:
/// time 100 + 50 + 100 = 250 ns, energy 200 + 30 + 50 = 280 nJ.
#[test]
fn aggregates_reference_counts() {
    let levels = [stats("L1", 90, 10, 0, 0), stats("L2", 8, 2, 0, 0)];
    let dram = stats("DRAM", 2, 0, 0, 0);
    let m = aggregate(&levels, &dram, &reference_model(), 1.0, 16).unwrap();

    assert!((m.total_time_ns - 250.0).abs() < EPS);
    assert!((m.total_energy_nj - 280.0).abs() < EPS);
    assert!((m.time_per_pixel_ns - 15.625).abs() < EPS);
    assert!((m.energy_per_pixel_nj - 17.5).abs() < EPS);

    let names: Vec<&str> = m.breakdown.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["L1", "L2", "DRAM"]);
    assert!((m.breakdown[2].time_ns - 100.0).abs() < EPS);
}

#[test]
fn dram_multiplier_scales_only_dram() {
    let levels = [stats("L1", 90, 10, 0, 0), stats("L2", 8, 2, 0, 0)];
    let dram = stats("DRAM", 2, 0, 0, 0);
    let m = aggregate(&levels, &dram, &reference_model(), 2.0, 16).unwrap();
    assert!((m.total_time_ns - 350.0).abs() < EPS);
    assert!((m.total_energy_nj - 330.0).abs() < EPS);
    assert!((m.breakdown[0].time_ns - 100.0).abs() < EPS);
}

/// Stores are charged write energy, loads read energy; both pay access time.
#[test]
fn stores_use_write_energy() {
    let model = CostModel::new(vec![AccessCost::new(1.0, 2.0, 7.0)], AccessCost::new(0.0, 0.0, 0.0));
    let levels = [stats("L1", 3, 1, 4, 2)];
    let dram = stats("DRAM", 1, 0, 2, 0);
    let m = aggregate(&levels, &dram, &model, 1.0, 10).unwrap();
    assert!((m.total_time_ns - 10.0).abs() < EPS);
    assert!((m.total_energy_nj - (4.0 * 2.0 + 6.0 * 7.0)).abs() < EPS);
}

#[test]
fn zero_pixels_yield_zero_per_pixel() {
    let model = CostModel::new(vec![AccessCost::new(1.0, 1.0, 1.0)], AccessCost::new(1.0, 1.0, 1.0));
    let m = aggregate(&[stats("L1", 1, 0, 0, 0)], &LevelStats::new("DRAM"), &model, 1.0, 0).unwrap();
    assert_eq!(m.time_per_pixel_ns, 0.0);
    assert_eq!(m.energy_per_pixel_nj, 0.0);
    assert!((m.total_time_ns - 1.0).abs() < EPS);
}

#[test]
fn mismatched_level_count_rejected() {
    let levels = [stats("L1", 1, 0, 0, 0)];
    let result = aggregate(&levels, &LevelStats::new("DRAM"), &reference_model(), 1.0, 1);
    assert_eq!(
        result,
        Err(CostModelError::LevelCountMismatch {
            expected: 1,
            got: 2,
        })
    );
}
