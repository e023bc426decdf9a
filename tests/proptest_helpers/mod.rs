#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// An image size together with an integer-pixel box lying inside it,
/// as `(width, height, [xmin, ymin, xmax, ymax])`.
pub fn arb_sized_box() -> impl Strategy<Value = (u32, u32, [f64; 4])> {
    (1u32..=4096, 1u32..=4096).prop_flat_map(|(width, height)| {
        (0..=width, 0..=width, 0..=height, 0..=height).prop_map(move |(x1, x2, y1, y2)| {
            let bbox = [
                x1.min(x2) as f64,
                y1.min(y2) as f64,
                x1.max(x2) as f64,
                y1.max(y2) as f64,
            ];
            (width, height, bbox)
        })
    })
}

/// Valid (train, val, test) ratios: val and test in [0.01, 0.45].
pub fn arb_ratios() -> impl Strategy<Value = (f64, f64, f64)> {
    (1u32..=45, 1u32..=45).prop_map(|(val, test)| {
        let val = val as f64 / 100.0;
        let test = test as f64 / 100.0;
        (1.0 - val - test, val, test)
    })
}
