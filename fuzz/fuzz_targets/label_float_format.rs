//! Fuzz target for label float formatting.
//!
//! Every finite value must format to a string that parses back to the same
//! bits.

#![no_main]

use libfuzzer_sys::fuzz_target;
use voc2yolo::ir::io_yolo::format_label_float;

fuzz_target!(|bits: u64| {
    let value = f64::from_bits(bits);
    let text = format_label_float(value);

    if value.is_finite() {
        let parsed: f64 = text.parse().expect("formatted float parses");
        assert_eq!(parsed.to_bits(), value.to_bits());
    } else {
        assert!(matches!(text.as_str(), "nan" | "inf" | "-inf"));
    }
});
