//! Fuzz target for VOC XML parsing and label rendering.
//!
//! Arbitrary bytes go through the VOC reader; whatever parses is converted
//! with the default class list and rendered as label text.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use voc2yolo::conversion::annotation_to_label_lines;
use voc2yolo::ir::io_voc_xml::from_voc_xml_slice;
use voc2yolo::ir::io_yolo::to_label_string;
use voc2yolo::ir::ClassRegistry;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(annotation) = from_voc_xml_slice(data) else {
        return;
    };
    assert!(annotation.width > 0 && annotation.height > 0);

    let registry = ClassRegistry::default();
    if let Ok((lines, _unknown)) =
        annotation_to_label_lines(&annotation, &registry, Path::new("<fuzz>"))
    {
        let text = to_label_string(&lines);
        assert_eq!(text.lines().count(), lines.len());
    }
});
