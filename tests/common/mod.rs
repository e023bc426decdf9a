#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// A VOC object as `(name, [xmin, ymin, xmax, ymax])`.
pub type VocObj<'a> = (&'a str, [f64; 4]);

pub fn voc_xml(width: u32, height: u32, objects: &[VocObj<'_>]) -> String {
    let mut xml = String::new();
    writeln!(xml, "<?xml version=\"1.0\" encoding=\"utf-8\"?>").unwrap();
    writeln!(xml, "<annotation>").unwrap();
    writeln!(xml, "  <folder>images</folder>").unwrap();
    writeln!(xml, "  <size>").unwrap();
    writeln!(xml, "    <width>{width}</width>").unwrap();
    writeln!(xml, "    <height>{height}</height>").unwrap();
    writeln!(xml, "    <depth>3</depth>").unwrap();
    writeln!(xml, "  </size>").unwrap();
    for (name, [xmin, ymin, xmax, ymax]) in objects {
        writeln!(xml, "  <object>").unwrap();
        writeln!(xml, "    <name>{name}</name>").unwrap();
        writeln!(xml, "    <bndbox>").unwrap();
        writeln!(xml, "      <xmin>{xmin}</xmin>").unwrap();
        writeln!(xml, "      <ymin>{ymin}</ymin>").unwrap();
        writeln!(xml, "      <xmax>{xmax}</xmax>").unwrap();
        writeln!(xml, "      <ymax>{ymax}</ymax>").unwrap();
        writeln!(xml, "    </bndbox>").unwrap();
        writeln!(xml, "  </object>").unwrap();
    }
    writeln!(xml, "</annotation>").unwrap();
    xml
}

pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write file");
}

/// Lays out `<root>/images/<stem>.jpg` and `<root>/labels/<stem>.txt` for
/// each stem. Image bytes are a marker string; nothing decodes them.
pub fn write_raw_dataset(root: &Path, stems: &[String]) {
    fs::create_dir_all(root.join("images")).expect("create images dir");
    fs::create_dir_all(root.join("labels")).expect("create labels dir");
    for stem in stems {
        write_file(
            &root.join("images").join(format!("{stem}.jpg")),
            format!("jpeg:{stem}"),
        );
        write_file(
            &root.join("labels").join(format!("{stem}.txt")),
            format!("0 0.5 0.5 0.1 0.1 # {stem}\n"),
        );
    }
}

pub fn stems(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("field_{i:03}")).collect()
}

/// Sorted file names directly inside `dir` (empty if it does not exist).
pub fn list_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
