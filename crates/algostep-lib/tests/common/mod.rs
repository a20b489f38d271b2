#![allow(dead_code)]

use std::path::PathBuf;

use algostep_lib::Grid;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn load_map(name: &str) -> Grid {
    let path = fixtures_dir().join(name);
    let text = std::fs::read_to_string(&path).expect("fixture map readable");
    Grid::parse(&text).expect("fixture map parses")
}
