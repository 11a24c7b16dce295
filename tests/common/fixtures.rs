use modsum_codec::write_summary;
use modsum_core::ModuleSummaryIndex;
use modsum_indexer::{build_module_summary, ModuleFacts};
use std::fs;
use std::path::{Path, PathBuf};

/// Get path to a facts file in tests/fixtures/
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.facts.json", name))
}

/// Load and parse a facts file from tests/fixtures/
pub fn load_facts(name: &str) -> ModuleFacts {
    let json = fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|err| panic!("Failed to load fixture {}: {}", name, err));
    ModuleFacts::from_json(&json)
        .unwrap_or_else(|err| panic!("Failed to parse fixture {}: {}", name, err))
}

/// Index a fixture module
pub fn index_fixture(name: &str) -> ModuleSummaryIndex {
    build_module_summary(&load_facts(name))
        .unwrap_or_else(|err| panic!("Failed to index fixture {}: {}", name, err))
}

/// Index a fixture module and write its summary into `dir`
pub fn write_fixture_summary(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(format!("{}.summary", name));
    write_summary(&index_fixture(name), &path).expect("Failed to write summary");
    path
}
