//! Structural tests for architectural boundary enforcement.
//!
//! The domain layer stays free of I/O, and application services reach the
//! platform only through ports.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// `use` lines of a file, comments excluded.
fn use_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("use ") || l.starts_with("pub use "))
        .map(String::from)
        .collect()
}

fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer);
    let mut found = Vec::new();
    for file in collect_rs_files(&root) {
        for line in use_lines(&file) {
            if forbidden.iter().any(|f| line.contains(f)) {
                found.push(format!("{}: {line}", file.display()));
            }
        }
    }
    found
}

#[test]
fn test_domain_has_no_io_dependencies() {
    let found = violations(
        "domain",
        &["crate::application", "crate::infra", "crate::commands", "tokio", "ureq", "std::fs", "std::process"],
    );
    assert!(found.is_empty(), "domain imports I/O layers:\n{}", found.join("\n"));
}

#[test]
fn test_application_does_not_import_infra() {
    let found = violations("application", &["crate::infra", "crate::commands", "ureq", "tokio"]);
    assert!(found.is_empty(), "application imports infra:\n{}", found.join("\n"));
}
