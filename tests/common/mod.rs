use std::fs;
use std::path::PathBuf;

use collatz_tree::report::render_report;
use collatz_tree::{generate, CollatzTree};

/// Set to rewrite the stored reports from the current output.
const REGENERATE_VAR: &str = "COLLATZ_UPDATE_SNAPSHOTS";

#[allow(dead_code)]
pub fn tree(max_k: u32, leg_depth: u32) -> CollatzTree {
    generate(max_k, leg_depth).expect("valid parameters")
}

/// Render `tree` and compare it with `tests/snapshots/<fixture>` row by row.
#[allow(dead_code)]
pub fn assert_report_matches(fixture: &str, tree: &CollatzTree) {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "snapshots", fixture]
        .iter()
        .collect();
    let rendered = render_report(tree).expect("report renders");

    if std::env::var_os(REGENERATE_VAR).is_some() {
        fs::write(&path, &rendered).expect("write stored report");
        return;
    }

    let stored = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read {}: {}", path.display(), err));
    let stored_rows: Vec<&str> = stored.lines().map(|l| l.trim_end_matches('\r')).collect();
    let rendered_rows: Vec<&str> = rendered.lines().collect();

    for (index, (want, got)) in stored_rows.iter().zip(&rendered_rows).enumerate() {
        assert_eq!(
            want,
            got,
            "{} differs at row {} (set {}=1 to regenerate)",
            fixture,
            index + 1,
            REGENERATE_VAR
        );
    }
    assert_eq!(
        stored_rows.len(),
        rendered_rows.len(),
        "{} has {} rows, rendered report has {}",
        fixture,
        stored_rows.len(),
        rendered_rows.len()
    );
}
