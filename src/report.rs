//! Tab-separated layout report
//!
//! One row per node in canonical order, followed by the formula
//! annotations in construction order. Coordinates use two decimals.

use anyhow::{anyhow, Result};
use std::io::Write;

use crate::classify::categorize;
use crate::tree::CollatzTree;

const NODE_HEADER: &str = "#NODE\tLABEL\tX\tY\tCATEGORY\tSUCCESSOR\n";
const ANNOTATION_HEADER: &str = "#ANNOTATION\tX\tY\tTEXT\n";

/// Write the layout report for `tree`.
pub fn write_report<W: Write>(writer: &mut W, tree: &CollatzTree) -> Result<()> {
    let config = tree.config();
    writeln!(
        writer,
        "##collatz-tree max_k={} leg_depth={}",
        config.max_k(), config.leg_depth()
    )?;

    let context = tree.classification_context();
    writer.write_all(NODE_HEADER.as_bytes())?;
    for node in tree.nodes() {
        let position = tree
            .position(node)
            .ok_or_else(|| anyhow!("node {} has no position", node))?;
        let successor = tree
            .successor(node)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            writer,
            "{node}\t{label}\t{x:.2}\t{y:.2}\t{category}\t{successor}",
            label = tree.label(node).unwrap_or_default(),
            x = position.x,
            y = position.y,
            category = categorize(node, &context),
        )?;
    }

    writer.write_all(ANNOTATION_HEADER.as_bytes())?;
    for annotation in tree.formula_annotations() {
        writeln!(
            writer,
            "{:.2}\t{:.2}\t{}",
            annotation.x, annotation.y, annotation.text
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the report into a string (useful for tests and snapshots).
pub fn render_report(tree: &CollatzTree) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(&mut buffer, tree)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered report is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;

    #[test]
    fn test_report_sections() {
        let tree = generate(5, 3).expect("valid parameters");
        let report = render_report(&tree).expect("report renders");
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "##collatz-tree max_k=5 leg_depth=3");
        assert_eq!(lines[1], NODE_HEADER.trim_end());
        assert_eq!(lines.len(), 2 + tree.node_count() + 1 + tree.formula_annotations().len());
        assert!(report.contains("∞_main\t∞\t0.00\t12.00\tinfinity\t32\n"));
        assert!(report.ends_with("0.00\t12.40\t2^k\n"));
    }
}
