//! Markdown export functionality

/// Render rows as a markdown table.
///
/// With a header, a `---` separator row follows the first row.
pub fn write_markdown(table: &[Vec<String>], has_header: bool) -> String {
    let mut lines = Vec::with_capacity(table.len() + 1);
    for (row_idx, row) in table.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|c| escape_markdown(c)).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
        if row_idx == 0 && has_header {
            let separators = vec!["---"; row.len().max(1)];
            lines.push(format!("| {} |", separators.join(" | ")));
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_write_markdown_with_header() {
        let t = table(&[&["Item", "Total"], &["Apple", "500"]]);
        assert_eq!(
            write_markdown(&t, true),
            "| Item | Total |\n| --- | --- |\n| Apple | 500 |\n"
        );
    }

    #[test]
    fn test_write_markdown_without_header() {
        let t = table(&[&["Apple", "500"]]);
        assert_eq!(write_markdown(&t, false), "| Apple | 500 |\n");
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a|b"), "a\\|b");
    }
}
