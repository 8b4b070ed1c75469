use crate::models::Table;

/// Render a table as a pipe-delimited markdown block.
///
/// The first row is treated as the header and followed by a `---` separator
/// with one cell per header column. The block starts and ends with a newline
/// so it can be appended to surrounding prose.
pub fn render_table(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    for (i, row) in table.rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|cell| clean_cell(cell)).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            let separator = vec!["---"; cells.len()];
            lines.push(format!("| {} |", separator.join(" | ")));
        }
    }
    format!("\n{}\n", lines.join("\n"))
}

fn clean_cell(cell: &str) -> String {
    cell.trim().replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn renders_header_separator_after_first_row() {
        let rendered = render_table(&table(&[&["Name", "Val"], &["X", "1"]]));
        let lines: Vec<&str> = rendered.trim().lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "| Name | Val |");
        assert_eq!(lines[1], "| --- | --- |");
        assert_eq!(lines[2], "| X | 1 |");
    }

    #[test]
    fn wraps_block_in_newlines() {
        let rendered = render_table(&table(&[&["A"]]));
        assert_eq!(rendered, "\n| A |\n| --- |\n");
    }

    #[test]
    fn collapses_newlines_inside_cells() {
        let rendered = render_table(&table(&[&["Limit", "Notes"], &[" 500 ", "per\nproperty"]]));
        insta::assert_snapshot!(rendered.trim(), @r"
        | Limit | Notes |
        | --- | --- |
        | 500 | per property |
        ");
    }

    #[test]
    fn empty_table_is_an_empty_wrapped_block() {
        assert_eq!(render_table(&Table::default()), "\n\n");
    }
}
