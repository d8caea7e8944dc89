//! Unlabeled, padded columns.

use std::io;

use serde_json::Value;

use crate::render::{visible_width, Writer};

/// Display text of a cell: strings as-is, everything else in JSON form.
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Rows of heterogeneous cells printed as aligned columns.
///
/// Each column is as wide as its widest cell, measured after markup is
/// stripped; the last column is never padded. Columns are separated by two
/// spaces and each row is written as `<value>` text.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use stdcli::layout::Columns;
/// use stdcli::render::{TagTable, Writer};
///
/// let (writer, out, _) = Writer::capture(TagTable::standard());
/// let mut columns = Columns::new(&writer);
/// columns.append(vec![json!("a"), json!("<id>1</id>")]);
/// columns.append(vec![json!("bbb"), json!(2)]);
/// columns.print().unwrap();
///
/// assert_eq!(out.contents(), "a    1\nbbb  2\n");
/// ```
#[derive(Debug)]
pub struct Columns<'w> {
    writer: &'w Writer,
    rows: Vec<Vec<Value>>,
}

impl<'w> Columns<'w> {
    pub fn new(writer: &'w Writer) -> Self {
        Self {
            writer,
            rows: Vec::new(),
        }
    }

    /// Append one row. Rows may have different lengths.
    pub fn append<I, V>(&mut self, row: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-column visible widths; the last entry is always `0`.
    pub fn widths(&self) -> Vec<usize> {
        column_widths(&self.rows)
    }

    /// Render every row into lines of markup, one per row.
    pub fn lines(&self) -> Vec<String> {
        let widths = self.widths();
        self.rows
            .iter()
            .map(|row| {
                let parts: Vec<String> = row
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        let text = cell_text(cell);
                        let width = widths.get(i).copied().unwrap_or(0);
                        pad(text, width)
                    })
                    .collect();
                parts.join("  ")
            })
            .collect()
    }

    /// Write all rows. Nothing is written when there are no rows.
    pub fn print(self) -> io::Result<()> {
        for line in self.lines() {
            self.writer.write(&format!("<value>{}</value>\n", line))?;
        }
        Ok(())
    }
}

fn column_widths(rows: &[Vec<Value>]) -> Vec<usize> {
    let count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; count];

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(visible_width(&cell_text(cell)));
        }
    }

    // No trailing whitespace after the last column.
    if let Some(last) = widths.last_mut() {
        *last = 0;
    }

    widths
}

/// Right-pad `text` with spaces to `width` visible columns, keeping markup.
pub(crate) fn pad(mut text: String, width: usize) -> String {
    let visible = visible_width(&text);
    if width > visible {
        text.push_str(&" ".repeat(width - visible));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TagTable;
    use serde_json::json;

    fn capture() -> (Writer, crate::render::Capture) {
        let (writer, out, _) = Writer::capture(TagTable::standard());
        (writer, out)
    }

    #[test]
    fn single_row() {
        let (w, out) = capture();
        let mut c = Columns::new(&w);
        c.append(["id-1", "name-1", "status-1"]);
        c.print().unwrap();
        assert_eq!(out.contents(), "id-1  name-1  status-1\n");
    }

    #[test]
    fn aligns_multiple_rows() {
        let (w, out) = capture();
        let mut c = Columns::new(&w);
        c.append(["a", "short", "x"]);
        c.append(["longer", "s", "y"]);
        c.print().unwrap();
        assert_eq!(out.contents(), "a       short  x\nlonger  s      y\n");
    }

    #[test]
    fn empty_prints_nothing() {
        let (w, out) = capture();
        let c = Columns::new(&w);
        assert!(c.is_empty());
        c.print().unwrap();
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn widths_use_stripped_length_and_zero_last() {
        let (w, _) = capture();
        let mut c = Columns::new(&w);
        c.append(vec![json!("<h1>abc</h1>"), json!("x"), json!("tail")]);
        c.append(vec![json!("ab"), json!("<id>wide-one</id>"), json!("t")]);
        assert_eq!(c.widths(), vec![3, 8, 0]);
    }

    #[test]
    fn column_count_is_longest_row() {
        let (w, out) = capture();
        let mut c = Columns::new(&w);
        c.append(["col1"]);
        c.append(["a", "col2", "col3"]);
        assert_eq!(c.widths(), vec![4, 4, 0]);
        c.print().unwrap();
        assert_eq!(out.contents(), "col1\na     col2  col3\n");
    }

    #[test]
    fn padding_keeps_markup() {
        let (w, _) = capture();
        let mut c = Columns::new(&w);
        c.append(["<id>1</id>", "x"]);
        c.append(["abc", "y"]);
        assert_eq!(c.lines(), vec!["<id>1</id>    x", "abc  y"]);
    }

    #[test]
    fn tagged_cells_render_aligned() {
        let (w, out) = capture();
        let mut c = Columns::new(&w);
        c.append(["<id>1</id>", "x"]);
        c.append(["abc", "y"]);
        c.print().unwrap();
        assert_eq!(out.contents(), "1    x\nabc  y\n");
    }

    #[test]
    fn native_values_display() {
        let (w, out) = capture();
        let mut c = Columns::new(&w);
        c.append(vec![json!(1), json!(true), json!(2.5)]);
        c.print().unwrap();
        assert_eq!(out.contents(), "1  true  2.5\n");
    }

    #[test]
    fn cell_text_forms() {
        assert_eq!(cell_text(&json!("s")), "s");
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&json!(false)), "false");
        assert_eq!(cell_text(&Value::Null), "");
    }
}
