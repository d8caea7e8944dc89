//! Tables with a header row and a JSON mode.

use std::io;

use serde_json::{Map, Value};

use crate::render::{strip_tags, Writer};

use super::columns::Columns;
use super::format::OutputFormat;

/// Named columns plus rows, printed as padded text or as a JSON array.
///
/// In text mode the header cells are wrapped in `<h1>` and the whole table
/// goes through [`Columns`]. In JSON mode each row becomes an object keyed by
/// the lower-cased column names, keeping numbers and booleans native.
#[derive(Debug)]
pub struct Table<'w> {
    writer: &'w Writer,
    format: OutputFormat,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl<'w> Table<'w> {
    pub fn new<I, S>(writer: &'w Writer, format: OutputFormat, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            writer,
            format,
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

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

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write the table in its output format.
    pub fn print(self) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.print_json(),
            OutputFormat::Text => self.print_text(),
        }
    }

    fn print_text(self) -> io::Result<()> {
        let mut columns = Columns::new(self.writer);
        columns.append(self.columns.iter().map(|c| format!("<h1>{}</h1>", c)));
        for row in self.rows {
            columns.append(row);
        }
        columns.print()
    }

    /// The JSON document printed in JSON mode.
    pub fn to_json(&self) -> Value {
        let keys: Vec<String> = self.columns.iter().map(|c| c.to_lowercase()).collect();

        let objects = self
            .rows
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for (i, key) in keys.iter().enumerate() {
                    let cell = row.get(i).map_or(Value::Null, plain_cell);
                    object.insert(key.clone(), cell);
                }
                Value::Object(object)
            })
            .collect();

        Value::Array(objects)
    }

    fn print_json(self) -> io::Result<()> {
        let mut data = serde_json::to_string_pretty(&self.to_json())?;
        data.push('\n');
        self.writer.write_plain(data.as_bytes())
    }
}

/// Markup has no meaning in JSON output.
fn plain_cell(cell: &Value) -> Value {
    match cell {
        Value::String(s) => Value::String(strip_tags(s)),
        other => other.clone(),
    }
}
