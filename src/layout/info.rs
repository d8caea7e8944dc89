//! Key/value blocks.

use std::fmt::Display;
use std::io;

use serde_json::{Map, Value};

use crate::render::{visible_width, Writer};

use super::columns::pad;
use super::format::OutputFormat;

/// A block of `HEADER  value` lines, or one JSON object.
///
/// Text mode upper-cases headers and pads them to the widest one. Multi-line
/// values continue on the following lines, indented to the value
/// column.
#[derive(Debug)]
pub struct Info<'w> {
    writer: &'w Writer,
    format: OutputFormat,
    rows: Vec<(String, String)>,
}

impl<'w> Info<'w> {
    pub fn new(writer: &'w Writer, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            rows: Vec::new(),
        }
    }

    pub fn add(&mut self, header: &str, value: impl Display) {
        self.rows.push((header.to_string(), value.to_string()));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn print(self) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.print_json(),
            OutputFormat::Text => self.print_text(),
        }
    }

    /// The markup lines printed in text mode.
    pub fn lines(&self) -> Vec<String> {
        let headers: Vec<String> = self
            .rows
            .iter()
            .map(|(header, _)| header.to_uppercase())
            .collect();
        let width = headers.iter().map(|h| visible_width(h)).max().unwrap_or(0);
        let indent = " ".repeat(width + 2);

        let mut lines = Vec::new();
        for (header, (_, value)) in headers.into_iter().zip(&self.rows) {
            let mut parts = value.split('\n');
            let first = parts.next().unwrap_or("");
            lines.push(format!(
                "<h1>{}</h1>  <value>{}</value>",
                pad(header, width),
                first
            ));
            for rest in parts {
                lines.push(format!("{}<value>{}</value>", indent, rest));
            }
        }
        lines
    }

    fn print_text(self) -> io::Result<()> {
        for line in self.lines() {
            self.writer.write(&format!("{}\n", line))?;
        }
        Ok(())
    }

    /// The JSON document printed in JSON mode.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .rows
            .iter()
            .map(|(header, value)| (header.to_lowercase(), Value::String(value.clone())))
            .collect();
        Value::Object(object)
    }

    fn print_json(self) -> io::Result<()> {
        let mut data = serde_json::to_string_pretty(&self.to_json())?;
        data.push('\n');
        self.writer.write_plain(data.as_bytes())
    }
}
