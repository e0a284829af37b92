//! Whitespace-delimited table parsing for scheduler CLI output.

use crate::error::{Error, Result};

/// Column layout of one scheduler table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub columns: &'static [&'static str],
    pub header_lines: usize,
}

impl TableSchema {
    pub const fn new(columns: &'static [&'static str], header_lines: usize) -> Self {
        Self {
            columns,
            header_lines,
        }
    }

    pub fn with_header_lines(self, header_lines: usize) -> Self {
        Self {
            header_lines,
            ..self
        }
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }
}

/// One row of a table, borrowing its fields from the source text.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    schema: TableSchema,
    fields: Vec<&'a str>,
    line: usize,
}

impl<'a> Record<'a> {
    /// Field for a schema column. Panics on a column the schema does not name,
    /// which is a programming error rather than a data error.
    pub fn get(&self, column: &str) -> &'a str {
        let idx = self
            .schema
            .position(column)
            .unwrap_or_else(|| panic!("column `{column}` is not part of the schema"));
        self.fields[idx]
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn parse_f64(&self, column: &'static str) -> Result<f64> {
        let value = self.get(column);
        value.parse::<f64>().map_err(|_| Error::Coercion {
            column,
            value: value.to_string(),
        })
    }

    pub fn parse_u32(&self, column: &'static str) -> Result<u32> {
        let value = self.get(column);
        value.parse::<u32>().map_err(|_| Error::Coercion {
            column,
            value: value.to_string(),
        })
    }
}

/// Split `text` into records. Rows shorter than the schema are skipped so a blank or
/// truncated line never aborts the whole table; extra trailing fields are ignored.
pub fn parse_records(text: &str, schema: TableSchema) -> Vec<Record<'_>> {
    let width = schema.columns.len();
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate().skip(schema.header_lines) {
        let fields: Vec<&str> = line.split_whitespace().take(width).collect();
        if fields.len() < width {
            tracing::debug!(
                line = idx + 1,
                fields = fields.len(),
                expected = width,
                "skipping short row"
            );
            continue;
        }
        records.push(Record {
            schema,
            fields,
            line: idx + 1,
        });
    }

    records
}

/// Normalize a memory/swap value to the feed's K baseline.
///
/// `K` is the base unit, `M` multiplies by 1 000 and `G` by 1 000 000. A bare
/// number is taken as already normalized.
pub fn normalize_memory(value: &str) -> Result<f64> {
    let coercion = || Error::UnitCoercion {
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let (body, scale) = match trimmed.chars().last() {
        Some('K') => (&trimmed[..trimmed.len() - 1], 1.0),
        Some('M') => (&trimmed[..trimmed.len() - 1], 1e3),
        Some('G') => (&trimmed[..trimmed.len() - 1], 1e6),
        Some(c) if c.is_ascii_digit() || c == '.' => (trimmed, 1.0),
        _ => return Err(coercion()),
    };

    let number = body.parse::<f64>().map_err(|_| coercion())?;
    if !number.is_finite() {
        return Err(coercion());
    }
    Ok(number * scale)
}
