//! Table types.

use serde_json::Value;

/// A table embedded in rich text. Row 0 is always treated as the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Build a table from `rows: [[..]]` or `rows: [{ cells: [..] }]`.
    pub fn from_value(value: &Value) -> Self {
        let rows = value
            .get("rows")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().map(TableRow::from_value).collect())
            .unwrap_or_default();
        Self { rows }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on the header row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Get the header row.
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// Get body rows (everything after the header).
    pub fn body(&self) -> &[TableRow] {
        self.rows.get(1..).unwrap_or_default()
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// Cell texts in the row
    pub cells: Vec<String>,
}

impl TableRow {
    /// Malformed rows decode as empty rows.
    fn from_value(value: &Value) -> Self {
        let cells = match value {
            Value::Array(cells) => cells,
            Value::Object(_) => match value.get("cells").and_then(Value::as_array) {
                Some(cells) => cells,
                None => return Self::default(),
            },
            _ => return Self::default(),
        };
        Self {
            cells: cells.iter().map(cell_text).collect(),
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(_) => value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}
