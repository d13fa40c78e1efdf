use super::view::{DisplayLocale, DisplayValue, format_value};
use crate::records::{FieldKind, Record, RecordId, RecordSchema};
use std::fmt;

/// Width at which long cell text is cut in the text rendering
const MAX_CELL_WIDTH: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: RecordId,
    pub cells: Vec<DisplayValue>,
}

/// Tabular rendering of a (filtered) list of records
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// One row per record, one column per descriptor, formatted like the view
    ///
    /// Textarea fields are left out of the table; they show in the view.
    pub fn render(schema: &RecordSchema, records: &[Record], locale: &DisplayLocale) -> Self {
        let fields: Vec<_> = schema
            .fields
            .iter()
            .filter(|f| !matches!(f.kind, FieldKind::Textarea))
            .collect();

        let columns = fields.iter().map(|f| f.label.clone()).collect();
        let rows = records
            .iter()
            .map(|record| TableRow {
                id: record.id,
                cells: fields
                    .iter()
                    .map(|f| format_value(&f.kind, record.get(&f.name), locale))
                    .collect(),
            })
            .collect();

        Self {
            title: schema.title.clone(),
            columns,
            rows,
        }
    }

    /// The row for a record id, as selected when opening its view
    pub fn row(&self, id: RecordId) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn clip(text: String) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text;
    }
    let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "No {} found", self.title.to_lowercase());
        }

        let mut grid: Vec<Vec<String>> = Vec::with_capacity(self.rows.len() + 1);
        let mut header = vec!["ID".to_string()];
        header.extend(self.columns.iter().cloned());
        grid.push(header);
        for row in &self.rows {
            let mut line = vec![row.id.to_string()];
            line.extend(row.cells.iter().map(|c| clip(c.to_string())));
            grid.push(line);
        }

        let mut widths = vec![0usize; grid[0].len()];
        for line in &grid {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        writeln!(f, "{} ({} record(s))", self.title, self.rows.len())?;
        for (n, line) in grid.iter().enumerate() {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
                .collect();
            writeln!(f, "{}", padded.join(" | ").trim_end())?;
            if n == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                writeln!(f, "{}", rule.join("-+-"))?;
            }
        }
        Ok(())
    }
}
