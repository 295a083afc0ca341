use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One sampled date and its values, aligned with [`AstroTable::columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstroRow {
    pub date: NaiveDateTime,
    pub values: Vec<f64>,
}

impl AstroRow {
    /// Date as printed in tables and CSV files.
    pub fn date_label(&self) -> String {
        format_date(self.date)
    }
}

/// Date-indexed table of longitudes and synodic angles, in degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AstroTable {
    pub columns: Vec<String>,
    pub rows: Vec<AstroRow>,
}

impl AstroTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// All values of the named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row.values[idx]).collect())
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> AstroTable {
        AstroTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Aligned text, one line per date.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "Empty table\n".to_string();
        }
        let dates: Vec<String> = self.rows.iter().map(AstroRow::date_label).collect();
        let date_width = dates.iter().map(String::len).max().unwrap_or(0).max(4);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| c.len().max(VALUE_WIDTH))
            .collect();

        let mut out = String::new();
        let _ = write!(out, "{:<date_width$}", "date");
        for (col, width) in self.columns.iter().zip(&widths) {
            let _ = write!(out, "  {:>w$}", col, w = *width);
        }
        out.push('\n');

        for (row, date) in self.rows.iter().zip(&dates) {
            let _ = write!(out, "{date:<date_width$}");
            for (value, width) in row.values.iter().zip(&widths) {
                let _ = write!(out, "  {:>w$.p$}", value, w = *width, p = PRECISION);
            }
            out.push('\n');
        }
        out
    }

    /// One line per column, one field per date.
    pub fn render_transposed(&self) -> String {
        if self.is_empty() {
            return "Empty table\n".to_string();
        }
        let name_width = self.columns.iter().map(String::len).max().unwrap_or(0).max(4);

        let mut out = String::new();
        let _ = write!(out, "{:<name_width$}", "date");
        for row in &self.rows {
            let _ = write!(out, "  {:>w$}", row.date_label(), w = VALUE_WIDTH);
        }
        out.push('\n');

        for (idx, col) in self.columns.iter().enumerate() {
            let _ = write!(out, "{col:<name_width$}");
            for row in &self.rows {
                let _ = write!(
                    out,
                    "  {:>w$.p$}",
                    row.values[idx],
                    w = VALUE_WIDTH,
                    p = PRECISION
                );
            }
            out.push('\n');
        }
        out
    }
}

const VALUE_WIDTH: usize = 12;
const PRECISION: usize = 6;

/// Midnight samples print as a bare date.
fn format_date(date: NaiveDateTime) -> String {
    if date.time() == NaiveTime::MIN {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> AstroTable {
        let day = |d| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        AstroTable {
            columns: vec!["mars".into(), "venus".into(), "venus-mars_synodic".into()],
            rows: (1..=7)
                .map(|d| AstroRow {
                    date: day(d),
                    values: vec![f64::from(d), 10.0 * f64::from(d), 9.0 * f64::from(d)],
                })
                .collect(),
        }
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column("venus").unwrap()[2], 30.0);
        assert!(table.column("pluto").is_none());
    }

    #[test]
    fn test_head() {
        let table = sample();
        assert_eq!(table.head(5).len(), 5);
        assert_eq!(table.head(50).len(), 7);
        assert_eq!(table.head(5).columns, table.columns);
    }

    #[test]
    fn test_render_has_header_and_rows() {
        let text = sample().head(2).render();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date"));
        assert!(lines[0].contains("venus-mars_synodic"));
        assert!(lines[1].starts_with("2024-01-01"));
        assert!(lines[1].contains("10.000000"));
    }

    #[test]
    fn test_render_transposed() {
        let text = sample().head(2).render_transposed();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("2024-01-02"));
        assert!(lines[2].starts_with("venus"));
    }

    #[test]
    fn test_format_date_keeps_time_when_present() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(format_date(date), "2024-01-01 12:00:00");
    }

    #[test]
    fn test_empty_render() {
        assert_eq!(AstroTable::empty().render(), "Empty table\n");
    }
}
