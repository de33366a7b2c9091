use crate::error::ReportResult;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "csv written");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> ReportResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    debug!(path = %path.display(), "json written");
    Ok(())
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> ReportResult<()> {
    std::fs::write(path, bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(())
}

/// Render rows as a markdown-style table.
pub fn markdown_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}\n", markdown_table(slice));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummaryRow;

    fn rows() -> Vec<SummaryRow> {
        vec![SummaryRow {
            measure: "Total Gross Income".into(),
            value: "R 1,000.00".into(),
        }]
    }

    #[test]
    fn markdown_table_has_header_and_rows() {
        let table = markdown_table(rows());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Measure"));
        assert!(lines[2].contains("R 1,000.00"));
        assert!(lines.iter().all(|l| l.starts_with('|')));
    }

    #[test]
    fn writers_create_files() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("summary.json");
        write_json(&json, &serde_json::json!({ "farmName": "X" })).unwrap();
        assert!(std::fs::read_to_string(&json).unwrap().contains("farmName"));

        let doc = dir.path().join("report.txt");
        write_bytes(&doc, b"page").unwrap();
        assert_eq!(std::fs::read(&doc).unwrap(), b"page");
    }

    #[test]
    fn write_csv_serializes_rows() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
            total: f64,
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        write_csv(&path, &[Row { name: "Seed", total: 2.5 }]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "name,total\nSeed,2.5\n");
    }
}
