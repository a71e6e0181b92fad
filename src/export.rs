use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use tracing::{info, instrument};

use crate::domain::RosterError;
use crate::grid::GridColumn;
use crate::record::{Record, cell_text};

pub fn export_file_name(date: NaiveDate) -> String {
    format!("employee_data_{}.csv", date.format("%Y-%m-%d"))
}

/// Write `rows` as CSV. The header holds the column labels, cells hold the
/// raw record values; only values that need it are quoted.
pub fn write_csv<W: std::io::Write>(
    writer: W,
    columns: &[GridColumn],
    rows: &[&Record],
) -> Result<(), RosterError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);

    wtr.write_record(columns.iter().map(|c| c.header_name.as_str()))?;
    for record in rows {
        wtr.write_record(columns.iter().map(|c| raw_cell(c, record)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// One record as a CSV line without header or line terminator.
pub fn csv_line(columns: &[GridColumn], record: &Record) -> Result<String, RosterError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    wtr.write_record(columns.iter().map(|c| raw_cell(c, record)))?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| RosterError::ExportFailed(e.to_string()))?;
    let line = String::from_utf8(bytes).map_err(|e| RosterError::ExportFailed(e.to_string()))?;
    Ok(line.trim_end_matches('\n').to_string())
}

fn raw_cell(column: &GridColumn, record: &Record) -> String {
    column.value(record).map(cell_text).unwrap_or_default()
}

pub fn to_csv(columns: &[GridColumn], rows: &[&Record]) -> Result<String, RosterError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, columns, rows)?;
    String::from_utf8(buffer).map_err(|e| RosterError::ExportFailed(e.to_string()))
}

#[instrument(skip(columns, rows), fields(rows = rows.len(), columns = columns.len()))]
pub fn export_to_dir(
    dir: &Path,
    date: NaiveDate,
    columns: &[GridColumn],
    rows: &[&Record],
) -> Result<PathBuf, RosterError> {
    if columns.is_empty() {
        return Err(RosterError::ExportFailed("no visible columns".into()));
    }
    let path = dir.join(export_file_name(date));
    let file = File::create(&path)?;
    write_csv(file, columns, rows)?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::infer;
    use crate::record::parse_records;

    fn setup(json: &str) -> (Vec<Record>, Vec<GridColumn>) {
        let data = parse_records(json).unwrap();
        let columns = infer(&data, 8).columns.iter().map(GridColumn::from).collect();
        (data, columns)
    }

    fn pick(columns: &[GridColumn], ids: &[&str]) -> Vec<GridColumn> {
        ids.iter()
            .filter_map(|id| columns.iter().find(|c| c.field == *id).cloned())
            .collect()
    }

    #[test]
    fn exports_raw_values_under_labels() {
        let (data, columns) = setup(
            r#"[{"id": 1, "name": "Ann", "salary": 75000},
                {"id": 2, "name": "Bo", "salary": 50000}]"#,
        );
        let rows: Vec<&Record> = data.iter().collect();
        let csv = to_csv(&pick(&columns, &["name", "salary"]), &rows).unwrap();
        assert_eq!(csv, "Name,Salary\nAnn,75000\nBo,50000\n");
    }

    #[test]
    fn quotes_the_value_itself() {
        let (data, columns) = setup(r#"[{"name": "Ann", "location": "Austin, TX"}]"#);
        let rows: Vec<&Record> = data.iter().collect();
        let csv = to_csv(&columns, &rows).unwrap();
        assert_eq!(csv, "Name,Location\nAnn,\"Austin, TX\"\n");
    }

    #[test]
    fn escapes_quotes_and_newlines() {
        let (data, columns) = setup(r#"[{"note": "say \"hi\"", "memo": "a\nb"}]"#);
        let rows: Vec<&Record> = data.iter().collect();
        let csv = to_csv(&columns, &rows).unwrap();
        assert_eq!(csv, "Note,Memo\n\"say \"\"hi\"\"\",\"a\nb\"\n");
    }

    #[test]
    fn missing_and_null_fields_are_empty() {
        let (data, columns) = setup(
            r#"[{"name": "Ann", "age": 30, "isRemote": true},
                {"name": "Bo", "age": null}]"#,
        );
        let rows: Vec<&Record> = data.iter().collect();
        let csv = to_csv(&columns, &rows).unwrap();
        assert_eq!(csv, "Name,Age,Is Remote\nAnn,30,true\nBo,,\n");
    }

    #[test]
    fn single_line_for_clipboard() {
        let (data, columns) = setup(r#"[{"name": "Ann", "location": "Austin, TX", "age": 30}]"#);
        assert_eq!(csv_line(&columns, &data[0]).unwrap(), "Ann,\"Austin, TX\",30");
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "employee_data_2024-03-09.csv");
    }

    #[test]
    fn writes_file_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (data, columns) = setup(r#"[{"name": "Ann"}]"#);
        let rows: Vec<&Record> = data.iter().collect();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let path = export_to_dir(dir.path(), date, &columns, &rows).unwrap();
        assert_eq!(path, dir.path().join("employee_data_2024-01-02.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Name\nAnn\n");
    }

    #[test]
    fn refuses_export_without_columns() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let err = export_to_dir(dir.path(), date, &[], &[]).unwrap_err();
        assert!(matches!(err, RosterError::ExportFailed(_)));
    }
}
