//! Spreadsheet to CSV export.

use crate::constants::SPREADSHEET_EXTENSIONS;
use calamine::{Data, DataType, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("{0} is not a spreadsheet (expected .xlsx or .xls)")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("Failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        source: calamine::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },
}

/// One exported sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSheet {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes every sheet of `input` to `{output_dir}/{sheet}.csv`.
pub fn export_workbook(input: &Path, output_dir: &Path) -> Result<Vec<ExportedSheet>, SheetError> {
    let supported = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_lowercase().as_str()));
    if !supported {
        return Err(SheetError::UnsupportedFormat(input.to_path_buf()));
    }
    if !input.is_file() {
        return Err(SheetError::NotFound(input.to_path_buf()));
    }

    std::fs::create_dir_all(output_dir).map_err(|source| SheetError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut workbook = open_workbook_auto(input).map_err(|source| SheetError::Open {
        path: input.to_path_buf(),
        source,
    })?;

    let mut exported = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| SheetError::Sheet {
                sheet: name.clone(),
                source,
            })?;

        let path = output_dir.join(format!("{}.csv", sheet_file_name(&name)));
        let write_err = |source| SheetError::Write {
            path: path.clone(),
            source,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(write_err)?;
        let mut rows = 0;
        for row in range.rows() {
            writer
                .write_record(row.iter().map(render_cell))
                .map_err(write_err)?;
            rows += 1;
        }
        writer.flush().map_err(|e| write_err(e.into()))?;

        debug!(sheet = %name, rows, "Exported sheet");
        exported.push(ExportedSheet { name, path, rows });
    }

    info!(sheets = exported.len(), input = %input.display(), "Workbook exported");
    Ok(exported)
}

/// Sheet name usable as a file name.
#[must_use]
pub fn sheet_file_name(sheet: &str) -> String {
    sheet.replace(['/', '\\'], "_")
}

/// Renders a cell the way it reads in the spreadsheet.
#[must_use]
pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        #[allow(clippy::cast_possible_truncation)]
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(_) => cell.as_datetime().map_or_else(String::new, |dt| {
            if dt.time() == chrono::NaiveTime::MIN {
                dt.format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_cell() {
        assert_eq!(render_cell(&Data::Empty), "");
        assert_eq!(render_cell(&Data::Float(12.0)), "12");
        assert_eq!(render_cell(&Data::Float(1.5)), "1.5");
        assert_eq!(render_cell(&Data::Int(7)), "7");
        assert_eq!(render_cell(&Data::Bool(true)), "True");
        assert_eq!(render_cell(&Data::Bool(false)), "False");
        assert_eq!(
            render_cell(&Data::String("Romance Dawn 01".to_string())),
            "Romance Dawn 01"
        );
        assert_eq!(
            render_cell(&Data::Error(calamine::CellErrorType::Div0)),
            ""
        );
    }

    #[test]
    fn test_sheet_file_name() {
        assert_eq!(sheet_file_name("Arc Overview"), "Arc Overview");
        assert_eq!(sheet_file_name("Enies Lobby/CP9"), "Enies Lobby_CP9");
    }

    #[test]
    fn test_export_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("guide.xlsx");
        assert!(matches!(
            export_workbook(&missing, dir.path()),
            Err(SheetError::NotFound(_))
        ));

        let text = dir.path().join("guide.txt");
        std::fs::write(&text, "x").unwrap();
        assert!(matches!(
            export_workbook(&text, dir.path()),
            Err(SheetError::UnsupportedFormat(_))
        ));
    }
}
