use crate::columns::ColumnId;
use crate::error::ExportError;
use crate::row::Row;
use crate::sort::{SortOptions, SortSpec, sort};
use crate::view_state::ColumnVisibility;
use chrono::{DateTime, Local};

/// A generated download
#[derive(Debug, Clone)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// Rows and columns an export covers
///
/// `rows` is the filtered set when a search or filter is active, otherwise
/// the full set; the active sort is applied before serialising.
pub struct ExportRequest<'a> {
    pub rows: Vec<&'a Row>,
    pub visibility: &'a ColumnVisibility,
    pub sort: SortSpec,
    pub options: SortOptions,
    pub dataset_name: &'a str,
}

impl ExportRequest<'_> {
    fn sorted_rows(&self) -> Vec<&Row> {
        let mut rows = self.rows.clone();
        sort(&mut rows, self.sort, self.options);
        rows
    }
}

/// Export the current view as CSV
///
/// Only visible columns are written, in display order, under their
/// human-readable labels. Values containing a comma, quote or line break
/// are quoted with inner quotes doubled; unavailable ranks are empty.
///
/// # Arguments
/// * `request` - Rows, visible columns and active sort of the view
/// * `now` - Local time stamped into the file name
///
/// # Returns
/// * `Result<Export, ExportError>` - CSV bytes with file name and content type
///
/// # Examples
/// ```
/// use chrono::{Local, TimeZone};
/// use tfdb::downloader::{ExportRequest, export_csv};
/// use tfdb::sort::{SortOptions, SortSpec};
/// use tfdb::view_state::ColumnVisibility;
///
/// let visibility = ColumnVisibility::default();
/// let request = ExportRequest {
///     rows: Vec::new(),
///     visibility: &visibility,
///     sort: SortSpec::default(),
///     options: SortOptions::default(),
///     dataset_name: "transcription_factors",
/// };
/// let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// let export = export_csv(&request, now).unwrap();
/// assert_eq!(export.filename, "transcription_factors_2024-03-09_14-05-07.csv");
/// assert!(export.bytes.starts_with(b"Symbol,Overall Rank,"));
/// ```
pub fn export_csv(
    request: &ExportRequest<'_>,
    now: DateTime<Local>,
) -> Result<Export, ExportError> {
    let columns = request.visibility.visible_columns();
    let mut writer = csv::WriterBuilder::new().from_writer(vec![]);

    writer.write_record(export_headers(request.visibility))?;
    for row in request.sorted_rows() {
        writer.write_record(columns.iter().map(|column| row.export_value(*column).into_owned()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;

    Ok(Export {
        bytes,
        filename: export_filename(request.dataset_name, now, "csv"),
        content_type: "text/csv; charset=utf-8",
    })
}

/// Export the current view as an Excel workbook
///
/// Same rows and columns as [`export_csv`]; ranks are written as numbers.
#[cfg(feature = "web")]
pub fn export_xlsx(
    request: &ExportRequest<'_>,
    now: DateTime<Local>,
) -> Result<Export, ExportError> {
    use crate::columns::ColumnKind;
    use rust_xlsxwriter::{Workbook, Worksheet};

    let columns = request.visibility.visible_columns();
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (c, label) in export_headers(request.visibility).into_iter().enumerate() {
        worksheet.write_string(0, c as u16, label)?;
    }

    for (r, row) in request.sorted_rows().into_iter().enumerate() {
        let sheet_row = (r + 1) as u32;
        for (c, column) in columns.iter().enumerate() {
            match (column.descriptor().kind, row.rank(*column).and_then(|rank| rank.value())) {
                (ColumnKind::Rank, Some(value)) => {
                    worksheet.write_number(sheet_row, c as u16, f64::from(value))?;
                }
                (ColumnKind::Rank, None) => {}
                _ => {
                    let value = row.export_value(*column);
                    worksheet.write_string(sheet_row, c as u16, &*value)?;
                }
            }
        }
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer()?;

    Ok(Export {
        bytes: buffer,
        filename: export_filename(request.dataset_name, now, "xlsx"),
        content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    })
}

/// `<dataset>_<YYYY-MM-DD_HH-mm-ss>.<ext>`
pub fn export_filename(dataset_name: &str, now: DateTime<Local>, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        dataset_name,
        now.format("%Y-%m-%d_%H-%M-%S"),
        extension
    )
}

/// Headers an export of this visibility set would carry
pub fn export_headers(visibility: &ColumnVisibility) -> Vec<&'static str> {
    visibility
        .visible_columns()
        .into_iter()
        .map(ColumnId::label)
        .collect()
}
