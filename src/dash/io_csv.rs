// Primitives for reading CSV files.

use std::io::Read;

use survey_trends::{CellValue, RowRecord};

use crate::dash::io_common::{header_names, make_row};
use crate::dash::*;

pub fn read_csv_release(path: &str) -> DashResult<Vec<RowRecord>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr, path)
}

/// Reads the rows of a csv export. The first record holds the questions.
pub fn read_records<R: Read>(rdr: csv::Reader<R>, path: &str) -> DashResult<Vec<RowRecord>> {
    let mut records = rdr.into_records();
    let header_record = match records.next() {
        Some(r) => r.context(CsvLineParseSnafu { path, lineno: 1_usize })?,
        None => {
            warn!("read_csv_release: {:?} is empty", path);
            return Ok(Vec::new());
        }
    };
    let raw: Vec<Option<String>> = header_record.iter().map(|s| Some(s.to_string())).collect();
    let headers = header_names(&raw);
    debug!("read_csv_release: headers: {:?}", headers);

    let mut res: Vec<RowRecord> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // The header is on the first line
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells = line.iter().map(|s| {
            if s.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.to_string())
            }
        });
        if let Some(row) = make_row(&headers, cells) {
            res.push(row);
        }
    }
    info!("read_csv_release: {:?}: {} rows", path, res.len());
    Ok(res)
}
