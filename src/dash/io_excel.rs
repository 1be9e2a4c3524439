use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use survey_trends::{CellValue, RowRecord};

use crate::dash::io_common::{header_names, make_row};
use crate::dash::*;

pub fn read_excel_release(path: &str, worksheet_name: Option<&str>) -> DashResult<Vec<RowRecord>> {
    let wrange = get_range(path, worksheet_name)?;
    read_range(&wrange, path)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> DashResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

fn read_range(wrange: &Range<DataType>, path: &str) -> DashResult<Vec<RowRecord>> {
    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let raw: Vec<Option<String>> = header
        .iter()
        .map(|cell| read_cell(cell).as_answer())
        .collect();
    let headers = header_names(&raw);
    debug!("read_excel_release: header: {:?}", headers);

    let mut res: Vec<RowRecord> = Vec::new();
    for (idx, row) in iter.enumerate() {
        match make_row(&headers, row.iter().map(read_cell)) {
            Some(r) => res.push(r),
            None => debug!("read_excel_release: row {} is blank", idx + 2),
        }
    }
    info!("read_excel_release: {:?}: {} rows", path, res.len());
    Ok(res)
}

fn read_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Bool(b) => CellValue::Bool(*b),
        DataType::Empty => CellValue::Empty,
        // Dates and errors are kept as they are displayed by calamine.
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::String("Yes".to_string())), CellValue::from("Yes"));
        assert_eq!(read_cell(&DataType::Int(4)), CellValue::Number(4.0));
        assert_eq!(read_cell(&DataType::Float(0.0)).as_answer().as_deref(), Some("0"));
        assert_eq!(read_cell(&DataType::Empty), CellValue::Empty);
    }

    #[test]
    fn range() {
        let mut r: Range<DataType> = Range::new((0, 0), (3, 2));
        r.set_value((0, 0), DataType::String("Q1".to_string()));
        r.set_value((0, 2), DataType::String("Rating".to_string()));
        r.set_value((1, 0), DataType::String("Yes".to_string()));
        r.set_value((1, 1), DataType::String("no header".to_string()));
        r.set_value((1, 2), DataType::Int(5));
        // Row 2 stays blank
        r.set_value((3, 0), DataType::String("No".to_string()));

        let rows = read_range(&r, "memory.xlsx").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].answer("Rating").as_deref(), Some("5"));
        assert_eq!(rows[1].answer("Q1").as_deref(), Some("No"));
        assert_eq!(rows[1].get("Rating"), Some(&CellValue::Empty));
    }

    #[test]
    fn missing_file() {
        assert!(read_excel_release("/nonexistent/retro_august_2024.xlsx", None).is_err());
    }
}
