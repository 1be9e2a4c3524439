use log::{debug, warn};
use std::collections::HashSet;
use std::path::Path;

use survey_trends::{CellValue, RowRecord};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The month (1 to 12) named in a file name: the full name or a 3 or 4 letter
/// abbreviation ("Sep", "Sept").
fn file_name_month(token: &str) -> Option<usize> {
    let t = token.to_lowercase();
    if t.len() < 3 || !t.chars().all(|c| c.is_alphabetic()) {
        return None;
    }
    MONTH_NAMES
        .iter()
        .map(|m| m.to_lowercase())
        .position(|m| m == t || (t.len() <= 4 && m.starts_with(t.as_str())))
        .map(|idx| idx + 1)
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The reader to use for a file, from its extension.
pub fn guess_provider(path: &str) -> Option<&'static str> {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("xlsx") | Some("xlsm") => Some("xlsx"),
        Some("csv") => Some("csv"),
        _ => None,
    }
}

/// Derives the release from the name of an export.
///
/// `Retro_Survey-August_2024.xlsx` gives `August 2024`, `retro sept.csv` gives
/// `September`. A file name without any month is used as is.
pub fn release_key_from_path(path: &str) -> String {
    let stem = simplify_file_name(path);
    let tokens: Vec<&str> = stem
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let month = tokens.iter().find_map(|t| file_name_month(t));
    let year = tokens
        .iter()
        .find(|t| t.len() == 4 && t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| t.starts_with("19") || t.starts_with("20"));
    let key = match (month, year) {
        (Some(m), Some(y)) => format!("{} {}", MONTH_NAMES[m - 1], y),
        (Some(m), None) => MONTH_NAMES[m - 1].to_string(),
        (None, _) => stem.clone(),
    };
    debug!("release_key_from_path: {:?} -> {:?}", path, key);
    key
}

/// Cleans up the first row of a file.
///
/// A column is dropped (None) when its header is blank or repeats an
/// earlier header: only the first column with a given header is read.
pub fn header_names(raw: &[Option<String>]) -> Vec<Option<String>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<Option<String>> = Vec::new();
    for (idx, h) in raw.iter().enumerate() {
        let name = h
            .as_ref()
            // Exports sometimes start with a byte order mark.
            .map(|s| s.trim_start_matches('\u{feff}').to_string())
            .filter(|s| !s.trim().is_empty());
        match name {
            Some(n) if seen.contains(&n) => {
                warn!("header_names: column {} repeats header {:?}, skipped", idx, n);
                res.push(None);
            }
            Some(n) => {
                seen.insert(n.clone());
                res.push(Some(n));
            }
            None => res.push(None),
        }
    }
    res
}

/// Assembles a row from its cells. Cells of dropped columns are ignored.
///
/// Returns None if all the cells are blank.
pub fn make_row<I>(headers: &[Option<String>], cells: I) -> Option<RowRecord>
where
    I: IntoIterator<Item = CellValue>,
{
    let mut row = RowRecord::new();
    let mut has_value = false;
    for (h, cell) in headers.iter().zip(cells) {
        if let Some(name) = h {
            has_value |= !cell.is_blank();
            row.insert(name.clone(), cell);
        }
    }
    if has_value {
        Some(row)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_keys() {
        assert_eq!(release_key_from_path("data/Retro_Survey-August_2024.xlsx"), "August 2024");
        assert_eq!(release_key_from_path("retro sept.csv"), "September");
        assert_eq!(release_key_from_path("2025 jan retro.xlsx"), "January 2025");
        assert_eq!(release_key_from_path("/tmp/responses.xlsx"), "responses");
        // Not a plausible year
        assert_eq!(release_key_from_path("march_1234.csv"), "March");
    }

    #[test]
    fn month_abbreviations() {
        assert_eq!(file_name_month("Sep"), Some(9));
        assert_eq!(file_name_month("sept"), Some(9));
        assert_eq!(file_name_month("DECEMBER"), Some(12));
        assert_eq!(file_name_month("Ma"), None);
        assert_eq!(file_name_month("Marchy"), None);
        assert_eq!(file_name_month("jan2"), None);
        // The derived key uses the full name, which orders correctly.
        let key = release_key_from_path("retro_sept_2024.xlsx");
        assert_eq!(key, "September 2024");
        assert_eq!(survey_trends::order(&key), 202409);
    }

    #[test]
    fn providers() {
        assert_eq!(guess_provider("a/b.XLSX"), Some("xlsx"));
        assert_eq!(guess_provider("b.csv"), Some("csv"));
        assert_eq!(guess_provider("b.json"), None);
        assert_eq!(guess_provider("noext"), None);
    }

    #[test]
    fn headers() {
        let raw = vec![
            Some("\u{feff}Q1".to_string()),
            None,
            Some("  ".to_string()),
            Some("Q2".to_string()),
            Some("Q1".to_string()),
        ];
        assert_eq!(
            header_names(&raw),
            vec![Some("Q1".to_string()), None, None, Some("Q2".to_string()), None]
        );
    }

    #[test]
    fn rows() {
        let headers = vec![Some("Q1".to_string()), None, Some("Q2".to_string())];
        let row = make_row(
            &headers,
            vec![CellValue::from("Yes"), CellValue::from("dropped"), CellValue::Empty],
        )
        .unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.answer("Q1").as_deref(), Some("Yes"));
        assert_eq!(row.get("Q2"), Some(&CellValue::Empty));

        let blank = make_row(&headers, vec![CellValue::Empty, CellValue::from("x")]);
        assert_eq!(blank, None);
    }
}
