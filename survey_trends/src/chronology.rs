// Ordering of the release keys ("August 2024").

/// Release keys without a year belong to the first year of surveys.
pub const DEFAULT_YEAR: u64 = 2024;

/// Position given to an unknown month: after the known months of the same year.
pub const UNKNOWN_MONTH: u64 = 13;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

// Keeps `year * 100 + UNKNOWN_MONTH` within a u64.
const MAX_YEAR: u64 = (u64::MAX - UNKNOWN_MONTH) / 100;

/// The number of the month (1 to 12), from its full English name.
pub fn month_number(name: &str) -> Option<u64> {
    let lname = name.trim().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lname)
        .map(|idx| (idx + 1) as u64)
}

/// The sort key of a release: `year * 100 + month`.
///
/// Never fails: an unknown month counts as 13. A missing year, or one that
/// does not fit the key, counts as 2024.
pub fn order(release: &str) -> u64 {
    let (month, year) = match release.split_once(' ') {
        Some((m, y)) => (m, Some(y)),
        None => (release, None),
    };
    let month_num = month_number(month).unwrap_or(UNKNOWN_MONTH);
    let year_num = year
        .and_then(|y| y.trim().parse::<u64>().ok())
        .filter(|y| *y <= MAX_YEAR)
        .unwrap_or(DEFAULT_YEAR);
    year_num * 100 + month_num
}

/// Sorts release keys from the oldest to the most recent. Keys with the same
/// order keep their relative position.
pub fn sort_releases<S: AsRef<str>>(releases: &mut [S]) {
    releases.sort_by_key(|r| order(r.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(order("January 2024") < order("December 2024"));
        assert!(order("December 2024") < order("January 2025"));
        assert_eq!(order("August 2024"), 202408);
    }

    #[test]
    fn default_year() {
        assert_eq!(order("March"), order("March 2024"));
        assert_eq!(order("March 20x4"), 202403);
        assert_eq!(order("March "), 202403);
    }

    #[test]
    fn unknown_month() {
        assert_eq!(order("Retro 2025"), 202513);
        assert!(order("December 2024") < order("Retro 2024"));
        assert_eq!(order(""), 202413);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_number("january"), Some(1));
        assert_eq!(month_number("SEPTEMBER"), Some(9));
        assert_eq!(month_number(" May "), Some(5));
        assert_eq!(month_number("Sept"), None);
        assert_eq!(month_number("Marchy"), None);
        // Abbreviations are unknown months
        assert_eq!(order("Sept 2024"), 202413);
    }

    #[test]
    fn huge_years() {
        assert_eq!(order("March 999999999999999999"), 202403);
        assert_eq!(order("March 18446744073709551615"), 202403);
        assert_eq!(order(&format!("December {}", MAX_YEAR)), MAX_YEAR * 100 + 12);
        assert_eq!(order(&format!("Retro {}", MAX_YEAR)), MAX_YEAR * 100 + 13);

        let mut releases = vec!["March 184467440737095517", "March 2024", "April 2024"];
        sort_releases(&mut releases);
        assert_eq!(
            releases,
            vec!["March 184467440737095517", "March 2024", "April 2024"]
        );
    }

    #[test]
    fn stable_sort() {
        let mut releases = vec!["March", "January 2025", "March 2024", "February"];
        sort_releases(&mut releases);
        assert_eq!(
            releases,
            vec!["February", "March", "March 2024", "January 2025"]
        );

        let mut releases = vec!["March 2024", "March"];
        sort_releases(&mut releases);
        assert_eq!(releases, vec!["March 2024", "March"]);
    }
}
