pub use crate::config::*;

/// A builder for assembling the releases of a refresh cycle.
///
/// ```
/// use survey_trends::builder::Builder;
/// use survey_trends::RowRecord;
///
/// let releases = Builder::new()
///     .release("August 2024", vec![RowRecord::from_pairs([("Q1", "Yes")])])
///     // A second file for the same month: the rows are appended.
///     .release("August 2024", vec![RowRecord::from_pairs([("Q1", "No")])])
///     .build();
///
/// assert_eq!(releases.get("August 2024").map(|ds| ds.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _releases: ReleaseCollection,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _releases: ReleaseCollection::new(),
        }
    }

    /// Adds the rows of one source file to a release.
    pub fn release(mut self, release: &str, rows: Vec<RowRecord>) -> Builder {
        self.add_rows(release, rows);
        self
    }

    /// Same as [Builder::release], for callers that hold a mutable builder.
    pub fn add_rows(&mut self, release: &str, rows: Vec<RowRecord>) {
        self._releases.append(release, rows);
    }

    pub fn build(self) -> ReleaseCollection {
        self._releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_in_order() {
        let mut b = Builder::new().release(
            "August 2024",
            vec![RowRecord::from_pairs([("Q1", "first")])],
        );
        b.add_rows("September 2024", vec![]);
        b.add_rows(
            "August 2024",
            vec![RowRecord::from_pairs([("Q1", "second"), ("Q2", "x")])],
        );
        let releases = b.build();
        assert_eq!(releases.len(), 2);
        let aug = releases.get("August 2024").unwrap();
        let answers: Vec<String> = aug.rows().iter().filter_map(|r| r.answer("Q1")).collect();
        assert_eq!(answers, vec!["first", "second"]);
        assert_eq!(aug.headers(), &["Q1".to_string(), "Q2".to_string()]);
        assert!(releases.get("September 2024").unwrap().is_empty());
        assert_eq!(releases.total_rows(), 2);
    }

    #[test]
    fn chronological_view() {
        let releases = Builder::new()
            .release("March", vec![])
            .release("January 2025", vec![])
            .release("March 2024", vec![])
            .build();
        let keys: Vec<&str> = releases.chronological().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["March", "March 2024", "January 2025"]);
        let insertion: Vec<&str> = releases.keys().collect();
        assert_eq!(insertion, vec!["March", "January 2025", "March 2024"]);
        assert_eq!(releases.latest().map(|(k, _)| k), Some("January 2025"));
    }
}
