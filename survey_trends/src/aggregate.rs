use log::debug;

use crate::config::*;

/// Number of occurrences of each answer, in order of first appearance.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct AnswerHistogram {
    counts: Vec<(String, u64)>,
}

impl AnswerHistogram {
    pub fn new() -> AnswerHistogram {
        AnswerHistogram::default()
    }

    pub fn add(&mut self, answer: &str) {
        if let Some(entry) = self.counts.iter_mut().find(|(a, _)| a == answer) {
            entry.1 += 1;
        } else {
            self.counts.push((answer.to_string(), 1));
        }
    }

    pub fn get(&self, answer: &str) -> u64 {
        self.counts
            .iter()
            .find(|(a, _)| a == answer)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// The number of counted answers.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| *c).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(a, c)| (a.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The share of each answer in percent, rounded to two decimals.
    ///
    /// Empty when nothing was counted.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .map(|(a, c)| (a.clone(), percentage(*c, total)))
            .collect()
    }
}

/// The distribution of the answers to a question in one release.
#[derive(PartialEq, Debug, Clone)]
pub struct Distribution {
    pub histogram: AnswerHistogram,
    /// Respondents with a non-blank answer (not the number of rows).
    pub total: u64,
    pub percentages: Vec<(String, f64)>,
}

impl Distribution {
    pub fn from_histogram(histogram: AnswerHistogram) -> Distribution {
        let total = histogram.total();
        let percentages = histogram.percentages();
        Distribution {
            histogram,
            total,
            percentages,
        }
    }

    pub fn percentage(&self, answer: &str) -> Option<f64> {
        self.percentages
            .iter()
            .find(|(a, _)| a == answer)
            .map(|(_, p)| *p)
    }
}

/// Counts the non-blank answers found under `column`.
///
/// Returns the histogram and the number of answers counted. Rows without the
/// column or with a blank cell are skipped.
pub fn aggregate(rows: &[RowRecord], column: &str) -> (AnswerHistogram, u64) {
    aggregate_filtered(rows, column, |_| true)
}

/// Same as [aggregate], only looking at the rows accepted by `filter`.
pub fn aggregate_filtered<F>(rows: &[RowRecord], column: &str, filter: F) -> (AnswerHistogram, u64)
where
    F: Fn(&RowRecord) -> bool,
{
    let mut histogram = AnswerHistogram::new();
    let mut skipped: usize = 0;
    for row in rows.iter().filter(|r| filter(r)) {
        match row.answer(column) {
            Some(answer) => histogram.add(&answer),
            None => skipped += 1,
        }
    }
    let total = histogram.total();
    debug!(
        "aggregate: column {:?}: {} answers, {} blank rows skipped",
        column, total, skipped
    );
    (histogram, total)
}

/// `100 * count / total`, rounded to two decimals. Zero if `total` is zero.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(100.0 * count as f64 / total as f64)
}

/// Rounds to two decimals, halves going up.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[&str]) -> Vec<RowRecord> {
        values
            .iter()
            .map(|v| RowRecord::from_pairs([("Q1", *v)]))
            .collect()
    }

    #[test]
    fn counts_non_blank() {
        let mut rs = rows(&["Yes", "No", "", "Yes"]);
        rs.push(RowRecord::from_pairs([("Q2", "Yes")]));
        rs.push(RowRecord::from_pairs([("Q1", CellValue::Empty)]));
        let (h, total) = aggregate(&rs, "Q1");
        assert_eq!(total, 3);
        assert_eq!(h.get("Yes"), 2);
        assert_eq!(h.get("No"), 1);
        assert_eq!(h.get("Maybe"), 0);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn answers_are_not_trimmed() {
        let (h, total) = aggregate(&rows(&["Yes", "Yes ", "yes"]), "Q1");
        assert_eq!(total, 3);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn numbers_and_bools() {
        let rs = vec![
            RowRecord::from_pairs([("Score", 4.0)]),
            RowRecord::from_pairs([("Score", 4.0)]),
            RowRecord::from_pairs([("Score", 2.5)]),
            RowRecord::from_pairs([("Score", 0.0)]),
        ];
        let (h, total) = aggregate(&rs, "Score");
        assert_eq!(total, 4);
        assert_eq!(h.get("4"), 2);
        assert_eq!(h.get("2.5"), 1);
        assert_eq!(h.get("0"), 1);

        let rs = vec![RowRecord::from_pairs([("Flag", true)])];
        assert_eq!(aggregate(&rs, "Flag").0.get("true"), 1);
    }

    #[test]
    fn percentages_sum_to_100() {
        let (h, _) = aggregate(&rows(&["A", "B", "C", "A", "B", "A", "C"]), "Q1");
        let pcts = h.percentages();
        let sum: f64 = pcts.iter().map(|(_, p)| *p).sum();
        assert!((sum - 100.0).abs() <= 0.02, "sum: {}", sum);

        let (h, _) = aggregate(&rows(&["A", "B", "C"]), "Q1");
        let sum: f64 = h.percentages().iter().map(|(_, p)| *p).sum();
        assert!((sum - 100.0).abs() <= 0.02, "sum: {}", sum);
    }

    #[test]
    fn two_thirds() {
        let (h, total) = aggregate(&rows(&["Yes", "No", "Yes"]), "Q1");
        let d = Distribution::from_histogram(h);
        assert_eq!(d.total, total);
        assert_eq!(d.percentage("Yes"), Some(66.67));
        assert_eq!(d.percentage("No"), Some(33.33));
    }

    #[test]
    fn empty_is_empty() {
        let (h, total) = aggregate(&rows(&["", ""]), "Q1");
        assert_eq!(total, 0);
        assert!(h.is_empty());
        assert!(h.percentages().is_empty());
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn filtered() {
        let rs = vec![
            RowRecord::from_pairs([("Dir", "A"), ("Q1", "Yes")]),
            RowRecord::from_pairs([("Dir", "B"), ("Q1", "No")]),
            RowRecord::from_pairs([("Dir", "A"), ("Q1", "Yes")]),
        ];
        let (h, total) =
            aggregate_filtered(&rs, "Q1", |r| r.answer("Dir").as_deref() == Some("A"));
        assert_eq!(total, 2);
        assert_eq!(h.get("Yes"), 2);
        assert_eq!(h.percentages(), vec![("Yes".to_string(), 100.0)]);
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(percentage(1, 8), 12.5);
    }
}
