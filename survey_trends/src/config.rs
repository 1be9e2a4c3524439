// ********* Input data structures ***********

use std::collections::HashSet;

/// The content of one cell of a survey export.
///
/// Readers are expected to map blank cells to `Empty`. An empty string is
/// treated the same way when counting answers.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// The answer as it is counted, or None for a blank cell.
    ///
    /// Answers are never trimmed: `"Yes"` and `"Yes "` are two different answers.
    pub fn as_answer(&self) -> Option<String> {
        match self {
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) if n.is_nan() => None,
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Empty => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_answer().is_none()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> CellValue {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> CellValue {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> CellValue {
        CellValue::Bool(b)
    }
}

/// The answers of one respondent for one release, keyed by the raw header
/// found in the spreadsheet.
///
/// Headers keep the order in which they were inserted.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RowRecord {
    cells: Vec<(String, CellValue)>,
}

impl RowRecord {
    pub fn new() -> RowRecord {
        RowRecord { cells: Vec::new() }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> RowRecord
    where
        K: Into<String>,
        V: Into<CellValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = RowRecord::new();
        for (k, v) in pairs {
            row.insert(k, v.into());
        }
        row
    }

    /// Sets the value of a header. An existing header keeps its position.
    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        let header = header.into();
        if let Some(cell) = self.cells.iter_mut().find(|(h, _)| *h == header) {
            cell.1 = value;
        } else {
            self.cells.push((header, value));
        }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    /// The non-blank answer stored under this exact header.
    pub fn answer(&self, header: &str) -> Option<String> {
        self.get(header).and_then(|v| v.as_answer())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// All the rows collected for one release, in insertion order.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ReleaseDataset {
    rows: Vec<RowRecord>,
    // Union of the row headers, first seen first.
    headers: Vec<String>,
    seen: HashSet<String>,
}

impl ReleaseDataset {
    pub fn new() -> ReleaseDataset {
        ReleaseDataset::default()
    }

    pub fn push(&mut self, row: RowRecord) {
        for h in row.headers() {
            if !self.seen.contains(h) {
                self.seen.insert(h.to_string());
                self.headers.push(h.to_string());
            }
        }
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    /// The headers available in this release, used as the search space
    /// when resolving questions.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<RowRecord> for ReleaseDataset {
    fn from_iter<I: IntoIterator<Item = RowRecord>>(iter: I) -> Self {
        let mut ds = ReleaseDataset::new();
        for row in iter {
            ds.push(row);
        }
        ds
    }
}

/// The releases currently loaded, keyed by release name ("August 2024").
///
/// Keys are unique and keep their insertion order. Use
/// [ReleaseCollection::chronological] for the order in which releases should
/// be presented.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ReleaseCollection {
    releases: Vec<(String, ReleaseDataset)>,
}

impl ReleaseCollection {
    pub fn new() -> ReleaseCollection {
        ReleaseCollection::default()
    }

    /// Appends rows to a release. Rows for a key that already exists are
    /// concatenated after the existing ones.
    pub fn append<I: IntoIterator<Item = RowRecord>>(&mut self, release: &str, rows: I) {
        if let Some((_, ds)) = self.releases.iter_mut().find(|(k, _)| k == release) {
            for row in rows {
                ds.push(row);
            }
        } else {
            self.releases
                .push((release.to_string(), rows.into_iter().collect()));
        }
    }

    pub fn get(&self, release: &str) -> Option<&ReleaseDataset> {
        self.releases
            .iter()
            .find(|(k, _)| k == release)
            .map(|(_, ds)| ds)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.releases.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReleaseDataset)> {
        self.releases.iter().map(|(k, ds)| (k.as_str(), ds))
    }

    /// The releases from the oldest to the most recent.
    pub fn chronological(&self) -> Vec<(&str, &ReleaseDataset)> {
        let mut all: Vec<(&str, &ReleaseDataset)> = self.iter().collect();
        all.sort_by_key(|(k, _)| crate::chronology::order(k));
        all
    }

    /// The most recent release, if any.
    pub fn latest(&self) -> Option<(&str, &ReleaseDataset)> {
        self.chronological().pop()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.releases.iter().map(|(_, ds)| ds.len()).sum()
    }
}

// ******** Output data structures *********

/// The tier of the column resolver that produced a match.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum MatchTier {
    /// The header is exactly the question.
    Exact,
    /// Equal after normalizing line breaks and surrounding whitespace.
    NormalizedExact,
    /// The header is the question followed by a clarification such as
    /// "(select all that apply)".
    NormalizedPrefix,
    /// Enough significant words in common.
    TokenOverlap,
}

impl MatchTier {
    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::NormalizedExact => "normalizedExact",
            MatchTier::NormalizedPrefix => "normalizedPrefix",
            MatchTier::TokenOverlap => "tokenOverlap",
        }
    }
}

/// The header chosen in one release to stand for a question.
#[derive(PartialEq, Debug, Clone)]
pub struct ResolvedColumn {
    pub header: String,
    pub tier: MatchTier,
}

/// The answers for one question in one release.
#[derive(PartialEq, Debug, Clone)]
pub enum ReleaseStatus {
    /// No column could be found for the question (this includes releases
    /// without any rows).
    Unresolved,
    /// A column was found but no (selected) respondent answered it.
    ResolvedEmpty(ResolvedColumn),
    /// A column was found and at least one answer was counted.
    ResolvedWithData(ResolvedColumn, crate::Distribution),
}

#[derive(PartialEq, Debug, Clone)]
pub struct ReleaseTrend {
    pub release: String,
    pub status: ReleaseStatus,
}

impl ReleaseTrend {
    pub fn column(&self) -> Option<&ResolvedColumn> {
        match &self.status {
            ReleaseStatus::Unresolved => None,
            ReleaseStatus::ResolvedEmpty(c) => Some(c),
            ReleaseStatus::ResolvedWithData(c, _) => Some(c),
        }
    }

    pub fn response_count(&self) -> u64 {
        match &self.status {
            ReleaseStatus::ResolvedWithData(_, d) => d.total,
            _ => 0,
        }
    }

    /// The percentage of each answer, None if the question could not be
    /// resolved in this release.
    pub fn percentages(&self) -> Option<&[(String, f64)]> {
        match &self.status {
            ReleaseStatus::Unresolved => None,
            ReleaseStatus::ResolvedEmpty(_) => Some(&[]),
            ReleaseStatus::ResolvedWithData(_, d) => Some(&d.percentages),
        }
    }
}

/// The evolution of the answers to one question, oldest release first.
#[derive(PartialEq, Debug, Clone)]
pub struct TrendSeries {
    pub question: String,
    pub releases: Vec<ReleaseTrend>,
}

impl TrendSeries {
    pub fn get(&self, release: &str) -> Option<&ReleaseTrend> {
        self.releases.iter().find(|rt| rt.release == release)
    }

    /// The percentage maps, restricted to the releases where the question
    /// was resolved.
    pub fn trends(&self) -> Vec<(&str, &[(String, f64)])> {
        self.releases
            .iter()
            .filter_map(|rt| rt.percentages().map(|p| (rt.release.as_str(), p)))
            .collect()
    }

    /// The number of counted answers for every release, including the ones
    /// without data.
    pub fn response_counts(&self) -> Vec<(&str, u64)> {
        self.releases
            .iter()
            .map(|rt| (rt.release.as_str(), rt.response_count()))
            .collect()
    }
}

// ********* Configuration **********

/// The default minimum fraction of question words that must appear in a
/// header for the token overlap tier.
pub const DEFAULT_TOKEN_OVERLAP_THRESHOLD: f64 = 0.3;

/// The question that identifies the director of a respondent.
pub const DIRECTOR_COLUMN_HEADER: &str = "You are part of which of the following directors org";

/// The tiers of the column resolver that may be used.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct EnabledTiers {
    pub exact: bool,
    pub normalized_exact: bool,
    pub normalized_prefix: bool,
    pub token_overlap: bool,
}

impl EnabledTiers {
    pub const ALL: EnabledTiers = EnabledTiers {
        exact: true,
        normalized_exact: true,
        normalized_prefix: true,
        token_overlap: true,
    };

    pub const WITHOUT_TOKEN_OVERLAP: EnabledTiers = EnabledTiers {
        token_overlap: false,
        ..EnabledTiers::ALL
    };

    pub fn contains(&self, tier: MatchTier) -> bool {
        match tier {
            MatchTier::Exact => self.exact,
            MatchTier::NormalizedExact => self.normalized_exact,
            MatchTier::NormalizedPrefix => self.normalized_prefix,
            MatchTier::TokenOverlap => self.token_overlap,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ResolverOptions {
    pub tiers: EnabledTiers,
    /// Minimum word overlap for the last tier. A header sharing no word with
    /// the question never matches, whatever the threshold.
    pub token_overlap_threshold: f64,
}

impl ResolverOptions {
    /// All the tiers, used when looking up questions for trends.
    pub const DEFAULT_OPTIONS: ResolverOptions = ResolverOptions {
        tiers: EnabledTiers::ALL,
        token_overlap_threshold: DEFAULT_TOKEN_OVERLAP_THRESHOLD,
    };

    /// The strict tiers, used for director breakdowns.
    pub const STRICT_OPTIONS: ResolverOptions = ResolverOptions {
        tiers: EnabledTiers::WITHOUT_TOKEN_OVERLAP,
        token_overlap_threshold: DEFAULT_TOKEN_OVERLAP_THRESHOLD,
    };
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions::DEFAULT_OPTIONS
    }
}

/// Options shared by the trend computations.
#[derive(PartialEq, Debug, Clone)]
pub struct TrendOptions {
    /// Matching of the question for the overall trends.
    pub trend_matching: ResolverOptions,
    /// Matching of the question when the rows are restricted to a director.
    pub director_matching: ResolverOptions,
    /// The known header of the director question.
    pub director_column: String,
}

impl Default for TrendOptions {
    fn default() -> Self {
        TrendOptions {
            trend_matching: ResolverOptions::DEFAULT_OPTIONS,
            director_matching: ResolverOptions::STRICT_OPTIONS,
            director_column: DIRECTOR_COLUMN_HEADER.to_string(),
        }
    }
}
