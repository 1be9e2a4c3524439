use log::{debug, info};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::aggregate::{aggregate_filtered, Distribution};
use crate::config::*;
use crate::resolver::{resolve, resolve_director_column};

/// The answers of the respondents of one director, for one release.
#[derive(PartialEq, Debug, Clone)]
pub struct DirectorSlice {
    pub director: String,
    pub distribution: Distribution,
}

/// Computes the distribution of the answers to `question` in every release,
/// oldest release first.
///
/// Arguments:
/// * `releases` the releases currently loaded
/// * `question` the question to look for. It does not need to appear verbatim in
/// every release, see [crate::resolve].
/// * `options` matching options. Only `trend_matching` is used here.
pub fn compute_trends(
    releases: &ReleaseCollection,
    question: &str,
    options: &TrendOptions,
) -> TrendSeries {
    compute_trends_filtered(releases, question, &options.trend_matching, |_, _| true)
}

/// Computes the trends of `question`, only counting the rows accepted by `predicate`.
pub fn compute_trends_where<P>(
    releases: &ReleaseCollection,
    question: &str,
    matching: &ResolverOptions,
    predicate: P,
) -> TrendSeries
where
    P: Fn(&RowRecord) -> bool,
{
    compute_trends_filtered(releases, question, matching, |_, row| predicate(row))
}

/// Computes the trends of `question` when only the respondents of `director`
/// are considered.
///
/// The director column is found separately in each release. In a release where
/// the question exists but no director column can be found, no respondent is
/// selected and the release is reported as resolved without data.
pub fn compute_director_trends(
    releases: &ReleaseCollection,
    question: &str,
    director: &str,
    options: &TrendOptions,
) -> TrendSeries {
    let director_cols: HashMap<&str, Option<String>> = releases
        .iter()
        .map(|(release, dataset)| {
            let col = resolve_director_column(dataset.headers(), &options.director_column);
            debug!(
                "compute_director_trends: release {:?}: director column {:?}",
                release, col
            );
            (release, col)
        })
        .collect();
    compute_trends_filtered(
        releases,
        question,
        &options.director_matching,
        |release, row| match director_cols.get(release) {
            Some(Some(col)) => row.answer(col).as_deref() == Some(director),
            _ => false,
        },
    )
}

/// The general form of the trend computation.
///
/// `filter` receives the release and a row, and tells if the row should be
/// counted. The question is always resolved against all the headers of the
/// release: the filter narrows the rows, never the columns.
pub fn compute_trends_filtered<F>(
    releases: &ReleaseCollection,
    question: &str,
    matching: &ResolverOptions,
    filter: F,
) -> TrendSeries
where
    F: Fn(&str, &RowRecord) -> bool,
{
    let mut res: Vec<ReleaseTrend> = Vec::new();
    for (release, dataset) in releases.chronological() {
        let status = if dataset.is_empty() {
            debug!("compute_trends: release {:?}: no rows", release);
            ReleaseStatus::Unresolved
        } else {
            match resolve(question, dataset.headers(), matching) {
                None => {
                    debug!(
                        "compute_trends: release {:?}: no column for question {:?}",
                        release, question
                    );
                    ReleaseStatus::Unresolved
                }
                Some(column) => {
                    debug!(
                        "compute_trends: release {:?}: using column {:?} ({:?})",
                        release, column.header, column.tier
                    );
                    let (histogram, total) =
                        aggregate_filtered(dataset.rows(), &column.header, |r| filter(release, r));
                    if total == 0 {
                        ReleaseStatus::ResolvedEmpty(column)
                    } else {
                        ReleaseStatus::ResolvedWithData(
                            column,
                            Distribution::from_histogram(histogram),
                        )
                    }
                }
            }
        };
        res.push(ReleaseTrend {
            release: release.to_string(),
            status,
        });
    }
    let series = TrendSeries {
        question: question.to_string(),
        releases: res,
    };
    info!(
        "compute_trends: question {:?}: data in {} of {} releases",
        question,
        series
            .releases
            .iter()
            .filter(|rt| rt.response_count() > 0)
            .count(),
        series.releases.len()
    );
    series
}

/// Splits the answers to `question` in one release by director.
///
/// Directors are sorted by name. Respondents without a director are left out.
/// Returns an empty list when the question or the director column cannot be
/// found.
pub fn director_breakdown(
    dataset: &ReleaseDataset,
    question: &str,
    options: &TrendOptions,
) -> Vec<DirectorSlice> {
    let column = match resolve(question, dataset.headers(), &options.director_matching) {
        Some(c) => c,
        None => return Vec::new(),
    };
    let director_col =
        match resolve_director_column(dataset.headers(), options.director_column.as_str()) {
            Some(c) => c,
            None => return Vec::new(),
        };

    let mut groups: BTreeMap<String, Vec<&RowRecord>> = BTreeMap::new();
    for row in dataset.rows() {
        if let Some(director) = row.answer(&director_col) {
            groups.entry(director).or_default().push(row);
        }
    }

    groups
        .into_iter()
        .map(|(director, rows)| {
            let mut histogram = crate::AnswerHistogram::new();
            for row in rows {
                if let Some(answer) = row.answer(&column.header) {
                    histogram.add(&answer);
                }
            }
            DirectorSlice {
                director,
                distribution: Distribution::from_histogram(histogram),
            }
        })
        .collect()
}

/// The number of respondents of each director in one release, sorted by director.
pub fn respondents_by_director(dataset: &ReleaseDataset, options: &TrendOptions) -> Vec<(String, u64)> {
    let director_col =
        match resolve_director_column(dataset.headers(), options.director_column.as_str()) {
            Some(c) => c,
            None => return Vec::new(),
        };
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for row in dataset.rows() {
        if let Some(director) = row.answer(&director_col) {
            *counts.entry(director).or_default() += 1;
        }
    }
    counts.into_iter().collect()
}

/// All the directors mentioned in the releases, sorted.
pub fn list_directors(releases: &ReleaseCollection, options: &TrendOptions) -> Vec<String> {
    let mut directors: BTreeSet<String> = BTreeSet::new();
    for (_, dataset) in releases.iter() {
        if let Some(col) =
            resolve_director_column(dataset.headers(), options.director_column.as_str())
        {
            for row in dataset.rows() {
                if let Some(d) = row.answer(&col) {
                    directors.insert(d);
                }
            }
        }
    }
    directors.into_iter().collect()
}
