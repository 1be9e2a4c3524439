use log::debug;

use std::collections::HashSet;

use crate::config::*;
use crate::normalize::{normalize, significant_tokens};

// A clarification appended to a question in a later release starts with one of these.
const CLARIFICATION_MARKERS: [char; 3] = ['(', '-', '/'];

/// Finds the header that stands for `question` among the headers of one release.
///
/// The tiers are tried in order and the first one that produces a match wins:
/// exact, normalized exact, normalized prefix followed by a clarification, then
/// word overlap. Within the first three tiers, the first matching header wins.
/// For word overlap, the header with the largest overlap wins and ties go to the
/// first one.
///
/// Returns None when nothing matches. This is common: questions get added,
/// removed and reworded between releases.
pub fn resolve<S: AsRef<str>>(
    question: &str,
    headers: &[S],
    options: &ResolverOptions,
) -> Option<ResolvedColumn> {
    let headers: Vec<&str> = headers.iter().map(|h| h.as_ref()).collect();
    let tiers = options.tiers;

    if tiers.exact {
        if let Some(h) = headers.iter().find(|h| **h == question) {
            return Some(matched(h, MatchTier::Exact));
        }
    }

    let norm_question = normalize(question);
    // An empty question would be a prefix of everything.
    if norm_question.is_empty() {
        return None;
    }

    if tiers.normalized_exact {
        if let Some(h) = headers.iter().find(|h| normalize(h) == norm_question) {
            return Some(matched(h, MatchTier::NormalizedExact));
        }
    }

    if tiers.normalized_prefix {
        if let Some(h) = headers
            .iter()
            .find(|h| is_clarified_prefix(&norm_question, &normalize(h)))
        {
            return Some(matched(h, MatchTier::NormalizedPrefix));
        }
    }

    if tiers.token_overlap {
        if let Some(h) = best_token_overlap(question, &headers, options.token_overlap_threshold) {
            return Some(matched(h, MatchTier::TokenOverlap));
        }
    }

    None
}

fn matched(header: &str, tier: MatchTier) -> ResolvedColumn {
    ResolvedColumn {
        header: header.to_string(),
        tier,
    }
}

// Both arguments are already normalized.
fn is_clarified_prefix(norm_question: &str, norm_header: &str) -> bool {
    match norm_header.strip_prefix(norm_question) {
        Some(rest) => rest
            .trim()
            .starts_with(|c: char| CLARIFICATION_MARKERS.contains(&c)),
        None => false,
    }
}

/// Fraction of the significant words of the question that also appear in the header.
///
/// None if the question has no significant word.
pub fn token_overlap(question: &str, header: &str) -> Option<f64> {
    let q_tokens: HashSet<String> = significant_tokens(question).into_iter().collect();
    if q_tokens.is_empty() {
        return None;
    }
    let h_tokens: HashSet<String> = significant_tokens(header).into_iter().collect();
    let common = q_tokens.intersection(&h_tokens).count();
    Some(common as f64 / q_tokens.len() as f64)
}

fn best_token_overlap<'a>(question: &str, headers: &[&'a str], threshold: f64) -> Option<&'a str> {
    let mut best: Option<(&'a str, f64)> = None;
    for h in headers.iter().copied() {
        let score = match token_overlap(question, h) {
            Some(x) => x,
            // No word to compare: no header can ever qualify.
            None => return None,
        };
        if score < threshold || score == 0.0 {
            continue;
        }
        // Strictly greater: the first header wins a tie.
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((h, score));
        }
    }
    if let Some((h, score)) = best {
        debug!(
            "best_token_overlap: question {:?} matched {:?} with overlap {:.2}",
            question, h, score
        );
    }
    best.map(|(h, _)| h)
}

/// Finds the column that tells which director a respondent belongs to.
///
/// The known director question is resolved first (without word overlap). If it
/// is missing, the first header mentioning "director" is used, then the first
/// header mentioning "org".
pub fn resolve_director_column<S: AsRef<str>>(
    headers: &[S],
    director_header: &str,
) -> Option<String> {
    if let Some(rc) = resolve(director_header, headers, &ResolverOptions::STRICT_OPTIONS) {
        return Some(rc.header);
    }
    for needle in ["director", "org"] {
        if let Some(h) = headers
            .iter()
            .map(|h| h.as_ref())
            .find(|h| h.to_lowercase().contains(needle))
        {
            debug!(
                "resolve_director_column: falling back to {:?} (contains {:?})",
                h, needle
            );
            return Some(h.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hs(headers: &[&str]) -> Vec<String> {
        headers.iter().map(|s| s.to_string()).collect()
    }

    fn res(question: &str, headers: &[&str]) -> Option<ResolvedColumn> {
        resolve(question, &hs(headers), &ResolverOptions::DEFAULT_OPTIONS)
    }

    #[test]
    fn exact() {
        let rc = res("Q1", &["Q0", "Q1", "Q1 "]).unwrap();
        assert_eq!(rc.header, "Q1");
        assert_eq!(rc.tier, MatchTier::Exact);
    }

    #[test]
    fn normalized_exact() {
        let rc = res("How was the demo?", &["Other", "  How was the demo?\r\n"]).unwrap();
        assert_eq!(rc.header, "  How was the demo?\r\n");
        assert_eq!(rc.tier, MatchTier::NormalizedExact);
    }

    #[test]
    fn clarified_prefix() {
        let rc = res(
            "What is your role?",
            &["What is your role?\r\n(select one)"],
        )
        .unwrap();
        assert_eq!(rc.header, "What is your role?\r\n(select one)");
        assert_eq!(rc.tier, MatchTier::NormalizedPrefix);

        let rc = res("Tools used", &["Tools used - optional"]).unwrap();
        assert_eq!(rc.tier, MatchTier::NormalizedPrefix);
        let rc = res("Tools used", &["Tools used / check all"]).unwrap();
        assert_eq!(rc.tier, MatchTier::NormalizedPrefix);
    }

    #[test]
    fn prefix_needs_clarification() {
        let strict = ResolverOptions::STRICT_OPTIONS;
        // The remainder does not start with a marker.
        assert_eq!(resolve("Team", &hs(&["Teamwork (rating)"]), &strict), None);
        assert_eq!(resolve("Team", &hs(&["Team size"]), &strict), None);
        // Nothing after the prefix.
        assert_eq!(resolve("Team", &hs(&["Team   "]), &strict).unwrap().tier, MatchTier::NormalizedExact);
    }

    #[test]
    fn token_overlap_tier() {
        let rc = res(
            "capacity planning process changes",
            &["How satisfied are you with release capacity planning"],
        )
        .unwrap();
        assert_eq!(rc.tier, MatchTier::TokenOverlap);
        assert_eq!(
            token_overlap(
                "capacity planning process changes",
                "How satisfied are you with release capacity planning"
            ),
            Some(0.5)
        );
    }

    #[test]
    fn token_overlap_picks_best_then_first() {
        let headers = [
            "release planning feedback",
            "capacity planning process",
            "planning process capacity",
        ];
        let rc = res("capacity planning process changes", &headers).unwrap();
        assert_eq!(rc.header, "capacity planning process");

        let rc = res("release notes quality", &["release cadence", "release timing"]).unwrap();
        assert_eq!(rc.header, "release cadence");
    }

    #[test]
    fn token_overlap_threshold() {
        let headers = hs(&["How satisfied are you with release capacity planning"]);
        let mut options = ResolverOptions::DEFAULT_OPTIONS;
        options.token_overlap_threshold = 0.6;
        assert_eq!(
            resolve("capacity planning process changes", &headers, &options),
            None
        );
        options.token_overlap_threshold = 0.5;
        assert!(resolve("capacity planning process changes", &headers, &options).is_some());

        // Without any common word, even a zero threshold does not match.
        options.token_overlap_threshold = 0.0;
        assert_eq!(resolve("team morale", &headers, &options), None);
    }

    #[test]
    fn exact_wins_over_overlap() {
        let rc = res(
            "capacity planning process",
            &["capacity planning process changes", "capacity planning process"],
        )
        .unwrap();
        assert_eq!(rc.header, "capacity planning process");
        assert_eq!(rc.tier, MatchTier::Exact);
    }

    #[test]
    fn disabled_tiers() {
        let headers = hs(&["How satisfied are you with release capacity planning"]);
        assert_eq!(
            resolve(
                "capacity planning process changes",
                &headers,
                &ResolverOptions::STRICT_OPTIONS
            ),
            None
        );
        let only_prefix = ResolverOptions {
            tiers: EnabledTiers {
                exact: false,
                normalized_exact: false,
                normalized_prefix: true,
                token_overlap: false,
            },
            ..ResolverOptions::DEFAULT_OPTIONS
        };
        assert_eq!(resolve("Q1", &hs(&["Q1"]), &only_prefix), None);
    }

    #[test]
    fn not_found() {
        assert_eq!(res("Q2", &["Q1"]), None);
        assert_eq!(res("Q2", &[]), None);
        assert_eq!(res("", &["(anything)", "Q1"]), None);
        // Short words only: no overlap can be computed.
        assert_eq!(res("why not", &["why is it so"]), None);
    }

    #[test]
    fn headers_untouched() {
        let headers = hs(&["A\r\n", "B"]);
        let before = headers.clone();
        let _ = resolve("A", &headers, &ResolverOptions::DEFAULT_OPTIONS);
        assert_eq!(headers, before);
    }

    #[test]
    fn director_column() {
        let headers = hs(&[
            "Q1",
            "You are part of which of the following directors org\r\n(select one)",
        ]);
        assert_eq!(
            resolve_director_column(&headers, DIRECTOR_COLUMN_HEADER).unwrap(),
            "You are part of which of the following directors org\r\n(select one)"
        );
        let headers = hs(&["Your organization", "Your Director"]);
        assert_eq!(
            resolve_director_column(&headers, DIRECTOR_COLUMN_HEADER).unwrap(),
            "Your Director"
        );
        let headers = hs(&["Q1", "Which org?"]);
        assert_eq!(
            resolve_director_column(&headers, DIRECTOR_COLUMN_HEADER).unwrap(),
            "Which org?"
        );
        assert_eq!(resolve_director_column(&hs(&["Q1"]), DIRECTOR_COLUMN_HEADER), None);
    }
}
