use crate::config::*;
use crate::normalize::normalize;

/// A question found in at least one release.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CatalogueEntry {
    /// The normalized text of the header.
    pub question: String,
    /// The releases where this header appears, oldest first.
    pub releases: Vec<String>,
}

/// Lists every question asked in the releases.
///
/// Headers are compared after normalization, so the same question with a
/// different line break is listed once. Questions are ordered by their first
/// appearance, walking the releases from the oldest.
pub fn question_catalogue(releases: &ReleaseCollection) -> Vec<CatalogueEntry> {
    let mut entries: Vec<CatalogueEntry> = Vec::new();
    for (release, dataset) in releases.chronological() {
        for header in dataset.headers() {
            let question = normalize(header);
            if question.is_empty() {
                continue;
            }
            match entries.iter_mut().find(|e| e.question == question) {
                Some(e) => {
                    if e.releases.last().map(|r| r.as_str()) != Some(release) {
                        e.releases.push(release.to_string());
                    }
                }
                None => entries.push(CatalogueEntry {
                    question,
                    releases: vec![release.to_string()],
                }),
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    #[test]
    fn lists_questions() {
        let releases = Builder::new()
            .release(
                "September 2024",
                vec![RowRecord::from_pairs([
                    ("Q1\r\n", "x"),
                    ("Q1", "y"),
                    ("Q3", "z"),
                ])],
            )
            .release(
                "August 2024",
                vec![RowRecord::from_pairs([("Q2", "x"), ("Q1", "y"), ("  ", "")])],
            )
            .build();
        let cat = question_catalogue(&releases);
        let questions: Vec<&str> = cat.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["Q2", "Q1", "Q3"]);
        assert_eq!(cat[1].releases, vec!["August 2024", "September 2024"]);
        assert_eq!(cat[2].releases, vec!["September 2024"]);
    }
}
