use crate::dash::*;

use serde::{Deserialize, Serialize};
use std::fs;

use survey_trends::{
    EnabledTiers, HeadcountTable, ResolverOptions, TrendOptions, DEFAULT_TOKEN_OVERLAP_THRESHOLD,
};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "dashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            dashboard_name: "retrospective".to_string(),
            output_directory: None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSource {
    /// xlsx or csv
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// The release of this file. Derived from the file name if missing.
    #[serde(rename = "releaseKey")]
    pub release_key: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(rename = "tokenOverlapThreshold")]
    pub token_overlap_threshold: Option<f64>,
    #[serde(rename = "tokenOverlap")]
    pub token_overlap: Option<bool>,
    #[serde(rename = "directorColumn")]
    pub director_column: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct HeadcountEntry {
    pub release: String,
    pub director: String,
    pub headcount: u64,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "releaseSources", default)]
    pub release_sources: Vec<ReleaseSource>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub headcounts: Vec<HeadcountEntry>,
}

impl DashConfig {
    pub fn trend_options(&self) -> DashResult<TrendOptions> {
        let threshold = self
            .matching
            .token_overlap_threshold
            .unwrap_or(DEFAULT_TOKEN_OVERLAP_THRESHOLD);
        if !valid_threshold(threshold) {
            whatever!(
                "The token overlap threshold must be above 0 and at most 1, got {}",
                threshold
            )
        }
        let tiers = if self.matching.token_overlap.unwrap_or(true) {
            EnabledTiers::ALL
        } else {
            EnabledTiers::WITHOUT_TOKEN_OVERLAP
        };
        let mut options = TrendOptions {
            trend_matching: ResolverOptions {
                tiers,
                token_overlap_threshold: threshold,
            },
            ..TrendOptions::default()
        };
        if let Some(col) = &self.matching.director_column {
            options.director_column = col.clone();
        }
        Ok(options)
    }

    pub fn headcount_table(&self) -> HeadcountTable {
        let mut table = HeadcountTable::new();
        for e in self.headcounts.iter() {
            table.insert(&e.release, &e.director, e.headcount);
        }
        table
    }
}

/// A header without any word of the question never matches, so 0 is not accepted.
pub fn valid_threshold(threshold: f64) -> bool {
    threshold > 0.0 && threshold <= 1.0
}

pub fn parse_config(contents: &str) -> DashResult<DashConfig> {
    let config: DashConfig = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_config(path: &str) -> DashResult<DashConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents)
}

pub fn read_summary(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}
