use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_trends::builder::Builder;
use survey_trends::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dash::cache::{Clock, ReleaseCache, SystemClock};
use crate::dash::config_reader::*;
use crate::dash::io_common::{guess_provider, release_key_from_path};

mod cache;
pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

/// How long the loaded releases are reused before the files are read again.
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Could not parse line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unknown input type {input_type:?} for {path} (expected xlsx or csv)"))]
    UnknownInputType { input_type: String, path: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

/// The survey exports of a dashboard and the releases read from them.
pub struct Dashboard<C: Clock> {
    sources: Vec<ReleaseSource>,
    cache: ReleaseCache<C>,
    max_age: Duration,
}

impl<C: Clock> Dashboard<C> {
    pub fn new(sources: Vec<ReleaseSource>, clock: C) -> Dashboard<C> {
        Dashboard {
            sources,
            cache: ReleaseCache::new(clock),
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// The releases, read from the files unless a recent snapshot exists.
    pub fn releases(&mut self) -> DashResult<Arc<ReleaseCollection>> {
        if let Some(releases) = self.cache.get(self.max_age) {
            debug!("Dashboard::releases: reusing snapshot {}", self.cache.generation());
            return Ok(releases);
        }
        let releases = load_releases(&self.sources)?;
        Ok(self.cache.set(releases))
    }

    /// Forces the files to be read again on the next access.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }
}

fn read_release_rows(source: &ReleaseSource) -> DashResult<Vec<RowRecord>> {
    let path = source.file_path.as_str();
    info!("Attempting to read survey export {:?}", path);
    match source.provider.to_lowercase().as_str() {
        "xlsx" | "excel" => {
            io_excel::read_excel_release(path, source.excel_worksheet_name.as_deref())
        }
        "csv" => io_csv::read_csv_release(path),
        x => UnknownInputTypeSnafu {
            input_type: x,
            path,
        }
        .fail(),
    }
}

pub fn load_releases(sources: &[ReleaseSource]) -> DashResult<ReleaseCollection> {
    let mut builder = Builder::new();
    for source in sources.iter() {
        let rows = read_release_rows(source)?;
        let key = match &source.release_key {
            Some(k) => k.clone(),
            None => release_key_from_path(&source.file_path),
        };
        info!(
            "load_releases: {} rows for release {:?} from {:?}",
            rows.len(),
            key,
            source.file_path
        );
        builder.add_rows(&key, rows);
    }
    Ok(builder.build())
}

fn percentages_to_json(pcts: &[(String, f64)]) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (answer, pct) in pcts.iter() {
        m.insert(answer.clone(), json!(pct));
    }
    JSValue::Object(m)
}

fn release_trend_to_json(rt: &ReleaseTrend) -> JSValue {
    let status = match &rt.status {
        ReleaseStatus::Unresolved => "unresolved",
        ReleaseStatus::ResolvedEmpty(_) => "resolvedEmpty",
        ReleaseStatus::ResolvedWithData(_, _) => "resolvedWithData",
    };
    let mut m: JSMap<String, JSValue> = JSMap::new();
    m.insert("release".to_string(), json!(rt.release));
    m.insert("status".to_string(), json!(status));
    if let Some(col) = rt.column() {
        m.insert("column".to_string(), json!(col.header));
        m.insert("matchedBy".to_string(), json!(col.tier.label()));
    }
    m.insert("responseCount".to_string(), json!(rt.response_count()));
    JSValue::Object(m)
}

fn trend_series_to_json(series: &TrendSeries) -> JSValue {
    // Arrays keep the releases in chronological order.
    let trends: Vec<JSValue> = series
        .trends()
        .iter()
        .map(|(release, pcts)| json!({"release": release, "percentages": percentages_to_json(pcts)}))
        .collect();
    let counts: Vec<JSValue> = series
        .response_counts()
        .iter()
        .map(|(release, count)| json!({"release": release, "count": count}))
        .collect();
    let releases: Vec<JSValue> = series.releases.iter().map(release_trend_to_json).collect();
    json!({
        "question": series.question,
        "trends": trends,
        "responseCounts": counts,
        "releases": releases,
    })
}

fn director_slices_to_json(slices: &[DirectorSlice]) -> Vec<JSValue> {
    slices
        .iter()
        .map(|s| {
            json!({
                "director": s.director,
                "responseCount": s.distribution.total,
                "percentages": percentages_to_json(&s.distribution.percentages),
            })
        })
        .collect()
}

fn participation_to_json(
    release: &str,
    dataset: &ReleaseDataset,
    options: &TrendOptions,
    headcounts: &HeadcountTable,
) -> JSValue {
    let directors: Vec<JSValue> = respondents_by_director(dataset, options)
        .iter()
        .map(|(director, responses)| {
            json!({
                "director": director,
                "responses": responses,
                "headcount": headcounts.get(release, director),
                "participation": headcounts.participation(release, director, *responses),
            })
        })
        .collect();
    json!({"release": release, "directors": directors})
}

/// What goes into a summary.
pub struct SummaryRequest<'a> {
    pub dashboard_name: &'a str,
    pub questions: &'a [String],
    pub director: Option<&'a str>,
    pub options: &'a TrendOptions,
    pub headcounts: &'a HeadcountTable,
}

pub fn build_summary_js(request: &SummaryRequest, releases: &ReleaseCollection) -> JSValue {
    let options = request.options;
    let catalogue = question_catalogue(releases);
    let questions: Vec<String> = if request.questions.is_empty() {
        info!("build_summary_js: no question requested, using all the questions found");
        catalogue.iter().map(|e| e.question.clone()).collect()
    } else {
        request.questions.to_vec()
    };
    let latest = releases.latest();

    let mut questions_js: Vec<JSValue> = Vec::new();
    for question in questions.iter() {
        let series = compute_trends(releases, question, options);
        let mut js = trend_series_to_json(&series);
        if let Some(director) = request.director {
            let dseries = compute_director_trends(releases, question, director, options);
            let mut djs = trend_series_to_json(&dseries);
            djs["name"] = json!(director);
            js["director"] = djs;
            if let Some((release, dataset)) = latest {
                let slices = director_breakdown(dataset, question, options);
                js["directorBreakdown"] = json!({
                    "release": release,
                    "directors": director_slices_to_json(&slices),
                });
            }
        }
        questions_js.push(js);
    }

    let releases_js: Vec<JSValue> = releases
        .chronological()
        .iter()
        .map(|(release, dataset)| json!({"release": release, "rows": dataset.len()}))
        .collect();
    let catalogue_js: Vec<JSValue> = catalogue
        .iter()
        .map(|e| json!({"question": e.question, "releases": e.releases}))
        .collect();

    let mut summary = json!({
        "dashboard": request.dashboard_name,
        "releases": releases_js,
        "directors": list_directors(releases, options),
        "questions": questions_js,
        "catalogue": catalogue_js,
    });
    if !request.headcounts.is_empty() {
        if let Some((release, dataset)) = latest {
            summary["participation"] =
                participation_to_json(release, dataset, options, request.headcounts);
        }
    }
    summary
}

fn config_root(config_path: &str) -> DashResult<PathBuf> {
    let root = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    Ok(root.to_path_buf())
}

fn resolve_path(root: &Path, file_path: &str) -> String {
    let p = Path::new(file_path);
    if p.is_absolute() {
        file_path.to_string()
    } else {
        root.join(p).display().to_string()
    }
}

/// The exports to read: the sources of the configuration, then the --input files.
fn collect_sources(args: &Args, config: &DashConfig, root: &Path) -> DashResult<Vec<ReleaseSource>> {
    let mut sources: Vec<ReleaseSource> = config
        .release_sources
        .iter()
        .map(|s| ReleaseSource {
            file_path: resolve_path(root, &s.file_path),
            ..s.clone()
        })
        .collect();
    for input in args.input.iter() {
        let provider = match &args.input_type {
            Some(t) => t.clone(),
            None => match guess_provider(input) {
                Some(p) => p.to_string(),
                None => {
                    return UnknownInputTypeSnafu {
                        input_type: "",
                        path: input.as_str(),
                    }
                    .fail()
                }
            },
        };
        sources.push(ReleaseSource {
            provider,
            file_path: input.clone(),
            release_key: args.release.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        });
    }
    Ok(sources)
}

fn trend_options(args: &Args, config: &DashConfig) -> DashResult<TrendOptions> {
    let mut options = config.trend_options()?;
    if let Some(t) = args.token_threshold {
        if !valid_threshold(t) {
            whatever!("--token-threshold must be above 0 and at most 1, got {}", t)
        }
        options.trend_matching.token_overlap_threshold = t;
    }
    if args.no_token_overlap {
        options.trend_matching.tiers = EnabledTiers::WITHOUT_TOKEN_OVERLAP;
    }
    Ok(options)
}

/// Where the summary goes. None stands for the standard output.
fn output_path(args: &Args, config: &DashConfig, root: &Path) -> Option<PathBuf> {
    match args.out.as_deref() {
        Some("stdout") | Some("") => None,
        Some(p) => Some(PathBuf::from(p)),
        None => config.output_settings.output_directory.as_ref().map(|dir| {
            Path::new(&resolve_path(root, dir)).join(format!(
                "{}_summary.json",
                config.output_settings.dashboard_name
            ))
        }),
    }
}

fn write_output(path: &Path, contents: &str) -> DashResult<()> {
    let p = path.display().to_string();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).context(WritingOutputSnafu { path: p.clone() })?;
        }
    }
    fs::write(path, contents).context(WritingOutputSnafu { path: p.clone() })?;
    info!("Summary written to {:?}", p);
    Ok(())
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let (config, root) = match &args.config {
        Some(config_path) => (read_config(config_path)?, config_root(config_path)?),
        None => (DashConfig::default(), PathBuf::new()),
    };
    info!("config: {:?}", config);

    let sources = collect_sources(args, &config, &root)?;
    if sources.is_empty() {
        whatever!("No survey export to read: use --input or the releaseSources of --config")
    }
    let options = trend_options(args, &config)?;
    let headcounts = config.headcount_table();
    let questions: Vec<String> = if args.question.is_empty() {
        config.questions.clone()
    } else {
        args.question.clone()
    };

    let mut dashboard = Dashboard::new(sources, SystemClock);
    let releases = dashboard.releases()?;
    let request = SummaryRequest {
        dashboard_name: config.output_settings.dashboard_name.as_str(),
        questions: &questions,
        director: args.director.as_deref(),
        options: &options,
        headcounts: &headcounts,
    };
    let result_js = build_summary_js(&request, &releases);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match output_path(args, &config, &root) {
        Some(p) => write_output(&p, &pretty_js_stats)?,
        None => println!("{}", pretty_js_stats),
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }
    Ok(())
}
