use clap::Parser;

/// Trends of the answers to a recurring retrospective survey, release after release.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the releases to load, the questions to
    /// analyze and the director headcounts. See the manual for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference summary in JSON format. If provided, retrodash will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file paths) Survey exports to load. May be repeated. Adds to the sources of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Vec<String>,

    /// (xlsx or csv) The type of the inputs. By default, it is guessed from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (release name, optional) The release of the --input files, for example 'August 2024'.
    /// By default, it is derived from each file name.
    #[clap(long, value_parser)]
    pub release: Option<String>,

    /// (question, may be repeated) The questions to analyze. Replaces the questions of the --config option.
    #[clap(short, long, value_parser)]
    pub question: Vec<String>,

    /// (director name, optional) If specified, the trends are also computed for the respondents
    /// of this director only.
    #[clap(short, long, value_parser)]
    pub director: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (number above 0 and at most 1, default 0.3) The minimum share of the words of a question
    /// that must appear in a header for a loose match.
    #[clap(long, value_parser)]
    pub token_threshold: Option<f64>,

    /// If passed as an argument, questions are only matched on their full text.
    #[clap(long, takes_value = false)]
    pub no_token_overlap: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
