use clap::Parser;

/// Converts Kentucky election result text into OpenElections CSV files.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON run configuration describing the election, the
    /// input files and the candidate column order. For the format, read the
    /// documentation in the README.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path or empty) If specified, only this input file is processed,
    /// overriding the file path of the first source in the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (directory path or empty) If specified, the output CSV is written to
    /// this directory, overriding the output directory in the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference CSV file. If provided, oeky will check that
    /// the produced output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
