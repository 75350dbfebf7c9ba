use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use ky_results::{run_extraction, ExtractionOptions, ExtractionResult};
use text_diff::print_diff;

use crate::args::Args;
use crate::conv::config_reader::*;

pub mod config_reader;

/// The OpenElections county-level column schema. The channel-breakdown
/// columns after `votes` stay blank when the source does not distinguish
/// voting channels, which is the case for all the certified recap files.
pub const COUNTY_HEADERS: [&str; 13] = [
    "county",
    "office",
    "district",
    "candidate",
    "party",
    "votes",
    "election_day",
    "absentee",
    "av_counting_boards",
    "early_voting",
    "mail",
    "provisional",
    "pre_process_absentee",
];

#[derive(Debug, Snafu)]
pub enum ConvError {
    #[snafu(display("Error opening config file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing config file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error reading input file {path}"))]
    ReadingInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing output file {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error creating output directory {path}"))]
    CreatingOutputDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Extraction produced nothing usable for {path}: {source}"))]
    Extraction {
        source: ky_results::ExtractionErrors,
        path: String,
    },
    #[snafu(display("Output differs from the reference file {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display(""))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ConvResult<T> = Result<T, ConvError>;

/// Outcome of one batch run, for exit-status decisions in `main`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BatchSummary {
    pub sources_processed: usize,
    pub sources_failed: usize,
    pub records_written: usize,
    pub output_path: Option<PathBuf>,
}

/// Processes every file source of the run configuration and writes the
/// combined OpenElections CSV.
///
/// Each source is isolated: a failure (unreadable file, zero records) is
/// reported and the batch continues with the remaining sources.
pub fn run_batch(args: &Args) -> ConvResult<BatchSummary> {
    let config_path = args.config.clone();
    let config_p = Path::new(config_path.as_str());
    let config_str = fs::read_to_string(config_path.clone()).context(OpeningConfigSnafu {
        path: config_path.clone(),
    })?;
    let mut config: ConvConfig = serde_json::from_str(&config_str).context(ParsingConfigSnafu {
        path: config_path.clone(),
    })?;
    debug!("config: {:?}", config);

    // Validate the output settings before doing any work.
    let election_type = config.output_settings.election_type()?;
    let level = config.output_settings.level()?;
    let date = config.output_settings.election_date()?.to_string();

    if config.result_file_sources.is_empty() {
        whatever!("the config file lists no result file sources");
    }
    if let Some(input_override) = args.input.clone() {
        config.result_file_sources.truncate(1);
        config.result_file_sources[0].file_path = input_override;
    }

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;

    let mut all_records: Vec<ky_results::VoteRecord> = Vec::new();
    let mut sources_failed: usize = 0;
    let num_sources = config.result_file_sources.len();
    for source in config.result_file_sources.iter() {
        match process_source(root_p, source) {
            Ok(res) => {
                all_records.extend(res.records.iter().cloned());
            }
            Err(e) => {
                warn!("source {} failed: {}", source.file_path, e);
                eprintln!("oeky: skipping source {}: {}", source.file_path, e);
                sources_failed += 1;
            }
        }
    }

    let mut output_path = None;
    if !all_records.is_empty() {
        let out_dir = args
            .out
            .clone()
            .or_else(|| config.output_settings.output_directory.clone())
            .unwrap_or_else(|| ".".to_string());
        fs::create_dir_all(&out_dir).context(CreatingOutputDirSnafu {
            path: out_dir.clone(),
        })?;
        let out_p: PathBuf = [
            out_dir,
            output_file_name(&date, election_type, level),
        ]
        .iter()
        .collect();
        write_records(&out_p, &all_records)?;
        println!(
            "Wrote {} ({} records)",
            out_p.as_path().display(),
            all_records.len()
        );

        if let Some(reference) = args.reference.clone() {
            check_reference(&out_p, &reference)?;
        }
        output_path = Some(out_p);
    }

    Ok(BatchSummary {
        sources_processed: num_sources - sources_failed,
        sources_failed,
        records_written: all_records.len(),
        output_path,
    })
}

/// Reads, decodes and extracts one source file.
fn process_source(root_path: &Path, source: &ResultFileSource) -> ConvResult<ExtractionResult> {
    let p: PathBuf = [
        root_path.as_os_str().to_str().unwrap_or(".").to_string(),
        source.file_path.clone(),
    ]
    .iter()
    .collect();
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read result file {:?}", p2);

    let lines = read_lines(&p)?;
    let candidates = source.candidate_specs()?;
    let options = ExtractionOptions {
        strategy: source
            .strategy
            .clone()
            .unwrap_or_else(|| "text-lines".to_string()),
        ..ExtractionOptions::DEFAULT
    };

    let res = run_extraction(&lines, &candidates, &options)
        .context(ExtractionSnafu { path: p2.clone() })?;
    print_report(&p2, &res);
    Ok(res)
}

/// Reads a whole input file as text, decoding UTF-8 with a windows-1252
/// fallback. The recap files older than 2010 are Latin-1 encoded.
fn read_lines(path: &Path) -> ConvResult<Vec<String>> {
    let p = path.display().to_string();
    let bytes = fs::read(path).context(ReadingInputSnafu { path: p.clone() })?;
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            info!("input {} is not valid UTF-8, decoding as windows-1252", p);
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    Ok(text.lines().map(|s| s.to_string()).collect())
}

fn write_records(path: &Path, records: &[ky_results::VoteRecord]) -> ConvResult<()> {
    let p = path.display().to_string();
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu { path: p.clone() })?;
    wtr.write_record(COUNTY_HEADERS)
        .context(WritingCsvSnafu { path: p.clone() })?;
    for r in records {
        wtr.write_record([
            r.county.as_str(),
            r.office.as_str(),
            r.district.as_str(),
            r.candidate.as_str(),
            r.party.as_str(),
            r.votes.to_string().as_str(),
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ])
        .context(WritingCsvSnafu { path: p.clone() })?;
    }
    wtr.flush()
        .map_err(csv::Error::from)
        .context(WritingCsvSnafu { path: p })?;
    Ok(())
}

/// The per-source human-readable summary, in the shape the old conversion
/// scripts printed after each extraction.
fn print_report(path: &str, res: &ExtractionResult) {
    println!("{}:", path);
    println!(
        "  {} records, {}/{} counties, {} candidates, {} total votes",
        res.records.len(),
        res.counties_found,
        ky_results::counties::NUM_COUNTIES,
        res.candidates_found,
        res.total_votes
    );
    if !res.strategy.is_empty() {
        println!("  strategy: {}", res.strategy);
    }
    if res.merged_record_count > 0 {
        println!(
            "  merged {} duplicate (county, candidate) entries",
            res.merged_record_count
        );
    }
    if res.excluded_line_count > 0 {
        println!(
            "  excluded {} malformed line(s) (token count mismatch)",
            res.excluded_line_count
        );
    }
    for w in res.warnings.iter() {
        println!("  warning: {}", w);
    }
}

/// Compares the produced CSV against a reference file, byte for byte after
/// newline normalization.
fn check_reference(produced: &Path, reference: &str) -> ConvResult<()> {
    let produced_str = fs::read_to_string(produced).context(ReadingInputSnafu {
        path: produced.display().to_string(),
    })?;
    let reference_str = fs::read_to_string(reference).context(ReadingInputSnafu {
        path: reference.to_string(),
    })?;
    let a = produced_str.replace("\r\n", "\n");
    let b = reference_str.replace("\r\n", "\n");
    if a != b {
        warn!("Found differences with the reference file");
        print_diff(b.as_str(), a.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference.to_string(),
        }
        .fail();
    }
    info!("Output matches the reference file {}", reference);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn test_dir(name: &str) -> PathBuf {
        let d = temp_dir().join("oeky_tests").join(name);
        fs::create_dir_all(&d).unwrap();
        d
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, contents).unwrap();
        p
    }

    const CONFIG_2020: &str = r#"{
        "outputSettings": {
            "outputDirectory": "out",
            "electionDate": "20201103",
            "electionType": "general",
            "level": "county"
        },
        "resultFileSources": [
            {
                "filePath": "pres.txt",
                "office": "President",
                "candidates": [
                    { "name": "Donald J. Trump", "party": "REP" },
                    { "name": "Joseph R. Biden", "party": "DEM" }
                ]
            }
        ]
    }"#;

    // Tests always override the output directory so that nothing lands in
    // the working directory.
    fn args_for(config: &Path, dir: &Path) -> Args {
        Args {
            config: config.display().to_string(),
            input: None,
            out: Some(dir.join("out").display().to_string()),
            reference: None,
            verbose: false,
        }
    }

    #[test]
    fn batch_writes_named_csv_and_roundtrips() {
        let dir = test_dir("roundtrip");
        write_file(&dir, "pres.txt", "Adair 7,643 1,257\nAllen 7,824 1,505\n");
        let config = write_file(&dir, "run.json", CONFIG_2020);

        let summary = run_batch(&args_for(&config, &dir)).unwrap();
        assert_eq!(summary.sources_failed, 0);
        assert_eq!(summary.records_written, 4);

        let out_p = summary.output_path.unwrap();
        assert_eq!(
            out_p.file_name().unwrap().to_str().unwrap(),
            "20201103__ky__general__county.csv"
        );

        // Re-parse as generic CSV rows: the (county, candidate, votes)
        // triples must survive the round trip.
        let mut rdr = csv::Reader::from_path(&out_p).unwrap();
        assert_eq!(
            rdr.headers().unwrap().iter().collect::<Vec<&str>>(),
            COUNTY_HEADERS.to_vec()
        );
        let triples: Vec<(String, String, u64)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (
                    r[0].to_string(),
                    r[3].to_string(),
                    r[5].parse::<u64>().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            triples,
            vec![
                ("Adair".to_string(), "Donald J. Trump".to_string(), 7643),
                ("Adair".to_string(), "Joseph R. Biden".to_string(), 1257),
                ("Allen".to_string(), "Donald J. Trump".to_string(), 7824),
                ("Allen".to_string(), "Joseph R. Biden".to_string(), 1505),
            ]
        );
    }

    #[test]
    fn failing_source_does_not_stop_the_batch() {
        let dir = test_dir("isolation");
        write_file(&dir, "pres.txt", "Adair 10 20\n");
        // Second source points to a file that does not exist.
        let config_str = CONFIG_2020.replace(
            "\"resultFileSources\": [",
            r#""resultFileSources": [
            {
                "filePath": "missing.txt",
                "office": "Governor",
                "candidates": [
                    { "name": "A", "party": "REP" },
                    { "name": "B", "party": "DEM" }
                ]
            },"#,
        );
        let config = write_file(&dir, "run.json", &config_str);

        let summary = run_batch(&args_for(&config, &dir)).unwrap();
        assert_eq!(summary.sources_failed, 1);
        assert_eq!(summary.sources_processed, 1);
        assert_eq!(summary.records_written, 2);
        assert!(summary.output_path.is_some());
    }

    #[test]
    fn zero_record_source_counts_as_failed() {
        let dir = test_dir("zero_records");
        write_file(&dir, "pres.txt", "NOT A COUNTY 1 2\n");
        let config = write_file(&dir, "run.json", CONFIG_2020);

        let summary = run_batch(&args_for(&config, &dir)).unwrap();
        assert_eq!(summary.sources_failed, 1);
        assert_eq!(summary.records_written, 0);
        assert!(summary.output_path.is_none());
    }

    #[test]
    fn windows_1252_input_is_decoded() {
        let dir = test_dir("latin1");
        // "Adair" followed by a Latin-1 e-acute in a header word.
        let mut bytes = b"R\xe9sultats certifi\xe9s\nAdair 10 20\n".to_vec();
        bytes.push(b'\n');
        let p = dir.join("pres.txt");
        fs::write(&p, &bytes).unwrap();

        let lines = read_lines(&p).unwrap();
        assert_eq!(lines[0], "R\u{e9}sultats certifi\u{e9}s");
        assert_eq!(lines[1], "Adair 10 20");
    }

    #[test]
    fn reference_comparison_accepts_identical_output() {
        let dir = test_dir("reference");
        write_file(&dir, "pres.txt", "Adair 10 20\n");
        let config = write_file(&dir, "run.json", CONFIG_2020);

        let summary = run_batch(&args_for(&config, &dir)).unwrap();
        let out_p = summary.output_path.unwrap();

        let mut args = args_for(&config, &dir);
        args.reference = Some(out_p.display().to_string());
        // Re-running against the previous output as reference must succeed.
        run_batch(&args).unwrap();
    }

    #[test]
    fn unknown_election_type_is_rejected() {
        let dir = test_dir("bad_type");
        write_file(&dir, "pres.txt", "Adair 10 20\n");
        let config_str = CONFIG_2020.replace("general", "runoff");
        let config = write_file(&dir, "run.json", &config_str);
        assert!(run_batch(&args_for(&config, &dir)).is_err());
    }
}
