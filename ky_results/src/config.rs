// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A candidate descriptor supplied by the caller.
///
/// The order of the descriptor list given to [crate::run_extraction] is the
/// positional binding order: descriptor `i` receives numeric token `i` of
/// every county row. Extraction is only correct when the caller lists the
/// candidates in true left-to-right column order of the source table; this
/// is a documented precondition, not something the pipeline can infer.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateSpec {
    pub name: String,
    /// Canonical party code. When absent, a party marker embedded in the
    /// name (or a normalizer override) is used instead.
    pub party: Option<String>,
    pub office: String,
    pub district: Option<String>,
}

/// Knobs for the advisory validation checks.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExtractionOptions {
    /// Fewer matched counties than this triggers a coverage warning.
    pub coverage_warning_threshold: usize,
    /// Fewer candidates than this for an office triggers a warning.
    pub min_candidates_per_office: usize,
    /// Free-form label describing how the input text was produced
    /// (for example "pdftotext" or "sbe-recap"). Carried into the result.
    pub strategy: String,
}

impl ExtractionOptions {
    pub const DEFAULT: ExtractionOptions = ExtractionOptions {
        coverage_warning_threshold: 100,
        min_candidates_per_office: 2,
        strategy: String::new(),
    };
}

impl Default for ExtractionOptions {
    fn default() -> ExtractionOptions {
        ExtractionOptions::DEFAULT
    }
}

// ******** Output data structures *********

/// One output row: the aggregate for a (county, candidate) pair.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRecord {
    /// Canonical registry name.
    pub county: String,
    pub office: String,
    pub district: String,
    pub candidate: String,
    pub party: String,
    pub votes: u64,
}

/// An advisory finding from the validator. Warnings never block emission.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ValidationWarning {
    /// Canonical counties with no record at all.
    MissingCounties(Vec<String>),
    /// County coverage fell below the configured threshold.
    LowCountyCoverage { found: usize, threshold: usize },
    /// An office with suspiciously few candidates bound to it.
    ThinCandidateField { office: String, count: usize },
    /// A candidate with no nonzero vote anywhere, which usually means the
    /// descriptor list was given in the wrong column order.
    AllZeroCandidate(String),
    /// A recognized county row that carried no numeric tokens; the row was
    /// omitted from the output.
    EmptyCountyRow { county: String, lineno: usize },
}

impl Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::MissingCounties(names) => {
                write!(
                    f,
                    "no results for {} counties: {}",
                    names.len(),
                    names.join(", ")
                )
            }
            ValidationWarning::LowCountyCoverage { found, threshold } => write!(
                f,
                "county coverage is low: {} of {} (warning threshold {})",
                found,
                crate::counties::NUM_COUNTIES,
                threshold
            ),
            ValidationWarning::ThinCandidateField { office, count } => {
                write!(f, "only {} candidate(s) for office {}", count, office)
            }
            ValidationWarning::AllZeroCandidate(name) => write!(
                f,
                "candidate {} has zero votes everywhere; check the column order",
                name
            ),
            ValidationWarning::EmptyCountyRow { county, lineno } => {
                write!(
                    f,
                    "county row for {} on line {} has no numbers",
                    county, lineno
                )
            }
        }
    }
}

/// The outcome of one extraction run. Built fresh per input, discarded after
/// serialization; only the CSV form persists.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExtractionResult {
    pub records: Vec<VoteRecord>,
    pub counties_found: usize,
    pub candidates_found: usize,
    pub total_votes: u64,
    /// Number of (county, candidate) key collisions that were summed.
    pub merged_record_count: usize,
    /// County rows dropped because their token count did not match the
    /// candidate list length.
    pub excluded_line_count: usize,
    /// Lines that did not look like county rows at all.
    pub skipped_line_count: usize,
    pub strategy: String,
    pub warnings: Vec<ValidationWarning>,
}

/// Errors that prevent extraction from producing a result.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ExtractionErrors {
    /// The caller supplied an empty candidate list.
    NoCandidates,
    /// No county row survived parsing and binding. This is fatal for the
    /// input: it signals malformed text or wrong county assumptions.
    NoRecords,
}

impl Error for ExtractionErrors {}

impl Display for ExtractionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionErrors::NoCandidates => write!(f, "no candidates were supplied"),
            ExtractionErrors::NoRecords => write!(f, "no vote records could be extracted"),
        }
    }
}
