//! Deterministic extraction of county-level election results from
//! linearized table text.
//!
//! The pipeline is synchronous and owns no I/O: the caller hands it the
//! lines of one input file, an ordered candidate list describing the table
//! columns, and receives one [VoteRecord] per (county, candidate) pair plus
//! advisory validation warnings.
//!
//! ```
//! use ky_results::{run_extraction, CandidateSpec, ExtractionOptions};
//!
//! let lines = vec![
//!     "Adair 7,643 1,257".to_string(),
//!     "Allen 7,824 1,505".to_string(),
//! ];
//! let candidates = vec![
//!     CandidateSpec {
//!         name: "Donald J. Trump".to_string(),
//!         party: Some("REP".to_string()),
//!         office: "President".to_string(),
//!         district: None,
//!     },
//!     CandidateSpec {
//!         name: "Kamala Harris".to_string(),
//!         party: Some("DEM".to_string()),
//!         office: "President".to_string(),
//!         district: None,
//!     },
//! ];
//! let res = run_extraction(&lines, &candidates, &ExtractionOptions::DEFAULT)?;
//! assert_eq!(res.records.len(), 4);
//! # Ok::<(), ky_results::ExtractionErrors>(())
//! ```

mod config;
pub mod counties;
pub mod normalize;
pub mod parse;

use std::collections::HashMap;

use log::{debug, info, warn};

pub use crate::config::*;
use crate::counties::CountyId;
use crate::normalize::Normalizer;
use crate::parse::parse_line;

// **** Private structures ****

/// A candidate after normalization, ready for binding.
#[derive(Eq, PartialEq, Debug, Clone)]
struct BoundCandidate {
    name: String,
    party: String,
    office: String,
    district: String,
}

/// Key of one output aggregate: a county and a position in the candidate
/// list. Positional on purpose; there is no content-based matching between
/// numeric values and candidates.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
struct RecordKey {
    county: CountyId,
    candidate: usize,
}

/// Runs the extraction pipeline with a default [Normalizer].
pub fn run_extraction(
    lines: &[String],
    candidates: &[CandidateSpec],
    options: &ExtractionOptions,
) -> Result<ExtractionResult, ExtractionErrors> {
    run_extraction_with(lines, candidates, &Normalizer::new(), options)
}

/// Runs the extraction pipeline with caller-supplied normalizer overrides.
///
/// The candidate list order is the column binding order; see
/// [CandidateSpec]. Lines that do not bind cleanly are dropped and counted,
/// never truncated or padded.
pub fn run_extraction_with(
    lines: &[String],
    candidates: &[CandidateSpec],
    normalizer: &Normalizer,
    options: &ExtractionOptions,
) -> Result<ExtractionResult, ExtractionErrors> {
    if candidates.is_empty() {
        return Err(ExtractionErrors::NoCandidates);
    }
    let bound = normalize_candidates(candidates, normalizer);
    info!(
        "Processing {} lines against {} candidates for office(s) {:?}",
        lines.len(),
        bound.len(),
        offices(&bound)
    );

    let n = bound.len();
    let mut tallies: HashMap<RecordKey, u64> = HashMap::new();
    let mut order: Vec<RecordKey> = Vec::new();
    let mut warnings: Vec<ValidationWarning> = Vec::new();
    let mut merged_record_count: usize = 0;
    let mut excluded_line_count: usize = 0;
    let mut skipped_line_count: usize = 0;

    for (idx, line) in lines.iter().enumerate() {
        let lineno = idx + 1;
        let cl = match parse_line(line, lineno) {
            Some(cl) => cl,
            None => {
                // Headers, footers, totals. Only interesting in verbose runs.
                debug!("line {}: no county row: {:?}", lineno, line);
                skipped_line_count += 1;
                continue;
            }
        };
        if cl.votes.is_empty() {
            warn!(
                "line {}: county row for {} has no numeric tokens, omitting",
                lineno,
                cl.county.name()
            );
            warnings.push(ValidationWarning::EmptyCountyRow {
                county: cl.county.name().to_string(),
                lineno,
            });
            continue;
        }
        if cl.votes.len() != n {
            warn!(
                "line {}: {} tokens for {} candidates, excluding row for {}",
                lineno,
                cl.votes.len(),
                n,
                cl.county.name()
            );
            excluded_line_count += 1;
            continue;
        }
        for (i, v) in cl.votes.iter().enumerate() {
            let key = RecordKey {
                county: cl.county,
                candidate: i,
            };
            match tallies.get_mut(&key) {
                Some(existing) => {
                    // Continuation of a county over a page break: sum, never
                    // overwrite.
                    *existing += *v;
                    merged_record_count += 1;
                }
                None => {
                    tallies.insert(key, *v);
                    order.push(key);
                }
            }
        }
    }

    let records: Vec<VoteRecord> = order
        .iter()
        .map(|key| {
            let c = &bound[key.candidate];
            VoteRecord {
                county: key.county.name().to_string(),
                office: c.office.clone(),
                district: c.district.clone(),
                candidate: c.name.clone(),
                party: c.party.clone(),
                votes: tallies[key],
            }
        })
        .collect();

    if records.is_empty() {
        return Err(ExtractionErrors::NoRecords);
    }

    let counties_found = {
        let mut ids: Vec<CountyId> = order.iter().map(|k| k.county).collect();
        ids.sort();
        ids.dedup();
        ids.len()
    };
    let total_votes: u64 = records.iter().map(|r| r.votes).sum();

    validate(&bound, &tallies, counties_found, options, &mut warnings);

    info!(
        "Extracted {} records, {} counties, {} total votes ({} merged, {} excluded, {} skipped)",
        records.len(),
        counties_found,
        total_votes,
        merged_record_count,
        excluded_line_count,
        skipped_line_count
    );

    Ok(ExtractionResult {
        records,
        counties_found,
        candidates_found: bound.len(),
        total_votes,
        merged_record_count,
        excluded_line_count,
        skipped_line_count,
        strategy: options.strategy.clone(),
        warnings,
    })
}

fn normalize_candidates(candidates: &[CandidateSpec], normalizer: &Normalizer) -> Vec<BoundCandidate> {
    candidates
        .iter()
        .map(|spec| {
            let cleaned = normalizer.clean_candidate(&spec.name);
            let party = cleaned
                .party
                .or_else(|| {
                    spec.party.as_deref().map(|p| {
                        normalize::party_code(p)
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| p.trim().to_string())
                    })
                })
                .unwrap_or_default();
            BoundCandidate {
                name: cleaned.name,
                party,
                office: normalizer.canonical_office(&spec.office),
                district: spec.district.clone().unwrap_or_default(),
            }
        })
        .collect()
}

fn offices(bound: &[BoundCandidate]) -> Vec<&str> {
    let mut res: Vec<&str> = bound.iter().map(|c| c.office.as_str()).collect();
    res.sort();
    res.dedup();
    res
}

/// Advisory checks over the final record set. Only annotates; the records
/// themselves are never touched here.
fn validate(
    bound: &[BoundCandidate],
    tallies: &HashMap<RecordKey, u64>,
    counties_found: usize,
    options: &ExtractionOptions,
    warnings: &mut Vec<ValidationWarning>,
) {
    let found: std::collections::HashSet<CountyId> =
        tallies.keys().map(|k| k.county).collect();
    let missing: Vec<String> = (0..counties::NUM_COUNTIES as u16)
        .map(CountyId)
        .filter(|id| !found.contains(id))
        .map(|id| id.name().to_string())
        .collect();
    if !missing.is_empty() {
        warnings.push(ValidationWarning::MissingCounties(missing));
    }
    if counties_found < options.coverage_warning_threshold {
        warnings.push(ValidationWarning::LowCountyCoverage {
            found: counties_found,
            threshold: options.coverage_warning_threshold,
        });
    }

    let mut per_office: HashMap<&str, usize> = HashMap::new();
    for c in bound.iter() {
        *per_office.entry(c.office.as_str()).or_insert(0) += 1;
    }
    let mut thin: Vec<(&str, usize)> = per_office
        .into_iter()
        .filter(|(_, count)| *count < options.min_candidates_per_office)
        .collect();
    thin.sort();
    for (office, count) in thin {
        warnings.push(ValidationWarning::ThinCandidateField {
            office: office.to_string(),
            count,
        });
    }

    for (i, c) in bound.iter().enumerate() {
        let has_nonzero = tallies
            .iter()
            .any(|(k, v)| k.candidate == i && *v > 0);
        if !has_nonzero {
            warnings.push(ValidationWarning::AllZeroCandidate(c.name.clone()));
        }
    }
}
