//! The JSON run-configuration file.
//!
//! One configuration describes one election: the output naming settings and
//! the list of input text files with their candidate column orders. The
//! candidate order of each source is treated as ground truth for the
//! left-to-right column order of the underlying table.

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use ky_results::CandidateSpec;

use crate::conv::ConvResult;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ElectionType {
    General,
    Primary,
    Special,
}

impl ElectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionType::General => "general",
            ElectionType::Primary => "primary",
            ElectionType::Special => "special",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputLevel {
    County,
    Precinct,
}

impl OutputLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputLevel::County => "county",
            OutputLevel::Precinct => "precinct",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "electionDate")]
    pub election_date: String,
    #[serde(rename = "electionType")]
    pub election_type: String,
    pub level: Option<String>,
}

impl OutputSettings {
    pub fn election_type(&self) -> ConvResult<ElectionType> {
        match self.election_type.as_str() {
            "general" => Ok(ElectionType::General),
            "primary" => Ok(ElectionType::Primary),
            "special" => Ok(ElectionType::Special),
            x => whatever!("unknown election type {:?} (expected general, primary or special)", x),
        }
    }

    pub fn level(&self) -> ConvResult<OutputLevel> {
        match self.level.as_deref() {
            None | Some("county") => Ok(OutputLevel::County),
            Some("precinct") => {
                whatever!("precinct-level output is not implemented; use level \"county\"")
            }
            Some(x) => whatever!("unknown output level {:?}", x),
        }
    }

    /// The election date, validated as YYYYMMDD.
    pub fn election_date(&self) -> ConvResult<&str> {
        let d = self.election_date.as_str();
        if d.len() != 8 || !d.chars().all(|c| c.is_ascii_digit()) {
            whatever!("election date {:?} is not in YYYYMMDD form", d);
        }
        Ok(d)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub name: String,
    pub party: Option<String>,
    /// Falls back to the source-level office when absent.
    pub office: Option<String>,
    pub district: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResultFileSource {
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub office: Option<String>,
    pub district: Option<String>,
    /// Free-form label for how the text was produced (e.g. "pdftotext").
    pub strategy: Option<String>,
    /// In true left-to-right column order of the source table.
    pub candidates: Vec<CandidateEntry>,
}

impl ResultFileSource {
    pub fn candidate_specs(&self) -> ConvResult<Vec<CandidateSpec>> {
        let mut specs: Vec<CandidateSpec> = Vec::new();
        for c in self.candidates.iter() {
            let office = match c.office.clone().or_else(|| self.office.clone()) {
                Some(o) => o,
                None => whatever!(
                    "candidate {:?} in source {} has no office (set it on the source or the candidate)",
                    c.name,
                    self.file_path
                ),
            };
            specs.push(CandidateSpec {
                name: c.name.clone(),
                party: c.party.clone(),
                office,
                district: c.district.clone().or_else(|| self.district.clone()),
            });
        }
        Ok(specs)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConvConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "resultFileSources")]
    pub result_file_sources: Vec<ResultFileSource>,
}

/// The OpenElections file naming convention.
pub fn output_file_name(date: &str, election_type: ElectionType, level: OutputLevel) -> String {
    format!(
        "{}__ky__{}__{}.csv",
        date,
        election_type.as_str(),
        level.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(ty: &str, level: Option<&str>) -> OutputSettings {
        OutputSettings {
            output_directory: None,
            election_date: "20201103".to_string(),
            election_type: ty.to_string(),
            level: level.map(|s| s.to_string()),
        }
    }

    #[test]
    fn file_naming_follows_the_convention() {
        assert_eq!(
            output_file_name("20201103", ElectionType::General, OutputLevel::County),
            "20201103__ky__general__county.csv"
        );
        assert_eq!(
            output_file_name("20230523", ElectionType::Primary, OutputLevel::County),
            "20230523__ky__primary__county.csv"
        );
    }

    #[test]
    fn election_types_parse() {
        assert_eq!(
            settings("general", None).election_type().unwrap(),
            ElectionType::General
        );
        assert_eq!(
            settings("special", None).election_type().unwrap(),
            ElectionType::Special
        );
        assert!(settings("runoff", None).election_type().is_err());
    }

    #[test]
    fn level_defaults_to_county_and_rejects_precinct() {
        assert_eq!(settings("general", None).level().unwrap(), OutputLevel::County);
        assert_eq!(
            settings("general", Some("county")).level().unwrap(),
            OutputLevel::County
        );
        assert!(settings("general", Some("precinct")).level().is_err());
    }

    #[test]
    fn bad_dates_are_rejected() {
        let mut s = settings("general", None);
        s.election_date = "2020-11-03".to_string();
        assert!(s.election_date().is_err());
        s.election_date = "20201103".to_string();
        assert_eq!(s.election_date().unwrap(), "20201103");
    }

    #[test]
    fn source_office_applies_to_candidates_without_one() {
        let source = ResultFileSource {
            file_path: "pres.txt".to_string(),
            office: Some("President".to_string()),
            district: None,
            strategy: None,
            candidates: vec![
                CandidateEntry {
                    name: "A".to_string(),
                    party: Some("REP".to_string()),
                    office: None,
                    district: None,
                },
                CandidateEntry {
                    name: "B".to_string(),
                    party: Some("DEM".to_string()),
                    office: Some("Governor".to_string()),
                    district: None,
                },
            ],
        };
        let specs = source.candidate_specs().unwrap();
        assert_eq!(specs[0].office, "President");
        assert_eq!(specs[1].office, "Governor");
    }

    #[test]
    fn missing_office_everywhere_is_an_error() {
        let source = ResultFileSource {
            file_path: "pres.txt".to_string(),
            office: None,
            district: None,
            strategy: None,
            candidates: vec![CandidateEntry {
                name: "A".to_string(),
                party: None,
                office: None,
                district: None,
            }],
        };
        assert!(source.candidate_specs().is_err());
    }
}
