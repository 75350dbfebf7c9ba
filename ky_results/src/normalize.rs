//! Cleanup of raw candidate, party and office strings.
//!
//! The tables in this module are process-wide and immutable. Callers that
//! need custom mappings (for example the candidate-to-party table that the
//! certified recaps do not carry) pass overrides into [Normalizer] instead
//! of mutating shared state.

use std::collections::HashMap;

use once_cell::sync::Lazy;

// Canonical party codes, keyed by every spelling observed in the source
// material: single letters from "(R)" markers, the three-letter codes
// themselves, and the spelled-out party names.
const PARTY_SPELLINGS: [(&str, &str); 27] = [
    ("R", "REP"),
    ("REP", "REP"),
    ("REPUBLICAN", "REP"),
    ("D", "DEM"),
    ("DEM", "DEM"),
    ("DEMOCRAT", "DEM"),
    ("DEMOCRATIC", "DEM"),
    ("L", "LIB"),
    ("LIB", "LIB"),
    ("LIBERTARIAN", "LIB"),
    ("I", "IND"),
    ("IND", "IND"),
    ("INDEPENDENT", "IND"),
    ("G", "GRN"),
    ("GRN", "GRN"),
    ("GREEN", "GRN"),
    ("C", "CON"),
    ("CON", "CON"),
    ("CONSTITUTION", "CON"),
    ("REF", "REF"),
    ("REFORM", "REF"),
    ("NAT", "NAT"),
    ("PSL", "PSL"),
    ("ASP", "ASP"),
    ("W", "WI"),
    ("WI", "WI"),
    ("WRITE-IN", "WI"),
];

// Office phrases the converter knows how to canonicalize. Anything not in
// this table passes through unchanged so that new offices degrade gracefully.
const OFFICE_SYNONYMS: [(&str, &str); 31] = [
    ("PRES", "President"),
    ("PRESIDENT", "President"),
    ("PRESIDENTIAL", "President"),
    ("PRESIDENT AND VICE PRESIDENT", "President"),
    ("PRESIDENT AND VICE PRESIDENT OF THE UNITED STATES", "President"),
    ("US SENATE", "U.S. Senate"),
    ("U.S. SENATE", "U.S. Senate"),
    ("US SENATOR", "U.S. Senate"),
    ("UNITED STATES SENATOR", "U.S. Senate"),
    ("US HOUSE", "U.S. House"),
    ("U.S. HOUSE", "U.S. House"),
    ("US REPRESENTATIVE", "U.S. House"),
    ("U.S. REPRESENTATIVE", "U.S. House"),
    ("UNITED STATES REPRESENTATIVE", "U.S. House"),
    ("GOV", "Governor"),
    ("GOVERNOR", "Governor"),
    ("GOVERNOR AND LIEUTENANT GOVERNOR", "Governor"),
    ("SEC OF STATE", "Secretary of State"),
    ("SECRETARY OF STATE", "Secretary of State"),
    ("ATTY GENERAL", "Attorney General"),
    ("ATTORNEY GENERAL", "Attorney General"),
    ("AUDITOR", "Auditor"),
    ("AUDITOR OF PUBLIC ACCOUNTS", "Auditor"),
    ("TREASURER", "State Treasurer"),
    ("STATE TREASURER", "State Treasurer"),
    ("AG COMMISSIONER", "Commissioner of Agriculture"),
    ("AGRICULTURE COMMISSIONER", "Commissioner of Agriculture"),
    ("COMMISSIONER OF AGRICULTURE", "Commissioner of Agriculture"),
    ("STATE SENATOR", "State Senate"),
    ("STATE SENATE", "State Senate"),
    ("STATE REPRESENTATIVE", "State House"),
];

static PARTY_BY_SPELLING: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| PARTY_SPELLINGS.iter().copied().collect());

static OFFICE_BY_PHRASE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| OFFICE_SYNONYMS.iter().copied().collect());

/// Maps any known spelling of a party to its canonical code.
pub fn party_code(raw: &str) -> Option<&'static str> {
    PARTY_BY_SPELLING
        .get(raw.trim().to_uppercase().as_str())
        .copied()
}

/// A candidate name with any embedded party marker removed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CleanedCandidate {
    pub name: String,
    /// The party inferred from a marker in the raw name, if one was present.
    pub party: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    party_overrides: HashMap<String, String>,
    office_overrides: HashMap<String, String>,
}

impl Normalizer {
    pub fn new() -> Normalizer {
        Normalizer::default()
    }

    /// Registers a candidate-name to party-code mapping, consulted when the
    /// raw name carries no marker and the caller supplied no explicit party.
    pub fn with_party_override(mut self, candidate: &str, party: &str) -> Normalizer {
        self.party_overrides
            .insert(candidate.to_uppercase(), party.to_string());
        self
    }

    /// Registers an office phrase mapping checked before the built-in table.
    pub fn with_office_override(mut self, phrase: &str, office: &str) -> Normalizer {
        self.office_overrides
            .insert(phrase.trim().to_uppercase(), office.to_string());
        self
    }

    /// Strips a party marker from a raw candidate name.
    ///
    /// Three marker shapes occur in the source material: a trailing
    /// parenthesized code `Jo Jorgensen (LIB)`, a trailing dash form
    /// `Jo Jorgensen - LIB`, and a trailing spelled-out party word.
    /// If no marker is found, the party comes from the override table.
    pub fn clean_candidate(&self, raw: &str) -> CleanedCandidate {
        let collapsed = collapse_whitespace(raw);

        if let Some(open) = collapsed.rfind('(') {
            if collapsed.ends_with(')') {
                let inner = &collapsed[open + 1..collapsed.len() - 1];
                if let Some(code) = party_code(inner) {
                    return CleanedCandidate {
                        name: collapse_whitespace(&collapsed[..open]),
                        party: Some(code.to_string()),
                    };
                }
            }
        }

        if let Some(dash) = collapsed.rfind(" - ") {
            if let Some(code) = party_code(&collapsed[dash + 3..]) {
                return CleanedCandidate {
                    name: collapse_whitespace(&collapsed[..dash]),
                    party: Some(code.to_string()),
                };
            }
        }

        if let Some(space) = collapsed.rfind(' ') {
            let last = &collapsed[space + 1..];
            // Only the long spelled-out words act as markers here. A trailing
            // initial like "R" or a surname like "Green" stays in the name.
            if last.len() >= 6 {
                if let Some(code) = party_code(last) {
                    return CleanedCandidate {
                        name: collapse_whitespace(&collapsed[..space]),
                        party: Some(code.to_string()),
                    };
                }
            }
        }

        let party = self
            .party_overrides
            .get(collapsed.to_uppercase().as_str())
            .cloned();
        CleanedCandidate {
            name: collapsed,
            party,
        }
    }

    /// Maps an office phrase to its canonical label.
    ///
    /// Unknown phrases are returned trimmed but otherwise unchanged, never
    /// rejected: the pipeline must keep working for offices it has not seen.
    pub fn canonical_office(&self, raw: &str) -> String {
        let trimmed = collapse_whitespace(raw);
        let up = trimmed.to_uppercase();
        if let Some(office) = self.office_overrides.get(up.as_str()) {
            return office.clone();
        }
        match OFFICE_BY_PHRASE.get(up.as_str()) {
            Some(office) => office.to_string(),
            None => trimmed,
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}
