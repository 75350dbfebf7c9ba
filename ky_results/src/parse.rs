//! Recognition of county result rows in linearized table text.
//!
//! The input is one line of text per county, as produced upstream by a PDF
//! text extractor or found directly in the SBE recap files. This module is
//! agnostic to how the text was produced.

use log::warn;

use crate::counties::{self, CountyId};

/// One recognized county row: the county and the numeric tokens following
/// its name, in left-to-right order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CountyLine {
    pub county: CountyId,
    pub votes: Vec<u64>,
    pub lineno: usize,
}

/// Parses a raw text line into a county row.
///
/// Lines that do not begin with a registry county name are headers, footers
/// or page furniture and yield `None`. Rows labeled `Total` or `Statewide`
/// are also dropped here: they aggregate the county rows and counting them
/// again would double every total.
pub fn parse_line(line: &str, lineno: usize) -> Option<CountyLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(first) = trimmed.split_whitespace().next() {
        if first.eq_ignore_ascii_case("total") || first.eq_ignore_ascii_case("statewide") {
            return None;
        }
    }
    let (county, rest) = counties::match_line_prefix(trimmed)?;
    Some(CountyLine {
        county,
        votes: numeric_tokens(rest),
        lineno,
    })
}

/// Extracts every maximal numeric substring (digits with optional `,`
/// thousands separators) from a piece of text, as integers in order.
///
/// A digit run too long for a 64-bit count is dropped with a warning rather
/// than clamped; the resulting short row is then rejected by the binder.
pub fn numeric_tokens(text: &str) -> Vec<u64> {
    let mut tokens: Vec<u64> = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if c == ',' && !current.is_empty() {
            // A separator only continues a token; a bare comma is ignored.
            continue;
        } else if !current.is_empty() {
            flush_token(&mut tokens, &mut current);
        }
    }
    if !current.is_empty() {
        flush_token(&mut tokens, &mut current);
    }
    tokens
}

fn flush_token(tokens: &mut Vec<u64>, current: &mut String) {
    match current.parse::<u64>() {
        Ok(v) => tokens.push(v),
        Err(_) => warn!("digit run {:?} overflows a 64-bit count, dropping it", current),
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(line: &str) -> Option<Vec<u64>> {
        parse_line(line, 1).map(|cl| cl.votes)
    }

    #[test]
    fn county_row_with_separated_thousands() {
        let cl = parse_line("Adair 7,643 1,257", 3).unwrap();
        assert_eq!(cl.county.name(), "Adair");
        assert_eq!(cl.votes, vec![7643, 1257]);
        assert_eq!(cl.lineno, 3);
    }

    #[test]
    fn tokens_keep_left_to_right_order() {
        assert_eq!(votes("Jefferson 228,258 297,847 8,236 1,460"),
            Some(vec![228258, 297847, 8236, 1460]));
    }

    #[test]
    fn non_county_lines_are_skipped() {
        assert_eq!(votes("CERTIFIED RESULTS 2020 GENERAL ELECTION"), None);
        assert_eq!(votes("County Trump Biden"), None);
        assert_eq!(votes(""), None);
    }

    #[test]
    fn total_and_statewide_rows_are_excluded() {
        assert_eq!(votes("Total 1,326,646 772,474"), None);
        assert_eq!(votes("STATEWIDE 1,326,646 772,474"), None);
        assert_eq!(votes("total 5 5"), None);
    }

    #[test]
    fn county_row_without_numbers_is_empty_not_skipped() {
        let cl = parse_line("Adair", 1).unwrap();
        assert_eq!(cl.county.name(), "Adair");
        assert!(cl.votes.is_empty());
    }

    #[test]
    fn numeric_tokens_handles_stray_text() {
        // Trailing percentages split on the decimal point, which is the
        // documented behavior: the binder rejects the over-long row.
        assert_eq!(numeric_tokens(" 7,643 61.2%"), vec![7643, 61, 2]);
        assert_eq!(numeric_tokens(""), Vec::<u64>::new());
        assert_eq!(numeric_tokens(" , , "), Vec::<u64>::new());
    }

    #[test]
    fn abbreviated_county_rows_are_recognized() {
        let cl = parse_line("ADAI 7,643 1,257", 1).unwrap();
        assert_eq!(cl.county.name(), "Adair");
        assert_eq!(cl.votes, vec![7643, 1257]);
    }

    #[test]
    fn overflowing_digit_runs_are_dropped_not_clamped() {
        assert_eq!(
            numeric_tokens("99999999999999999999999999 42"),
            vec![42]
        );
        assert_eq!(numeric_tokens("18446744073709551615"), vec![u64::MAX]);
    }

    #[test]
    fn leading_whitespace_is_tolerated() {
        let cl = parse_line("   Allen 7,824 1,505", 1).unwrap();
        assert_eq!(cl.county.name(), "Allen");
        assert_eq!(cl.votes, vec![7824, 1505]);
    }
}
