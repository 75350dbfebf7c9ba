//! The canonical registry of the 120 Kentucky counties.
//!
//! All county matching in the extraction pipeline goes through this module:
//! exact names (any casing), the four-letter abbreviations used by the State
//! Board of Elections recap files, and prefix matching against raw text lines.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Index of a county in [KY_COUNTIES].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CountyId(pub u16);

impl CountyId {
    /// The canonical display name for this county.
    pub fn name(&self) -> &'static str {
        KY_COUNTIES[self.0 as usize]
    }
}

pub const NUM_COUNTIES: usize = 120;

/// The canonical names, in alphabetical order.
pub const KY_COUNTIES: [&str; NUM_COUNTIES] = [
    "Adair",
    "Allen",
    "Anderson",
    "Ballard",
    "Barren",
    "Bath",
    "Bell",
    "Boone",
    "Bourbon",
    "Boyd",
    "Boyle",
    "Bracken",
    "Breathitt",
    "Breckinridge",
    "Bullitt",
    "Butler",
    "Caldwell",
    "Calloway",
    "Campbell",
    "Carlisle",
    "Carroll",
    "Carter",
    "Casey",
    "Christian",
    "Clark",
    "Clay",
    "Clinton",
    "Crittenden",
    "Cumberland",
    "Daviess",
    "Edmonson",
    "Elliott",
    "Estill",
    "Fayette",
    "Fleming",
    "Floyd",
    "Franklin",
    "Fulton",
    "Gallatin",
    "Garrard",
    "Grant",
    "Graves",
    "Grayson",
    "Green",
    "Greenup",
    "Hancock",
    "Hardin",
    "Harlan",
    "Harrison",
    "Hart",
    "Henderson",
    "Henry",
    "Hickman",
    "Hopkins",
    "Jackson",
    "Jefferson",
    "Jessamine",
    "Johnson",
    "Kenton",
    "Knott",
    "Knox",
    "Larue",
    "Laurel",
    "Lawrence",
    "Lee",
    "Leslie",
    "Letcher",
    "Lewis",
    "Lincoln",
    "Livingston",
    "Logan",
    "Lyon",
    "Madison",
    "Magoffin",
    "Marion",
    "Marshall",
    "Martin",
    "Mason",
    "McCracken",
    "McCreary",
    "McLean",
    "Meade",
    "Menifee",
    "Mercer",
    "Metcalfe",
    "Monroe",
    "Montgomery",
    "Morgan",
    "Muhlenberg",
    "Nelson",
    "Nicholas",
    "Ohio",
    "Oldham",
    "Owen",
    "Owsley",
    "Pendleton",
    "Perry",
    "Pike",
    "Powell",
    "Pulaski",
    "Robertson",
    "Rockcastle",
    "Rowan",
    "Russell",
    "Scott",
    "Shelby",
    "Simpson",
    "Spencer",
    "Taylor",
    "Todd",
    "Trigg",
    "Trimble",
    "Union",
    "Warren",
    "Washington",
    "Wayne",
    "Webster",
    "Whitley",
    "Wolfe",
    "Woodford",
];

// Four-letter abbreviations used in the SBE statewide-by-county recap files.
// Some are irregular (GREU for Greenup, LETH for Letcher) but they are what
// the files actually contain.
const ABBREVIATIONS: [(&str, &str); NUM_COUNTIES] = [
    ("ADAI", "Adair"),
    ("ALLE", "Allen"),
    ("ANDE", "Anderson"),
    ("BALL", "Ballard"),
    ("BARR", "Barren"),
    ("BATH", "Bath"),
    ("BELL", "Bell"),
    ("BOON", "Boone"),
    ("BOUR", "Bourbon"),
    ("BOYD", "Boyd"),
    ("BOYL", "Boyle"),
    ("BRAC", "Bracken"),
    ("BREA", "Breathitt"),
    ("BREC", "Breckinridge"),
    ("BULL", "Bullitt"),
    ("BUTL", "Butler"),
    ("CALD", "Caldwell"),
    ("CALL", "Calloway"),
    ("CAMP", "Campbell"),
    ("CARL", "Carlisle"),
    ("CARR", "Carroll"),
    ("CART", "Carter"),
    ("CASE", "Casey"),
    ("CHRI", "Christian"),
    ("CLAR", "Clark"),
    ("CLAY", "Clay"),
    ("CLIN", "Clinton"),
    ("CRIT", "Crittenden"),
    ("CUMB", "Cumberland"),
    ("DAVI", "Daviess"),
    ("EDMO", "Edmonson"),
    ("ELLI", "Elliott"),
    ("ESTI", "Estill"),
    ("FAYE", "Fayette"),
    ("FLEM", "Fleming"),
    ("FLOY", "Floyd"),
    ("FRAN", "Franklin"),
    ("FULT", "Fulton"),
    ("GALL", "Gallatin"),
    ("GARR", "Garrard"),
    ("GRAN", "Grant"),
    ("GRAV", "Graves"),
    ("GRAY", "Grayson"),
    ("GREE", "Green"),
    ("GREU", "Greenup"),
    ("HANC", "Hancock"),
    ("HARD", "Hardin"),
    ("HARL", "Harlan"),
    ("HARR", "Harrison"),
    ("HART", "Hart"),
    ("HEND", "Henderson"),
    ("HENR", "Henry"),
    ("HICK", "Hickman"),
    ("HOPK", "Hopkins"),
    ("JACK", "Jackson"),
    ("JEFF", "Jefferson"),
    ("JESS", "Jessamine"),
    ("JOHN", "Johnson"),
    ("KENT", "Kenton"),
    ("KNOT", "Knott"),
    ("KNOX", "Knox"),
    ("LARU", "Larue"),
    ("LAUR", "Laurel"),
    ("LAWR", "Lawrence"),
    ("LEE", "Lee"),
    ("LESL", "Leslie"),
    ("LETH", "Letcher"),
    ("LEWI", "Lewis"),
    ("LINC", "Lincoln"),
    ("LIVI", "Livingston"),
    ("LOGA", "Logan"),
    ("LYON", "Lyon"),
    ("MADI", "Madison"),
    ("MAGO", "Magoffin"),
    ("MARI", "Marion"),
    ("MARS", "Marshall"),
    ("MART", "Martin"),
    ("MASO", "Mason"),
    ("MCCA", "McCracken"),
    ("MCCR", "McCreary"),
    ("MCLE", "McLean"),
    ("MEAD", "Meade"),
    ("MENI", "Menifee"),
    ("MERC", "Mercer"),
    ("META", "Metcalfe"),
    ("MONR", "Monroe"),
    ("MONT", "Montgomery"),
    ("MORG", "Morgan"),
    ("MUHL", "Muhlenberg"),
    ("NELS", "Nelson"),
    ("NICH", "Nicholas"),
    ("OHIO", "Ohio"),
    ("OLDH", "Oldham"),
    ("OWEN", "Owen"),
    ("OWSL", "Owsley"),
    ("PEND", "Pendleton"),
    ("PERR", "Perry"),
    ("PIKE", "Pike"),
    ("POWE", "Powell"),
    ("PULA", "Pulaski"),
    ("ROBE", "Robertson"),
    ("ROCK", "Rockcastle"),
    ("ROWA", "Rowan"),
    ("RUSS", "Russell"),
    ("SCOT", "Scott"),
    ("SHEL", "Shelby"),
    ("SIMP", "Simpson"),
    ("SPEN", "Spencer"),
    ("TAYL", "Taylor"),
    ("TODD", "Todd"),
    ("TRIG", "Trigg"),
    ("TRIM", "Trimble"),
    ("UNIO", "Union"),
    ("WARR", "Warren"),
    ("WASH", "Washington"),
    ("WAYN", "Wayne"),
    ("WEBS", "Webster"),
    ("WHIT", "Whitley"),
    ("WOLF", "Wolfe"),
    ("WOOD", "Woodford"),
];

static BY_NAME: Lazy<HashMap<String, CountyId>> = Lazy::new(|| {
    KY_COUNTIES
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_uppercase(), CountyId(idx as u16)))
        .collect()
});

static BY_ABBREVIATION: Lazy<HashMap<&'static str, CountyId>> = Lazy::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(abbrev, name)| {
            let id = *BY_NAME
                .get(&name.to_uppercase())
                .unwrap_or_else(|| panic!("abbreviation {} maps to unknown county", abbrev));
            (*abbrev, id)
        })
        .collect()
});

/// Resolves a raw county string (full name in any casing, or a four-letter
/// SBE abbreviation) to its canonical entry. Idempotent on canonical names.
pub fn canonical(raw: &str) -> Option<CountyId> {
    let up = raw.trim().to_uppercase();
    if let Some(id) = BY_NAME.get(&up) {
        return Some(*id);
    }
    BY_ABBREVIATION.get(up.as_str()).copied()
}

/// Matches a county at the start of a raw text line.
///
/// The match is case-insensitive and must end at a word boundary, so a line
/// starting with `Greenup` resolves to Greenup and not Green. Lines keyed by
/// a four-letter SBE abbreviation instead of the full name resolve too.
/// Returns the county and the remainder of the line after the name.
pub fn match_line_prefix(line: &str) -> Option<(CountyId, &str)> {
    let trimmed = line.trim_start();
    let mut best: Option<(CountyId, usize)> = None;
    for (idx, name) in KY_COUNTIES.iter().enumerate() {
        // County names are ASCII, so the byte length of the name is the byte
        // length of the matched prefix.
        let n = name.len();
        match trimmed.get(..n) {
            Some(p) if p.eq_ignore_ascii_case(name) => {}
            _ => continue,
        }
        // The name must be followed by whitespace or the end of the line.
        match trimmed[n..].chars().next() {
            Some(c) if !c.is_whitespace() => continue,
            _ => {}
        }
        if best.map(|(_, len)| n > len).unwrap_or(true) {
            best = Some((CountyId(idx as u16), n));
        }
    }
    if let Some((id, len)) = best {
        return Some((id, &trimmed[len..]));
    }
    // Recap files key their rows by abbreviation, not by name.
    let token_end = trimmed
        .find(|c: char| c.is_whitespace())
        .unwrap_or(trimmed.len());
    BY_ABBREVIATION
        .get(trimmed[..token_end].to_uppercase().as_str())
        .map(|id| (*id, &trimmed[token_end..]))
}
