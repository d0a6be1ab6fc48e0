// src/extractors/period.rs
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// Tried in order; each pattern contributes at most its leftmost match.
static PERIOD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\w{3})(\d{4})",      // Dec2021
        r"(\w{4})(\d{4})",      // June2021, Sept2019
        r"(\w{3})_(\d{4})",     // Dec_2021
        r"([a-zA-Z]+)(\d{4})",  // December2021
    ]
    .iter()
    .map(|pat| Regex::new(pat).expect("period patterns are valid"))
    .collect()
});

/// Filenames whose embedded month token is wrong in the published archive.
const PERIOD_OVERRIDES: &[(&str, i32, u32)] = &[
    // "ma" is a typo for May in the July 2013 re-release
    ("prorepma2013ext20130718.pdf", 2013, 5),
];

fn month_number(token: &str) -> Option<u32> {
    let month = match token.to_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

/// Derives the report period (first day of the month) from a filename.
pub fn resolve_period(filename: &str) -> Option<NaiveDate> {
    if let Some((_, year, month)) = PERIOD_OVERRIDES.iter().find(|(name, _, _)| *name == filename) {
        return NaiveDate::from_ymd_opt(*year, *month, 1);
    }

    PERIOD_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(filename)?;
        let month = month_number(&caps[1])?;
        let year = caps[2].parse::<i32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1)
    })
}
