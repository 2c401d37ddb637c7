//! Date helper functions

use chrono::{DateTime, Datelike, FixedOffset};

/// Abbreviated month names, pt-BR
const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Parse an ISO-8601 datetime string as the CMS emits it
///
/// Accepts both `+0000` and `+00:00` style offsets.
pub fn parse_iso(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Format a publication date as `d MMM yyy` in pt-BR (e.g. "19 abr 2021").
///
/// `None` or an unparseable string renders as empty text; the source data
/// is not validated upstream, so this is where missing dates surface.
pub fn format_pt_br(value: Option<&str>) -> String {
    let Some(date) = value.and_then(parse_iso) else {
        return String::new();
    };
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_PT_BR[date.month0() as usize],
        date.year()
    )
}
