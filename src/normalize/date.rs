use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO_DATE_PREFIX: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})").unwrap();
}

/// Keep only the YYYY-MM-DD portion of a date-like string
pub fn iso_date_prefix(value: &str) -> Option<String> {
    ISO_DATE_PREFIX
        .captures(value.trim())
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Accept only four-digit years
pub fn four_digit_year(year: i64) -> Option<i32> {
    if (1000..=9999).contains(&year) {
        Some(year as i32)
    } else {
        None
    }
}

/// Year of a YYYY-MM-DD date
pub fn year_of(date: &str) -> Option<i32> {
    date.get(..4)?.parse::<i64>().ok().and_then(four_digit_year)
}

/// Format Crossref-style date-parts; month and day default to 01
pub fn date_from_parts(parts: &[i64]) -> Option<String> {
    let year = four_digit_year(*parts.first()?)?;
    let month = parts.get(1).copied().filter(|m| (1..=12).contains(m)).unwrap_or(1);
    let day = parts.get(2).copied().filter(|d| (1..=31).contains(d)).unwrap_or(1);
    Some(format!("{:04}-{:02}-{:02}", year, month, day))
}
