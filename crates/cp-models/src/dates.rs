//! Display dates
//!
//! Project dates are stored as text in the Spanish long form (`5 marzo 2024`).
//! Parsing also accepts ISO `2024-03-05` and the `5 de marzo de 2024` phrasing.

use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Format as `d MMMM yyyy` with Spanish month names
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

/// Parse a stored date; `None` when the text is not a recognizable date
pub fn parse_display_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }

    let mut parts = text
        .split_whitespace()
        .filter(|part| !part.eq_ignore_ascii_case("de"));
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_number(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    if name == "setiembre" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|month| *month == name)
        .map(|index| index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_display_date(date), "5 marzo 2024");
    }

    #[test]
    fn test_parse_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 9, 18);
        assert_eq!(parse_display_date("18 septiembre 2024"), expected);
        assert_eq!(parse_display_date("18 Septiembre 2024"), expected);
        assert_eq!(parse_display_date("18 de setiembre de 2024"), expected);
        assert_eq!(parse_display_date(" 2024-09-18 "), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_display_date(""), None);
        assert_eq!(parse_display_date("pronto"), None);
        assert_eq!(parse_display_date("31 febrero 2024"), None);
        assert_eq!(parse_display_date("5 marzo 2024 extra"), None);
    }

    #[test]
    fn test_format_parse_agree() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(parse_display_date(&format_display_date(date)), Some(date));
    }
}
