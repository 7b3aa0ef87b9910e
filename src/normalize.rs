//! Field normalizers for raw cell values
//!
//! Source spreadsheets mix European and US number formats, day-first dates,
//! ISO dates, spreadsheet serial dates, and free-text status values. Every
//! normalizer here is total: malformed input becomes a safe default (0, empty
//! string, or `NO`), never an error.

use crate::claim::Estado;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Day 0 of the spreadsheet serial date model.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Status values that map to `SI`.
const ACCEPTED_VALUES: &[&str] = &["si", "aceptado", "ok", "aprobado", "completo"];

/// Status values that map to `PARCIAL`.
const PARTIAL_VALUES: &[&str] = &["parcial", "parcialmente"];

/// Normalize a raw header cell for synonym lookup: lowercase, trim, collapse
/// internal whitespace runs to one space, strip diacritics.
pub fn normalize_header(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(strip_diacritic)
        .collect()
}

fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Parse a currency amount from heterogeneous formats.
///
/// Currency symbols and spaces are stripped. When both `,` and `.` appear,
/// the separator appearing last is the decimal point and the other is a
/// thousands separator; a lone `,` is treated as the decimal point.
/// Malformed input yields 0.
pub fn parse_amount(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }

    let mut clean: String = raw
        .chars()
        .filter(|c| *c != '€' && *c != '$' && *c != ' ')
        .collect();

    let last_comma = clean.rfind(',');
    let last_dot = clean.rfind('.');

    match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => {
            if comma > dot {
                // Format: 1.234,56
                clean = clean.replace('.', "").replace(',', ".");
            } else {
                // Format: 1,234.56
                clean = clean.replace(',', "");
            }
        }
        (Some(_), None) => {
            // Assume comma is decimal
            clean = clean.replace(',', ".");
        }
        _ => {}
    }

    clean.parse::<f64>().unwrap_or(0.0)
}

/// Parse a date into canonical `YYYY-MM-DD` form, or empty string if
/// unparseable.
///
/// A 5-digit numeric string is a spreadsheet serial date counted from
/// 1899-12-30. `YYYY-MM-DD...` strings parse as ISO, `D/M/YYYY` and
/// `D-M-YYYY` as day-first European dates. Anything else falls back to a
/// small set of common formats.
pub fn parse_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return parse_serial_date(trimmed);
    }

    if is_iso_prefixed(trimmed) {
        return NaiveDate::parse_from_str(&trimmed[..10], "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
    }

    if let Some(date) = parse_day_first(trimmed) {
        return date.format("%Y-%m-%d").to_string();
    }

    parse_fallback(trimmed)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_serial_date(digits: &str) -> String {
    let days: i64 = match digits.parse() {
        Ok(n) => n,
        Err(_) => return String::new(),
    };
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(days)))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn is_iso_prefixed(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// `D/M/YYYY` or `D-M-YYYY`, day and month one or two digits.
fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.splitn(3, ['/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parse_digits(parts[0], 1, 2)?;
    let month: u32 = parse_digits(parts[1], 1, 2)?;
    // The year segment may carry a trailing time component
    let year_digits: String = parts[2].chars().take_while(|c| c.is_ascii_digit()).collect();
    if year_digits.len() != 4 {
        return None;
    }
    let year: i32 = year_digits.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_digits<T: std::str::FromStr>(s: &str, min_len: usize, max_len: usize) -> Option<T> {
    if s.len() < min_len || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_fallback(s: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%d.%m.%Y", "%m/%d/%y", "%d/%m/%y"];
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M"];

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    None
}

/// Normalize a raw status value into the closed `SI`/`NO`/`PARCIAL`
/// trichotomy. Unrecognized or empty values map to `NO`.
pub fn normalize_estado(raw: &str) -> Estado {
    let value = raw.trim().to_lowercase();
    if ACCEPTED_VALUES.contains(&value.as_str()) {
        Estado::Si
    } else if PARTIAL_VALUES.contains(&value.as_str()) {
        Estado::Parcial
    } else {
        Estado::No
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Reclamación  "), "reclamacion");
        assert_eq!(normalize_header("DÍAS   DE\tESPERA"), "dias de espera");
        assert_eq!(normalize_header("Importe (€)"), "importe (€)");
    }

    #[test]
    fn test_parse_amount_separator_disambiguation() {
        assert_eq!(parse_amount("1.234,56"), 1234.56);
        assert_eq!(parse_amount("1,234.56"), 1234.56);
        assert_eq!(parse_amount("1.234.567,89"), 1234567.89);
    }

    #[test]
    fn test_parse_amount_single_comma_is_decimal() {
        assert_eq!(parse_amount("12,5"), 12.5);
    }

    #[test]
    fn test_parse_amount_currency_symbols() {
        assert_eq!(parse_amount("€ 1.500,00"), 1500.0);
        assert_eq!(parse_amount("$99.95"), 99.95);
    }

    #[test]
    fn test_parse_amount_malformed_is_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
        assert_eq!(parse_amount("12x"), 0.0);
    }

    #[test]
    fn test_parse_date_serial() {
        // 1899-12-30 + 45000 days
        assert_eq!(parse_date("45000"), "2023-03-15");
        // Sanity anchor: serial 36526 is 2000-01-01
        assert_eq!(parse_date("36526"), "2000-01-01");
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date("2024-06-01"), "2024-06-01");
        assert_eq!(parse_date("2024-06-01T10:30:00"), "2024-06-01");
    }

    #[test]
    fn test_parse_date_day_first() {
        assert_eq!(parse_date("31/01/2024"), "2024-01-31");
        assert_eq!(parse_date("1-2-2024"), "2024-02-01");
    }

    #[test]
    fn test_parse_date_unparseable_is_empty() {
        assert_eq!(parse_date(""), "");
        assert_eq!(parse_date("pendiente"), "");
        assert_eq!(parse_date("32/13/2024"), "");
    }

    #[test]
    fn test_normalize_estado_totality() {
        assert_eq!(normalize_estado("Si"), Estado::Si);
        assert_eq!(normalize_estado(" ACEPTADO "), Estado::Si);
        assert_eq!(normalize_estado("ok"), Estado::Si);
        assert_eq!(normalize_estado("Parcialmente"), Estado::Parcial);
        assert_eq!(normalize_estado("no"), Estado::No);
        assert_eq!(normalize_estado(""), Estado::No);
        assert_eq!(normalize_estado("pendiente"), Estado::No);
    }
}
