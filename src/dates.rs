//! Date key normalization.
//!
//! Serbian outlets and the analysis model write dates either as ISO
//! `YYYY-MM-DD` or in the local `D.M.YYYY.` form (trailing dot optional).
//! [`standardize_date`] folds the latter into the former so both land on the
//! same aggregation key.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static DOTTED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})\.?$").unwrap());

/// Standardize a date string to `YYYY-MM-DD`.
///
/// ISO dates pass through untouched. Dotted day-month-year dates are
/// rewritten when they name a real calendar day. Anything else, including
/// `"unknown"`, is returned verbatim.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(standardize_date("2024-03-15"), "2024-03-15");
/// assert_eq!(standardize_date("15.3.2024."), "2024-03-15");
/// assert_eq!(standardize_date("unknown"), "unknown");
/// ```
pub fn standardize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if ISO_DATE.is_match(trimmed) {
        return trimmed.to_string();
    }

    if let Some(caps) = DOTTED_DATE.captures(trimmed) {
        let day = caps[1].parse::<u32>().ok();
        let month = caps[2].parse::<u32>().ok();
        let year = caps[3].parse::<i32>().ok();
        if let (Some(d), Some(m), Some(y)) = (day, month, year) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return date.format("%Y-%m-%d").to_string();
            }
        }
    }

    debug!(date = %raw, "Could not standardize date; keeping it verbatim");
    raw.to_string()
}

/// Apply [`standardize_date`] only when normalization is switched on.
pub fn date_key(raw: String, normalize: bool) -> String {
    if normalize { standardize_date(&raw) } else { raw }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_passes_through() {
        assert_eq!(standardize_date("2024-03-15"), "2024-03-15");
    }

    #[test]
    fn test_dotted_dates_are_padded() {
        assert_eq!(standardize_date("15.3.2024."), "2024-03-15");
        assert_eq!(standardize_date("1.2.2025"), "2025-02-01");
        assert_eq!(standardize_date("01.11.2024."), "2024-11-01");
    }

    #[test]
    fn test_impossible_dotted_date_is_kept() {
        assert_eq!(standardize_date("31.2.2025."), "31.2.2025.");
    }

    #[test]
    fn test_free_text_is_kept() {
        assert_eq!(standardize_date("unknown"), "unknown");
        assert_eq!(standardize_date("prošle nedelje"), "prošle nedelje");
    }

    #[test]
    fn test_date_key_respects_switch() {
        assert_eq!(date_key("15.3.2024.".into(), false), "15.3.2024.");
        assert_eq!(date_key("15.3.2024.".into(), true), "2024-03-15");
    }
}
