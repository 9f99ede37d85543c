//! Duration hints in free-form step text.
//!
//! Recipe steps carry their waits in prose ("bake for 25 minutes",
//! "simmer 1 hour 30 min"). This module pulls a duration out of that prose:
//! - Hours, minutes and seconds are each matched independently and summed
//! - The first number followed by a unit wins for that unit
//! - Ranges ("5-7 minutes", "5 to 7 minutes") resolve to their first number
//!
//! Extraction never fails; text without a recognisable duration yields `None`
//! and callers pick a default.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

/// Number with an optional range tail, then an optional hyphen ("10-minute").
const NUMBER: &str = r"\b(\d+(?:\.\d+)?)(?:\s*(?:-|–|to)\s*\d+(?:\.\d+)?)?\s*-?\s*";

static HOURS_RE: Lazy<Regex> = Lazy::new(|| unit_regex(r"(?:hours?|hrs?)"));
static MINUTES_RE: Lazy<Regex> = Lazy::new(|| unit_regex(r"(?:minutes?|mins?)"));
static SECONDS_RE: Lazy<Regex> = Lazy::new(|| unit_regex(r"(?:seconds?|secs?)"));

fn unit_regex(unit: &str) -> Regex {
    Regex::new(&format!(r"{NUMBER}{unit}\b")).expect("Invalid duration regex pattern")
}

/// First number attached to `re`'s unit, in that unit.
fn first_amount(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Extract the wait a step implies.
///
/// Returns `None` when no unit is found or when the units sum to zero.
pub fn extract_duration(text: &str) -> Option<Duration> {
    let lowered = text.to_lowercase();

    let hours = first_amount(&HOURS_RE, &lowered);
    let minutes = first_amount(&MINUTES_RE, &lowered);
    let seconds = first_amount(&SECONDS_RE, &lowered);

    if hours.is_none() && minutes.is_none() && seconds.is_none() {
        return None;
    }

    let total = hours.unwrap_or(0.0) * 3600.0
        + minutes.unwrap_or(0.0) * 60.0
        + seconds.unwrap_or(0.0);
    let total = total.round() as u64;

    if total == 0 {
        tracing::debug!("Zero-length duration in step text: {:?}", text);
        return None;
    }

    Some(Duration::from_secs(total))
}

/// Like [`extract_duration`], falling back to `default` when nothing matches.
pub fn duration_or_default(text: &str, default: Duration) -> Duration {
    extract_duration(text).unwrap_or(default)
}

/// Advisory flag: does this step read like it involves waiting?
pub fn has_timer(text: &str) -> bool {
    extract_duration(text).is_some()
}

/// Parse a duration typed by the user ("90", "2 min", "1 minute 30 seconds").
///
/// A bare integer is taken as seconds.
pub fn parse_custom_duration(text: &str) -> Option<Duration> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(duration) = extract_duration(trimmed) {
        return Some(duration);
    }

    match trimmed.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(text: &str) -> Option<u64> {
        extract_duration(text).map(|d| d.as_secs())
    }

    #[test]
    fn test_minutes_and_seconds_sum() {
        assert_eq!(secs("cook for 1 minute 30 seconds"), Some(90));
    }

    #[test]
    fn test_single_units() {
        assert_eq!(secs("Preheat oven to 350F for 10 minutes"), Some(600));
        assert_eq!(secs("Bake for 25 minutes"), Some(1500));
        assert_eq!(secs("Stir for 45 seconds"), Some(45));
        assert_eq!(secs("Simmer for 2 hours"), Some(7200));
    }

    #[test]
    fn test_abbreviations_and_hyphens() {
        assert_eq!(secs("Rest 5 mins"), Some(300));
        assert_eq!(secs("Whisk 20 secs"), Some(20));
        assert_eq!(secs("Start a 20-second timer"), Some(20));
        assert_eq!(secs("A 10-minute rest"), Some(600));
        assert_eq!(secs("Braise 1 hr 15 min"), Some(4500));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(secs("BOIL FOR 3 MINUTES"), Some(180));
    }

    #[test]
    fn test_range_resolves_to_first_number() {
        assert_eq!(secs("cook for 5-7 minutes until golden"), Some(300));
        assert_eq!(secs("cook for 5 to 7 minutes"), Some(300));
        assert_eq!(secs("cook for 8–10 minutes"), Some(480));
    }

    #[test]
    fn test_first_match_wins_per_unit() {
        assert_eq!(secs("Bake 20 minutes, then broil 3 minutes"), Some(1200));
    }

    #[test]
    fn test_decimal_amounts() {
        assert_eq!(secs("Roast for 1.5 hours"), Some(5400));
    }

    #[test]
    fn test_no_duration() {
        assert_eq!(secs("Mix ingredients"), None);
        assert_eq!(secs("Preheat oven to 350F"), None);
        assert_eq!(secs("Mince the garlic"), None);
        assert_eq!(secs(""), None);
    }

    #[test]
    fn test_zero_is_none() {
        assert_eq!(secs("0 minutes"), None);
    }

    #[test]
    fn test_default_fallback() {
        let default = Duration::from_secs(30);
        assert_eq!(duration_or_default("Mix ingredients", default), default);
        assert_eq!(
            duration_or_default("Bake 2 minutes", default),
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_has_timer() {
        assert!(has_timer("Bake for 25 minutes"));
        assert!(!has_timer("Mix ingredients"));
    }

    #[test]
    fn test_parse_custom_duration() {
        assert_eq!(parse_custom_duration("90"), Some(Duration::from_secs(90)));
        assert_eq!(parse_custom_duration(" 2 min "), Some(Duration::from_secs(120)));
        assert_eq!(
            parse_custom_duration("1 minute 30 seconds"),
            Some(Duration::from_secs(90))
        );
        assert_eq!(parse_custom_duration("0"), None);
        assert_eq!(parse_custom_duration("soon"), None);
        assert_eq!(parse_custom_duration(""), None);
    }
}
