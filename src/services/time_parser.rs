//! Free-form timestamp parsing.
//!
//! A user-supplied string is tried against a fixed, ordered table of layouts;
//! the first one that parses wins, so the table order encodes the tie-break
//! policy among ambiguous formats.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::domain::errors::TimeParseError;

#[derive(Debug, Clone, Copy)]
enum LayoutKind {
    /// Date and time with a numeric zone offset (`%z` in the format).
    Zoned,
    /// Date and time without zone information; interpreted as UTC.
    Naive,
    /// Calendar date only; midnight UTC.
    DateOnly,
    /// Clock time only; combined with the zero date (year 0, January 1).
    TimeOnly,
    /// Month, day and time without a year; year 0 is assumed.
    NoYear,
    /// Handled by chrono's RFC 3339 parser (accepts `Z` and fractions).
    Rfc3339,
}

struct TimeLayout {
    fmt: &'static str,
    kind: LayoutKind,
    /// Whitespace-separated word to drop before parsing, counted from the
    /// end of the string. Abbreviated zone names ("MST", "CEST", ...) cannot
    /// be resolved to an offset without a zone database, so they are
    /// recognized positionally, required to be alphabetic, and discarded;
    /// the remainder is interpreted as UTC.
    zone_name_word: Option<usize>,
}

/// The supported layouts, in priority order: the Go-style debug format,
/// a bare date, and the standard textual formats (ANSI C, Unix, Ruby,
/// RFC 822/850/1123/3339, kitchen time, and the stamp family).
const TIME_LAYOUTS: &[TimeLayout] = &[
    // 2006-01-02 15:04:05.999999999 -0700 MST
    TimeLayout {
        fmt: "%Y-%m-%d %H:%M:%S%.f %z",
        kind: LayoutKind::Zoned,
        zone_name_word: Some(0),
    },
    // 2006-01-02
    TimeLayout {
        fmt: "%Y-%m-%d",
        kind: LayoutKind::DateOnly,
        zone_name_word: None,
    },
    // ANSI C: Mon Jan  2 15:04:05 2006
    TimeLayout {
        fmt: "%a %b %e %H:%M:%S %Y",
        kind: LayoutKind::Naive,
        zone_name_word: None,
    },
    // Unix date: Mon Jan  2 15:04:05 MST 2006
    TimeLayout {
        fmt: "%a %b %e %H:%M:%S %Y",
        kind: LayoutKind::Naive,
        zone_name_word: Some(1),
    },
    // Ruby date: Mon Jan 02 15:04:05 -0700 2006
    TimeLayout {
        fmt: "%a %b %d %H:%M:%S %z %Y",
        kind: LayoutKind::Zoned,
        zone_name_word: None,
    },
    // RFC 822: 02 Jan 06 15:04 MST
    TimeLayout {
        fmt: "%d %b %y %H:%M",
        kind: LayoutKind::Naive,
        zone_name_word: Some(0),
    },
    // RFC 822 with numeric zone: 02 Jan 06 15:04 -0700
    TimeLayout {
        fmt: "%d %b %y %H:%M %z",
        kind: LayoutKind::Zoned,
        zone_name_word: None,
    },
    // RFC 850: Monday, 02-Jan-06 15:04:05 MST
    TimeLayout {
        fmt: "%A, %d-%b-%y %H:%M:%S",
        kind: LayoutKind::Naive,
        zone_name_word: Some(0),
    },
    // RFC 1123: Mon, 02 Jan 2006 15:04:05 MST
    TimeLayout {
        fmt: "%a, %d %b %Y %H:%M:%S",
        kind: LayoutKind::Naive,
        zone_name_word: Some(0),
    },
    // RFC 1123 with numeric zone: Mon, 02 Jan 2006 15:04:05 -0700
    TimeLayout {
        fmt: "%a, %d %b %Y %H:%M:%S %z",
        kind: LayoutKind::Zoned,
        zone_name_word: None,
    },
    // RFC 3339: 2006-01-02T15:04:05Z07:00
    TimeLayout {
        fmt: "",
        kind: LayoutKind::Rfc3339,
        zone_name_word: None,
    },
    // RFC 3339 with nanoseconds: 2006-01-02T15:04:05.999999999Z07:00
    TimeLayout {
        fmt: "",
        kind: LayoutKind::Rfc3339,
        zone_name_word: None,
    },
    // Kitchen: 3:04PM
    TimeLayout {
        fmt: "%I:%M%p",
        kind: LayoutKind::TimeOnly,
        zone_name_word: None,
    },
    // Stamp: Jan _2 15:04:05
    TimeLayout {
        fmt: "%b %e %H:%M:%S",
        kind: LayoutKind::NoYear,
        zone_name_word: None,
    },
    // StampMilli: Jan _2 15:04:05.000
    TimeLayout {
        fmt: "%b %e %H:%M:%S%.3f",
        kind: LayoutKind::NoYear,
        zone_name_word: None,
    },
    // StampMicro: Jan _2 15:04:05.000000
    TimeLayout {
        fmt: "%b %e %H:%M:%S%.6f",
        kind: LayoutKind::NoYear,
        zone_name_word: None,
    },
    // StampNano: Jan _2 15:04:05.000000000
    TimeLayout {
        fmt: "%b %e %H:%M:%S%.9f",
        kind: LayoutKind::NoYear,
        zone_name_word: None,
    },
];

/// Parse a free-form timestamp against the layout table, first match wins.
/// Layouts without zone information are interpreted as UTC.
pub fn parse_time(input: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let trimmed = input.trim();
    TIME_LAYOUTS
        .iter()
        .find_map(|layout| try_layout(trimmed, layout))
        .ok_or_else(|| TimeParseError::NoMatchingFormat(input.to_string()))
}

fn try_layout(input: &str, layout: &TimeLayout) -> Option<DateTime<Utc>> {
    let stripped;
    let input = match layout.zone_name_word {
        Some(from_end) => {
            stripped = drop_zone_name(input, from_end)?;
            stripped.as_str()
        }
        None => input,
    };

    match layout.kind {
        LayoutKind::Zoned => DateTime::parse_from_str(input, layout.fmt)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        LayoutKind::Naive => NaiveDateTime::parse_from_str(input, layout.fmt)
            .ok()
            .map(|n| Utc.from_utc_datetime(&n)),
        LayoutKind::DateOnly => NaiveDate::parse_from_str(input, layout.fmt)
            .ok()
            .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN))),
        LayoutKind::TimeOnly => {
            let time = NaiveTime::parse_from_str(input, layout.fmt).ok()?;
            let date = NaiveDate::from_ymd_opt(0, 1, 1)?;
            Some(Utc.from_utc_datetime(&date.and_time(time)))
        }
        LayoutKind::NoYear => {
            // Reference semantics give year 0 to layouts without one.
            let padded = format!("0000 {input}");
            let fmt = format!("%Y {}", layout.fmt);
            NaiveDateTime::parse_from_str(&padded, &fmt)
                .ok()
                .map(|n| Utc.from_utc_datetime(&n))
        }
        LayoutKind::Rfc3339 => DateTime::parse_from_rfc3339(input)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
    }
}

/// Remove the `from_end`-th whitespace-separated word (0 = last) if it looks
/// like an abbreviated zone name, and rejoin the rest with single spaces.
fn drop_zone_name(input: &str, from_end: usize) -> Option<String> {
    let mut words: Vec<&str> = input.split_whitespace().collect();
    if words.len() <= from_end + 1 {
        return None;
    }
    let idx = words.len() - 1 - from_end;
    let token = words.remove(idx);
    if token.is_empty() || token.len() > 5 || !token.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_first_match_wins() {
        // A bare date matches the second layout, not any later one.
        let t = parse_time("2021-03-14").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2021, 3, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_zone_name_is_dropped_not_guessed() {
        // "MST" carries no offset without a zone database; the instant is
        // taken as UTC.
        let t = parse_time("Mon, 02 Jan 2006 15:04:05 MST").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
    }

    #[test]
    fn test_numeric_offset_is_applied() {
        let t = parse_time("Mon, 02 Jan 2006 15:04:05 -0700").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(
            parse_time("not a time"),
            Err(TimeParseError::NoMatchingFormat("not a time".to_string()))
        );
        assert!(parse_time("").is_err());
    }
}
