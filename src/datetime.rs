use std::fmt::Write as _;

use crate::report::Report;

pub const SHORT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const RFC_2822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

/// Formats accepted in the `date` of a content item.
const INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parse a content date; the time of day is midnight.
pub fn parse_date(date: &str) -> Option<chrono::NaiveDateTime> {
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDate::parse_from_str(date, fmt).ok())
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
}

/// `strftime`-style formatting; `None` when `fmt` is not a valid format string.
pub fn format_date(date: &chrono::NaiveDateTime, fmt: &str) -> Option<String> {
    let mut formatted = String::new();
    write!(formatted, "{}", date.format(fmt)).ok()?;
    Some(formatted)
}

/// The variants of a content date exposed to templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedDates {
    pub short_date: String,
    pub human_date: String,
    pub rfc_2822_date: String,
}

impl FormattedDates {
    /// All variants are empty when `date` cannot be parsed.
    pub fn new(date: &str, human_format: &str, report: &mut Report) -> Self {
        let Some(parsed) = parse_date(date) else {
            report.warn(format_args!("Can't parse date {date}"));
            return Self::default();
        };

        let mut format = |fmt: &str| {
            format_date(&parsed, fmt).unwrap_or_else(|| {
                report.warn(format_args!("Invalid date format `{fmt}`"));
                String::new()
            })
        };
        Self {
            short_date: format(SHORT_DATE_FORMAT),
            human_date: format(human_format),
            rfc_2822_date: format(RFC_2822_FORMAT),
        }
    }
}
