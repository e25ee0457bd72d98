use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A civil calendar date stored as days since 1970-01-01.
///
/// The config format only admits `YYYY-MM-DD`, so there is no time-of-day
/// component to normalize away: two milestones on the same calendar day are
/// the same `Day` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(i32);

impl Day {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Day> {
        if month == 0 || month > 12 || day == 0 || day > 31 {
            return None;
        }
        Some(Day(days_from_civil(year, month, day)))
    }

    /// Parses a `YYYY-MM-DD` string.
    pub fn parse(value: &str) -> Option<Day> {
        let value = value.trim();
        if !DATE_SHAPE.is_match(value) {
            return None;
        }
        let mut parts = value.split('-');
        let year: i32 = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let day: u32 = parts.next()?.parse().ok()?;
        Day::from_ymd(year, month, day)
    }

    pub fn from_unix_days(days: i32) -> Day {
        Day(days)
    }

    pub fn to_unix_days(self) -> i32 {
        self.0
    }

    pub fn year_month_day(self) -> (i32, u32, u32) {
        civil_from_days(self.0)
    }

    /// Weekday with Monday = 0 .. Sunday = 6.
    pub fn weekday(self) -> u32 {
        // 1970-01-01 was a Thursday.
        (self.0 + 3).rem_euclid(7) as u32
    }

    pub fn succ(self) -> Day {
        Day(self.0 + 1)
    }

    pub fn add_days(self, days: i32) -> Day {
        Day(self.0 + days)
    }

    /// Signed whole-day distance `self -> other`.
    pub fn days_until(self, other: Day) -> i32 {
        other.0 - self.0
    }

    pub fn is_month_start(self) -> bool {
        self.year_month_day().2 == 1
    }

    /// Short form for axis ticks, e.g. `Mar 14`.
    pub fn format_short(self) -> String {
        let (_, month, day) = self.year_month_day();
        format!("{} {}", MONTH_NAMES[(month - 1) as usize], day)
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[(self.year_month_day().1 - 1) as usize]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.year_month_day();
        write!(f, "{:04}-{:02}-{:02}", year, month, day)
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn days_from_civil(year: i32, month: u32, day: u32) -> i32 {
    let y = year - (month <= 2) as i32;
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let m = month as i32;
    let d = day as i32;
    let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

fn civil_from_days(days: i32) -> (i32, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = mp + if mp < 10 { 3 } else { -9 };
    let year = y + (m <= 2) as i32;
    (year, m as u32, d as u32)
}

/// Accent color assigned to a milestone. `Subtle` is the unaccented default;
/// anything else marks the milestone as high priority for the collapse
/// heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Subtle,
    Sky,
    Emerald,
    Amber,
    Rose,
    Violet,
}

impl ColorToken {
    fn from_token(token: &str) -> Option<ColorToken> {
        match token {
            "subtle" => Some(ColorToken::Subtle),
            "sky" => Some(ColorToken::Sky),
            "emerald" => Some(ColorToken::Emerald),
            "amber" => Some(ColorToken::Amber),
            "rose" => Some(ColorToken::Rose),
            "violet" => Some(ColorToken::Violet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Milestone {
    pub label: String,
    pub emoji: String,
    pub date: Day,
    /// Present only for range milestones; always `>= date`.
    pub end_date: Option<Day>,
    pub color: ColorToken,
    pub description: Option<String>,
}

impl Milestone {
    pub fn is_range(&self) -> bool {
        self.end_date.is_some()
    }

    pub fn high_priority(&self) -> bool {
        self.color != ColorToken::Subtle
    }
}

/// The validated milestone configuration: fixed axis bounds plus the ordered
/// milestone list. Immutable for a session; the editing backend replaces the
/// whole thing and the caller recomputes from scratch.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub start: Day,
    pub due: Day,
    pub milestones: Vec<Milestone>,
}

impl Schedule {
    pub fn total_days(&self) -> i32 {
        self.start.days_until(self.due)
    }

    pub fn point_indices(&self) -> Vec<usize> {
        self.milestones
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_range())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn range_indices(&self) -> Vec<usize> {
        self.milestones
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_range())
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid milestone config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be a YYYY-MM-DD date, got {value:?}")]
    BadDate { field: String, value: String },
    #[error("due date {due} must be after start date {start}")]
    DueNotAfterStart { start: Day, due: Day },
    #[error("milestone {index}: {field} must not be empty")]
    EmptyField { index: usize, field: &'static str },
    #[error("milestone {index}: endDate {end} is before date {date}")]
    RangeEndsBeforeStart { index: usize, date: Day, end: Day },
    #[error("milestone {index}: unknown color {value:?}")]
    UnknownColor { index: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct RawSchedule {
    start: String,
    due: String,
    #[serde(default)]
    milestones: Vec<RawMilestone>,
}

#[derive(Debug, Deserialize)]
struct RawMilestone {
    date: String,
    label: String,
    emoji: String,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
    color: Option<String>,
    description: Option<String>,
}

/// Parses and validates an externally-sourced milestone config. Malformed
/// entries are rejected here; the layout pipeline never sees invalid items.
/// An empty milestone list is valid.
pub fn parse_schedule(input: &str) -> Result<Schedule, ConfigError> {
    let raw: RawSchedule = serde_json::from_str(input)?;
    validate_schedule(raw)
}

fn parse_date_field(field: &str, value: &str) -> Result<Day, ConfigError> {
    Day::parse(value).ok_or_else(|| ConfigError::BadDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn validate_schedule(raw: RawSchedule) -> Result<Schedule, ConfigError> {
    let start = parse_date_field("start", &raw.start)?;
    let due = parse_date_field("due", &raw.due)?;
    if due <= start {
        return Err(ConfigError::DueNotAfterStart { start, due });
    }

    let mut milestones = Vec::with_capacity(raw.milestones.len());
    for (index, raw) in raw.milestones.into_iter().enumerate() {
        if raw.label.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                index,
                field: "label",
            });
        }
        if raw.emoji.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                index,
                field: "emoji",
            });
        }
        let date = parse_date_field(&format!("milestone {index} date"), &raw.date)?;
        let end_date = match raw.end_date.as_deref() {
            Some(value) => {
                let end = parse_date_field(&format!("milestone {index} endDate"), value)?;
                if end < date {
                    return Err(ConfigError::RangeEndsBeforeStart { index, date, end });
                }
                Some(end)
            }
            None => None,
        };
        let color = match raw.color.as_deref() {
            Some(token) => ColorToken::from_token(token.trim()).ok_or_else(|| {
                ConfigError::UnknownColor {
                    index,
                    value: token.to_string(),
                }
            })?,
            None => ColorToken::Subtle,
        };
        milestones.push(Milestone {
            label: raw.label,
            emoji: raw.emoji,
            date,
            end_date,
            color,
            description: raw.description,
        });
    }

    Ok(Schedule {
        start,
        due,
        milestones,
    })
}
