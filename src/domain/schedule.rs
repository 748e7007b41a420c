use crate::error::{CatalogError, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Day of the week, Monday first. Serialized as its number (1..=7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WeekDay {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl WeekDay {
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(WeekDay::Monday),
            2 => Ok(WeekDay::Tuesday),
            3 => Ok(WeekDay::Wednesday),
            4 => Ok(WeekDay::Thursday),
            5 => Ok(WeekDay::Friday),
            6 => Ok(WeekDay::Saturday),
            7 => Ok(WeekDay::Sunday),
            _ => Err(CatalogError::invalid(format!(
                "Week day must be between 1 and 7: {}",
                number
            ))),
        }
    }
}

impl TryFrom<u8> for WeekDay {
    type Error = CatalogError;

    fn try_from(number: u8) -> Result<Self> {
        Self::from_number(number)
    }
}

impl From<WeekDay> for u8 {
    fn from(day: WeekDay) -> Self {
        day.number()
    }
}

impl From<chrono::Weekday> for WeekDay {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => WeekDay::Monday,
            chrono::Weekday::Tue => WeekDay::Tuesday,
            chrono::Weekday::Wed => WeekDay::Wednesday,
            chrono::Weekday::Thu => WeekDay::Thursday,
            chrono::Weekday::Fri => WeekDay::Friday,
            chrono::Weekday::Sat => WeekDay::Saturday,
            chrono::Weekday::Sun => WeekDay::Sunday,
        }
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeekDay::Monday => "MONDAY",
            WeekDay::Tuesday => "TUESDAY",
            WeekDay::Wednesday => "WEDNESDAY",
            WeekDay::Thursday => "THURSDAY",
            WeekDay::Friday => "FRIDAY",
            WeekDay::Saturday => "SATURDAY",
            WeekDay::Sunday => "SUNDAY",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OwnerKind {
    #[default]
    Branch,
    Atm,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerKind::Branch => f.write_str("branch"),
            OwnerKind::Atm => f.write_str("ATM"),
        }
    }
}

/// The entity a weekly schedule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleOwner {
    pub id: Uuid,
    pub kind: OwnerKind,
}

impl ScheduleOwner {
    pub fn branch(id: Uuid) -> Self {
        Self {
            id,
            kind: OwnerKind::Branch,
        }
    }

    pub fn atm(id: Uuid) -> Self {
        Self {
            id,
            kind: OwnerKind::Atm,
        }
    }
}

impl fmt::Display for ScheduleOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Opening hours of one entity for one day of the week.
///
/// An entity holds at most one entry per `WeekDay`. An entry opening and
/// closing at exactly 00:00:00 means the entity works around the clock that day.
/// The owner fields may be omitted in seed data; loading binds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(default)]
    pub owner_id: Uuid,
    #[serde(default)]
    pub owner_kind: OwnerKind,
    pub week_day: WeekDay,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl ScheduleEntry {
    pub fn new(
        owner: ScheduleOwner,
        week_day: WeekDay,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
    ) -> Self {
        Self {
            owner_id: owner.id,
            owner_kind: owner.kind,
            week_day,
            opening_time,
            closing_time,
        }
    }

    pub fn owner(&self) -> ScheduleOwner {
        ScheduleOwner {
            id: self.owner_id,
            kind: self.owner_kind,
        }
    }

    pub fn is_around_the_clock(&self) -> bool {
        is_midnight(self.opening_time) && is_midnight(self.closing_time)
    }

    /// Inclusive on both bounds. A range whose opening is after its closing
    /// (crossing midnight) covers nothing.
    pub fn covers(&self, time: NaiveTime) -> bool {
        self.opening_time <= time && time <= self.closing_time
    }
}

fn is_midnight(time: NaiveTime) -> bool {
    time.num_seconds_from_midnight() == 0 && time.nanosecond() == 0
}

/// Decides whether an entity with the given weekly schedule is open at `time` on `day`.
///
/// An empty schedule is always closed.
pub fn is_open_at(entries: &[ScheduleEntry], day: WeekDay, time: NaiveTime) -> bool {
    entries
        .iter()
        .filter(|entry| entry.week_day == day)
        .any(|entry| entry.covers(time))
}

/// Parses `HH:MM` or `HH:MM:SS` (fractional seconds allowed).
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| {
            CatalogError::invalid(format!(
                "Malformed time of day '{}', expected HH:MM or HH:MM:SS",
                raw
            ))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleOperation {
    Add,
    Change,
    Delete,
}

impl FromStr for ScheduleOperation {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_uppercase().as_str() {
            "ADD" => Ok(ScheduleOperation::Add),
            "CHANGE" => Ok(ScheduleOperation::Change),
            "DELETE" => Ok(ScheduleOperation::Delete),
            other => Err(CatalogError::invalid(format!(
                "Unknown schedule operation '{}', expected ADD, CHANGE or DELETE",
                other
            ))),
        }
    }
}

/// A schedule mutation as it arrives on the wire: untyped day, times and operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMutationRequest {
    pub week_day: u8,
    #[serde(default)]
    pub opening_time: Option<String>,
    #[serde(default)]
    pub closing_time: Option<String>,
    #[serde(alias = "optional")]
    pub operation: String,
}

/// A validated request to add, change or delete the entry for one weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleMutation {
    pub week_day: WeekDay,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub operation: ScheduleOperation,
}

impl ScheduleMutation {
    pub fn add(week_day: WeekDay, opening_time: NaiveTime, closing_time: NaiveTime) -> Self {
        Self {
            week_day,
            opening_time: Some(opening_time),
            closing_time: Some(closing_time),
            operation: ScheduleOperation::Add,
        }
    }

    pub fn change(
        week_day: WeekDay,
        opening_time: Option<NaiveTime>,
        closing_time: Option<NaiveTime>,
    ) -> Self {
        Self {
            week_day,
            opening_time,
            closing_time,
            operation: ScheduleOperation::Change,
        }
    }

    pub fn delete(week_day: WeekDay) -> Self {
        Self {
            week_day,
            opening_time: None,
            closing_time: None,
            operation: ScheduleOperation::Delete,
        }
    }
}

fn parse_optional_time(raw: Option<&str>) -> Result<Option<NaiveTime>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_time(value).map(Some),
        None => Ok(None),
    }
}

impl TryFrom<ScheduleMutationRequest> for ScheduleMutation {
    type Error = CatalogError;

    fn try_from(request: ScheduleMutationRequest) -> Result<Self> {
        let week_day = WeekDay::from_number(request.week_day)?;
        let operation: ScheduleOperation = request.operation.parse()?;
        let opening_time = parse_optional_time(request.opening_time.as_deref())?;
        let closing_time = parse_optional_time(request.closing_time.as_deref())?;

        if operation == ScheduleOperation::Add && (opening_time.is_none() || closing_time.is_none())
        {
            return Err(CatalogError::invalid(format!(
                "Opening and closing time are required to add {}",
                week_day
            )));
        }

        Ok(Self {
            week_day,
            opening_time,
            closing_time,
            operation,
        })
    }
}

/// Validates a whole batch; the first malformed request fails it.
pub fn parse_mutations(
    requests: impl IntoIterator<Item = ScheduleMutationRequest>,
) -> Result<Vec<ScheduleMutation>> {
    requests.into_iter().map(ScheduleMutation::try_from).collect()
}
