use crate::domain::ports::ClockRef;
use crate::domain::schedule::{
    ScheduleEntry, ScheduleMutation, ScheduleOperation, ScheduleOwner, WeekDay, is_open_at,
};
use crate::error::{CatalogError, Result};
use chrono::Datelike;
use std::collections::HashSet;

/// Net effect of applying a mutation batch to a weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciliation {
    /// The schedule after the batch, ordered by weekday.
    pub schedule: Vec<ScheduleEntry>,
    pub deleted: Vec<ScheduleEntry>,
    /// Entries touched by CHANGE, with their new times.
    pub changed: Vec<ScheduleEntry>,
    pub added: Vec<ScheduleEntry>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.changed.is_empty() && self.added.is_empty()
    }
}

/// Owns the weekly opening-hours rules shared by branches and ATMs.
pub struct ScheduleEngine {
    clock: ClockRef,
}

impl ScheduleEngine {
    pub fn new(clock: ClockRef) -> Self {
        Self { clock }
    }

    /// Whether the schedule covers the clock's current weekday and time.
    pub fn is_open_now(&self, entries: &[ScheduleEntry]) -> bool {
        let now = self.clock.now();
        is_open_at(entries, WeekDay::from(now.weekday()), now.time())
    }

    /// Re-binds `entries` to `owner` and checks that no weekday appears twice.
    pub fn bind(owner: ScheduleOwner, entries: Vec<ScheduleEntry>) -> Result<Vec<ScheduleEntry>> {
        let mut seen = HashSet::new();
        let mut bound = Vec::with_capacity(entries.len());
        for entry in entries {
            if !seen.insert(entry.week_day) {
                return Err(CatalogError::AlreadyExists(format!(
                    "Day {} appears more than once in the schedule of {}",
                    entry.week_day, owner
                )));
            }
            bound.push(ScheduleEntry::new(
                owner,
                entry.week_day,
                entry.opening_time,
                entry.closing_time,
            ));
        }
        bound.sort_by_key(|entry| entry.week_day);
        Ok(bound)
    }

    /// Applies a batch of mutations to `current`, the owner's stored schedule.
    ///
    /// Runs in passes: existence check for every DELETE and CHANGE, then all
    /// deletes, then all changes, then all adds. Deletes therefore free a weekday
    /// for an ADD anywhere in the same batch. Nothing is returned unless the
    /// whole batch is valid, so callers persist either everything or nothing.
    pub fn reconcile(
        owner: ScheduleOwner,
        current: &[ScheduleEntry],
        mutations: &[ScheduleMutation],
    ) -> Result<Reconciliation> {
        let of = |operation: ScheduleOperation| {
            mutations
                .iter()
                .filter(move |mutation| mutation.operation == operation)
        };

        for mutation in mutations.iter().filter(|m| {
            matches!(
                m.operation,
                ScheduleOperation::Delete | ScheduleOperation::Change
            )
        }) {
            if !current.iter().any(|entry| entry.week_day == mutation.week_day) {
                return Err(CatalogError::NotFound(format!(
                    "Day {} is not in the schedule of {}",
                    mutation.week_day.number(),
                    owner
                )));
            }
        }

        let mut schedule = current.to_vec();

        let mut deleted = Vec::new();
        for mutation in of(ScheduleOperation::Delete) {
            if let Some(position) = schedule
                .iter()
                .position(|entry| entry.week_day == mutation.week_day)
            {
                deleted.push(schedule.remove(position));
            }
        }

        let mut changed_days = Vec::new();
        for mutation in of(ScheduleOperation::Change) {
            let entry = schedule
                .iter_mut()
                .find(|entry| entry.week_day == mutation.week_day)
                .ok_or_else(|| {
                    CatalogError::NotFound(format!(
                        "Day {} of {} is deleted by the same update and cannot be changed",
                        mutation.week_day.number(),
                        owner
                    ))
                })?;
            if let Some(opening_time) = mutation.opening_time {
                entry.opening_time = opening_time;
            }
            if let Some(closing_time) = mutation.closing_time {
                entry.closing_time = closing_time;
            }
            if !changed_days.contains(&mutation.week_day) {
                changed_days.push(mutation.week_day);
            }
        }

        let mut added: Vec<ScheduleEntry> = Vec::new();
        for mutation in of(ScheduleOperation::Add) {
            let occupied = schedule
                .iter()
                .chain(added.iter())
                .any(|entry| entry.week_day == mutation.week_day);
            if occupied {
                return Err(CatalogError::AlreadyExists(format!(
                    "Day {} is already in the schedule of {}",
                    mutation.week_day.number(),
                    owner
                )));
            }
            let (Some(opening_time), Some(closing_time)) =
                (mutation.opening_time, mutation.closing_time)
            else {
                return Err(CatalogError::invalid(format!(
                    "Opening and closing time are required to add {}",
                    mutation.week_day
                )));
            };
            added.push(ScheduleEntry::new(
                owner,
                mutation.week_day,
                opening_time,
                closing_time,
            ));
        }

        schedule.extend(added.iter().cloned());
        schedule.sort_by_key(|entry| entry.week_day);

        let changed = schedule
            .iter()
            .filter(|entry| changed_days.contains(&entry.week_day))
            .cloned()
            .collect();

        Ok(Reconciliation {
            schedule,
            deleted,
            changed,
            added,
        })
    }
}
