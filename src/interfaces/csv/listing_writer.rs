use crate::application::catalog::{ArchivedAtm, ArchivedBranch, AtmListing, BranchListing};
use crate::domain::catalog::{Address, Atm, BranchType, Construction};
use crate::domain::schedule::{ScheduleEntry, WeekDay};
use crate::error::Result;
use chrono::NaiveTime;
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

#[derive(Serialize)]
struct BranchRow<'a> {
    id: Uuid,
    name: &'a str,
    bank_number: &'a str,
    phone_number: &'a str,
    #[serde(rename = "type")]
    branch_type: BranchType,
    address: &'a str,
    currency_exchange: bool,
    ramp: bool,
    closed: bool,
    open_now: bool,
}

#[derive(Serialize)]
struct AtmRow<'a> {
    id: Uuid,
    number: &'a str,
    inventory_number: &'a str,
    construction: Construction,
    address: &'a str,
    cash_deposit: bool,
    nfc: bool,
    hour24: bool,
    closed: bool,
    open_now: bool,
}

#[derive(Serialize)]
struct ScheduleRow {
    week_day: WeekDay,
    opening_time: NaiveTime,
    closing_time: NaiveTime,
}

fn full_address(address: Option<&Address>) -> &str {
    address.map_or("", |address| address.full_address.as_str())
}

/// Writes service results as CSV, one record per item, with a header row.
pub struct ListingWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ListingWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_branches(&mut self, listings: &[BranchListing]) -> Result<()> {
        for listing in listings {
            let branch = &listing.branch;
            self.writer.serialize(BranchRow {
                id: branch.id,
                name: &branch.name,
                bank_number: &branch.bank_number,
                phone_number: &branch.phone_number,
                branch_type: branch.branch_type,
                address: full_address(branch.address.as_ref()),
                currency_exchange: branch.has_currency_exchange,
                ramp: branch.has_ramp,
                closed: branch.is_closed,
                open_now: listing.open_now,
            })?;
        }
        self.flush()
    }

    pub fn write_atms(&mut self, listings: &[AtmListing]) -> Result<()> {
        for listing in listings {
            self.write_atm(&listing.atm, listing.open_now)?;
        }
        self.flush()
    }

    /// ATMs without a schedule-derived state, e.g. the result of a soft delete.
    pub fn write_closed_atms(&mut self, atms: &[Atm]) -> Result<()> {
        for atm in atms {
            self.write_atm(atm, false)?;
        }
        self.flush()
    }

    fn write_atm(&mut self, atm: &Atm, open_now: bool) -> Result<()> {
        self.writer.serialize(AtmRow {
            id: atm.id,
            number: &atm.number,
            inventory_number: &atm.inventory_number,
            construction: atm.construction,
            address: full_address(atm.address.as_ref()),
            cash_deposit: atm.has_cash_deposit,
            nfc: atm.has_nfc,
            hour24: atm.schedule.iter().any(ScheduleEntry::is_around_the_clock),
            closed: atm.is_closed,
            open_now,
        })?;
        Ok(())
    }

    pub fn write_archived_branches(&mut self, report: &[ArchivedBranch]) -> Result<()> {
        self.writer.write_record(["id", "name", "address"])?;
        for branch in report {
            self.writer.write_record([
                branch.id.to_string().as_str(),
                branch.name.as_str(),
                branch.address.as_str(),
            ])?;
        }
        self.flush()
    }

    pub fn write_archived_atm(&mut self, report: &ArchivedAtm) -> Result<()> {
        self.writer.write_record([
            "id",
            "inventory_number",
            "city",
            "street_type",
            "street",
            "house",
        ])?;
        self.writer.write_record([
            report.id.to_string().as_str(),
            report.inventory_number.as_str(),
            report.city.as_str(),
            report.street_type.as_str(),
            report.street.as_str(),
            report.house.as_str(),
        ])?;
        self.flush()
    }

    pub fn write_bank_numbers(&mut self, numbers: &[String]) -> Result<()> {
        self.writer.write_record(["bank_number"])?;
        for number in numbers {
            self.writer.write_record([number])?;
        }
        self.flush()
    }

    pub fn write_schedule(&mut self, schedule: &[ScheduleEntry]) -> Result<()> {
        for entry in schedule {
            self.writer.serialize(ScheduleRow {
                week_day: entry.week_day,
                opening_time: entry.opening_time,
                closing_time: entry.closing_time,
            })?;
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
