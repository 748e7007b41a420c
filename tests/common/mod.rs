#![allow(dead_code)]

use branch_atm_catalog::application::catalog::CatalogService;
use branch_atm_catalog::infrastructure::clock::FixedClock;
use branch_atm_catalog::infrastructure::in_memory::InMemoryStore;
use branch_atm_catalog::interfaces::json::catalog_reader::CatalogReader;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use uuid::Uuid;

pub const CATALOG: &str = "tests/fixtures/catalog.json";
pub const MUTATIONS: &str = "tests/fixtures/mutations.csv";

pub const CENTRAL_BRANCH: Uuid = Uuid::from_u128(0x11111111_1111_4111_8111_111111111111);
pub const ARBAT_BRANCH: Uuid = Uuid::from_u128(0x22222222_2222_4222_8222_222222222222);
pub const NEVSKY_BRANCH: Uuid = Uuid::from_u128(0x33333333_3333_4333_8333_333333333333);

pub const ROUND_THE_CLOCK_ATM: Uuid = Uuid::from_u128(0xaaaaaaaa_aaaa_4aaa_8aaa_aaaaaaaaaaaa);
pub const ARBAT_ATM: Uuid = Uuid::from_u128(0xbbbbbbbb_bbbb_4bbb_8bbb_bbbbbbbbbbbb);
pub const CLOSED_ATM: Uuid = Uuid::from_u128(0xcccccccc_cccc_4ccc_8ccc_cccccccccccc);

pub fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

/// A Monday. 2024-01-01 + `offset` days at `time`.
pub fn monday_plus(offset: u64, time: NaiveTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(chrono::Days::new(offset))
        .unwrap()
        .and_time(time)
}

/// An in-memory service seeded with the fixture catalog, with its clock stopped at `now`.
pub async fn seeded_service(now: NaiveDateTime) -> CatalogService {
    let service = CatalogService::new(
        Box::new(InMemoryStore::new()),
        Box::new(InMemoryStore::new()),
        Arc::new(FixedClock::new(now)),
    );
    let catalog = CatalogReader::from_path(CATALOG).unwrap().read().unwrap();
    service.load_catalog(catalog).await.unwrap();
    service
}

/// Writes a mutations CSV with the standard header followed by `rows`.
pub fn mutations_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "weekDay,openingTime,closingTime,operation").unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}
