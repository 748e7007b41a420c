use super::schedule::{ScheduleEntry, ScheduleOwner, WeekDay};
use crate::error::{CatalogError, Result};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A record the storage layer keeps in its own collection, keyed by id.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Name of the collection (column family, table) holding this entity.
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// An entity that owns a weekly opening-hours schedule.
pub trait Schedulable {
    fn owner(&self) -> ScheduleOwner;
    fn schedule(&self) -> &[ScheduleEntry];
    fn replace_schedule(&mut self, schedule: Vec<ScheduleEntry>);

    /// Builds an entry bound to this entity.
    fn schedule_entry(
        &self,
        week_day: WeekDay,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
    ) -> ScheduleEntry {
        ScheduleEntry::new(self.owner(), week_day, opening_time, closing_time)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub city: String,
    pub street_type: String,
    pub street: String,
    pub house: String,
    #[serde(default)]
    pub metro_station: Option<String>,
    #[serde(default)]
    pub latitude: Option<Decimal>,
    #[serde(default)]
    pub longitude: Option<Decimal>,
    pub full_address: String,
}

impl Address {
    /// Creates an address whose full text is composed from its parts.
    pub fn new(
        city: impl Into<String>,
        street_type: impl Into<String>,
        street: impl Into<String>,
        house: impl Into<String>,
    ) -> Self {
        let city = city.into();
        let street_type = street_type.into();
        let street = street.into();
        let house = house.into();
        let mut address = Self {
            id: Uuid::new_v4(),
            city,
            street_type,
            street,
            house,
            metro_station: None,
            latitude: None,
            longitude: None,
            full_address: String::new(),
        };
        address.recompose();
        address
    }

    /// An address with a fresh id and no parts yet, for partial updates to fill in.
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4(),
            ..Self::default()
        }
    }

    /// Rebuilds `full_address` from the parts.
    pub fn recompose(&mut self) {
        self.full_address = format!(
            "{}, {} {}, {}",
            self.city, self.street_type, self.street, self.house
        );
    }

    pub fn with_coordinates(mut self, latitude: Decimal, longitude: Decimal) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchType {
    HeadOffice,
    #[default]
    Branch,
    AdditionalOffice,
    OperationsOffice,
    CreditAndCashOffice,
    BankingServiceOffice,
    InternalBankingUnit,
    SupportiveBankingUnit,
}

impl FromStr for BranchType {
    type Err = CatalogError;

    /// Accepts the wire names, e.g. `HEAD_OFFICE`, in any case.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HEAD_OFFICE" => Ok(Self::HeadOffice),
            "BRANCH" => Ok(Self::Branch),
            "ADDITIONAL_OFFICE" => Ok(Self::AdditionalOffice),
            "OPERATIONS_OFFICE" => Ok(Self::OperationsOffice),
            "CREDIT_AND_CASH_OFFICE" => Ok(Self::CreditAndCashOffice),
            "BANKING_SERVICE_OFFICE" => Ok(Self::BankingServiceOffice),
            "INTERNAL_BANKING_UNIT" => Ok(Self::InternalBankingUnit),
            "SUPPORTIVE_BANKING_UNIT" => Ok(Self::SupportiveBankingUnit),
            other => Err(CatalogError::invalid(format!("Unknown branch type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Construction {
    #[default]
    Internal,
    External,
}

/// A bank branch.
///
/// `is_closed` is the administrative status set by archival. Whether the branch
/// is open at a given moment is a separate notion derived from `schedule`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub bank_number: String,
    pub phone_number: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub has_currency_exchange: bool,
    #[serde(default, rename = "hasPandus", alias = "hasRamp")]
    pub has_ramp: bool,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default, rename = "type")]
    pub branch_type: BranchType,
    #[serde(default, rename = "workSchedule")]
    pub schedule: Vec<ScheduleEntry>,
}

impl Branch {
    pub fn new(
        name: impl Into<String>,
        bank_number: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bank_number: bank_number.into(),
            phone_number: phone_number.into(),
            address: None,
            has_currency_exchange: false,
            has_ramp: false,
            is_closed: false,
            branch_type: BranchType::default(),
            schedule: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn is_in_service(&self) -> bool {
        !self.is_closed
    }
}

impl Entity for Branch {
    const COLLECTION: &'static str = "branches";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Schedulable for Branch {
    fn owner(&self) -> ScheduleOwner {
        ScheduleOwner::branch(self.id)
    }

    fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    fn replace_schedule(&mut self, schedule: Vec<ScheduleEntry>) {
        self.schedule = schedule;
    }
}

/// An ATM. Like a branch, `is_closed` is administrative, not schedule-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Atm {
    pub id: Uuid,
    pub number: String,
    pub inventory_number: String,
    /// Bank number of the branch servicing this ATM.
    #[serde(default)]
    pub branch_bank_number: Option<String>,
    #[serde(default)]
    pub installation_location: Option<String>,
    #[serde(default)]
    pub construction: Construction,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub has_cash_deposit: bool,
    #[serde(default)]
    pub has_nfc: bool,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default, rename = "workSchedule")]
    pub schedule: Vec<ScheduleEntry>,
}

impl Atm {
    pub fn new(number: impl Into<String>, inventory_number: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            inventory_number: inventory_number.into(),
            branch_bank_number: None,
            installation_location: None,
            construction: Construction::default(),
            address: None,
            has_cash_deposit: false,
            has_nfc: false,
            is_closed: false,
            schedule: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn is_in_service(&self) -> bool {
        !self.is_closed
    }
}

impl Entity for Atm {
    const COLLECTION: &'static str = "atms";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Schedulable for Atm {
    fn owner(&self) -> ScheduleOwner {
        ScheduleOwner::atm(self.id)
    }

    fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    fn replace_schedule(&mut self, schedule: Vec<ScheduleEntry>) {
        self.schedule = schedule;
    }
}

/// A seed catalog: every branch and ATM to load into storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub atms: Vec<Atm>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::OwnerKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_address_full_text_is_composed() {
        let address = Address::new("Москва", "ул.", "Тестовая", "1");
        assert_eq!(address.full_address, "Москва, ул. Тестовая, 1");
    }

    #[test]
    fn test_address_coordinates() {
        let address = Address::new("Москва", "ул.", "Ленина", "173")
            .with_coordinates(dec!(55.751244), dec!(37.618423));
        assert_eq!(address.latitude, Some(dec!(55.751244)));
        assert_eq!(address.longitude, Some(dec!(37.618423)));
    }

    #[test]
    fn test_schedule_entry_is_bound_to_owner() {
        let atm = Atm::new("A-1", "0001244890");
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        let entry = atm.schedule_entry(WeekDay::Monday, midnight, midnight);
        assert_eq!(entry.owner_id, atm.id);
        assert_eq!(entry.owner_kind, OwnerKind::Atm);
        assert!(entry.is_around_the_clock());
    }

    #[test]
    fn test_branch_type_parses_wire_names() {
        assert_eq!("head_office".parse::<BranchType>().unwrap(), BranchType::HeadOffice);
        assert_eq!(
            " CREDIT_AND_CASH_OFFICE".parse::<BranchType>().unwrap(),
            BranchType::CreditAndCashOffice
        );
        assert!("KIOSK".parse::<BranchType>().is_err());
    }

    #[test]
    fn test_branch_deserializes_request_field_names() {
        let json = r#"{
            "id": "7f1c0e4e-3a52-4c8e-9a43-2f4d3c1b6a10",
            "name": "Центральное отделение",
            "bankNumber": "1111",
            "phoneNumber": "+7 495 000-00-00",
            "hasPandus": true,
            "type": "HEAD_OFFICE",
            "workSchedule": []
        }"#;
        let branch: Branch = serde_json::from_str(json).unwrap();
        assert!(branch.has_ramp);
        assert!(!branch.has_currency_exchange);
        assert!(branch.is_in_service());
        assert_eq!(branch.branch_type, BranchType::HeadOffice);
        assert!(branch.address.is_none());
    }
}
