use super::catalog::{Address, Atm, Branch, BranchType, Construction};
use super::schedule::ScheduleEntry;
use crate::error::{CatalogError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Partial update of a branch's own fields. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bank_number: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub has_currency_exchange: Option<bool>,
    #[serde(default, rename = "hasPandus", alias = "hasRamp")]
    pub has_ramp: Option<bool>,
    #[serde(default)]
    pub is_closed: Option<bool>,
    #[serde(default, rename = "type")]
    pub branch_type: Option<BranchType>,
}

impl BranchUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copies every present field onto `branch`. Uniqueness is the caller's concern.
    pub fn apply_to(&self, branch: &mut Branch) {
        if let Some(name) = &self.name {
            branch.name = name.clone();
        }
        if let Some(bank_number) = &self.bank_number {
            branch.bank_number = bank_number.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            branch.phone_number = phone_number.clone();
        }
        if let Some(flag) = self.has_currency_exchange {
            branch.has_currency_exchange = flag;
        }
        if let Some(flag) = self.has_ramp {
            branch.has_ramp = flag;
        }
        if let Some(flag) = self.is_closed {
            branch.is_closed = flag;
        }
        if let Some(branch_type) = self.branch_type {
            branch.branch_type = branch_type;
        }
    }
}

/// Partial update of an address. The full address text is recomposed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressUpdate {
    #[serde(default, alias = "cityName")]
    pub city: Option<String>,
    #[serde(default)]
    pub street_type: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub metro_station: Option<String>,
    #[serde(default)]
    pub latitude: Option<Decimal>,
    #[serde(default)]
    pub longitude: Option<Decimal>,
}

impl AddressUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Latitude within [-90, 90], longitude within [-180, 180].
    pub fn validate(&self) -> Result<()> {
        let out_of_range = |value: Option<Decimal>, bound: i64| {
            value.is_some_and(|value| value.abs() > Decimal::from(bound))
        };
        if out_of_range(self.latitude, 90) {
            return Err(CatalogError::invalid("Latitude must be between -90 and 90"));
        }
        if out_of_range(self.longitude, 180) {
            return Err(CatalogError::invalid("Longitude must be between -180 and 180"));
        }
        Ok(())
    }

    pub fn apply_to(&self, address: &mut Address) -> Result<()> {
        self.validate()?;
        if let Some(city) = &self.city {
            address.city = city.clone();
        }
        if let Some(street_type) = &self.street_type {
            address.street_type = street_type.clone();
        }
        if let Some(street) = &self.street {
            address.street = street.clone();
        }
        if let Some(house) = &self.house {
            address.house = house.clone();
        }
        if let Some(metro_station) = &self.metro_station {
            address.metro_station = Some(metro_station.clone());
        }
        if let Some(latitude) = self.latitude {
            address.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            address.longitude = Some(longitude);
        }
        address.recompose();
        Ok(())
    }
}

/// Update of an ATM's fields. A present `schedule` replaces the stored one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtmUpdate {
    #[serde(default)]
    pub inventory_number: Option<String>,
    #[serde(default)]
    pub installation_location: Option<String>,
    #[serde(default)]
    pub construction: Option<Construction>,
    #[serde(default, alias = "cashDeposit")]
    pub has_cash_deposit: Option<bool>,
    #[serde(default, alias = "nfc")]
    pub has_nfc: Option<bool>,
    /// Bank number of the new servicing branch.
    #[serde(default)]
    pub branch_bank_number: Option<String>,
    #[serde(default, alias = "addressInfo")]
    pub address: Option<AddressUpdate>,
    #[serde(default, alias = "schedules", alias = "workSchedule")]
    pub schedule: Option<Vec<ScheduleEntry>>,
}

impl AtmUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copies the plain fields and the address onto `atm`. The schedule and the
    /// servicing branch are left to the caller, which has to check them first.
    pub fn apply_fields_to(&self, atm: &mut Atm) -> Result<()> {
        if let Some(address) = &self.address {
            address.apply_to(atm.address.get_or_insert_with(Address::blank))?;
        }
        if let Some(inventory_number) = &self.inventory_number {
            atm.inventory_number = inventory_number.clone();
        }
        if let Some(location) = &self.installation_location {
            atm.installation_location = Some(location.clone());
        }
        if let Some(construction) = self.construction {
            atm.construction = construction;
        }
        if let Some(flag) = self.has_cash_deposit {
            atm.has_cash_deposit = flag;
        }
        if let Some(flag) = self.has_nfc {
            atm.has_nfc = flag;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_branch_update_touches_only_present_fields() {
        let mut branch = Branch::new("Центральное", "1111", "+7 495");
        let update = BranchUpdate {
            phone_number: Some("+7 812".to_string()),
            has_ramp: Some(true),
            branch_type: Some(BranchType::HeadOffice),
            ..Default::default()
        };
        update.apply_to(&mut branch);

        assert_eq!(branch.name, "Центральное");
        assert_eq!(branch.bank_number, "1111");
        assert_eq!(branch.phone_number, "+7 812");
        assert!(branch.has_ramp);
        assert_eq!(branch.branch_type, BranchType::HeadOffice);
    }

    #[test]
    fn test_address_update_recomposes_full_address() {
        let mut address = Address::new("Москва", "ул.", "Тверская", "1");
        let update = AddressUpdate {
            street: Some("Арбат".to_string()),
            house: Some("10".to_string()),
            latitude: Some(dec!(55.7522)),
            ..Default::default()
        };
        update.apply_to(&mut address).unwrap();

        assert_eq!(address.full_address, "Москва, ул. Арбат, 10");
        assert_eq!(address.latitude, Some(dec!(55.7522)));
        assert_eq!(address.longitude, None);
    }

    #[test]
    fn test_address_update_rejects_out_of_range_coordinates() {
        let mut address = Address::new("Москва", "ул.", "Тверская", "1");
        let update = AddressUpdate {
            street: Some("Арбат".to_string()),
            longitude: Some(dec!(180.5)),
            ..Default::default()
        };
        assert!(matches!(
            update.apply_to(&mut address).unwrap_err(),
            CatalogError::InvalidArgument(_)
        ));
        assert_eq!(address.street, "Тверская");
    }

    #[test]
    fn test_atm_update_deserializes_request_names() {
        let json = r#"{
            "inventoryNumber": "INV-9",
            "cashDeposit": true,
            "addressInfo": { "cityName": "Казань" },
            "schedules": [
                { "weekDay": 1, "openingTime": "08:00:00", "closingTime": "20:00:00" }
            ]
        }"#;
        let update: AtmUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.inventory_number.as_deref(), Some("INV-9"));
        assert_eq!(update.has_cash_deposit, Some(true));
        assert_eq!(
            update.address.and_then(|address| address.city).as_deref(),
            Some("Казань")
        );
        assert_eq!(update.schedule.map(|entries| entries.len()), Some(1));
    }
}
