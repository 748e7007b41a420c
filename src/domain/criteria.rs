use serde::{Deserialize, Serialize};

/// Branch search request. Every field is optional; an absent field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSearchCriteria {
    /// Branch name prefix, or bank number prefix when the text contains any digit.
    #[serde(default, alias = "nameOrCode")]
    pub name_or_bank_number: Option<String>,
    #[serde(default)]
    pub has_currency_exchange: Option<bool>,
    #[serde(default, rename = "hasPandus", alias = "hasRamp")]
    pub has_ramp: Option<bool>,
    #[serde(default)]
    pub is_closed: Option<bool>,
    /// Whitespace-separated words that must all occur in the full address.
    #[serde(default, rename = "fullAddress", alias = "fullAddressQuery")]
    pub full_address_query: Option<String>,
}

/// ATM filter request. Every field is optional; an absent field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtmFilterCriteria {
    #[serde(default, rename = "inventoryNumber")]
    pub inventory_number_fragment: Option<String>,
    /// `true` keeps ATMs with at least one around-the-clock day, `false` those with none.
    #[serde(default, rename = "hour24")]
    pub works_around_clock: Option<bool>,
    /// Compared against the administrative closed flag, not against the schedule.
    #[serde(default, rename = "workingNow")]
    pub working_now: Option<bool>,
    #[serde(default, rename = "cashDeposit")]
    pub accepts_cash_deposit: Option<bool>,
    #[serde(default, rename = "nfc")]
    pub supports_contactless: Option<bool>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, rename = "streetType")]
    pub street_type: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house: Option<String>,
}
