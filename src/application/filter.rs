use crate::domain::catalog::{Address, Atm, Branch};
use crate::domain::criteria::{AtmFilterCriteria, BranchSearchCriteria};
use crate::domain::predicate::Predicate;

/// How a free-text "name or bank number" query is interpreted.
///
/// Digits win: if the text contains any ASCII digit, only the digits are kept
/// and matched as a bank number prefix ("BranchName 1111" searches "1111").
/// Only text without digits is matched as a name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOrCodeQuery {
    BankNumberPrefix(String),
    NamePrefix(String),
}

impl NameOrCodeQuery {
    /// Returns `None` for blank input.
    pub fn classify(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            Some(NameOrCodeQuery::NamePrefix(text.to_lowercase()))
        } else {
            Some(NameOrCodeQuery::BankNumberPrefix(digits))
        }
    }
}

/// Splits a free-text address query into lowercase words.
pub fn address_tokens(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|text| !text.is_empty()).cloned()
}

fn contains_ignore_case(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

/// Builds the predicate selecting branches for a search request.
pub fn compose_branch_predicate(criteria: &BranchSearchCriteria) -> Predicate<Branch> {
    let mut predicate: Predicate<Branch> = Predicate::all();

    match criteria
        .name_or_bank_number
        .as_deref()
        .and_then(NameOrCodeQuery::classify)
    {
        Some(NameOrCodeQuery::BankNumberPrefix(digits)) => {
            predicate.push(format!("bank_number starts with '{}'", digits), move |b: &Branch| {
                b.bank_number.to_lowercase().starts_with(&digits)
            });
        }
        Some(NameOrCodeQuery::NamePrefix(name)) => {
            predicate.push(format!("name starts with '{}'", name), move |b: &Branch| {
                b.name.to_lowercase().starts_with(&name)
            });
        }
        None => {}
    }

    if let Some(expected) = criteria.has_currency_exchange {
        predicate.push(
            format!("has_currency_exchange = {}", expected),
            move |b: &Branch| b.has_currency_exchange == expected,
        );
    }
    if let Some(expected) = criteria.has_ramp {
        predicate.push(format!("has_ramp = {}", expected), move |b: &Branch| {
            b.has_ramp == expected
        });
    }
    if let Some(expected) = criteria.is_closed {
        predicate.push(format!("is_closed = {}", expected), move |b: &Branch| {
            b.is_closed == expected
        });
    }

    if let Some(query) = criteria.full_address_query.as_deref() {
        let tokens = address_tokens(query);
        if !tokens.is_empty() {
            predicate.push(
                format!("full_address contains all of {:?}", tokens),
                move |b: &Branch| {
                    b.address.as_ref().is_some_and(|address| {
                        let full = address.full_address.to_lowercase();
                        tokens.iter().all(|token| full.contains(token.as_str()))
                    })
                },
            );
        }
    }

    predicate
}

fn push_address_clause(
    predicate: &mut Predicate<Atm>,
    field: &'static str,
    fragment: Option<&String>,
    read: fn(&Address) -> &str,
) {
    if let Some(fragment) = non_blank(fragment) {
        let needle = fragment.to_lowercase();
        predicate.push(format!("{} contains '{}'", field, needle), move |atm: &Atm| {
            atm.address
                .as_ref()
                .is_some_and(|address| contains_ignore_case(read(address), &needle))
        });
    }
}

/// Builds the predicate selecting ATMs for a filter request.
pub fn compose_atm_predicate(criteria: &AtmFilterCriteria) -> Predicate<Atm> {
    let mut predicate: Predicate<Atm> = Predicate::all();

    if let Some(fragment) = non_blank(criteria.inventory_number_fragment.as_ref()) {
        predicate.push(
            format!("inventory_number contains '{}'", fragment),
            move |atm: &Atm| atm.inventory_number.contains(fragment.as_str()),
        );
    }

    if let Some(expected) = criteria.accepts_cash_deposit {
        predicate.push(format!("has_cash_deposit = {}", expected), move |atm: &Atm| {
            atm.has_cash_deposit == expected
        });
    }
    if let Some(expected) = criteria.supports_contactless {
        predicate.push(format!("has_nfc = {}", expected), move |atm: &Atm| {
            atm.has_nfc == expected
        });
    }

    // Administrative status only; the weekly schedule is not consulted.
    if let Some(working) = criteria.working_now {
        predicate.push(format!("is_closed = {}", !working), move |atm: &Atm| {
            atm.is_closed != working
        });
    }

    if let Some(around_the_clock) = criteria.works_around_clock {
        predicate.push(
            format!("around-the-clock day present = {}", around_the_clock),
            move |atm: &Atm| {
                atm.schedule.iter().any(|entry| entry.is_around_the_clock()) == around_the_clock
            },
        );
    }

    push_address_clause(&mut predicate, "city", criteria.city.as_ref(), |a| a.city.as_str());
    push_address_clause(
        &mut predicate,
        "street_type",
        criteria.street_type.as_ref(),
        |a| a.street_type.as_str(),
    );
    push_address_clause(&mut predicate, "street", criteria.street.as_ref(), |a| {
        a.street.as_str()
    });
    push_address_clause(&mut predicate, "house", criteria.house.as_ref(), |a| {
        a.house.as_str()
    });

    predicate
}
