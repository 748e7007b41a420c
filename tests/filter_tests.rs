mod common;

use branch_atm_catalog::domain::criteria::{AtmFilterCriteria, BranchSearchCriteria};
use common::{
    ARBAT_ATM, ARBAT_BRANCH, CENTRAL_BRANCH, CLOSED_ATM, NEVSKY_BRANCH, ROUND_THE_CLOCK_ATM, hms,
    monday_plus, seeded_service,
};
use uuid::Uuid;

async fn branch_ids(criteria: BranchSearchCriteria) -> Vec<Uuid> {
    let service = seeded_service(monday_plus(0, hms(12, 0, 0))).await;
    service
        .search_branches(&criteria)
        .await
        .unwrap()
        .into_iter()
        .map(|listing| listing.branch.id)
        .collect()
}

async fn atm_ids(criteria: AtmFilterCriteria) -> Vec<Uuid> {
    let service = seeded_service(monday_plus(0, hms(12, 0, 0))).await;
    service
        .filter_atms(&criteria)
        .await
        .unwrap()
        .into_iter()
        .map(|listing| listing.atm.id)
        .collect()
}

#[tokio::test]
async fn test_empty_criteria_match_everything() {
    // Ordered by name: Арбатское, Невское, Центральное.
    assert_eq!(
        branch_ids(BranchSearchCriteria::default()).await,
        vec![ARBAT_BRANCH, NEVSKY_BRANCH, CENTRAL_BRANCH]
    );
    assert_eq!(atm_ids(AtmFilterCriteria::default()).await.len(), 3);
}

#[tokio::test]
async fn test_name_prefix_is_case_insensitive() {
    let criteria = BranchSearchCriteria {
        name_or_bank_number: Some("центр".to_string()),
        ..Default::default()
    };
    assert_eq!(branch_ids(criteria).await, vec![CENTRAL_BRANCH]);
}

#[tokio::test]
async fn test_name_must_be_a_prefix() {
    let criteria = BranchSearchCriteria {
        name_or_bank_number: Some("отделение".to_string()),
        ..Default::default()
    };
    assert!(branch_ids(criteria).await.is_empty());
}

#[tokio::test]
async fn test_text_with_digits_searches_bank_numbers() {
    let criteria = BranchSearchCriteria {
        name_or_bank_number: Some("Невское 22".to_string()),
        ..Default::default()
    };
    assert_eq!(branch_ids(criteria).await, vec![NEVSKY_BRANCH]);
}

#[tokio::test]
async fn test_blank_strings_are_ignored() {
    let criteria = BranchSearchCriteria {
        name_or_bank_number: Some(String::new()),
        full_address_query: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(branch_ids(criteria).await.len(), 3);

    let criteria = AtmFilterCriteria {
        city: Some(String::new()),
        inventory_number_fragment: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(atm_ids(criteria).await.len(), 3);
}

#[tokio::test]
async fn test_every_address_word_must_appear() {
    let criteria = BranchSearchCriteria {
        full_address_query: Some("тверская МОСКВА".to_string()),
        ..Default::default()
    };
    assert_eq!(branch_ids(criteria).await, vec![CENTRAL_BRANCH]);

    let criteria = BranchSearchCriteria {
        full_address_query: Some("тверская Невский".to_string()),
        ..Default::default()
    };
    assert!(branch_ids(criteria).await.is_empty());
}

#[tokio::test]
async fn test_boolean_branch_flags_combine() {
    let criteria = BranchSearchCriteria {
        has_currency_exchange: Some(true),
        is_closed: Some(false),
        ..Default::default()
    };
    assert_eq!(branch_ids(criteria).await, vec![CENTRAL_BRANCH]);
}

#[tokio::test]
async fn test_inventory_number_is_case_sensitive() {
    let criteria = AtmFilterCriteria {
        inventory_number_fragment: Some("INV".to_string()),
        ..Default::default()
    };
    assert_eq!(atm_ids(criteria).await, vec![ROUND_THE_CLOCK_ATM, ARBAT_ATM]);

    let criteria = AtmFilterCriteria {
        inventory_number_fragment: Some("inv".to_string()),
        ..Default::default()
    };
    assert_eq!(atm_ids(criteria).await, vec![CLOSED_ATM]);
}

#[tokio::test]
async fn test_hour24_false_includes_empty_schedules() {
    let criteria = AtmFilterCriteria {
        works_around_clock: Some(false),
        ..Default::default()
    };
    assert_eq!(atm_ids(criteria).await, vec![ARBAT_ATM, CLOSED_ATM]);
}

#[tokio::test]
async fn test_atm_address_parts_are_case_insensitive() {
    let criteria = AtmFilterCriteria {
        city: Some("москва".to_string()),
        street: Some("АРБ".to_string()),
        house: Some("10".to_string()),
        ..Default::default()
    };
    assert_eq!(atm_ids(criteria).await, vec![ARBAT_ATM]);

    let criteria = AtmFilterCriteria {
        street_type: Some("пр.".to_string()),
        ..Default::default()
    };
    assert_eq!(atm_ids(criteria).await, vec![CLOSED_ATM]);
}

#[tokio::test]
async fn test_atm_feature_flags() {
    let criteria = AtmFilterCriteria {
        accepts_cash_deposit: Some(true),
        supports_contactless: Some(false),
        ..Default::default()
    };
    assert_eq!(atm_ids(criteria).await, vec![CLOSED_ATM]);

    let criteria = AtmFilterCriteria {
        working_now: Some(true),
        supports_contactless: Some(true),
        ..Default::default()
    };
    assert_eq!(atm_ids(criteria).await, vec![ROUND_THE_CLOCK_ATM]);
}
