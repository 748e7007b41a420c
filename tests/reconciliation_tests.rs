mod common;

use branch_atm_catalog::application::schedule::ScheduleEngine;
use branch_atm_catalog::domain::schedule::{
    ScheduleEntry, ScheduleMutation, ScheduleOperation, ScheduleOwner, WeekDay,
};
use branch_atm_catalog::error::CatalogError;
use common::{ARBAT_BRANCH, CLOSED_ATM, hms, monday_plus, seeded_service};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

fn random_day(rng: &mut StdRng) -> WeekDay {
    WeekDay::from_number(rng.gen_range(1..=7)).unwrap()
}

fn random_mutation(rng: &mut StdRng) -> ScheduleMutation {
    let day = random_day(rng);
    match rng.gen_range(0..3) {
        0 => ScheduleMutation::add(day, hms(9, 0, 0), hms(18, 0, 0)),
        1 => ScheduleMutation::change(day, Some(hms(rng.gen_range(6..12), 0, 0)), None),
        _ => ScheduleMutation::delete(day),
    }
}

#[test]
fn test_random_batches_keep_one_entry_per_weekday() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let owner = ScheduleOwner::atm(Uuid::new_v4());
    let mut applied = 0;

    for _ in 0..2_000 {
        let current: Vec<ScheduleEntry> = WeekDay::ALL
            .iter()
            .filter(|_| rng.gen_bool(0.5))
            .map(|day| ScheduleEntry::new(owner, *day, hms(10, 0, 0), hms(17, 0, 0)))
            .collect();
        let batch: Vec<ScheduleMutation> =
            (0..rng.gen_range(0..6)).map(|_| random_mutation(&mut rng)).collect();

        let Ok(result) = ScheduleEngine::reconcile(owner, &current, &batch) else {
            continue;
        };
        applied += 1;

        let days: Vec<WeekDay> = result.schedule.iter().map(|entry| entry.week_day).collect();
        let unique: BTreeSet<WeekDay> = days.iter().copied().collect();
        assert_eq!(days.len(), unique.len(), "duplicate weekday in {:?}", days);
        assert!(days.windows(2).all(|pair| pair[0] < pair[1]));

        let mut expected: BTreeSet<WeekDay> = current.iter().map(|entry| entry.week_day).collect();
        for mutation in &batch {
            if mutation.operation == ScheduleOperation::Delete {
                expected.remove(&mutation.week_day);
            }
        }
        for mutation in &batch {
            if mutation.operation == ScheduleOperation::Add {
                expected.insert(mutation.week_day);
            }
        }
        assert_eq!(unique, expected);
        assert!(result.schedule.iter().all(|entry| entry.owner() == owner));
    }

    assert!(applied > 0);
}

#[tokio::test]
async fn test_failed_batch_leaves_stored_schedule_untouched() {
    let service = seeded_service(monday_plus(0, hms(12, 0, 0))).await;
    let before = service
        .update_branch_schedule(ARBAT_BRANCH, &[])
        .await
        .unwrap()
        .schedule;

    // Deleting Saturday would succeed; Sunday has no entry, so nothing applies.
    let err = service
        .update_branch_schedule(
            ARBAT_BRANCH,
            &[
                ScheduleMutation::delete(WeekDay::Saturday),
                ScheduleMutation::delete(WeekDay::Sunday),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let after = service
        .update_branch_schedule(ARBAT_BRANCH, &[])
        .await
        .unwrap()
        .schedule;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_add_conflicts_with_stored_entry() {
    let service = seeded_service(monday_plus(0, hms(12, 0, 0))).await;
    let err = service
        .update_branch_schedule(
            ARBAT_BRANCH,
            &[ScheduleMutation::add(WeekDay::Monday, hms(8, 0, 0), hms(9, 0, 0))],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_concurrent_updates_are_not_lost() {
    let service = Arc::new(seeded_service(monday_plus(0, hms(12, 0, 0))).await);

    let handles: Vec<_> = WeekDay::ALL
        .iter()
        .map(|day| {
            let service = Arc::clone(&service);
            let mutation = ScheduleMutation::add(*day, hms(8, 0, 0), hms(20, 0, 0));
            tokio::spawn(async move { service.update_atm_schedule(CLOSED_ATM, &[mutation]).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let schedule = service
        .update_atm_schedule(CLOSED_ATM, &[])
        .await
        .unwrap()
        .schedule;
    let days: Vec<WeekDay> = schedule.iter().map(|entry| entry.week_day).collect();
    assert_eq!(days, WeekDay::ALL.to_vec());
}
