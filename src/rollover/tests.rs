#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;
use crate::ledger::{period_view, PeriodTotals};
use crate::models::{Category, MovementKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bill(id: i64, owner: i64, on: NaiveDate, recurring: bool) -> Movement {
    Movement {
        id,
        owner,
        occurred_on: on,
        category: Category::Housing,
        description: "Rent".into(),
        kind: MovementKind::Expense,
        amount: dec!(-1000),
        is_recurring: recurring,
        is_settled: true,
    }
}

fn period(s: &str) -> Period {
    s.parse().unwrap()
}

// ── Date arithmetic ───────────────────────────────────────────

#[test]
fn test_mid_month_keeps_day() {
    assert_eq!(next_month(date(2024, 1, 15)), Some(date(2024, 2, 15)));
}

#[test]
fn test_month_end_clamps_non_leap() {
    assert_eq!(next_month(date(2023, 1, 31)), Some(date(2023, 2, 28)));
}

#[test]
fn test_month_end_clamps_leap() {
    assert_eq!(next_month(date(2024, 1, 31)), Some(date(2024, 2, 29)));
}

#[test]
fn test_thirty_first_into_thirty_day_month() {
    assert_eq!(next_month(date(2024, 3, 31)), Some(date(2024, 4, 30)));
}

#[test]
fn test_december_rolls_into_next_year() {
    assert_eq!(next_month(date(2023, 12, 31)), Some(date(2024, 1, 31)));
}

#[test]
fn test_calendar_end_cannot_roll() {
    assert_eq!(next_month(NaiveDate::MAX), None);
}

// ── roll_forward ──────────────────────────────────────────────

#[test]
fn test_only_recurring_in_source_period_roll() {
    let movements = vec![
        bill(1, 7, date(2024, 1, 10), true),
        bill(2, 7, date(2024, 1, 12), false),
        bill(3, 7, date(2024, 2, 10), true),
        bill(4, 7, date(2023, 1, 10), true),
    ];
    let drafts = roll_forward(7, &movements, period("2024-01"));
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].occurred_on, date(2024, 2, 10));
}

#[test]
fn test_draft_copies_fields_and_starts_unpaid() {
    let mut source = bill(1, 7, date(2024, 1, 31), true);
    source.category = Category::Subscriptions;
    source.description = "Music".into();
    source.amount = dec!(-10.99);
    let drafts = roll_forward(7, &[source], period("2024-01"));

    assert_eq!(
        drafts,
        vec![NewMovement {
            occurred_on: date(2024, 2, 29),
            category: Category::Subscriptions,
            description: "Music".into(),
            kind: MovementKind::Expense,
            amount: dec!(-10.99),
            is_recurring: true,
            is_settled: false,
        }]
    );
}

#[test]
fn test_no_recurring_gives_empty_drafts() {
    let movements = vec![bill(1, 7, date(2024, 1, 10), false)];
    assert!(roll_forward(7, &movements, period("2024-01")).is_empty());
    assert!(roll_forward(7, &[], period("2024-01")).is_empty());
}

#[test]
fn test_other_owners_rows_are_ignored() {
    let movements = vec![
        bill(1, 7, date(2024, 1, 10), true),
        bill(2, 8, date(2024, 1, 11), true),
    ];
    let drafts = roll_forward(7, &movements, period("2024-01"));
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].occurred_on, date(2024, 2, 10));
}

#[test]
fn test_rolling_twice_is_not_idempotent() {
    let movements = vec![bill(1, 7, date(2024, 1, 10), true)];
    let first = roll_forward(7, &movements, period("2024-01"));
    let second = roll_forward(7, &movements, period("2024-01"));
    assert_eq!(first, second);
    assert_eq!(first.len() + second.len(), 2);
}

#[test]
fn test_existing_in_target_detects_repeat() {
    let mut movements = vec![bill(1, 7, date(2024, 1, 10), true)];
    let drafts = roll_forward(7, &movements, period("2024-01"));
    assert_eq!(existing_in_target(&drafts, &movements), 0);

    movements.push(Movement {
        id: 2,
        owner: 7,
        occurred_on: drafts[0].occurred_on,
        category: drafts[0].category,
        description: drafts[0].description.clone(),
        kind: drafts[0].kind,
        amount: drafts[0].amount,
        is_recurring: true,
        is_settled: false,
    });
    assert_eq!(existing_in_target(&drafts, &movements), 1);
}

// ── End to end ────────────────────────────────────────────────

#[test]
fn test_rent_rolls_into_february_as_outstanding() {
    let mut db = Database::open_in_memory().unwrap();
    let owner = db.create_user("U", "u@example.com", "pw").unwrap().id;

    let rent = NewMovement::from_entry(
        date(2024, 1, 10),
        Category::Housing,
        "Rent",
        MovementKind::Expense,
        dec!(1000),
        true,
        true,
    )
    .unwrap();
    db.add_movement(owner, &rent).unwrap();

    let movements = db.list_movements(owner).unwrap();
    let jan = period_view(&movements, &[], period("2024-01"));
    assert_eq!(
        jan.totals,
        PeriodTotals {
            income: Decimal::ZERO,
            expense: dec!(-1000),
            balance: dec!(-1000),
            outstanding: Decimal::ZERO,
        }
    );

    let drafts = roll_forward(owner, &movements, period("2024-01"));
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].occurred_on, date(2024, 2, 10));
    assert_eq!(drafts[0].category, Category::Housing);
    assert_eq!(drafts[0].description, "Rent");
    assert_eq!(drafts[0].kind, MovementKind::Expense);
    assert_eq!(drafts[0].amount, dec!(-1000));
    assert!(drafts[0].is_recurring);
    assert!(!drafts[0].is_settled);

    db.add_movements(owner, &drafts).unwrap();

    let movements = db.list_movements(owner).unwrap();
    let feb = period_view(&movements, &[], period("2024-02"));
    assert_eq!(feb.totals.outstanding, dec!(-1000));
    assert_eq!(feb.totals.expense, dec!(-1000));
}
