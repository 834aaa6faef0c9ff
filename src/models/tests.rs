#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::LedgerError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(kind: MovementKind, magnitude: Decimal) -> crate::error::Result<NewMovement> {
    NewMovement::from_entry(
        date(2024, 1, 15),
        Category::Food,
        "Groceries",
        kind,
        magnitude,
        false,
        true,
    )
}

// ── Movement ──────────────────────────────────────────────────

#[test]
fn test_expense_entry_is_negative() {
    let m = entry(MovementKind::Expense, dec!(42.99)).unwrap();
    assert_eq!(m.amount, dec!(-42.99));
    assert_eq!(m.kind, MovementKind::Expense);
}

#[test]
fn test_income_entry_is_positive() {
    let m = entry(MovementKind::Income, dec!(3000)).unwrap();
    assert_eq!(m.amount, dec!(3000));
}

#[test]
fn test_zero_amount_rejected() {
    assert!(matches!(
        entry(MovementKind::Expense, Decimal::ZERO),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        entry(MovementKind::Income, Decimal::ZERO),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_negative_magnitude_rejected() {
    assert!(matches!(
        entry(MovementKind::Income, dec!(-5)),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_magnitude_above_max_rejected() {
    assert!(entry(MovementKind::Expense, movement::MAX_AMOUNT).is_ok());
    assert!(matches!(
        entry(MovementKind::Expense, Decimal::MAX),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_sub_cent_magnitude_rejected() {
    assert!(matches!(
        entry(MovementKind::Income, dec!(0.001)),
        Err(LedgerError::Validation(_))
    ));
    // trailing zeros are not extra precision
    assert_eq!(entry(MovementKind::Income, dec!(2.500)).unwrap().amount, dec!(2.500));
}

#[test]
fn test_check_rejects_sign_that_disagrees_with_kind() {
    let mut m = entry(MovementKind::Expense, dec!(10)).unwrap();
    assert!(m.check().is_ok());

    m.amount = dec!(10);
    assert!(matches!(m.check(), Err(LedgerError::Validation(_))));

    m.kind = MovementKind::Income;
    assert!(m.check().is_ok());

    m.amount = Decimal::ZERO;
    assert!(matches!(m.check(), Err(LedgerError::Validation(_))));
}

#[test]
fn test_blank_description_rejected() {
    let result = NewMovement::from_entry(
        date(2024, 1, 15),
        Category::Food,
        "   ",
        MovementKind::Expense,
        dec!(10),
        false,
        false,
    );
    assert!(matches!(result, Err(LedgerError::Validation(_))));
}

#[test]
fn test_description_is_trimmed() {
    let m = NewMovement::from_entry(
        date(2024, 1, 15),
        Category::Food,
        "  Bakery ",
        MovementKind::Expense,
        dec!(3.50),
        false,
        false,
    )
    .unwrap();
    assert_eq!(m.description, "Bakery");
}

#[test]
fn test_outstanding_only_for_unpaid_expenses() {
    let base = Movement {
        id: 1,
        owner: 1,
        occurred_on: date(2024, 1, 1),
        category: Category::Housing,
        description: "Rent".into(),
        kind: MovementKind::Expense,
        amount: dec!(-1000),
        is_recurring: true,
        is_settled: false,
    };
    assert!(base.is_outstanding());

    let paid = Movement {
        is_settled: true,
        ..base.clone()
    };
    assert!(!paid.is_outstanding());

    let salary = Movement {
        kind: MovementKind::Income,
        amount: dec!(2000),
        ..base
    };
    assert!(!salary.is_outstanding());
}

#[test]
fn test_kind_from_stored_falls_back_to_sign() {
    assert_eq!(
        MovementKind::from_stored("garbage", dec!(5)),
        MovementKind::Income
    );
    assert_eq!(
        MovementKind::from_stored("garbage", dec!(-5)),
        MovementKind::Expense
    );
    assert_eq!(
        MovementKind::from_stored("Income", dec!(5)),
        MovementKind::Income
    );
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_parse() {
    assert_eq!(Category::parse("food"), Some(Category::Food));
    assert_eq!(Category::parse("HOUSING"), Some(Category::Housing));
    assert_eq!(
        Category::parse("Subscriptions/Streaming"),
        Some(Category::Subscriptions)
    );
    assert_eq!(Category::parse("streaming"), Some(Category::Subscriptions));
    assert_eq!(Category::parse("Income(Salary)"), Some(Category::Income));
    assert_eq!(Category::parse("salary"), Some(Category::Income));
    assert_eq!(Category::parse("Groceries"), None);
}

#[test]
fn test_category_round_trips_display_name() {
    for cat in Category::all() {
        assert_eq!(Category::parse(cat.as_str()), Some(*cat));
    }
}

#[test]
fn test_unknown_stored_category_is_other() {
    assert_eq!(Category::from_stored("Pets"), Category::Other);
}

#[test]
fn test_income_not_budgetable() {
    assert!(Category::budgetable().all(|c| !c.is_income()));
    assert_eq!(Category::budgetable().count(), Category::all().len() - 1);
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_budget_rejects_income_category() {
    assert!(matches!(
        Budget::new(1, Category::Income, dec!(100)),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_budget_rejects_negative_limit() {
    assert!(matches!(
        Budget::new(1, Category::Food, dec!(-1)),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_budget_rejects_sub_cent_and_huge_limits() {
    assert!(matches!(
        Budget::new(1, Category::Food, dec!(0.0000000000000000000001)),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        Budget::new(1, Category::Food, Decimal::MAX),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_budget_allows_zero_limit() {
    let b = Budget::new(1, Category::Leisure, Decimal::ZERO).unwrap();
    assert_eq!(b.limit_amount, Decimal::ZERO);
}

// ── Period ────────────────────────────────────────────────────

#[test]
fn test_period_parse_and_display() {
    let p: Period = "2024-03".parse().unwrap();
    assert_eq!(p.first_day(), date(2024, 3, 1));
    assert_eq!(p.to_string(), "2024-03");
}

#[test]
fn test_period_parse_rejects_bad_input() {
    assert!("2024-13".parse::<Period>().is_err());
    assert!("2024-3".parse::<Period>().is_err());
    assert!("March".parse::<Period>().is_err());
    assert!("2024-03-01".parse::<Period>().is_err());
}

#[test]
fn test_period_ordering_is_chronological() {
    let dec23: Period = "2023-12".parse().unwrap();
    let jan24: Period = "2024-01".parse().unwrap();
    let feb24 = Period::of(date(2024, 2, 17));
    assert!(dec23 < jan24);
    assert!(jan24 < feb24);
}

#[test]
fn test_period_next_crosses_year() {
    let dec = Period::of(date(2023, 12, 31));
    assert_eq!(dec.next(), Some(Period::of(date(2024, 1, 1))));
}

#[test]
fn test_period_contains() {
    let p = Period::of(date(2024, 2, 1));
    assert!(p.contains(date(2024, 2, 29)));
    assert!(!p.contains(date(2024, 3, 1)));
    assert!(!p.contains(date(2023, 2, 1)));
}

// ── User ──────────────────────────────────────────────────────

#[test]
fn test_normalize_email() {
    assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
}
