use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Category, Period};
use crate::error::{LedgerError, Result};

/// Largest magnitude accepted for a single amount or budget limit.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Entered money lies in `[0, MAX_AMOUNT]` with at most two decimal places.
pub fn check_money(value: Decimal, what: &str) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "{what} must not be negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(LedgerError::validation(format!(
            "{what} must not exceed {MAX_AMOUNT}, got {value}"
        )));
    }
    if value.normalize().scale() > 2 {
        return Err(LedgerError::validation(format!(
            "{what} has more than two decimal places: {value}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Expense,
    Income,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Income => "Income",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "e" | "out" => Some(Self::Expense),
            "income" | "i" | "in" => Some(Self::Income),
            _ => None,
        }
    }

    /// Read back a stored value. The amount's sign is authoritative, so an
    /// unreadable kind is derived from it.
    pub fn from_stored(s: &str, amount: Decimal) -> Self {
        Self::parse(s).unwrap_or(if amount > Decimal::ZERO {
            Self::Income
        } else {
            Self::Expense
        })
    }

    pub fn sign(&self) -> Decimal {
        match self {
            Self::Expense => Decimal::NEGATIVE_ONE,
            Self::Income => Decimal::ONE,
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored movement. `amount` is signed: positive for income, negative for
/// expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub id: i64,
    pub owner: i64,
    pub occurred_on: NaiveDate,
    pub category: Category,
    pub description: String,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub is_recurring: bool,
    pub is_settled: bool,
}

impl Movement {
    pub fn period(&self) -> Period {
        Period::of(self.occurred_on)
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    /// Expense still waiting to be paid.
    pub fn is_outstanding(&self) -> bool {
        self.is_expense() && !self.is_settled
    }
}

/// The mutable fields of a movement, used for inserts, full edits and
/// rollover drafts.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovement {
    pub occurred_on: NaiveDate,
    pub category: Category,
    pub description: String,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub is_recurring: bool,
    pub is_settled: bool,
}

impl NewMovement {
    /// Build a movement from user entry. `magnitude` must be positive; the
    /// stored sign comes from `kind`.
    pub fn from_entry(
        occurred_on: NaiveDate,
        category: Category,
        description: &str,
        kind: MovementKind,
        magnitude: Decimal,
        is_recurring: bool,
        is_settled: bool,
    ) -> Result<Self> {
        if magnitude <= Decimal::ZERO {
            return Err(LedgerError::validation(format!(
                "amount must be greater than zero, got {magnitude}"
            )));
        }
        check_money(magnitude, "amount")?;
        let movement = Self {
            occurred_on,
            category,
            description: description.trim().to_string(),
            kind,
            amount: magnitude * kind.sign(),
            is_recurring,
            is_settled,
        };
        movement.check()?;
        Ok(movement)
    }

    /// Invariants every stored movement holds: a description, a non-zero
    /// amount in range, and a sign that agrees with `kind`.
    pub fn check(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::validation("description must not be empty"));
        }
        if self.amount.is_zero() {
            return Err(LedgerError::validation("amount must not be zero"));
        }
        if self.amount.is_sign_negative() != (self.kind == MovementKind::Expense) {
            return Err(LedgerError::validation(format!(
                "{} amount has the wrong sign: {}",
                self.kind, self.amount
            )));
        }
        check_money(self.amount.abs(), "amount")
    }
}

impl From<&Movement> for NewMovement {
    fn from(m: &Movement) -> Self {
        Self {
            occurred_on: m.occurred_on,
            category: m.category,
            description: m.description.clone(),
            kind: m.kind,
            amount: m.amount,
            is_recurring: m.is_recurring,
            is_settled: m.is_settled,
        }
    }
}
