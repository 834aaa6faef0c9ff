use rust_decimal::Decimal;

use super::movement::check_money;
use super::Category;
use crate::error::{LedgerError, Result};

/// Monthly spending ceiling for one category. One row per (owner, category).
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub owner: i64,
    pub category: Category,
    pub limit_amount: Decimal,
}

impl Budget {
    pub fn new(owner: i64, category: Category, limit_amount: Decimal) -> Result<Self> {
        if category.is_income() {
            return Err(LedgerError::validation(format!(
                "{category} is an income category and cannot have a budget"
            )));
        }
        check_money(limit_amount, "budget limit")?;
        Ok(Self {
            owner,
            category,
            limit_amount,
        })
    }
}
