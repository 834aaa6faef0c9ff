//! Period aggregation over a snapshot of one owner's movements.
//!
//! Everything here is a pure function of its inputs; callers fetch fresh
//! rows from the store for every view. Sums and ratios saturate rather than
//! overflow.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Budget, Category, Movement, Period};

/// Share of a limit at which a budget starts warning.
pub(crate) const WARNING_RATIO: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Distinct periods present in `movements`, newest first.
pub(crate) fn periods(movements: &[Movement]) -> Vec<Period> {
    let distinct: BTreeSet<Period> = movements.iter().map(Movement::period).collect();
    distinct.into_iter().rev().collect()
}

pub(crate) fn in_period(movements: &[Movement], period: Period) -> Vec<Movement> {
    movements
        .iter()
        .filter(|m| period.contains(m.occurred_on))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PeriodTotals {
    /// Sum of positive amounts.
    pub(crate) income: Decimal,
    /// Sum of negative amounts; zero or negative.
    pub(crate) expense: Decimal,
    pub(crate) balance: Decimal,
    /// Unpaid expenses; zero or negative.
    pub(crate) outstanding: Decimal,
}

impl PeriodTotals {
    pub(crate) fn from_movements<'a>(movements: impl IntoIterator<Item = &'a Movement>) -> Self {
        let mut totals = Self::default();
        for m in movements {
            if m.is_income() {
                totals.income = totals.income.saturating_add(m.amount);
            } else if m.is_expense() {
                totals.expense = totals.expense.saturating_add(m.amount);
                if m.is_outstanding() {
                    totals.outstanding = totals.outstanding.saturating_add(m.amount);
                }
            }
        }
        totals.balance = totals.income.saturating_add(totals.expense);
        totals
    }
}

/// Absolute expense per category.
pub(crate) fn category_spending<'a>(
    movements: impl IntoIterator<Item = &'a Movement>,
) -> BTreeMap<Category, Decimal> {
    let mut spending = BTreeMap::new();
    for m in movements.into_iter().filter(|m| m.is_expense()) {
        let total = spending.entry(m.category).or_insert(Decimal::ZERO);
        *total = total.saturating_add(m.abs_amount());
    }
    spending
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BudgetState {
    Normal,
    Warning,
    OverBudget,
}

impl BudgetState {
    pub(crate) fn from_ratio(ratio: Decimal) -> Self {
        if ratio >= Decimal::ONE {
            Self::OverBudget
        } else if ratio >= WARNING_RATIO {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// How much of one budget a period has used.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetUsage {
    pub(crate) category: Category,
    pub(crate) limit_amount: Decimal,
    pub(crate) consumed: Decimal,
    /// `consumed / limit_amount`, not clamped. Zero when the limit is zero,
    /// `Decimal::MAX` when the quotient is out of range.
    pub(crate) ratio: Decimal,
}

impl BudgetUsage {
    pub(crate) fn new(budget: &Budget, consumed: Decimal) -> Self {
        let ratio = if budget.limit_amount > Decimal::ZERO {
            consumed.checked_div(budget.limit_amount).unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        };
        Self {
            category: budget.category,
            limit_amount: budget.limit_amount,
            consumed,
            ratio,
        }
    }

    pub(crate) fn state(&self) -> BudgetState {
        BudgetState::from_ratio(self.ratio)
    }

    /// Ratio clamped to `[0, 1]` for progress bars.
    pub(crate) fn display_ratio(&self) -> Decimal {
        self.ratio.clamp(Decimal::ZERO, Decimal::ONE)
    }

    /// Negative once spending passes the limit.
    pub(crate) fn remaining(&self) -> Decimal {
        self.limit_amount.saturating_sub(self.consumed)
    }
}

pub(crate) fn budget_usage(
    budgets: &[Budget],
    spending: &BTreeMap<Category, Decimal>,
) -> Vec<BudgetUsage> {
    budgets
        .iter()
        .map(|b| {
            let consumed = spending.get(&b.category).copied().unwrap_or(Decimal::ZERO);
            BudgetUsage::new(b, consumed)
        })
        .collect()
}

/// Everything a dashboard shows for one month.
#[derive(Debug, Clone)]
pub(crate) struct PeriodView {
    pub(crate) period: Period,
    pub(crate) totals: PeriodTotals,
    pub(crate) spending: BTreeMap<Category, Decimal>,
    pub(crate) budgets: Vec<BudgetUsage>,
    pub(crate) movements: Vec<Movement>,
}

impl PeriodView {
    /// Category spending, largest first.
    pub(crate) fn spending_ranked(&self) -> Vec<(Category, Decimal)> {
        let mut ranked: Vec<(Category, Decimal)> =
            self.spending.iter().map(|(c, a)| (*c, *a)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

pub(crate) fn period_view(movements: &[Movement], budgets: &[Budget], period: Period) -> PeriodView {
    let selected = in_period(movements, period);
    let totals = PeriodTotals::from_movements(&selected);
    let spending = category_spending(&selected);
    let budgets = budget_usage(budgets, &spending);
    tracing::debug!(
        %period,
        movements = selected.len(),
        budgets = budgets.len(),
        "computed period view"
    );
    PeriodView {
        period,
        totals,
        spending,
        budgets,
        movements: selected,
    }
}

/// Cost of the subscriptions in the most recent month that has any.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SubscriptionSummary {
    pub(crate) period: Period,
    pub(crate) monthly_cost: Decimal,
    pub(crate) annual_estimate: Decimal,
    pub(crate) items: Vec<Movement>,
}

pub(crate) fn subscription_summary(movements: &[Movement]) -> Option<SubscriptionSummary> {
    let subscriptions: Vec<Movement> = movements
        .iter()
        .filter(|m| m.category == Category::Subscriptions)
        .cloned()
        .collect();
    let latest = periods(&subscriptions).into_iter().next()?;
    let items = in_period(&subscriptions, latest);
    let monthly_cost = items
        .iter()
        .fold(Decimal::ZERO, |acc, m| acc.saturating_add(m.amount))
        .abs();
    Some(SubscriptionSummary {
        period: latest,
        monthly_cost,
        annual_estimate: monthly_cost.saturating_mul(Decimal::from(12)),
        items,
    })
}
