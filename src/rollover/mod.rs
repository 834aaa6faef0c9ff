//! Carry recurring bills from one month into the next.
//!
//! Drafts are returned to the caller, never written here. Rolling the same
//! month twice and storing both results duplicates the bills;
//! [`existing_in_target`] lets a caller check for that first.

use chrono::{Months, NaiveDate};

use crate::models::{Movement, NewMovement, Period};

/// Same day next month, clamped to the last day when the target month is
/// shorter (Jan 31 -> Feb 28/29).
pub(crate) fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(1))
}

/// Next-month drafts for `owner`'s recurring movements in `source`. Every
/// draft starts unpaid.
pub(crate) fn roll_forward(owner: i64, movements: &[Movement], source: Period) -> Vec<NewMovement> {
    let drafts: Vec<NewMovement> = movements
        .iter()
        .filter(|m| m.owner == owner && m.is_recurring && m.period() == source)
        .filter_map(|m| {
            let Some(occurred_on) = next_month(m.occurred_on) else {
                tracing::warn!(id = m.id, date = %m.occurred_on, "cannot roll past the calendar end, skipped");
                return None;
            };
            Some(NewMovement {
                occurred_on,
                is_recurring: true,
                is_settled: false,
                ..NewMovement::from(m)
            })
        })
        .collect();
    tracing::debug!(owner, %source, drafts = drafts.len(), "rolled forward");
    drafts
}

/// How many drafts already have a recurring twin (same date, category,
/// description and amount) among `movements`.
pub(crate) fn existing_in_target(drafts: &[NewMovement], movements: &[Movement]) -> usize {
    drafts
        .iter()
        .filter(|d| {
            movements.iter().any(|m| {
                m.is_recurring
                    && m.occurred_on == d.occurred_on
                    && m.category == d.category
                    && m.description == d.description
                    && m.amount == d.amount
            })
        })
        .count()
}

#[cfg(test)]
mod tests;
