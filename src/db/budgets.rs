use rusqlite::params;

use super::{decimal_column, Database};
use crate::error::Result;
use crate::models::{Budget, Category};

impl Database {
    // ── Budgets ───────────────────────────────────────────────

    /// Upsert keyed by (owner, category): a second save replaces the limit.
    /// Update, then insert when nothing matched, in one transaction.
    pub(crate) fn set_limit(&self, budget: &Budget) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let limit = budget.limit_amount.to_string();
        let updated = tx.execute(
            "UPDATE budgets SET limit_amount = ?1 WHERE owner = ?2 AND category = ?3",
            params![limit, budget.owner, budget.category.as_str()],
        )?;
        if updated == 0 {
            tx.execute(
                "INSERT INTO budgets (owner, category, limit_amount) VALUES (?1, ?2, ?3)",
                params![budget.owner, budget.category.as_str(), limit],
            )?;
        }
        tx.commit()?;
        tracing::debug!(
            owner = budget.owner,
            category = %budget.category,
            limit = %budget.limit_amount,
            "saved budget"
        );
        Ok(())
    }

    pub(crate) fn list_budgets(&self, owner: i64) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT owner, category, limit_amount FROM budgets WHERE owner = ?1 ORDER BY category",
        )?;
        let rows = stmt.query_map(params![owner], |row| {
            let category: String = row.get(1)?;
            Ok(Budget {
                owner: row.get(0)?,
                category: Category::from_stored(&category),
                limit_amount: decimal_column(row, 2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
