use rusqlite::{params, OptionalExtension, Row};

use super::{decimal_column, Database};
use crate::error::{LedgerError, Result};
use crate::models::{Category, Movement, MovementKind, NewMovement};

const MOVEMENT_COLUMNS: &str =
    "id, owner, occurred_on, category, description, kind, amount, is_recurring, is_settled";

const INSERT_MOVEMENT: &str =
    "INSERT INTO movements (owner, occurred_on, category, description, kind, amount, is_recurring, is_settled)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

fn movement_from_row(row: &Row<'_>) -> rusqlite::Result<Movement> {
    let amount = decimal_column(row, 6)?;
    let category: String = row.get(3)?;
    let kind: String = row.get(5)?;
    Ok(Movement {
        id: row.get(0)?,
        owner: row.get(1)?,
        occurred_on: row.get(2)?,
        category: Category::from_stored(&category),
        description: row.get(4)?,
        kind: MovementKind::from_stored(&kind, amount),
        amount,
        is_recurring: row.get(7)?,
        is_settled: row.get(8)?,
    })
}

/// Zero affected rows means the id is unknown or belongs to another owner.
fn expect_one_row(affected: usize, id: i64) -> Result<()> {
    if affected == 0 {
        Err(LedgerError::NotFound { id })
    } else {
        Ok(())
    }
}

impl Database {
    // ── Movements ─────────────────────────────────────────────

    pub(crate) fn add_movement(&self, owner: i64, movement: &NewMovement) -> Result<i64> {
        movement.check()?;
        self.conn.execute(
            INSERT_MOVEMENT,
            params![
                owner,
                movement.occurred_on,
                movement.category.as_str(),
                movement.description,
                movement.kind.as_str(),
                movement.amount.to_string(),
                movement.is_recurring,
                movement.is_settled,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(owner, id, "inserted movement");
        Ok(id)
    }

    /// Insert a batch in one transaction; either every movement is stored or
    /// none is.
    pub(crate) fn add_movements(&mut self, owner: i64, movements: &[NewMovement]) -> Result<Vec<i64>> {
        for movement in movements {
            movement.check()?;
        }
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(movements.len());
        for movement in movements {
            tx.execute(
                INSERT_MOVEMENT,
                params![
                    owner,
                    movement.occurred_on,
                    movement.category.as_str(),
                    movement.description,
                    movement.kind.as_str(),
                    movement.amount.to_string(),
                    movement.is_recurring,
                    movement.is_settled,
                ],
            )?;
            ids.push(tx.last_insert_rowid());
        }
        tx.commit()?;
        tracing::debug!(owner, count = ids.len(), "inserted movement batch");
        Ok(ids)
    }

    /// Every movement of `owner`, newest first.
    pub(crate) fn list_movements(&self, owner: i64) -> Result<Vec<Movement>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements WHERE owner = ?1
             ORDER BY occurred_on DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![owner], movement_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_movement(&self, id: i64, owner: i64) -> Result<Option<Movement>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {MOVEMENT_COLUMNS} FROM movements WHERE id = ?1 AND owner = ?2"),
                params![id, owner],
                movement_from_row,
            )
            .optional()?)
    }

    /// Full edit. The settled flag is left alone; it only changes through
    /// [`Database::set_settled`].
    pub(crate) fn update_movement(&self, id: i64, owner: i64, fields: &NewMovement) -> Result<()> {
        fields.check()?;
        let affected = self.conn.execute(
            "UPDATE movements
             SET occurred_on = ?1, category = ?2, description = ?3, kind = ?4, amount = ?5, is_recurring = ?6
             WHERE id = ?7 AND owner = ?8",
            params![
                fields.occurred_on,
                fields.category.as_str(),
                fields.description,
                fields.kind.as_str(),
                fields.amount.to_string(),
                fields.is_recurring,
                id,
                owner,
            ],
        )?;
        tracing::debug!(owner, id, affected, "updated movement");
        expect_one_row(affected, id)
    }

    pub(crate) fn set_settled(&self, id: i64, owner: i64, value: bool) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE movements SET is_settled = ?1 WHERE id = ?2 AND owner = ?3",
            params![value, id, owner],
        )?;
        tracing::debug!(owner, id, value, affected, "set settled flag");
        expect_one_row(affected, id)
    }

    pub(crate) fn delete_movement(&self, id: i64, owner: i64) -> Result<()> {
        let affected = self.conn.execute(
            "DELETE FROM movements WHERE id = ?1 AND owner = ?2",
            params![id, owner],
        )?;
        tracing::debug!(owner, id, affected, "deleted movement");
        expect_one_row(affected, id)
    }
}
