use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Movement;

const HEADER: [&str; 8] = [
    "id",
    "date",
    "category",
    "description",
    "kind",
    "amount",
    "recurring",
    "settled",
];

/// Write movements to a CSV file and return how many rows were written.
pub(crate) fn write_csv(path: &Path, movements: &[Movement]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(HEADER)?;
    for m in movements {
        wtr.write_record([
            m.id.to_string(),
            m.occurred_on.format("%Y-%m-%d").to_string(),
            m.category.to_string(),
            m.description.clone(),
            m.kind.to_string(),
            m.amount.to_string(),
            m.is_recurring.to_string(),
            m.is_settled.to_string(),
        ])?;
    }
    wtr.flush().context("Failed to write CSV file")?;
    tracing::debug!(rows = movements.len(), path = %path.display(), "exported movements");
    Ok(movements.len())
}
