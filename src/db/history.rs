use crate::db::connection::Database;
use crate::domain::FieldChange;
use crate::errors::Result;
use rusqlite::{params, Connection};

/// Appends field changes observed on `observed_on` to `listing_history`.
/// Does not commit; the caller owns the transaction.
pub(crate) fn insert_changes(
    conn: &Connection,
    changes: &[FieldChange],
    observed_on: &str,
) -> Result<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO listing_history (listing_url, observed_on, field_name, previous_value, current_value)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )?;
    for change in changes {
        stmt.execute(params![
            change.listing_url,
            observed_on,
            change.field_name,
            change.previous_value,
            change.current_value,
        ])?;
    }
    Ok(())
}

/// Every recorded change for one listing, oldest first.
pub fn history_for(db: &Database, listing_url: &str) -> Result<Vec<(String, FieldChange)>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT observed_on, field_name, previous_value, current_value
            FROM listing_history
            WHERE listing_url = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![listing_url], |row| {
            Ok((
                row.get::<_, String>(0)?,
                FieldChange {
                    listing_url: listing_url.to_string(),
                    field_name: row.get(1)?,
                    previous_value: row.get(2)?,
                    current_value: row.get(3)?,
                },
            ))
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    })
}
