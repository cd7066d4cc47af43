use crate::db::connection::Database;
use crate::db::history::insert_changes;
use crate::domain::{FieldChange, ListingRecord, ListingStatus, SaleType, SnapshotRow, Tenure};
use crate::errors::{ListingsError, Result};
use rusqlite::{params, Connection, Row};

const SELECT_SNAPSHOT: &str = r#"
    SELECT
        listing_url,            -- 0
        display_address,        -- 1
        price,                  -- 2
        property_sub_type,      -- 3
        property_image,         -- 4
        detailed_description,   -- 5
        size_ft,                -- 6
        size_ac,                -- 7
        postal_code,            -- 8
        brochure_url,           -- 9
        agent_company,          -- 10
        agent_name,             -- 11
        agent_city,             -- 12
        agent_email,            -- 13
        agent_phone,            -- 14
        agent_street,           -- 15
        agent_postcode,         -- 16
        tenure,                 -- 17
        sale_type,              -- 18
        date,                   -- 19
        status                  -- 20
    FROM snapshot_rows
    ORDER BY position
"#;

/// Column values as stored, before the JSON lists and labels are decoded.
struct RawRow {
    record: ListingRecord,
    images: String,
    brochures: String,
    tenure: String,
    sale_type: String,
    date: String,
    status: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        record: ListingRecord {
            listing_url: row.get(0)?,
            display_address: row.get(1)?,
            price: row.get(2)?,
            property_sub_type: row.get(3)?,
            detailed_description: row.get(5)?,
            size_ft: row.get(6)?,
            size_ac: row.get(7)?,
            postal_code: row.get(8)?,
            agent_company: row.get(10)?,
            agent_name: row.get(11)?,
            agent_city: row.get(12)?,
            agent_email: row.get(13)?,
            agent_phone: row.get(14)?,
            agent_street: row.get(15)?,
            agent_postcode: row.get(16)?,
            ..Default::default()
        },
        images: row.get(4)?,
        brochures: row.get(9)?,
        tenure: row.get(17)?,
        sale_type: row.get(18)?,
        date: row.get(19)?,
        status: row.get(20)?,
    })
}

impl RawRow {
    fn decode(self) -> Result<SnapshotRow> {
        let status = ListingStatus::from_label(&self.status).ok_or_else(|| {
            ListingsError::CorruptRow(format!(
                "snapshot row {} has unknown status '{}'",
                self.record.listing_url, self.status
            ))
        })?;

        let mut record = self.record;
        record.property_image = serde_json::from_str(&self.images)?;
        record.brochure_url = serde_json::from_str(&self.brochures)?;
        record.tenure = Tenure::from_label(&self.tenure);
        record.sale_type = SaleType::from_label(&self.sale_type);

        Ok(SnapshotRow {
            record,
            date: self.date,
            status,
        })
    }
}

/// Reads the whole persisted snapshot, in the order it was written. Empty
/// when no run has been stored yet.
pub fn load_snapshot(db: &Database) -> Result<Vec<SnapshotRow>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(SELECT_SNAPSHOT)?;
        let rows = stmt.query_map([], read_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?.decode()?);
        }
        Ok(out)
    })
}

/// Replaces the stored snapshot with `rows` in a single transaction.
pub fn replace_snapshot(db: &Database, rows: &[SnapshotRow]) -> Result<()> {
    commit_run(db, rows, &[], "")
}

/// Stores one run's outcome atomically: the field changes are appended to
/// the history and the snapshot is replaced, or neither happens.
pub fn commit_run(
    db: &Database,
    rows: &[SnapshotRow],
    changes: &[FieldChange],
    run_date: &str,
) -> Result<()> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;
        insert_changes(&tx, changes, run_date)?;
        write_snapshot(&tx, rows)?;
        tx.commit()?;
        Ok(())
    })
}

fn write_snapshot(conn: &Connection, rows: &[SnapshotRow]) -> Result<()> {
    conn.execute("DELETE FROM snapshot_rows", [])?;

    let mut stmt = conn.prepare(
        r#"
        INSERT INTO snapshot_rows (
            position, listing_url, display_address, price, property_sub_type,
            property_image, detailed_description, size_ft, size_ac, postal_code,
            brochure_url, agent_company, agent_name, agent_city, agent_email,
            agent_phone, agent_street, agent_postcode, tenure, sale_type,
            date, status
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5,
            ?6, ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14, ?15,
            ?16, ?17, ?18, ?19, ?20,
            ?21, ?22
        )
        "#,
    )?;

    for (position, row) in rows.iter().enumerate() {
        let r = &row.record;
        let images = serde_json::to_string(&r.property_image)?;
        let brochures = serde_json::to_string(&r.brochure_url)?;

        stmt.execute(params![
            position as i64,
            r.listing_url,
            r.display_address,
            r.price,
            r.property_sub_type,
            images,
            r.detailed_description,
            r.size_ft,
            r.size_ac,
            r.postal_code,
            brochures,
            r.agent_company,
            r.agent_name,
            r.agent_city,
            r.agent_email,
            r.agent_phone,
            r.agent_street,
            r.agent_postcode,
            r.tenure.as_str(),
            r.sale_type.as_str(),
            row.date,
            row.status.as_str(),
        ])?;
    }
    Ok(())
}
