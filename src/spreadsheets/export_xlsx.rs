use crate::domain::SnapshotRow;
use crate::errors::Result;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

const HEADERS: [&str; 21] = [
    "Listing URL",
    "Address",
    "Price",
    "Property Type",
    "Images",
    "Description",
    "Size (sq ft)",
    "Size (acres)",
    "Postcode",
    "Brochures",
    "Agent Company",
    "Agent Name",
    "Agent City",
    "Agent Email",
    "Agent Phone",
    "Agent Street",
    "Agent Postcode",
    "Tenure",
    "Sale Type",
    "Date",
    "Status",
];

fn write_optional_number(sheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<()> {
    if let Some(v) = value {
        sheet.write_number(row, col, v)?;
    }
    Ok(())
}

fn build_workbook(rows: &[SnapshotRow]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, snapshot) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let listing = &snapshot.record;

        worksheet.write_string(r, 0, &listing.listing_url)?;
        worksheet.write_string(r, 1, &listing.display_address)?;
        write_optional_number(worksheet, r, 2, listing.price.map(|p| p as f64))?;
        worksheet.write_string(r, 3, &listing.property_sub_type)?;
        worksheet.write_string(r, 4, listing.property_image.join("; "))?;
        worksheet.write_string(r, 5, &listing.detailed_description)?;
        write_optional_number(worksheet, r, 6, listing.size_ft)?;
        write_optional_number(worksheet, r, 7, listing.size_ac)?;
        worksheet.write_string(r, 8, listing.postal_code.as_deref().unwrap_or(""))?;
        worksheet.write_string(r, 9, listing.brochure_url.join("; "))?;
        worksheet.write_string(r, 10, &listing.agent_company)?;
        worksheet.write_string(r, 11, &listing.agent_name)?;
        worksheet.write_string(r, 12, &listing.agent_city)?;
        worksheet.write_string(r, 13, &listing.agent_email)?;
        worksheet.write_string(r, 14, &listing.agent_phone)?;
        worksheet.write_string(r, 15, &listing.agent_street)?;
        worksheet.write_string(r, 16, &listing.agent_postcode)?;
        worksheet.write_string(r, 17, listing.tenure.as_str())?;
        worksheet.write_string(r, 18, listing.sale_type.as_str())?;
        worksheet.write_string(r, 19, &snapshot.date)?;
        worksheet.write_string(r, 20, snapshot.status.as_str())?;
    }

    Ok(workbook)
}

/// Writes the snapshot to an `.xlsx` file, one row per listing.
pub fn export_snapshot_xlsx(rows: &[SnapshotRow], path: &Path) -> Result<()> {
    let mut workbook = build_workbook(rows)?;
    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "snapshot exported");
    Ok(())
}

/// Same workbook as [`export_snapshot_xlsx`], kept in memory.
pub fn snapshot_xlsx_bytes(rows: &[SnapshotRow]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(rows)?;
    Ok(workbook.save_to_buffer()?)
}
