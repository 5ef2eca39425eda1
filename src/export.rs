//! Excel (`.xlsx`) exports with a fixed column order per report.

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};

use crate::{
    error::{AppError, AppResult},
    models::{MovementType, RecordStatus},
};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const PRODUCT_HEADERS: [&str; 12] = [
    "No",
    "Name",
    "SKU",
    "Category",
    "Subcategory",
    "Brand",
    "Gender",
    "Zone",
    "Rack",
    "Total Quantity",
    "Status",
    "Created At",
];

pub const MOVEMENT_HEADERS: [&str; 13] = [
    "No",
    "Date",
    "Product",
    "SKU",
    "Size",
    "Color",
    "Type",
    "Quantity",
    "Before",
    "After",
    "Reference",
    "User",
    "Notes",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        Cell::Text(value.unwrap_or_default())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(f64::from(value))
    }
}

/// A product with its references already resolved to display names.
#[derive(Debug, Clone)]
pub struct ProductExportRow {
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub gender: Option<String>,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub total_quantity: i64,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MovementExportRow {
    pub created_at: DateTime<Utc>,
    pub product: Option<String>,
    pub sku: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub reference: Option<String>,
    pub user: Option<String>,
    pub notes: Option<String>,
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Maps one product to the cells of [`PRODUCT_HEADERS`]; `index` is zero-based.
pub fn product_cells(index: usize, row: &ProductExportRow) -> Vec<Cell> {
    vec![
        Cell::from((index + 1) as i64),
        row.name.clone().into(),
        row.sku.clone().into(),
        row.category.clone().into(),
        row.subcategory.clone().into(),
        row.brand.clone().into(),
        row.gender.clone().into(),
        row.zone.clone().into(),
        row.rack.clone().into(),
        row.total_quantity.into(),
        row.status.as_str().into(),
        timestamp(&row.created_at).into(),
    ]
}

/// Maps one movement to the cells of [`MOVEMENT_HEADERS`]; `index` is zero-based.
pub fn movement_cells(index: usize, row: &MovementExportRow) -> Vec<Cell> {
    vec![
        Cell::from((index + 1) as i64),
        timestamp(&row.created_at).into(),
        row.product.clone().into(),
        row.sku.clone().into(),
        row.size.clone().into(),
        row.color.clone().into(),
        row.movement_type.label().into(),
        row.quantity.into(),
        row.quantity_before.into(),
        row.quantity_after.into(),
        row.reference.clone().into(),
        row.user.clone().into(),
        row.notes.clone().into(),
    ]
}

/// Renders a single-sheet workbook with a bold header row.
pub fn workbook_bytes(sheet: &str, headers: &[&str], rows: &[Vec<Cell>]) -> AppResult<Vec<u8>> {
    build_workbook(sheet, headers, rows).map_err(|err| AppError::Internal(err.into()))
}

fn build_workbook(
    sheet: &str,
    headers: &[&str],
    rows: &[Vec<Cell>],
) -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
        worksheet.set_column_width(col as u16, (header.len() as f64 + 4.0).max(12.0))?;
    }

    for (i, cells) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            match cell {
                Cell::Text(text) => worksheet.write_string(row, col as u16, text)?,
                Cell::Number(n) => worksheet.write_number(row, col as u16, *n)?,
            };
        }
    }

    workbook.save_to_buffer()
}

/// `products_20260101_120000.xlsx`
pub fn file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn product_row_follows_header_order() {
        let row = ProductExportRow {
            name: "Runner".into(),
            sku: "RUN-1".into(),
            category: Some("Shoes".into()),
            subcategory: Some("Sneakers".into()),
            brand: None,
            gender: Some("Men".into()),
            zone: Some("A".into()),
            rack: Some("A-01".into()),
            total_quantity: 12,
            status: RecordStatus::Available,
            created_at: created(),
        };
        let cells = product_cells(0, &row);
        assert_eq!(cells.len(), PRODUCT_HEADERS.len());
        assert_eq!(cells[0], Cell::Number(1.0));
        assert_eq!(cells[2], Cell::Text("RUN-1".into()));
        assert_eq!(cells[5], Cell::Text(String::new()));
        assert_eq!(cells[9], Cell::Number(12.0));
        assert_eq!(cells[10], Cell::Text("Available".into()));
        assert_eq!(cells[11], Cell::Text("2026-03-04 05:06:07".into()));
    }

    #[test]
    fn movement_row_follows_header_order() {
        let row = MovementExportRow {
            created_at: created(),
            product: Some("Runner".into()),
            sku: Some("RUN-1".into()),
            size: Some("42".into()),
            color: Some("Black".into()),
            movement_type: MovementType::Out,
            quantity: 2,
            quantity_before: 5,
            quantity_after: 3,
            reference: Some("SO-9".into()),
            user: Some("Ana".into()),
            notes: None,
        };
        let cells = movement_cells(4, &row);
        assert_eq!(cells.len(), MOVEMENT_HEADERS.len());
        assert_eq!(cells[0], Cell::Number(5.0));
        assert_eq!(cells[6], Cell::Text("Stock Out".into()));
        assert_eq!(cells[8], Cell::Number(5.0));
        assert_eq!(cells[9], Cell::Number(3.0));
        assert_eq!(cells[12], Cell::Text(String::new()));
    }

    #[test]
    fn workbook_is_a_zip_container() {
        let rows = vec![vec![Cell::from(1_i64), Cell::from("x")]];
        let bytes = workbook_bytes("Products", &["No", "Name"], &rows).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn file_name_is_timestamped() {
        assert_eq!(
            file_name("stock_movements", created()),
            "stock_movements_20260304_050607.xlsx"
        );
    }
}
