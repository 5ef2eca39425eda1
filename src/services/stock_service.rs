//! Stock movement ledger. Rows are only ever appended; each one records the
//! variant quantity before and after it was applied.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::sea_query::LockType;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Iterable, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::{forms::MovementFormOptions, stock::CreateMovementRequest},
    entity::{
        colors::{Column as ColorCol, Entity as Colors},
        product_variants::{
            ActiveModel as VariantActive, Column as VariantCol, Entity as ProductVariants,
        },
        products::{Column as ProdCol, Entity as Products},
        stock_movements::{ActiveModel, Column, Entity as StockMovements},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    export::{self, MOVEMENT_HEADERS, MovementExportRow},
    middleware::auth::AuthUser,
    models::{MovementType, RecordStatus, StockMovement},
    response::ApiResponse,
    routes::params::MovementQuery,
    services::common::{choices, clean_optional, paginate},
    state::AppState,
};

const RESOURCE: &str = "stock_movements";

/// Quantity a variant holds after `movement` is applied to `current`.
pub fn apply_movement(movement: MovementType, current: i32, quantity: i32) -> AppResult<i32> {
    match movement {
        MovementType::In | MovementType::Out if quantity <= 0 => Err(AppError::field(
            "quantity",
            "The quantity must be at least 1.",
        )),
        MovementType::In => current
            .checked_add(quantity)
            .ok_or_else(|| AppError::field("quantity", "The quantity is too large.")),
        MovementType::Out if quantity > current => Err(AppError::field(
            "quantity",
            format!("Only {current} units are in stock."),
        )),
        MovementType::Out => Ok(current - quantity),
        MovementType::Adjustment if quantity < 0 => Err(AppError::field(
            "quantity",
            "The quantity must be at least 0.",
        )),
        MovementType::Adjustment => Ok(quantity),
    }
}

/// Inclusive calendar-day filter turned into a half-open UTC range.
pub fn date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::field(
                "date_to",
                "The date to must be a date after or equal to date from.",
            ));
        }
    }
    let start = from
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc());
    let end = to
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc() + Duration::days(1));
    Ok((start, end))
}

fn filtered(query: &MovementQuery) -> AppResult<Select<StockMovements>> {
    let mut condition = Condition::all();
    if let Some(id) = query.product_id {
        condition = condition.add(Column::ProductId.eq(id));
    }
    if let Some(kind) = query.movement_type {
        condition = condition.add(Column::MovementType.eq(kind));
    }
    let (start, end) = date_range(query.date_from, query.date_to)?;
    if let Some(start) = start {
        condition = condition.add(Column::CreatedAt.gte(start));
    }
    if let Some(end) = end {
        condition = condition.add(Column::CreatedAt.lt(end));
    }
    Ok(StockMovements::find()
        .filter(condition)
        .order_by_desc(Column::CreatedAt))
}

pub async fn list_movements(
    state: &AppState,
    query: MovementQuery,
) -> AppResult<ApiResponse<Vec<StockMovement>>> {
    let finder = filtered(&query)?;
    let (items, meta) = paginate(&state.orm, finder, query.pagination()).await?;
    let data = items.into_iter().map(StockMovement::from).collect();
    Ok(ApiResponse::paginated("Stock movements", data, meta))
}

pub async fn movement_form(state: &AppState) -> AppResult<ApiResponse<MovementFormOptions>> {
    let options = MovementFormOptions {
        products: choices::<Products, _>(&state.orm, ProdCol::Id, ProdCol::Name, ProdCol::Status)
            .await?,
        movement_types: MovementType::iter().collect(),
    };
    Ok(ApiResponse::success("Stock movement form", options, None))
}

pub async fn get_movement(state: &AppState, id: Uuid) -> AppResult<ApiResponse<StockMovement>> {
    let movement = StockMovements::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Stock movement", movement.into(), None))
}

/// Applies a movement to its variant. The variant row stays locked until the
/// ledger row is written, so concurrent movements on one variant serialize.
pub async fn create_movement(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMovementRequest,
) -> AppResult<ApiResponse<StockMovement>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let variant = ProductVariants::find_by_id(payload.variant_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::field("variant_id", "The selected variant id is invalid."))?;

    let product = Products::find_by_id(variant.product_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if product.status != RecordStatus::Available {
        return Err(AppError::field(
            "variant_id",
            "Stock cannot move on an unavailable product.",
        ));
    }

    let before = variant.quantity;
    let after = apply_movement(payload.movement_type, before, payload.quantity)?;

    let mut active: VariantActive = variant.into();
    active.quantity = Set(after);
    active.updated_at = Set(Utc::now().into());
    let variant = active.update(&txn).await?;

    let movement = ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(variant.product_id),
        variant_id: Set(variant.id),
        user_id: Set(user.user_id),
        movement_type: Set(payload.movement_type),
        quantity: Set(payload.quantity),
        quantity_before: Set(before),
        quantity_after: Set(after),
        reference: Set(clean_optional(payload.reference)),
        notes: Set(clean_optional(payload.notes)),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::debug!(
        variant_id = %movement.variant_id,
        movement_type = movement.movement_type.label(),
        before,
        after,
        "stock moved"
    );
    audit::record(
        &state.pool,
        user,
        "stock_movement_create",
        RESOURCE,
        serde_json::json!({
            "movement_id": movement.id,
            "variant_id": movement.variant_id,
            "quantity_before": before,
            "quantity_after": after,
        }),
    )
    .await;

    Ok(ApiResponse::success("Stock movement recorded", movement.into(), None))
}

pub async fn export_movements(
    state: &AppState,
    query: MovementQuery,
) -> AppResult<(String, Vec<u8>)> {
    let db = &state.orm;
    let movements = filtered(&query)?.all(db).await?;

    let products: HashMap<Uuid, (String, String)> = Products::find()
        .filter(ProdCol::Id.is_in(movements.iter().map(|m| m.product_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, (p.name, p.sku)))
        .collect();
    let variants: HashMap<Uuid, (String, Option<Uuid>)> = ProductVariants::find()
        .filter(VariantCol::Id.is_in(movements.iter().map(|m| m.variant_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, (v.size, v.color_id)))
        .collect();
    let colors: HashMap<Uuid, String> = Colors::find()
        .filter(ColorCol::Id.is_in(variants.values().filter_map(|(_, color_id)| *color_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let users: HashMap<Uuid, String> = Users::find()
        .filter(UserCol::Id.is_in(movements.iter().map(|m| m.user_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let cells: Vec<_> = movements
        .into_iter()
        .map(|m| {
            let product = products.get(&m.product_id);
            let variant = variants.get(&m.variant_id);
            MovementExportRow {
                created_at: m.created_at.with_timezone(&Utc),
                product: product.map(|(name, _)| name.clone()),
                sku: product.map(|(_, sku)| sku.clone()),
                size: variant.map(|(size, _)| size.clone()),
                color: variant
                    .and_then(|(_, color_id)| color_id.as_ref())
                    .and_then(|id| colors.get(id).cloned()),
                movement_type: m.movement_type,
                quantity: m.quantity,
                quantity_before: m.quantity_before,
                quantity_after: m.quantity_after,
                reference: m.reference,
                user: users.get(&m.user_id).cloned(),
                notes: m.notes,
            }
        })
        .enumerate()
        .map(|(i, row)| export::movement_cells(i, &row))
        .collect();

    let bytes = export::workbook_bytes("Stock Movements", &MOVEMENT_HEADERS, &cells)?;
    tracing::debug!(rows = cells.len(), "stock movements exported");
    Ok((export::file_name("stock_movements", Utc::now()), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_in_adds_and_out_subtracts() {
        assert_eq!(apply_movement(MovementType::In, 5, 3).unwrap(), 8);
        assert_eq!(apply_movement(MovementType::Out, 5, 5).unwrap(), 0);
    }

    #[test]
    fn stock_out_cannot_exceed_on_hand() {
        match apply_movement(MovementType::Out, 2, 3) {
            Err(AppError::Validation(fields)) => {
                assert_eq!(fields["quantity"][0], "Only 2 units are in stock.");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn in_and_out_need_a_positive_quantity() {
        assert!(apply_movement(MovementType::In, 1, 0).is_err());
        assert!(apply_movement(MovementType::Out, 1, -1).is_err());
        assert!(apply_movement(MovementType::In, i32::MAX, 1).is_err());
    }

    #[test]
    fn adjustment_sets_absolute_count() {
        assert_eq!(apply_movement(MovementType::Adjustment, 40, 7).unwrap(), 7);
        assert_eq!(apply_movement(MovementType::Adjustment, 40, 0).unwrap(), 0);
        assert!(apply_movement(MovementType::Adjustment, 40, -1).is_err());
    }

    #[test]
    fn date_range_is_inclusive_of_last_day() {
        let from = NaiveDate::from_ymd_opt(2026, 5, 1);
        let to = NaiveDate::from_ymd_opt(2026, 5, 3);
        let (start, end) = date_range(from, to).unwrap();
        assert_eq!(start.unwrap().to_rfc3339(), "2026-05-01T00:00:00+00:00");
        assert_eq!(end.unwrap().to_rfc3339(), "2026-05-04T00:00:00+00:00");
        assert!(date_range(to, from).is_err());
        assert_eq!(date_range(None, None).unwrap(), (None, None));
    }
}
