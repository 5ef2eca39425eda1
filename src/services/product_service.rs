use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::{
        forms::{EditForm, ProductFormOptions},
        products::{CreateProductRequest, UpdateProductRequest, VariantInput},
    },
    entity::{
        brands::{Column as BrandCol, Entity as Brands},
        categories::{Column as CatCol, Entity as Categories},
        colors::{Column as ColorCol, Entity as Colors},
        genders::{Column as GenderCol, Entity as Genders},
        locations::{Column as LocCol, Entity as Locations},
        mappings::{Column as MapCol, Entity as Mappings},
        product_variants::{
            self, ActiveModel as VariantActiveModel, Column as VariantCol,
            Entity as ProductVariants,
        },
        products::{self, ActiveModel, Column, Entity as Products},
        racks::{Column as RackCol, Entity as Racks},
        stock_movements::{Column as MoveCol, Entity as StockMovements},
        subcategories::{Column as SubCol, Entity as Subcategories},
        zones::{Column as ZoneCol, Entity as Zones},
    },
    error::{AppError, AppResult},
    export::{self, PRODUCT_HEADERS, ProductExportRow},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Choice, Product, RecordStatus},
    response::ApiResponse,
    routes::params::ProductQuery,
    services::{
        common::{
            choices, clean_optional, ensure_available, ensure_unique, ensure_unlinked, paginate,
        },
        mapping_service,
    },
    state::AppState,
    upload::{self, ImageUpload},
};

const RESOURCE: &str = "products";

/// Key identifying a variant within its product.
fn variant_key(color_id: Option<Uuid>, size: &str) -> (Option<Uuid>, String) {
    (color_id, size.trim().to_lowercase())
}

/// Rejects a variant list that names the same color and size twice.
pub fn ensure_distinct_variants(variants: &[VariantInput]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for variant in variants {
        if !seen.insert(variant_key(variant.color_id, &variant.size)) {
            return Err(AppError::field(
                "variants",
                format!("The variant {} is listed more than once.", variant.size.trim()),
            ));
        }
    }
    Ok(())
}

/// How an incoming variant list changes the stored one.
#[derive(Debug, Default)]
pub struct VariantPlan {
    pub keep: Vec<Uuid>,
    pub insert: Vec<VariantInput>,
    pub remove: Vec<Uuid>,
}

/// Variants matching on `(color, size)` are kept as they are; stock on a kept
/// variant only moves through stock movements.
pub fn plan_variants(
    existing: &[product_variants::Model],
    incoming: &[VariantInput],
) -> VariantPlan {
    let current: HashMap<(Option<Uuid>, String), Uuid> = existing
        .iter()
        .map(|v| (variant_key(v.color_id, &v.size), v.id))
        .collect();

    let mut plan = VariantPlan::default();
    let mut matched = HashSet::new();
    for variant in incoming {
        match current.get(&variant_key(variant.color_id, &variant.size)) {
            Some(id) => {
                matched.insert(*id);
                plan.keep.push(*id);
            }
            None => plan.insert.push(variant.clone()),
        }
    }
    plan.remove = existing
        .iter()
        .map(|v| v.id)
        .filter(|id| !matched.contains(id))
        .collect();
    plan
}

fn filtered(query: &ProductQuery) -> Select<Products> {
    let mut condition = Condition::all();
    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Sku).ilike(pattern)),
        );
    }
    if let Some(status) = query.status {
        condition = condition.add(Column::Status.eq(status));
    }
    if let Some(id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(id));
    }
    if let Some(id) = query.subcategory_id {
        condition = condition.add(Column::SubcategoryId.eq(id));
    }
    if let Some(id) = query.brand_id {
        condition = condition.add(Column::BrandId.eq(id));
    }
    if let Some(id) = query.zone_id {
        condition = condition.add(Column::ZoneId.eq(id));
    }
    Products::find()
        .filter(condition)
        .order_by_desc(Column::CreatedAt)
}

async fn with_variants<C: ConnectionTrait>(
    db: &C,
    rows: Vec<products::Model>,
) -> AppResult<Vec<Product>> {
    let ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
    let mut grouped: HashMap<Uuid, Vec<product_variants::Model>> = HashMap::new();
    for variant in ProductVariants::find()
        .filter(VariantCol::ProductId.is_in(ids))
        .order_by_asc(VariantCol::Size)
        .all(db)
        .await?
    {
        grouped.entry(variant.product_id).or_default().push(variant);
    }
    Ok(rows
        .into_iter()
        .map(|row| {
            let variants = grouped.remove(&row.id).unwrap_or_default();
            Product::from_parts(row, variants)
        })
        .collect())
}

async fn load_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let product = find_product(state, id).await?;
    with_variants(&state.orm, vec![product])
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

async fn find_product(state: &AppState, id: Uuid) -> AppResult<products::Model> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// References a product row points at, checked before any write.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    category_id: Uuid,
    subcategory_id: Uuid,
    brand_id: Option<Uuid>,
    gender_id: Option<Uuid>,
    zone_id: Uuid,
    rack_id: Uuid,
}

impl From<&products::Model> for Placement {
    fn from(p: &products::Model) -> Self {
        Self {
            category_id: p.category_id,
            subcategory_id: p.subcategory_id,
            brand_id: p.brand_id,
            gender_id: p.gender_id,
            zone_id: p.zone_id,
            rack_id: p.rack_id,
        }
    }
}

/// Checks the references in `p` that differ from `current`. Newly chosen
/// references must exist and be Available; kept ones are left alone.
async fn ensure_placement(
    state: &AppState,
    p: &Placement,
    current: Option<&Placement>,
) -> AppResult<()> {
    let db = &state.orm;
    let category_changed = current.is_none_or(|c| c.category_id != p.category_id);
    let subcategory_changed = current.is_none_or(|c| c.subcategory_id != p.subcategory_id);
    let brand_changed = current.is_none_or(|c| c.brand_id != p.brand_id);
    let gender_changed = current.is_none_or(|c| c.gender_id != p.gender_id);
    let location_changed =
        current.is_none_or(|c| (c.zone_id, c.rack_id) != (p.zone_id, p.rack_id));

    if category_changed {
        ensure_available::<Categories, _>(
            db,
            CatCol::Id,
            CatCol::Status,
            p.category_id,
            "category_id",
        )
        .await?;
    }
    if subcategory_changed {
        ensure_available::<Subcategories, _>(
            db,
            SubCol::Id,
            SubCol::Status,
            p.subcategory_id,
            "subcategory_id",
        )
        .await?;
    }
    if category_changed || subcategory_changed {
        let mapped = Mappings::find()
            .filter(MapCol::CategoryId.eq(p.category_id))
            .filter(MapCol::SubcategoryId.eq(p.subcategory_id))
            .filter(MapCol::Status.eq(RecordStatus::Available))
            .count(db)
            .await?;
        if mapped == 0 {
            return Err(AppError::field(
                "subcategory_id",
                "The selected subcategory is not mapped to the category.",
            ));
        }
    }

    if let Some(brand_id) = p.brand_id.filter(|_| brand_changed) {
        ensure_available::<Brands, _>(db, BrandCol::Id, BrandCol::Status, brand_id, "brand_id")
            .await?;
    }
    if let Some(gender_id) = p.gender_id.filter(|_| gender_changed) {
        ensure_available::<Genders, _>(
            db,
            GenderCol::Id,
            GenderCol::Status,
            gender_id,
            "gender_id",
        )
        .await?;
    }

    if location_changed {
        let located = Locations::find()
            .filter(LocCol::ZoneId.eq(p.zone_id))
            .filter(LocCol::RackId.eq(p.rack_id))
            .filter(LocCol::Status.eq(RecordStatus::Available))
            .count(db)
            .await?;
        if located == 0 {
            return Err(AppError::field(
                "rack_id",
                "The selected rack is not placed in the zone.",
            ));
        }
    }
    Ok(())
}

/// Variant colors not in `kept` must exist and be Available.
async fn ensure_variant_colors(
    state: &AppState,
    variants: &[VariantInput],
    kept: &HashSet<Uuid>,
) -> AppResult<()> {
    let color_ids: HashSet<Uuid> = variants
        .iter()
        .filter_map(|v| v.color_id)
        .filter(|id| !kept.contains(id))
        .collect();
    if color_ids.is_empty() {
        return Ok(());
    }
    let available = Colors::find()
        .filter(ColorCol::Id.is_in(color_ids.iter().copied()))
        .filter(ColorCol::Status.eq(RecordStatus::Available))
        .count(&state.orm)
        .await?;
    if available as usize != color_ids.len() {
        return Err(AppError::field(
            "variants",
            "A selected variant color is invalid or unavailable.",
        ));
    }
    Ok(())
}

async fn insert_variant<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
    variant: &VariantInput,
) -> AppResult<()> {
    VariantActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        color_id: Set(variant.color_id),
        size: Set(variant.size.trim().to_string()),
        quantity: Set(variant.quantity),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(db)
    .await?;
    Ok(())
}

async fn form_options(state: &AppState) -> AppResult<ProductFormOptions> {
    let db = &state.orm;
    let mappings = Mappings::find()
        .filter(MapCol::Status.eq(RecordStatus::Available))
        .all(db)
        .await?;
    Ok(ProductFormOptions {
        categories: choices::<Categories, _>(db, CatCol::Id, CatCol::Name, CatCol::Status).await?,
        subcategories: choices::<Subcategories, _>(db, SubCol::Id, SubCol::Name, SubCol::Status)
            .await?,
        mappings: mapping_service::with_names(db, mappings).await?,
        brands: choices::<Brands, _>(db, BrandCol::Id, BrandCol::Name, BrandCol::Status).await?,
        genders: choices::<Genders, _>(db, GenderCol::Id, GenderCol::Name, GenderCol::Status)
            .await?,
        colors: choices::<Colors, _>(db, ColorCol::Id, ColorCol::Name, ColorCol::Status).await?,
        zones: choices::<Zones, _>(db, ZoneCol::Id, ZoneCol::Name, ZoneCol::Status).await?,
        racks: choices::<Racks, _>(db, RackCol::Id, RackCol::Name, RackCol::Status).await?,
    })
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let (items, meta) = paginate(&state.orm, filtered(&query), query.pagination()).await?;
    let data = with_variants(&state.orm, items).await?;
    Ok(ApiResponse::paginated("Products", data, meta))
}

pub async fn product_form(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProductFormOptions>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success("Product form", form_options(state).await?, None))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    Ok(ApiResponse::success("Product", load_product(state, id).await?, None))
}

pub async fn edit_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<EditForm<Product, ProductFormOptions>>> {
    ensure_admin(user)?;
    let record = load_product(state, id).await?;
    let options = form_options(state).await?;
    Ok(ApiResponse::success(
        "Product form",
        EditForm { record, options },
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;
    let sku = payload.sku.trim().to_string();
    ensure_unique::<Products, _>(&state.orm, Column::Sku, Column::Id, "sku", &sku, None).await?;
    ensure_placement(
        state,
        &Placement {
            category_id: payload.category_id,
            subcategory_id: payload.subcategory_id,
            brand_id: payload.brand_id,
            gender_id: payload.gender_id,
            zone_id: payload.zone_id,
            rack_id: payload.rack_id,
        },
        None,
    )
    .await?;
    ensure_distinct_variants(&payload.variants)?;
    ensure_variant_colors(state, &payload.variants, &HashSet::new()).await?;

    let id = Uuid::new_v4();
    let txn = state.orm.begin().await?;
    ActiveModel {
        id: Set(id),
        name: Set(payload.name.trim().to_string()),
        sku: Set(sku),
        description: Set(clean_optional(payload.description)),
        category_id: Set(payload.category_id),
        subcategory_id: Set(payload.subcategory_id),
        brand_id: Set(payload.brand_id),
        gender_id: Set(payload.gender_id),
        zone_id: Set(payload.zone_id),
        rack_id: Set(payload.rack_id),
        image: Set(None),
        status: Set(RecordStatus::Available),
        created_by: Set(Some(user.user_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;
    for variant in &payload.variants {
        insert_variant(&txn, id, variant).await?;
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        user,
        "product_create",
        RESOURCE,
        serde_json::json!({ "product_id": id, "variants": payload.variants.len() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        load_product(state, id).await?,
        None,
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = find_product(state, id).await?;

    let sku = payload.sku.as_deref().map(|s| s.trim().to_string());
    if let Some(sku) = &sku {
        ensure_unique::<Products, _>(&state.orm, Column::Sku, Column::Id, "sku", sku, Some(id))
            .await?;
    }
    let placement = Placement {
        category_id: payload.category_id.unwrap_or(existing.category_id),
        subcategory_id: payload.subcategory_id.unwrap_or(existing.subcategory_id),
        brand_id: payload.brand_id.or(existing.brand_id),
        gender_id: payload.gender_id.or(existing.gender_id),
        zone_id: payload.zone_id.unwrap_or(existing.zone_id),
        rack_id: payload.rack_id.unwrap_or(existing.rack_id),
    };
    ensure_placement(state, &placement, Some(&Placement::from(&existing))).await?;

    let plan = match &payload.variants {
        Some(variants) => {
            ensure_distinct_variants(variants)?;
            let current = ProductVariants::find()
                .filter(VariantCol::ProductId.eq(id))
                .all(&state.orm)
                .await?;
            let kept_colors: HashSet<Uuid> = current.iter().filter_map(|v| v.color_id).collect();
            ensure_variant_colors(state, variants, &kept_colors).await?;
            let plan = plan_variants(&current, variants);
            if !plan.remove.is_empty() {
                let referenced = StockMovements::find()
                    .filter(MoveCol::VariantId.is_in(plan.remove.clone()))
                    .count(&state.orm)
                    .await?;
                if referenced > 0 {
                    return Err(AppError::field(
                        "variants",
                        "A variant with recorded stock movements cannot be removed.",
                    ));
                }
            }
            Some(plan)
        }
        None => None,
    };

    let txn = state.orm.begin().await?;
    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(sku) = sku {
        active.sku = Set(sku);
    }
    if payload.description.is_some() {
        active.description = Set(clean_optional(payload.description));
    }
    active.category_id = Set(placement.category_id);
    active.subcategory_id = Set(placement.subcategory_id);
    active.brand_id = Set(placement.brand_id);
    active.gender_id = Set(placement.gender_id);
    active.zone_id = Set(placement.zone_id);
    active.rack_id = Set(placement.rack_id);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    if let Some(plan) = &plan {
        if !plan.remove.is_empty() {
            ProductVariants::delete_many()
                .filter(VariantCol::Id.is_in(plan.remove.clone()))
                .exec(&txn)
                .await?;
        }
        for variant in &plan.insert {
            insert_variant(&txn, id, variant).await?;
        }
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        user,
        "product_update",
        RESOURCE,
        serde_json::json!({
            "product_id": id,
            "variants_added": plan.as_ref().map_or(0, |p| p.insert.len()),
            "variants_removed": plan.as_ref().map_or(0, |p| p.remove.len()),
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product updated",
        load_product(state, id).await?,
        None,
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let product = find_product(state, id).await?;

    let movements = StockMovements::find()
        .filter(MoveCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(movements, "product", "stock movements")?;

    let txn = state.orm.begin().await?;
    ProductVariants::delete_many()
        .filter(VariantCol::ProductId.eq(id))
        .exec(&txn)
        .await?;
    Products::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    if let Some(image) = &product.image {
        upload::remove_image(&state.config.public_dir, image).await;
    }

    audit::record(
        &state.pool,
        user,
        "product_delete",
        RESOURCE,
        serde_json::json!({ "product_id": id, "sku": product.sku }),
    )
    .await;

    Ok(ApiResponse::empty("Product deleted"))
}

pub async fn set_product_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = find_product(state, id).await?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "product_status",
        RESOURCE,
        serde_json::json!({ "product_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Product set to {}", status.as_str()),
        load_product(state, id).await?,
        None,
    ))
}

pub async fn upload_product_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    image: ImageUpload,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = find_product(state, id).await?;

    let path = upload::store_image(
        &state.config.public_dir,
        RESOURCE,
        &image,
        state.config.max_upload_bytes,
    )
    .await?;
    let previous = existing.image.clone();

    let mut active: ActiveModel = existing.into();
    active.image = Set(Some(path.clone()));
    active.updated_at = Set(Utc::now().into());
    if let Err(err) = active.update(&state.orm).await {
        upload::remove_image(&state.config.public_dir, &path).await;
        return Err(err.into());
    }

    if let Some(previous) = previous {
        upload::remove_image(&state.config.public_dir, &previous).await;
    }

    audit::record(
        &state.pool,
        user,
        "product_image",
        RESOURCE,
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product image uploaded",
        load_product(state, id).await?,
        None,
    ))
}

async fn names<E, C>(
    db: &C,
    id_col: E::Column,
    name_col: E::Column,
) -> AppResult<HashMap<Uuid, String>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    Ok(E::find()
        .select_only()
        .column_as(id_col, "id")
        .column_as(name_col, "name")
        .into_model::<Choice>()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

/// Every product matching the index filters, rendered as an `.xlsx` workbook.
/// Returns the download file name next to the bytes.
pub async fn export_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<(String, Vec<u8>)> {
    let db = &state.orm;
    let rows = filtered(&query).all(db).await?;
    let products = with_variants(db, rows).await?;

    let categories = names::<Categories, _>(db, CatCol::Id, CatCol::Name).await?;
    let subcategories = names::<Subcategories, _>(db, SubCol::Id, SubCol::Name).await?;
    let brands = names::<Brands, _>(db, BrandCol::Id, BrandCol::Name).await?;
    let genders = names::<Genders, _>(db, GenderCol::Id, GenderCol::Name).await?;
    let zones = names::<Zones, _>(db, ZoneCol::Id, ZoneCol::Name).await?;
    let racks = names::<Racks, _>(db, RackCol::Id, RackCol::Name).await?;

    let cells: Vec<_> = products
        .into_iter()
        .map(|p| ProductExportRow {
            category: categories.get(&p.category_id).cloned(),
            subcategory: subcategories.get(&p.subcategory_id).cloned(),
            brand: p.brand_id.and_then(|id| brands.get(&id).cloned()),
            gender: p.gender_id.and_then(|id| genders.get(&id).cloned()),
            zone: zones.get(&p.zone_id).cloned(),
            rack: racks.get(&p.rack_id).cloned(),
            name: p.name,
            sku: p.sku,
            total_quantity: p.total_quantity,
            status: p.status,
            created_at: p.created_at,
        })
        .enumerate()
        .map(|(i, row)| export::product_cells(i, &row))
        .collect();

    let bytes = export::workbook_bytes("Products", &PRODUCT_HEADERS, &cells)?;
    tracing::debug!(rows = cells.len(), "products exported");
    Ok((export::file_name("products", Utc::now()), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn input(color_id: Option<Uuid>, size: &str, quantity: i32) -> VariantInput {
        VariantInput {
            color_id,
            size: size.into(),
            quantity,
        }
    }

    fn stored(color_id: Option<Uuid>, size: &str, quantity: i32) -> product_variants::Model {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .unwrap();
        product_variants::Model {
            id: Uuid::new_v4(),
            product_id: Uuid::nil(),
            color_id,
            size: size.into(),
            quantity,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn duplicate_variants_are_rejected_case_insensitively() {
        let black = Some(Uuid::new_v4());
        assert!(ensure_distinct_variants(&[input(black, "M", 1), input(None, "M", 1)]).is_ok());
        assert!(ensure_distinct_variants(&[input(black, "M", 1), input(black, " m ", 2)]).is_err());
    }

    #[test]
    fn plan_keeps_matches_inserts_new_and_removes_missing() {
        let black = Some(Uuid::new_v4());
        let kept = stored(black, "M", 5);
        let dropped = stored(black, "L", 0);
        let plan = plan_variants(
            &[kept.clone(), dropped.clone()],
            &[input(black, "m", 99), input(None, "XL", 3)],
        );
        assert_eq!(plan.keep, vec![kept.id]);
        assert_eq!(plan.remove, vec![dropped.id]);
        assert_eq!(plan.insert.len(), 1);
        assert_eq!(plan.insert[0].size, "XL");
    }

    #[test]
    fn empty_incoming_list_removes_everything() {
        let existing = vec![stored(None, "S", 1), stored(None, "M", 2)];
        let plan = plan_variants(&existing, &[]);
        assert!(plan.keep.is_empty() && plan.insert.is_empty());
        assert_eq!(plan.remove.len(), 2);
    }
}
