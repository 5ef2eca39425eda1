use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::catalog::{CreateNamedRequest, UpdateNamedRequest},
    entity::{
        brands::{ActiveModel, Column, Entity as Brands},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Brand, RecordStatus},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{clean_optional, ensure_unique, ensure_unlinked, paginate},
    state::AppState,
    upload::{self, ImageUpload},
};

const RESOURCE: &str = "brands";

pub async fn list_brands(state: &AppState, query: ListQuery) -> AppResult<ApiResponse<Vec<Brand>>> {
    let mut finder = Brands::find();
    if let Some(pattern) = query.search() {
        finder = finder.filter(Expr::col(Column::Name).ilike(pattern));
    }
    if let Some(status) = query.status {
        finder = finder.filter(Column::Status.eq(status));
    }
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (items, meta) = paginate(&state.orm, finder, query.pagination()).await?;
    let data = items.into_iter().map(Brand::from).collect();
    Ok(ApiResponse::paginated("Brands", data, meta))
}

pub async fn get_brand(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Brand>> {
    let brand = Brands::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Brand", brand.into(), None))
}

pub async fn create_brand(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNamedRequest,
) -> AppResult<ApiResponse<Brand>> {
    ensure_admin(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    ensure_unique::<Brands, _>(&state.orm, Column::Name, Column::Id, "name", &name, None).await?;

    let brand = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(clean_optional(payload.description)),
        image: Set(None),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user,
        "brand_create",
        RESOURCE,
        serde_json::json!({ "brand_id": brand.id }),
    )
    .await;

    Ok(ApiResponse::success("Brand created", brand.into(), None))
}

pub async fn update_brand(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateNamedRequest,
) -> AppResult<ApiResponse<Brand>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Brands::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        ensure_unique::<Brands, _>(&state.orm, Column::Name, Column::Id, "name", &name, Some(id))
            .await?;
        active.name = Set(name);
    }
    if payload.description.is_some() {
        active.description = Set(clean_optional(payload.description));
    }
    active.updated_at = Set(Utc::now().into());
    let brand = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "brand_update",
        RESOURCE,
        serde_json::json!({ "brand_id": brand.id }),
    )
    .await;

    Ok(ApiResponse::success("Brand updated", brand.into(), None))
}

pub async fn delete_brand(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let brand = Brands::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let linked = Products::find()
        .filter(ProdCol::BrandId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(linked, "brand", "products")?;

    Brands::delete_by_id(id).exec(&state.orm).await?;
    if let Some(image) = &brand.image {
        upload::remove_image(&state.config.public_dir, image).await;
    }

    audit::record(
        &state.pool,
        user,
        "brand_delete",
        RESOURCE,
        serde_json::json!({ "brand_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Brand deleted"))
}

pub async fn set_brand_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Brand>> {
    ensure_admin(user)?;
    let existing = Brands::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let brand = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "brand_status",
        RESOURCE,
        serde_json::json!({ "brand_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Brand set to {}", status.as_str()),
        brand.into(),
        None,
    ))
}

pub async fn upload_brand_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    image: ImageUpload,
) -> AppResult<ApiResponse<Brand>> {
    ensure_admin(user)?;
    let existing = Brands::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

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
    let brand = match active.update(&state.orm).await {
        Ok(brand) => brand,
        Err(err) => {
            upload::remove_image(&state.config.public_dir, &path).await;
            return Err(err.into());
        }
    };

    if let Some(previous) = previous {
        upload::remove_image(&state.config.public_dir, &previous).await;
    }

    audit::record(
        &state.pool,
        user,
        "brand_image",
        RESOURCE,
        serde_json::json!({ "brand_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Brand image uploaded", brand.into(), None))
}
