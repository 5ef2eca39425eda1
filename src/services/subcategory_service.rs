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
        mappings::{Column as MapCol, Entity as Mappings},
        products::{Column as ProdCol, Entity as Products},
        subcategories::{ActiveModel, Column, Entity as Subcategories},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{RecordStatus, Subcategory},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{clean_optional, ensure_unique, ensure_unlinked, paginate},
    state::AppState,
};

const RESOURCE: &str = "subcategories";

pub async fn list_subcategories(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<Subcategory>>> {
    let mut finder = Subcategories::find();
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
    let data = items.into_iter().map(Subcategory::from).collect();
    Ok(ApiResponse::paginated("Subcategories", data, meta))
}

pub async fn get_subcategory(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Subcategory>> {
    let subcategory = Subcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Subcategory", subcategory.into(), None))
}

pub async fn create_subcategory(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNamedRequest,
) -> AppResult<ApiResponse<Subcategory>> {
    ensure_admin(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    ensure_unique::<Subcategories, _>(&state.orm, Column::Name, Column::Id, "name", &name, None)
        .await?;

    let subcategory = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(clean_optional(payload.description)),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user,
        "subcategory_create",
        RESOURCE,
        serde_json::json!({ "subcategory_id": subcategory.id }),
    )
    .await;

    Ok(ApiResponse::success("Subcategory created", subcategory.into(), None))
}

pub async fn update_subcategory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateNamedRequest,
) -> AppResult<ApiResponse<Subcategory>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Subcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        ensure_unique::<Subcategories, _>(
            &state.orm,
            Column::Name,
            Column::Id,
            "name",
            &name,
            Some(id),
        )
        .await?;
        active.name = Set(name);
    }
    if payload.description.is_some() {
        active.description = Set(clean_optional(payload.description));
    }
    active.updated_at = Set(Utc::now().into());
    let subcategory = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "subcategory_update",
        RESOURCE,
        serde_json::json!({ "subcategory_id": subcategory.id }),
    )
    .await;

    Ok(ApiResponse::success("Subcategory updated", subcategory.into(), None))
}

pub async fn delete_subcategory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    Subcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mappings = Mappings::find()
        .filter(MapCol::SubcategoryId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(mappings, "subcategory", "mappings")?;
    let products = Products::find()
        .filter(ProdCol::SubcategoryId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(products, "subcategory", "products")?;

    Subcategories::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "subcategory_delete",
        RESOURCE,
        serde_json::json!({ "subcategory_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Subcategory deleted"))
}

pub async fn set_subcategory_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Subcategory>> {
    ensure_admin(user)?;
    let existing = Subcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let subcategory = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "subcategory_status",
        RESOURCE,
        serde_json::json!({ "subcategory_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Subcategory set to {}", status.as_str()),
        subcategory.into(),
        None,
    ))
}
