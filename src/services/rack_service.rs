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
        locations::{Column as LocCol, Entity as Locations},
        products::{Column as ProdCol, Entity as Products},
        racks::{ActiveModel, Column, Entity as Racks},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{RecordStatus, Rack},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{clean_optional, ensure_unique, ensure_unlinked, paginate},
    state::AppState,
};

const RESOURCE: &str = "racks";

pub async fn list_racks(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<Rack>>> {
    let mut finder = Racks::find();
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
    let data = items.into_iter().map(Rack::from).collect();
    Ok(ApiResponse::paginated("Racks", data, meta))
}

pub async fn get_rack(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Rack>> {
    let rack = Racks::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Rack", rack.into(), None))
}

pub async fn create_rack(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNamedRequest,
) -> AppResult<ApiResponse<Rack>> {
    ensure_admin(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    ensure_unique::<Racks, _>(&state.orm, Column::Name, Column::Id, "name", &name, None)
        .await?;

    let rack = ActiveModel {
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
        "rack_create",
        RESOURCE,
        serde_json::json!({ "rack_id": rack.id }),
    )
    .await;

    Ok(ApiResponse::success("Rack created", rack.into(), None))
}

pub async fn update_rack(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateNamedRequest,
) -> AppResult<ApiResponse<Rack>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Racks::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        ensure_unique::<Racks, _>(
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
    let rack = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "rack_update",
        RESOURCE,
        serde_json::json!({ "rack_id": rack.id }),
    )
    .await;

    Ok(ApiResponse::success("Rack updated", rack.into(), None))
}

pub async fn delete_rack(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    Racks::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let locations = Locations::find()
        .filter(LocCol::RackId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(locations, "rack", "locations")?;
    let products = Products::find()
        .filter(ProdCol::RackId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(products, "rack", "products")?;

    Racks::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "rack_delete",
        RESOURCE,
        serde_json::json!({ "rack_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Rack deleted"))
}

pub async fn set_rack_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Rack>> {
    ensure_admin(user)?;
    let existing = Racks::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let rack = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "rack_status",
        RESOURCE,
        serde_json::json!({ "rack_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Rack set to {}", status.as_str()),
        rack.into(),
        None,
    ))
}
