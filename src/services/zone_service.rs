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
        zones::{ActiveModel, Column, Entity as Zones},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{RecordStatus, Zone},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{clean_optional, ensure_unique, ensure_unlinked, paginate},
    state::AppState,
};

const RESOURCE: &str = "zones";

pub async fn list_zones(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<Zone>>> {
    let mut finder = Zones::find();
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
    let data = items.into_iter().map(Zone::from).collect();
    Ok(ApiResponse::paginated("Zones", data, meta))
}

pub async fn get_zone(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Zone>> {
    let zone = Zones::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Zone", zone.into(), None))
}

pub async fn create_zone(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNamedRequest,
) -> AppResult<ApiResponse<Zone>> {
    ensure_admin(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    ensure_unique::<Zones, _>(&state.orm, Column::Name, Column::Id, "name", &name, None)
        .await?;

    let zone = ActiveModel {
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
        "zone_create",
        RESOURCE,
        serde_json::json!({ "zone_id": zone.id }),
    )
    .await;

    Ok(ApiResponse::success("Zone created", zone.into(), None))
}

pub async fn update_zone(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateNamedRequest,
) -> AppResult<ApiResponse<Zone>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Zones::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        ensure_unique::<Zones, _>(
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
    let zone = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "zone_update",
        RESOURCE,
        serde_json::json!({ "zone_id": zone.id }),
    )
    .await;

    Ok(ApiResponse::success("Zone updated", zone.into(), None))
}

pub async fn delete_zone(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    Zones::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let locations = Locations::find()
        .filter(LocCol::ZoneId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(locations, "zone", "locations")?;
    let products = Products::find()
        .filter(ProdCol::ZoneId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(products, "zone", "products")?;

    Zones::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "zone_delete",
        RESOURCE,
        serde_json::json!({ "zone_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Zone deleted"))
}

pub async fn set_zone_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Zone>> {
    ensure_admin(user)?;
    let existing = Zones::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let zone = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "zone_status",
        RESOURCE,
        serde_json::json!({ "zone_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Zone set to {}", status.as_str()),
        zone.into(),
        None,
    ))
}
