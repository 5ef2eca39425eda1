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
    dto::catalog::GenderRequest,
    entity::{
        genders::{ActiveModel, Column, Entity as Genders},
        products::{Column as ProdCol, Entity as Products},
        size_libraries::{Column as SizeCol, Entity as SizeLibraries},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Gender, RecordStatus},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{ensure_unique, ensure_unlinked, paginate},
    state::AppState,
};

const RESOURCE: &str = "genders";

pub async fn list_genders(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<Gender>>> {
    let mut finder = Genders::find();
    if let Some(pattern) = query.search() {
        finder = finder.filter(Expr::col(Column::Name).ilike(pattern));
    }
    if let Some(status) = query.status {
        finder = finder.filter(Column::Status.eq(status));
    }
    finder = match query.sort_order.unwrap_or(SortOrder::Asc) {
        SortOrder::Asc => finder.order_by_asc(Column::Name),
        SortOrder::Desc => finder.order_by_desc(Column::Name),
    };

    let (items, meta) = paginate(&state.orm, finder, query.pagination()).await?;
    let data = items.into_iter().map(Gender::from).collect();
    Ok(ApiResponse::paginated("Genders", data, meta))
}

pub async fn get_gender(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Gender>> {
    let gender = Genders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Gender", gender.into(), None))
}

pub async fn create_gender(
    state: &AppState,
    user: &AuthUser,
    payload: GenderRequest,
) -> AppResult<ApiResponse<Gender>> {
    ensure_admin(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    ensure_unique::<Genders, _>(&state.orm, Column::Name, Column::Id, "name", &name, None).await?;

    let gender = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user,
        "gender_create",
        RESOURCE,
        serde_json::json!({ "gender_id": gender.id }),
    )
    .await;

    Ok(ApiResponse::success("Gender created", gender.into(), None))
}

pub async fn update_gender(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: GenderRequest,
) -> AppResult<ApiResponse<Gender>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Genders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let name = payload.name.trim().to_string();
    ensure_unique::<Genders, _>(&state.orm, Column::Name, Column::Id, "name", &name, Some(id))
        .await?;

    let mut active: ActiveModel = existing.into();
    active.name = Set(name);
    active.updated_at = Set(Utc::now().into());
    let gender = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "gender_update",
        RESOURCE,
        serde_json::json!({ "gender_id": gender.id }),
    )
    .await;

    Ok(ApiResponse::success("Gender updated", gender.into(), None))
}

pub async fn delete_gender(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    Genders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let sizes = SizeLibraries::find()
        .filter(SizeCol::GenderId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(sizes, "gender", "sizes")?;
    let products = Products::find()
        .filter(ProdCol::GenderId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(products, "gender", "products")?;

    Genders::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "gender_delete",
        RESOURCE,
        serde_json::json!({ "gender_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Gender deleted"))
}

pub async fn set_gender_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Gender>> {
    ensure_admin(user)?;
    let existing = Genders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let gender = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "gender_status",
        RESOURCE,
        serde_json::json!({ "gender_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Gender set to {}", status.as_str()),
        gender.into(),
        None,
    ))
}
