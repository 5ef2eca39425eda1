//! Clothing and shoe size libraries. Both kinds share one table; every call is
//! scoped by [`SizeKind`] so a shoe size is invisible through the clothing routes.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::{
        forms::{EditForm, SizeFormOptions},
        sizes::{CreateSizeRequest, UpdateSizeRequest},
    },
    entity::{
        genders::{Column as GenderCol, Entity as Genders},
        size_libraries::{self, ActiveModel, Column, Entity as SizeLibraries},
        size_types::{Column as TypeCol, Entity as SizeTypes},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{RecordStatus, SizeKind, SizeLibrary},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{choices, ensure_available, ensure_unlinked, paginate},
    state::AppState,
};

pub async fn with_names<C: ConnectionTrait>(
    db: &C,
    rows: Vec<size_libraries::Model>,
) -> AppResult<Vec<SizeLibrary>> {
    let gender_ids: Vec<Uuid> = rows.iter().map(|s| s.gender_id).collect();
    let genders: HashMap<Uuid, String> = Genders::find()
        .filter(GenderCol::Id.is_in(gender_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let gender_name = genders.get(&row.gender_id).cloned();
            SizeLibrary {
                gender_name,
                ..SizeLibrary::from(row)
            }
        })
        .collect())
}

async fn named(state: &AppState, row: size_libraries::Model) -> AppResult<SizeLibrary> {
    with_names(&state.orm, vec![row])
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

async fn find_size(state: &AppState, kind: SizeKind, id: Uuid) -> AppResult<size_libraries::Model> {
    SizeLibraries::find_by_id(id)
        .filter(Column::Kind.eq(kind))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_size_free(
    state: &AppState,
    kind: SizeKind,
    gender_id: Uuid,
    size: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = SizeLibraries::find()
        .filter(Column::Kind.eq(kind))
        .filter(Column::GenderId.eq(gender_id))
        .filter(Expr::expr(Func::lower(Expr::col(Column::Size))).eq(size.to_lowercase()));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(&state.orm).await? > 0 {
        return Err(AppError::field(
            "size",
            "The size has already been taken for this gender.",
        ));
    }
    Ok(())
}

async fn form_options(state: &AppState, kind: SizeKind) -> AppResult<SizeFormOptions> {
    Ok(SizeFormOptions {
        kind,
        genders: choices::<Genders, _>(
            &state.orm,
            GenderCol::Id,
            GenderCol::Name,
            GenderCol::Status,
        )
        .await?,
    })
}

pub async fn list_sizes(
    state: &AppState,
    kind: SizeKind,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<SizeLibrary>>> {
    let mut finder = SizeLibraries::find().filter(Column::Kind.eq(kind));
    if let Some(pattern) = query.search() {
        finder = finder.filter(Expr::col(Column::Size).ilike(pattern));
    }
    if let Some(status) = query.status {
        finder = finder.filter(Column::Status.eq(status));
    }
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (items, meta) = paginate(&state.orm, finder, query.pagination()).await?;
    let data = with_names(&state.orm, items).await?;
    Ok(ApiResponse::paginated("Sizes", data, meta))
}

pub async fn size_form(
    state: &AppState,
    user: &AuthUser,
    kind: SizeKind,
) -> AppResult<ApiResponse<SizeFormOptions>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success("Size form", form_options(state, kind).await?, None))
}

pub async fn get_size(
    state: &AppState,
    kind: SizeKind,
    id: Uuid,
) -> AppResult<ApiResponse<SizeLibrary>> {
    let size = find_size(state, kind, id).await?;
    Ok(ApiResponse::success("Size", named(state, size).await?, None))
}

pub async fn edit_size(
    state: &AppState,
    user: &AuthUser,
    kind: SizeKind,
    id: Uuid,
) -> AppResult<ApiResponse<EditForm<SizeLibrary, SizeFormOptions>>> {
    ensure_admin(user)?;
    let record = named(state, find_size(state, kind, id).await?).await?;
    let options = form_options(state, kind).await?;
    Ok(ApiResponse::success("Size form", EditForm { record, options }, None))
}

pub async fn create_size(
    state: &AppState,
    user: &AuthUser,
    kind: SizeKind,
    payload: CreateSizeRequest,
) -> AppResult<ApiResponse<SizeLibrary>> {
    ensure_admin(user)?;
    payload.validate()?;
    let size = payload.size.trim().to_string();
    ensure_available::<Genders, _>(
        &state.orm,
        GenderCol::Id,
        GenderCol::Status,
        payload.gender_id,
        "gender_id",
    )
    .await?;
    ensure_size_free(state, kind, payload.gender_id, &size, None).await?;

    let created = ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(kind),
        gender_id: Set(payload.gender_id),
        size: Set(size),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user,
        "size_create",
        kind.resource(),
        serde_json::json!({ "size_id": created.id, "size": created.size }),
    )
    .await;

    Ok(ApiResponse::success("Size created", named(state, created).await?, None))
}

pub async fn update_size(
    state: &AppState,
    user: &AuthUser,
    kind: SizeKind,
    id: Uuid,
    payload: UpdateSizeRequest,
) -> AppResult<ApiResponse<SizeLibrary>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = find_size(state, kind, id).await?;

    let gender_id = payload.gender_id.unwrap_or(existing.gender_id);
    let size = payload
        .size
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| existing.size.clone());
    if gender_id != existing.gender_id {
        ensure_available::<Genders, _>(
            &state.orm,
            GenderCol::Id,
            GenderCol::Status,
            gender_id,
            "gender_id",
        )
        .await?;
    }
    ensure_size_free(state, kind, gender_id, &size, Some(id)).await?;

    let mut active: ActiveModel = existing.into();
    active.gender_id = Set(gender_id);
    active.size = Set(size);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "size_update",
        kind.resource(),
        serde_json::json!({ "size_id": updated.id }),
    )
    .await;

    Ok(ApiResponse::success("Size updated", named(state, updated).await?, None))
}

pub async fn delete_size(
    state: &AppState,
    user: &AuthUser,
    kind: SizeKind,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    find_size(state, kind, id).await?;

    let size_types = SizeTypes::find()
        .filter(TypeCol::SizeId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(size_types, "size", "size types")?;

    SizeLibraries::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "size_delete",
        kind.resource(),
        serde_json::json!({ "size_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Size deleted"))
}

pub async fn set_size_status(
    state: &AppState,
    user: &AuthUser,
    kind: SizeKind,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<SizeLibrary>> {
    ensure_admin(user)?;
    let existing = find_size(state, kind, id).await?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "size_status",
        kind.resource(),
        serde_json::json!({ "size_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Size set to {}", status.as_str()),
        named(state, updated).await?,
        None,
    ))
}
