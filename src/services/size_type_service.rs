use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        forms::{EditForm, SizeTypeFormOptions},
        sizes::{CreateSizeTypeRequest, UpdateSizeTypeRequest},
    },
    entity::{
        categories::{Column as CatCol, Entity as Categories},
        size_libraries::{Column as SizeCol, Entity as SizeLibraries},
        size_types::{self, ActiveModel, Column, Entity as SizeTypes, Relation},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Choice, RecordStatus, SizeKind, SizeType},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{choices, ensure_available, paginate},
    state::AppState,
};

const RESOURCE: &str = "size_types";

pub async fn with_names<C: ConnectionTrait>(
    db: &C,
    rows: Vec<size_types::Model>,
) -> AppResult<Vec<SizeType>> {
    let category_ids: Vec<Uuid> = rows.iter().map(|t| t.category_id).collect();
    let size_ids: Vec<Uuid> = rows.iter().map(|t| t.size_id).collect();

    let categories: HashMap<Uuid, String> = Categories::find()
        .filter(CatCol::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let sizes: HashMap<Uuid, String> = SizeLibraries::find()
        .filter(SizeCol::Id.is_in(size_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s.size))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let category_name = categories.get(&row.category_id).cloned();
            let size = sizes.get(&row.size_id).cloned();
            SizeType {
                category_name,
                size,
                ..SizeType::from(row)
            }
        })
        .collect())
}

async fn named(state: &AppState, row: size_types::Model) -> AppResult<SizeType> {
    with_names(&state.orm, vec![row])
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

async fn find_size_type(state: &AppState, id: Uuid) -> AppResult<size_types::Model> {
    SizeTypes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// The referenced size must exist in the library of the same kind.
async fn ensure_size_of_kind(state: &AppState, size_id: Uuid, kind: SizeKind) -> AppResult<()> {
    let size = SizeLibraries::find_by_id(size_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::field("size_id", "The selected size id is invalid."))?;
    if size.kind != kind {
        return Err(AppError::field(
            "size_id",
            format!("The selected size is not a {} size.", kind_label(kind)),
        ));
    }
    Ok(())
}

fn kind_label(kind: SizeKind) -> &'static str {
    match kind {
        SizeKind::Clothing => "clothing",
        SizeKind::Shoes => "shoe",
    }
}

async fn ensure_pair_free(
    state: &AppState,
    category_id: Uuid,
    size_id: Uuid,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = SizeTypes::find()
        .filter(Column::CategoryId.eq(category_id))
        .filter(Column::SizeId.eq(size_id));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(&state.orm).await? > 0 {
        return Err(AppError::field(
            "size_id",
            "This size is already assigned to the category.",
        ));
    }
    Ok(())
}

async fn size_choices(state: &AppState, kind: SizeKind) -> AppResult<Vec<Choice>> {
    Ok(SizeLibraries::find()
        .select_only()
        .column_as(SizeCol::Id, "id")
        .column_as(SizeCol::Size, "name")
        .filter(SizeCol::Kind.eq(kind))
        .filter(SizeCol::Status.eq(RecordStatus::Available))
        .order_by_asc(SizeCol::Size)
        .into_model::<Choice>()
        .all(&state.orm)
        .await?)
}

async fn form_options(state: &AppState) -> AppResult<SizeTypeFormOptions> {
    Ok(SizeTypeFormOptions {
        categories: choices::<Categories, _>(&state.orm, CatCol::Id, CatCol::Name, CatCol::Status)
            .await?,
        clothing_sizes: size_choices(state, SizeKind::Clothing).await?,
        shoe_sizes: size_choices(state, SizeKind::Shoes).await?,
    })
}

pub async fn list_size_types(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<SizeType>>> {
    let mut finder = SizeTypes::find();
    if let Some(pattern) = query.search() {
        finder = finder
            .join(JoinType::LeftJoin, Relation::Categories.def())
            .join(JoinType::LeftJoin, Relation::SizeLibraries.def())
            .filter(
                Condition::any()
                    .add(Expr::col((Categories, CatCol::Name)).ilike(pattern.clone()))
                    .add(Expr::col((SizeLibraries, SizeCol::Size)).ilike(pattern)),
            );
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
    Ok(ApiResponse::paginated("Size types", data, meta))
}

pub async fn size_type_form(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<SizeTypeFormOptions>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success("Size type form", form_options(state).await?, None))
}

pub async fn get_size_type(state: &AppState, id: Uuid) -> AppResult<ApiResponse<SizeType>> {
    let size_type = find_size_type(state, id).await?;
    Ok(ApiResponse::success("Size type", named(state, size_type).await?, None))
}

pub async fn edit_size_type(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<EditForm<SizeType, SizeTypeFormOptions>>> {
    ensure_admin(user)?;
    let record = named(state, find_size_type(state, id).await?).await?;
    let options = form_options(state).await?;
    Ok(ApiResponse::success(
        "Size type form",
        EditForm { record, options },
        None,
    ))
}

pub async fn create_size_type(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSizeTypeRequest,
) -> AppResult<ApiResponse<SizeType>> {
    ensure_admin(user)?;
    ensure_available::<Categories, _>(
        &state.orm,
        CatCol::Id,
        CatCol::Status,
        payload.category_id,
        "category_id",
    )
    .await?;
    ensure_size_of_kind(state, payload.size_id, payload.kind).await?;
    ensure_pair_free(state, payload.category_id, payload.size_id, None).await?;

    let size_type = ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        kind: Set(payload.kind),
        size_id: Set(payload.size_id),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user,
        "size_type_create",
        RESOURCE,
        serde_json::json!({ "size_type_id": size_type.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Size type created",
        named(state, size_type).await?,
        None,
    ))
}

pub async fn update_size_type(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateSizeTypeRequest,
) -> AppResult<ApiResponse<SizeType>> {
    ensure_admin(user)?;
    let existing = find_size_type(state, id).await?;

    let category_id = payload.category_id.unwrap_or(existing.category_id);
    let kind = payload.kind.unwrap_or(existing.kind);
    let size_id = payload.size_id.unwrap_or(existing.size_id);
    if category_id != existing.category_id {
        ensure_available::<Categories, _>(
            &state.orm,
            CatCol::Id,
            CatCol::Status,
            category_id,
            "category_id",
        )
        .await?;
    }
    ensure_size_of_kind(state, size_id, kind).await?;
    ensure_pair_free(state, category_id, size_id, Some(id)).await?;

    let mut active: ActiveModel = existing.into();
    active.category_id = Set(category_id);
    active.kind = Set(kind);
    active.size_id = Set(size_id);
    active.updated_at = Set(Utc::now().into());
    let size_type = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "size_type_update",
        RESOURCE,
        serde_json::json!({ "size_type_id": size_type.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Size type updated",
        named(state, size_type).await?,
        None,
    ))
}

pub async fn delete_size_type(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    find_size_type(state, id).await?;
    SizeTypes::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "size_type_delete",
        RESOURCE,
        serde_json::json!({ "size_type_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Size type deleted"))
}

pub async fn set_size_type_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<SizeType>> {
    ensure_admin(user)?;
    let existing = find_size_type(state, id).await?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let size_type = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "size_type_status",
        RESOURCE,
        serde_json::json!({ "size_type_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Size type set to {}", status.as_str()),
        named(state, size_type).await?,
        None,
    ))
}
