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
        catalog::{CreateMappingRequest, UpdateMappingRequest},
        forms::{EditForm, MappingFormOptions},
    },
    entity::{
        categories::{Column as CatCol, Entity as Categories},
        mappings::{self, ActiveModel, Column, Entity as Mappings, Relation},
        products::{Column as ProdCol, Entity as Products},
        subcategories::{Column as SubCol, Entity as Subcategories},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Mapping, RecordStatus},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{choices, ensure_available, ensure_pair_unused, ensure_unlinked, paginate},
    state::AppState,
};

const RESOURCE: &str = "mappings";

/// Attaches category and subcategory names to a batch of mappings.
pub async fn with_names<C: ConnectionTrait>(
    db: &C,
    rows: Vec<mappings::Model>,
) -> AppResult<Vec<Mapping>> {
    let category_ids: Vec<Uuid> = rows.iter().map(|m| m.category_id).collect();
    let subcategory_ids: Vec<Uuid> = rows.iter().map(|m| m.subcategory_id).collect();

    let categories: HashMap<Uuid, String> = Categories::find()
        .filter(CatCol::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let subcategories: HashMap<Uuid, String> = Subcategories::find()
        .filter(SubCol::Id.is_in(subcategory_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let category_name = categories.get(&row.category_id).cloned();
            let subcategory_name = subcategories.get(&row.subcategory_id).cloned();
            Mapping {
                category_name,
                subcategory_name,
                ..Mapping::from(row)
            }
        })
        .collect())
}

async fn find_mapping(state: &AppState, id: Uuid) -> AppResult<mappings::Model> {
    Mappings::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_pair_free(
    state: &AppState,
    category_id: Uuid,
    subcategory_id: Uuid,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = Mappings::find()
        .filter(Column::CategoryId.eq(category_id))
        .filter(Column::SubcategoryId.eq(subcategory_id));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(&state.orm).await? > 0 {
        return Err(AppError::field(
            "subcategory_id",
            "This category and subcategory are already mapped.",
        ));
    }
    Ok(())
}

async fn form_options(state: &AppState) -> AppResult<MappingFormOptions> {
    Ok(MappingFormOptions {
        categories: choices::<Categories, _>(&state.orm, CatCol::Id, CatCol::Name, CatCol::Status)
            .await?,
        subcategories: choices::<Subcategories, _>(
            &state.orm,
            SubCol::Id,
            SubCol::Name,
            SubCol::Status,
        )
        .await?,
    })
}

pub async fn list_mappings(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<Mapping>>> {
    let mut finder = Mappings::find();
    if let Some(pattern) = query.search() {
        finder = finder
            .join(JoinType::LeftJoin, Relation::Categories.def())
            .join(JoinType::LeftJoin, Relation::Subcategories.def())
            .filter(
                Condition::any()
                    .add(Expr::col((Categories, CatCol::Name)).ilike(pattern.clone()))
                    .add(Expr::col((Subcategories, SubCol::Name)).ilike(pattern)),
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
    Ok(ApiResponse::paginated("Mappings", data, meta))
}

pub async fn mapping_form(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<MappingFormOptions>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success("Mapping form", form_options(state).await?, None))
}

pub async fn get_mapping(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Mapping>> {
    let mapping = find_mapping(state, id).await?;
    let mut named = with_names(&state.orm, vec![mapping]).await?;
    let mapping = named.pop().ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Mapping", mapping, None))
}

pub async fn edit_mapping(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<EditForm<Mapping, MappingFormOptions>>> {
    ensure_admin(user)?;
    let mapping = find_mapping(state, id).await?;
    let record = with_names(&state.orm, vec![mapping])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    let options = form_options(state).await?;
    Ok(ApiResponse::success(
        "Mapping form",
        EditForm { record, options },
        None,
    ))
}

pub async fn create_mapping(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMappingRequest,
) -> AppResult<ApiResponse<Mapping>> {
    ensure_admin(user)?;
    ensure_available::<Categories, _>(
        &state.orm,
        CatCol::Id,
        CatCol::Status,
        payload.category_id,
        "category_id",
    )
    .await?;
    ensure_available::<Subcategories, _>(
        &state.orm,
        SubCol::Id,
        SubCol::Status,
        payload.subcategory_id,
        "subcategory_id",
    )
    .await?;
    ensure_pair_free(state, payload.category_id, payload.subcategory_id, None).await?;

    let mapping = ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        subcategory_id: Set(payload.subcategory_id),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user,
        "mapping_create",
        RESOURCE,
        serde_json::json!({
            "mapping_id": mapping.id,
            "category_id": mapping.category_id,
            "subcategory_id": mapping.subcategory_id,
        }),
    )
    .await;

    let mapping = with_names(&state.orm, vec![mapping])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Mapping created", mapping, None))
}

pub async fn update_mapping(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMappingRequest,
) -> AppResult<ApiResponse<Mapping>> {
    ensure_admin(user)?;
    let existing = find_mapping(state, id).await?;

    let category_id = payload.category_id.unwrap_or(existing.category_id);
    let subcategory_id = payload.subcategory_id.unwrap_or(existing.subcategory_id);
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
    if subcategory_id != existing.subcategory_id {
        ensure_available::<Subcategories, _>(
            &state.orm,
            SubCol::Id,
            SubCol::Status,
            subcategory_id,
            "subcategory_id",
        )
        .await?;
    }
    if (category_id, subcategory_id) != (existing.category_id, existing.subcategory_id) {
        let products = Products::find()
            .filter(ProdCol::CategoryId.eq(existing.category_id))
            .filter(ProdCol::SubcategoryId.eq(existing.subcategory_id))
            .count(&state.orm)
            .await?;
        ensure_pair_unused(products, "mapping", "products")?;
    }
    ensure_pair_free(state, category_id, subcategory_id, Some(id)).await?;

    let mut active: ActiveModel = existing.into();
    active.category_id = Set(category_id);
    active.subcategory_id = Set(subcategory_id);
    active.updated_at = Set(Utc::now().into());
    let mapping = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "mapping_update",
        RESOURCE,
        serde_json::json!({ "mapping_id": mapping.id }),
    )
    .await;

    let mapping = with_names(&state.orm, vec![mapping])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Mapping updated", mapping, None))
}

pub async fn delete_mapping(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let mapping = find_mapping(state, id).await?;

    let products = Products::find()
        .filter(ProdCol::CategoryId.eq(mapping.category_id))
        .filter(ProdCol::SubcategoryId.eq(mapping.subcategory_id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(products, "mapping", "products")?;

    Mappings::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "mapping_delete",
        RESOURCE,
        serde_json::json!({ "mapping_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Mapping deleted"))
}

pub async fn set_mapping_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Mapping>> {
    ensure_admin(user)?;
    let existing = find_mapping(state, id).await?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let mapping = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "mapping_status",
        RESOURCE,
        serde_json::json!({ "mapping_id": id, "status": status }),
    )
    .await;

    let mapping = with_names(&state.orm, vec![mapping])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        format!("Mapping set to {}", status.as_str()),
        mapping,
        None,
    ))
}
