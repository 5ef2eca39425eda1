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
        categories::{ActiveModel, Column, Entity as Categories},
        mappings::{Column as MapCol, Entity as Mappings},
        products::{Column as ProdCol, Entity as Products},
        size_types::{Column as SizeTypeCol, Entity as SizeTypes},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, RecordStatus},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{clean_optional, ensure_unique, ensure_unlinked, paginate},
    state::AppState,
    upload::{self, ImageUpload},
};

const RESOURCE: &str = "categories";

pub async fn list_categories(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<Category>>> {
    let mut finder = Categories::find();
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
    let data = items.into_iter().map(Category::from).collect();
    Ok(ApiResponse::paginated("Categories", data, meta))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", category.into(), None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNamedRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    ensure_unique::<Categories, _>(&state.orm, Column::Name, Column::Id, "name", &name, None)
        .await?;

    let category = ActiveModel {
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
        "category_create",
        RESOURCE,
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::success("Category created", category.into(), None))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateNamedRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        ensure_unique::<Categories, _>(
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
    let category = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "category_update",
        RESOURCE,
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::success("Category updated", category.into(), None))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mappings = Mappings::find()
        .filter(MapCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(mappings, "category", "mappings")?;
    let size_types = SizeTypes::find()
        .filter(SizeTypeCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(size_types, "category", "size types")?;
    let products = Products::find()
        .filter(ProdCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(products, "category", "products")?;

    Categories::delete_by_id(id).exec(&state.orm).await?;
    if let Some(image) = &category.image {
        upload::remove_image(&state.config.public_dir, image).await;
    }

    audit::record(
        &state.pool,
        user,
        "category_delete",
        RESOURCE,
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Category deleted"))
}

pub async fn set_category_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let category = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "category_status",
        RESOURCE,
        serde_json::json!({ "category_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Category set to {}", status.as_str()),
        category.into(),
        None,
    ))
}

pub async fn upload_category_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    image: ImageUpload,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let existing = Categories::find_by_id(id)
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
    let category = match active.update(&state.orm).await {
        Ok(category) => category,
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
        "category_image",
        RESOURCE,
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Category image uploaded", category.into(), None))
}
