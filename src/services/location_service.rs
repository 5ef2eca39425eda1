use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::{
        forms::{EditForm, LocationFormOptions},
        warehouse::{CreateLocationRequest, UpdateLocationRequest},
    },
    entity::{
        locations::{self, ActiveModel, Column, Entity as Locations, Relation},
        products::{Column as ProdCol, Entity as Products},
        racks::{Column as RackCol, Entity as Racks},
        zones::{Column as ZoneCol, Entity as Zones},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Location, RecordStatus},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{
        choices, clean_optional, ensure_available, ensure_pair_unused, ensure_unlinked, paginate,
    },
    state::AppState,
};

const RESOURCE: &str = "locations";

/// Racks a single zone can hold.
pub const MAX_RACKS_PER_ZONE: u64 = 10;

pub fn ensure_zone_capacity(racks_in_zone: u64) -> AppResult<()> {
    if racks_in_zone >= MAX_RACKS_PER_ZONE {
        return Err(AppError::field(
            "zone_id",
            format!("This zone already holds the maximum of {MAX_RACKS_PER_ZONE} racks."),
        ));
    }
    Ok(())
}

pub async fn with_names<C: ConnectionTrait>(
    db: &C,
    rows: Vec<locations::Model>,
) -> AppResult<Vec<Location>> {
    let zone_ids: Vec<Uuid> = rows.iter().map(|l| l.zone_id).collect();
    let rack_ids: Vec<Uuid> = rows.iter().map(|l| l.rack_id).collect();

    let zones: HashMap<Uuid, String> = Zones::find()
        .filter(ZoneCol::Id.is_in(zone_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|z| (z.id, z.name))
        .collect();
    let racks: HashMap<Uuid, String> = Racks::find()
        .filter(RackCol::Id.is_in(rack_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let zone_name = zones.get(&row.zone_id).cloned();
            let rack_name = racks.get(&row.rack_id).cloned();
            Location {
                zone_name,
                rack_name,
                ..Location::from(row)
            }
        })
        .collect())
}

async fn named(state: &AppState, row: locations::Model) -> AppResult<Location> {
    with_names(&state.orm, vec![row])
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

async fn find_location(state: &AppState, id: Uuid) -> AppResult<locations::Model> {
    Locations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_pair_free<C: ConnectionTrait>(
    db: &C,
    zone_id: Uuid,
    rack_id: Uuid,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = Locations::find()
        .filter(Column::ZoneId.eq(zone_id))
        .filter(Column::RackId.eq(rack_id));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(db).await? > 0 {
        return Err(AppError::field(
            "rack_id",
            "This rack is already placed in the selected zone.",
        ));
    }
    Ok(())
}

/// Locks the zone row and counts the racks it already holds, so two concurrent
/// placements into the same zone cannot both pass the capacity check.
async fn lock_zone_and_check<C: ConnectionTrait>(
    db: &C,
    zone_id: Uuid,
    except: Option<Uuid>,
) -> AppResult<()> {
    let zone = Zones::find_by_id(zone_id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| AppError::field("zone_id", "The selected zone id is invalid."))?;
    if zone.status != RecordStatus::Available {
        return Err(AppError::field("zone_id", "The selected zone id is unavailable."));
    }

    let mut finder = Locations::find().filter(Column::ZoneId.eq(zone_id));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    ensure_zone_capacity(finder.count(db).await?)
}

async fn form_options(state: &AppState) -> AppResult<LocationFormOptions> {
    Ok(LocationFormOptions {
        zones: choices::<Zones, _>(&state.orm, ZoneCol::Id, ZoneCol::Name, ZoneCol::Status).await?,
        racks: choices::<Racks, _>(&state.orm, RackCol::Id, RackCol::Name, RackCol::Status).await?,
    })
}

pub async fn list_locations(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<Location>>> {
    let mut finder = Locations::find();
    if let Some(pattern) = query.search() {
        finder = finder
            .join(JoinType::LeftJoin, Relation::Zones.def())
            .join(JoinType::LeftJoin, Relation::Racks.def())
            .filter(
                Condition::any()
                    .add(Expr::col((Zones, ZoneCol::Name)).ilike(pattern.clone()))
                    .add(Expr::col((Racks, RackCol::Name)).ilike(pattern)),
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
    Ok(ApiResponse::paginated("Locations", data, meta))
}

pub async fn location_form(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<LocationFormOptions>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success("Location form", form_options(state).await?, None))
}

pub async fn get_location(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Location>> {
    let location = find_location(state, id).await?;
    Ok(ApiResponse::success("Location", named(state, location).await?, None))
}

pub async fn edit_location(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<EditForm<Location, LocationFormOptions>>> {
    ensure_admin(user)?;
    let record = named(state, find_location(state, id).await?).await?;
    let options = form_options(state).await?;
    Ok(ApiResponse::success(
        "Location form",
        EditForm { record, options },
        None,
    ))
}

pub async fn create_location(
    state: &AppState,
    user: &AuthUser,
    payload: CreateLocationRequest,
) -> AppResult<ApiResponse<Location>> {
    ensure_admin(user)?;
    payload.validate()?;
    ensure_available::<Racks, _>(
        &state.orm,
        RackCol::Id,
        RackCol::Status,
        payload.rack_id,
        "rack_id",
    )
    .await?;

    let txn = state.orm.begin().await?;
    lock_zone_and_check(&txn, payload.zone_id, None).await?;
    ensure_pair_free(&txn, payload.zone_id, payload.rack_id, None).await?;

    let location = ActiveModel {
        id: Set(Uuid::new_v4()),
        zone_id: Set(payload.zone_id),
        rack_id: Set(payload.rack_id),
        description: Set(clean_optional(payload.description)),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user,
        "location_create",
        RESOURCE,
        serde_json::json!({
            "location_id": location.id,
            "zone_id": location.zone_id,
            "rack_id": location.rack_id,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Location created",
        named(state, location).await?,
        None,
    ))
}

pub async fn update_location(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateLocationRequest,
) -> AppResult<ApiResponse<Location>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = find_location(state, id).await?;

    let zone_id = payload.zone_id.unwrap_or(existing.zone_id);
    let rack_id = payload.rack_id.unwrap_or(existing.rack_id);
    if rack_id != existing.rack_id {
        ensure_available::<Racks, _>(&state.orm, RackCol::Id, RackCol::Status, rack_id, "rack_id")
            .await?;
    }
    if (zone_id, rack_id) != (existing.zone_id, existing.rack_id) {
        let products = Products::find()
            .filter(ProdCol::ZoneId.eq(existing.zone_id))
            .filter(ProdCol::RackId.eq(existing.rack_id))
            .count(&state.orm)
            .await?;
        ensure_pair_unused(products, "location", "products")?;
    }

    let txn = state.orm.begin().await?;
    if zone_id != existing.zone_id {
        lock_zone_and_check(&txn, zone_id, Some(id)).await?;
    }
    ensure_pair_free(&txn, zone_id, rack_id, Some(id)).await?;

    let mut active: ActiveModel = existing.into();
    active.zone_id = Set(zone_id);
    active.rack_id = Set(rack_id);
    if payload.description.is_some() {
        active.description = Set(clean_optional(payload.description));
    }
    active.updated_at = Set(Utc::now().into());
    let location = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user,
        "location_update",
        RESOURCE,
        serde_json::json!({ "location_id": location.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Location updated",
        named(state, location).await?,
        None,
    ))
}

pub async fn delete_location(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let location = find_location(state, id).await?;

    let products = Products::find()
        .filter(ProdCol::ZoneId.eq(location.zone_id))
        .filter(ProdCol::RackId.eq(location.rack_id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(products, "location", "products")?;

    Locations::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "location_delete",
        RESOURCE,
        serde_json::json!({ "location_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Location deleted"))
}

pub async fn set_location_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Location>> {
    ensure_admin(user)?;
    let existing = find_location(state, id).await?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let location = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "location_status",
        RESOURCE,
        serde_json::json!({ "location_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Location set to {}", status.as_str()),
        named(state, location).await?,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_accepts_up_to_ten_racks() {
        assert!(ensure_zone_capacity(0).is_ok());
        assert!(ensure_zone_capacity(MAX_RACKS_PER_ZONE - 1).is_ok());
        match ensure_zone_capacity(MAX_RACKS_PER_ZONE) {
            Err(AppError::Validation(fields)) => {
                assert!(fields["zone_id"][0].contains("maximum of 10"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
