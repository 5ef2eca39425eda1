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
    dto::catalog::{CreateColorRequest, UpdateColorRequest},
    entity::{
        colors::{ActiveModel, Column, Entity as Colors},
        product_variants::{Column as VariantCol, Entity as ProductVariants},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Color, RecordStatus},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::common::{ensure_unique, ensure_unlinked, paginate},
    state::AppState,
};

const RESOURCE: &str = "colors";

/// `#abc` / `abc123` / `#ABC123` -> `#ABC123`.
pub fn normalize_hex(value: &str) -> Option<String> {
    let digits = value.trim().trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", expanded.to_ascii_uppercase()))
}

/// `"12, 34,56"` -> `[12, 34, 56]`.
pub fn parse_rgb(value: &str) -> Option<[u8; 3]> {
    let value = value.trim();
    let value = value
        .strip_prefix("rgb(")
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(value);
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(parts) {
        *slot = part.parse().ok()?;
    }
    Some(channels)
}

pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = normalize_hex(hex)?;
    let mut channels = [0u8; 3];
    for (i, slot) in channels.iter_mut().enumerate() {
        *slot = u8::from_str_radix(&hex[1 + i * 2..3 + i * 2], 16).ok()?;
    }
    Some(channels)
}

pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

pub fn format_rgb(rgb: [u8; 3]) -> String {
    format!("{},{},{}", rgb[0], rgb[1], rgb[2])
}

/// Canonical `(hex_code, rgb)` from whichever of the two was supplied.
pub fn resolve_color(hex: Option<&str>, rgb: Option<&str>) -> AppResult<(String, String)> {
    let hex = hex.map(str::trim).filter(|v| !v.is_empty());
    let rgb = rgb.map(str::trim).filter(|v| !v.is_empty());

    let from_hex = match hex {
        Some(value) => Some(hex_to_rgb(value).ok_or_else(|| {
            AppError::field("hex_code", "The hex code must be a valid #RRGGBB color.")
        })?),
        None => None,
    };
    let from_rgb = match rgb {
        Some(value) => Some(parse_rgb(value).ok_or_else(|| {
            AppError::field("rgb", "The rgb must be three values between 0 and 255.")
        })?),
        None => None,
    };

    let channels = match (from_hex, from_rgb) {
        (Some(a), Some(b)) if a != b => {
            return Err(AppError::field("rgb", "The rgb does not match the hex code."));
        }
        (Some(a), _) | (None, Some(a)) => a,
        (None, None) => {
            return Err(AppError::field(
                "hex_code",
                "The hex code field is required when rgb is not present.",
            ));
        }
    };
    Ok((rgb_to_hex(channels), format_rgb(channels)))
}

async fn ensure_color_unique(
    state: &AppState,
    name: Option<&str>,
    hex: &str,
    rgb: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    if let Some(name) = name {
        ensure_unique::<Colors, _>(&state.orm, Column::Name, Column::Id, "name", name, except)
            .await?;
    }
    ensure_unique::<Colors, _>(&state.orm, Column::HexCode, Column::Id, "hex_code", hex, except)
        .await?;
    ensure_unique::<Colors, _>(&state.orm, Column::Rgb, Column::Id, "rgb", rgb, except).await
}

pub async fn list_colors(state: &AppState, query: ListQuery) -> AppResult<ApiResponse<Vec<Color>>> {
    let mut finder = Colors::find();
    if let Some(pattern) = query.search() {
        finder = finder.filter(
            sea_orm::Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::HexCode).ilike(pattern)),
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
    let data = items.into_iter().map(Color::from).collect();
    Ok(ApiResponse::paginated("Colors", data, meta))
}

pub async fn get_color(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Color>> {
    let color = Colors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Color", color.into(), None))
}

pub async fn create_color(
    state: &AppState,
    user: &AuthUser,
    payload: CreateColorRequest,
) -> AppResult<ApiResponse<Color>> {
    ensure_admin(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    let (hex_code, rgb) = resolve_color(payload.hex_code.as_deref(), payload.rgb.as_deref())?;
    ensure_color_unique(state, Some(&name), &hex_code, &rgb, None).await?;

    let color = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        hex_code: Set(hex_code),
        rgb: Set(rgb),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user,
        "color_create",
        RESOURCE,
        serde_json::json!({ "color_id": color.id, "hex_code": color.hex_code }),
    )
    .await;

    Ok(ApiResponse::success("Color created", color.into(), None))
}

pub async fn update_color(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateColorRequest,
) -> AppResult<ApiResponse<Color>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Colors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    // Only the supplied half is authoritative; the stored other half is re-derived.
    let (hex_code, rgb) = match (payload.hex_code.as_deref(), payload.rgb.as_deref()) {
        (None, None) => (existing.hex_code.clone(), existing.rgb.clone()),
        (hex, rgb) => resolve_color(hex, rgb)?,
    };
    let name = payload.name.map(|n| n.trim().to_string());
    ensure_color_unique(state, name.as_deref(), &hex_code, &rgb, Some(id)).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    active.hex_code = Set(hex_code);
    active.rgb = Set(rgb);
    active.updated_at = Set(Utc::now().into());
    let color = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "color_update",
        RESOURCE,
        serde_json::json!({ "color_id": color.id }),
    )
    .await;

    Ok(ApiResponse::success("Color updated", color.into(), None))
}

pub async fn delete_color(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    Colors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let variants = ProductVariants::find()
        .filter(VariantCol::ColorId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(variants, "color", "product variants")?;

    Colors::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "color_delete",
        RESOURCE,
        serde_json::json!({ "color_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Color deleted"))
}

pub async fn set_color_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<Color>> {
    ensure_admin(user)?;
    let existing = Colors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let color = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "color_status",
        RESOURCE,
        serde_json::json!({ "color_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Color set to {}", status.as_str()),
        color.into(),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_normalized_to_upper_case() {
        assert_eq!(normalize_hex("#ff8800").as_deref(), Some("#FF8800"));
        assert_eq!(normalize_hex("f80").as_deref(), Some("#FF8800"));
        assert_eq!(normalize_hex("#GG0000"), None);
        assert_eq!(normalize_hex("#12345"), None);
    }

    #[test]
    fn rgb_accepts_spaces_and_css_form() {
        assert_eq!(parse_rgb("12, 34,56"), Some([12, 34, 56]));
        assert_eq!(parse_rgb("rgb(0,0,255)"), Some([0, 0, 255]));
        assert_eq!(parse_rgb("256,0,0"), None);
        assert_eq!(parse_rgb("1,2"), None);
    }

    #[test]
    fn missing_half_is_derived() {
        let (hex, rgb) = resolve_color(Some("#00ff7f"), None).unwrap();
        assert_eq!((hex.as_str(), rgb.as_str()), ("#00FF7F", "0,255,127"));

        let (hex, rgb) = resolve_color(None, Some(" 255 , 0 , 0 ")).unwrap();
        assert_eq!((hex.as_str(), rgb.as_str()), ("#FF0000", "255,0,0"));
    }

    #[test]
    fn conflicting_or_missing_values_are_rejected() {
        match resolve_color(Some("#000000"), Some("255,255,255")) {
            Err(AppError::Validation(fields)) => assert!(fields.contains_key("rgb")),
            other => panic!("unexpected {other:?}"),
        }
        match resolve_color(None, Some("  ")) {
            Err(AppError::Validation(fields)) => assert!(fields.contains_key("hex_code")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(resolve_color(Some("#000"), Some("0,0,0")).is_ok());
    }
}
