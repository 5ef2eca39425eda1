//! Query helpers shared by the CRUD services.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Choice, RecordStatus},
    response::Meta,
    routes::params::Pagination,
};

/// Runs `finder` as one page and counts the full result set.
pub async fn paginate<E, C>(
    db: &C,
    finder: Select<E>,
    pagination: Pagination,
) -> Result<(Vec<E::Model>, Meta), DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let (page, per_page, offset) = pagination.normalize();
    let total = finder.clone().count(db).await? as i64;
    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(db)
        .await?;
    Ok((items, Meta::new(page, per_page, total)))
}

/// Case-insensitive check that `value` is already used in `name_col`, optionally
/// ignoring the row being updated.
pub async fn value_taken<E, C>(
    db: &C,
    name_col: E::Column,
    id_col: E::Column,
    value: &str,
    except: Option<Uuid>,
) -> Result<bool, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let mut finder = E::find()
        .filter(Expr::expr(Func::lower(Expr::col(name_col))).eq(value.trim().to_lowercase()));
    if let Some(id) = except {
        finder = finder.filter(id_col.ne(id));
    }
    Ok(finder.count(db).await? > 0)
}

/// Rejects `value` with a 422 on `field` when another row already uses it.
pub async fn ensure_unique<E, C>(
    db: &C,
    name_col: E::Column,
    id_col: E::Column,
    field: &str,
    value: &str,
    except: Option<Uuid>,
) -> AppResult<()>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    if value_taken::<E, C>(db, name_col, id_col, value, except).await? {
        return Err(AppError::field(
            field,
            format!("The {} has already been taken.", field.replace('_', " ")),
        ));
    }
    Ok(())
}

/// Foreign key guard: the referenced row must exist.
pub async fn ensure_exists<E, C>(db: &C, id_col: E::Column, id: Uuid, field: &str) -> AppResult<()>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let found = E::find().filter(id_col.eq(id)).count(db).await?;
    if found == 0 {
        return Err(AppError::field(
            field,
            format!("The selected {} is invalid.", field.replace('_', " ")),
        ));
    }
    Ok(())
}

/// Reference guard for newly chosen parents: the row must exist and be Available.
pub async fn ensure_available<E, C>(
    db: &C,
    id_col: E::Column,
    status_col: E::Column,
    id: Uuid,
    field: &str,
) -> AppResult<()>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    ensure_exists::<E, C>(db, id_col, id, field).await?;
    let available = E::find()
        .filter(id_col.eq(id))
        .filter(status_col.eq(RecordStatus::Available))
        .count(db)
        .await?;
    if available == 0 {
        return Err(AppError::field(
            field,
            format!("The selected {} is unavailable.", field.replace('_', " ")),
        ));
    }
    Ok(())
}

/// Delete guard: fails when `linked` child rows still reference the parent.
pub fn ensure_unlinked(linked: u64, what: &str, children: &str) -> AppResult<()> {
    if linked > 0 {
        return Err(AppError::field(
            "record",
            format!("Cannot delete this {what}: it is still used by {linked} {children}."),
        ));
    }
    Ok(())
}

/// Edit guard: a pair row keeps its keys while `linked` children still use them.
pub fn ensure_pair_unused(linked: u64, what: &str, children: &str) -> AppResult<()> {
    if linked > 0 {
        return Err(AppError::field(
            "record",
            format!("Cannot change this {what}: it is still used by {linked} {children}."),
        ));
    }
    Ok(())
}

/// Available rows as `{id, name}` pairs, sorted by name.
pub async fn choices<E, C>(
    db: &C,
    id_col: E::Column,
    name_col: E::Column,
    status_col: E::Column,
) -> Result<Vec<Choice>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    E::find()
        .select_only()
        .column_as(id_col, "id")
        .column_as(name_col, "name")
        .filter(status_col.eq(RecordStatus::Available))
        .order_by_asc(name_col)
        .into_model::<Choice>()
        .all(db)
        .await
}

/// Trims optional free text and turns blanks into `None`.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlinked_passes_only_without_children() {
        assert!(ensure_unlinked(0, "brand", "products").is_ok());
        match ensure_unlinked(3, "brand", "products") {
            Err(AppError::Validation(fields)) => {
                assert!(fields["record"][0].contains("3 products"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn used_pairs_cannot_change() {
        assert!(ensure_pair_unused(0, "mapping", "products").is_ok());
        match ensure_pair_unused(2, "location", "products") {
            Err(AppError::Validation(fields)) => {
                assert_eq!(
                    fields["record"][0],
                    "Cannot change this location: it is still used by 2 products."
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(clean_optional(Some("  ".into())), None);
        assert_eq!(clean_optional(Some(" x ".into())), Some("x".into()));
        assert_eq!(clean_optional(None), None);
    }
}
