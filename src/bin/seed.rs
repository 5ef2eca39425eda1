use uuid::Uuid;
use wms_admin_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    services::{auth_service::hash_password, color_service::resolve_color},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(&config.database_url).await?;

    let email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "superadmin@example.com".into());
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "password123".into());
    let admin_id = ensure_user(&pool, "Super Admin", &email, &password, "SuperAdmin").await?;
    ensure_user(&pool, "Warehouse Staff", "staff@example.com", "password123", "Staff").await?;

    seed_named(&pool, "brands", &["Nusantara Wear", "Ferris Outdoor", "Urban Step"]).await?;
    seed_named(&pool, "categories", &["Apparel", "Footwear"]).await?;
    seed_named(&pool, "subcategories", &["T-Shirt", "Jacket", "Sneakers"]).await?;
    seed_named(&pool, "zones", &["Zone A", "Zone B"]).await?;
    seed_named(&pool, "racks", &["Rack 01", "Rack 02", "Rack 03"]).await?;
    seed_named(&pool, "genders", &["Men", "Women", "Unisex"]).await?;
    seed_colors(
        &pool,
        &[("Black", "#000000"), ("White", "#FFFFFF"), ("Navy", "#000080")],
    )
    .await?;

    println!("Seed completed. Super admin ID: {admin_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) =
                sqlx::query_as("SELECT id FROM users WHERE lower(email) = lower($1)")
                    .bind(email)
                    .fetch_one(pool)
                    .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

/// Master-data tables whose rows need nothing beyond a name.
async fn seed_named(pool: &sqlx::PgPool, table: &str, names: &[&str]) -> anyhow::Result<()> {
    let sql = format!("INSERT INTO {table} (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING");
    for name in names {
        sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(*name)
            .execute(pool)
            .await?;
    }
    println!("Seeded {table}");
    Ok(())
}

async fn seed_colors(pool: &sqlx::PgPool, colors: &[(&str, &str)]) -> anyhow::Result<()> {
    for (name, hex) in colors {
        let (hex_code, rgb) =
            resolve_color(Some(*hex), None).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO colors (id, name, hex_code, rgb)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(*name)
        .bind(hex_code)
        .bind(rgb)
        .execute(pool)
        .await?;
    }
    println!("Seeded colors");
    Ok(())
}
