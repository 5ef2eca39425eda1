use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub reset_token_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        let app_url = env::var("APP_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));
        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        Ok(Self {
            database_url,
            host,
            port,
            app_url,
            jwt_secret,
            jwt_ttl_hours: parse_or("JWT_TTL_HOURS", 24),
            public_dir,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 2 * 1024 * 1024),
            reset_token_ttl_minutes: parse_or("RESET_TOKEN_TTL_MINUTES", 60),
        })
    }

    /// Config used by tests and tooling that never touch the network.
    pub fn for_tests(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".into(),
            port: 0,
            app_url: "http://localhost".into(),
            jwt_secret: "test-secret".into(),
            jwt_ttl_hours: 1,
            public_dir: env::temp_dir().join("wms-admin-api-public"),
            max_upload_bytes: 2 * 1024 * 1024,
            reset_token_ttl_minutes: 60,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
