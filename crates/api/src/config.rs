use std::path::PathBuf;
use std::time::Duration;

use crate::auth::jwt::JwtConfig;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Deployment environment. Unknown values are treated as production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Test,
    Production,
}

impl AppEnv {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => AppEnv::Development,
            "test" => AppEnv::Test,
            _ => AppEnv::Production,
        }
    }

    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Which image storage backend to construct at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendKind {
    Local,
    S3,
}

/// S3-compatible object storage settings.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, R2, ...).
    pub endpoint: Option<String>,
    /// Public base URL objects are served from, if not the bucket URL.
    pub public_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Image storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    /// Directory for the local backend.
    pub upload_dir: PathBuf,
    /// URL prefix the local backend is served under.
    pub upload_public_path: String,
    pub s3: Option<S3Config>,
}

impl StorageConfig {
    /// | Env Var                                    | Default    |
    /// |--------------------------------------------|------------|
    /// | `STORAGE_BACKEND`                          | `local`    |
    /// | `UPLOAD_DIR`                               | `uploads`  |
    /// | `UPLOAD_PUBLIC_PATH`                       | `/uploads` |
    /// | `S3_BUCKET`                                | required for `s3` |
    /// | `S3_REGION`                                | `us-east-1` |
    /// | `S3_ENDPOINT`, `S3_PUBLIC_URL`             | none       |
    /// | `S3_ACCESS_KEY_ID`, `S3_SECRET_ACCESS_KEY` | default AWS credential chain |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend or when `s3` is selected without `S3_BUCKET`.
    pub fn from_env() -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => StorageBackendKind::Local,
            "s3" => StorageBackendKind::S3,
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let s3 = (backend == StorageBackendKind::S3).then(|| S3Config {
            bucket: std::env::var("S3_BUCKET").expect("S3_BUCKET must be set when STORAGE_BACKEND=s3"),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            endpoint: non_empty_var("S3_ENDPOINT"),
            public_url: non_empty_var("S3_PUBLIC_URL"),
            access_key_id: non_empty_var("S3_ACCESS_KEY_ID"),
            secret_access_key: non_empty_var("S3_SECRET_ACCESS_KEY"),
        });

        let mut upload_public_path =
            std::env::var("UPLOAD_PUBLIC_PATH").unwrap_or_else(|_| "/uploads".into());
        if !upload_public_path.starts_with('/') {
            upload_public_path.insert(0, '/');
        }

        Self {
            backend,
            upload_dir: PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into())),
            upload_public_path: upload_public_path.trim_end_matches('/').to_string(),
            s3,
        }
    }
}

// ---------------------------------------------------------------------------
// Admin bootstrap
// ---------------------------------------------------------------------------

/// Credentials for the platform admin account ensured at startup.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminBootstrap {
    /// `None` unless both `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            email: non_empty_var("ADMIN_EMAIL")?,
            password: non_empty_var("ADMIN_PASSWORD")?,
        })
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub app_env: AppEnv,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deadline for reads that gate public-site availability.
    pub read_guard_timeout: Duration,
    /// Base URL of the public frontend, used for links in emails.
    pub public_base_url: String,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub admin_bootstrap: Option<AdminBootstrap>,
    /// Key rate limits on `x-forwarded-for` / `x-real-ip` instead of the
    /// socket address. Only safe behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
    /// Skip the admin-panel entitlement check entirely. Only ever `true` for
    /// builds with the `dev-auth-bypass` feature outside production.
    pub bypass_admin_auth: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                  |
    /// |----------------------------------|--------------------------|
    /// | `HOST`                           | `0.0.0.0`                |
    /// | `PORT`                           | `3000`                   |
    /// | `APP_ENV` (else `NODE_ENV`)      | `production`             |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                     |
    /// | `READ_GUARD_TIMEOUT_MS`          | `3000`                   |
    /// | `PUBLIC_BASE_URL`                | `http://localhost:5173`  |
    /// | `TRUST_PROXY_HEADERS`            | `false`                  |
    /// | `DANGEROUSLY_BYPASS_ADMIN_AUTH`  | `false`                  |
    ///
    /// See [`JwtConfig::from_env`], [`StorageConfig::from_env`] and
    /// [`AdminBootstrap::from_env`] for the remaining variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let app_env = AppEnv::parse(
            &std::env::var("APP_ENV")
                .or_else(|_| std::env::var("NODE_ENV"))
                .unwrap_or_else(|_| "production".into()),
        );

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let read_guard_timeout_ms: u64 = std::env::var("READ_GUARD_TIMEOUT_MS")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("READ_GUARD_TIMEOUT_MS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        Self {
            host,
            port,
            app_env,
            cors_origins,
            request_timeout_secs,
            read_guard_timeout: Duration::from_millis(read_guard_timeout_ms),
            public_base_url,
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
            admin_bootstrap: AdminBootstrap::from_env(),
            trust_proxy_headers: env_flag("TRUST_PROXY_HEADERS"),
            bypass_admin_auth: resolve_auth_bypass(app_env, env_flag("DANGEROUSLY_BYPASS_ADMIN_AUTH")),
        }
    }
}

/// Decide whether the admin-panel bypass is active.
#[cfg(feature = "dev-auth-bypass")]
pub fn resolve_auth_bypass(app_env: AppEnv, requested: bool) -> bool {
    if !requested {
        return false;
    }
    if app_env.is_production() {
        tracing::error!("DANGEROUSLY_BYPASS_ADMIN_AUTH ignored in production");
        return false;
    }
    tracing::warn!(?app_env, "Admin-panel authorization is BYPASSED for this process");
    true
}

/// Decide whether the admin-panel bypass is active.
#[cfg(not(feature = "dev-auth-bypass"))]
pub fn resolve_auth_bypass(_app_env: AppEnv, requested: bool) -> bool {
    if requested {
        tracing::warn!(
            "DANGEROUSLY_BYPASS_ADMIN_AUTH ignored: built without the dev-auth-bypass feature"
        );
    }
    false
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Ok("1" | "true" | "yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_defaults_to_production() {
        assert_eq!(AppEnv::parse("development"), AppEnv::Development);
        assert_eq!(AppEnv::parse("TEST"), AppEnv::Test);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Production);
        assert_eq!(AppEnv::parse(""), AppEnv::Production);
    }

    #[test]
    fn bypass_is_never_active_in_production() {
        assert!(!resolve_auth_bypass(AppEnv::Production, true));
        assert!(!resolve_auth_bypass(AppEnv::Development, false));
    }

    #[cfg(not(feature = "dev-auth-bypass"))]
    #[test]
    fn bypass_requires_feature() {
        assert!(!resolve_auth_bypass(AppEnv::Development, true));
    }

    #[cfg(feature = "dev-auth-bypass")]
    #[test]
    fn bypass_honored_outside_production_with_feature() {
        assert!(resolve_auth_bypass(AppEnv::Development, true));
    }

    #[test]
    fn admin_bootstrap_debug_redacts_password() {
        let admin = AdminBootstrap {
            email: "root@example.com".into(),
            password: "hunter22".into(),
        };
        let printed = format!("{admin:?}");
        assert!(printed.contains("root@example.com"));
        assert!(!printed.contains("hunter22"));
    }
}
