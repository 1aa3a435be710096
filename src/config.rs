//! Application configuration loaded from the environment.
//!
//! All externally supplied settings (database path, JWT secret, bind
//! address) live here. Relative database paths are resolved against the
//! crate manifest directory so running from the repo root doesn't create a
//! stray empty database in a different working directory.

use dotenv::dotenv;
use std::env;
use std::path::Path;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub jwt_secret: String,
    pub bind_addr: String,
}

impl Config {
    /// Read configuration from the environment, with dev-friendly defaults.
    pub fn from_env() -> Self {
        let database_path = resolve_data_path(env::var("DATABASE_PATH").ok(), "roster.db");

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let bind_addr = format!("{}:{}", host, port);

        Self {
            database_path,
            jwt_secret,
            bind_addr,
        }
    }
}

/// Load `.env` files from the usual locations.
pub fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the manifest dir .env (common when running with --manifest-path)
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}

/// Resolve a data file path, defaulting relative paths to the manifest dir.
fn resolve_data_path(configured: Option<String>, default_name: &str) -> String {
    let p = configured.unwrap_or_else(|| default_name.to_string());
    let path = Path::new(&p);
    if path.is_absolute() {
        return p;
    }

    let base = Path::new(env!("CARGO_MANIFEST_DIR"));
    base.join(path).to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_untouched() {
        let resolved = resolve_data_path(Some("/tmp/roster.db".to_string()), "roster.db");
        assert_eq!(resolved, "/tmp/roster.db");
    }

    #[test]
    fn test_relative_path_resolves_to_manifest_dir() {
        let resolved = resolve_data_path(None, "roster.db");
        assert!(resolved.ends_with("roster.db"));
        assert!(Path::new(&resolved).is_absolute());
    }
}
