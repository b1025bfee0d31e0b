use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `9090`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). The single
    /// try-on route blocks on the remote model, which can take tens of
    /// seconds.
    pub request_timeout_secs: u64,
    /// Directory of uploaded person images (default: `uploads`).
    pub uploads_dir: PathBuf,
    /// Directory of the garment catalog (default: `garments`).
    pub garments_dir: PathBuf,
    /// Directory where result images are written (default: `results`).
    pub results_dir: PathBuf,
    /// Concurrent try-on workers per batch (default: `3`).
    pub max_workers: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `9090`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                   |
    /// | `UPLOADS_DIR`          | `uploads`               |
    /// | `GARMENTS_DIR`         | `garments`              |
    /// | `RESULTS_DIR`          | `results`               |
    /// | `MAX_WORKERS`          | `3`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "9090".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let uploads_dir = PathBuf::from(std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into()));
        let garments_dir =
            PathBuf::from(std::env::var("GARMENTS_DIR").unwrap_or_else(|_| "garments".into()));
        let results_dir =
            PathBuf::from(std::env::var("RESULTS_DIR").unwrap_or_else(|_| "results".into()));

        let max_workers: usize = std::env::var("MAX_WORKERS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("MAX_WORKERS must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            uploads_dir,
            garments_dir,
            results_dir,
            max_workers,
        }
    }
}
