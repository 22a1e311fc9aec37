//! Application shell for Notizia: owns the record store and serves the
//! request/response bridge over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use notizia_core::store::RecordStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5232;

/// File name of the database inside the per-user data directory.
const STORE_FILE: &str = "notizia.db";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `NOTIZIA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// Database file; defaults to [`default_store_path`].
  #[serde(default)]
  pub store_path: Option<PathBuf>,
}

impl ServerConfig {
  /// Layer the optional config file under the environment, over defaults.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("NOTIZIA"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The configured store path with `~` expanded, or the per-user default.
  pub fn resolved_store_path(&self) -> anyhow::Result<PathBuf> {
    match &self.store_path {
      Some(p) => Ok(expand_tilde(p)),
      None => default_store_path()
        .context("no per-user data directory; set store_path in the config"),
    }
  }
}

/// `<data dir>/notizia/notizia.db`, e.g. `~/.local/share/notizia/notizia.db`
/// on Linux.
pub fn default_store_path() -> Option<PathBuf> {
  dirs::data_dir().map(|p| p.join("notizia").join(STORE_FILE))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full HTTP application: the bridge under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: RecordStore + 'static,
{
  Router::new()
    .nest("/api", notizia_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use notizia_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  #[test]
  fn missing_config_file_falls_back_to_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/notizia/config.toml")).unwrap();
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, DEFAULT_PORT);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Some(home) = dirs::home_dir() else { return };
    assert_eq!(expand_tilde(Path::new("~/x/n.db")), home.join("x/n.db"));
    assert_eq!(expand_tilde(Path::new("/abs/n.db")), PathBuf::from("/abs/n.db"));
  }

  #[test]
  fn explicit_store_path_wins_over_default() {
    let cfg = ServerConfig {
      host:       DEFAULT_HOST.into(),
      port:       DEFAULT_PORT,
      store_path: Some(PathBuf::from("/tmp/elsewhere.db")),
    };
    assert_eq!(cfg.resolved_store_path().unwrap(), PathBuf::from("/tmp/elsewhere.db"));
    assert_eq!(cfg.address(), "127.0.0.1:5232");
  }

  #[tokio::test]
  async fn bridge_is_mounted_under_api() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());

    let resp = app(store.clone())
      .oneshot(Request::get("/api/clients").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let clients: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(clients, serde_json::json!([]));

    let resp = app(store)
      .oneshot(Request::get("/clients").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
