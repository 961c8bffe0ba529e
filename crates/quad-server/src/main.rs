//! quadd — the Quad campus portal server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, seeds the default lecturer and vendor lists into
//! an empty database, and serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! The doctor and admin credentials are configured as argon2 PHC strings. To
//! generate one for `doctor_password_hash` / `admin_password_hash`:
//!
//! ```
//! cargo run -p quad-server --bin quadd -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use quad_api::AppState;
use quad_core::manager::{AuthConfig, StaffCredentials};
use quad_store_sqlite::SqliteStore;
use rand_core::OsRng;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Deserialised from config.toml, with `QUAD_`-prefixed environment
/// variables layered on top.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host: String,
  #[serde(default = "default_port")]
  port: u16,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,

  doctor_email:         String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  doctor_password_hash: String,
  #[serde(default = "default_doctor_name")]
  doctor_name:          String,

  admin_email:         String,
  /// argon2 PHC string.
  admin_password_hash: String,
  #[serde(default = "default_admin_name")]
  admin_name:          String,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 4800 }
fn default_store_path() -> PathBuf { PathBuf::from("quad.db") }
fn default_doctor_name() -> String { "Clinic Doctor".to_string() }
fn default_admin_name() -> String { "Portal Admin".to_string() }

#[derive(Parser)]
#[command(author, version, about = "Quad campus portal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password_from_stdin()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("QUAD"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store and seed reference data into an empty database.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  store
    .seed_reference_data()
    .await
    .context("failed to seed reference data")?;

  let auth = AuthConfig {
    doctor: StaffCredentials {
      email:         server_cfg.doctor_email.clone(),
      password_hash: server_cfg.doctor_password_hash.clone(),
      display_name:  server_cfg.doctor_name.clone(),
    },
    admin:  StaffCredentials {
      email:         server_cfg.admin_email.clone(),
      password_hash: server_cfg.admin_password_hash.clone(),
      display_name:  server_cfg.admin_name.clone(),
    },
  };

  let state = AppState::new(Arc::new(store), auth);
  let app = quad_api::api_router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
