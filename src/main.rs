//! `usuarios` binary: reads configuration, seeds the store, serves until
//! SIGTERM or Ctrl-C.
//!
//! ```text
//! RUST_LOG=debug PORT=5000 cargo run
//! curl localhost:5000/api/usuarios
//! curl -X POST localhost:5000/api/usuarios -H 'content-type: application/json' -d '{"nombre":"Eva"}'
//! ```

use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use usuarios::{Config, Server, SharedStore, UserStore, app};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        eprintln!("tracing init failed: {e}");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(app = %config.app_name, environment = %config.environment, "starting");
    info!(db_server = %config.db_host, "database server");
    if !config.static_dir.is_dir() {
        warn!(dir = %config.static_dir.display(), "static directory not found, serving routes only");
    }

    let store = SharedStore::new(UserStore::seeded());
    let router = app::router(&config, store);

    match Server::bind(config.addr()).serve(router).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
