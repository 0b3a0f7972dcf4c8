//! Server settings read from the environment.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Where to listen, which file to persist to, and what to serve as the UI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    bind_addr: SocketAddr,
    data_file: PathBuf,
    static_dir: PathBuf,
    pretty_json: bool,
}

impl AppConfig {
    /// Read `CONTEST_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_string("CONTEST_BIND_ADDR", "0.0.0.0:5000")
            .parse::<SocketAddr>()
            .context("CONTEST_BIND_ADDR must be valid host:port")?;

        let pretty_json = match env_string("CONTEST_PRETTY_JSON", "true")
            .to_ascii_lowercase()
            .as_str()
        {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => {
                return Err(anyhow::anyhow!(
                    "CONTEST_PRETTY_JSON must be true|false, got {other}"
                ));
            }
        };

        Ok(Self {
            bind_addr,
            data_file: PathBuf::from(env_string("CONTEST_DATA_FILE", "data.json")),
            static_dir: PathBuf::from(env_string("CONTEST_STATIC_DIR", "static")),
            pretty_json,
        })
    }

    /// Loopback config persisting to `data_file`. Static files come from a
    /// `<data_file>.static` sibling directory, which need not exist, so the
    /// data file itself is never served.
    pub fn for_testing(data_file: PathBuf) -> Self {
        let static_dir = data_file.with_extension("static");
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_file,
            static_dir,
            pretty_json: true,
        }
    }

    /// Address the listener binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Backing document path.
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Directory served for everything outside `/api`.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Whether the backing file is indented.
    pub fn pretty_json(&self) -> bool {
        self.pretty_json
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
