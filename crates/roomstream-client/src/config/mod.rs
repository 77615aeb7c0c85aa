//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use roomstream_core::error::{Result, RoomStreamError};

pub use schema::{ApiSection, AuthSection, ClientConfig, StreamSection};

pub fn load_from_file(path: &str) -> Result<ClientConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RoomStreamError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| RoomStreamError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
