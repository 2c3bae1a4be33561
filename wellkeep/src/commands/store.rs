//! `wellkeep store`: timestamped entries in a local JSON store file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;

use wellkeep_core::{clear_session, FileStore, SecureStorage, SecurityPolicy};

use super::{info_msg, success_msg};
use crate::cli::{StoreAction, StoreCommand};

const STORE_DIR: &str = "wellkeep";
const STORE_FILE: &str = "store.json";

pub fn run_store(cmd: &StoreCommand, policy: &SecurityPolicy, quiet: bool) -> Result<bool> {
    let path = match &cmd.path {
        Some(path) => path.clone(),
        None => default_store_path()?,
    };
    debug!("Using store file: {}", path.display());
    let mut storage = SecureStorage::from_policy(FileStore::new(&path), &policy.storage);

    match &cmd.action {
        StoreAction::Set { key, value } => {
            storage
                .set(key, &parse_value(value))
                .with_context(|| format!("Failed to write '{}' to {}", key, path.display()))?;
            info!("Stored entry '{}'.", key);
            if !quiet {
                success_msg(format!("Stored '{}'.", key));
            }
            Ok(true)
        }
        StoreAction::Get { key } => match storage.get::<Value>(key)? {
            Some(value) => {
                println!("{}", serde_json::to_string_pretty(&value)?);
                Ok(true)
            }
            None => {
                if !quiet {
                    info_msg(format!("No entry for '{}'.", key));
                }
                Ok(false)
            }
        },
        StoreAction::Remove { key } => {
            storage.remove(key)?;
            Ok(true)
        }
        StoreAction::Clear => {
            storage.clear()?;
            Ok(true)
        }
        StoreAction::ClearSession => {
            clear_session(&mut storage)?;
            Ok(true)
        }
    }
}

/// `<data dir>/wellkeep/store.json`.
pub fn default_store_path() -> Result<PathBuf> {
    let dir = dirs::data_local_dir().context("Could not determine the user data directory; pass --path")?;
    Ok(dir.join(STORE_DIR).join(STORE_FILE))
}

/// JSON when `raw` parses as JSON, otherwise the raw string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
