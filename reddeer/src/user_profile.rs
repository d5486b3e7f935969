//! Optional per-user settings read from `~/.reddeer`.
//!
//! The file holds `key=value` (or `key:value`) lines; `#` and `!` start
//! comment lines. Values are handed out as plain strings; the core reads
//! nothing from it itself.

use crate::errors::RedDeerResult;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const USER_PROFILE_FILE: &str = ".reddeer";
pub const VM_ARGS_KEY: &str = "vmArgs";
pub const PROGRAM_ARGS_KEY: &str = "programArgs";

static GLOBAL_PROFILE: OnceCell<UserProfile> = OnceCell::new();

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    properties: HashMap<String, String>,
}

impl UserProfile {
    /// Profile loaded once from the user's home directory.
    pub fn global() -> &'static UserProfile {
        GLOBAL_PROFILE.get_or_init(|| match default_path() {
            Some(path) => Self::load_or_empty(&path),
            None => {
                warn!("No home directory found, user profile is empty");
                Self::default()
            }
        })
    }

    /// Reads `path`. A missing file is an empty profile.
    pub fn load(path: &Path) -> RedDeerResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                info!("Loading RedDeer properties from user profile file: {}", path.display());
                Ok(Self::parse(&contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`UserProfile::load`], but an unreadable file is logged and
    /// treated as empty.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(
                "Error while loading RedDeer properties from user profile file {}: {}",
                path.display(),
                e
            );
            Self::default()
        })
    }

    pub fn parse(contents: &str) -> Self {
        let properties = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .filter_map(|line| {
                let split = line.find(['=', ':'])?;
                let key = line[..split].trim();
                let value = line[split + 1..].trim();
                (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
            })
            .collect();
        Self { properties }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn vm_args(&self) -> Option<&str> {
        self.property(VM_ARGS_KEY)
    }

    pub fn program_args(&self) -> Option<&str> {
        self.property(PROGRAM_ARGS_KEY)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(USER_PROFILE_FILE))
}
