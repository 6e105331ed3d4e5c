//! Install profiles.
//!
//! A profile names the directories of a portable install relative to its
//! root, plus the fixed entry script, child arguments and console status
//! lines. The default profile is embedded at compile time from
//! `contrib/profiles/default.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Compile-time embedded profile for the portable FaceFusionFree layout.
const DEFAULT_PROFILE: &str = include_str!("../../../contrib/profiles/default.toml");

static EMBEDDED: OnceLock<Profile> = OnceLock::new();

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("bad profile TOML in {origin}: {source}")]
    Parse {
        origin: String,
        source: toml::de::Error,
    },
    #[error("invalid profile {origin}: {reason}")]
    Invalid { origin: String, reason: String },
}

/// Top-level profile structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub app: AppInfo,
    pub runtime: RuntimeInfo,
    #[serde(default)]
    pub console: ConsoleInfo,
}

/// The launched application, from the `[app]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Entry script relative to the install root.
    pub entry_script: String,
    /// Arguments passed after the entry script.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Bundled runtime directories from the `[runtime]` section.
///
/// All entries are `/`-separated and relative to the install root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub python_dir: String,
    /// Interpreter-bundled library directory, searched right after TensorRT.
    pub library_dir: String,
    pub ffmpeg_dir: String,
    pub tensorrt_dir: String,
}

/// Lines printed before the child starts, from the `[console]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleInfo {
    #[serde(default)]
    pub status: Vec<String>,
}

impl Profile {
    /// The profile shipped inside the binary.
    pub fn embedded() -> Result<Self, ProfileError> {
        if let Some(profile) = EMBEDDED.get() {
            return Ok(profile.clone());
        }
        let profile = Self::parse(DEFAULT_PROFILE, "<embedded>")?;
        Ok(EMBEDDED.get_or_init(|| profile).clone())
    }

    /// Read a profile from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let src = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::parse(&src, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), app = %profile.app.name, "loaded profile");
        Ok(profile)
    }

    /// Parse profile TOML. `origin` names the source in error messages.
    pub fn parse(src: &str, origin: &str) -> Result<Self, ProfileError> {
        let profile: Profile = toml::from_str(src).map_err(|source| ProfileError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        profile.validate(origin)?;
        Ok(profile)
    }

    /// Display name, with the version appended when the profile has one.
    pub fn display_name(&self) -> String {
        match &self.app.version {
            Some(v) => format!("{} {v}", self.app.name),
            None => self.app.name.clone(),
        }
    }

    fn validate(&self, origin: &str) -> Result<(), ProfileError> {
        let required = [
            ("app.entry_script", &self.app.entry_script),
            ("runtime.python_dir", &self.runtime.python_dir),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ProfileError::Invalid {
                    origin: origin.to_string(),
                    reason: format!("{key} must not be empty"),
                });
            }
        }
        Ok(())
    }
}
