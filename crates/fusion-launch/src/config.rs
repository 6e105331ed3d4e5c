use std::ffi::OsString;
use std::path::PathBuf;

/// Launcher configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Install root all layout paths are resolved against (default: working directory).
    pub root: PathBuf,
    /// TOML profile replacing the embedded one.
    pub profile_path: Option<PathBuf>,
    /// Wait for a keypress before exiting.
    pub pause: bool,
    /// Windows system root used for the minimal system search path.
    pub system_root: Option<OsString>,
}

impl Config {
    /// Load configuration from `FUSION_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    fn from_lookup(var: impl Fn(&str) -> Option<OsString>) -> Self {
        let root = var("FUSION_ROOT")
            .map(|v| absolute_root(PathBuf::from(v)))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        Self {
            root,
            profile_path: var("FUSION_PROFILE").map(PathBuf::from),
            pause: var("FUSION_NO_PAUSE").map(|v| v == "0").unwrap_or(true),
            system_root: var("SystemRoot"),
        }
    }

    /// Override the install root, anchoring a relative path at the working directory.
    pub fn set_root(&mut self, root: PathBuf) {
        self.root = absolute_root(root);
    }
}

/// The child runs from the root, so every layout path must be absolute.
fn absolute_root(root: PathBuf) -> PathBuf {
    if root.is_absolute() {
        return root;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(root),
        Err(err) => {
            tracing::warn!(error = %err, root = %root.display(), "cannot resolve relative root");
            root
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c.root, std::env::current_dir().unwrap());
        assert!(c.profile_path.is_none());
        assert!(c.pause);
        assert!(c.system_root.is_none());
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("FUSION_ROOT", "/opt/ff"),
            ("FUSION_PROFILE", "/etc/ff.toml"),
            ("FUSION_NO_PAUSE", "1"),
            ("SystemRoot", "D:\\Win"),
        ]);
        assert!(c.root.ends_with("opt/ff"));
        assert!(c.root.is_absolute());
        assert_eq!(c.profile_path, Some(PathBuf::from("/etc/ff.toml")));
        assert!(!c.pause);
        assert_eq!(c.system_root, Some(OsString::from("D:\\Win")));
    }

    #[test]
    fn test_relative_root_is_anchored_at_working_dir() {
        let cwd = std::env::current_dir().unwrap();
        let c = config(&[("FUSION_ROOT", "inst/ff")]);
        assert_eq!(c.root, cwd.join("inst/ff"));

        let mut c = config(&[]);
        c.set_root(PathBuf::from("other"));
        assert_eq!(c.root, cwd.join("other"));
    }

    #[test]
    fn test_absolute_root_kept() {
        let abs = std::env::current_dir().unwrap().join("ff");
        let mut c = config(&[]);
        c.set_root(abs.clone());
        assert_eq!(c.root, abs);
    }

    #[test]
    fn test_no_pause_zero_keeps_pause() {
        assert!(config(&[("FUSION_NO_PAUSE", "0")]).pause);
    }
}
