//! Child environment plan and search path construction.

use crate::layout::Layout;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use thiserror::Error;

/// Fallback when `SystemRoot` is not set.
#[cfg(windows)]
const DEFAULT_SYSTEM_ROOT: &str = r"C:\Windows";

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("cannot build {var}: {source}")]
    SearchPath {
        var: &'static str,
        source: std::env::JoinPathsError,
    },
}

/// Minimal operating-system directories appended after the bundled ones.
///
/// On Windows these derive from `system_root` (the `SystemRoot` variable).
#[cfg(windows)]
pub fn system_search_path(system_root: Option<&OsStr>) -> Vec<PathBuf> {
    let root = PathBuf::from(system_root.unwrap_or_else(|| OsStr::new(DEFAULT_SYSTEM_ROOT)));
    vec![
        root.join("System32"),
        root.clone(),
        root.join("System32").join("Wbem"),
    ]
}

#[cfg(not(windows))]
pub fn system_search_path(_system_root: Option<&OsStr>) -> Vec<PathBuf> {
    ["/usr/local/bin", "/usr/bin", "/bin"]
        .into_iter()
        .map(PathBuf::from)
        .collect()
}

/// Full search path in priority order. Bundled directories come first so
/// their libraries shadow system copies of the same name.
pub fn search_path(layout: &Layout, system_root: Option<&OsStr>) -> Vec<PathBuf> {
    let mut entries = vec![
        layout.trt_dir.clone(),
        layout.python_lib_dir.clone(),
        layout.ffmpeg_dir.clone(),
        layout.python_dir.clone(),
        layout.python_scripts_dir.clone(),
    ];
    entries.extend(system_search_path(system_root));
    entries
}

/// Ordered environment assignments applied to the child process only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPlan {
    vars: Vec<(String, OsString)>,
}

impl EnvPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// The launch environment for `layout`.
    pub fn build(layout: &Layout, system_root: Option<&OsStr>) -> Result<Self, PlanError> {
        let sys_path = join("SYS_PATH", system_search_path(system_root))?;
        let path = join("PATH", search_path(layout, system_root))?;

        let mut plan = Self::new();
        plan.set("PYTHONUTF8", "1");
        plan.set("PYTHONIOENCODING", "utf-8");
        plan.set("PYTHON_PATH", &layout.python_dir);
        plan.set("PYTHON_EXECUTABLE", &layout.python_exe);
        plan.set("FFMPEG_PATH", &layout.ffmpeg_dir);
        plan.set("TRT_PATH", &layout.trt_dir);
        plan.set("SYS_PATH", sys_path);
        plan.set("PATH", path);
        plan.set("DS_BUILD_AIO", "0");
        plan.set("DS_BUILD_SPARSE_ATTN", "0");
        plan.set("PYTHONWARNINGS", "ignore");

        tracing::debug!(vars = plan.len(), "environment plan built");
        Ok(plan)
    }

    /// Append an assignment. A later assignment to the same name wins.
    pub fn set(&mut self, name: &str, value: impl AsRef<OsStr>) {
        self.vars.push((name.to_string(), value.as_ref().to_os_string()));
    }

    /// Current value of `name` in the plan.
    pub fn get(&self, name: &str) -> Option<&OsStr> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_os_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OsStr)> {
        self.vars.iter().map(|(n, v)| (n.as_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

fn join(var: &'static str, entries: Vec<PathBuf>) -> Result<OsString, PlanError> {
    std::env::join_paths(entries).map_err(|source| PlanError::SearchPath { var, source })
}
