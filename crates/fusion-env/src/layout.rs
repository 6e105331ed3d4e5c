//! Absolute install layout, resolved against the install root.

use crate::profile::Profile;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Paths of a portable install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Install root (the launcher's working directory by default).
    pub root: PathBuf,
    /// Bundled Python installation.
    pub python_dir: PathBuf,
    /// Interpreter executable inside `python_dir`.
    pub python_exe: PathBuf,
    /// Interpreter-bundled library directory.
    pub python_lib_dir: PathBuf,
    /// Console scripts installed by pip (`Scripts` on Windows, `bin` elsewhere).
    pub python_scripts_dir: PathBuf,
    pub ffmpeg_dir: PathBuf,
    pub trt_dir: PathBuf,
    pub entry_script: PathBuf,
}

/// A layout path that is not present on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPath {
    pub name: &'static str,
    pub path: PathBuf,
    /// The launch cannot succeed without it.
    pub required: bool,
}

impl Layout {
    pub fn resolve(root: &Path, profile: &Profile) -> Self {
        let root = root.to_path_buf();
        let python_dir = join_relative(&root, &profile.runtime.python_dir);

        #[cfg(windows)]
        let (python_exe, python_scripts_dir) = (
            python_dir.join("python.exe"),
            python_dir.join("Scripts"),
        );
        #[cfg(not(windows))]
        let (python_exe, python_scripts_dir) = (
            python_dir.join("bin").join("python3"),
            python_dir.join("bin"),
        );

        Self {
            python_lib_dir: join_relative(&root, &profile.runtime.library_dir),
            ffmpeg_dir: join_relative(&root, &profile.runtime.ffmpeg_dir),
            trt_dir: join_relative(&root, &profile.runtime.tensorrt_dir),
            entry_script: join_relative(&root, &profile.app.entry_script),
            python_dir,
            python_exe,
            python_scripts_dir,
            root,
        }
    }

    /// Layout paths that do not exist, required ones first.
    pub fn missing(&self) -> Vec<MissingPath> {
        let checks = [
            ("interpreter", &self.python_exe, true),
            ("entry script", &self.entry_script, true),
            ("ffmpeg directory", &self.ffmpeg_dir, false),
            ("tensorrt directory", &self.trt_dir, false),
        ];
        checks
            .into_iter()
            .filter(|(_, path, _)| !path.exists())
            .map(|(name, path, required)| MissingPath {
                name,
                path: path.clone(),
                required,
            })
            .collect()
    }
}

/// Join a `/`- or `\`-separated relative path onto `base`, one component at a time.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|c| !c.is_empty() && *c != ".")
        .fold(base.to_path_buf(), |acc, c| acc.join(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(root: &str) -> Layout {
        Layout::resolve(Path::new(root), &Profile::embedded().unwrap())
    }

    #[test]
    fn test_join_relative() {
        let base = Path::new("/opt/ff");
        assert_eq!(
            join_relative(base, "python/tools/ffmpeg/bin"),
            base.join("python").join("tools").join("ffmpeg").join("bin")
        );
        assert_eq!(join_relative(base, "TensorRT\\lib"), base.join("TensorRT").join("lib"));
        assert_eq!(join_relative(base, "./a//b/"), base.join("a").join("b"));
        assert_eq!(join_relative(base, ""), base.to_path_buf());
    }

    #[test]
    fn test_layout_paths_under_root() {
        let l = layout("/opt/ff");
        let root = Path::new("/opt/ff");
        assert_eq!(l.root, root);
        assert_eq!(l.python_dir, root.join("python"));
        assert_eq!(l.python_lib_dir, root.join("python").join("Lib"));
        assert_eq!(
            l.ffmpeg_dir,
            root.join("python").join("tools").join("ffmpeg").join("bin")
        );
        assert_eq!(l.trt_dir, root.join("TensorRT").join("lib"));
        assert_eq!(l.entry_script, root.join("facefusion.py"));
        assert!(l.python_exe.starts_with(&l.python_dir));
        assert!(l.python_scripts_dir.starts_with(&l.python_dir));
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_interpreter_names() {
        let l = layout("C:\\ff");
        assert_eq!(l.python_exe, Path::new("C:\\ff\\python\\python.exe"));
        assert_eq!(l.python_scripts_dir, Path::new("C:\\ff\\python\\Scripts"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_interpreter_names() {
        let l = layout("/opt/ff");
        assert_eq!(l.python_exe, Path::new("/opt/ff/python/bin/python3"));
        assert_eq!(l.python_scripts_dir, Path::new("/opt/ff/python/bin"));
    }

    #[test]
    fn test_different_roots_give_different_layouts() {
        let a = layout("/srv/one");
        let b = layout("/srv/two");
        assert_ne!(a, b);
        for (l, root) in [(&a, "/srv/one"), (&b, "/srv/two")] {
            for p in [
                &l.python_dir,
                &l.python_exe,
                &l.python_lib_dir,
                &l.python_scripts_dir,
                &l.ffmpeg_dir,
                &l.trt_dir,
                &l.entry_script,
            ] {
                assert!(p.starts_with(root), "{} not under {root}", p.display());
            }
        }
    }

    #[test]
    fn test_missing_reports_required_first() {
        let l = layout("/nonexistent/fusion-root");
        let missing = l.missing();
        assert_eq!(missing.len(), 4);
        assert_eq!(missing[0].name, "interpreter");
        assert!(missing[0].required);
        assert!(missing[1].required);
        assert!(!missing[2].required);
        assert!(!missing[3].required);
    }

    #[test]
    fn test_missing_empty_for_complete_install() {
        let root = std::env::temp_dir().join(format!("fusion-layout-{}", std::process::id()));
        let l = layout(root.to_str().unwrap());
        for dir in [&l.ffmpeg_dir, &l.trt_dir, l.python_exe.parent().unwrap()] {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(&l.python_exe, b"").unwrap();
        std::fs::write(&l.entry_script, b"").unwrap();

        let missing = l.missing();
        std::fs::remove_dir_all(&root).ok();
        assert!(missing.is_empty(), "{missing:?}");
    }
}
