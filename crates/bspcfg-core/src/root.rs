//! Config root and path containment
//!
//! Every file-touching operation goes through [`ConfigRoot::resolve`] first.
//! It is the only place untrusted relative paths are turned into real ones.

use std::path::{Component, Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Directory that bounds every read and write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot {
    path: PathBuf,
}

impl ConfigRoot {
    /// Open a config root. The directory must exist; it is canonicalized so
    /// later containment checks compare like with like.
    ///
    /// # Errors
    /// Returns `InvalidRoot` if the path does not exist or is not a directory
    pub fn new(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let canonical = path.canonicalize().map_err(|e| ConfigError::InvalidRoot {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if !canonical.is_dir() {
            return Err(ConfigError::InvalidRoot {
                path: path.to_path_buf(),
                message: "not a directory".into(),
            });
        }

        Ok(Self { path: canonical })
    }

    /// Absolute path of the root
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a caller-supplied relative path to an existing file under the root
    ///
    /// # Errors
    /// Returns `OutOfScope` if the path leaves the root (checked before the
    /// filesystem is touched), or `NotFound` if it stays inside but does not exist
    pub fn resolve(&self, relative: &str) -> ConfigResult<PathBuf> {
        let out_of_scope = || ConfigError::OutOfScope {
            path: relative.to_string(),
        };

        if relative.contains('\0') {
            return Err(out_of_scope());
        }

        let candidate = normalize_path(&self.path.join(relative));
        if !self.contains(&candidate) {
            return Err(out_of_scope());
        }

        if !candidate.exists() {
            return Err(ConfigError::NotFound {
                path: relative.to_string(),
            });
        }

        // Symlinks inside the root may still point elsewhere
        let canonical = candidate
            .canonicalize()
            .map_err(|e| ConfigError::io(&candidate, &e))?;
        if !self.contains(&canonical) {
            return Err(out_of_scope());
        }

        Ok(candidate)
    }

    /// Strictly below the root, compared by path components
    fn contains(&self, path: &Path) -> bool {
        path != self.path && path.starts_with(&self.path)
    }
}

/// Lexically normalize an absolute path, folding `.` and `..` components
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ConfigRoot) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("bspwm")).unwrap();
        fs::write(dir.path().join("bspwm/bspwmrc"), "bspc config border_width 2\n").unwrap();
        let root = ConfigRoot::new(dir.path()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_resolve_existing_file() {
        let (_dir, root) = setup();
        let path = root.resolve("bspwm/bspwmrc").unwrap();
        assert!(path.starts_with(root.path()));
        assert!(path.ends_with("bspwm/bspwmrc"));
    }

    #[test]
    fn test_resolve_folds_inner_parent_dirs() {
        let (_dir, root) = setup();
        let path = root.resolve("bspwm/../bspwm/./bspwmrc").unwrap();
        assert_eq!(path, root.path().join("bspwm/bspwmrc"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (_dir, root) = setup();
        let err = root.resolve("../../etc/passwd").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfScope { .. }));
    }

    #[test]
    fn test_resolve_rejects_traversal_to_existing_target() {
        let outer = TempDir::new().unwrap();
        let inner = outer.path().join("cfg");
        fs::create_dir_all(&inner).unwrap();
        fs::write(outer.path().join("secret"), "x").unwrap();
        let root = ConfigRoot::new(&inner).unwrap();

        let err = root.resolve("../secret").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfScope { .. }));
    }

    #[test]
    fn test_resolve_rejects_sibling_with_shared_prefix() {
        let outer = TempDir::new().unwrap();
        fs::create_dir_all(outer.path().join("cfg")).unwrap();
        fs::create_dir_all(outer.path().join("cfg-evil")).unwrap();
        fs::write(outer.path().join("cfg-evil/bspwmrc"), "x").unwrap();
        let root = ConfigRoot::new(outer.path().join("cfg")).unwrap();

        let err = root.resolve("../cfg-evil/bspwmrc").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfScope { .. }));
    }

    #[test]
    fn test_resolve_rejects_absolute_outside() {
        let (_dir, root) = setup();
        let err = root.resolve("/etc/passwd").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfScope { .. }));
    }

    #[test]
    fn test_resolve_rejects_root_itself() {
        let (_dir, root) = setup();
        assert!(matches!(
            root.resolve("").unwrap_err(),
            ConfigError::OutOfScope { .. }
        ));
        assert!(matches!(
            root.resolve("bspwm/..").unwrap_err(),
            ConfigError::OutOfScope { .. }
        ));
    }

    #[test]
    fn test_resolve_missing_file() {
        let (_dir, root) = setup();
        let err = root.resolve("polybar/config").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { ref path } if path == "polybar/config"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_escape() {
        let outer = TempDir::new().unwrap();
        let inner = outer.path().join("cfg");
        fs::create_dir_all(&inner).unwrap();
        fs::write(outer.path().join("secret"), "x").unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret"), inner.join("link")).unwrap();
        let root = ConfigRoot::new(&inner).unwrap();

        let err = root.resolve("link").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfScope { .. }));
    }

    #[test]
    fn test_new_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = ConfigRoot::new(dir.path().join("nope")).unwrap_err();
        assert_eq!(err.code(), "INVALID_ROOT");
    }
}
