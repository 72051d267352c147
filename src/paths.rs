//! Per-user locations for engine state and downloads.
//!
//! Base directories follow the XDG layout:
//! - config: `$XDG_CONFIG_HOME`, else `$HOME/.config`
//! - cache: `$XDG_CACHE_HOME`, else `$HOME/.cache`
//!
//! From those the bundle derives `<config>/<app>/extensions`,
//! `<cache>/<app>/cache`, `<cache>/<app>/data`, `<cache>/<app>/cookies.txt`
//! and `<home>/Downloads`.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// `$HOME` is unset or empty.
    #[error("cannot determine home directory: HOME is not set")]
    NoHome,
}

/// User base directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirs {
    pub home: PathBuf,
    pub config: PathBuf,
    pub cache: PathBuf,
}

impl BaseDirs {
    /// Reads base directories from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoHome`] when `$HOME` is missing.
    pub fn from_env() -> Result<Self, PathError> {
        Self::from_vars(|name| env::var_os(name))
    }

    /// Same as [`BaseDirs::from_env`] with an injectable variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoHome`] when `HOME` is missing.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self, PathError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let home = PathBuf::from(non_empty("HOME").ok_or(PathError::NoHome)?);
        let config = non_empty("XDG_CONFIG_HOME").map_or_else(|| home.join(".config"), PathBuf::from);
        let cache = non_empty("XDG_CACHE_HOME").map_or_else(|| home.join(".cache"), PathBuf::from);
        Ok(Self { home, config, cache })
    }
}

/// The per-user paths the shell hands to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathBundle {
    pub extensions: PathBuf,
    pub cache: PathBuf,
    pub data: PathBuf,
    pub cookies: PathBuf,
    pub downloads: PathBuf,
}

impl PathBundle {
    #[must_use]
    pub fn new(base: &BaseDirs, app_name: &str) -> Self {
        Self::for_app(&base.home, &base.config, &base.cache, app_name)
    }

    #[must_use]
    pub fn for_app(home: &Path, config: &Path, cache: &Path, app_name: &str) -> Self {
        Self {
            extensions: config.join(app_name).join("extensions"),
            cache: cache.join(app_name).join("cache"),
            data: cache.join(app_name).join("data"),
            cookies: cache.join(app_name).join("cookies.txt"),
            downloads: home.join("Downloads"),
        }
    }

    /// Replaces the downloads directory.
    #[must_use]
    pub fn with_downloads(mut self, downloads: Option<PathBuf>) -> Self {
        if let Some(downloads) = downloads {
            self.downloads = downloads;
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), OsString::from(*v)))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_base_dirs_fall_back_to_home() {
        let base = BaseDirs::from_vars(lookup(&[("HOME", "/home/u")])).unwrap();
        assert_eq!(base.config, PathBuf::from("/home/u/.config"));
        assert_eq!(base.cache, PathBuf::from("/home/u/.cache"));
    }

    #[test]
    fn test_base_dirs_prefer_xdg_vars() {
        let base = BaseDirs::from_vars(lookup(&[
            ("HOME", "/home/u"),
            ("XDG_CONFIG_HOME", "/cfg"),
            ("XDG_CACHE_HOME", "/var/cache/u"),
        ]))
        .unwrap();
        assert_eq!(base.config, PathBuf::from("/cfg"));
        assert_eq!(base.cache, PathBuf::from("/var/cache/u"));
    }

    #[test]
    fn test_base_dirs_ignore_empty_xdg_vars() {
        let base = BaseDirs::from_vars(lookup(&[("HOME", "/home/u"), ("XDG_CONFIG_HOME", "")])).unwrap();
        assert_eq!(base.config, PathBuf::from("/home/u/.config"));
    }

    #[test]
    fn test_base_dirs_require_home() {
        assert_eq!(BaseDirs::from_vars(lookup(&[])), Err(PathError::NoHome));
        assert_eq!(BaseDirs::from_vars(lookup(&[("HOME", "")])), Err(PathError::NoHome));
    }

    #[test]
    fn test_path_bundle_layout() {
        let base = BaseDirs {
            home: PathBuf::from("/home/u"),
            config: PathBuf::from("/home/u/.config"),
            cache: PathBuf::from("/home/u/.cache"),
        };
        let paths = PathBundle::new(&base, "keyshell");
        assert_eq!(paths.extensions, PathBuf::from("/home/u/.config/keyshell/extensions"));
        assert_eq!(paths.cache, PathBuf::from("/home/u/.cache/keyshell/cache"));
        assert_eq!(paths.data, PathBuf::from("/home/u/.cache/keyshell/data"));
        assert_eq!(paths.cookies, PathBuf::from("/home/u/.cache/keyshell/cookies.txt"));
        assert_eq!(paths.downloads, PathBuf::from("/home/u/Downloads"));
    }

    #[test]
    fn test_path_bundle_downloads_override() {
        let paths = PathBundle::for_app(
            Path::new("/h"),
            Path::new("/h/.config"),
            Path::new("/h/.cache"),
            "keyshell",
        )
        .with_downloads(Some(PathBuf::from("/data/dl")));
        assert_eq!(paths.downloads, PathBuf::from("/data/dl"));
    }
}
