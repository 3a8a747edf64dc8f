use std::path::PathBuf;

use sg_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "serigy";
const PROFILE_ENV: &str = "SERIGY_PROFILE";

fn resolved_app_dir_name() -> String {
    match std::env::var(PROFILE_ENV) {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Resolves data and cache roots through `dirs`.
///
/// Explicit overrides (from the bootstrap config) replace the platform base
/// directory; the profile suffix still applies.
#[derive(Default)]
pub struct DirsAppDirsAdapter {
    data_dir_override: Option<PathBuf>,
    cache_dir_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    /// Adapter rooted at the platform's data and cache directories.
    ///
    /// # Examples
    ///
    /// ```
    /// use sg_core::ports::AppDirsPort;
    /// use sg_platform::app_dirs::DirsAppDirsAdapter;
    ///
    /// let adapter = DirsAppDirsAdapter::new();
    /// let _ = adapter.get_app_dirs();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter whose base directories come from config when set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use sg_core::ports::AppDirsPort;
    /// use sg_platform::app_dirs::DirsAppDirsAdapter;
    ///
    /// let adapter = DirsAppDirsAdapter::with_overrides(
    ///     Some(PathBuf::from("/tmp/data")),
    ///     Some(PathBuf::from("/tmp/cache")),
    /// );
    /// let dirs = adapter.get_app_dirs().unwrap();
    /// assert!(dirs.app_data_root.starts_with("/tmp/data"));
    /// ```
    pub fn with_overrides(data_dir: Option<PathBuf>, cache_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir_override: data_dir,
            cache_dir_override: cache_dir,
        }
    }

    fn base_data_local_dir(&self) -> Option<PathBuf> {
        self.data_dir_override.clone().or_else(dirs::data_local_dir)
    }

    fn base_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir_override.clone().or_else(dirs::cache_dir)
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        let base_cache = self
            .base_cache_dir()
            .ok_or(AppDirsError::CacheDirUnavailable)?;
        let app_dir_name = resolved_app_dir_name();

        Ok(AppDirs {
            app_data_root: base_data.join(&app_dir_name),
            app_cache_root: base_cache.join(&app_dir_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static PROFILE_ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_profile<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = PROFILE_ENV_LOCK.lock().unwrap();
        let previous = std::env::var(PROFILE_ENV).ok();

        match value {
            Some(profile) => std::env::set_var(PROFILE_ENV, profile),
            None => std::env::remove_var(PROFILE_ENV),
        }

        let result = f();

        match previous {
            Some(profile) => std::env::set_var(PROFILE_ENV, profile),
            None => std::env::remove_var(PROFILE_ENV),
        }

        result
    }

    fn overridden() -> DirsAppDirsAdapter {
        DirsAppDirsAdapter::with_overrides(
            Some(PathBuf::from("/tmp/data")),
            Some(PathBuf::from("/tmp/cache")),
        )
    }

    #[test]
    fn appends_app_dir_name_to_overrides() {
        with_profile(None, || {
            let dirs = overridden().get_app_dirs().unwrap();
            assert_eq!(dirs.app_data_root, PathBuf::from("/tmp/data/serigy"));
            assert_eq!(dirs.app_cache_root, PathBuf::from("/tmp/cache/serigy"));
        });
    }

    #[test]
    fn profiles_are_isolated() {
        let a = with_profile(Some("a"), || overridden().get_app_dirs().unwrap());
        let b = with_profile(Some("b"), || overridden().get_app_dirs().unwrap());

        assert_eq!(a.app_data_root, PathBuf::from("/tmp/data/serigy-a"));
        assert_eq!(b.app_cache_root, PathBuf::from("/tmp/cache/serigy-b"));
        assert_ne!(a.app_data_root, b.app_data_root);
    }

    #[test]
    fn empty_profile_is_ignored() {
        let dirs = with_profile(Some(""), || overridden().get_app_dirs().unwrap());
        assert_eq!(dirs.app_data_root, PathBuf::from("/tmp/data/serigy"));
    }
}
