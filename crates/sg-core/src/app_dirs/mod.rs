use std::path::PathBuf;

/// Resolved per-user directories. Facts only; nothing here touches disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
    pub app_cache_root: PathBuf,
}

impl AppDirs {
    pub fn settings_path(&self) -> PathBuf {
        self.app_data_root.join("settings.json")
    }

    pub fn slots_path(&self) -> PathBuf {
        self.app_data_root.join("slots.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }

    pub fn payload_cache_dir(&self) -> PathBuf {
        self.app_cache_root.join("tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_layout_from_roots() {
        let dirs = AppDirs {
            app_data_root: PathBuf::from("/data/serigy"),
            app_cache_root: PathBuf::from("/cache/serigy"),
        };
        assert_eq!(dirs.settings_path(), PathBuf::from("/data/serigy/settings.json"));
        assert_eq!(dirs.slots_path(), PathBuf::from("/data/serigy/slots.json"));
        assert_eq!(dirs.logs_dir(), PathBuf::from("/data/serigy/logs"));
        assert_eq!(dirs.payload_cache_dir(), PathBuf::from("/cache/serigy/tmp"));
    }
}
