#![allow(dead_code)]

use hirelink::config::DatabaseConfig;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::SystemTime;

/// A SQLite file in the temp dir, removed (with its WAL files) on drop.
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        SystemTime::now().hash(&mut hasher);
        std::process::id().hash(&mut hasher);
        tag.hash(&mut hasher);
        let file_name = format!("test_hirelink_{tag}_{}.sqlite", hasher.finish());
        Self {
            path: std::env::temp_dir().join(file_name),
        }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.to_str().unwrap())
    }

    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig::with_url(self.url())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(PathBuf::from(name));
        }
    }
}
