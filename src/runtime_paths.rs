use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const APP_NAME: &str = "solana-agent-chat";

fn platform_config_root() -> PathBuf {
    if let Some(project_dirs) = ProjectDirs::from("", "", APP_NAME) {
        return project_dirs.config_dir().to_path_buf();
    }

    if let Some(base_dirs) = BaseDirs::new() {
        return base_dirs.config_dir().join(APP_NAME);
    }

    std::env::temp_dir().join(APP_NAME)
}

pub fn config_root() -> PathBuf {
    platform_config_root()
}

pub fn default_config_path() -> String {
    config_root()
        .join("config.json")
        .to_string_lossy()
        .to_string()
}
