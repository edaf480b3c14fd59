use std::path::{Path, PathBuf};

use anyhow::Context;
use noces_config::NocesConfig;

/// Load `.env` (from the nearest directory holding `.noces/`, else the
/// current directory) and then the layered configuration.
pub fn load_config() -> anyhow::Result<NocesConfig> {
    load_dotenv()?;
    NocesConfig::load().context("failed to load noces configuration")
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;

    if let Some(root) = find_project_root(&cwd) {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
            return Ok(());
        }
    }

    dotenvy::dotenv().ok();
    Ok(())
}

/// Walk upwards from `start` until a `.noces` directory is found.
fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(".noces").is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}
