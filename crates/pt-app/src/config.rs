//! Planning configuration files.

use std::path::Path;

use pt_plan::PlanOptions;

use crate::error::{AppError, AppResult};

/// Read [`PlanOptions`] from a YAML file; absent fields keep their defaults.
pub fn load_plan_options(path: &Path) -> AppResult<PlanOptions> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    parse_plan_options(&content).map_err(|reason| AppError::Config {
        path: path.to_path_buf(),
        reason,
    })
}

fn parse_plan_options(content: &str) -> Result<PlanOptions, String> {
    if content.trim().is_empty() {
        return Ok(PlanOptions::default());
    }
    serde_yaml::from_str(content).map_err(|e| e.to_string())
}
