//! JSON snapshot of a dashboard session.
//!
//! Files are organized by date, one file per run. The session id keeps two
//! runs started in the same second apart:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 081502-3f9c2a7d10b4e655.json
//!     └── 174033-a01b77c4e2d9f830.json
//! ```

use crate::models::Dashboard;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the snapshot for `dashboard` under `json_output_dir`.
pub fn snapshot_path(dashboard: &Dashboard, json_output_dir: &str) -> PathBuf {
    let stamp: String = dashboard
        .local_time
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(6)
        .collect();
    PathBuf::from(json_output_dir)
        .join(&dashboard.local_date)
        .join(format!("{}-{}.json", stamp, dashboard.session_id))
}

/// Write a [`Dashboard`] as pretty-printed JSON.
///
/// # Returns
///
/// The path written, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_dashboard(
    dashboard: &Dashboard,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(dashboard)?;
    let path = snapshot_path(dashboard, json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON snapshot");
    Ok(path)
}
