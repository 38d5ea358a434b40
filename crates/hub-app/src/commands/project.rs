use hub_bridge::ProjectBackend;
use hub_common::{ProjectEntry, Result};
use tracing::{info, warn};

pub async fn create(backend: &dyn ProjectBackend) -> Result<()> {
    info!("Requesting new project");
    backend.create_project().await?;
    Ok(())
}

/// Ask the host to open recent project `index`. Returns the entry the index
/// pointed at in our cached list, if any; the host has the final say.
pub async fn open(backend: &dyn ProjectBackend, index: usize) -> Result<Option<ProjectEntry>> {
    let entry = backend.recent_projects().into_iter().nth(index);
    if entry.is_none() {
        warn!(index, "Index is past the cached recent-project list");
    }

    info!(index, "Requesting project open");
    backend.open_project(index).await?;
    Ok(entry)
}
