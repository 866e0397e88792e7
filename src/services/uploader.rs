use std::path::Path;

use async_trait::async_trait;

use crate::domain::build::CommandOutput;
use crate::error::AppResult;

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Copies both files to `destination` (`host:path`) in a single transfer.
    async fn upload(
        &self,
        spec: &Path,
        srpm: &Path,
        destination: &str,
    ) -> AppResult<CommandOutput>;
}
