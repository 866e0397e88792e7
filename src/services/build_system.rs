use std::path::Path;

use async_trait::async_trait;

use crate::domain::build::CommandOutput;
use crate::error::AppResult;

#[async_trait]
pub trait BuildService: Send + Sync {
    /// Runs a scratch build of `srpm` for `target` and returns the tool output.
    async fn scratch_build(&self, target: &str, srpm: &Path) -> AppResult<CommandOutput>;
}
