use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::domain::build::CommandOutput;
use crate::error::AppResult;
use crate::infra::process::run_captured;
use crate::services::BuildService;

pub struct KojiCli {
    program: String,
}

impl KojiCli {
    pub fn new() -> Self {
        Self::with_program("koji")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for KojiCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BuildService for KojiCli {
    async fn scratch_build(&self, target: &str, srpm: &Path) -> AppResult<CommandOutput> {
        info!(koji_target = target, "Starting scratch build");
        run_captured(
            &self.program,
            [
                OsStr::new("build"),
                OsStr::new("--scratch"),
                OsStr::new(target),
                srpm.as_os_str(),
            ],
        )
        .await
    }
}
