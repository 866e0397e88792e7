use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::build::CommandOutput;
use crate::error::AppResult;
use crate::infra::process::run_captured;
use crate::services::Uploader;

pub struct ScpUploader {
    program: String,
}

impl ScpUploader {
    pub fn new() -> Self {
        Self::with_program("scp")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ScpUploader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Uploader for ScpUploader {
    async fn upload(
        &self,
        spec: &Path,
        srpm: &Path,
        destination: &str,
    ) -> AppResult<CommandOutput> {
        info!("Uploading files into fedorapeople");
        debug!(destination, "upload target");
        run_captured(
            &self.program,
            [spec.as_os_str(), srpm.as_os_str(), OsStr::new(destination)],
        )
        .await
    }
}
