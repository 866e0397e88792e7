use std::path::Path;

use async_trait::async_trait;

use crate::domain::package::ParsedSpec;
use crate::error::AppResult;

#[async_trait]
pub trait SpecParser: Send + Sync {
    async fn parse(&self, spec_path: &Path) -> AppResult<ParsedSpec>;
}
