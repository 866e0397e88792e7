use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AppError, AppResult};

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    fn name(&self) -> &'static str;
    async fn resolve(&self) -> AppResult<String>;
}

/// Tries each resolver in order; the first username found wins.
#[derive(Clone)]
pub struct IdentityChain {
    resolvers: Vec<Arc<dyn IdentityResolver>>,
}

impl IdentityChain {
    pub fn new(resolvers: Vec<Arc<dyn IdentityResolver>>) -> Self {
        Self { resolvers }
    }

    /// Resolver names in the order they are tried.
    pub fn names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|resolver| resolver.name()).collect()
    }

    pub async fn resolve(&self) -> AppResult<String> {
        let mut failures = Vec::new();
        for resolver in &self.resolvers {
            match resolver.resolve().await {
                Ok(username) => {
                    debug!(resolver = resolver.name(), %username, "resolved FAS username");
                    return Ok(username);
                }
                Err(err) => {
                    debug!(
                        resolver = resolver.name(),
                        error = %err,
                        "could not resolve FAS username"
                    );
                    failures.push(format!("{}: {err}", resolver.name()));
                }
            }
        }

        if failures.is_empty() {
            return Err(AppError::Identity("no identity resolver configured".to_string()));
        }
        Err(AppError::Identity(format!(
            "unable to determine FAS username ({})",
            failures.join("; ")
        )))
    }
}
