use std::sync::Arc;

use crate::config::Settings;
use crate::services::{BuildService, IdentityChain, ReviewTracker, SpecParser, Uploader};

#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub spec_parser: Arc<dyn SpecParser>,
    pub build_service: Arc<dyn BuildService>,
    pub uploader: Arc<dyn Uploader>,
    pub identity: IdentityChain,
    pub review_tracker: Arc<dyn ReviewTracker>,
}

impl AppContext {
    pub fn new(
        settings: Settings,
        spec_parser: Arc<dyn SpecParser>,
        build_service: Arc<dyn BuildService>,
        uploader: Arc<dyn Uploader>,
        identity: IdentityChain,
        review_tracker: Arc<dyn ReviewTracker>,
    ) -> Self {
        Self {
            settings,
            spec_parser,
            build_service,
            uploader,
            identity,
            review_tracker,
        }
    }
}
