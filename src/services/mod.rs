pub mod build_system;
pub mod identity;
pub mod review_tracker;
pub mod spec_parser;
pub mod uploader;

pub use build_system::BuildService;
pub use identity::{IdentityChain, IdentityResolver};
pub use review_tracker::ReviewTracker;
pub use spec_parser::SpecParser;
pub use uploader::Uploader;
