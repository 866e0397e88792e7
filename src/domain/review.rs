use std::path::Path;

use crate::domain::package::PackageMetadata;
use crate::error::{AppError, AppResult};

pub const PUBLIC_DIR_SEGMENT: &str = "public_html/";
pub const HOSTING_DOMAIN: &str = "fedorapeople.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUrls {
    pub spec_url: String,
    pub srpm_url: String,
}

/// Everything the review ticket is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInfo {
    pub name: String,
    pub summary: String,
    pub description: String,
    pub spec_url: String,
    pub srpm_url: String,
}

impl ReviewInfo {
    pub fn new(metadata: PackageMetadata, urls: ReviewUrls) -> Self {
        Self {
            name: metadata.name,
            summary: metadata.summary,
            description: metadata.description,
            spec_url: urls.spec_url,
            srpm_url: urls.srpm_url,
        }
    }

    pub fn ticket_summary(&self) -> String {
        format!("Review Request: {} - {}", self.name, self.summary)
    }

    pub fn ticket_description(&self) -> String {
        format!(
            "Spec URL: {}\nSRPM URL: {}\n\nDescription:\n{}\n",
            self.spec_url, self.srpm_url, self.description
        )
    }
}

/// Public download URLs for files copied to `destination`.
///
/// The destination must contain `public_html/`; whatever follows it becomes
/// the path under `http://<username>.fedorapeople.org/`.
pub fn compose_urls(
    username: &str,
    destination: &str,
    spec_path: &Path,
    srpm_path: &Path,
) -> AppResult<ReviewUrls> {
    let (_, subpath) = destination.split_once(PUBLIC_DIR_SEGMENT).ok_or_else(|| {
        AppError::Configuration(format!(
            "upload target '{destination}' does not contain '{PUBLIC_DIR_SEGMENT}'"
        ))
    })?;

    let subpath = subpath.trim_matches('/');
    let base = if subpath.is_empty() {
        format!("http://{username}.{HOSTING_DOMAIN}/")
    } else {
        format!("http://{username}.{HOSTING_DOMAIN}/{subpath}/")
    };

    Ok(ReviewUrls {
        spec_url: format!("{base}{}", file_name(spec_path)?),
        srpm_url: format!("{base}{}", file_name(srpm_path)?),
    })
}

fn file_name(path: &Path) -> AppResult<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            AppError::Configuration(format!("'{}' has no usable file name", path.display()))
        })
}
