use std::collections::HashMap;

use tracing::debug;

use crate::error::{AppError, AppResult};

pub const RPMTAG_NAME: u32 = 1000;
pub const RPMTAG_SUMMARY: u32 = 1004;
pub const RPMTAG_DESCRIPTION: u32 = 1005;

/// Header values of one package, keyed by numeric RPM tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecHeader(HashMap<u32, String>);

impl SpecHeader {
    pub fn insert(&mut self, tag: u32, value: String) {
        self.0.insert(tag, value);
    }

    pub fn get(&self, tag: u32) -> Option<&str> {
        self.0.get(&tag).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecPackage {
    pub header: SpecHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSpec {
    pub packages: Vec<SpecPackage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub summary: String,
    pub description: String,
}

/// Reads name, summary and description from the main package of the spec.
pub fn extract_metadata(spec: &ParsedSpec) -> AppResult<PackageMetadata> {
    let package = spec
        .packages
        .first()
        .ok_or_else(|| AppError::Spec("spec file defines no packages".to_string()))?;

    let name = header_value(package, RPMTAG_NAME, "Name")?;
    debug!(%name, "Name");
    let summary = header_value(package, RPMTAG_SUMMARY, "Summary")?;
    debug!(%summary, "Summary");
    let description = header_value(package, RPMTAG_DESCRIPTION, "Description")?;
    debug!(%description, "Description");

    Ok(PackageMetadata {
        name,
        summary,
        description,
    })
}

fn header_value(package: &SpecPackage, tag: u32, label: &str) -> AppResult<String> {
    package
        .header
        .get(tag)
        .map(str::to_string)
        .ok_or_else(|| AppError::Spec(format!("spec header has no {label} tag ({tag})")))
}
