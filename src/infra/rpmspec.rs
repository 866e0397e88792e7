use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::package::{
    ParsedSpec, RPMTAG_DESCRIPTION, RPMTAG_NAME, RPMTAG_SUMMARY, SpecHeader, SpecPackage,
};
use crate::error::{AppError, AppResult};
use crate::infra::process::run_captured;
use crate::services::SpecParser;

const RECORD_END: &str = "@@end@@";

/// Parses spec files through `rpmspec --query`, one record per package.
pub struct RpmSpecCli {
    program: String,
}

impl RpmSpecCli {
    pub fn new() -> Self {
        Self::with_program("rpmspec")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for RpmSpecCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpecParser for RpmSpecCli {
    async fn parse(&self, spec_path: &Path) -> AppResult<ParsedSpec> {
        let format = query_format();
        let result = run_captured(
            &self.program,
            [
                OsStr::new("--query"),
                OsStr::new("--queryformat"),
                OsStr::new(&format),
                spec_path.as_os_str(),
            ],
        )
        .await?;

        if !result.success() {
            return Err(AppError::Spec(format!(
                "rpmspec could not parse {}:\n{}",
                spec_path.display(),
                result.output
            )));
        }

        Ok(parse_query_output(&result.output))
    }
}

fn query_format() -> String {
    let mut format = String::new();
    for (tag, name) in [
        (RPMTAG_NAME, "NAME"),
        (RPMTAG_SUMMARY, "SUMMARY"),
        (RPMTAG_DESCRIPTION, "DESCRIPTION"),
    ] {
        format.push_str(&format!("@@{tag}@@\n%{{{name}}}\n"));
    }
    format.push_str(RECORD_END);
    format.push('\n');
    format
}

fn tag_marker(line: &str) -> Option<u32> {
    line.strip_prefix("@@")?.strip_suffix("@@")?.parse().ok()
}

/// Splits `rpmspec` output produced with [`query_format`] into packages.
///
/// Lines outside a record (rpmspec warnings) are ignored.
fn parse_query_output(output: &str) -> ParsedSpec {
    let mut packages = Vec::new();
    let mut header = SpecHeader::default();
    let mut current: Option<(u32, Vec<&str>)> = None;
    let mut in_record = false;

    for line in output.lines() {
        if line == RECORD_END {
            if let Some((tag, lines)) = current.take() {
                header.insert(tag, lines.join("\n"));
            }
            packages.push(SpecPackage {
                header: std::mem::take(&mut header),
            });
            in_record = false;
        } else if let Some(tag) = tag_marker(line) {
            if let Some((previous, lines)) = current.take() {
                header.insert(previous, lines.join("\n"));
            }
            current = Some((tag, Vec::new()));
            in_record = true;
        } else if in_record {
            if let Some((_, lines)) = current.as_mut() {
                lines.push(line);
            }
        }
    }

    ParsedSpec { packages }
}
