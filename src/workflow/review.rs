use std::path::PathBuf;

use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::build::{build_comment, extract_task_reference};
use crate::domain::package::extract_metadata;
use crate::domain::review::{ReviewInfo, compose_urls};
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub spec_path: PathBuf,
    pub srpm_path: PathBuf,
    pub koji_target: String,
    pub scratch_build: bool,
}

pub struct ReviewWorkflowOutcome {
    pub ticket: Ticket,
    /// Koji task linked from the ticket, if a build ran and reported one.
    pub task_url: Option<String>,
}

pub async fn submit_review(
    ctx: &AppContext,
    input: ReviewInput,
) -> AppResult<ReviewWorkflowOutcome> {
    let spec = ctx.spec_parser.parse(&input.spec_path).await?;

    let build_output = if input.scratch_build {
        let result = ctx
            .build_service
            .scratch_build(&input.koji_target, &input.srpm_path)
            .await?;
        if !result.success() {
            return Err(AppError::Build {
                output: result.output,
            });
        }
        Some(result.output)
    } else {
        None
    };

    let metadata = extract_metadata(&spec)?;

    let upload = ctx
        .uploader
        .upload(
            &input.spec_path,
            &input.srpm_path,
            &ctx.settings.upload_target,
        )
        .await?;
    if !upload.success() {
        return Err(AppError::Upload {
            output: upload.output,
        });
    }

    let username = ctx.identity.resolve().await?;
    let urls = compose_urls(
        &username,
        &ctx.settings.upload_target,
        &input.spec_path,
        &input.srpm_path,
    )?;

    let review = ReviewInfo::new(metadata, urls);
    let ticket = ctx.review_tracker.create_review(&review).await?;
    info!(ticket = %ticket.url, "review created");

    let task_url = match build_output {
        Some(output) => add_build_comment(ctx, &ticket, &output).await?,
        None => None,
    };

    Ok(ReviewWorkflowOutcome { ticket, task_url })
}

/// Links the Koji task from the ticket. Skipped when the output names no task.
async fn add_build_comment(
    ctx: &AppContext,
    ticket: &Ticket,
    build_output: &str,
) -> AppResult<Option<String>> {
    let Some(task_url) = extract_task_reference(build_output) else {
        warn!(
            ticket = ticket.id,
            "koji output has no task info line; not adding a build comment"
        );
        return Ok(None);
    };

    info!(%task_url, "Adding comment about the koji build");
    ctx.review_tracker
        .add_comment(ticket, &build_comment(&task_url))
        .await?;
    Ok(Some(task_url))
}
