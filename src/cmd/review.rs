use crate::config::expand_tilde;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::review::{ReviewInput, ReviewWorkflowOutcome, submit_review};

#[derive(Debug, Clone)]
pub struct ReviewCommandArgs {
    pub specfile: String,
    pub srpmfile: String,
    pub koji_target: String,
    pub no_scratch_build: bool,
}

pub async fn run(ctx: &AppContext, args: ReviewCommandArgs) -> AppResult<ReviewWorkflowOutcome> {
    let input = ReviewInput {
        spec_path: expand_tilde(&args.specfile),
        srpm_path: expand_tilde(&args.srpmfile),
        koji_target: args.koji_target,
        scratch_build: !args.no_scratch_build,
    };
    submit_review(ctx, input).await
}
