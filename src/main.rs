mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use std::sync::Arc;

use clap::Parser;
use tracing::debug;

use crate::cmd::review::{self, ReviewCommandArgs};
use crate::config::ConfigStore;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::bugzilla::BugzillaClient;
use crate::infra::identity::identity_chain;
use crate::infra::koji::KojiCli;
use crate::infra::rpmspec::RpmSpecCli;
use crate::infra::scp::ScpUploader;

#[derive(Parser)]
#[command(
    name = "fedora-create-review",
    author,
    version,
    about = "File a Fedora package review request on Bugzilla"
)]
struct Cli {
    /// Path to the spec file.
    specfile: String,
    /// Path to the src.rpm file.
    srpmfile: String,
    /// FAS username.
    #[arg(long = "user")]
    username: Option<String>,
    /// Target for the koji scratch build.
    #[arg(long, default_value = "rawhide")]
    koji_target: String,
    /// Do not run the koji scratch build.
    #[arg(long)]
    no_scratch_build: bool,
    /// Output debugging info.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let store = ConfigStore::user()?;
    let settings = store.load()?;
    debug!(
        path = %store.path().display(),
        upload_target = %settings.upload_target,
        "settings loaded"
    );

    let identity = identity_chain(cli.username.as_deref());
    debug!(resolvers = ?identity.names(), "identity resolution order");
    let review_tracker = Arc::new(BugzillaClient::new(
        settings.bugzilla_url.clone(),
        settings.api_key.clone(),
    ));

    let context = AppContext::new(
        settings,
        Arc::new(RpmSpecCli::new()),
        Arc::new(KojiCli::new()),
        Arc::new(ScpUploader::new()),
        identity,
        review_tracker,
    );

    let outcome = review::run(
        &context,
        ReviewCommandArgs {
            specfile: cli.specfile,
            srpmfile: cli.srpmfile,
            koji_target: cli.koji_target,
            no_scratch_build: cli.no_scratch_build,
        },
    )
    .await?;

    println!("Review created at: {}", outcome.ticket.url);
    println!("{}", outcome.ticket);
    if let Some(task_url) = &outcome.task_url {
        println!("Scratch build: {task_url}");
    }

    Ok(())
}
