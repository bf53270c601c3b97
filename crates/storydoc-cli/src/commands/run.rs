use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use storydoc_application::{CompositeObserver, TracingObserver, WorkflowController};
use storydoc_core::{Session, UploadChannel};
use storydoc_infrastructure::{load_file, load_selection, save_document};
use storydoc_interaction::HttpGateway;

use crate::presenter::{ConsoleObserver, render_greeting, render_preview, render_status};

pub struct RunArgs {
    pub name: String,
    pub stories: Vec<PathBuf>,
    pub schema: PathBuf,
    pub output: PathBuf,
    pub preview: bool,
}

/// Runs the whole workflow once: upload stories, upload schema, generate,
/// save.
pub async fn run(gateway: Arc<HttpGateway>, args: RunArgs) -> Result<()> {
    let stories = load_selection(UploadChannel::UserStories, &args.stories)
        .await
        .context("Failed to read user story files")?;
    let schema = load_file(UploadChannel::DatabaseSchema, &args.schema)
        .await
        .context("Failed to read database schema file")?;

    let observer = CompositeObserver::new()
        .with(Arc::new(ConsoleObserver))
        .with(Arc::new(TracingObserver));
    let mut controller = WorkflowController::new(Session::new(), gateway.clone(), gateway)
        .with_observer(Arc::new(observer));
    controller.set_user_name(args.name);
    println!("{}", render_greeting(&controller.view()).bright_magenta().bold());

    controller.on_user_stories_selected(stories).await;
    controller.on_schema_selected(schema).await;
    println!("{}", render_status(&controller.view()));

    let Some(trigger) = controller.generate_trigger() else {
        bail!("Generate is disabled: user stories and database schema must both upload successfully");
    };
    let document = trigger.fire().await?;

    if args.preview {
        println!("{}", render_preview(&document));
    }
    let path = save_document(&document, &args.output)
        .await
        .context("Failed to save generated document")?;
    println!("{}", format!("Saved {}", path.display()).bright_green());

    Ok(())
}
