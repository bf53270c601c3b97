//! Terminal rendering of workflow state and events.
//!
//! `render_*` functions are pure: they turn a `SessionView` into text.
//! `ConsoleObserver` prints workflow events as they happen.

use colored::Colorize;

use storydoc_core::{
    GeneratedDocument, SessionView, UploadChannel, UploadStatus, WorkflowEvent, WorkflowObserver,
};

const PROGRESS_WIDTH: usize = 20;

/// Prints workflow events to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

impl WorkflowObserver for ConsoleObserver {
    fn notify(&self, event: &WorkflowEvent) {
        match event {
            WorkflowEvent::UploadStarted { channel, .. } => {
                println!("{}", format!("Uploading {channel}...").bright_black());
            }
            WorkflowEvent::FileUploaded { filename, .. } => {
                println!("{}", format!("Successfully uploaded {filename}!").green());
            }
            WorkflowEvent::Progress {
                completed, total, ..
            } => {
                println!("{}", progress_bar(*completed, *total).cyan());
            }
            WorkflowEvent::FileUploadFailed {
                filename, detail, ..
            } => {
                eprintln!("{}", format!("Error uploading {filename}: {detail}").red());
            }
            WorkflowEvent::BatchAborted {
                channel,
                filename,
                skipped,
            } => {
                let message = match channel {
                    UploadChannel::UserStories => format!(
                        "Failed to upload {filename}. Aborting remaining uploads ({skipped} skipped)."
                    ),
                    UploadChannel::DatabaseSchema => {
                        "Failed to process database schema.".to_string()
                    }
                };
                eprintln!("{}", message.red());
            }
            WorkflowEvent::BatchCompleted { channel } => {
                let message = match channel {
                    UploadChannel::UserStories => "All user stories processed.",
                    UploadChannel::DatabaseSchema => "Database schema processed.",
                };
                println!("{}", message.bright_green());
            }
            WorkflowEvent::GenerationStarted => {
                println!("{}", "Generating document... Please wait.".bright_black());
            }
            WorkflowEvent::GenerationSucceeded { filename } => {
                println!(
                    "{}",
                    format!("Document generated successfully! ({filename})").bright_green()
                );
            }
            WorkflowEvent::GenerationFailed { message } => {
                eprintln!("{}", message.red());
            }
        }
    }
}

pub fn progress_bar(completed: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        (completed.min(total) * PROGRESS_WIDTH) / total
    };
    format!(
        "[{}{}] {completed}/{total}",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

pub fn render_greeting(view: &SessionView) -> String {
    format!("Hello, {}!", view.display_name)
}

fn status_label(status: UploadStatus) -> &'static str {
    match status {
        UploadStatus::Processed => "✔️ Processed",
        UploadStatus::Pending => "❌ Pending",
    }
}

/// Upload status panel, selections and generate availability.
pub fn render_status(view: &SessionView) -> String {
    let mut lines = vec![
        "Upload Status:".to_string(),
        format!("User Stories: {}", status_label(view.user_stories)),
        format!("Database Schema: {}", status_label(view.schema)),
    ];

    if !view.selected_user_stories.is_empty() {
        lines.push(format!(
            "Selected stories: {}",
            view.selected_user_stories.join(", ")
        ));
    }
    if let Some(schema) = &view.selected_schema {
        lines.push(format!("Selected schema: {schema}"));
    }

    lines.push(if view.generate_enabled {
        "Generate: enabled".to_string()
    } else {
        "Generate: disabled (upload user stories and a schema first)".to_string()
    });

    if let Some(document) = &view.generated {
        lines.push(format!("Generated document: {}", document.filename));
    }

    lines.join("\n")
}

pub fn render_preview(document: &GeneratedDocument) -> String {
    format!(
        "--- Generated Document Preview ({}, {}) ---\n{}\n---",
        document.filename,
        document.content_type(),
        document.content
    )
}
