// ABOUTME: Terminal rendering of build state snapshots
// ABOUTME: Streams categorized log lines under an indicatif progress bar until ready or failed

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use webforge_builder::{BuildOrchestrator, LogCategory, LogEntry};
use webforge_preview::{BaseView, PreviewSurface, Rendering};

fn format_entry(entry: &LogEntry) -> String {
    match entry.category {
        LogCategory::Install => format!("  {}", entry.message.dimmed()),
        LogCategory::Devserver => format!("  {}", entry.message.cyan()),
        LogCategory::Success => format!("{} {}", "✔".green(), entry.message.green()),
        LogCategory::Error => format!("{} {}", "✖".red(), entry.message.red()),
    }
}

/// Render build snapshots until the cycle reaches a terminal view.
///
/// Returns the live endpoint on success, `None` when the build failed
/// (the error banner has already been printed).
pub async fn render_build(orchestrator: &BuildOrchestrator) -> Result<Option<String>> {
    let mut rx = orchestrator.subscribe();
    let mut surface = PreviewSurface::new();

    let bar = ProgressBar::new(100);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos:>3}% {msg}",
    )?);

    let mut next_sequence: u64 = 0;
    loop {
        let state = rx.borrow_and_update().clone();

        for entry in state.logs.since(next_sequence) {
            next_sequence = entry.sequence + 1;
            bar.println(format_entry(entry));
        }
        bar.set_position(state.progress as u64);
        bar.set_message(state.phase.as_str().to_string());

        match surface.render(&state) {
            Rendering {
                overlay: Some(message),
                ..
            } => {
                bar.abandon();
                eprintln!();
                eprintln!("{} {}", "✖".red().bold(), message.red().bold());
                eprintln!("{}", "The build failed; the log above has the details.".red());
                return Ok(None);
            }
            Rendering {
                base: BaseView::Live { endpoint },
                ..
            } => {
                bar.finish_and_clear();
                println!();
                println!(
                    "{} {}",
                    "Preview running at".green().bold(),
                    endpoint.underline()
                );
                return Ok(Some(endpoint));
            }
            _ => {}
        }

        if rx.changed().await.is_err() {
            // Orchestrator dropped mid-cycle; nothing more will arrive.
            bar.abandon();
            return Ok(None);
        }
    }
}
