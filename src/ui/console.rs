// Console front-end
//
// A line-based stand-in for the modeless window. Two halves:
// - a renderer task on the tokio runtime printing ViewChange events
// - the input loop on the calling thread turning lines into requests
//
// The input loop never waits for the host thread. While a request is in
// flight, everything except quit is answered with a busy notice.

use crate::models::RequestCode;
use crate::state::ViewChange;
use crate::ui::controller::{Coordinator, RequestError};
use anyhow::{Context, Result};
use std::io::BufRead;
use tokio::sync::{broadcast, watch};

const HELP: &str = "Commands: <n> show group n, l list groups, r rebuild catalog, q quit";

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(usize),
    List,
    Reload,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Ok(n) = line.parse::<usize>() {
            return Command::Select(n);
        }
        match line.to_ascii_lowercase().as_str() {
            "l" | "list" => Command::List,
            "r" | "reload" => Command::Reload,
            "" | "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Text printed for a view change, if any
pub fn render_change(change: &ViewChange) -> Option<String> {
    match change {
        ViewChange::GroupsLoaded { titles } if titles.is_empty() => {
            Some("No attribute groups found".to_string())
        }
        ViewChange::GroupsLoaded { titles } => Some(format!("Groups:\n  {}", titles.join("\n  "))),
        ViewChange::AttributesLoaded { attributes } if attributes.is_empty() => {
            Some("  (no attributes)".to_string())
        }
        ViewChange::AttributesLoaded { attributes } => Some(
            attributes
                .iter()
                .map(|a| format!("    {}", a))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        ViewChange::ControlsDisabled { request } => Some(format!("Working ({})...", request)),
        ViewChange::SelectionChanged { .. } | ViewChange::ControlsArmed => None,
    }
}

/// Reply printed for a command; `None` means quit.
pub fn handle_command(coordinator: &Coordinator, command: Command) -> Option<String> {
    let reply = match command {
        Command::Quit => return None,
        Command::Help => HELP.to_string(),
        Command::Unknown(text) => format!("Unknown command {:?}. {}", text, HELP),
        Command::List => {
            let view = coordinator.view().snapshot();
            render_change(&ViewChange::GroupsLoaded {
                titles: view.group_titles,
            })
            .unwrap_or_default()
        }
        Command::Reload => match coordinator.make_request(RequestCode::Initial) {
            Ok(()) => "Rebuilding catalog".to_string(),
            Err(e) => busy_reply(e),
        },
        Command::Select(n) => match coordinator.select_group(n) {
            Ok(title) => format!("{}:", title),
            Err(e) => busy_reply(e),
        },
    };
    Some(reply)
}

fn busy_reply(error: RequestError) -> String {
    match error {
        RequestError::Busy(_) => format!("{} (q to quit)", error),
        other => other.to_string(),
    }
}

/// Run the console until quit or end of input.
///
/// Issues the initial catalog request, as the window did when it opened.
pub fn run<R: BufRead>(
    coordinator: &Coordinator,
    runtime: &tokio::runtime::Handle,
    input: R,
) -> Result<()> {
    let (cancel_tx, mut cancel_rx) = watch::channel(false);
    let mut changes = coordinator.view().subscribe();

    let renderer = runtime.spawn(async move {
        loop {
            tokio::select! {
                change = changes.recv() => match change {
                    Ok(change) => {
                        if let Some(text) = render_change(&change) {
                            println!("{}", text);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Console renderer skipped {} view changes", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = cancel_rx.changed() => break,
            }
        }
    });

    coordinator
        .make_request(RequestCode::Initial)
        .context("Failed to request the initial catalog")?;
    println!("{}", HELP);

    for line in input.lines() {
        let line = line.context("Failed to read console input")?;
        match handle_command(coordinator, Command::parse(&line)) {
            Some(reply) => println!("{}", reply),
            None => break,
        }
    }

    let _ = cancel_tx.send(true);
    if let Err(e) = runtime.block_on(renderer) {
        tracing::warn!("Console renderer ended abnormally: {}", e);
    }

    Ok(())
}
