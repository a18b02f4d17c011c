use std::{fmt::Write as _, sync::Mutex};

use anyhow::Result;
use clap::Parser;
use client_core::{
    view::EMPTY_MESSAGE, ContentArea, HttpArticleSource, Navigation, PageController,
    PageSnapshot, PageView, PaginationControls,
};
use shared::domain::ContentItem;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const HELP: &str = "commands: n (next page), p (previous page), r (reload), q (quit)";

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    Reload,
    Quit,
    Help,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "r" | "reload" => Some(Self::Reload),
            "q" | "quit" | "exit" => Some(Self::Quit),
            "h" | "help" | "?" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Prints snapshots and remembers which controls the last shown bar offered.
#[derive(Default)]
struct TerminalView {
    shown_controls: Mutex<Option<PaginationControls>>,
}

impl TerminalView {
    /// Whether `command` targets a control that is hidden or disabled.
    fn blocks(&self, command: Command) -> bool {
        let shown = match self.shown_controls.lock() {
            Ok(shown) => shown,
            Err(poisoned) => poisoned.into_inner(),
        };
        match (command, shown.as_ref()) {
            (Command::Next | Command::Previous, None) => true,
            (Command::Next, Some(controls)) => controls.next_disabled,
            (Command::Previous, Some(controls)) => controls.previous_disabled,
            _ => false,
        }
    }
}

impl PageView for TerminalView {
    fn render(&self, snapshot: &PageSnapshot) {
        let mut shown = match self.shown_controls.lock() {
            Ok(shown) => shown,
            Err(poisoned) => poisoned.into_inner(),
        };
        *shown = snapshot
            .pagination_visible
            .then(|| snapshot.controls.clone());
        println!("{}", render_snapshot(snapshot).trim_end());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();

    let source = HttpArticleSource::new(&args.server_url)?;
    info!(endpoint = %source.endpoint(), "browsing articles");
    let controller = PageController::new(source, TerminalView::default());
    controller.initialize().await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = Command::parse(&line);
        if command.is_some_and(|command| controller.view().blocks(command)) {
            println!("nothing to do");
            continue;
        }
        let outcome = match command {
            Some(Command::Next) => controller.go_to_next_page().await,
            Some(Command::Previous) => controller.go_to_previous_page().await,
            Some(Command::Reload) => controller.reload().await,
            Some(Command::Quit) => break,
            Some(Command::Help) | None => {
                println!("{HELP}");
                continue;
            }
        };
        if outcome == Navigation::Ignored {
            println!("nothing to do");
        }
    }

    Ok(())
}

fn render_snapshot(snapshot: &PageSnapshot) -> String {
    let mut out = String::new();
    if snapshot.spinner_visible {
        let _ = writeln!(out, "loading page {}...", snapshot.current_page);
    }

    match &snapshot.content {
        ContentArea::Cleared => {}
        ContentArea::Cards(items) => {
            for (index, item) in items.iter().enumerate() {
                out.push_str(&render_card(index + 1, item));
            }
        }
        ContentArea::Empty => {
            let _ = writeln!(out, "{EMPTY_MESSAGE}");
        }
        ContentArea::Error(message) => {
            let _ = writeln!(out, "error: {message}");
        }
    }

    if snapshot.pagination_visible {
        let controls = &snapshot.controls;
        let previous = if controls.previous_disabled { "   " } else { "[p]" };
        let next = if controls.next_disabled { "   " } else { "[n]" };
        let _ = writeln!(out, "{previous} {} {next}", controls.label);
    }
    out
}

fn render_card(number: usize, item: &ContentItem) -> String {
    let mut card = String::new();
    let _ = writeln!(card, "{number:>2}. {}", item.title);
    let _ = writeln!(
        card,
        "    category: {} | author: {} | published: {}",
        item.category, item.author, item.published_date
    );
    let _ = writeln!(card, "    image: {}", item.image_src());
    if let Some(url) = &item.source_url {
        let _ = writeln!(card, "    read: {url}");
    }
    card
}
