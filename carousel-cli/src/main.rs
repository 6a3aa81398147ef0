//! Carousel CLI - interactive terminal demo.
//!
//! Runs a paged 12-item list against a console responder: rendered frames
//! print to stdout and typed commands (first, back, next, last, stop)
//! become control events, the same way button presses would on a real
//! chat platform.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use carousel_core::{
    ControlButton, ControlEvent, ExpireMode, MessageCreate, MessageUpdate, PageContent, PagePayload,
    Paginator, Responder, Session, TransportResult,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const PAGE_SIZE: usize = 5;
const ACTOR: &str = "console";

/// Responder that draws rendered frames on stdout.
struct ConsoleResponder;

impl ConsoleResponder {
    fn draw(payload: &PagePayload, controls: &[ControlButton]) {
        println!();
        if let Some(title) = &payload.title {
            println!("== {title} ==");
        }
        if let Some(body) = &payload.body {
            println!("{body}");
        }
        println!("{}", payload.footer);

        let row: Vec<String> = controls
            .iter()
            .map(|button| {
                let face = button
                    .emoji
                    .clone()
                    .or_else(|| button.label.clone())
                    .unwrap_or_else(|| button.action.as_str().to_string());
                if button.disabled {
                    format!("( {face} )")
                } else {
                    format!("[ {face} ]")
                }
            })
            .collect();
        println!("{}", row.join(" "));
    }
}

#[async_trait]
impl Responder for ConsoleResponder {
    async fn respond_create(&self, message: MessageCreate) -> TransportResult<()> {
        Self::draw(&message.payload, &message.controls);
        Ok(())
    }

    async fn respond_update(&self, message: MessageUpdate) -> TransportResult<()> {
        Self::draw(&message.payload, &message.controls);
        Ok(())
    }

    async fn send_ephemeral(&self, text: &str) -> TransportResult<()> {
        println!("(only visible to you) {text}");
        Ok(())
    }

    async fn clear_controls(&self) -> TransportResult<()> {
        println!("[controls removed]");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().compact().with_env_filter(filter).init();

    tracing::info!("Carousel CLI v{}", env!("CARGO_PKG_VERSION"));

    let paginator = Paginator::default();
    let sweeper = paginator.spawn_sweeper();
    let responder = Arc::new(ConsoleResponder);

    let items: Vec<String> = (1..=12).map(|i| format!("Item {i}")).collect();
    let page_count = items.len().div_ceil(PAGE_SIZE);

    let session_id = uuid::Uuid::new_v4().to_string();
    let session = Session::new(&session_id, page_count, move |page: usize| {
        let start = page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(items.len());
        PageContent::new()
            .with_title(format!("Page {}", page + 1))
            .with_body(items[start..end].join("\n"))
    })
    .with_owner(ACTOR)
    .with_expire_mode(ExpireMode::AfterLastUsage);

    paginator
        .create_session(responder.as_ref(), session, false)
        .await
        .context("failed to send the initial page")?;

    println!();
    println!("Commands: first, back, next, last, stop, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = line.trim().to_lowercase();
                if command.is_empty() {
                    continue;
                }
                if command == "quit" || command == "exit" {
                    break;
                }
                if !matches!(command.as_str(), "first" | "back" | "next" | "last" | "stop") {
                    println!("Unknown command: {command}");
                    continue;
                }

                let event = ControlEvent::new(format!("carousel:{session_id}:{command}"))
                    .with_actor(ACTOR);
                paginator.handle_control_event(responder.as_ref(), &event).await;

                if command == "stop" {
                    break;
                }
            }
        }
    }

    sweeper.shutdown().await;
    tracing::info!("Carousel CLI stopped");
    Ok(())
}
