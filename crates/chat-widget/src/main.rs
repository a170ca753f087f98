//! A terminal front-end for the chat widget.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use chat_widget::core::{SendOutcome, Transcript, WidgetConfigBuilder};
use chat_widget::protocol::MessageEntry;
use chat_widget::{Session, SessionBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;

enum SessionEvent {
    Entry(MessageEntry),
    Typing(bool),
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(endpoint_url) = env::var("CHAT_WIDGET_ENDPOINT") else {
        eprintln!("CHAT_WIDGET_ENDPOINT environment variable is not set");
        return;
    };

    let mut config = WidgetConfigBuilder::new();
    if let Ok(key) = env::var("CHAT_WIDGET_STORAGE_KEY") {
        config = config.with_storage_key(key);
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut builder = SessionBuilder::with_endpoint_url(endpoint_url)
        .with_config(config.build())
        .on_entry({
            let event_tx = event_tx.clone();
            move |entry| {
                event_tx.send(SessionEvent::Entry(entry.clone())).ok();
            }
        })
        .on_typing({
            let event_tx = event_tx.clone();
            move |typing| {
                event_tx.send(SessionEvent::Typing(typing)).ok();
            }
        });
    if let Ok(dir) = env::var("CHAT_WIDGET_STORAGE_DIR") {
        builder = builder.with_storage_dir(dir);
    }
    let mut session = match builder.build() {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    print_transcript(&session.history());

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut progress_bar = None;

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim();

        match line {
            "/quit" => break,
            "/history" => {
                print_transcript(&session.history());
                continue;
            }
            "/clear" => {
                session.clear_history();
            }
            _ => {
                if let Some(url) = line.strip_prefix("/endpoint ") {
                    session.set_endpoint_url(url.trim());
                    println!("Endpoint: {}", session.endpoint_url());
                    continue;
                }
                send(
                    &session,
                    line,
                    &mut event_rx,
                    &mut progress_bar,
                    &progress_style,
                )
                .await;
            }
        }

        // Flush whatever the last command produced.
        while let Ok(event) = event_rx.try_recv() {
            handle_event(event, &mut progress_bar, &progress_style);
        }
    }
}

async fn send(
    session: &Session,
    line: &str,
    event_rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
    progress_bar: &mut Option<ProgressBar>,
    progress_style: &ProgressStyle,
) {
    let send = session.send_message(line);
    tokio::pin!(send);

    loop {
        select! {
            outcome = &mut send => {
                if outcome == SendOutcome::Ignored {
                    debug!("nothing sent");
                }
                break;
            }
            event = event_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                handle_event(event, progress_bar, progress_style);
            }
        }
    }
}

fn handle_event(
    event: SessionEvent,
    progress_bar: &mut Option<ProgressBar>,
    progress_style: &ProgressStyle,
) {
    match event {
        SessionEvent::Typing(true) => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(progress_style.clone());
            bar.set_message("💬 Typing...");
            bar.enable_steady_tick(Duration::from_millis(100));
            *progress_bar = Some(bar);
        }
        SessionEvent::Typing(false) => {
            // Finish the progress bar before printing anything else.
            if let Some(bar) = progress_bar.take() {
                bar.finish_and_clear();
            }
        }
        SessionEvent::Entry(entry) => {
            // The user already sees what they typed.
            if entry.is_user() {
                return;
            }
            if let Some(bar) = progress_bar.as_ref() {
                bar.suspend(|| print_entry(&entry));
            } else {
                print_entry(&entry);
            }
        }
    }
}

fn print_transcript(transcript: &Transcript) {
    for entry in transcript {
        print_entry(entry);
    }
}

fn print_entry(entry: &MessageEntry) {
    let time = entry.timestamp().format("%H:%M");
    if entry.is_user() {
        println!("{} {}", time.dimmed(), entry.text().bright_white());
    } else {
        println!(
            "{}{} 🤖 {}",
            BAR_CHAR.bright_cyan(),
            time.dimmed(),
            entry.text().bright_white()
        );
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
