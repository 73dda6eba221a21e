use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use vision_chat_backend::services::{
    camera::FileDevices,
    capture::ClientSession,
    chat_log::{ChatEntry, ChatLog},
    relay_client::RelayClient,
};

/// Captures frames from image-file cameras and shows the relay's replies.
#[derive(Parser, Debug)]
#[command(name = "capture-client")]
struct Args {
    /// Base URL of the relay.
    #[arg(long, default_value = "http://localhost:3000")]
    relay_url: String,

    /// Image file acting as the front-facing camera.
    #[arg(long)]
    front: Option<PathBuf>,

    /// Image file acting as the back-facing camera.
    #[arg(long)]
    back: Option<PathBuf>,

    /// Keep at most this many log entries.
    #[arg(long)]
    capacity: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let log = match args.capacity {
        Some(cap) => ChatLog::with_capacity(cap),
        None => ChatLog::new(),
    };
    let mut session = ClientSession::new(
        FileDevices::new(args.front, args.back),
        RelayClient::new(&args.relay_url),
        log,
    );

    let mut loading = session.loading_indicator();
    tokio::spawn(async move {
        while loading.changed().await.is_ok() {
            if *loading.borrow_and_update() {
                println!("waiting for reply...");
            }
        }
    });

    session.initialize();
    print_log(&session.log().entries().collect::<Vec<_>>());
    println!("commands: capture | switch | log | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let before = session.log().appended();
        match line.trim() {
            "c" | "capture" => {
                session.capture_and_submit().await;
            }
            "s" | "switch" => {
                let facing = session.switch_camera();
                println!("camera: {}", facing.as_str());
            }
            "l" | "log" => {
                print_log(&session.log().entries().collect::<Vec<_>>());
                continue;
            }
            "q" | "quit" => break,
            "" => continue,
            other => {
                println!("unknown command: {}", other);
                continue;
            }
        }

        let added = (session.log().appended() - before) as usize;
        let fresh: Vec<_> = session.log().entries().take(added).collect();
        print_log(&fresh);
    }

    Ok(())
}

fn print_log(entries: &[&ChatEntry]) {
    for entry in entries {
        let tag = if entry.is_error() { "error" } else { "assistant" };
        println!("[{}] {}: {}", entry.time_label(), tag, entry.text);
    }
}
