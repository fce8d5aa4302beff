use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command};
use repsync::pose::PoseFrame;
use repsync::{FrameSource, Result, RoomSession, SessionConfig, SyncError, WsConnector};
use std::path::PathBuf;
use std::process;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio_util::sync::CancellationToken;

/// Recorded landmarks, one JSON `PoseFrame` (or `null`) per line and tick
struct ReplayFrames {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    finished: CancellationToken,
}

impl ReplayFrames {
    fn new(path: PathBuf, finished: CancellationToken) -> Self {
        Self {
            path,
            lines: None,
            finished,
        }
    }
}

#[async_trait]
impl FrameSource for ReplayFrames {
    async fn start(&mut self) -> Result<()> {
        let file = File::open(&self.path)
            .await
            .map_err(|e| SyncError::CameraInit(format!("{}: {}", self.path.display(), e)))?;
        self.lines = Some(BufReader::new(file).lines());
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<PoseFrame>> {
        let Some(lines) = self.lines.as_mut() else {
            return Err(SyncError::Frame("replay not started".to_string()));
        };

        match lines.next_line().await? {
            Some(line) => {
                let line = line.trim();
                if line.is_empty() || line == "null" {
                    return Ok(None);
                }
                serde_json::from_str(line)
                    .map(Some)
                    .map_err(|e| SyncError::Frame(format!("bad replay line: {}", e)))
            }
            None => {
                self.finished.cancel();
                Ok(None)
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        self.lines = None;
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let matches = Command::new("repsync")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("room")
                .long("room")
                .value_name("CODE")
                .help("Room code (e.g. ABCD)")
                .required(true),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Display name shown on the leaderboard")
                .required(true),
        )
        .arg(
            Arg::new("replay")
                .long("replay")
                .value_name("FILE")
                .help("JSON lines of recorded pose frames")
                .required(true),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .value_name("URL")
                .help("Room server base URL, overrides the config file"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON session config"),
        )
        .get_matches();

    if let Err(e) = run(&matches).await {
        log::error!("{}", e);
        process::exit(1);
    }
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(server) = matches.get_one::<String>("server") {
        config.server_url = server.clone();
    }

    let arg = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();
    let room = arg("room");
    let name = arg("name");

    let cancel = CancellationToken::new();
    let frames = ReplayFrames::new(PathBuf::from(arg("replay")), cancel.clone());
    let mut session = RoomSession::new(&config, &room, &name, WsConnector, frames)?;
    session.start().await?;

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let outcome = session.run(cancel).await;

    let state = session.room_state();
    println!("Room {} - you counted {} reps", session.room(), session.count());
    for (rank, player) in state.ranked().iter().enumerate() {
        let crown = if state.is_winner(&player.id) { " (winner)" } else { "" };
        println!("{:>2}. {:<16} {}{}", rank + 1, player.name, player.count, crown);
    }

    outcome
}
