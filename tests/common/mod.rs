//! In-process room peer speaking the wire protocol, plus a scripted frame
//! source. Mirrors the room server's behavior: full-snapshot broadcasts,
//! first player to reach the target wins.

#![allow(dead_code)]

use async_trait::async_trait;
use repsync::client::{Connector, Transport};
use repsync::pose::{Point2, PoseFrame};
use repsync::protocol::{decode_client_message, encode_server_message, ClientMessage, Player, ServerMessage};
use repsync::{FrameSource, Result, SyncError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

struct Member {
    player: Player,
    tx: UnboundedSender<String>,
}

struct Room {
    code: String,
    target: u32,
    members: Vec<Member>,
    winner: Option<Player>,
    updates: Vec<(String, u32)>,
}

impl Room {
    fn leaderboard(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self.members.iter().map(|m| m.player.clone()).collect();
        players.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        players
    }

    fn broadcast(&mut self, message: &ServerMessage) {
        let text = encode_server_message(message).unwrap();
        self.members.retain(|m| m.tx.send(text.clone()).is_ok());
    }

    fn broadcast_raw(&mut self, text: &str) {
        self.members.retain(|m| m.tx.send(text.to_string()).is_ok());
    }

    fn remove(&mut self, id: &str) {
        let before = self.members.len();
        self.members.retain(|m| m.player.id != id);
        if self.members.len() != before {
            let leave = ServerMessage::Leave {
                room: self.code.clone(),
                players: self.leaderboard(),
            };
            self.broadcast(&leave);
        }
        if self.members.is_empty() {
            self.winner = None;
        }
    }

    fn update(&mut self, id: &str, count: u32) {
        let Some(member) = self.members.iter_mut().find(|m| m.player.id == id) else {
            return;
        };
        member.player.count = count;
        let player = member.player.clone();
        self.updates.push((player.name.clone(), count));

        if self.winner.is_some() {
            return;
        }
        let message = if count >= self.target {
            self.winner = Some(player.clone());
            ServerMessage::Stop {
                room: self.code.clone(),
                winner: player,
                players: self.leaderboard(),
            }
        } else {
            ServerMessage::Leaderboard {
                room: self.code.clone(),
                players: self.leaderboard(),
            }
        };
        self.broadcast(&message);
    }
}

#[derive(Clone)]
pub struct RoomHub {
    room: Arc<Mutex<Room>>,
}

impl RoomHub {
    pub fn new(code: &str, target: u32) -> Self {
        Self {
            room: Arc::new(Mutex::new(Room {
                code: code.to_string(),
                target,
                members: Vec::new(),
                winner: None,
                updates: Vec::new(),
            })),
        }
    }

    pub fn players(&self) -> Vec<Player> {
        self.room.lock().unwrap().leaderboard()
    }

    pub fn player_id(&self, name: &str) -> Option<String> {
        self.players().into_iter().find(|p| p.name == name).map(|p| p.id)
    }

    pub fn winner(&self) -> Option<Player> {
        self.room.lock().unwrap().winner.clone()
    }

    /// Counts received from `name`, in arrival order
    pub fn updates_from(&self, name: &str) -> Vec<u32> {
        self.room
            .lock()
            .unwrap()
            .updates
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, c)| *c)
            .collect()
    }

    /// Server-side close of `name`'s connection
    pub fn disconnect(&self, name: &str) {
        if let Some(id) = self.player_id(name) {
            self.room.lock().unwrap().remove(&id);
        }
    }

    /// Send a raw frame to every member
    pub fn inject(&self, text: &str) {
        self.room.lock().unwrap().broadcast_raw(text);
    }
}

pub struct HubTransport {
    room: Arc<Mutex<Room>>,
    id: String,
    rx: UnboundedReceiver<String>,
}

#[async_trait]
impl Transport for HubTransport {
    async fn send(&mut self, text: String) -> Result<()> {
        let mut room = self.room.lock().unwrap();
        if !room.members.iter().any(|m| m.player.id == self.id) {
            return Err(SyncError::Transport("connection closed".to_string()));
        }
        // the server ignores frames it cannot parse
        if let Ok(ClientMessage::Update { count }) = decode_client_message(&text) {
            room.update(&self.id, count);
        }
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        self.rx.recv().await.map(Ok)
    }

    async fn close(&mut self) -> Result<()> {
        self.room.lock().unwrap().remove(&self.id);
        self.rx.close();
        Ok(())
    }
}

#[async_trait]
impl Connector for RoomHub {
    type Transport = HubTransport;

    async fn connect(&self, endpoint: &Url) -> Result<HubTransport> {
        let code = endpoint
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string();
        let name = endpoint
            .query_pairs()
            .find(|(key, _)| key == "name")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| "Player".to_string());

        let mut room = self.room.lock().unwrap();
        if code != room.code {
            return Err(SyncError::Transport(format!("no room {}", code)));
        }

        let id = Uuid::new_v4().to_string()[..8].to_string();
        let (tx, rx) = unbounded_channel();
        room.members.push(Member {
            player: Player {
                id: id.clone(),
                name,
                count: 0,
            },
            tx: tx.clone(),
        });

        let join = ServerMessage::Join {
            room: room.code.clone(),
            players: room.leaderboard(),
        };
        room.broadcast(&join);

        if let Some(winner) = room.winner.clone() {
            let stop = ServerMessage::Stop {
                room: room.code.clone(),
                winner,
                players: room.leaderboard(),
            };
            let _ = tx.send(encode_server_message(&stop).unwrap());
        }

        Ok(HubTransport {
            room: Arc::clone(&self.room),
            id,
            rx,
        })
    }
}

/// Frame whose right elbow angle is `degrees`
pub fn arm_frame(degrees: f64) -> PoseFrame {
    let elbow = Point2::new(0.5, 0.5);
    let shoulder = Point2::new(0.5, 0.3);
    let theta = degrees.to_radians();
    let wrist = Point2::new(elbow.x + 0.2 * theta.sin(), elbow.y - 0.2 * theta.cos());

    let mut landmarks = vec![Point2::new(0.5, 0.5); 33];
    landmarks[12] = shoulder;
    landmarks[14] = elbow;
    landmarks[16] = wrist;

    PoseFrame {
        timestamp: Duration::ZERO,
        width: 1000,
        height: 1000,
        landmarks,
    }
}

/// One scripted tick: a detection result, or a failed acquisition
enum Scripted {
    Frame(Option<PoseFrame>),
    Fail,
}

/// Scripted camera: replays queued detections, then reports nothing
pub struct ScriptedFrames {
    frames: VecDeque<Scripted>,
    pub fail_start: bool,
    pub fail_stop: bool,
    stopped: Arc<AtomicBool>,
    on_exhausted: Option<CancellationToken>,
}

impl ScriptedFrames {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
            fail_start: false,
            fail_stop: false,
            stopped: Arc::new(AtomicBool::new(false)),
            on_exhausted: None,
        }
    }

    /// Cancel `token` once every queued frame was consumed
    pub fn cancel_when_done(mut self, token: CancellationToken) -> Self {
        self.on_exhausted = Some(token);
        self
    }

    pub fn push_angles(&mut self, angles: &[f64]) {
        self.frames.extend(angles.iter().map(|a| Scripted::Frame(Some(arm_frame(*a)))));
    }

    pub fn push_frame(&mut self, frame: Option<PoseFrame>) {
        self.frames.push_back(Scripted::Frame(frame));
    }

    /// Queue a tick whose frame cannot be acquired
    pub fn push_failure(&mut self) {
        self.frames.push_back(Scripted::Fail);
    }

    /// Queue `n` full reps, with a frame lacking a detection between each
    pub fn push_reps(&mut self, n: usize) {
        for _ in 0..n {
            self.push_angles(&[175.0, 50.0, 170.0]);
            self.push_frame(None);
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn stopped_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }
}

#[async_trait]
impl FrameSource for ScriptedFrames {
    async fn start(&mut self) -> Result<()> {
        if self.fail_start {
            return Err(SyncError::CameraInit("no camera attached".to_string()));
        }
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<PoseFrame>> {
        match self.frames.pop_front() {
            Some(Scripted::Frame(frame)) => Ok(frame),
            Some(Scripted::Fail) => Err(SyncError::Frame("dropped frame".to_string())),
            None => {
                if let Some(token) = &self.on_exhausted {
                    token.cancel();
                }
                Ok(None)
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        self.stopped.store(true, Ordering::SeqCst);
        if self.fail_stop {
            return Err(SyncError::Frame("device busy".to_string()));
        }
        Ok(())
    }
}

pub fn stopped(flag: &Arc<AtomicBool>) -> bool {
    flag.load(Ordering::SeqCst)
}
