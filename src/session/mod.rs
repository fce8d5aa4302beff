//! Room session - one participant in one room
//!
//! Single owner of everything a participant needs while a room view is open:
//! the frame source, the rep detector, the sync client and the cached room
//! state. Two sources drive it on one task: the detection tick and socket
//! arrival. Nothing is shared, so nothing is locked.

use crate::client::{ClientEvent, ConnectionState, Connector, SyncClient};
use crate::config::SessionConfig;
use crate::error::{Result, SyncError};
use crate::pose::{AngleSample, JointIndices, PoseFrame};
use crate::protocol::ServerMessage;
use crate::reps::{RepDetector, RepEvent, RepStage};
use crate::room::{RoomState, SessionPhase};
use crate::RoomCode;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Camera plus pose estimator, supplying one detection per tick
#[async_trait]
pub trait FrameSource: Send {
    /// Bring up the camera and the inference engine.
    ///
    /// Fails with [`SyncError::CameraInit`] or [`SyncError::InferenceInit`].
    async fn start(&mut self) -> Result<()>;

    /// Landmarks for the current frame; `None` when no person was detected
    async fn next_frame(&mut self) -> Result<Option<PoseFrame>>;

    /// Release the camera
    async fn stop(&mut self) -> Result<()>;
}

pub struct RoomSession<C: Connector, F: FrameSource> {
    room: RoomCode,
    name: String,
    joints: JointIndices,
    tick_interval: Duration,
    detector: RepDetector,
    client: SyncClient<C>,
    frames: F,
    state: RoomState,
    origin: Instant,
    camera_live: bool,
    last_sample: Option<AngleSample>,
}

impl<C: Connector, F: FrameSource> RoomSession<C, F> {
    pub fn new(
        config: &SessionConfig,
        room: &str,
        name: &str,
        connector: C,
        frames: F,
    ) -> Result<Self> {
        config.validate()?;
        let client = SyncClient::new(connector, &config.server_url, config.throttler())?;

        Ok(Self {
            room: room.trim().to_uppercase(),
            name: name.to_string(),
            joints: config.joints,
            tick_interval: config.tick_interval(),
            detector: config.detector()?,
            client,
            frames,
            state: RoomState::new(),
            origin: Instant::now(),
            camera_live: false,
            last_sample: None,
        })
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> u32 {
        self.detector.count()
    }

    pub fn stage(&self) -> RepStage {
        self.detector.stage()
    }

    pub fn counting_enabled(&self) -> bool {
        self.detector.is_enabled()
    }

    pub fn room_state(&self) -> &RoomState {
        &self.state
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.client.state()
    }

    /// Most recent angle measured from a frame
    pub fn last_sample(&self) -> Option<AngleSample> {
        self.last_sample
    }

    /// Start the camera, then join the room.
    ///
    /// Frame source failures are fatal and keep their distinct error. If the
    /// room cannot be joined the camera is released again.
    pub async fn start(&mut self) -> Result<()> {
        self.frames.start().await.map_err(|e| {
            if e.is_init_failure() {
                e
            } else {
                SyncError::CameraInit(e.to_string())
            }
        })?;
        self.camera_live = true;
        self.origin = Instant::now();
        self.detector.reset();

        if let Err(e) = self.client.connect(&self.room, &self.name).await {
            if let Err(stop_err) = self.frames.stop().await {
                log::warn!("releasing frame source failed: {}", stop_err);
            }
            self.camera_live = false;
            return Err(e);
        }
        Ok(())
    }

    /// Rejoin after the connection dropped. The current count is sent on
    /// the next tick.
    pub async fn reconnect(&mut self) -> Result<()> {
        self.client.connect(&self.room, &self.name).await
    }

    /// Run one frame through angle estimation and the detector.
    ///
    /// No detection, or a missing joint, skips the frame without touching
    /// detector state.
    pub fn handle_frame(&mut self, frame: Option<&PoseFrame>) -> Option<RepEvent> {
        let sample = frame?.angle_sample(&self.joints)?;
        self.last_sample = Some(sample);
        self.detector.observe(sample.degrees)
    }

    /// Apply an inbound snapshot and follow lifecycle transitions
    pub fn handle_message(&mut self, message: ServerMessage) {
        log::debug!("{} snapshot with {} players", message.kind(), message.players().len());
        let previous = self.state.phase();
        self.state = self.state.apply(message);

        match (previous, self.state.phase()) {
            (SessionPhase::Open, SessionPhase::Stopped) => {
                if let Some(winner) = self.state.winner() {
                    log::info!("room {} stopped, winner {} ({})", self.room, winner.name, winner.count);
                }
                self.detector.disable();
            }
            (SessionPhase::Stopped, SessionPhase::Open) => {
                log::info!("room {} restarted", self.room);
                self.detector.reset();
                self.client.forget_sent();
            }
            (_, SessionPhase::Open) => self.detector.enable(),
            (_, SessionPhase::Stopped) => {}
        }
    }

    /// Hand the current count to the client while the room is open
    pub async fn publish(&mut self) -> Result<bool> {
        if !self.state.counting_enabled() {
            return Ok(false);
        }
        let now = self.origin.elapsed();
        self.client.publish(self.detector.count(), now).await
    }

    /// One detection tick: acquire a frame, detect, publish.
    ///
    /// Frame errors and failed sends are logged; the session keeps counting
    /// locally.
    pub async fn tick(&mut self) -> Option<RepEvent> {
        let frame = match self.frames.next_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("skipping tick: {}", e);
                None
            }
        };

        let event = self.handle_frame(frame.as_ref());
        if let Err(e) = self.publish().await {
            log::warn!("update not delivered: {}", e);
        }
        event
    }

    /// Wait for the next inbound event and apply it. Returns false once the
    /// connection has dropped.
    pub async fn pump(&mut self) -> bool {
        match self.client.next_event().await {
            ClientEvent::Message(message) => {
                self.handle_message(message);
                true
            }
            ClientEvent::Disconnected => {
                log::warn!("room {} disconnected, counting continues locally", self.room);
                false
            }
        }
    }

    /// Drive ticks and socket arrivals until `cancel` fires, then release
    /// everything.
    ///
    /// A tick whose inference overruns the interval delays the next one
    /// instead of queueing more.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.pump() => {}
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        self.close().await
    }

    /// Release the camera and the connection.
    ///
    /// Both releases are attempted even when one fails; all failures are
    /// reported together.
    pub async fn close(&mut self) -> Result<()> {
        let mut failures = Vec::new();

        if self.camera_live {
            self.camera_live = false;
            if let Err(e) = self.frames.stop().await {
                failures.push(format!("frame source: {}", e));
            }
        }
        if let Err(e) = self.client.close().await {
            failures.push(format!("connection: {}", e));
        }

        if failures.is_empty() {
            log::info!("left room {}", self.room);
            Ok(())
        } else {
            Err(SyncError::Release(failures))
        }
    }
}
