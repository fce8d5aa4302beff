//! Room sync client
//!
//! Owns one connection to a room's channel. Outbound counts pass through the
//! [`UpdateThrottler`]; inbound frames are validated before they are handed
//! to the caller. A closed connection stays closed until the caller asks to
//! reconnect.

mod ws;

pub use ws::{WsConnector, WsTransport};

use crate::error::{Result, SyncError};
use crate::protocol::{decode_server_message, encode_client_message, ClientMessage, ServerMessage};
use crate::sync::UpdateThrottler;
use crate::RoomCode;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// A live duplex text connection
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, text: String) -> Result<()>;

    /// Next inbound text frame. `None` once the peer has closed.
    async fn recv(&mut self) -> Option<Result<String>>;

    async fn close(&mut self) -> Result<()>;
}

/// Opens transports to a room endpoint
#[async_trait]
pub trait Connector: Send + Sync {
    type Transport: Transport;

    async fn connect(&self, endpoint: &Url) -> Result<Self::Transport>;
}

/// What arrived on the connection
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Message(ServerMessage),
    /// The transport closed or failed; no further events until reconnect
    Disconnected,
}

/// Endpoint for `room`: `{server}/ws/{ROOM}?name={name}`
pub fn room_endpoint(server_url: &Url, room: &str, name: &str) -> Result<Url> {
    let code = room.trim().to_uppercase();
    if code.is_empty() {
        return Err(SyncError::Endpoint("room code is empty".to_string()));
    }

    let mut url = server_url.clone();
    url.path_segments_mut()
        .map_err(|_| SyncError::Endpoint(format!("{} cannot be a base URL", server_url)))?
        .pop_if_empty()
        .push("ws")
        .push(&code);
    url.query_pairs_mut().clear().append_pair("name", name);
    Ok(url)
}

pub struct SyncClient<C: Connector> {
    connector: C,
    server_url: Url,
    throttler: UpdateThrottler,
    transport: Option<C::Transport>,
    state: ConnectionState,
    room: Option<RoomCode>,
    name: Option<String>,
}

impl<C: Connector> SyncClient<C> {
    pub fn new(connector: C, server_url: &str, throttler: UpdateThrottler) -> Result<Self> {
        let server_url = Url::parse(server_url)
            .map_err(|e| SyncError::Endpoint(format!("{}: {}", server_url, e)))?;
        if !matches!(server_url.scheme(), "ws" | "wss") {
            return Err(SyncError::Endpoint(format!(
                "unsupported scheme {}",
                server_url.scheme()
            )));
        }

        Ok(Self {
            connector,
            server_url,
            throttler,
            transport: None,
            state: ConnectionState::Disconnected,
            room: None,
            name: None,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Room of the current or last connection (upper-cased)
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn throttler(&self) -> &UpdateThrottler {
        &self.throttler
    }

    /// Open a connection to `room` as `name`, replacing any existing one
    pub async fn connect(&mut self, room: &str, name: &str) -> Result<()> {
        let endpoint = room_endpoint(&self.server_url, room, name)?;

        if self.transport.is_some() {
            if let Err(e) = self.close().await {
                log::warn!("closing previous connection failed: {}", e);
            }
        }

        self.state = ConnectionState::Connecting;
        log::info!("connecting to {}", endpoint);

        match self.connector.connect(&endpoint).await {
            Ok(transport) => {
                self.transport = Some(transport);
                self.state = ConnectionState::Connected;
                self.room = Some(room.trim().to_uppercase());
                self.name = Some(name.to_string());
                // the current count goes out on the first publish
                self.throttler.forget();
                log::info!("connected to room {}", room);
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                log::warn!("connection to {} failed: {}", endpoint, e);
                Err(e)
            }
        }
    }

    /// Connect again to the room of the last `connect` call
    pub async fn reconnect(&mut self) -> Result<()> {
        match (self.room.clone(), self.name.clone()) {
            (Some(room), Some(name)) => self.connect(&room, &name).await,
            _ => Err(SyncError::NotConnected),
        }
    }

    /// Send `count` if connected and the throttle allows it.
    ///
    /// Returns whether a frame was sent. While disconnected this is a no-op
    /// and the throttle is left untouched.
    pub async fn publish(&mut self, count: u32, now: Duration) -> Result<bool> {
        let Some(transport) = self.transport.as_mut() else {
            return Ok(false);
        };
        if !self.throttler.should_send(count, now) {
            return Ok(false);
        }

        let text = encode_client_message(&ClientMessage::Update { count })?;
        match transport.send(text).await {
            Ok(()) => {
                log::debug!("sent update count={}", count);
                Ok(true)
            }
            Err(e) => {
                self.drop_connection();
                Err(e)
            }
        }
    }

    /// Wait for the next valid inbound message.
    ///
    /// Malformed frames are logged and skipped. While disconnected this
    /// never resolves, so it can sit in a `select!` next to other sources.
    pub async fn next_event(&mut self) -> ClientEvent {
        loop {
            let Some(transport) = self.transport.as_mut() else {
                return std::future::pending().await;
            };

            match transport.recv().await {
                Some(Ok(text)) => match self.decode(&text) {
                    Ok(message) => return ClientEvent::Message(message),
                    Err(e) => log::warn!("discarding inbound frame: {}", e),
                },
                Some(Err(SyncError::Protocol(reason))) => {
                    log::warn!("discarding inbound frame: {}", reason)
                }
                Some(Err(e)) => {
                    log::warn!("connection failed: {}", e);
                    self.drop_connection();
                    return ClientEvent::Disconnected;
                }
                None => {
                    log::info!("connection closed by server");
                    self.drop_connection();
                    return ClientEvent::Disconnected;
                }
            }
        }
    }

    /// Close the connection, if any
    pub async fn close(&mut self) -> Result<()> {
        self.state = ConnectionState::Disconnected;
        match self.transport.take() {
            Some(mut transport) => transport.close().await,
            None => Ok(()),
        }
    }

    /// Next publish sends unconditionally
    pub fn forget_sent(&mut self) {
        self.throttler.forget();
    }

    fn decode(&self, text: &str) -> Result<ServerMessage> {
        let message = decode_server_message(text)?;
        if let Some(room) = &self.room {
            if !message.room().eq_ignore_ascii_case(room) {
                return Err(SyncError::Protocol(format!(
                    "{} for room {} on connection to {}",
                    message.kind(),
                    message.room(),
                    room
                )));
            }
        }
        Ok(message)
    }

    fn drop_connection(&mut self) {
        self.transport = None;
        self.state = ConnectionState::Disconnected;
        self.throttler.forget();
    }
}
