//! Connection Manager
//!
//! One manager per socket namespace. It owns the transport, the auth token,
//! the reconnect budget and the joined-room set. Timers are the driver's job:
//! the manager only says *when* to retry.
//!
//! ```text
//! Disconnected --connect--> Connecting --ns ack--> Connected
//!      ^                        |                     |
//!      |                        +-----drop-----+------+
//!  disconnect                                  v
//!      |                               Reconnecting{n} --ack--> Connected
//!      +--------------------------------------- | n > budget
//!                                               v
//!                                             Failed
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::error::{RealtimeError, RealtimeResult};
use crate::events::{ClientEvent, ServerEvent, SocketEvent};
use crate::packet::{self, EnginePacket, SocketPacket, SocketPacketKind};

/// Raw frame transport (a WebSocket in the browser)
///
/// Implementations report incoming frames through `ConnectionManager::handle_frame`
/// and closures through `ConnectionManager::transport_closed`. A failed `open`
/// should be followed by `transport_closed` just like a dropped connection.
pub trait Transport {
    fn open(&mut self, url: &str) -> RealtimeResult<()>;
    fn send(&mut self, frame: &str) -> RealtimeResult<()>;
    fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    Failed,
}

/// Fixed-delay reconnect budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_attempts: 5, delay: Duration::from_secs(1) }
    }
}

/// What the driver should do after the transport dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectStep {
    /// Closed on purpose, nothing to do
    Idle,
    /// Call `retry()` after the delay
    RetryAfter(Duration),
    /// Budget exhausted
    GiveUp,
}

/// How to deliver an outgoing chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPlan {
    /// Connected, emit now
    Emit,
    /// Force one reconnect, wait, then emit once (optimistic entry stays)
    ReconnectThenEmit(Duration),
    /// No socket at all: undo the optimistic entry
    Rollback,
}

pub struct ConnectionManager<T: Transport> {
    transport: T,
    url: String,
    namespace: String,
    policy: ReconnectPolicy,
    state: ConnectionState,
    token: Option<String>,
    joined_rooms: BTreeSet<u32>,
    attempts: u32,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(transport: T, base_url: &str, namespace: &str, policy: ReconnectPolicy) -> Self {
        Self {
            transport,
            url: packet::engine_url(base_url),
            namespace: namespace.to_string(),
            policy,
            state: ConnectionState::Disconnected,
            token: None,
            joined_rooms: BTreeSet::new(),
            attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> ReconnectPolicy {
        self.policy
    }

    pub fn joined_rooms(&self) -> impl Iterator<Item = u32> + '_ {
        self.joined_rooms.iter().copied()
    }

    pub fn is_joined(&self, room_id: u32) -> bool {
        self.joined_rooms.contains(&room_id)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Start connecting with the given bearer token
    ///
    /// No-op while a connection exists or is being established.
    pub fn connect(&mut self, token: &str) -> RealtimeResult<()> {
        match self.state {
            ConnectionState::Connecting
            | ConnectionState::Connected
            | ConnectionState::Reconnecting { .. } => {
                debug!(namespace = %self.namespace, state = ?self.state, "connect ignored");
                return Ok(());
            }
            ConnectionState::Disconnected | ConnectionState::Failed => {}
        }

        if token.trim().is_empty() {
            warn!(namespace = %self.namespace, "no auth token, socket not started");
            return Err(RealtimeError::MissingToken);
        }

        self.token = Some(token.to_string());
        self.attempts = 0;
        self.state = ConnectionState::Connecting;
        info!(namespace = %self.namespace, url = %self.url, "connecting");
        self.transport.open(&self.url)
    }

    /// Process one incoming text frame
    pub fn handle_frame(&mut self, frame: &str) -> RealtimeResult<Vec<SocketEvent>> {
        match packet::decode(frame)? {
            EnginePacket::Open(handshake) => {
                debug!(namespace = %self.namespace, sid = %handshake.sid, "engine open");
                let auth = self.token.as_ref().map(|token| json!({ "token": token }));
                self.send_packet(SocketPacket::connect(&self.namespace, auth))?;
                Ok(Vec::new())
            }
            EnginePacket::Ping => {
                self.transport.send(&packet::encode(&EnginePacket::Pong))?;
                Ok(Vec::new())
            }
            EnginePacket::Pong | EnginePacket::Noop => Ok(Vec::new()),
            EnginePacket::Close => {
                debug!(namespace = %self.namespace, "engine close");
                self.transport.close();
                Ok(Vec::new())
            }
            EnginePacket::Message(socket) if socket.namespace != self.namespace => {
                debug!(namespace = %self.namespace, other = %socket.namespace, "packet for other namespace");
                Ok(Vec::new())
            }
            EnginePacket::Message(socket) => self.handle_socket_packet(socket.kind),
        }
    }

    fn handle_socket_packet(&mut self, kind: SocketPacketKind) -> RealtimeResult<Vec<SocketEvent>> {
        match kind {
            SocketPacketKind::Connect(_) => {
                self.state = ConnectionState::Connected;
                self.attempts = 0;
                info!(namespace = %self.namespace, rooms = self.joined_rooms.len(), "connected");
                let rooms: Vec<u32> = self.joined_rooms.iter().copied().collect();
                for room_id in rooms {
                    self.emit(&ClientEvent::JoinRoom { room_id })?;
                }
                Ok(vec![SocketEvent::Connected])
            }
            SocketPacketKind::ConnectError(data) => {
                error!(namespace = %self.namespace, reason = %data, "connect refused");
                self.state = ConnectionState::Failed;
                self.transport.close();
                Ok(vec![SocketEvent::Failed])
            }
            SocketPacketKind::Disconnect => {
                warn!(namespace = %self.namespace, "server closed namespace");
                self.transport.close();
                Ok(Vec::new())
            }
            SocketPacketKind::Event { name, data, .. } => match ServerEvent::from_wire(&name, data) {
                Ok(event) => Ok(vec![SocketEvent::Server(event)]),
                Err(e) => {
                    warn!(namespace = %self.namespace, event = %name, error = %e, "undecodable event");
                    Ok(Vec::new())
                }
            },
            SocketPacketKind::Ack { .. } => Ok(Vec::new()),
        }
    }

    /// Transport dropped; decide whether to retry
    pub fn transport_closed(&mut self) -> ReconnectStep {
        match self.state {
            ConnectionState::Disconnected | ConnectionState::Failed => ReconnectStep::Idle,
            _ => {
                self.attempts += 1;
                if self.attempts > self.policy.max_attempts {
                    self.state = ConnectionState::Failed;
                    error!(
                        namespace = %self.namespace,
                        attempts = self.policy.max_attempts,
                        "reconnect attempts exhausted"
                    );
                    ReconnectStep::GiveUp
                } else {
                    self.state = ConnectionState::Reconnecting { attempt: self.attempts };
                    warn!(namespace = %self.namespace, attempt = self.attempts, "connection lost, retrying");
                    ReconnectStep::RetryAfter(self.policy.delay)
                }
            }
        }
    }

    /// Scheduled reconnect attempt
    pub fn retry(&mut self) -> RealtimeResult<()> {
        match self.state {
            ConnectionState::Reconnecting { attempt } => {
                debug!(namespace = %self.namespace, attempt, "reopening transport");
                self.transport.open(&self.url)
            }
            _ => Ok(()),
        }
    }

    /// Single out-of-band reconnect used by the send path
    pub fn force_reconnect(&mut self) -> RealtimeResult<()> {
        match self.state {
            ConnectionState::Connected => Ok(()),
            ConnectionState::Disconnected => Err(RealtimeError::NotConnected),
            _ => {
                info!(namespace = %self.namespace, "forced reconnect");
                self.attempts = 0;
                self.state = ConnectionState::Connecting;
                self.transport.open(&self.url)
            }
        }
    }

    /// Add a room to the joined set; returns false if it was already there
    pub fn join_room(&mut self, room_id: u32) -> RealtimeResult<bool> {
        if !self.joined_rooms.insert(room_id) {
            return Ok(false);
        }
        if self.is_connected() {
            self.emit(&ClientEvent::JoinRoom { room_id })?;
        }
        Ok(true)
    }

    pub fn emit(&mut self, event: &ClientEvent) -> RealtimeResult<()> {
        if !self.is_connected() {
            return Err(RealtimeError::NotConnected);
        }
        self.send_packet(SocketPacket::event(&self.namespace, event.name(), event.payload()))
    }

    pub fn plan_send(&self) -> SendPlan {
        match self.state {
            ConnectionState::Connected => SendPlan::Emit,
            ConnectionState::Disconnected => SendPlan::Rollback,
            _ => SendPlan::ReconnectThenEmit(self.policy.delay),
        }
    }

    /// Explicit teardown (logout)
    pub fn disconnect(&mut self) {
        if self.is_connected() {
            let frame = packet::encode(&EnginePacket::Message(SocketPacket::disconnect(&self.namespace)));
            if let Err(e) = self.transport.send(&frame) {
                debug!(namespace = %self.namespace, error = %e, "disconnect packet not sent");
            }
        }
        self.state = ConnectionState::Disconnected;
        self.token = None;
        self.joined_rooms.clear();
        self.attempts = 0;
        self.transport.close();
        info!(namespace = %self.namespace, "disconnected");
    }

    fn send_packet(&mut self, socket: SocketPacket) -> RealtimeResult<()> {
        self.transport.send(&packet::encode(&EnginePacket::Message(socket)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct NullTransport {
        opened: u32,
    }

    impl Transport for NullTransport {
        fn open(&mut self, _url: &str) -> RealtimeResult<()> {
            self.opened += 1;
            Ok(())
        }
        fn send(&mut self, _frame: &str) -> RealtimeResult<()> {
            Ok(())
        }
        fn close(&mut self) {}
    }

    fn manager() -> ConnectionManager<NullTransport> {
        ConnectionManager::new(NullTransport::default(), "http://localhost:3000", "/chat", ReconnectPolicy::default())
    }

    #[test]
    fn test_connect_requires_token() {
        let mut m = manager();
        assert!(matches!(m.connect("  "), Err(RealtimeError::MissingToken)));
        assert_eq!(m.state(), ConnectionState::Disconnected);
        assert_eq!(m.transport().opened, 0);
    }

    #[test]
    fn test_second_connect_is_noop() {
        let mut m = manager();
        m.connect("t").unwrap();
        m.connect("t").unwrap();
        assert_eq!(m.transport().opened, 1);
        assert_eq!(m.state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_plan_send_by_state() {
        let mut m = manager();
        assert_eq!(m.plan_send(), SendPlan::Rollback);
        m.connect("t").unwrap();
        assert_eq!(m.plan_send(), SendPlan::ReconnectThenEmit(Duration::from_secs(1)));
        m.handle_frame("40/chat,{\"sid\":\"s\"}").unwrap();
        assert_eq!(m.plan_send(), SendPlan::Emit);
    }

    #[test]
    fn test_closed_after_disconnect_is_idle() {
        let mut m = manager();
        m.connect("t").unwrap();
        m.disconnect();
        assert_eq!(m.transport_closed(), ReconnectStep::Idle);
    }
}
