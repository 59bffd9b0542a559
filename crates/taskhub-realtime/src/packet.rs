//! Socket.IO Wire Framing
//!
//! Text encoding of Engine.IO v4 packets and the Socket.IO v4 packets they
//! carry. Only what a WebSocket-only client needs is supported: no polling
//! upgrade, no binary attachments.
//!
//! ```text
//! 0{"sid":"..","pingInterval":25000,"pingTimeout":20000}   engine open
//! 2 / 3                                                    ping / pong
//! 40/chat,{"token":".."}                                   namespace connect
//! 42/chat,["message:new",{..}]                             event
//! 44/chat,{"message":"unauthorized"}                       connect error
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RealtimeError, RealtimeResult};

/// Handshake sent by the server in the engine OPEN packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// Engine.IO level packet
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    Noop,
}

/// Socket.IO level packet, addressed to a namespace
#[derive(Debug, Clone, PartialEq)]
pub struct SocketPacket {
    pub namespace: String,
    pub kind: SocketPacketKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacketKind {
    /// Connect request (client, optional auth) or acknowledgement (server)
    Connect(Option<Value>),
    Disconnect,
    Event { name: String, data: Value, ack: Option<u64> },
    Ack { id: u64, data: Value },
    ConnectError(Value),
}

impl SocketPacket {
    pub fn connect(namespace: &str, auth: Option<Value>) -> Self {
        Self { namespace: namespace.to_string(), kind: SocketPacketKind::Connect(auth) }
    }

    pub fn disconnect(namespace: &str) -> Self {
        Self { namespace: namespace.to_string(), kind: SocketPacketKind::Disconnect }
    }

    pub fn event(namespace: &str, name: &str, data: Value) -> Self {
        Self {
            namespace: namespace.to_string(),
            kind: SocketPacketKind::Event { name: name.to_string(), data, ack: None },
        }
    }
}

// ========================
// Encoding
// ========================

pub fn encode(packet: &EnginePacket) -> String {
    match packet {
        EnginePacket::Open(handshake) => {
            // Serializing a plain struct of strings and integers cannot fail
            format!("0{}", serde_json::to_string(handshake).unwrap_or_default())
        }
        EnginePacket::Close => "1".to_string(),
        EnginePacket::Ping => "2".to_string(),
        EnginePacket::Pong => "3".to_string(),
        EnginePacket::Message(socket) => format!("4{}", encode_socket(socket)),
        EnginePacket::Noop => "6".to_string(),
    }
}

fn encode_socket(packet: &SocketPacket) -> String {
    let (type_digit, ack_id, body) = match &packet.kind {
        SocketPacketKind::Connect(auth) => ('0', None, auth.as_ref().map(Value::to_string)),
        SocketPacketKind::Disconnect => ('1', None, None),
        SocketPacketKind::Event { name, data, ack } => {
            let args = if data.is_null() {
                Value::Array(vec![Value::String(name.clone())])
            } else {
                Value::Array(vec![Value::String(name.clone()), data.clone()])
            };
            ('2', *ack, Some(args.to_string()))
        }
        SocketPacketKind::Ack { id, data } => {
            ('3', Some(*id), Some(Value::Array(vec![data.clone()]).to_string()))
        }
        SocketPacketKind::ConnectError(data) => ('4', None, Some(data.to_string())),
    };

    let mut out = String::new();
    out.push(type_digit);
    if packet.namespace != "/" {
        out.push_str(&packet.namespace);
        out.push(',');
    }
    if let Some(id) = ack_id {
        out.push_str(&id.to_string());
    }
    if let Some(body) = body {
        out.push_str(&body);
    }
    out
}

// ========================
// Decoding
// ========================

pub fn decode(frame: &str) -> RealtimeResult<EnginePacket> {
    let mut chars = frame.chars();
    let type_char = chars.next().ok_or(RealtimeError::EmptyFrame)?;
    let rest = chars.as_str();

    match type_char {
        '0' => Ok(EnginePacket::Open(serde_json::from_str(rest)?)),
        '1' => Ok(EnginePacket::Close),
        // Ping may carry an upgrade payload, which we never request
        '2' => Ok(EnginePacket::Ping),
        '3' => Ok(EnginePacket::Pong),
        '4' => Ok(EnginePacket::Message(decode_socket(rest)?)),
        '5' => Err(RealtimeError::Unsupported("engine upgrade".to_string())),
        '6' => Ok(EnginePacket::Noop),
        other => Err(RealtimeError::Malformed(format!("unknown engine packet type '{}'", other))),
    }
}

fn decode_socket(input: &str) -> RealtimeResult<SocketPacket> {
    let mut chars = input.chars();
    let type_char = chars.next().ok_or(RealtimeError::EmptyFrame)?;
    if matches!(type_char, '5' | '6') {
        return Err(RealtimeError::Unsupported("binary packet".to_string()));
    }
    let mut rest = chars.as_str();

    let namespace = if rest.starts_with('/') {
        match rest.find(',') {
            Some(comma) => {
                let ns = &rest[..comma];
                rest = &rest[comma + 1..];
                ns.to_string()
            }
            None => {
                let ns = rest.to_string();
                rest = "";
                ns
            }
        }
    } else {
        "/".to_string()
    };

    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    let ack = if digits > 0 {
        let id = rest[..digits]
            .parse::<u64>()
            .map_err(|e| RealtimeError::Malformed(format!("ack id: {}", e)))?;
        rest = &rest[digits..];
        Some(id)
    } else {
        None
    };

    let body = if rest.is_empty() { None } else { Some(serde_json::from_str::<Value>(rest)?) };

    let kind = match type_char {
        '0' => SocketPacketKind::Connect(body),
        '1' => SocketPacketKind::Disconnect,
        '2' => {
            let mut args = match body {
                Some(Value::Array(args)) if !args.is_empty() => args,
                _ => return Err(RealtimeError::Malformed("event without arguments".to_string())),
            };
            let name = match args.remove(0) {
                Value::String(name) => name,
                other => return Err(RealtimeError::Malformed(format!("event name {}", other))),
            };
            let data = if args.is_empty() { Value::Null } else { args.remove(0) };
            SocketPacketKind::Event { name, data, ack }
        }
        '3' => {
            let id = ack.ok_or_else(|| RealtimeError::Malformed("ack without id".to_string()))?;
            let data = match body {
                Some(Value::Array(mut args)) if !args.is_empty() => args.remove(0),
                _ => Value::Null,
            };
            SocketPacketKind::Ack { id, data }
        }
        '4' => SocketPacketKind::ConnectError(body.unwrap_or(Value::Null)),
        other => {
            return Err(RealtimeError::Malformed(format!("unknown socket packet type '{}'", other)))
        }
    };

    Ok(SocketPacket { namespace, kind })
}

/// Build the WebSocket endpoint for a backend base URL
///
/// `http://host:3000/` becomes `ws://host:3000/socket.io/?EIO=4&transport=websocket`.
pub fn engine_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = trimmed.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        trimmed.to_string()
    };
    format!("{}/socket.io/?EIO=4&transport=websocket", ws_base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_open_handshake() {
        let packet = decode(r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#).unwrap();
        match packet {
            EnginePacket::Open(h) => {
                assert_eq!(h.sid, "abc");
                assert_eq!(h.ping_interval, 25000);
                assert_eq!(h.ping_timeout, 20000);
            }
            other => panic!("expected open, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_namespaced_event() {
        let packet = decode(r#"42/chat,["message:new",{"id":7}]"#).unwrap();
        let EnginePacket::Message(socket) = packet else { panic!("expected message") };
        assert_eq!(socket.namespace, "/chat");
        assert_eq!(
            socket.kind,
            SocketPacketKind::Event { name: "message:new".to_string(), data: json!({"id": 7}), ack: None }
        );
    }

    #[test]
    fn test_decode_event_with_ack_id() {
        let EnginePacket::Message(socket) = decode(r#"42/chat,12["user:online",{"userId":3}]"#).unwrap() else {
            panic!("expected message")
        };
        match socket.kind {
            SocketPacketKind::Event { name, ack, .. } => {
                assert_eq!(name, "user:online");
                assert_eq!(ack, Some(12));
            }
            other => panic!("expected event, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_root_namespace_connect_ack() {
        let EnginePacket::Message(socket) = decode(r#"40{"sid":"xyz"}"#).unwrap() else {
            panic!("expected message")
        };
        assert_eq!(socket.namespace, "/");
        assert_eq!(socket.kind, SocketPacketKind::Connect(Some(json!({"sid": "xyz"}))));
    }

    #[test]
    fn test_decode_disconnect_without_trailing_comma() {
        let EnginePacket::Message(socket) = decode("41/notifications").unwrap() else {
            panic!("expected message")
        };
        assert_eq!(socket.namespace, "/notifications");
        assert_eq!(socket.kind, SocketPacketKind::Disconnect);
    }

    #[test]
    fn test_encode_connect_with_auth() {
        let packet = EnginePacket::Message(SocketPacket::connect("/chat", Some(json!({"token": "t0k"}))));
        assert_eq!(encode(&packet), r#"40/chat,{"token":"t0k"}"#);
    }

    #[test]
    fn test_encode_event_and_disconnect() {
        let event = EnginePacket::Message(SocketPacket::event("/chat", "room:join", json!({"roomId": 4})));
        assert_eq!(encode(&event), r#"42/chat,["room:join",{"roomId":4}]"#);

        let disconnect = EnginePacket::Message(SocketPacket::disconnect("/chat"));
        assert_eq!(encode(&disconnect), "41/chat,");
    }

    #[test]
    fn test_decode_rejects_binary_and_garbage() {
        assert!(matches!(decode(""), Err(RealtimeError::EmptyFrame)));
        assert!(matches!(decode("45/chat,1-[\"x\"]"), Err(RealtimeError::Unsupported(_))));
        assert!(matches!(decode("9"), Err(RealtimeError::Malformed(_))));
        assert!(matches!(decode("42/chat,[]"), Err(RealtimeError::Malformed(_))));
    }

    #[test]
    fn test_engine_url() {
        assert_eq!(
            engine_url("http://localhost:3000/"),
            "ws://localhost:3000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            engine_url("https://api.example.com"),
            "wss://api.example.com/socket.io/?EIO=4&transport=websocket"
        );
    }
}
