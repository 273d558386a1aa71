//! Text frames of Engine.IO v4 carrying Socket.IO v5 packets.
//!
//! Only the subset Uptime Kuma's API uses is understood: the Engine.IO open,
//! close, ping and pong frames, and Socket.IO connect, disconnect, event, ack
//! and connect-error packets. Binary packets are reported as
//! [`Frame::Unsupported`].

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Error;

/// Socket.IO connect to the default namespace.
pub const CONNECT: &str = "40";
/// Socket.IO disconnect from the default namespace.
pub const DISCONNECT: &str = "41";
/// Engine.IO pong, the answer to a server ping.
pub const PONG: &str = "3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Noop,
    Connect,
    Disconnect,
    Event {
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        id: u64,
        args: Vec<Value>,
    },
    ConnectError(String),
    Unsupported(String),
}

pub fn decode(text: &str) -> Result<Frame, Error> {
    match text.as_bytes().first() {
        None => Err(Error::Protocol("empty frame".to_string())),
        Some(b'0') => Ok(Frame::Open(serde_json::from_str(&text[1..])?)),
        Some(b'1') => Ok(Frame::Close),
        Some(b'2') => Ok(Frame::Ping),
        Some(b'3') => Ok(Frame::Pong),
        Some(b'4') => decode_packet(&text[1..]),
        Some(b'6') => Ok(Frame::Noop),
        Some(_) => Ok(Frame::Unsupported(text.to_string())),
    }
}

fn decode_packet(body: &str) -> Result<Frame, Error> {
    let kind = match body.as_bytes().first() {
        Some(kind) if kind.is_ascii_digit() => *kind,
        _ => return Err(Error::Protocol(format!("malformed packet: {body:?}"))),
    };
    let mut rest = &body[1..];

    // Binary packets announce their attachment count; we never ask for any.
    if matches!(kind, b'5' | b'6') {
        return Ok(Frame::Unsupported(format!("4{body}")));
    }

    if rest.starts_with('/') {
        rest = rest.split_once(',').map_or("", |(_, data)| data);
    }

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let id = if digits > 0 {
        Some(
            rest[..digits]
                .parse::<u64>()
                .map_err(|e| Error::Protocol(format!("invalid ack id: {e}")))?,
        )
    } else {
        None
    };
    rest = &rest[digits..];

    match kind {
        b'0' => Ok(Frame::Connect),
        b'1' => Ok(Frame::Disconnect),
        b'2' => {
            let mut args: Vec<Value> = serde_json::from_str(rest)?;
            if args.is_empty() {
                return Err(Error::Protocol("event without a name".to_string()));
            }
            match args.remove(0) {
                Value::String(name) => Ok(Frame::Event { id, name, args }),
                other => Err(Error::Protocol(format!("event name is not a string: {other}"))),
            }
        }
        b'3' => {
            let id = id.ok_or_else(|| Error::Protocol("ack without id".to_string()))?;
            let args: Vec<Value> = serde_json::from_str(rest)?;
            Ok(Frame::Ack { id, args })
        }
        b'4' => {
            let message = match serde_json::from_str::<Value>(rest) {
                Ok(Value::String(message)) => message,
                Ok(Value::Object(map)) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| rest.to_string(), str::to_string),
                _ => rest.to_string(),
            };
            Ok(Frame::ConnectError(message))
        }
        _ => Ok(Frame::Unsupported(format!("4{body}"))),
    }
}

/// Encodes an event on the default namespace that expects an ack with `id`.
pub fn encode_event(id: u64, name: &str, payload: &Value) -> Result<String, Error> {
    let data = serde_json::to_string(&json!([name, payload]))?;
    Ok(format!("42{id}{data}"))
}
