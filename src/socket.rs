//! Uptime Kuma session client speaking its Socket.IO API over a WebSocket.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::error::Error;
use crate::monitor::MonitorRequest;
use crate::packet::{self, CONNECT, DISCONNECT, Frame, PONG};
use crate::session::{MonitorSession, SessionConnector};

/// Upper bound for connecting, the handshake, and each acknowledged call.
pub const STEP_TIMEOUT_SECS: u64 = 10;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct SocketConnector {
    step_timeout: Duration,
}

impl Default for SocketConnector {
    fn default() -> Self {
        SocketConnector::with_timeout(Duration::from_secs(STEP_TIMEOUT_SECS))
    }
}

impl SocketConnector {
    pub fn with_timeout(step_timeout: Duration) -> Self {
        SocketConnector { step_timeout }
    }
}

#[async_trait]
impl SessionConnector for SocketConnector {
    async fn connect(&self, base_url: &str) -> Result<Box<dyn MonitorSession>, Error> {
        let endpoint = socket_endpoint(base_url)?;
        debug!("Connecting to {endpoint}");

        let (socket, _response) = timeout(self.step_timeout, connect_async(endpoint.as_str()))
            .await
            .map_err(|_| Error::Timeout("WebSocket connect"))??;

        let mut session = SocketSession {
            socket,
            next_id: 0,
            step_timeout: self.step_timeout,
        };
        timeout(self.step_timeout, session.open())
            .await
            .map_err(|_| Error::Timeout("Socket.IO handshake"))??;

        Ok(Box::new(session))
    }
}

/// Socket.IO endpoint for an Uptime Kuma base URL.
///
/// `http://host:3001/kuma` becomes
/// `ws://host:3001/kuma/socket.io/?EIO=4&transport=websocket`.
pub fn socket_endpoint(base_url: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base_url)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(Error::Protocol(format!("unsupported URL scheme: {other}"))),
    };
    url.set_scheme(scheme)
        .map_err(|()| Error::Protocol(format!("cannot switch {base_url} to {scheme}")))?;

    let path = format!("{}/socket.io/", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(Some("EIO=4&transport=websocket"));
    url.set_fragment(None);
    Ok(url)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AckResponse {
    ok: bool,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    token_required: bool,
    #[serde(default, rename = "monitorID")]
    monitor_id: Option<u64>,
}

struct SocketSession {
    socket: Socket,
    next_id: u64,
    step_timeout: Duration,
}

impl SocketSession {
    async fn send_text(&mut self, text: String) -> Result<(), Error> {
        self.socket.send(Message::text(text)).await?;
        Ok(())
    }

    /// Reads the next frame, answering pings on the way.
    async fn next_frame(&mut self) -> Result<Frame, Error> {
        loop {
            let message = self
                .socket
                .next()
                .await
                .ok_or_else(|| Error::Protocol("connection closed".to_string()))??;

            let text = match message {
                Message::Text(text) => text,
                Message::Close(_) => {
                    return Err(Error::Protocol("connection closed by server".to_string()));
                }
                _ => continue,
            };

            match packet::decode(text.as_str())? {
                Frame::Ping => self.send_text(PONG.to_string()).await?,
                Frame::Close => {
                    return Err(Error::Protocol("server closed the session".to_string()));
                }
                frame => return Ok(frame),
            }
        }
    }

    async fn open(&mut self) -> Result<(), Error> {
        match self.next_frame().await? {
            Frame::Open(handshake) => debug!("Engine.IO session {} opened", handshake.sid),
            other => {
                return Err(Error::Protocol(format!(
                    "expected an open frame, got {other:?}"
                )));
            }
        }

        self.send_text(CONNECT.to_string()).await?;

        loop {
            match self.next_frame().await? {
                Frame::Connect => return Ok(()),
                Frame::ConnectError(message) => {
                    return Err(Error::Protocol(format!("connect refused: {message}")));
                }
                Frame::Event { name, .. } => debug!("Ignoring server event {name} during handshake"),
                _ => {}
            }
        }
    }

    async fn close(&mut self) -> Result<(), Error> {
        self.send_text(DISCONNECT.to_string()).await?;
        match self.socket.close(None).await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn call(&mut self, event: &'static str, payload: &Value) -> Result<AckResponse, Error> {
        let id = self.next_id;
        self.next_id += 1;
        self.send_text(packet::encode_event(id, event, payload)?)
            .await?;

        timeout(self.step_timeout, self.wait_for_ack(id, event))
            .await
            .map_err(|_| Error::Timeout(event))?
    }

    async fn wait_for_ack(&mut self, id: u64, event: &str) -> Result<AckResponse, Error> {
        loop {
            match self.next_frame().await? {
                Frame::Ack { id: ack_id, mut args } if ack_id == id => {
                    if args.is_empty() {
                        return Err(Error::Protocol(format!("empty ack for {event}")));
                    }
                    return Ok(serde_json::from_value(args.swap_remove(0))?);
                }
                Frame::Disconnect => {
                    return Err(Error::Protocol("server disconnected the session".to_string()));
                }
                Frame::Event { name, .. } => debug!("Ignoring server event {name}"),
                _ => {}
            }
        }
    }
}

/// The `add` payload: the request plus the defaults the Uptime Kuma UI
/// fills in for a new HTTP monitor.
fn monitor_payload(request: &MonitorRequest) -> Value {
    json!({
        "type": request.monitor_type.as_str(),
        "name": request.name,
        "url": request.url,
        "method": "GET",
        "interval": 60,
        "retryInterval": 60,
        "resendInterval": 0,
        "maxretries": 0,
        "upsideDown": false,
        "ignoreTls": false,
        "expiryNotification": false,
        "maxredirects": 10,
        "accepted_statuscodes": ["200-299"],
        "notificationIDList": {},
        "httpBodyEncoding": "json",
        "kafkaProducerBrokers": [],
        "kafkaProducerSaslOptions": {},
    })
}

#[async_trait]
impl MonitorSession for SocketSession {
    async fn login(&mut self, username: &str, password: &str) -> Result<(), Error> {
        let payload = json!({
            "username": username,
            "password": password,
            "token": "",
        });
        let response = self.call("login", &payload).await?;

        if response.token_required {
            return Err(Error::LoginRejected(
                "two-factor authentication is enabled for this user".to_string(),
            ));
        }
        if !response.ok {
            return Err(Error::LoginRejected(
                response.msg.unwrap_or_else(|| "login failed".to_string()),
            ));
        }

        info!("Logged in to Uptime Kuma as {username}");
        Ok(())
    }

    async fn add_monitor(&mut self, request: &MonitorRequest) -> Result<Option<u64>, Error> {
        let response = self.call("add", &monitor_payload(request)).await?;
        if !response.ok {
            return Err(Error::MonitorRejected(
                response.msg.unwrap_or_else(|| "add failed".to_string()),
            ));
        }
        Ok(response.monitor_id)
    }

    async fn disconnect(self: Box<Self>) -> Result<(), Error> {
        let mut session = *self;
        timeout(session.step_timeout, session.close())
            .await
            .map_err(|_| Error::Timeout("disconnect"))?
    }
}
