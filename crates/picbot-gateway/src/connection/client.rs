//! Gateway client - the bot's WebSocket session with the platform

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use picbot_common::BotConfig;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, timeout, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, instrument, trace, warn};

use super::error::GatewayError;
use crate::protocol::{GatewayMessage, HelloPayload, IdentifyPayload, OpCode};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Sink = SplitSink<Socket, Message>;
type Stream = SplitStream<Socket>;

/// How long to wait for Hello after connecting
const HELLO_TIMEOUT: Duration = Duration::from_secs(10);

/// A dispatch event received from the platform
#[derive(Debug, Clone)]
pub struct DispatchEvent {
    pub event: String,
    pub data: Value,
}

/// Why a session ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// The platform asked for a new session, or heartbeats went unanswered
    Reconnect,
    /// Nobody is listening for events any more
    Shutdown,
}

/// Gateway client
pub struct GatewayClient {
    url: String,
    token: String,
    reconnect_delay: Duration,
    events: mpsc::Sender<DispatchEvent>,
}

impl GatewayClient {
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        reconnect_delay: Duration,
        events: mpsc::Sender<DispatchEvent>,
    ) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            reconnect_delay,
            events,
        }
    }

    pub fn from_config(config: &BotConfig, events: mpsc::Sender<DispatchEvent>) -> Self {
        Self::new(
            &config.gateway_url,
            &config.token,
            config.reconnect_delay(),
            events,
        )
    }

    /// Stay connected until the event receiver is dropped
    ///
    /// Returns an error only when the platform refuses the session for good
    /// (bad token or protocol version).
    pub async fn run(self) -> Result<(), GatewayError> {
        loop {
            match self.run_session().await {
                Ok(SessionEnd::Shutdown) => {
                    info!("Event receiver closed, leaving gateway");
                    return Ok(());
                }
                Ok(SessionEnd::Reconnect) => info!("Gateway session ended, reconnecting"),
                Err(e) if !e.should_reconnect() => return Err(e),
                Err(e) => warn!(error = %e, "Gateway connection failed"),
            }

            if self.events.is_closed() {
                return Ok(());
            }
            sleep(self.reconnect_delay).await;
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn run_session(&self) -> Result<SessionEnd, GatewayError> {
        let (socket, _) = connect_async(self.url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let hello = timeout(HELLO_TIMEOUT, wait_for_hello(&mut stream))
            .await
            .map_err(|_| GatewayError::HelloTimeout)??;
        let period = hello.interval();
        debug!(heartbeat_ms = period.as_millis() as u64, "Hello received");

        let identify = GatewayMessage::identify(&IdentifyPayload::bot(&self.token))?;
        send(&mut sink, &identify).await?;

        let mut heartbeat = interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_sequence: Option<u64> = None;
        let mut awaiting_ack = false;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if awaiting_ack {
                        warn!("Heartbeat not acknowledged, dropping connection");
                        return Ok(SessionEnd::Reconnect);
                    }
                    send(&mut sink, &GatewayMessage::heartbeat(last_sequence)).await?;
                    awaiting_ack = true;
                }
                frame = stream.next() => {
                    let text = match frame {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(frame))) => return Err(closed(frame)),
                        // Ping/pong is answered by tungstenite
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(e.into()),
                        None => return Err(GatewayError::Disconnected),
                    };

                    let message = GatewayMessage::from_json(&text)?;
                    trace!(%message, "Frame received");

                    let op = message.op;
                    match op {
                        OpCode::Dispatch => {
                            if let Some(s) = message.s {
                                last_sequence = Some(s);
                            }
                            if let Some((event, data)) = message.into_dispatch() {
                                if self.events.send(DispatchEvent { event, data }).await.is_err() {
                                    return Ok(SessionEnd::Shutdown);
                                }
                            }
                        }
                        OpCode::Heartbeat => {
                            send(&mut sink, &GatewayMessage::heartbeat(last_sequence)).await?;
                        }
                        OpCode::HeartbeatAck => awaiting_ack = false,
                        op if op.ends_session() => {
                            info!(%op, "Platform ended the session");
                            let _ = sink.close().await;
                            return Ok(SessionEnd::Reconnect);
                        }
                        op => debug!(%op, "Ignoring frame"),
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("url", &self.url)
            .field("reconnect_delay", &self.reconnect_delay)
            .finish_non_exhaustive()
    }
}

async fn wait_for_hello(stream: &mut Stream) -> Result<HelloPayload, GatewayError> {
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => {
                if let Some(hello) = GatewayMessage::from_json(&text)?.as_hello() {
                    return Ok(hello);
                }
            }
            Message::Close(frame) => return Err(closed(frame)),
            _ => {}
        }
    }
    Err(GatewayError::Disconnected)
}

async fn send(sink: &mut Sink, message: &GatewayMessage) -> Result<(), GatewayError> {
    sink.send(Message::Text(message.to_json()?)).await?;
    Ok(())
}

fn closed(frame: Option<tokio_tungstenite::tungstenite::protocol::CloseFrame<'_>>) -> GatewayError {
    match frame {
        Some(frame) => GatewayError::Closed {
            code: u16::from(frame.code),
            reason: frame.reason.into_owned(),
        },
        None => GatewayError::Disconnected,
    }
}
