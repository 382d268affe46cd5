//! Socket event loop with tokio mpsc command/notification pattern.
//!
//! The websocket runs in a dedicated tokio task. External code communicates
//! with it through typed command and notification channels, so no component
//! ever touches the socket handle directly.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use hamkalam_shared::protocol::{ClientEvent, ServerEvent};

// ---------------------------------------------------------------------------
// Command / notification types
// ---------------------------------------------------------------------------

/// Commands sent *into* the socket task.
#[derive(Debug)]
pub enum SocketCommand {
    /// Emit an event frame to the server.
    Emit(ClientEvent),
    /// Gracefully close the connection and end the task.
    Shutdown,
}

/// Notifications sent *from* the socket task to the application.
#[derive(Debug, Clone)]
pub enum SocketNotification {
    /// A server event was received.
    Event(ServerEvent),
    /// The server closed the connection.
    Disconnected,
}

/// Configuration for spawning the socket task.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// Websocket URL of the realtime endpoint.
    pub url: String,
    /// Bound of the command and notification channels.
    pub channel_capacity: usize,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:5000/socket".to_string(),
            channel_capacity: 64,
        }
    }
}

/// Connect the websocket and spawn its event loop in a background task.
///
/// Returns `(command_tx, notification_rx)`. Dropping the command sender or
/// sending [`SocketCommand::Shutdown`] ends the task; a server-side close
/// surfaces as [`SocketNotification::Disconnected`] before the task ends.
pub async fn spawn_socket(
    config: SocketConfig,
) -> anyhow::Result<(
    mpsc::Sender<SocketCommand>,
    mpsc::Receiver<SocketNotification>,
)> {
    let (ws, _response) = connect_async(&config.url).await?;
    info!(url = %config.url, "Socket connected");

    let (cmd_tx, cmd_rx) = mpsc::channel(config.channel_capacity);
    let (notif_tx, notif_rx) = mpsc::channel(config.channel_capacity);

    tokio::spawn(async move {
        socket_loop(ws, cmd_rx, notif_tx).await;
    });

    Ok((cmd_tx, notif_rx))
}

async fn socket_loop(
    ws: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    mut cmd_rx: mpsc::Receiver<SocketCommand>,
    notif_tx: mpsc::Sender<SocketNotification>,
) {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SocketCommand::Emit(event)) => {
                        let frame = match event.to_frame() {
                            Ok(f) => f,
                            Err(e) => {
                                warn!(error = %e, "Failed to encode event frame");
                                continue;
                            }
                        };

                        debug!(event = event.event_name(), "Emitting event");
                        if let Err(e) = sink.send(Message::Text(frame)).await {
                            warn!(error = %e, "Socket send failed");
                            let _ = notif_tx.send(SocketNotification::Disconnected).await;
                            break;
                        }
                    }
                    Some(SocketCommand::Shutdown) | None => {
                        debug!("Socket shutting down");
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match ServerEvent::from_frame(&text) {
                            Ok(event) => {
                                if notif_tx.send(SocketNotification::Event(event)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                // Unknown or malformed frames are dropped, never fatal
                                debug!(error = %e, "Ignoring undecodable frame");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Socket closed by server");
                        let _ = notif_tx.send(SocketNotification::Disconnected).await;
                        break;
                    }
                    Some(Ok(other)) => {
                        debug!(kind = ?other, "Ignoring non-text frame");
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Socket read error");
                        let _ = notif_tx.send(SocketNotification::Disconnected).await;
                        break;
                    }
                }
            }
        }
    }

    debug!("Socket loop ended");
}
