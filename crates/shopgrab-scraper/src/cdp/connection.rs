//! One WebSocket to the browser endpoint, multiplexed by request id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::protocol::{CdpRequest, CdpResponse};
use crate::error::BrowserError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, BrowserError>>>>>;

pub(crate) struct CdpConnection {
    sink: Mutex<WsSink>,
    next_id: AtomicU64,
    pending: Pending,
    command_timeout: Duration,
    recv_task: JoinHandle<()>,
}

impl CdpConnection {
    pub(crate) async fn connect(ws_url: &str, command_timeout: Duration) -> Result<Self, BrowserError> {
        let (stream, _) = tokio_tungstenite::connect_async(ws_url).await?;
        let (sink, source) = stream.split();
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));

        let recv_task = tokio::spawn(receive_loop(source, Arc::clone(&pending)));
        tracing::debug!(ws_url, "CDP connection established");

        Ok(Self {
            sink: Mutex::new(sink),
            next_id: AtomicU64::new(1),
            pending,
            command_timeout,
            recv_task,
        })
    }

    /// Sends one command and waits for its response, bounded by the command
    /// timeout. `session_id` routes the command to an attached target.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, BrowserError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = serde_json::to_string(&CdpRequest {
            id,
            method,
            params,
            session_id,
        })?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let sent = self.sink.lock().await.send(Message::Text(payload.into())).await;
        if let Err(e) = sent {
            self.pending.lock().await.remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(self.command_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(BrowserError::SessionClosed),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(BrowserError::Timeout(method.to_string()))
            }
        }
    }
}

impl Drop for CdpConnection {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

async fn receive_loop(mut source: WsSource, pending: Pending) {
    while let Some(message) = source.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                tracing::debug!("CDP connection closed by browser");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "CDP connection failed");
                break;
            }
        };

        let response: CdpResponse = match serde_json::from_str(&text) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable CDP message");
                continue;
            }
        };

        // Events are not consumed; navigation polls document state instead.
        let Some(id) = response.id else {
            tracing::trace!(method = ?response.method, "CDP event");
            continue;
        };

        if let Some(tx) = pending.lock().await.remove(&id) {
            let result = match response.error {
                Some(error) => Err(BrowserError::Protocol {
                    code: error.code,
                    message: error.message,
                }),
                None => Ok(response.result.unwrap_or(Value::Null)),
            };
            let _ = tx.send(result);
        }
    }

    // Wake every waiter; their senders drop and they see SessionClosed.
    pending.lock().await.clear();
}
