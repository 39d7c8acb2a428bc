use crate::{Error, Result};
use futures_util::{Stream as FutStream, StreamExt};
use janken_types::settle::SettlementParseError;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio_tungstenite::{tungstenite::Message, WebSocketStream};
use tracing::{debug, error, trace, warn};

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Stream of JSON-encoded events from a WebSocket connection.
///
/// A spawned reader task decodes frames into a bounded channel; dropping the
/// stream aborts the reader and releases the connection.
pub struct Stream<T: DeserializeOwned + Send + 'static> {
    receiver: mpsc::Receiver<Result<T>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: DeserializeOwned + Send + 'static> Drop for Stream<T> {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

impl<T: DeserializeOwned + Send + 'static> Stream<T> {
    fn decode(data: &[u8]) -> Result<T> {
        serde_json::from_slice(data).map_err(|err| {
            Error::InvalidData(SettlementParseError {
                reason: err.to_string(),
            })
        })
    }

    fn spawn_reader<S>(
        ws: WebSocketStream<S>,
        tx: mpsc::Sender<Result<T>>,
    ) -> tokio::task::JoinHandle<()>
    where
        S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut ws = ws;
            let message_type = std::any::type_name::<T>();
            while let Some(msg) = ws.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        trace!(message_type, len = text.len(), "received websocket message");
                        let decoded = Self::decode(text.as_bytes());
                        if let Err(err) = &decoded {
                            warn!(message_type, error = %err, "failed to decode websocket message");
                        }
                        if tx.send(decoded).await.is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Ok(Message::Binary(data)) => {
                        trace!(message_type, len = data.len(), "received websocket message");
                        let decoded = Self::decode(&data);
                        if let Err(err) = &decoded {
                            warn!(message_type, error = %err, "failed to decode websocket message");
                        }
                        if tx.send(decoded).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        debug!("WebSocket closed");
                        let _ = tx.send(Err(Error::ConnectionClosed)).await;
                        break;
                    }
                    Ok(_) => {} // Ignore ping/pong frames
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        let _ = tx.send(Err(e.into())).await;
                        break;
                    }
                }
            }
        })
    }

    pub(crate) fn new<S>(ws: WebSocketStream<S>) -> Self
    where
        S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let handle = Self::spawn_reader(ws, tx);
        Self {
            receiver: rx,
            _handle: handle,
        }
    }

    /// Receive the next event from the stream.
    pub async fn next(&mut self) -> Option<Result<T>> {
        self.receiver.recv().await
    }
}

impl<T: DeserializeOwned + Send + 'static> FutStream for Stream<T> {
    type Item = Result<T>;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
