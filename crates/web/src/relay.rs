//! Move relay: every frame a connection sends goes to all other
//! connections, never back to the sender. Payloads are not inspected.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::AppState;

type Frame = (u64, Message);

pub struct Relay {
    tx: broadcast::Sender<Frame>,
    next_id: AtomicU64,
}

/// Sending half of one connection.
#[derive(Clone)]
pub struct Publisher {
    id: u64,
    tx: broadcast::Sender<Frame>,
}

/// Receiving half of one connection; skips its own frames.
pub struct Subscriber {
    id: u64,
    rx: broadcast::Receiver<Frame>,
}

impl Relay {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn join(&self) -> (Publisher, Subscriber) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let publisher = Publisher {
            id,
            tx: self.tx.clone(),
        };
        let subscriber = Subscriber {
            id,
            rx: self.tx.subscribe(),
        };
        (publisher, subscriber)
    }

    pub fn connections(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Publisher {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns how many connections (including this one) will see the frame.
    pub fn publish(&self, message: Message) -> usize {
        self.tx.send((self.id, message)).unwrap_or(0)
    }
}

impl Subscriber {
    /// Next frame from another connection, or `None` once the relay is gone.
    pub async fn recv(&mut self) -> Option<Message> {
        loop {
            match self.rx.recv().await {
                Ok((from, message)) if from != self.id => return Some(message),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(connection = self.id, skipped, "relay subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

pub async fn relay(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let (publisher, subscriber) = state.relay.join();
    ws.on_upgrade(move |socket| serve(socket, publisher, subscriber))
}

async fn serve(socket: WebSocket, publisher: Publisher, mut subscriber: Subscriber) {
    let id = publisher.id();
    info!(connection = id, "relay connected");

    let (mut sink, mut stream) = socket.split();

    let mut forward = tokio::spawn(async move {
        while let Some(message) = subscriber.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    let mut receive = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(message @ (Message::Text(_) | Message::Binary(_))) => {
                    let seen_by = publisher.publish(message);
                    debug!(connection = publisher.id(), seen_by, "frame relayed");
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(connection = publisher.id(), error = %err, "relay socket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut forward => receive.abort(),
        _ = &mut receive => forward.abort(),
    }

    info!(connection = id, "relay disconnected");
}
