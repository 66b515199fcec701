//! Fan-out of chat events to connected sockets.
//!
//! Every connection subscribes to the private `chat` channel and gets its own [`SocketId`].
//! Publishing with `except` set skips that one connection, so the author's own browser does
//! not receive the event it just caused.

use super::ChatError;
use crate::model::{Message, User};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

pub const CHAT_CHANNEL: &str = "chat";
pub const PRIVATE_CHAT_CHANNEL: &str = "private-chat";
pub const MESSAGE_SENT: &str = "MessageSent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SocketId(pub u64);

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload delivered to subscribers after a message is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSent {
    pub user: User,
    pub message: Message,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub channel: &'static str,
    pub event: &'static str,
    pub payload: MessageSent,
    #[serde(skip)]
    pub except: Option<SocketId>,
}

#[derive(Clone)]
pub struct Broadcaster {
    inner: Arc<Inner>,
}

struct Inner {
    sender: broadcast::Sender<Envelope>,
    next_socket: AtomicU64,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(Inner {
                sender,
                next_socket: AtomicU64::new(1),
            }),
        }
    }

    /// Joins `channel` on behalf of `user`. Only active users may listen to `chat`.
    pub fn subscribe(&self, user: &User, channel: &str) -> Result<Subscription, ChatError> {
        if channel != CHAT_CHANNEL {
            return Err(ChatError::UnknownChannel(channel.to_string()));
        }
        if !user.is_active() {
            warn!(user_id = %user.id, "Inactive user tried to join chat");
            return Err(ChatError::Unauthorized(user.id));
        }
        let socket_id = SocketId(self.inner.next_socket.fetch_add(1, Ordering::Relaxed));
        debug!(user_id = %user.id, %socket_id, "Socket subscribed");
        Ok(Subscription {
            socket_id,
            receiver: self.inner.sender.subscribe(),
        })
    }

    /// Publishes `event` on the private chat channel. Returns how many sockets were listening.
    pub fn publish(&self, event: MessageSent, except: Option<SocketId>) -> usize {
        let envelope = Envelope {
            channel: PRIVATE_CHAT_CHANNEL,
            event: MESSAGE_SENT,
            payload: event,
            except,
        };
        // no subscribers is not an error: nobody is looking at the chat
        self.inner.sender.send(envelope).unwrap_or(0)
    }
}

/// One connected socket.
pub struct Subscription {
    socket_id: SocketId,
    receiver: broadcast::Receiver<Envelope>,
}

impl Subscription {
    pub fn socket_id(&self) -> SocketId {
        self.socket_id
    }

    /// Next event meant for this socket, or `None` once the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<MessageSent> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) => {
                    if let Some(event) = self.accept(envelope) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(socket_id = %self.socket_id, skipped, "Chat subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Like [`recv`](Self::recv) but returns `None` right away when nothing is queued.
    pub fn try_recv(&mut self) -> Option<MessageSent> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) => {
                    if let Some(event) = self.accept(envelope) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(socket_id = %self.socket_id, skipped, "Chat subscriber lagged");
                }
                Err(_) => return None,
            }
        }
    }

    fn accept(&self, envelope: Envelope) -> Option<MessageSent> {
        if envelope.channel != PRIVATE_CHAT_CHANNEL || envelope.except == Some(self.socket_id) {
            return None;
        }
        Some(envelope.payload)
    }
}
