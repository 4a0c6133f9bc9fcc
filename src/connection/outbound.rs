//! Channel-backed connection adapter
//!
//! Each send becomes one [`ClientMsg`] frame on a bounded queue. The task that
//! owns the socket drains the receiver, encodes and writes the frames.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{Connection, ConnectionError};
use crate::protocol::{ActionData, ChatRequest, ClientMsg, GenericAction};

/// Connection that queues outbound frames for a transport task
#[derive(Clone, Debug)]
pub struct OutboundConnection {
    tx: mpsc::Sender<ClientMsg>,
}

impl OutboundConnection {
    /// Create the adapter and the receiver the transport drains
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ClientMsg>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Whether the transport side has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn push(&self, msg: ClientMsg) -> Result<(), ConnectionError> {
        self.tx.send(msg).await.map_err(|_| {
            warn!("Outbound queue closed, dropping frame");
            ConnectionError::Closed
        })
    }
}

#[async_trait]
impl Connection for OutboundConnection {
    async fn send_chat_message(
        &self,
        message: &str,
        channel: &str,
    ) -> Result<(), ConnectionError> {
        debug!(channel = %channel, len = message.len(), "Queueing chat message");
        self.push(ClientMsg::ChatMessage(ChatRequest::with_channel(message, channel)))
            .await
    }

    async fn send_game_action(
        &self,
        action_type: &str,
        action_data: ActionData,
    ) -> Result<(), ConnectionError> {
        debug!(action_type = %action_type, "Queueing game action");
        self.push(ClientMsg::GameAction(GenericAction::new(action_type, action_data)))
            .await
    }
}
