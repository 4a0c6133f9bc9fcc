//! Chat API

use std::sync::Arc;

use crate::connection::{Connection, ConnectionError};
use crate::protocol::ChatRequest;

/// High-level API for chat operations
#[derive(Clone)]
pub struct ChatFacade {
    connection: Arc<dyn Connection>,
}

impl ChatFacade {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    /// Send a message to the global channel
    pub async fn send_message(&self, message: &str) -> Result<(), ConnectionError> {
        self.send(ChatRequest::new(message)).await
    }

    /// Send a message to a specific channel
    pub async fn send_message_to_channel(
        &self,
        message: &str,
        channel: &str,
    ) -> Result<(), ConnectionError> {
        self.send(ChatRequest::with_channel(message, channel)).await
    }

    async fn send(&self, request: ChatRequest) -> Result<(), ConnectionError> {
        self.connection
            .send_chat_message(&request.message, &request.channel)
            .await
    }
}
