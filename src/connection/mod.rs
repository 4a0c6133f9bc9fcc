//! Connection boundary - the transport the client APIs delegate to

pub mod outbound;

pub use outbound::OutboundConnection;

use async_trait::async_trait;

use crate::protocol::ActionData;

/// Low-level connection to the game server
///
/// Implementations own transport, framing, ordering and delivery.
/// Both operations complete when the implementation considers the message
/// handed off, and fail with [`ConnectionError`] otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    /// Send a chat message to a channel
    async fn send_chat_message(
        &self,
        message: &str,
        channel: &str,
    ) -> Result<(), ConnectionError>;

    /// Send a game action with its payload
    async fn send_game_action(
        &self,
        action_type: &str,
        action_data: ActionData,
    ) -> Result<(), ConnectionError>;
}

/// Connection errors
///
/// [`OutboundConnection`] only produces `Closed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("Connection closed")]
    Closed,

    /// Socket-level failure, reported by socket-backed implementations
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol-level rejection, reported by socket-backed implementations
    #[error("Server rejected message ({code}): {message}")]
    Rejected { code: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failure() {
        assert_eq!(ConnectionError::Closed.to_string(), "Connection closed");
        assert_eq!(
            ConnectionError::Transport("broken pipe".to_string()).to_string(),
            "Transport error: broken pipe"
        );
        assert_eq!(
            ConnectionError::Rejected {
                code: "rate_limited".to_string(),
                message: "slow down".to_string(),
            }
            .to_string(),
            "Server rejected message (rate_limited): slow down"
        );
    }
}
