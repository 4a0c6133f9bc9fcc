//! Client protocol message definitions
//! These are the wire types handed to the connection for client-server communication

use serde::{Deserialize, Serialize};

/// Channel used when the caller does not name one
pub const DEFAULT_CHANNEL: &str = "global";

/// Action type tag for movement
pub const MOVE_ACTION: &str = "move";

/// Action type tag for firing
pub const SHOOT_ACTION: &str = "shoot";

/// Opaque velocity value; its shape is defined by the game server
pub type Velocity = serde_json::Value;

/// Chat message request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Message text, passed through uninterpreted
    pub message: String,
    /// Target channel ("global", "match", ...)
    pub channel: String,
}

impl ChatRequest {
    /// Request for the default channel
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_channel(message, DEFAULT_CHANNEL)
    }

    pub fn with_channel(message: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            channel: channel.into(),
        }
    }
}

/// Movement to an absolute position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveAction {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Shot fired from a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootAction {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Attached verbatim
    pub velocity: Velocity,
}

/// Action payload body
///
/// Serialized untagged: the body on the wire is exactly the inner record,
/// the action type travels next to it in [`GenericAction`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionData {
    Move(MoveAction),
    Shoot(ShootAction),
    /// Caller-defined data for action kinds without a dedicated method
    Custom(serde_json::Value),
}

impl From<MoveAction> for ActionData {
    fn from(action: MoveAction) -> Self {
        Self::Move(action)
    }
}

impl From<ShootAction> for ActionData {
    fn from(action: ShootAction) -> Self {
        Self::Shoot(action)
    }
}

impl From<serde_json::Value> for ActionData {
    fn from(value: serde_json::Value) -> Self {
        Self::Custom(value)
    }
}

/// Game action request: a type tag plus its payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericAction {
    pub action_type: String,
    pub action_data: ActionData,
}

impl GenericAction {
    pub fn new(action_type: impl Into<String>, action_data: impl Into<ActionData>) -> Self {
        Self {
            action_type: action_type.into(),
            action_data: action_data.into(),
        }
    }
}

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Chat line for a channel
    ChatMessage(ChatRequest),

    /// Game action for the current match
    GameAction(GenericAction),
}
