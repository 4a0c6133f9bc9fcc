//! Game Server SDK - typed client APIs for the multiplayer game server
//!
//! The crate exposes two facades over a shared [`Connection`]:
//! - [`ChatFacade`] for chat messages (default channel `"global"`)
//! - [`ActionFacade`] for move, shoot and custom game actions
//!
//! Transport, encoding and delivery belong to the `Connection` implementation.
//! [`OutboundConnection`] is an in-process implementation that queues
//! [`ClientMsg`] frames for a transport task.

pub mod api;
pub mod config;
pub mod connection;
pub mod protocol;

pub use api::{ActionFacade, ChatFacade};
pub use config::{ClientConfig, ConfigError, LogFormat};
pub use connection::{Connection, ConnectionError, OutboundConnection};
pub use protocol::{
    ActionData, ChatRequest, ClientMsg, GenericAction, MoveAction, ShootAction, Velocity,
    DEFAULT_CHANNEL,
};
