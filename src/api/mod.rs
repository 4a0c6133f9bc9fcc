//! High-level client APIs layered over a [`Connection`](crate::connection::Connection)

pub mod action;
pub mod chat;

pub use action::ActionFacade;
pub use chat::ChatFacade;
