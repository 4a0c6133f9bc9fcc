//! Game action API - movement, firing and custom actions

use std::sync::Arc;

use crate::connection::{Connection, ConnectionError};
use crate::protocol::{ActionData, MoveAction, ShootAction, Velocity, MOVE_ACTION, SHOOT_ACTION};

/// High-level API for game state synchronization
///
/// Coordinates are forwarded exactly as given: no bounds checks, unit
/// conversion or normalization, and non-finite values pass through.
#[derive(Clone)]
pub struct ActionFacade {
    connection: Arc<dyn Connection>,
}

impl ActionFacade {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    /// Send a move action to the server
    pub async fn send_move(&self, x: f64, y: f64, z: f64) -> Result<(), ConnectionError> {
        self.dispatch(MOVE_ACTION, MoveAction { x, y, z }.into())
            .await
    }

    /// Send a shoot action to the server
    pub async fn send_shoot(
        &self,
        x: f64,
        y: f64,
        z: f64,
        velocity: Velocity,
    ) -> Result<(), ConnectionError> {
        self.dispatch(SHOOT_ACTION, ShootAction { x, y, z, velocity }.into())
            .await
    }

    /// Send a custom game action to the server
    pub async fn send_action(
        &self,
        action_type: &str,
        action_data: serde_json::Value,
    ) -> Result<(), ConnectionError> {
        self.dispatch(action_type, ActionData::Custom(action_data))
            .await
    }

    async fn dispatch(
        &self,
        action_type: &str,
        action_data: ActionData,
    ) -> Result<(), ConnectionError> {
        self.connection
            .send_game_action(action_type, action_data)
            .await
    }
}
