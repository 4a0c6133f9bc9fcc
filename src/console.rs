//! Console command parsing and dispatch

use std::future::Future;

use game_server_sdk::{ActionFacade, ChatFacade, ConnectionError, Velocity};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `say <text>`
    Say { message: String },
    /// `chat <channel> <text>`
    Chat { channel: String, message: String },
    /// `move <x> <y> <z>`
    Move { x: f64, y: f64, z: f64 },
    /// `shoot <x> <y> <z> <velocity-json>`
    Shoot { x: f64, y: f64, z: f64, velocity: Velocity },
    /// `action <type> [data-json]`
    Action { action_type: String, data: serde_json::Value },
    /// `quit`
    Quit,
}

/// Console parse errors
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

/// Parse one input line; `Ok(None)` for blank lines
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = split_word(line);

    let command = match verb {
        "say" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("say <text>"));
            }
            Command::Say {
                message: rest.to_string(),
            }
        }
        "chat" => {
            let (channel, message) = split_word(rest);
            if channel.is_empty() || message.is_empty() {
                return Err(CommandError::Usage("chat <channel> <text>"));
            }
            Command::Chat {
                channel: channel.to_string(),
                message: message.to_string(),
            }
        }
        "move" => {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            let [x, y, z] = parts.as_slice() else {
                return Err(CommandError::Usage("move <x> <y> <z>"));
            };
            Command::Move {
                x: parse_coord("x", x)?,
                y: parse_coord("y", y)?,
                z: parse_coord("z", z)?,
            }
        }
        "shoot" => {
            let (x, rest) = split_word(rest);
            let (y, rest) = split_word(rest);
            let (z, velocity) = split_word(rest);
            if velocity.is_empty() {
                return Err(CommandError::Usage("shoot <x> <y> <z> <velocity-json>"));
            }
            Command::Shoot {
                x: parse_coord("x", x)?,
                y: parse_coord("y", y)?,
                z: parse_coord("z", z)?,
                velocity: parse_json(velocity)?,
            }
        }
        "action" => {
            let (action_type, data) = split_word(rest);
            if action_type.is_empty() {
                return Err(CommandError::Usage("action <type> [data-json]"));
            }
            let data = if data.is_empty() {
                serde_json::Value::Null
            } else {
                parse_json(data)?
            };
            Command::Action {
                action_type: action_type.to_string(),
                data,
            }
        }
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// Run a command against the facades
///
/// Returns `Ok(false)` when the console should stop.
pub async fn execute(
    command: Command,
    chat: &ChatFacade,
    actions: &ActionFacade,
) -> Result<bool, ConnectionError> {
    match command {
        Command::Say { message } => chat.send_message(&message).await?,
        Command::Chat { channel, message } => {
            chat.send_message_to_channel(&message, &channel).await?
        }
        Command::Move { x, y, z } => actions.send_move(x, y, z).await?,
        Command::Shoot { x, y, z, velocity } => actions.send_shoot(x, y, z, velocity).await?,
        Command::Action { action_type, data } => actions.send_action(&action_type, data).await?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Execute input lines until end of input, `quit`, or `shutdown` resolves
///
/// Unparseable lines are logged and skipped; the first send failure stops the
/// loop and is returned.
pub async fn run<F>(
    mut lines: mpsc::Receiver<String>,
    chat: &ChatFacade,
    actions: &ActionFacade,
    shutdown: F,
) -> Result<(), ConnectionError>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.recv() => match line {
                Some(line) => line,
                None => {
                    debug!("Console input closed");
                    break;
                }
            },
            _ = &mut shutdown => break,
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "Ignoring console input");
                continue;
            }
        };

        if !execute(command, chat, actions).await? {
            info!("Quit requested");
            break;
        }
    }

    Ok(())
}

/// Split off the first whitespace-delimited word
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], input[idx..].trim_start()),
        None => (input, ""),
    }
}

fn parse_coord(field: &'static str, raw: &str) -> Result<f64, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn parse_json(raw: &str) -> Result<serde_json::Value, CommandError> {
    serde_json::from_str(raw).map_err(|e| CommandError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_server_sdk::{ChatRequest, ClientMsg, GenericAction, MoveAction, OutboundConnection};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    fn facades(capacity: usize) -> (ChatFacade, ActionFacade, mpsc::Receiver<ClientMsg>) {
        let (conn, outbox) = OutboundConnection::new(capacity);
        let conn = Arc::new(conn);
        (ChatFacade::new(conn.clone()), ActionFacade::new(conn), outbox)
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn parses_say_and_chat() {
        assert_eq!(
            parse_command("say hello  there"),
            Ok(Some(Command::Say {
                message: "hello  there".to_string()
            }))
        );
        assert_eq!(
            parse_command("chat match gl hf"),
            Ok(Some(Command::Chat {
                channel: "match".to_string(),
                message: "gl hf".to_string()
            }))
        );
        assert_eq!(
            parse_command("chat match"),
            Err(CommandError::Usage("chat <channel> <text>"))
        );
    }

    #[test]
    fn parses_move_including_non_finite_values() {
        assert_eq!(
            parse_command("move 1 -2.5 3e2"),
            Ok(Some(Command::Move {
                x: 1.0,
                y: -2.5,
                z: 300.0
            }))
        );

        match parse_command("move NaN inf -inf") {
            Ok(Some(Command::Move { x, y, z })) => {
                assert!(x.is_nan());
                assert_eq!(y, f64::INFINITY);
                assert_eq!(z, f64::NEG_INFINITY);
            }
            other => panic!("unexpected parse result: {:?}", other),
        }
    }

    #[test]
    fn move_errors() {
        assert_eq!(
            parse_command("move 1 2"),
            Err(CommandError::Usage("move <x> <y> <z>"))
        );
        assert_eq!(
            parse_command("move 1 two 3"),
            Err(CommandError::InvalidNumber {
                field: "y",
                value: "two".to_string()
            })
        );
    }

    #[test]
    fn parses_shoot_with_json_velocity() {
        assert_eq!(
            parse_command(r#"shoot 0 1 2 {"dx": 5, "dy": 0}"#),
            Ok(Some(Command::Shoot {
                x: 0.0,
                y: 1.0,
                z: 2.0,
                velocity: json!({ "dx": 5, "dy": 0 })
            }))
        );
        assert!(matches!(
            parse_command("shoot 0 1 2 {broken"),
            Err(CommandError::InvalidJson(_))
        ));
        assert_eq!(
            parse_command("shoot 0 1 2"),
            Err(CommandError::Usage("shoot <x> <y> <z> <velocity-json>"))
        );
    }

    #[test]
    fn parses_action_with_optional_data() {
        assert_eq!(
            parse_command("action emote"),
            Ok(Some(Command::Action {
                action_type: "emote".to_string(),
                data: serde_json::Value::Null
            }))
        );
        assert_eq!(
            parse_command(r#"action emote ["wave", 2]"#),
            Ok(Some(Command::Action {
                action_type: "emote".to_string(),
                data: json!(["wave", 2])
            }))
        );
    }

    #[test]
    fn unknown_and_quit() {
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
        assert_eq!(
            parse_command("dance now"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }

    #[tokio::test]
    async fn execute_drives_facades_into_outbound_frames() {
        let (conn, mut rx) = OutboundConnection::new(4);
        let conn = Arc::new(conn);
        let chat = ChatFacade::new(conn.clone());
        let actions = ActionFacade::new(conn);

        let say = Command::Say {
            message: "hello".to_string(),
        };
        assert_eq!(execute(say, &chat, &actions).await, Ok(true));
        let mv = Command::Move {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        assert_eq!(execute(mv, &chat, &actions).await, Ok(true));
        assert_eq!(execute(Command::Quit, &chat, &actions).await, Ok(false));

        assert_eq!(
            rx.recv().await,
            Some(ClientMsg::ChatMessage(ChatRequest::new("hello")))
        );
        assert_eq!(
            rx.recv().await,
            Some(ClientMsg::GameAction(GenericAction::new(
                "move",
                MoveAction { x: 1.0, y: 2.0, z: 3.0 }
            )))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn execute_surfaces_connection_errors() {
        let (conn, rx) = OutboundConnection::new(1);
        drop(rx);
        let conn = Arc::new(conn);
        let chat = ChatFacade::new(conn.clone());
        let actions = ActionFacade::new(conn);

        let result = execute(
            Command::Say {
                message: "lost".to_string(),
            },
            &chat,
            &actions,
        )
        .await;

        assert_eq!(result, Err(ConnectionError::Closed));
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_while_input_stays_open() {
        let (chat, actions, mut outbox) = facades(4);
        let (line_tx, line_rx) = mpsc::channel(4);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let console = run(line_rx, &chat, &actions, async move {
            let _ = stop_rx.await;
        });
        let driver = async {
            line_tx.send("say hello".to_string()).await.unwrap();
            let frame = outbox.recv().await;
            stop_tx.send(()).unwrap();
            frame
        };

        let (result, frame) = timeout(Duration::from_secs(5), async {
            tokio::join!(console, driver)
        })
        .await
        .expect("console kept running after shutdown");

        assert_eq!(result, Ok(()));
        assert_eq!(frame, Some(ClientMsg::ChatMessage(ChatRequest::new("hello"))));
        assert!(!line_tx.is_closed());
    }

    #[tokio::test]
    async fn run_stops_at_end_of_input_and_skips_bad_lines() {
        let (chat, actions, mut outbox) = facades(4);
        let (line_tx, line_rx) = mpsc::channel(8);
        for line in ["dance", "", "move 1 two 3", "move 1 2 3"] {
            line_tx.send(line.to_string()).await.unwrap();
        }
        drop(line_tx);

        let result = timeout(
            Duration::from_secs(5),
            run(line_rx, &chat, &actions, std::future::pending()),
        )
        .await
        .expect("console kept running after end of input");

        assert_eq!(result, Ok(()));
        assert_eq!(
            outbox.recv().await,
            Some(ClientMsg::GameAction(GenericAction::new(
                "move",
                MoveAction { x: 1.0, y: 2.0, z: 3.0 }
            )))
        );
        assert!(outbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn run_stops_on_quit() {
        let (chat, actions, mut outbox) = facades(4);
        let (line_tx, line_rx) = mpsc::channel(8);
        for line in ["quit", "say too late"] {
            line_tx.send(line.to_string()).await.unwrap();
        }

        let result = timeout(
            Duration::from_secs(5),
            run(line_rx, &chat, &actions, std::future::pending()),
        )
        .await
        .expect("console ignored quit");

        assert_eq!(result, Ok(()));
        assert!(outbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn run_returns_first_send_failure() {
        let (chat, actions, outbox) = facades(1);
        drop(outbox);
        let (line_tx, line_rx) = mpsc::channel(8);
        line_tx.send("say anyone?".to_string()).await.unwrap();

        let result = timeout(
            Duration::from_secs(5),
            run(line_rx, &chat, &actions, std::future::pending()),
        )
        .await
        .expect("console kept running after send failure");

        assert_eq!(result, Err(ConnectionError::Closed));
    }
}
