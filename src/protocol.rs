//! Protocol messages for WebSocket communication

use serde::Serialize;

use crate::game::direction::Direction;
use crate::game::engine::Phase;
use crate::game::point::Point;
use crate::mint::MintStatus;

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Start or restart the game
    Start,
    /// Direction change command
    Direction(Direction),
    /// Connect the wallet
    Connect,
    /// Redeem a code for a simulated mint
    Redeem(String),
    /// Ping to keep the connection alive
    Ping,
}

impl ClientMessage {
    /// Parse a client message from a text frame
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Some(dir) = Direction::from_str(s) {
            return Some(ClientMessage::Direction(dir));
        }

        if let Some(code) = s.strip_prefix("redeem ") {
            let code = code.trim();
            if code.is_empty() {
                return None;
            }
            return Some(ClientMessage::Redeem(code.to_string()));
        }

        match s {
            "start" => Some(ClientMessage::Start),
            "connect" => Some(ClientMessage::Connect),
            "ping" => Some(ClientMessage::Ping),
            _ => None,
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Game state after a tick or a start
    Update {
        snake: Vec<Point>,
        apple: Point,
        score: u32,
        phase: Phase,
    },
    /// The game ended with this final score
    GameOver { score: u32 },
    /// A redemption code was issued for this game
    Code { code: String },
    /// Wallet connection state
    Wallet { account: Option<String> },
    /// A mint attempt changed state
    Mint { status: MintStatus },
    /// Inline guidance for the user
    Notice { message: String },
}

impl ServerMessage {
    /// Serialize message to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        assert_eq!(
            ClientMessage::parse("left"),
            Some(ClientMessage::Direction(Direction::Left))
        );
        assert_eq!(
            ClientMessage::parse("  up  "),
            Some(ClientMessage::Direction(Direction::Up))
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ClientMessage::parse("start"), Some(ClientMessage::Start));
        assert_eq!(ClientMessage::parse("connect"), Some(ClientMessage::Connect));
        assert_eq!(ClientMessage::parse("ping"), Some(ClientMessage::Ping));
        assert_eq!(ClientMessage::parse("launch"), None);
    }

    #[test]
    fn test_parse_redeem() {
        assert_eq!(
            ClientMessage::parse("redeem AB12CD34"),
            Some(ClientMessage::Redeem("AB12CD34".to_string()))
        );
        assert_eq!(ClientMessage::parse("redeem "), None);
    }

    #[test]
    fn test_server_message_json() {
        let msg = ServerMessage::GameOver { score: 5 };
        assert_eq!(msg.to_json(), r#"{"type":"game_over","score":5}"#);

        let msg = ServerMessage::Code {
            code: "AB12CD34".to_string(),
        };
        assert_eq!(msg.to_json(), r#"{"type":"code","code":"AB12CD34"}"#);
    }

    #[test]
    fn test_mint_status_json() {
        let msg = ServerMessage::Mint {
            status: MintStatus::Success {
                token_id: "42".to_string(),
            },
        };
        assert_eq!(
            msg.to_json(),
            r#"{"type":"mint","status":{"state":"success","token_id":"42"}}"#
        );
    }
}
