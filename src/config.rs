//! Game and server configuration constants

/// Playfield width in cells
pub const GRID_WIDTH: i32 = 20;

/// Playfield height in cells
pub const GRID_HEIGHT: i32 = 20;

/// Game tick delay in milliseconds
pub const TICK_DELAY_MS: u64 = 100;

/// Initial snake body, head first
pub const SNAKE_START: [(i32, i32); 2] = [(8, 7), (8, 8)];

/// Initial apple position
pub const APPLE_START: (i32, i32) = (8, 3);

/// Score at which a redemption code is issued
pub const SCORE_THRESHOLD: u32 = 10;

// =============================================================================
// Redemption codes
// =============================================================================

/// Characters a redemption code is drawn from
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a redemption code
pub const CODE_LENGTH: usize = 8;

/// How many fresh codes to try when an insert hits the UNIQUE constraint
pub const CODE_ISSUE_ATTEMPTS: u32 = 4;

// =============================================================================
// Wallet / minting
// =============================================================================

/// Simulated transaction latency in milliseconds
pub const MINT_DELAY_MS: u64 = 2000;

/// Token identifiers are drawn from 0..MINT_TOKEN_SPACE
pub const MINT_TOKEN_SPACE: u64 = 1_000_000;

// =============================================================================
// Server
// =============================================================================

/// HTTP/WebSocket server port
pub const SERVER_PORT: u16 = 8080;

/// Default code store location, overridable via DATABASE_URL
pub const DEFAULT_DATABASE_URL: &str = "sqlite:codes.db?mode=rwc";

/// Capacity of a connection's outbound message channel
pub const OUTBOUND_CAPACITY: usize = 100;

/// Capacity of a session's command channel
pub const COMMAND_CAPACITY: usize = 32;
