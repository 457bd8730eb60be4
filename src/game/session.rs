//! Game session - one engine driven on a fixed tick per connection

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::codes::issuer;
use crate::codes::store::CodeStore;
use crate::config::{COMMAND_CAPACITY, TICK_DELAY_MS};
use crate::protocol::ServerMessage;

use super::direction::Direction;
use super::engine::{Game, Phase, TickEvent};

/// Commands a client can apply to its game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start or restart the game
    Start,
    /// Queue a direction change
    Steer(Direction),
}

/// A single player's game, its command inbox, and its outbound message feed
pub struct GameSession {
    id: Uuid,
    game: Game,
    commands: mpsc::Receiver<SessionCommand>,
    out: mpsc::Sender<ServerMessage>,
    store: CodeStore,
}

impl GameSession {
    /// Spawn the session task. Returns the command sender; dropping it ends
    /// the session.
    pub fn spawn(id: Uuid, store: CodeStore, out: mpsc::Sender<ServerMessage>) -> mpsc::Sender<SessionCommand> {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let session = Self {
            id,
            game: Game::new(),
            commands: rx,
            out,
            store,
        };
        tokio::spawn(session.run());
        tx
    }

    async fn run(mut self) {
        let mut ticker = interval(Duration::from_millis(TICK_DELAY_MS));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.step().await;
                }
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.apply(cmd).await,
                    None => break,
                },
            }
        }

        debug!(session = %self.id, "game session ended");
    }

    /// Process one tick while running; each tick completes before the next
    /// is taken.
    async fn step(&mut self) {
        if self.game.phase() != Phase::Running {
            return;
        }

        let events = self.game.tick();

        if self.out.send(self.snapshot()).await.is_err() {
            return;
        }

        for event in events {
            match event {
                TickEvent::AppleEaten => {
                    debug!(session = %self.id, score = self.game.score(), "apple eaten");
                }
                TickEvent::ThresholdReached => self.request_code(),
                TickEvent::GameOver { score } => {
                    info!(session = %self.id, score, "game over");
                    let _ = self.out.send(ServerMessage::GameOver { score }).await;
                }
            }
        }
    }

    /// Fire the issuer once; the result comes back over the outbound channel.
    /// An issuance failure is logged and the game keeps running.
    fn request_code(&self) {
        let store = self.store.clone();
        let out = self.out.clone();
        let id = self.id;

        tokio::spawn(async move {
            match issuer::issue(&store).await {
                Ok(code) => {
                    info!(session = %id, %code, "issued redemption code");
                    let _ = out.send(ServerMessage::Code { code }).await;
                }
                Err(e) => {
                    error!(session = %id, error = %e, "code issuance failed");
                }
            }
        });
    }

    async fn apply(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Start => {
                info!(session = %self.id, "game started");
                self.game.start();
                let _ = self.out.send(self.snapshot()).await;
            }
            SessionCommand::Steer(direction) => {
                if !self.game.steer(direction) {
                    debug!(session = %self.id, ?direction, "reverse input ignored");
                }
            }
        }
    }

    fn snapshot(&self) -> ServerMessage {
        ServerMessage::Update {
            snake: self.game.cells(),
            apple: self.game.apple(),
            score: self.game.score(),
            phase: self.game.phase(),
        }
    }
}
