//! Game engine - a fixed-tick snake state machine
//!
//! One `Game` per session. The surrounding loop calls [`Game::tick`] on a
//! fixed period and reacts to the returned events; the engine itself never
//! touches the clock, the network, or the store.

use std::collections::VecDeque;

use serde::Serialize;

use super::direction::Direction;
use super::point::Point;
use crate::config::{APPLE_START, SCORE_THRESHOLD, SNAKE_START};

/// Lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Not started yet
    Idle,
    /// Tick loop active
    Running,
    /// Terminal until the next start
    Over,
}

/// What happened during a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// The head landed on the apple; score and length grew by one
    AppleEaten,
    /// The score reached the threshold for the first time this game
    ThresholdReached,
    /// The head hit the body; the game is over
    GameOver { score: u32 },
}

/// Snake game state
#[derive(Debug, Clone)]
pub struct Game {
    phase: Phase,
    /// Body cells, head first
    snake: VecDeque<Point>,
    /// Direction in effect for the current tick
    direction: Direction,
    /// Accepted input waiting to take effect on the next tick
    pending: Option<Direction>,
    apple: Point,
    score: u32,
    /// Latched after the threshold crossing fires, reset on start
    code_requested: bool,
}

impl Game {
    /// Create a game in the initial layout, not yet running
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            snake: SNAKE_START.iter().copied().map(Point::from).collect(),
            direction: Direction::Up,
            pending: None,
            apple: Point::from(APPLE_START),
            score: 0,
            code_requested: false,
        }
    }

    /// Start or restart: reset everything and begin running
    pub fn start(&mut self) {
        self.snake = SNAKE_START.iter().copied().map(Point::from).collect();
        self.direction = Direction::Up;
        self.pending = None;
        self.apple = Point::from(APPLE_START);
        self.score = 0;
        self.code_requested = false;
        self.phase = Phase::Running;
    }

    /// Queue a direction change for the next tick.
    ///
    /// The exact reverse of the direction in effect is ignored (a snake
    /// cannot fold back into its own neck). Returns whether the input was
    /// accepted.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(&self.direction) {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Advance the game by one tick.
    ///
    /// Movement uses the direction in effect when the tick starts. The new
    /// head is checked against every current body cell (tail included)
    /// before the body is committed.
    pub fn tick(&mut self) -> Vec<TickEvent> {
        if self.phase != Phase::Running {
            return Vec::new();
        }

        let mut events = Vec::new();

        if let Some(direction) = self.pending.take() {
            self.direction = direction;
        }

        let new_head = self.head().step(self.direction);

        if self.snake.contains(&new_head) {
            self.phase = Phase::Over;
            events.push(TickEvent::GameOver { score: self.score });
            return events;
        }

        self.snake.push_front(new_head);

        if new_head == self.apple {
            // Grow: keep the tail
            self.score += 1;
            self.apple = Point::random();
            events.push(TickEvent::AppleEaten);

            if self.score >= SCORE_THRESHOLD && !self.code_requested {
                self.code_requested = true;
                events.push(TickEvent::ThresholdReached);
            }
        } else {
            self.snake.pop_back();
        }

        events
    }

    /// Get the head cell
    pub fn head(&self) -> Point {
        *self.snake.front().expect("snake must have a head")
    }

    /// Get all body cells, head first
    pub fn cells(&self) -> Vec<Point> {
        self.snake.iter().copied().collect()
    }

    /// Get the apple cell
    pub fn apple(&self) -> Point {
        self.apple
    }

    /// Get the current score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Get the current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the direction in effect
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
