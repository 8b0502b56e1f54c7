//! Seams between the engine and the host it runs in.
//!
//! The engine only ever talks to these traits; `web` implements them on top
//! of the browser, the tests implement them with recording fakes.

use crate::config::AppleShape;
use crate::error::SnakeError;
use crate::game_logic::{Collision, Position};

/// Draws one frame. Called once per tick in a fixed order: background,
/// apple, then every snake cell.
pub trait Renderer {
  fn draw_background(&mut self);
  fn draw_apple(&mut self, pos:Position, shape:AppleShape);
  fn draw_snake_cell(&mut self, pos:Position);
}

/// Presentation of the running score plus the end-of-run acknowledgment.
pub trait ScoreBoard {
  fn show(&mut self, score:u32, best:u32, fps:u32);
  /// Blocks until the player has acknowledged the collision.
  fn announce(&mut self, collision:Collision, score:u32, best:u32);
}

/// Durable storage for the single best score.
pub trait HighScoreStore {
  /// Returns 0 when nothing was stored yet.
  fn get(&self) -> Result<u32,SnakeError>;
  fn set(&mut self, score:u32) -> Result<(),SnakeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {Tick,SpeedRamp}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub i32);

/// Periodic timers. A started task fires every `period_ms` until cancelled.
pub trait Scheduler {
  fn start(&mut self, task:Task, period_ms:u32) -> Result<TaskHandle,SnakeError>;
  fn cancel(&mut self, handle:TaskHandle);
}
