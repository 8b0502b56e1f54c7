//! In-memory collaborators for exercising the engine without a browser.

use std::collections::HashMap;

use crate::config::AppleShape;
use crate::error::SnakeError;
use crate::game_logic::{Collision, Position};
use crate::interfaces::{HighScoreStore, Renderer, ScoreBoard, Scheduler, Task, TaskHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
  Background,
  Apple(Position,AppleShape),
  Snake(Position),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
  pub draws: Vec<Draw>,
}

impl Renderer for RecordingRenderer {
  fn draw_background(&mut self) {
    self.draws.push(Draw::Background);
  }
  fn draw_apple(&mut self, pos:Position, shape:AppleShape) {
    self.draws.push(Draw::Apple(pos,shape));
  }
  fn draw_snake_cell(&mut self, pos:Position) {
    self.draws.push(Draw::Snake(pos));
  }
}

#[derive(Debug, Default)]
pub struct RecordingBoard {
  pub shown: Vec<(u32,u32,u32)>,
  pub announced: Vec<(Collision,u32,u32)>,
}

impl ScoreBoard for RecordingBoard {
  fn show(&mut self, score:u32, best:u32, fps:u32) {
    self.shown.push((score,best,fps));
  }
  fn announce(&mut self, collision:Collision, score:u32, best:u32) {
    self.announced.push((collision,score,best));
  }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  pub value: Option<u32>,
  pub writes: usize,
  pub fail_reads: bool,
  pub fail_writes: bool,
}

impl MemoryStore {
  pub fn with_value(value:u32) -> Self {
    MemoryStore {value: Some(value), ..Default::default()}
  }
}

impl HighScoreStore for MemoryStore {
  fn get(&self) -> Result<u32,SnakeError> {
    if self.fail_reads {
      return Err(SnakeError::Storage("read refused".to_string()));
    }
    Ok(self.value.unwrap_or(0))
  }

  fn set(&mut self, score:u32) -> Result<(),SnakeError> {
    if self.fail_writes {
      return Err(SnakeError::Storage("quota exceeded".to_string()));
    }
    self.value = Some(score);
    self.writes += 1;
    Ok(())
  }
}

/// Keeps track of which periodic tasks are live, like a set of interval ids.
#[derive(Debug, Default)]
pub struct SpyScheduler {
  live: HashMap<TaskHandle,(Task,u32)>,
  next_id: i32,
  pub started: usize,
  pub cancelled: usize,
  pub fail: bool,
}

impl SpyScheduler {
  pub fn live(&self, task:Task) -> usize {
    self.live.values().filter(|(t,_)| *t == task).count()
  }

  /// Period of the live task of that kind, if exactly one is live.
  pub fn period(&self, task:Task) -> Option<u32> {
    let mut periods = self.live.values().filter(|(t,_)| *t == task).map(|(_,p)| *p);
    match (periods.next(), periods.next()) {
      (Some(period), None) => Some(period),
      _ => None
    }
  }
}

impl Scheduler for SpyScheduler {
  fn start(&mut self, task:Task, period_ms:u32) -> Result<TaskHandle,SnakeError> {
    if self.fail {
      return Err(SnakeError::Scheduler("timers unavailable".to_string()));
    }
    self.next_id += 1;
    let handle = TaskHandle(self.next_id);
    self.live.insert(handle, (task,period_ms));
    self.started += 1;
    Ok(handle)
  }

  fn cancel(&mut self, handle:TaskHandle) {
    if self.live.remove(&handle).is_some() {
      self.cancelled += 1;
    }
  }
}
