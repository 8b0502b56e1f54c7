use std::collections::VecDeque;

use log::{debug, error, info, warn};
use rand::Rng;

use crate::config::GameConfig;
use crate::error::SnakeError;
use crate::interfaces::{HighScoreStore, Renderer, ScoreBoard, Scheduler, Task, TaskHandle};

/// Random draws tried before falling back to a scan of the free cells.
pub const APPLE_SAMPLE_ATTEMPTS:usize = 64;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction{Up,Dn,Lf,Rt}

impl Direction {
  pub fn vector(self) -> (i32,i32) {
    match self {
      Direction::Up => ( 0,-1),
      Direction::Dn => ( 0, 1),
      Direction::Lf => (-1, 0),
      Direction::Rt => ( 1, 0),
    }
  }
}

/// Top-left corner of a cell, in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
  pub x: i32,
  pub y: i32,
}

impl Position {
  pub const fn new(x:i32, y:i32) -> Position {
    Position {x,y}
  }

  pub fn stepped(self, direction:Direction, cell_size:i32) -> Position {
    let (dx,dy) = direction.vector();
    Position::new(self.x + dx*cell_size, self.y + dy*cell_size)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
  SelfBite,
  Boundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
  GeneralMovement,
  AppleCollected,
  GameOver(Collision),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
  pub head: Position,
  pub direction: Direction,
  /// Target body length.
  pub length: usize,
  /// Past head positions, oldest first.
  pub body: VecDeque<Position>,
}

impl Snake {
  fn spawn(config:&GameConfig) -> Snake {
    let centre = (config.cells_count / 2) as i32;
    Snake {
      head: Position::new((centre - 1) * config.cell_size, centre * config.cell_size),
      direction: Direction::Rt,
      length: config.initial_length,
      body: VecDeque::new(),
    }
  }

  pub fn occupies(&self, pos:Position) -> bool {
    self.body.contains(&pos)
  }

  /// Like `occupies`, but also counts a head that is not recorded yet.
  pub fn covers(&self, pos:Position) -> bool {
    self.head == pos || self.occupies(pos)
  }

  /// Compares the most recently recorded position with the older ones.
  /// The record lags the head by one tick, so a bite is seen one tick late.
  pub fn has_bitten_itself(&self) -> bool {
    match self.body.back() {
      Some(last) => self.body.iter().rev().skip(1).any(|segment| segment == last),
      None       => false
    }
  }

  fn record_head(&mut self) {
    self.body.push_back(self.head);
    while self.body.len() > self.length {
      self.body.pop_front();
    }
  }

  fn neck(&self) -> Option<Position> {
    let len = self.body.len();
    if len < 2 {return None}
    self.body.get(len-2).copied()
  }
}

/// The whole simulation: one instance per game on the page.
///
/// Timers are owned through the [`Scheduler`]; at most one tick task and one
/// speed-ramp task are live at any moment.
pub struct SnakeEngine<R:Rng, S:Scheduler, H:HighScoreStore> {
  config: GameConfig,
  rng: R,
  scheduler: S,
  store: H,
  snake: Snake,
  apple: Position,
  score: u32,
  best_score: u32,
  fps: u32,
  tick_task: Option<TaskHandle>,
  ramp_task: Option<TaskHandle>,
}

impl<R:Rng, S:Scheduler, H:HighScoreStore> SnakeEngine<R,S,H> {
  /// Builds an idle engine. Nothing is scheduled until [`setup`](Self::setup).
  pub fn new(config:GameConfig, rng:R, scheduler:S, store:H) -> Result<Self,SnakeError> {
    config.validate()?;
    let best_score = store.get().unwrap_or_else(|err| {
      warn!("could not read best score, starting from 0: {err}");
      0
    });
    let mut engine = SnakeEngine {
      snake: Snake::spawn(&config),
      apple: Position::new(0,0),
      score: 0,
      best_score,
      fps: config.initial_fps,
      tick_task: None,
      ramp_task: None,
      config,
      rng,
      scheduler,
      store,
    };
    engine.place_apple();
    Ok(engine)
  }

  /// Starts a fresh run, replacing all run state and re-arming the timers.
  /// The cached best score is re-read from the store.
  pub fn setup(&mut self) {
    self.snake = Snake::spawn(&self.config);
    self.score = 0;
    self.fps = self.config.initial_fps;
    self.best_score = self.read_best();
    self.place_apple();
    self.launch_tasks();
    info!(
      "new run: head at ({}, {}), {} fps",
      self.snake.head.x, self.snake.head.y, self.fps
    );
  }

  /// Puts the apple on a random cell outside the snake. Returns false when
  /// every cell is taken, in which case the apple is left where it was.
  pub fn place_apple(&mut self) -> bool {
    let cells = self.config.cells_count as i32;
    let size = self.config.cell_size;
    for _ in 0..APPLE_SAMPLE_ATTEMPTS {
      let candidate = Position::new(
        self.rng.gen_range(0..cells) * size,
        self.rng.gen_range(0..cells) * size
      );
      if !self.snake.covers(candidate) {
        self.apple = candidate;
        return true;
      }
    }
    let free = (0..cells)
      .flat_map(|x| (0..cells).map(move |y| Position::new(x*size, y*size)))
      .filter(|pos| !self.snake.covers(*pos))
      .collect::<Vec<Position>>();
    if free.is_empty() {
      warn!("no free cell left for the apple");
      return false;
    }
    self.apple = free[self.rng.gen_range(0..free.len())];
    true
  }

  /// Puts the apple on a chosen cell, bypassing the random draw.
  pub fn place_apple_at(&mut self, pos:Position) {
    self.apple = pos;
  }

  pub fn tick<V:Renderer, B:ScoreBoard>(&mut self, renderer:&mut V, board:&mut B)
    -> GameEvent
  {
    if let Some(collision) = self.detect_collision() {
      self.end_run(collision, board);
      return GameEvent::GameOver(collision);
    }

    self.snake.head = self.snake.head.stepped(self.snake.direction, self.config.cell_size);

    let mut event = GameEvent::GeneralMovement;
    if self.snake.head == self.apple {
      self.score += 1;
      self.snake.length = self.score as usize + self.config.initial_length;
      self.place_apple();
      debug!("apple eaten, score {} length {}", self.score, self.snake.length);
      event = GameEvent::AppleCollected;
    }

    renderer.draw_background();
    renderer.draw_apple(self.apple, self.config.apple_shape);
    renderer.draw_snake_cell(self.snake.head);

    self.snake.record_head();
    for segment in self.snake.body.iter() {
      renderer.draw_snake_cell(*segment);
    }

    board.show(self.score, self.best_score, self.fps);
    event
  }

  pub fn detect_collision(&self) -> Option<Collision> {
    if self.snake.has_bitten_itself() {
      Some(Collision::SelfBite)
    } else if self.is_out_of_bounds(self.snake.head) {
      Some(Collision::Boundary)
    } else {
      None
    }
  }

  /// The last row and column count as outside: the far edge is tested with
  /// `>=` against one unit less than the surface size.
  pub fn is_out_of_bounds(&self, pos:Position) -> bool {
    let size = self.config.cell_size;
    let limit = self.config.surface_size() - 1;
    pos.x < 0 || pos.x + size >= limit || pos.y < 0 || pos.y + size >= limit
  }

  fn end_run<B:ScoreBoard>(&mut self, collision:Collision, board:&mut B) {
    let best = self.read_best();
    info!("run over ({collision:?}) with score {}", self.score);
    board.announce(collision, self.score, best);
    let score = self.score;
    if score > best {
      if let Err(err) = self.store.set(score) {
        error!("could not persist best score {score}: {err}");
      }
    }
    self.best_score = best;
    self.setup();
    // a failed write leaves the store behind the run that just ended
    self.best_score = self.best_score.max(score);
  }

  /// Fresh value from the store, or the cached one if it cannot be read.
  fn read_best(&self) -> u32 {
    match self.store.get() {
      Ok(best) => best,
      Err(err) => {
        warn!("could not read best score, using cached {}: {err}", self.best_score);
        self.best_score
      }
    }
  }

  /// Applied immediately; the last call before a tick wins.
  pub fn set_direction(&mut self, direction:Direction) {
    if !self.config.allow_reversal {
      let next = self.snake.head.stepped(direction, self.config.cell_size);
      if self.snake.neck() == Some(next) {
        debug!("ignoring turn {direction:?} back onto the neck");
        return;
      }
    }
    self.snake.direction = direction;
  }

  /// One step of the speed ramp: faster ticks, same run.
  pub fn ramp_speed(&mut self) {
    if !self.is_running() {return}
    self.fps += 1;
    if let Some(handle) = self.tick_task.take() {
      self.scheduler.cancel(handle);
    }
    self.tick_task = self.arm(Task::Tick, self.tick_period());
    debug!("speed raised to {} fps", self.fps);
  }

  /// Stops both timers. The engine can be set up again afterwards.
  pub fn dispose(&mut self) {
    self.cancel_tasks();
    info!("snake engine stopped");
  }

  pub fn tick_period(&self) -> u32 {
    (1000 / self.fps).max(1)
  }

  fn launch_tasks(&mut self) {
    self.cancel_tasks();
    self.tick_task = self.arm(Task::Tick, self.tick_period());
    if self.config.speed_ramp {
      self.ramp_task = self.arm(Task::SpeedRamp, self.config.ramp_interval_ms);
    }
  }

  fn cancel_tasks(&mut self) {
    if let Some(handle) = self.tick_task.take() {
      self.scheduler.cancel(handle);
    }
    if let Some(handle) = self.ramp_task.take() {
      self.scheduler.cancel(handle);
    }
  }

  fn arm(&mut self, task:Task, period_ms:u32) -> Option<TaskHandle> {
    match self.scheduler.start(task, period_ms) {
      Ok(handle) => Some(handle),
      Err(err) => {
        error!("could not schedule {task:?} every {period_ms} ms: {err}");
        None
      }
    }
  }

  pub fn is_running(&self) -> bool {
    self.tick_task.is_some()
  }

  pub fn snake(&self) -> &Snake {&self.snake}
  pub fn apple(&self) -> Position {self.apple}
  pub fn score(&self) -> u32 {self.score}
  pub fn best_score(&self) -> u32 {self.best_score}
  pub fn fps(&self) -> u32 {self.fps}
  pub fn config(&self) -> &GameConfig {&self.config}
  pub fn scheduler(&self) -> &S {&self.scheduler}
  pub fn store(&self) -> &H {&self.store}
}

impl<R:Rng, S:Scheduler, H:HighScoreStore> Drop for SnakeEngine<R,S,H> {
  fn drop(&mut self) {
    self.cancel_tasks();
  }
}
