//! Browser side of the game: canvas drawing, `localStorage`, `setInterval`
//! timers, the score line and the keyboard/button listeners.

use log::{debug, warn};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Storage, Window};

use crate::config::{AppleShape, GameConfig};
use crate::error::SnakeError;
use crate::game_logic::{Collision, Position};
use crate::input::Intent;
use crate::interfaces::{HighScoreStore, Renderer, ScoreBoard, Scheduler, Task, TaskHandle};

pub const BEST_SCORE_KEY:&str = "snakeScore";
const CANVAS_ID:&str = "canvas";
const SCORE_ID:&str = "score";

const BACKGROUND_COLOURS:[&str;2] = ["#617b97", "#394856"];
const APPLE_COLOUR:&str = "red";
const SNAKE_COLOUR:&str = "lime";


pub struct PageElements {
  pub window: Window,
  pub document: Document,
  pub canvas: HtmlCanvasElement,
  pub context: CanvasRenderingContext2d,
  pub score: Option<HtmlElement>,
}

impl PageElements {
  /// Fails when the canvas or its 2d context is missing; the score line is
  /// optional.
  pub fn init() -> Result<Self,SnakeError> {
    let window = web_sys::window().ok_or(SnakeError::MissingWindow)?;
    let document = window.document().ok_or(SnakeError::MissingDocument)?;
    let canvas = document
      .get_element_by_id(CANVAS_ID)
      .and_then(|elem| elem.dyn_into::<HtmlCanvasElement>().ok())
      .ok_or(SnakeError::MissingElement(CANVAS_ID))?;
    let context = canvas
      .get_context("2d")?
      .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
      .ok_or(SnakeError::MissingContext)?;
    let score = document
      .get_element_by_id(SCORE_ID)
      .and_then(|elem| elem.dyn_into::<HtmlElement>().ok());
    if score.is_none() {
      warn!("no #{SCORE_ID} element, score will not be displayed");
    }
    Ok(PageElements {window,document,canvas,context,score})
  }

  /// Sizes the canvas to exactly `cells_count * cell_size` on both axes.
  pub fn resize(&self, config:&GameConfig) {
    let side = config.surface_size() as u32;
    self.canvas.set_width(side);
    self.canvas.set_height(side);
  }

  /// Reads `data-*` overrides from the canvas element.
  pub fn read_config(&self) -> GameConfig {
    let (config, errors) = GameConfig::from_attributes(|name| self.canvas.get_attribute(name));
    for err in errors {
      warn!("ignoring canvas configuration: {err}");
    }
    config
  }
}

pub struct CanvasRenderer {
  context: CanvasRenderingContext2d,
  cells_count: u32,
  cell_size: f64,
}

impl CanvasRenderer {
  pub fn new(context:CanvasRenderingContext2d, config:&GameConfig) -> Self {
    CanvasRenderer {
      context,
      cells_count: config.cells_count,
      cell_size: config.cell_size as f64,
    }
  }

  fn fill_cell(&self, pos:Position) {
    self.context.fill_rect(pos.x as f64, pos.y as f64, self.cell_size, self.cell_size);
  }
}

impl Renderer for CanvasRenderer {
  fn draw_background(&mut self) {
    let mut prev = None;
    for col in 0..self.cells_count {
      for row in 0..self.cells_count {
        let colour = checker_colour(col, row, self.cells_count);
        if prev != Some(colour) {
          self.context.set_fill_style_str(colour);
          prev = Some(colour);
        }
        self.context.fill_rect(
          col as f64 * self.cell_size,
          row as f64 * self.cell_size,
          self.cell_size,
          self.cell_size
        );
      }
    }
  }

  fn draw_apple(&mut self, pos:Position, shape:AppleShape) {
    self.context.set_fill_style_str(APPLE_COLOUR);
    match shape {
      AppleShape::Square => self.fill_cell(pos),
      AppleShape::Circle => {
        let half = self.cell_size / 2.0;
        self.context.begin_path();
        if let Err(err) = self.context.arc(
          pos.x as f64 + half,
          pos.y as f64 + half,
          self.cell_size / 2.5,
          0.0,
          2.0 * std::f64::consts::PI
        ) {
          warn!("could not draw apple: {}", SnakeError::describe(&err));
          return;
        }
        self.context.fill();
      }
    }
  }

  fn draw_snake_cell(&mut self, pos:Position) {
    self.context.set_fill_style_str(SNAKE_COLOUR);
    self.fill_cell(pos);
  }
}

/// Colours alternate cell by cell, walking each column top to bottom.
fn checker_colour(col:u32, row:u32, cells_count:u32) -> &'static str {
  BACKGROUND_COLOURS[((col * cells_count + row) % 2) as usize]
}

pub struct LocalStorageStore {
  storage: Option<Storage>,
}

impl LocalStorageStore {
  pub fn open(window:&Window) -> Self {
    let storage = match window.local_storage() {
      Ok(storage) => storage,
      Err(err) => {
        warn!("localStorage refused: {}", SnakeError::describe(&err));
        None
      }
    };
    LocalStorageStore {storage}
  }

  fn storage(&self) -> Result<&Storage,SnakeError> {
    self.storage.as_ref()
      .ok_or_else(|| SnakeError::Storage("localStorage unavailable".to_string()))
  }
}

impl HighScoreStore for LocalStorageStore {
  fn get(&self) -> Result<u32,SnakeError> {
    let stored = self.storage()?
      .get_item(BEST_SCORE_KEY)
      .map_err(|err| SnakeError::Storage(SnakeError::describe(&err)))?;
    Ok(parse_best_score(stored.as_deref()))
  }

  fn set(&mut self, score:u32) -> Result<(),SnakeError> {
    self.storage()?
      .set_item(BEST_SCORE_KEY, &score.to_string())
      .map_err(|err| SnakeError::Storage(SnakeError::describe(&err)))
  }
}

fn parse_best_score(stored:Option<&str>) -> u32 {
  match stored {
    None => 0,
    Some(text) => text.trim().parse().unwrap_or_else(|_| {
      warn!("stored best score `{text}` is not a number, treating it as 0");
      0
    })
  }
}

/// `setInterval` backed timers. The two callbacks are created once and live
/// for the rest of the page.
pub struct IntervalScheduler {
  window: Window,
  tick: js_sys::Function,
  ramp: js_sys::Function,
}

impl IntervalScheduler {
  pub fn new<T, U>(window:Window, on_tick:T, on_ramp:U) -> Self
  where
    T: FnMut() + 'static,
    U: FnMut() + 'static,
  {
    IntervalScheduler {
      window,
      tick: leak_callback(on_tick),
      ramp: leak_callback(on_ramp),
    }
  }
}

fn leak_callback<F:FnMut() + 'static>(callback:F) -> js_sys::Function {
  let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
  let function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
  closure.forget();
  function
}

impl Scheduler for IntervalScheduler {
  fn start(&mut self, task:Task, period_ms:u32) -> Result<TaskHandle,SnakeError> {
    let callback = match task {
      Task::Tick      => &self.tick,
      Task::SpeedRamp => &self.ramp,
    };
    let period = i32::try_from(period_ms).unwrap_or(i32::MAX);
    self.window
      .set_interval_with_callback_and_timeout_and_arguments_0(callback, period)
      .map(TaskHandle)
      .map_err(|err| SnakeError::Scheduler(SnakeError::describe(&err)))
  }

  fn cancel(&mut self, handle:TaskHandle) {
    self.window.clear_interval_with_handle(handle.0);
  }
}

pub struct DomScoreBoard {
  window: Window,
  score: Option<HtmlElement>,
}

impl DomScoreBoard {
  pub fn new(window:Window, score:Option<HtmlElement>) -> Self {
    DomScoreBoard {window,score}
  }
}

impl ScoreBoard for DomScoreBoard {
  fn show(&mut self, score:u32, best:u32, fps:u32) {
    if let Some(elem) = &self.score {
      elem.set_text_content(Some(score_line(score, best, fps).as_str()));
    }
  }

  fn announce(&mut self, collision:Collision, score:u32, best:u32) {
    if let Err(err) = self.window.alert_with_message(&collision_message(collision, score, best)) {
      warn!("could not show game over dialog: {}", SnakeError::describe(&err));
    }
  }
}

pub fn score_line(score:u32, best:u32, fps:u32) -> String {
  format!("Score: {score} | Best: {best} | Speed: {fps} FPS")
}

pub fn collision_message(collision:Collision, score:u32, best:u32) -> String {
  let headline = match collision {
    Collision::SelfBite => "You bit your own tail!",
    Collision::Boundary => "You hit the wall!",
  };
  format!("{headline}\nYour score: {score}\nBest score: {best}")
}

/// Wires the keyboard and, if enabled, the on-screen buttons to `on_intent`.
pub fn install_input(page:&PageElements, buttons:bool, on_intent:fn(Intent))
  -> Result<(),SnakeError>
{
  let keydown = Closure::wrap(Box::new(move |evt:web_sys::KeyboardEvent| {
    let key = evt.key();
    match Intent::from_key(&key) {
      Some(intent) => on_intent(intent),
      None         => debug!("unhandled key {key}")
    }
  }) as Box<dyn FnMut(_)>);
  page.window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
  keydown.forget();

  if !buttons {return Ok(())}
  for id in Intent::BUTTON_IDS {
    let Some(intent) = Intent::from_button_id(id) else {continue};
    let Some(button) = page.document.get_element_by_id(id) else {
      warn!("direction button #{id} not found");
      continue;
    };
    let click = Closure::wrap(Box::new(move |_evt:web_sys::Event| {
      on_intent(intent)
    }) as Box<dyn FnMut(_)>);
    button.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
    click.forget();
  }
  Ok(())
}
