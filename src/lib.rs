mod entropy;
mod logger;
mod web;
pub mod config;
pub mod error;
pub mod game_logic;
pub mod input;
pub mod interfaces;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use std::cell::RefCell;

use log::{error, info, warn, LevelFilter};
use rand::{rngs::SmallRng, SeedableRng};
use wasm_bindgen::prelude::*;

use config::GameConfig;
use error::SnakeError;
use game_logic::SnakeEngine;
use input::Intent;
use interfaces::Renderer;
use web::{CanvasRenderer, DomScoreBoard, IntervalScheduler, LocalStorageStore, PageElements};

const LOG_LEVEL:LevelFilter =
  if cfg!(debug_assertions) {LevelFilter::Debug} else {LevelFilter::Info};


type WebEngine = SnakeEngine<SmallRng,IntervalScheduler,LocalStorageStore>;

struct Game {
  engine: WebEngine,
  renderer: CanvasRenderer,
  board: DomScoreBoard,
}

impl Game {
  fn step(&mut self) {
    self.engine.tick(&mut self.renderer, &mut self.board);
  }
}

thread_local! {
  static GAME: RefCell<Option<Game>> = RefCell::new(None);
}

/// Runs `f` against the live game, if any. Callbacks never nest on the
/// page's event loop, so a busy slot only means a callback fired mid-step.
fn with_game<T>(f:impl FnOnce(&mut Game) -> T) -> Option<T> {
  GAME.with(|slot| match slot.try_borrow_mut() {
    Ok(mut game) => game.as_mut().map(f),
    Err(_) => {
      warn!("game is busy, dropping callback");
      None
    }
  })
}

fn dispatch(intent:Intent) {
  with_game(|game| game.engine.set_direction(intent.direction()));
}

fn start() -> Result<(),SnakeError> {
  let page = PageElements::init()?;
  let config:GameConfig = page.read_config();
  page.resize(&config);

  let scheduler = IntervalScheduler::new(
    page.window.clone(),
    || {with_game(Game::step);},
    || {with_game(|game| game.engine.ramp_speed());}
  );
  let store = LocalStorageStore::open(&page.window);
  let rng = SmallRng::seed_from_u64(entropy::seed());
  let engine = SnakeEngine::new(config.clone(), rng, scheduler, store)?;

  let mut renderer = CanvasRenderer::new(page.context.clone(), &config);
  renderer.draw_background();
  let board = DomScoreBoard::new(page.window.clone(), page.score.clone());
  web::install_input(&page, config.button_input, dispatch)?;

  GAME.with(|slot| *slot.borrow_mut() = Some(Game {engine,renderer,board}));
  with_game(|game| game.engine.setup());
  info!(
    "snake started on a {0}x{0} grid of {1}px cells",
    config.cells_count, config.cell_size
  );
  Ok(())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(),JsValue> {
  #[cfg(feature = "console_error_panic_hook")]
  console_error_panic_hook::set_once();
  logger::init(LOG_LEVEL);

  start().map_err(|err| {
    error!("snake could not start: {err}");
    JsValue::from(err)
  })
}

#[wasm_bindgen(js_name = queryFps)]
pub fn query_fps() -> u32 {
  with_game(|game| game.engine.fps()).unwrap_or(0)
}

/// Accepts a key name (`ArrowUp`, `z`, ...) or a button id (`up`, ...).
#[wasm_bindgen(js_name = sendIntent)]
pub fn send_intent(name:&str) -> bool {
  match Intent::from_key(name).or_else(|| Intent::from_button_id(name)) {
    Some(intent) => {dispatch(intent); true}
    None => false
  }
}

/// Stops the timers and releases the game.
#[wasm_bindgen(js_name = disposeSnake)]
pub fn dispose_snake() {
  let game = GAME.with(|slot| slot.borrow_mut().take());
  if let Some(mut game) = game {
    game.engine.dispose();
  }
}
