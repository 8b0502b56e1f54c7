use rand::rngs::SmallRng;
use rand::SeedableRng;

use snake_canvas::config::{AppleShape, GameConfig};
use snake_canvas::game_logic::{Collision, Direction, GameEvent, Position, SnakeEngine};
use snake_canvas::input::Intent;
use snake_canvas::interfaces::Task;
use snake_canvas::testing::{Draw, MemoryStore, RecordingBoard, RecordingRenderer, SpyScheduler};

fn started(config:GameConfig, store:MemoryStore)
  -> SnakeEngine<SmallRng,SpyScheduler,MemoryStore>
{
  let mut engine = SnakeEngine::new(
    config,
    SmallRng::seed_from_u64(42),
    SpyScheduler::default(),
    store
  ).unwrap();
  engine.setup();
  engine
}

#[test]
fn three_apples_then_wall_persists_best() {
  let mut engine = started(GameConfig::default(), MemoryStore::default());
  let mut renderer = RecordingRenderer::default();
  let mut board = RecordingBoard::default();

  for _ in 0..3 {
    let ahead = engine.snake().head.stepped(engine.snake().direction, 25);
    engine.place_apple_at(ahead);
    assert_eq!(engine.tick(&mut renderer, &mut board), GameEvent::AppleCollected);
  }
  assert_eq!(engine.score(), 3);
  assert_eq!(engine.snake().length, 8);
  assert_eq!(engine.snake().head, Position::new(175,125));

  // keep going right until the wall; the last playable column starts at 225
  engine.place_apple_at(Position::new(0,0));
  let mut events = Vec::new();
  loop {
    let event = engine.tick(&mut renderer, &mut board);
    events.push(event);
    if let GameEvent::GameOver(_) = event {break}
  }
  assert_eq!(events, vec![
    GameEvent::GeneralMovement,
    GameEvent::GeneralMovement,
    GameEvent::GeneralMovement,
    GameEvent::GameOver(Collision::Boundary),
  ]);
  assert_eq!(board.announced, vec![(Collision::Boundary, 3, 0)]);
  assert_eq!(engine.store().value, Some(3));
  assert_eq!(engine.best_score(), 3);
  assert_eq!(engine.score(), 0);
  assert_eq!(board.shown.last(), Some(&(3,0,5)));

  // the next run reports the new best
  engine.place_apple_at(Position::new(0,0));
  engine.tick(&mut renderer, &mut board);
  assert_eq!(board.shown.last(), Some(&(0,3,5)));
}

#[test]
fn classic_variant_draws_square_apple_and_never_ramps() {
  let mut engine = started(GameConfig::classic(), MemoryStore::with_value(7));
  assert_eq!(engine.best_score(), 7);
  assert_eq!(engine.scheduler().live(Task::SpeedRamp), 0);

  let apple = Position::new(0,0);
  engine.place_apple_at(apple);
  let mut renderer = RecordingRenderer::default();
  engine.tick(&mut renderer, &mut RecordingBoard::default());
  assert_eq!(renderer.draws[1], Draw::Apple(apple, AppleShape::Square));
}

#[test]
fn restarts_never_stack_timers() {
  let mut engine = started(GameConfig::default(), MemoryStore::default());
  let mut board = RecordingBoard::default();
  for _ in 0..5 {
    engine.set_direction(Direction::Up);
    while !matches!(
      engine.tick(&mut RecordingRenderer::default(), &mut board),
      GameEvent::GameOver(_)
    ) {}
    assert_eq!(engine.scheduler().live(Task::Tick), 1);
    assert_eq!(engine.scheduler().live(Task::SpeedRamp), 1);
  }
  assert_eq!(board.announced.len(), 5);
  assert!(board.announced.iter().all(|(c,_,_)| *c == Collision::Boundary));
}

#[test]
fn speed_ramp_survives_until_collision() {
  let mut engine = started(GameConfig::default(), MemoryStore::default());
  for _ in 0..10 {engine.ramp_speed();}
  assert_eq!(engine.fps(), 15);
  assert_eq!(engine.scheduler().period(Task::Tick), Some(66));

  engine.set_direction(Intent::Up.direction());
  while !matches!(
    engine.tick(&mut RecordingRenderer::default(), &mut RecordingBoard::default()),
    GameEvent::GameOver(_)
  ) {}
  assert_eq!(engine.fps(), 5);
  assert_eq!(engine.scheduler().period(Task::Tick), Some(200));
}

#[test]
fn dispose_then_setup_rearms() {
  let mut engine = started(GameConfig::default(), MemoryStore::default());
  assert!(engine.is_running());
  engine.dispose();
  assert!(!engine.is_running());
  engine.setup();
  assert!(engine.is_running());
  assert_eq!(engine.scheduler().live(Task::Tick), 1);
}
