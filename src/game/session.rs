use super::engine::Game;
use super::events::GameEvent;
use super::types::GameSnapshot;
use crate::protocol::ClientMessage;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Events kept for a client that has not drained its frame yet. Older ones
/// are dropped first.
const MAX_PENDING_EVENTS: usize = 64;

#[derive(Debug, Default)]
pub struct SessionStats {
  games_finished: AtomicU32,
  best_score: AtomicU32,
}

impl SessionStats {
  pub fn record_game_over(&self, score: u32) {
    self.games_finished.fetch_add(1, Ordering::Relaxed);
    self.best_score.fetch_max(score, Ordering::Relaxed);
  }

  pub fn games_finished(&self) -> u32 {
    self.games_finished.load(Ordering::Relaxed)
  }

  pub fn best_score(&self) -> u32 {
    self.best_score.load(Ordering::Relaxed)
  }
}

#[derive(Debug)]
pub struct PendingFrame {
  pub snapshot: GameSnapshot,
  pub events: Vec<GameEvent>,
}

/// Single-slot outbox between the game task and the socket writer. A newer
/// snapshot replaces an unsent one; events accumulate until taken.
#[derive(Debug)]
pub struct LatestFrame {
  frame: StdMutex<Option<PendingFrame>>,
  notify: Notify,
}

impl LatestFrame {
  pub(crate) fn new() -> Self {
    Self {
      frame: StdMutex::new(None),
      notify: Notify::new(),
    }
  }

  pub(crate) fn store(&self, snapshot: GameSnapshot, mut events: Vec<GameEvent>) {
    {
      let mut slot = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
      if let Some(unsent) = slot.take() {
        let mut merged = unsent.events;
        merged.append(&mut events);
        events = merged;
      }
      if events.len() > MAX_PENDING_EVENTS {
        events.drain(..events.len() - MAX_PENDING_EVENTS);
      }
      *slot = Some(PendingFrame { snapshot, events });
    }
    self.notify.notify_one();
  }

  pub(crate) fn take_latest(&self) -> Option<PendingFrame> {
    self.frame.lock().unwrap_or_else(PoisonError::into_inner).take()
  }

  pub(crate) async fn wait_for_update(&self) {
    self.notify.notified().await;
  }
}

/// Drives one game against the wall clock until the inbound channel closes.
/// The engine's clock is milliseconds since the session started.
pub async fn run_session(
  mut game: Game,
  mut inbound: UnboundedReceiver<ClientMessage>,
  outbound: Arc<LatestFrame>,
  stats: Arc<SessionStats>,
) {
  let started = Instant::now();
  publish(&mut game, &outbound);

  loop {
    let deadline = game
      .next_deadline()
      .map(|at| started + Duration::from_millis(at));

    tokio::select! {
      message = inbound.recv() => {
        let Some(message) = message else { break };
        if !handle_message(&mut game, message, elapsed_ms(started), &stats) {
          continue;
        }
      }
      _ = sleep_until_deadline(deadline) => {
        catch_up(&mut game, elapsed_ms(started), &stats);
      }
    }

    publish(&mut game, &outbound);
  }
}

/// Applies one client message. Returns true when the state changed enough to
/// publish a frame right away.
fn handle_message(game: &mut Game, message: ClientMessage, now: u64, stats: &SessionStats) -> bool {
  match message {
    ClientMessage::Key(key) => {
      game.handle_key(&key);
      false
    }
    ClientMessage::Reset => {
      catch_up(game, now, stats);
      game.reset();
      true
    }
  }
}

/// Fires overdue timers and counts a game that ended while doing so.
fn catch_up(game: &mut Game, now: u64, stats: &SessionStats) {
  let was_over = game.is_over();
  game.advance_to(now);
  if !was_over && game.is_over() {
    stats.record_game_over(game.score());
  }
}

fn publish(game: &mut Game, outbound: &LatestFrame) {
  let events = game.take_events();
  outbound.store(game.snapshot(), events);
}

fn elapsed_ms(started: Instant) -> u64 {
  Instant::now().duration_since(started).as_millis() as u64
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
  match deadline {
    Some(at) => tokio::time::sleep_until(at).await,
    None => std::future::pending::<()>().await,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::constants::{GRID_SIZE, TICK_MS};
  use crate::game::engine::GameConfig;
  use crate::game::types::GameOverCause;
  use tokio::sync::mpsc::unbounded_channel;

  fn quiet_game() -> Game {
    Game::new(GameConfig {
      trap_chance: 0.0,
      bait_chance: 0.0,
      seed: Some(5),
    })
  }

  async fn next_frame(outbound: &LatestFrame) -> PendingFrame {
    loop {
      outbound.wait_for_update().await;
      if let Some(frame) = outbound.take_latest() {
        return frame;
      }
    }
  }

  #[tokio::test(start_paused = true)]
  async fn streams_a_frame_per_tick_and_applies_steering() {
    let (inbound_tx, inbound_rx) = unbounded_channel();
    let outbound = Arc::new(LatestFrame::new());
    let stats = Arc::new(SessionStats::default());
    let task = tokio::spawn(run_session(quiet_game(), inbound_rx, Arc::clone(&outbound), stats));

    let initial = next_frame(&outbound).await;
    assert_eq!(initial.snapshot.now, 0);

    let first_tick = next_frame(&outbound).await;
    assert_eq!(first_tick.snapshot.now, 100);
    assert_eq!(first_tick.snapshot.snake[0].x, 11);

    inbound_tx.send(ClientMessage::Key("ArrowUp".to_string())).unwrap();
    let second_tick = next_frame(&outbound).await;
    assert_eq!(second_tick.snapshot.snake[0].x, 11);
    assert_eq!(second_tick.snapshot.snake[0].y, 9);

    drop(inbound_tx);
    task.await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn game_over_is_recorded_and_reset_restarts() {
    let (inbound_tx, inbound_rx) = unbounded_channel();
    let outbound = Arc::new(LatestFrame::new());
    let stats = Arc::new(SessionStats::default());
    let task = tokio::spawn(run_session(
      quiet_game(),
      inbound_rx,
      Arc::clone(&outbound),
      Arc::clone(&stats),
    ));

    // heading right from the centre hits the wall after GRID_SIZE / 2 ticks
    let mut frame = next_frame(&outbound).await;
    while frame.snapshot.game_over.is_none() {
      frame = next_frame(&outbound).await;
    }
    assert_eq!(frame.snapshot.game_over, Some(GameOverCause::Wall));
    assert_eq!(frame.snapshot.now, (GRID_SIZE as u64 / 2) * TICK_MS);
    assert_eq!(stats.games_finished(), 1);

    inbound_tx.send(ClientMessage::Reset).unwrap();
    let restarted = next_frame(&outbound).await;
    assert!(restarted.snapshot.game_over.is_none());
    assert_eq!(restarted.snapshot.score, 0);
    assert!(matches!(restarted.events.last(), Some(GameEvent::Reset)));

    drop(inbound_tx);
    task.await.unwrap();
  }

  #[test]
  fn reset_counts_a_game_that_ends_in_overdue_ticks() {
    let mut game = quiet_game();
    let stats = SessionStats::default();

    // the wall is hit at 1000ms; the reset arrives before those ticks were driven
    let publish_now = handle_message(&mut game, ClientMessage::Reset, 1500, &stats);

    assert!(publish_now);
    assert_eq!(stats.games_finished(), 1);
    assert!(!game.is_over());
    assert_eq!(game.score(), 0);
  }

  #[test]
  fn keys_are_applied_without_publishing() {
    let mut game = quiet_game();
    let stats = SessionStats::default();

    assert!(!handle_message(&mut game, ClientMessage::Key("w".to_string()), 0, &stats));
    assert!(!handle_message(&mut game, ClientMessage::Key("Space".to_string()), 0, &stats));
    game.advance_to(TICK_MS);
    assert_eq!(game.head().y, 9);
    assert_eq!(stats.games_finished(), 0);
  }

  #[test]
  fn unsent_frames_coalesce_and_keep_their_events() {
    let outbound = LatestFrame::new();
    let mut game = quiet_game();

    outbound.store(game.snapshot(), vec![GameEvent::Reset]);
    game.advance_to(TICK_MS);
    outbound.store(game.snapshot(), vec![GameEvent::ControlsRestored]);

    let frame = outbound.take_latest().unwrap();
    assert_eq!(frame.snapshot.now, TICK_MS);
    assert!(matches!(
      frame.events.as_slice(),
      [GameEvent::Reset, GameEvent::ControlsRestored]
    ));
    assert!(outbound.take_latest().is_none());
  }

  #[test]
  fn pending_events_are_capped_oldest_first() {
    let outbound = LatestFrame::new();
    let game = quiet_game();

    outbound.store(game.snapshot(), vec![GameEvent::Reset]);
    for _ in 0..MAX_PENDING_EVENTS {
      outbound.store(game.snapshot(), vec![GameEvent::ControlsRestored]);
    }

    let frame = outbound.take_latest().unwrap();
    assert_eq!(frame.events.len(), MAX_PENDING_EVENTS);
    assert!(frame
      .events
      .iter()
      .all(|event| matches!(event, GameEvent::ControlsRestored)));
  }
}
