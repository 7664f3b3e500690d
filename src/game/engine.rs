use super::adversary::{blocker_velocity, evade, step_blocker, BlockerStep, Dodge};
use super::constants::{
  BLOCKER_ACTIVATE_MS, BLOCKER_GIVE_UP_DISTANCE, BLOCKER_LIFETIME_MS, BLOCKER_SPAWN_CHANCE,
  GRID_SIZE, INITIAL_DIRECTION, INITIAL_HEAD, REVERSE_COUNTDOWN_MS, REVERSE_DURATION_SECS,
  TICK_MS,
};
use super::events::{GameEvent, TrapClearReason};
use super::grid::{in_bounds, manhattan_distance, occupied_by_snake};
use super::input::{accepts, effective_direction, parse_key};
use super::spawn::{maybe_spawn_blocker, spawn_food};
use super::timers::{TimerKind, Timers};
use super::types::{
  Blocker, BlockerSnapshot, Direction, Food, FoodKind, FoodSnapshot, GameOverCause, GameSnapshot,
  Mood, Phase, Position,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
  /// Probability that an aligned, in-range food springs a trap on a tick.
  pub trap_chance: f64,
  /// Share of food draws that become evasive bait. Zero keeps bait out of play.
  pub bait_chance: f64,
  pub seed: Option<u64>,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      trap_chance: BLOCKER_SPAWN_CHANCE,
      bait_chance: 0.0,
      seed: None,
    }
  }
}

/// One Troll Snake game. Owns every piece of simulation state; all timed
/// behaviour runs through `advance_to`, which fires due timers in order.
#[derive(Debug)]
pub struct Game {
  config: GameConfig,
  rng: StdRng,
  now: u64,
  snake: Vec<Position>,
  direction: Direction,
  input_locked: bool,
  food: Option<Food>,
  blocker: Blocker,
  phase: Phase,
  score: u32,
  mood: Mood,
  timers: Timers,
  events: Vec<GameEvent>,
}

impl Game {
  pub fn new(config: GameConfig) -> Self {
    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let mut game = Self {
      config,
      rng,
      now: 0,
      snake: Vec::new(),
      direction: INITIAL_DIRECTION,
      input_locked: false,
      food: None,
      blocker: Blocker::Absent,
      phase: Phase::Running,
      score: 0,
      mood: Mood::Normal,
      timers: Timers::new(),
      events: Vec::new(),
    };
    game.restart();
    game
  }

  pub fn score(&self) -> u32 {
    self.score
  }

  pub fn head(&self) -> Position {
    self.snake.first().copied().unwrap_or(INITIAL_HEAD)
  }

  pub fn is_over(&self) -> bool {
    self.phase.is_over()
  }

  pub fn next_deadline(&self) -> Option<u64> {
    self.timers.next_due()
  }

  pub fn take_events(&mut self) -> Vec<GameEvent> {
    std::mem::take(&mut self.events)
  }

  /// Restores the canonical starting state and re-arms the tick timer.
  pub fn reset(&mut self) {
    self.restart();
    self.events.push(GameEvent::Reset);
    tracing::debug!(now = self.now, "game reset");
  }

  fn restart(&mut self) {
    self.timers.cancel_all();
    self.snake = vec![INITIAL_HEAD];
    self.direction = INITIAL_DIRECTION;
    self.input_locked = false;
    self.blocker = Blocker::Absent;
    self.phase = Phase::Running;
    self.score = 0;
    self.mood = Mood::Normal;
    self.food = spawn_food(&self.snake, self.config.bait_chance, &mut self.rng);
    self
      .timers
      .schedule_every(TimerKind::Tick, self.now + TICK_MS, TICK_MS);
  }

  pub fn handle_key(&mut self, key: &str) -> bool {
    let Some(requested) = parse_key(key) else { return false };
    self.steer(requested)
  }

  /// Commits a new heading for the next tick. Returns false when the input was
  /// ignored: game over, already steered this tick, or an exact U-turn.
  pub fn steer(&mut self, requested: Direction) -> bool {
    if self.phase.is_over() || self.input_locked {
      return false;
    }
    let effective = effective_direction(requested, self.phase.is_reversed());
    if !accepts(effective, self.direction) {
      return false;
    }
    self.direction = effective;
    self.input_locked = true;
    true
  }

  /// Fires every timer due at or before `now`, in deadline order. Returns the
  /// number of timers fired.
  pub fn advance_to(&mut self, now: u64) -> usize {
    let mut fired = 0;
    while let Some((kind, due)) = self.timers.pop_due(now) {
      self.now = self.now.max(due);
      match kind {
        TimerKind::Tick => self.tick(),
        TimerKind::ReverseCountdown => self.count_down_reverse(),
        TimerKind::ActivateBlocker => self.activate_blocker(),
        TimerKind::ExpireBlocker => self.expire_blocker(),
      }
      fired += 1;
    }
    self.now = self.now.max(now);
    fired
  }

  fn tick(&mut self) {
    if self.phase.is_over() {
      return;
    }
    let head = self.head();

    if let Some(food) = self.food {
      if let Some((moved, dodge)) = evade(head, &food, &mut self.rng) {
        self.food = Some(moved);
        self.mood = match dodge {
          Dodge::Rush => Mood::Scared,
          Dodge::Sidestep => Mood::Troll,
        };
        self.events.push(GameEvent::BaitDodged {
          position: moved.position,
          dodge,
          dodges_left: moved.dodges_left,
        });
        return;
      }
    }

    if let Some(food) = self.food {
      let spawned = maybe_spawn_blocker(
        head,
        food.position,
        self.direction,
        &self.blocker,
        self.config.trap_chance,
        self.now,
        &mut self.rng,
      );
      if let Some(blocker) = spawned {
        self.blocker = blocker;
        self.timers.cancel(TimerKind::ExpireBlocker);
        self
          .timers
          .schedule_once(TimerKind::ActivateBlocker, self.now + BLOCKER_ACTIVATE_MS);
        self.events.push(GameEvent::TrapSpawned {
          position: food.position,
        });
        tracing::debug!(x = food.position.x, y = food.position.y, "trap spawned");
      }
    }

    if let Blocker::Active {
      position,
      velocity,
      spawned_at,
    } = self.blocker
    {
      let step = step_blocker(position, velocity, &self.snake, self.food.map(|food| food.position));
      let moved_to = |next: Position| Blocker::Active {
        position: next,
        velocity,
        spawned_at,
      };
      match step {
        BlockerStep::LeftGrid => {
          self.clear_blocker();
          self.events.push(GameEvent::TrapCleared {
            reason: TrapClearReason::LeftGrid,
          });
        }
        BlockerStep::Crushed(next) => {
          self.blocker = moved_to(next);
          self.end(GameOverCause::Crushed);
          return;
        }
        BlockerStep::Smashed(next) => {
          self.blocker = moved_to(next);
          self.end(GameOverCause::BlockerSmash);
          return;
        }
        BlockerStep::AteFood(next) => {
          self.blocker = moved_to(next);
          self.events.push(GameEvent::TrapAteFood { position: next });
          self.respawn_food();
        }
        BlockerStep::Moved(next) => {
          self.blocker = moved_to(next);
        }
      }
    }

    let next_head = head.step(self.direction);
    if !in_bounds(next_head) {
      self.end(GameOverCause::Wall);
      return;
    }
    if self.blocker.position() == Some(next_head) {
      self.end(GameOverCause::Bonk);
      return;
    }
    if occupied_by_snake(next_head, &self.snake) {
      self.end(GameOverCause::SelfBite);
      return;
    }

    self.snake.insert(0, next_head);
    match self.food {
      Some(food) if food.position == next_head => self.eat(food),
      _ => {
        self.snake.pop();
      }
    }

    self.input_locked = false;

    if let Blocker::Pending { position, .. } = self.blocker {
      if manhattan_distance(next_head, position) > BLOCKER_GIVE_UP_DISTANCE {
        self.clear_blocker();
        self.events.push(GameEvent::TrapCleared {
          reason: TrapClearReason::GaveUp,
        });
      }
    }
  }

  fn eat(&mut self, food: Food) {
    self.score += 1;
    self.mood = Mood::Cool;
    self.events.push(GameEvent::FoodEaten {
      position: food.position,
      kind: food.kind,
      score: self.score,
    });

    if food.kind.converts() {
      let logo = food.conversion_logo();
      self.events.push(GameEvent::Converted {
        position: food.position,
        name: logo.name,
        url: logo.url,
      });
    }

    if food.kind == FoodKind::Reverse {
      self.phase = Phase::Reversed {
        seconds_left: REVERSE_DURATION_SECS,
      };
      self.timers.schedule_every(
        TimerKind::ReverseCountdown,
        self.now + REVERSE_COUNTDOWN_MS,
        REVERSE_COUNTDOWN_MS,
      );
      self.events.push(GameEvent::ReverseStarted {
        seconds: REVERSE_DURATION_SECS,
      });
    }

    self.respawn_food();
  }

  fn respawn_food(&mut self) {
    self.food = spawn_food(&self.snake, self.config.bait_chance, &mut self.rng);
    if self.food.is_none() {
      tracing::debug!(length = self.snake.len(), "no free cell left for food");
    }
  }

  fn activate_blocker(&mut self) {
    let Blocker::Pending {
      position,
      spawned_at,
    } = self.blocker
    else {
      return;
    };
    let velocity = blocker_velocity(self.head(), position, self.direction);
    self.blocker = Blocker::Active {
      position,
      velocity,
      spawned_at,
    };
    self
      .timers
      .schedule_once(TimerKind::ExpireBlocker, self.now + BLOCKER_LIFETIME_MS);
    self
      .events
      .push(GameEvent::TrapActivated { position, velocity });
    tracing::debug!(dx = velocity.dx, dy = velocity.dy, "trap activated");
  }

  fn expire_blocker(&mut self) {
    if self.blocker.is_absent() {
      return;
    }
    self.clear_blocker();
    self.events.push(GameEvent::TrapExpired);
  }

  fn clear_blocker(&mut self) {
    self.blocker = Blocker::Absent;
    self.timers.cancel(TimerKind::ActivateBlocker);
    self.timers.cancel(TimerKind::ExpireBlocker);
  }

  fn count_down_reverse(&mut self) {
    let Phase::Reversed { seconds_left } = self.phase else {
      self.timers.cancel(TimerKind::ReverseCountdown);
      return;
    };
    if seconds_left <= 1 {
      self.phase = Phase::Running;
      self.timers.cancel(TimerKind::ReverseCountdown);
      self.events.push(GameEvent::ControlsRestored);
    } else {
      let seconds_left = seconds_left - 1;
      self.phase = Phase::Reversed { seconds_left };
      self.events.push(GameEvent::ReverseTick { seconds_left });
    }
  }

  fn end(&mut self, cause: GameOverCause) {
    self.phase = Phase::GameOver { cause };
    self.mood = cause.mood();
    self.input_locked = false;
    self.timers.cancel_all();
    self.events.push(GameEvent::GameOver {
      cause,
      score: self.score,
    });
    tracing::debug!(?cause, score = self.score, now = self.now, "game over");
  }

  pub fn snapshot(&self) -> GameSnapshot {
    let (reversed, reverse_seconds_left) = match self.phase {
      Phase::Reversed { seconds_left } => (true, seconds_left),
      _ => (false, 0),
    };
    let game_over = match self.phase {
      Phase::GameOver { cause } => Some(cause),
      _ => None,
    };
    GameSnapshot {
      now: self.now,
      grid_size: GRID_SIZE,
      score: self.score,
      snake: self.snake.clone(),
      direction: self.direction,
      food: self.food.map(|food| FoodSnapshot {
        position: food.position,
        kind: food.kind,
        dodges_left: food.dodges_left,
        logo_url: food.kind.logo().map(|logo| logo.url),
      }),
      blocker: self.blocker.position().map(|position| BlockerSnapshot {
        position,
        active: self.blocker.is_active(),
      }),
      reversed,
      reverse_seconds_left,
      game_over,
      mood: self.mood,
      face: self.mood.face(),
    }
  }
}

// Inspection helpers for the engine's own tests.
#[cfg(test)]
impl Game {
  pub fn now(&self) -> u64 {
    self.now
  }

  pub fn snake(&self) -> &[Position] {
    &self.snake
  }

  pub fn direction(&self) -> Direction {
    self.direction
  }

  pub fn food(&self) -> Option<&Food> {
    self.food.as_ref()
  }

  pub fn blocker(&self) -> &Blocker {
    &self.blocker
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn mood(&self) -> Mood {
    self.mood
  }

  pub fn pending_timers(&self) -> usize {
    self.timers.len()
  }

  /// Timers other than the main tick.
  pub fn pending_deferred_timers(&self) -> usize {
    self.timers.len() - usize::from(self.timers.is_pending(TimerKind::Tick))
  }

  pub fn advance(&mut self, elapsed_ms: u64) -> usize {
    self.advance_to(self.now + elapsed_ms)
  }
}
