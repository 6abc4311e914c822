use color_eyre::Result;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use invaders::{Game, GameConfig, LevelOutcome, LevelSource, Scoreboard};

use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};

/// What the front-end is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    /// The level reached an outcome and the menu is up
    Over(LevelOutcome),
}

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    paused: bool,
    game: Game<Box<dyn LevelSource>, Scoreboard>,
    /// Real time not yet consumed by fixed steps
    accumulator: Duration,
    last_frame_time: Instant,
    fps: u32,
    /// Last level load failure, shown until the next successful load
    status: Option<String>,
    /// Without release events a held key would never let go
    release_events: bool,
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    pub fn new(
        config: GameConfig,
        levels: Box<dyn LevelSource>,
        first_level: u32,
        release_events: bool,
    ) -> Result<Self> {
        let game = Game::new(config, levels, Scoreboard::new(), first_level)?;
        Ok(Self {
            running: true,
            paused: false,
            game,
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            fps: 0,
            status: None,
            release_events,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
        })
    }

    fn state(&self) -> GameState {
        let outcome = self.game.outcome();
        if outcome.is_terminal() {
            GameState::Over(outcome)
        } else if self.paused {
            GameState::Paused
        } else {
            GameState::Playing
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        let step = Duration::from_secs_f64(self.game.config().step_seconds);

        while self.running {
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            terminal.draw(|frame| {
                let view = RenderView {
                    state: self.state(),
                    level: self.game.level(),
                    scoreboard: self.game.sink(),
                    status: self.status.as_deref(),
                    fps: self.fps,
                    area: frame.area(),
                };
                self.renderer.render(frame, &view);
            })?;

            let state = self.state();
            self.input_manager.poll_events(state)?;
            let actions = self.input_manager.get_actions(state);
            self.process_actions(&actions);
            if !self.release_events {
                self.input_manager.release_all();
            }

            if self.state() == GameState::Playing {
                // cap the backlog so a stalled terminal does not fast-forward the game
                self.accumulator = (self.accumulator + frame_time).min(step * 5);
                while self.accumulator >= step {
                    self.accumulator -= step;
                    if self.game.advance().is_terminal() {
                        self.accumulator = Duration::ZERO;
                        break;
                    }
                }
            } else {
                self.accumulator = Duration::ZERO;
            }

            std::thread::sleep(Duration::from_millis(8));
        }
        info!("quit with {} points", self.game.sink().points);
        Ok(())
    }

    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match *action {
                InputAction::Quit => self.running = false,
                InputAction::Pause => self.paused = true,
                InputAction::Resume => self.paused = false,
                InputAction::Move(direction) => self.game.move_player(direction),
                InputAction::Fire => {
                    self.game.fire();
                }
                InputAction::DestroyFirstHostile => {
                    self.game.destroy_first_hostile();
                }
                InputAction::GrantLife => self.game.grant_life(),
                InputAction::GrantPowerUp(kind) => {
                    self.game.grant_power_up(kind);
                }
                InputAction::Restart => self.restart(),
                InputAction::NextLevel => {
                    let result = self.game.next_level();
                    self.record(result);
                }
                InputAction::JumpTo(level) => {
                    let result = self.game.jump_to_level(level);
                    self.record(result);
                }
            }
        }
    }

    /// Replays the level, or starts a fresh run once the final level is won
    fn restart(&mut self) {
        let result = if self.game.outcome() == LevelOutcome::ClearedFinal {
            let result = self.game.jump_to_level(1);
            if result.is_ok() {
                self.game.sink_mut().reset_points();
            }
            result
        } else {
            self.game.restart_level()
        };
        self.record(result);
    }

    /// Keeps level load failures on screen instead of ending the session
    fn record(&mut self, result: Result<u32, invaders::LevelError>) {
        match result {
            Ok(level) => {
                self.paused = false;
                self.status = None;
                info!("switched to level {level}");
            }
            Err(err) => {
                warn!("level change failed: {err}");
                self.status = Some(err.to_string());
            }
        }
    }
}
