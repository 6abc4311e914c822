use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use invaders::{Direction, PowerUpKind};

use crate::app::GameState;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Move(Direction),
    Fire,
    Pause,
    Resume,
    Restart,
    NextLevel,
    JumpTo(u32),
    DestroyFirstHostile,
    GrantLife,
    GrantPowerUp(PowerUpKind),
    Quit,
}

/// Keys that stay active while held down
#[derive(Debug, Default)]
struct KeyState {
    fire: bool,
}

/// Manages input polling and translates raw key events into game actions
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
        }
    }

    /// Polls for all pending events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, game_state: GameState) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, game_state);
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, game_state: GameState) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, game_state, false),
            // Repeats move the ship again but never toggle menus
            KeyEventKind::Repeat => self.handle_key_press(key_event, game_state, true),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: GameState, repeat: bool) {
        if matches!(key_event.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
            || (key_event.code == KeyCode::Char('c')
                && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        if let KeyCode::Char(digit @ '1'..='9') = key_event.code {
            if let Some(level) = digit.to_digit(10) {
                self.oneshot_actions.push(InputAction::JumpTo(level));
            }
            return;
        }

        let action = match game_state {
            GameState::Playing => match key_event.code {
                KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                    Some(InputAction::Move(Direction::Left))
                }
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                    Some(InputAction::Move(Direction::Right))
                }
                KeyCode::Char(' ') => {
                    self.key_state.fire = true;
                    None
                }
                _ if repeat => None,
                KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::Pause),
                KeyCode::Char('k') | KeyCode::Char('K') => Some(InputAction::DestroyFirstHostile),
                KeyCode::Char('l') | KeyCode::Char('L') => Some(InputAction::GrantLife),
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    Some(InputAction::GrantPowerUp(PowerUpKind::Speed))
                }
                KeyCode::Char('m') | KeyCode::Char('M') => {
                    Some(InputAction::GrantPowerUp(PowerUpKind::Heavy))
                }
                KeyCode::Char('b') | KeyCode::Char('B') => {
                    Some(InputAction::GrantPowerUp(PowerUpKind::BurstFire))
                }
                KeyCode::Char('n') | KeyCode::Char('N') => Some(InputAction::NextLevel),
                _ => None,
            },
            _ if repeat => None,
            GameState::Paused => match key_event.code {
                KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::Resume),
                _ => None,
            },
            GameState::Over(_) => match key_event.code {
                KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Restart),
                KeyCode::Char('n') | KeyCode::Char('N') => Some(InputAction::NextLevel),
                _ => None,
            },
        };
        self.oneshot_actions.extend(action);
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        if code == KeyCode::Char(' ') {
            self.key_state.fire = false;
        }
    }

    /// Returns all actions for this frame (both continuous and one-shot)
    /// Must be called after poll_events()
    pub fn get_actions(&self, game_state: GameState) -> Vec<InputAction> {
        let mut actions = self.oneshot_actions.clone();
        if game_state == GameState::Playing && self.key_state.fire {
            actions.push(InputAction::Fire);
        }
        actions
    }

    /// Terminals without release events never clear held keys on their own
    pub fn release_all(&mut self) {
        self.key_state = KeyState::default();
    }
}
