use invaders::{
    EventSink, Entity, Level, LevelOutcome, PlayField, PowerUpKind, ProjectileKind, Scoreboard,
    Side,
};
use rand::rngs::StdRng;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::GameState;

/// Everything the renderer needs for one frame
pub struct RenderView<'a, S: EventSink> {
    pub state: GameState,
    pub level: &'a Level<StdRng, S>,
    pub scoreboard: &'a Scoreboard,
    pub status: Option<&'a str>,
    pub fps: u32,
    pub area: Rect,
}

/// Maps world coordinates onto terminal cells
#[derive(Debug, Clone, Copy)]
struct Viewport {
    area: Rect,
    scale_x: f64,
    scale_y: f64,
}

impl Viewport {
    /// Largest rectangle inside `area` that keeps the field's proportions,
    /// terminal cells being roughly twice as tall as they are wide
    fn fit(area: Rect, field: &PlayField) -> Self {
        let height = f64::from(area.height);
        let width = (height * field.width / field.height * 2.0).min(f64::from(area.width));
        let height = (width * field.height / field.width / 2.0).min(height);
        let cells = Rect {
            x: area.x + (area.width.saturating_sub(width as u16)) / 2,
            y: area.y,
            width: width as u16,
            height: height as u16,
        };
        Self {
            area: cells,
            scale_x: f64::from(cells.width) / field.width,
            scale_y: f64::from(cells.height) / field.height,
        }
    }

    /// Cells covered by `body`, at least one, clipped to the viewport
    fn project(&self, body: &Entity) -> Option<Rect> {
        let left = (body.x * self.scale_x).floor();
        let top = (body.y * self.scale_y).floor();
        if left < 0.0 || top < 0.0 {
            return None;
        }
        let (left, top) = (left as u16, top as u16);
        if left >= self.area.width || top >= self.area.height {
            return None;
        }
        let width = ((body.width * self.scale_x).round() as u16)
            .max(1)
            .min(self.area.width - left);
        let height = ((body.height * self.scale_y).round() as u16)
            .max(1)
            .min(self.area.height - top);
        Some(Rect {
            x: self.area.x + left,
            y: self.area.y + top,
            width,
            height,
        })
    }

    fn fill(&self, buffer: &mut Buffer, body: &Entity, glyph: char, style: Style) {
        if let Some(cells) = self.project(body) {
            let row = glyph.to_string().repeat(usize::from(cells.width));
            for y in cells.y..cells.y + cells.height {
                buffer.set_string(cells.x, y, &row, style);
            }
        }
    }
}

/// Names of the power-ups currently in effect, in collection order
fn active_power_ups<S: EventSink>(level: &Level<StdRng, S>) -> String {
    level
        .power_ups()
        .iter()
        .filter(|power_up| power_up.is_active())
        .map(|power_up| power_up.kind.get_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render<S: EventSink>(&self, frame: &mut Frame, view: &RenderView<S>) {
        self.render_game(frame, view);
        match view.state {
            GameState::Playing => {}
            GameState::Paused => self.render_paused(frame, view),
            GameState::Over(outcome) => self.render_menu(frame, view, outcome),
        }
    }

    fn render_game<S: EventSink>(&self, frame: &mut Frame, view: &RenderView<S>) {
        let area = view.area;
        let playable = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        let level = view.level;
        let viewport = Viewport::fit(playable, level.field());

        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let border = Rect {
            x: viewport.area.x.saturating_sub(1),
            width: (viewport.area.width + 2).min(area.width),
            ..viewport.area
        };
        frame.render_widget(block, border);

        let buffer = frame.buffer_mut();
        let bold = Style::default().add_modifier(Modifier::BOLD);

        if let Some(formation) = level.hostiles().formation() {
            for enemy in formation.enemies() {
                let color = match enemy.tier {
                    1 => Color::Red,
                    2 => Color::Magenta,
                    _ => Color::Yellow,
                };
                viewport.fill(buffer, &enemy.body, '#', bold.fg(color));
            }
        }
        if let Some(boss) = level.hostiles().boss() {
            let color = if boss.is_vulnerable() {
                Color::LightRed
            } else {
                Color::DarkGray
            };
            viewport.fill(buffer, &boss.body, 'W', bold.fg(color));
        }

        for power_up in level.power_ups().iter().filter(|p| !p.is_active()) {
            let color = match power_up.kind {
                PowerUpKind::Speed => Color::Cyan,
                PowerUpKind::Heavy => Color::LightMagenta,
                PowerUpKind::BurstFire => Color::LightGreen,
            };
            viewport.fill(buffer, &power_up.body, power_up.get_char(), bold.fg(color));
        }

        for projectile in level
            .friendly_projectiles()
            .iter()
            .chain(level.hostile_projectiles())
        {
            let (glyph, color) = match (projectile.side, projectile.kind) {
                (Side::Friendly, ProjectileKind::Heavy) => ('=', Color::Cyan),
                (Side::Friendly, ProjectileKind::Burst) => ('\'', Color::LightGreen),
                (Side::Friendly, _) => ('|', Color::Yellow),
                (Side::Hostile, ProjectileKind::Fireball) => ('*', Color::LightRed),
                (Side::Hostile, _) => ('!', Color::Magenta),
            };
            viewport.fill(buffer, &projectile.body, glyph, Style::default().fg(color));
        }

        let player = level.player();
        if player.is_alive() {
            viewport.fill(buffer, &player.body, '^', bold.fg(Color::Green));
        }

        let label = Style::default().fg(Color::DarkGray);
        let mut stats = vec![
            Span::styled("Score: ", label),
            Span::styled(view.scoreboard.points.to_string(), bold.fg(Color::Yellow)),
            Span::styled("  Lives: ", label),
            Span::styled(
                view.scoreboard.lives.to_string(),
                bold.fg(if view.scoreboard.lives > 1 { Color::Green } else { Color::Red }),
            ),
            Span::styled("  Level: ", label),
            Span::styled(level.number().to_string(), bold.fg(Color::Cyan)),
            Span::styled("  Weapon: ", label),
            Span::styled(player.current_weapon.get_name(), bold.fg(Color::Magenta)),
            Span::styled("  FPS: ", label),
            Span::styled(view.fps.to_string(), bold.fg(Color::White)),
        ];
        let active = active_power_ups(level);
        if !active.is_empty() {
            stats.push(Span::styled("  Active: ", label));
            stats.push(Span::styled(active, bold.fg(Color::LightGreen)));
        }
        if let Some(status) = view.status {
            stats.push(Span::styled(format!("  {status}"), bold.fg(Color::Red)));
        }
        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(stats)), stats_area);

        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [P: Pause] [Q: Quit] [K L S M B 1-9 N: Cheats]",
            label,
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_paused<S: EventSink>(&self, frame: &mut Frame, view: &RenderView<S>) {
        let lines = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];
        self.render_box(frame, view.area, lines, Color::Yellow);
    }

    /// Menu shown once a level has an outcome
    fn render_menu<S: EventSink>(&self, frame: &mut Frame, view: &RenderView<S>, outcome: LevelOutcome) {
        let (title, color) = match outcome {
            LevelOutcome::Lost => ("GAME OVER", Color::Red),
            LevelOutcome::ClearedFinal => ("YOU WIN!", Color::Green),
            LevelOutcome::ClearedIntermediate | LevelOutcome::Active => ("LEVEL CLEARED", Color::Cyan),
        };
        let mut lines = vec![
            Line::from(""),
            Line::from(title).centered().bold().fg(color),
            Line::from(""),
            Line::from(format!("Score: {}", view.scoreboard.points))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
        ];
        match outcome {
            LevelOutcome::ClearedIntermediate => {
                lines.push(Line::from("Press N for the next level").centered().white());
                lines.push(Line::from("Press R to replay this level").centered().white());
            }
            LevelOutcome::ClearedFinal => {
                lines.push(Line::from("Press R to reset points and start over").centered().white());
            }
            LevelOutcome::Lost | LevelOutcome::Active => {
                lines.push(Line::from("Press R to restart the level").centered().white());
            }
        }
        lines.push(Line::from("Press Q to quit").centered().white());
        self.render_box(frame, view.area, lines, color);
    }

    fn render_box(&self, frame: &mut Frame, area: Rect, lines: Vec<Line>, color: Color) {
        let width = 44.min(area.width);
        let height = (lines.len() as u16 + 2).min(area.height);
        let boxed = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                )
                .alignment(Alignment::Center),
            boxed,
        );
    }
}
