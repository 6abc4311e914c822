mod app;
mod input;
mod renderer;

use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use env_logger::{Builder, Env, Target};
use log::{LevelFilter, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};

use invaders::{BuiltinLevels, GameConfig, LevelDirectory, LevelSource};

use app::App;

/// Fixed-step arcade shooter for the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for every random decision in the run
    #[arg(long, default_value_t = GameConfig::default().seed)]
    seed: u64,
    /// Level to start on
    #[arg(short, long, default_value_t = 1)]
    level: u32,
    /// Directory of level_<n>.txt files, the built-in levels otherwise
    #[arg(long)]
    levels_dir: Option<PathBuf>,
    /// File the log is written to
    #[arg(long, default_value = "debug.log")]
    log_file: PathBuf,
    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

/// Sends log output to `path`; the terminal belongs to the game
fn init_logging(path: &Path, verbose: bool) -> color_eyre::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    Builder::from_env(env)
        .target(Target::Pipe(Box::new(File::create(path)?)))
        .try_init()?;
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args.log_file, args.verbose)?;

    let config = GameConfig {
        seed: args.seed,
        ..GameConfig::default()
    };
    let levels: Box<dyn LevelSource> = match args.levels_dir {
        Some(root) => {
            let levels = LevelDirectory::new(root);
            info!("loading levels from {}", levels.root().display());
            Box::new(levels)
        }
        None => {
            info!("loading built-in levels");
            Box::new(BuiltinLevels)
        }
    };
    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    info!("keyboard enhancement supported: {supports_keyboard_enhancement}");

    // Load the first level before touching the terminal so errors print normally
    let app = App::new(config, levels, args.level, supports_keyboard_enhancement)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
