mod app;
mod ui;

use crate::app::App;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc,
    time::Duration,
};
use tracing::info;
use typemaster::{
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{
        spawn_terminal_reader, AppEvent, ChannelEventSource, EventSource, Runner, REFRESH_RATE_MS,
    },
    timer::{ThreadTicker, Ticker},
    Corpus, Difficulty, Session, SessionConfig, TextSource,
};

/// typing speed test with live wpm, cpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing speed test for the terminal: type the sample text before the countdown runs out and watch words-per-minute, characters-per-minute and accuracy update as you go."
)]
pub struct Cli {
    /// difficulty of the sample text
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// number of seconds the countdown runs
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    seconds: Option<u32>,

    /// custom text to type instead of a sample
    #[clap(short = 'p', long, value_parser = non_empty)]
    prompt: Option<String>,
}

fn non_empty(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("prompt must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

impl Cli {
    /// Command-line values win over the stored configuration
    fn session_config(&self, stored: &Config) -> SessionConfig {
        SessionConfig {
            duration_secs: self.seconds.unwrap_or(stored.duration_secs),
            difficulty: self.difficulty.unwrap_or(stored.difficulty),
            source: match &self.prompt {
                Some(text) => TextSource::Custom(text.clone()),
                None => TextSource::Corpus,
            },
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init();

    let store = FileConfigStore::new();
    let session_config = cli.session_config(&store.load());
    let corpus = Corpus::embedded()?;

    let (tx, rx) = mpsc::channel();
    let ticker = ThreadTicker::new(tx.clone(), AppEvent::tick);
    let session = Session::new(session_config, corpus, SystemClock, ticker);
    let mut app = App::new(session, Some(Box::new(store)));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_terminal_reader(tx);
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        Duration::from_millis(REFRESH_RATE_MS),
    );

    info!("typemaster started");
    let result = run_app(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, E: EventSource, C: Clock, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App<C, T>,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        app.handle(runner.step());

        if app.should_quit {
            info!("typemaster exiting");
            return Ok(());
        }
    }
}
