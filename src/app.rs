use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};
use typemaster::{
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore},
    report::{PresentationSink, Report, Snapshot},
    runtime::AppEvent,
    session::{Phase, Session},
    timer::{ThreadTicker, Ticker},
};

use crate::ui::notification::{Notification, NotificationKind};

/// What the presentation layer currently shows; fed only by the session
#[derive(Debug, Default)]
pub struct Dashboard {
    pub snapshot: Option<Snapshot>,
    pub report: Option<Report>,
    pub notification: Option<Notification>,
}

impl Dashboard {
    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn expire_notification(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.notification = None;
        }
    }
}

impl PresentationSink for Dashboard {
    fn snapshot(&mut self, snapshot: &Snapshot) {
        self.snapshot = Some(*snapshot);
    }

    fn finished(&mut self, report: &Report) {
        self.snapshot = Some(report.snapshot);
        self.report = Some(*report);
        self.notify(Notification::for_report(report));
    }

    fn started(&mut self) {
        self.report = None;
        self.notify(Notification::started());
    }

    fn reset(&mut self) {
        self.snapshot = None;
        self.report = None;
    }
}

pub struct App<C: Clock = SystemClock, T: Ticker = ThreadTicker<AppEvent>> {
    pub session: Session<C, T>,
    pub dashboard: Dashboard,
    /// Everything typed into the input field so far
    pub input: String,
    /// Set by a first Esc while a test runs; a second Esc resets
    pub confirm_reset: bool,
    pub should_quit: bool,
    store: Option<Box<dyn ConfigStore>>,
}

impl<C: Clock, T: Ticker> App<C, T> {
    pub fn new(session: Session<C, T>, store: Option<Box<dyn ConfigStore>>) -> Self {
        Self {
            session,
            dashboard: Dashboard::default(),
            input: String::new(),
            confirm_reset: false,
            should_quit: false,
            store,
        }
    }

    /// Live values to display: the last pushed snapshot, or the session's
    /// resting values before anything has been pushed
    pub fn snapshot(&self) -> Snapshot {
        self.dashboard
            .snapshot
            .unwrap_or_else(|| self.session.snapshot())
    }

    pub fn handle(&mut self, event: AppEvent) {
        self.dashboard.expire_notification(Instant::now());
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Paste(_) => self.dashboard.notify(Notification::paste_refused()),
            AppEvent::Tick(id) => self.session.on_tick(id, &mut self.dashboard),
            AppEvent::Resize | AppEvent::Refresh => {}
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if key.code != KeyCode::Esc {
            self.confirm_reset = false;
        }

        match self.session.phase() {
            Phase::Idle | Phase::Active => self.on_typing_key(key),
            Phase::Ended => self.on_results_key(key),
        }
    }

    fn on_typing_key(&mut self, key: KeyEvent) {
        let active = self.session.is_active();
        match key.code {
            KeyCode::Esc => {
                if active && !self.confirm_reset {
                    self.confirm_reset = true;
                    self.dashboard.notify(Notification::new(
                        "Press Esc again to reset the test",
                        NotificationKind::Warning,
                    ));
                } else {
                    self.reset();
                }
            }
            KeyCode::Enter if !active => {
                self.session.start(&mut self.dashboard);
            }
            KeyCode::Tab if !active => self.cycle_difficulty(),
            KeyCode::Backspace if active => {
                if self.input.pop().is_some() {
                    self.session.on_input(&self.input, &mut self.dashboard);
                }
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(c);
                self.session.on_input(&self.input, &mut self.dashboard);
            }
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter | KeyCode::Esc => self.reset(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.cycle_difficulty(),
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        self.session.reset(&mut self.dashboard);
        self.input.clear();
        self.confirm_reset = false;
    }

    fn cycle_difficulty(&mut self) {
        let next = self.session.difficulty().next();
        if !self.session.set_difficulty(next) {
            return;
        }
        debug!(difficulty = %next, "difficulty changed");

        // only the difficulty changes; a one-off -s stays out of the stored file
        let saved = match &self.store {
            Some(store) => store.save(&Config {
                difficulty: next,
                ..store.load()
            }),
            None => Ok(()),
        };

        match saved {
            Ok(()) => self.dashboard.notify(Notification::new(
                format!("Difficulty: {next}"),
                NotificationKind::Info,
            )),
            Err(err) => {
                warn!(%err, "could not save config");
                self.dashboard.notify(Notification::new(
                    "Could not save settings",
                    NotificationKind::Error,
                ));
            }
        }
    }
}
