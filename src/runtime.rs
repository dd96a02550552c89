use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

use crate::timer::TimerId;

/// Default wait between redraws when nothing else happens
pub const REFRESH_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    /// A countdown tick, tagged with the countdown that produced it
    Tick(TimerId),
    /// Nothing arrived within the refresh interval
    Refresh,
}

impl AppEvent {
    /// Constructor handed to the countdown ticker
    pub fn tick(id: TimerId) -> Self {
        AppEvent::Tick(id)
    }
}

/// Source of application events
pub trait EventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Event source reading from the shared application channel
pub struct ChannelEventSource {
    rx: Receiver<AppEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Forward terminal input into the application channel from a background thread
pub fn spawn_terminal_reader(tx: Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        let evt = match event::read() {
            // key release/repeat reports only show up on some terminals
            Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Ok(CtEvent::Paste(text)) => Some(AppEvent::Paste(text)),
            Ok(CtEvent::Resize(_, _)) => Some(AppEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });
}

/// Runner that advances the application one event at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    refresh: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, refresh: Duration) -> Self {
        Self {
            event_source,
            refresh,
        }
    }

    /// Blocks up to the refresh interval and returns the next event, or Refresh on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.refresh) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                AppEvent::Refresh
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_refresh_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));

        assert_eq!(runner.step(), AppEvent::Refresh);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        tx.send(AppEvent::Tick(TimerId(3))).unwrap();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(10));

        assert_eq!(runner.step(), AppEvent::Resize);
        assert_eq!(runner.step(), AppEvent::Tick(TimerId(3)));
    }

    #[test]
    fn step_after_disconnect_is_refresh() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));

        assert_eq!(runner.step(), AppEvent::Refresh);
    }
}
