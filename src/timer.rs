use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Interval between countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Identifies one countdown; ticks from an older countdown carry an older id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle to a running countdown. Cancels the countdown when dropped.
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn new(id: TimerId) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts repeating once-per-interval ticks
pub trait Ticker {
    fn start(&mut self, id: TimerId) -> TimerHandle;
}

/// Production ticker: one background thread per countdown, posting into the event channel
pub struct ThreadTicker<T: Send + 'static> {
    tx: Sender<T>,
    make_event: fn(TimerId) -> T,
    interval: Duration,
}

impl<T: Send + 'static> ThreadTicker<T> {
    pub fn new(tx: Sender<T>, make_event: fn(TimerId) -> T) -> Self {
        Self::with_interval(tx, make_event, TICK_INTERVAL)
    }

    pub fn with_interval(tx: Sender<T>, make_event: fn(TimerId) -> T, interval: Duration) -> Self {
        Self {
            tx,
            make_event,
            interval,
        }
    }
}

impl<T: Send + 'static> Ticker for ThreadTicker<T> {
    fn start(&mut self, id: TimerId) -> TimerHandle {
        let handle = TimerHandle::new(id);
        let cancelled = handle.flag();
        let tx = self.tx.clone();
        let make_event = self.make_event;
        let interval = self.interval;

        thread::spawn(move || loop {
            thread::sleep(interval);
            if cancelled.load(Ordering::SeqCst) {
                break;
            }
            if tx.send(make_event(id)).is_err() {
                break;
            }
        });

        handle
    }
}

/// Ticker that never fires on its own; the test drives ticks by id
#[derive(Debug, Default)]
pub struct ManualTicker {
    started: Vec<(TimerId, Arc<AtomicBool>)>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every countdown started so far, oldest first
    pub fn started(&self) -> Vec<TimerId> {
        self.started.iter().map(|(id, _)| *id).collect()
    }

    /// Countdowns started and not yet cancelled
    pub fn running(&self) -> Vec<TimerId> {
        self.started
            .iter()
            .filter(|(_, cancelled)| !cancelled.load(Ordering::SeqCst))
            .map(|(id, _)| *id)
            .collect()
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, id: TimerId) -> TimerHandle {
        let handle = TimerHandle::new(id);
        self.started.push((id, handle.flag()));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Event {
        Tick(TimerId),
    }

    #[test]
    fn handle_cancels_on_drop() {
        let mut ticker = ManualTicker::new();
        let handle = ticker.start(TimerId(1));
        assert_eq!(ticker.running(), vec![TimerId(1)]);

        drop(handle);
        assert!(ticker.running().is_empty());
        assert_eq!(ticker.started(), vec![TimerId(1)]);
    }

    #[test]
    fn explicit_cancel() {
        let mut ticker = ManualTicker::new();
        let handle = ticker.start(TimerId(4));
        handle.cancel();

        assert!(handle.is_cancelled());
        assert!(ticker.running().is_empty());
    }

    #[test]
    fn thread_ticker_posts_ticks_with_its_id() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = ThreadTicker::with_interval(tx, Event::Tick, Duration::from_millis(5));
        let _handle = ticker.start(TimerId(9));

        let ev = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(ev, Event::Tick(TimerId(9)));
    }

    #[test]
    fn thread_ticker_stops_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = ThreadTicker::with_interval(tx, Event::Tick, Duration::from_millis(5));
        let handle = ticker.start(TimerId(2));
        handle.cancel();
        drop(ticker);

        // at most one tick can be in flight when cancel lands
        thread::sleep(Duration::from_millis(50));
        let received: Vec<Event> = rx.try_iter().collect();
        assert!(received.len() <= 1);
    }
}
