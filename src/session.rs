use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::corpus::{Corpus, Difficulty, TextSource};
use crate::report::{EndReason, PresentationSink, Report, Snapshot};
use crate::scoring::{self, CharClass, Score};
use crate::timer::{Ticker, TimerHandle, TimerId};

pub const DEFAULT_DURATION_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub duration_secs: u32,
    pub difficulty: Difficulty,
    pub source: TextSource,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            difficulty: Difficulty::default(),
            source: TextSource::Corpus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Active,
    Ended,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: Phase,
    pub reference: String,
    pub typed: String,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
    pub time_remaining: u32,
    pub score: Score,
    pub report: Option<Report>,
}

impl SessionState {
    fn fresh(reference: String, duration_secs: u32) -> Self {
        Self {
            phase: Phase::Idle,
            reference,
            typed: String::new(),
            started_at: None,
            ended_at: None,
            time_remaining: duration_secs,
            score: Score::default(),
            report: None,
        }
    }
}

/// Owns one typing session at a time and every transition between them.
///
/// All mutation goes through the handlers below; each takes the presentation
/// sink explicitly and runs to completion before the next event is handled.
pub struct Session<C: Clock, T: Ticker> {
    config: SessionConfig,
    corpus: Corpus,
    clock: C,
    ticker: T,
    rng: StdRng,
    state: SessionState,
    countdown: Option<TimerHandle>,
    next_timer_id: u64,
}

impl<C: Clock, T: Ticker> Session<C, T> {
    pub fn new(config: SessionConfig, corpus: Corpus, clock: C, ticker: T) -> Self {
        Self::with_rng(config, corpus, clock, ticker, StdRng::from_entropy())
    }

    pub fn with_rng(
        config: SessionConfig,
        corpus: Corpus,
        clock: C,
        ticker: T,
        mut rng: StdRng,
    ) -> Self {
        let reference = draw_reference(&config, &corpus, &mut rng);
        let state = SessionState::fresh(reference, config.duration_secs);

        Self {
            config,
            corpus,
            clock,
            ticker,
            rng,
            state,
            countdown: None,
            next_timer_id: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_active(&self) -> bool {
        self.state.phase == Phase::Active
    }

    pub fn reference(&self) -> &str {
        &self.state.reference
    }

    pub fn typed(&self) -> &str {
        &self.state.typed
    }

    pub fn score(&self) -> Score {
        self.state.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.state.time_remaining
    }

    pub fn report(&self) -> Option<&Report> {
        self.state.report.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Id of the running countdown, if any
    pub fn timer_id(&self) -> Option<TimerId> {
        self.countdown.as_ref().map(TimerHandle::id)
    }

    /// Time spent typing: frozen once the session has ended
    pub fn elapsed(&self) -> Duration {
        match (self.state.started_at, self.state.ended_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => self.clock.now().saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    /// Live values as the presentation layer sees them
    pub fn snapshot(&self) -> Snapshot {
        let score = self.state.score;
        Snapshot {
            score,
            metrics: scoring::metrics(&score, self.elapsed()),
            time_remaining: self.state.time_remaining,
            progress_percent: scoring::progress_percent(&self.state.reference, &score),
        }
    }

    /// Per-character highlighting of the reference text
    pub fn highlights(&self) -> Vec<(char, CharClass)> {
        scoring::classify(&self.state.reference, &self.state.typed)
    }

    /// Enter `Active` from `Idle`. Anything already typed is kept and scored
    /// right away. Returns false when the session was not idle.
    pub fn start<S: PresentationSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if self.state.phase != Phase::Idle {
            debug!(phase = %self.state.phase, "start ignored");
            return false;
        }

        self.state.phase = Phase::Active;
        self.state.started_at = Some(self.clock.now());
        self.state.ended_at = None;
        self.state.time_remaining = self.config.duration_secs;
        self.state.score = Score::default();
        self.state.report = None;

        self.next_timer_id += 1;
        let id = TimerId(self.next_timer_id);
        self.countdown = Some(self.ticker.start(id));

        info!(
            timer = id.0,
            difficulty = %self.config.difficulty,
            preserved = self.state.typed.chars().count(),
            "session started"
        );
        sink.started();
        self.rescore(sink);
        true
    }

    /// Accept the full typed string from the input source
    pub fn on_input<S: PresentationSink + ?Sized>(&mut self, typed: &str, sink: &mut S) {
        match self.state.phase {
            Phase::Ended => {
                trace!("input ignored after session end");
            }
            Phase::Idle => {
                self.state.typed = typed.to_owned();
                if !typed.is_empty() {
                    self.start(sink);
                }
            }
            Phase::Active => {
                self.state.typed = typed.to_owned();
                self.rescore(sink);
            }
        }
    }

    /// One countdown tick. Ticks from a cancelled countdown are dropped.
    pub fn on_tick<S: PresentationSink + ?Sized>(&mut self, id: TimerId, sink: &mut S) {
        if self.state.phase != Phase::Active || self.timer_id() != Some(id) {
            trace!(timer = id.0, phase = %self.state.phase, "stale tick dropped");
            return;
        }

        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        sink.snapshot(&self.snapshot());

        if self.state.time_remaining == 0 {
            self.finish(EndReason::TimeUp, sink);
        }
    }

    /// Back to `Idle` from any phase with a newly drawn reference text
    pub fn reset<S: PresentationSink + ?Sized>(&mut self, sink: &mut S) {
        self.cancel_countdown();

        let reference = draw_reference(&self.config, &self.corpus, &mut self.rng);
        self.state = SessionState::fresh(reference, self.config.duration_secs);

        info!(difficulty = %self.config.difficulty, "session reset");
        sink.reset();
    }

    /// Choose the difficulty for the next reference text.
    ///
    /// Ignored while a session is running. While idle a new text is drawn
    /// immediately; after a session ends the choice applies on the next reset.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        match self.state.phase {
            Phase::Active => {
                debug!(%difficulty, "difficulty change ignored while active");
                false
            }
            Phase::Idle => {
                self.config.difficulty = difficulty;
                self.state.reference = draw_reference(&self.config, &self.corpus, &mut self.rng);
                true
            }
            Phase::Ended => {
                self.config.difficulty = difficulty;
                true
            }
        }
    }

    fn rescore<S: PresentationSink + ?Sized>(&mut self, sink: &mut S) {
        self.state.score = scoring::score(&self.state.reference, &self.state.typed);
        sink.snapshot(&self.snapshot());

        if self.state.score.total >= self.state.reference.chars().count() {
            self.finish(EndReason::Completed, sink);
        }
    }

    fn finish<S: PresentationSink + ?Sized>(&mut self, reason: EndReason, sink: &mut S) {
        self.cancel_countdown();
        self.state.phase = Phase::Ended;
        self.state.ended_at = Some(self.clock.now());

        let report = Report {
            snapshot: self.snapshot(),
            elapsed: self.elapsed(),
            reason,
        };
        self.state.report = Some(report);

        info!(
            %reason,
            wpm = report.wpm(),
            cpm = report.cpm(),
            accuracy = report.accuracy(),
            errors = report.errors(),
            "session ended"
        );
        sink.finished(&report);
    }

    fn cancel_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.cancel();
        }
    }
}

fn draw_reference(config: &SessionConfig, corpus: &Corpus, rng: &mut StdRng) -> String {
    match &config.source {
        TextSource::Custom(text) => text.clone(),
        TextSource::Corpus => corpus.select_text(config.difficulty, rng).to_owned(),
    }
}
