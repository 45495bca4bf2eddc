//! Host-side scenario harness for scripted input timelines.
//!
//! Sources follow a script of active intervals on a simulated clock, and a
//! recording handler captures everything the engine fires, so a test can
//! describe "press from 0 to 50 ms" and assert on the resulting events.

use std::cell::{Cell, RefCell};

use pulse_input::{Engine, EventHandler, EventId, InputSource, SemanticEvent};

/// Simulated millisecond clock shared by scripted sources and the ticker.
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<u32>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u32 {
        self.now.get()
    }

    pub fn set(&self, now_ms: u32) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

/// Half-open interval `[start, end)` during which a source is active.
pub type Interval = (u32, u32);

/// Source whose level is a fixed script over the simulated clock.
pub struct ScriptedSource<'c> {
    clock: &'c SimClock,
    active: Vec<Interval>,
}

impl<'c> ScriptedSource<'c> {
    /// Source active during each `[start, end)` in `active`.
    pub fn new(clock: &'c SimClock, active: &[Interval]) -> Self {
        Self {
            clock,
            active: active.to_vec(),
        }
    }

    /// Source that is never active.
    pub fn idle(clock: &'c SimClock) -> Self {
        Self::new(clock, &[])
    }

    /// Parse a script such as `"0-50,120-180"` (milliseconds, end exclusive).
    pub fn parse(clock: &'c SimClock, script: &str) -> Result<Self, String> {
        Ok(Self {
            clock,
            active: parse_intervals(script)?,
        })
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.active
    }

    /// End of the last active interval.
    pub fn last_release(&self) -> u32 {
        self.active.iter().map(|&(_, end)| end).max().unwrap_or(0)
    }
}

impl InputSource for ScriptedSource<'_> {
    fn is_active(&self) -> bool {
        let now = self.clock.now();
        self.active
            .iter()
            .any(|&(start, end)| start <= now && now < end)
    }
}

/// Parse comma-separated `start-end` millisecond intervals.
pub fn parse_intervals(script: &str) -> Result<Vec<Interval>, String> {
    let mut intervals = Vec::new();
    for part in script.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = part
            .split_once('-')
            .ok_or_else(|| format!("interval '{part}' is not start-end"))?;
        let start: u32 = start
            .trim()
            .parse()
            .map_err(|e| format!("interval '{part}': {e}"))?;
        let end: u32 = end
            .trim()
            .parse()
            .map_err(|e| format!("interval '{part}': {e}"))?;
        if end <= start {
            return Err(format!("interval '{part}' ends before it starts"));
        }
        intervals.push((start, end));
    }
    Ok(intervals)
}

/// Handler that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: RefCell<Vec<SemanticEvent>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, in delivery order.
    pub fn events(&self) -> Vec<SemanticEvent> {
        self.events.borrow().clone()
    }

    /// Tick times at which `event` fired.
    pub fn fired_at(&self, event: EventId) -> Vec<u32> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.event == event)
            .map(|e| e.timestamp_ms)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventHandler for RecordingHandler {
    fn on_event(&self, event: SemanticEvent) {
        log::trace!("recorded {event:?}");
        self.events.borrow_mut().push(event);
    }
}

/// Stands in for the periodic scheduler: polls at a fixed period and moves
/// the simulated clock forward.
pub struct Ticker<'c> {
    clock: &'c SimClock,
    period_ms: u32,
}

impl<'c> Ticker<'c> {
    pub fn new(clock: &'c SimClock, period_ms: u32) -> Self {
        Self { clock, period_ms }
    }

    /// Ticker at the engine's configured cadence.
    pub fn for_engine(clock: &'c SimClock, engine: &Engine<'_>) -> Self {
        Self::new(clock, engine.config().poll_period_ms())
    }

    /// Poll once at the current time, then advance one period.
    pub fn tick(&self, engine: &mut Engine<'_>) {
        engine.poll(self.clock.now());
        self.clock.advance(self.period_ms);
    }

    /// Poll every period from now up to and including `until_ms`.
    ///
    /// Returns the number of ticks run. Stops after the last tick that fits
    /// below `u32::MAX`; step across a clock wrap with [`tick`](Self::tick).
    pub fn run_until(&self, engine: &mut Engine<'_>, until_ms: u32) -> usize {
        self.run_until_with(engine, until_ms, |_, _| {})
    }

    /// Like [`run_until`](Self::run_until), calling `before_tick` with the
    /// engine and the tick time ahead of every poll.
    pub fn run_until_with<'e>(
        &self,
        engine: &mut Engine<'e>,
        until_ms: u32,
        mut before_tick: impl FnMut(&mut Engine<'e>, u32),
    ) -> usize {
        let mut ticks = 0;
        while self.clock.now() <= until_ms {
            let now = self.clock.now();
            before_tick(engine, now);
            self.tick(engine);
            ticks += 1;
            if now.checked_add(self.period_ms).is_none() {
                break;
            }
        }
        ticks
    }
}
