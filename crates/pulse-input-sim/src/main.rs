//! Command-line simulator for the two-button demo layout.
//!
//! Press timelines are given as millisecond intervals, the engine is polled
//! at its configured cadence, and every recognized event is printed.
//!
//! ```text
//! pulse-sim --power 0-100,200-300 --menu 1000-1700 --until 2000
//! RUST_LOG=debug pulse-sim --power 0-900 --switch-at 400
//! ```

use clap::{Parser, ValueEnum};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use pulse_input::{
    BehaviorMap, Builder, ChannelId, Control, ControlQueue, Engine, EventDefinition, EventId,
    Input, InputChannel, InputId, Mode, SemanticEvent, StateStep,
};
use pulse_input_harness::{ScriptedSource, SimClock, Ticker};

static CLICK: [StateStep; 2] = [StateStep::active(20, 300), StateStep::inactive(0, 0)];
static DOUBLE_CLICK: [StateStep; 4] = [
    StateStep::active(20, 300),
    StateStep::inactive(20, 250),
    StateStep::active(20, 300),
    StateStep::inactive(0, 0),
];
static LONG_PRESS: [StateStep; 1] = [StateStep::active(500, 0)];

static POWER: [InputId; 1] = [InputId::new(0)];
static MENU: [InputId; 1] = [InputId::new(1)];
static CHORD: [InputId; 2] = [InputId::new(0), InputId::new(1)];

const EVENT_NAMES: [&str; 3] = ["click", "double-click", "long-press"];
const CHANNEL_NAMES: [&str; 3] = ["power", "menu", "power+menu"];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Layout {
    /// Page turning: clicks and long presses only
    Reading,
    /// Menu navigation: everything, including double clicks
    Menu,
}

impl Layout {
    fn mode(self) -> Mode {
        match self {
            Layout::Reading => Mode::new(1),
            Layout::Menu => Mode::new(2),
        }
    }

    fn other(self) -> Self {
        match self {
            Layout::Reading => Layout::Menu,
            Layout::Menu => Layout::Reading,
        }
    }
}

#[derive(Parser)]
#[command(name = "pulse-sim")]
#[command(about = "Replay button timelines through the input recognition engine", long_about = None)]
struct Cli {
    /// Power button active intervals, e.g. "0-100,200-300"
    #[arg(long, default_value = "0-100,200-300,1000-1700")]
    power: String,

    /// Menu button active intervals
    #[arg(long, default_value = "")]
    menu: String,

    /// Simulated time to run for
    #[arg(long, value_name = "MS")]
    until: Option<u32>,

    /// Behavior mode to start in
    #[arg(long, value_enum, default_value = "reading")]
    mode: Layout,

    /// Post a switch to the other mode at this time
    #[arg(long, value_name = "MS")]
    switch_at: Option<u32>,

    /// Poll period
    #[arg(long, default_value = "10", value_name = "MS")]
    period: u32,

    /// Level changes remembered per channel
    #[arg(long, default_value = "8")]
    log_depth: usize,
}

/// `[mode][channel][event]` for the demo layout.
fn behavior_map() -> BehaviorMap {
    BehaviorMap::from_array(&[
        // 0: reserved
        [[false; 3]; 3],
        // 1: reading
        [
            [true, false, true],
            [true, false, false],
            [false, false, true],
        ],
        // 2: menu
        [[true; 3]; 3],
    ])
}

fn print_event(event: SemanticEvent) {
    println!(
        "{:>6} ms  {:<12} {}",
        event.timestamp_ms,
        CHANNEL_NAMES[event.channel.index()],
        EVENT_NAMES[event.event.index()]
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let clock = SimClock::new();
    let power = ScriptedSource::parse(&clock, &cli.power)?;
    let menu = ScriptedSource::parse(&clock, &cli.menu)?;
    let until = cli
        .until
        .unwrap_or_else(|| power.last_release().max(menu.last_release()).saturating_add(1000));
    let handler = print_event;
    let controls: ControlQueue<NoopRawMutex, 2> = ControlQueue::new();

    let config = Builder::new()
        .inputs(2)
        .channels(3)
        .events(3)
        .modes(3)
        .log_depth(cli.log_depth)
        .poll_period_ms(cli.period)
        .build()?;
    let mut engine = Engine::new(config);
    engine.add_inputs(&[Input::new(&power), Input::new(&menu)])?;
    engine.add_event_definitions(&[
        EventDefinition::new(&CLICK),
        EventDefinition::new(&DOUBLE_CLICK),
        EventDefinition::new(&LONG_PRESS),
    ])?;
    engine.add_input_channels(&[
        InputChannel::new(&POWER, &handler),
        InputChannel::new(&MENU, &handler),
        InputChannel::new(&CHORD, &handler),
    ])?;
    engine.set_behavior_map(behavior_map())?;
    engine.set_behavior_mode(cli.mode.mode())?;

    println!("Pulse input simulator");
    println!("  mode {:?}, poll every {} ms, until {} ms", cli.mode, cli.period, until);
    for (id, name) in EVENT_NAMES.iter().enumerate() {
        let id = EventId::new(id as u16);
        let enabled: Vec<&str> = CHANNEL_NAMES
            .iter()
            .enumerate()
            .filter(|(c, _)| engine.is_event_enabled(ChannelId::new(*c as u16), id) == Some(true))
            .map(|(_, channel)| *channel)
            .collect();
        println!("  {name:<12} on {}", enabled.join(", "));
    }
    println!();

    let ticker = Ticker::new(&clock, cli.period);
    let mut switch_at = cli.switch_at;
    ticker.run_until_with(&mut engine, until, |engine, now| {
        if switch_at.is_some_and(|at| now >= at) {
            let next = cli.mode.other();
            if controls.try_push(Control::SetBehaviorMode(next.mode())).is_err() {
                log::warn!("control queue full");
            }
            println!("{now:>6} ms  -- switching to {next:?}");
            switch_at = None;
        }
        engine.apply_controls(&controls);
    });

    Ok(())
}
