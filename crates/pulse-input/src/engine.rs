//! Registries and the periodic matching procedure

use alloc::vec::Vec;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::behavior::BehaviorMap;
use crate::check;
use crate::config::Config;
use crate::control::{Control, ControlQueue};
use crate::error::{Error, IdKind};
use crate::handler::{EventHandler, SemanticEvent};
use crate::id::{ChannelId, EventId, InputId, Mode};
use crate::pattern::EventDefinition;
use crate::registry::{ChannelState, EventSlot, Input, InputChannel};
use crate::source::InputSource;
use crate::state_log::StateLog;

/// Input event recognition engine
///
/// Owns fixed-capacity registries of inputs, event definitions and
/// channels, sized once from a [`Config`]. [`poll`](Self::poll) must be
/// called at the configured cadence; everything else is setup or gating.
pub struct Engine<'a> {
    config: Config,
    inputs: Vec<Option<Input<'a>>>,
    events: Vec<Option<EventDefinition<'a>>>,
    channels: Vec<Option<ChannelState<'a>>>,
    behavior: Option<BehaviorMap>,
    mode: Mode,
}

impl<'a> Engine<'a> {
    /// Create an engine with every registry empty
    pub fn new(config: Config) -> Self {
        log::debug!(
            "engine: {} inputs, {} channels, {} events, {} modes, log depth {}, poll every {} ms, validation {}",
            config.inputs(),
            config.channels(),
            config.events(),
            config.modes(),
            config.log_depth(),
            config.poll_period_ms(),
            if check::ENABLED { "on" } else { "off" }
        );
        Self {
            inputs: (0..config.inputs()).map(|_| None).collect(),
            events: (0..config.events()).map(|_| None).collect(),
            channels: (0..config.channels()).map(|_| None).collect(),
            behavior: None,
            mode: Mode::NONE,
            config,
        }
    }

    /// Access the configuration the engine was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== REGISTRATION ====================

    /// Register (or replace) the input at `id`
    pub fn add_input(&mut self, id: InputId, input: Input<'a>) -> Result<(), Error> {
        check::id(IdKind::Input, id.get(), self.inputs.len())?;
        self.inputs[id.index()] = Some(input);
        Ok(())
    }

    /// Register inputs with ids `0..inputs.len()`
    ///
    /// # Errors
    ///
    /// Returns `Error::CapacityExceeded` without registering anything if
    /// `inputs` is longer than the registry.
    pub fn add_inputs(&mut self, inputs: &[Input<'a>]) -> Result<(), Error> {
        check::capacity(inputs.len(), self.inputs.len())?;
        for (slot, input) in self.inputs.iter_mut().zip(inputs) {
            *slot = Some(*input);
        }
        Ok(())
    }

    /// Register (or replace) the event definition at `id`
    ///
    /// # Errors
    ///
    /// - `Error::InvalidId` if `id` is outside the registry
    /// - `Error::InvalidArgument` if the pattern is empty, longer than the
    ///   state log, or has a step whose max duration is below its min
    pub fn add_event_definition(
        &mut self,
        id: EventId,
        definition: EventDefinition<'a>,
    ) -> Result<(), Error> {
        check::id(IdKind::Event, id.get(), self.events.len())?;
        self.validate_definition(&definition)?;
        self.events[id.index()] = Some(definition);
        Ok(())
    }

    /// Register event definitions with ids `0..definitions.len()`
    pub fn add_event_definitions(
        &mut self,
        definitions: &[EventDefinition<'a>],
    ) -> Result<(), Error> {
        check::capacity(definitions.len(), self.events.len())?;
        for definition in definitions {
            self.validate_definition(definition)?;
        }
        for (slot, definition) in self.events.iter_mut().zip(definitions) {
            *slot = Some(*definition);
        }
        Ok(())
    }

    fn validate_definition(&self, definition: &EventDefinition<'a>) -> Result<(), Error> {
        check::argument(!definition.is_empty(), "event definition has no steps")?;
        check::argument(
            definition.len() <= self.config.log_depth(),
            "event definition is longer than the state log",
        )?;
        check::argument(
            definition
                .steps()
                .iter()
                .all(|s| s.max_duration_ms == 0 || s.max_duration_ms >= s.min_duration_ms),
            "step max duration is below its min duration",
        )
    }

    /// Register (or replace) the channel at `id`
    ///
    /// A replaced channel starts over with an empty log and zeroed counters.
    /// Its event slots take their enablement from the current behavior mode.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidId` if `id` or one of the source ids is outside its registry
    /// - `Error::InvalidArgument` if the channel has no sources
    pub fn add_input_channel(
        &mut self,
        id: ChannelId,
        channel: InputChannel<'a>,
    ) -> Result<(), Error> {
        check::id(IdKind::Channel, id.get(), self.channels.len())?;
        self.validate_channel(&channel)?;
        self.channels[id.index()] = Some(self.new_channel_state(id, channel));
        Ok(())
    }

    /// Register channels with ids `0..channels.len()`
    pub fn add_input_channels(&mut self, channels: &[InputChannel<'a>]) -> Result<(), Error> {
        check::capacity(channels.len(), self.channels.len())?;
        for channel in channels {
            self.validate_channel(channel)?;
        }
        // Entries past the registry are already rejected when checked
        for (index, channel) in channels.iter().enumerate().take(self.channels.len()) {
            let state = self.new_channel_state(ChannelId::new(index as u16), *channel);
            self.channels[index] = Some(state);
        }
        Ok(())
    }

    fn validate_channel(&self, channel: &InputChannel<'a>) -> Result<(), Error> {
        check::argument(!channel.sources.is_empty(), "channel has no sources")?;
        for source in channel.sources {
            check::id(IdKind::Input, source.get(), self.inputs.len())?;
        }
        Ok(())
    }

    fn new_channel_state(&self, id: ChannelId, channel: InputChannel<'a>) -> ChannelState<'a> {
        let mut state = ChannelState::new(channel, self.config.log_depth(), self.events.len());
        if let Some(map) = self.behavior.as_ref() {
            for (slot, enabled) in state.slots.iter_mut().zip(map.row(self.mode, id)) {
                slot.enabled = *enabled;
            }
        }
        state
    }

    // ==================== INPUTS ====================

    pub fn set_input_enabled(&mut self, id: InputId, enabled: bool) -> Result<(), Error> {
        check::id(IdKind::Input, id.get(), self.inputs.len())?;
        let slot = &mut self.inputs[id.index()];
        check::argument(slot.is_some(), "input is not registered")?;
        if let Some(input) = slot {
            input.enabled = enabled;
        }
        Ok(())
    }

    /// Enable flag of the input; unregistered inputs read as disabled
    pub fn is_input_enabled(&self, id: InputId) -> Result<bool, Error> {
        check::id(IdKind::Input, id.get(), self.inputs.len())?;
        Ok(self.inputs[id.index()].is_some_and(|input| input.enabled))
    }

    /// Poll the input's source; a disabled input reads as inactive
    pub fn is_input_active(&self, id: InputId) -> Result<bool, Error> {
        check::id(IdKind::Input, id.get(), self.inputs.len())?;
        Ok(self.inputs[id.index()]
            .is_some_and(|input| input.enabled && input.source.is_active()))
    }

    // ==================== CHANNELS ====================

    /// Set the channel's enable flag
    ///
    /// This is the only way to clear a latched disable. The state log and
    /// counters are kept; use [`reset_channel`](Self::reset_channel) to drop them.
    pub fn set_channel_enabled(&mut self, id: ChannelId, enabled: bool) -> Result<(), Error> {
        check::id(IdKind::Channel, id.get(), self.channels.len())?;
        let slot = &mut self.channels[id.index()];
        check::argument(slot.is_some(), "channel is not registered")?;
        if let Some(state) = slot {
            state.enabled = enabled;
        }
        Ok(())
    }

    pub fn is_channel_enabled(&self, id: ChannelId) -> Result<bool, Error> {
        check::id(IdKind::Channel, id.get(), self.channels.len())?;
        Ok(self.channels[id.index()]
            .as_ref()
            .is_some_and(|state| state.enabled))
    }

    /// Evaluate the channel's composite level now
    ///
    /// Like a poll tick, this latches the channel disabled if any of its
    /// sources is disabled, and then reports `false`.
    pub fn is_channel_active(&mut self, id: ChannelId) -> Result<bool, Error> {
        check::id(IdKind::Channel, id.get(), self.channels.len())?;
        let Some(state) = self.channels[id.index()].as_mut() else {
            return Ok(false);
        };
        if !state.enabled {
            return Ok(false);
        }
        match sample(&self.inputs, state.channel.sources) {
            Some(active) => Ok(active),
            None => {
                state.enabled = false;
                log::warn!("{id} disabled: a source input is disabled");
                Ok(false)
            }
        }
    }

    /// Clear the channel's state log and every event counter
    pub fn reset_channel(&mut self, id: ChannelId) -> Result<(), Error> {
        check::id(IdKind::Channel, id.get(), self.channels.len())?;
        let slot = &mut self.channels[id.index()];
        check::argument(slot.is_some(), "channel is not registered")?;
        if let Some(state) = slot {
            state.reset();
        }
        Ok(())
    }

    /// The channel's level history, newest first
    pub fn state_log(&self, id: ChannelId) -> Option<&StateLog> {
        self.channels
            .get(id.index())?
            .as_ref()
            .map(|state| &state.log)
    }

    /// Level changes the channel saw since `event` last fired on it
    pub fn events_since_handled(&self, channel: ChannelId, event: EventId) -> Option<u32> {
        self.slot(channel, event).map(|slot| slot.events_since_handled)
    }

    /// Whether the current behavior mode lets `event` fire on `channel`
    pub fn is_event_enabled(&self, channel: ChannelId, event: EventId) -> Option<bool> {
        self.slot(channel, event).map(|slot| slot.enabled)
    }

    fn slot(&self, channel: ChannelId, event: EventId) -> Option<&EventSlot> {
        self.channels
            .get(channel.index())?
            .as_ref()?
            .slots
            .get(event.index())
    }

    // ==================== BEHAVIOR ====================

    /// Install the behavior matrix
    ///
    /// Resets the mode to [`Mode::NONE`] and applies that mode's row, so
    /// slot enablement always equals `map[current mode]`. Mode 0 is normally
    /// left all-disabled, which keeps every event quiet until
    /// [`set_behavior_mode`](Self::set_behavior_mode) is called.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the map's dimensions differ from
    /// the configured mode, channel and event counts.
    pub fn set_behavior_map(&mut self, map: BehaviorMap) -> Result<(), Error> {
        check::argument(
            map.modes() == self.config.modes()
                && map.channels() == self.channels.len()
                && map.events() == self.events.len(),
            "behavior map dimensions differ from the configuration",
        )?;
        self.behavior = Some(map);
        self.mode = Mode::NONE;
        self.apply_behavior_row();
        Ok(())
    }

    /// Switch every channel's event gating to `mode`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMode` for mode 0, a mode outside the map, or
    /// when no map is installed.
    pub fn set_behavior_mode(&mut self, mode: Mode) -> Result<(), Error> {
        let Some(map) = self.behavior.as_ref() else {
            return Err(Error::InvalidMode(mode));
        };
        check::mode(mode, map.modes())?;

        log::info!("behavior {} -> {}", self.mode, mode);
        self.mode = mode;
        self.apply_behavior_row();
        Ok(())
    }

    /// Current behavior mode; [`Mode::NONE`] until one is set
    pub fn behavior_mode(&self) -> Mode {
        self.mode
    }

    /// Copy `map[mode][channel]` into every registered channel's slots.
    fn apply_behavior_row(&mut self) {
        let Some(map) = self.behavior.as_ref() else {
            return;
        };
        for (index, state) in self.channels.iter_mut().enumerate() {
            let Some(state) = state else { continue };
            let row = map.row(self.mode, ChannelId::new(index as u16));
            for (slot, enabled) in state.slots.iter_mut().zip(row) {
                slot.enabled = *enabled;
            }
        }
    }

    // ==================== CONTROL ====================

    /// Apply requests posted from other execution contexts
    ///
    /// Drains at most `N` requests so a busy producer cannot stall the poll
    /// slot. Rejected requests are logged and dropped. Returns how many were
    /// applied.
    pub fn apply_controls<M: RawMutex, const N: usize>(
        &mut self,
        queue: &ControlQueue<M, N>,
    ) -> usize {
        let mut applied = 0;
        for _ in 0..N {
            let Some(control) = queue.try_pop() else {
                break;
            };
            let result = match control {
                Control::SetBehaviorMode(mode) => self.set_behavior_mode(mode),
                Control::SetInputEnabled(id, enabled) => self.set_input_enabled(id, enabled),
                Control::SetChannelEnabled(id, enabled) => self.set_channel_enabled(id, enabled),
                Control::ResetChannel(id) => self.reset_channel(id),
            };
            match result {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("control {control:?} rejected: {e}"),
            }
        }
        applied
    }

    // ==================== MATCHING ====================

    /// Run one tick of the matching procedure at time `now_ms`
    ///
    /// For every enabled channel: sample its sources, log a level change if
    /// there was one, then try every enabled event whose debounce counter has
    /// reached the pattern length. Matches are delivered to the channel's
    /// handler before this returns.
    pub fn poll(&mut self, now_ms: u32) {
        let Self {
            inputs,
            events,
            channels,
            ..
        } = self;

        for (index, slot) in channels.iter_mut().enumerate() {
            let Some(state) = slot.as_mut() else {
                continue;
            };
            if !state.enabled {
                continue;
            }
            let channel = ChannelId::new(index as u16);

            let Some(active) = sample(inputs, state.channel.sources) else {
                state.enabled = false;
                log::warn!("{channel} disabled: a source input is disabled");
                continue;
            };

            if active != state.log.newest().is_active {
                state.record_edge(now_ms, active);
                log::debug!(
                    "{channel} {} at {now_ms} ms",
                    if active { "active" } else { "inactive" }
                );
            }

            for (event_index, event_slot) in state.slots.iter_mut().enumerate() {
                if !event_slot.enabled {
                    continue;
                }
                let Some(Some(definition)) = events.get(event_index) else {
                    continue;
                };
                if (event_slot.events_since_handled as usize) < definition.len() {
                    continue;
                }
                if !definition.matches(&state.log, now_ms) {
                    continue;
                }

                event_slot.events_since_handled = 0;
                let event = SemanticEvent {
                    event: EventId::new(event_index as u16),
                    channel,
                    timestamp_ms: now_ms,
                };
                log::info!("{} on {channel} at {now_ms} ms", event.event);
                state.channel.handler.on_event(event);
            }
        }
    }
}

/// AND of the channel's sources, or `None` if any of them is disabled.
fn sample(inputs: &[Option<Input<'_>>], sources: &[InputId]) -> Option<bool> {
    let mut active = true;
    for source in sources {
        let input = inputs.get(source.index())?.as_ref()?;
        if !input.enabled {
            return None;
        }
        active &= input.source.is_active();
    }
    Some(active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::pattern::StateStep;
    use core::cell::{Cell, RefCell};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    static HOLD_40: [StateStep; 1] = [StateStep::active(40, 0)];
    static PRESS: [StateStep; 2] = [StateStep::inactive(0, 0), StateStep::active(0, 0)];
    static ONLY_A: [InputId; 1] = [InputId::new(0)];
    static A_AND_B: [InputId; 2] = [InputId::new(0), InputId::new(1)];

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<SemanticEvent>>,
    }

    impl EventHandler for Recorder {
        fn on_event(&self, event: SemanticEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    impl Recorder {
        fn ids(&self) -> Vec<(u16, u32)> {
            self.events
                .borrow()
                .iter()
                .map(|e| (e.event.get(), e.timestamp_ms))
                .collect()
        }
    }

    fn config(inputs: usize, channels: usize, events: usize, modes: usize) -> Config {
        Builder::new()
            .inputs(inputs)
            .channels(channels)
            .events(events)
            .modes(modes)
            .log_depth(4)
            .build()
            .unwrap()
    }

    fn enable_everything(engine: &mut Engine<'_>) {
        let cfg = *engine.config();
        let mut map = BehaviorMap::new(cfg.modes(), cfg.channels(), cfg.events());
        map.enable_all(Mode::new(1));
        engine.set_behavior_map(map).unwrap();
        engine.set_behavior_mode(Mode::new(1)).unwrap();
    }

    #[test]
    fn nothing_fires_before_a_mode_is_selected() {
        let a = Cell::new(true);
        let recorder = Recorder::default();
        let mut engine = Engine::new(config(1, 1, 1, 2));
        engine.add_input(InputId::new(0), Input::new(&a)).unwrap();
        engine
            .add_event_definition(EventId::new(0), EventDefinition::new(&HOLD_40))
            .unwrap();
        engine
            .add_input_channel(ChannelId::new(0), InputChannel::new(&ONLY_A, &recorder))
            .unwrap();

        for now in (0..200).step_by(10) {
            engine.poll(now);
        }
        assert!(recorder.ids().is_empty());
        assert_eq!(engine.behavior_mode(), Mode::NONE);
    }

    #[test]
    fn channel_level_is_and_of_sources() {
        let a = Cell::new(true);
        let b = Cell::new(false);
        let recorder = Recorder::default();
        let mut engine = Engine::new(config(2, 1, 1, 2));
        engine.add_inputs(&[Input::new(&a), Input::new(&b)]).unwrap();
        engine
            .add_input_channel(ChannelId::new(0), InputChannel::new(&A_AND_B, &recorder))
            .unwrap();

        assert_eq!(engine.is_channel_active(ChannelId::new(0)), Ok(false));
        b.set(true);
        assert_eq!(engine.is_channel_active(ChannelId::new(0)), Ok(true));
        engine.poll(10);
        assert_eq!(
            engine.state_log(ChannelId::new(0)).unwrap().newest().timestamp_ms,
            10
        );
    }

    #[test]
    fn disabled_source_latches_channel_off() {
        let a = Cell::new(true);
        let b = Cell::new(true);
        let recorder = Recorder::default();
        let mut engine = Engine::new(config(2, 1, 1, 2));
        engine.add_inputs(&[Input::new(&a), Input::new(&b)]).unwrap();
        engine
            .add_input_channel(ChannelId::new(0), InputChannel::new(&A_AND_B, &recorder))
            .unwrap();

        engine.set_input_enabled(InputId::new(1), false).unwrap();
        engine.poll(10);
        assert_eq!(engine.is_channel_enabled(ChannelId::new(0)), Ok(false));

        // re-enabling the source alone does not clear the latch
        engine.set_input_enabled(InputId::new(1), true).unwrap();
        engine.poll(20);
        assert_eq!(engine.is_channel_enabled(ChannelId::new(0)), Ok(false));
        assert_eq!(engine.is_channel_active(ChannelId::new(0)), Ok(false));

        engine.set_channel_enabled(ChannelId::new(0), true).unwrap();
        assert_eq!(engine.is_channel_active(ChannelId::new(0)), Ok(true));
    }

    #[test]
    fn counters_gate_matching_and_reset_on_fire() {
        let a = Cell::new(false);
        let recorder = Recorder::default();
        let mut engine = Engine::new(config(1, 1, 2, 2));
        engine.add_input(InputId::new(0), Input::new(&a)).unwrap();
        engine
            .add_event_definitions(&[EventDefinition::new(&PRESS), EventDefinition::new(&HOLD_40)])
            .unwrap();
        engine
            .add_input_channel(ChannelId::new(0), InputChannel::new(&ONLY_A, &recorder))
            .unwrap();
        enable_everything(&mut engine);

        let ch = ChannelId::new(0);
        engine.poll(0);
        assert_eq!(engine.events_since_handled(ch, EventId::new(0)), Some(0));

        a.set(true);
        engine.poll(10);
        // one edge is not enough for the two-step press
        assert_eq!(engine.events_since_handled(ch, EventId::new(0)), Some(1));
        assert!(recorder.ids().is_empty());

        engine.poll(50);
        assert_eq!(recorder.ids(), vec![(1, 50)]);
        assert_eq!(engine.events_since_handled(ch, EventId::new(1)), Some(0));
        assert_eq!(engine.events_since_handled(ch, EventId::new(0)), Some(1));

        a.set(false);
        engine.poll(60);
        a.set(true);
        engine.poll(70);
        assert_eq!(recorder.ids(), vec![(1, 50), (0, 70)]);
        assert_eq!(engine.events_since_handled(ch, EventId::new(0)), Some(0));
        assert_eq!(engine.events_since_handled(ch, EventId::new(1)), Some(2));
    }

    #[test]
    fn mode_switch_copies_whole_matrix() {
        let a = Cell::new(false);
        let recorder = Recorder::default();
        let mut engine = Engine::new(config(1, 2, 3, 3));
        engine.add_input(InputId::new(0), Input::new(&a)).unwrap();
        engine
            .add_input_channels(&[
                InputChannel::new(&ONLY_A, &recorder),
                InputChannel::new(&ONLY_A, &recorder),
            ])
            .unwrap();

        let map = BehaviorMap::from_array(&[
            [[false; 3]; 2],
            [[true, false, true], [false, false, true]],
            [[false, true, false], [true, true, false]],
        ]);
        engine.set_behavior_map(map.clone()).unwrap();

        for mode in [Mode::new(1), Mode::new(2), Mode::new(1)] {
            engine.set_behavior_mode(mode).unwrap();
            for c in 0..2 {
                for e in 0..3 {
                    let (c, e) = (ChannelId::new(c), EventId::new(e));
                    assert_eq!(engine.is_event_enabled(c, e), Some(map.get(mode, c, e)));
                }
            }
        }

        engine.set_behavior_map(map).unwrap();
        assert_eq!(engine.behavior_mode(), Mode::NONE);
        assert_eq!(engine.is_event_enabled(ChannelId::new(1), EventId::new(0)), Some(false));
    }

    #[test]
    fn channel_registered_after_mode_picks_up_gating() {
        let a = Cell::new(false);
        let recorder = Recorder::default();
        let mut engine = Engine::new(config(1, 1, 2, 2));
        engine.add_input(InputId::new(0), Input::new(&a)).unwrap();
        let mut map = BehaviorMap::new(2, 1, 2);
        map.set(Mode::new(1), ChannelId::new(0), EventId::new(1), true);
        engine.set_behavior_map(map).unwrap();
        engine.set_behavior_mode(Mode::new(1)).unwrap();

        engine
            .add_input_channel(ChannelId::new(0), InputChannel::new(&ONLY_A, &recorder))
            .unwrap();
        assert_eq!(engine.is_event_enabled(ChannelId::new(0), EventId::new(0)), Some(false));
        assert_eq!(engine.is_event_enabled(ChannelId::new(0), EventId::new(1)), Some(true));
    }

    #[test]
    fn no_map_means_no_mode() {
        let mut engine = Engine::new(config(1, 1, 1, 2));
        assert_eq!(
            engine.set_behavior_mode(Mode::new(1)),
            Err(Error::InvalidMode(Mode::new(1)))
        );
    }

    #[test]
    fn controls_apply_from_queue() {
        let a = Cell::new(true);
        let recorder = Recorder::default();
        let queue: ControlQueue<NoopRawMutex, 4> = ControlQueue::new();
        let mut engine = Engine::new(config(1, 1, 1, 2));
        engine.add_input(InputId::new(0), Input::new(&a)).unwrap();
        engine
            .add_event_definition(EventId::new(0), EventDefinition::new(&HOLD_40))
            .unwrap();
        engine
            .add_input_channel(ChannelId::new(0), InputChannel::new(&ONLY_A, &recorder))
            .unwrap();
        let mut map = BehaviorMap::new(2, 1, 1);
        map.enable_all(Mode::new(1));
        engine.set_behavior_map(map).unwrap();

        queue.try_push(Control::SetBehaviorMode(Mode::new(1))).unwrap();
        queue
            .try_push(Control::SetInputEnabled(InputId::new(0), false))
            .unwrap();
        queue
            .try_push(Control::SetInputEnabled(InputId::new(0), true))
            .unwrap();
        assert_eq!(engine.apply_controls(&queue), 3);
        assert!(queue.is_empty());
        assert_eq!(engine.behavior_mode(), Mode::new(1));

        engine.poll(0);
        engine.poll(40);
        assert_eq!(recorder.ids(), vec![(0, 40)]);

        queue.try_push(Control::ResetChannel(ChannelId::new(0))).unwrap();
        assert_eq!(engine.apply_controls(&queue), 1);
        assert_eq!(engine.events_since_handled(ChannelId::new(0), EventId::new(0)), Some(0));
        assert_eq!(
            engine.state_log(ChannelId::new(0)).unwrap().newest(),
            Default::default()
        );
    }

    #[test]
    fn installing_a_map_applies_its_mode_zero_row() {
        let a = Cell::new(false);
        let recorder = Recorder::default();
        let mut engine = Engine::new(config(1, 2, 2, 2));
        engine.add_input(InputId::new(0), Input::new(&a)).unwrap();
        engine
            .add_input_channel(ChannelId::new(0), InputChannel::new(&ONLY_A, &recorder))
            .unwrap();
        let map = BehaviorMap::from_array(&[
            [[true, false], [false, true]],
            [[false, false], [true, true]],
        ]);
        engine.set_behavior_map(map.clone()).unwrap();
        engine
            .add_input_channel(ChannelId::new(1), InputChannel::new(&ONLY_A, &recorder))
            .unwrap();

        for mode in [Mode::NONE, Mode::new(1)] {
            if !mode.is_none() {
                engine.set_behavior_mode(mode).unwrap();
            }
            for c in 0..2 {
                for e in 0..2 {
                    let (c, e) = (ChannelId::new(c), EventId::new(e));
                    assert_eq!(engine.is_event_enabled(c, e), Some(map.get(mode, c, e)));
                }
            }
        }
    }

    #[cfg(not(feature = "checked"))]
    mod unchecked {
        use super::*;

        #[test]
        fn bulk_registration_keeps_the_entries_that_fit() {
            let a = Cell::new(true);
            let recorder = Recorder::default();
            let mut engine = Engine::new(config(2, 1, 1, 2));

            assert_eq!(
                engine.add_inputs(&[Input::new(&a), Input::new(&a), Input::new(&a)]),
                Ok(())
            );
            assert_eq!(engine.is_input_enabled(InputId::new(1)), Ok(true));

            let hold = EventDefinition::new(&HOLD_40);
            assert_eq!(engine.add_event_definitions(&[hold, hold]), Ok(()));

            let channel = InputChannel::new(&ONLY_A, &recorder);
            assert_eq!(engine.add_input_channels(&[channel, channel]), Ok(()));
            assert_eq!(engine.is_channel_enabled(ChannelId::new(0)), Ok(true));
            assert!(engine.state_log(ChannelId::new(1)).is_none());
        }
    }

    #[cfg(feature = "checked")]
    mod checked {
        use super::*;

        #[test]
        fn ids_outside_capacity_are_rejected() {
            let a = Cell::new(false);
            let recorder = Recorder::default();
            let mut engine = Engine::new(config(1, 1, 1, 2));
            assert_eq!(
                engine.add_input(InputId::new(1), Input::new(&a)),
                Err(Error::InvalidId {
                    kind: IdKind::Input,
                    id: 1,
                    capacity: 1
                })
            );
            assert_eq!(
                engine.add_input_channel(ChannelId::new(0), InputChannel::new(&A_AND_B, &recorder)),
                Err(Error::InvalidId {
                    kind: IdKind::Input,
                    id: 1,
                    capacity: 1
                })
            );
            assert!(matches!(
                engine.is_channel_enabled(ChannelId::new(3)),
                Err(Error::InvalidId {
                    kind: IdKind::Channel,
                    ..
                })
            ));
        }

        #[test]
        fn malformed_registrations_are_rejected() {
            static EMPTY_STEPS: [StateStep; 0] = [];
            static BACKWARDS: [StateStep; 1] = [StateStep::active(100, 50)];
            static TOO_LONG: [StateStep; 5] = [StateStep::active(0, 0); 5];
            static NO_SOURCES: [InputId; 0] = [];
            let recorder = Recorder::default();
            let mut engine = Engine::new(config(1, 1, 1, 2));

            for steps in [&EMPTY_STEPS[..], &BACKWARDS[..], &TOO_LONG[..]] {
                assert!(matches!(
                    engine.add_event_definition(EventId::new(0), EventDefinition::new(steps)),
                    Err(Error::InvalidArgument(_))
                ));
            }
            assert!(matches!(
                engine.add_input_channel(ChannelId::new(0), InputChannel::new(&NO_SOURCES, &recorder)),
                Err(Error::InvalidArgument(_))
            ));
            assert!(matches!(
                engine.set_input_enabled(InputId::new(0), true),
                Err(Error::InvalidArgument(_))
            ));
        }

        #[test]
        fn bulk_registration_over_capacity_registers_nothing() {
            let a = Cell::new(false);
            let mut engine = Engine::new(config(2, 1, 1, 2));
            assert_eq!(
                engine.add_inputs(&[Input::new(&a), Input::new(&a), Input::new(&a)]),
                Err(Error::CapacityExceeded {
                    requested: 3,
                    capacity: 2
                })
            );
            assert_eq!(engine.is_input_enabled(InputId::new(0)), Ok(false));
        }

        #[test]
        fn reserved_and_unknown_modes_are_rejected() {
            let mut engine = Engine::new(config(1, 1, 1, 3));
            engine.set_behavior_map(BehaviorMap::new(3, 1, 1)).unwrap();
            assert_eq!(
                engine.set_behavior_mode(Mode::NONE),
                Err(Error::InvalidMode(Mode::NONE))
            );
            assert_eq!(
                engine.set_behavior_mode(Mode::new(3)),
                Err(Error::InvalidMode(Mode::new(3)))
            );
            assert!(engine.set_behavior_mode(Mode::new(2)).is_ok());
        }

        #[test]
        fn behavior_map_must_match_configuration() {
            let mut engine = Engine::new(config(1, 2, 2, 2));
            assert!(matches!(
                engine.set_behavior_map(BehaviorMap::new(2, 1, 2)),
                Err(Error::InvalidArgument(_))
            ));
        }
    }
}
