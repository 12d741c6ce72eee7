//! Flight computer: the per-processor command scheduler.
//!
//! `FlightComputer` owns the command buffer, the maneuver queue, the control
//! frame delay line, and the current command. The host calls into it at
//! fixed points of each tick, in this order:
//!
//! 1. `fly_by_wire_pre` records and replays pilot input.
//! 2. `on_update` drains due commands into the current command.
//! 3. `fly_by_wire_post` runs the autopilot and sanctioned pilots.
//!
//! `on_fixed_update` picks up target and maneuver changes made in the
//! simulation and handles the processor moving to another vessel.

use std::fmt;

use glam::DVec3;
use tracing::{debug, info, warn};

use uplink_core::commands::DelayedCommand;
use uplink_core::config::FlightComputerSettings;
use uplink_core::ctrl_state::{DelayedFlightCtrlState, FlightCtrlState};
use uplink_core::status::ComputerStatus;
use uplink_core::types::{ProcessorId, TargetRef, VesselId};

use crate::command_buffer::CommandBuffer;
use crate::current::CurrentCommand;
use crate::priority_queue::PriorityQueue;
use crate::services::{
    Clock, FlightHost, Network, SignalProcessor, VesselControl, VesselQuery,
};
use crate::systems::autopilot::{self, HoldReferences};
use crate::systems::{delay_line, dispatch, sync, time_warp};

/// Auxiliary controller invoked with the final control frame each tick.
pub type SanctionedPilot = Box<dyn FnMut(&mut FlightCtrlState)>;

/// Registration handle returned by `add_sanctioned_pilot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PilotHandle(u64);

/// One entry of `FlightComputer::iter`.
#[derive(Debug, Clone, Copy)]
pub enum ComputerEntry<'a> {
    Current(&'a CurrentCommand),
    Pending(&'a DelayedCommand),
}

pub struct FlightComputer {
    processor: ProcessorId,
    vessel: VesselId,
    settings: FlightComputerSettings,
    current: CurrentCommand,
    previous_fcs: FlightCtrlState,
    command_buffer: CommandBuffer,
    flight_ctrl_buffer: PriorityQueue<DelayedFlightCtrlState>,
    maneuver_buffer: PriorityQueue<DelayedCommand>,
    refs: HoldReferences,
    pilots: Vec<(PilotHandle, SanctionedPilot)>,
    next_pilot: u64,
    disposed: bool,
}

impl FlightComputer {
    pub fn new(processor: ProcessorId, vessel: VesselId, settings: FlightComputerSettings) -> Self {
        info!(processor = processor.0, vessel = vessel.0, "flight computer created");
        Self {
            processor,
            vessel,
            settings,
            current: CurrentCommand::new(),
            previous_fcs: FlightCtrlState::default(),
            command_buffer: CommandBuffer::new(),
            flight_ctrl_buffer: PriorityQueue::new(),
            maneuver_buffer: PriorityQueue::new(),
            refs: HoldReferences::default(),
            pilots: Vec::new(),
            next_pilot: 0,
            disposed: false,
        }
    }

    /// Seed the previous-frame record with the vessel's control state.
    pub fn with_initial_frame(mut self, fcs: FlightCtrlState) -> Self {
        self.previous_fcs = fcs;
        self
    }

    pub fn processor(&self) -> ProcessorId {
        self.processor
    }

    pub fn vessel(&self) -> VesselId {
        self.vessel
    }

    pub fn settings(&self) -> &FlightComputerSettings {
        &self.settings
    }

    pub fn total_delay(&self) -> f64 {
        self.settings.total_delay
    }

    pub fn set_total_delay(&mut self, total_delay: f64) {
        self.settings.total_delay = total_delay.max(0.0);
    }

    pub fn current_command(&self) -> &CurrentCommand {
        &self.current
    }

    /// Last control frame seen by the pre-hook.
    pub fn previous_frame(&self) -> &FlightCtrlState {
        &self.previous_fcs
    }

    pub fn pending(&self) -> impl Iterator<Item = &DelayedCommand> {
        self.command_buffer.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.command_buffer.len()
    }

    pub fn queued_maneuvers(&self) -> usize {
        self.maneuver_buffer.len()
    }

    pub fn queued_frames(&self) -> usize {
        self.flight_ctrl_buffer.len()
    }

    /// The current command first, then every pending command in order.
    pub fn iter(&self) -> impl Iterator<Item = ComputerEntry<'_>> {
        std::iter::once(ComputerEntry::Current(&self.current))
            .chain(self.command_buffer.iter().map(ComputerEntry::Pending))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // --- Link state ---

    /// Commands are accepted with local control, or when powered and linked.
    pub fn input_allowed<H: Network + SignalProcessor>(&self, host: &H) -> bool {
        let link = host.link_status(self.processor);
        link.local_control || (host.powered(self.processor) && link.connected())
    }

    pub fn delay<H: Network>(&self, host: &H) -> f64 {
        host.link_status(self.processor).delay()
    }

    pub fn status<H: Network + SignalProcessor + VesselQuery>(&self, host: &H) -> ComputerStatus {
        let mut status = ComputerStatus::NORMAL;
        if !host.powered(self.processor) {
            status |= ComputerStatus::OUT_OF_POWER;
        }
        if !host.is_master(self.processor) {
            status |= ComputerStatus::NOT_MASTER;
        }
        if !host.link_status(self.processor).connected() {
            status |= ComputerStatus::NO_CONNECTION;
        }
        if host.vessel(self.vessel).is_none_or(|v| v.packed) {
            status |= ComputerStatus::PACKED;
        }
        status
    }

    /// Current maneuver burn vector, or the orbital prograde direction.
    pub fn maneuver_vector<H: VesselQuery>(&self, host: &H) -> DVec3 {
        match &self.current.maneuver {
            Some(maneuver) => host.burn_vector(self.vessel, &maneuver.node),
            None => host
                .vessel(self.vessel)
                .map_or(DVec3::ZERO, |v| v.orbital_velocity.normalize_or_zero()),
        }
    }

    /// Current target, or the vessel's main body.
    pub fn target<H: VesselQuery>(&self, host: &H) -> Option<TargetRef> {
        self.current
            .target
            .and_then(|t| t.target)
            .or_else(|| {
                host.vessel(self.vessel)
                    .map(|v| TargetRef::Body { id: v.main_body })
            })
    }

    // --- Commands ---

    /// Delay and buffer a command. Returns whether it was accepted.
    pub fn enqueue<H>(&mut self, mut command: DelayedCommand, host: &H) -> bool
    where
        H: Network + SignalProcessor + VesselQuery,
    {
        if self.disposed {
            return false;
        }
        if !self.input_allowed(host) {
            debug!(command = %command.id, "command dropped: input not allowed");
            return false;
        }
        if host.vessel(self.vessel).is_none_or(|v| v.packed) {
            debug!(command = %command.id, "command dropped: vessel packed");
            return false;
        }
        if let Some(limit) = self.settings.max_pending_commands {
            if self.command_buffer.len() >= limit {
                warn!(command = %command.id, limit, "command dropped: buffer full");
                return false;
            }
        }

        let delay = self.delay(host);
        command.time_stamp += delay;
        if command.is_plain() {
            command.extra_delay += (self.settings.total_delay - delay).max(0.0);
        }
        debug!(
            command = %command.id,
            time_stamp = command.time_stamp,
            extra_delay = command.extra_delay,
            "command enqueued"
        );
        self.command_buffer.insert(command);
        true
    }

    /// Dispatch due commands. Returns the commands executed this tick.
    pub fn on_update<H: FlightHost>(&mut self, host: &mut H) -> Vec<DelayedCommand> {
        if self.disposed || !host.is_master(self.processor) {
            return Vec::new();
        }
        self.sync_vessel(host);

        let Some(vessel) = host.vessel(self.vessel) else {
            warn!(vessel = self.vessel.0, "vessel unavailable, skipping dispatch");
            return Vec::new();
        };
        let now = host.game_time();

        dispatch::drain_maneuvers(&mut self.maneuver_buffer, &mut self.current, now);

        if self.command_buffer.is_empty() {
            return Vec::new();
        }
        time_warp::run(
            &self.command_buffer,
            now,
            self.settings.throttle_time_warp,
            host,
        );
        dispatch::run(
            &mut self.command_buffer,
            &mut self.current,
            &mut self.refs,
            self.processor,
            &vessel,
            now,
            host,
        )
    }

    /// Follow target and maneuver changes made in the simulation.
    pub fn on_fixed_update<H: FlightHost>(&mut self, host: &mut H) {
        if self.disposed {
            return;
        }
        self.sync_vessel(host);
        let now = host.game_time();

        let active = host.active_target();
        if sync::target_update_needed(&self.current, &self.command_buffer, active) {
            self.enqueue(DelayedCommand::target(now, active), &*host);
        }

        let nodes = host.maneuver_nodes(self.vessel);
        if let Some(node) = sync::maneuver_update(&self.current, &self.maneuver_buffer, &nodes) {
            let mut command = DelayedCommand::maneuver(now, node);
            command.time_stamp += self.delay(&*host);
            debug!(command = %command.id, due = command.time_stamp, "maneuver node queued");
            self.maneuver_buffer.enqueue(command);
        }
    }

    /// Adopt the processor's new vessel if it changed. Returns whether a
    /// switch happened.
    fn sync_vessel<H>(&mut self, host: &mut H) -> bool
    where
        H: SignalProcessor + VesselQuery + VesselControl,
    {
        let Some(vessel) = host.processor_vessel(self.processor) else {
            return false;
        };
        if vessel == self.vessel {
            return false;
        }

        if let Some(old) = host.vessel(self.vessel) {
            host.lock_heading(self.vessel, old.rotation);
        }
        self.current.maneuver = None;
        self.command_buffer.retain(|dc| dc.maneuver_command().is_none());
        self.maneuver_buffer.clear();
        self.pilots.clear();
        info!(
            processor = self.processor.0,
            from = self.vessel.0,
            to = vessel.0,
            "controlled vessel changed"
        );
        self.vessel = vessel;
        true
    }

    // --- Control frames ---

    /// Record live input into the delay line and replace it with the
    /// delayed frame due now.
    pub fn fly_by_wire_pre<H>(&mut self, fcs: &mut FlightCtrlState, host: &H)
    where
        H: Clock + Network + SignalProcessor + VesselQuery,
    {
        if self.disposed || !host.is_master(self.processor) {
            return;
        }
        let local = host.link_status(self.processor).local_control;
        let now = host.game_time();

        if host.active_vessel() == Some(self.vessel) && self.input_allowed(host) && !local {
            let delay = self.delay(host);
            delay_line::record(&mut self.flight_ctrl_buffer, fcs, now, delay);
        }
        if !local {
            *fcs = delay_line::replay(&mut self.flight_ctrl_buffer, now);
        }
        self.previous_fcs = *fcs;
    }

    /// Neutralize disallowed input, then run the autopilot and every
    /// sanctioned pilot in registration order.
    pub fn fly_by_wire_post<H: FlightHost>(&mut self, fcs: &mut FlightCtrlState, host: &mut H) {
        if self.disposed || !host.is_master(self.processor) {
            return;
        }
        if !self.input_allowed(&*host) {
            fcs.neutralize();
        }
        if let Some(vessel) = host.vessel(self.vessel) {
            autopilot::run(fcs, &mut self.current, &mut self.refs, &vessel, host);
        }
        for (_, pilot) in self.pilots.iter_mut() {
            pilot(&mut *fcs);
        }
    }

    /// Both control-frame hooks back to back.
    pub fn fly_by_wire<H: FlightHost>(&mut self, fcs: &mut FlightCtrlState, host: &mut H) {
        self.fly_by_wire_pre(fcs, &*host);
        self.fly_by_wire_post(fcs, host);
    }

    // --- Sanctioned pilots ---

    pub fn add_sanctioned_pilot(&mut self, pilot: SanctionedPilot) -> PilotHandle {
        let handle = PilotHandle(self.next_pilot);
        self.next_pilot += 1;
        self.pilots.push((handle, pilot));
        handle
    }

    pub fn remove_sanctioned_pilot(&mut self, handle: PilotHandle) -> bool {
        let before = self.pilots.len();
        self.pilots.retain(|(h, _)| *h != handle);
        self.pilots.len() != before
    }

    pub fn clear_sanctioned_pilots(&mut self) {
        self.pilots.clear();
    }

    pub fn sanctioned_pilots(&self) -> usize {
        self.pilots.len()
    }

    /// Deregister from the host. A disposed computer ignores every hook.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        info!(processor = self.processor.0, "flight computer disposed");
        self.pilots.clear();
        self.disposed = true;
    }
}

impl fmt::Debug for FlightComputer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlightComputer")
            .field("processor", &self.processor)
            .field("vessel", &self.vessel)
            .field("current", &self.current)
            .field("pending", &self.command_buffer.len())
            .field("maneuvers", &self.maneuver_buffer.len())
            .field("frames", &self.flight_ctrl_buffer.len())
            .field("pilots", &self.pilots.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
