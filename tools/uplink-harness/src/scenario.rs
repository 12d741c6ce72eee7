//! Scripted flight over a delayed link.
//!
//! The primary vessel is ordered to hold prograde, burn, stage, and select
//! the station as its target. A maneuver node planned mid-flight reaches the
//! computer through fixed-update synchronization. A short link outage
//! rejects one command, and the attitude hold is cancelled near the end.

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec3;
use serde::Serialize;
use tracing::{info, warn};

use uplink_core::commands::{AttitudeCommand, BurnCommand, DelayedCommand, ManeuverNode};
use uplink_core::ctrl_state::FlightCtrlState;
use uplink_core::enums::{ActionGroup, FlightAttitude, ReferenceFrame};
use uplink_core::error::UplinkError;
use uplink_core::types::{ProcessorId, TargetRef, VesselId};
use uplink_sim::current::CurrentCommand;
use uplink_sim::services::Clock;
use uplink_sim::FlightComputer;

use crate::world::{HarnessHost, VesselReport};

pub const PRIMARY: VesselId = VesselId(1);
pub const STATION: VesselId = VesselId(2);
pub const PROCESSOR: ProcessorId = ProcessorId(1);

const PRIMARY_ALTITUDE: f64 = 80_000.0;
const STATION_ALTITUDE: f64 = 100_000.0;

#[derive(Debug, Serialize)]
pub struct ExecutedEntry {
    pub tick: u64,
    pub time: f64,
    pub command: DelayedCommand,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub ticks: u64,
    pub final_time: f64,
    pub warp_rate: f64,
    pub status: String,
    pub pending: usize,
    pub rejected: usize,
    pub current: CurrentCommand,
    pub executed: Vec<ExecutedEntry>,
    pub notifications: usize,
    pub stages_fired: u32,
    pub action_groups: Vec<ActionGroup>,
    pub events_invoked: usize,
    pub sas: bool,
    pub rcs_locked: bool,
    pub pilot_frames: u64,
    pub fleet: Vec<VesselReport>,
}

/// Spawn the primary vessel, the station, and the primary's processor.
pub fn build_world(seed: u64, delay: f64, warp_index: usize) -> Result<HarnessHost, UplinkError> {
    let mut host = HarnessHost::new(seed, warp_index);
    host.spawn_vessel(PRIMARY, PRIMARY_ALTITUDE, 0.0);
    host.spawn_vessel(STATION, STATION_ALTITUDE, 0.01);
    host.spawn_processor(PROCESSOR, PRIMARY, delay)?;
    Ok(host)
}

/// Commands the script issues at `tick`.
fn scripted(tick: u64, now: f64, fc: &FlightComputer) -> Vec<DelayedCommand> {
    match tick {
        10 => vec![DelayedCommand::attitude(
            now,
            AttitudeCommand::with_attitude(FlightAttitude::Prograde, ReferenceFrame::Orbit),
        )],
        100 => vec![DelayedCommand::burn(now, BurnCommand::with_duration(1.0, 3.0))],
        250 => vec![DelayedCommand::action_group(now, ActionGroup::Stage)],
        280 => vec![DelayedCommand::target(
            now,
            Some(TargetRef::Vessel { id: STATION }),
        )],
        420 => {
            let current = fc.current_command();
            vec![DelayedCommand::cancel_id(now, current.attitude_id.unwrap_or(current.id))]
        }
        530 => vec![DelayedCommand::action_group(now, ActionGroup::Light)],
        _ => Vec::new(),
    }
}

/// Run `ticks` ticks of the script. The per-tick order is pre-hook,
/// dispatch, post-hook, then fixed update.
pub fn run(fc: &mut FlightComputer, host: &mut HarnessHost, ticks: u64) -> anyhow::Result<Summary> {
    let pilot_frames = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&pilot_frames);
    fc.add_sanctioned_pilot(Box::new(move |_fcs: &mut FlightCtrlState| {
        counter.set(counter.get() + 1)
    }));

    let mut executed = Vec::new();
    let mut rejected = 0;

    for tick in 0..ticks {
        host.begin_tick();
        let now = host.game_time();

        match tick {
            200 => host.add_maneuver_node(
                PRIMARY,
                ManeuverNode {
                    ut: now + 600.0,
                    delta_v: DVec3::new(0.0, 120.0, 0.0),
                },
            )?,
            // The pilot selects the station in the simulation as well, so
            // target synchronization has nothing to undo.
            280 => host.set_active_target(Some(TargetRef::Vessel { id: STATION })),
            520 => host.set_connected(PROCESSOR, false)?,
            560 => host.set_connected(PROCESSOR, true)?,
            _ => {}
        }

        for command in scripted(tick, now, fc) {
            if !fc.enqueue(command, &*host) {
                warn!(tick, "scripted command rejected");
                rejected += 1;
            }
        }

        // Light roll input while the attitude hold is on its way.
        let mut fcs = FlightCtrlState {
            roll: if (20..60).contains(&tick) { 0.1 } else { 0.0 },
            ..Default::default()
        };
        fc.fly_by_wire_pre(&mut fcs, &*host);
        for command in fc.on_update(host) {
            executed.push(ExecutedEntry {
                tick,
                time: now,
                command,
            });
        }
        fc.fly_by_wire_post(&mut fcs, host);
        fc.on_fixed_update(host);

        host.integrate(fc.vessel(), &fcs)?;
    }

    let time = host.time();
    let controls = host.controls(fc.vessel())?;
    info!(
        ticks = time.tick,
        time = time.elapsed_secs,
        executed = executed.len(),
        rejected,
        "scenario finished"
    );

    Ok(Summary {
        ticks: time.tick,
        final_time: time.elapsed_secs,
        warp_rate: host.warp_rate(),
        status: fc.status(&*host).to_string(),
        pending: fc.pending_len(),
        rejected,
        current: fc.current_command().clone(),
        executed,
        notifications: host.notifications().len(),
        stages_fired: controls.stages_fired,
        action_groups: controls.toggled,
        events_invoked: controls.events.len(),
        sas: controls.sas,
        rcs_locked: host.rcs_locked(),
        pilot_frames: pilot_frames.get(),
        fleet: host.fleet(),
    })
}
