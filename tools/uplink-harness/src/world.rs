//! Harness host: one planet, a handful of vessels, and the processors
//! that command them. Vessels and processors are `hecs` entities with
//! plain-data components; the host trait impls read and write them.

use std::collections::HashMap;

use glam::{DQuat, DVec3};
use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use uplink_core::commands::{EventRef, ManeuverNode};
use uplink_core::ctrl_state::FlightCtrlState;
use uplink_core::enums::ActionGroup;
use uplink_core::error::UplinkError;
use uplink_core::events::Notification;
use uplink_core::state::{LinkStatus, TargetSnapshot, VesselSnapshot};
use uplink_core::types::{BodyId, ProcessorId, SimTime, TargetRef, VesselId};
use uplink_sim::services::{
    Clock, Network, Notifier, SignalProcessor, SteeringSolver, TimeWarp, VesselControl,
    VesselQuery,
};

pub const BODY: BodyId = BodyId(1);
pub const BODY_RADIUS: f64 = 600_000.0;
const BODY_GM: f64 = 3.5316e12;
/// Sidereal rotation rate (rad/s).
const BODY_SPIN: f64 = std::f64::consts::TAU / 21_549.425;

const FIXED_DT: f64 = 0.02;
const WARP_RATES: [f64; 8] = [1.0, 5.0, 10.0, 50.0, 100.0, 1_000.0, 10_000.0, 100_000.0];
/// Acceleration at full throttle (m/s²).
const MAX_ACCEL: f64 = 15.0;
/// Turn rate at full control deflection (rad/s).
const MAX_TURN_RATE: f64 = 0.5;
/// Relative link delay jitter drawn each tick.
const DELAY_JITTER: f64 = 0.05;

// ---- Components ----

#[derive(Debug, Clone)]
pub struct Vessel {
    pub id: VesselId,
    pub packed: bool,
    pub nodes: Vec<ManeuverNode>,
}

#[derive(Debug, Clone, Copy)]
pub struct Kinematics {
    pub position: DVec3,
    pub velocity: DVec3,
    pub rotation: DQuat,
}

#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub sas: bool,
    pub stages_fired: u32,
    pub toggled: Vec<ActionGroup>,
    pub events: Vec<EventRef>,
}

#[derive(Debug, Clone, Copy)]
pub struct Processor {
    pub vessel: VesselId,
    pub powered: bool,
    pub master: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub base_delay: f64,
    pub current_delay: f64,
    pub connected: bool,
    pub local_control: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VesselReport {
    pub id: VesselId,
    pub altitude: f64,
    pub speed: f64,
}

// ---- Host ----

pub struct HarnessHost {
    world: World,
    vessels: HashMap<VesselId, Entity>,
    processors: HashMap<ProcessorId, Entity>,
    rng: ChaCha8Rng,
    time: SimTime,
    warp_index: usize,
    active_vessel: Option<VesselId>,
    active_target: Option<TargetRef>,
    stage_locked: bool,
    rcs_locked: bool,
    notifications: Vec<Notification>,
}

impl HarnessHost {
    pub fn new(seed: u64, warp_index: usize) -> Self {
        Self {
            world: World::new(),
            vessels: HashMap::new(),
            processors: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            time: SimTime::default(),
            warp_index: warp_index.min(WARP_RATES.len() - 1),
            active_vessel: None,
            active_target: None,
            stage_locked: false,
            rcs_locked: false,
            notifications: Vec::new(),
        }
    }

    /// Spawn a vessel on a circular equatorial orbit at `phase` radians.
    pub fn spawn_vessel(&mut self, id: VesselId, altitude: f64, phase: f64) -> Entity {
        let radius = BODY_RADIUS + altitude;
        let speed = (BODY_GM / radius).sqrt();
        let (sin, cos) = phase.sin_cos();
        let entity = self.world.spawn((
            Vessel {
                id,
                packed: false,
                nodes: Vec::new(),
            },
            Kinematics {
                position: DVec3::new(cos, sin, 0.0) * radius,
                velocity: DVec3::new(-sin, cos, 0.0) * speed,
                rotation: DQuat::IDENTITY,
            },
            Controls::default(),
        ));
        self.vessels.insert(id, entity);
        if self.active_vessel.is_none() {
            self.active_vessel = Some(id);
        }
        entity
    }

    pub fn spawn_processor(
        &mut self,
        id: ProcessorId,
        vessel: VesselId,
        base_delay: f64,
    ) -> Result<Entity, UplinkError> {
        if !self.vessels.contains_key(&vessel) {
            return Err(UplinkError::VesselUnavailable(vessel));
        }
        let entity = self.world.spawn((
            Processor {
                vessel,
                powered: true,
                master: true,
            },
            Link {
                base_delay,
                current_delay: base_delay,
                connected: true,
                local_control: base_delay <= 0.0,
            },
        ));
        self.processors.insert(id, entity);
        Ok(entity)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn warp_rate(&self) -> f64 {
        WARP_RATES[self.warp_index]
    }

    pub fn rcs_locked(&self) -> bool {
        self.rcs_locked
    }

    /// Altitude and speed of every vessel, ordered by id.
    pub fn fleet(&self) -> Vec<VesselReport> {
        let mut fleet: Vec<VesselReport> = self
            .world
            .query::<(&Vessel, &Kinematics)>()
            .iter()
            .map(|(_entity, (vessel, kin))| VesselReport {
                id: vessel.id,
                altitude: kin.position.length() - BODY_RADIUS,
                speed: kin.velocity.length(),
            })
            .collect();
        fleet.sort_by_key(|report| report.id);
        fleet
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn set_active_target(&mut self, target: Option<TargetRef>) {
        self.active_target = target;
    }

    pub fn set_connected(
        &mut self,
        processor: ProcessorId,
        connected: bool,
    ) -> Result<(), UplinkError> {
        let entity = self.processor_entity(processor)?;
        let mut link = self
            .world
            .get::<&mut Link>(entity)
            .map_err(|_| UplinkError::UnknownProcessor(processor))?;
        link.connected = connected;
        info!(processor = processor.0, connected, "link state changed");
        Ok(())
    }

    pub fn add_maneuver_node(
        &mut self,
        vessel: VesselId,
        node: ManeuverNode,
    ) -> Result<(), UplinkError> {
        let entity = self.vessel_entity(vessel)?;
        let mut data = self
            .world
            .get::<&mut Vessel>(entity)
            .map_err(|_| UplinkError::VesselUnavailable(vessel))?;
        data.nodes.insert(0, node);
        info!(vessel = vessel.0, ut = node.ut, "maneuver node planned");
        Ok(())
    }

    pub fn controls(&self, vessel: VesselId) -> Result<Controls, UplinkError> {
        let entity = self.vessel_entity(vessel)?;
        self.world
            .get::<&Controls>(entity)
            .map(|c| (*c).clone())
            .map_err(|_| UplinkError::VesselUnavailable(vessel))
    }

    fn vessel_entity(&self, vessel: VesselId) -> Result<Entity, UplinkError> {
        self.vessels
            .get(&vessel)
            .copied()
            .ok_or(UplinkError::VesselUnavailable(vessel))
    }

    fn processor_entity(&self, processor: ProcessorId) -> Result<Entity, UplinkError> {
        self.processors
            .get(&processor)
            .copied()
            .ok_or(UplinkError::UnknownProcessor(processor))
    }

    fn processor(&self, processor: ProcessorId) -> Option<Processor> {
        let entity = self.processors.get(&processor)?;
        self.world.get::<&Processor>(*entity).ok().map(|p| *p)
    }

    fn with_controls(&mut self, vessel: VesselId, f: impl FnOnce(&mut Controls)) {
        if let Some(entity) = self.vessels.get(&vessel) {
            if let Ok(mut controls) = self.world.get::<&mut Controls>(*entity) {
                f(&mut controls);
            }
        }
    }

    fn kinematics(&self, vessel: VesselId) -> Option<Kinematics> {
        let entity = self.vessels.get(&vessel)?;
        self.world.get::<&Kinematics>(*entity).ok().map(|k| *k)
    }

    /// Draw this tick's link delays.
    pub fn begin_tick(&mut self) {
        for (_entity, link) in self.world.query_mut::<&mut Link>() {
            let jitter: f64 = self.rng.gen_range(-DELAY_JITTER..=DELAY_JITTER);
            link.current_delay = link.base_delay * (1.0 + jitter);
        }
    }

    /// Integrate every vessel over one tick, applying `fcs` to `controlled`.
    pub fn integrate(
        &mut self,
        controlled: VesselId,
        fcs: &FlightCtrlState,
    ) -> Result<(), UplinkError> {
        let dt = self.delta_time();
        let entity = self.vessel_entity(controlled)?;

        for (e, kin) in self.world.query_mut::<&mut Kinematics>() {
            let r = kin.position.length();
            let gravity = -kin.position * (BODY_GM / (r * r * r));
            let mut accel = gravity;

            if e == entity {
                let thrust = (kin.rotation * DVec3::Z) * (fcs.main_throttle as f64 * MAX_ACCEL);
                accel += thrust;
                let rates = DVec3::new(fcs.pitch as f64, fcs.yaw as f64, fcs.roll as f64);
                kin.rotation =
                    (kin.rotation * DQuat::from_scaled_axis(rates * MAX_TURN_RATE * dt)).normalize();
            }

            kin.velocity += accel * dt;
            kin.position += kin.velocity * dt;
        }

        self.time.advance(dt);
        debug!(tick = self.time.tick, time = self.time.elapsed_secs, "world integrated");
        Ok(())
    }
}

// ---- Service contracts ----

impl Clock for HarnessHost {
    fn game_time(&self) -> f64 {
        self.time.elapsed_secs
    }
}

impl Network for HarnessHost {
    fn link_status(&self, processor: ProcessorId) -> LinkStatus {
        let link = self
            .processors
            .get(&processor)
            .and_then(|e| self.world.get::<&Link>(*e).ok().map(|l| *l));
        match link {
            Some(link) if link.local_control => LinkStatus::local(),
            Some(link) if link.connected => LinkStatus::remote(link.current_delay),
            _ => LinkStatus::unreachable(),
        }
    }
}

impl SignalProcessor for HarnessHost {
    fn powered(&self, processor: ProcessorId) -> bool {
        self.processor(processor).is_some_and(|p| p.powered)
    }

    fn is_master(&self, processor: ProcessorId) -> bool {
        self.processor(processor).is_some_and(|p| p.master)
    }

    fn processor_vessel(&self, processor: ProcessorId) -> Option<VesselId> {
        self.processor(processor).map(|p| p.vessel)
    }
}

impl VesselQuery for HarnessHost {
    fn vessel(&self, vessel: VesselId) -> Option<VesselSnapshot> {
        let entity = *self.vessels.get(&vessel)?;
        let packed = self.world.get::<&Vessel>(entity).ok()?.packed;
        let kin = self.kinematics(vessel)?;
        let spin = DVec3::Z * BODY_SPIN;
        Some(VesselSnapshot {
            id: vessel,
            packed,
            rotation: kin.rotation,
            orbital_velocity: kin.velocity,
            surface_velocity: kin.velocity - spin.cross(kin.position),
            center_of_mass: kin.position,
            main_body: BODY,
            body_position: DVec3::ZERO,
            body_up: DVec3::Z,
            body_radius: BODY_RADIUS,
        })
    }

    fn maneuver_nodes(&self, vessel: VesselId) -> Vec<ManeuverNode> {
        self.vessels
            .get(&vessel)
            .and_then(|e| self.world.get::<&Vessel>(*e).ok().map(|v| v.nodes.clone()))
            .unwrap_or_default()
    }

    fn burn_vector(&self, _vessel: VesselId, node: &ManeuverNode) -> DVec3 {
        node.delta_v
    }

    fn active_target(&self) -> Option<TargetRef> {
        self.active_target
    }

    fn target_state(&self, target: &TargetRef) -> Option<TargetSnapshot> {
        match *target {
            TargetRef::Vessel { id } | TargetRef::DockingPort { vessel: id, .. } => {
                self.kinematics(id).map(|k| TargetSnapshot {
                    position: k.position,
                    orbital_velocity: k.velocity,
                })
            }
            TargetRef::Body { id } if id == BODY => Some(TargetSnapshot {
                position: DVec3::ZERO,
                orbital_velocity: DVec3::ZERO,
            }),
            TargetRef::Body { .. } => None,
        }
    }

    fn active_vessel(&self) -> Option<VesselId> {
        self.active_vessel
    }
}

impl VesselControl for HarnessHost {
    fn toggle_action_group(&mut self, vessel: VesselId, group: ActionGroup) {
        self.with_controls(vessel, |c| {
            c.toggled.push(group);
            if group == ActionGroup::Sas {
                c.sas = !c.sas;
            }
        });
    }

    fn set_action_group(&mut self, vessel: VesselId, group: ActionGroup, active: bool) {
        if group == ActionGroup::Sas {
            self.with_controls(vessel, |c| c.sas = active);
        }
    }

    fn stage_locked(&self) -> bool {
        self.stage_locked
    }

    fn activate_next_stage(&mut self, vessel: VesselId) {
        self.with_controls(vessel, |c| c.stages_fired += 1);
        info!(vessel = vessel.0, "stage activated");
    }

    fn toggle_rcs_lock(&mut self) {
        self.rcs_locked = !self.rcs_locked;
    }

    fn invoke_event(&mut self, vessel: VesselId, event: &EventRef) {
        info!(vessel = vessel.0, part = event.part, event = %event.name, "part event invoked");
        let event = event.clone();
        self.with_controls(vessel, move |c| c.events.push(event));
    }

    fn lock_heading(&mut self, vessel: VesselId, rotation: DQuat) {
        if let Some(entity) = self.vessels.get(&vessel) {
            if let Ok(mut kin) = self.world.get::<&mut Kinematics>(*entity) {
                kin.rotation = rotation;
            }
        }
    }
}

impl SteeringSolver for HarnessHost {
    /// Proportional steering on the rotation error, in the vessel frame.
    fn steer_toward(&mut self, vessel: VesselId, target: DQuat, fcs: &mut FlightCtrlState) {
        let Some(kin) = self.kinematics(vessel) else {
            return;
        };
        let mut error = kin.rotation.inverse() * target;
        if error.w < 0.0 {
            error = -error;
        }
        let axis = error.to_scaled_axis();
        fcs.pitch = axis.x.clamp(-1.0, 1.0) as f32;
        fcs.yaw = axis.y.clamp(-1.0, 1.0) as f32;
        fcs.roll = axis.z.clamp(-1.0, 1.0) as f32;
    }
}

impl TimeWarp for HarnessHost {
    fn current_rate(&self) -> f64 {
        WARP_RATES[self.warp_index]
    }

    fn rate_index(&self) -> usize {
        self.warp_index
    }

    fn set_rate_index(&mut self, index: usize) {
        self.warp_index = index.min(WARP_RATES.len() - 1);
    }

    fn delta_time(&self) -> f64 {
        FIXED_DT * self.current_rate()
    }
}

impl Notifier for HarnessHost {
    fn post(&mut self, notification: Notification) {
        info!(level = ?notification.level, "{}", notification.message);
        self.notifications.push(notification);
    }
}
