//! Raw control-input frames and their delayed wrapper.

use serde::{Deserialize, Serialize};

use crate::types::Timestamped;

/// One frame of pilot/autopilot control input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightCtrlState {
    /// Main engine throttle (0.0 - 1.0).
    pub main_throttle: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    /// RCS translation axes.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub wheel_steer: f32,
    pub wheel_throttle: f32,
    pub pitch_trim: f32,
    pub yaw_trim: f32,
    pub roll_trim: f32,
}

impl FlightCtrlState {
    /// Zero every axis and the throttle. Trims are kept.
    pub fn neutralize(&mut self) {
        *self = Self {
            pitch_trim: self.pitch_trim,
            yaw_trim: self.yaw_trim,
            roll_trim: self.roll_trim,
            ..Self::default()
        };
    }

    pub fn is_neutral(&self) -> bool {
        self.main_throttle == 0.0
            && self.pitch == 0.0
            && self.yaw == 0.0
            && self.roll == 0.0
            && self.x == 0.0
            && self.y == 0.0
            && self.z == 0.0
            && self.wheel_steer == 0.0
            && self.wheel_throttle == 0.0
    }
}

/// A control frame held back until `time_stamp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayedFlightCtrlState {
    pub time_stamp: f64,
    pub state: FlightCtrlState,
}

impl DelayedFlightCtrlState {
    pub fn new(state: FlightCtrlState, time_stamp: f64) -> Self {
        Self { time_stamp, state }
    }
}

impl Timestamped for DelayedFlightCtrlState {
    fn time_stamp(&self) -> f64 {
        self.time_stamp
    }
}
