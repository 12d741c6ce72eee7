//! Flight computer status flags.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Set of conditions that limit what the flight computer can do.
/// The empty set is the normal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputerStatus(u8);

impl ComputerStatus {
    pub const NORMAL: Self = Self(0);
    pub const PACKED: Self = Self(2);
    pub const OUT_OF_POWER: Self = Self(4);
    pub const NO_CONNECTION: Self = Self(8);
    pub const NOT_MASTER: Self = Self(16);

    const NAMES: [(Self, &'static str); 4] = [
        (Self::PACKED, "Packed"),
        (Self::OUT_OF_POWER, "OutOfPower"),
        (Self::NO_CONNECTION, "NoConnection"),
        (Self::NOT_MASTER, "NotMaster"),
    ];

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_normal(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for ComputerStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ComputerStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ComputerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_normal() {
            return f.write_str("Normal");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
