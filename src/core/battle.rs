use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::core::battle::{
    check::{check, Error},
    execute::{execute, ApplyPhase, Cb},
    state::State,
};

pub mod ai;
pub mod battlefield;
pub mod combat;
pub mod command;
pub mod component;
pub mod event;
pub mod execute;
pub mod input;
pub mod movement;
pub mod scenario;
pub mod state;
pub mod vision;

mod check;

#[cfg(test)]
mod tests;

/// The side a unit fights for. The player always moves first.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Ai,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Faction::Player, Faction::Ai];

    pub fn opponent(self) -> Self {
        match self {
            Faction::Player => Faction::Ai,
            Faction::Ai => Faction::Player,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Faction::Player => 0,
            Faction::Ai => 1,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Faction::Player => write!(f, "player"),
            Faction::Ai => write!(f, "ai"),
        }
    }
}

#[derive(
    Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq, Hash,
)]
pub struct Id(pub i32);

/// Health points or damage.
#[derive(
    Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Strength(pub i32);

/// Completed player+AI cycles.
#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Turn(pub i32);
