//! Fog of war.
//!
//! Vision is radial: every tile within the vision range of a living unit is
//! visible to its faction. Obstacles don't occlude anything.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{
    battle::{battlefield::Battlefield, component::Unit, Faction},
    map::{self, Distance, PosHex},
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Unexplored,
    Explored,
    Visible,
}

#[derive(Clone, Debug, Default)]
pub struct VisionState {
    visible: HashSet<PosHex>,

    /// Everything that was ever visible. Only grows.
    explored: HashSet<PosHex>,
}

impl VisionState {
    pub fn visible(&self) -> &HashSet<PosHex> {
        &self.visible
    }

    pub fn explored(&self) -> &HashSet<PosHex> {
        &self.explored
    }

    pub fn is_visible(&self, pos: PosHex) -> bool {
        self.visible.contains(&pos)
    }

    pub fn visibility(&self, pos: PosHex) -> Visibility {
        if self.visible.contains(&pos) {
            Visibility::Visible
        } else if self.explored.contains(&pos) {
            Visibility::Explored
        } else {
            Visibility::Unexplored
        }
    }

    fn update(&mut self, units: &[Unit], battlefield: &Battlefield, range: Distance) {
        self.explored.extend(self.visible.drain());
        for unit in units.iter().filter(|unit| unit.is_alive()) {
            self.visible.insert(unit.pos);
            for pos in map::hexes_in_range(unit.pos, range) {
                if battlefield.contains(pos) {
                    self.visible.insert(pos);
                }
            }
        }
        self.explored.extend(self.visible.iter().copied());
    }
}

#[derive(Clone, Debug)]
pub struct Vision {
    range: Distance,
    states: [VisionState; 2],
}

impl Vision {
    pub fn new(range: Distance) -> Self {
        Self {
            range,
            states: [VisionState::default(), VisionState::default()],
        }
    }

    pub fn range(&self) -> Distance {
        self.range
    }

    pub fn state(&self, faction: Faction) -> &VisionState {
        &self.states[faction.index()]
    }

    /// Recomputes both factions from scratch and re-tags the battlefield.
    pub fn update(
        &mut self,
        player_units: &[Unit],
        ai_units: &[Unit],
        battlefield: &mut Battlefield,
    ) {
        let range = self.range;
        self.states[Faction::Player.index()].update(player_units, battlefield, range);
        self.states[Faction::Ai.index()].update(ai_units, battlefield, range);
        for &faction in &Faction::ALL {
            battlefield.update_visibility(faction, self.state(faction));
        }
        debug!(
            "vision: player sees {} tiles, ai sees {} tiles",
            self.state(Faction::Player).visible.len(),
            self.state(Faction::Ai).visible.len(),
        );
    }

    pub fn visibility(&self, faction: Faction, pos: PosHex) -> Visibility {
        self.state(faction).visibility(pos)
    }

    pub fn is_unit_visible_to(&self, faction: Faction, unit: &Unit) -> bool {
        self.state(faction).is_visible(unit.pos)
    }
}
