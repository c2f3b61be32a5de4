use serde::{Deserialize, Serialize};

use crate::core::{
    battle::{movement::MovePoints, Faction, Id, Strength},
    map::{Distance, PosHex},
    utils::clamp_min,
};

#[derive(Serialize, Deserialize, PartialEq, Clone, Copy, Debug, Eq, Hash)]
pub enum WeaponType {
    Catapult,
    Ballista,
    Trebuchet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponStats {
    pub movement: Distance,
    pub attack_min: Distance,
    pub attack_max: Distance,
    pub damage: Strength,
}

impl WeaponType {
    pub const ALL: [WeaponType; 3] = [
        WeaponType::Catapult,
        WeaponType::Ballista,
        WeaponType::Trebuchet,
    ];

    pub fn stats(self) -> WeaponStats {
        match self {
            WeaponType::Catapult => WeaponStats {
                movement: Distance(3),
                attack_min: Distance(2),
                attack_max: Distance(5),
                damage: Strength(35),
            },
            WeaponType::Ballista => WeaponStats {
                movement: Distance(4),
                attack_min: Distance(1),
                attack_max: Distance(4),
                damage: Strength(25),
            },
            WeaponType::Trebuchet => WeaponStats {
                movement: Distance(2),
                attack_min: Distance(3),
                attack_max: Distance(7),
                damage: Strength(50),
            },
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Copy, Debug, Eq, Hash)]
pub enum ObstacleType {
    LargeRock,
    SmallRock,
    Tree,
    Ruin,
    Church,
    Castle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Passability {
    /// Entering costs an extra half of a step.
    Difficult,
    Impassable,
}

impl ObstacleType {
    pub const ALL: [ObstacleType; 6] = [
        ObstacleType::LargeRock,
        ObstacleType::SmallRock,
        ObstacleType::Tree,
        ObstacleType::Ruin,
        ObstacleType::Church,
        ObstacleType::Castle,
    ];

    pub fn passability(self) -> Passability {
        match self {
            ObstacleType::SmallRock | ObstacleType::Tree | ObstacleType::Ruin => {
                Passability::Difficult
            }
            ObstacleType::LargeRock | ObstacleType::Church | ObstacleType::Castle => {
                Passability::Impassable
            }
        }
    }

    pub fn blocks_line_of_sight(self) -> bool {
        match self {
            ObstacleType::SmallRock | ObstacleType::Ruin => false,
            ObstacleType::LargeRock
            | ObstacleType::Tree
            | ObstacleType::Church
            | ObstacleType::Castle => true,
        }
    }
}

/// A siege weapon on the battlefield.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Unit {
    pub id: Id,
    pub owner: Faction,
    pub weapon: WeaponType,
    pub pos: PosHex,
    pub health: Strength,
    pub max_health: Strength,

    // per-turn
    pub has_moved: bool,
    pub has_attacked: bool,
    pub movement_points_used: MovePoints,
}

impl Unit {
    pub fn new(id: Id, owner: Faction, weapon: WeaponType, pos: PosHex, health: Strength) -> Self {
        Self {
            id,
            owner,
            weapon,
            pos,
            health,
            max_health: health,
            has_moved: false,
            has_attacked: false,
            movement_points_used: MovePoints(0),
        }
    }

    pub fn movement_range(&self) -> Distance {
        self.weapon.stats().movement
    }

    /// Minimum and maximum attack distance.
    pub fn attack_range(&self) -> (Distance, Distance) {
        let stats = self.weapon.stats();
        (stats.attack_min, stats.attack_max)
    }

    pub fn damage(&self) -> Strength {
        self.weapon.stats().damage
    }

    pub fn remaining_movement(&self) -> MovePoints {
        let budget = MovePoints::from_tiles(self.movement_range());
        clamp_min(
            MovePoints(budget.0 - self.movement_points_used.0),
            MovePoints(0),
        )
    }

    /// Attacking ends the unit's movement for the turn.
    pub fn can_move(&self) -> bool {
        !self.has_attacked && self.remaining_movement() > MovePoints(0)
    }

    pub fn can_attack(&self) -> bool {
        !self.has_attacked
    }

    pub fn is_alive(&self) -> bool {
        self.health > Strength(0)
    }

    pub fn take_damage(&mut self, damage: Strength) {
        self.health = clamp_min(Strength(self.health.0 - damage.0), Strength(0));
    }

    pub fn reset_turn_actions(&mut self) {
        self.has_moved = false;
        self.has_attacked = false;
        self.movement_points_used = MovePoints(0);
    }
}
