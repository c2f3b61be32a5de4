use std::fmt;

use log::debug;
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};

use crate::core::{
    battle::{
        battlefield::Battlefield,
        component::{ObstacleType, WeaponType},
        Faction, Strength,
    },
    map::{self, Distance, PosHex},
    utils,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactUnit {
    pub owner: Faction,
    pub weapon: WeaponType,
    pub pos: PosHex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactObstacle {
    pub obstacle: ObstacleType,
    pub pos: PosHex,
}

/// Everything that is fixed for the whole match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub map_radius: Distance,
    pub vision_range: Distance,

    /// The playable zone shrinks every `shrink_interval` turns...
    pub shrink_interval: i32,

    /// ...but never below this radius.
    pub shrink_floor: Distance,

    pub starting_health: Strength,
    pub min_damage: Strength,

    /// Share of all tiles that get a random obstacle.
    pub obstacle_ratio: f32,

    /// Random obstacles are never placed this close to the center.
    pub obstacle_free_radius: Distance,

    pub units: Vec<ExactUnit>,
    pub exact_obstacles: Vec<ExactObstacle>,

    /// Makes the random obstacle placement reproducible.
    pub seed: Option<u64>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            map_radius: Distance(7),
            vision_range: Distance(5),
            shrink_interval: 5,
            shrink_floor: Distance(5),
            starting_health: Strength(100),
            min_damage: Strength(1),
            obstacle_ratio: 0.15,
            obstacle_free_radius: Distance(2),
            units: vec![
                ExactUnit {
                    owner: Faction::Player,
                    weapon: WeaponType::Catapult,
                    pos: PosHex::new(-3, 5),
                },
                ExactUnit {
                    owner: Faction::Ai,
                    weapon: WeaponType::Catapult,
                    pos: PosHex::new(3, -5),
                },
            ],
            exact_obstacles: Vec::new(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    MapIsTooSmall,
    PosOutsideOfMap(PosHex),
    NoPlayerUnits,
    NoEnemyUnits,
    SpawnIsTaken(PosHex),
    BadShrinkFloor(Distance),
    BadShrinkInterval(i32),
    BadObstacleRatio(f32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MapIsTooSmall => write!(f, "Map is too small"),
            Error::PosOutsideOfMap(pos) => write!(f, "Position {} is outside of the map", pos),
            Error::NoPlayerUnits => write!(f, "No player units"),
            Error::NoEnemyUnits => write!(f, "No enemy units"),
            Error::SpawnIsTaken(pos) => write!(f, "Spawn position {} is already taken", pos),
            Error::BadShrinkFloor(d) => write!(f, "Bad shrink floor: {}", d.0),
            Error::BadShrinkInterval(n) => write!(f, "Bad shrink interval: {}", n),
            Error::BadObstacleRatio(n) => write!(f, "Bad obstacle ratio: {}", n),
        }
    }
}

impl std::error::Error for Error {}

impl Scenario {
    pub fn check(&self) -> Result<(), Error> {
        if self.map_radius.0 < 3 {
            return Err(Error::MapIsTooSmall);
        }
        if self.shrink_floor.0 < 0 || self.shrink_floor > self.map_radius {
            return Err(Error::BadShrinkFloor(self.shrink_floor));
        }
        if self.shrink_interval <= 0 {
            return Err(Error::BadShrinkInterval(self.shrink_interval));
        }
        if !(0.0..=1.0).contains(&self.obstacle_ratio) {
            return Err(Error::BadObstacleRatio(self.obstacle_ratio));
        }
        let mut taken = Vec::new();
        for unit in &self.units {
            if !map::is_inboard(self.map_radius, unit.pos) {
                return Err(Error::PosOutsideOfMap(unit.pos));
            }
            if taken.contains(&unit.pos) {
                return Err(Error::SpawnIsTaken(unit.pos));
            }
            taken.push(unit.pos);
        }
        for obstacle in &self.exact_obstacles {
            if !map::is_inboard(self.map_radius, obstacle.pos) {
                return Err(Error::PosOutsideOfMap(obstacle.pos));
            }
            if taken.contains(&obstacle.pos) {
                return Err(Error::SpawnIsTaken(obstacle.pos));
            }
            taken.push(obstacle.pos);
        }
        if !self.units.iter().any(|u| u.owner == Faction::Player) {
            return Err(Error::NoPlayerUnits);
        }
        if !self.units.iter().any(|u| u.owner == Faction::Ai) {
            return Err(Error::NoEnemyUnits);
        }
        Ok(())
    }

    pub fn spawn_positions(&self) -> Vec<PosHex> {
        self.units.iter().map(|unit| unit.pos).collect()
    }

    fn can_have_random_obstacle(&self, battlefield: &Battlefield, pos: PosHex) -> bool {
        let is_spawn = self.units.iter().any(|unit| unit.pos == pos);
        let near_center = map::distance_hex(PosHex::ORIGIN, pos) <= self.obstacle_free_radius;
        !is_spawn && !near_center && battlefield.obstacle(pos).is_none()
    }
}

/// Places the exact obstacles and then scatters the random ones.
pub fn create_terrain(battlefield: &mut Battlefield, scenario: &Scenario, rng: &mut StdRng) {
    for exact in &scenario.exact_obstacles {
        battlefield.set_obstacle(exact.pos, exact.obstacle);
    }
    let tiles_count = battlefield.positions().count();
    let count = (tiles_count as f32 * scenario.obstacle_ratio) as usize;
    let candidates: Vec<PosHex> = battlefield
        .positions()
        .filter(|&pos| scenario.can_have_random_obstacle(battlefield, pos))
        .collect();
    let candidates = utils::shuffle_vec(candidates, rng);
    for &pos in candidates.iter().take(count) {
        let index = rng.gen_range(0..ObstacleType::ALL.len());
        battlefield.set_obstacle(pos, ObstacleType::ALL[index]);
    }
    debug!(
        "scenario: {} random obstacles out of {} tiles",
        count.min(candidates.len()),
        tiles_count
    );
}
