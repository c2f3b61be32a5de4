use log::debug;
use serde::Serialize;

use crate::core::{
    battle::{
        component::{ObstacleType, Passability},
        vision::{Visibility, VisionState},
        Faction, Id,
    },
    map::{self, Distance, HexIter, HexMap, PosHex},
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tile {
    pub occupant: Option<Id>,
    pub obstacle: Option<ObstacleType>,

    /// Cleared when the playable zone shrinks past this tile.
    pub in_bounds: bool,

    visibility: [Visibility; 2],
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            occupant: None,
            obstacle: None,
            in_bounds: true,
            visibility: [Visibility::Unexplored; 2],
        }
    }
}

impl Tile {
    pub fn visibility(&self, faction: Faction) -> Visibility {
        self.visibility[faction.index()]
    }

    pub fn is_impassable(&self) -> bool {
        match self.obstacle {
            Some(obstacle) => obstacle.passability() == Passability::Impassable,
            None => false,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Every tile of a match. Tiles are created once and never removed.
#[derive(Clone, Debug)]
pub struct Battlefield {
    map: HexMap<Tile>,
}

impl Battlefield {
    pub fn new(radius: Distance) -> Self {
        Self {
            map: HexMap::new(radius),
        }
    }

    pub fn radius(&self) -> Distance {
        self.map.radius()
    }

    pub fn positions(&self) -> HexIter {
        self.map.iter()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (PosHex, &Tile)> + '_ {
        self.map.iter().map(move |pos| (pos, self.map.tile(pos)))
    }

    pub fn contains(&self, pos: PosHex) -> bool {
        self.map.is_inboard(pos)
    }

    pub fn tile_opt(&self, pos: PosHex) -> Option<&Tile> {
        self.map.tile_opt(pos)
    }

    /// Panics if `pos` lies outside the constructed grid.
    pub fn tile(&self, pos: PosHex) -> &Tile {
        self.map.tile(pos)
    }

    pub fn occupant(&self, pos: PosHex) -> Option<Id> {
        self.tile_opt(pos).and_then(|tile| tile.occupant)
    }

    pub fn is_occupied(&self, pos: PosHex) -> bool {
        self.occupant(pos).is_some()
    }

    pub fn obstacle(&self, pos: PosHex) -> Option<ObstacleType> {
        self.tile_opt(pos).and_then(|tile| tile.obstacle)
    }

    pub fn set_occupant(&mut self, pos: PosHex, id: Id) {
        let tile = self.map.tile_mut(pos);
        assert!(tile.occupant.is_none(), "tile {} is already occupied", pos);
        tile.occupant = Some(id);
    }

    pub fn clear_occupant(&mut self, pos: PosHex) {
        self.map.tile_mut(pos).occupant = None;
    }

    pub fn set_obstacle(&mut self, pos: PosHex, obstacle: ObstacleType) {
        let tile = self.map.tile_mut(pos);
        assert!(tile.obstacle.is_none(), "tile {} already has an obstacle", pos);
        tile.obstacle = Some(obstacle);
    }

    /// Re-flags every tile against the current playable radius.
    pub fn update_in_bounds(&mut self, playable_radius: Distance) {
        for pos in self.map.iter() {
            let in_bounds = map::distance_hex(PosHex::ORIGIN, pos) <= playable_radius;
            self.map.tile_mut(pos).in_bounds = in_bounds;
        }
        debug!("battlefield: in-bounds radius is {}", playable_radius.0);
    }

    pub fn update_visibility(&mut self, faction: Faction, vision: &VisionState) {
        for pos in self.map.iter() {
            self.map.tile_mut(pos).visibility[faction.index()] = vision.visibility(pos);
        }
    }
}
