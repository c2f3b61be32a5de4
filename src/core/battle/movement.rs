use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, VecDeque},
    slice::Windows,
};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::core::{
    battle::{battlefield::Battlefield, component::Passability},
    map::{self, dirs, Dir, Distance, HexMap, PosHex},
};

/// Movement cost in half-step units: a plain step costs 2, difficult terrain 3.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct MovePoints(pub i32);

const STEP_COST: i32 = 2;
const DIFFICULT_TERRAIN_COST: i32 = 1;

impl MovePoints {
    pub fn from_tiles(distance: Distance) -> Self {
        MovePoints(distance.0 * STEP_COST)
    }

    pub fn as_tiles(self) -> f32 {
        self.0 as f32 / STEP_COST as f32
    }
}

pub fn max_cost() -> MovePoints {
    MovePoints(i32::max_value())
}

/// Cost of entering `pos`, `None` if it can't be entered at all.
pub fn tile_cost(battlefield: &Battlefield, pos: PosHex) -> Option<MovePoints> {
    let tile = battlefield.tile_opt(pos)?;
    let extra = match tile.obstacle.map(|obstacle| obstacle.passability()) {
        None => 0,
        Some(Passability::Difficult) => DIFFICULT_TERRAIN_COST,
        Some(Passability::Impassable) => return None,
    };
    Some(MovePoints(STEP_COST + extra))
}

fn is_playable(pos: PosHex, playable_radius: Distance) -> bool {
    map::distance_hex(PosHex::ORIGIN, pos) <= playable_radius
}

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    tiles: Vec<PosHex>,
}

impl Path {
    pub fn new(tiles: Vec<PosHex>) -> Self {
        assert!(!tiles.is_empty());
        Self { tiles }
    }

    pub fn tiles(&self) -> &[PosHex] {
        &self.tiles
    }

    pub fn from(&self) -> PosHex {
        self.tiles[0]
    }

    pub fn to(&self) -> PosHex {
        self.tiles[self.tiles.len() - 1]
    }

    /// Every tile after the start, the goal included.
    pub fn destinations(&self) -> &[PosHex] {
        &self.tiles[1..]
    }

    pub fn cost(&self, battlefield: &Battlefield) -> Option<MovePoints> {
        let mut cost = MovePoints(0);
        for step in self.steps() {
            cost.0 += tile_cost(battlefield, step.to)?.0;
        }
        Some(cost)
    }

    pub fn steps(&self) -> Steps {
        Steps {
            windows: self.tiles.windows(2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub from: PosHex,
    pub to: PosHex,
}

#[derive(Clone, Debug)]
pub struct Steps<'a> {
    windows: Windows<'a, PosHex>,
}

impl<'a> Iterator for Steps<'a> {
    type Item = Step;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some([from, to]) = self.windows.next() {
            Some(Step {
                from: *from,
                to: *to,
            })
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Tile {
    cost: MovePoints,
    parent: Option<PosHex>,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            cost: max_cost(),
            parent: None,
        }
    }
}

/// Cost-bounded flood fill. Units may pass through occupied tiles,
/// they just can't stop there.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    queue: VecDeque<PosHex>,
    map: HexMap<Tile>,
    start: Option<PosHex>,
}

impl Pathfinder {
    pub fn new(map_radius: Distance) -> Self {
        Self {
            queue: VecDeque::new(),
            map: HexMap::new(map_radius),
            start: None,
        }
    }

    fn clean_map(&mut self) {
        for pos in self.map.iter() {
            self.map.set_tile(pos, Tile::default());
        }
    }

    fn process_neighbor_pos(
        &mut self,
        battlefield: &Battlefield,
        budget: MovePoints,
        original_pos: PosHex,
        neighbor_pos: PosHex,
    ) {
        let tile_cost = match tile_cost(battlefield, neighbor_pos) {
            Some(cost) => cost,
            None => return,
        };
        let old_cost = self.map.tile(original_pos).cost;
        let new_cost = MovePoints(old_cost.0 + tile_cost.0);
        if new_cost > budget {
            return;
        }
        if self.map.tile(neighbor_pos).cost > new_cost {
            let updated_tile = Tile {
                cost: new_cost,
                parent: Some(original_pos),
            };
            self.map.set_tile(neighbor_pos, updated_tile);
            self.queue.push_back(neighbor_pos);
        }
    }

    fn try_to_push_neighbors(&mut self, battlefield: &Battlefield, budget: MovePoints, pos: PosHex) {
        for dir in dirs() {
            let neighbor_pos = Dir::get_neighbor_pos(pos, dir);
            if self.map.is_inboard(neighbor_pos) {
                self.process_neighbor_pos(battlefield, budget, pos, neighbor_pos);
            }
        }
    }

    pub fn fill_map(&mut self, battlefield: &Battlefield, start: PosHex, budget: MovePoints) {
        assert!(self.queue.is_empty());
        assert!(self.map.is_inboard(start));
        self.clean_map();
        self.start = Some(start);
        self.map.set_tile(
            start,
            Tile {
                cost: MovePoints(0),
                parent: None,
            },
        );
        self.queue.push_back(start);
        while let Some(pos) = self.queue.pop_front() {
            self.try_to_push_neighbors(battlefield, budget, pos);
        }
    }

    pub fn cost(&self, pos: PosHex) -> Option<MovePoints> {
        let cost = self.map.tile_opt(pos)?.cost;
        if cost == max_cost() {
            None
        } else {
            Some(cost)
        }
    }

    /// Tiles a unit may end its move on, in map order.
    pub fn reachable(&self, battlefield: &Battlefield, playable_radius: Distance) -> Vec<PosHex> {
        self.map
            .iter()
            .filter(|&pos| match self.cost(pos) {
                Some(cost) => cost > MovePoints(0),
                None => false,
            })
            .filter(|&pos| !battlefield.is_occupied(pos))
            .filter(|&pos| is_playable(pos, playable_radius))
            .collect()
    }

    /// The cheapest route found by the last `fill_map`.
    pub fn path(&self, destination: PosHex) -> Option<Path> {
        self.cost(destination)?;
        let mut path = vec![destination];
        let mut pos = destination;
        while let Some(parent) = self.map.tile(pos).parent {
            path.push(parent);
            pos = parent;
        }
        if Some(pos) != self.start {
            return None;
        }
        path.reverse();
        Some(Path::new(path))
    }
}

pub fn reachable_hexes(
    battlefield: &Battlefield,
    start: PosHex,
    budget: MovePoints,
    playable_radius: Distance,
) -> Vec<PosHex> {
    if budget <= MovePoints(0) {
        return Vec::new();
    }
    let mut pathfinder = Pathfinder::new(battlefield.radius());
    pathfinder.fill_map(battlefield, start, budget);
    let reachable = pathfinder.reachable(battlefield, playable_radius);
    trace!(
        "reachable from {} with {:?}: {} tiles",
        start,
        budget,
        reachable.len()
    );
    reachable
}

pub fn is_valid_move(
    battlefield: &Battlefield,
    from: PosHex,
    to: PosHex,
    budget: MovePoints,
    playable_radius: Distance,
) -> bool {
    if MovePoints::from_tiles(map::distance_hex(from, to)) > budget {
        return false;
    }
    reachable_hexes(battlefield, from, budget, playable_radius).contains(&to)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Node {
    pos: PosHex,
    f_cost: MovePoints,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap
        other.f_cost.cmp(&self.f_cost)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn heuristic(from: PosHex, to: PosHex) -> MovePoints {
    MovePoints::from_tiles(map::distance_hex(from, to))
}

/// A* search. The returned path starts at `start` and ends at `goal`.
pub fn find_path(
    battlefield: &Battlefield,
    start: PosHex,
    goal: PosHex,
    playable_radius: Distance,
) -> Option<Path> {
    let goal_tile = battlefield.tile_opt(goal)?;
    if goal_tile.is_occupied() || goal_tile.is_impassable() || !is_playable(goal, playable_radius)
    {
        debug!("find_path: goal {} can't be entered", goal);
        return None;
    }
    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<PosHex, PosHex> = HashMap::new();
    let mut g_costs: HashMap<PosHex, MovePoints> = HashMap::new();
    g_costs.insert(start, MovePoints(0));
    open_set.push(Node {
        pos: start,
        f_cost: heuristic(start, goal),
    });
    while let Some(current) = open_set.pop() {
        if current.pos == goal {
            return Some(reconstruct_path(&came_from, goal));
        }
        let current_g = g_costs[&current.pos];
        for neighbor in current.pos.neighbors() {
            let cost = match tile_cost(battlefield, neighbor) {
                Some(cost) => cost,
                None => continue,
            };
            let tentative_g = MovePoints(current_g.0 + cost.0);
            let neighbor_g = g_costs.get(&neighbor).copied().unwrap_or_else(max_cost);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.pos);
                g_costs.insert(neighbor, tentative_g);
                open_set.push(Node {
                    pos: neighbor,
                    f_cost: MovePoints(tentative_g.0 + heuristic(neighbor, goal).0),
                });
            }
        }
    }
    None
}

fn reconstruct_path(came_from: &HashMap<PosHex, PosHex>, goal: PosHex) -> Path {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    Path::new(path)
}

#[cfg(test)]
mod tests {
    use crate::core::{
        battle::{battlefield::Battlefield, component::ObstacleType, Id},
        map::{self, Distance, PosHex},
    };

    use super::{
        find_path, is_valid_move, reachable_hexes, tile_cost, MovePoints, Path, Pathfinder, Step,
    };

    const NODE_0: PosHex = PosHex { q: 0, r: 1 };
    const NODE_1: PosHex = PosHex { q: 1, r: 0 };
    const NODE_2: PosHex = PosHex { q: 2, r: 0 };

    const RADIUS: Distance = Distance(7);

    fn budget(tiles: i32) -> MovePoints {
        MovePoints::from_tiles(Distance(tiles))
    }

    #[test]
    fn path_from_to() {
        let path = Path::new(vec![NODE_0, NODE_1, NODE_2]);
        assert_eq!(path.from(), NODE_0);
        assert_eq!(path.to(), NODE_2);
        assert_eq!(path.destinations(), &[NODE_1, NODE_2]);
    }

    #[test]
    fn path_steps() {
        let path = Path::new(vec![NODE_0, NODE_1, NODE_2]);
        let mut steps = path.steps();
        assert_eq!(
            steps.next(),
            Some(Step {
                from: NODE_0,
                to: NODE_1,
            })
        );
        assert_eq!(
            steps.next(),
            Some(Step {
                from: NODE_1,
                to: NODE_2,
            })
        );
        assert_eq!(steps.next(), None);
    }

    #[test]
    fn zero_budget_reaches_nothing() {
        let battlefield = Battlefield::new(RADIUS);
        assert!(reachable_hexes(&battlefield, PosHex::ORIGIN, MovePoints(0), RADIUS).is_empty());
    }

    #[test]
    fn open_field_reach_matches_distance() {
        let battlefield = Battlefield::new(RADIUS);
        let start = PosHex::new(1, 1);
        let reachable = reachable_hexes(&battlefield, start, budget(2), RADIUS);
        assert_eq!(reachable.len(), 18);
        assert!(!reachable.contains(&start));
        for pos in reachable {
            assert!(map::distance_hex(start, pos) <= Distance(2));
        }
    }

    #[test]
    fn difficult_terrain_costs_extra() {
        let mut battlefield = Battlefield::new(RADIUS);
        battlefield.set_obstacle(PosHex::new(1, 0), ObstacleType::Tree);
        assert_eq!(tile_cost(&battlefield, PosHex::new(1, 0)), Some(MovePoints(3)));
        let mut pathfinder = Pathfinder::new(RADIUS);
        pathfinder.fill_map(&battlefield, PosHex::ORIGIN, budget(3));
        assert_eq!(pathfinder.cost(PosHex::new(1, 0)), Some(MovePoints(3)));
        // straight through the tree is still cheaper than the detour
        assert_eq!(pathfinder.cost(PosHex::new(2, 0)), Some(MovePoints(5)));
    }

    #[test]
    fn difficult_terrain_can_exhaust_budget() {
        let mut battlefield = Battlefield::new(RADIUS);
        battlefield.set_obstacle(PosHex::new(1, 0), ObstacleType::Ruin);
        let reachable = reachable_hexes(&battlefield, PosHex::ORIGIN, budget(1), RADIUS);
        assert!(!reachable.contains(&PosHex::new(1, 0)));
        assert_eq!(reachable.len(), 5);
    }

    #[test]
    fn impassable_tiles_are_never_reached() {
        let mut battlefield = Battlefield::new(RADIUS);
        let rock = PosHex::new(0, 1);
        battlefield.set_obstacle(rock, ObstacleType::LargeRock);
        let reachable = reachable_hexes(&battlefield, PosHex::ORIGIN, budget(3), RADIUS);
        assert!(!reachable.contains(&rock));
        assert_eq!(find_path(&battlefield, PosHex::ORIGIN, rock, RADIUS), None);
    }

    #[test]
    fn occupied_tiles_are_transit_only() {
        let mut battlefield = Battlefield::new(RADIUS);
        let start = PosHex::new(0, 0);
        let blocker = PosHex::new(1, 0);
        battlefield.set_occupant(blocker, Id(1));
        let reachable = reachable_hexes(&battlefield, start, budget(2), RADIUS);
        assert!(!reachable.contains(&blocker));
        assert!(reachable.contains(&PosHex::new(2, 0)));
        assert_eq!(find_path(&battlefield, start, blocker, RADIUS), None);
    }

    #[test]
    fn transit_through_occupied_corridor() {
        // A wall of castles with a single gap that is occupied.
        let mut battlefield = Battlefield::new(RADIUS);
        let gap = PosHex::new(1, 0);
        for r in -RADIUS.0..=RADIUS.0 {
            let pos = PosHex::new(1, r);
            if battlefield.contains(pos) && pos != gap {
                battlefield.set_obstacle(pos, ObstacleType::Castle);
            }
        }
        battlefield.set_occupant(gap, Id(9));
        let goal = PosHex::new(2, 0);
        let path = find_path(&battlefield, PosHex::ORIGIN, goal, RADIUS).unwrap();
        assert_eq!(path.tiles(), &[PosHex::ORIGIN, gap, goal]);
    }

    #[test]
    fn shrink_zone_is_excluded() {
        let battlefield = Battlefield::new(RADIUS);
        let start = PosHex::new(5, 0);
        let reachable = reachable_hexes(&battlefield, start, budget(2), Distance(5));
        assert!(reachable.iter().all(|&pos| map::distance_hex(PosHex::ORIGIN, pos) <= Distance(5)));
        assert!(!reachable.contains(&PosHex::new(6, 0)));
        assert_eq!(
            find_path(&battlefield, start, PosHex::new(6, 0), Distance(5)),
            None
        );
    }

    #[test]
    fn reachable_hexes_have_affordable_paths() {
        let mut battlefield = Battlefield::new(RADIUS);
        battlefield.set_obstacle(PosHex::new(1, 0), ObstacleType::SmallRock);
        battlefield.set_obstacle(PosHex::new(0, 1), ObstacleType::Church);
        battlefield.set_obstacle(PosHex::new(-1, 1), ObstacleType::Tree);
        let budget = budget(3);
        let mut pathfinder = Pathfinder::new(RADIUS);
        pathfinder.fill_map(&battlefield, PosHex::ORIGIN, budget);
        for pos in pathfinder.reachable(&battlefield, RADIUS) {
            let path = pathfinder.path(pos).unwrap();
            assert_eq!(path.from(), PosHex::ORIGIN);
            assert_eq!(path.to(), pos);
            assert!(path.cost(&battlefield).unwrap() <= budget);
        }
    }

    #[test]
    fn a_star_finds_the_cheapest_path() {
        let mut battlefield = Battlefield::new(RADIUS);
        battlefield.set_obstacle(PosHex::new(1, 0), ObstacleType::Tree);
        let goal = PosHex::new(2, 0);
        let path = find_path(&battlefield, PosHex::ORIGIN, goal, RADIUS).unwrap();
        assert_eq!(path.tiles(), &[PosHex::ORIGIN, PosHex::new(1, 0), goal]);
        assert_eq!(path.cost(&battlefield), Some(MovePoints(5)));
    }

    #[test]
    fn a_star_walks_around_impassable_tiles() {
        let mut battlefield = Battlefield::new(RADIUS);
        battlefield.set_obstacle(PosHex::new(1, 0), ObstacleType::Castle);
        let goal = PosHex::new(2, 0);
        let path = find_path(&battlefield, PosHex::ORIGIN, goal, RADIUS).unwrap();
        assert_eq!(path.from(), PosHex::ORIGIN);
        assert_eq!(path.to(), goal);
        assert_eq!(path.destinations().len(), 3);
        assert!(!path.tiles().contains(&PosHex::new(1, 0)));
        assert_eq!(path.cost(&battlefield), Some(MovePoints(6)));
    }

    #[test]
    fn valid_move() {
        let battlefield = Battlefield::new(RADIUS);
        let from = PosHex::new(-3, 5);
        assert!(is_valid_move(&battlefield, from, PosHex::new(0, 2), budget(3), RADIUS));
        assert!(!is_valid_move(&battlefield, from, PosHex::new(1, 1), budget(3), RADIUS));
        assert!(!is_valid_move(&battlefield, from, from, budget(3), RADIUS));
    }
}
