use serde::Serialize;

use crate::core::{
    battle::{
        battlefield::Battlefield,
        component::{Unit, WeaponType},
        event::Event,
        scenario::{self, Scenario},
        state::apply::apply,
        vision::Vision,
        Faction, Id, Turn,
    },
    map::{Distance, PosHex},
    utils::zrng,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattleResult {
    pub winner: Faction,
    pub turn: Turn,
    pub enemies_destroyed_by_player: i32,
    pub survivors: Vec<WeaponType>,
}

/// Pathfinding and combat fill the hex sets, the renderer only reads them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Selection {
    pub unit_id: Option<Id>,
    pub valid_moves: Vec<PosHex>,
    pub valid_attacks: Vec<PosHex>,
    pub hovered: Option<PosHex>,
}

impl Selection {
    /// Hover survives: it follows the pointer, not the turn.
    pub fn clear(&mut self) {
        self.unit_id = None;
        self.valid_moves.clear();
        self.valid_attacks.clear();
    }
}

#[derive(Clone, Debug)]
pub struct State {
    scenario: Scenario,
    battlefield: Battlefield,
    units: [Vec<Unit>; 2],
    vision: Vision,
    faction: Faction,
    turn: Turn,
    shrink_radius: Distance,
    selection: Selection,
    enemies_destroyed_by_player: i32,
    battle_result: Option<BattleResult>,
}

impl State {
    pub fn new(scenario: Scenario) -> Result<Self, scenario::Error> {
        scenario.check()?;
        let mut battlefield = Battlefield::new(scenario.map_radius);
        scenario::create_terrain(&mut battlefield, &scenario, &mut zrng(scenario.seed));
        let mut this = Self {
            vision: Vision::new(scenario.vision_range),
            shrink_radius: scenario.map_radius,
            battlefield,
            units: [Vec::new(), Vec::new()],
            faction: Faction::Player,
            turn: Turn(0),
            selection: Selection::default(),
            enemies_destroyed_by_player: 0,
            battle_result: None,
            scenario,
        };
        this.create_units();
        this.update_vision();
        Ok(this)
    }

    fn create_units(&mut self) {
        for (index, exact) in self.scenario.units.iter().enumerate() {
            let id = Id(index as i32);
            let health = self.scenario.starting_health;
            let unit = Unit::new(id, exact.owner, exact.weapon, exact.pos, health);
            self.battlefield.set_occupant(exact.pos, id);
            self.units[exact.owner.index()].push(unit);
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    /// The roster of a faction. Dead units are never kept here.
    pub fn units(&self, faction: Faction) -> &[Unit] {
        &self.units[faction.index()]
    }

    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().flatten()
    }

    pub fn unit_opt(&self, id: Id) -> Option<&Unit> {
        self.all_units().find(|unit| unit.id == id)
    }

    pub fn unit(&self, id: Id) -> &Unit {
        self.unit_opt(id).unwrap_or_else(|| panic!("no unit with id {:?}", id))
    }

    pub fn vision(&self) -> &Vision {
        &self.vision
    }

    /// Whose turn it is.
    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn shrink_radius(&self) -> Distance {
        self.shrink_radius
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn enemies_destroyed_by_player(&self) -> i32 {
        self.enemies_destroyed_by_player
    }

    pub fn battle_result(&self) -> Option<&BattleResult> {
        self.battle_result.as_ref()
    }

    pub fn set_hovered_hex(&mut self, pos: Option<PosHex>) {
        self.selection.hovered = pos;
    }
}

/// Mutators. Be careful with them!
impl State {
    pub(in crate::core::battle) fn battlefield_mut(&mut self) -> &mut Battlefield {
        &mut self.battlefield
    }

    pub(in crate::core::battle) fn unit_mut(&mut self, id: Id) -> &mut Unit {
        self.units
            .iter_mut()
            .flatten()
            .find(|unit| unit.id == id)
            .unwrap_or_else(|| panic!("no unit with id {:?}", id))
    }

    pub(in crate::core::battle) fn units_mut(&mut self, faction: Faction) -> &mut Vec<Unit> {
        &mut self.units[faction.index()]
    }

    pub(in crate::core::battle) fn remove_unit(&mut self, id: Id) -> Unit {
        for roster in &mut self.units {
            if let Some(index) = roster.iter().position(|unit| unit.id == id) {
                return roster.remove(index);
            }
        }
        panic!("no unit with id {:?}", id);
    }

    pub(in crate::core::battle) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub(in crate::core::battle) fn set_faction(&mut self, faction: Faction) {
        self.faction = faction;
    }

    pub(in crate::core::battle) fn set_turn(&mut self, turn: Turn) {
        self.turn = turn;
    }

    pub(in crate::core::battle) fn set_shrink_radius(&mut self, radius: Distance) {
        self.shrink_radius = radius;
    }

    pub(in crate::core::battle) fn add_destroyed_enemy(&mut self) {
        self.enemies_destroyed_by_player += 1;
    }

    pub(in crate::core::battle) fn set_battle_result(&mut self, result: BattleResult) {
        self.battle_result = Some(result);
    }

    pub(in crate::core::battle) fn update_vision(&mut self) {
        let [player_units, ai_units] = &self.units;
        self.vision.update(player_units, ai_units, &mut self.battlefield);
    }

    pub(in crate::core::battle) fn apply(&mut self, event: &Event) {
        apply(self, event);
    }
}
