use serde::Serialize;

use crate::core::{
    battle::{
        combat,
        component::{ObstacleType, Unit, WeaponType},
        movement,
        vision::Visibility,
        Faction, Id, Turn,
    },
    map::{Distance, PosHex},
};

pub use self::{
    apply::apply,
    private::{BattleResult, Selection, State},
};

mod apply;
mod private;

/// `None` while both sides still have units.
pub fn check_victory_condition(state: &State) -> Option<Faction> {
    let player_alive = !state.units(Faction::Player).is_empty();
    let ai_alive = !state.units(Faction::Ai).is_empty();
    match (player_alive, ai_alive) {
        (true, false) => Some(Faction::Player),
        (false, true) => Some(Faction::Ai),
        _ => None,
    }
}

pub fn unit_at(state: &State, pos: PosHex) -> Option<&Unit> {
    let id = state.battlefield().occupant(pos)?;
    state.unit_opt(id)
}

pub fn survivors(state: &State, faction: Faction) -> Vec<WeaponType> {
    state.units(faction).iter().map(|unit| unit.weapon).collect()
}

fn valid_moves(state: &State, unit: &Unit) -> Vec<PosHex> {
    if !unit.can_move() {
        return Vec::new();
    }
    movement::reachable_hexes(
        state.battlefield(),
        unit.pos,
        unit.remaining_movement(),
        state.shrink_radius(),
    )
}

fn valid_attacks(state: &State, unit: &Unit) -> Vec<PosHex> {
    if !unit.can_attack() {
        return Vec::new();
    }
    combat::attack_range(state, unit)
}

/// Recomputes the hex sets of the selected unit.
pub(in crate::core::battle) fn refresh_selection(state: &mut State) {
    let id = match state.selection().unit_id {
        Some(id) => id,
        None => return,
    };
    let hexes = state
        .unit_opt(id)
        .map(|unit| (valid_moves(state, unit), valid_attacks(state, unit)));
    let selection = state.selection_mut();
    match hexes {
        Some((moves, attacks)) => {
            selection.valid_moves = moves;
            selection.valid_attacks = attacks;
        }
        None => selection.clear(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileSnapshot {
    pub pos: PosHex,
    pub occupant: Option<Id>,
    pub obstacle: Option<ObstacleType>,
    pub in_bounds: bool,
    pub visibility: Visibility,
}

/// Everything the renderer polls each frame, as the player sees it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub faction: Faction,
    pub turn: Turn,
    pub shrink_radius: Distance,
    pub tiles: Vec<TileSnapshot>,
    pub units: Vec<Unit>,
    pub selection: Selection,
    pub battle_result: Option<BattleResult>,
}

pub fn snapshot(state: &State) -> Snapshot {
    let tiles = state
        .battlefield()
        .tiles()
        .map(|(pos, tile)| TileSnapshot {
            pos,
            occupant: tile.occupant,
            obstacle: tile.obstacle,
            in_bounds: tile.in_bounds,
            visibility: tile.visibility(Faction::Player),
        })
        .collect();
    Snapshot {
        faction: state.faction(),
        turn: state.turn(),
        shrink_radius: state.shrink_radius(),
        tiles,
        units: state.all_units().cloned().collect(),
        selection: state.selection().clone(),
        battle_result: state.battle_result().cloned(),
    }
}
