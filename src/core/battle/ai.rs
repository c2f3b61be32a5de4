use std::collections::VecDeque;

use log::{debug, error, info};

use crate::core::{
    battle::{
        check, combat,
        command::{self, Command},
        component::Unit,
        execute,
        movement::{self, MovePoints, Pathfinder},
        Cb, Faction, Id, State,
    },
    map::{self, Distance, PosHex},
};

/// Greedy per-unit policy: attack, move closer, attack again.
///
/// Deciding is synchronous. Pacing is up to the caller: `step` handles
/// one unit per call, so a scheduler may pause between the calls.
#[derive(Debug, Clone)]
pub struct Ai {
    faction: Faction,

    /// Each AI has its own Pathfinder because it's not a part of the game state.
    pathfinder: Pathfinder,

    /// The roster as it was when the turn began.
    queue: VecDeque<Id>,
}

impl Ai {
    pub fn new(faction: Faction, map_radius: Distance) -> Self {
        Self {
            faction,
            pathfinder: Pathfinder::new(map_radius),
            queue: VecDeque::new(),
        }
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn begin_turn(&mut self, state: &State) {
        assert_eq!(state.faction(), self.faction);
        let ids = state.units(self.faction).iter().map(|unit| unit.id);
        self.queue = ids.collect();
    }

    /// The lowest health target in range, the first one on ties.
    pub fn try_to_attack(&self, state: &State, id: Id) -> Option<Command> {
        let attacker = state.unit_opt(id)?;
        if !attacker.can_attack() {
            return None;
        }
        let mut best: Option<&Unit> = None;
        for target_id in combat::valid_targets(state, attacker) {
            let target = state.unit(target_id);
            if best.map_or(true, |best| target.health < best.health) {
                best = Some(target);
            }
        }
        let command = command::Attack {
            attacker_id: id,
            target_id: best?.id,
        }
        .into();
        if check(state, &command).is_ok() {
            Some(command)
        } else {
            None
        }
    }

    /// Heads for the reachable tile closest to the nearest enemy.
    pub fn try_to_move(&mut self, state: &State, id: Id) -> Option<Command> {
        let unit = state.unit_opt(id)?;
        if unit.has_moved {
            return None;
        }
        let enemy_pos = nearest_enemy(state, unit)?.pos;
        let budget = MovePoints::from_tiles(unit.movement_range());
        self.pathfinder.fill_map(state.battlefield(), unit.pos, budget);
        let mut best: Option<(PosHex, Distance)> = None;
        for pos in self.pathfinder.reachable(state.battlefield(), state.shrink_radius()) {
            let distance = map::distance_hex(pos, enemy_pos);
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((pos, distance));
            }
        }
        let (pos, _) = best?;
        movement::find_path(state.battlefield(), unit.pos, pos, state.shrink_radius())?;
        let command = command::MoveTo { id, pos }.into();
        if check(state, &command).is_ok() {
            Some(command)
        } else {
            None
        }
    }

    /// Runs the next unit, or ends the turn once every unit is done.
    /// Returns `false` when there's nothing left to do this turn.
    pub fn step(&mut self, state: &mut State, cb: Cb) -> bool {
        if state.battle_result().is_some() {
            info!("AI: The battle has ended, can't create new commands.");
            return false;
        }
        if state.faction() != self.faction {
            return false;
        }
        match self.queue.pop_front() {
            Some(id) => {
                self.act(state, cb, id);
                true
            }
            None => {
                exec(state, cb, Some(command::EndTurn.into()));
                false
            }
        }
    }

    pub fn run_turn(&mut self, state: &mut State, cb: Cb) {
        self.begin_turn(state);
        while self.step(state, cb) {}
    }

    fn act(&mut self, state: &mut State, cb: Cb, id: Id) {
        debug!("AI: unit {:?}", id);
        let command = self.try_to_attack(state, id);
        exec(state, cb, command);
        if state.battle_result().is_some() {
            return;
        }
        let command = self.try_to_move(state, id);
        exec(state, cb, command);
        let command = self.try_to_attack(state, id);
        exec(state, cb, command);
    }
}

fn exec(state: &mut State, cb: Cb, command: Option<Command>) {
    if let Some(command) = command {
        if let Err(err) = execute(state, &command, cb) {
            error!("AI: {:?} failed: {:?}", command, err);
        }
    }
}

/// The first one in the roster order on ties.
fn nearest_enemy<'a>(state: &'a State, unit: &Unit) -> Option<&'a Unit> {
    let mut best: Option<(&Unit, Distance)> = None;
    for enemy in state.units(unit.owner.opponent()) {
        if !enemy.is_alive() {
            continue;
        }
        let distance = map::distance_hex(unit.pos, enemy.pos);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((enemy, distance));
        }
    }
    best.map(|(enemy, _)| enemy)
}
