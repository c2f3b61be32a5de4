use log::{trace, warn};

use crate::core::{
    battle::{
        check::{check, Error},
        combat,
        command::{self, Command},
        event::{self, Event},
        movement::Pathfinder,
        state::{self, BattleResult, State},
        Faction,
    },
    map::Distance,
};

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ApplyPhase {
    Pre,
    Post,
}

/// A callback for the event consumers, called with the correct state.
pub type Cb<'c> = &'c mut dyn FnMut(&State, &Event, ApplyPhase);

/// A rejected command leaves the state untouched.
pub fn execute(state: &mut State, command: &Command, cb: Cb) -> Result<(), Error> {
    trace!("execute: {:?}", command);
    if let Err(err) = check(state, command) {
        warn!("Check failed: {:?}", err);
        return Err(err);
    }
    match *command {
        Command::SelectUnit(ref command) => execute_select_unit(state, command),
        Command::MoveTo(ref command) => execute_move_to(state, cb, command)?,
        Command::Attack(ref command) => execute_attack(state, cb, command),
        Command::EndTurn(ref command) => execute_end_turn(state, cb, command),
    }
    if let Command::Attack(_) = *command {
        try_execute_end_battle(state, cb);
    }
    Ok(())
}

fn do_event(state: &mut State, cb: Cb, event: &Event) {
    cb(state, event, ApplyPhase::Pre);
    state.apply(event);
    cb(state, event, ApplyPhase::Post);
}

fn execute_select_unit(state: &mut State, command: &command::SelectUnit) {
    state.selection_mut().unit_id = Some(command.id);
    state::refresh_selection(state);
}

fn execute_move_to(state: &mut State, cb: Cb, command: &command::MoveTo) -> Result<(), Error> {
    let unit = state.unit(command.id);
    let mut pathfinder = Pathfinder::new(state.battlefield().radius());
    pathfinder.fill_map(state.battlefield(), unit.pos, unit.remaining_movement());
    let cost = pathfinder.cost(command.pos).ok_or(Error::UnreachablePos)?;
    let path = pathfinder.path(command.pos).ok_or(Error::UnreachablePos)?;
    let event = event::MoveTo {
        id: command.id,
        path,
        cost,
    }
    .into();
    do_event(state, cb, &event);
    Ok(())
}

fn execute_attack(state: &mut State, cb: Cb, command: &command::Attack) {
    let attacker = state.unit(command.attacker_id);
    let target = state.unit(command.target_id);
    let damage = combat::damage(state, attacker);
    let destroyed = target.health <= damage;
    let event = event::Attack {
        attacker_id: command.attacker_id,
        target_id: command.target_id,
        damage,
        destroyed,
    }
    .into();
    do_event(state, cb, &event);
}

fn execute_end_turn(state: &mut State, cb: Cb, _: &command::EndTurn) {
    if try_execute_end_battle(state, cb) {
        return;
    }
    let faction = state.faction();
    do_event(state, cb, &event::EndTurn { faction }.into());
    let next = faction.opponent();
    let mut turn = state.turn();
    if next == Faction::Player {
        turn.0 += 1;
        try_execute_shrink_zone(state, cb, turn.0);
    }
    let event = event::BeginTurn {
        faction: next,
        turn,
    }
    .into();
    do_event(state, cb, &event);
}

fn try_execute_shrink_zone(state: &mut State, cb: Cb, turn: i32) {
    let scenario = state.scenario();
    let radius = state.shrink_radius();
    if turn % scenario.shrink_interval != 0 || radius <= scenario.shrink_floor {
        return;
    }
    let event = event::ShrinkZone {
        radius: Distance(radius.0 - 1),
    }
    .into();
    do_event(state, cb, &event);
}

fn try_execute_end_battle(state: &mut State, cb: Cb) -> bool {
    let winner = match state::check_victory_condition(state) {
        Some(winner) => winner,
        None => return false,
    };
    let result = BattleResult {
        winner,
        turn: state.turn(),
        enemies_destroyed_by_player: state.enemies_destroyed_by_player(),
        survivors: state::survivors(state, winner),
    };
    do_event(state, cb, &event::EndBattle { result }.into());
    true
}
