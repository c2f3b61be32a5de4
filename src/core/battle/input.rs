//! Player intents. Rejections are logged and reported as `false`,
//! the state stays untouched.

use log::warn;

use crate::core::{
    battle::{
        combat::AttackResult,
        command::{self, Command},
        event::Event,
        execute, ApplyPhase, Cb, Error, Faction, Id, State,
    },
    map::PosHex,
};

fn try_execute(state: &mut State, command: Command, cb: Cb) -> Result<(), Error> {
    if state.faction() != Faction::Player {
        return Err(Error::NotYourTurn);
    }
    execute(state, &command, cb)
}

fn report(result: Result<(), Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("input: {}", err);
            false
        }
    }
}

pub fn select_unit(state: &mut State, id: Id, cb: Cb) -> bool {
    report(try_execute(state, command::SelectUnit { id }.into(), cb))
}

pub fn select_unit_at(state: &mut State, pos: PosHex, cb: Cb) -> bool {
    match state.battlefield().occupant(pos) {
        Some(id) => select_unit(state, id, cb),
        None => report(Err(Error::BadActorId)),
    }
}

pub fn move_selected_unit_to(state: &mut State, pos: PosHex, cb: Cb) -> bool {
    let result = match state.selection().unit_id {
        Some(id) => try_execute(state, command::MoveTo { id, pos }.into(), cb),
        None => Err(Error::NoSelectedUnit),
    };
    report(result)
}

pub fn attack_at(state: &mut State, pos: PosHex, cb: Cb) -> AttackResult {
    let attacker_id = match state.selection().unit_id {
        Some(id) => id,
        None => {
            report(Err(Error::NoSelectedUnit));
            return AttackResult::failed();
        }
    };
    let target_id = match state.battlefield().occupant(pos) {
        Some(id) => id,
        None => {
            report(Err(Error::NoTarget));
            return AttackResult::failed();
        }
    };
    let mut result = AttackResult::failed();
    let command = command::Attack {
        attacker_id,
        target_id,
    };
    let outcome = try_execute(state, command.into(), &mut |state, event, phase| {
        if let (Event::Attack(ev), ApplyPhase::Post) = (event, phase) {
            result = AttackResult {
                success: true,
                damage: ev.damage,
                destroyed: ev.destroyed,
            };
        }
        cb(state, event, phase);
    });
    report(outcome);
    result
}

pub fn end_turn(state: &mut State, cb: Cb) -> bool {
    report(try_execute(state, command::EndTurn.into(), cb))
}
