use std::fmt;

use log::trace;

use crate::core::{
    battle::{
        combat,
        command::{self, Command},
        component::Unit,
        movement, Faction, Id, State,
    },
    map::{self, PosHex},
};

pub fn check(state: &State, command: &Command) -> Result<(), Error> {
    trace!("check: {:?}", command);
    if state.battle_result().is_some() {
        return Err(Error::BattleEnded);
    }
    match *command {
        Command::SelectUnit(ref command) => check_command_select_unit(state, command),
        Command::MoveTo(ref command) => check_command_move_to(state, command),
        Command::Attack(ref command) => check_command_attack(state, command),
        Command::EndTurn(ref command) => check_command_end_turn(state, command),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    BattleEnded,
    NotYourTurn,
    BadActorId,
    BadTargetId,
    CanNotCommandEnemyUnits,
    NoSelectedUnit,
    NoTarget,
    BadPos,
    SameOwner,
    UnitIsDead,
    AlreadyMoved,
    CanNotMove,
    AlreadyAttacked,
    UnreachablePos,
    DistanceIsTooBig,
    DistanceIsTooSmall,
    TargetIsNotVisible,
    TargetIsOutsideOfZone,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Error::BattleEnded => "The battle has ended",
            Error::NotYourTurn => "Not your turn",
            Error::BadActorId => "No such unit",
            Error::BadTargetId => "No such target",
            Error::CanNotCommandEnemyUnits => "Can't command enemy units",
            Error::NoSelectedUnit => "No unit is selected",
            Error::NoTarget => "Nothing to attack there",
            Error::BadPos => "No such tile",
            Error::SameOwner => "Can't attack a friendly unit",
            Error::UnitIsDead => "The unit is dead",
            Error::AlreadyMoved => "The unit has already moved",
            Error::CanNotMove => "The unit can't move anymore",
            Error::AlreadyAttacked => "The unit has already attacked",
            Error::UnreachablePos => "The position is unreachable",
            Error::DistanceIsTooBig => "The target is too far",
            Error::DistanceIsTooSmall => "The target is too close",
            Error::TargetIsNotVisible => "The target is hidden by the fog of war",
            Error::TargetIsOutsideOfZone => "The target is outside of the playable zone",
        };
        write!(f, "{}", s)
    }
}

impl std::error::Error for Error {}

fn try_get_unit(state: &State, id: Id) -> Result<&Unit, Error> {
    state.unit_opt(id).ok_or(Error::BadActorId)
}

fn check_unit_can_act(state: &State, unit: &Unit) -> Result<(), Error> {
    if !unit.is_alive() {
        return Err(Error::UnitIsDead);
    }
    if unit.owner != state.faction() {
        return Err(Error::NotYourTurn);
    }
    Ok(())
}

fn check_command_select_unit(state: &State, command: &command::SelectUnit) -> Result<(), Error> {
    let unit = try_get_unit(state, command.id)?;
    if unit.owner != Faction::Player {
        return Err(Error::CanNotCommandEnemyUnits);
    }
    check_unit_can_act(state, unit)
}

fn check_command_move_to(state: &State, command: &command::MoveTo) -> Result<(), Error> {
    let unit = try_get_unit(state, command.id)?;
    check_unit_can_act(state, unit)?;
    // The AI only has to keep its single move per turn, even after attacking.
    match unit.owner {
        Faction::Player => {
            if !unit.can_move() {
                return Err(Error::CanNotMove);
            }
        }
        Faction::Ai => {
            if unit.has_moved {
                return Err(Error::AlreadyMoved);
            }
        }
    }
    check_pos_is_reachable(state, unit, command.pos)
}

fn check_pos_is_reachable(state: &State, unit: &Unit, pos: PosHex) -> Result<(), Error> {
    if !state.battlefield().contains(pos) {
        return Err(Error::BadPos);
    }
    let is_valid = movement::is_valid_move(
        state.battlefield(),
        unit.pos,
        pos,
        unit.remaining_movement(),
        state.shrink_radius(),
    );
    if is_valid {
        Ok(())
    } else {
        Err(Error::UnreachablePos)
    }
}

fn check_command_attack(state: &State, command: &command::Attack) -> Result<(), Error> {
    let attacker = try_get_unit(state, command.attacker_id)?;
    let target = state.unit_opt(command.target_id).ok_or(Error::BadTargetId)?;
    check_unit_can_act(state, attacker)?;
    combat::can_attack(state, attacker, target, Some(state.vision()))?;
    let target_distance = map::distance_hex(PosHex::ORIGIN, target.pos);
    if target_distance > state.shrink_radius() {
        return Err(Error::TargetIsOutsideOfZone);
    }
    Ok(())
}

fn check_command_end_turn(_: &State, _: &command::EndTurn) -> Result<(), Error> {
    Ok(())
}
