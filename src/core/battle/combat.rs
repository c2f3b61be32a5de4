use std::collections::HashSet;

use crate::core::{
    battle::{component::Unit, vision::Vision, Error, Faction, Id, State, Strength},
    map::{self, PosHex},
};

/// What an attack did, reported back to the input boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackResult {
    pub success: bool,
    pub damage: Strength,
    pub destroyed: bool,
}

impl AttackResult {
    pub fn failed() -> Self {
        Self {
            success: false,
            damage: Strength(0),
            destroyed: false,
        }
    }
}

/// Tiles the unit could hit from where it stands, in map order.
pub fn attack_range(state: &State, unit: &Unit) -> Vec<PosHex> {
    let (min, max) = unit.attack_range();
    state
        .battlefield()
        .positions()
        .filter(|&pos| {
            let distance = map::distance_hex(unit.pos, pos);
            distance >= min && distance <= max
        })
        .filter(|&pos| map::distance_hex(PosHex::ORIGIN, pos) <= state.shrink_radius())
        .collect()
}

/// Living enemies inside the attack range, in the enemy roster order.
pub fn valid_targets(state: &State, attacker: &Unit) -> Vec<Id> {
    let range: HashSet<PosHex> = attack_range(state, attacker).into_iter().collect();
    state
        .units(attacker.owner.opponent())
        .iter()
        .filter(|target| target.is_alive() && range.contains(&target.pos))
        .map(|target| target.id)
        .collect()
}

/// Only player attackers are limited by the fog of war.
pub fn can_attack(
    state: &State,
    attacker: &Unit,
    target: &Unit,
    vision: Option<&Vision>,
) -> Result<(), Error> {
    if !attacker.can_attack() {
        return Err(Error::AlreadyAttacked);
    }
    if attacker.owner == target.owner {
        return Err(Error::SameOwner);
    }
    let (min, max) = attacker.attack_range();
    let distance = map::distance_hex(attacker.pos, target.pos);
    if distance < min {
        return Err(Error::DistanceIsTooSmall);
    }
    if distance > max {
        return Err(Error::DistanceIsTooBig);
    }
    if !target.is_alive() {
        return Err(Error::UnitIsDead);
    }
    if let Some(vision) = vision {
        if attacker.owner == Faction::Player && !vision.is_unit_visible_to(Faction::Player, target)
        {
            return Err(Error::TargetIsNotVisible);
        }
    }
    Ok(())
}

pub fn damage(state: &State, attacker: &Unit) -> Strength {
    std::cmp::max(state.scenario().min_damage, attacker.damage())
}
