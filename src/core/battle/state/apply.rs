use log::{info, trace};

use crate::core::battle::{
    event::{self, Event},
    state::{self, State},
    Faction,
};

pub fn apply(state: &mut State, event: &Event) {
    trace!("event::apply: {:?}", event);
    match *event {
        Event::BeginTurn(ref ev) => apply_event_begin_turn(state, ev),
        Event::EndTurn(ref ev) => apply_event_end_turn(state, ev),
        Event::ShrinkZone(ref ev) => apply_event_shrink_zone(state, ev),
        Event::MoveTo(ref ev) => apply_event_move_to(state, ev),
        Event::Attack(ref ev) => apply_event_attack(state, ev),
        Event::EndBattle(ref ev) => apply_event_end_battle(state, ev),
    }
}

fn apply_event_begin_turn(state: &mut State, event: &event::BeginTurn) {
    info!("turn {}: {}", event.turn.0, event.faction);
    state.set_faction(event.faction);
    state.set_turn(event.turn);
    for unit in state.units_mut(event.faction) {
        unit.reset_turn_actions();
    }
    state.selection_mut().clear();
    state.update_vision();
}

fn apply_event_end_turn(state: &mut State, event: &event::EndTurn) {
    assert_eq!(state.faction(), event.faction);
    state.selection_mut().clear();
}

fn apply_event_shrink_zone(state: &mut State, event: &event::ShrinkZone) {
    info!("the playable zone shrinks to {}", event.radius.0);
    state.set_shrink_radius(event.radius);
    state.battlefield_mut().update_in_bounds(event.radius);
}

fn apply_event_move_to(state: &mut State, event: &event::MoveTo) {
    let from = event.path.from();
    let to = event.path.to();
    {
        let unit = state.unit_mut(event.id);
        assert_eq!(unit.pos, from);
        unit.pos = to;
        unit.movement_points_used.0 += event.cost.0;
        unit.has_moved = true;
    }
    let battlefield = state.battlefield_mut();
    battlefield.clear_occupant(from);
    battlefield.set_occupant(to, event.id);
    state.update_vision();
    state::refresh_selection(state);
}

fn apply_event_attack(state: &mut State, event: &event::Attack) {
    let attacker_owner = {
        let attacker = state.unit_mut(event.attacker_id);
        attacker.has_attacked = true;
        attacker.owner
    };
    let target = state.unit_mut(event.target_id);
    target.take_damage(event.damage);
    assert_eq!(target.is_alive(), !event.destroyed);
    if event.destroyed {
        let target = state.remove_unit(event.target_id);
        info!("{:?} of the {} is destroyed", target.weapon, target.owner);
        state.battlefield_mut().clear_occupant(target.pos);
        if state.selection().unit_id == Some(target.id) {
            state.selection_mut().clear();
        }
        if attacker_owner == Faction::Player && target.owner == Faction::Ai {
            state.add_destroyed_enemy();
        }
        state.update_vision();
    }
    state::refresh_selection(state);
}

fn apply_event_end_battle(state: &mut State, event: &event::EndBattle) {
    info!(
        "the battle is over: {} wins on turn {}",
        event.result.winner, event.result.turn.0
    );
    state.set_battle_result(event.result.clone());
}
