use pretty_assertions::assert_eq;

use crate::core::{
    battle::{
        ai::Ai,
        check,
        combat::{self, AttackResult},
        command::{self, Command},
        component::{ObstacleType, WeaponType},
        event::{self, Event, EventBus},
        execute::{execute, ApplyPhase},
        input,
        movement::{self, MovePoints, Path},
        scenario::{ExactObstacle, ExactUnit, Scenario},
        state::{self, BattleResult},
        vision::Visibility,
        Faction, Id, State, Strength, Turn,
    },
    map::{self, Distance, PosHex},
};

const P: Faction = Faction::Player;
const AI: Faction = Faction::Ai;

trait ScenarioConstructor {
    fn unit(self, owner: Faction, weapon: WeaponType, pos: PosHex) -> Self;
    fn obstacle(self, obstacle: ObstacleType, pos: PosHex) -> Self;
}

impl ScenarioConstructor for Scenario {
    fn unit(mut self, owner: Faction, weapon: WeaponType, pos: PosHex) -> Self {
        self.units.push(ExactUnit { owner, weapon, pos });
        self
    }

    fn obstacle(mut self, obstacle: ObstacleType, pos: PosHex) -> Self {
        self.exact_obstacles.push(ExactObstacle { obstacle, pos });
        self
    }
}

/// No random obstacles and no units.
fn empty_scenario() -> Scenario {
    Scenario {
        obstacle_ratio: 0.0,
        units: Vec::new(),
        ..Scenario::default()
    }
}

/// The base match: one catapult per side at the default spawns.
fn catapult_duel() -> Scenario {
    Scenario {
        obstacle_ratio: 0.0,
        ..Scenario::default()
    }
}

fn debug_state(scenario: Scenario) -> State {
    State::new(scenario).unwrap()
}

fn try_exec(state: &mut State, command: impl Into<Command>) -> Result<Vec<Event>, check::Error> {
    let mut events = Vec::new();
    execute(state, &command.into(), &mut |_state, event, phase| {
        if phase == ApplyPhase::Pre {
            events.push(event.clone());
        }
    })?;
    Ok(events)
}

fn exec(state: &mut State, command: impl Into<Command>) -> Vec<Event> {
    try_exec(state, command).unwrap()
}

fn exec_and_check(state: &mut State, command: impl Into<Command>, expected_events: &[Event]) {
    let events = exec(state, command);
    assert_eq!(events.as_slice(), expected_events);
}

fn move_to(id: i32, pos: PosHex) -> command::MoveTo {
    command::MoveTo { id: Id(id), pos }
}

fn attack(attacker_id: i32, target_id: i32) -> command::Attack {
    command::Attack {
        attacker_id: Id(attacker_id),
        target_id: Id(target_id),
    }
}

fn event_move_to(id: i32, tiles: &[PosHex], cost: i32) -> Event {
    event::MoveTo {
        id: Id(id),
        path: Path::new(tiles.to_vec()),
        cost: MovePoints(cost),
    }
    .into()
}

fn event_attack(attacker_id: i32, target_id: i32, damage: i32, destroyed: bool) -> Event {
    event::Attack {
        attacker_id: Id(attacker_id),
        target_id: Id(target_id),
        damage: Strength(damage),
        destroyed,
    }
    .into()
}

fn event_end_turn(faction: Faction) -> Event {
    event::EndTurn { faction }.into()
}

fn event_begin_turn(faction: Faction, turn: i32) -> Event {
    event::BeginTurn {
        faction,
        turn: Turn(turn),
    }
    .into()
}

fn event_shrink_zone(radius: i32) -> Event {
    event::ShrinkZone {
        radius: Distance(radius),
    }
    .into()
}

/// Ends both turns of the current cycle, the AI does nothing.
fn skip_cycle(state: &mut State) {
    assert_eq!(state.faction(), P);
    exec(state, command::EndTurn);
    exec(state, command::EndTurn);
}

#[test]
fn catapult_duel_to_the_end() {
    let mut state = debug_state(catapult_duel());
    exec_and_check(
        &mut state,
        move_to(0, PosHex::new(0, 2)),
        &[event_move_to(
            0,
            &[
                PosHex::new(-3, 5),
                PosHex::new(-2, 4),
                PosHex::new(-1, 3),
                PosHex::new(0, 2),
            ],
            6,
        )],
    );
    assert_eq!(try_exec(&mut state, attack(0, 1)), Err(check::Error::DistanceIsTooBig));
    exec_and_check(
        &mut state,
        command::EndTurn,
        &[event_end_turn(P), event_begin_turn(AI, 0)],
    );
    exec_and_check(
        &mut state,
        command::EndTurn,
        &[event_end_turn(AI), event_begin_turn(P, 1)],
    );
    exec(&mut state, move_to(0, PosHex::new(3, -1)));
    let target = state.unit(Id(1));
    assert_eq!(map::distance_hex(state.unit(Id(0)).pos, target.pos), Distance(4));
    assert!(state.vision().is_unit_visible_to(P, target));
    exec_and_check(&mut state, attack(0, 1), &[event_attack(0, 1, 35, false)]);
    assert_eq!(state.unit(Id(1)).health, Strength(65));
    skip_cycle(&mut state);
    exec_and_check(&mut state, attack(0, 1), &[event_attack(0, 1, 35, false)]);
    assert_eq!(state.unit(Id(1)).health, Strength(30));
    skip_cycle(&mut state);
    let result = BattleResult {
        winner: P,
        turn: Turn(3),
        enemies_destroyed_by_player: 1,
        survivors: vec![WeaponType::Catapult],
    };
    exec_and_check(
        &mut state,
        attack(0, 1),
        &[
            event_attack(0, 1, 35, true),
            event::EndBattle {
                result: result.clone(),
            }
            .into(),
        ],
    );
    assert!(state.units(AI).is_empty());
    assert!(state.unit_opt(Id(1)).is_none());
    assert!(!state.battlefield().is_occupied(PosHex::new(3, -5)));
    assert_eq!(state.enemies_destroyed_by_player(), 1);
    assert_eq!(state.battle_result(), Some(&result));
    assert_eq!(state::check_victory_condition(&state), Some(P));
    assert_eq!(
        try_exec(&mut state, command::EndTurn),
        Err(check::Error::BattleEnded)
    );
}

#[test]
fn zone_shrinks_every_fifth_turn() {
    let mut state = debug_state(catapult_duel());
    for _ in 0..4 {
        skip_cycle(&mut state);
    }
    assert_eq!(state.turn(), Turn(4));
    exec(&mut state, command::EndTurn);
    exec_and_check(
        &mut state,
        command::EndTurn,
        &[event_end_turn(AI), event_shrink_zone(6), event_begin_turn(P, 5)],
    );
    assert_eq!(state.shrink_radius(), Distance(6));
    for (pos, tile) in state.battlefield().tiles() {
        let distance = map::distance_hex(PosHex::ORIGIN, pos);
        assert_eq!(tile.in_bounds, distance <= Distance(6));
    }
    for _ in 0..10 {
        skip_cycle(&mut state);
    }
    assert_eq!(state.turn(), Turn(15));
    // the floor
    assert_eq!(state.shrink_radius(), Distance(5));
}

#[test]
fn shrink_zone_is_out_of_play() {
    let scenario = empty_scenario()
        .unit(P, WeaponType::Catapult, PosHex::new(-5, 0))
        .unit(AI, WeaponType::Catapult, PosHex::new(5, 0));
    let mut state = debug_state(Scenario {
        shrink_interval: 1,
        ..scenario
    });
    skip_cycle(&mut state);
    assert_eq!(state.shrink_radius(), Distance(6));
    assert_eq!(
        try_exec(&mut state, move_to(0, PosHex::new(-7, 0))),
        Err(check::Error::UnreachablePos)
    );
    skip_cycle(&mut state);
    assert_eq!(state.shrink_radius(), Distance(5));
    let unit = state.unit(Id(0));
    for pos in combat::attack_range(&state, unit) {
        assert!(map::distance_hex(PosHex::ORIGIN, pos) <= Distance(5));
    }
}

#[test]
fn attacking_ends_movement() {
    let scenario = empty_scenario()
        .unit(P, WeaponType::Catapult, PosHex::new(0, 0))
        .unit(AI, WeaponType::Catapult, PosHex::new(0, 3));
    let mut state = debug_state(scenario);
    exec(&mut state, attack(0, 1));
    let unit = state.unit(Id(0));
    assert!(unit.has_attacked);
    assert!(unit.remaining_movement() > MovePoints(0));
    assert!(!unit.can_move());
    assert_eq!(
        try_exec(&mut state, move_to(0, PosHex::new(-1, 0))),
        Err(check::Error::CanNotMove)
    );
    assert_eq!(
        try_exec(&mut state, attack(0, 1)),
        Err(check::Error::AlreadyAttacked)
    );
}

#[test]
fn movement_can_be_split() {
    let mut state = debug_state(catapult_duel());
    exec(&mut state, move_to(0, PosHex::new(-2, 4)));
    assert_eq!(state.unit(Id(0)).remaining_movement(), MovePoints(4));
    exec(&mut state, move_to(0, PosHex::new(0, 2)));
    let unit = state.unit(Id(0));
    assert_eq!(unit.remaining_movement(), MovePoints(0));
    assert!(unit.has_moved);
    assert_eq!(
        try_exec(&mut state, move_to(0, PosHex::new(0, 1))),
        Err(check::Error::CanNotMove)
    );
}

#[test]
fn difficult_terrain_costs_half_a_step() {
    let scenario = empty_scenario()
        .unit(P, WeaponType::Catapult, PosHex::new(0, 0))
        .unit(AI, WeaponType::Catapult, PosHex::new(0, -6))
        .obstacle(ObstacleType::Tree, PosHex::new(1, 0));
    let mut state = debug_state(scenario);
    exec_and_check(
        &mut state,
        move_to(0, PosHex::new(1, 0)),
        &[event_move_to(0, &[PosHex::new(0, 0), PosHex::new(1, 0)], 3)],
    );
    assert_eq!(state.unit(Id(0)).remaining_movement().as_tiles(), 1.5);
}

#[test]
fn rejected_commands_change_nothing() {
    let scenario = empty_scenario()
        .unit(P, WeaponType::Catapult, PosHex::new(0, 0))
        .unit(P, WeaponType::Ballista, PosHex::new(1, 0))
        .unit(AI, WeaponType::Catapult, PosHex::new(0, 3))
        .obstacle(ObstacleType::Castle, PosHex::new(-1, 0));
    let mut state = debug_state(scenario);
    let before = state::snapshot(&state);
    let cases: Vec<(Command, check::Error)> = vec![
        (move_to(2, PosHex::new(0, 2)).into(), check::Error::NotYourTurn),
        (move_to(0, PosHex::new(1, 0)).into(), check::Error::UnreachablePos),
        (move_to(0, PosHex::new(-1, 0)).into(), check::Error::UnreachablePos),
        (move_to(0, PosHex::new(0, 0)).into(), check::Error::UnreachablePos),
        (move_to(0, PosHex::new(9, 0)).into(), check::Error::BadPos),
        (move_to(7, PosHex::new(0, 1)).into(), check::Error::BadActorId),
        (attack(0, 1).into(), check::Error::SameOwner),
        (attack(0, 7).into(), check::Error::BadTargetId),
        (attack(2, 0).into(), check::Error::NotYourTurn),
        (command::SelectUnit { id: Id(2) }.into(), check::Error::CanNotCommandEnemyUnits),
    ];
    for (command, error) in cases {
        assert_eq!(try_exec(&mut state, command), Err(error));
    }
    assert_eq!(state::snapshot(&state), before);
}

#[test]
fn fog_of_war_protects_the_ai() {
    let scenario = empty_scenario()
        .unit(P, WeaponType::Catapult, PosHex::new(0, 0))
        .unit(AI, WeaponType::Catapult, PosHex::new(0, 4));
    let mut state = debug_state(Scenario {
        vision_range: Distance(2),
        ..scenario
    });
    assert_eq!(
        state.vision().visibility(P, PosHex::new(0, 4)),
        Visibility::Unexplored
    );
    assert_eq!(
        try_exec(&mut state, attack(0, 1)),
        Err(check::Error::TargetIsNotVisible)
    );
    exec(&mut state, command::EndTurn);
    // The AI isn't limited by its own fog of war.
    exec(&mut state, attack(1, 0));
    assert_eq!(state.unit(Id(0)).health, Strength(65));
}

#[test]
fn vision_follows_the_units() {
    let mut state = debug_state(Scenario {
        vision_range: Distance(1),
        ..catapult_duel()
    });
    let start = PosHex::new(-3, 5);
    exec(&mut state, move_to(0, PosHex::new(-1, 4)));
    assert_eq!(state.vision().visibility(P, start), Visibility::Explored);
    assert_eq!(
        state.battlefield().tile(start).visibility(P),
        Visibility::Explored
    );
    assert_eq!(
        state.vision().visibility(P, PosHex::new(-1, 3)),
        Visibility::Visible
    );
    assert_eq!(
        state.vision().visibility(AI, start),
        Visibility::Unexplored
    );
}

#[test]
fn turn_switch_resets_the_new_owner() {
    let mut state = debug_state(catapult_duel());
    exec(&mut state, move_to(0, PosHex::new(-2, 4)));
    exec(&mut state, command::SelectUnit { id: Id(0) });
    exec(&mut state, command::EndTurn);
    assert!(state.unit(Id(0)).has_moved);
    assert_eq!(state.selection().unit_id, None);
    exec(&mut state, command::EndTurn);
    let unit = state.unit(Id(0));
    assert!(!unit.has_moved);
    assert_eq!(unit.movement_points_used, MovePoints(0));
}

#[test]
fn selection_tracks_the_unit() {
    let mut state = debug_state(catapult_duel());
    exec(&mut state, command::SelectUnit { id: Id(0) });
    let unit = state.unit(Id(0)).clone();
    let expected_moves = movement::reachable_hexes(
        state.battlefield(),
        unit.pos,
        unit.remaining_movement(),
        state.shrink_radius(),
    );
    assert_eq!(state.selection().unit_id, Some(Id(0)));
    assert_eq!(state.selection().valid_moves, expected_moves);
    assert_eq!(
        state.selection().valid_attacks,
        combat::attack_range(&state, &unit)
    );
    exec(&mut state, move_to(0, PosHex::new(0, 2)));
    assert!(state.selection().valid_moves.is_empty());
    assert!(!state.selection().valid_attacks.is_empty());
}

#[test]
fn input_boundary() {
    let scenario = empty_scenario()
        .unit(P, WeaponType::Catapult, PosHex::new(0, 0))
        .unit(AI, WeaponType::Catapult, PosHex::new(0, 3))
        .unit(AI, WeaponType::Catapult, PosHex::new(0, -3));
    let mut state = debug_state(scenario);
    let mut cb = |_: &State, _: &Event, _: ApplyPhase| {};
    assert!(!input::select_unit_at(&mut state, PosHex::new(0, 3), &mut cb));
    assert!(!input::move_selected_unit_to(&mut state, PosHex::new(1, 0), &mut cb));
    assert_eq!(
        input::attack_at(&mut state, PosHex::new(0, 3), &mut cb),
        AttackResult::failed()
    );
    assert!(input::select_unit_at(&mut state, PosHex::new(0, 0), &mut cb));
    assert_eq!(
        input::attack_at(&mut state, PosHex::new(2, 2), &mut cb),
        AttackResult::failed()
    );
    assert_eq!(
        input::attack_at(&mut state, PosHex::new(0, 3), &mut cb),
        AttackResult {
            success: true,
            damage: Strength(35),
            destroyed: false,
        }
    );
    assert_eq!(
        input::attack_at(&mut state, PosHex::new(0, -3), &mut cb),
        AttackResult::failed()
    );
    assert!(!input::move_selected_unit_to(&mut state, PosHex::new(1, 0), &mut cb));
    assert!(input::end_turn(&mut state, &mut cb));
    assert!(!input::end_turn(&mut state, &mut cb));
    assert_eq!(state.faction(), AI);
}

#[test]
fn select_unit_by_id_is_limited_to_the_player_turn() {
    let mut state = debug_state(catapult_duel());
    let mut cb = |_: &State, _: &Event, _: ApplyPhase| {};
    assert!(!input::select_unit(&mut state, Id(1), &mut cb));
    assert!(!input::select_unit(&mut state, Id(7), &mut cb));
    assert!(input::select_unit(&mut state, Id(0), &mut cb));
    assert_eq!(state.selection().unit_id, Some(Id(0)));
    exec(&mut state, command::EndTurn);
    assert_eq!(state.selection().unit_id, None);
    // not the player's turn
    assert!(!input::select_unit(&mut state, Id(0), &mut cb));
    assert!(!input::select_unit(&mut state, Id(1), &mut cb));
    assert_eq!(state.selection().unit_id, None);
}

#[test]
fn trebuchet_wins_for_the_ai() {
    let scenario = empty_scenario()
        .unit(P, WeaponType::Catapult, PosHex::new(0, 0))
        .unit(AI, WeaponType::Trebuchet, PosHex::new(0, 3));
    let mut state = debug_state(scenario);
    exec(&mut state, command::EndTurn);
    exec_and_check(&mut state, attack(1, 0), &[event_attack(1, 0, 50, false)]);
    assert_eq!(state.unit(Id(0)).health, Strength(50));
    assert_eq!(state::check_victory_condition(&state), None);
    exec(&mut state, command::EndTurn);
    exec(&mut state, command::EndTurn);
    assert_eq!(state.turn(), Turn(1));
    let result = BattleResult {
        winner: AI,
        turn: Turn(1),
        enemies_destroyed_by_player: 0,
        survivors: vec![WeaponType::Trebuchet],
    };
    exec_and_check(
        &mut state,
        attack(1, 0),
        &[
            event_attack(1, 0, 50, true),
            event::EndBattle {
                result: result.clone(),
            }
            .into(),
        ],
    );
    assert!(state.units(P).is_empty());
    assert!(!state.battlefield().is_occupied(PosHex::new(0, 0)));
    assert_eq!(state.enemies_destroyed_by_player(), 0);
    assert_eq!(state.battle_result(), Some(&result));
    assert_eq!(state::check_victory_condition(&state), Some(AI));
    assert_eq!(
        try_exec(&mut state, command::EndTurn),
        Err(check::Error::BattleEnded)
    );
}

#[test]
fn hovered_hex_survives_turns() {
    let mut state = debug_state(catapult_duel());
    state.set_hovered_hex(Some(PosHex::new(2, 2)));
    skip_cycle(&mut state);
    assert_eq!(state.selection().hovered, Some(PosHex::new(2, 2)));
    state.set_hovered_hex(None);
    assert_eq!(state.selection().hovered, None);
}

#[test]
fn ai_turn_notifies_subscribers() {
    use std::{cell::RefCell, rc::Rc};

    let mut state = debug_state(catapult_duel());
    exec(&mut state, move_to(0, PosHex::new(0, 2)));
    exec(&mut state, command::EndTurn);
    let received = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::new();
    {
        let received = received.clone();
        bus.subscribe(move |_, event| received.borrow_mut().push(event.clone()));
    }
    let mut ai = Ai::new(AI, state.battlefield().radius());
    ai.run_turn(&mut state, &mut |state, event, phase| {
        bus.notify(state, event, phase)
    });
    let received = received.borrow();
    match received[0] {
        Event::MoveTo(ref event) => {
            assert_eq!(event.id, Id(1));
            assert_eq!(event.path.to(), PosHex::new(0, -2));
            assert_eq!(event.cost, MovePoints(6));
        }
        ref event => panic!("unexpected event: {:?}", event),
    }
    let expected = vec![
        event_attack(1, 0, 35, false),
        event_end_turn(AI),
        event_begin_turn(P, 1),
    ];
    assert_eq!(received[1..].to_vec(), expected);
}
