use std::{env, process};

use log::{error, info};

use siegehex::{
    core::battle::{
        ai::Ai,
        event::{Event, EventBus},
        scenario::Scenario,
        Faction, State,
    },
    error::Result,
    utils,
};

/// Greedy policies can circle each other forever.
const MAX_TURNS: i32 = 100;

fn load_scenario() -> Result<Scenario> {
    match env::args().nth(1) {
        Some(path) => {
            info!("Loading the scenario from '{}'", path);
            utils::deserialize_from_file(path)
        }
        None => Ok(Scenario::default()),
    }
}

fn log_event(state: &State, event: &Event) {
    match *event {
        Event::MoveTo(ref ev) => info!(
            "{:?} moves {} -> {} ({} tiles)",
            ev.id,
            ev.path.from(),
            ev.path.to(),
            ev.cost.as_tiles()
        ),
        Event::Attack(ref ev) => {
            let health = state.unit_opt(ev.target_id).map_or(0, |unit| unit.health.0);
            info!(
                "{:?} hits {:?} for {}, {} health left",
                ev.attacker_id, ev.target_id, ev.damage.0, health
            );
        }
        Event::EndBattle(ref ev) => info!(
            "{} wins, {} enemies destroyed by the player",
            ev.result.winner, ev.result.enemies_destroyed_by_player
        ),
        Event::BeginTurn(_) | Event::EndTurn(_) | Event::ShrinkZone(_) => {}
    }
}

fn run() -> Result {
    let scenario = load_scenario()?;
    let mut state = State::new(scenario)?;
    let radius = state.battlefield().radius();
    let mut ais = [Ai::new(Faction::Player, radius), Ai::new(Faction::Ai, radius)];
    let mut bus = EventBus::new();
    bus.subscribe(log_event);
    while state.battle_result().is_none() && state.turn().0 < MAX_TURNS {
        let ai = &mut ais[state.faction().index()];
        ai.run_turn(&mut state, &mut |state, event, phase| {
            bus.notify(state, event, phase)
        });
    }
    if state.battle_result().is_none() {
        info!("No winner after {} turns", MAX_TURNS);
    }
    Ok(())
}

fn main() {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();
    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}
