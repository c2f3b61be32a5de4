use std::fmt;

use crate::core::{
    battle::{
        execute::ApplyPhase,
        movement::{MovePoints, Path},
        state::BattleResult,
        Faction, Id, State, Strength, Turn,
    },
    map::Distance,
};

#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Event {
    BeginTurn(BeginTurn),
    EndTurn(EndTurn),
    ShrinkZone(ShrinkZone),
    MoveTo(MoveTo),
    Attack(Attack),
    EndBattle(EndBattle),
}

/// The turn has switched to `faction`.
#[derive(Debug, Clone, PartialEq)]
pub struct BeginTurn {
    pub faction: Faction,
    pub turn: Turn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndTurn {
    pub faction: Faction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShrinkZone {
    pub radius: Distance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveTo {
    pub id: Id,

    /// The whole route, `path.from()` is the old position.
    pub path: Path,

    pub cost: MovePoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    pub attacker_id: Id,
    pub target_id: Id,
    pub damage: Strength,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndBattle {
    pub result: BattleResult,
}

pub type Subscriber = Box<dyn FnMut(&State, &Event)>;

/// Fire-and-forget notifications for audio, UI and persistence.
///
/// Owned by whoever runs the match, there's no global instance.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&State, &Event) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, state: &State, event: &Event) {
        for subscriber in &mut self.subscribers {
            subscriber(state, event);
        }
    }

    /// Plugs into `execute`'s callback: subscribers only see applied events.
    pub fn notify(&mut self, state: &State, event: &Event, phase: ApplyPhase) {
        if phase == ApplyPhase::Post {
            self.publish(state, event);
        }
    }
}
