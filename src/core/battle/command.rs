use crate::core::{battle::Id, map::PosHex};

#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Command {
    SelectUnit(SelectUnit),
    MoveTo(MoveTo),
    Attack(Attack),
    EndTurn(EndTurn),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectUnit {
    pub id: Id,
}

/// Moves straight to the destination, the route is up to the pathfinder.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveTo {
    pub id: Id,
    pub pos: PosHex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    pub attacker_id: Id,
    pub target_id: Id,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndTurn;
