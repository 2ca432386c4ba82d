//! Direction selector
//!
//! Five movement states: two sub-variants for each horizontal heading and one
//! for descending. The sub-variants only exist to weight "keep going" against
//! "descend" when a roll is coerced, so the walk mostly reasons about the
//! compressed [`Heading`].
//!
//! Coercion table applied to a uniform 5-way roll after a horizontal move:
//!
//! | heading | roll          | result      |
//! |---------|---------------|-------------|
//! | Right   | LeftPrimary   | RightAlt    |
//! | Right   | LeftAlt       | Down        |
//! | Left    | RightPrimary  | LeftAlt     |
//! | Left    | RightAlt      | Down        |
//!
//! Every other roll stands. After a descent any roll stands.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::cursor::{Bounds, Cursor};
use crate::rng::WalkRng;

/// Raw movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Direction {
    RightPrimary,
    RightAlt,
    LeftPrimary,
    LeftAlt,
    Down,
}

/// Compressed view of [`Direction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Heading {
    Right,
    Left,
    Down,
}

impl Direction {
    /// Roll order; a roll of `n` maps to `ALL[n]`
    pub const ALL: [Direction; 5] = [
        Direction::RightPrimary,
        Direction::RightAlt,
        Direction::LeftPrimary,
        Direction::LeftAlt,
        Direction::Down,
    ];

    pub const fn heading(self) -> Heading {
        match self {
            Direction::RightPrimary | Direction::RightAlt => Heading::Right,
            Direction::LeftPrimary | Direction::LeftAlt => Heading::Left,
            Direction::Down => Heading::Down,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Direction::Down)
    }

    /// Uniform pick among all five states
    pub fn roll<R: WalkRng>(rng: &mut R) -> Direction {
        Self::ALL[rng.rn2(Self::ALL.len() as u32) as usize]
    }

    /// Apply the no-reversal table to a roll taken after moving along `heading`
    pub const fn coerce(heading: Heading, roll: Direction) -> Direction {
        match (heading, roll) {
            (Heading::Right, Direction::LeftPrimary) => Direction::RightAlt,
            (Heading::Right, Direction::LeftAlt) => Direction::Down,
            (Heading::Left, Direction::RightPrimary) => Direction::LeftAlt,
            (Heading::Left, Direction::RightAlt) => Direction::Down,
            (_, roll) => roll,
        }
    }
}

/// What the selector decided for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move one cell along the heading
    Move(Heading),
    /// Horizontal edge reached: switch to `Down` without moving
    ForcedDown,
    /// Descent requested at the bottom edge: the walk is over
    Terminate,
}

/// Decide this step's move from the current state. Consumes no randomness.
pub fn select(current: Direction, cursor: &Cursor, bounds: &Bounds) -> Transition {
    let heading = current.heading();
    if cursor.can_advance(heading, bounds) {
        return Transition::Move(heading);
    }
    match heading {
        Heading::Down => Transition::Terminate,
        Heading::Right | Heading::Left => Transition::ForcedDown,
    }
}

/// Roll the state for the next step after a move along `heading`
pub fn reroll<R: WalkRng>(heading: Heading, rng: &mut R) -> Direction {
    Direction::coerce(heading, Direction::roll(rng))
}
