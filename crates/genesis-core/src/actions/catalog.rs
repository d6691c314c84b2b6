//! Action Catalog
//!
//! The thirteen discrete action codes. Codes are stable: they appear in
//! value-memory keys and in logged decisions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::movement::Direction;

/// Discrete actions available to every non-dependent agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    MoveNorth,
    MoveSouth,
    MoveEast,
    MoveWest,
    GoToMarket,
    MeditateAndSleep,
    ReflectDeeply,
    CommitTheft,
    BuildAlliance,
    SeekRelationship,
    AttemptReproduction,
    ShareBelief,
    AttemptExit,
}

impl Action {
    /// Every action, ordered by code.
    pub const ALL: [Action; 13] = [
        Action::MoveNorth,
        Action::MoveSouth,
        Action::MoveEast,
        Action::MoveWest,
        Action::GoToMarket,
        Action::MeditateAndSleep,
        Action::ReflectDeeply,
        Action::CommitTheft,
        Action::BuildAlliance,
        Action::SeekRelationship,
        Action::AttemptReproduction,
        Action::ShareBelief,
        Action::AttemptExit,
    ];

    /// Numeric action code (0-12)
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<Action> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::MoveNorth => "Move_North",
            Action::MoveSouth => "Move_South",
            Action::MoveEast => "Move_East",
            Action::MoveWest => "Move_West",
            Action::GoToMarket => "Go_to_Market",
            Action::MeditateAndSleep => "Meditate_and_Sleep",
            Action::ReflectDeeply => "Reflect_Deeply",
            Action::CommitTheft => "Commit_Theft",
            Action::BuildAlliance => "Build_Alliance",
            Action::SeekRelationship => "Seek_Relationship",
            Action::AttemptReproduction => "Attempt_Reproduction",
            Action::ShareBelief => "Share_Belief",
            Action::AttemptExit => "Attempt_Exit",
        }
    }

    /// Direction for the four movement actions
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Action::MoveNorth => Some(Direction::North),
            Action::MoveSouth => Some(Direction::South),
            Action::MoveEast => Some(Direction::East),
            Action::MoveWest => Some(Direction::West),
            _ => None,
        }
    }

    /// Uniformly random action
    pub fn random<R: Rng>(rng: &mut R) -> Action {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_codes_match_positions() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.code() as usize, i);
            assert_eq!(Action::from_code(i as u8), Some(*action));
        }
        assert_eq!(Action::from_code(13), None);
        assert_eq!(Action::AttemptExit.code(), 12);
        assert_eq!(Action::GoToMarket.code(), 4);
    }

    #[test]
    fn test_only_moves_have_directions() {
        let moves = Action::ALL.iter().filter(|a| a.direction().is_some()).count();
        assert_eq!(moves, 4);
        assert_eq!(Action::MoveNorth.direction(), Some(Direction::North));
        assert_eq!(Action::ShareBelief.direction(), None);
    }

    #[test]
    fn test_random_covers_action_set() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(Action::random(&mut rng));
        }
        assert_eq!(seen.len(), Action::ALL.len());
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Action::GoToMarket.to_string(), "Go_to_Market");
    }
}
