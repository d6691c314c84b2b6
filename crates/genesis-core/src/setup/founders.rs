//! Founder Setup
//!
//! The three founders every run starts with.

use rand::Rng;

use crate::components::agent::{Agent, AgentId, PersonalGoal};
use crate::components::world::Position;
use crate::config::Config;

/// Static description of a founder
#[derive(Debug, Clone, Copy)]
pub struct FounderSpec {
    pub name: &'static str,
    pub gender: &'static str,
    pub age_years: u32,
    pub position: (i32, i32),
    pub goal: PersonalGoal,
    pub tir: f64,
}

impl FounderSpec {
    /// Build the agent, drawing its id from `rng`
    pub fn spawn<R: Rng>(&self, rng: &mut R, config: &Config) -> Agent {
        let (x, y) = self.position;
        Agent::new(AgentId::random(rng), self.name, self.gender, self.age_years, Position::new(x, y))
            .with_goal(self.goal)
            .with_tir(self.tir)
            .with_memory(config.agents.memory_cap, config.learning.default_utility)
            .with_max_health(config.agents.max_health)
    }
}

pub const FOUNDERS: [FounderSpec; 3] = [
    // A status-seeker starting in the south-west corner, firmly compliant
    FounderSpec {
        name: "Leo",
        gender: "Male",
        age_years: 25,
        position: (1, 1),
        goal: PersonalGoal::AcquireWealthAndStatus,
        tir: 85.0,
    },
    // Looking for a partner from the far corner
    FounderSpec {
        name: "Clara",
        gender: "Female",
        age_years: 22,
        position: (9, 9),
        goal: PersonalGoal::FindLoveAndPartner,
        tir: 60.0,
    },
    // The dissenter, born on the market cell and drawn to the exit
    FounderSpec {
        name: "Elara",
        gender: "Female",
        age_years: 30,
        position: (5, 5),
        goal: PersonalGoal::DiscoverTrueLimits,
        tir: 5.0,
    },
];

/// Spawn the founding population in a fixed order.
///
/// Founders placed outside a smaller configured grid are pulled onto its
/// nearest edge cell.
pub fn founding_population<R: Rng>(rng: &mut R, config: &Config) -> Vec<Agent> {
    let edge = config.world.grid_size.max(1) - 1;
    FOUNDERS
        .iter()
        .map(|spec| {
            let mut agent = spec.spawn(rng, config);
            agent.position = Position::new(agent.position.x.clamp(0, edge), agent.position.y.clamp(0, edge));
            agent
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_founders() {
        let mut rng = SmallRng::seed_from_u64(42);
        let agents = founding_population(&mut rng, &Config::default());

        let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Leo", "Clara", "Elara"]);
        assert_eq!(agents[0].position, Position::new(1, 1));
        assert_eq!(agents[1].tir, 60.0);
        assert_eq!(agents[2].goal, PersonalGoal::DiscoverTrueLimits);
        assert_eq!(agents[2].tir, 5.0);
        assert!(agents.iter().all(|a| a.memory.capacity() == 500 && a.is_active()));
    }

    #[test]
    fn test_founders_fit_small_grid() {
        let mut config = Config::default();
        config.world.grid_size = 4;
        config.world.market_x = 2;
        config.world.market_y = 2;

        let mut rng = SmallRng::seed_from_u64(1);
        let agents = founding_population(&mut rng, &config);
        assert_eq!(agents[1].position, Position::new(3, 3));
        assert_eq!(agents[2].position, Position::new(3, 3));
    }
}
