//! Decision Policy
//!
//! Epsilon-greedy action choice over a random subset of the action catalog,
//! scored by learned value, hunger and personal goal.

use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::actions::Action;
use crate::components::agent::{Agent, MAX_STAT};
use crate::components::memory::StateActionKey;
use crate::config::LearningConfig;

/// What an agent chose to do this tick.
///
/// `T` is whatever handle the caller uses for other agents: an entity in the
/// running simulation, an index in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision<T> {
    pub action: Action,
    pub target: Option<T>,
    /// True when the action was drawn at random rather than scored
    pub explored: bool,
}

impl Agent {
    /// Whether other agents may pick this one as an interaction target
    pub fn can_be_targeted(&self) -> bool {
        self.is_active() && !self.is_dependent()
    }
}

/// Score of one candidate action in the agent's current state
pub fn score_candidate(agent: &Agent, action: Action, learning: &LearningConfig) -> f64 {
    let key = StateActionKey::new(agent.position, agent.sustenance, agent.reputation, action);
    let learned = agent.memory.value(&key);
    let hunger = (MAX_STAT - agent.sustenance) * learning.sustenance_weight;
    let purpose = if agent.goal.rewards(action) {
        learning.purpose_bonus()
    } else {
        0.0
    };
    learned + hunger + purpose
}

/// The candidate with the strictly highest score; ties keep the earliest.
pub fn pick_best(
    agent: &Agent,
    candidates: impl IntoIterator<Item = Action>,
    learning: &LearningConfig,
) -> Option<Action> {
    let mut best: Option<(Action, f64)> = None;
    for action in candidates {
        let score = score_candidate(agent, action, learning);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((action, score)),
        }
    }
    best.map(|(action, _)| action)
}

/// Choose an action for `agent` and one of `targets` to aim it at.
///
/// `targets` must already hold only eligible agents, in a stable order.
/// Draws, in order: the target, the exploration gate, then either one
/// uniform action or a sample of distinct action indices.
pub fn decide_action<R: Rng, T: Copy>(
    rng: &mut R,
    agent: &Agent,
    targets: &[T],
    learning: &LearningConfig,
) -> Decision<T> {
    let target = targets.choose(rng).copied();

    if rng.gen::<f64>() < agent.exploration_rate() {
        return Decision {
            action: Action::random(rng),
            target,
            explored: true,
        };
    }

    let amount = learning.sample_size.min(Action::ALL.len());
    let sampled = index::sample(rng, Action::ALL.len(), amount);
    let action = pick_best(agent, sampled.iter().map(|i| Action::ALL[i]), learning)
        .unwrap_or_else(|| Action::random(rng));

    Decision {
        action,
        target,
        explored: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{AgentId, Departure, LifeStage, PersonalGoal};
    use crate::components::world::Position;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn population(rng: &mut SmallRng) -> Vec<Agent> {
        vec![
            Agent::new(AgentId::random(rng), "Leo", "Male", 25, Position::new(1, 1)),
            Agent::new(AgentId::random(rng), "Clara", "Female", 22, Position::new(9, 9)),
            Agent::new(AgentId::random(rng), "Anya_12", "Female", 0, Position::new(9, 9))
                .with_stage(LifeStage::Dependent),
        ]
    }

    /// Indices of everyone `actor` may aim at
    fn targets_of(actor: usize, agents: &[Agent]) -> Vec<usize> {
        (0..agents.len())
            .filter(|&i| i != actor && agents[i].can_be_targeted())
            .collect()
    }

    #[test]
    fn test_target_excludes_self_dependents_and_departed() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut agents = population(&mut rng);
        assert!(!agents[2].can_be_targeted());
        assert_eq!(targets_of(0, &agents), vec![1]);
        assert_eq!(targets_of(1, &agents), vec![0]);

        agents[1].departure = Some(Departure::Exited);
        let targets = targets_of(0, &agents);
        assert!(targets.is_empty());

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let decision = decide_action(&mut rng, &agents[0], &targets, &LearningConfig::default());
            assert_eq!(decision.target, None);
        }
    }

    #[test]
    fn test_full_confidence_never_explores() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut agents = population(&mut rng);
        agents[0].self_confidence = 100.0;

        let targets = targets_of(0, &agents);
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let decision = decide_action(&mut rng, &agents[0], &targets, &LearningConfig::default());
            assert!(!decision.explored);
            assert_eq!(decision.target, Some(1));
        }
    }

    #[test]
    fn test_zero_confidence_always_explores() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut agents = population(&mut rng);
        agents[0].self_confidence = 0.0;

        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert!(decide_action(&mut rng, &agents[0], &[1usize], &LearningConfig::default()).explored);
        }
    }

    #[test]
    fn test_full_sample_picks_learned_best() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut agents = population(&mut rng);
        let leo = &mut agents[0];
        leo.self_confidence = 100.0;
        let key = StateActionKey::new(leo.position, leo.sustenance, leo.reputation, Action::GoToMarket);
        leo.memory.set(key, 70.0);

        let learning = LearningConfig {
            sample_size: 13,
            ..LearningConfig::default()
        };
        let decision = decide_action(&mut rng, &agents[0], &targets_of(0, &agents), &learning);
        assert_eq!(decision.action, Action::GoToMarket);
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let mut rng = SmallRng::seed_from_u64(7);
        let agents = population(&mut rng);
        let learning = LearningConfig::default();

        let picked = pick_best(&agents[0], [Action::ShareBelief, Action::MoveNorth, Action::GoToMarket], &learning);
        assert_eq!(picked, Some(Action::ShareBelief));
        assert_eq!(pick_best(&agents[0], Vec::new(), &learning), None);
    }

    #[test]
    fn test_purpose_bonus_favors_exit() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut agents = population(&mut rng);
        agents[0].goal = PersonalGoal::DiscoverTrueLimits;
        agents[0].sustenance = 40.0;
        let learning = LearningConfig::default();

        // default 10 + hunger 60 + purpose 20
        assert!((score_candidate(&agents[0], Action::AttemptExit, &learning) - 90.0).abs() < 1e-9);
        assert!((score_candidate(&agents[0], Action::MoveEast, &learning) - 70.0).abs() < 1e-9);
        assert_eq!(
            pick_best(&agents[0], [Action::MoveEast, Action::AttemptExit], &learning),
            Some(Action::AttemptExit)
        );
    }

    #[test]
    fn test_same_seed_same_decision() {
        let mut rng = SmallRng::seed_from_u64(9);
        let agents = population(&mut rng);
        let learning = LearningConfig::default();

        let targets = targets_of(1, &agents);
        let a = decide_action(&mut SmallRng::seed_from_u64(77), &agents[1], &targets, &learning);
        let b = decide_action(&mut SmallRng::seed_from_u64(77), &agents[1], &targets, &learning);
        assert_eq!(a, b);
    }
}
