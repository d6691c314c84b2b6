//! Lifecycle System
//!
//! Aging and decay, maturation of dependents, grief, bonding and reproduction.

use genesis_events::EventCategory;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::{
    clamp_stat, Agent, AgentId, Departure, LifeStage, PersonalGoal, MAX_STAT,
};
use crate::config::AgentConfig;
use crate::events::EventSink;

/// Constants for aging, grief and reproduction
pub mod lifecycle_constants {
    /// Health lost per tick before old age
    pub const BASE_HEALTH_DECAY: f64 = 0.05;
    /// Age after which health decay accelerates
    pub const ELDER_AGE: u32 = 60;
    /// Extra health decay per tick for each year past `ELDER_AGE`
    pub const ELDER_DECAY_PER_YEAR: f64 = 0.02;
    /// Sustenance lost per tick
    pub const SUSTENANCE_DECAY: f64 = 0.005;
    /// Mood penalty for losing a member of the community
    pub const COMMUNITY_GRIEF: f64 = 15.0;
    /// Mood penalty for losing a bonded partner
    pub const PARTNER_GRIEF: f64 = 40.0;
    /// Maximum distance at which two agents can bond
    pub const BONDING_DISTANCE: f64 = 1.0;
    pub const CHILD_NAMES: [&str; 5] = ["Anya", "Kael", "Zora", "Elias", "Nomi"];
    pub const CHILD_GENDERS: [&str; 2] = ["Male", "Female"];
}

use lifecycle_constants::*;

impl Agent {
    /// Health lost per tick at the agent's current age
    pub fn health_decay_rate(&self) -> f64 {
        if self.age_years > ELDER_AGE {
            BASE_HEALTH_DECAY + (self.age_years - ELDER_AGE) as f64 * ELDER_DECAY_PER_YEAR
        } else {
            BASE_HEALTH_DECAY
        }
    }

    /// Apply one tick of decay and aging.
    ///
    /// Returns true if the agent died; it is then marked `Deceased` and its
    /// turn counter is left untouched.
    pub fn apply_aging_and_decay<R: Rng>(
        &mut self,
        config: &AgentConfig,
        rng: &mut R,
        tick: u64,
        sink: &mut dyn EventSink,
    ) -> bool {
        self.change_health(-self.health_decay_rate());
        self.change_sustenance(-SUSTENANCE_DECAY);

        if self.health <= 0.0 || self.sustenance <= 0.0 {
            sink.record(self.event(
                tick,
                EventCategory::Mortality,
                format!(
                    "Died due to health ({:.2}) or sustenance ({:.2})",
                    self.health, self.sustenance
                ),
            ));
            self.departure = Some(Departure::Deceased);
            return true;
        }

        self.turns_survived += 1;
        if config.ticks_per_year > 0 && self.turns_survived % config.ticks_per_year == 0 {
            self.age_years += 1;
            sink.record(self.event(
                tick,
                EventCategory::AgeUp,
                format!("Now {} years old.", self.age_years),
            ));
            let pruned = self.memory.prune(rng);
            if pruned > 0 {
                sink.record(self.event(
                    tick,
                    EventCategory::Optimization,
                    format!("Pruned {} utility entries.", pruned),
                ));
            }
        }

        self.clamp_stats();
        false
    }

    /// Advance a dependent by one tick. Returns true on the tick it matures.
    pub fn advance_dependency(&mut self, config: &AgentConfig, tick: u64, sink: &mut dyn EventSink) -> bool {
        if !self.is_dependent() {
            return false;
        }
        self.turns_survived += 1;
        if self.turns_survived < config.maturation_ticks {
            return false;
        }

        self.stage = LifeStage::Single;
        // Age never decreases, so an older dependent keeps its age
        self.age_years = self.age_years.max(config.juvenile_age);
        sink.record(self.event(tick, EventCategory::Milestone, format!("{} matured", self.name)));
        true
    }

    /// React to another agent leaving the population.
    ///
    /// Returns the mood penalty applied; health drops by half of it.
    pub fn grieve_loss(&mut self, departed: &Agent, tick: u64, sink: &mut dyn EventSink) -> f64 {
        let penalty = if self.is_partner_of(departed) {
            self.stage = LifeStage::Grieving;
            self.partner = None;
            self.goal = PersonalGoal::RecoveryAndSolitude;
            sink.record(self.event(
                tick,
                EventCategory::Trauma,
                format!("Lost partner {}. Now grieving.", departed.name),
            ));
            PARTNER_GRIEF
        } else {
            sink.record(self.event(
                tick,
                EventCategory::CommunityLoss,
                format!("Sad about {}'s passing.", departed.name),
            ));
            COMMUNITY_GRIEF
        };

        self.change_mood(-penalty);
        self.change_health(-penalty / 2.0);
        penalty
    }

    /// Whether the two agents are free and close enough to bond
    pub fn can_bond_with(&self, other: &Agent) -> bool {
        let free = |a: &Agent| {
            a.partner.is_none() && matches!(a.stage, LifeStage::Single | LifeStage::Grieving)
        };
        self.id != other.id
            && free(self)
            && free(other)
            && self.position.distance(&other.position) <= BONDING_DISTANCE
    }

    /// Bond with another agent; both become partnered
    pub fn bond_with(&mut self, other: &mut Agent, tick: u64, sink: &mut dyn EventSink) {
        self.partner = Some(other.id);
        other.partner = Some(self.id);
        self.stage = LifeStage::Partnered;
        other.stage = LifeStage::Partnered;
        sink.record(self.event(
            tick,
            EventCategory::Relationship,
            format!("Bonded with {}", other.name),
        ));
    }

    /// Produce a dependent child with `partner`.
    ///
    /// The child starts on this agent's cell with the mean TiR of both parents.
    pub fn create_child<R: Rng>(
        &mut self,
        partner: &Agent,
        rng: &mut R,
        tick: u64,
        sink: &mut dyn EventSink,
    ) -> Agent {
        let base_name = CHILD_NAMES.choose(rng).copied().unwrap_or("Anya");
        let child_name = format!("{}_{}", base_name, rng.gen_range(10..=99));
        let gender = CHILD_GENDERS.choose(rng).copied().unwrap_or("Female");
        let goal = PersonalGoal::CHILD_GOALS
            .choose(rng)
            .copied()
            .unwrap_or_default();

        let cap = self.max_health();
        let initial_health = clamp_stat(cap + (self.reputation + partner.reputation) / 5.0, cap);

        let mut child = Agent::new(AgentId::random(rng), child_name, gender, 0, self.position)
            .with_stage(LifeStage::Dependent)
            .with_goal(goal)
            .with_tir((self.tir + partner.tir) / 2.0)
            .with_memory(self.memory.capacity(), self.memory.default_value())
            .with_max_health(cap);
        child.health = initial_health;
        child.sustenance = clamp_stat(initial_health, MAX_STAT);

        self.progeny_count += 1;
        sink.record(self.event(
            tick,
            EventCategory::Reproduction,
            format!("Created {} (health={:.1})", child.name, child.health),
        ));
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::world::Position;
    use crate::events::{NullSink, TickEvents};
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(17)
    }

    fn agent(rng: &mut SmallRng, name: &str, age: u32) -> Agent {
        Agent::new(AgentId::random(rng), name, "Female", age, Position::new(2, 2))
    }

    #[test]
    fn test_health_decay_rate() {
        let mut rng = rng();
        assert_eq!(agent(&mut rng, "Young", 30).health_decay_rate(), 0.05);
        assert_eq!(agent(&mut rng, "Sixty", 60).health_decay_rate(), 0.05);
        let elder = agent(&mut rng, "Elder", 70);
        assert!((elder.health_decay_rate() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_decay_applies_once_per_tick() {
        let mut rng = rng();
        let mut sink = TickEvents::new();
        let mut leo = agent(&mut rng, "Leo", 25);

        let died = leo.apply_aging_and_decay(&AgentConfig::default(), &mut rng, 1, &mut sink);
        assert!(!died);
        assert!((leo.health - 99.95).abs() < 1e-9);
        assert!((leo.sustenance - 99.995).abs() < 1e-9);
        assert_eq!(leo.turns_survived, 1);
    }

    #[test]
    fn test_starvation_kills() {
        let mut rng = rng();
        let mut sink = TickEvents::new();
        let mut leo = agent(&mut rng, "Leo", 25);
        leo.sustenance = 0.004;

        assert!(leo.apply_aging_and_decay(&AgentConfig::default(), &mut rng, 9, &mut sink));
        assert_eq!(leo.departure, Some(Departure::Deceased));
        assert_eq!(leo.turns_survived, 0);
        assert_eq!(sink.count(EventCategory::Mortality), 1);
    }

    #[test]
    fn test_age_up_prunes_memory() {
        use crate::actions::Action;
        use crate::components::memory::StateActionKey;

        let mut rng = rng();
        let mut sink = TickEvents::new();
        let config = AgentConfig {
            ticks_per_year: 3,
            ..AgentConfig::default()
        };
        let mut leo = agent(&mut rng, "Leo", 25).with_memory(2, 10.0);
        for x in 0..6 {
            leo.memory
                .set(StateActionKey::new(Position::new(x, 0), 90.0, 90.0, Action::MoveEast), 1.0);
        }

        for tick in 1..=3 {
            leo.apply_aging_and_decay(&config, &mut rng, tick, &mut sink);
        }

        assert_eq!(leo.age_years, 26);
        assert_eq!(leo.memory.len(), 2);
        assert_eq!(sink.count(EventCategory::AgeUp), 1);
        assert_eq!(sink.count(EventCategory::Optimization), 1);
    }

    #[test]
    fn test_dependent_matures_at_threshold() {
        let mut rng = rng();
        let mut sink = TickEvents::new();
        let config = AgentConfig {
            maturation_ticks: 4,
            ..AgentConfig::default()
        };
        let mut child = agent(&mut rng, "Nomi_12", 0).with_stage(LifeStage::Dependent);

        for tick in 1..4 {
            assert!(!child.advance_dependency(&config, tick, &mut sink));
            assert!(child.is_dependent());
        }
        assert!(child.advance_dependency(&config, 4, &mut sink));
        assert_eq!(child.stage, LifeStage::Single);
        assert_eq!(child.age_years, 10);
        assert_eq!(child.turns_survived, 4);
        assert_eq!(sink.count(EventCategory::Milestone), 1);
    }

    #[test]
    fn test_community_grief() {
        let mut rng = rng();
        let mut sink = TickEvents::new();
        let mut clara = agent(&mut rng, "Clara", 22);
        let leo = agent(&mut rng, "Leo", 25);

        let penalty = clara.grieve_loss(&leo, 3, &mut sink);
        assert_eq!(penalty, 15.0);
        assert_eq!(clara.mood, 65.0);
        assert_eq!(clara.health, 92.5);
        assert_eq!(clara.stage, LifeStage::Single);
        assert_eq!(sink.count(EventCategory::CommunityLoss), 1);
    }

    #[test]
    fn test_partner_grief() {
        let mut rng = rng();
        let mut sink = TickEvents::new();
        let mut clara = agent(&mut rng, "Clara", 22);
        let mut leo = agent(&mut rng, "Leo", 25);
        clara.bond_with(&mut leo, 1, &mut sink);

        let penalty = clara.grieve_loss(&leo, 2, &mut sink);
        assert_eq!(penalty, 40.0);
        assert_eq!(clara.mood, 40.0);
        assert_eq!(clara.health, 80.0);
        assert_eq!(clara.stage, LifeStage::Grieving);
        assert_eq!(clara.partner, None);
        assert_eq!(clara.goal, PersonalGoal::RecoveryAndSolitude);
        assert_eq!(sink.count(EventCategory::Trauma), 1);
    }

    #[test]
    fn test_bonding_rules() {
        let mut rng = rng();
        let mut sink = TickEvents::new();
        let mut clara = agent(&mut rng, "Clara", 22);
        let mut leo = agent(&mut rng, "Leo", 25);
        let mut far = agent(&mut rng, "Far", 25);
        far.position = Position::new(7, 7);
        let child = agent(&mut rng, "Kael_50", 0).with_stage(LifeStage::Dependent);

        assert!(clara.can_bond_with(&leo));
        assert!(!clara.can_bond_with(&far));
        assert!(!clara.can_bond_with(&child));
        assert!(!clara.can_bond_with(&clara.clone()));

        clara.bond_with(&mut leo, 1, &mut sink);
        assert!(clara.is_partner_of(&leo));
        assert!(leo.is_partner_of(&clara));
        assert_eq!(leo.stage, LifeStage::Partnered);
        assert!(!clara.can_bond_with(&leo));
    }

    #[test]
    fn test_create_child() {
        let mut rng = rng();
        let mut sink = TickEvents::new();
        let mut leo = agent(&mut rng, "Leo", 25).with_tir(85.0).with_memory(300, 10.0);
        let clara = agent(&mut rng, "Clara", 22).with_tir(60.0);

        let child = leo.create_child(&clara, &mut rng, 5, &mut sink);

        assert_eq!(child.stage, LifeStage::Dependent);
        assert_eq!(child.age_years, 0);
        assert_eq!(child.position, leo.position);
        assert_eq!(child.tir, 72.5);
        assert_eq!(child.health, 100.0);
        assert_eq!(child.sustenance, 100.0);
        assert_eq!(child.memory.capacity(), 300);
        assert!(PersonalGoal::CHILD_GOALS.contains(&child.goal));
        assert!(CHILD_NAMES.iter().any(|n| child.name.starts_with(n)));
        assert_ne!(child.id, leo.id);
        assert_eq!(leo.progeny_count, 1);
        assert_eq!(clara.progeny_count, 0);
        assert_eq!(sink.count(EventCategory::Reproduction), 1);
    }

    proptest! {
        #[test]
        fn grief_keeps_stats_in_bounds(
            health in 0.0f64..=100.0,
            mood in 0.0f64..=100.0,
            bonded in any::<bool>(),
            losses in 1usize..6,
        ) {
            let mut rng = rng();
            let mut mourner = agent(&mut rng, "Mourner", 40);
            mourner.health = health;
            mourner.mood = mood;
            let mut departed = agent(&mut rng, "Departed", 45);
            if bonded {
                mourner.bond_with(&mut departed, 0, &mut NullSink);
            }

            for tick in 0..losses {
                mourner.grieve_loss(&departed, tick as u64, &mut NullSink);
                prop_assert!(mourner.stats_in_bounds(), "{:?}", mourner);
            }
        }
    }
}
