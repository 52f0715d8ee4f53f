use crate::base::{HashSet, Point};
use crate::entity::{EntityId, Explorer, Slasher, SpawningMinion, Wanderer};
use crate::grid::Grid;
use crate::pathing::CongestionModel;
use crate::threats::{AlertRadii, ThreatKind};

//////////////////////////////////////////////////////////////////////////////

// Constants

pub const MAX_SANITY: i32 = 250;

// Weighted-distance gates for the special abilities.
pub const LIGHT_RANGE: i32 = 5;
pub const HEAL_RANGE: i32 = 2;
pub const YELL_RANGE: i32 = 1;

// Sanity thresholds. A plan is worth burning when we are hurt and someone
// nearby is too, or when we are close to breaking on our own.
pub const PLAN_SELF_GATE: i32 = MAX_SANITY - 60;
pub const PLAN_ALLY_GATE: i32 = MAX_SANITY - 15;
pub const PLAN_PANIC_GATE: i32 = 100;
pub const MIN_SANITY_YELL: i32 = 220;

// How far we are willing to consider running in one decision.
pub const RETREAT_HORIZON: i32 = 5;

//////////////////////////////////////////////////////////////////////////////

// Config

pub struct Config {
    pub radii: AlertRadii,
    pub retreat_horizon: i32,
    pub congestion_kind: ThreatKind,
    pub congestion_model: CongestionModel,
    pub light_range: i32,
    pub heal_range: i32,
    pub yell_range: i32,
    pub min_sanity_yell: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radii: AlertRadii::default(),
            retreat_horizon: RETREAT_HORIZON,
            congestion_kind: ThreatKind::Wanderer,
            congestion_model: CongestionModel::TieBreak,
            light_range: LIGHT_RANGE,
            heal_range: HEAL_RANGE,
            yell_range: YELL_RANGE,
            min_sanity_yell: MIN_SANITY_YELL,
        }
    }
}

// Match constants reported by the judge header. None of them feed the
// per-tick decision; they are kept for diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct MatchRules {
    pub sanity_loss_lonely: i32,
    pub sanity_loss_group: i32,
    pub wanderer_spawn_time: i32,
    pub wanderer_life_time: i32,
}

//////////////////////////////////////////////////////////////////////////////

// Effects and snapshot

#[derive(Clone, Copy, Debug)]
pub struct Yell {
    pub by: EntityId,
    pub on: EntityId,
}

#[derive(Clone, Debug, Default)]
pub struct Effects {
    pub yells: Vec<Yell>,
    pub plans: Vec<EntityId>,
    pub lights: Vec<EntityId>,
}

impl Effects {
    // An ability of ours still resolving blocks casting another one.
    pub fn ongoing_for(&self, id: EntityId) -> bool {
        self.yells.iter().any(|yell| yell.by == id)
            || self.plans.iter().any(|&by| by == id)
            || self.lights.iter().any(|&by| by == id)
    }
}

// Rebuilt from the feed every tick and discarded at tick end; never
// mutated in place.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub me: Explorer,
    pub allies: Vec<Explorer>,
    pub wanderers: Vec<Wanderer>,
    pub slashers: Vec<Slasher>,
    pub spawnings: Vec<SpawningMinion>,
    pub effects: Effects,
}

impl Snapshot {
    // Coordinates of the category that perturbs the weighted engine.
    pub fn congestion(&self, kind: ThreatKind) -> Vec<Point> {
        match kind {
            ThreatKind::Wanderer => self.wanderers.iter().map(|x| x.pos).collect(),
            ThreatKind::Slasher => self.slashers.iter().map(|x| x.pos).collect(),
            ThreatKind::Spawning => self.spawnings.iter().map(|x| x.pos).collect(),
        }
    }
}

//////////////////////////////////////////////////////////////////////////////

// Yelled registry

// Ally ids this agent has already yelled at. Created empty at match start
// and append-only for the whole match: the judge confirms each yell with
// an effect row, which is when the target is recorded.
#[derive(Default)]
pub struct YelledRegistry(HashSet<EntityId>);

impl YelledRegistry {
    pub fn contains(&self, id: EntityId) -> bool {
        self.0.contains(&id)
    }

    pub fn observe(&mut self, effects: &Effects, me: EntityId) {
        for yell in &effects.yells {
            if yell.by == me { self.0.insert(yell.on); }
        }
    }
}

//////////////////////////////////////////////////////////////////////////////

// Action

// Exactly one of these is emitted per tick. The protocol layer renders it;
// nothing here writes text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Move { target: Point, note: &'static str },
    Wait,
    Plan,
    Light,
    Yell,
}

//////////////////////////////////////////////////////////////////////////////

// State

pub struct State {
    pub grid: Grid,
    pub rules: MatchRules,
    pub config: Config,
    pub yelled: YelledRegistry,
}

impl State {
    pub fn new(grid: Grid, rules: MatchRules) -> Self {
        Self { grid, rules, config: Config::default(), yelled: YelledRegistry::default() }
    }

    pub fn tick(&mut self, snapshot: &Snapshot) -> Action {
        self.yelled.observe(&snapshot.effects, snapshot.me.id);
        crate::ai::decide(&self.grid, &self.config, &self.yelled, snapshot)
    }
}

//////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ongoing_effects_are_per_caster() {
        let mut effects = Effects::default();
        effects.lights.push(EntityId(3));
        assert!(effects.ongoing_for(EntityId(3)));
        assert!(!effects.ongoing_for(EntityId(4)));

        let mut effects = Effects::default();
        effects.yells.push(Yell { by: EntityId(1), on: EntityId(2) });
        assert!(effects.ongoing_for(EntityId(1)));
        assert!(!effects.ongoing_for(EntityId(2)));
    }

    #[test]
    fn test_yelled_registry_records_only_own_yells() {
        let mut registry = YelledRegistry::default();
        let mut effects = Effects::default();
        effects.yells.push(Yell { by: EntityId(0), on: EntityId(1) });
        effects.yells.push(Yell { by: EntityId(2), on: EntityId(3) });

        registry.observe(&effects, EntityId(0));
        assert!(registry.contains(EntityId(1)));
        assert!(!registry.contains(EntityId(3)));

        // Append-only: later ticks never clear earlier entries.
        registry.observe(&Effects::default(), EntityId(0));
        assert!(registry.contains(EntityId(1)));
    }
}
