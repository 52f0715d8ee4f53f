use crate::base::Point;
use crate::entity::{Slasher, SpawningMinion, Wanderer};
use crate::pathing::DistanceMap;

//////////////////////////////////////////////////////////////////////////////

// Alert radii, in hop counts over the traversable graph. Wanderers chase
// from far away; slashers only matter up close.
pub const RANGE_WANDERERS: i32 = 7;
pub const RANGE_SLASHERS: i32 = 6;
pub const RANGE_SPAWNINGS: i32 = 7;

//////////////////////////////////////////////////////////////////////////////

// Threat

// A hostile entity admitted by its category's alert radius. Consumers only
// ever need the coordinate; the tag records which radius admitted it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Threat {
    Wanderer(Point),
    Slasher(Point),
    Spawning(Point),
}

impl Threat {
    pub fn pos(self) -> Point {
        match self {
            Threat::Wanderer(pos) => pos,
            Threat::Slasher(pos) => pos,
            Threat::Spawning(pos) => pos,
        }
    }
}

// The category whose occupancy perturbs the weighted engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ThreatKind { Wanderer, Slasher, Spawning }

//////////////////////////////////////////////////////////////////////////////

// Aggregation

pub struct AlertRadii {
    pub wanderers: i32,
    pub slashers: i32,
    pub spawnings: i32,
}

impl Default for AlertRadii {
    fn default() -> Self {
        Self {
            wanderers: RANGE_WANDERERS,
            slashers: RANGE_SLASHERS,
            spawnings: RANGE_SPAWNINGS,
        }
    }
}

// The frightening set: every hostile entity whose weighted distance from
// the agent is within its category's radius. Reachability over the
// traversable graph is authoritative: an entity absent from the distance
// map never counts, no matter how close it sits in a straight line.
pub fn frightening(wanderers: &[Wanderer], slashers: &[Slasher],
                   spawnings: &[SpawningMinion], from_me: &DistanceMap,
                   radii: &AlertRadii) -> Vec<Threat> {
    let mut result = vec![];

    let within = |pos: Point, radius: i32| {
        from_me.get(pos).map_or(false, |d| d <= radius)
    };

    for w in wanderers {
        if within(w.pos, radii.wanderers) { result.push(Threat::Wanderer(w.pos)); }
    }
    for s in slashers {
        if within(s.pos, radii.slashers) { result.push(Threat::Slasher(s.pos)); }
    }
    for s in spawnings {
        if within(s.pos, radii.spawnings) { result.push(Threat::Spawning(s.pos)); }
    }
    result
}

//////////////////////////////////////////////////////////////////////////////
