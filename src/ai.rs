use tracing::debug;

use crate::base::Point;
use crate::entity::Explorer;
use crate::game::{Action, Config, Snapshot, YelledRegistry};
use crate::game::{PLAN_ALLY_GATE, PLAN_PANIC_GATE, PLAN_SELF_GATE};
use crate::grid::Grid;
use crate::pathing::{self, DistanceMap};
use crate::threats::{self, Threat};

//////////////////////////////////////////////////////////////////////////////

// Retreat selection

// Exact mean comparison: sum_a / count_a > sum_b / count_b, cross-
// multiplied so no division ever happens. Counts are always positive.
#[derive(Clone, Copy)]
struct Score {
    sum: i64,
    count: i64,
}

impl Score {
    fn beats(self, other: Score) -> bool {
        self.sum * other.count > other.sum * self.count
    }
}

// Every traversable cell within the retreat horizon of the agent, in
// row-major order. First-seen wins all downstream ties.
fn retreat_candidates(grid: &Grid, from_me: &DistanceMap, horizon: i32) -> Vec<Point> {
    grid.traversable_cells()
        .filter(|&p| from_me.get(p).map_or(false, |d| d <= horizon))
        .collect()
}

// The candidate maximizing mean flat distance to the frightening set.
// Threats unreachable from a given candidate are left out of that
// candidate's average; a candidate that reaches none of them cannot be
// scored at all and is skipped outright.
pub fn retreat_cell(grid: &Grid, frightening: &[Threat],
                    from_me: &DistanceMap, horizon: i32) -> Point {
    assert!(!frightening.is_empty(), "retreat with no frightening threats");

    let candidates = retreat_candidates(grid, from_me, horizon);
    assert!(!candidates.is_empty(), "no traversable cells within the retreat horizon");

    let mut best: Option<(Point, Score)> = None;
    for &candidate in &candidates {
        let from_candidate = pathing::distances_plain(grid, candidate);

        let mut score = Score { sum: 0, count: 0 };
        for threat in frightening {
            if let Some(d) = from_candidate.get(threat.pos()) {
                score.sum += d as i64;
                score.count += 1;
            }
        }
        if score.count == 0 { continue; }

        let better = match best {
            None => true,
            Some((_, current)) => score.beats(current),
        };
        if better { best = Some((candidate, score)); }
    }

    match best {
        Some((cell, _)) => cell,
        None => panic!("every retreat candidate is cut off from the frightening set"),
    }
}

//////////////////////////////////////////////////////////////////////////////

// Ability gates

fn light_target_exists(snapshot: &Snapshot, from_me: &DistanceMap,
                       config: &Config) -> bool {
    snapshot.wanderers.iter().any(|w| {
        from_me.get(w.pos).map_or(false, |d| d <= config.light_range)
    })
}

fn ally_to_heal_exists(snapshot: &Snapshot, from_me: &DistanceMap,
                       config: &Config) -> bool {
    if snapshot.me.sanity > PLAN_SELF_GATE { return false; }
    snapshot.allies.iter().any(|ally| {
        ally.sanity <= PLAN_ALLY_GATE &&
            from_me.get(ally.pos).map_or(false, |d| d <= config.heal_range)
    })
}

fn ally_to_yell_at_exists(snapshot: &Snapshot, from_me: &DistanceMap,
                          yelled: &YelledRegistry, config: &Config) -> bool {
    snapshot.allies.iter().any(|ally| {
        !yelled.contains(ally.id) && ally.sanity < config.min_sanity_yell &&
            from_me.get(ally.pos).map_or(false, |d| d <= config.yell_range)
    })
}

// Follow whoever is coping best. First such ally wins a sanity tie.
fn healthiest_ally(allies: &[Explorer]) -> Option<&Explorer> {
    let mut best: Option<&Explorer> = None;
    for ally in allies {
        if best.map_or(true, |b| ally.sanity > b.sanity) { best = Some(ally); }
    }
    best
}

//////////////////////////////////////////////////////////////////////////////

// Decision

// One decision per tick. The weighted map from our own cell backs every
// range check here, so "distance" always means hops over traversable
// cells, never straight-line proximity.
pub fn decide(grid: &Grid, config: &Config, yelled: &YelledRegistry,
              snapshot: &Snapshot) -> Action {
    let me = &snapshot.me;
    let congestion = snapshot.congestion(config.congestion_kind);
    let from_me = pathing::distances(grid, me.pos, &congestion, config.congestion_model);

    let ongoing = snapshot.effects.ongoing_for(me.id);

    if me.lights > 0 && !ongoing && light_target_exists(snapshot, &from_me, config) {
        return Action::Light;
    }
    if me.plans > 0 && !ongoing &&
       (ally_to_heal_exists(snapshot, &from_me, config) || me.sanity < PLAN_PANIC_GATE) {
        return Action::Plan;
    }
    if !ongoing && ally_to_yell_at_exists(snapshot, &from_me, yelled, config) {
        return Action::Yell;
    }

    let frightening = threats::frightening(
        &snapshot.wanderers, &snapshot.slashers, &snapshot.spawnings,
        &from_me, &config.radii);

    if !frightening.is_empty() {
        debug!(threats = frightening.len(), "retreating");
        let target = retreat_cell(grid, &frightening, &from_me, config.retreat_horizon);
        return Action::Move { target, note: "backing off" };
    }

    if let Some(leader) = healthiest_ally(&snapshot.allies) {
        return Action::Move { target: leader.pos, note: "tagging along" };
    }
    Action::Wait
}

//////////////////////////////////////////////////////////////////////////////
