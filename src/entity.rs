use crate::static_assert_size;
use crate::base::Point;

//////////////////////////////////////////////////////////////////////////////

// Entity ids

// Judge-assigned. Entities are rebuilt from the feed every tick, so ids are
// only meaningful within a match, never across matches.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EntityId(pub i32);
static_assert_size!(EntityId, 4);

//////////////////////////////////////////////////////////////////////////////

// Minion states

// Only slashers use the full set; wanderers and spawning minions report a
// subset of these tags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MinionState { Spawning, Wandering, Stalking, Rushing, Stunned }

//////////////////////////////////////////////////////////////////////////////

// Entities

#[derive(Clone, Copy, Debug)]
pub struct Explorer {
    pub id: EntityId,
    pub pos: Point,
    pub sanity: i32,
    pub plans: i32,
    pub lights: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct Wanderer {
    pub id: EntityId,
    pub pos: Point,
    pub state: MinionState,
    pub target: EntityId,
    pub recall_time: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct Slasher {
    pub id: EntityId,
    pub pos: Point,
    pub state: MinionState,
    pub target: EntityId,
    pub change_state_time: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct SpawningMinion {
    pub id: EntityId,
    pub pos: Point,
    pub state: MinionState,
    pub target: EntityId,
    pub spawn_time: i32,
}
