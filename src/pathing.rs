use crate::base::{HashMap, Point};
use crate::grid::Grid;

//////////////////////////////////////////////////////////////////////////////

// Distances

// Finalized costs are true hop counts and always lie in [0, MAX_DIST].
// A cost outside that range means the model is corrupted, and the only
// correct response is to abort rather than guess.
pub const MAX_DIST: i32 = 1000;

// Frontier priority for cells seeded before they are first reached.
const INFINITE: i32 = i32::MAX;

fn check_dist(dist: i32) -> i32 {
    assert!(0 <= dist && dist <= MAX_DIST,
            "distance {} outside [0, {}]", dist, MAX_DIST);
    dist
}

// Absence from `dist` means the cell is unreachable from the source.
// `prev` records one shortest-path predecessor per reached cell.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DistanceMap {
    pub dist: HashMap<Point, i32>,
    pub prev: HashMap<Point, Point>,
}

impl DistanceMap {
    pub fn get(&self, point: Point) -> Option<i32> {
        self.dist.get(&point).copied()
    }
}

//////////////////////////////////////////////////////////////////////////////

// Frontier

#[derive(Clone, Copy, Eq, PartialEq)] struct HeapIndex(i32);
#[derive(Clone, Copy, Eq, PartialEq)] struct NodeIndex(i32);

const NOT_IN_HEAP: HeapIndex = HeapIndex(-1);

struct FrontierNode {
    pos: Point,
    priority: i32,
    index: HeapIndex,
}

// Min-priority frontier with decrease-key. Nodes are allocated once and
// remember their heap slot; `slots` maps a coordinate to its node, so
// decrease-key is a lookup and a sift, never a scan. Ties are broken by
// heap structure only.
#[derive(Default)]
pub struct Frontier {
    nodes: Vec<FrontierNode>,
    heap: Vec<NodeIndex>,
    slots: HashMap<Point, NodeIndex>,
}

impl Frontier {
    // Heap operations

    pub fn is_empty(&self) -> bool { self.heap.is_empty() }

    pub fn len(&self) -> usize { self.heap.len() }

    pub fn push(&mut self, pos: Point, priority: i32) {
        let node = NodeIndex(self.nodes.len() as i32);
        let index = HeapIndex(self.heap.len() as i32);
        let existing = self.slots.insert(pos, node);
        assert!(existing.is_none(), "coord {:?} pushed twice", pos);
        self.nodes.push(FrontierNode { pos, priority, index });
        self.heap.push(node);
        self.heapify(node);
    }

    pub fn extract_min(&mut self) -> Option<(Point, i32)> {
        if self.heap.is_empty() { return None; }

        let mut index = HeapIndex(0);
        let result = self.get_heap(index);
        self.mut_node(result).index = NOT_IN_HEAP;
        let min = {
            let node = self.get_node(result);
            (node.pos, node.priority)
        };

        let node = self.heap.pop().unwrap();
        if self.heap.is_empty() { return Some(min); }

        let limit = self.heap.len() as i32;
        let priority = self.get_node(node).priority;
        let (mut c0, mut c1) = Self::children(index);

        while c0.0 < limit {
            let mut child_index = c0;
            let mut child_priority = self.heap_priority(c0);
            if c1.0 < limit {
                let c1_priority = self.heap_priority(c1);
                if c1_priority < child_priority {
                    (child_index, child_priority) = (c1, c1_priority);
                }
            }
            if priority <= child_priority { break; }

            self.heap_move(child_index, index);
            (c0, c1) = Self::children(child_index);
            index = child_index;
        }

        self.mut_node(node).index = index;
        self.set_heap(index, node);
        Some(min)
    }

    // Lowering the priority of an already-extracted coordinate is a no-op:
    // a finalized cell only sees equal-cost re-relaxations, which must not
    // re-enter the frontier.
    pub fn decrease(&mut self, pos: Point, priority: i32) {
        let Some(&node) = self.slots.get(&pos) else { return; };
        if self.get_node(node).index == NOT_IN_HEAP { return; }

        assert!(priority <= self.get_node(node).priority,
                "priority increase for {:?}", pos);
        self.mut_node(node).priority = priority;
        self.heapify(node);
    }

    fn heapify(&mut self, n: NodeIndex) {
        let priority = self.get_node(n).priority;
        let mut index = self.get_node(n).index;

        while index.0 > 0 {
            let parent_index = Self::parent(index);
            let parent_priority = self.heap_priority(parent_index);
            if parent_priority <= priority { break; }

            self.heap_move(parent_index, index);
            index = parent_index;
        }

        self.mut_node(n).index = index;
        self.set_heap(index, n);
    }

    // Lower-level helpers

    fn heap_priority(&self, h: HeapIndex) -> i32 {
        self.get_node(self.get_heap(h)).priority
    }

    fn heap_move(&mut self, from: HeapIndex, to: HeapIndex) {
        let node = self.get_heap(from);
        self.mut_node(node).index = to;
        self.set_heap(to, node);
    }

    fn get_heap(&self, h: HeapIndex) -> NodeIndex {
        self.heap[h.0 as usize]
    }

    fn set_heap(&mut self, h: HeapIndex, n: NodeIndex) {
        self.heap[h.0 as usize] = n;
    }

    fn get_node(&self, n: NodeIndex) -> &FrontierNode {
        &self.nodes[n.0 as usize]
    }

    fn mut_node(&mut self, n: NodeIndex) -> &mut FrontierNode {
        &mut self.nodes[n.0 as usize]
    }

    fn parent(h: HeapIndex) -> HeapIndex {
        HeapIndex((h.0 - 1) / 2)
    }

    fn children(h: HeapIndex) -> (HeapIndex, HeapIndex) {
        (HeapIndex(2 * h.0 + 1), HeapIndex(2 * h.0 + 2))
    }
}

//////////////////////////////////////////////////////////////////////////////

// Weighted engine

// Policy applied when a relaxed cell hosts entities of the congestion
// category. TieBreak keeps costs equal to hop counts and only steers the
// recorded path; Additive surcharges the edge per occupant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CongestionModel { TieBreak, Additive }

// Surcharge per occupying entity under CongestionModel::Additive.
pub const CONGESTION_SURCHARGE: i32 = 2;

// Single-source shortest paths over all traversable cells, with unit edge
// cost perturbed by the congestion occupancy in `congestion`. The whole
// traversable set is seeded up front (source at 0, the rest at an infinite
// priority) so the frontier size is fixed; an unreached cell never relaxes
// its neighbors.
pub fn distances(grid: &Grid, source: Point, congestion: &[Point],
                 model: CongestionModel) -> DistanceMap {
    assert!(grid.traversable(source), "source {:?} is not traversable", source);

    let occupants = |p: Point| {
        congestion.iter().filter(|&&c| c == p).count() as i32
    };

    let mut result = DistanceMap::default();
    result.dist.insert(source, 0);

    let mut frontier = Frontier::default();
    for cell in grid.traversable_cells() {
        let priority = if cell == source { 0 } else { INFINITE };
        frontier.push(cell, priority);
    }

    while let Some((u, _)) = frontier.extract_min() {
        let Some(du) = result.get(u) else { continue; };

        for v in grid.neighbors(u) {
            let crowd = occupants(v);
            let alt = check_dist(match model {
                CongestionModel::TieBreak => du + 1,
                CongestionModel::Additive => du + 1 + CONGESTION_SURCHARGE * crowd,
            });

            let accept = match result.get(v) {
                None => true,
                Some(dv) if alt < dv => true,
                Some(dv) => {
                    // Among equal-cost paths into an uncongested cell, the
                    // recorded arrival must avoid congestion: switch only
                    // from a congested predecessor to a clear one. The
                    // numeric cost never changes here.
                    model == CongestionModel::TieBreak && alt == dv &&
                        crowd == 0 && occupants(u) == 0 &&
                        result.prev.get(&v).map_or(false, |&p| occupants(p) > 0)
                }
            };
            if !accept { continue; }

            result.dist.insert(v, alt);
            result.prev.insert(v, u);
            frontier.decrease(v, alt);
        }
    }
    result
}

//////////////////////////////////////////////////////////////////////////////

// Flat-cost oracle

// Plain uniform-cost shortest paths. Kept apart from the weighted engine:
// scoring a candidate cell must reflect true grid distance, not the
// mover's congestion-biased routing.
pub fn distances_plain(grid: &Grid, source: Point) -> DistanceMap {
    assert!(grid.traversable(source), "source {:?} is not traversable", source);

    let mut result = DistanceMap::default();
    result.dist.insert(source, 0);

    let mut frontier = Frontier::default();
    for cell in grid.traversable_cells() {
        let priority = if cell == source { 0 } else { INFINITE };
        frontier.push(cell, priority);
    }

    while let Some((u, _)) = frontier.extract_min() {
        let Some(du) = result.get(u) else { continue; };

        for v in grid.neighbors(u) {
            let alt = check_dist(du + 1);
            let accept = match result.get(v) {
                None => true,
                Some(dv) => alt < dv,
            };
            if !accept { continue; }

            result.dist.insert(v, alt);
            result.prev.insert(v, u);
            frontier.decrease(v, alt);
        }
    }
    result
}

//////////////////////////////////////////////////////////////////////////////
