use std::fmt;

use crate::static_assert_size;
use crate::base::{Point, dirs};

//////////////////////////////////////////////////////////////////////////////

// Cell

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Cell { Wall, Spawn, Shelter, Empty }
static_assert_size!(Cell, 1);

impl Cell {
    pub fn traversable(self) -> bool {
        self != Cell::Wall
    }

    pub fn glyph(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Spawn => 'w',
            Cell::Shelter => 'U',
            Cell::Empty => '.',
        }
    }
}

//////////////////////////////////////////////////////////////////////////////

// Grid

// Immutable once parsed; lives for the whole match. Row-major storage.
#[derive(Clone)]
pub struct Grid {
    size: Point,
    data: Vec<Cell>,
}

impl Grid {
    pub fn new(size: Point, data: Vec<Cell>) -> Self {
        assert!(size.0 > 0 && size.1 > 0, "degenerate grid size {:?}", size);
        assert!(data.len() == (size.0 * size.1) as usize,
                "grid data length {} does not match size {:?}", data.len(), size);
        Self { size, data }
    }

    pub fn size(&self) -> Point { self.size }

    pub fn contains(&self, point: Point) -> bool {
        let Point(px, py) = point;
        let Point(sx, sy) = self.size;
        0 <= px && px < sx && 0 <= py && py < sy
    }

    // Out-of-range lookups are a corrupted-model condition, not a
    // recoverable one.
    pub fn get(&self, point: Point) -> Cell {
        assert!(self.contains(point), "coord {:?} outside grid {:?}", point, self.size);
        self.data[(point.0 + point.1 * self.size.0) as usize]
    }

    pub fn traversable(&self, point: Point) -> bool {
        self.get(point).traversable()
    }

    // All traversable cells, in row-major order. Row-major order is load
    // bearing: downstream tie-breaks resolve to the first cell seen.
    pub fn traversable_cells(&self) -> impl Iterator<Item = Point> + '_ {
        let Point(sx, sy) = self.size;
        (0..sy).flat_map(move |y| (0..sx).map(move |x| Point(x, y)))
               .filter(move |&p| self.traversable(p))
    }

    // In-bounds, traversable cells one orthogonal step from the given cell.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        dirs::CARDINAL.into_iter().map(move |dir| point + dir)
                      .filter(move |&p| self.contains(p) && self.traversable(p))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point(sx, sy) = self.size;
        for y in 0..sy {
            for x in 0..sx {
                write!(f, "{}", self.get(Point(x, y)).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

//////////////////////////////////////////////////////////////////////////////
