use std::{fmt, iter::repeat, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(pub i32);

/// Cube coordinates
/// <http://www.redblobgames.com/grids/hexagons/#coordinates-cube>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosCube {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

/// Axial coordinates: the third cube component is always `-q - r`,
/// so `q + r + s == 0` holds by construction.
/// <http://www.redblobgames.com/grids/hexagons/#coordinates-axial>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosHex {
    /// column
    pub q: i32,

    /// row
    pub r: i32,
}

impl PosHex {
    pub const ORIGIN: PosHex = PosHex { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        PosHex { q, r }
    }

    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    pub fn to_cube(self) -> PosCube {
        PosCube {
            q: self.q,
            r: self.r,
            s: self.s(),
        }
    }

    /// Stable string key: `"q,r"`.
    pub fn to_key(self) -> String {
        self.to_string()
    }

    pub fn from_key(key: &str) -> Result<Self, KeyError> {
        key.parse()
    }

    pub fn neighbors(self) -> impl Iterator<Item = PosHex> {
        dirs().map(move |dir| Dir::get_neighbor_pos(self, dir))
    }
}

impl fmt::Display for PosHex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    BadFormat(String),
    BadNumber(ParseIntError),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyError::BadFormat(key) => write!(f, "Bad hex key format: '{}'", key),
            KeyError::BadNumber(e) => write!(f, "Bad hex key number: {}", e),
        }
    }
}

impl std::error::Error for KeyError {}

impl FromStr for PosHex {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (q, r) = match (parts.next(), parts.next(), parts.next()) {
            (Some(q), Some(r), None) => (q, r),
            _ => return Err(KeyError::BadFormat(s.into())),
        };
        let q = q.trim().parse().map_err(KeyError::BadNumber)?;
        let r = r.trim().parse().map_err(KeyError::BadNumber)?;
        Ok(PosHex { q, r })
    }
}

pub fn distance_cube(a: PosCube, b: PosCube) -> Distance {
    let n = ((a.q - b.q).abs() + (a.r - b.r).abs() + (a.s - b.s).abs()) / 2;
    Distance(n)
}

pub fn distance_hex(a: PosHex, b: PosHex) -> Distance {
    distance_cube(a.to_cube(), b.to_cube())
}

pub fn is_inboard(radius: Distance, pos: PosHex) -> bool {
    let max = pos.q.abs().max(pos.r.abs()).max(pos.s().abs());
    max <= radius.0
}

/// All positions within `range` of `center`, the center included.
pub fn hexes_in_range(center: PosHex, range: Distance) -> Vec<PosHex> {
    let n = range.0;
    let mut positions = Vec::new();
    for q in -n..=n {
        let r_min = (-n).max(-q - n);
        let r_max = n.min(-q + n);
        for r in r_min..=r_max {
            positions.push(PosHex {
                q: center.q + q,
                r: center.r + r,
            });
        }
    }
    positions
}

#[derive(Clone, Debug)]
pub struct HexIter {
    cursor: PosHex,
    radius: Distance,
}

impl HexIter {
    fn new(radius: Distance) -> Self {
        let mut iter = Self {
            cursor: PosHex {
                q: -radius.0 - 1,
                r: -radius.0,
            },
            radius,
        };
        iter.inc_cursor_with_hex_bounds();
        iter
    }

    fn inc_cursor(&mut self) {
        self.cursor.q += 1;
        if self.cursor.q > self.radius.0 {
            self.cursor.q = -self.radius.0;
            self.cursor.r += 1;
        }
    }

    fn inc_cursor_with_hex_bounds(&mut self) {
        self.inc_cursor();
        while !is_inboard(self.radius, self.cursor) && self.cursor.r < self.radius.0 + 1 {
            self.inc_cursor();
        }
    }
}

impl Iterator for HexIter {
    type Item = PosHex;

    fn next(&mut self) -> Option<PosHex> {
        if self.cursor.r >= self.radius.0 + 1 {
            None
        } else {
            let current = self.cursor;
            self.inc_cursor_with_hex_bounds();
            Some(current)
        }
    }
}

/// Dense storage for a hexagon-shaped map centered at the origin.
///
/// ```text
///     [-1, 0]  [0, -1]
/// [-1, 1]  [0, 0]  [1, -1]
///     [ 0, 1]  [ 1, 0]
/// ```
#[derive(Debug, Clone)]
pub struct HexMap<T> {
    tiles: Vec<T>,
    size: Distance,
    radius: Distance,
}

impl<T: Clone + Default> HexMap<T> {
    pub fn new(radius: Distance) -> Self {
        let size = Distance(radius.0 * 2 + 1);
        let tiles_count = (size.0 * size.0) as usize;
        let tiles = repeat(T::default()).take(tiles_count).collect();
        Self {
            tiles,
            size,
            radius,
        }
    }
}

impl<T> HexMap<T> {
    pub fn radius(&self) -> Distance {
        self.radius
    }

    pub fn iter(&self) -> HexIter {
        HexIter::new(self.radius)
    }

    pub fn is_inboard(&self, pos: PosHex) -> bool {
        is_inboard(self.radius, pos)
    }

    fn hex_to_index(&self, hex: PosHex) -> usize {
        let i = (hex.r + self.radius.0) + (hex.q + self.radius.0) * self.size.0;
        i as usize
    }

    pub fn tile_opt(&self, pos: PosHex) -> Option<&T> {
        if self.is_inboard(pos) {
            Some(&self.tiles[self.hex_to_index(pos)])
        } else {
            None
        }
    }

    pub fn tile(&self, pos: PosHex) -> &T {
        assert!(self.is_inboard(pos), "no tile at {}", pos);
        &self.tiles[self.hex_to_index(pos)]
    }

    pub fn tile_mut(&mut self, pos: PosHex) -> &mut T {
        assert!(self.is_inboard(pos), "no tile at {}", pos);
        let index = self.hex_to_index(pos);
        &mut self.tiles[index]
    }

    pub fn set_tile(&mut self, pos: PosHex, tile: T) {
        *self.tile_mut(pos) = tile;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    SouthEast,
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
}

/// <http://www.redblobgames.com/grids/hexagons/#neighbors-axial>
const DIR_TO_POS_DIFF: [[i32; 2]; 6] = [[1, 0], [1, -1], [0, -1], [-1, 0], [-1, 1], [0, 1]];

impl Dir {
    pub fn from_int(n: i32) -> Self {
        assert!((0..6).contains(&n));
        let dirs = [
            Dir::SouthEast,
            Dir::East,
            Dir::NorthEast,
            Dir::NorthWest,
            Dir::West,
            Dir::SouthWest,
        ];
        dirs[n as usize]
    }

    pub fn to_int(self) -> i32 {
        match self {
            Dir::SouthEast => 0,
            Dir::East => 1,
            Dir::NorthEast => 2,
            Dir::NorthWest => 3,
            Dir::West => 4,
            Dir::SouthWest => 5,
        }
    }

    pub fn get_neighbor_pos(pos: PosHex, dir: Dir) -> PosHex {
        let diff = DIR_TO_POS_DIFF[dir.to_int() as usize];
        PosHex {
            q: pos.q + diff[0],
            r: pos.r + diff[1],
        }
    }
}

#[derive(Clone, Debug)]
pub struct DirIter {
    index: i32,
}

pub fn dirs() -> DirIter {
    DirIter { index: 0 }
}

impl Iterator for DirIter {
    type Item = Dir;

    fn next(&mut self) -> Option<Dir> {
        let max = DIR_TO_POS_DIFF.len() as i32;
        let next_dir = if self.index >= max {
            None
        } else {
            Some(Dir::from_int(self.index))
        };
        self.index += 1;
        next_dir
    }
}
