//! Entities (constituencies), regions, and projected points.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::UnknownRegion;

/// Fixed set of UK electoral regions. Serialised in snake_case
/// (`"north_east"`, `"london"`, ...), matching the election data files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    NorthernIreland,
    Scotland,
    NorthEast,
    NorthWest,
    Yorkshire,
    Wales,
    WestMidlands,
    EastMidlands,
    East,
    SouthWest,
    London,
    SouthEast,
}

impl Region {
    pub const ALL: [Region; 12] = [
        Region::NorthernIreland,
        Region::Scotland,
        Region::NorthEast,
        Region::NorthWest,
        Region::Yorkshire,
        Region::Wales,
        Region::WestMidlands,
        Region::EastMidlands,
        Region::East,
        Region::SouthWest,
        Region::London,
        Region::SouthEast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::NorthernIreland => "northern_ireland",
            Region::Scotland => "scotland",
            Region::NorthEast => "north_east",
            Region::NorthWest => "north_west",
            Region::Yorkshire => "yorkshire",
            Region::Wales => "wales",
            Region::WestMidlands => "west_midlands",
            Region::EastMidlands => "east_midlands",
            Region::East => "east",
            Region::SouthWest => "south_west",
            Region::London => "london",
            Region::SouthEast => "south_east",
        }
    }

    /// Electoral Calculus area code (1 = NI … 12 = South East).
    pub fn from_area_code(code: u8) -> Option<Region> {
        Region::ALL.get(usize::from(code).checked_sub(1)?).copied()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    /// Accepts snake_case names (case-insensitive, spaces or hyphens allowed)
    /// and numeric area codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        if let Ok(code) = key.parse::<u8>() {
            return Region::from_area_code(code).ok_or_else(|| UnknownRegion(s.to_string()));
        }
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == key)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

/// An electoral constituency as handed in by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub region: Region,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, region: Region) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            region,
        }
    }
}

/// Planar position of one matched entity. `entity` indexes the caller's
/// entity slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    pub entity: usize,
    pub region: Region,
    pub p: Vector2<f64>,
}

impl ProjectedPoint {
    #[inline]
    pub fn new(entity: usize, region: Region, x: f64, y: f64) -> Self {
        Self {
            entity,
            region,
            p: Vector2::new(x, y),
        }
    }
}
