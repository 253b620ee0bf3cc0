//! OS National Grid references.
//!
//! A grid reference names a 100 km square with two letters and then gives the
//! easting and northing within that square. References produced here always
//! carry four digits per axis, i.e. 10 m resolution, and sub-10 m remainders
//! are truncated toward the south-west corner of the cell.
//!
//! The square letters come from a literal lookup table rather than from
//! letter arithmetic.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geodesy::PlanarGridCoordinate;

/// Exclusive upper bound on encodable eastings, metres.
pub const EASTING_LIMIT_M: f64 = 700_000.0;

/// Exclusive upper bound on encodable northings, metres.
pub const NORTHING_LIMIT_M: f64 = 1_300_000.0;

/// Side of a lettered square, metres.
pub const SQUARE_SIZE_M: f64 = 100_000.0;

/// Size of one step of the four-digit offsets, metres.
pub const RESOLUTION_M: f64 = 10.0;

/// Digits per axis in an encoded reference.
const DIGITS: usize = 4;

/// 100 km square letters indexed `[northing / 100km][easting / 100km]`.
///
/// Rows run south to north, columns west to east.
pub static GRID_SQUARES: [[&str; 7]; 13] = [
    ["SV", "SW", "SX", "SY", "SZ", "TV", "TW"],
    ["SQ", "SR", "SS", "ST", "SU", "TQ", "TR"],
    ["SL", "SM", "SN", "SO", "SP", "TL", "TM"],
    ["SF", "SG", "SH", "SJ", "SK", "TF", "TG"],
    ["SA", "SB", "SC", "SD", "SE", "TA", "TB"],
    ["NV", "NW", "NX", "NY", "NZ", "OV", "OW"],
    ["NQ", "NR", "NS", "NT", "NU", "OQ", "OR"],
    ["NL", "NM", "NN", "NO", "NP", "OL", "OM"],
    ["NF", "NG", "NH", "NJ", "NK", "OF", "OG"],
    ["NA", "NB", "NC", "ND", "NE", "OA", "OB"],
    ["HV", "HW", "HX", "HY", "HZ", "JV", "JW"],
    ["HQ", "HR", "HS", "HT", "HU", "JQ", "JR"],
    ["HL", "HM", "HN", "HO", "HP", "JL", "JM"],
];

/// Find the `(northing, easting)` table indices of a square.
fn square_indices(letters: &str) -> Option<(usize, usize)> {
    GRID_SQUARES.iter().enumerate().find_map(|(n, row)| {
        row.iter()
            .position(|&square| square == letters)
            .map(|e| (n, e))
    })
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Z]{2})\s*(?:([0-9]+)\s+([0-9]+)|([0-9]*))$").expect("Invalid regex pattern")
    })
}

/// A National Grid reference at 10 m resolution, e.g. `TQ 2991 8043`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridReference {
    northing_index: u8,
    easting_index: u8,
    easting: u16,
    northing: u16,
}

impl GridReference {
    /// Largest four-digit offset.
    pub const MAX_OFFSET: u16 = 9999;

    /// Build a reference from square letters and four-digit offsets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownGridSquare`] if the letters are not in the
    /// table, or [`Error::InvalidGridReference`] if an offset exceeds 9999.
    pub fn new(square: &str, easting: u16, northing: u16) -> Result<Self> {
        let (n, e) = square_indices(square)
            .ok_or_else(|| Error::UnknownGridSquare(square.to_string()))?;
        if easting > Self::MAX_OFFSET || northing > Self::MAX_OFFSET {
            return Err(Error::invalid_grid_reference(
                format!("{square} {easting} {northing}"),
                "offsets must be at most four digits",
            ));
        }
        Ok(Self::from_parts(n, e, easting, northing))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_parts(northing_index: usize, easting_index: usize, easting: u16, northing: u16) -> Self {
        // Both indices come from the 13x7 table.
        Self {
            northing_index: northing_index as u8,
            easting_index: easting_index as u8,
            easting,
            northing,
        }
    }

    /// The two-letter 100 km square.
    #[must_use]
    pub fn square(&self) -> &'static str {
        GRID_SQUARES[usize::from(self.northing_index)][usize::from(self.easting_index)]
    }

    /// Easting within the square in units of 10 m.
    #[must_use]
    pub fn easting_offset(&self) -> u16 {
        self.easting
    }

    /// Northing within the square in units of 10 m.
    #[must_use]
    pub fn northing_offset(&self) -> u16 {
        self.northing
    }

    /// South-west corner of the 10 m cell.
    #[must_use]
    pub fn south_west(&self) -> PlanarGridCoordinate {
        decode(self)
    }

    /// Centre of the 10 m cell.
    #[must_use]
    pub fn centre(&self) -> PlanarGridCoordinate {
        let corner = decode(self);
        PlanarGridCoordinate::new(
            corner.easting_m + RESOLUTION_M / 2.0,
            corner.northing_m + RESOLUTION_M / 2.0,
        )
    }
}

impl fmt::Display for GridReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:04} {:04}",
            self.square(),
            self.easting,
            self.northing
        )
    }
}

/// Scale a digit string of any length to a four-digit offset.
///
/// Longer strings are truncated and shorter ones padded on the right, so
/// `"3"` means 30 km and `"29915"` means 2991 tens of metres.
fn normalise_offset(input: &str, digits: &str) -> Result<u16> {
    let mut scaled: String = digits.chars().take(DIGITS).collect();
    while scaled.len() < DIGITS {
        scaled.push('0');
    }
    scaled
        .parse()
        .map_err(|_| Error::invalid_grid_reference(input, "offset is not a number"))
}

impl FromStr for GridReference {
    type Err = Error;

    /// Parse `TQ 2991 8043`, `TQ29918043`, `tq 299 804` and similar.
    ///
    /// Any precision from 100 km (letters only) to 1 m (five digits per
    /// axis) is accepted and normalised to four digits.
    fn from_str(s: &str) -> Result<Self> {
        let normalised = s.trim().to_ascii_uppercase();
        let caps = reference_pattern()
            .captures(&normalised)
            .ok_or_else(|| Error::invalid_grid_reference(s, "expected two letters followed by digits"))?;

        let square = &caps[1];
        let (easting, northing) = match (caps.get(2), caps.get(3), caps.get(4)) {
            (Some(e), Some(n), _) => {
                if e.as_str().len() != n.as_str().len() {
                    return Err(Error::invalid_grid_reference(
                        s,
                        "easting and northing have different precision",
                    ));
                }
                (e.as_str(), n.as_str())
            }
            (_, _, Some(run)) => {
                let run = run.as_str();
                if run.len() % 2 != 0 {
                    return Err(Error::invalid_grid_reference(s, "odd number of digits"));
                }
                run.split_at(run.len() / 2)
            }
            _ => return Err(Error::invalid_grid_reference(s, "missing digits")),
        };

        if easting.len() > DIGITS + 1 {
            return Err(Error::invalid_grid_reference(
                s,
                "more than five digits per axis",
            ));
        }

        let easting = normalise_offset(s, easting)?;
        let northing = normalise_offset(s, northing)?;
        Self::new(square, easting, northing)
    }
}

impl TryFrom<String> for GridReference {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<GridReference> for String {
    fn from(value: GridReference) -> Self {
        value.to_string()
    }
}

/// Encode a planar coordinate as a grid reference.
///
/// Returns `None` when the point is outside `[0, 700000) x [0, 1300000)`,
/// including non-finite input. This is the normal result for anywhere
/// outside Great Britain and is not an error.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn encode(point: PlanarGridCoordinate) -> Option<GridReference> {
    let PlanarGridCoordinate {
        easting_m,
        northing_m,
    } = point;

    if !(0.0..EASTING_LIMIT_M).contains(&easting_m) || !(0.0..NORTHING_LIMIT_M).contains(&northing_m)
    {
        debug!(easting_m, northing_m, "outside national grid coverage");
        return None;
    }

    // In range, so every cast below is of a small non-negative value.
    let e_index = (easting_m / SQUARE_SIZE_M).floor() as usize;
    let n_index = (northing_m / SQUARE_SIZE_M).floor() as usize;
    if GRID_SQUARES
        .get(n_index)
        .and_then(|row| row.get(e_index))
        .is_none()
    {
        return None;
    }

    let easting = ((easting_m % SQUARE_SIZE_M) / RESOLUTION_M).floor() as u16;
    let northing = ((northing_m % SQUARE_SIZE_M) / RESOLUTION_M).floor() as u16;

    Some(GridReference::from_parts(
        n_index,
        e_index,
        easting.min(GridReference::MAX_OFFSET),
        northing.min(GridReference::MAX_OFFSET),
    ))
}

/// South-west corner of a grid reference's 10 m cell in metres.
#[must_use]
pub fn decode(reference: &GridReference) -> PlanarGridCoordinate {
    PlanarGridCoordinate::new(
        f64::from(reference.easting_index) * SQUARE_SIZE_M
            + f64::from(reference.easting) * RESOLUTION_M,
        f64::from(reference.northing_index) * SQUARE_SIZE_M
            + f64::from(reference.northing) * RESOLUTION_M,
    )
}
