use crate::settings::Dimension;
use serde::{Deserialize, Serialize};

/// Signed integer lattice coordinates of one particle.
///
/// Both dimensionalities share every container and statistic in the
/// aggregate; the variant tag is only dispatched on in the handful of
/// geometry-specific predicates (spawn, boundary, seeding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    D2 { x: i64, y: i64 },
    D3 { x: i64, y: i64, z: i64 },
}

impl Position {
    /// The lattice origin for the given dimensionality.
    pub fn origin(dim: Dimension) -> Self {
        match dim {
            Dimension::Two => Position::D2 { x: 0, y: 0 },
            Dimension::Three => Position::D3 { x: 0, y: 0, z: 0 },
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Position::D2 { .. } => Dimension::Two,
            Position::D3 { .. } => Dimension::Three,
        }
    }

    pub fn x(&self) -> i64 {
        match self {
            Position::D2 { x, .. } | Position::D3 { x, .. } => *x,
        }
    }

    pub fn y(&self) -> i64 {
        match self {
            Position::D2 { y, .. } | Position::D3 { y, .. } => *y,
        }
    }

    /// The z coordinate; 0 for planar positions.
    pub fn z(&self) -> i64 {
        match self {
            Position::D2 { .. } => 0,
            Position::D3 { z, .. } => *z,
        }
    }

    /// Squared distance from the origin.
    ///
    /// Computed in `u64` so that a full-extent 3D position cannot overflow.
    pub fn r_sqd(&self) -> u64 {
        let x = self.x().unsigned_abs();
        let y = self.y().unsigned_abs();
        let z = self.z().unsigned_abs();
        x * x + y * y + z * z
    }

    /// Largest absolute coordinate, the Chebyshev radius.
    pub fn max_abs_coord(&self) -> i64 {
        self.x().abs().max(self.y().abs()).max(self.z().abs())
    }

    pub(crate) fn translate(&mut self, (dx, dy, dz): (i64, i64, i64)) {
        match self {
            Position::D2 { x, y } => {
                *x += dx;
                *y += dy;
            }
            Position::D3 { x, y, z } => {
                *x += dx;
                *y += dy;
                *z += dz;
            }
        }
    }
}
