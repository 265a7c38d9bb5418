use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimensionality of the lattice an aggregate grows on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    Two,
    Three,
}

impl Dimension {
    pub fn name(&self) -> &str {
        match self {
            Dimension::Two => "2D",
            Dimension::Three => "3D",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lattice geometry, determines the move set of random walkers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lattice {
    /// Square (2D) or cubic (3D) lattice with axis-aligned unit moves
    #[default]
    Square,
    /// Triangular (2D) or layered-triangular (3D) lattice
    Triangle,
}

impl Lattice {
    pub fn name(&self) -> &str {
        match self {
            Lattice::Square => "Square",
            Lattice::Triangle => "Triangle",
        }
    }

    /// Unit moves for this lattice, in threshold order.
    ///
    /// Step selection draws a single uniform in [0, 1) and walks these
    /// entries with cumulative thresholds of 1/len each; the final entry
    /// absorbs any numeric residue. The ordering is part of the observable
    /// contract: a fixed PRNG stream must reproduce the same walk.
    pub fn moves(&self, dim: Dimension) -> &'static [(i64, i64, i64)] {
        match (self, dim) {
            (Lattice::Square, Dimension::Two) => &[
                (1, 0, 0),
                (-1, 0, 0),
                (0, 1, 0),
                (0, -1, 0),
            ],
            (Lattice::Square, Dimension::Three) => &[
                (1, 0, 0),
                (-1, 0, 0),
                (0, 1, 0),
                (0, -1, 0),
                (0, 0, 1),
                (0, 0, -1),
            ],
            (Lattice::Triangle, Dimension::Two) => &[
                (1, 0, 0),
                (-1, 0, 0),
                (1, 1, 0),
                (1, -1, 0),
                (-1, 1, 0),
                (-1, -1, 0),
            ],
            // Kept verbatim from the reference move table; not a true
            // close-packed neighbourhood.
            (Lattice::Triangle, Dimension::Three) => &[
                (1, 1, 0),
                (1, -1, 0),
                (-1, -1, 0),
                (-1, 1, 0),
                (1, 0, 0),
                (-1, 0, 0),
                (0, 0, 1),
                (0, 0, -1),
            ],
        }
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tunable generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthSettings {
    /// Characteristic seed size: line length, circle/sphere radius, or
    /// plane edge length. Must be at least 1. Ignored by point attractors.
    pub attractor_size: u32,
    /// Margin between the spawn surface and the outer lattice boundary
    pub boundary_offset: i64,
    /// Per-walker step budget before the walk is abandoned
    pub max_walk_steps: u64,
    /// Fixed PRNG seed for reproducible runs; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self {
            attractor_size: 1,
            boundary_offset: 6,
            max_walk_steps: 10_000_000,
            rng_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_move_set_sizes() {
        assert_eq!(Lattice::Square.moves(Dimension::Two).len(), 4);
        assert_eq!(Lattice::Square.moves(Dimension::Three).len(), 6);
        assert_eq!(Lattice::Triangle.moves(Dimension::Two).len(), 6);
        assert_eq!(Lattice::Triangle.moves(Dimension::Three).len(), 8);
    }

    #[test]
    fn test_moves_distinct_and_nonzero() {
        for lattice in [Lattice::Square, Lattice::Triangle] {
            for dim in [Dimension::Two, Dimension::Three] {
                let moves = lattice.moves(dim);
                let unique: HashSet<_> = moves.iter().collect();
                assert_eq!(unique.len(), moves.len());
                assert!(moves.iter().all(|m| *m != (0, 0, 0)));
            }
        }
    }

    #[test]
    fn test_planar_moves_stay_planar() {
        for lattice in [Lattice::Square, Lattice::Triangle] {
            for (_, _, dz) in lattice.moves(Dimension::Two) {
                assert_eq!(*dz, 0);
            }
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = GrowthSettings::default();
        assert_eq!(settings.attractor_size, 1);
        assert_eq!(settings.boundary_offset, 6);
        assert_eq!(settings.max_walk_steps, 10_000_000);
        assert!(settings.rng_seed.is_none());
    }
}
