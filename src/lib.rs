//! Diffusion-limited aggregation on 2D and 3D integer lattices.
//!
//! An [`Aggregate`] grows by releasing random walkers from a spawn surface
//! enclosing a seed attractor, advancing each walker one lattice move at a
//! time, reflecting it off an adaptive outer boundary, and depositing it at
//! its pre-collision position when it first touches the cluster (subject to
//! a stickiness probability). Every stuck walker records the lattice steps
//! it took and the boundary reflections it experienced.
//!
//! Generation is single-threaded, synchronous, and fully deterministic for
//! a fixed [`GrowthSettings::rng_seed`].
//!
//! ```
//! use dla_aggregate::{Aggregate, AggregateConfig};
//!
//! let mut config = AggregateConfig::default();
//! config.settings.rng_seed = Some(7);
//! let mut aggregate = Aggregate::new(&config)?;
//! aggregate.generate(500)?;
//! assert_eq!(aggregate.len(), 501); // origin seed plus 500 walkers
//! assert_eq!(aggregate.required_steps().len(), 500);
//! # Ok::<(), dla_aggregate::AggregateError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod position;
pub mod presets;
pub mod settings;
pub mod stats;

pub use aggregate::{Aggregate, Attractor, GenerateStatus, WalkOutcome};
pub use config::{AggregateConfig, ConfigError};
pub use error::AggregateError;
pub use position::Position;
pub use presets::{Preset, PresetManager};
pub use settings::{Dimension, GrowthSettings, Lattice};
