use crate::config::AggregateConfig;
use crate::error::AggregateError;
use crate::position::Position;
use crate::settings::{Dimension, Lattice};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, trace};

/// Small elastic margin between the spawn surface and the hard boundary
const BOUNDARY_EPSILON: i64 = 2;

/// Seed geometry the aggregate grows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Attractor {
    #[default]
    Point,
    Circle,
    Sphere,
    Line,
    Plane,
}

impl Attractor {
    pub fn name(&self) -> &str {
        match self {
            Attractor::Point => "Point",
            Attractor::Circle => "Circle",
            Attractor::Sphere => "Sphere",
            Attractor::Line => "Line",
            Attractor::Plane => "Plane",
        }
    }

    /// Whether this seed geometry exists in the given dimensionality.
    pub fn supported_in(&self, dim: Dimension) -> bool {
        match dim {
            Dimension::Two => matches!(self, Attractor::Point | Attractor::Line | Attractor::Circle),
            Dimension::Three => true,
        }
    }
}

impl fmt::Display for Attractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one spawn-walk-stick cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The walker joined the aggregate; its statistics were recorded
    Stuck { steps: u64, boundary_collisions: u64 },
    /// The step budget ran out; the walker was abandoned and nothing was recorded
    Exhausted { steps: u64, boundary_collisions: u64 },
}

/// How a `generate` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateStatus {
    Completed,
    Cancelled,
}

/// A diffusion-limited aggregate on an integer lattice.
///
/// Walkers are released one at a time from a spawn surface enclosing the
/// cluster, advance by uniform lattice moves, reflect off an
/// attractor-shaped outer boundary, and deposit at their pre-collision
/// position when they first touch the cluster (subject to the stickiness
/// probability). Particle order, per-particle statistics, and the PRNG
/// draw order are all observable: a fixed `rng_seed` reproduces a run
/// exactly.
pub struct Aggregate {
    dim: Dimension,
    lattice: Lattice,
    attractor: Attractor,
    stickiness: f64,
    /// Stuck particles in deposition order; the seed occupies the prefix
    stuck: Vec<Position>,
    /// Membership index over `stuck`; insertion order stays with the Vec
    occupied: HashSet<Position>,
    seed: Vec<Position>,
    /// Lattice step attempts each walker needed before sticking
    required_steps: Vec<u64>,
    /// Boundary reflections each walker experienced before sticking
    boundary_collisions: Vec<u64>,
    max_x: u64,
    max_y: u64,
    max_z: u64,
    max_r_sqd: u64,
    b_offset: i64,
    spawn_diam: i64,
    att_size: u32,
    max_walk_steps: u64,
    rng: SmallRng,
}

impl Aggregate {
    /// Validate `config`, seed the PRNG, and materialize the attractor.
    pub fn new(config: &AggregateConfig) -> Result<Self, AggregateError> {
        config.validate()?;
        let settings = &config.settings;
        // Circle and sphere seeds never adapt the spawn region, so it must
        // enclose the seed from the start.
        let spawn_diam = match config.attractor {
            Attractor::Circle | Attractor::Sphere => {
                2 * i64::from(settings.attractor_size) + settings.boundary_offset
            }
            _ => settings.boundary_offset,
        };
        let mut aggregate = Self {
            dim: config.dim,
            lattice: config.lattice,
            attractor: config.attractor,
            stickiness: config.stickiness,
            stuck: Vec::new(),
            occupied: HashSet::new(),
            seed: Vec::new(),
            required_steps: Vec::new(),
            boundary_collisions: Vec::new(),
            max_x: 0,
            max_y: 0,
            max_z: 0,
            max_r_sqd: 0,
            b_offset: settings.boundary_offset,
            spawn_diam,
            att_size: settings.attractor_size,
            max_walk_steps: settings.max_walk_steps,
            rng: seeded_rng(settings.rng_seed),
        };
        aggregate.seed_attractor();
        Ok(aggregate)
    }

    /// Pre-size particle and statistics storage for `n` additional walkers.
    pub fn reserve(&mut self, n: usize) -> Result<(), AggregateError> {
        let exhausted = |source| AggregateError::StorageExhausted { requested: n, source };
        self.stuck.try_reserve(n).map_err(exhausted)?;
        self.occupied.try_reserve(n).map_err(exhausted)?;
        self.required_steps.try_reserve(n).map_err(exhausted)?;
        self.boundary_collisions.try_reserve(n).map_err(exhausted)?;
        Ok(())
    }

    /// Grow the aggregate by `n` stuck walkers.
    pub fn generate(&mut self, n: usize) -> Result<GenerateStatus, AggregateError> {
        self.generate_with(n, |_, _| {}, || false)
    }

    /// Grow the aggregate by `n` stuck walkers with observation hooks.
    ///
    /// `progress` is invoked after every stick with (sticks so far, n).
    /// `cancel` is polled between particles; returning `true` stops
    /// generation with [`GenerateStatus::Cancelled`] and every invariant
    /// intact for the prefix that did stick.
    pub fn generate_with<P, C>(
        &mut self,
        n: usize,
        mut progress: P,
        mut cancel: C,
    ) -> Result<GenerateStatus, AggregateError>
    where
        P: FnMut(usize, usize),
        C: FnMut() -> bool,
    {
        self.reserve(n)?;
        debug!(
            n,
            dim = self.dim.name(),
            lattice = self.lattice.name(),
            attractor = self.attractor.name(),
            "generating aggregate"
        );
        let budget = self.max_walk_steps;
        let mut count = 0usize;
        while count < n {
            if cancel() {
                debug!(stuck = count, "generation cancelled");
                return Ok(GenerateStatus::Cancelled);
            }
            match self.walk_particle(budget) {
                WalkOutcome::Stuck { .. } => {
                    count += 1;
                    progress(count, n);
                }
                WalkOutcome::Exhausted { .. } => {
                    return Err(AggregateError::WalkBudgetExhausted { budget });
                }
            }
        }
        debug!(particles = count, spawn_diam = self.spawn_diam, "generation complete");
        Ok(GenerateStatus::Completed)
    }

    /// Run one full spawn-walk-stick cycle with an explicit step budget.
    ///
    /// On [`WalkOutcome::Stuck`] the particle and its statistics have been
    /// committed; on [`WalkOutcome::Exhausted`] the walker is discarded and
    /// the aggregate is unchanged apart from the consumed PRNG draws.
    pub fn walk_particle(&mut self, budget: u64) -> WalkOutcome {
        let mut curr = self.spawn_walker();
        let mut steps = 0u64;
        let mut bcolls = 0u64;
        while steps < budget {
            let prev = curr;
            self.advance_walker(&mut curr);
            steps += 1;
            if self.enforce_boundary(&mut curr, prev) {
                bcolls += 1;
            }
            if self.try_stick(curr, prev) {
                self.required_steps.push(steps);
                self.boundary_collisions.push(bcolls);
                trace!(steps, boundary_collisions = bcolls, "walker stuck");
                return WalkOutcome::Stuck { steps, boundary_collisions: bcolls };
            }
        }
        WalkOutcome::Exhausted { steps, boundary_collisions: bcolls }
    }

    /// Draw a spawn position on the surface enclosing the cluster.
    ///
    /// Branch probabilities and the per-branch draw order are fixed; with
    /// the threshold ordering of the move tables they pin down the entire
    /// PRNG stream of a run.
    fn spawn_walker(&mut self) -> Position {
        let ppr: f64 = self.rng.gen();
        let sd = self.spawn_diam as f64;
        match self.dim {
            Dimension::Two => match self.attractor {
                Attractor::Line => {
                    let a = f64::from(self.att_size);
                    let x = 2 * ((a * (self.rng.gen::<f64>() - 0.5)) as i64);
                    let y = if ppr < 0.5 { self.spawn_diam } else { -self.spawn_diam };
                    Position::D2 { x, y }
                }
                // Point and circle share the box surface
                _ => {
                    if ppr < 0.5 {
                        let x = (sd * (self.rng.gen::<f64>() - 0.5)) as i64;
                        let y = if ppr < 0.25 { (sd * 0.5) as i64 } else { -((sd * 0.5) as i64) };
                        Position::D2 { x, y }
                    } else {
                        let x = if ppr < 0.75 { (sd * 0.5) as i64 } else { -((sd * 0.5) as i64) };
                        let y = (sd * (self.rng.gen::<f64>() - 0.5)) as i64;
                        Position::D2 { x, y }
                    }
                }
            },
            Dimension::Three => match self.attractor {
                Attractor::Line => {
                    let a = f64::from(self.att_size);
                    let x = 2 * ((a * (self.rng.gen::<f64>() - 0.5)) as i64);
                    // One coin decides both transverse signs
                    let yz = if ppr < 0.5 { self.spawn_diam } else { -self.spawn_diam };
                    Position::D3 { x, y: yz, z: yz }
                }
                Attractor::Plane => {
                    let a = f64::from(self.att_size);
                    let x = 2 * ((a * (self.rng.gen::<f64>() - 0.5)) as i64);
                    let y = 2 * ((a * (self.rng.gen::<f64>() - 0.5)) as i64);
                    let z = if ppr < 0.5 { self.spawn_diam } else { -self.spawn_diam };
                    Position::D3 { x, y, z }
                }
                // Point, circle and sphere share the cube surface
                _ => {
                    if ppr < 1.0 / 3.0 {
                        let x = (sd * (self.rng.gen::<f64>() - 0.5)) as i64;
                        let y = (sd * (self.rng.gen::<f64>() - 0.5)) as i64;
                        let z = if ppr < 1.0 / 6.0 { (sd * 0.5) as i64 } else { -((sd * 0.5) as i64) };
                        Position::D3 { x, y, z }
                    } else if ppr < 2.0 / 3.0 {
                        let x = if ppr < 0.5 { (sd * 0.5) as i64 } else { -((sd * 0.5) as i64) };
                        let y = (sd * (self.rng.gen::<f64>() - 0.5)) as i64;
                        let z = (sd * (self.rng.gen::<f64>() - 0.5)) as i64;
                        Position::D3 { x, y, z }
                    } else {
                        let x = (sd * (self.rng.gen::<f64>() - 0.5)) as i64;
                        let y = if ppr < 5.0 / 6.0 { (sd * 0.5) as i64 } else { -((sd * 0.5) as i64) };
                        let z = (sd * (self.rng.gen::<f64>() - 0.5)) as i64;
                        Position::D3 { x, y, z }
                    }
                }
            },
        }
    }

    /// Advance the walker by one uniformly drawn lattice move.
    fn advance_walker(&mut self, pos: &mut Position) {
        let md: f64 = self.rng.gen();
        let moves = self.lattice.moves(self.dim);
        let k = moves.len() as f64;
        // Cumulative thresholds in table order; the last entry is the else
        // branch and absorbs any numeric residue.
        let mut idx = moves.len() - 1;
        for i in 0..moves.len() - 1 {
            if md < (i as f64 + 1.0) / k {
                idx = i;
                break;
            }
        }
        pos.translate(moves[idx]);
    }

    /// Revert steps that leave the bounded region around the attractor.
    ///
    /// Returns true when the step was reverted; the walk continues from the
    /// restored position.
    fn enforce_boundary(&self, curr: &mut Position, prev: Position) -> bool {
        let within = match self.attractor {
            Attractor::Point | Attractor::Circle | Attractor::Sphere => {
                let bound = (self.spawn_diam as f64 * 0.5) as i64 + BOUNDARY_EPSILON;
                curr.max_abs_coord() <= bound
            }
            Attractor::Line => {
                let along = 2 * i64::from(self.att_size);
                let transverse = self.spawn_diam + BOUNDARY_EPSILON;
                curr.x().abs() <= along
                    && curr.y().abs() <= transverse
                    && curr.z().abs() <= transverse
            }
            Attractor::Plane => {
                let along = 2 * i64::from(self.att_size);
                let transverse = self.spawn_diam + BOUNDARY_EPSILON;
                curr.x().abs() <= along
                    && curr.y().abs() <= along
                    && curr.z().abs() <= transverse
            }
        };
        if within {
            return false;
        }
        *curr = prev;
        true
    }

    /// Attempt to stick the walker after a step.
    ///
    /// The stickiness draw happens on every step so the PRNG stream does
    /// not depend on cluster contents. Coincidence is tested at `curr`, the
    /// deposit happens at `prev`; a walker resting on an occupied site
    /// keeps walking, which is what keeps stuck positions distinct.
    fn try_stick(&mut self, curr: Position, prev: Position) -> bool {
        if self.rng.gen::<f64>() > self.stickiness {
            return false;
        }
        if !self.occupied.contains(&curr) {
            return false;
        }
        if self.occupied.contains(&prev) {
            return false;
        }
        self.commit_stick(prev);
        true
    }

    /// Deposit a walker and refresh the growth metrics and spawn region.
    fn commit_stick(&mut self, particle: Position) {
        self.stuck.push(particle);
        self.occupied.insert(particle);
        let ax = particle.x().unsigned_abs();
        if ax > self.max_x {
            self.max_x = ax;
        }
        let ay = particle.y().unsigned_abs();
        let mut grew_y = false;
        if ay > self.max_y {
            self.max_y = ay;
            grew_y = true;
        }
        let az = particle.z().unsigned_abs();
        let mut grew_z = false;
        if az > self.max_z {
            self.max_z = az;
            grew_z = true;
        }
        match self.attractor {
            Attractor::Point => {
                let r_sqd = particle.r_sqd();
                if r_sqd > self.max_r_sqd {
                    self.max_r_sqd = r_sqd;
                    self.spawn_diam = 2 * ((r_sqd as f64).sqrt() as i64) + self.b_offset;
                }
            }
            // Circle and sphere track the radius but keep their spawn box
            Attractor::Circle | Attractor::Sphere => {
                let r_sqd = particle.r_sqd();
                if r_sqd > self.max_r_sqd {
                    self.max_r_sqd = r_sqd;
                }
            }
            Attractor::Line => {
                if self.dim == Dimension::Two && grew_y {
                    self.spawn_diam = self.max_y as i64 + self.b_offset;
                }
            }
            Attractor::Plane => {
                if grew_z {
                    self.spawn_diam = self.max_z as i64 + self.b_offset;
                }
            }
        }
    }

    /// Materialize the seed geometry before any walking occurs.
    fn seed_attractor(&mut self) {
        let size = i64::from(self.att_size);
        match self.attractor {
            Attractor::Point => self.push_seed(Position::origin(self.dim)),
            Attractor::Line => {
                let half = (0.5 * f64::from(self.att_size)) as i64;
                for i in 0..size {
                    let p = match self.dim {
                        Dimension::Two => Position::D2 { x: i - half, y: 0 },
                        Dimension::Three => Position::D3 { x: i - half, y: 0, z: 0 },
                    };
                    self.push_seed(p);
                }
            }
            Attractor::Plane => {
                let half = (0.5 * f64::from(self.att_size)) as i64;
                for i in 0..size {
                    for j in 0..size {
                        self.push_seed(Position::D3 { x: i - half, y: j - half, z: 0 });
                    }
                }
            }
            Attractor::Circle => {
                let radius = f64::from(self.att_size);
                let step = 1.0 / radius;
                let mut theta = 0.0;
                // Sweeps past 2π by design; coarse sweeps may emit duplicate
                // rounded points and the seed keeps them.
                while theta < 2.0 * PI + step {
                    let x = (radius * theta.cos()) as i64;
                    let y = (radius * theta.sin()) as i64;
                    let p = match self.dim {
                        Dimension::Two => Position::D2 { x, y },
                        Dimension::Three => Position::D3 { x, y, z: 0 },
                    };
                    self.push_seed(p);
                    theta += step;
                }
            }
            Attractor::Sphere => {
                let radius = f64::from(self.att_size);
                let step = 1.0 / radius;
                let mut phi = 0.0;
                while phi < 2.0 * PI + step {
                    let mut theta = -0.5 * PI;
                    while theta < 0.5 * PI + step {
                        self.push_seed(Position::D3 {
                            x: (radius * theta.sin() * phi.cos()) as i64,
                            y: (radius * theta.sin() * phi.sin()) as i64,
                            z: (radius * theta.cos()) as i64,
                        });
                        theta += step;
                    }
                    phi += step;
                }
            }
        }
    }

    fn push_seed(&mut self, p: Position) {
        self.seed.push(p);
        self.stuck.push(p);
        self.occupied.insert(p);
        let ax = p.x().unsigned_abs();
        if ax > self.max_x {
            self.max_x = ax;
        }
        let ay = p.y().unsigned_abs();
        if ay > self.max_y {
            self.max_y = ay;
        }
        let az = p.z().unsigned_abs();
        if az > self.max_z {
            self.max_z = az;
        }
        if matches!(
            self.attractor,
            Attractor::Point | Attractor::Circle | Attractor::Sphere
        ) {
            let r_sqd = p.r_sqd();
            if r_sqd > self.max_r_sqd {
                self.max_r_sqd = r_sqd;
            }
        }
    }

    /// Total number of stuck particles, seed included.
    pub fn len(&self) -> usize {
        self.stuck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stuck.is_empty()
    }

    /// Number of particles in the seed prefix.
    pub fn seed_len(&self) -> usize {
        self.seed.len()
    }

    /// Stuck particles in deposition order; the first `seed_len()` entries
    /// are the seed.
    pub fn particles(&self) -> &[Position] {
        &self.stuck
    }

    pub fn particle_at(&self, index: usize) -> Option<Position> {
        self.stuck.get(index).copied()
    }

    pub fn seed_particles(&self) -> &[Position] {
        &self.seed
    }

    /// Whether `position` is occupied by a stuck particle.
    pub fn contains(&self, position: Position) -> bool {
        self.occupied.contains(&position)
    }

    /// Step attempts per stuck walker, in stick order (seed excluded).
    pub fn required_steps(&self) -> &[u64] {
        &self.required_steps
    }

    /// Boundary reflections per stuck walker, in stick order (seed excluded).
    pub fn boundary_collisions(&self) -> &[u64] {
        &self.boundary_collisions
    }

    pub fn max_x(&self) -> u64 {
        self.max_x
    }

    pub fn max_y(&self) -> u64 {
        self.max_y
    }

    pub fn max_z(&self) -> u64 {
        self.max_z
    }

    /// Largest squared radius observed among stuck particles (radial
    /// attractors only; stays 0 for line and plane seeds).
    pub fn max_r_sqd(&self) -> u64 {
        self.max_r_sqd
    }

    /// Current extent of the spawn surface.
    pub fn spawn_diam(&self) -> i64 {
        self.spawn_diam
    }

    pub fn stickiness(&self) -> f64 {
        self.stickiness
    }

    /// Adjust the stickiness between generation calls.
    pub fn set_stickiness(&mut self, stickiness: f64) -> Result<(), AggregateError> {
        if !(0.0..=1.0).contains(&stickiness) {
            return Err(AggregateError::StickinessOutOfRange(stickiness));
        }
        self.stickiness = stickiness;
        Ok(())
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    pub fn attractor(&self) -> Attractor {
        self.attractor
    }

    pub fn attractor_size(&self) -> u32 {
        self.att_size
    }

    pub fn boundary_offset(&self) -> i64 {
        self.b_offset
    }

    /// Mass-radius fractal dimension estimate, `ln N / ln √max_r_sqd`.
    ///
    /// Only meaningful for radially grown clusters; `None` for line and
    /// plane attractors or while the radius is degenerate.
    pub fn fractal_dimension(&self) -> Option<f64> {
        match self.attractor {
            Attractor::Point | Attractor::Circle | Attractor::Sphere => {
                if self.stuck.len() < 2 || self.max_r_sqd < 2 {
                    return None;
                }
                let radius = (self.max_r_sqd as f64).sqrt();
                Some((self.stuck.len() as f64).ln() / radius.ln())
            }
            Attractor::Line | Attractor::Plane => None,
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::seed_from_u64(rand::random()),
    }
}
