use dla_aggregate::{
    Aggregate, AggregateConfig, Attractor, Dimension, GenerateStatus, GrowthSettings, Lattice,
    Position,
};
use std::collections::HashSet;

fn config(
    dim: Dimension,
    lattice: Lattice,
    attractor: Attractor,
    stickiness: f64,
    rng_seed: u64,
) -> AggregateConfig {
    AggregateConfig {
        dim,
        lattice,
        attractor,
        stickiness,
        settings: GrowthSettings {
            rng_seed: Some(rng_seed),
            ..GrowthSettings::default()
        },
        ..AggregateConfig::default()
    }
}

fn is_lattice_neighbor(p: Position, q: Position, lattice: Lattice, dim: Dimension) -> bool {
    lattice.moves(dim).iter().any(|&(dx, dy, dz)| {
        p.x() - q.x() == dx && p.y() - q.y() == dy && p.z() - q.z() == dz
    })
}

/// Every stuck walker must touch a particle that stuck before it.
fn assert_connected_growth(aggregate: &Aggregate) {
    let particles = aggregate.particles();
    let lattice = aggregate.lattice();
    let dim = aggregate.dimension();
    for (i, &p) in particles.iter().enumerate().skip(aggregate.seed_len()) {
        assert!(
            particles[..i]
                .iter()
                .any(|&q| is_lattice_neighbor(p, q, lattice, dim)),
            "particle {i} at {p:?} does not touch the earlier cluster"
        );
    }
}

/// Walkers never duplicate each other or the seed; only coarse circle and
/// sphere sweeps may repeat a position, and only inside the seed prefix.
fn assert_distinct_walkers(aggregate: &Aggregate) {
    let walkers = &aggregate.particles()[aggregate.seed_len()..];
    let walker_unique: HashSet<_> = walkers.iter().collect();
    assert_eq!(walker_unique.len(), walkers.len());

    let seed: HashSet<_> = aggregate.seed_particles().iter().collect();
    assert!(walkers.iter().all(|w| !seed.contains(w)));
}

#[test]
fn seeded_runs_are_identical() {
    let cfg = config(Dimension::Two, Lattice::Square, Attractor::Point, 0.8, 0xBEEF);
    let mut a = Aggregate::new(&cfg).expect("aggregate a");
    let mut b = Aggregate::new(&cfg).expect("aggregate b");

    a.generate(120).expect("generate a");
    b.generate(120).expect("generate b");

    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.required_steps(), b.required_steps());
    assert_eq!(a.boundary_collisions(), b.boundary_collisions());
    assert_eq!(a.max_r_sqd(), b.max_r_sqd());
    assert_eq!(a.spawn_diam(), b.spawn_diam());
}

#[test]
fn seeded_runs_are_identical_in_3d() {
    let cfg = config(
        Dimension::Three,
        Lattice::Triangle,
        Attractor::Point,
        1.0,
        0xC0FFEE,
    );
    let mut a = Aggregate::new(&cfg).expect("aggregate a");
    let mut b = Aggregate::new(&cfg).expect("aggregate b");

    a.generate(40).expect("generate a");
    b.generate(40).expect("generate b");

    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.required_steps(), b.required_steps());
}

#[test]
fn walkers_are_distinct_and_connected() {
    for (dim, lattice) in [
        (Dimension::Two, Lattice::Square),
        (Dimension::Two, Lattice::Triangle),
        (Dimension::Three, Lattice::Square),
        (Dimension::Three, Lattice::Triangle),
    ] {
        let cfg = config(dim, lattice, Attractor::Point, 1.0, 0x5EED);
        let mut aggregate = Aggregate::new(&cfg).expect("aggregate");
        aggregate.generate(60).expect("generate");

        assert_distinct_walkers(&aggregate);
        assert_connected_growth(&aggregate);
    }
}

#[test]
fn statistics_stay_coherent() {
    let cfg = config(Dimension::Two, Lattice::Square, Attractor::Point, 0.6, 3);
    let mut aggregate = Aggregate::new(&cfg).expect("aggregate");
    aggregate.generate(80).expect("generate");

    assert_eq!(aggregate.len() - aggregate.seed_len(), 80);
    assert_eq!(aggregate.required_steps().len(), 80);
    assert_eq!(aggregate.boundary_collisions().len(), 80);
    for (steps, bcolls) in aggregate
        .required_steps()
        .iter()
        .zip(aggregate.boundary_collisions())
    {
        assert!(bcolls <= steps);
        assert!(*steps > 0);
    }
}

#[test]
fn growth_metrics_are_monotone() {
    let cfg = config(Dimension::Two, Lattice::Square, Attractor::Point, 1.0, 17);
    let mut aggregate = Aggregate::new(&cfg).expect("aggregate");

    let mut last = (0, 0, 0, aggregate.spawn_diam());
    for _ in 0..8 {
        aggregate.generate(25).expect("generate");
        let now = (
            aggregate.max_x(),
            aggregate.max_y(),
            aggregate.max_r_sqd(),
            aggregate.spawn_diam(),
        );
        assert!(now.0 >= last.0);
        assert!(now.1 >= last.1);
        assert!(now.2 >= last.2);
        assert!(now.3 >= last.3);
        assert!(now.3 >= aggregate.boundary_offset());
        last = now;
    }
}

#[test]
fn point_growth_respects_spawn_region() {
    let cfg = config(Dimension::Two, Lattice::Square, Attractor::Point, 1.0, 200);
    let mut aggregate = Aggregate::new(&cfg).expect("aggregate");
    aggregate.generate(200).expect("generate");

    // The final bounding region contains every historical one.
    let bound = aggregate.spawn_diam() / 2 + 2;
    for p in aggregate.particles() {
        assert!(p.max_abs_coord() <= bound);
    }

    let max_r_sqd = aggregate.max_r_sqd();
    assert!(max_r_sqd >= aggregate.max_x() * aggregate.max_x());
    assert!(max_r_sqd >= aggregate.max_y() * aggregate.max_y());
    let radius = (max_r_sqd as f64).sqrt() as i64;
    assert!(aggregate.spawn_diam() >= 2 * radius + aggregate.boundary_offset());
}

#[test]
fn line_growth_stays_in_corridor() {
    let mut cfg = config(Dimension::Two, Lattice::Square, Attractor::Line, 1.0, 41);
    cfg.settings.attractor_size = 5;
    let mut aggregate = Aggregate::new(&cfg).expect("aggregate");
    aggregate.generate(50).expect("generate");

    let transverse = aggregate.spawn_diam() + 2;
    for p in aggregate.particles() {
        assert!(p.x().abs() <= 10);
        assert!(p.y().abs() <= transverse);
    }
    assert_connected_growth(&aggregate);
}

#[test]
fn lower_stickiness_means_longer_walks() {
    let mut means = Vec::new();
    for stickiness in [1.0, 0.2] {
        let cfg = config(
            Dimension::Two,
            Lattice::Square,
            Attractor::Point,
            stickiness,
            0xABCD,
        );
        let mut aggregate = Aggregate::new(&cfg).expect("aggregate");
        aggregate.generate(150).expect("generate");
        means.push(dla_aggregate::stats::mean(aggregate.required_steps()));
    }
    assert!(means[1] >= means[0], "sticky: {}, reluctant: {}", means[0], means[1]);
}

#[test]
fn cancellation_leaves_consistent_prefix() {
    let cfg = config(Dimension::Two, Lattice::Square, Attractor::Point, 1.0, 77);
    let mut aggregate = Aggregate::new(&cfg).expect("aggregate");

    let mut polls = 0;
    let status = aggregate
        .generate_with(
            100,
            |_, _| {},
            || {
                polls += 1;
                polls > 5
            },
        )
        .expect("generate");

    assert_eq!(status, GenerateStatus::Cancelled);
    assert_eq!(aggregate.len() - aggregate.seed_len(), 5);
    assert_eq!(aggregate.required_steps().len(), 5);
    assert_eq!(aggregate.boundary_collisions().len(), 5);
    assert_connected_growth(&aggregate);
}

#[test]
fn sphere_accretion_stays_bounded() {
    let mut cfg = config(Dimension::Three, Lattice::Square, Attractor::Sphere, 1.0, 9);
    cfg.settings.attractor_size = 6;
    let mut aggregate = Aggregate::new(&cfg).expect("aggregate");
    assert_eq!(aggregate.spawn_diam(), 18);

    aggregate.generate(40).expect("generate");
    let bound = aggregate.spawn_diam() / 2 + 2;
    for p in aggregate.particles() {
        assert!(p.max_abs_coord() <= bound);
    }
    // Spheres never adapt their spawn surface.
    assert_eq!(aggregate.spawn_diam(), 18);
    assert_connected_growth(&aggregate);
}

#[test]
fn plane_deposition_grows_in_z() {
    let mut cfg = config(Dimension::Three, Lattice::Square, Attractor::Plane, 1.0, 13);
    cfg.settings.attractor_size = 8;
    let mut aggregate = Aggregate::new(&cfg).expect("aggregate");
    assert_eq!(aggregate.seed_len(), 64);

    aggregate.generate(40).expect("generate");
    let transverse = aggregate.spawn_diam() + 2;
    for p in aggregate.particles() {
        assert!(p.x().abs() <= 16);
        assert!(p.y().abs() <= 16);
        assert!(p.z().abs() <= transverse);
    }
    assert!(aggregate.spawn_diam() >= aggregate.boundary_offset());
    assert_connected_growth(&aggregate);
}

#[test]
fn progress_callback_counts_up_to_n() {
    let cfg = config(Dimension::Two, Lattice::Square, Attractor::Point, 1.0, 55);
    let mut aggregate = Aggregate::new(&cfg).expect("aggregate");

    let mut reports = Vec::new();
    let status = aggregate
        .generate_with(10, |done, total| reports.push((done, total)), || false)
        .expect("generate");

    assert_eq!(status, GenerateStatus::Completed);
    assert_eq!(reports.len(), 10);
    assert_eq!(reports.first(), Some(&(1, 10)));
    assert_eq!(reports.last(), Some(&(10, 10)));
}
