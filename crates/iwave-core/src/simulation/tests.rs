use super::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

fn sim(width: usize, height: usize) -> Simulation {
    Simulation::new(SimConfig {
        width,
        height,
        ..SimConfig::default()
    })
}

fn fill_random(sim: &mut Simulation, seed: u64) {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let grid = sim.grid_mut();
    for h in grid.heights_mut() {
        *h = rng.random_range(-1.0f32..1.0);
    }
    for h in grid.prev_heights_mut() {
        *h = rng.random_range(-1.0f32..1.0);
    }
    for s in grid.source_mut() {
        *s = rng.random_range(0.0f32..2.0);
    }
    for o in grid.obstruction_mut() {
        *o = rng.random_range(0.0f32..=1.0);
    }
}

fn in_outer_ring(x: usize, y: usize, width: usize, height: usize, r: usize) -> bool {
    x < r || y < r || x + r >= width || y + r >= height
}

#[test]
fn step_consumes_every_source() {
    let mut sim = sim(24, 18);
    fill_random(&mut sim, 7);
    assert!(sim.grid().source().iter().any(|&s| s != 0.0));
    sim.step();
    assert!(sim.grid().source().iter().all(|&s| s == 0.0));
}

#[test]
fn outer_ring_vertical_derivative_is_never_written() {
    let mut sim = sim(20, 20);
    let centre = sim.grid().idx(10, 10);
    sim.grid_mut().heights_mut()[centre] = 1.0;
    sim.step();

    let grid = sim.grid();
    let kernel = sim.kernel();
    for y in 0..20 {
        for x in 0..20 {
            let vd = grid.vertical_derivative()[grid.idx(x, y)];
            if in_outer_ring(x, y, 20, 20, 6) {
                assert_eq!(vd, 0.0, "ring cell ({x}, {y}) was written");
            } else {
                let dx = 10 - x as isize;
                let dy = 10 - y as isize;
                assert_eq!(vd, kernel.weight(dx, dy), "interior cell ({x}, {y})");
            }
        }
    }
    assert!((grid.vertical_derivative()[centre] - 1.0).abs() < 1e-6);
}

#[test]
fn outer_ring_keeps_zero_derivative_over_many_steps() {
    let mut sim = sim(20, 20);
    fill_random(&mut sim, 11);
    sim.grid_mut().clear_obstruction();
    for _ in 0..5 {
        sim.step();
    }
    let grid = sim.grid();
    for y in 0..20 {
        for x in 0..20 {
            if in_outer_ring(x, y, 20, 20, 6) {
                assert_eq!(grid.vertical_derivative()[grid.idx(x, y)], 0.0);
            }
        }
    }
}

#[test]
fn obstructed_cell_is_an_energy_sink() {
    let mut sim = sim(24, 24);
    fill_random(&mut sim, 3);
    let blocked = sim.grid().idx(12, 12);
    let partial = sim.grid().idx(5, 17);
    {
        let grid = sim.grid_mut();
        grid.obstruction_mut()[blocked] = 0.0;
        grid.source_mut()[blocked] = 5.0;
        grid.obstruction_mut()[partial] = 0.5;
    }
    let h_partial = sim.grid().heights()[partial];

    sim.step();

    let grid = sim.grid();
    assert_eq!(grid.heights()[blocked], 0.0);
    // hPrev holds the height saved after the obstruction pre-pass.
    assert_eq!(grid.prev_heights()[blocked], 0.0);
    assert_eq!(grid.prev_heights()[partial], h_partial * 0.5);
}

#[test]
fn clears_are_idempotent() {
    let mut sim = sim(16, 16);
    fill_random(&mut sim, 5);
    sim.step();
    sim.clear_waves();
    sim.clear_waves();
    let grid = sim.grid();
    assert!(grid.heights().iter().all(|&h| h == 0.0));
    assert!(grid.prev_heights().iter().all(|&h| h == 0.0));
    assert!(grid.vertical_derivative().iter().all(|&v| v == 0.0));

    sim.clear_obstruction();
    sim.clear_obstruction();
    sim.clear_source();
    assert!(sim.grid().obstruction().iter().all(|&o| o == 1.0));
    assert!(sim.grid().source().iter().all(|&s| s == 0.0));
}

#[test]
fn single_impulse_on_small_grid() {
    let mut sim = Simulation::new(SimConfig {
        width: 10,
        height: 10,
        alpha: 0.3,
        dt: 0.03,
        gravity_accel: 9.8,
        ..SimConfig::default()
    });
    let hit = sim.grid().idx(3, 4);
    sim.grid_mut().add_source(3, 4, 1.0);
    sim.step();

    let grid = sim.grid();
    assert!(grid.vertical_derivative().iter().all(|&v| v == 0.0));
    assert_eq!(grid.heights()[hit], 1.0);
    assert_eq!(grid.prev_heights()[hit], 0.0);
    for (i, &h) in grid.heights().iter().enumerate() {
        if i != hit {
            assert_eq!(h, 0.0);
        }
    }

    // Without a restoring term the cell only feels the damped inertia.
    sim.step();
    let adt = 0.3f32 * 0.03;
    let expected = (2.0 - adt) / (1.0 + adt);
    assert!((sim.grid().heights()[hit] - expected).abs() < 1e-6);
    assert_eq!(sim.grid().prev_heights()[hit], 1.0);
}

#[test]
fn damped_energy_decreases_monotonically() {
    let mut sim = sim(32, 32);
    {
        let grid = sim.grid_mut();
        for y in 0..32 {
            for x in 0..32 {
                let d2 = ((x as f32 - 16.0).powi(2) + (y as f32 - 16.0).powi(2)) / 8.0;
                let i = grid.idx(x, y);
                grid.heights_mut()[i] = (-d2).exp();
            }
        }
        let at_rest = grid.heights().to_vec();
        grid.prev_heights_mut().copy_from_slice(&at_rest);
    }

    let adt = (0.3f32 * 0.03) as f64;
    let contraction = 1.0 / (1.0 + adt);
    let initial = sim.energy();
    assert!(initial > 0.0);
    let mut previous = initial;
    for step in 0..200 {
        sim.step();
        let energy = sim.energy();
        assert!(
            energy <= previous * (1.0 + 1e-4),
            "energy grew at step {step}: {previous} -> {energy}"
        );
        assert!((energy / previous - contraction).abs() < 1e-3);
        previous = energy;
    }
    assert!(previous < initial * 0.25);
}

#[test]
fn impulse_response_is_mirror_symmetric() {
    let mut sim = sim(31, 31);
    let centre = sim.grid().idx(15, 15);
    sim.grid_mut().source_mut()[centre] = 1.0;
    for _ in 0..20 {
        sim.step();
    }
    let grid = sim.grid();
    for y in 0..31 {
        for x in 0..31 {
            let h = grid.height_at(x, y);
            assert!((h - grid.height_at(30 - x, y)).abs() < 1e-5);
            assert!((h - grid.height_at(y, x)).abs() < 1e-5);
        }
    }
    assert!(grid.heights().iter().all(|h| h.is_finite()));
}

#[test]
fn step_index_and_timings_advance() {
    let mut sim = sim(20, 20);
    assert_eq!(sim.step_index(), 0);
    let timings = sim.step();
    sim.step();
    assert_eq!(sim.step_index(), 2);
    assert!(timings.total_us >= timings.convolution_us);
}

#[test]
fn step_timings_accumulate_from_default() {
    let mut sim = sim(20, 20);
    let mut totals = StepTimings::default();
    assert_eq!(totals.total_us, 0);
    for _ in 0..3 {
        let t = sim.step();
        let copy = t;
        assert_eq!(copy.total_us, t.total_us);
        totals.convolution_us += t.convolution_us;
        totals.total_us += t.total_us;
    }
    assert!(totals.total_us >= totals.convolution_us);
}

#[test]
fn convolution_matches_direct_sum_on_non_square_grid() {
    let (width, height) = (23, 17);
    let kernel = DispersionKernel::new(3, 1.0);
    let r = kernel.radius() as isize;
    let mut rng = ChaCha12Rng::seed_from_u64(11);
    let field: Vec<f32> = (0..width * height)
        .map(|_| rng.random_range(-1.0f32..1.0))
        .collect();
    let sentinel = 123.0f32;
    let mut out = vec![sentinel; width * height];
    super::step::convolve_interior(&kernel, width, height, &field, &mut out);

    for y in 0..height {
        for x in 0..width {
            let got = out[x + width * y];
            if in_outer_ring(x, y, width, height, 3) {
                assert_eq!(got, sentinel, "ring cell ({x}, {y}) written");
                continue;
            }
            let mut expected = 0.0f32;
            for dx in -r..=r {
                for dy in -r..=r {
                    let sx = (x as isize + dx) as usize;
                    let sy = (y as isize + dy) as usize;
                    expected += kernel.weight(dx, dy) * field[sx + width * sy];
                }
            }
            assert_eq!(got, expected, "cell ({x}, {y})");
        }
    }
}

#[test]
fn run_experiment_samples_on_interval_and_last_step() {
    let mut sim = sim(20, 20);
    let summary = sim.run_experiment(10, 3);
    let steps: Vec<usize> = summary.samples.iter().map(|m| m.step).collect();
    assert_eq!(steps, vec![3, 6, 9, 10]);
    assert_eq!(summary.width, 20);
    assert_eq!(summary.height, 20);
    assert_eq!(summary.schema_version, 1);

    let json = serde_json::to_string(&summary).unwrap();
    let parsed: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.samples.len(), 4);
}

#[test]
fn before_step_hook_paints_between_ticks() {
    let mut sim = sim(20, 20);
    let mut calls = Vec::new();
    let summary = sim
        .try_run_experiment_with(4, 1, |grid, step| {
            calls.push(step);
            if step == 1 {
                grid.add_source(10, 10, 1.0);
            }
        })
        .unwrap();
    assert_eq!(calls, vec![1, 2, 3, 4]);
    assert!(summary.samples[0].max_abs_height >= 1.0);
    assert!(sim.grid().source().iter().all(|&s| s == 0.0));
}

#[test]
fn experiment_arguments_are_validated() {
    let mut sim = sim(12, 12);
    assert_eq!(
        sim.try_run_experiment(5, 0).unwrap_err(),
        ExperimentError::InvalidSampleEvery
    );
    assert!(matches!(
        sim.try_run_experiment(Simulation::MAX_EXPERIMENT_STEPS + 1, 1),
        Err(ExperimentError::TooManySteps { .. })
    ));
    assert!(matches!(
        sim.try_run_experiment(Simulation::MAX_EXPERIMENT_SAMPLES + 1, 1),
        Err(ExperimentError::TooManySamples { .. })
    ));
    assert_eq!(sim.step_index(), 0);
}

#[test]
fn construction_rejects_bad_config_and_kernel() {
    let err = Simulation::try_new(SimConfig {
        height: 0,
        ..SimConfig::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, SimInitError::Config(_)));

    let err = Simulation::try_with_kernel(
        SimConfig {
            width: 16,
            height: 16,
            ..SimConfig::default()
        },
        DispersionKernel::new(3, 1.0),
    )
    .err()
    .unwrap();
    assert_eq!(
        err,
        SimInitError::KernelRadiusMismatch {
            expected: 6,
            actual: 3
        }
    );
}

#[test]
#[should_panic]
fn infallible_constructor_panics_on_invalid_config() {
    Simulation::new(SimConfig {
        dt: -1.0,
        ..SimConfig::default()
    });
}
