use iwave_core::{SimConfig, Simulation, StepTimings};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::Instant;

fn seed_heights(sim: &mut Simulation, seed: u64) {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let grid = sim.grid_mut();
    for h in grid.heights_mut() {
        *h = rng.random::<f32>() * 0.2 - 0.1;
    }
    let at_rest = grid.heights().to_vec();
    grid.prev_heights_mut().copy_from_slice(&at_rest);
}

fn main() {
    let size = 400;
    println!("Benchmarking {size}x{size} grid ({} cells)", size * size);

    let config = SimConfig {
        width: size,
        height: size,
        seed: 42,
        ..SimConfig::default()
    };

    let mut sim1 = Simulation::new(config.clone());
    let mut sim2 = Simulation::new(config.clone());
    seed_heights(&mut sim1, config.seed);
    seed_heights(&mut sim2, config.seed);

    let steps = 20;

    // Run WITHOUT metrics
    let start = Instant::now();
    let mut totals = StepTimings::default();
    for _ in 0..steps {
        let t = sim1.step();
        totals.obstruction_us += t.obstruction_us;
        totals.convolution_us += t.convolution_us;
        totals.integration_us += t.integration_us;
        totals.total_us += t.total_us;
    }
    let duration_no_metrics = start.elapsed();
    println!("Time for {} steps WITHOUT metrics: {:?}", steps, duration_no_metrics);
    println!("Avg time per step (no metrics): {:?}", duration_no_metrics / steps as u32);
    println!(
        "Phase averages (us): obstruction {}, convolution {}, integration {}",
        totals.obstruction_us / steps as u64,
        totals.convolution_us / steps as u64,
        totals.integration_us / steps as u64
    );

    // Run WITH metrics (every step)
    let start = Instant::now();
    sim2.run_experiment(steps, 1);
    let duration_metrics = start.elapsed();

    println!("Time for {} steps WITH metrics: {:?}", steps, duration_metrics);
    println!("Avg time per step (with metrics): {:?}", duration_metrics / steps as u32);

    let diff = duration_metrics.saturating_sub(duration_no_metrics);
    println!("Total metrics overhead: {:?}", diff);
    println!("Avg metrics overhead per step: {:?}", diff / steps as u32);
}
