// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Two-body orbit comparing Euler and Leapfrog
//!
//! Two equal solar masses one AU apart on a circular mutual orbit, run with
//! both integrators and both solvers. Prints the energy and angular momentum
//! drift of each combination.
//!
//! Run with: `RUST_LOG=info cargo run --example two_body`

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use log::info;
use nbody_sim::integration::{EulerIntegrator, Integrator, LeapfrogIntegrator};
use nbody_sim::solver::{BarnesHutSolver, DirectSolver, Solver};
use nbody_sim::{Body, ConfigError, Simulation, SimulationConfig, StepControl};

/// Wall-clock budget for a single run
const TIME_BUDGET: Duration = Duration::from_secs(10);

fn two_body_scene() -> Vec<Body> {
    let v = PI * 2.0_f64.sqrt();
    vec![
        Body::new(1.0, [-0.5, 0.0, 0.0], [0.0, -v, 0.0]),
        Body::new(1.0, [0.5, 0.0, 0.0], [0.0, v, 0.0]),
    ]
}

fn main() -> Result<(), ConfigError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig::new(0.002, 4000, 1e-3).with_frames(5);

    println!("=== Two-Body Orbit ===");
    println!(
        "dt = {}, steps = {}, softening = {}",
        config.dt, config.timesteps, config.softening
    );
    println!();

    let combinations: Vec<(Box<dyn Integrator>, Box<dyn Solver>)> = vec![
        (Box::new(EulerIntegrator::new()), Box::new(DirectSolver::new())),
        (Box::new(LeapfrogIntegrator::new()), Box::new(DirectSolver::new())),
        (Box::new(LeapfrogIntegrator::new()), Box::new(BarnesHutSolver::default())),
    ];

    for (integrator, solver) in combinations {
        let mut sim = Simulation::new(two_body_scene(), config.clone())?
            .with_integrator(integrator)
            .with_solver(solver);

        let started = Instant::now();
        sim.run_with(|_, _| {
            if started.elapsed() > TIME_BUDGET {
                StepControl::Stop
            } else {
                StepControl::Continue
            }
        });
        let elapsed = started.elapsed();

        let diagnostics = sim.diagnostics();
        println!("{} + {}:", sim.integrator_name(), sim.solver_name());
        println!("  steps completed:          {}", sim.completed_steps());
        println!("  force evaluations:        {}", sim.force_evaluations());
        println!(
            "  final energy drift:       {:e}",
            diagnostics.final_energy_drift().unwrap_or(0.0)
        );
        println!(
            "  max energy drift:         {:e}",
            diagnostics.max_energy_drift().unwrap_or(0.0)
        );
        println!(
            "  final ang. momentum drift: {:e}",
            diagnostics.angular_momentum_drift.last().copied().unwrap_or(0.0)
        );
        if let Some(closest) = sim.closest_approach() {
            println!("  closest approach:         {:.6} AU", closest);
        }
        println!("  frames recorded:          {}", sim.frames().len());
        println!();

        info!("Run took {:?}", elapsed);
    }

    Ok(())
}
