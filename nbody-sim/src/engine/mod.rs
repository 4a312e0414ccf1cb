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
//! Simulation engine
//!
//! [`Simulation`] owns the initial bodies, a [`Solver`] and an
//! [`Integrator`], and drives the fixed-step loop:
//!
//! 1. `initialize` the integrator's internal state
//! 2. `synchronize` it and take the diagnostic [`Baseline`]
//! 3. For each step: `step`, `synchronize`, then record frames, history and
//!    diagnostics subject to the configured strides
//!
//! Measurements are always taken on the synchronized state, never on the
//! integrator's internal one.
//!
//! # Recording
//!
//! - Diagnostics: one record per completed step whose index is a multiple of
//!   `diagnostics_every`. The initial state is the baseline and is not
//!   itself recorded, so a run of zero steps has empty diagnostics.
//! - Frames: the initial positions (step 0), then every `frame_every` steps.
//! - State history: the synchronized initial state, then every step.
//!
//! A run with no bodies takes no steps and records nothing.
//!
//! Everything is cleared at the start of each run, so one instance can be
//! run repeatedly.

use log::{info, warn};

use crate::body::Body;
use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::integration::{AccelerationField, AccelerationSource, EulerIntegrator, Integrator};
use crate::solver::{DirectSolver, Solver};
use crate::state::{Frame, SystemState};

mod diagnostics;

pub use diagnostics::{Baseline, Diagnostics, ANGULAR_MOMENTUM_THRESHOLD, ENERGY_FLOOR};

/// Whether the step loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
    /// Take the next step
    Continue,
    /// End the run after the current step
    Stop,
}

#[derive(Debug, Default)]
struct Recorder {
    diagnostics: Diagnostics,
    frames: Vec<Frame>,
    state_history: Vec<SystemState>,
}

impl Recorder {
    fn start(&mut self, synced: &SystemState, config: &SimulationConfig) {
        self.diagnostics.clear();
        self.frames.clear();
        self.state_history.clear();

        if config.enable_diagnostics {
            self.diagnostics
                .set_baseline(Baseline::measure(synced.bodies(), config));
        }
        if config.record_frames {
            self.frames.push(Frame::capture(0, synced));
        }
        if config.record_history {
            self.state_history.push(synced.copy());
        }
    }

    fn record(&mut self, step: usize, synced: &SystemState, config: &SimulationConfig) {
        if config.enable_diagnostics && step % config.diagnostics_every == 0 {
            self.diagnostics.record(step, synced.bodies(), config);
        }
        if config.record_frames && step % config.frame_every == 0 {
            self.frames.push(Frame::capture(step, synced));
        }
        if config.record_history {
            self.state_history.push(synced.copy());
        }
    }
}

/// N-body simulation
///
/// # Example
///
/// ```
/// use nbody_sim::{Body, Simulation, SimulationConfig};
/// use nbody_sim::integration::LeapfrogIntegrator;
/// use nbody_sim::solver::BarnesHutSolver;
///
/// let bodies = vec![
///     Body::new(1.0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
///     Body::new(1e-3, [1.0, 0.0, 0.0], [0.0, 6.28, 0.0]),
/// ];
/// let config = SimulationConfig::new(0.001, 50, 1e-3).with_frames(10);
///
/// let mut sim = Simulation::new(bodies, config)?
///     .with_integrator(Box::new(LeapfrogIntegrator::new()))
///     .with_solver(Box::new(BarnesHutSolver::default()));
///
/// let frames = sim.run().map(|f| f.len());
/// assert_eq!(frames, Some(6)); // step 0 plus every 10th step
/// assert_eq!(sim.completed_steps(), 50);
/// # Ok::<(), nbody_sim::ConfigError>(())
/// ```
pub struct Simulation {
    initial: Vec<Body>,
    config: SimulationConfig,
    integrator: Box<dyn Integrator>,
    solver: Box<dyn Solver>,
    state: SystemState,
    synchronized: SystemState,
    recorder: Recorder,
    completed_steps: usize,
    force_evaluations: usize,
}

impl Simulation {
    /// Create a simulation with the Euler integrator and the direct solver
    ///
    /// Fails if the configuration is invalid or any body has a non-positive
    /// mass or non-finite coordinates. Valid but risky settings are logged
    /// as warnings.
    pub fn new(bodies: Vec<Body>, config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_bodies(&bodies)?;

        for warning in config.stability_warnings() {
            warn!("{}", warning);
        }

        let state = SystemState::new(bodies.clone());
        Ok(Simulation {
            initial: bodies,
            config,
            integrator: Box::new(EulerIntegrator::new()),
            solver: Box::new(DirectSolver::new()),
            synchronized: state.clone(),
            state,
            recorder: Recorder::default(),
            completed_steps: 0,
            force_evaluations: 0,
        })
    }

    /// Use a different integrator
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Use a different solver
    pub fn with_solver(mut self, solver: Box<dyn Solver>) -> Self {
        self.solver = solver;
        self
    }

    /// Run every configured step
    ///
    /// Returns the recorded frames when `record_frames` is enabled.
    pub fn run(&mut self) -> Option<&[Frame]> {
        self.run_with(|_, _| StepControl::Continue);
        if self.config.record_frames {
            Some(&self.recorder.frames)
        } else {
            None
        }
    }

    /// Run with an observer called after every step
    ///
    /// The observer receives the step index (starting at 1) and the
    /// synchronized state, and can end the run early by returning
    /// [`StepControl::Stop`]. Returns the number of steps taken.
    pub fn run_with<F>(&mut self, mut observer: F) -> usize
    where
        F: FnMut(usize, &SystemState) -> StepControl,
    {
        self.completed_steps = 0;
        self.force_evaluations = 0;

        let initial = SystemState::new(self.initial.clone());
        if initial.is_empty() {
            info!("No bodies to simulate; skipping {} steps", self.config.timesteps);
            self.recorder = Recorder::default();
            self.state = initial.clone();
            self.synchronized = initial;
            return 0;
        }

        info!(
            "Starting simulation: {} bodies, {} steps of {} with {} / {}",
            self.initial.len(),
            self.config.timesteps,
            self.config.dt,
            self.integrator.name(),
            self.solver.name()
        );

        let config = &self.config;
        let integrator = self.integrator.as_ref();
        let mut field = AccelerationField::new(self.solver.as_mut(), config);

        let mut state = integrator.initialize(&initial, config, &mut field);
        let mut synced = integrator.synchronize(&state, config, &mut field);
        self.recorder.start(&synced, config);

        for step in 1..=config.timesteps {
            state = integrator.step(&state, config, &mut field);
            synced = integrator.synchronize(&state, config, &mut field);

            self.recorder.record(step, &synced, config);
            self.completed_steps = step;

            if observer(step, &synced) == StepControl::Stop {
                info!("Run stopped by observer after step {}", step);
                break;
            }
        }

        self.force_evaluations = field.evaluations();
        self.state = state;
        self.synchronized = synced;

        match self.recorder.diagnostics.final_energy_drift() {
            Some(drift) => info!(
                "Simulation finished after {} steps ({} force evaluations), final energy drift {:e}",
                self.completed_steps, self.force_evaluations, drift
            ),
            None => info!(
                "Simulation finished after {} steps ({} force evaluations)",
                self.completed_steps, self.force_evaluations
            ),
        }

        self.completed_steps
    }

    /// Final internal state of the integrator
    ///
    /// For Leapfrog the velocities are half a step ahead of the positions;
    /// use [`Simulation::synchronized_state`] for measurements.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Final state with positions and velocities at the same instant
    pub fn synchronized_state(&self) -> &SystemState {
        &self.synchronized
    }

    /// Recorded position frames
    pub fn frames(&self) -> &[Frame] {
        &self.recorder.frames
    }

    /// Conservation diagnostics of the last run
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.recorder.diagnostics
    }

    /// Synchronized state snapshots of the last run
    pub fn state_history(&self) -> &[SystemState] {
        &self.recorder.state_history
    }

    /// The configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The bodies every run starts from
    pub fn initial_bodies(&self) -> &[Body] {
        &self.initial
    }

    /// Steps taken by the last run
    pub fn completed_steps(&self) -> usize {
        self.completed_steps
    }

    /// Name of the integrator
    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    /// Name of the solver
    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Acceleration evaluations performed by the last run
    pub fn force_evaluations(&self) -> usize {
        self.force_evaluations
    }

    /// Smallest distance between any two bodies across the recorded frames
    pub fn closest_approach(&self) -> Option<f64> {
        self.recorder
            .frames
            .iter()
            .filter_map(Frame::closest_pair_distance)
            .fold(None, |closest, d| Some(closest.map_or(d, |c: f64| c.min(d))))
    }
}

fn validate_bodies(bodies: &[Body]) -> Result<(), ConfigError> {
    for (index, body) in bodies.iter().enumerate() {
        if !(body.mass > 0.0 && body.mass.is_finite()) {
            return Err(ConfigError::InvalidBody {
                index,
                reason: "mass must be positive and finite",
            });
        }
        if !(body.position.is_finite() && body.velocity.is_finite()) {
            return Err(ConfigError::InvalidBody {
                index,
                reason: "position and velocity must be finite",
            });
        }
    }
    Ok(())
}
