//! Frame driver tying the store, update policy, motion and renderer together.
//!
//! Each frame runs, in this order:
//! 1. [`UpdatePolicy::update`] — derive colors/sizes (and, for the signal
//!    demo, velocity energy) from the current state and signal value.
//! 2. [`MotionStep::step`] — integrate positions and reflect velocities.
//! 3. [`Scene::refresh`] — push every object's attributes to its marker.
//! 4. [`Renderer::present_frame`] — make the frame visible.
//!
//! A run is a fixed number of frames; there is no early exit.

use std::{thread, time::Duration};

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{info, trace};

use crate::{
    config::{Config, Demo},
    error::{Result, StoreError},
    field::FieldArray,
    motion::MotionStep,
    render::{Renderer, Scene},
    signal::Signal,
    store::VariableStore,
    types::Field,
    updater::{ColorRange, FrameInput, HerdUpdater, SignalUpdater, UpdatePolicy},
};

/// Writes the initial dynamic fields for `demo`.
///
/// - `Position`: uniform in `[0, 1)` per axis.
/// - `Velocity`: uniform in `[-0.5, 0.5)` per axis.
/// - `Size`: all ones.
/// - `Color`: all ones for particles, uniform in `[0, 1)` for the herd.
pub fn populate(store: &mut VariableStore, demo: Demo, rng: &mut impl Rng) -> Result<(), StoreError> {
    let n = store.object_count();
    store.set_dynamic(Field::Position, FieldArray::from_fn(n, 2, |_, _| rng.random()))?;
    store.set_dynamic(
        Field::Velocity,
        FieldArray::from_fn(n, 2, |_, _| rng.random::<f32>() - 0.5),
    )?;
    store.set_dynamic(Field::Size, FieldArray::filled(n, 1, 1.0))?;
    let colors = match demo {
        Demo::Particles => FieldArray::filled(n, 3, 1.0),
        Demo::Herd => FieldArray::from_fn(n, 3, |_, _| rng.random()),
    };
    store.set_dynamic(Field::Color, colors)
}

/// A running simulation: state, policy and progress.
#[derive(Clone, Debug)]
pub struct Simulation {
    cfg: Config,
    store: VariableStore,
    policy: UpdatePolicy,
    motion: MotionStep,
    signal: Signal,
    scene: Scene,
    attached: bool,
    frame: usize,
}

impl Simulation {
    /// Builds a randomly populated simulation for `cfg.demo`.
    ///
    /// If `cfg.seed` is `None` a seed is drawn and recorded in the returned
    /// simulation's config, so every run can be reproduced.
    pub fn new(mut cfg: Config) -> Result<Self> {
        cfg.validate()?;
        let seed = cfg.seed.unwrap_or_else(|| rand::rng().random());
        cfg.seed = Some(seed);
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut store = VariableStore::new(cfg.object_count)?;
        populate(&mut store, cfg.demo, &mut rng)?;

        let policy = match cfg.demo {
            Demo::Herd => UpdatePolicy::Herd(HerdUpdater::new(&mut rng)),
            Demo::Particles => UpdatePolicy::Signal(SignalUpdater::new(cfg.size_rule, &mut rng)),
        };

        info!(
            demo = ?cfg.demo,
            objects = cfg.object_count,
            steps = cfg.steps,
            seed,
            "simulation created"
        );
        Ok(Self::with_state(cfg, store, policy, Signal::sinusoid(cfg.steps)))
    }

    /// Assembles a simulation from explicit parts.
    ///
    /// The run lasts `min(cfg.steps, signal.len())` frames.
    pub fn with_state(cfg: Config, store: VariableStore, policy: UpdatePolicy, signal: Signal) -> Self {
        let scene = Scene::new(cfg.drawing_size, policy.color_range());
        Self {
            cfg,
            store,
            policy,
            motion: MotionStep::default(),
            signal,
            scene,
            attached: false,
            frame: 0,
        }
    }

    /// Creates the renderer's outline and markers and presents the initial
    /// state. Called automatically by the first frame if needed; does
    /// nothing once the simulation is attached.
    pub fn attach(&mut self, renderer: &mut impl Renderer) -> Result<()> {
        if self.attached {
            return Ok(());
        }
        self.scene.attach(renderer, &self.store)?;
        renderer.present_frame();
        self.attached = true;
        Ok(())
    }

    /// Computes and presents the next frame, without any pacing delay.
    ///
    /// ### Returns
    /// `Ok(true)` if a frame was produced, `Ok(false)` once the run is over.
    pub fn step_frame(&mut self, renderer: &mut impl Renderer) -> Result<bool> {
        self.advance(renderer, Duration::ZERO)
    }

    /// Runs every remaining frame, sleeping `cfg.frame_delay` before each
    /// present.
    ///
    /// ### Returns
    /// The number of frames produced by this call.
    pub fn run(&mut self, renderer: &mut impl Renderer) -> Result<usize> {
        let mut frames = 0;
        while self.advance(renderer, self.cfg.frame_delay)? {
            frames += 1;
        }
        info!(frames, total = self.frame, "run finished");
        Ok(frames)
    }

    fn advance(&mut self, renderer: &mut impl Renderer, delay: Duration) -> Result<bool> {
        if self.is_finished() {
            return Ok(false);
        }
        if !self.attached {
            self.attach(renderer)?;
        }

        let timestep = self.frame;
        let signal = self.signal.get(timestep).unwrap_or_default();
        let input = FrameInput {
            delta_time: self.cfg.delta_time,
            timestep,
            signal,
        };

        self.policy.update(&mut self.store, input)?;
        let reflected = self.motion.step(&mut self.store, self.cfg.delta_time)?;
        self.scene.refresh(renderer, &self.store)?;

        if !delay.is_zero() {
            thread::sleep(delay);
        }
        renderer.present_frame();

        trace!(timestep, signal, reflected, "frame presented");
        self.frame += 1;
        Ok(true)
    }

    /// Number of frames this run will produce in total.
    pub fn total_frames(&self) -> usize {
        self.cfg.steps.min(self.signal.len())
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.total_frames()
    }

    /// Index of the next frame to compute.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Signal value of the most recently computed frame.
    pub fn current_signal(&self) -> Option<f32> {
        self.frame.checked_sub(1).and_then(|t| self.signal.get(t))
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn policy(&self) -> &UpdatePolicy {
        &self.policy
    }

    pub fn color_range(&self) -> ColorRange {
        self.policy.color_range()
    }
}
