//! Attribute derivation policies run at the start of every frame.
//!
//! A policy reads the current `Position` (and, for the signal-driven one,
//! `Velocity`) and rewrites the appearance fields. There are exactly two
//! policies, collected in [`UpdatePolicy`]:
//!
//! - [`HerdUpdater`] colors each member by a fixed projection of its
//!   position.
//! - [`SignalUpdater`] blends two color projections by the external signal,
//!   oscillates sizes over time and rescales the population's velocities.

use rand::Rng;
use tracing::trace;

use crate::{
    error::StoreError,
    field::FieldArray,
    projection::{Projection, sigmoid},
    store::VariableStore,
    types::Field,
};

/// Per-frame inputs handed to an [`UpdatePolicy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    pub delta_time: f32,
    /// Index of the frame being computed, starting at 0.
    pub timestep: usize,
    /// Current value of the external signal, nominally in `[0, 1]`.
    pub signal: f32,
}

/// Value range a policy writes into the `Color` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorRange {
    /// Channels in `[0, 1]`.
    Unit,
    /// Integral channels in `[0, 255]`.
    Byte,
}

impl ColorRange {
    /// Converts a color row to 8-bit channels.
    ///
    /// Unit values are scaled by 255 and truncated. Out-of-range values
    /// saturate; missing channels read as 0.
    pub fn to_rgb(self, row: &[f32]) -> [u8; 3] {
        let scale = match self {
            ColorRange::Unit => 255.0,
            ColorRange::Byte => 1.0,
        };
        let mut rgb = [0u8; 3];
        for (out, v) in rgb.iter_mut().zip(row) {
            // `as` saturates and maps NaN to 0.
            *out = (v * scale) as u8;
        }
        rgb
    }
}

/// How [`SignalUpdater`] derives sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeRule {
    /// `sin(sum(position) + timestep / 10)`.
    #[default]
    Oscillating,
    /// `sigmoid(position · size_projection)`.
    Positional,
}

fn positions(store: &VariableStore) -> Result<&FieldArray, StoreError> {
    let position = store.get_dynamic(Field::Position)?;
    if position.cols() != 2 {
        return Err(StoreError::ColumnMismatch {
            field: Field::Position,
            expected: 2,
            actual: position.cols(),
        });
    }
    Ok(position)
}

/// Colors herd members by `sigmoid(position · projection)`.
#[derive(Clone, Debug)]
pub struct HerdUpdater {
    pub color_projection: Projection,
}

impl HerdUpdater {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            color_projection: Projection::random_centered(3, rng),
        }
    }

    /// Rewrites `Color` from the current positions. Timestep and signal are ignored.
    pub fn update(&self, store: &mut VariableStore, _frame: FrameInput) -> Result<(), StoreError> {
        let position = positions(store)?;
        let mut colors = FieldArray::zeros(position.rows(), self.color_projection.outputs());
        for i in 0..position.rows() {
            self.color_projection
                .apply_sigmoid_into(position.vec2(i), colors.row_mut(i));
        }
        store.set_dynamic(Field::Color, colors)
    }
}

/// Signal-driven colors, sizes and velocity energy.
#[derive(Clone, Debug)]
pub struct SignalUpdater {
    /// Color field shown when the signal is 1.
    pub color_projection_1: Projection,
    /// Color field shown when the signal is 0.
    pub color_projection_2: Projection,
    pub size_projection: Projection,
    pub size_rule: SizeRule,
}

impl SignalUpdater {
    pub fn new(size_rule: SizeRule, rng: &mut impl Rng) -> Self {
        Self {
            color_projection_1: Projection::random_centered(3, rng),
            color_projection_2: Projection::random_centered(3, rng),
            size_projection: Projection::random_unit(1, rng),
            size_rule,
        }
    }

    pub fn update(&self, store: &mut VariableStore, frame: FrameInput) -> Result<(), StoreError> {
        self.update_colors(store, frame.signal)?;
        self.update_energy(store, frame.signal)?;
        match self.size_rule {
            SizeRule::Oscillating => self.update_oscillating_size(store, frame.timestep),
            SizeRule::Positional => self.update_positional_size(store),
        }
    }

    /// `color = (σ(p·M1)·s + σ(p·M2)·(1 − s)) · 255`, truncated to integers.
    pub fn update_colors(&self, store: &mut VariableStore, signal: f32) -> Result<(), StoreError> {
        let position = positions(store)?;
        let channels = self.color_projection_1.outputs();
        let mut colors = FieldArray::zeros(position.rows(), channels);
        for i in 0..position.rows() {
            let p = position.vec2(i);
            let first = self.color_projection_1.apply_sigmoid(p);
            let second = self.color_projection_2.apply_sigmoid(p);
            for ((c, a), b) in colors.row_mut(i).iter_mut().zip(first).zip(second) {
                *c = ((a * signal + b * (1.0 - signal)) * 255.0).trunc();
            }
        }
        store.set_dynamic(Field::Color, colors)
    }

    /// Divides each velocity axis by the population's total absolute speed
    /// on that axis, then scales everything by `signal + 0.5`.
    ///
    /// Column sums are taken before any velocity is written. An axis whose
    /// sum is zero is left as is.
    pub fn update_energy(&self, store: &mut VariableStore, signal: f32) -> Result<(), StoreError> {
        let velocity = store.get_dynamic_mut(Field::Velocity)?;
        let totals: Vec<f32> = (0..velocity.cols())
            .map(|c| velocity.column_abs_sum(c))
            .collect();
        let gain = signal + 0.5;
        for i in 0..velocity.rows() {
            for (v, &total) in velocity.row_mut(i).iter_mut().zip(&totals) {
                if total > 0.0 {
                    *v = *v / total * gain;
                }
            }
        }
        trace!(?totals, gain, "velocity energy rescaled");
        Ok(())
    }

    /// `size = sin(sum(position) + timestep / 10)`. May be negative.
    pub fn update_oscillating_size(
        &self,
        store: &mut VariableStore,
        timestep: usize,
    ) -> Result<(), StoreError> {
        let position = positions(store)?;
        let phase = timestep as f32 / 10.0;
        let sizes = FieldArray::from_fn(position.rows(), 1, |i, _| {
            (position.row(i).iter().sum::<f32>() + phase).sin()
        });
        store.set_dynamic(Field::Size, sizes)
    }

    /// `size = sigmoid(position · size_projection)`.
    pub fn update_positional_size(&self, store: &mut VariableStore) -> Result<(), StoreError> {
        let position = positions(store)?;
        let sizes = FieldArray::from_fn(position.rows(), 1, |i, _| {
            sigmoid(self.size_projection.apply(position.vec2(i))[0])
        });
        store.set_dynamic(Field::Size, sizes)
    }
}

/// The update policy of a simulation.
#[derive(Clone, Debug)]
pub enum UpdatePolicy {
    Herd(HerdUpdater),
    Signal(SignalUpdater),
}

impl UpdatePolicy {
    /// Rewrites the policy's fields for one frame. Reads happen before writes,
    /// so no object's update sees another object's new values.
    pub fn update(&self, store: &mut VariableStore, frame: FrameInput) -> Result<(), StoreError> {
        match self {
            UpdatePolicy::Herd(herd) => herd.update(store, frame),
            UpdatePolicy::Signal(signal) => signal.update(store, frame),
        }
    }

    /// Range of the values written into `Color`.
    pub fn color_range(&self) -> ColorRange {
        match self {
            UpdatePolicy::Herd(_) => ColorRange::Unit,
            UpdatePolicy::Signal(_) => ColorRange::Byte,
        }
    }
}
