//! Position integration with reflecting walls.

use tracing::trace;

use crate::{
    error::StoreError,
    store::VariableStore,
    types::Field,
};

/// Axis-aligned domain bounds, shared by every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub lower: f32,
    pub upper: f32,
}

impl Bounds {
    /// The unit interval `[0, 1]` on every axis.
    pub const UNIT: Bounds = Bounds {
        lower: 0.0,
        upper: 1.0,
    };
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Advances [`Field::Position`] by [`Field::Velocity`] and reflects
/// velocities at the domain bounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionStep {
    pub bounds: Bounds,
}

impl MotionStep {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Runs one integration step.
    ///
    /// 1. `position += dt * velocity` for every object and axis.
    /// 2. For each axis independently, if the new position is below
    ///    `bounds.lower` or above `bounds.upper`, that velocity component
    ///    changes sign.
    ///
    /// Positions are never clamped. A particle that overshoots stays
    /// outside until its flipped velocity carries it back, and a particle
    /// that is still outside on the next step flips again.
    ///
    /// ### Parameters
    /// - `store` - Must hold dynamic `Position` and `Velocity` fields of
    ///   equal width.
    /// - `dt` - Time step; `0.0` leaves both fields untouched unless a
    ///   particle already sits outside the bounds.
    ///
    /// ### Returns
    /// The number of velocity components that were reflected.
    pub fn step(&self, store: &mut VariableStore, dt: f32) -> Result<usize, StoreError> {
        let (position, velocity) = store.get_dynamic_pair_mut(Field::Position, Field::Velocity)?;
        if position.cols() != velocity.cols() {
            return Err(StoreError::ColumnMismatch {
                field: Field::Velocity,
                expected: position.cols(),
                actual: velocity.cols(),
            });
        }

        let mut reflected = 0;
        for i in 0..position.rows() {
            let p = position.row_mut(i);
            let v = velocity.row_mut(i);
            for (x, dx) in p.iter_mut().zip(v.iter_mut()) {
                *x += dt * *dx;
                if *x < self.bounds.lower || *x > self.bounds.upper {
                    *dx = -*dx;
                    reflected += 1;
                }
            }
        }

        trace!(dt, reflected, "motion step");
        Ok(reflected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldArray;

    fn store_with(position: &[[f32; 2]], velocity: &[[f32; 2]]) -> VariableStore {
        let mut store = VariableStore::new(position.len()).unwrap();
        store
            .set_dynamic(Field::Position, FieldArray::from_rows(position).unwrap())
            .unwrap();
        store
            .set_dynamic(Field::Velocity, FieldArray::from_rows(velocity).unwrap())
            .unwrap();
        store
    }

    #[test]
    fn zero_dt_leaves_state_unchanged() {
        let mut store = store_with(&[[0.2, 0.3], [0.9, 0.1]], &[[0.4, -0.2], [-0.1, 0.3]]);
        let before_p = store.get_dynamic(Field::Position).unwrap().clone();
        let before_v = store.get_dynamic(Field::Velocity).unwrap().clone();

        let reflected = MotionStep::default().step(&mut store, 0.0).unwrap();

        assert_eq!(reflected, 0);
        assert_eq!(store.get_dynamic(Field::Position).unwrap(), &before_p);
        assert_eq!(store.get_dynamic(Field::Velocity).unwrap(), &before_v);
    }

    #[test]
    fn lower_bound_overshoot_flips_velocity_without_clamping() {
        let mut store = store_with(&[[0.05, 0.5]], &[[-1.0, 0.0]]);

        let reflected = MotionStep::default().step(&mut store, 0.1).unwrap();

        let p = store.get_dynamic(Field::Position).unwrap().vec2(0);
        let v = store.get_dynamic(Field::Velocity).unwrap().vec2(0);
        assert_eq!(reflected, 1);
        assert!((p.x - -0.05).abs() < 1e-6, "position not clamped: {p:?}");
        assert_eq!(p.y, 0.5);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn both_axes_can_reflect_in_one_step() {
        let mut store = store_with(&[[0.95, 0.02]], &[[1.0, -1.0]]);

        let reflected = MotionStep::default().step(&mut store, 0.1).unwrap();

        let v = store.get_dynamic(Field::Velocity).unwrap().vec2(0);
        assert_eq!(reflected, 2);
        assert_eq!(v.x, -1.0);
        assert_eq!(v.y, 1.0);
    }

    #[test]
    fn far_overshoot_keeps_flipping_while_outside() {
        // A big step carries the particle well past the wall; on the way
        // back it is still outside after one step, so it flips again.
        let mut store = store_with(&[[0.9, 0.5]], &[[3.0, 0.0]]);
        let motion = MotionStep::default();

        motion.step(&mut store, 0.1).unwrap(); // x = 1.2, v -> -3
        assert_eq!(store.get_dynamic(Field::Velocity).unwrap().vec2(0).x, -3.0);

        motion.step(&mut store, 0.05).unwrap(); // x = 1.05, still outside, v -> 3
        let p = store.get_dynamic(Field::Position).unwrap().vec2(0);
        assert!(p.x > 1.0);
        assert_eq!(store.get_dynamic(Field::Velocity).unwrap().vec2(0).x, 3.0);
    }

    #[test]
    fn custom_bounds_are_respected() {
        let mut store = store_with(&[[0.5, 0.5]], &[[1.0, 1.0]]);
        let motion = MotionStep::new(Bounds {
            lower: -1.0,
            upper: 0.55,
        });

        let reflected = motion.step(&mut store, 0.1).unwrap();
        assert_eq!(reflected, 2);
    }

    #[test]
    fn width_mismatch_is_an_error() {
        let mut store = VariableStore::new(1).unwrap();
        store
            .set_dynamic(Field::Position, FieldArray::zeros(1, 2))
            .unwrap();
        store
            .set_dynamic(Field::Velocity, FieldArray::zeros(1, 3))
            .unwrap();

        assert_eq!(
            MotionStep::default().step(&mut store, 0.1).unwrap_err(),
            StoreError::ColumnMismatch {
                field: Field::Velocity,
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn missing_velocity_is_an_unknown_field() {
        let mut store = VariableStore::new(1).unwrap();
        store
            .set_dynamic(Field::Position, FieldArray::zeros(1, 2))
            .unwrap();
        assert!(matches!(
            MotionStep::default().step(&mut store, 0.1),
            Err(StoreError::UnknownField {
                field: Field::Velocity,
                ..
            })
        ));
    }
}
