use std::fmt;

/// Index of an object (particle, herd member) inside a
/// [`crate::store::VariableStore`].
///
/// Only meaningful for the store it was taken from; object indices are
/// fixed for the store's lifetime.
pub type ObjectId = usize;

/// Identifier of a per-object attribute array.
///
/// The four well-known attributes drive motion and rendering. `Named`
/// covers anything else a caller wants to keep next to them, typically
/// static fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Position,
    Velocity,
    Size,
    Color,
    Named(&'static str),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Position => f.write_str("position"),
            Field::Velocity => f.write_str("velocity"),
            Field::Size => f.write_str("size"),
            Field::Color => f.write_str("color"),
            Field::Named(name) => f.write_str(name),
        }
    }
}

/// Which half of the store a field lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Written once, never rewritten during a run.
    Static,
    /// Recomputed at least once per run.
    Dynamic,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Static => f.write_str("static"),
            Namespace::Dynamic => f.write_str("dynamic"),
        }
    }
}
