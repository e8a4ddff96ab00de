//! Default values for unauthored interaction fields
//!
//! Every defaultable field of the declarative model is an `Option`: `None`
//! means the author did not touch it. The effective value of an untouched
//! field comes from the constants below, and whether an untouched field may
//! overwrite engine state is decided by [`should_write`].

/// Deformation stiffness of an interaction degree of freedom.
pub const STIFFNESS: f64 = 1.0e8;

/// Deformation damping of an interaction degree of freedom.
pub const DAMPING: f64 = 3.0e6;

/// Lower bound of a controller force range.
pub const MIN_FORCE: f64 = f64::NEG_INFINITY;

/// Upper bound of a controller force range.
pub const MAX_FORCE: f64 = f64::INFINITY;

/// Controller enable flag.
pub const ENABLED: bool = false;

/// Motor target speed.
pub const SPEED: f64 = 0.0;

/// Motor lock-at-zero-speed flag.
pub const LOCK_AT_ZERO_SPEED: bool = false;

/// Range controller lower bound, in authored units.
pub const RANGE_MIN: f64 = f64::NEG_INFINITY;

/// Range controller upper bound, in authored units.
pub const RANGE_MAX: f64 = f64::INFINITY;

/// Friction controller coefficient.
pub const FRICTION_COEFFICIENT: f64 = 0.5;

/// Density of a shape material, kg/m³.
pub const DENSITY: f64 = 1000.0;

/// The overwrite predicate: an engine value is written iff the write is
/// forced or the field was actually authored.
#[inline]
pub fn should_write<T>(force: bool, authored: Option<T>) -> bool {
    force || authored.is_some()
}

/// Effective value of a defaultable field.
#[inline]
pub fn resolve<T>(authored: Option<T>, default: T) -> T {
    authored.unwrap_or(default)
}
