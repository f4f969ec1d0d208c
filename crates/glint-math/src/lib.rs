#![warn(missing_docs)]

//! Math types for the glint render kernels.
//!
//! Thin aliases over nalgebra giving the rendering crates a shared
//! vocabulary for 3D geometry. Everything is `f64`; primitives reach
//! the tracer already transformed into one common space, so no
//! transform machinery lives here.

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;
