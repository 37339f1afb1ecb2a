//! Closed-form position functions in the `(θ, φ)` convention of
//! [`tessellate`](super::tessellate): `θ ∈ [0, π]`, `φ ∈ [0, 2π)`.
//!
//! Periodic surfaces double `θ` so that one sweep of the primary parameter
//! covers the full loop.

use super::core::Point3;

use std::f64::consts::PI;

/// Torus around the Z axis.
#[must_use]
pub fn torus(major: f64, minor: f64) -> impl Fn(f64, f64) -> Point3 + Copy + Send + Sync {
    move |theta, phi| {
        let u = theta * 2.0;
        let ring = major + minor * phi.cos();
        Point3::new(ring * u.cos(), ring * u.sin(), minor * phi.sin())
    }
}

/// Unit sphere with its poles on the Y axis.
#[must_use]
pub fn sphere(theta: f64, phi: f64) -> Point3 {
    Point3::new(theta.sin() * phi.cos(), theta.cos(), -theta.sin() * phi.sin())
}

/// Klein bottle, the classic "bottle" immersion.
#[must_use]
pub fn klein(theta: f64, phi: f64) -> Point3 {
    let u = theta * 2.0;
    let (cu, su) = (u.cos(), u.sin());
    let r = 2.0 * (1.0 - cu / 2.0);
    let (x, z) = if u < PI {
        (
            3.0 * cu * (1.0 + su) + r * cu * phi.cos(),
            -8.0 * su - r * su * phi.cos(),
        )
    } else {
        (3.0 * cu * (1.0 + su) + r * (phi + PI).cos(), -8.0 * su)
    };
    Point3::new(x, -r * phi.sin(), z)
}

/// Möbius band with an elliptical cross-section.
#[must_use]
pub fn mobius(theta: f64, phi: f64) -> Point3 {
    const MAJOR: f64 = 1.25;
    const A: f64 = 0.125;
    const B: f64 = 0.5;

    let u = theta * 2.0;
    let half = u / 2.0;
    let x = A * phi.cos() * half.cos() - B * phi.sin() * half.sin();
    let z = A * phi.cos() * half.sin() + B * phi.sin() * half.cos();
    Point3::new((MAJOR + x) * u.cos(), (MAJOR + x) * u.sin(), z)
}

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 4] = ["torus", "sphere", "klein", "mobius"];

/// A boxed built-in surface, as returned by [`by_name`].
pub type BoxedSurface = Box<dyn Fn(f64, f64) -> Point3 + Send + Sync>;

/// Look up a built-in surface. The torus uses major radius 8 and minor
/// radius 2.
#[must_use]
pub fn by_name(name: &str) -> Option<BoxedSurface> {
    match name.to_ascii_lowercase().as_str() {
        "torus" => Some(Box::new(torus(8.0, 2.0))),
        "sphere" => Some(Box::new(sphere)),
        "klein" => Some(Box::new(klein)),
        "mobius" => Some(Box::new(mobius)),
        _ => None,
    }
}

/// Whether the named surface is periodic in both parameters and so meant
/// for [`Topology::Closed`](super::Topology::Closed).
#[must_use]
pub fn is_doubly_periodic(name: &str) -> bool {
    matches!(name.to_ascii_lowercase().as_str(), "torus" | "klein" | "mobius")
}
