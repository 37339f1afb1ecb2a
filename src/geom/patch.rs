use super::core::{Point3, Transform};
use super::tessellation::PositionFn;

/// Number of control points in a bicubic patch.
pub const PATCH_CONTROL_POINTS: usize = 16;

/// Cubic basis used to sandwich the control-point matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatchBasis {
    #[default]
    Bezier,
    BSpline,
    CatmullRom,
    Hermite,
}

impl PatchBasis {
    #[must_use]
    pub fn matrix(self) -> Transform {
        match self {
            PatchBasis::Bezier => Transform::from_row_slice(&[
                -1.0, 3.0, -3.0, 1.0, //
                3.0, -6.0, 3.0, 0.0, //
                -3.0, 3.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 0.0,
            ]),
            PatchBasis::BSpline => {
                const S: f64 = 1.0 / 6.0;
                Transform::from_row_slice(&[
                    -S, 0.5, -0.5, S, //
                    0.5, -1.0, 0.5, 0.0, //
                    -0.5, 0.0, 0.5, 0.0, //
                    S, 4.0 * S, S, 0.0,
                ])
            }
            PatchBasis::CatmullRom => Transform::from_row_slice(&[
                -0.5, 1.5, -1.5, 0.5, //
                1.0, -2.5, 2.0, -0.5, //
                -0.5, 0.0, 0.5, 0.0, //
                0.0, 1.0, 0.0, 0.0,
            ]),
            PatchBasis::Hermite => Transform::from_row_slice(&[
                2.0, -2.0, 1.0, 1.0, //
                -3.0, 3.0, -2.0, -1.0, //
                0.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0, 0.0,
            ]),
        }
    }
}

/// Coefficient triplet `(Cx, Cy, Cz)` of a bicubic patch, `C = B · P · Bᵗ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BicubicPatch {
    coefficients: [Transform; 3],
}

impl BicubicPatch {
    /// Bezier patch from 16 control points, each mapped through `transform`
    /// before the coefficients are computed.
    #[must_use]
    pub fn new(control_points: &[Point3; PATCH_CONTROL_POINTS], transform: Transform) -> Self {
        Self::with_basis(control_points, transform, PatchBasis::Bezier)
    }

    #[must_use]
    pub fn with_basis(
        control_points: &[Point3; PATCH_CONTROL_POINTS],
        transform: Transform,
        basis: PatchBasis,
    ) -> Self {
        let mut axes = [[0.0; PATCH_CONTROL_POINTS]; 3];
        for (i, p) in control_points.iter().enumerate() {
            let [x, y, z] = transform.apply_point(*p).to_array();
            axes[0][i] = x;
            axes[1][i] = y;
            axes[2][i] = z;
        }

        let b = basis.matrix();
        let bt = b.transpose();
        let coefficients = axes.map(|axis| b * Transform::from_row_slice(&axis) * bt);
        Self { coefficients }
    }

    #[must_use]
    pub const fn coefficients(&self) -> &[Transform; 3] {
        &self.coefficients
    }

    /// Evaluate the patch at `(u, v) ∈ [0, 1]²`.
    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> Point3 {
        let row = [u * u * u, u * u, u, 1.0];
        let col = [v * v * v, v * v, v, 1.0];
        let [cx, cy, cz] = &self.coefficients;
        Point3::new(cx.bilinear(row, col), cy.bilinear(row, col), cz.bilinear(row, col))
    }

    /// Position function owning this patch.
    #[must_use]
    pub fn into_position_fn(self) -> impl Fn(f64, f64) -> Point3 + Send + Sync {
        move |u, v| self.point_at(u, v)
    }
}

impl PositionFn for BicubicPatch {
    fn point_at(&self, s: f64, t: f64) -> Point3 {
        BicubicPatch::point_at(self, s, t)
    }
}
