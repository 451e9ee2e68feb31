use nalgebra::{Matrix3, Point3, RowVector3, Vector3};

const SINGULAR_VOLUME_EPS: f64 = 1e-12;

/// A unit cell whose rows are the lattice vectors `a`, `b` and `c` in Angstroms.
///
/// A zero matrix is a valid lattice; it describes a non-periodic system and is
/// reported as singular, in which case fractional coordinates are unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lattice {
    matrix: Matrix3<f64>,
}

impl Lattice {
    pub fn new(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_rows(&[
            RowVector3::from(rows[0]),
            RowVector3::from(rows[1]),
            RowVector3::from(rows[2]),
        ]))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        let m = &self.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    pub fn vectors(&self) -> [Vector3<f64>; 3] {
        [0, 1, 2].map(|i| self.matrix.row(i).transpose())
    }

    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    pub fn is_singular(&self) -> bool {
        self.volume() < SINGULAR_VOLUME_EPS
    }

    /// Returns `(a, b, c, alpha, beta, gamma)` with lengths in Angstroms and angles in degrees.
    ///
    /// Angles involving a zero-length vector are reported as 90 degrees.
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [va, vb, vc] = self.vectors();
        let (a, b, c) = (va.norm(), vb.norm(), vc.norm());
        let angle = |u: &Vector3<f64>, v: &Vector3<f64>, nu: f64, nv: f64| {
            if nu == 0.0 || nv == 0.0 {
                90.0
            } else {
                (u.dot(v) / (nu * nv)).clamp(-1.0, 1.0).acos().to_degrees()
            }
        };
        (
            a,
            b,
            c,
            angle(&vb, &vc, b, c),
            angle(&va, &vc, a, c),
            angle(&va, &vb, a, b),
        )
    }

    /// Converts a Cartesian position into fractional coordinates, or `None` for a singular cell.
    pub fn to_fractional(&self, cartesian: &Point3<f64>) -> Option<Vector3<f64>> {
        if self.is_singular() {
            return None;
        }
        let inverse = self.matrix.try_inverse()?;
        Some(inverse.transpose() * cartesian.coords)
    }

    pub fn to_cartesian(&self, fractional: &Vector3<f64>) -> Point3<f64> {
        Point3::from(self.matrix.transpose() * fractional)
    }
}
