//! Transform Matrix
//!
//! 2D affine transform for the drawing context.

/// 2D affine matrix (3x3 homogeneous, last row implied)
/// | a c e |
/// | b d f |
/// | 0 0 1 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    /// Identity matrix
    pub fn identity() -> Self {
        Self {
            a: 1.0, b: 0.0,
            c: 0.0, d: 1.0,
            e: 0.0, f: 0.0,
        }
    }

    /// Translation matrix
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0, b: 0.0,
            c: 0.0, d: 1.0,
            e: tx, f: ty,
        }
    }

    /// Scale matrix
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx, b: 0.0,
            c: 0.0, d: sy,
            e: 0.0, f: 0.0,
        }
    }

    /// Rotation matrix (angle in radians)
    pub fn rotate(angle: f64) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        Self {
            a: cos, b: sin,
            c: -sin, d: cos,
            e: 0.0, f: 0.0,
        }
    }

    /// Multiply. The result maps a point through `other`, then `self`.
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Map a point through the matrix
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Whether the matrix is (numerically) the identity
    pub fn is_identity(&self) -> bool {
        (self.a - 1.0).abs() < 1e-10
            && self.b.abs() < 1e-10
            && self.c.abs() < 1e-10
            && (self.d - 1.0).abs() < 1e-10
            && self.e.abs() < 1e-10
            && self.f.abs() < 1e-10
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let m = Matrix::identity();
        assert!(m.is_identity());

        let (x, y) = m.apply(10.0, 20.0);
        assert_eq!(x, 10.0);
        assert_eq!(y, 20.0);
    }

    #[test]
    fn test_translate() {
        let m = Matrix::translate(100.0, 50.0);
        let (x, y) = m.apply(10.0, 20.0);

        assert_eq!(x, 110.0);
        assert_eq!(y, 70.0);
    }

    #[test]
    fn test_compose_translate_then_scale() {
        // translate composed onto an existing scale: point is scaled after
        // being translated into the scaled space
        let m = Matrix::scale(2.0, 2.0).multiply(&Matrix::translate(5.0, 5.0));
        let (x, y) = m.apply(1.0, 1.0);

        assert_eq!(x, 12.0);
        assert_eq!(y, 12.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let m = Matrix::rotate(std::f64::consts::FRAC_PI_2);
        let (x, y) = m.apply(1.0, 0.0);

        assert!(x.abs() < 1e-10);
        assert!((y - 1.0).abs() < 1e-10);
    }
}
