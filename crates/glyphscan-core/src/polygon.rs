//! Polygons with real-valued vertices
//!
//! No convexity or winding is enforced; the constructor decides the order.

/// An ordered list of `(x, y)` vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
        }
    }

    /// Build from a vertex list.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut poly = Self::with_capacity(points.len());
        for &(x, y) in points {
            poly.push(x, y);
        }
        poly
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Vertex `i`, or `None` when out of range.
    pub fn get(&self, i: usize) -> Option<(f64, f64)> {
        Some((*self.xs.get(i)?, *self.ys.get(i)?))
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Length of the closed outline.
    pub fn perimeter(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                (self.xs[j] - self.xs[i]).hypot(self.ys[j] - self.ys[i])
            })
            .sum()
    }

    /// Vertices rounded to integer pixel positions, in order.
    pub fn to_pixel_points(&self) -> Vec<(i32, i32)> {
        self.iter()
            .map(|(x, y)| (x.round() as i32, y.round() as i32))
            .collect()
    }
}
