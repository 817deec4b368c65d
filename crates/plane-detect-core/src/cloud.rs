//! Finite-point view over a raw sensor cloud.

use nalgebra::Point3;

/// Borrowed view over the finite points of a cloud.
///
/// Sensor clouds occasionally carry NaN or infinite coordinates. Those points
/// are dropped here so that no downstream sum or dot product ever sees them;
/// `source_index` maps positions in the view back to the original cloud.
#[derive(Clone, Debug)]
pub struct FiniteCloud<'a> {
    points: &'a [Point3<f64>],
    // `None` when every point is finite and the view is the identity.
    index: Option<Vec<usize>>,
}

impl<'a> FiniteCloud<'a> {
    pub fn new(points: &'a [Point3<f64>]) -> Self {
        if points.iter().all(is_finite_point) {
            return Self {
                points,
                index: None,
            };
        }

        let index = points
            .iter()
            .enumerate()
            .filter(|(_, p)| is_finite_point(p))
            .map(|(i, _)| i)
            .collect();
        Self {
            points,
            index: Some(index),
        }
    }

    /// Number of finite points.
    #[inline]
    pub fn len(&self) -> usize {
        match &self.index {
            Some(index) => index.len(),
            None => self.points.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of points that were dropped as non-finite.
    pub fn dropped(&self) -> usize {
        self.points.len() - self.len()
    }

    /// Finite point at view position `i`.
    #[inline]
    pub fn get(&self, i: usize) -> &'a Point3<f64> {
        &self.points[self.source_index(i)]
    }

    /// Index into the original cloud for view position `i`.
    #[inline]
    pub fn source_index(&self, i: usize) -> usize {
        match &self.index {
            Some(index) => index[i],
            None => i,
        }
    }

    /// Iterate over `(original_index, point)` pairs of finite points.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Point3<f64>)> + '_ {
        (0..self.len()).map(move |i| (self.source_index(i), self.get(i)))
    }
}

fn is_finite_point(p: &Point3<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}
