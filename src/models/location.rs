//! Point and delivery location types.

use serde::{Deserialize, Serialize};

/// A position in the 2-D plane.
///
/// Depots are plain points; delivery locations wrap a point with an id.
///
/// # Examples
///
/// ```
/// use u_depot_ga::models::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate.
    pub x: f64,
    /// Y-coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// A delivery location with a stable identity.
///
/// Two locations are equal only when both the id and the position match.
///
/// # Examples
///
/// ```
/// use u_depot_ga::models::{Location, Point};
///
/// let home = Location::new(7, 3.0, 4.0);
/// assert_eq!(home.id(), 7);
/// assert!((home.distance_to(&Point::new(0.0, 0.0)) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: usize,
    position: Point,
}

impl Location {
    /// Creates a location at the given coordinates.
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self::at(id, Point::new(x, y))
    }

    /// Creates a location at an existing point.
    pub fn at(id: usize, position: Point) -> Self {
        Self { id, position }
    }

    /// Location ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Position of this location.
    pub fn position(&self) -> &Point {
        &self.position
    }

    /// Euclidean distance from this location to a point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        self.position.distance_to(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!(a.distance_to(&a).abs() < 1e-10);
    }

    #[test]
    fn test_point_from_array() {
        let p = Point::from([10.0, 5.0]);
        assert_eq!(p, Point::new(10.0, 5.0));
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_location_new() {
        let l = Location::new(3, 10.0, 20.0);
        assert_eq!(l.id(), 3);
        assert_eq!(l.position(), &Point::new(10.0, 20.0));
    }

    #[test]
    fn test_location_distance_symmetric() {
        let a = Location::new(0, 1.0, 2.0);
        let b = Location::new(1, 4.0, 6.0);
        assert!((a.distance_to(b.position()) - b.distance_to(a.position())).abs() < 1e-10);
    }

    #[test]
    fn test_location_equality_needs_id_and_position() {
        let a = Location::new(1, 2.0, 3.0);
        assert_eq!(a, Location::new(1, 2.0, 3.0));
        assert_ne!(a, Location::new(2, 2.0, 3.0));
        assert_ne!(a, Location::new(1, 2.0, 4.0));
    }
}
