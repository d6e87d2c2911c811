//! Equal split of a visit order into per-vehicle segments.
//!
//! # Algorithm
//!
//! With `n` locations and `v` vehicles every vehicle receives a contiguous
//! block of `floor(n / v)` locations in visit order. The remainder
//! `n mod v` goes to the last vehicle, whose segment always ends at `n`.
//!
//! ```text
//! n = 7, v = 3  →  [0..2) [2..4) [4..7)
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// Half-open index range into a visit order owned by one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteBounds {
    /// First index served by the vehicle.
    pub start: usize,
    /// One past the last index served by the vehicle.
    pub end: usize,
}

impl RouteBounds {
    /// Number of locations in this segment.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the segment contains no locations.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The segment as a range usable for slicing.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `len` visit positions among `vehicles` contiguous segments.
///
/// Fails if either count is zero or if there are more vehicles than
/// locations, since a vehicle would then be left without a route.
///
/// # Examples
///
/// ```
/// use u_depot_ga::ga::equal_split;
///
/// let bounds = equal_split(7, 3).unwrap();
/// let ranges: Vec<_> = bounds.iter().map(|b| b.range()).collect();
/// assert_eq!(ranges, vec![0..2, 2..4, 4..7]);
/// ```
pub fn equal_split(len: usize, vehicles: usize) -> Result<Vec<RouteBounds>, PlannerError> {
    if vehicles == 0 {
        return Err(PlannerError::configuration("at least one depot is required"));
    }
    if len == 0 {
        return Err(PlannerError::configuration(
            "at least one location is required",
        ));
    }
    if vehicles > len {
        return Err(PlannerError::configuration(format!(
            "{vehicles} vehicles cannot share {len} locations"
        )));
    }

    let size = len / vehicles;
    let mut bounds: Vec<RouteBounds> = (0..vehicles)
        .map(|v| RouteBounds {
            start: v * size,
            end: (v + 1) * size,
        })
        .collect();
    if let Some(last) = bounds.last_mut() {
        last.end = len;
    }
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(bounds: &[RouteBounds], len: usize) {
        let mut next = 0;
        for b in bounds {
            assert_eq!(b.start, next);
            assert!(!b.is_empty());
            next = b.end;
        }
        assert_eq!(next, len);
    }

    #[test]
    fn test_even_split() {
        let bounds = equal_split(6, 2).expect("valid");
        assert_eq!(
            bounds,
            vec![
                RouteBounds { start: 0, end: 3 },
                RouteBounds { start: 3, end: 6 }
            ]
        );
    }

    #[test]
    fn test_remainder_goes_to_last_vehicle() {
        let bounds = equal_split(45, 2).expect("valid");
        assert_eq!(bounds[0].range(), 0..22);
        assert_eq!(bounds[1].range(), 22..45);
        assert_covers(&bounds, 45);
    }

    #[test]
    fn test_single_vehicle() {
        let bounds = equal_split(5, 1).expect("valid");
        assert_eq!(bounds, vec![RouteBounds { start: 0, end: 5 }]);
    }

    #[test]
    fn test_one_location_per_vehicle() {
        let bounds = equal_split(4, 4).expect("valid");
        assert_covers(&bounds, 4);
        assert!(bounds.iter().all(|b| b.len() == 1));
    }

    #[test]
    fn test_every_vehicle_count_covers() {
        for len in 1..30 {
            for vehicles in 1..=len {
                let bounds = equal_split(len, vehicles).expect("valid");
                assert_eq!(bounds.len(), vehicles);
                assert_covers(&bounds, len);
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            equal_split(5, 0),
            Err(PlannerError::Configuration(_))
        ));
        assert!(matches!(
            equal_split(0, 1),
            Err(PlannerError::Configuration(_))
        ));
        assert!(matches!(
            equal_split(2, 3),
            Err(PlannerError::Configuration(_))
        ));
    }
}
