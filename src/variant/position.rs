//! Wire positions: the leaf coordinate arrays of `GeoJSON`.
//!
//! The position type fixes the dimensionality of a geometry variant:
//!
//! * `[f64; 2]`: strictly 2D
//! * `[f64; 3]`: strictly 3D
//! * [`AnyPosition`]: either, decided per geometry (all positions of one geometry
//!   must agree)
use std::fmt::Debug;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Coord;

pub trait Position: Copy + PartialEq + Debug + Serialize + DeserializeOwned {
    /// Number of ordinates every position of this type has, if fixed.
    const DIMENSION: Option<usize>;

    /// Encodes a canonical coordinate.
    ///
    /// # Errors
    ///
    /// Fails when the coordinate is not finite or its dimensionality does not fit
    /// this position type.
    fn from_coord(coord: &Coord) -> Result<Self>;

    fn to_coord(&self) -> Coord;

    fn dimension(&self) -> usize;
}

fn check_finite(coord: &Coord) -> Result<()> {
    if coord.is_finite() {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Coordinates must be finite, got {coord:?}."
        )))
    }
}

impl Position for [f64; 2] {
    const DIMENSION: Option<usize> = Some(2);

    fn from_coord(coord: &Coord) -> Result<Self> {
        check_finite(coord)?;
        if coord.has_z() {
            return Err(Error::validation(
                "Expected a 2D position, but the coordinate has a z-value.",
            ));
        }
        Ok([coord.x, coord.y])
    }

    fn to_coord(&self) -> Coord {
        Coord::xy(self[0], self[1])
    }

    fn dimension(&self) -> usize {
        2
    }
}

impl Position for [f64; 3] {
    const DIMENSION: Option<usize> = Some(3);

    fn from_coord(coord: &Coord) -> Result<Self> {
        check_finite(coord)?;
        match coord.z {
            Some(z) => Ok([coord.x, coord.y, z]),
            None => Err(Error::validation(
                "Expected a 3D position, but the coordinate has no z-value.",
            )),
        }
    }

    fn to_coord(&self) -> Coord {
        Coord::xyz(self[0], self[1], self[2])
    }

    fn dimension(&self) -> usize {
        3
    }
}

/// A 2D or 3D position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyPosition {
    Xy([f64; 2]),
    Xyz([f64; 3]),
}

impl From<[f64; 2]> for AnyPosition {
    fn from(position: [f64; 2]) -> Self {
        AnyPosition::Xy(position)
    }
}

impl From<[f64; 3]> for AnyPosition {
    fn from(position: [f64; 3]) -> Self {
        AnyPosition::Xyz(position)
    }
}

impl Position for AnyPosition {
    const DIMENSION: Option<usize> = None;

    fn from_coord(coord: &Coord) -> Result<Self> {
        if coord.has_z() {
            <[f64; 3]>::from_coord(coord).map(AnyPosition::Xyz)
        } else {
            <[f64; 2]>::from_coord(coord).map(AnyPosition::Xy)
        }
    }

    fn to_coord(&self) -> Coord {
        match self {
            AnyPosition::Xy(position) => position.to_coord(),
            AnyPosition::Xyz(position) => position.to_coord(),
        }
    }

    fn dimension(&self) -> usize {
        match self {
            AnyPosition::Xy(_) => 2,
            AnyPosition::Xyz(_) => 3,
        }
    }
}

impl<'de> Deserialize<'de> for AnyPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let ordinates = Vec::<f64>::deserialize(deserializer)?;
        match ordinates[..] {
            [x, y] => Ok(AnyPosition::Xy([x, y])),
            [x, y, z] => Ok(AnyPosition::Xyz([x, y, z])),
            _ => Err(serde::de::Error::invalid_length(
                ordinates.len(),
                &"a position with 2 or 3 ordinates",
            )),
        }
    }
}

/// Checks that all positions share one dimensionality.
///
/// Returns that dimensionality, or `None` when there are no positions.
pub(crate) fn uniform_dimension<'a, P: Position + 'a>(
    positions: impl IntoIterator<Item = &'a P>,
) -> Result<Option<usize>> {
    let mut positions = positions.into_iter();
    let Some(first) = positions.next() else {
        return Ok(None);
    };
    let dimension = first.dimension();
    if positions.any(|position| position.dimension() != dimension) {
        return Err(Error::validation(
            "All positions of a geometry must have the same number of ordinates.",
        ));
    }
    Ok(Some(dimension))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_any_position_from_json() {
        let xy: AnyPosition = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(xy, AnyPosition::Xy([1., 2.]));
        let xyz: AnyPosition = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(xyz, AnyPosition::Xyz([1., 2., 3.]));
        assert!(serde_json::from_str::<AnyPosition>("[1]").is_err());
        assert!(serde_json::from_str::<AnyPosition>("[1, 2, 3, 4]").is_err());
    }

    #[test]
    fn test_fixed_dimensions() {
        assert!(serde_json::from_str::<[f64; 2]>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<[f64; 3]>("[1, 2]").is_err());
        assert!(<[f64; 2]>::from_coord(&Coord::xyz(1., 2., 3.)).is_err());
        assert!(<[f64; 3]>::from_coord(&Coord::xy(1., 2.)).is_err());
        assert_eq!(
            AnyPosition::from_coord(&Coord::xyz(1., 2., 3.)).unwrap(),
            AnyPosition::Xyz([1., 2., 3.])
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(AnyPosition::from_coord(&Coord::xy(f64::NAN, 0.)).is_err());
        assert!(<[f64; 3]>::from_coord(&Coord::xyz(0., 0., f64::INFINITY)).is_err());
    }

    #[test]
    fn test_uniform_dimension() {
        let mixed = [AnyPosition::Xy([0., 0.]), AnyPosition::Xyz([0., 0., 0.])];
        assert!(uniform_dimension(&mixed).is_err());
        assert_eq!(uniform_dimension(&mixed[..1]).unwrap(), Some(2));
        assert_eq!(uniform_dimension::<AnyPosition>(&[]).unwrap(), None);
    }
}
