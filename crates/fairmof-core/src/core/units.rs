//! Stateless conversion of lengths, areas and volumes between length-based units.
//!
//! A [`Unit`] is a [`LengthUnit`] raised to a [`Dimension`]. Conversions multiply
//! by `(from / to)^power` exactly once per element, and refuse to convert between
//! different dimensions (an area can never be converted with a pure-length factor).

use nalgebra::{Matrix3, Point3, Vector3};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitError {
    #[error("Cannot convert a {from} quantity into a {to} quantity")]
    DimensionMismatch { from: Dimension, to: Dimension },
    #[error("Unknown unit: '{0}'")]
    UnknownUnit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Meter,
    Centimeter,
    Nanometer,
    Angstrom,
    Picometer,
    Bohr,
}

impl LengthUnit {
    /// Size of one unit expressed in metres.
    pub const fn in_meters(self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Centimeter => 1e-2,
            LengthUnit::Nanometer => 1e-9,
            LengthUnit::Angstrom => 1e-10,
            LengthUnit::Picometer => 1e-12,
            LengthUnit::Bohr => 5.291_772_109_03e-11,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Nanometer => "nm",
            LengthUnit::Angstrom => "Å",
            LengthUnit::Picometer => "pm",
            LengthUnit::Bohr => "bohr",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Some(LengthUnit::Meter),
            "cm" | "centimeter" | "centimeters" | "centimetre" => Some(LengthUnit::Centimeter),
            "nm" | "nanometer" | "nanometers" | "nanometre" => Some(LengthUnit::Nanometer),
            "a" | "å" | "Å" | "ang" | "angstrom" | "angstroms" => Some(LengthUnit::Angstrom),
            "pm" | "picometer" | "picometers" | "picometre" => Some(LengthUnit::Picometer),
            "bohr" | "a0" => Some(LengthUnit::Bohr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Area,
    Volume,
}

impl Dimension {
    pub const fn power(self) -> i32 {
        match self {
            Dimension::Length => 1,
            Dimension::Area => 2,
            Dimension::Volume => 3,
        }
    }

    fn from_power(power: i32) -> Option<Self> {
        match power {
            1 => Some(Dimension::Length),
            2 => Some(Dimension::Area),
            3 => Some(Dimension::Volume),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Length => "length",
            Dimension::Area => "area",
            Dimension::Volume => "volume",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    pub length: LengthUnit,
    pub dimension: Dimension,
}

impl Unit {
    pub const METER: Unit = Unit::new(LengthUnit::Meter, Dimension::Length);
    pub const SQUARE_METER: Unit = Unit::new(LengthUnit::Meter, Dimension::Area);
    pub const CUBIC_METER: Unit = Unit::new(LengthUnit::Meter, Dimension::Volume);
    pub const ANGSTROM: Unit = Unit::new(LengthUnit::Angstrom, Dimension::Length);
    pub const SQUARE_ANGSTROM: Unit = Unit::new(LengthUnit::Angstrom, Dimension::Area);
    pub const CUBIC_ANGSTROM: Unit = Unit::new(LengthUnit::Angstrom, Dimension::Volume);

    pub const fn new(length: LengthUnit, dimension: Dimension) -> Self {
        Self { length, dimension }
    }

    /// Returns the multiplicative factor taking a value in `self` to a value in `to`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::DimensionMismatch`] if the two units measure different dimensions.
    pub fn factor_to(self, to: Unit) -> Result<f64, UnitError> {
        if self.dimension != to.dimension {
            return Err(UnitError::DimensionMismatch {
                from: self.dimension,
                to: to.dimension,
            });
        }
        let ratio = self.length.in_meters() / to.length.in_meters();
        Ok(ratio.powi(self.dimension.power()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dimension {
            Dimension::Length => write!(f, "{}", self.length.symbol()),
            Dimension::Area => write!(f, "{}^2", self.length.symbol()),
            Dimension::Volume => write!(f, "{}^3", self.length.symbol()),
        }
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    /// Parses unit strings such as `m`, `angstrom`, `m^2`, `m**3`, `Å³` or `nm²`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnitError::UnknownUnit(s.to_string());
        let trimmed = s.trim();

        let (base, power) = if let Some(stripped) = trimmed.strip_suffix('²') {
            (stripped, 2)
        } else if let Some(stripped) = trimmed.strip_suffix('³') {
            (stripped, 3)
        } else if let Some((base, exp)) = trimmed
            .split_once("**")
            .or_else(|| trimmed.split_once('^'))
        {
            (base, exp.trim().parse::<i32>().map_err(|_| unknown())?)
        } else {
            (trimmed, 1)
        };

        let length = LengthUnit::parse(base).ok_or_else(unknown)?;
        let dimension = Dimension::from_power(power).ok_or_else(unknown)?;
        Ok(Unit::new(length, dimension))
    }
}

/// A quantity whose every component can be multiplied by a conversion factor.
pub trait Scale {
    fn scale(self, factor: f64) -> Self;
}

impl Scale for f64 {
    fn scale(self, factor: f64) -> Self {
        self * factor
    }
}

impl Scale for [f64; 3] {
    fn scale(self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }
}

impl Scale for Point3<f64> {
    fn scale(self, factor: f64) -> Self {
        self * factor
    }
}

impl Scale for Vector3<f64> {
    fn scale(self, factor: f64) -> Self {
        self * factor
    }
}

impl Scale for Matrix3<f64> {
    fn scale(self, factor: f64) -> Self {
        self * factor
    }
}

impl<T: Scale> Scale for Vec<T> {
    fn scale(self, factor: f64) -> Self {
        self.into_iter().map(|v| v.scale(factor)).collect()
    }
}

/// Converts a scalar or array quantity from one unit to another.
///
/// # Errors
///
/// Returns [`UnitError::DimensionMismatch`] if `from` and `to` measure different dimensions.
pub fn convert<Q: Scale>(quantity: Q, from: Unit, to: Unit) -> Result<Q, UnitError> {
    let factor = from.factor_to(to)?;
    Ok(quantity.scale(factor))
}
