//! Row filters: geographic bounding box and price range
//!
//! Both are inclusive interval checks over named float columns. Cells in a
//! required column that do not parse as floats are schema errors; a cell
//! that parses to NaN fails every interval check and its row is dropped.

use csv::StringRecord;

use crate::dataset::Dataset;
use crate::error::{Error, Result};

pub const LONGITUDE_COLUMN: &str = "longitude";
pub const LATITUDE_COLUMN: &str = "latitude";
pub const PRICE_COLUMN: &str = "price";

/// Closed longitude/latitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

/// The rectangle containing valid records for this dataset. Hardcoded
/// policy of the step, not configurable.
pub const NYC_BOUNDS: GeoBounds = GeoBounds {
    min_longitude: -74.25,
    max_longitude: -73.50,
    min_latitude: 40.5,
    max_latitude: 41.2,
};

impl GeoBounds {
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        longitude >= self.min_longitude
            && longitude <= self.max_longitude
            && latitude >= self.min_latitude
            && latitude <= self.max_latitude
    }
}

/// Closed price interval. `min > max` is not rejected; it simply matches
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

fn numeric_cell(row: &StringRecord, index: usize, column: &str, row_number: usize) -> Result<f64> {
    let raw = row.get(index).unwrap_or("");
    raw.trim().parse::<f64>().map_err(|_| {
        Error::schema(format!(
            "column '{column}' row {row_number}: value '{raw}' is not numeric"
        ))
    })
}

/// Drop rows outside the bounding box. Returns the surviving row count.
pub fn retain_in_bounds(table: &mut Dataset, bounds: &GeoBounds) -> Result<usize> {
    let longitude = table.require_column(LONGITUDE_COLUMN)?;
    let latitude = table.require_column(LATITUDE_COLUMN)?;
    table.try_retain(|row_number, row| {
        let lon = numeric_cell(row, longitude, LONGITUDE_COLUMN, row_number)?;
        let lat = numeric_cell(row, latitude, LATITUDE_COLUMN, row_number)?;
        Ok(bounds.contains(lon, lat))
    })
}

/// Drop rows with a price outside the range. Returns the surviving row count.
pub fn retain_in_price_range(table: &mut Dataset, range: &PriceRange) -> Result<usize> {
    let price = table.require_column(PRICE_COLUMN)?;
    table.try_retain(|row_number, row| {
        Ok(range.contains(numeric_cell(row, price, PRICE_COLUMN, row_number)?))
    })
}
