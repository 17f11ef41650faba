//! Shared primitive types used across the dataset and views.

/// Unique key of a region row.
pub type RegionName = String;

/// Unique key of a municipal row.
pub type MunicipalityName = String;

/// Master seed the RNG bank is built from.
pub type Seed = u64;

/// Inclusive `(min, max)` population bounds, in persons.
pub type PopulationRange = (i64, i64);
