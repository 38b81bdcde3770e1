//! PostGIS spatial extension: geometry operators and mixed-case `ST_*` functions.

use crate::dialect::Registry;

pub const NAME: &str = "postgis";

pub const OPERATORS: &[&str] = &["&&&", "|=|", "<#>", "<<->>", "<<#>>", "~~="];

pub const TYPES: &[&str] = &["GEOMETRY", "GEOGRAPHY", "BOX2D", "BOX3D"];

pub const FUNCTIONS: &[&str] = &[
    "ST_Area",
    "ST_AsGeoJSON",
    "ST_AsText",
    "ST_Buffer",
    "ST_Centroid",
    "ST_Contains",
    "ST_DWithin",
    "ST_Distance",
    "ST_GeomFromText",
    "ST_Intersects",
    "ST_Length",
    "ST_MakeEnvelope",
    "ST_MakePoint",
    "ST_SetSRID",
    "ST_Transform",
    "ST_Within",
    "ST_X",
    "ST_Y",
];

pub fn registry() -> Registry {
    Registry::new(NAME)
        .with_operators(OPERATORS)
        .with_types(TYPES)
        .with_functions(FUNCTIONS)
}
