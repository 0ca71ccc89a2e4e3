pub mod adapter;
pub mod bodies;
pub mod types;

pub use adapter::{
    house_system_code, set_ephemeris_path, validate_house_cusps, EphemerisAdapter, EphemerisError,
    SwissEphemerisAdapter, DEFAULT_FLAGS,
};
pub use bodies::Body;
pub use types::{BodyPosition, GeoLocation, HouseCusps, PointCategory};
