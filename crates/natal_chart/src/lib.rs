pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod time;
pub mod zodiac;

pub use chart::{ChartService, ChartSnapshot};
pub use error::{ChartError, LookupError};
pub use time::{BirthData, TimeResolver};
