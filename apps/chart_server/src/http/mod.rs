//! HTTP surface of the chart service.
//!
//! One endpoint computes a chart from birth data; everything else is a
//! health probe. Handlers only translate between JSON and the
//! `natal_chart` types; the pipeline itself lives in `ChartService`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
