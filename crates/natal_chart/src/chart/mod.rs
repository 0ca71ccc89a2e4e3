pub mod assembler;
pub mod service;

pub use assembler::{
    assemble, ChartSnapshot, InterpretedAngle, InterpretedAngles, InterpretedBody,
    InterpretedCusp, PlacedBody, RawChart, SignPlacement, SubjectInfo,
};
pub use service::{compute_raw_chart, interpret, tracked_points, ChartService};
