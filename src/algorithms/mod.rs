//! Collection of geometric algorithms used to interpret eye-tracker data,
//! independent of where the samples come from

pub mod accuracy;
pub mod pose;
pub mod triangulation;
pub mod vergence;

pub use vergence::{calc_vergence_from_dir, VergenceEstimator};
