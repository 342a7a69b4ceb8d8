//! Thermal-IR cloud classification and rainfall-likelihood analysis.
//!
//! Pipeline:
//!   load → grayscale reduce → strip header → classify tiers →
//!   aggregate regions → rank → report / render.

pub mod aggregate;
pub mod brightness;
pub mod classify;
pub mod config;
pub mod error;
pub mod font;
pub mod geo;
pub mod pipeline;
pub mod region;
pub mod render;
pub mod report;
pub mod scan;

pub use error::{Error, Result};
