//! Rebuilds Android launcher home-screen layouts from a launcher database
//! and renders them as a browsable HTML report.

pub mod common;
pub mod error;
pub mod layout_engine;
pub mod model;
pub mod pipeline;
pub mod sys;
pub mod ui;

pub use error::{Error, Result};
