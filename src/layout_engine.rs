//! Rebuilds home-screen occupancy from decoded favorites.

pub mod builder;
pub mod dimensions;

pub use builder::build_layout;
pub use dimensions::{Dimensions, compute_dimensions};

use crate::model::{Grid, Hotseat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub dimensions: Dimensions,
    /// One grid per desktop screen, in first-appearance order.
    pub grids: Vec<Grid>,
    pub hotseat: Hotseat,
}
