//! Mapping between the data space (dates, zoom, places) and view space

mod lanes;
mod lod;
mod mapper;

pub use lanes::{LaneId, LaneIndex};
pub use lod::{select_lod, LodConfig, LodTier};
pub use mapper::CoordinateMapper;
