pub mod checksum;
pub mod fractal;
pub mod lsb;
pub mod mode;
pub mod placement;

pub use checksum::{Region, CHECKSUM_REGION, HEADER_SIZE, MODE_MARKER_LOCATION};
pub use fractal::{create_fractal_header, FractalHeaderGenerator, Window};
pub use mode::{select_mode, SteganoMode, CHAOS_INTENSITY};
pub use placement::{
    Channel, MultiChannelSplit, Placement, PlacementMap, PlacementStrategy, PositionList,
    SequentialRaster, Slot, Target,
};
