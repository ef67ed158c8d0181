pub mod checksum;
pub mod header;
pub mod hide;
pub mod unveil;
pub mod unveil_raw;
