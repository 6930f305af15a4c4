pub mod format;
pub mod height;
pub mod write;

pub use format::{Capabilities, Format};
pub use height::{Height, LATEST_HEIGHT};
pub use write::WriteInfo;
