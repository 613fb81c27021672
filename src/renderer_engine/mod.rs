pub mod r#trait;
pub use r#trait::Surface;

pub mod recording_surface;
pub use self::recording_surface::{DrawCommand, RecordingSurface};

pub mod raster_surface;
pub use self::raster_surface::RasterSurface;
