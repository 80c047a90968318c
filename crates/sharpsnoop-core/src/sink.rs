use crate::config::Layout;
use crate::framebuffer::Framebuffer;
use crate::DisplayError;
use std::path::Path;

/// Destination for framebuffer snapshots.
pub trait ImageSink {
    fn persist(&mut self, framebuffer: &Framebuffer, layout: Layout, path: &Path) -> Result<(), DisplayError>;
}

/// Writes snapshots as image files, format picked from the path's extension.
#[derive(Debug, Default)]
pub struct ImageFileSink;

impl ImageSink for ImageFileSink {
    fn persist(&mut self, framebuffer: &Framebuffer, layout: Layout, path: &Path) -> Result<(), DisplayError> {
        framebuffer.render(layout).save(path)?;
        Ok(())
    }
}
