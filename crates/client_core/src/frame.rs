//! Composite frame decoding and painting.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbaImage;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::geometry::{CoordinateMapping, ScreenRect};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("frame payload is not a decodable image: {0}")]
    Image(#[from] image::ImageError),
    #[error("decoded frame has no pixels")]
    Empty,
    #[error("decode task failed: {0}")]
    Task(String),
}

/// A decoded `[RGB | overlay | mask]` composite.
#[derive(Debug, Clone)]
pub struct CompositeFrame {
    image: Arc<RgbaImage>,
}

impl CompositeFrame {
    pub fn total_width(&self) -> u32 {
        self.image.width()
    }

    pub fn total_height(&self) -> u32 {
        self.image.height()
    }

    pub fn rgba(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl From<RgbaImage> for CompositeFrame {
    fn from(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }
}

/// Arrival order of a frame on the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameSeq(pub u64);

#[derive(Debug)]
pub struct DecodedFrame {
    pub seq: FrameSeq,
    pub result: Result<CompositeFrame, FrameError>,
}

/// Decodes a base64 image payload. A `data:image/...;base64,` prefix is
/// tolerated.
pub fn decode_composite(image_b64: &str) -> Result<CompositeFrame, FrameError> {
    let payload = image_b64
        .split_once(";base64,")
        .map_or(image_b64, |(_, data)| data);
    let bytes = STANDARD.decode(payload.trim().as_bytes())?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(FrameError::Empty);
    }
    Ok(CompositeFrame {
        image: Arc::new(image),
    })
}

/// Numbers incoming frames and decodes them on the blocking pool so the
/// caller's loop keeps receiving messages while a decode is outstanding.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    next_seq: AtomicU64,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit<F>(&self, image_b64: String, on_done: F) -> JoinHandle<()>
    where
        F: FnOnce(DecodedFrame) + Send + 'static,
    {
        let seq = FrameSeq(self.next_seq.fetch_add(1, Ordering::Relaxed));
        let decode = tokio::task::spawn_blocking(move || decode_composite(&image_b64));
        tokio::spawn(async move {
            let result = match decode.await {
                Ok(result) => result,
                Err(err) => Err(FrameError::Task(err.to_string())),
            };
            on_done(DecodedFrame { seq, result });
        })
    }
}

/// Where frames end up on screen.
pub trait PaintSurface {
    /// Sets the backing pixel size of the surface.
    fn resize(&mut self, width: u32, height: u32);
    /// Draws the composite unscaled at (0, 0).
    fn paint(&mut self, frame: &CompositeFrame);
    /// Current on-screen bounds of the surface.
    fn screen_rect(&self) -> ScreenRect;
}

/// Paints decoded frames and publishes the coordinate mapping for the
/// interactive panel.
///
/// Frames are painted in arrival order: a decode that completes after a
/// newer frame was already painted is dropped.
pub struct FrameRenderer<S> {
    surface: S,
    painted: Option<FrameSeq>,
    frame_size: Option<(u32, u32)>,
    mapping: Option<CoordinateMapping>,
}

impl<S: PaintSurface> FrameRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            painted: None,
            frame_size: None,
            mapping: None,
        }
    }

    pub fn mapping(&self) -> Option<&CoordinateMapping> {
        self.mapping.as_ref()
    }

    pub fn last_painted(&self) -> Option<FrameSeq> {
        self.painted
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Returns the freshly published mapping when the frame was painted.
    pub fn present(&mut self, decoded: DecodedFrame) -> Option<CoordinateMapping> {
        let DecodedFrame { seq, result } = decoded;
        let frame = match result {
            Ok(frame) => frame,
            Err(err) => {
                warn!(seq = seq.0, "dropping undecodable frame: {err}");
                return None;
            }
        };
        if self.painted.is_some_and(|painted| painted >= seq) {
            debug!(
                seq = seq.0,
                painted = self.painted.map(|s| s.0),
                "dropping stale frame decode"
            );
            return None;
        }

        let (width, height) = (frame.total_width(), frame.total_height());
        self.surface.resize(width, height);
        self.surface.paint(&frame);
        self.painted = Some(seq);
        self.frame_size = Some((width, height));
        self.relayout()
    }

    /// Recomputes the mapping from the surface's current on-screen geometry.
    pub fn relayout(&mut self) -> Option<CoordinateMapping> {
        let (width, height) = self.frame_size?;
        let mapping = CoordinateMapping::for_composite(width, height, self.surface.screen_rect());
        self.mapping = Some(mapping);
        Some(mapping)
    }
}

#[cfg(test)]
#[path = "tests/frame_tests.rs"]
mod tests;
