use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use futures::channel::oneshot;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Largest texture edge a default device accepts
pub const MAX_TEXTURE_DIMENSION: u32 = 8192;

/// Index of a texture registered with a [`crate::scene::Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) usize);

/// How texel values should be interpreted when sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Colour images (photos, backgrounds)
    Srgb,
    /// Data images such as normal maps
    Linear,
}

#[derive(Debug, Clone)]
pub enum TextureState {
    Pending,
    Ready(Arc<RgbaImage>),
    Failed,
}

/// A texture that may still be decoding on a background thread.
///
/// The handle owns the receiving end of a one-shot channel; [`poll`](Self::poll)
/// never blocks, so the frame loop can keep drawing with a placeholder until
/// the image arrives. A failed load is logged once and the handle stays
/// `Failed` for good.
#[derive(Debug)]
pub struct TextureHandle {
    path: PathBuf,
    color_space: ColorSpace,
    receiver: Option<oneshot::Receiver<Result<RgbaImage>>>,
    state: TextureState,
}

impl TextureHandle {
    pub fn pending(
        path: PathBuf,
        color_space: ColorSpace,
        receiver: oneshot::Receiver<Result<RgbaImage>>,
    ) -> Self {
        Self {
            path,
            color_space,
            receiver: Some(receiver),
            state: TextureState::Pending,
        }
    }

    /// Already-decoded texture
    pub fn ready(path: impl Into<PathBuf>, color_space: ColorSpace, image: RgbaImage) -> Self {
        Self {
            path: path.into(),
            color_space,
            receiver: None,
            state: TextureState::Ready(Arc::new(image)),
        }
    }

    pub fn failed(path: impl Into<PathBuf>, color_space: ColorSpace) -> Self {
        Self {
            path: path.into(),
            color_space,
            receiver: None,
            state: TextureState::Failed,
        }
    }

    /// Check for a finished load. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = self.receiver.as_mut() else {
            return false;
        };

        let resolved = match receiver.try_recv() {
            Ok(None) => return false,
            Ok(Some(Ok(image))) => {
                log::debug!(
                    "Texture ready: {} ({}x{})",
                    self.path.display(),
                    image.width(),
                    image.height()
                );
                TextureState::Ready(Arc::new(image))
            }
            Ok(Some(Err(e))) => {
                log::warn!("Texture unavailable, rendering without it: {e:#}");
                TextureState::Failed
            }
            Err(oneshot::Canceled) => {
                log::warn!("Texture loader for {} went away", self.path.display());
                TextureState::Failed
            }
        };

        self.state = resolved;
        self.receiver = None;
        true
    }

    /// Block until the load finishes. Intended for tools and tests.
    pub fn wait(&mut self) -> &TextureState {
        if let Some(receiver) = self.receiver.take() {
            self.state = match futures::executor::block_on(receiver) {
                Ok(Ok(image)) => TextureState::Ready(Arc::new(image)),
                Ok(Err(e)) => {
                    log::warn!("Texture unavailable, rendering without it: {e:#}");
                    TextureState::Failed
                }
                Err(oneshot::Canceled) => TextureState::Failed,
            };
        }
        &self.state
    }

    pub fn state(&self) -> &TextureState {
        &self.state
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        match &self.state {
            TextureState::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, TextureState::Pending)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }
}

/// Fire-and-forget image loader rooted at an asset directory
#[derive(Debug, Clone)]
pub struct TextureLoader {
    base: PathBuf,
}

impl TextureLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Start decoding `name` on a background thread
    pub fn load(&self, name: impl AsRef<Path>, color_space: ColorSpace) -> TextureHandle {
        let path = self.base.join(name);
        let (sender, receiver) = oneshot::channel();

        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || {
                // Receiver may already be gone; nothing to report then
                sender.send(decode(&worker_path)).ok();
            });

        match spawned {
            Ok(_) => {
                log::debug!("Loading texture {}", path.display());
                TextureHandle::pending(path, color_space, receiver)
            }
            Err(e) => {
                log::warn!("Could not spawn loader for {}: {e}", path.display());
                TextureHandle::failed(path, color_space)
            }
        }
    }
}

fn decode(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?
        .to_rgba8();

    match fit_within(&image, MAX_TEXTURE_DIMENSION) {
        Some(fitted) => {
            log::warn!(
                "Texture {} is {}x{}, downscaled to {}x{}",
                path.display(),
                image.width(),
                image.height(),
                fitted.width(),
                fitted.height()
            );
            Ok(fitted)
        }
        None => Ok(image),
    }
}

/// Size that keeps the aspect ratio with neither edge above `max`, or `None`
/// if the image already fits
pub fn fitted_size(width: u32, height: u32, max: u32) -> Option<(u32, u32)> {
    if width <= max && height <= max {
        return None;
    }

    let scale = max as f64 / width.max(height) as f64;
    let shrink = |edge: u32| ((edge as f64 * scale).round() as u32).clamp(1, max);
    Some((shrink(width), shrink(height)))
}

/// Downscaled copy of `image` if either edge exceeds `max`
pub fn fit_within(image: &RgbaImage, max: u32) -> Option<RgbaImage> {
    let (width, height) = fitted_size(image.width(), image.height(), max)?;
    Some(imageops::resize(image, width, height, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("folio-scene-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_png_in_background() {
        let dir = scratch_dir("png");
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
        source.save(dir.join("tiny.png")).unwrap();

        let mut handle = TextureLoader::new(&dir).load("tiny.png", ColorSpace::Srgb);
        let state = handle.wait().clone();

        match state {
            TextureState::Ready(image) => {
                assert_eq!(image.dimensions(), (3, 2));
                assert_eq!(image.get_pixel(1, 1).0, [10, 20, 30, 255]);
            }
            other => panic!("expected ready texture, got {other:?}"),
        }
        assert_eq!(handle.color_space(), ColorSpace::Srgb);
    }

    #[test]
    fn oversized_edges_shrink_to_the_limit() {
        assert_eq!(fitted_size(9000, 4500, MAX_TEXTURE_DIMENSION), Some((8192, 4096)));
        assert_eq!(fitted_size(3000, 12000, MAX_TEXTURE_DIMENSION), Some((2048, 8192)));
        assert_eq!(fitted_size(100_000, 1, MAX_TEXTURE_DIMENSION), Some((8192, 1)));
    }

    #[test]
    fn images_within_the_limit_are_left_alone() {
        assert_eq!(fitted_size(8192, 8192, MAX_TEXTURE_DIMENSION), None);
        assert_eq!(fitted_size(1920, 1080, MAX_TEXTURE_DIMENSION), None);
        assert!(fit_within(&RgbaImage::new(16, 4), 16).is_none());
    }

    #[test]
    fn fitted_copy_keeps_aspect_and_colour() {
        let image = RgbaImage::from_pixel(40, 10, image::Rgba([200, 100, 50, 255]));

        let fitted = fit_within(&image, 16).unwrap();
        assert_eq!(fitted.dimensions(), (16, 4));
        let pixel = fitted.get_pixel(8, 2).0;
        for (got, want) in pixel.iter().zip([200u8, 100, 50, 255]) {
            assert!(got.abs_diff(want) <= 1, "{pixel:?}");
        }
    }

    #[test]
    fn missing_file_fails_quietly() {
        let dir = scratch_dir("missing");
        let mut handle = TextureLoader::new(&dir).load("nope.jpeg", ColorSpace::Linear);

        assert!(matches!(handle.wait(), TextureState::Failed));
        assert!(handle.image().is_none());
        assert!(!handle.poll());
    }

    #[test]
    fn poll_resolves_once() {
        let (sender, receiver) = oneshot::channel();
        let mut handle = TextureHandle::pending("a.png".into(), ColorSpace::Srgb, receiver);

        assert!(!handle.poll());
        assert!(handle.is_pending());

        sender.send(Ok(RgbaImage::new(1, 1))).unwrap();
        assert!(handle.poll());
        assert!(handle.image().is_some());
        assert!(!handle.poll());
    }

    #[test]
    fn dropped_sender_marks_failed() {
        let (sender, receiver) = oneshot::channel::<Result<RgbaImage>>();
        let mut handle = TextureHandle::pending("b.png".into(), ColorSpace::Srgb, receiver);
        drop(sender);

        assert!(handle.poll());
        assert!(matches!(handle.state(), TextureState::Failed));
    }
}
