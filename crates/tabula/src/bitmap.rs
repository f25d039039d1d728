//! Raster sources for `drawImage`.

use glam::vec2;

use crate::{Color, Rect};

/// A bitmap that can be drawn onto a context.
pub trait ImageSource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// The unpremultiplied color at `(x, y)`. Only called
    /// with in-bounds coordinates.
    fn pixel(&self, x: u32, y: u32) -> Color;

    fn bounds(&self) -> Rect {
        Rect::from_xywh(0., 0., self.width() as f32, self.height() as f32)
    }
}

/// An owned RGBA bitmap, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

/// Pixel data that does not match the declared dimensions.
#[derive(Debug, thiserror::Error)]
#[error("expected {expected} bytes of RGBA data for a {width}x{height} bitmap, found {actual}")]
pub struct BitmapSizeMismatch {
    width: u32,
    height: u32,
    expected: usize,
    actual: usize,
}

impl Bitmap {
    /// Creates a bitmap filled with `color`.
    pub fn new(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Creates a bitmap from tightly packed, unpremultiplied RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self, BitmapSizeMismatch> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(BitmapSizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(4)
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a bitmap by evaluating `f` at every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Color) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}

impl ImageSource for Bitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }
}

#[cfg(feature = "image")]
impl ImageSource for ::image::RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        Color::from_array(self.get_pixel(x, y).0)
    }
}

/// Normalizes and clips a source rectangle to the bounds of `image`,
/// shrinking `destination` by the same proportions.
///
/// Returns `None` if nothing would be drawn.
pub fn clip_source(image: &dyn ImageSource, source: Rect, destination: Rect) -> Option<(Rect, Rect)> {
    if !(source.is_finite() && destination.is_finite()) {
        return None;
    }
    let source = source.normalized();
    let destination = destination.normalized();
    if source.is_empty() || destination.is_empty() {
        return None;
    }

    let clipped = source.intersection(image.bounds())?;
    let scale = destination.size / source.size;
    let clipped_destination = Rect::new(
        destination.pos + (clipped.pos - source.pos) * scale,
        clipped.size * scale,
    );
    Some((clipped, clipped_destination))
}

/// Nearest-neighbour lookup for a point in image space.
pub fn sample_nearest(image: &dyn ImageSource, x: f32, y: f32) -> Option<Color> {
    if !(x >= 0. && y >= 0.) {
        return None;
    }
    let (px, py) = (x.floor() as u32, y.floor() as u32);
    if px < image.width() && py < image.height() {
        Some(image.pixel(px, py))
    } else {
        None
    }
}

/// The full-image source rectangle for the two- and four-argument draw forms.
pub fn full_source(image: &dyn ImageSource) -> Rect {
    Rect::new(vec2(0., 0.), image.bounds().size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Bitmap {
        Bitmap::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                Color::BLACK
            } else {
                Color::WHITE
            }
        })
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert!(Bitmap::from_rgba8(2, 2, &[0; 16]).is_ok());
        assert!(Bitmap::from_rgba8(2, 2, &[0; 15]).is_err());
    }

    #[test]
    fn clip_keeps_proportions() {
        let image = checker();
        let (source, destination) = clip_source(
            &image,
            Rect::from_xywh(2., 2., 4., 4.),
            Rect::from_xywh(0., 0., 8., 8.),
        )
        .unwrap();
        assert_eq!(source, Rect::from_xywh(2., 2., 2., 2.));
        assert_eq!(destination, Rect::from_xywh(0., 0., 4., 4.));
    }

    #[test]
    fn negative_source_is_normalized() {
        let image = checker();
        let (source, _) = clip_source(
            &image,
            Rect::from_xywh(4., 4., -2., -2.),
            Rect::from_xywh(0., 0., 2., 2.),
        )
        .unwrap();
        assert_eq!(source, Rect::from_xywh(2., 2., 2., 2.));
    }

    #[test]
    fn empty_rects_draw_nothing() {
        let image = checker();
        let dest = Rect::from_xywh(0., 0., 2., 2.);
        assert!(clip_source(&image, Rect::from_xywh(0., 0., 0., 2.), dest).is_none());
        assert!(clip_source(&image, Rect::from_xywh(10., 10., 2., 2.), dest).is_none());
        let empty = Bitmap::new(0, 0, Color::BLACK);
        assert!(clip_source(&empty, full_source(&empty), dest).is_none());
    }

    #[test]
    fn nearest_sampling() {
        let image = checker();
        assert_eq!(sample_nearest(&image, 0.5, 0.5), Some(Color::BLACK));
        assert_eq!(sample_nearest(&image, 1.9, 0.1), Some(Color::WHITE));
        assert_eq!(sample_nearest(&image, 4.0, 0.0), None);
        assert_eq!(sample_nearest(&image, -0.1, 0.0), None);
    }
}
