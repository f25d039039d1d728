use std::fmt;

use glam::Affine2;

use crate::{CompositeOperation, FillRule, ImageSource, Paint, Path, Rect, StrokeSettings};

/// How new content is combined with the surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Compositing {
    /// Multiplies the alpha of everything drawn
    pub global_alpha: f32,
    pub operation: CompositeOperation,
}

impl Default for Compositing {
    fn default() -> Self {
        Self {
            global_alpha: 1.,
            operation: CompositeOperation::SourceOver,
        }
    }
}

/// A drawing command given to the backend.
///
/// Commands borrow their path and paint from the context. Paths and
/// image rectangles are in coordinate space before `transform` is applied.
/// Paint is sampled in the same space.
#[derive(Copy, Clone)]
pub enum Command<'a> {
    /// Resets every pixel to transparent.
    Clear,
    /// Fills a path.
    FillPath {
        path: &'a Path,
        paint: &'a Paint,
        fill_rule: FillRule,
        transform: Affine2,
        compositing: Compositing,
    },
    /// Strokes a path.
    StrokePath {
        path: &'a Path,
        paint: &'a Paint,
        stroke: StrokeSettings,
        transform: Affine2,
        compositing: Compositing,
    },
    /// Draws the `source` region of an image into `destination`.
    ///
    /// Both rectangles are normalized, non-empty, and `source`
    /// lies within the image bounds.
    DrawImage {
        image: &'a dyn ImageSource,
        source: Rect,
        destination: Rect,
        transform: Affine2,
        compositing: Compositing,
    },
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Clear => f.write_str("Clear"),
            Command::FillPath {
                path,
                paint,
                fill_rule,
                transform,
                compositing,
            } => f
                .debug_struct("FillPath")
                .field("path", path)
                .field("paint", paint)
                .field("fill_rule", fill_rule)
                .field("transform", transform)
                .field("compositing", compositing)
                .finish(),
            Command::StrokePath {
                path,
                paint,
                stroke,
                transform,
                compositing,
            } => f
                .debug_struct("StrokePath")
                .field("path", path)
                .field("paint", paint)
                .field("stroke", stroke)
                .field("transform", transform)
                .field("compositing", compositing)
                .finish(),
            Command::DrawImage {
                image,
                source,
                destination,
                transform,
                compositing,
            } => f
                .debug_struct("DrawImage")
                .field("image", &(image.width(), image.height()))
                .field("source", source)
                .field("destination", destination)
                .field("transform", transform)
                .field("compositing", compositing)
                .finish(),
        }
    }
}
