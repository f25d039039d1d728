//! A software rendering backend for `tabula` that uses [`tiny-skia`](https://docs.rs/tiny-skia).
//!
//! `tiny-skia` computes anti-aliased coverage for fills and strokes. Paint
//! and compositing are evaluated per pixel by [`composite`], which supports
//! every [`CompositeOperation`](tabula::CompositeOperation).

use std::any::Any;

use tabula::{
    glam::{vec2, Affine2, Vec2},
    pack_argb, sample_nearest, Backend, Color, Command, Compositing, FillRule,
    ImageSource, LineCap, LineJoin, Paint, PathSegment, Rect, StrokeSettings,
};
use tiny_skia::{Mask, PathBuilder, PathStroker, Pixmap, Stroke, Transform};

mod composite;

pub use composite::composite;

/// A `tiny-skia` rendering backend.
///
/// The surface has one pixel per coordinate unit.
#[derive(Default)]
pub struct TinySkiaBackend {
    /// `None` while either dimension is zero
    pixmap: Option<Pixmap>,
    width: u32,
    height: u32,
}

impl TinySkiaBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    fn fill_path(
        &mut self,
        path: &tabula::Path,
        paint: &Paint,
        fill_rule: FillRule,
        transform: Affine2,
        compositing: Compositing,
    ) {
        let path = match convert_path(path) {
            Some(path) => path,
            None => return,
        };
        self.draw_coverage(&path, convert_fill_rule(fill_rule), transform, compositing, |p| {
            paint.sample(p)
        });
    }

    fn stroke_path(
        &mut self,
        path: &tabula::Path,
        paint: &Paint,
        settings: StrokeSettings,
        transform: Affine2,
        compositing: Compositing,
    ) {
        let path = match convert_path(path) {
            Some(path) => path,
            None => return,
        };
        let stroke = Stroke {
            width: settings.width,
            miter_limit: settings.miter_limit,
            line_cap: convert_line_cap(settings.line_cap),
            line_join: convert_line_join(settings.line_join),
            dash: None,
        };
        let resolution_scale = PathStroker::compute_resolution_scale(&convert_transform(transform));
        let outline = match path.stroke(&stroke, resolution_scale) {
            Some(outline) => outline,
            None => return,
        };
        self.draw_coverage(
            &outline,
            tiny_skia::FillRule::Winding,
            transform,
            compositing,
            |p| paint.sample(p),
        );
    }

    fn draw_image(
        &mut self,
        image: &dyn ImageSource,
        source: Rect,
        destination: Rect,
        transform: Affine2,
        compositing: Compositing,
    ) {
        let rect = match tiny_skia::Rect::from_xywh(
            destination.pos.x,
            destination.pos.y,
            destination.size.x,
            destination.size.y,
        ) {
            Some(rect) => rect,
            None => return,
        };
        let path = PathBuilder::from_rect(rect);
        let scale = source.size / destination.size;
        // Keep samples inside the source region at its far edges.
        let last = source.min().max(source.max() - 1e-3);
        self.draw_coverage(
            &path,
            tiny_skia::FillRule::Winding,
            transform,
            compositing,
            |p| {
                let local = (source.pos + (p - destination.pos) * scale).clamp(source.min(), last);
                sample_nearest(image, local.x, local.y).unwrap_or(Color::TRANSPARENT)
            },
        );
    }

    /// Rasterizes `path` into a coverage mask and composites
    /// `shade` through it.
    ///
    /// Bounded operations only rasterize and visit the pixels
    /// under the transformed path bounds.
    fn draw_coverage(
        &mut self,
        path: &tiny_skia::Path,
        fill_rule: tiny_skia::FillRule,
        transform: Affine2,
        compositing: Compositing,
        shade: impl FnMut(tabula::Vec2) -> Color,
    ) {
        let pixmap = match &mut self.pixmap {
            Some(pixmap) => pixmap,
            None => return,
        };
        if transform.matrix2.determinant().abs() <= f32::EPSILON * f32::EPSILON {
            log::warn!("skipping draw with non-invertible transform {:?}", transform);
            return;
        }
        let (width, height) = (pixmap.width(), pixmap.height());
        let (left, top, right, bottom) = if compositing.operation.is_bounded() {
            match coverage_region(path, transform, width, height) {
                Some(region) => region,
                None => return,
            }
        } else {
            (0, 0, width, height)
        };
        let mut mask = match Mask::new(right - left, bottom - top) {
            Some(mask) => mask,
            None => return,
        };
        let to_mask = Affine2::from_translation(-vec2(left as f32, top as f32)) * transform;
        mask.fill_path(path, fill_rule, true, convert_transform(to_mask));
        composite(
            pixmap,
            &mask,
            (left, top),
            transform.inverse(),
            compositing,
            shade,
        );
    }
}

/// The pixel rectangle `(left, top, right, bottom)` that can receive
/// coverage from `path`, or `None` if it misses the surface.
fn coverage_region(
    path: &tiny_skia::Path,
    transform: Affine2,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let bounds = path.bounds();
    let bounds = Rect::from_xywh(bounds.left(), bounds.top(), bounds.width(), bounds.height())
        .bbox_transformed(transform);
    // Anti-aliasing reaches into the neighbouring pixels.
    let padded = Rect::new(bounds.pos - Vec2::ONE, bounds.size + Vec2::splat(2.));
    let surface = Rect::from_xywh(0., 0., width as f32, height as f32);
    let region = padded.intersection(surface)?;
    let (min, max) = (region.min().floor(), region.max().ceil());
    Some((
        min.x as u32,
        min.y as u32,
        (max.x as u32).min(width),
        (max.y as u32).min(height),
    ))
}

impl Backend for TinySkiaBackend {
    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("allocating {}x{} pixmap", width, height);
        self.width = width;
        self.height = height;
        self.pixmap = Pixmap::new(width, height);
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn execute(&mut self, command: Command<'_>) {
        match command {
            Command::Clear => {
                if let Some(pixmap) = &mut self.pixmap {
                    pixmap.fill(tiny_skia::Color::TRANSPARENT);
                }
            }
            Command::FillPath {
                path,
                paint,
                fill_rule,
                transform,
                compositing,
            } => self.fill_path(path, paint, fill_rule, transform, compositing),
            Command::StrokePath {
                path,
                paint,
                stroke,
                transform,
                compositing,
            } => self.stroke_path(path, paint, stroke, transform, compositing),
            Command::DrawImage {
                image,
                source,
                destination,
                transform,
                compositing,
            } => self.draw_image(image, source, destination, transform, compositing),
        }
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixel = self.pixmap.as_ref()?.pixel(x, y)?;
        Some(convert_premultiplied(pixel))
    }

    fn to_argb(&self) -> Vec<u32> {
        match &self.pixmap {
            Some(pixmap) => pixmap
                .pixels()
                .iter()
                .map(|&pixel| pack_argb(convert_premultiplied(pixel)))
                .collect(),
            None => Vec::new(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn convert_path(path: &tabula::Path) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(pos) => builder.move_to(pos.x, pos.y),
            PathSegment::LineTo(pos) => builder.line_to(pos.x, pos.y),
            PathSegment::QuadTo { control, end } => {
                builder.quad_to(control.x, control.y, end.x, end.y)
            }
            PathSegment::CubicTo {
                control1,
                control2,
                end,
            } => builder.cubic_to(control1.x, control1.y, control2.x, control2.y, end.x, end.y),
            PathSegment::Close => builder.close(),
        }
    }
    builder.finish()
}

fn convert_premultiplied(pixel: tiny_skia::PremultipliedColorU8) -> Color {
    Color::from_premultiplied(composite::unpack(pixel))
}

fn convert_transform(transform: Affine2) -> Transform {
    let cols = transform.to_cols_array();
    Transform::from_row(cols[0], cols[1], cols[2], cols[3], cols[4], cols[5])
}

fn convert_line_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    }
}

fn convert_line_join(join: LineJoin) -> tiny_skia::LineJoin {
    match join {
        LineJoin::Miter => tiny_skia::LineJoin::Miter,
        LineJoin::Round => tiny_skia::LineJoin::Round,
        LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
    }
}

fn convert_fill_rule(rule: FillRule) -> tiny_skia::FillRule {
    match rule {
        FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        FillRule::NonZero => tiny_skia::FillRule::Winding,
    }
}

#[cfg(test)]
mod tests {
    use tabula::Path;

    use super::*;

    #[test]
    fn transform_layout_matches_glam() {
        let affine = Affine2::from_cols_array(&[1., 2., 3., 4., 5., 6.]);
        let mut point = tiny_skia::Point::from_xy(1., 1.);
        convert_transform(affine).map_point(&mut point);
        let expected = affine.transform_point2(vec2(1., 1.));
        assert_eq!((point.x, point.y), (expected.x, expected.y));
    }

    #[test]
    fn empty_path_converts_to_none() {
        assert!(convert_path(&Path::new()).is_none());
    }

    #[test]
    fn zero_sized_surface() {
        let mut backend = TinySkiaBackend::new();
        backend.resize(0, 10);
        assert!(backend.pixmap().is_none());
        assert_eq!(backend.pixel(0, 0), None);
        assert!(backend.to_argb().is_empty());
        backend.execute(Command::Clear);
    }
}
