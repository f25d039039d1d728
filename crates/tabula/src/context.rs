use glam::{vec2, Affine2};

use crate::{
    backend::command::{Command, Compositing},
    bitmap::{clip_source, full_source},
    config::{is_valid_alpha, is_valid_length},
    Backend, Color, CompositeOperation, ContextConfig, FillRule, Gradient, ImageSource, LineCap,
    LineJoin, Paint, Path, Rect, RenderDefaults, RenderState, StateStack, Style,
};

#[cfg(feature = "text")]
use crate::Font;

/// An unsupported number of trailing arguments to
/// [`DrawingContext::draw_image_with_args`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("drawImage takes 2, 4 or 8 numeric arguments after the image, got {0}")]
pub struct InvalidArgument(pub usize);

/// A stateful, immediate-mode 2D drawing context.
///
/// The context owns a backend surface, a stack of render states, and the
/// _current path_. Path-building calls mutate the current path, which fills
/// and strokes read without clearing; only [`begin_path`] discards it.
/// The current path is not part of the saved render state.
///
/// Geometry and style methods never fail. Malformed numeric input
/// (NaN, infinities, negative radii, and so on) leaves the context unchanged.
///
/// [`begin_path`]: DrawingContext::begin_path
pub struct DrawingContext {
    backend: Box<dyn Backend>,
    defaults: RenderDefaults,
    states: StateStack,
    path: Path,
    coord_width: u32,
    coord_height: u32,
}

impl DrawingContext {
    /// Creates a context drawing to `backend`, sizing its
    /// surface to the configured coordinate space.
    ///
    /// Invalid defaults fall back to the standard ones, as with the setters.
    pub fn new(mut backend: Box<dyn Backend>, config: &ContextConfig) -> Self {
        backend.resize(config.coord_width, config.coord_height);
        let defaults = config.defaults.sanitized();
        Self {
            backend,
            defaults,
            states: StateStack::new(RenderState::from_defaults(&defaults)),
            path: Path::new(),
            coord_width: config.coord_width,
            coord_height: config.coord_height,
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        &*self.backend
    }

    pub fn backend_mut(&mut self) -> &mut dyn Backend {
        &mut *self.backend
    }

    /// Gets the backend as its concrete type.
    pub fn backend_as<B: Backend>(&self) -> Option<&B> {
        self.backend.as_any().downcast_ref()
    }

    pub fn backend_as_mut<B: Backend>(&mut self) -> Option<&mut B> {
        self.backend.as_any_mut().downcast_mut()
    }

    /// Clears the surface and path, and returns all state to the configured defaults.
    pub fn reset(&mut self) {
        self.states.reset(RenderState::from_defaults(&self.defaults));
        self.path.clear();
        self.clear();
    }

    // Coordinate space

    pub fn coord_width(&self) -> u32 {
        self.coord_width
    }

    pub fn coord_height(&self) -> u32 {
        self.coord_height
    }

    /// Sets the width of the coordinate space.
    ///
    /// Always clears the surface, even if the width is unchanged.
    pub fn set_coord_width(&mut self, width: u32) {
        self.set_coord_size(width, self.coord_height);
    }

    /// Sets the height of the coordinate space.
    ///
    /// Always clears the surface, even if the height is unchanged.
    pub fn set_coord_height(&mut self, height: u32) {
        self.set_coord_size(self.coord_width, height);
    }

    /// Sets both coordinate dimensions, clearing the surface.
    pub fn set_coord_size(&mut self, width: u32, height: u32) {
        log::debug!("resizing coordinate space to {}x{}", width, height);
        self.coord_width = width;
        self.coord_height = height;
        self.backend.resize(width, height);
    }

    /// Reads back a surface pixel, if the backend stores pixels.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.backend.pixel(x, y)
    }

    /// The surface as unpremultiplied `0xAARRGGBB` pixels.
    pub fn to_argb(&self) -> Vec<u32> {
        self.backend.to_argb()
    }

    // Render state

    /// Pushes a copy of the render state onto the state stack.
    pub fn save_context(&mut self) {
        self.states.save();
    }

    /// Pops the last saved render state. Does nothing if
    /// no state has been saved.
    pub fn restore_context(&mut self) {
        self.states.restore();
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.states.scale(vec2(x, y));
    }

    /// Rotates clockwise by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        self.states.rotate(angle);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.states.translate(vec2(x, y));
    }

    /// Multiplies the current transform by `[m11 m21 dx; m12 m22 dy]`.
    pub fn transform(&mut self, m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) {
        self.states.transform_by(m11, m12, m21, m22, dx, dy);
    }

    pub fn current_transform(&self) -> Affine2 {
        self.states.transform()
    }

    /// Replaces the current transform instead of composing with it.
    pub fn set_transform(&mut self, transform: Affine2) {
        self.states.set_transform(transform);
    }

    pub fn render_state(&self) -> &RenderState {
        self.states.current()
    }

    pub fn fill_style(&self) -> &Style {
        &self.states.current().fill_style
    }

    pub fn set_fill_style(&mut self, style: impl Into<Style>) {
        self.states.current_mut().fill_style = style.into();
    }

    pub fn stroke_style(&self) -> &Style {
        &self.states.current().stroke_style
    }

    pub fn set_stroke_style(&mut self, style: impl Into<Style>) {
        self.states.current_mut().stroke_style = style.into();
    }

    pub fn global_alpha(&self) -> f32 {
        self.states.current().global_alpha
    }

    /// Ignores values outside `[0, 1]`.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if !is_valid_alpha(alpha) {
            log::trace!("ignoring global alpha {}", alpha);
            return;
        }
        self.states.current_mut().global_alpha = alpha;
    }

    pub fn global_composite_operation(&self) -> CompositeOperation {
        self.states.current().composite_operation
    }

    pub fn set_global_composite_operation(&mut self, operation: CompositeOperation) {
        self.states.current_mut().composite_operation = operation;
    }

    /// Sets the composite operation by its canvas name,
    /// e.g. `"destination-over"`. Unknown names are ignored.
    pub fn set_global_composite_operation_name(&mut self, name: &str) {
        match name.parse() {
            Ok(operation) => self.set_global_composite_operation(operation),
            Err(e) => log::trace!("ignoring composite operation: {}", e),
        }
    }

    pub fn line_cap(&self) -> LineCap {
        self.states.current().line_cap
    }

    pub fn set_line_cap(&mut self, line_cap: LineCap) {
        self.states.current_mut().line_cap = line_cap;
    }

    pub fn line_join(&self) -> LineJoin {
        self.states.current().line_join
    }

    pub fn set_line_join(&mut self, line_join: LineJoin) {
        self.states.current_mut().line_join = line_join;
    }

    pub fn line_width(&self) -> f32 {
        self.states.current().line_width
    }

    /// Ignores widths that are not finite and positive.
    pub fn set_line_width(&mut self, width: f32) {
        if !is_valid_length(width) {
            log::trace!("ignoring line width {}", width);
            return;
        }
        self.states.current_mut().line_width = width;
    }

    pub fn miter_limit(&self) -> f32 {
        self.states.current().miter_limit
    }

    /// Ignores limits that are not finite and positive.
    pub fn set_miter_limit(&mut self, limit: f32) {
        if !is_valid_length(limit) {
            log::trace!("ignoring miter limit {}", limit);
            return;
        }
        self.states.current_mut().miter_limit = limit;
    }

    #[cfg(feature = "text")]
    pub fn font(&self) -> Option<&Font> {
        self.states.current().font.as_ref()
    }

    #[cfg(feature = "text")]
    pub fn set_font(&mut self, font: impl Into<Option<Font>>) {
        self.states.current_mut().font = font.into();
    }

    #[cfg(feature = "text")]
    pub fn font_size(&self) -> f32 {
        self.states.current().font_size
    }

    /// Ignores sizes that are not finite and positive.
    #[cfg(feature = "text")]
    pub fn set_font_size(&mut self, size: f32) {
        if !is_valid_length(size) {
            log::trace!("ignoring font size {}", size);
            return;
        }
        self.states.current_mut().font_size = size;
    }

    // Gradients

    /// Creates a linear gradient from `(x0, y0)` to `(x1, y1)`.
    ///
    /// The gradient has no stops; add them with [`Gradient::add_color_stop`].
    pub fn create_linear_gradient(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Gradient {
        Gradient::linear(vec2(x0, y0), vec2(x1, y1))
    }

    /// Creates a radial gradient between the circle at `(x0, y0)` with radius
    /// `r0` and the circle at `(x1, y1)` with radius `r1`.
    pub fn create_radial_gradient(
        &self,
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
    ) -> Gradient {
        Gradient::radial(vec2(x0, y0), r0, vec2(x1, y1), r1)
    }

    // Path building

    /// The current path.
    pub fn current_path(&self) -> &Path {
        &self.path
    }

    /// Discards the current path.
    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(vec2(x, y));
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(vec2(x, y));
    }

    pub fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        self.path.quad_to(vec2(cpx, cpy), vec2(x, y));
    }

    pub fn cubic_curve_to(
        &mut self,
        cp1x: f32,
        cp1y: f32,
        cp2x: f32,
        cp2y: f32,
        x: f32,
        y: f32,
    ) {
        self.path
            .cubic_to(vec2(cp1x, cp1y), vec2(cp2x, cp2y), vec2(x, y));
    }

    pub fn arc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    ) {
        self.path
            .arc(vec2(x, y), radius, start_angle, end_angle, anticlockwise);
    }

    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        self.path.arc_to(vec2(x1, y1), vec2(x2, y2), radius);
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.path.rect(Rect::from_xywh(x, y, width, height));
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    // Drawing

    /// Resets every pixel of the surface to transparent.
    pub fn clear(&mut self) {
        self.backend.execute(Command::Clear);
    }

    /// Fills the current path with the nonzero winding rule.
    pub fn fill(&mut self) {
        self.fill_with_rule(FillRule::NonZero);
    }

    pub fn fill_with_rule(&mut self, fill_rule: FillRule) {
        let state = self.states.current();
        let paint = Paint::resolve(&state.fill_style);
        self.backend.execute(Command::FillPath {
            path: &self.path,
            paint: &paint,
            fill_rule,
            transform: state.transform,
            compositing: compositing(state),
        });
    }

    /// Strokes the current path.
    pub fn stroke(&mut self) {
        let state = self.states.current();
        let paint = Paint::resolve(&state.stroke_style);
        self.backend.execute(Command::StrokePath {
            path: &self.path,
            paint: &paint,
            stroke: state.stroke_settings(),
            transform: state.transform,
            compositing: compositing(state),
        });
    }

    /// Fills a rectangle without touching the current path.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rect = Rect::from_xywh(x, y, width, height);
        if !rect.is_finite() {
            log::trace!("ignoring fill_rect({:?})", rect);
            return;
        }
        let path = Path::from_rect(rect);
        self.fill_path(&path);
    }

    /// Strokes a rectangle without touching the current path.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rect = Rect::from_xywh(x, y, width, height);
        if !rect.is_finite() {
            log::trace!("ignoring stroke_rect({:?})", rect);
            return;
        }
        let path = Path::from_rect(rect);
        let state = self.states.current();
        let paint = Paint::resolve(&state.stroke_style);
        self.backend.execute(Command::StrokePath {
            path: &path,
            paint: &paint,
            stroke: state.stroke_settings(),
            transform: state.transform,
            compositing: compositing(state),
        });
    }

    /// Fills `text` with its alphabetic baseline starting at `(x, y)`.
    ///
    /// If `max_width` is given and the text is wider, it is compressed
    /// horizontally to fit. Nothing is drawn without a font, or
    /// if `max_width` is not positive.
    #[cfg(feature = "text")]
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>) {
        if !(x.is_finite() && y.is_finite()) {
            log::trace!("ignoring fill_text at ({}, {})", x, y);
            return;
        }
        let state = self.states.current();
        let font = match &state.font {
            Some(font) => font,
            None => {
                log::trace!("fill_text({:?}) without a font", text);
                return;
            }
        };

        let natural_width = font.advance_width(text, state.font_size);
        let horizontal_scale = match max_width {
            Some(max) if !(max.is_finite() && max > 0.) => {
                log::trace!("ignoring fill_text with max width {}", max);
                return;
            }
            Some(max) if natural_width > max => max / natural_width,
            _ => 1.,
        };

        let mut path = Path::new();
        font.outline_text(&mut path, text, vec2(x, y), state.font_size, horizontal_scale);
        if !path.is_empty() {
            self.fill_path(&path);
        }
    }

    /// The advance width of `text` under the current font, or
    /// zero if no font is set.
    #[cfg(feature = "text")]
    pub fn measure_text(&self, text: &str) -> f32 {
        let state = self.states.current();
        match &state.font {
            Some(font) => font.advance_width(text, state.font_size),
            None => 0.,
        }
    }

    /// Draws `image` unscaled with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: &dyn ImageSource, x: f32, y: f32) {
        let size = full_source(image).size;
        self.draw_image_region(image, full_source(image), Rect::new(vec2(x, y), size));
    }

    /// Draws the whole of `image` scaled into the given rectangle.
    pub fn draw_image_scaled(
        &mut self,
        image: &dyn ImageSource,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        self.draw_image_region(
            image,
            full_source(image),
            Rect::from_xywh(x, y, width, height),
        );
    }

    /// Draws the `source` region of `image` scaled into `destination`.
    ///
    /// The source region is clipped to the image, and the destination
    /// shrinks in proportion.
    pub fn draw_image_region(&mut self, image: &dyn ImageSource, source: Rect, destination: Rect) {
        let (source, destination) = match clip_source(image, source, destination) {
            Some(rects) => rects,
            None => {
                log::trace!("draw_image with nothing to draw: {:?} -> {:?}", source, destination);
                return;
            }
        };
        let state = self.states.current();
        self.backend.execute(Command::DrawImage {
            image,
            source,
            destination,
            transform: state.transform,
            compositing: compositing(state),
        });
    }

    /// Dispatches on the number of numeric arguments, like the
    /// variadic `drawImage`:
    /// * `[x, y]` draws unscaled;
    /// * `[x, y, width, height]` draws the whole image scaled;
    /// * `[sx, sy, sw, sh, dx, dy, dw, dh]` draws a region.
    pub fn draw_image_with_args(
        &mut self,
        image: &dyn ImageSource,
        args: &[f32],
    ) -> Result<(), InvalidArgument> {
        match *args {
            [x, y] => self.draw_image(image, x, y),
            [x, y, w, h] => self.draw_image_scaled(image, x, y, w, h),
            [sx, sy, sw, sh, dx, dy, dw, dh] => self.draw_image_region(
                image,
                Rect::from_xywh(sx, sy, sw, sh),
                Rect::from_xywh(dx, dy, dw, dh),
            ),
            _ => return Err(InvalidArgument(args.len())),
        }
        Ok(())
    }

    fn fill_path(&mut self, path: &Path) {
        let state = self.states.current();
        let paint = Paint::resolve(&state.fill_style);
        self.backend.execute(Command::FillPath {
            path,
            paint: &paint,
            fill_rule: FillRule::NonZero,
            transform: state.transform,
            compositing: compositing(state),
        });
    }
}

fn compositing(state: &RenderState) -> Compositing {
    Compositing {
        global_alpha: state.global_alpha,
        operation: state.composite_operation,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::{path::Segment, Bitmap, PathSegment, Recorded, RecordingBackend, StrokeSettings};

    use super::*;

    fn context() -> DrawingContext {
        DrawingContext::new(
            Box::new(RecordingBackend::new()),
            &ContextConfig::default(),
        )
    }

    fn recorded(context: &mut DrawingContext) -> Vec<Recorded> {
        context
            .backend_as_mut::<RecordingBackend>()
            .unwrap()
            .take_commands()
    }

    #[test]
    fn defaults() {
        let mut cx = context();
        assert_eq!(cx.coord_width(), 300);
        assert_eq!(cx.coord_height(), 150);
        assert_eq!(cx.line_width(), 1.);
        assert_eq!(cx.line_cap(), LineCap::Butt);
        assert_eq!(cx.line_join(), LineJoin::Miter);
        assert_eq!(cx.miter_limit(), 10.);
        assert_eq!(cx.global_alpha(), 1.);
        assert_eq!(cx.global_composite_operation(), CompositeOperation::SourceOver);
        assert_eq!(cx.fill_style(), &Style::Solid(Color::BLACK));
        assert_eq!(cx.stroke_style(), &Style::Solid(Color::BLACK));
        assert_eq!(cx.current_transform(), Affine2::IDENTITY);
        assert_eq!(
            recorded(&mut cx),
            vec![Recorded::Resize {
                width: 300,
                height: 150
            }]
        );
    }

    #[test]
    fn fill_then_stroke_share_the_path() {
        let mut cx = context();
        recorded(&mut cx);
        cx.rect(0., 0., 10., 10.);
        cx.fill();
        cx.stroke();

        let commands = recorded(&mut cx);
        assert_eq!(commands.len(), 2);
        let expected = Path::from_rect(Rect::from_xywh(0., 0., 10., 10.));
        match (&commands[0], &commands[1]) {
            (Recorded::Fill { path: fill, .. }, Recorded::Stroke { path: stroke, .. }) => {
                assert_eq!(fill, &expected);
                assert_eq!(stroke, &expected);
                assert_eq!(fill.subpaths().len(), 1);
            }
            other => panic!("unexpected commands {:?}", other),
        }
        assert_eq!(cx.current_path(), &expected);
    }

    #[test]
    fn rect_helpers_leave_path_alone() {
        let mut cx = context();
        cx.move_to(1., 1.);
        cx.line_to(2., 2.);
        let before = cx.current_path().clone();

        cx.fill_rect(0., 0., 5., 5.);
        cx.stroke_rect(0., 0., 5., 5.);
        assert_eq!(cx.current_path(), &before);
    }

    #[test]
    fn path_survives_save_restore() {
        let mut cx = context();
        cx.save_context();
        cx.move_to(0., 0.);
        cx.line_to(5., 5.);
        cx.restore_context();
        assert_eq!(cx.current_path().subpaths().len(), 1);

        cx.begin_path();
        assert!(cx.current_path().is_empty());
    }

    #[test]
    fn curves_and_close_build_the_current_path() {
        let mut cx = context();
        // Curves need a pen
        cx.quadratic_curve_to(1., 1., 2., 2.);
        assert!(cx.current_path().is_empty());

        cx.move_to(0., 0.);
        cx.quadratic_curve_to(5., 0., 5., 5.);
        cx.cubic_curve_to(5., 10., 0., 10., 0., 5.);
        cx.close_path();

        let subpaths = cx.current_path().subpaths();
        assert_eq!(subpaths.len(), 1);
        assert!(subpaths[0].is_closed());
        assert_eq!(
            subpaths[0].segments(),
            &[
                Segment::Quad {
                    control: vec2(5., 0.),
                    end: vec2(5., 5.),
                },
                Segment::Cubic {
                    control1: vec2(5., 10.),
                    control2: vec2(0., 10.),
                    end: vec2(0., 5.),
                },
                Segment::Close,
            ]
        );
    }

    #[test]
    fn line_settings_reach_the_stroke() {
        let mut cx = context();
        cx.set_line_cap(LineCap::Square);
        cx.set_line_join(LineJoin::Bevel);
        cx.set_line_width(3.);
        cx.set_miter_limit(2.);
        recorded(&mut cx);
        cx.stroke_rect(0., 0., 4., 4.);

        match recorded(&mut cx).pop() {
            Some(Recorded::Stroke { stroke, .. }) => assert_eq!(
                stroke,
                StrokeSettings {
                    width: 3.,
                    line_cap: LineCap::Square,
                    line_join: LineJoin::Bevel,
                    miter_limit: 2.,
                }
            ),
            other => panic!("expected a stroke, got {:?}", other),
        }
    }

    #[test]
    fn draw_uses_state_at_call_time() {
        let mut cx = context();
        cx.translate(5., 0.);
        cx.set_global_alpha(0.5);
        cx.set_global_composite_operation(CompositeOperation::DestinationOver);
        cx.set_fill_style(Color::RED);
        recorded(&mut cx);
        cx.fill_rect(0., 0., 1., 1.);

        match &recorded(&mut cx)[0] {
            Recorded::Fill {
                paint,
                transform,
                compositing,
                fill_rule,
                ..
            } => {
                assert_eq!(paint, &Paint::Solid(Color::RED));
                assert_eq!(*transform, Affine2::from_translation(vec2(5., 0.)));
                assert_eq!(compositing.global_alpha, 0.5);
                assert_eq!(compositing.operation, CompositeOperation::DestinationOver);
                assert_eq!(*fill_rule, FillRule::NonZero);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn gradient_stops_resolve_at_draw_time() {
        let mut cx = context();
        let gradient = cx.create_linear_gradient(0., 0., 10., 0.);
        cx.set_fill_style(gradient.clone());
        gradient.add_color_stop(0., Color::RED);
        gradient.add_color_stop(1., Color::BLUE);
        recorded(&mut cx);

        cx.fill_rect(0., 0., 10., 10.);
        match &recorded(&mut cx)[0] {
            Recorded::Fill { paint, .. } => {
                assert_eq!(paint.sample(vec2(5., 0.)), Color::rgb(128, 0, 128))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn invalid_setter_values_are_ignored() {
        let mut cx = context();
        cx.set_line_width(0.);
        cx.set_line_width(-2.);
        cx.set_line_width(f32::NAN);
        cx.set_miter_limit(f32::INFINITY);
        cx.set_global_alpha(1.5);
        cx.set_global_alpha(f32::NAN);
        cx.set_global_composite_operation_name("plus-darker");
        assert_eq!(cx.render_state(), &RenderState::default());

        cx.set_global_composite_operation_name("xor");
        assert_eq!(cx.global_composite_operation(), CompositeOperation::Xor);
    }

    #[test]
    fn coord_size_always_clears() {
        let mut cx = context();
        recorded(&mut cx);
        cx.set_coord_width(300);
        cx.set_coord_height(50);
        assert_eq!(cx.coord_height(), 50);
        assert_eq!(
            recorded(&mut cx),
            vec![
                Recorded::Resize {
                    width: 300,
                    height: 150
                },
                Recorded::Resize {
                    width: 300,
                    height: 50
                },
            ]
        );
    }

    #[test]
    fn draw_image_argument_counts() {
        let mut cx = context();
        let image = Bitmap::new(4, 2, Color::WHITE);
        recorded(&mut cx);

        cx.draw_image_with_args(&image, &[1., 2.]).unwrap();
        cx.draw_image_with_args(&image, &[0., 0., 8., 4.]).unwrap();
        cx.draw_image_with_args(&image, &[0., 0., 2., 2., 0., 0., 1., 1.])
            .unwrap();
        assert_eq!(
            cx.draw_image_with_args(&image, &[1., 2., 3.]),
            Err(InvalidArgument(3))
        );
        assert_eq!(
            cx.draw_image_with_args(&image, &[0.; 9]),
            Err(InvalidArgument(9))
        );

        let rects: Vec<_> = recorded(&mut cx)
            .into_iter()
            .map(|command| match command {
                Recorded::Image {
                    source,
                    destination,
                    image_size,
                    ..
                } => {
                    assert_eq!(image_size, (4, 2));
                    (source, destination)
                }
                other => panic!("unexpected command {:?}", other),
            })
            .collect();
        assert_eq!(
            rects,
            vec![
                (Rect::from_xywh(0., 0., 4., 2.), Rect::from_xywh(1., 2., 4., 2.)),
                (Rect::from_xywh(0., 0., 4., 2.), Rect::from_xywh(0., 0., 8., 4.)),
                (Rect::from_xywh(0., 0., 2., 2.), Rect::from_xywh(0., 0., 1., 1.)),
            ]
        );
    }

    #[cfg(feature = "text")]
    #[test]
    fn text_without_font_draws_nothing() {
        let mut cx = context();
        recorded(&mut cx);
        cx.fill_text("hello", 0., 10., None);
        assert!(recorded(&mut cx).is_empty());
        assert_eq!(cx.measure_text("hello"), 0.);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut cx = context();
        cx.save_context();
        cx.rotate(1.);
        cx.set_line_width(3.);
        cx.move_to(0., 0.);
        cx.reset();

        assert_eq!(cx.render_state(), &RenderState::default());
        assert!(cx.current_path().is_empty());
        cx.restore_context();
        assert_eq!(cx.render_state(), &RenderState::default());
    }

    #[test]
    fn invalid_defaults_fall_back() {
        let config = ContextConfig {
            defaults: RenderDefaults {
                global_alpha: 2.5,
                line_width: -3.,
                miter_limit: 0.,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut cx = DrawingContext::new(Box::new(RecordingBackend::new()), &config);
        assert_eq!(cx.global_alpha(), 1.);
        assert_eq!(cx.line_width(), 1.);
        assert_eq!(cx.miter_limit(), 10.);

        cx.set_line_width(4.);
        cx.reset();
        assert_eq!(cx.line_width(), 1.);
    }

    #[cfg(feature = "text")]
    fn square_font() -> Font {
        // One glyph, 'A': a 500x700 unit square with a 600 unit advance.
        Font::from_data(include_bytes!("../tests/fonts/square.ttf").to_vec()).unwrap()
    }

    #[cfg(feature = "text")]
    fn outline_bounds(path: &Path) -> (Vec2, Vec2) {
        path.segments().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), segment| match segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => (min.min(p), max.max(p)),
                _ => (min, max),
            },
        )
    }

    #[cfg(feature = "text")]
    fn filled_text(cx: &mut DrawingContext, max_width: Option<f32>) -> Option<Path> {
        recorded(cx);
        cx.fill_text("AA", 5., 20., max_width);
        match recorded(cx).pop() {
            Some(Recorded::Fill { path, .. }) => Some(path),
            _ => None,
        }
    }

    #[cfg(feature = "text")]
    fn assert_near(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-3,
            "{:?} is not near {:?}",
            actual,
            expected
        );
    }

    #[cfg(feature = "text")]
    #[test]
    fn text_sits_on_baseline() {
        let mut cx = context();
        cx.set_font(square_font());
        assert!((cx.measure_text("AA") - 12.).abs() < 1e-4);

        let path = filled_text(&mut cx, None).unwrap();
        assert_eq!(path.subpaths().len(), 2);
        let (min, max) = outline_bounds(&path);
        assert_near(min, vec2(5., 13.));
        assert_near(max, vec2(16., 20.));

        // Wide enough: drawn at natural width
        let path = filled_text(&mut cx, Some(100.)).unwrap();
        assert_near(outline_bounds(&path).1, vec2(16., 20.));
    }

    #[cfg(feature = "text")]
    #[test]
    fn text_compresses_to_max_width() {
        let mut cx = context();
        cx.set_font(square_font());

        let path = filled_text(&mut cx, Some(6.)).unwrap();
        let (min, max) = outline_bounds(&path);
        assert_near(min, vec2(5., 13.));
        // Advances shrink with the glyphs: 3 + 2.5
        assert_near(max, vec2(10.5, 20.));
        assert!(max.x <= 5. + 6.);

        assert!(filled_text(&mut cx, Some(0.)).is_none());
        assert!(filled_text(&mut cx, Some(-1.)).is_none());
        assert!(filled_text(&mut cx, Some(f32::NAN)).is_none());
    }

    #[cfg(feature = "text")]
    #[test]
    fn text_uses_font_size() {
        let mut cx = context();
        cx.set_font(square_font());
        cx.set_font_size(100.);
        assert!((cx.measure_text("A") - 60.).abs() < 1e-3);
        let (min, max) = outline_bounds(&filled_text(&mut cx, None).unwrap());
        assert_near(min, vec2(5., -50.));
        assert_near(max, vec2(115., 20.));
    }
}
