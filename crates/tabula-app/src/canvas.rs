use std::ops::{Deref, DerefMut};

use tabula::{
    glam::{vec2, Vec2},
    pack_argb, Color, CompositeOperation, DrawingContext, Font, ImageSource,
};

use crate::{create_backend, BackendType, CanvasConfig, Error};

/// A drawing surface sized independently in coordinate units and
/// display pixels.
///
/// Derefs to the [`DrawingContext`] that draws on it.
pub struct Canvas {
    context: DrawingContext,
    backend_type: BackendType,
    pixel_width: u32,
    pixel_height: u32,
    background: Color,
}

impl Canvas {
    pub fn new(config: &CanvasConfig) -> Self {
        let backend = create_backend(config.backend);
        Self {
            context: DrawingContext::new(backend, &config.context_config()),
            backend_type: config.backend,
            pixel_width: config.pixel_width,
            pixel_height: config.pixel_height,
            background: config.background,
        }
    }

    pub fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    pub fn context(&self) -> &DrawingContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut DrawingContext {
        &mut self.context
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    /// Sets the display width. Content is kept and scaled to fit.
    pub fn set_pixel_width(&mut self, width: u32) {
        self.pixel_width = width;
    }

    /// Sets the display height. Content is kept and scaled to fit.
    pub fn set_pixel_height(&mut self, height: u32) {
        self.pixel_height = height;
    }

    /// Sets the coordinate and pixel sizes together, clearing the surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("resizing canvas to {}x{}", width, height);
        self.context.set_coord_size(width, height);
        self.pixel_width = width;
        self.pixel_height = height;
    }

    /// Display pixels per coordinate unit on each axis.
    pub fn display_scale(&self) -> Vec2 {
        let coord = vec2(
            self.context.coord_width() as f32,
            self.context.coord_height() as f32,
        );
        let pixels = vec2(self.pixel_width as f32, self.pixel_height as f32);
        if coord.x == 0. || coord.y == 0. {
            Vec2::ZERO
        } else {
            pixels / coord
        }
    }

    pub fn background_color(&self) -> Color {
        self.background
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    /// Parses and sets the background color.
    pub fn set_background_color_str(&mut self, color: &str) -> Result<(), Error> {
        self.background = color.parse()?;
        Ok(())
    }

    /// The surface composited over the background color, as
    /// unpremultiplied `0xAARRGGBB` in coordinate-space resolution.
    pub fn to_argb(&self) -> Vec<u32> {
        let background = self.background.to_premultiplied();
        self.context
            .to_argb()
            .into_iter()
            .map(|pixel| {
                let [a, r, g, b] = pixel.to_be_bytes();
                let content = Color::rgba(r, g, b, a).to_premultiplied();
                let blended = CompositeOperation::SourceOver.blend(content, background);
                pack_argb(Color::from_premultiplied(blended))
            })
            .collect()
    }

    /// Draws an image with the argument shapes of `drawImage`:
    /// `[x, y]`, `[x, y, width, height]`, or
    /// `[sx, sy, sw, sh, dx, dy, dw, dh]`.
    pub fn draw_image_from_args(
        &mut self,
        image: &dyn ImageSource,
        args: &[f32],
    ) -> Result<(), Error> {
        self.context.draw_image_with_args(image, args)?;
        Ok(())
    }

    /// Parses font data and makes it the current font.
    pub fn load_font(&mut self, data: Vec<u8>) -> Result<Font, Error> {
        let font = Font::from_data(data)?;
        log::debug!("loaded font");
        self.context.set_font(font.clone());
        Ok(font)
    }
}

impl Deref for Canvas {
    type Target = DrawingContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl DerefMut for Canvas {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.context
    }
}

#[cfg(test)]
mod tests {
    use tabula::{Recorded, RecordingBackend};

    use super::*;

    fn recording_canvas() -> Canvas {
        Canvas::new(&CanvasConfig {
            backend: BackendType::Recording,
            ..Default::default()
        })
    }

    fn recorded(canvas: &Canvas) -> Vec<Recorded> {
        canvas
            .backend_as::<RecordingBackend>()
            .map(|b| b.commands().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn pixel_size_does_not_touch_surface() {
        let mut canvas = recording_canvas();
        let before = recorded(&canvas).len();
        canvas.set_pixel_width(600);
        canvas.set_pixel_height(75);
        assert_eq!(recorded(&canvas).len(), before);
        assert_eq!(canvas.display_scale(), vec2(2., 0.5));
    }

    #[test]
    fn resize_sets_both_sizes() {
        let mut canvas = recording_canvas();
        canvas.resize(64, 32);
        assert_eq!((canvas.coord_width(), canvas.coord_height()), (64, 32));
        assert_eq!((canvas.pixel_width(), canvas.pixel_height()), (64, 32));
        assert_eq!(
            recorded(&canvas).last(),
            Some(&Recorded::Resize {
                width: 64,
                height: 32
            })
        );
    }

    #[test]
    fn zero_coord_size_has_no_scale() {
        let mut canvas = recording_canvas();
        canvas.set_coord_width(0);
        assert_eq!(canvas.display_scale(), Vec2::ZERO);
    }

    #[test]
    fn background_shows_through_empty_surface() {
        let mut canvas = recording_canvas();
        canvas.resize(2, 2);
        canvas.set_background_color_str("#336699").unwrap();
        assert_eq!(canvas.to_argb(), vec![0xff336699; 4]);
        assert!(canvas.set_background_color_str("nope").is_err());
        assert_eq!(canvas.background_color(), Color::rgb(0x33, 0x66, 0x99));
    }

    #[test]
    fn context_accessors_share_the_backend() {
        let mut canvas = recording_canvas();
        canvas.set_background_color(Color::RED);
        canvas.context_mut().fill_rect(0., 0., 1., 1.);
        let backend = canvas.context_mut().backend_mut();
        assert_eq!(backend.size(), (300, 150));
        assert!(matches!(
            recorded(&canvas).last(),
            Some(Recorded::Fill { .. })
        ));
        assert_eq!(canvas.to_argb()[0], 0xffff0000);
    }

    #[test]
    fn rejects_garbage_font() {
        let mut canvas = recording_canvas();
        assert!(matches!(
            canvas.load_font(vec![1, 2, 3]),
            Err(Error::Font(_))
        ));
        assert!(canvas.font().is_none());
    }
}
