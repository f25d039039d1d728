use glam::{vec2, Affine2, Mat2, Vec2};

use crate::{CompositeOperation, LineCap, LineJoin, RenderDefaults, StrokeSettings, Style};

#[cfg(feature = "text")]
use crate::Font;

/// Everything captured by `save_context` and
/// reinstated by `restore_context`.
///
/// The current path is deliberately not part of it.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub transform: Affine2,
    pub fill_style: Style,
    pub stroke_style: Style,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub global_alpha: f32,
    pub composite_operation: CompositeOperation,
    #[cfg(feature = "text")]
    pub font: Option<Font>,
    #[cfg(feature = "text")]
    pub font_size: f32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::from_defaults(&RenderDefaults::default())
    }
}

impl RenderState {
    pub fn from_defaults(defaults: &RenderDefaults) -> Self {
        Self {
            transform: Affine2::IDENTITY,
            fill_style: Style::Solid(defaults.fill_color),
            stroke_style: Style::Solid(defaults.stroke_color),
            line_width: defaults.line_width,
            line_cap: defaults.line_cap,
            line_join: defaults.line_join,
            miter_limit: defaults.miter_limit,
            global_alpha: defaults.global_alpha,
            composite_operation: defaults.composite_operation,
            #[cfg(feature = "text")]
            font: None,
            #[cfg(feature = "text")]
            font_size: defaults.font_size,
        }
    }

    pub fn stroke_settings(&self) -> StrokeSettings {
        StrokeSettings {
            width: self.line_width,
            line_cap: self.line_cap,
            line_join: self.line_join,
            miter_limit: self.miter_limit,
        }
    }
}

/// The active [`RenderState`] plus a LIFO stack of saved copies.
///
/// Transform operations compose with the current transform: the new
/// operation applies to coordinates first, before everything set up
/// earlier.
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    stack: Vec<RenderState>,
    state: RenderState,
}

impl StateStack {
    pub fn new(initial: RenderState) -> Self {
        Self {
            stack: Vec::new(),
            state: initial,
        }
    }

    pub fn current(&self) -> &RenderState {
        &self.state
    }

    pub fn current_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pushes a copy of the current state.
    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pops the last saved state and makes it current.
    ///
    /// Does nothing if no state is saved.
    pub fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => log::trace!("restore_context() with an empty state stack"),
        }
    }

    /// Drops every saved state and resets the current
    /// state to `initial`.
    pub fn reset(&mut self, initial: RenderState) {
        self.stack.clear();
        self.state = initial;
    }

    pub fn transform(&self) -> Affine2 {
        self.state.transform
    }

    pub fn scale(&mut self, scale: Vec2) {
        if !scale.is_finite() {
            log::trace!("ignoring scale({})", scale);
            return;
        }
        self.concat(Affine2::from_scale(scale));
    }

    /// Rotates by `angle` radians, clockwise on screen.
    pub fn rotate(&mut self, angle: f32) {
        if !angle.is_finite() {
            log::trace!("ignoring rotate({})", angle);
            return;
        }
        self.concat(Affine2::from_angle(angle));
    }

    pub fn translate(&mut self, translation: Vec2) {
        if !translation.is_finite() {
            log::trace!("ignoring translate({})", translation);
            return;
        }
        self.concat(Affine2::from_translation(translation));
    }

    /// Multiplies the current transform by the matrix
    ///
    /// ```text
    /// | m11 m21 dx |
    /// | m12 m22 dy |
    /// |  0   0   1 |
    /// ```
    pub fn transform_by(&mut self, m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) {
        let matrix = Affine2::from_mat2_translation(
            Mat2::from_cols(vec2(m11, m12), vec2(m21, m22)),
            vec2(dx, dy),
        );
        if !matrix.is_finite() {
            log::trace!("ignoring transform({:?})", matrix);
            return;
        }
        self.concat(matrix);
    }

    /// Replaces the current transform.
    pub fn set_transform(&mut self, transform: Affine2) {
        if !transform.is_finite() {
            log::trace!("ignoring set_transform({:?})", transform);
            return;
        }
        self.state.transform = transform;
    }

    fn concat(&mut self, matrix: Affine2) {
        self.state.transform = self.state.transform * matrix;
    }
}
