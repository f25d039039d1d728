use serde::{Deserialize, Serialize};

use crate::{Color, CompositeOperation, LineCap, LineJoin};

/// The initial render state of a context, restored by
/// [`DrawingContext::reset`](crate::DrawingContext::reset).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderDefaults {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub global_alpha: f32,
    pub composite_operation: CompositeOperation,
    /// Font size in coordinate units.
    pub font_size: f32,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: 1.,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.,
            global_alpha: 1.,
            composite_operation: CompositeOperation::SourceOver,
            font_size: 10.,
        }
    }
}

impl RenderDefaults {
    /// Replaces values that the context setters would reject
    /// with the standard defaults.
    pub fn sanitized(self) -> Self {
        let standard = Self::default();
        let mut defaults = self;
        if !is_valid_length(defaults.line_width) {
            log::trace!("ignoring default line width {}", defaults.line_width);
            defaults.line_width = standard.line_width;
        }
        if !is_valid_length(defaults.miter_limit) {
            log::trace!("ignoring default miter limit {}", defaults.miter_limit);
            defaults.miter_limit = standard.miter_limit;
        }
        if !is_valid_alpha(defaults.global_alpha) {
            log::trace!("ignoring default global alpha {}", defaults.global_alpha);
            defaults.global_alpha = standard.global_alpha;
        }
        if !is_valid_length(defaults.font_size) {
            log::trace!("ignoring default font size {}", defaults.font_size);
            defaults.font_size = standard.font_size;
        }
        defaults
    }
}

/// Line widths, miter limits and font sizes must be finite and positive.
pub(crate) fn is_valid_length(value: f32) -> bool {
    value.is_finite() && value > 0.
}

pub(crate) fn is_valid_alpha(alpha: f32) -> bool {
    (0.0..=1.0).contains(&alpha)
}

/// Explicit configuration for a [`DrawingContext`](crate::DrawingContext).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContextConfig {
    /// Width of the coordinate space
    pub coord_width: u32,
    /// Height of the coordinate space
    pub coord_height: u32,
    pub defaults: RenderDefaults,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            coord_width: 300,
            coord_height: 150,
            defaults: RenderDefaults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_replaces_rejected_values() {
        let defaults = RenderDefaults {
            line_width: -3.,
            miter_limit: f32::NAN,
            global_alpha: 2.5,
            font_size: 0.,
            line_cap: LineCap::Round,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(defaults.line_width, 1.);
        assert_eq!(defaults.miter_limit, 10.);
        assert_eq!(defaults.global_alpha, 1.);
        assert_eq!(defaults.font_size, 10.);
        assert_eq!(defaults.line_cap, LineCap::Round);
    }

    #[test]
    fn sanitized_keeps_valid_values() {
        let defaults = RenderDefaults {
            line_width: 0.25,
            miter_limit: 1.,
            global_alpha: 0.,
            ..Default::default()
        };
        assert_eq!(defaults.sanitized(), defaults);
    }
}
