use std::sync::Arc;

use glam::Vec2;
use parking_lot::RwLock;

use crate::Color;

/// A point along a gradient where the color is known.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientStop {
    /// In `[0, 1]`
    pub offset: f32,
    pub color: Color,
}

/// The geometry of a gradient, in the coordinate space
/// of the context at draw time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GradientKind {
    Linear {
        start: Vec2,
        end: Vec2,
    },
    /// Interpolates between two circles.
    Radial {
        start_center: Vec2,
        start_radius: f32,
        end_center: Vec2,
        end_radius: f32,
    },
}

impl GradientKind {
    /// Whether the geometry can be painted at all.
    pub fn is_valid(&self) -> bool {
        match *self {
            GradientKind::Linear { start, end } => start.is_finite() && end.is_finite(),
            GradientKind::Radial {
                start_center,
                start_radius,
                end_center,
                end_radius,
            } => {
                start_center.is_finite()
                    && end_center.is_finite()
                    && start_radius.is_finite()
                    && end_radius.is_finite()
                    && start_radius >= 0.
                    && end_radius >= 0.
            }
        }
    }
}

#[derive(Debug)]
struct GradientData {
    kind: GradientKind,
    // Sorted by offset; equal offsets keep insertion order.
    stops: Vec<GradientStop>,
}

/// A shared handle to a gradient.
///
/// Cloning the handle does not copy the gradient: color stops added
/// through any clone are visible to every style that references it.
/// Contexts read the stops when a draw call resolves its paint.
#[derive(Clone, Debug)]
pub struct Gradient(Arc<RwLock<GradientData>>);

impl Gradient {
    pub fn new(kind: GradientKind) -> Self {
        Self(Arc::new(RwLock::new(GradientData {
            kind,
            stops: Vec::new(),
        })))
    }

    pub fn linear(start: Vec2, end: Vec2) -> Self {
        Self::new(GradientKind::Linear { start, end })
    }

    pub fn radial(start_center: Vec2, start_radius: f32, end_center: Vec2, end_radius: f32) -> Self {
        Self::new(GradientKind::Radial {
            start_center,
            start_radius,
            end_center,
            end_radius,
        })
    }

    /// Adds a color stop. Offsets outside `[0, 1]` are ignored.
    pub fn add_color_stop(&self, offset: f32, color: Color) {
        if !(0.0..=1.0).contains(&offset) {
            log::trace!("ignoring color stop at offset {}", offset);
            return;
        }
        let mut data = self.0.write();
        let index = data.stops.partition_point(|stop| stop.offset <= offset);
        data.stops.insert(index, GradientStop { offset, color });
    }

    /// The color stops in offset order.
    pub fn stops(&self) -> Vec<GradientStop> {
        self.0.read().stops.clone()
    }

    /// Reads the geometry and stops under one lock.
    pub(crate) fn snapshot(&self) -> (GradientKind, Vec<GradientStop>) {
        let data = self.0.read();
        (data.kind, data.stops.clone())
    }
}

/// Handles compare equal when they refer to the same gradient.
impl PartialEq for Gradient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    #[test]
    fn stops_are_sorted() {
        let gradient = Gradient::linear(vec2(0., 0.), vec2(1., 0.));
        gradient.add_color_stop(1., Color::BLUE);
        gradient.add_color_stop(0., Color::RED);
        gradient.add_color_stop(0.5, Color::WHITE);
        gradient.add_color_stop(0.5, Color::BLACK);

        let colors: Vec<_> = gradient.stops().iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            vec![Color::RED, Color::WHITE, Color::BLACK, Color::BLUE]
        );
    }

    #[test]
    fn invalid_offsets_are_ignored() {
        let gradient = Gradient::linear(vec2(0., 0.), vec2(1., 0.));
        gradient.add_color_stop(-0.1, Color::RED);
        gradient.add_color_stop(1.5, Color::RED);
        gradient.add_color_stop(f32::NAN, Color::RED);
        assert!(gradient.stops().is_empty());
    }

    #[test]
    fn clones_share_stops() {
        let gradient = Gradient::radial(vec2(0., 0.), 0., vec2(0., 0.), 5.);
        let other = gradient.clone();
        other.add_color_stop(0.25, Color::GREEN);
        assert_eq!(gradient.stops().len(), 1);
        assert_eq!(gradient, other);
        assert_ne!(gradient, Gradient::radial(vec2(0., 0.), 0., vec2(0., 0.), 5.));
    }

    #[test]
    fn radial_validity() {
        assert!(!GradientKind::Radial {
            start_center: vec2(0., 0.),
            start_radius: -1.,
            end_center: vec2(0., 0.),
            end_radius: 1.,
        }
        .is_valid());
        assert!(!GradientKind::Linear {
            start: vec2(f32::NAN, 0.),
            end: vec2(0., 0.),
        }
        .is_valid());
    }
}
