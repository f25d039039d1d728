//! Fill and stroke styles, and their resolution into paint.

use glam::Vec2;

use crate::{Color, Gradient, GradientKind, GradientStop};

/// A fill or stroke style as assigned to a context.
#[derive(Clone, Debug, PartialEq)]
pub enum Style {
    Solid(Color),
    /// Referenced, not copied: stops added later still
    /// apply to subsequent draws.
    Gradient(Gradient),
}

impl Default for Style {
    fn default() -> Self {
        Style::Solid(Color::BLACK)
    }
}

impl From<Color> for Style {
    fn from(color: Color) -> Self {
        Style::Solid(color)
    }
}

impl From<Gradient> for Style {
    fn from(gradient: Gradient) -> Self {
        Style::Gradient(gradient)
    }
}

/// A style resolved at draw time into a function from
/// points to colors.
///
/// Points are in the coordinate space the gradient was defined in,
/// i.e. before the current transform.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear {
        start: Vec2,
        end: Vec2,
        stops: Vec<GradientStop>,
    },
    Radial {
        start_center: Vec2,
        start_radius: f32,
        end_center: Vec2,
        end_radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Snapshots `style`.
    ///
    /// Gradients that cannot vary collapse to a solid color:
    /// * no stops gives transparent paint;
    /// * a single stop gives that stop's color;
    /// * a zero-length axis, or two identical circles, gives the color
    ///   of the last stop;
    /// * invalid geometry (non-finite, negative radius) gives transparent paint.
    pub fn resolve(style: &Style) -> Self {
        let gradient = match style {
            Style::Solid(color) => return Paint::Solid(*color),
            Style::Gradient(gradient) => gradient,
        };

        let (kind, stops) = gradient.snapshot();
        let last = match stops.last() {
            Some(stop) => stop.color,
            None => return Paint::Solid(Color::TRANSPARENT),
        };
        if !kind.is_valid() {
            log::trace!("gradient {:?} is not paintable", kind);
            return Paint::Solid(Color::TRANSPARENT);
        }
        if stops.len() == 1 {
            return Paint::Solid(last);
        }

        match kind {
            GradientKind::Linear { start, end } => {
                if start == end {
                    Paint::Solid(last)
                } else {
                    Paint::Linear { start, end, stops }
                }
            }
            GradientKind::Radial {
                start_center,
                start_radius,
                end_center,
                end_radius,
            } => {
                if start_center == end_center && start_radius == end_radius {
                    Paint::Solid(last)
                } else {
                    Paint::Radial {
                        start_center,
                        start_radius,
                        end_center,
                        end_radius,
                        stops,
                    }
                }
            }
        }
    }

    /// The color if this paint is the same everywhere.
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Paint::Solid(color) => Some(*color),
            _ => None,
        }
    }

    /// Evaluates the paint at a point.
    pub fn sample(&self, point: Vec2) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear { start, end, stops } => {
                let axis = *end - *start;
                let t = (point - *start).dot(axis) / axis.length_squared();
                color_at(stops, t)
            }
            Paint::Radial {
                start_center,
                start_radius,
                end_center,
                end_radius,
                stops,
            } => match radial_parameter(
                point,
                *start_center,
                *start_radius,
                *end_center,
                *end_radius,
            ) {
                Some(t) => color_at(stops, t),
                None => Color::TRANSPARENT,
            },
        }
    }
}

/// Interpolates the stops at `t`, padding beyond both ends.
fn color_at(stops: &[GradientStop], t: f32) -> Color {
    let t = if t.is_nan() { 0. } else { t.clamp(0., 1.) };
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Color::TRANSPARENT,
    };
    if t < first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t < b.offset {
            let local = (t - a.offset) / (b.offset - a.offset);
            return a.color.lerp(b.color, local);
        }
    }
    last.color
}

/// Finds the largest `t` such that `point` lies on the circle
/// interpolated between the two circles, with a non-negative
/// radius. Returns `None` where the gradient is undefined.
fn radial_parameter(
    point: Vec2,
    start_center: Vec2,
    start_radius: f32,
    end_center: Vec2,
    end_radius: f32,
) -> Option<f32> {
    let cd = end_center - start_center;
    let pd = point - start_center;
    let dr = end_radius - start_radius;

    let a = cd.dot(cd) - dr * dr;
    let b = pd.dot(cd) + start_radius * dr;
    let c = pd.dot(pd) - start_radius * start_radius;

    let radius_at = |t: f32| start_radius + t * dr;

    if a.abs() < 1e-6 {
        if b == 0. {
            return None;
        }
        let t = c / (2. * b);
        return (radius_at(t) >= 0.).then(|| t);
    }

    let discriminant = b * b - a * c;
    if discriminant < 0. {
        return None;
    }
    let root = discriminant.sqrt();
    let (t0, t1) = ((b + root) / a, (b - root) / a);
    let (high, low) = if t0 > t1 { (t0, t1) } else { (t1, t0) };
    if radius_at(high) >= 0. {
        Some(high)
    } else if radius_at(low) >= 0. {
        Some(low)
    } else {
        None
    }
}
