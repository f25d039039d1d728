//! The current path: an ordered list of subpaths built up by
//! path-construction calls and consumed by fills and strokes.
//!
//! # Pen semantics
//! The pen position is the end point of the last segment in the last subpath.
//! * `line_to` on an empty path starts a subpath at the target point without drawing.
//! * Curves on an empty path are ignored, since a curve needs a start point.
//! * After `close`, the next segment starts a new subpath at the start point of
//!   the closed one.
//! * `rect` always appends an independent, closed subpath.
//!
//! Calls with non-finite coordinates leave the path unchanged.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{vec2, Vec2};

use crate::Rect;

/// A flattened path element, as consumed by backends.
///
/// Arcs are converted to cubic Bezier curves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo {
        control: Vec2,
        end: Vec2,
    },
    CubicTo {
        control1: Vec2,
        control2: Vec2,
        end: Vec2,
    },
    Close,
}

/// A segment of a [`Subpath`]. The start of each
/// segment is the end of the previous one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Segment {
    Line(Vec2),
    Quad {
        control: Vec2,
        end: Vec2,
    },
    Cubic {
        control1: Vec2,
        control2: Vec2,
        end: Vec2,
    },
    Arc(ArcSegment),
    /// A straight line back to the start of the subpath.
    Close,
}

/// A circular arc. Positive sweeps run clockwise on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArcSegment {
    pub center: Vec2,
    pub radius: f32,
    pub start_angle: f32,
    pub sweep: f32,
}

impl ArcSegment {
    pub fn point_at(&self, angle: f32) -> Vec2 {
        self.center + self.radius * vec2(angle.cos(), angle.sin())
    }

    pub fn start_point(&self) -> Vec2 {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Vec2 {
        self.point_at(self.start_angle + self.sweep)
    }

    /// Approximates the arc with cubic curves spanning at most 90 degrees each.
    fn to_cubics(self, mut push: impl FnMut(PathSegment)) {
        if self.sweep == 0. || self.radius == 0. {
            return;
        }
        let count = (self.sweep.abs() / FRAC_PI_2).ceil().max(1.) as usize;
        let step = self.sweep / count as f32;
        let k = 4. / 3. * (step / 4.).tan() * self.radius;

        let mut angle = self.start_angle;
        for _ in 0..count {
            let next = angle + step;
            let p0 = self.point_at(angle);
            let p3 = self.point_at(next);
            let tangent0 = vec2(-angle.sin(), angle.cos());
            let tangent1 = vec2(-next.sin(), next.cos());
            push(PathSegment::CubicTo {
                control1: p0 + tangent0 * k,
                control2: p3 - tangent1 * k,
                end: p3,
            });
            angle = next;
        }
    }
}

/// A connected run of segments starting at a single point.
#[derive(Clone, Debug, PartialEq)]
pub struct Subpath {
    start: Vec2,
    segments: Vec<Segment>,
    closed: bool,
}

impl Subpath {
    fn new(start: Vec2) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The pen position after the last segment.
    pub fn end_point(&self) -> Vec2 {
        match self.segments.last() {
            None | Some(Segment::Close) => self.start,
            Some(Segment::Line(p)) => *p,
            Some(Segment::Quad { end, .. }) | Some(Segment::Cubic { end, .. }) => *end,
            Some(Segment::Arc(arc)) => arc.end_point(),
        }
    }

    fn flatten(&self, push: &mut impl FnMut(PathSegment)) {
        push(PathSegment::MoveTo(self.start));
        for segment in &self.segments {
            match *segment {
                Segment::Line(p) => push(PathSegment::LineTo(p)),
                Segment::Quad { control, end } => push(PathSegment::QuadTo { control, end }),
                Segment::Cubic {
                    control1,
                    control2,
                    end,
                } => push(PathSegment::CubicTo {
                    control1,
                    control2,
                    end,
                }),
                Segment::Arc(arc) => arc.to_cubics(&mut *push),
                Segment::Close => push(PathSegment::Close),
            }
        }
    }
}

/// A vector path composed of subpaths.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// A path holding one closed rectangular subpath.
    pub fn from_rect(rect: Rect) -> Self {
        let mut path = Self::new();
        path.rect(rect);
        path
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Discards all subpaths.
    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    /// The pen position, or `None` if the path is empty.
    pub fn current_point(&self) -> Option<Vec2> {
        self.subpaths.last().map(Subpath::end_point)
    }

    /// Starts a new subpath at `point`.
    pub fn move_to(&mut self, point: Vec2) {
        if !point.is_finite() {
            log::trace!("ignoring move_to({})", point);
            return;
        }
        match self.subpaths.last_mut() {
            // A lone starting point contributes nothing; reuse it.
            Some(last) if !last.closed && last.segments.is_empty() => last.start = point,
            _ => self.subpaths.push(Subpath::new(point)),
        }
    }

    /// Adds a straight segment to `point`. On an empty
    /// path this only moves the pen.
    pub fn line_to(&mut self, point: Vec2) {
        if !point.is_finite() {
            log::trace!("ignoring line_to({})", point);
            return;
        }
        match self.open_subpath() {
            Some(subpath) => subpath.segments.push(Segment::Line(point)),
            None => self.move_to(point),
        }
    }

    /// Adds a quadratic Bezier curve. Ignored on an empty path.
    pub fn quad_to(&mut self, control: Vec2, end: Vec2) {
        if !(control.is_finite() && end.is_finite()) {
            log::trace!("ignoring quad_to({}, {})", control, end);
            return;
        }
        if let Some(subpath) = self.open_subpath() {
            subpath.segments.push(Segment::Quad { control, end });
        }
    }

    /// Adds a cubic Bezier curve. Ignored on an empty path.
    pub fn cubic_to(&mut self, control1: Vec2, control2: Vec2, end: Vec2) {
        if !(control1.is_finite() && control2.is_finite() && end.is_finite()) {
            log::trace!("ignoring cubic_to({}, {}, {})", control1, control2, end);
            return;
        }
        if let Some(subpath) = self.open_subpath() {
            subpath.segments.push(Segment::Cubic {
                control1,
                control2,
                end,
            });
        }
    }

    /// Adds a circular arc around `center`.
    ///
    /// Angles are in radians, measured clockwise (on screen) from the positive
    /// X axis. If the path has a pen position, a line joins it to the start of
    /// the arc; otherwise the arc begins a new subpath.
    ///
    /// A sweep of a full turn or more in the drawing direction yields a full circle.
    pub fn arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    ) {
        if !(center.is_finite()
            && radius.is_finite()
            && start_angle.is_finite()
            && end_angle.is_finite())
            || radius < 0.
        {
            log::trace!(
                "ignoring arc({}, {}, {}, {})",
                center,
                radius,
                start_angle,
                end_angle
            );
            return;
        }

        let sweep = arc_sweep(start_angle, end_angle, anticlockwise);
        let arc = ArcSegment {
            center,
            radius,
            start_angle,
            sweep,
        };
        self.connect_to(arc.start_point());
        if sweep != 0. && radius > 0. {
            if let Some(subpath) = self.open_subpath() {
                subpath.segments.push(Segment::Arc(arc));
            }
        }
    }

    /// Adds an arc of the given radius tangent to the line from the pen
    /// position to `corner` and to the line from `corner` to `end`.
    ///
    /// Degenerate configurations produce a straight line to `corner`.
    pub fn arc_to(&mut self, corner: Vec2, end: Vec2, radius: f32) {
        if !(corner.is_finite() && end.is_finite() && radius.is_finite()) || radius < 0. {
            log::trace!("ignoring arc_to({}, {}, {})", corner, end, radius);
            return;
        }
        let start = match self.current_point() {
            Some(p) => p,
            None => {
                self.move_to(corner);
                return;
            }
        };

        let to_start = start - corner;
        let to_end = end - corner;
        let (len_start, len_end) = (to_start.length(), to_end.length());
        if radius == 0. || len_start < f32::EPSILON || len_end < f32::EPSILON {
            self.line_to(corner);
            return;
        }
        let dir_start = to_start / len_start;
        let dir_end = to_end / len_end;

        let cos = dir_start.dot(dir_end).clamp(-1., 1.);
        if 1. - cos.abs() < 1e-6 {
            // Collinear points
            self.line_to(corner);
            return;
        }

        let half_angle = cos.acos() / 2.;
        let distance = radius / half_angle.tan();
        let tangent_start = corner + dir_start * distance;
        let tangent_end = corner + dir_end * distance;

        let mut normal = vec2(-dir_start.y, dir_start.x);
        if normal.dot(dir_end) < 0. {
            normal = -normal;
        }
        let center = tangent_start + normal * radius;

        let start_angle = (tangent_start - center).y.atan2((tangent_start - center).x);
        let end_angle = (tangent_end - center).y.atan2((tangent_end - center).x);
        // The tangent arc is always the minor arc.
        let mut sweep = end_angle - start_angle;
        if sweep > PI {
            sweep -= TAU;
        } else if sweep < -PI {
            sweep += TAU;
        }

        self.line_to(tangent_start);
        if let Some(subpath) = self.open_subpath() {
            subpath.segments.push(Segment::Arc(ArcSegment {
                center,
                radius,
                start_angle,
                sweep,
            }));
        }
    }

    /// Appends a closed rectangular subpath. Does not connect
    /// to prior geometry.
    pub fn rect(&mut self, rect: Rect) {
        if !rect.is_finite() {
            log::trace!("ignoring rect({:?})", rect);
            return;
        }
        let [top_left, top_right, bottom_right, bottom_left] = rect.corners();
        self.subpaths.push(Subpath {
            start: top_left,
            segments: vec![
                Segment::Line(top_right),
                Segment::Line(bottom_right),
                Segment::Line(bottom_left),
                Segment::Close,
            ],
            closed: true,
        });
    }

    /// Closes the last subpath with a line to its start point.
    ///
    /// Does nothing on an empty path or an already closed subpath.
    pub fn close(&mut self) {
        if let Some(last) = self.subpaths.last_mut() {
            if !last.closed {
                last.segments.push(Segment::Close);
                last.closed = true;
            }
        }
    }

    /// Iterates over the flattened elements of every subpath.
    pub fn segments(&self) -> impl Iterator<Item = PathSegment> + '_ {
        self.subpaths.iter().flat_map(|subpath| {
            let mut elements = Vec::with_capacity(subpath.segments.len() + 1);
            subpath.flatten(&mut |element| elements.push(element));
            elements
        })
    }

    /// Moves the pen to `point` with a line, or starts a
    /// subpath there if the path is empty.
    fn connect_to(&mut self, point: Vec2) {
        match self.current_point() {
            Some(current) if current.distance_squared(point) <= f32::EPSILON => {
                // Still need an open subpath to attach to
                self.open_subpath();
            }
            Some(_) => self.line_to(point),
            None => self.move_to(point),
        }
    }

    /// The subpath that new segments extend. A closed subpath
    /// is continued by a new one starting at its start point.
    fn open_subpath(&mut self) -> Option<&mut Subpath> {
        let last = self.subpaths.last()?;
        if last.closed {
            let start = last.start;
            self.subpaths.push(Subpath::new(start));
        }
        self.subpaths.last_mut()
    }
}

/// Computes the signed sweep of a canvas-style arc.
fn arc_sweep(start_angle: f32, end_angle: f32, anticlockwise: bool) -> f32 {
    if anticlockwise {
        let delta = start_angle - end_angle;
        if delta >= TAU {
            -TAU
        } else {
            -delta.rem_euclid(TAU)
        }
    } else {
        let delta = end_angle - start_angle;
        if delta >= TAU {
            TAU
        } else {
            delta.rem_euclid(TAU)
        }
    }
}
