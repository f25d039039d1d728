use glam::{vec2, Affine2, Vec2};

/// A rectangle in coordinate space.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Rect {
    /// The position of the top-left corner
    /// of this rectangle.
    pub pos: Vec2,
    /// The side lengths of this rectangle.
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(vec2(x, y), vec2(width, height))
    }

    pub fn min(self) -> Vec2 {
        self.pos
    }

    pub fn max(self) -> Vec2 {
        self.pos + self.size
    }

    pub fn is_finite(self) -> bool {
        self.pos.is_finite() && self.size.is_finite()
    }

    /// True if either side length is zero.
    pub fn is_empty(self) -> bool {
        self.size.x == 0. || self.size.y == 0.
    }

    /// Flips negative side lengths so that `pos` is the top-left corner.
    pub fn normalized(self) -> Self {
        let min = self.pos.min(self.pos + self.size);
        let max = self.pos.max(self.pos + self.size);
        Self {
            pos: min,
            size: max - min,
        }
    }

    /// Intersection of two normalized rectangles, or `None`
    /// if they do not overlap.
    pub fn intersection(self, other: Rect) -> Option<Rect> {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        if max.x > min.x && max.y > min.y {
            Some(Rect {
                pos: min,
                size: max - min,
            })
        } else {
            None
        }
    }

    /// The corners in drawing order, starting at the top-left.
    pub fn corners(self) -> [Vec2; 4] {
        [
            self.pos,
            self.pos + vec2(self.size.x, 0.),
            self.pos + self.size,
            self.pos + vec2(0., self.size.y),
        ]
    }

    pub fn bbox_transformed(self, transform: Affine2) -> Self {
        let points = self.corners().map(|p| transform.transform_point2(p));

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(-f32::INFINITY);
        for point in points {
            min = min.min(point);
            max = max.max(point);
        }

        Self {
            pos: min,
            size: max - min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_negative_size() {
        let rect = Rect::from_xywh(10., 10., -4., 6.).normalized();
        assert_eq!(rect, Rect::from_xywh(6., 10., 4., 6.));
    }

    #[test]
    fn intersection() {
        let a = Rect::from_xywh(0., 0., 10., 10.);
        let b = Rect::from_xywh(5., -5., 10., 10.);
        assert_eq!(a.intersection(b), Some(Rect::from_xywh(5., 0., 5., 5.)));
        assert_eq!(a.intersection(Rect::from_xywh(20., 20., 1., 1.)), None);
    }

    #[test]
    fn rotated_bbox() {
        let rect = Rect::from_xywh(0., 0., 2., 1.);
        let bbox = rect.bbox_transformed(Affine2::from_angle(std::f32::consts::FRAC_PI_2));
        assert!((bbox.size - vec2(1., 2.)).length() < 1e-5);
    }
}
