use tabula::{
    glam::{vec2, Affine2},
    Color, Compositing, Vec2,
};
use tiny_skia::{Mask, Pixmap, PremultipliedColorU8};

/// Composites paint into `pixmap` through a coverage mask whose
/// top-left corner sits at pixel `origin`.
///
/// `shade` is evaluated at pixel centers mapped through `inverse` into
/// the paint's coordinate space. Coverage interpolates between the
/// destination as left by a transparent source and the fully composited
/// result. For bounded operations that is the untouched destination, so
/// uncovered pixels are skipped. Unbounded operations visit every pixel
/// of the mask, which must then cover the whole pixmap.
///
/// Mask rows that fall outside the pixmap are ignored.
pub fn composite(
    pixmap: &mut Pixmap,
    mask: &Mask,
    origin: (u32, u32),
    inverse: Affine2,
    compositing: Compositing,
    mut shade: impl FnMut(Vec2) -> Color,
) {
    let operation = compositing.operation;
    let bounded = operation.is_bounded();
    let global_alpha = compositing.global_alpha.clamp(0., 1.);
    let stride = pixmap.width() as usize;
    let (left, top) = (origin.0 as usize, origin.1 as usize);
    let mask_width = mask.width() as usize;
    if mask_width == 0 || left + mask_width > stride {
        return;
    }
    let pixels = pixmap.pixels_mut();

    for (row, coverages) in mask.data().chunks_exact(mask_width).enumerate() {
        let y = top + row;
        let start = y * stride + left;
        let pixel_row = match pixels.get_mut(start..start + mask_width) {
            Some(pixel_row) => pixel_row,
            None => break,
        };
        for (column, (pixel, &coverage)) in pixel_row.iter_mut().zip(coverages).enumerate() {
            if coverage == 0 && bounded {
                continue;
            }
            let dst = unpack(*pixel);
            let outside = operation.blend([0.; 4], dst);
            let result = if coverage == 0 {
                outside
            } else {
                let center = vec2((left + column) as f32 + 0.5, y as f32 + 0.5);
                let mut src = shade(inverse.transform_point2(center)).to_premultiplied();
                for component in &mut src {
                    *component *= global_alpha;
                }
                let inside = operation.blend(src, dst);
                lerp(outside, inside, coverage as f32 / 255.)
            };
            *pixel = pack(result);
        }
    }
}

fn lerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let mut out = [0.; 4];
    for i in 0..4 {
        out[i] = a[i] + (b[i] - a[i]) * t;
    }
    out
}

pub(crate) fn unpack(pixel: PremultipliedColorU8) -> [f32; 4] {
    [
        pixel.red() as f32 / 255.,
        pixel.green() as f32 / 255.,
        pixel.blue() as f32 / 255.,
        pixel.alpha() as f32 / 255.,
    ]
}

fn pack(rgba: [f32; 4]) -> PremultipliedColorU8 {
    let channel = |c: f32| (c.clamp(0., 1.) * 255.).round() as u8;
    let a = channel(rgba[3]);
    PremultipliedColorU8::from_rgba(
        channel(rgba[0]).min(a),
        channel(rgba[1]).min(a),
        channel(rgba[2]).min(a),
        a,
    )
    .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_is_placed_at_origin() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let mut mask = Mask::new(2, 2).unwrap();
        mask.data_mut().fill(255);
        composite(
            &mut pixmap,
            &mask,
            (1, 2),
            Affine2::IDENTITY,
            Compositing::default(),
            |_| Color::RED,
        );

        let red = |x, y| pixmap.pixel(x, y).unwrap().red() == 255;
        assert!(red(1, 2) && red(2, 2) && red(1, 3) && red(2, 3));
        assert!(!red(0, 2) && !red(3, 3) && !red(1, 1));
    }

    #[test]
    fn shade_sees_surface_coordinates() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let mut mask = Mask::new(1, 1).unwrap();
        mask.data_mut().fill(255);
        let mut seen = Vec::new();
        composite(
            &mut pixmap,
            &mask,
            (3, 1),
            Affine2::from_translation(vec2(-1., 0.)),
            Compositing::default(),
            |p| {
                seen.push(p);
                Color::BLACK
            },
        );
        assert_eq!(seen, vec![vec2(2.5, 1.5)]);
    }

    #[test]
    fn out_of_bounds_mask_is_ignored() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        let mut mask = Mask::new(2, 2).unwrap();
        mask.data_mut().fill(255);
        composite(
            &mut pixmap,
            &mask,
            (1, 0),
            Affine2::IDENTITY,
            Compositing::default(),
            |_| Color::RED,
        );
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn pack_keeps_premultiplied_invariant() {
        let pixel = pack([0.6, 0.2, 0.1, 0.5]);
        assert_eq!(pixel.red(), pixel.alpha());
        assert_eq!(pixel.alpha(), 128);
        assert_eq!(unpack(pack([0.; 4])), [0.; 4]);
    }
}
