//! Colour recipes applied to film when rendering a print
//!
//! Adjustments follow the CSS Filter Effects colour matrices so a preset
//! looks the same as it did as a stylesheet filter chain. Every step works on
//! linear `[0, 1]` channel values and clamps before the next step runs.

use image::RgbaImage;
use rayon::prelude::*;
use smallvec::SmallVec;

/// A single colour adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Multiply distance from mid-grey (1.0 = unchanged)
    Contrast(f32),
    /// Scale saturation (1.0 = unchanged, 0.0 = grey)
    Saturate(f32),
    /// Multiply every channel (1.0 = unchanged)
    Brightness(f32),
    /// Blend toward sepia tone (0.0 = unchanged, 1.0 = full sepia)
    Sepia(f32),
    /// Rotate hue by degrees
    HueRotate(f32),
    /// Blend toward luminance grey (0.0 = unchanged, 1.0 = grey)
    Grayscale(f32),
}

/// Adjustments making up a preset's look
///
/// Steps run in the fixed utility-filter order (brightness, contrast,
/// grayscale, hue-rotate, saturate, sepia) whatever order they are listed in.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRecipe {
    steps: SmallVec<[Adjustment; 6]>,
}

/// An adjustment lowered to `rgb' = m * rgb + offset`
#[derive(Debug, Clone, Copy)]
struct ColorOp {
    m: [[f32; 3]; 3],
    offset: f32,
}

impl VisualRecipe {
    /// Build a recipe, putting the adjustments in composition order
    pub fn new(mut steps: SmallVec<[Adjustment; 6]>) -> Self {
        steps.sort_by_key(|step| step.composition_rank());
        Self { steps }
    }

    /// A recipe that leaves colours untouched
    pub fn identity() -> Self {
        Self {
            steps: SmallVec::new(),
        }
    }

    /// The adjustments in application order
    pub fn steps(&self) -> &[Adjustment] {
        &self.steps
    }

    /// Whether the recipe has no adjustments
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply the recipe to one RGB pixel, leaving alpha to the caller
    pub fn apply_pixel(&self, rgb: [u8; 3]) -> [u8; 3] {
        let ops: SmallVec<[ColorOp; 6]> = self.steps.iter().map(|s| s.lower()).collect();
        apply_ops(&ops, rgb)
    }

    /// Apply the recipe to every pixel of an image in place
    ///
    /// Rows are processed in parallel; alpha is preserved.
    pub fn apply(&self, img: &mut RgbaImage) {
        if self.steps.is_empty() || img.width() == 0 || img.height() == 0 {
            return;
        }
        let ops: SmallVec<[ColorOp; 6]> = self.steps.iter().map(|s| s.lower()).collect();
        let row_len = img.width() as usize * 4;
        let buf: &mut [u8] = img;

        buf.par_chunks_mut(row_len).for_each(|row| {
            for px in row.chunks_exact_mut(4) {
                let [r, g, b] = apply_ops(&ops, [px[0], px[1], px[2]]);
                px[0] = r;
                px[1] = g;
                px[2] = b;
            }
        });
    }
}

impl Default for VisualRecipe {
    fn default() -> Self {
        Self::identity()
    }
}

impl Adjustment {
    const fn composition_rank(self) -> u8 {
        match self {
            Self::Brightness(_) => 0,
            Self::Contrast(_) => 1,
            Self::Grayscale(_) => 2,
            Self::HueRotate(_) => 3,
            Self::Saturate(_) => 4,
            Self::Sepia(_) => 5,
        }
    }

    fn lower(self) -> ColorOp {
        match self {
            Self::Contrast(c) => ColorOp::diagonal(c, 0.5 - 0.5 * c),
            Self::Brightness(b) => ColorOp::diagonal(b, 0.0),
            Self::Saturate(s) => ColorOp::matrix([
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ]),
            Self::Grayscale(amount) => {
                let a = 1.0 - amount.clamp(0.0, 1.0);
                ColorOp::matrix([
                    [0.2126 + 0.7874 * a, 0.7152 - 0.7152 * a, 0.0722 - 0.0722 * a],
                    [0.2126 - 0.2126 * a, 0.7152 + 0.2848 * a, 0.0722 - 0.0722 * a],
                    [0.2126 - 0.2126 * a, 0.7152 - 0.7152 * a, 0.0722 + 0.9278 * a],
                ])
            }
            Self::Sepia(amount) => {
                let a = 1.0 - amount.clamp(0.0, 1.0);
                ColorOp::matrix([
                    [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
                    [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
                    [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
                ])
            }
            Self::HueRotate(degrees) => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                ColorOp::matrix([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
        }
    }
}

impl ColorOp {
    fn diagonal(scale: f32, offset: f32) -> Self {
        Self {
            m: [[scale, 0.0, 0.0], [0.0, scale, 0.0], [0.0, 0.0, scale]],
            offset,
        }
    }

    fn matrix(m: [[f32; 3]; 3]) -> Self {
        Self { m, offset: 0.0 }
    }

    fn apply(&self, c: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (o, row) in out.iter_mut().zip(self.m.iter()) {
            *o = (row[0] * c[0] + row[1] * c[1] + row[2] * c[2] + self.offset).clamp(0.0, 1.0);
        }
        out
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "channel values are clamped to [0, 255] before conversion"
)]
fn apply_ops(ops: &[ColorOp], rgb: [u8; 3]) -> [u8; 3] {
    let mut c = rgb.map(|v| f32::from(v) / 255.0);
    for op in ops {
        c = op.apply(c);
    }
    c.map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::FilterPreset;
    use smallvec::smallvec;

    #[test]
    fn test_identity_leaves_pixels_alone() {
        let recipe = VisualRecipe::identity();
        assert_eq!(recipe.apply_pixel([12, 200, 99]), [12, 200, 99]);
    }

    #[test]
    fn test_neutral_adjustments_are_identity() {
        let recipe = VisualRecipe::new(smallvec![
            Adjustment::Contrast(1.0),
            Adjustment::Brightness(1.0),
            Adjustment::Saturate(1.0),
            Adjustment::Sepia(0.0),
            Adjustment::HueRotate(0.0),
            Adjustment::Grayscale(0.0),
        ]);
        for rgb in [[0, 0, 0], [255, 255, 255], [10, 128, 240], [200, 30, 90]] {
            let out = recipe.apply_pixel(rgb);
            for (a, b) in out.iter().zip(rgb.iter()) {
                assert!(a.abs_diff(*b) <= 1, "{rgb:?} became {out:?}");
            }
        }
    }

    #[test]
    fn test_noir_is_monochrome() {
        let recipe = FilterPreset::Noir.recipe();
        let [r, g, b] = recipe.apply_pixel([220, 40, 90]);
        assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1, "got {r},{g},{b}");
    }

    #[test]
    fn test_brightness_darkens() {
        let recipe = VisualRecipe::new(smallvec![Adjustment::Brightness(0.5)]);
        assert_eq!(recipe.apply_pixel([200, 100, 50]), [100, 50, 25]);
    }

    #[test]
    fn test_contrast_pushes_away_from_mid_grey() {
        let recipe = VisualRecipe::new(smallvec![Adjustment::Contrast(2.0)]);
        let [dark, _, light] = recipe.apply_pixel([64, 128, 192]);
        assert!(dark < 64);
        assert!(light > 192);
    }

    #[test]
    fn test_full_sepia_warms_grey() {
        let recipe = VisualRecipe::new(smallvec![Adjustment::Sepia(1.0)]);
        let [r, g, b] = recipe.apply_pixel([128, 128, 128]);
        assert!(r > g && g > b, "got {r},{g},{b}");
    }

    #[test]
    fn test_apply_preserves_alpha_and_matches_pixel_path() {
        let recipe = FilterPreset::Cyber.recipe();
        let mut img = RgbaImage::from_pixel(3, 2, image::Rgba([180, 60, 20, 77]));
        recipe.apply(&mut img);

        let expected = recipe.apply_pixel([180, 60, 20]);
        for px in img.pixels() {
            assert_eq!([px[0], px[1], px[2]], expected);
            assert_eq!(px[3], 77);
        }
    }

    #[test]
    fn test_steps_run_in_composition_order() {
        assert_eq!(
            FilterPreset::Sepia.recipe().steps(),
            &[
                Adjustment::Brightness(0.9),
                Adjustment::Contrast(1.25),
                Adjustment::HueRotate(-15.0),
                Adjustment::Saturate(0.8),
                Adjustment::Sepia(0.3),
            ]
        );

        let listed = VisualRecipe::new(smallvec![
            Adjustment::Saturate(1.8),
            Adjustment::Contrast(1.1),
            Adjustment::Brightness(1.1),
        ]);
        let sorted = VisualRecipe::new(smallvec![
            Adjustment::Brightness(1.1),
            Adjustment::Contrast(1.1),
            Adjustment::Saturate(1.8),
        ]);
        assert_eq!(listed, sorted);
        assert_eq!(listed.apply_pixel([250, 20, 130]), sorted.apply_pixel([250, 20, 130]));
    }

    #[test]
    fn test_apply_on_empty_image_is_noop() {
        let mut img = RgbaImage::new(0, 0);
        FilterPreset::Neon.recipe().apply(&mut img);
        assert_eq!(img.dimensions(), (0, 0));
    }
}
