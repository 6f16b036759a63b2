//! Rendering a print to a PNG bitmap
//!
//! The default renderer reproduces the instant-print card: the film is
//! cropped to a square ("object-cover"), run through the captured preset's
//! recipe and placed on a light card with a thin top and side border and a
//! thick bottom strip.

use crate::config::ExportSettings;
use crate::error::{RetroCamError, Result, StringError};
use crate::export::exporter::PrintSnapshot;
use crate::source::FilmFetcher;
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Side border of the card at scale 1, in pixels
const SIDE_BORDER: u32 = 16;
/// Top border of the card at scale 1, in pixels
const TOP_BORDER: u32 = 20;
/// Bottom strip of the card at scale 1, in pixels
const BOTTOM_STRIP: u32 = 64;
/// Edge of one bitmap glyph, in glyph pixels
const GLYPH_SIZE: u32 = 8;
/// Card pixels per glyph pixel at scale 1
const CAPTION_PX: u32 = 2;

/// Capability to render a print into encoded image bytes
pub trait PrintRenderer: Send + Sync {
    /// Render `print` and return the encoded bitmap
    fn render(&self, print: &PrintSnapshot) -> Result<Vec<u8>>;
}

/// Renders prints as PNG instant-photo cards
pub struct InstantPrintRenderer {
    fetcher: Arc<dyn FilmFetcher>,
    settings: ExportSettings,
}

impl InstantPrintRenderer {
    /// Create a renderer that reads films through `fetcher`
    pub fn new(fetcher: Arc<dyn FilmFetcher>, settings: ExportSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Pixel size of the rendered card as (width, height)
    pub fn card_dimensions(&self) -> Result<(u32, u32)> {
        let scale = self.settings.scale;
        let photo = self.settings.print_size;
        let width = photo
            .checked_add(2 * SIDE_BORDER)
            .and_then(|w| w.checked_mul(scale));
        let height = photo
            .checked_add(TOP_BORDER + BOTTOM_STRIP)
            .and_then(|h| h.checked_mul(scale));
        width.zip(height).ok_or_else(|| too_large(&self.settings))
    }

    /// Crop to a centred square and resize to the photo area
    fn develop_photo(&self, film: &DynamicImage, print: &PrintSnapshot) -> Result<RgbaImage> {
        let (w, h) = (film.width(), film.height());
        let side = w.min(h);
        let square = film.crop_imm((w - side) / 2, (h - side) / 2, side, side);

        let target = self
            .settings
            .print_size
            .checked_mul(self.settings.scale)
            .ok_or_else(|| too_large(&self.settings))?;
        let mut photo = square
            .resize_exact(target, target, imageops::FilterType::Lanczos3)
            .to_rgba8();
        print.preset.recipe().apply(&mut photo);
        Ok(photo)
    }

    /// Write the preset's caption date, centred in the bottom strip
    ///
    /// Skipped when the text would not fit the card width.
    fn draw_caption(&self, card: &mut RgbaImage, print: &PrintSnapshot) {
        let text = print.preset.caption_date();
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        let (card_w, card_h) = card.dimensions();
        let scale = self.settings.scale;

        let Some(unscaled_w) = chars.checked_mul(GLYPH_SIZE) else {
            return;
        };
        let px = (CAPTION_PX * scale).min(card_w / unscaled_w.max(1));
        if px == 0 {
            return;
        }

        let text_w = unscaled_w * px;
        let text_h = GLYPH_SIZE * px;
        let strip_top = (TOP_BORDER + self.settings.print_size) * scale;
        let strip_h = card_h.saturating_sub(strip_top);
        let x0 = (card_w - text_w) / 2;
        let y0 = strip_top + strip_h.saturating_sub(text_h) / 2;

        let ink = caption_ink(self.settings.background);
        for (i, ch) in (0u32..).zip(text.chars()) {
            let Some(glyph) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let gx = x0 + i * GLYPH_SIZE * px;
            for (row, bits) in (0u32..).zip(glyph) {
                for col in 0..GLYPH_SIZE {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    for dy in 0..px {
                        for dx in 0..px {
                            let (x, y) = (gx + col * px + dx, y0 + row * px + dy);
                            if x < card_w && y < card_h {
                                card.put_pixel(x, y, ink);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Gray-600 text at 80% opacity over the card background
fn caption_ink(background: [u8; 3]) -> Rgba<u8> {
    const GRAY_600: [u8; 3] = [0x4b, 0x55, 0x63];
    let mut ink = [0, 0, 0, 255];
    for ((out, fg), bg) in ink.iter_mut().zip(GRAY_600).zip(background) {
        let mixed = (u16::from(fg) * 4 + u16::from(bg)) / 5;
        *out = u8::try_from(mixed).unwrap_or(u8::MAX);
    }
    Rgba(ink)
}

fn too_large(settings: &ExportSettings) -> RetroCamError {
    RetroCamError::RenderFailed(StringError::new(format!(
        "print of {}px at scale {} is too large to render",
        settings.print_size, settings.scale
    )))
}

impl PrintRenderer for InstantPrintRenderer {
    fn render(&self, print: &PrintSnapshot) -> Result<Vec<u8>> {
        let (card_w, card_h) = self.card_dimensions()?;
        let bytes = self.fetcher.fetch(&print.image)?;
        let film = image::load_from_memory(&bytes)
            .map_err(|e| RetroCamError::RenderFailed(Box::new(e)))?;
        if film.width() == 0 || film.height() == 0 {
            return Err(RetroCamError::RenderFailed(StringError::new(
                "film has no pixels",
            )));
        }

        let photo = self.develop_photo(&film, print)?;

        let [r, g, b] = self.settings.background;
        let mut card = RgbaImage::from_pixel(card_w, card_h, Rgba([r, g, b, 255]));
        let scale = i64::from(self.settings.scale);
        imageops::overlay(
            &mut card,
            &photo,
            i64::from(SIDE_BORDER) * scale,
            i64::from(TOP_BORDER) * scale,
        );
        self.draw_caption(&mut card, print);

        let mut png = Vec::new();
        card.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| RetroCamError::RenderFailed(Box::new(e)))?;

        debug!(
            "Rendered print {} as {}x{} PNG ({} bytes)",
            print.job_id,
            card_w,
            card_h,
            png.len()
        );
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::FilterPreset;
    use crate::sequencer::JobId;
    use crate::source::ImageRef;
    use crate::error::get_user_friendly_error;
    use crate::test_utils::solid_png;

    /// Serves fixed bytes for every film
    struct FixedFetcher(Vec<u8>);

    impl FilmFetcher for FixedFetcher {
        fn fetch(&self, _image: &ImageRef) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    fn snapshot(preset: FilterPreset) -> PrintSnapshot {
        PrintSnapshot {
            job_id: JobId::new(1),
            preset,
            image: Arc::new(ImageRef::Remote("https://example.com/a.jpg".to_string())),
        }
    }

    fn small_settings() -> ExportSettings {
        ExportSettings {
            scale: 1,
            print_size: 8,
            ..ExportSettings::default()
        }
    }

    #[test]
    fn test_renders_card_with_border() {
        let renderer = InstantPrintRenderer::new(
            Arc::new(FixedFetcher(solid_png(30, 20, [200, 0, 0]))),
            small_settings(),
        );
        let png = renderer.render(&snapshot(FilterPreset::Koda)).unwrap();
        let card = image::load_from_memory(&png).unwrap().to_rgba8();

        assert_eq!(card.dimensions(), renderer.card_dimensions().unwrap());
        assert_eq!(card.dimensions(), (8 + 32, 8 + 84));
        // Corner is card background
        assert_eq!(card.get_pixel(0, 0).0, [0xee, 0xee, 0xee, 255]);
        // Photo area is not background
        assert_ne!(card.get_pixel(SIDE_BORDER + 2, TOP_BORDER + 2).0, [0xee, 0xee, 0xee, 255]);
    }

    #[test]
    fn test_noir_print_is_grey() {
        let renderer = InstantPrintRenderer::new(
            Arc::new(FixedFetcher(solid_png(10, 10, [30, 160, 220]))),
            small_settings(),
        );
        let png = renderer.render(&snapshot(FilterPreset::Noir)).unwrap();
        let card = image::load_from_memory(&png).unwrap().to_rgba8();
        let [r, g, b, _] = card.get_pixel(SIDE_BORDER + 4, TOP_BORDER + 4).0;
        assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
    }

    #[test]
    fn test_scale_multiplies_card() {
        let settings = ExportSettings {
            scale: 2,
            print_size: 8,
            ..ExportSettings::default()
        };
        let renderer = InstantPrintRenderer::new(
            Arc::new(FixedFetcher(solid_png(10, 10, [1, 2, 3]))),
            settings,
        );
        let png = renderer.render(&snapshot(FilterPreset::Retro)).unwrap();
        let card = image::load_from_memory(&png).unwrap();
        assert_eq!((card.width(), card.height()), (80, 184));
    }

    #[test]
    fn test_undecodable_film_is_render_error() {
        let renderer = InstantPrintRenderer::new(
            Arc::new(FixedFetcher(b"definitely not an image".to_vec())),
            small_settings(),
        );
        let err = renderer.render(&snapshot(FilterPreset::Neon)).unwrap_err();
        assert!(matches!(err, RetroCamError::RenderFailed(_)));
    }

    #[test]
    fn test_oversized_print_is_render_error() {
        let settings = ExportSettings {
            scale: 70_000,
            print_size: 70_000,
            ..ExportSettings::default()
        };
        let renderer = InstantPrintRenderer::new(
            Arc::new(FixedFetcher(solid_png(4, 4, [9, 9, 9]))),
            settings,
        );
        assert!(renderer.card_dimensions().is_err());
        let err = renderer.render(&snapshot(FilterPreset::Koda)).unwrap_err();
        assert!(matches!(err, RetroCamError::RenderFailed(_)));
        assert!(get_user_friendly_error(&err).starts_with("Could not save image."));
    }

    #[test]
    fn test_caption_date_drawn_in_bottom_strip() {
        let settings = ExportSettings {
            scale: 1,
            ..ExportSettings::default()
        };
        let renderer = InstantPrintRenderer::new(
            Arc::new(FixedFetcher(solid_png(10, 10, [0xee, 0xee, 0xee]))),
            settings.clone(),
        );
        let png = renderer.render(&snapshot(FilterPreset::Neon)).unwrap();
        let card = image::load_from_memory(&png).unwrap().to_rgba8();

        let strip_top = TOP_BORDER + settings.print_size;
        let ink = caption_ink(settings.background);
        let inked = card
            .enumerate_pixels()
            .filter(|(_, y, px)| *y >= strip_top && **px == ink)
            .count();
        assert!(inked > 0, "caption left the strip blank");
        // Nothing is inked above the strip
        assert!(
            card.enumerate_pixels()
                .all(|(_, y, px)| y >= strip_top || *px != ink)
        );
    }

    #[test]
    fn test_caption_skipped_when_card_too_narrow() {
        let renderer = InstantPrintRenderer::new(
            Arc::new(FixedFetcher(solid_png(10, 10, [0xee, 0xee, 0xee]))),
            small_settings(),
        );
        let png = renderer.render(&snapshot(FilterPreset::Neon)).unwrap();
        let card = image::load_from_memory(&png).unwrap().to_rgba8();
        let ink = caption_ink(small_settings().background);
        assert!(card.pixels().all(|px| *px != ink));
    }
}
