use image::imageops::{self, FilterType};
use image::RgbaImage;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Longest side kept after decoding. Terminal cells never need more.
pub const SPRITE_MAX_SIDE: u32 = 48;

const ALPHA_CUTOFF: u8 = 128;
const UPPER_HALF: &str = "\u{2580}";
const LOWER_HALF: &str = "\u{2584}";

/// Decoded sprite, cropped to its opaque bounds. `pixels` is RGBA, row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteArt {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl SpriteArt {
    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = ((y * self.width + x) * 4) as usize;
        let rgba = self.pixels.get(start..start + 4)?;
        if rgba[3] < ALPHA_CUTOFF {
            return None;
        }
        Some(Color::Rgb(rgba[0], rgba[1], rgba[2]))
    }
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteArt, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = image.to_rgba8();
    let (x, y, width, height) =
        opaque_bounds(&rgba).ok_or_else(|| "sprite is fully transparent".to_string())?;
    let cropped = imageops::crop_imm(&rgba, x, y, width, height).to_image();

    let scale = (SPRITE_MAX_SIDE as f32 / width.max(height) as f32).min(1.0);
    let target_w = ((width as f32 * scale).round() as u32).max(1);
    let target_h = ((height as f32 * scale).round() as u32).max(1);
    let resized = if (target_w, target_h) == (width, height) {
        cropped
    } else {
        imageops::resize(&cropped, target_w, target_h, FilterType::Nearest)
    };

    Ok(SpriteArt {
        width: resized.width(),
        height: resized.height(),
        pixels: resized.into_raw(),
    })
}

fn opaque_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] >= ALPHA_CUTOFF {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x == u32::MAX {
        return None;
    }
    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Render `art` into at most `cols` x `rows` cells, two pixels per cell using
/// half-block glyphs. Aspect ratio is preserved.
pub fn half_block_lines(art: &SpriteArt, cols: u16, rows: u16) -> Vec<Line<'static>> {
    if cols == 0 || rows == 0 || art.width == 0 || art.height == 0 {
        return Vec::new();
    }
    let scale = (cols as f32 / art.width as f32).min(rows as f32 * 2.0 / art.height as f32);
    let out_w = ((art.width as f32 * scale).floor() as u32).clamp(1, cols as u32);
    let out_h = ((art.height as f32 * scale).floor() as u32).clamp(1, rows as u32 * 2);

    let sample = |ox: u32, oy: u32| -> Option<Color> {
        if oy >= out_h {
            return None;
        }
        let sx = (ox * art.width) / out_w;
        let sy = (oy * art.height) / out_h;
        art.pixel(sx, sy)
    };

    (0..out_h.div_ceil(2))
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..out_w)
                .map(|col| {
                    let top = sample(col, row * 2);
                    let bottom = sample(col, row * 2 + 1);
                    match (top, bottom) {
                        (Some(top), Some(bottom)) => {
                            Span::styled(UPPER_HALF, Style::default().fg(top).bg(bottom))
                        }
                        (Some(top), None) => Span::styled(UPPER_HALF, Style::default().fg(top)),
                        (None, Some(bottom)) => {
                            Span::styled(LOWER_HALF, Style::default().fg(bottom))
                        }
                        (None, None) => Span::raw(" "),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
