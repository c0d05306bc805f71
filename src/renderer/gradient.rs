//! Gradient fill scaled by fade intensity

use crate::core::fade::clamp_unit;
use anyhow::{Context, Result};

/// Premultiplied ARGB pixel as `[a, r, g, b]`
type Argb = [u8; 4];

/// 32-bit premultiplied ARGB pixels, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Allocate a zeroed buffer, reporting allocation failure as an error
    pub fn new(width: u16, height: u16) -> Result<Self> {
        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .with_context(|| format!("Failed to allocate {}x{} image buffer", width, height))?;
        pixels.resize(len, 0);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u16, y: u16) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Rows `start..end` as raw bytes in the requested byte order
    pub fn row_bytes(&self, start: u16, end: u16, little_endian: bool) -> Vec<u8> {
        let row = self.width as usize;
        let rows = &self.pixels[start as usize * row..end as usize * row];
        if little_endian == cfg!(target_endian = "little") {
            bytemuck::cast_slice(rows).to_vec()
        } else {
            rows.iter().flat_map(|p| p.swap_bytes().to_ne_bytes()).collect()
        }
    }
}

/// Precomputed gradient for a fixed panel size
#[derive(Debug, Clone)]
pub struct Gradient {
    width: u16,
    height: u16,
    base: Vec<Argb>,
}

impl Gradient {
    /// Alpha falls off as `1 - (x/w)(y/h)`, with `color` premultiplied by it
    pub fn new(width: u16, height: u16, color: [u8; 3]) -> Result<Self> {
        let len = width as usize * height as usize;
        let mut base = Vec::new();
        base.try_reserve_exact(len)
            .with_context(|| format!("Failed to allocate {}x{} gradient", width, height))?;

        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        for y in 0..height {
            for x in 0..width {
                let alpha = alpha_at(x as f32 / w, y as f32 / h);
                base.push([
                    scale(255, alpha),
                    scale(color[0], alpha),
                    scale(color[1], alpha),
                    scale(color[2], alpha),
                ]);
            }
        }

        Ok(Self {
            width,
            height,
            base,
        })
    }

    /// Scale every channel of the gradient by `intensity` into `target`
    pub fn render(&self, intensity: f32, target: &mut FrameBuffer) {
        debug_assert_eq!((self.width, self.height), (target.width, target.height));

        let intensity = clamp_unit(intensity);
        for (out, &[a, r, g, b]) in target.pixels.iter_mut().zip(&self.base) {
            *out = u32::from_be_bytes([
                scale(a, intensity),
                scale(r, intensity),
                scale(g, intensity),
                scale(b, intensity),
            ]);
        }
    }
}

fn alpha_at(u: f32, v: f32) -> f32 {
    clamp_unit(1.0 - u * v)
}

fn scale(channel: u8, factor: f32) -> u8 {
    (channel as f32 * factor).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(pixel: u32) -> [u8; 4] {
        pixel.to_be_bytes()
    }

    #[test]
    fn test_full_intensity_corners() -> Result<()> {
        let gradient = Gradient::new(10, 10, [200, 100, 50])?;
        let mut frame = FrameBuffer::new(10, 10)?;
        gradient.render(1.0, &mut frame);

        // Top-left is opaque base color
        assert_eq!(channels(frame.pixel(0, 0)), [255, 200, 100, 50]);
        // Bottom-right is faded by (0.9 * 0.9)
        let [a, r, _, _] = channels(frame.pixel(9, 9));
        assert_eq!(a, (255.0_f32 * 0.19).round() as u8);
        assert_eq!(r, (200.0_f32 * 0.19).round() as u8);
        Ok(())
    }

    #[test]
    fn test_top_row_and_left_column_stay_opaque() -> Result<()> {
        let gradient = Gradient::new(8, 4, [10, 20, 30])?;
        let mut frame = FrameBuffer::new(8, 4)?;
        gradient.render(1.0, &mut frame);

        for x in 0..8 {
            assert_eq!(channels(frame.pixel(x, 0))[0], 255);
        }
        for y in 0..4 {
            assert_eq!(channels(frame.pixel(0, y))[0], 255);
        }
        Ok(())
    }

    #[test]
    fn test_intensity_scales_every_channel() -> Result<()> {
        let gradient = Gradient::new(2, 2, [200, 100, 50])?;
        let mut frame = FrameBuffer::new(2, 2)?;

        gradient.render(0.5, &mut frame);
        assert_eq!(channels(frame.pixel(0, 0)), [128, 100, 50, 25]);

        gradient.render(0.0, &mut frame);
        assert!(frame.pixels().iter().all(|&p| p == 0));
        Ok(())
    }

    #[test]
    fn test_intensity_is_clamped() -> Result<()> {
        let gradient = Gradient::new(1, 1, [40, 40, 40])?;
        let mut frame = FrameBuffer::new(1, 1)?;

        gradient.render(3.0, &mut frame);
        assert_eq!(channels(frame.pixel(0, 0)), [255, 40, 40, 40]);
        Ok(())
    }

    #[test]
    fn test_row_bytes_byte_order() -> Result<()> {
        let gradient = Gradient::new(1, 2, [1, 2, 3])?;
        let mut frame = FrameBuffer::new(1, 2)?;
        gradient.render(1.0, &mut frame);

        assert_eq!(frame.row_bytes(0, 1, true), vec![3, 2, 1, 255]);
        assert_eq!(frame.row_bytes(0, 1, false), vec![255, 1, 2, 3]);
        assert_eq!(frame.row_bytes(0, 2, true).len(), 8);
        Ok(())
    }
}
