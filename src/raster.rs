//! Image rasters
//!
//! A `Raster` is a width x height grid of packed ARGB pixels. The pixelation
//! filter reads blocks out of a source raster and writes averaged blocks into a
//! destination raster of the same size. Decoding file formats is delegated to
//! the `image` crate; everything after decode is plain `u32` pixels.

use std::path::Path;

use crate::color::{argb, CLEAR};
use crate::display::PixelBuffer;
use crate::util::hsv_to_rgb;

/// An ARGB pixel grid
#[derive(Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Raster {
    /// Create a raster filled with transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![CLEAR; (width * height) as usize],
        }
    }

    /// Create a raster from an existing pixel vec.
    /// Returns None if the vec length doesn't match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        if pixels.len() == (width * height) as usize {
            Some(Self {
                width,
                height,
                pixels,
            })
        } else {
            None
        }
    }

    /// Decode an image file into a raster
    pub fn from_image(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let decoded = image::ImageReader::open(path)
            .map_err(|e| format!("{}: {}", path.display(), e))?
            .decode()
            .map_err(|e| format!("{}: {}", path.display(), e))?
            .to_rgba8();

        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                argb(a, r, g, b)
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Procedural fallback image: a hue wash with a dark diagonal weave.
    /// Deterministic, so the demo works without any bundled asset.
    pub fn test_card(width: u32, height: u32) -> Self {
        let mut raster = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let hue = (x as f32 / width as f32) * 300.0;
                let value = 0.35 + 0.65 * (y as f32 / height as f32);
                let (r, g, b) = hsv_to_rgb(hue, 0.75, value);
                let shade = if ((x / 16) ^ (y / 16)) & 1 == 0 { 0 } else { 40 };
                raster.set(
                    x,
                    y,
                    argb(
                        255,
                        r.saturating_sub(shade),
                        g.saturating_sub(shade),
                        b.saturating_sub(shade),
                    ),
                );
            }
        }
        raster
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Read a pixel. Returns None if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Write a pixel. Out-of-bounds writes are dropped.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: u32) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.pixels[idx] = color;
        }
    }

    /// Validate that a w x h block at (x, y) lies fully inside the raster
    fn check_block(&self, x: u32, y: u32, w: u32, h: u32) -> Result<(), String> {
        if w == 0 || h == 0 || x + w > self.width || y + h > self.height {
            return Err(format!(
                "invalid region: {}x{} at ({}, {}) outside {}x{} raster",
                w, h, x, y, self.width, self.height
            ));
        }
        Ok(())
    }

    /// Read a rectangular block into a caller-provided buffer (row-major).
    /// The buffer length must equal w * h.
    pub fn read_block_into(
        &self,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        out: &mut [u32],
    ) -> Result<(), String> {
        self.check_block(x, y, w, h)?;
        if out.len() != (w * h) as usize {
            return Err(format!(
                "block buffer holds {} pixels, region needs {}",
                out.len(),
                w * h
            ));
        }

        for row in 0..h {
            let src = self.index(x, y + row);
            let dst = (row * w) as usize;
            out[dst..dst + w as usize].copy_from_slice(&self.pixels[src..src + w as usize]);
        }
        Ok(())
    }

    /// Read a rectangular block into a fresh vec (row-major)
    pub fn read_block(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Vec<u32>, String> {
        let mut out = vec![CLEAR; (w * h) as usize];
        self.read_block_into(x, y, w, h, &mut out)?;
        Ok(out)
    }

    /// Fill a rectangular block with one color
    pub fn fill_block(&mut self, x: u32, y: u32, w: u32, h: u32, color: u32) -> Result<(), String> {
        self.check_block(x, y, w, h)?;
        for row in 0..h {
            let start = self.index(x, y + row);
            self.pixels[start..start + w as usize].fill(color);
        }
        Ok(())
    }

    /// Nearest-neighbor blit into a buffer pane at (dst_x, dst_y), scaled to
    /// dst_w x dst_h. The image view counterpart of the original demo.
    pub fn blit_scaled(
        &self,
        buffer: &mut PixelBuffer,
        dst_x: i32,
        dst_y: i32,
        dst_w: u32,
        dst_h: u32,
    ) {
        if dst_w == 0 || dst_h == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        for dy in 0..dst_h {
            let sy = dy * self.height / dst_h;
            for dx in 0..dst_w {
                let sx = dx * self.width / dst_w;
                let color = self.pixels[self.index(sx, sy)];
                buffer.set_pixel(dst_x + dx as i32, dst_y + dy as i32, color);
            }
        }
    }
}
