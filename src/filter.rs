//! Block-averaging pixelation filter
//!
//! Partitions a raster into non-overlapping square blocks of side `2k + 1`
//! (k = kernel radius), starting at offset `k`. Each block is replaced in the
//! destination raster by its per-channel mean color, and the same color is
//! reported with the grid cell it projects to, in raster-scan order.
//!
//! Channel sums are divided by the kernel width and then by the kernel height,
//! in that order. A strip narrower than one block at the right/bottom edge
//! (and the k-pixel margin at the left/top) is left untouched in the
//! destination and produces no grid cell.

use serde::{Deserialize, Serialize};

use crate::color::{alpha, argb, blue, green, red};
use crate::raster::Raster;

/// One averaged block and the grid cell it lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockColor {
    pub col: u32,
    pub row: u32,
    pub color: u32,
}

/// Which color channels survive the average. Alpha is always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMask {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl ChannelMask {
    pub const ALL: ChannelMask = ChannelMask {
        red: true,
        green: true,
        blue: true,
    };
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Pixelate with all channels enabled
pub fn pixelate(
    src: &Raster,
    dst: &mut Raster,
    kernel_radius: u32,
) -> Result<Vec<BlockColor>, String> {
    pixelate_masked(src, dst, kernel_radius, ChannelMask::ALL)
}

/// Pixelate `src` into `dst`, returning the per-block colors keyed by grid
/// cell. `dst` must have the same dimensions as `src`.
pub fn pixelate_masked(
    src: &Raster,
    dst: &mut Raster,
    kernel_radius: u32,
    channels: ChannelMask,
) -> Result<Vec<BlockColor>, String> {
    if kernel_radius < 1 {
        return Err(format!("kernel radius must be >= 1, got {}", kernel_radius));
    }
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(format!(
            "source {}x{} and destination {}x{} differ",
            src.width(),
            src.height(),
            dst.width(),
            dst.height()
        ));
    }

    let k = kernel_radius;
    let (width, height) = (src.width(), src.height());
    // The first block spans [k, 3k + 1), so anything smaller than 3k + 1 per
    // side has no room for a single block
    if (width as u64) <= 3 * k as u64 || (height as u64) <= 3 * k as u64 {
        return Err(format!(
            "raster {}x{} too small for kernel radius {} (needs at least {}x{})",
            width,
            height,
            k,
            3 * k as u64 + 1,
            3 * k as u64 + 1
        ));
    }
    let kernel = 2 * k + 1;

    // Block pixel buffer is reused across the whole scan
    let mut block = vec![0u32; (kernel * kernel) as usize];
    let mut blocks = Vec::new();

    for y in (k..height - 2 * k).step_by(kernel as usize) {
        for x in (k..width - 2 * k).step_by(kernel as usize) {
            src.read_block_into(x, y, kernel, kernel, &mut block)?;

            let mut a_sum: u32 = 0;
            let mut r_sum: u32 = 0;
            let mut g_sum: u32 = 0;
            let mut b_sum: u32 = 0;
            for &pixel in &block {
                a_sum += alpha(pixel) as u32;
                r_sum += red(pixel) as u32;
                g_sum += green(pixel) as u32;
                b_sum += blue(pixel) as u32;
            }

            // Mean per channel: divide by kernel width, then by kernel height
            let a = a_sum / kernel / kernel;
            let r = if channels.red { r_sum / kernel / kernel } else { 0 };
            let g = if channels.green { g_sum / kernel / kernel } else { 0 };
            let b = if channels.blue { b_sum / kernel / kernel } else { 0 };
            let color = argb(a as u8, r as u8, g as u8, b as u8);

            dst.fill_block(x, y, kernel, kernel, color)?;
            blocks.push(BlockColor {
                col: x / kernel,
                row: y / kernel,
                color,
            });
        }
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{rgb, CLEAR};

    fn uniform(width: u32, height: u32, color: u32) -> Raster {
        let mut raster = Raster::new(width, height);
        for y in 0..height {
            for x in 0..width {
                raster.set(x, y, color);
            }
        }
        raster
    }

    #[test]
    fn test_uniform_raster_averages_to_itself() {
        // 19x19 with k = 6 holds exactly one 13x13 block at (6, 6)
        let color = argb(200, 10, 20, 30);
        let src = uniform(19, 19, color);
        let mut dst = Raster::new(19, 19);

        let blocks = pixelate(&src, &mut dst, 6).unwrap();
        assert_eq!(
            blocks,
            vec![BlockColor {
                col: 0,
                row: 0,
                color
            }]
        );
        assert_eq!(dst.get(6, 6), Some(color));
        assert_eq!(dst.get(18, 18), Some(color));
        // the k-wide margin stays untouched
        assert_eq!(dst.get(5, 5), Some(CLEAR));
    }

    #[test]
    fn test_gradient_average_truncates() {
        // 5x5 with k = 1: one 3x3 block over pixels (1..4, 1..4).
        // Red channel is y * 5 + x, so the block sums to 108 and
        // 108 / 3 / 3 = 12.
        let mut src = Raster::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                src.set(x, y, rgb((y * 5 + x) as u8, 0, 0));
            }
        }
        let mut dst = Raster::new(5, 5);

        let blocks = pixelate(&src, &mut dst, 1).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].color, rgb(12, 0, 0));

        // truncating case: a single red 8 in the block, 8 / 3 / 3 = 0
        let mut src = Raster::new(5, 5);
        src.set(1, 1, rgb(8, 0, 0));
        let blocks = pixelate(&src, &mut dst, 1).unwrap();
        assert_eq!(red(blocks[0].color), 0);
    }

    #[test]
    fn test_margins_and_partial_strips_untouched() {
        // 16x16 with k = 1: blocks start at 1 and cover pixels 1..16,
        // so column/row 0 stay clear in the destination
        let src = uniform(16, 16, rgb(50, 60, 70));
        let mut dst = Raster::new(16, 16);

        let blocks = pixelate(&src, &mut dst, 1).unwrap();
        assert_eq!(blocks.len(), 25); // 5 x 5 blocks at x,y = 1,4,7,10,13
        assert_eq!(dst.get(0, 0), Some(CLEAR));
        assert_eq!(dst.get(0, 8), Some(CLEAR));
        assert_eq!(dst.get(1, 1), Some(rgb(50, 60, 70)));
        assert_eq!(dst.get(15, 15), Some(rgb(50, 60, 70)));

        // 17x17: the extra trailing column/row is a partial strip, no new
        // blocks and no writes past pixel 16
        let src = uniform(17, 17, rgb(50, 60, 70));
        let mut dst = Raster::new(17, 17);
        let blocks = pixelate(&src, &mut dst, 1).unwrap();
        assert_eq!(blocks.len(), 25);
        assert_eq!(dst.get(16, 16), Some(CLEAR));
        assert_eq!(dst.get(16, 1), Some(CLEAR));
    }

    #[test]
    fn test_grid_cells_follow_raster_scan() {
        let src = uniform(16, 16, rgb(1, 2, 3));
        let mut dst = Raster::new(16, 16);

        let blocks = pixelate(&src, &mut dst, 1).unwrap();
        let cells: Vec<(u32, u32)> = blocks.iter().map(|b| (b.col, b.row)).collect();
        // block top-left x runs 1,4,7,10,13 -> col = x / 3 = 0..5
        assert_eq!(cells[0], (0, 0));
        assert_eq!(cells[1], (1, 0));
        assert_eq!(cells[4], (4, 0));
        assert_eq!(cells[5], (0, 1));
        assert_eq!(cells[24], (4, 4));
    }

    #[test]
    fn test_idempotent_over_same_source() {
        let src = Raster::test_card(40, 30);
        let mut dst_a = Raster::new(40, 30);
        let mut dst_b = Raster::new(40, 30);

        let a = pixelate(&src, &mut dst_a, 2).unwrap();
        let b = pixelate(&src, &mut dst_b, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_channel_mask_zeroes_channels() {
        let src = uniform(9, 9, argb(255, 100, 150, 200));
        let mut dst = Raster::new(9, 9);

        let blocks = pixelate_masked(
            &src,
            &mut dst,
            1,
            ChannelMask {
                red: false,
                green: true,
                blue: false,
            },
        )
        .unwrap();
        let color = blocks[0].color;
        assert_eq!(alpha(color), 255);
        assert_eq!(red(color), 0);
        assert_eq!(green(color), 150);
        assert_eq!(blue(color), 0);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let src = uniform(8, 8, CLEAR);
        let mut dst = Raster::new(8, 8);
        assert!(pixelate(&src, &mut dst, 0).is_err());

        let mut small_dst = Raster::new(4, 4);
        assert!(pixelate(&src, &mut small_dst, 1).is_err());

        // 2x2 raster cannot hold one 3x3 block
        let tiny = uniform(2, 2, CLEAR);
        let mut tiny_dst = Raster::new(2, 2);
        assert!(pixelate(&tiny, &mut tiny_dst, 1).is_err());
    }
}
