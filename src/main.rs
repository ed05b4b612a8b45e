// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod color;
mod config;
mod display;
mod filter;
mod matrix;
mod raster;
mod util;

use std::path::PathBuf;

use config::Config;
use display::{
    draw_text, Display, InputEvent, PixelBuffer, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use matrix::{DotMatrix, ShiftDirection};
use raster::Raster;
use sdl2::keyboard::Keycode;
use util::FpsCounter;

/// Config file next to the binary, holding all demo parameters
const CONFIG_PATH: &str = "dotwall.json";

/// Window backdrop behind both panes
const BACKDROP: u32 = color::rgb(10, 10, 20);
/// Unlit panel area behind the dots
const PANEL_BACKDROP: u32 = color::rgb(6, 6, 14);

/// Test card footprint when no image is configured (the original demo
/// image's dimensions, so the default grid fills completely)
const TEST_CARD_WIDTH: u32 = 1408;
const TEST_CARD_HEIGHT: u32 = 1198;

struct CliArgs {
    config: String,
    image: Option<PathBuf>,
    kernel: Option<u32>,
    width: u32,
    height: u32,
    vsync: bool,
}

/// Parse command line arguments
fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = CliArgs {
        config: CONFIG_PATH.to_string(),
        image: None,
        kernel: None,
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => parsed.vsync = false,
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = args[i + 1].clone();
                    i += 1;
                }
            },
            "--image" | "-i" => {
                if i + 1 < args.len() {
                    parsed.image = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            },
            "--kernel" | "-k" => {
                if i + 1 < args.len() {
                    if let Ok(k) = args[i + 1].parse::<u32>() {
                        parsed.kernel = Some(k);
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 1280x720)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            parsed.width = w;
                            parsed.height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: dotwall [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --config F, -c F      Config file (default: {})", CONFIG_PATH);
                println!("  --image F, -i F       Image to pixelate (overrides config)");
                println!("  --kernel K, -k K      Kernel radius (overrides config)");
                println!("  --resolution WxH, -r WxH  Window size (e.g., 1280x720)");
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --help                Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    parsed
}

/// Largest rect with the source aspect ratio, centered in the pane
fn fit_rect(
    src_w: u32,
    src_h: u32,
    pane_x: i32,
    pane_y: i32,
    pane_w: u32,
    pane_h: u32,
) -> (i32, i32, u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (pane_x, pane_y, pane_w, pane_h);
    }
    let scale = (pane_w as f32 / src_w as f32).min(pane_h as f32 / src_h as f32);
    let w = ((src_w as f32 * scale) as u32).clamp(1, pane_w);
    let h = ((src_h as f32 * scale) as u32).clamp(1, pane_h);
    (
        pane_x + ((pane_w - w) / 2) as i32,
        pane_y + ((pane_h - h) / 2) as i32,
        w,
        h,
    )
}

fn main() -> Result<(), String> {
    let args = parse_args();

    // Load config or fall back to the built-in demo parameters
    let mut config = Config::load(&args.config).unwrap_or_else(|_| Config::default());
    if let Some(image) = args.image {
        config.image = Some(image);
    }
    if let Some(kernel) = args.kernel {
        config.kernel_radius = kernel;
    }

    // Source raster: configured image, or the procedural test card
    let src = match &config.image {
        Some(path) => Raster::from_image(path).unwrap_or_else(|e| {
            eprintln!("Image load failed ({}), using test card", e);
            Raster::test_card(TEST_CARD_WIDTH, TEST_CARD_HEIGHT)
        }),
        None => Raster::test_card(TEST_CARD_WIDTH, TEST_CARD_HEIGHT),
    };

    // One-time core pass: pixelate, project onto the grid, stamp the label
    let mut dst = Raster::new(src.width(), src.height());
    let blocks = filter::pixelate_masked(&src, &mut dst, config.kernel_radius, config.channels)?;

    let mut matrix = DotMatrix::new(config.cols, config.rows);
    matrix.project(&blocks);

    let on = color::rgb(
        config.dot_on_color[0],
        config.dot_on_color[1],
        config.dot_on_color[2],
    );
    let off = color::rgb(
        config.dot_off_color[0],
        config.dot_off_color[1],
        config.dot_off_color[2],
    );
    if let Some(label) = &config.label {
        matrix.overlay_label(&label.text, label.col, label.row, on, off);
    }

    let (mut display, texture_creator) =
        Display::with_options("dotwall", args.width, args.height, args.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, args.width, args.height)?;
    let mut buffer = PixelBuffer::with_size(args.width, args.height);

    // FPS counter with 60 sample rolling average
    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;
    let mut paused = false;

    let shift_interval = config.shift_interval_ms as f32 / 1000.0;
    let mut shift_timer = 0.0f32;

    println!("=== dotwall ===");
    println!(
        "Source: {}x{}  Grid: {}x{}  Kernel radius: {}  Blocks: {}",
        src.width(),
        src.height(),
        config.cols,
        config.rows,
        config.kernel_radius,
        blocks.len()
    );
    if args.vsync {
        println!("VSync: ON (60fps locked). Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Left/Right/Up/Down - Scroll direction");
    println!("  Space      - Pause scrolling");
    println!("  F          - Toggle FPS display");
    println!("  S          - Save config");
    println!("  Escape     - Quit");

    'main: loop {
        // Delta time and FPS measurement
        let (dt, avg_fps) = fps_counter.tick();

        // Handle input
        for event in display.poll_events() {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => match key {
                    Keycode::Escape => break 'main,
                    Keycode::Left => config.shift = ShiftDirection::Left,
                    Keycode::Right => config.shift = ShiftDirection::Right,
                    Keycode::Up => config.shift = ShiftDirection::Up,
                    Keycode::Down => config.shift = ShiftDirection::Down,
                    Keycode::Space => paused = !paused,
                    Keycode::F => show_fps = !show_fps,
                    Keycode::S => {
                        if let Err(e) = config.save(&args.config) {
                            eprintln!("Failed to save: {}", e);
                        } else {
                            println!("Config saved to {}", args.config);
                        }
                    },
                    _ => {},
                },
                InputEvent::KeyUp(_) => {},
            }
        }

        // At most one scroll step per minimum interval
        if !paused {
            shift_timer += dt;
            if shift_timer >= shift_interval {
                matrix.shift(config.shift);
                shift_timer = 0.0;
            }
        }

        buffer.clear(BACKDROP);

        // Two panes: pixelated source on the left, dot panel on the right
        let margin = 10i32;
        let pane_w = (buffer.width() as i32 - 3 * margin) / 2;
        let pane_h = buffer.height() as i32 - 2 * margin;
        if pane_w > 0 && pane_h > 0 {
            let (ix, iy, iw, ih) = fit_rect(
                dst.width(),
                dst.height(),
                margin,
                margin,
                pane_w as u32,
                pane_h as u32,
            );
            dst.blit_scaled(&mut buffer, ix, iy, iw, ih);

            matrix.render(
                &mut buffer,
                2 * margin + pane_w,
                margin,
                pane_w as u32,
                pane_h as u32,
                config.dot_shape,
                PANEL_BACKDROP,
            );
        }

        // FPS overlay (press F to toggle)
        if show_fps {
            let ms = fps_counter.avg_frame_time_ms();
            let fps_text = format!("FPS {}  {} ms", avg_fps as u32, ms as u32);
            // Draw at bottom of screen with shadow for visibility
            let y = buffer.height() as i32 - 12;
            draw_text(&mut buffer, 5, y + 1, &fps_text, color::rgb(0, 0, 0));
            draw_text(&mut buffer, 4, y, &fps_text, color::rgb(255, 255, 0));
        }

        // Present
        display.present(&mut target, &buffer)?;
    }

    Ok(())
}
