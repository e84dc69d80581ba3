//! Tray icon generation.
//!
//! Icons are drawn procedurally as RGBA: a coloured disc with a white
//! microphone or speaker glyph, struck through when muted.

/// Icon size in pixels.
pub const ICON_SIZE: u32 = 32;

/// Which device glyph to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Microphone,
    Speaker,
}

/// Generate the tray icon for `kind` in the given mute state.
#[cfg(windows)]
pub fn create_icon(kind: IconKind, muted: bool) -> Result<tray_icon::Icon, String> {
    let rgba = generate_icon(kind, muted);
    tray_icon::Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).map_err(|e| e.to_string())
}

/// Generate an icon as RGBA data.
pub fn generate_icon(kind: IconKind, muted: bool) -> Vec<u8> {
    let size = ICON_SIZE as usize;
    let mut rgba = vec![0u8; size * size * 4];

    let center = size as f32 / 2.0;
    let radius = size as f32 / 2.0 - 3.0;

    let (r, g, b) = if muted {
        (220u8, 60u8, 60u8)
    } else {
        (60u8, 180u8, 60u8)
    };

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();

            let alpha = if dist < radius {
                255
            } else if dist < radius + 1.0 {
                // Anti-aliased edge
                ((radius + 1.0 - dist) * 255.0) as u8
            } else {
                continue;
            };

            set_pixel(&mut rgba, size, x, y, [r, g, b, alpha]);
        }
    }

    match kind {
        IconKind::Microphone => draw_microphone(&mut rgba, size),
        IconKind::Speaker => draw_speaker(&mut rgba, size),
    }

    if muted {
        draw_strike_through(&mut rgba, size);
    }

    rgba
}

fn set_pixel(rgba: &mut [u8], size: usize, x: usize, y: usize, color: [u8; 4]) {
    if x < size && y < size {
        let idx = (y * size + x) * 4;
        rgba[idx..idx + 4].copy_from_slice(&color);
    }
}

/// Paint white over pixels that are already inside the disc.
fn paint_glyph(rgba: &mut [u8], size: usize, x: usize, y: usize) {
    if x < size && y < size {
        let idx = (y * size + x) * 4;
        if rgba[idx + 3] > 0 {
            rgba[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
        }
    }
}

fn draw_microphone(rgba: &mut [u8], size: usize) {
    let center_x = size / 2;

    // Capsule
    let body_width = size / 4;
    let body_height = size / 2;
    let body_top = size / 4;

    for y in body_top..(body_top + body_height) {
        for x in (center_x - body_width / 2)..(center_x + body_width / 2) {
            paint_glyph(rgba, size, x, y);
        }
    }

    // Stand
    let stand_y = body_top + body_height;
    for y in stand_y..(stand_y + 3).min(size) {
        paint_glyph(rgba, size, center_x, y);
    }
}

fn draw_speaker(rgba: &mut [u8], size: usize) {
    let center_y = size / 2;

    // Magnet
    let box_left = size / 4;
    let box_width = size / 8;
    let box_half = size / 8;
    for y in (center_y - box_half)..(center_y + box_half) {
        for x in box_left..(box_left + box_width) {
            paint_glyph(rgba, size, x, y);
        }
    }

    // Cone widens to the right
    let cone_left = box_left + box_width;
    let cone_width = size / 4;
    for i in 0..cone_width {
        let half = box_half + i / 2;
        for y in (center_y - half)..(center_y + half) {
            paint_glyph(rgba, size, cone_left + i, y);
        }
    }
}

fn draw_strike_through(rgba: &mut [u8], size: usize) {
    let thickness = 2;

    for i in 4..(size - 4) {
        for t in 0..thickness {
            set_pixel(rgba, size, i, i + t, [255, 255, 255, 255]);
        }
    }
}
