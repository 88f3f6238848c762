//! City skyline generation
//!
//! Buildings stand on the floor along the canvas bottom. A street is kept
//! clear under the ball's launch point so the serve never starts inside a
//! building. The layout depends only on the seed and canvas size, so a
//! resize regenerates the same skyline shape.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use super::state::{Building, Window};

/// Number of building shades in the renderer palette
pub const BUILDING_SHADES: u8 = 4;

const MIN_BUILDING_WIDTH: f32 = 30.0;
const MAX_BUILDING_WIDTH: f32 = 70.0;
const MIN_GAP: f32 = 4.0;
const MAX_GAP: f32 = 24.0;
/// Height range as a fraction of canvas height
const MIN_HEIGHT_FRAC: f32 = 0.12;
const MAX_HEIGHT_FRAC: f32 = 0.30;
/// Clear street around the canvas center
const STREET_HALF_WIDTH: f32 = 70.0;

const WINDOW_W: f32 = 4.0;
const WINDOW_H: f32 = 6.0;
const WINDOW_STEP_X: f32 = 9.0;
const WINDOW_STEP_Y: f32 = 11.0;
const WINDOW_MARGIN: f32 = 6.0;
/// Chance a window starts lit
const LIT_CHANCE: f64 = 0.6;

/// Build the skyline for a canvas
pub fn generate_skyline(seed: u64, width: f32, height: f32) -> Vec<Building> {
    // Separate stream so the skyline never shifts the gameplay RNG
    let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed_c17e);
    let street = (width / 2.0 - STREET_HALF_WIDTH, width / 2.0 + STREET_HALF_WIDTH);

    let mut buildings = Vec::new();
    let mut x = rng.random_range(0.0..MAX_GAP);
    while x < width {
        let w = rng.random_range(MIN_BUILDING_WIDTH..MAX_BUILDING_WIDTH);
        let h = height * rng.random_range(MIN_HEIGHT_FRAC..MAX_HEIGHT_FRAC);
        let shade = rng.random_range(0..BUILDING_SHADES);
        let gap = rng.random_range(MIN_GAP..MAX_GAP);

        let right = (x + w).min(width);
        let in_street = x < street.1 && right > street.0;
        if !in_street && right - x >= MIN_BUILDING_WIDTH / 2.0 {
            let rect = Rect::new(x, height - h, right - x, h);
            let windows = windows_for(&rect, &mut rng);
            buildings.push(Building {
                rect,
                shade,
                windows,
            });
        }

        x = if in_street { street.1 + gap } else { x + w + gap };
    }

    log::debug!("Generated skyline with {} buildings", buildings.len());
    buildings
}

fn windows_for(rect: &Rect, rng: &mut Pcg32) -> Vec<Window> {
    let cols = ((rect.w - 2.0 * WINDOW_MARGIN + (WINDOW_STEP_X - WINDOW_W)) / WINDOW_STEP_X)
        .floor()
        .max(0.0) as usize;
    let rows = ((rect.h - 2.0 * WINDOW_MARGIN + (WINDOW_STEP_Y - WINDOW_H)) / WINDOW_STEP_Y)
        .floor()
        .max(0.0) as usize;

    let mut windows = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            windows.push(Window {
                rect: Rect::new(
                    rect.x + WINDOW_MARGIN + col as f32 * WINDOW_STEP_X,
                    rect.y + WINDOW_MARGIN + row as f32 * WINDOW_STEP_Y,
                    WINDOW_W,
                    WINDOW_H,
                ),
                lit: rng.random_bool(LIT_CHANCE),
            });
        }
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skyline_is_deterministic() {
        let a = generate_skyline(77, 520.0, 400.0);
        let b = generate_skyline(77, 520.0, 400.0);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.rect, y.rect);
            assert_eq!(x.windows.len(), y.windows.len());
        }
    }

    #[test]
    fn test_buildings_stay_on_canvas_and_off_street() {
        for seed in 0..20 {
            let width = 520.0;
            let height = 400.0;
            for b in generate_skyline(seed, width, height) {
                assert!(b.rect.left() >= 0.0 && b.rect.right() <= width + 0.01);
                assert!((b.rect.bottom() - height).abs() < 0.01);
                assert!(b.rect.h <= height * MAX_HEIGHT_FRAC);
                let clear = b.rect.right() <= width / 2.0 - STREET_HALF_WIDTH + 0.01
                    || b.rect.left() >= width / 2.0 + STREET_HALF_WIDTH;
                assert!(clear, "building {:?} blocks the street", b.rect);
                assert!(b.shade < BUILDING_SHADES);
            }
        }
    }

    #[test]
    fn test_windows_inside_building() {
        for b in generate_skyline(3, 800.0, 600.0) {
            for w in &b.windows {
                assert!(w.rect.left() >= b.rect.left());
                assert!(w.rect.right() <= b.rect.right() + 0.001);
                assert!(w.rect.top() >= b.rect.top());
                assert!(w.rect.bottom() <= b.rect.bottom() + 0.001);
            }
        }
    }
}
