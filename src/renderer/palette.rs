//! Colors for game elements

/// Linear RGBA, 0.0 - 1.0 per channel
pub type Color = [f32; 4];

pub const BRICK: Color = [0.0, 0.584, 0.867, 1.0]; // #0095DD
pub const BRICK_QUIZ: Color = [0.153, 0.682, 0.376, 1.0]; // #27ae60
pub const BALL: Color = [0.710, 0.396, 0.114, 1.0]; // #b5651d
pub const BALL_CHEAT: Color = [0.906, 0.298, 0.235, 1.0]; // #e74c3c
pub const PADDLE: Color = [0.2, 0.2, 0.2, 1.0]; // #333
pub const WINDOW_LIT: Color = [0.976, 0.906, 0.624, 1.0];
pub const WINDOW_DARK: Color = [0.12, 0.13, 0.18, 1.0];

/// Building bodies, indexed by `Building::shade`
pub const BUILDINGS: [Color; 4] = [
    [0.22, 0.24, 0.30, 1.0],
    [0.28, 0.30, 0.36, 1.0],
    [0.18, 0.20, 0.26, 1.0],
    [0.33, 0.33, 0.40, 1.0],
];

pub fn building(shade: u8) -> Color {
    BUILDINGS[shade as usize % BUILDINGS.len()]
}

/// CSS `rgba()` string for canvas fill styles
pub fn to_css(color: Color) -> String {
    let [r, g, b, a] = color;
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgba({}, {}, {}, {})", channel(r), channel(g), channel(b), a.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_css() {
        assert_eq!(to_css(PADDLE), "rgba(51, 51, 51, 1)");
        assert_eq!(to_css(BRICK), "rgba(0, 149, 221, 1)");
        assert_eq!(to_css([2.0, -1.0, 0.5, 0.5]), "rgba(255, 0, 128, 0.5)");
    }

    #[test]
    fn test_building_shade_wraps() {
        assert_eq!(building(1), BUILDINGS[1]);
        assert_eq!(building(5), BUILDINGS[1]);
    }
}
