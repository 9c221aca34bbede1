//! Maps reference-canvas coordinates onto the real window.

use crate::types::*;

pub const REFERENCE_WIDTH: f64 = 1920.0;
pub const REFERENCE_HEIGHT: f64 = 1080.0;

/// Uniform scale from the 1920x1080 canvas to a `width` x `height` client area.
///
/// Wider-than-16:9 windows scale by height, everything else by width.
pub fn scale_factor(width: i32, height: i32) -> f64 {
    if (width as i64) * 9 > (height as i64) * 16 {
        height as f64 / REFERENCE_HEIGHT
    } else {
        width as f64 / REFERENCE_WIDTH
    }
}

/// Derive the session's probe points. Call once, after the window is sized.
pub fn scale_points(points: &[ReferencePoint], size: WindowSize) -> Vec<ScaledPoint> {
    let factor = scale_factor(size.width, size.height);
    points
        .iter()
        .map(|p| ScaledPoint {
            x: (p.x as f64 * factor).round() as i32,
            y: (p.y as f64 * factor).round() as i32,
            color: p.color,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: i32, y: i32) -> ReferencePoint {
        ReferencePoint { x, y, color: Color::rgb(1, 2, 3) }
    }

    #[test]
    fn test_reference_resolution_is_identity() {
        assert_eq!(scale_factor(1920, 1080), 1.0);
        let pts = [point(280, 35), point(271, 49)];
        let scaled = scale_points(&pts, WindowSize { width: 1920, height: 1080 });
        assert_eq!(scaled[0], ScaledPoint { x: 280, y: 35, color: Color::rgb(1, 2, 3) });
        assert_eq!(scaled[1], ScaledPoint { x: 271, y: 49, color: Color::rgb(1, 2, 3) });
    }

    #[test]
    fn test_ultrawide_scales_by_height() {
        assert_eq!(scale_factor(2560, 1080), 1.0);
        assert_eq!(scale_factor(3440, 1440), 1440.0 / 1080.0);
    }

    #[test]
    fn test_narrow_scales_by_width() {
        assert_eq!(scale_factor(1280, 1024), 1280.0 / 1920.0);
        assert_eq!(scale_factor(1600, 1200), 1600.0 / 1920.0);
    }

    #[test]
    fn test_exact_sixteen_nine_uses_width() {
        assert_eq!(scale_factor(1600, 900), 1600.0 / 1920.0);
    }

    #[test]
    fn test_1600x900_rounds_to_nearest() {
        let scaled = scale_points(&[point(280, 35), point(271, 49)], WindowSize { width: 1600, height: 900 });
        assert!((scale_factor(1600, 900) - 0.8333).abs() < 1e-4);
        assert_eq!((scaled[0].x, scaled[0].y), (233, 29));
        // 271 * 0.8333 = 225.83, 49 * 0.8333 = 40.83
        assert_eq!((scaled[1].x, scaled[1].y), (226, 41));
    }

    #[test]
    fn test_half_rounds_up() {
        // 3 * 0.5 = 1.5
        let scaled = scale_points(&[point(3, 5)], WindowSize { width: 960, height: 540 });
        assert_eq!((scaled[0].x, scaled[0].y), (2, 3));
    }
}
