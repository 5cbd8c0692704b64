//! Canvas size derivation.
//!
//! The overlay canvas must cover exactly the video picture inside the
//! player viewport, letterboxing included. Before metadata arrives the
//! video reports no size, so the controller retries on a fixed
//! interval.

/// Seconds between size computation attempts.
pub const RESIZE_INTERVAL: f32 = 0.1;
/// Attempts before giving up on the video size.
pub const RESIZE_LIMIT: u32 = 600;

/// Pixel size of the overlay canvas and the picture's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasDimensions {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// width / height.
    pub aspect_ratio: f32,
}

/// Fit the video picture into the player viewport.
///
/// Returns `None` while the intrinsic video size is unknown or zero.
pub fn canvas_dimensions(video: (u32, u32), view: (u32, u32)) -> Option<CanvasDimensions> {
    let (video_w, video_h) = (video.0 as f32, video.1 as f32);
    let (view_w, view_h) = (view.0 as f32, view.1 as f32);
    if video_w <= 0.0 || video_h <= 0.0 || view_h <= 0.0 {
        return None;
    }

    let projected_width = ((video_w / video_h) * view_h).trunc();
    let (width, height) = if view_w < projected_width {
        (view_w, (video_h / video_w) * view_w)
    } else {
        ((video_w / video_h) * view_h, view_h)
    };

    Some(CanvasDimensions {
        width,
        height,
        aspect_ratio: width / height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_video_size() {
        assert_eq!(canvas_dimensions((0, 0), (1280, 720)), None);
        assert_eq!(canvas_dimensions((1920, 1080), (1280, 0)), None);
    }

    #[test]
    fn test_wide_viewport_pillarboxes() {
        // Viewport wider than the picture: height-bound.
        let dims = canvas_dimensions((1920, 1080), (2560, 720)).unwrap();
        assert_eq!(dims.height, 720.0);
        assert_eq!(dims.width, 1280.0);
        assert!((dims.aspect_ratio - 16.0 / 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_tall_viewport_letterboxes() {
        // Viewport narrower than the picture: width-bound.
        let dims = canvas_dimensions((1920, 1080), (1000, 720)).unwrap();
        assert_eq!(dims.width, 1000.0);
        assert_eq!(dims.height, 562.5);
    }

    #[test]
    fn test_four_three_picture() {
        let dims = canvas_dimensions((640, 480), (1280, 720)).unwrap();
        assert_eq!(dims.height, 720.0);
        assert_eq!(dims.width, 960.0);
        assert!((dims.aspect_ratio - 4.0 / 3.0).abs() < 1e-4);
    }
}
