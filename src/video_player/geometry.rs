// SPDX-License-Identifier: MPL-2.0
//! Responsive output sizing.
//!
//! The surface is width-driven: the source is scaled to fill the container
//! width, capped by the container's `max-width`. Portrait sources get a
//! second pass so a height-constrained container cannot overflow
//! vertically.

use crate::domain::geometry::{OutputGeometry, SizeConstraints, SourceSize};

/// Computes the rendered size of a source under container constraints.
///
/// Returns `None` when the source size (or the container width) is not
/// known yet; callers keep their previous geometry in that case.
///
/// # Examples
///
/// ```
/// use canvas_video::domain::geometry::{OutputGeometry, SizeConstraints, SourceSize};
/// use canvas_video::video_player::compute_output_size;
///
/// let geometry = compute_output_size(
///     SourceSize::new(1920, 1080),
///     SizeConstraints::new(800).with_max_width(600),
/// );
/// assert_eq!(geometry, Some(OutputGeometry::new(600.0, 337.5)));
/// ```
#[must_use]
pub fn compute_output_size(
    source: SourceSize,
    constraints: SizeConstraints,
) -> Option<OutputGeometry> {
    if source.is_empty() {
        return None;
    }

    let source_w = f64::from(source.width);
    let source_h = f64::from(source.height);
    let container_w = f64::from(constraints.container_width);
    // A zero max is the same as no max.
    let max_w = constraints.max_width.filter(|&w| w > 0).map(f64::from);
    let max_h = constraints.max_height.filter(|&h| h > 0).map(f64::from);

    let mut ratio = container_w / source_w;
    if let Some(max_w) = max_w {
        if container_w > max_w {
            ratio = max_w / source_w;
        }
    }

    let mut geometry = OutputGeometry::new(source_w * ratio, source_h * ratio);

    if source.is_portrait() {
        if let Some(max_h) = max_h {
            let height_bound = max_w
                .map_or(max_h, |max_w| (container_w / max_w) * max_h)
                .min(max_h);
            if geometry.height > height_bound {
                geometry = geometry.scaled(height_bound / geometry.height);
            }
        }
    }

    geometry.is_drawable().then_some(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, F64_EPSILON};

    #[test]
    fn landscape_clamped_by_max_width() {
        let g = compute_output_size(
            SourceSize::new(1920, 1080),
            SizeConstraints::new(800).with_max_width(600),
        )
        .unwrap();
        assert_abs_diff_eq!(g.width, 600.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(g.height, 337.5, epsilon = F64_EPSILON);
    }

    #[test]
    fn fills_container_without_constraints() {
        let g = compute_output_size(SourceSize::new(1280, 720), SizeConstraints::new(640)).unwrap();
        assert_abs_diff_eq!(g.width, 640.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(g.height, 360.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn container_below_max_width_scales_linearly() {
        let source = SourceSize::new(1000, 500);
        let small = compute_output_size(source, SizeConstraints::new(300).with_max_width(600));
        let large = compute_output_size(source, SizeConstraints::new(500).with_max_width(600));
        assert_abs_diff_eq!(small.unwrap().width, 300.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(large.unwrap().width, 500.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn portrait_height_clamped() {
        let g = compute_output_size(
            SourceSize::new(600, 1200),
            SizeConstraints::new(800).with_max_width(600).with_max_height(500),
        )
        .unwrap();
        assert_abs_diff_eq!(g.height, 500.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(g.width, 250.0, epsilon = F64_EPSILON);
        assert!(g.width < 800.0);
    }

    #[test]
    fn portrait_bound_shrinks_with_narrow_container() {
        // Container at half the max width halves the height bound.
        let g = compute_output_size(
            SourceSize::new(600, 1200),
            SizeConstraints::new(300).with_max_width(600).with_max_height(500),
        )
        .unwrap();
        assert_abs_diff_eq!(g.height, 250.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(g.width, 125.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn portrait_without_max_width_uses_max_height() {
        let g = compute_output_size(
            SourceSize::new(600, 1200),
            SizeConstraints::new(400).with_max_height(500),
        )
        .unwrap();
        assert_abs_diff_eq!(g.height, 500.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(g.width, 250.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn landscape_ignores_max_height() {
        let g = compute_output_size(
            SourceSize::new(1600, 900),
            SizeConstraints::new(800).with_max_height(100),
        )
        .unwrap();
        assert_abs_diff_eq!(g.width, 800.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(g.height, 450.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn portrait_within_bound_is_unchanged() {
        let g = compute_output_size(
            SourceSize::new(300, 400),
            SizeConstraints::new(300).with_max_height(500),
        )
        .unwrap();
        assert_abs_diff_eq!(g.width, 300.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(g.height, 400.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn unknown_source_size_is_no_change() {
        assert_eq!(compute_output_size(SourceSize::new(0, 1080), SizeConstraints::new(800)), None);
        assert_eq!(compute_output_size(SourceSize::new(1920, 0), SizeConstraints::new(800)), None);
    }

    #[test]
    fn zero_container_is_no_change() {
        assert_eq!(compute_output_size(SourceSize::new(1920, 1080), SizeConstraints::new(0)), None);
    }

    #[test]
    fn zero_max_width_is_ignored() {
        let g = compute_output_size(
            SourceSize::new(1000, 500),
            SizeConstraints::new(800).with_max_width(0),
        )
        .unwrap();
        assert_abs_diff_eq!(g.width, 800.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn width_stops_growing_past_max_width() {
        let source = SourceSize::new(1920, 1080);
        let widths: Vec<f64> = [400, 500, 600, 700, 1200]
            .iter()
            .filter_map(|&cw| {
                compute_output_size(source, SizeConstraints::new(cw).with_max_width(600))
            })
            .map(|g| g.width)
            .collect();
        let expected = [400.0, 500.0, 600.0, 600.0, 600.0];
        assert_eq!(widths.len(), expected.len());
        for (width, expected) in widths.iter().zip(expected) {
            assert_abs_diff_eq!(*width, expected, epsilon = F64_EPSILON);
        }
    }
}
