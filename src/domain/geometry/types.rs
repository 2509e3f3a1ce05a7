// SPDX-License-Identifier: MPL-2.0
//! Output geometry value types.

/// Natural pixel size of a drawable source (video frame or poster image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSize {
    pub width: u32,
    pub height: u32,
}

impl SourceSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero (size not known yet).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if the source is taller than it is wide.
    #[must_use]
    pub fn is_portrait(self) -> bool {
        self.height > self.width
    }
}

/// Constraints read from the host container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeConstraints {
    /// Current container width in pixels.
    pub container_width: u32,
    /// Computed `max-width` of the container, if any.
    pub max_width: Option<u32>,
    /// Computed `max-height` of the container, if any.
    pub max_height: Option<u32>,
}

impl SizeConstraints {
    #[must_use]
    pub fn new(container_width: u32) -> Self {
        Self {
            container_width,
            max_width: None,
            max_height: None,
        }
    }

    #[must_use]
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    #[must_use]
    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = Some(max_height);
        self
    }
}

/// Rendered size of the drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputGeometry {
    pub width: f64,
    pub height: f64,
}

impl OutputGeometry {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true if both sides are strictly positive.
    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Multiplies both sides by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}
