//! Window surface size tracking across resizes and DPI changes.
//!
//! The GPU surface always works in physical pixels. Wayland may report a zero
//! size before the compositor assigns one, so dimensions are clamped to 1×1.

/// Smallest dimension a surface is ever configured with.
pub const MIN_SURFACE_DIMENSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    /// Width over height, as the camera projection wants it.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    pub physical: PhysicalSize,
    /// Physical width divided by the scale factor.
    pub logical_width: f64,
    pub logical_height: f64,
    pub scale_factor: f64,
}

/// Physical and logical window size, kept in step with winit events.
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    logical_width: f64,
    logical_height: f64,
    scale_factor: f64,
    /// Set once a real, non-zero size has been seen.
    configured: bool,
}

impl SurfaceWrapper {
    /// Zero initial dimensions are clamped and leave the wrapper unconfigured
    /// until the first real resize arrives.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        let has_valid_size = physical_width > 0 && physical_height > 0;
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);
        let scale_factor = sanitize_scale(scale_factor);
        Self {
            physical_width: width,
            physical_height: height,
            logical_width: width as f64 / scale_factor,
            logical_height: height as f64 / scale_factor,
            scale_factor,
            configured: has_valid_size,
        }
    }

    /// Returns an event only when the clamped dimensions actually changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;
        self.logical_width = width as f64 / self.scale_factor;
        self.logical_height = height as f64 / self.scale_factor;
        self.configured = true;

        Some(self.event())
    }

    /// A DPI change always produces an event, even if the physical size is
    /// unchanged, because the logical size moved.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = sanitize_scale(new_scale_factor);
        if let Some(event) = self.handle_resize(new_physical_width, new_physical_height) {
            return Some(event);
        }
        self.logical_width = self.physical_width as f64 / self.scale_factor;
        self.logical_height = self.physical_height as f64 / self.scale_factor;
        Some(self.event())
    }

    fn event(&self) -> SurfaceResizeEvent {
        SurfaceResizeEvent {
            physical: self.physical_size(),
            logical_width: self.logical_width,
            logical_height: self.logical_height,
            scale_factor: self.scale_factor,
        }
    }

    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (self.logical_width, self.logical_height)
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

fn sanitize_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_surface_handled_gracefully() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0);
        assert!(!wrapper.is_configured());
        assert_eq!(wrapper.physical_size(), PhysicalSize { width: 1, height: 1 });

        let event = wrapper.handle_resize(1920, 1080).unwrap();
        assert_eq!(event.physical.width, 1920);
        assert_eq!(event.physical.height, 1080);
        assert!(wrapper.is_configured());
    }

    #[test]
    fn test_resize_event_carries_physical_and_logical_sizes() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 2.0);
        let event = wrapper.handle_resize(3840, 2160).unwrap();
        assert_eq!(event.physical, PhysicalSize { width: 3840, height: 2160 });
        assert!((event.logical_width - 1920.0).abs() < 0.1);
        assert!((event.logical_height - 1080.0).abs() < 0.1);
        assert_eq!(event.scale_factor, 2.0);
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(1280, 720, 1.0);
        assert!(wrapper.handle_resize(1280, 720).is_none());
    }

    #[test]
    fn test_minimize_clamps_to_one_pixel() {
        let mut wrapper = SurfaceWrapper::new(1280, 720, 1.0);
        let event = wrapper.handle_resize(0, 0).unwrap();
        assert_eq!(event.physical, PhysicalSize { width: 1, height: 1 });
    }

    #[test]
    fn test_scale_change_always_reports() {
        let mut wrapper = SurfaceWrapper::new(2560, 1440, 1.0);
        let event = wrapper.handle_scale_factor_changed(2.0, 2560, 1440).unwrap();
        assert_eq!(event.physical.width, 2560);
        assert!((event.logical_width - 1280.0).abs() < 1e-9);
        assert_eq!(wrapper.logical_size(), (1280.0, 720.0));
    }

    #[test]
    fn test_invalid_scale_factor_falls_back_to_one() {
        let wrapper = SurfaceWrapper::new(800, 600, 0.0);
        assert_eq!(wrapper.scale_factor(), 1.0);
        assert_eq!(wrapper.logical_size(), (800.0, 600.0));
    }

    #[test]
    fn test_aspect_ratio() {
        let size = PhysicalSize { width: 1280, height: 720 };
        assert!((size.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
