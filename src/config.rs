use crate::error::{SketchError, SketchResult};

/// All pipeline parameters in one struct.
///
/// The CLI fills this from its arguments; library users usually start
/// from `SketchConfig::default()` and override a field or two.
#[derive(Debug, Clone)]
pub struct SketchConfig {
    // -- Flattening --
    /// Maximum deviation between a curve and its polyline, in drawing units.
    pub flattening_error: f64,

    // -- Generation --
    /// Sampling temperature. Lower = more conservative continuations.
    pub temperature: f64,
    /// Scale between drawing units and model units, handed to the model as is.
    pub pixel_factor: f64,
    /// Upper bound on sampled tokens. `None` runs until the model ends the
    /// sequence, which may be never.
    pub max_generated_tokens: Option<usize>,

    // -- Output --
    /// Smooth decoded polylines into cubic curves.
    pub smooth: bool,
    /// Stroke color as RGB.
    pub stroke_color: [u8; 3],
    pub stroke_width: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            flattening_error: 4.0,
            temperature: 0.25,
            pixel_factor: 1.0,
            max_generated_tokens: Some(512),
            smooth: true,
            stroke_color: [0, 0, 0],
            stroke_width: 1.0,
        }
    }
}

impl SketchConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> SketchResult<()> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(SketchError::InvalidConfig(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        if !self.pixel_factor.is_finite() || self.pixel_factor <= 0.0 {
            return Err(SketchError::InvalidConfig(format!(
                "pixel factor must be positive, got {}",
                self.pixel_factor
            )));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(SketchError::InvalidConfig(format!(
                "stroke width must be non-negative, got {}",
                self.stroke_width
            )));
        }
        Ok(())
    }
}
