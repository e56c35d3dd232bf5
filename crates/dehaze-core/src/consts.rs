/// Number of representable intensity levels per channel (8-bit).
pub const LEVELS: usize = 256;

/// Largest representable intensity, `LEVELS - 1`.
pub const MAX_INTENSITY: f32 = (LEVELS - 1) as f32;

/// Number of channels in a color image (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-10;

/// Lowest airlight component the pipeline passes to transmission estimation.
pub const AIRLIGHT_FLOOR: f32 = 1e-3;

/// Hard lower bound on transmission used by radiance recovery, whatever
/// floor the caller asks for.
pub const MIN_TRANSMISSION: f32 = 1e-3;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Default transmission floor (`tmin`).
pub const DEFAULT_TMIN: f32 = 0.2;

/// Default airlight cap (`Amax`), on the 0..=255 scale.
pub const DEFAULT_AMAX: f32 = 220.0;

/// Default dark-channel window size in pixels.
pub const DEFAULT_WINDOW: usize = 15;

/// Default fraction of pixels searched for the airlight (0.1%).
pub const DEFAULT_PERCENTILE: f64 = 0.001;

/// Default haze-removal strength (`omega`). Keeps 5% of the haze for depth cues.
pub const DEFAULT_OMEGA: f32 = 0.95;

/// Default guided-filter radius in pixels.
pub const DEFAULT_GUIDED_RADIUS: usize = 40;

/// Default guided-filter regularization.
pub const DEFAULT_GUIDED_EPS: f32 = 1e-3;
