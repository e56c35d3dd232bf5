//! Dark channel prior (He, Sun & Tang, CVPR 2009).
//!
//! Haze model: `I(x) = J(x) t(x) + A (1 - t(x))`, with `I` the hazy image, `J` the scene
//! radiance, `A` the airlight and `t` the per-pixel transmission.

pub mod atmosphere;
pub mod dark_channel;
pub mod radiance;
pub mod transmission;

pub use atmosphere::{brightest_pixels, candidate_count, estimate_airlight, Airlight};
pub use dark_channel::{channel_minimum, dark_channel, dark_channel_frame, dark_channel_naive};
pub use radiance::recover_radiance;
pub use transmission::{
    clamp_transmission, estimate_transmission, floor_transmission, refine_transmission,
};
