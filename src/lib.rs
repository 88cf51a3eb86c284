#![no_std]

extern crate alloc;

pub mod color;
pub mod effect;
pub mod frame_scheduler;
pub mod mathf;
pub mod source;
pub mod stage;

pub use color::{Hsv, Rgb};
pub use effect::{
    Animation, AnimationSlot, Breathing, BreathingWave, Chase, ChaseRamp, Effect, EffectOptions,
    Fade, FadeDirection, FlickerRamp, LiquidFill, ManualRamp, StaticBrightness,
};
pub use frame_scheduler::FrameScheduler;
pub use source::{
    ColorShift, ColorSource, Gradient, MultiGradient, ScrollMotion, ScrollingColorSource,
    SourcePattern, SourceSlot, StaticColor,
};
pub use stage::{DeviceId, StageDevice, StageManager};

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The stage manager is generic over this trait and pushes one frame
/// per managed device through it.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
