//! Multi-device effect compositing.
//!
//! The stage manager owns every managed device and, per device, an
//! append-ordered list of active effects plus one reusable canvas.
//! Each tick recomputes all effects for all devices before any canvas
//! is pushed to hardware, so devices meant to animate in lockstep are
//! never desynchronized by interleaved I/O latency.

use alloc::vec;
use alloc::vec::Vec;
use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::{BLACK, Rgb};
use crate::effect::Effect;

/// Opaque handle identifying a managed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub u32);

/// One managed device: its pixel count, its hardware driver, its
/// reusable canvas and the ordered effects currently targeting it.
pub struct StageDevice<'a, O> {
    id: DeviceId,
    pixel_count: usize,
    driver: O,
    canvas: Vec<Rgb>,
    effects: Vec<Effect<'a>>,
}

impl<'a, O> StageDevice<'a, O> {
    pub fn new(id: DeviceId, pixel_count: usize, driver: O) -> Self {
        Self {
            id,
            pixel_count,
            driver,
            canvas: vec![BLACK; pixel_count],
            effects: Vec::new(),
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }
}

/// Central renderer for a set of devices.
///
/// Effect list order defines paint order: a later-added effect fully
/// overwrites the canvas of the same device (no alpha blending).
/// Finished effects are dropped after their final frame is painted.
pub struct StageManager<'a, O: OutputDriver> {
    devices: Vec<StageDevice<'a, O>>,
}

impl<'a, O: OutputDriver> StageManager<'a, O> {
    /// Create a manager over the devices it will control.
    pub fn new(devices: Vec<StageDevice<'a, O>>) -> Self {
        Self { devices }
    }

    fn device_mut(&mut self, id: DeviceId) -> Option<&mut StageDevice<'a, O>> {
        self.devices.iter_mut().find(|device| device.id() == id)
    }

    /// Add an effect on top of its target device's stack.
    ///
    /// Targeting a device this manager does not own, or one whose pixel
    /// count does not match the effect's, is non-fatal: the effect is
    /// handed back untouched and never rendered.
    pub fn add_effect(&mut self, effect: Effect<'a>) -> Result<(), Effect<'a>> {
        let Some(device) = self.device_mut(effect.device()) else {
            #[cfg(feature = "esp32-log")]
            println!(
                "[StageManager.add_effect] device {:?} is not managed",
                effect.device()
            );
            return Err(effect);
        };
        if device.pixel_count != effect.num_leds() {
            #[cfg(feature = "esp32-log")]
            println!(
                "[StageManager.add_effect] effect sized {} for device {:?} with {} pixels",
                effect.num_leds(),
                device.id(),
                device.pixel_count
            );
            return Err(effect);
        }
        device.effects.push(effect);
        Ok(())
    }

    /// Remove every effect from one device.
    pub fn clear_effects(&mut self, id: DeviceId) {
        if let Some(device) = self.device_mut(id) {
            device.effects.clear();
        }
    }

    /// Remove every effect from every device.
    pub fn clear_all(&mut self) {
        for device in &mut self.devices {
            device.effects.clear();
        }
    }

    /// Effects currently active on a device (empty for unknown ids).
    pub fn effects(&self, id: DeviceId) -> &[Effect<'a>] {
        match self.devices.iter().find(|device| device.id() == id) {
            Some(device) => &device.effects,
            None => &[],
        }
    }

    /// True once a device has no active effects left.
    pub fn is_idle(&self, id: DeviceId) -> bool {
        self.effects(id).is_empty()
    }

    /// Run one full compute-then-commit cycle.
    ///
    /// Phase one recomputes every device's canvas: reset to black, then
    /// each effect paints over it in list order, and finished effects
    /// are evicted after painting their final frame. Phase two pushes
    /// all canvases to hardware in one tight pass.
    pub fn tick(&mut self, now: Instant) {
        for device in &mut self.devices {
            device.canvas.fill(BLACK);

            let canvas = &mut device.canvas;
            device.effects.retain_mut(|effect| {
                canvas.copy_from_slice(effect.render(now));
                !effect.is_finished()
            });
        }

        for device in &mut self.devices {
            device.driver.write(&device.canvas);
        }
    }

    /// Clear all effects, blank every canvas and push the blank frames.
    ///
    /// The external driver loop calls this on shutdown so the hardware
    /// is left dark.
    pub fn blackout(&mut self) {
        for device in &mut self.devices {
            device.effects.clear();
            device.canvas.fill(BLACK);
            device.driver.write(&device.canvas);
        }
    }
}
