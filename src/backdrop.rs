//! Dot-matrix reveal effect evaluated on the CPU.
//!
//! Each grid cell gets a pseudo-random brightness and a reveal delay. The
//! intro lights cells from the centre outwards; the outro switches them off
//! from the edges inwards. [`DotMatrix::render`] turns one instant of the
//! effect into a text frame for the terminal login; [`LayerClock`] tracks how
//! long each layer has been mounted.

use crate::flow::Backdrop;
use std::time::Instant;

const PHI: f32 = 1.618_034;
/// Brightness table, indexed by the per-cell random value.
pub const DEFAULT_OPACITIES: [f32; 10] = [0.3, 0.3, 0.3, 0.5, 0.5, 0.5, 0.8, 0.8, 0.8, 1.0];
pub const ANIMATION_SPEED: f32 = 0.5;
/// Seconds between brightness reshuffles.
const FREQUENCY: f32 = 5.0;
const GLYPHS: [char; 5] = [' ', '.', ':', '*', '#'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Intro,
    Outro,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DotMatrix {
    opacities: [f32; 10],
    speed: f32,
}

impl Default for DotMatrix {
    fn default() -> Self {
        Self {
            opacities: DEFAULT_OPACITIES,
            speed: ANIMATION_SPEED,
        }
    }
}

fn fract(value: f32) -> f32 {
    value - value.floor()
}

/// Hash of a grid position into `[0, 1)`.
fn random(x: f32, y: f32) -> f32 {
    let dx = x * PHI - x;
    let dy = y * PHI - y;
    let value = fract(((dx * dx + dy * dy).sqrt() * 0.5).tan() * x);
    // Rounding can push tiny negative products up to exactly 1.0.
    if value.is_finite() && value < 1.0 {
        value
    } else {
        0.0
    }
}

impl DotMatrix {
    #[must_use]
    pub fn new(opacities: [f32; 10], speed: f32) -> Self {
        Self { opacities, speed }
    }

    /// Seconds (in effect time) before the cell at `(x, y)` changes state.
    #[must_use]
    pub fn offset(&self, layer: Layer, x: f32, y: f32, cols: usize, rows: usize) -> f32 {
        let cx = cols as f32 / 2.0;
        let cy = rows as f32 / 2.0;
        let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        match layer {
            Layer::Intro => dist * 0.01 + random(x, y) * 0.15,
            Layer::Outro => {
                let max_dist = (cx * cx + cy * cy).sqrt();
                (max_dist - dist) * 0.02 + random(x + 42.0, y + 42.0) * 0.2
            }
        }
    }

    /// Opacity of one cell at time `t` seconds after the layer was mounted.
    #[must_use]
    pub fn opacity(&self, layer: Layer, x: usize, y: usize, cols: usize, rows: usize, t: f32) -> f32 {
        let (xf, yf) = (x as f32, y as f32);
        let show_offset = random(xf, yf);
        let bucket = ((t / FREQUENCY) + show_offset + FREQUENCY).floor();
        let rand = random(xf * bucket, yf * bucket);
        let index = ((rand * 10.0) as usize).min(self.opacities.len() - 1);
        let base = self.opacities[index];

        let offset = self.offset(layer, xf, yf, cols, rows);
        let now = t * self.speed;
        match layer {
            Layer::Intro if now < offset => 0.0,
            // Freshly revealed cells flash slightly brighter.
            Layer::Intro if now < offset + 0.1 => base * 1.25,
            Layer::Intro => base,
            // The flash only applies after a cell is already off.
            Layer::Outro if now < offset => base,
            Layer::Outro => 0.0,
        }
    }

    /// Render `layers`, each at its own time since mount, as `rows` lines of
    /// `cols` characters. Overlapping layers keep the brighter cell.
    #[must_use]
    pub fn render(&self, cols: usize, rows: usize, layers: &[(Layer, f32)]) -> String {
        let brightest = self.opacities.iter().copied().fold(0.0_f32, f32::max) * 1.25;
        let mut frame = String::with_capacity((cols + 1) * rows);
        for y in 0..rows {
            for x in 0..cols {
                let value = layers
                    .iter()
                    .map(|(layer, t)| self.opacity(*layer, x, y, cols, rows, *t))
                    .fold(0.0_f32, f32::max);
                frame.push(glyph(value, brightest));
            }
            frame.push('\n');
        }
        frame
    }
}

/// Mount instants of the two layers. A layer's clock starts when a backdrop
/// first shows it and is dropped when it is unmounted.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayerClock {
    intro: Option<Instant>,
    outro: Option<Instant>,
}

impl LayerClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount or unmount layers for `backdrop` and return the visible layers
    /// with their seconds since mount.
    pub fn tick(&mut self, backdrop: Backdrop, now: Instant) -> Vec<(Layer, f32)> {
        let mut layers = Vec::with_capacity(2);
        for (layer, visible, mounted) in [
            (Layer::Intro, backdrop.initial_visible(), &mut self.intro),
            (Layer::Outro, backdrop.reverse_visible(), &mut self.outro),
        ] {
            if visible {
                let since = *mounted.get_or_insert(now);
                layers.push((layer, now.saturating_duration_since(since).as_secs_f32()));
            } else {
                *mounted = None;
            }
        }
        layers
    }
}

fn glyph(value: f32, brightest: f32) -> char {
    if value <= 0.0 || brightest <= 0.0 {
        return GLYPHS[0];
    }
    let steps = GLYPHS.len() - 1;
    let level = ((value / brightest) * steps as f32).ceil() as usize;
    GLYPHS[level.clamp(1, steps)]
}
