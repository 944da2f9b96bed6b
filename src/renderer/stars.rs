//! Parallax starfield
//!
//! Pure decoration owned by the front-end. Three layers of stars scroll at
//! fractions of the hazard speed and wrap around a strip twice the field
//! width. Generated once at startup; only the scroll offsets change.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Width of the strip stars wrap around
pub const STAR_STRIP_WIDTH: f32 = FIELD_WIDTH * 2.0;

/// Scroll speed of each layer relative to the hazards (far, mid, near)
pub const LAYER_SPEED_RATIOS: [f32; 3] = [0.2, 0.4, 0.7];

/// A single star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Position on the strip
    pub x: f32,
    pub y: f32,
    /// Side of the square in pixels
    pub size: f32,
    pub color: [f32; 4],
}

/// One depth layer
#[derive(Debug, Clone)]
pub struct StarLayer {
    pub stars: Vec<Star>,
    pub speed_ratio: f32,
    pub offset: f32,
}

/// Three parallax layers, far to near
#[derive(Debug, Clone)]
pub struct Starfield {
    pub layers: Vec<StarLayer>,
}

impl Starfield {
    /// Generate layers with the given star counts (far, mid, near)
    pub fn generate(seed: u64, counts: [usize; 3]) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let layers = counts
            .iter()
            .zip(LAYER_SPEED_RATIOS)
            .enumerate()
            .map(|(depth, (&count, speed_ratio))| StarLayer {
                stars: (0..count).map(|_| random_star(&mut rng, depth)).collect(),
                speed_ratio,
                offset: 0.0,
            })
            .collect();
        Self { layers }
    }

    /// Scroll every layer by its share of `scroll_speed`
    pub fn advance(&mut self, scroll_speed: f32) {
        for layer in &mut self.layers {
            layer.offset = (layer.offset + scroll_speed * layer.speed_ratio) % STAR_STRIP_WIDTH;
        }
    }

    /// Back to the starting scroll position (new run)
    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.offset = 0.0;
        }
    }

    /// Stars currently inside the field, with their on-screen x
    pub fn visible(&self) -> impl Iterator<Item = (f32, &Star)> + '_ {
        self.layers.iter().flat_map(|layer| {
            layer.stars.iter().filter_map(move |star| {
                let x = (star.x - layer.offset).rem_euclid(STAR_STRIP_WIDTH);
                (x <= FIELD_WIDTH).then_some((x, star))
            })
        })
    }
}

/// Far stars are small and dim, near ones larger and brighter
fn random_star(rng: &mut Pcg32, depth: usize) -> Star {
    let x = rng.random_range(0..=STAR_STRIP_WIDTH as u32) as f32;
    let y = rng.random_range(0..=FIELD_HEIGHT as u32) as f32;
    let (size, brightness) = match depth {
        0 => (1.0, rng.random_range(80..=120)),
        1 => (rng.random_range(1..=2) as f32, rng.random_range(120..=180)),
        _ => (rng.random_range(2..=3) as f32, rng.random_range(180..=255)),
    };
    let blue_tint = rng.random_range(0..=20);
    let c = brightness as f32 / 255.0;
    let b = ((brightness + blue_tint) as f32 / 255.0).min(1.0);
    Star {
        x,
        y,
        size,
        color: [c, c, b, 1.0],
    }
}
