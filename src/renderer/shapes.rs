//! Shape generation for 2D primitives and the game scene
//!
//! Everything is emitted in playfield coordinates (288x512, y down) as a
//! plain triangle list; the pipeline maps it to clip space.

use glam::Vec2;
use std::f32::consts::TAU;

use super::stars::Starfield;
use super::vertex::{Vertex, colors};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::settings::Settings;
use crate::sim::{Craft, HazardPair, Snapshot, Token};

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(x, y, w, h, color, color)
}

/// Rectangle blending from `top` color to `bottom` color
pub fn gradient_rect(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    top: [f32; 4],
    bottom: [f32; 4],
) -> Vec<Vertex> {
    if w <= 0.0 || h <= 0.0 {
        return Vec::new();
    }
    vec![
        Vertex::new(x, y, top),
        Vertex::new(x + w, y, top),
        Vertex::new(x, y + h, bottom),
        Vertex::new(x + w, y, top),
        Vertex::new(x + w, y + h, bottom),
        Vertex::new(x, y + h, bottom),
    ]
}

/// Generate vertices for a single triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, rx: f32, ry: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + rx * theta1.cos(),
            center.y + ry * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + rx * theta2.cos(),
            center.y + ry * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Rotate vertices about `pivot` (positive = clockwise on screen)
fn rotate_about(vertices: &mut [Vertex], pivot: Vec2, angle: f32) {
    let rot = Vec2::from_angle(angle);
    for v in vertices {
        let p = Vec2::from(v.position) - pivot;
        let r = pivot + rot.rotate(p);
        v.position = [r.x, r.y];
    }
}

/// Scale an RGB color, keeping alpha
fn shade(r: f32, g: f32, b: f32) -> [f32; 4] {
    [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0), 1.0]
}

/// Nose-down tilt in radians for a given vertical velocity
pub fn craft_tilt(vel: f32) -> f32 {
    (vel * 3.0).clamp(-15.0, 15.0).to_radians()
}

/// The player's ship: red hull, blue cockpit and nose, flickering thruster
pub fn craft(craft: &Craft, invincible: bool, settings: &Settings, frame: u64) -> Vec<Vertex> {
    let flashing = invincible && settings.blink_when_invincible() && (frame / 5) % 2 == 0;
    let (body, cockpit) = if flashing {
        (colors::CRAFT_BODY_FLASH, colors::CRAFT_COCKPIT_FLASH)
    } else {
        (colors::CRAFT_BODY, colors::CRAFT_COCKPIT)
    };

    // Ship is laid out on a 40x40 canvas centred on the craft
    let c = craft.pos();
    let at = |x: f32, y: f32| c + Vec2::new(x - 20.0, y - 20.0);

    let mut v = Vec::with_capacity(64);
    let hull = at(8.0, 10.0);
    v.extend(rect(hull.x, hull.y, 20.0, 20.0, body));
    v.extend(ellipse(at(28.0, 20.0), 6.0, 8.0, cockpit, 12));
    v.extend(triangle(at(38.0, 20.0), at(28.0, 8.0), at(28.0, 32.0), cockpit));
    v.extend(triangle(at(12.0, 10.0), at(12.0, 2.0), at(24.0, 10.0), body));
    v.extend(triangle(at(12.0, 30.0), at(12.0, 38.0), at(24.0, 30.0), body));

    let flame_len = 6.0 + (frame % 4) as f32 * 2.0;
    let flame = colors::FLAMES[((frame / 3) % 3) as usize];
    v.extend(triangle(
        at(8.0, 16.0),
        at(8.0 - flame_len, 20.0),
        at(8.0, 24.0),
        flame,
    ));

    rotate_about(&mut v, c, craft_tilt(craft.vel));
    v
}

/// Beam brightness in [0.6, 1.0]; each hazard gets its own phase
pub fn beam_pulse(hazard: &HazardPair, settings: &Settings, frame: u64) -> f32 {
    if !settings.animate_entities() {
        return 1.0;
    }
    let phase = (hazard.gap_top as u64 % 60) as f32;
    ((frame as f32 + phase) * 0.1).sin().abs() * 0.4 + 0.6
}

/// How face-on the coin is, 0 (edge) to 1 (full disc)
pub fn coin_spin(token: &Token, settings: &Settings, frame: u64) -> f32 {
    if !settings.animate_entities() {
        return 1.0;
    }
    let phase = (token.y as u64 % 60) as f32;
    ((frame as f32 + phase) * 0.15).sin().abs()
}

/// Laser beams: dim glow, bright core, emitter at the gap edge
pub fn hazard(hazard: &HazardPair, settings: &Settings, frame: u64) -> Vec<Vertex> {
    let pulse = beam_pulse(hazard, settings, frame);
    let core = shade(pulse, 100.0 / 255.0 * pulse, 20.0 / 255.0);
    let glow = shade(150.0 / 255.0 * pulse, 30.0 / 255.0, 30.0 / 255.0);

    let x = hazard.x;
    let w = hazard.width;
    let top_h = hazard.gap_top;
    let bottom_y = hazard.gap_top + hazard.gap;
    let bottom_h = FIELD_HEIGHT - bottom_y;

    let mut v = Vec::with_capacity(128);
    for (y, h, emitter_y) in [(0.0, top_h, top_h), (bottom_y, bottom_h, bottom_y)] {
        v.extend(rect(x - 4.0, y, w + 8.0, h, glow));
        v.extend(rect(x + 2.0, y, w - 4.0, h, core));
        v.extend(ellipse(
            Vec2::new(x + w / 2.0, emitter_y),
            (w + 12.0) / 2.0,
            10.0,
            colors::EMITTER,
            12,
        ));
    }
    v
}

/// Spinning coin: an ellipse whose width follows a sine wave
pub fn token(token: &Token, settings: &Settings, frame: u64) -> Vec<Vertex> {
    let spin = coin_spin(token, settings, frame);
    let half_width = (token.size * spin).max(2.0);
    let color = shade(1.0, (200.0 + 50.0 * spin) / 255.0, 50.0 / 255.0);
    let center = Vec2::new(token.x, token.y);

    let mut v = ellipse(center, half_width, token.size, color, 16);
    if spin > 0.5 {
        v.extend(ellipse(
            center,
            half_width / 2.0,
            token.size / 2.0,
            colors::COIN_SHINE,
            12,
        ));
    }
    v
}

/// Build the whole frame, back to front
///
/// `frame` is the front-end's own frame counter; it only drives animation.
pub fn build_scene(
    snapshot: &Snapshot<'_>,
    stars: Option<&Starfield>,
    settings: &Settings,
    frame: u64,
) -> Vec<Vertex> {
    let mut v = gradient_rect(
        0.0,
        0.0,
        FIELD_WIDTH,
        FIELD_HEIGHT,
        colors::BACKGROUND,
        colors::BACKGROUND_BOTTOM,
    );

    if let Some(stars) = stars.filter(|_| settings.quality.starfield_enabled()) {
        for (x, star) in stars.visible() {
            v.extend(rect(x, star.y, star.size, star.size, star.color));
        }
    }

    for t in snapshot.tokens {
        v.extend(token(t, settings, frame));
    }
    for h in snapshot.hazards {
        v.extend(hazard(h, settings, frame));
    }
    v.extend(craft(snapshot.craft, snapshot.invincible, settings, frame));
    v
}
