//! Core value types for the rasterizer

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Apply shading (multiply RGB by intensity 0.0-1.0)
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Pack into one u32, RGBA byte order (R in the high byte)
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
    }

    pub fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 24) & 0xFF) as u8,
            g: ((packed >> 16) & 0xFF) as u8,
            b: ((packed >> 8) & 0xFF) as u8,
            a: (packed & 0xFF) as u8,
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A vertex with position, normal, texture coordinate, and optional color
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Option<Color>,
}

impl Vertex {
    pub fn new(pos: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { pos, normal, uv, color: None }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
            color: None,
        }
    }
}

// Component-wise equality over the raw float bits, so a Vertex can key the
// dedup map the mesh loader builds. NaN positions never come out of the
// loader, so bit equality is the right granularity here.
impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        fn bits3(v: Vec3) -> [u32; 3] {
            [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()]
        }
        bits3(self.pos) == bits3(other.pos)
            && bits3(self.normal) == bits3(other.normal)
            && [self.uv.x.to_bits(), self.uv.y.to_bits()]
                == [other.uv.x.to_bits(), other.uv.y.to_bits()]
            && self.color == other.color
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for f in [
            self.pos.x, self.pos.y, self.pos.z,
            self.normal.x, self.normal.y, self.normal.z,
            self.uv.x, self.uv.y,
        ] {
            f.to_bits().hash(state);
        }
        self.color.map(Color::to_u32).hash(state);
    }
}

/// A screen-space primitive, for heterogeneous primitive lists.
///
/// Positions are screen-space points (x, y in pixels, z = depth); the
/// optional colors are per-vertex.
#[derive(Debug, Clone, Copy)]
pub enum Primitive {
    Line {
        points: [Vec3; 2],
        colors: Option<[Color; 2]>,
    },
    Triangle {
        points: [Vec3; 3],
        colors: Option<[Color; 3]>,
    },
}
