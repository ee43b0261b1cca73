use glam::Vec3;

use crate::texture::TextureId;

/// Linear RGB colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub const WHITE: Color = Color(Vec3::ONE);

    /// Build from a packed sRGB hex value such as `0xff6347`
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self(Vec3::new(channel(16), channel(8), channel(0)))
    }

    pub fn to_vec3(self) -> Vec3 {
        self.0
    }

    pub fn scaled(self, intensity: f32) -> Vec3 {
        self.0 * intensity
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

/// Physically-inspired surface lit by the scene lights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub map: Option<TextureId>,
    pub normal_map: Option<TextureId>,
}

/// Unlit surface showing its colour or texture as-is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
    pub map: Option<TextureId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Basic(BasicMaterial),
}

impl Material {
    pub fn standard(color: Color) -> Self {
        Self::Standard(StandardMaterial {
            color,
            ..Default::default()
        })
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Standard(m) => m.color,
            Self::Basic(m) => m.color,
        }
    }

    pub fn map(&self) -> Option<TextureId> {
        match self {
            Self::Standard(m) => m.map,
            Self::Basic(m) => m.map,
        }
    }

    pub fn normal_map(&self) -> Option<TextureId> {
        match self {
            Self::Standard(m) => m.normal_map,
            Self::Basic(_) => None,
        }
    }

    /// Whether the surface reacts to scene lights
    pub fn is_lit(&self) -> bool {
        matches!(self, Self::Standard(_))
    }
}
