//! Surface materials for sphere nodes.

/// Linear RGB colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::rgb(self.r * factor, self.g * factor, self.b * factor)
    }
}

/// Which faces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blending {
    Opaque,
    Additive,
}

/// How a sphere is shaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Flat colour, ignores lights.
    Basic { color: Color },
    /// Lit by scene lights, with optional surface, bump and displacement maps
    /// and a constant emissive term.
    Standard {
        color: Color,
        map: Option<String>,
        bump_map: Option<String>,
        bump_scale: f32,
        displacement_map: Option<String>,
        displacement_scale: f32,
        emissive: Color,
        emissive_intensity: f32,
    },
    /// Self-lit surface, e.g. the sun in the full system.
    Emissive {
        color: Color,
        map: Option<String>,
        intensity: f32,
    },
    /// Translucent shell drawn from the inside and added onto what is behind it.
    Glow {
        color: Color,
        opacity: f32,
        side: Side,
        blending: Blending,
    },
}

impl Material {
    /// A lit material with only a surface map.
    pub fn textured(map: impl Into<String>) -> Self {
        Self::Standard {
            color: Color::WHITE,
            map: Some(map.into()),
            bump_map: None,
            bump_scale: 0.0,
            displacement_map: None,
            displacement_scale: 0.0,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
        }
    }

    /// Texture file names referenced by this material, deduplicated.
    pub fn texture_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match self {
            Self::Basic { .. } | Self::Glow { .. } => Vec::new(),
            Self::Standard {
                map,
                bump_map,
                displacement_map,
                ..
            } => [map, bump_map, displacement_map]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect(),
            Self::Emissive { map, .. } => map.iter().map(String::as_str).collect(),
        };
        names.dedup();
        names
    }

    pub fn is_lit(&self) -> bool {
        matches!(self, Self::Standard { .. })
    }

    pub fn blending(&self) -> Blending {
        match self {
            Self::Glow { blending, .. } => *blending,
            _ => Blending::Opaque,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Self::Glow { side, .. } => *side,
            _ => Side::Front,
        }
    }
}
