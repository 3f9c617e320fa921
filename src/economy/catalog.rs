//! Cosmetic catalog: vehicles and color themes
//!
//! The economy only cares about identifiers and prices. Everything else here
//! (names, descriptions, palettes) is for the garage screen.

use serde::{Deserialize, Serialize};

/// Which catalog table an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    Vehicle,
    Color,
}

impl CatalogKind {
    /// The other table (the garage has exactly two tabs)
    pub fn other(self) -> Self {
        match self {
            CatalogKind::Vehicle => CatalogKind::Color,
            CatalogKind::Color => CatalogKind::Vehicle,
        }
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Convert from HSL (hue in degrees, saturation and lightness in 0-1)
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
        }
    }

    /// `#rrggbb` for canvas fill styles
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Neon palette shared by the game and the default themes
pub mod neon {
    use super::Rgb;

    pub const BLACK: Rgb = Rgb::hex(0x0a0a0f);
    pub const PINK: Rgb = Rgb::hex(0xff00ff);
    pub const CYAN: Rgb = Rgb::hex(0x00ffff);
    pub const BLUE: Rgb = Rgb::hex(0x0096ff);
    pub const RED: Rgb = Rgb::hex(0xff3366);
    pub const ORANGE: Rgb = Rgb::hex(0xff6400);
    pub const GREEN: Rgb = Rgb::hex(0x00ff64);
    pub const YELLOW: Rgb = Rgb::hex(0xffff00);
    pub const WHITE: Rgb = Rgb::hex(0xffffff);
    pub const DARK_GRAY: Rgb = Rgb::hex(0x1e1e28);
}

/// How a color theme paints the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Palette {
    Fixed {
        primary: Rgb,
        secondary: Rgb,
    },
    /// Hue cycles with time; secondary sits opposite on the color wheel
    CyclingHue,
}

impl Palette {
    /// Milliseconds per degree of hue rotation
    const HUE_MS_PER_DEGREE: f64 = 20.0;

    /// Resolve to concrete (primary, secondary) colors at `time_ms`
    pub fn colors_at(&self, time_ms: f64) -> (Rgb, Rgb) {
        match *self {
            Palette::Fixed { primary, secondary } => (primary, secondary),
            Palette::CyclingHue => {
                let hue = ((time_ms / Self::HUE_MS_PER_DEGREE) % 360.0) as f32;
                (
                    Rgb::from_hsl(hue, 1.0, 0.5),
                    Rgb::from_hsl(hue + 180.0, 1.0, 0.5),
                )
            }
        }
    }
}

/// A purchasable cosmetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub display_name: String,
    pub price: u64,
    pub description: String,
    /// Only color themes carry a palette
    pub palette: Option<Palette>,
}

impl CatalogEntry {
    fn new(id: &str, display_name: &str, price: u64, description: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            price,
            description: description.to_string(),
            palette: None,
        }
    }

    fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }
}

/// Source of purchasable cosmetics
pub trait CosmeticProvider {
    /// All entries of a table, in display order
    fn entries(&self, kind: CatalogKind) -> &[CatalogEntry];

    fn entry(&self, kind: CatalogKind, id: &str) -> Option<&CatalogEntry> {
        self.entries(kind).iter().find(|e| e.id == id)
    }
}

/// The stock Neon Drift catalog
#[derive(Debug, Clone)]
pub struct NeonCatalog {
    vehicles: Vec<CatalogEntry>,
    colors: Vec<CatalogEntry>,
}

impl NeonCatalog {
    pub fn new() -> Self {
        use neon::*;

        let fixed = |primary, secondary| Palette::Fixed { primary, secondary };
        Self {
            vehicles: vec![
                CatalogEntry::new("sport", "Sport", 0, "Standard speed"),
                CatalogEntry::new("suv", "SUV", 300, "Tougher build"),
                CatalogEntry::new("moto", "Motorbike", 400, "Nimble"),
                CatalogEntry::new("future", "Future", 600, "Maximum speed"),
                CatalogEntry::new("retro", "Retro", 500, "Classic style"),
            ],
            colors: vec![
                CatalogEntry::new("default", "Default", 0, "Cyan and pink")
                    .with_palette(fixed(CYAN, PINK)),
                CatalogEntry::new("ocean", "Ocean", 100, "Deep blue glow")
                    .with_palette(fixed(BLUE, CYAN)),
                CatalogEntry::new("emerald", "Emerald", 150, "Electric green")
                    .with_palette(fixed(GREEN, CYAN)),
                CatalogEntry::new("fire", "Fire", 200, "Red hot").with_palette(fixed(RED, ORANGE)),
                CatalogEntry::new("gold", "Gold", 250, "Pure shine")
                    .with_palette(fixed(YELLOW, ORANGE)),
                CatalogEntry::new("rainbow", "Rainbow", 500, "Every color at once")
                    .with_palette(Palette::CyclingHue),
            ],
        }
    }
}

impl Default for NeonCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmeticProvider for NeonCatalog {
    fn entries(&self, kind: CatalogKind) -> &[CatalogEntry] {
        match kind {
            CatalogKind::Vehicle => &self.vehicles,
            CatalogKind::Color => &self.colors,
        }
    }
}
