//! Static level data keyed by energy state
//!
//! Layouts and palettes never change at runtime; lookups are pure.

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;
use super::state::{Bounds, Enemy, EnergyState, Orb};

/// Where an orb spawns when its layout becomes active
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbSeed {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl OrbSeed {
    const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }
}

/// One energy state's level geometry
#[derive(Debug, Serialize)]
pub struct Layout {
    /// Landing order after the ground strip
    pub platforms: &'static [Rect],
    pub hazards: &'static [Rect],
    pub orbs: &'static [OrbSeed],
}

static LOW_LAYOUT: Layout = Layout {
    platforms: &[
        Rect::new(80.0, 280.0, 200.0, 16.0),
        Rect::new(360.0, 220.0, 160.0, 16.0),
        Rect::new(580.0, 300.0, 160.0, 16.0),
    ],
    hazards: &[Rect::new(300.0, 368.0, 120.0, 18.0)],
    orbs: &[
        OrbSeed::new(180.0, 240.0, 12.0),
        OrbSeed::new(440.0, 180.0, 12.0),
        OrbSeed::new(640.0, 260.0, 12.0),
    ],
};

static HIGH_LAYOUT: Layout = Layout {
    platforms: &[
        Rect::new(120.0, 250.0, 170.0, 16.0),
        Rect::new(330.0, 190.0, 140.0, 16.0),
        Rect::new(520.0, 260.0, 200.0, 16.0),
    ],
    hazards: &[
        Rect::new(160.0, 368.0, 100.0, 18.0),
        Rect::new(470.0, 368.0, 130.0, 18.0),
    ],
    orbs: &[
        OrbSeed::new(210.0, 210.0, 12.0),
        OrbSeed::new(400.0, 150.0, 12.0),
        OrbSeed::new(610.0, 220.0, 12.0),
    ],
};

/// Layout for an energy state
pub fn layout(energy_state: EnergyState) -> &'static Layout {
    match energy_state {
        EnergyState::Low => &LOW_LAYOUT,
        EnergyState::High => &HIGH_LAYOUT,
    }
}

/// Fresh, uncollected orbs for an energy state
pub fn orbs_for(energy_state: EnergyState) -> Vec<Orb> {
    layout(energy_state)
        .orbs
        .iter()
        .map(|seed| Orb {
            pos: Vec2::new(seed.x, seed.y),
            radius: seed.radius,
            collected: false,
        })
        .collect()
}

/// The wraith roster every run starts with
pub fn starting_enemies() -> Vec<Enemy> {
    vec![
        Enemy::new(240.0, 355.0, 14.0, 80.0, (180.0, 300.0)),
        Enemy::new(540.0, 335.0, 16.0, -90.0, (520.0, 680.0)),
    ]
}

/// The implicit ground platform spanning the bottom of the world
pub fn ground_rect(bounds: &Bounds, ground_height: f32) -> Rect {
    Rect::new(
        0.0,
        bounds.height - ground_height,
        bounds.width,
        ground_height,
    )
}

/// A 24-bit sRGB colour, e.g. `Color(0x0b1f2a)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color(pub u32);

impl Color {
    /// CSS hex notation (`#0b1f2a`)
    pub fn css(self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }

    /// Linear RGBA for an sRGB render target
    pub fn to_linear(self, alpha: f32) -> [f32; 4] {
        let channel = |shift: u32| srgb_to_linear(((self.0 >> shift) & 0xff) as f32 / 255.0);
        [channel(16), channel(8), channel(0), alpha]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Per-state colour scheme
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Palette {
    pub background: Color,
    pub glow: Color,
    pub orb: Color,
    pub platform: Color,
    pub hazard: Color,
}

static LOW_PALETTE: Palette = Palette {
    background: Color(0x0b1f2a),
    glow: Color(0x2bbbad),
    orb: Color(0xe0f7fa),
    platform: Color(0x133141),
    hazard: Color(0x2b4a5a),
};

static HIGH_PALETTE: Palette = Palette {
    background: Color(0x2d0922),
    glow: Color(0xff4d6d),
    orb: Color(0xffe66d),
    platform: Color(0x4b1632),
    hazard: Color(0x6b1f3f),
};

/// Palette for an energy state
pub fn palette(energy_state: EnergyState) -> &'static Palette {
    match energy_state {
        EnergyState::Low => &LOW_PALETTE,
        EnergyState::High => &HIGH_PALETTE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_differ_per_state() {
        let low = layout(EnergyState::Low);
        let high = layout(EnergyState::High);
        assert_eq!(low.hazards.len(), 1);
        assert_eq!(high.hazards.len(), 2);
        assert_ne!(low.platforms[0], high.platforms[0]);
        assert_eq!(low.orbs.len(), 3);
        assert_eq!(high.orbs.len(), 3);
    }

    #[test]
    fn test_orbs_for_starts_uncollected() {
        let orbs = orbs_for(EnergyState::High);
        assert_eq!(orbs.len(), 3);
        assert!(orbs.iter().all(|o| !o.collected));
        assert_eq!(orbs[1].pos, Vec2::new(400.0, 150.0));
    }

    #[test]
    fn test_ground_rect_tracks_bounds() {
        let ground = ground_rect(
            &Bounds {
                width: 1024.0,
                height: 600.0,
            },
            40.0,
        );
        assert_eq!(ground, Rect::new(0.0, 560.0, 1024.0, 40.0));
    }

    #[test]
    fn test_color_conversions() {
        assert_eq!(Color(0x0b1f2a).css(), "#0b1f2a");
        assert_eq!(Color(0xffffff).to_linear(1.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Color(0x000000).to_linear(0.5), [0.0, 0.0, 0.0, 0.5]);
        let mid = Color(0x808080).to_linear(1.0);
        // sRGB 50% grey is roughly 21.6% linear
        assert!((mid[0] - 0.2158).abs() < 0.001);
    }

    #[test]
    fn test_palettes_differ_per_state() {
        assert_ne!(
            palette(EnergyState::Low).background,
            palette(EnergyState::High).background
        );
    }
}
