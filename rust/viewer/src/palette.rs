// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colors for floor uses and overlays
//!
//! Floor colors match the backend's diagram palette so the interactive view
//! and the PDF report agree.

use massing_lite_core::FloorUse;

/// Linear RGBA in `0.0..=1.0`; alpha doubles as opacity
pub type Rgba = [f32; 4];

pub const COMMERCIAL: u32 = 0x4A90D9;
pub const RESIDENTIAL: u32 = 0xF5E6CC;
pub const COMMUNITY_FACILITY: u32 = 0x6BBF6B;
pub const PARKING: u32 = 0x999999;
pub const CORE: u32 = 0x555555;
pub const MECHANICAL: u32 = 0x777777;
pub const CELLAR: u32 = 0x777777;
pub const MIXED: u32 = 0xD9A84A;
/// Any use the palette does not know
pub const NEUTRAL: u32 = 0xCCCCCC;

pub const ENVELOPE: u32 = 0xD94A4A;
pub const BASE_HEIGHT: u32 = 0x2C5F8A;
pub const SKY_EXPOSURE: u32 = 0xE8A33D;
pub const LOT_FILL: u32 = 0xD9D9D9;
pub const LOT_EDGE: u32 = 0x808080;
pub const YARD: u32 = 0x6BBF6B;
pub const GROUND: u32 = 0xF2F2EE;
pub const WIREFRAME: u32 = 0x000000;
pub const ANNOTATION: u32 = 0x333333;
pub const BUILDABLE: u32 = 0x4A90D9;
pub const HEIGHT_DIMENSION: u32 = 0xD94A4A;
pub const FLOOR_DIMENSION: u32 = 0x888888;
pub const PLAN_DIMENSION: u32 = 0x2C5F8A;

/// Opacity of a floor while highlighted
pub const HIGHLIGHT_OPACITY: f32 = 0.85;
/// Opacity of per-floor edge overlays
pub const WIREFRAME_OPACITY: f32 = 0.15;
/// Emissive tint applied to highlighted floors
pub const HIGHLIGHT_EMISSIVE: Rgba = [0.2, 0.2, 0.2, 1.0];

/// Hex code for a floor use
pub fn use_hex(use_type: &FloorUse) -> u32 {
    match use_type {
        FloorUse::Commercial => COMMERCIAL,
        FloorUse::Residential => RESIDENTIAL,
        FloorUse::CommunityFacility => COMMUNITY_FACILITY,
        FloorUse::Parking => PARKING,
        FloorUse::Core => CORE,
        FloorUse::Mechanical => MECHANICAL,
        FloorUse::Cellar => CELLAR,
        FloorUse::Mixed => MIXED,
        FloorUse::Other(_) => NEUTRAL,
    }
}

/// Opaque color for a floor use
#[inline]
pub fn use_color(use_type: &FloorUse) -> Rgba {
    rgba(use_hex(use_type), 1.0)
}

/// Convert a `0xRRGGBB` code to RGBA with the given alpha
pub fn rgba(hex: u32, alpha: f32) -> Rgba {
    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

/// `#RRGGBB` form of an RGBA color, alpha dropped
pub fn to_hex_string(color: Rgba) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", byte(color[0]), byte(color[1]), byte(color[2]))
}
