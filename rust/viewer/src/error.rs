// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the viewer
///
/// Geometry problems inside a scene are never returned from composition;
/// they are logged and the element is skipped. These errors cover the
/// outward-facing operations only.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Payload(#[from] massing_lite_core::Error),

    #[error(transparent)]
    Geometry(#[from] massing_lite_geometry::Error),

    #[error("No render surface attached")]
    NoSurface,

    #[error("Render surface is empty ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    PixelBufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
