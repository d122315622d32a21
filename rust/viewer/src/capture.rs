// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Still-image capture from the host render surface

use crate::error::{Error, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Handle to the surface the host engine renders into
pub trait RenderSurface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Current frame as tightly packed RGBA8, top row first
    fn read_pixels(&self) -> Vec<u8>;
}

/// Read back the surface and encode it as PNG bytes
pub fn capture_still_image(surface: &dyn RenderSurface) -> Result<Vec<u8>> {
    let (width, height) = surface.size();
    if width == 0 || height == 0 {
        return Err(Error::EmptySurface { width, height });
    }

    let pixels = surface.read_pixels();
    let expected = width as usize * height as usize * 4;
    let actual = pixels.len();
    let size_error = Error::PixelBufferSize {
        width,
        height,
        expected,
        actual,
    };
    if actual != expected {
        return Err(size_error);
    }

    let image = RgbaImage::from_raw(width, height, pixels).ok_or(size_error)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    tracing::debug!(width, height, bytes = bytes.len(), "Captured still image");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Solid {
        width: u32,
        height: u32,
        pixel: [u8; 4],
    }

    impl RenderSurface for Solid {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn read_pixels(&self) -> Vec<u8> {
            self.pixel.repeat((self.width * self.height) as usize)
        }
    }

    #[test]
    fn test_png_round_trip() {
        let surface = Solid {
            width: 4,
            height: 3,
            pixel: [74, 144, 217, 255],
        };
        let png = capture_still_image(&surface).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(3, 2).0, [74, 144, 217, 255]);
    }

    #[test]
    fn test_short_buffer_rejected() {
        struct Short;
        impl RenderSurface for Short {
            fn size(&self) -> (u32, u32) {
                (2, 2)
            }
            fn read_pixels(&self) -> Vec<u8> {
                vec![0; 15]
            }
        }
        assert!(matches!(
            capture_still_image(&Short),
            Err(Error::PixelBufferSize {
                expected: 16,
                actual: 15,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_surface() {
        let surface = Solid {
            width: 0,
            height: 10,
            pixel: [0; 4],
        };
        assert!(matches!(
            capture_still_image(&surface),
            Err(Error::EmptySurface { .. })
        ));
    }
}
