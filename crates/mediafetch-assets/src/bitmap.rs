//! Bitmap decoding.

use mediafetch_core::profiling::profile_function;

use crate::error::DecodeError;

/// A decoded image in RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wrap RGBA8 pixels. Fails if the buffer size does not match.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(DecodeError::new(format!(
                "Pixel buffer is {} bytes, expected {} for {}x{}",
                pixels.len(),
                expected,
                width,
                height
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels; the native display size.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA8 pixels, row major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA value at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Turns encoded image bytes into a [`Bitmap`].
pub trait BitmapDecoder: Send + Sync {
    /// Decode `bytes`.
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, DecodeError>;
}

/// Decoder backed by the `image` crate (PNG and JPEG).
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl BitmapDecoder for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, DecodeError> {
        profile_function!();

        let format = image::guess_format(bytes)?;
        let decoded = image::load_from_memory_with_format(bytes, format)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        tracing::trace!("Decoded {:?} image {}x{}", format, width, height);
        Bitmap::from_rgba8(width, height, rgba.into_raw())
    }
}
