// src/publish/media.rs
use std::{fs, io, path::Path};

use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, GenericImageView};

use crate::error::MediaError;

/// Tried in order until the JPEG fits.
const QUALITY_STEPS: &[u8] = &[85, 75, 65, 55, 40];

pub const JPEG_MIME: &str = "image/jpeg";

/// Upload-ready JPEG.
#[derive(Clone, Debug)]
pub struct Prepared {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode anything `image` understands, shrink to fit `max_dim`, and
/// re-encode as JPEG under `max_bytes`.
pub fn prepare(raw: &[u8], max_dim: u32, max_bytes: usize) -> Result<Prepared, MediaError> {
    let img = image::load_from_memory(raw).map_err(MediaError::Decode)?;
    let img = if img.width() > max_dim || img.height() > max_dim {
        img.resize(max_dim, max_dim, FilterType::Triangle)
    } else {
        img
    };
    let (width, height) = img.dimensions();
    let rgb = img.to_rgb8(); // JPEG has no alpha

    let mut smallest = usize::MAX;
    for &quality in QUALITY_STEPS {
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        rgb.write_with_encoder(encoder).map_err(MediaError::Encode)?;
        logd!("JPEG q{quality}: {} bytes", bytes.len());
        if bytes.len() <= max_bytes {
            return Ok(Prepared { bytes, width, height });
        }
        smallest = smallest.min(bytes.len());
    }
    Err(MediaError::TooLarge { size: smallest, limit: max_bytes })
}

/// Local thumbnail, if the file exists.
pub fn read_thumbnail(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(w, h, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8, 200])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn png_becomes_jpeg_within_bounds() {
        let p = prepare(&png(300, 120), 100, 1_000_000).unwrap();
        assert_eq!(&p.bytes[..2], &[0xFF, 0xD8]);
        assert_eq!((p.width, p.height), (100, 40));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(prepare(b"not an image", 100, 1000), Err(MediaError::Decode(_))));
    }

    #[test]
    fn impossible_budget_is_too_large() {
        assert!(matches!(prepare(&png(64, 64), 100, 10), Err(MediaError::TooLarge { .. })));
    }

    #[test]
    fn missing_thumbnail_is_none() {
        let p = std::env::temp_dir().join("promo_bot_no_such_thumb.jpg");
        assert!(read_thumbnail(&p).unwrap().is_none());
    }
}
