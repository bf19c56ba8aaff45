//! Boundary to the QR encoder. The encoding algorithm itself lives in
//! the `qirust` crate; this module only picks the error-correction
//! level and rasterizes the module matrix to a grayscale image.

use image::{GrayImage, ImageBuffer, Luma};
use qirust::qrcode::{DataTooLong, QrCode, QrCodeEcc, Version};
use thiserror::Error;

/// Quiet zone around the symbol, in modules, as required for reliable
/// scanning.
const QUIET_ZONE: u32 = 4;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("payload too large for QR encoding: {0}")]
    PayloadTooLarge(DataTooLong),
}

/// How much damage to the printed or displayed symbol the decoder can
/// tolerate. Batch runs default to `High`: the codes are meant to be
/// scanned off paper or a secondary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EccLevel {
    Low,
    Medium,
    Quartile,
    #[default]
    High,
}

impl From<EccLevel> for QrCodeEcc {
    fn from(level: EccLevel) -> Self {
        match level {
            EccLevel::Low => QrCodeEcc::Low,
            EccLevel::Medium => QrCodeEcc::Medium,
            EccLevel::Quartile => QrCodeEcc::Quartile,
            EccLevel::High => QrCodeEcc::High,
        }
    }
}

/// Encode `text` and render it as a black-on-white image, `scale`
/// pixels per module with a standard quiet zone on all sides.
pub fn render_qr_image(text: &str, ecc: EccLevel, scale: u32) -> Result<GrayImage, QrError> {
    let mut outbuffer = vec![0u8; Version::MAX.buffer_len()];
    let mut tempbuffer = vec![0u8; Version::MAX.buffer_len()];
    let qr = QrCode::encode_text(
        text,
        &mut tempbuffer,
        &mut outbuffer,
        ecc.into(),
        Version::MIN,
        Version::MAX,
        None,
        true,
    )
    .map_err(QrError::PayloadTooLarge)?;

    let scale = scale.max(1);
    let side = (qr.size() as u32 + 2 * QUIET_ZONE) * scale;
    let img: GrayImage = ImageBuffer::from_fn(side, side, |x, y| {
        let module_x = (x / scale) as i32 - QUIET_ZONE as i32;
        let module_y = (y / scale) as i32 - QUIET_ZONE as i32;
        if qr.get_module(module_x, module_y) {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_is_square_with_quiet_zone() {
        let img = render_qr_image("BEGIN:VCARD", EccLevel::High, 1).unwrap();
        let (w, h) = img.dimensions();
        assert_eq!(w, h);
        // Smallest symbol is 21 modules plus 4 modules of border per side.
        assert!(w >= 21 + 2 * QUIET_ZONE);
    }

    #[test]
    fn scale_multiplies_dimensions() {
        let base = render_qr_image("hello", EccLevel::Medium, 1).unwrap();
        let scaled = render_qr_image("hello", EccLevel::Medium, 3).unwrap();
        assert_eq!(scaled.dimensions().0, base.dimensions().0 * 3);
    }

    #[test]
    fn corner_pixels_are_background() {
        let img = render_qr_image("hello", EccLevel::Low, 2).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Luma([255u8]));
    }

    #[test]
    fn deterministic_for_same_input() {
        let a = render_qr_image("FN:Ada Lovelace", EccLevel::High, 2).unwrap();
        let b = render_qr_image("FN:Ada Lovelace", EccLevel::High, 2).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let huge = "x".repeat(8000);
        assert!(matches!(
            render_qr_image(&huge, EccLevel::High, 1),
            Err(QrError::PayloadTooLarge(_))
        ));
    }
}
