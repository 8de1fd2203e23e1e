//! Image Encoding
//!
//! Data-URL export/import for the drawing surface. Pixels travel as an
//! uncompressed 32-bit BMP wrapped in a base64 data URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::image_data::ImageData;
use crate::CanvasError;

const DATA_URL_PREFIX: &str = "data:image/bmp;base64,";

/// BMP headers: 14-byte file header + 40-byte BITMAPINFOHEADER
const HEADER_LEN: usize = 54;

/// Encode pixels as a `data:image/bmp;base64,...` URL
pub fn to_data_url(image: &ImageData) -> String {
    let width = image.width();
    let height = image.height();
    let pixel_len = (width as usize) * (height as usize) * 4;
    let file_len = HEADER_LEN + pixel_len;

    let mut bmp = Vec::with_capacity(file_len);
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&(file_len as u32).to_le_bytes());
    bmp.extend_from_slice(&[0u8; 4]); // reserved
    bmp.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes());

    bmp.extend_from_slice(&40u32.to_le_bytes());
    bmp.extend_from_slice(&(width as i32).to_le_bytes());
    bmp.extend_from_slice(&(height as i32).to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes()); // planes
    bmp.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
    bmp.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    bmp.extend_from_slice(&(pixel_len as u32).to_le_bytes());
    bmp.extend_from_slice(&[0u8; 16]); // resolution + palette fields

    // rows bottom-up, BGRA
    let data = image.data();
    for row in (0..height).rev() {
        let start = (row * width * 4) as usize;
        for px in 0..width as usize {
            let idx = start + px * 4;
            bmp.push(data[idx + 2]);
            bmp.push(data[idx + 1]);
            bmp.push(data[idx]);
            bmp.push(data[idx + 3]);
        }
    }

    format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(&bmp))
}

/// Decode a data URL produced by [`to_data_url`] back into pixels
pub fn from_data_url(url: &str) -> Result<ImageData, CanvasError> {
    let payload = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| CanvasError::InvalidImage("not a bmp data url".into()))?;
    let bmp = STANDARD
        .decode(payload)
        .map_err(|e| CanvasError::InvalidImage(format!("base64: {e}")))?;

    if bmp.len() < HEADER_LEN || &bmp[0..2] != b"BM" {
        return Err(CanvasError::InvalidImage("truncated bmp header".into()));
    }

    let width = i32::from_le_bytes([bmp[18], bmp[19], bmp[20], bmp[21]]);
    let height = i32::from_le_bytes([bmp[22], bmp[23], bmp[24], bmp[25]]);
    let bpp = u16::from_le_bytes([bmp[28], bmp[29]]);
    if width <= 0 || height <= 0 || bpp != 32 {
        return Err(CanvasError::InvalidImage(format!(
            "unsupported bmp: {width}x{height} at {bpp}bpp"
        )));
    }

    let width = width as u32;
    let height = height as u32;
    let pixel_len = (width as usize) * (height as usize) * 4;
    let pixels = &bmp[HEADER_LEN..];
    if pixels.len() < pixel_len {
        return Err(CanvasError::InvalidImage("truncated bmp pixel data".into()));
    }

    let mut image = ImageData::new(width, height);
    for row in 0..height {
        let src_row = height - 1 - row;
        let start = (src_row * width * 4) as usize;
        for px in 0..width {
            let idx = start + px as usize * 4;
            image.set_pixel(
                px,
                row,
                pixels[idx + 2],
                pixels[idx + 1],
                pixels[idx],
                pixels[idx + 3],
            );
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_round_trip() {
        let mut img = ImageData::new(3, 2);
        img.set_pixel(0, 0, 10, 20, 30, 255);
        img.set_pixel(2, 1, 200, 100, 50, 128);

        let url = to_data_url(&img);
        assert!(url.starts_with("data:image/bmp;base64,"));

        let back = from_data_url(&url).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_rejects_foreign_urls() {
        assert!(from_data_url("data:image/png;base64,AAAA").is_err());
        assert!(from_data_url("plainly not a url").is_err());
    }

    #[test]
    fn test_rejects_corrupt_payload() {
        let url = format!("data:image/bmp;base64,{}", "not!base64!");
        assert!(from_data_url(&url).is_err());
    }
}
