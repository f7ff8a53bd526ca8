use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma, RgbaImage};

/// Converts an RGBA image to grayscale.
///
/// Uses the ITU-R BT.601 luma formula: Y = 0.299*R + 0.587*G + 0.114*B,
/// the same weights the lobby detector thresholds against.
pub fn to_grayscale(img: &RgbaImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let r = pixel[0] as f32;
        let g = pixel[1] as f32;
        let b = pixel[2] as f32;
        let luma = (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0);
        output.put_pixel(x, y, Luma([luma as u8]));
    }

    output
}

/// Counts pixels strictly brighter than `threshold`.
pub fn count_bright_pixels(img: &GrayImage, threshold: u8) -> u32 {
    img.pixels().filter(|p| p[0] > threshold).count() as u32
}

/// Prepares a captured name region for Tesseract.
///
/// The lobby renders names as light text on a dark banner; Tesseract does best
/// with dark text on a light background at roughly 30px glyph height, so the
/// grayscale image is optionally inverted and upscaled by `scale`.
pub fn prepare_for_ocr(img: &RgbaImage, invert: bool, scale: u32) -> GrayImage {
    let mut gray = to_grayscale(img);

    if invert {
        imageops::invert(&mut gray);
    }

    if scale > 1 {
        let (w, h) = gray.dimensions();
        gray = imageops::resize(&gray, w * scale, h * scale, FilterType::CatmullRom);
    }

    gray
}
