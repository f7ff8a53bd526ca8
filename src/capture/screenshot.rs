//! Region capture of the primary display.
//!
//! On Windows the desktop device context is copied with GDI `BitBlt` into a
//! 32-bit DIB and converted from BGRA to RGBA. The game only ships for Windows,
//! so other platforms report capture as unsupported.

use anyhow::{anyhow, Result};
use image::{ImageBuffer, Rgba, RgbaImage};

use super::ScreenSource;
use crate::config::ScreenRegion;

/// Captures regions of the primary display.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopScreen;

impl ScreenSource for DesktopScreen {
    fn grab(&self, region: &ScreenRegion) -> Result<RgbaImage> {
        if region.width == 0 || region.height == 0 {
            return Err(anyhow!(
                "Cannot capture empty region {}x{} at ({}, {})",
                region.width,
                region.height,
                region.left,
                region.top
            ));
        }
        grab_desktop_region(region)
    }
}

/// Converts tightly packed BGRA rows into an RGBA image.
///
/// Alpha is forced to 255 because GDI leaves it undefined for desktop captures.
pub fn bgra_to_rgba(data: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
    let expected = width as usize * height as usize * 4;
    if data.len() < expected {
        return Err(anyhow!(
            "Capture buffer too small: got {} bytes, expected {}",
            data.len(),
            expected
        ));
    }

    let mut img: RgbaImage = ImageBuffer::new(width, height);
    for (pixel, chunk) in img.pixels_mut().zip(data.chunks_exact(4)) {
        *pixel = Rgba([chunk[2], chunk[1], chunk[0], 255]);
    }
    Ok(img)
}

#[cfg(windows)]
fn grab_desktop_region(region: &ScreenRegion) -> Result<RgbaImage> {
    use std::ffi::c_void;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
        GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
        DIB_RGB_COLORS, HGDIOBJ, SRCCOPY,
    };

    let width = region.width as i32;
    let height = region.height as i32;
    let mut buffer = vec![0u8; region.width as usize * region.height as usize * 4];

    unsafe {
        let screen_dc = GetDC(HWND::default());
        if screen_dc.is_invalid() {
            return Err(anyhow!("GetDC failed for the desktop"));
        }
        let mem_dc = CreateCompatibleDC(screen_dc);
        let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
        let previous = SelectObject(mem_dc, HGDIOBJ(bitmap.0));

        let blit = BitBlt(
            mem_dc,
            0,
            0,
            width,
            height,
            screen_dc,
            region.left,
            region.top,
            SRCCOPY,
        );

        // Negative height requests a top-down DIB
        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let lines = if blit.is_ok() {
            GetDIBits(
                mem_dc,
                bitmap,
                0,
                height as u32,
                Some(buffer.as_mut_ptr() as *mut c_void),
                &mut info,
                DIB_RGB_COLORS,
            )
        } else {
            0
        };

        let _ = SelectObject(mem_dc, previous);
        let _ = DeleteObject(HGDIOBJ(bitmap.0));
        let _ = DeleteDC(mem_dc);
        let _ = ReleaseDC(HWND::default(), screen_dc);

        blit.map_err(|e| anyhow!("BitBlt failed: {}", e))?;
        if lines != height {
            return Err(anyhow!(
                "GetDIBits copied {} of {} lines",
                lines,
                height
            ));
        }
    }

    bgra_to_rgba(&buffer, region.width, region.height)
}

#[cfg(not(windows))]
fn grab_desktop_region(_region: &ScreenRegion) -> Result<RgbaImage> {
    Err(anyhow!("Screen capture is only supported on Windows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_to_rgba() {
        let data = [10, 20, 30, 0, 1, 2, 3, 7];
        let img = bgra_to_rgba(&data, 2, 1).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([30, 20, 10, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([3, 2, 1, 255]));
    }

    #[test]
    fn test_bgra_to_rgba_short_buffer() {
        assert!(bgra_to_rgba(&[0; 7], 2, 1).is_err());
    }

    #[test]
    fn test_empty_region_rejected() {
        let region = ScreenRegion::new(0, 0, 0, 10);
        assert!(DesktopScreen.grab(&region).is_err());
    }
}
