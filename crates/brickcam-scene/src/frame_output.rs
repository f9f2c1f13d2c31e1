//! Writing rendered frames to image files.

use std::path::Path;

use brickcam_core::{CaptureError, Result};
use image::{ImageBuffer, Rgba};

use crate::collaborators::RenderedFrame;

fn to_image(frame: &RenderedFrame) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>> {
    ImageBuffer::from_raw(frame.width, frame.height, frame.rgba.clone()).ok_or_else(|| {
        CaptureError::Image(format!(
            "frame buffer of {} bytes does not match {}x{} RGBA",
            frame.rgba.len(),
            frame.width,
            frame.height
        ))
    })
}

/// Saves the color buffer of `frame` as a PNG file.
///
/// # Errors
/// Returns an error if the buffer size is wrong, the extension is not `.png`,
/// or the file cannot be written.
pub fn save_png(path: &Path, frame: &RenderedFrame) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if extension != "png" {
        return Err(CaptureError::Image(format!(
            "unsupported image format: {extension:?}"
        )));
    }

    let img = to_image(frame)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| CaptureError::Image(format!("failed to save {}: {e}", path.display())))?;

    log::info!("saved render to {}", path.display());
    Ok(())
}

/// Encodes the color buffer of `frame` as PNG bytes in memory.
pub fn encode_png(frame: &RenderedFrame) -> Result<Vec<u8>> {
    let img = to_image(frame)?;
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| CaptureError::Image(format!("PNG encoding failed: {e}")))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(size: u32) -> RenderedFrame {
        let rgba = (0..size * size)
            .flat_map(|i| {
                let v = if i % 2 == 0 { 255 } else { 0 };
                [v, v, v, 255]
            })
            .collect();
        RenderedFrame {
            width: size,
            height: size,
            rgba,
            ..RenderedFrame::default()
        }
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&checker(4)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_wrong_buffer_size() {
        let mut frame = checker(4);
        frame.rgba.pop();
        assert!(matches!(encode_png(&frame), Err(CaptureError::Image(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = save_png(Path::new("render.bmp"), &checker(2));
        assert!(matches!(result, Err(CaptureError::Image(_))));
    }

    #[test]
    fn test_save_png_roundtrip_size() {
        let dir = std::env::temp_dir().join(format!("brickcam-png-{}", std::process::id()));
        let path = dir.join("frames").join("render.png");
        save_png(&path, &checker(8)).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (8, 8));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
