use crate::egui_app::state::PreviewImage;
use crate::workflow::FileContent;

/// Longest edge of a decoded preview, in pixels.
pub(crate) const PREVIEW_MAX_SIDE: u32 = 512;

#[derive(Debug)]
pub(crate) struct PreviewJob {
    pub(crate) generation: u64,
    pub(crate) content: FileContent,
}

#[derive(Debug)]
pub(crate) struct PreviewDecodeResult {
    pub(crate) generation: u64,
    pub(crate) result: Result<PreviewImage, String>,
}

pub(crate) fn run_preview_job(job: PreviewJob) -> PreviewDecodeResult {
    let result = job
        .content
        .read()
        .map_err(|err| format!("Failed to read image: {err}"))
        .and_then(|bytes| decode_preview(&bytes));
    PreviewDecodeResult {
        generation: job.generation,
        result,
    }
}

/// Decode `bytes` and shrink the image so neither edge exceeds
/// [`PREVIEW_MAX_SIDE`].
pub(crate) fn decode_preview(bytes: &[u8]) -> Result<PreviewImage, String> {
    let image =
        image::load_from_memory(bytes).map_err(|err| format!("Unsupported image: {err}"))?;
    let image = if image.width() > PREVIEW_MAX_SIDE || image.height() > PREVIEW_MAX_SIDE {
        image.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE)
    } else {
        image
    };
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PreviewImage {
        width: width as usize,
        height: height as usize,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;
    use std::sync::Arc;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba([10u8, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        buffer.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn small_images_keep_their_size() {
        let preview = decode_preview(&png_bytes(4, 3)).unwrap();
        assert_eq!((preview.width, preview.height), (4, 3));
        assert_eq!(preview.rgba.len(), 4 * 3 * 4);
        assert_eq!(&preview.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn large_images_are_downscaled() {
        let preview = decode_preview(&png_bytes(1024, 256)).unwrap();
        assert_eq!(preview.width, 512);
        assert!(preview.height <= 128 && preview.height > 0);
    }

    #[test]
    fn undecodable_bytes_report_an_error() {
        let err = decode_preview(b"not an image").unwrap_err();
        assert!(err.starts_with("Unsupported image"));
    }

    #[test]
    fn job_carries_generation() {
        let result = run_preview_job(PreviewJob {
            generation: 7,
            content: FileContent::Bytes(Arc::from(png_bytes(2, 2))),
        });
        assert_eq!(result.generation, 7);
        assert!(result.result.is_ok());
    }
}
