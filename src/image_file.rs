//! 画像ファイル読み込み
//!
//! 大きな画像は解析・アップロード前に縮小してJPEGに変換する。

use crate::error::{PetSignupError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use pet_signup_common::SelectedImage;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// 拡張子からMIMEタイプを判定
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 画像ファイルを読み込む
///
/// `max_dimension` を超える画像は縮小する（0なら縮小しない）
pub fn load_image(path: &Path, max_dimension: u32) -> Result<SelectedImage> {
    if !path.is_file() {
        return Err(PetSignupError::FileNotFound(path.display().to_string()));
    }

    let mime_type = mime_type_for(path)
        .ok_or_else(|| PetSignupError::UnsupportedImage(path.display().to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let bytes = std::fs::read(path)?;

    if max_dimension == 0 {
        return Ok(SelectedImage::new(file_name, mime_type, bytes));
    }

    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| PetSignupError::ImageLoad(format!("{}: {}", file_name, e)))?;
    let (width, height) = decoded.dimensions();

    if width <= max_dimension && height <= max_dimension {
        return Ok(SelectedImage::new(file_name, mime_type, bytes));
    }

    let resized = downscale_to_jpeg(&decoded, max_dimension)?;
    debug!(
        %file_name,
        width,
        height,
        original_bytes = bytes.len(),
        resized_bytes = resized.len(),
        "image downscaled"
    );
    Ok(SelectedImage::new(file_name, "image/jpeg", resized))
}

fn downscale_to_jpeg(image: &DynamicImage, max_dimension: u32) -> Result<Vec<u8>> {
    let resized = image.resize(max_dimension, max_dimension, FilterType::Triangle);
    // JPEGはアルファチャンネル非対応
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| PetSignupError::ImageLoad(e.to_string()))?;
    Ok(buffer.into_inner())
}
