//! Data URLユーティリティ
//!
//! 選択画像のプレビューは "data:image/jpeg;base64,..." 形式で保持し、
//! 解析サービスへもこの形式のまま送信する。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// MIMEタイプとバイト列からData URLを生成
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
///
/// # Returns
/// Base64エンコードされたデータ部分、または抽出失敗時はNone
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出
///
/// 抽出失敗時は"image/jpeg"をデフォルトとして返す
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .split(':')
        .nth(1)
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty() && !s.contains(','))
        .unwrap_or("image/jpeg")
}

/// Data URLをデコードしてバイト列を返す
pub fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let payload = extract_base64_from_data_url(data_url)?;
    STANDARD.decode(payload).ok()
}

/// MIMEタイプに対応するファイル拡張子
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}
