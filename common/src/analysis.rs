//! 画像解析結果
//!
//! 解析サービスのレスポンスは不透明なJSONとして保持し、
//! エラーマーカーの有無とフォーム補完に使う項目だけを読み取る。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 解析サービスが返した解析結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetAnalysis(Value);

impl PetAnalysis {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// 解析結果に埋め込まれたエラーメッセージ
    ///
    /// トップレベルの "error" が空でなければエラー扱い
    /// （null, false, 空文字, 0, 空配列はエラーなし）
    pub fn error_marker(&self) -> Option<String> {
        let value = self.0.as_object()?.get("error")?;
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Array(items) if items.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => Some(
                get_string(map, "message").unwrap_or_else(|| value.to_string()),
            ),
            other => Some(other.to_string()),
        }
    }

    /// フォーム補完用の項目を取得
    ///
    /// いずれかのキー名で見つかった最初の値を文字列で返す
    pub fn field(&self, keys: &[&str]) -> Option<String> {
        let map = self.0.as_object()?;
        keys.iter()
            .filter_map(|key| get_string(map, key))
            .find(|s| !s.trim().is_empty())
    }
}

/// 解析サービスの応答
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisReply {
    /// 解析結果（埋め込みエラーを含む場合がある）
    Analysis(PetAnalysis),
    /// サービスが返したエラー
    Rejected(String),
}

fn get_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    let value = map.get(key)?;
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    if value.is_null() {
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_marker_absent() {
        let analysis = PetAnalysis::new(json!({"breed": "Shiba Inu"}));
        assert_eq!(analysis.error_marker(), None);
    }

    #[test]
    fn test_error_marker_null_is_not_error() {
        let analysis = PetAnalysis::new(json!({"breed": "Shiba Inu", "error": null}));
        assert_eq!(analysis.error_marker(), None);
    }

    #[test]
    fn test_error_marker_empty_values_are_not_errors() {
        for empty in [json!(""), json!("  "), json!(0), json!(0.0), json!([]), json!(false)] {
            let analysis = PetAnalysis::new(json!({"breed": "Shiba Inu", "error": empty.clone()}));
            assert_eq!(analysis.error_marker(), None, "error: {}", empty);
        }
    }

    #[test]
    fn test_error_marker_non_empty_values() {
        let analysis = PetAnalysis::new(json!({"error": 500}));
        assert_eq!(analysis.error_marker().as_deref(), Some("500"));

        let analysis = PetAnalysis::new(json!({"error": ["blurry"]}));
        assert_eq!(analysis.error_marker().as_deref(), Some(r#"["blurry"]"#));

        let analysis = PetAnalysis::new(json!({"error": true}));
        assert_eq!(analysis.error_marker().as_deref(), Some("true"));
    }

    #[test]
    fn test_error_marker_string() {
        let analysis = PetAnalysis::new(json!({"error": "No pet detected"}));
        assert_eq!(analysis.error_marker().as_deref(), Some("No pet detected"));
    }

    #[test]
    fn test_error_marker_object_with_message() {
        let analysis = PetAnalysis::new(json!({"error": {"code": 400, "message": "bad image"}}));
        assert_eq!(analysis.error_marker().as_deref(), Some("bad image"));
    }

    #[test]
    fn test_error_marker_non_object_payload() {
        let analysis = PetAnalysis::new(json!(["not", "an", "object"]));
        assert_eq!(analysis.error_marker(), None);
    }

    #[test]
    fn test_field_aliases_and_numbers() {
        let analysis = PetAnalysis::new(json!({
            "estimatedAge": 3,
            "weight": "",
            "estimatedWeight": "12kg",
            "breed": null
        }));

        assert_eq!(analysis.field(&["age", "estimatedAge"]).as_deref(), Some("3"));
        assert_eq!(analysis.field(&["weight", "estimatedWeight"]).as_deref(), Some("12kg"));
        assert_eq!(analysis.field(&["breed"]), None);
    }

    #[test]
    fn test_transparent_serialize() {
        let analysis = PetAnalysis::new(json!({"breed": "Corgi"}));
        let json = serde_json::to_string(&analysis).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"breed":"Corgi"}"#);
    }
}
