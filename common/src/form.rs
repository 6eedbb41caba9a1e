//! プロフィール入力フォーム

use crate::analysis::PetAnalysis;
use crate::types::ProfileRow;
use serde::{Deserialize, Serialize};

/// 未入力のカテゴリ項目に入る値
pub const UNKNOWN: &str = "unknown";

/// プロフィール入力フォーム
///
/// 値の検証は行わない。カテゴリ項目は空欄のまま保存すると "unknown" になる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    pub name: String,
    pub breed: String,
    pub age: String,
    pub weight: String,
    pub gender: String,
    pub size: String,
    pub coat: String,
    pub energy_level: String,
    pub temperament: String,
}

impl ProfileForm {
    /// 解析結果からフォームを補完
    pub fn from_analysis(analysis: &PetAnalysis) -> Self {
        let field = |keys: &[&str]| analysis.field(keys).unwrap_or_default();
        Self {
            name: String::new(),
            breed: field(&["breed", "breedName"]),
            age: field(&["age", "estimatedAge", "estimated_age"]),
            weight: field(&["weight", "estimatedWeight", "estimated_weight"]),
            gender: field(&["gender", "sex"]),
            size: field(&["size"]),
            coat: field(&["coat", "coatType", "coat_type", "color"]),
            energy_level: field(&["energyLevel", "energy_level", "energy"]),
            temperament: field(&["temperament", "personality"]),
        }
    }

    /// `other` の空欄を自分の値で埋めたフォームを返す
    ///
    /// 利用者の入力（other）が補完値より優先される
    pub fn merge_over(&self, other: &ProfileForm) -> ProfileForm {
        let pick = |mine: &str, theirs: &str| {
            if theirs.trim().is_empty() { mine.to_string() } else { theirs.to_string() }
        };
        ProfileForm {
            name: pick(&self.name, &other.name),
            breed: pick(&self.breed, &other.breed),
            age: pick(&self.age, &other.age),
            weight: pick(&self.weight, &other.weight),
            gender: pick(&self.gender, &other.gender),
            size: pick(&self.size, &other.size),
            coat: pick(&self.coat, &other.coat),
            energy_level: pick(&self.energy_level, &other.energy_level),
            temperament: pick(&self.temperament, &other.temperament),
        }
    }

    /// 挿入用の行に変換
    pub fn to_row(
        &self,
        user_id: &str,
        image_url: Option<String>,
        analysis: Option<&PetAnalysis>,
    ) -> ProfileRow {
        ProfileRow {
            user_id: user_id.to_string(),
            name: self.name.clone(),
            breed: self.breed.clone(),
            age: self.age.clone(),
            weight: self.weight.clone(),
            gender: or_unknown(&self.gender),
            size: or_unknown(&self.size),
            coat: or_unknown(&self.coat),
            energy_level: or_unknown(&self.energy_level),
            temperament: or_unknown(&self.temperament),
            image_url,
            analysis: analysis.map(|a| a.as_value().clone()),
        }
    }
}

fn or_unknown(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() { UNKNOWN.to_string() } else { trimmed.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_analysis() {
        let analysis = PetAnalysis::new(json!({
            "breed": "Shiba Inu",
            "estimatedAge": 2,
            "size": "medium",
            "coatType": "double",
            "energyLevel": "high",
            "confidence": 0.93
        }));

        let form = ProfileForm::from_analysis(&analysis);
        assert_eq!(form.name, "");
        assert_eq!(form.breed, "Shiba Inu");
        assert_eq!(form.age, "2");
        assert_eq!(form.size, "medium");
        assert_eq!(form.coat, "double");
        assert_eq!(form.energy_level, "high");
        assert_eq!(form.gender, "");
    }

    #[test]
    fn test_merge_over_prefers_user_input() {
        let prefilled = ProfileForm {
            breed: "Shiba Inu".to_string(),
            age: "2".to_string(),
            ..Default::default()
        };
        let entered = ProfileForm {
            name: "ハチ".to_string(),
            age: "3".to_string(),
            breed: "  ".to_string(),
            ..Default::default()
        };

        let merged = prefilled.merge_over(&entered);
        assert_eq!(merged.name, "ハチ");
        assert_eq!(merged.breed, "Shiba Inu");
        assert_eq!(merged.age, "3");
    }

    #[test]
    fn test_to_row_defaults_categoricals_to_unknown() {
        let form = ProfileForm {
            name: "Mugi".to_string(),
            gender: "female".to_string(),
            size: " ".to_string(),
            ..Default::default()
        };

        let row = form.to_row("user-1", None, None);
        assert_eq!(row.user_id, "user-1");
        assert_eq!(row.name, "Mugi");
        assert_eq!(row.gender, "female");
        assert_eq!(row.size, UNKNOWN);
        assert_eq!(row.coat, UNKNOWN);
        assert_eq!(row.energy_level, UNKNOWN);
        assert_eq!(row.temperament, UNKNOWN);
        // 自由入力項目はそのまま
        assert_eq!(row.breed, "");
        assert_eq!(row.image_url, None);
        assert_eq!(row.analysis, None);
    }

    #[test]
    fn test_to_row_keeps_image_and_analysis() {
        let analysis = PetAnalysis::new(json!({"breed": "Corgi"}));
        let row = ProfileForm::default().to_row(
            "user-2",
            Some("https://cdn.example.com/a.jpg".to_string()),
            Some(&analysis),
        );
        assert_eq!(row.image_url.as_deref(), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(row.analysis, Some(json!({"breed": "Corgi"})));
    }

    #[test]
    fn test_form_deserialize_missing_fields() {
        let form: ProfileForm =
            serde_json::from_str(r#"{"name": "Kuro", "energyLevel": "low"}"#).expect("デシリアライズ失敗");
        assert_eq!(form.name, "Kuro");
        assert_eq!(form.energy_level, "low");
        assert_eq!(form.breed, "");
    }
}
