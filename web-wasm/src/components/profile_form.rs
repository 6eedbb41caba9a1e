//! プロフィール入力フォーム

use leptos::prelude::*;
use pet_signup_common::{ProfileForm, UNKNOWN};

/// フォームの項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Breed,
    Age,
    Weight,
    Gender,
    Size,
    Coat,
    EnergyLevel,
    Temperament,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Breed,
        Field::Age,
        Field::Weight,
        Field::Gender,
        Field::Size,
        Field::Coat,
        Field::EnergyLevel,
        Field::Temperament,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "名前",
            Field::Breed => "種類",
            Field::Age => "年齢",
            Field::Weight => "体重",
            Field::Gender => "性別",
            Field::Size => "サイズ",
            Field::Coat => "毛質",
            Field::EnergyLevel => "活発さ",
            Field::Temperament => "性格",
        }
    }

    /// カテゴリ項目の選択肢（自由入力項目はNone）
    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self {
            Field::Gender => Some(&["male", "female"]),
            Field::Size => Some(&["small", "medium", "large"]),
            Field::Coat => Some(&["short", "medium", "long", "double", "hairless"]),
            Field::EnergyLevel => Some(&["low", "medium", "high"]),
            Field::Temperament => Some(&["calm", "friendly", "playful", "shy", "independent"]),
            _ => None,
        }
    }

    pub fn get<'a>(&self, form: &'a ProfileForm) -> &'a str {
        match self {
            Field::Name => &form.name,
            Field::Breed => &form.breed,
            Field::Age => &form.age,
            Field::Weight => &form.weight,
            Field::Gender => &form.gender,
            Field::Size => &form.size,
            Field::Coat => &form.coat,
            Field::EnergyLevel => &form.energy_level,
            Field::Temperament => &form.temperament,
        }
    }

    pub fn set(&self, form: &mut ProfileForm, value: String) {
        let slot = match self {
            Field::Name => &mut form.name,
            Field::Breed => &mut form.breed,
            Field::Age => &mut form.age,
            Field::Weight => &mut form.weight,
            Field::Gender => &mut form.gender,
            Field::Size => &mut form.size,
            Field::Coat => &mut form.coat,
            Field::EnergyLevel => &mut form.energy_level,
            Field::Temperament => &mut form.temperament,
        };
        *slot = value;
    }
}

/// 選択肢一覧。解析結果の値が一覧にない場合は先頭に加える
fn select_options(choices: &[&str], current: &str) -> Vec<String> {
    let mut options: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
    let current = current.trim();
    if !current.is_empty() && current != UNKNOWN && !choices.contains(&current) {
        options.insert(0, current.to_string());
    }
    options
}

#[component]
pub fn ProfileFormView(form: ReadSignal<ProfileForm>, set_form: WriteSignal<ProfileForm>) -> impl IntoView {
    let rows = Field::ALL
        .into_iter()
        .map(|field| {
            let value = move || field.get(&form.get()).to_string();
            let update = move |value: String| set_form.update(|f| field.set(f, value));

            let control = match field.choices() {
                Some(choices) => view! {
                    <select class="form-control" prop:value=value on:change=move |ev| update(event_target_value(&ev))>
                        <option value="">"不明"</option>
                        {move || {
                            select_options(choices, field.get(&form.get()))
                                .into_iter()
                                .map(|choice| view! { <option value=choice.clone()>{choice.clone()}</option> })
                                .collect_view()
                        }}
                    </select>
                }
                .into_any(),
                None => view! {
                    <input
                        type="text"
                        class="form-control"
                        prop:value=value
                        on:input=move |ev| update(event_target_value(&ev))
                    />
                }
                .into_any(),
            };

            view! {
                <label class="form-row">
                    <span class="form-label">{field.label()}</span>
                    {control}
                </label>
            }
        })
        .collect_view();

    view! { <div class="profile-form">{rows}</div> }
}
