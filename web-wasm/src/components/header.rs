//! ヘッダーコンポーネント

use leptos::prelude::*;
use pet_signup_common::SignupStep;

#[component]
pub fn Header(step: Signal<SignupStep>) -> impl IntoView {
    view! {
        <header class="header">
            <h1>"ペットを登録"</h1>
            <p class="step-label">
                {move || {
                    let step = step.get();
                    let label = match step {
                        SignupStep::Photo => "写真を選択",
                        SignupStep::Details => "プロフィールを入力",
                    };
                    format!("Step {}/2 - {}", step.number(), label)
                }}
            </p>
        </header>
    }
}
