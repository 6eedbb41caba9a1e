//! トースト通知

use leptos::prelude::*;
use pet_signup_common::{Notice, NoticeLevel};

/// 表示中のトースト
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub notice: Notice,
}

impl Toast {
    pub fn class(&self) -> String {
        format!("toast toast-{}", self.notice.level.as_str())
    }

    pub fn icon(&self) -> &'static str {
        match self.notice.level {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Success => "✔",
            NoticeLevel::Error => "✖",
        }
    }
}

#[component]
pub fn ToastList(toasts: ReadSignal<Vec<Toast>>, set_toasts: WriteSignal<Vec<Toast>>) -> impl IntoView {
    view! {
        <div class="toast-list">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let dismiss = move |_| set_toasts.update(|list| list.retain(|t| t.id != id));
                    let message = toast.notice.message.clone();
                    view! {
                        <div class=toast.class() on:click=dismiss>
                            <span class="toast-icon">{toast.icon()}</span>
                            <div class="toast-body">
                                <strong>{toast.notice.title.clone()}</strong>
                                {(!message.is_empty()).then(|| view! { <p>{message}</p> })}
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}
