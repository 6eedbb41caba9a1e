//! メインアプリケーションコンポーネント

use std::cell::Cell;
use std::rc::Rc;

use futures::lock::Mutex;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pet_signup_common::{
    AnalyzeOutcome, Credentials, FlowOptions, Navigator, Notice, Notifier, ProfileForm,
    SelectedImage, SignupFlow, SignupServices, SignupState, SignupStep,
};

use crate::api::{BackendConfig, FetchBackend};
use crate::components::{
    analyzing_indicator::AnalyzingIndicator,
    header::Header,
    profile_form::ProfileFormView,
    toast_list::{Toast, ToastList},
    upload_area::UploadArea,
};

/// トーストの表示時間（ミリ秒）
const TOAST_DURATION_MS: u32 = 5_000;

type SharedFlow = Rc<Mutex<SignupFlow>>;

/// 通知をトーストとして表示
struct ToastNotifier {
    set_toasts: WriteSignal<Vec<Toast>>,
    next_id: Cell<u32>,
}

impl Notifier for ToastNotifier {
    fn notify(&self, notice: Notice) {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        let set_toasts = self.set_toasts;
        set_toasts.update(|list| list.push(Toast { id, notice }));
        Timeout::new(TOAST_DURATION_MS, move || {
            set_toasts.update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }
}

/// window.locationで画面遷移
struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            gloo::console::error!(e);
        }
    }
}

fn build_flow(set_toasts: WriteSignal<Vec<Toast>>) -> SignupFlow {
    let backend = FetchBackend::new(BackendConfig::from_build_env());
    let services = SignupServices {
        analyzer: Box::new(backend.clone()),
        auth: Box::new(backend.clone()),
        storage: Box::new(backend.clone()),
        profiles: Box::new(backend),
        notifier: Box::new(ToastNotifier {
            set_toasts,
            next_id: Cell::new(0),
        }),
        navigator: Box::new(LocationNavigator),
    };
    SignupFlow::new(services, FlowOptions::default())
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let (toasts, set_toasts) = signal(Vec::<Toast>::new());
    let (state, set_state) = signal(SignupState::default());
    let (form, set_form) = signal(ProfileForm::default());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    // 非同期処理中も排他するためMutexで保持し、状態はシグナルへ写す
    let shared: SharedFlow = Rc::new(Mutex::new(build_flow(set_toasts)));
    let flow = StoredValue::new_local(shared);

    let on_select = Callback::new(move |image: Option<SelectedImage>| {
        spawn_local(async move {
            let flow = flow.get_value();
            let mut flow = flow.lock().await;
            flow.set_image(image);
            set_state.set(flow.state().clone());
        });
    });

    let on_analyze = Callback::new(move |_: ()| {
        set_state.update(|s| s.is_analyzing = true);
        spawn_local(async move {
            let flow = flow.get_value();
            let mut flow = flow.lock().await;
            if flow.analyze_image().await == AnalyzeOutcome::Analyzed {
                let entered = form.get_untracked();
                set_form.set(flow.prefilled_form().merge_over(&entered));
            }
            set_state.set(flow.state().clone());
        });
    });

    let on_back = Callback::new(move |_: ()| {
        spawn_local(async move {
            let flow = flow.get_value();
            let mut flow = flow.lock().await;
            flow.go_back();
            set_state.set(flow.state().clone());
        });
    });

    let on_create = Callback::new(move |_: ()| {
        let credentials = Credentials::new(email.get_untracked().trim(), password.get_untracked());
        let profile = form.get_untracked();
        set_state.update(|s| s.is_submitting = true);
        spawn_local(async move {
            let flow = flow.get_value();
            let mut flow = flow.lock().await;
            // 失敗はトーストで通知済み
            if let Err(e) = flow.create_profile(&credentials, &profile).await {
                gloo::console::warn!(e.to_string());
            }
            set_state.set(flow.state().clone());
        });
    });

    let step = Signal::derive(move || state.with(|s| s.step));
    let preview = Signal::derive(move || state.with(|s| s.preview.clone()));
    let is_analyzing = Signal::derive(move || state.with(|s| s.is_analyzing));
    let is_submitting = Signal::derive(move || state.with(|s| s.is_submitting));
    let busy = Signal::derive(move || is_analyzing.get() || is_submitting.get());

    view! {
        <div class="container">
            <Header step=step />
            <ToastList toasts=toasts set_toasts=set_toasts />

            <Show
                when=move || step.get() == SignupStep::Photo
                fallback=move || view! {
                    <DetailsStep
                        form=form
                        set_form=set_form
                        email=email
                        set_email=set_email
                        password=password
                        set_password=set_password
                        is_submitting=is_submitting
                        on_back=on_back
                        on_create=on_create
                    />
                }
            >
                <PhotoStep
                    preview=preview
                    is_analyzing=is_analyzing
                    busy=busy
                    on_select=on_select
                    on_analyze=on_analyze
                />
            </Show>
        </div>
    }
}

/// Step1: 写真の選択と解析
#[component]
fn PhotoStep(
    preview: Signal<Option<String>>,
    is_analyzing: Signal<bool>,
    busy: Signal<bool>,
    on_select: Callback<Option<SelectedImage>>,
    on_analyze: Callback<()>,
) -> impl IntoView {
    view! {
        <section class="step step-photo">
            <UploadArea preview=preview disabled=busy on_select=on_select />

            <Show when=move || is_analyzing.get()>
                <AnalyzingIndicator />
            </Show>

            <div class="button-row">
                <button
                    class="btn btn-primary"
                    disabled=move || busy.get() || preview.with(Option::is_none)
                    on:click=move |_| on_analyze.run(())
                >
                    "写真を解析"
                </button>
            </div>
        </section>
    }
}

/// Step2: プロフィールとアカウント情報の入力
#[component]
fn DetailsStep(
    form: ReadSignal<ProfileForm>,
    set_form: WriteSignal<ProfileForm>,
    email: ReadSignal<String>,
    set_email: WriteSignal<String>,
    password: ReadSignal<String>,
    set_password: WriteSignal<String>,
    is_submitting: Signal<bool>,
    on_back: Callback<()>,
    on_create: Callback<()>,
) -> impl IntoView {
    view! {
        <section class="step step-details">
            <ProfileFormView form=form set_form=set_form />

            <div class="credentials">
                <label class="form-row">
                    <span class="form-label">"メールアドレス"</span>
                    <input
                        type="email"
                        class="form-control"
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-row">
                    <span class="form-label">"パスワード"</span>
                    <input
                        type="password"
                        class="form-control"
                        autocomplete="new-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
            </div>

            <div class="button-row">
                <button
                    class="btn btn-secondary"
                    disabled=move || is_submitting.get()
                    on:click=move |_| on_back.run(())
                >
                    "戻る"
                </button>
                <button
                    class="btn btn-primary"
                    disabled=move || is_submitting.get()
                    on:click=move |_| on_create.run(())
                >
                    {move || if is_submitting.get() { "登録中..." } else { "プロフィールを作成" }}
                </button>
            </div>
        </section>
    }
}
