//! 写真選択エリアコンポーネント

use leptos::html;
use leptos::prelude::*;
use pet_signup_common::{decode_data_url, extract_mime_type_from_data_url, SelectedImage};
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileList, FileReader, HtmlInputElement};

#[component]
pub fn UploadArea(
    /// 選択中画像のプレビュー
    preview: Signal<Option<String>>,
    disabled: Signal<bool>,
    on_select: Callback<Option<SelectedImage>>,
) -> impl IntoView {
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<html::Input> = NodeRef::new();

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);
        if disabled.get_untracked() {
            return;
        }
        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            handle_files(files, on_select);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if !disabled.get_untracked() {
            set_is_dragover.set(true);
        }
    };

    let on_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            handle_files(files, on_select);
        }
        // 同じファイルを選び直せるようにする
        input.set_value("");
    };

    let open_dialog = move |_| {
        if disabled.get_untracked() {
            return;
        }
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let clear = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        on_select.run(None);
    };

    view! {
        <div
            class=move || {
                let mut classes = vec!["upload-area"];
                if is_dragover.get() {
                    classes.push("dragover");
                }
                if disabled.get() {
                    classes.push("disabled");
                }
                classes.join(" ")
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=move |_| set_is_dragover.set(false)
            on:click=open_dialog
        >
            <input
                type="file"
                accept="image/*"
                style="display: none"
                node_ref=input_ref
                on:change=on_change
            />
            <Show
                when=move || preview.get().is_some()
                fallback=|| view! {
                    <div class="upload-icon">"📷"</div>
                    <p>"ペットの写真をドラッグ&ドロップ または クリックして選択"</p>
                    <p class="text-muted">"対応形式: JPEG, PNG, WebP, GIF"</p>
                }
            >
                <img class="preview" src=move || preview.get().unwrap_or_default() alt="選択した写真" />
                <button class="btn btn-secondary" on:click=clear disabled=move || disabled.get()>
                    "写真を取り消す"
                </button>
            </Show>
        </div>
    }
}

/// 先頭の1枚だけを使う
fn handle_files(files: FileList, on_select: Callback<Option<SelectedImage>>) {
    let Some(file) = files.get(0) else {
        return;
    };
    if !file.type_().is_empty() && !file.type_().starts_with("image/") {
        gloo::console::warn!(format!("画像ではないファイルを無視: {}", file.name()));
        return;
    }
    read_file(file, on_select);
}

fn read_file(file: File, on_select: Callback<Option<SelectedImage>>) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            gloo::console::error!(e);
            return;
        }
    };

    let file_name = file.name();
    let file_type = file.type_();
    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        let Some(data_url) = reader_clone.result().ok().and_then(|r| r.as_string()) else {
            return;
        };
        let Some(bytes) = decode_data_url(&data_url) else {
            gloo::console::error!(format!("画像を読み込めません: {}", file_name));
            return;
        };
        let mime_type = if file_type.is_empty() {
            extract_mime_type_from_data_url(&data_url).to_string()
        } else {
            file_type.clone()
        };
        on_select.run(Some(SelectedImage::new(file_name.clone(), mime_type, bytes)));
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    if let Err(e) = reader.read_as_data_url(&file) {
        gloo::console::error!(e);
    }
}
