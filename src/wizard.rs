//! CLIのサインアップウィザード
//!
//! Step1: 写真読み込み -> AI解析
//! Step2: プロフィール確認・入力 -> 登録（「いいえ」でStep1へ戻る）

use crate::backend::BackendClient;
use crate::config::Config;
use crate::console::{ConsoleNavigator, ConsoleNotifier, Spinner};
use crate::error::{PetSignupError, Result};
use crate::image_file::load_image;
use dialoguer::{Confirm, Input, Password};
use pet_signup_common::{
    AnalyzeOutcome, Credentials, FlowOptions, PetAnalysis, ProfileForm, SelectedImage,
    SignupFlow, SignupServices,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

const PASSWORD_ENV: &str = "PET_SIGNUP_PASSWORD";

/// signupコマンドの入力
pub struct SignupOptions {
    pub image: Option<PathBuf>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile: ProfileForm,
    pub skip_analysis: bool,
    pub interactive: bool,
}

/// analyzeコマンドの出力
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReport {
    file_name: String,
    analysis: Option<PetAnalysis>,
    form: ProfileForm,
}

/// バックエンドに接続したウィザードを作成
///
/// 通知は `spinner` の実行中も崩れずに表示される
pub fn build_flow(config: &Config, spinner: &Spinner) -> Result<SignupFlow> {
    let client = BackendClient::from_config(config)?;
    let services = SignupServices {
        analyzer: Box::new(client.clone()),
        auth: Box::new(client.clone()),
        storage: Box::new(client.clone()),
        profiles: Box::new(client),
        notifier: Box::new(ConsoleNotifier::new(spinner.clone())),
        navigator: Box::new(ConsoleNavigator),
    };
    let options = FlowOptions {
        redirect_path: config.redirect_path.clone(),
    };
    Ok(SignupFlow::new(services, options))
}

pub async fn run_analyze(config: &Config, image: &Path, output: Option<&Path>) -> Result<()> {
    let spinner = Spinner::default();
    let mut flow = build_flow(config, &spinner)?;

    println!("[1/2] 写真を読み込み中...");
    let selected = load_image(image, config.max_image_size)?;
    let file_name = selected.file_name.clone();
    println!("✔ {} ({} bytes)\n", file_name, selected.bytes.len());
    flow.set_image(Some(selected));

    println!("[2/2] AI解析中...");
    if analyze_with_spinner(&mut flow, &spinner).await != AnalyzeOutcome::Analyzed {
        return Err(PetSignupError::AnalysisFailed);
    }

    let report = AnalyzeReport {
        file_name,
        analysis: flow.state().analysis.clone(),
        form: flow.prefilled_form(),
    };
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("✔ 結果を保存: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub async fn run_signup(config: &Config, options: SignupOptions) -> Result<()> {
    let spinner = Spinner::default();
    let mut flow = build_flow(config, &spinner)?;
    let mut image_path = options.image.clone();
    let mut entered = options.profile.clone();

    loop {
        // Step1: 写真
        println!("\n[Step1] 写真の選択");
        if image_path.is_none() && options.interactive {
            image_path = prompt_image_path(flow.state().image.is_some())?;
        }

        let mut loaded = false;
        if let Some(path) = image_path.take() {
            let Some(selected) = load_selected(&path, config.max_image_size, options.interactive)? else {
                continue;
            };
            println!("✔ {} を読み込みました", selected.file_name);
            flow.set_image(Some(selected));
            loaded = true;
        }

        if loaded && !options.skip_analysis {
            match analyze_with_spinner(&mut flow, &spinner).await {
                AnalyzeOutcome::Rejected if !options.interactive => {
                    return Err(PetSignupError::AnalysisFailed);
                }
                AnalyzeOutcome::Rejected => {
                    let retry = Confirm::new()
                        .with_prompt("別の写真を選びますか？")
                        .default(true)
                        .interact()?;
                    if retry {
                        continue;
                    }
                }
                AnalyzeOutcome::Analyzed | AnalyzeOutcome::Degraded | AnalyzeOutcome::NoImage => {}
            }
        }

        // Step2: プロフィール
        println!("\n[Step2] プロフィール");
        let mut form = flow.prefilled_form().merge_over(&entered);
        if options.interactive {
            prompt_form(&mut form)?;
            entered = form.clone();
        }
        print_form(&form);

        if options.interactive {
            let confirmed = Confirm::new()
                .with_prompt("この内容で登録しますか？（いいえで写真選択に戻る）")
                .default(true)
                .interact()?;
            if !confirmed {
                flow.go_back();
                println!("← 写真選択に戻ります");
                continue;
            }
        }

        let credentials = resolve_credentials(&options)?;
        println!("\n登録中...");
        flow.create_profile(&credentials, &form).await?;
        println!("\n✅ 登録完了");
        return Ok(());
    }
}

async fn analyze_with_spinner(flow: &mut SignupFlow, spinner: &Spinner) -> AnalyzeOutcome {
    spinner.start("写真を解析中...");
    let outcome = flow.analyze_image().await;
    spinner.finish();
    outcome
}

/// 写真を読み込む
///
/// 対話モードでは読み込みエラーを表示してNone（再入力）を返す
fn load_selected(path: &Path, max_dimension: u32, interactive: bool) -> Result<Option<SelectedImage>> {
    match load_image(path, max_dimension) {
        Ok(selected) => Ok(Some(selected)),
        Err(e) if interactive => {
            println!("✖ {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn prompt_image_path(has_current: bool) -> Result<Option<PathBuf>> {
    let prompt = if has_current {
        "写真のパス（空欄で現在の写真のまま）"
    } else {
        "写真のパス（空欄で写真なし）"
    };
    let input = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let trimmed = input.trim();
    Ok((!trimmed.is_empty()).then(|| PathBuf::from(trimmed)))
}

fn prompt_form(form: &mut ProfileForm) -> Result<()> {
    for (label, value) in fields_mut(form) {
        let input = Input::<String>::new()
            .with_prompt(label)
            .with_initial_text(value.clone())
            .allow_empty(true)
            .interact_text()?;
        *value = input.trim().to_string();
    }
    Ok(())
}

fn print_form(form: &ProfileForm) {
    for (label, value) in fields(form) {
        let shown = if value.is_empty() { "-" } else { value };
        println!("  {:<8} {}", label, shown);
    }
}

fn resolve_credentials(options: &SignupOptions) -> Result<Credentials> {
    let email = match &options.email {
        Some(email) => email.clone(),
        None if options.interactive => Input::<String>::new()
            .with_prompt("メールアドレス")
            .interact_text()?,
        None => return Err(PetSignupError::MissingInput("--email".into())),
    };

    let password = match options
        .password
        .clone()
        .or_else(|| std::env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty()))
    {
        Some(password) => password,
        None if options.interactive => Password::new()
            .with_prompt("パスワード")
            .with_confirmation("パスワード（確認）", "パスワードが一致しません")
            .interact()?,
        None => return Err(PetSignupError::MissingInput(format!("--password または {}", PASSWORD_ENV))),
    };

    Ok(Credentials::new(email, password))
}

fn fields(form: &ProfileForm) -> [(&'static str, &str); 9] {
    [
        ("名前", form.name.as_str()),
        ("種類", form.breed.as_str()),
        ("年齢", form.age.as_str()),
        ("体重", form.weight.as_str()),
        ("性別", form.gender.as_str()),
        ("サイズ", form.size.as_str()),
        ("毛質", form.coat.as_str()),
        ("活発さ", form.energy_level.as_str()),
        ("性格", form.temperament.as_str()),
    ]
}

fn fields_mut(form: &mut ProfileForm) -> [(&'static str, &mut String); 9] {
    [
        ("名前", &mut form.name),
        ("種類", &mut form.breed),
        ("年齢", &mut form.age),
        ("体重", &mut form.weight),
        ("性別", &mut form.gender),
        ("サイズ", &mut form.size),
        ("毛質", &mut form.coat),
        ("活発さ", &mut form.energy_level),
        ("性格", &mut form.temperament),
    ]
}
