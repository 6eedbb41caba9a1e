use clap::{Args, Parser, Subcommand};
use pet_signup_common::ProfileForm;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pet-signup")]
#[command(about = "ペット写真をAI解析してプロフィールを登録するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ペット写真を解析して結果を表示
    Analyze {
        /// 写真ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 解析結果の保存先JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 写真解析からアカウント作成・プロフィール登録まで実行
    Signup {
        /// 写真ファイルのパス
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// メールアドレス
        #[arg(long)]
        email: Option<String>,

        /// パスワード（未指定時は PET_SIGNUP_PASSWORD またはプロンプト）
        #[arg(long)]
        password: Option<String>,

        #[command(flatten)]
        profile: ProfileArgs,

        /// 画像解析をスキップ
        #[arg(long)]
        skip_analysis: bool,

        /// 確認プロンプトを出さずに実行
        #[arg(short, long)]
        yes: bool,
    },

    /// 設定の表示・変更
    Config {
        /// 現在の設定を表示
        #[arg(long)]
        show: bool,

        /// バックエンドURLを設定
        #[arg(long)]
        set_url: Option<String>,

        /// anonキーを設定
        #[arg(long)]
        set_anon_key: Option<String>,
    },
}

/// プロフィール項目（解析結果より優先）
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// 名前
    #[arg(long)]
    pub name: Option<String>,

    /// 犬種・猫種
    #[arg(long)]
    pub breed: Option<String>,

    /// 年齢
    #[arg(long)]
    pub age: Option<String>,

    /// 体重
    #[arg(long)]
    pub weight: Option<String>,

    /// 性別
    #[arg(long)]
    pub gender: Option<String>,

    /// サイズ
    #[arg(long)]
    pub size: Option<String>,

    /// 毛質
    #[arg(long)]
    pub coat: Option<String>,

    /// 活発さ
    #[arg(long)]
    pub energy_level: Option<String>,

    /// 性格
    #[arg(long)]
    pub temperament: Option<String>,
}

impl ProfileArgs {
    pub fn to_form(&self) -> ProfileForm {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        ProfileForm {
            name: value(&self.name),
            breed: value(&self.breed),
            age: value(&self.age),
            weight: value(&self.weight),
            gender: value(&self.gender),
            size: value(&self.size),
            coat: value(&self.coat),
            energy_level: value(&self.energy_level),
            temperament: value(&self.temperament),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signup_args() {
        let cli = Cli::parse_from([
            "pet-signup",
            "signup",
            "--image",
            "dog.jpg",
            "--email",
            "owner@example.com",
            "--name",
            "Hachi",
            "--energy-level",
            "high",
            "--yes",
        ]);

        match cli.command {
            Commands::Signup { image, email, profile, yes, skip_analysis, .. } => {
                assert_eq!(image, Some(PathBuf::from("dog.jpg")));
                assert_eq!(email.as_deref(), Some("owner@example.com"));
                assert!(yes);
                assert!(!skip_analysis);

                let form = profile.to_form();
                assert_eq!(form.name, "Hachi");
                assert_eq!(form.energy_level, "high");
                assert_eq!(form.breed, "");
            }
            _ => panic!("signup expected"),
        }
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::parse_from(["pet-signup", "-v", "analyze", "cat.png", "-o", "out.json"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Analyze { .. }));
    }
}
