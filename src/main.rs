use clap::Parser;
use pet_signup::{cli, config, error, wizard};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use tracing_subscriber::EnvFilter;
use wizard::SignupOptions;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, output } => {
            println!("🐾 pet-signup - 写真解析\n");
            wizard::run_analyze(&config, &image, output.as_deref()).await?;
        }

        Commands::Signup { image, email, password, profile, skip_analysis, yes } => {
            println!("🐾 pet-signup - プロフィール登録");
            let options = SignupOptions {
                image,
                email,
                password,
                profile: profile.to_form(),
                skip_analysis,
                interactive: !yes,
            };
            wizard::run_signup(&config, options).await?;
        }

        Commands::Config { show, set_url, set_anon_key } => {
            let changed = set_url.is_some() || set_anon_key.is_some();
            if let Some(url) = set_url {
                config.set_backend_url(url);
            }
            if let Some(key) = set_anon_key {
                config.set_anon_key(key);
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let mut shown = config.clone();
                if shown.anon_key.is_some() {
                    shown.anon_key = Some("***".into());
                }
                println!("{}", serde_json::to_string_pretty(&shown)?);
            }
        }
    }

    Ok(())
}
