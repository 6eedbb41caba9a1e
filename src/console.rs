//! ターミナル向けの通知と画面遷移

use indicatif::{ProgressBar, ProgressStyle};
use pet_signup_common::{Navigator, Notice, NoticeLevel, Notifier};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

/// 実行中のスピナー
///
/// 通知はスピナーを一時的に消してから出力する
#[derive(Clone, Default)]
pub struct Spinner(Rc<RefCell<Option<ProgressBar>>>);

impl Spinner {
    pub fn start(&self, message: &'static str) {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Some(previous) = self.0.replace(Some(bar)) {
            previous.finish_and_clear();
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = self.0.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.0.borrow().is_some()
    }

    fn println(&self, line: &str) {
        match self.0.borrow().as_ref() {
            Some(bar) => bar.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }
}

/// 通知を標準出力に表示
#[derive(Clone, Default)]
pub struct ConsoleNotifier {
    spinner: Spinner,
}

impl ConsoleNotifier {
    pub fn new(spinner: Spinner) -> Self {
        Self { spinner }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        self.spinner.println(&format_notice(&notice));
    }
}

/// 遷移先を表示するだけ（CLIに画面はない）
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, path: &str) {
        info!(%path, "navigate");
        println!("→ 次の画面: {}", path);
    }
}

pub fn format_notice(notice: &Notice) -> String {
    let mark = match notice.level {
        NoticeLevel::Info => "ℹ",
        NoticeLevel::Success => "✔",
        NoticeLevel::Error => "✖",
    };
    if notice.message.is_empty() {
        format!("{} {}", mark, notice.title)
    } else {
        format!("{} {}: {}", mark, notice.title, notice.message)
    }
}
