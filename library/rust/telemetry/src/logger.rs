//! 構造化ログユーティリティ。
//! tracing クレートを使用し、JSON またはテキスト形式の構造化ログを出力する。
//!
//! # 使用例
//!
//! ```ignore
//! use tracing::{debug, error};
//!
//! k1s0_telemetry::init_logger("dev", "text");
//! debug!(scenario = "password-reset", locale = "en-us", "template resolved");
//! error!(error = %e, "no template found in any tier");
//! ```

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// LogFormat はログの出力形式を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// "text" の場合はプレーンテキスト、それ以外は JSON として扱う。
    pub fn parse(format: &str) -> Self {
        if format.eq_ignore_ascii_case("text") {
            LogFormat::Text
        } else {
            LogFormat::Json
        }
    }
}

/// 環境名からデフォルトのログレベルを決定する。
///
/// - dev: debug
/// - staging: info
/// - prod: warn
fn default_filter(env: &str) -> &'static str {
    match env {
        "dev" => "debug",
        "staging" => "info",
        _ => "warn",
    }
}

/// try_init_logger は tracing-subscriber を初期化する。
/// `RUST_LOG` が設定されていればそれを優先し、なければ環境名に応じたレベルを使う。
/// グローバル subscriber が既に設定済みの場合はエラーを返す。
pub fn try_init_logger(env: &str, format: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(env)));
    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::parse(format) {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            )
            .try_init(),
    }
}

/// init_logger は tracing-subscriber を初期化する。
/// 二重初期化は無視し、最初に設定された subscriber を維持する。
pub fn init_logger(env: &str, format: &str) {
    if let Err(e) = try_init_logger(env, format) {
        tracing::debug!(error = %e, "logger already initialised");
    }
}
