//! 通知テンプレートの階層解決エンジン。
//!
//! テナント (組織) ・アプリケーション単位で上書きされたテンプレートと、
//! 組み込みのデフォルトテンプレートを、ロケールフォールバック付きで解決する。

pub mod adapter;
pub mod domain;
pub mod infrastructure;
pub mod usecase;
