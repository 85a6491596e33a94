use std::fmt;

/// FallbackState はロケールフォールバックの状態を表す。
///
/// ```text
/// Exact ──miss──> DefaultLocale ──miss──> SystemDefault ──miss──> Unsatisfied
///   └──miss (要求ロケール == デフォルト)──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackState {
    /// 要求スコープ・要求ロケールの永続ストア。
    Exact,
    /// 同一スコープ・チャネルのデフォルトロケールの永続ストア。
    DefaultLocale,
    /// 組み込みデフォルトカタログ (デフォルトロケール)。
    SystemDefault,
    /// 終端。どの階層にも無い。
    Unsatisfied,
}

impl FallbackState {
    /// 現在の階層で見つからなかった場合の次の状態。
    pub fn on_miss(self, requested_is_default: bool) -> Self {
        match self {
            FallbackState::Exact if requested_is_default => FallbackState::SystemDefault,
            FallbackState::Exact => FallbackState::DefaultLocale,
            FallbackState::DefaultLocale => FallbackState::SystemDefault,
            FallbackState::SystemDefault | FallbackState::Unsatisfied => FallbackState::Unsatisfied,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == FallbackState::Unsatisfied
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FallbackState::Exact => "exact",
            FallbackState::DefaultLocale => "default-locale",
            FallbackState::SystemDefault => "system-default",
            FallbackState::Unsatisfied => "unsatisfied",
        }
    }
}

impl fmt::Display for FallbackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FallbackPlan は照会すべき階層を順に返すイテレータ。`Unsatisfied` は返さない。
#[derive(Debug, Clone)]
pub struct FallbackPlan {
    next: FallbackState,
    requested_is_default: bool,
}

impl FallbackPlan {
    pub fn new(requested_is_default: bool) -> Self {
        Self {
            next: FallbackState::Exact,
            requested_is_default,
        }
    }
}

impl Iterator for FallbackPlan {
    type Item = FallbackState;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_terminal() {
            return None;
        }
        let current = self.next;
        self.next = current.on_miss(self.requested_is_default);
        Some(current)
    }
}
