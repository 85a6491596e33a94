use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::entity::{NotificationChannel, NotificationTemplate};

/// MergeIdentity は複数ソースのリストを統合する際の同一性キーを定義する。
pub trait MergeIdentity {
    type Key: Eq + Hash;

    fn merge_key(&self) -> Self::Key;
}

/// シナリオ表示名は正規化キーで比較する (大文字小文字・空白を無視)。
impl MergeIdentity for String {
    type Key = String;

    fn merge_key(&self) -> String {
        k1s0_validation::normalize_scenario_name(self)
    }
}

/// テンプレートは (シナリオ, チャネル, ロケール) で比較する。
impl MergeIdentity for NotificationTemplate {
    type Key = (String, NotificationChannel, String);

    fn merge_key(&self) -> Self::Key {
        (
            self.scenario_key(),
            self.channel,
            k1s0_validation::normalize_locale(&self.locale),
        )
    }
}

/// `primary` と `secondary` を同一性キーで統合する。
///
/// キーが衝突した場合は `primary` が優先され、`secondary` は未登録のキーのみ追加される。
/// 同一リスト内の重複は先に現れた要素が残る。
/// 結果の順序は保証しない。
pub fn merge<T: MergeIdentity>(primary: Vec<T>, secondary: Vec<T>) -> Vec<T> {
    let mut merged: HashMap<T::Key, T> = HashMap::with_capacity(primary.len() + secondary.len());
    for item in primary.into_iter().chain(secondary) {
        merged.entry(item.merge_key()).or_insert(item);
    }
    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn as_set(items: Vec<String>) -> HashSet<String> {
        items.into_iter().collect()
    }

    #[test]
    fn test_primary_wins_on_collision() {
        let merged = merge(names(&["Password Reset"]), names(&["passwordreset", "welcome"]));
        assert_eq!(merged.len(), 2);
        let set = as_set(merged);
        assert!(set.contains("Password Reset"));
        assert!(set.contains("welcome"));
        assert!(!set.contains("passwordreset"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = names(&["alpha", "Beta", "gamma"]);
        let b = names(&["beta", "delta"]);

        let ab = merge(a.clone(), b.clone());
        let abb = merge(ab.clone(), b);
        assert_eq!(as_set(abb), as_set(ab));

        let aa = merge(a.clone(), a.clone());
        assert_eq!(as_set(aa), as_set(a));
    }

    #[test]
    fn test_templates_keep_locale_variants() {
        let primary = vec![
            NotificationTemplate::sms("otp", "en-us", "tenant en"),
            NotificationTemplate::sms("otp", "fr-fr", "tenant fr"),
        ];
        let secondary = vec![NotificationTemplate::sms("OTP", "en_US", "default en")];

        let merged = merge(primary, secondary);
        assert_eq!(merged.len(), 2);
        let en = merged.iter().find(|t| t.locale == "en-us").unwrap();
        assert_eq!(en.body, "tenant en");
    }

    #[test]
    fn test_templates_distinguish_channel() {
        let merged = merge(
            vec![NotificationTemplate::sms("otp", "en-us", "sms")],
            vec![NotificationTemplate::email("otp", "en-us", "s", "email")],
        );
        assert_eq!(merged.len(), 2);
    }
}
