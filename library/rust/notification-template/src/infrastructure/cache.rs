/// ResolutionCache はテンプレート解決結果のインメモリキャッシュ。
/// moka::sync::Cache を使用し、TTL 付きで解決結果をキャッシュする。
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use k1s0_tenant_client::TenantId;
use moka::sync::Cache;

use crate::domain::entity::{Locale, NotificationChannel, NotificationTemplate, TemplateKey};

/// キャッシュ値。要求ロケールごとの解決結果の不変スナップショット。
type LocaleSnapshot = Arc<HashMap<String, NotificationTemplate>>;

/// FillTicket は読み込み開始時点の無効化世代を記録する。
/// 発行後に無効化が行われていれば、そのチケットでの書き込みは破棄される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillTicket {
    epoch: u64,
}

/// キャッシュはテナントを意識しない。テナントごとの分割は `TenantCacheRegistry` が行う。
pub struct ResolutionCache {
    inner: Cache<TemplateKey, LocaleSnapshot>,
    // put / fill / invalidate を直列化し、無効化の世代を数える
    epoch: Mutex<u64>,
}

impl ResolutionCache {
    /// 新しい ResolutionCache を作成する。
    ///
    /// # Arguments
    /// * `max_capacity` - キャッシュに保持する最大エントリ数
    /// * `ttl_secs` - エントリの有効期間（秒）
    pub fn new(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self {
            inner,
            epoch: Mutex::new(0),
        }
    }

    /// キーと要求ロケールに対応する解決結果を取得する。ロックは取らない。
    pub fn get(&self, key: &TemplateKey, locale: &Locale) -> Option<NotificationTemplate> {
        self.inner
            .get(key)
            .and_then(|snapshot| snapshot.get(locale.as_str()).cloned())
    }

    /// 読み込み前にチケットを発行する。
    pub fn ticket(&self) -> FillTicket {
        FillTicket {
            epoch: *self.lock_epoch(),
        }
    }

    /// 解決結果を登録する。同じキー・ロケールへの登録は後勝ち。
    pub fn put(&self, key: &TemplateKey, locale: &Locale, template: NotificationTemplate) {
        let _guard = self.lock_epoch();
        self.put_locked(key, locale, template);
    }

    /// チケット発行後に無効化が無かった場合のみ登録する。登録した場合は true。
    pub fn fill(
        &self,
        ticket: FillTicket,
        key: &TemplateKey,
        locale: &Locale,
        template: NotificationTemplate,
    ) -> bool {
        let guard = self.lock_epoch();
        if *guard != ticket.epoch {
            tracing::debug!(scenario = key.scenario(), "discarding stale cache fill");
            return false;
        }
        self.put_locked(key, locale, template);
        true
    }

    fn put_locked(&self, key: &TemplateKey, locale: &Locale, template: NotificationTemplate) {
        let mut snapshot = self
            .inner
            .get(key)
            .map(|current| current.as_ref().clone())
            .unwrap_or_default();
        snapshot.insert(locale.as_str().to_string(), template);
        self.inner.insert(key.clone(), Arc::new(snapshot));
    }

    /// キーの全ロケールのエントリを削除する。
    pub fn invalidate(&self, key: &TemplateKey) {
        let mut guard = self.lock_epoch();
        *guard += 1;
        self.inner.invalidate(key);
    }

    /// シナリオに属する全アプリケーションのエントリを削除する。
    /// moka v0.12 の `invalidate_entries_if` は `invalidation_closures` feature が
    /// 必要なため、iter() でキーを収集してから個別に invalidate する。
    pub fn invalidate_scenario(&self, scenario_key: &str, channel: NotificationChannel) {
        let mut guard = self.lock_epoch();
        *guard += 1;
        let keys_to_remove: Vec<TemplateKey> = self
            .inner
            .iter()
            .filter(|(k, _v)| k.scenario() == scenario_key && k.channel() == channel)
            .map(|(k, _v)| k.as_ref().clone())
            .collect();

        for key in keys_to_remove {
            self.inner.invalidate(&key);
        }
    }

    // 保護対象は単調増加するカウンタのみなので poison は無視してよい
    fn lock_epoch(&self) -> MutexGuard<'_, u64> {
        self.epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// TenantCacheRegistry はテナントごとの ResolutionCache を保持する。
///
/// パーティション自体も moka で保持し、TTL の間アクセスの無いテナントのものは破棄する。
/// その時点でパーティション内のエントリは全て期限切れなので、破棄で失う結果は無い。
/// 保持中のパーティション数はその TTL 内にアクセスのあったテナント数で抑えられる。
pub struct TenantCacheRegistry {
    partitions: Cache<TenantId, Arc<ResolutionCache>>,
    max_capacity: u64,
    ttl_secs: u64,
}

impl TenantCacheRegistry {
    pub fn new(max_capacity: u64, ttl_secs: u64) -> Self {
        let partitions = Cache::builder()
            .time_to_idle(Duration::from_secs(ttl_secs))
            .build();
        Self {
            partitions,
            max_capacity,
            ttl_secs,
        }
    }

    /// テナントのパーティションを返す。無ければ作成する。
    pub fn partition(&self, tenant: TenantId) -> Arc<ResolutionCache> {
        self.partitions.get_with(tenant, || {
            tracing::debug!(tenant = %tenant, "creating resolution cache partition");
            Arc::new(ResolutionCache::new(self.max_capacity, self.ttl_secs))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Scenario;

    fn key(scenario: &str, application: Option<&str>) -> TemplateKey {
        TemplateKey::new(&Scenario::parse(scenario).unwrap(), NotificationChannel::Sms, application)
    }

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    fn template(body: &str) -> NotificationTemplate {
        NotificationTemplate::sms("sms-otp", "en-us", body)
    }

    #[test]
    fn test_put_and_get_per_locale() {
        let cache = ResolutionCache::new(100, 60);
        let k = key("sms-otp", None);
        cache.put(&k, &locale("en-us"), template("en"));
        cache.put(&k, &locale("fr-fr"), template("fr fallback"));

        assert_eq!(cache.get(&k, &locale("en-us")).unwrap().body, "en");
        assert_eq!(cache.get(&k, &locale("fr-fr")).unwrap().body, "fr fallback");
        assert!(cache.get(&k, &locale("de-de")).is_none());
    }

    #[test]
    fn test_put_is_last_write_wins() {
        let cache = ResolutionCache::new(100, 60);
        let k = key("sms-otp", None);
        cache.put(&k, &locale("en-us"), template("first"));
        cache.put(&k, &locale("en-us"), template("second"));
        assert_eq!(cache.get(&k, &locale("en-us")).unwrap().body, "second");
    }

    #[test]
    fn test_invalidate_drops_all_locales() {
        let cache = ResolutionCache::new(100, 60);
        let k = key("sms-otp", None);
        cache.put(&k, &locale("en-us"), template("en"));
        cache.put(&k, &locale("fr-fr"), template("fr"));
        cache.invalidate(&k);
        assert!(cache.get(&k, &locale("en-us")).is_none());
        assert!(cache.get(&k, &locale("fr-fr")).is_none());
    }

    #[test]
    fn test_fill_after_invalidate_is_discarded() {
        let cache = ResolutionCache::new(100, 60);
        let k = key("sms-otp", None);

        let ticket = cache.ticket();
        cache.invalidate(&k);
        assert!(!cache.fill(ticket, &k, &locale("en-us"), template("stale")));
        assert!(cache.get(&k, &locale("en-us")).is_none());

        let ticket = cache.ticket();
        assert!(cache.fill(ticket, &k, &locale("en-us"), template("fresh")));
        assert_eq!(cache.get(&k, &locale("en-us")).unwrap().body, "fresh");
    }

    #[test]
    fn test_invalidate_scenario_drops_every_application() {
        let cache = ResolutionCache::new(100, 60);
        let org = key("sms-otp", None);
        let app = key("sms-otp", Some("portal"));
        let other = key("welcome", None);
        for k in [&org, &app, &other] {
            cache.put(k, &locale("en-us"), template("x"));
        }

        cache.invalidate_scenario("sms-otp", NotificationChannel::Sms);
        assert!(cache.get(&org, &locale("en-us")).is_none());
        assert!(cache.get(&app, &locale("en-us")).is_none());
        assert!(cache.get(&other, &locale("en-us")).is_some());
    }

    #[test]
    fn test_registry_partitions_by_tenant() {
        let registry = TenantCacheRegistry::new(100, 60);
        let k = key("sms-otp", None);
        registry.partition(TenantId(1)).put(&k, &locale("en-us"), template("tenant 1"));

        assert!(registry.partition(TenantId(2)).get(&k, &locale("en-us")).is_none());
        assert_eq!(
            registry.partition(TenantId(1)).get(&k, &locale("en-us")).unwrap().body,
            "tenant 1"
        );
        assert!(Arc::ptr_eq(
            &registry.partition(TenantId(1)),
            &registry.partition(TenantId(1))
        ));
    }

    /// アクセスの無いテナントのパーティションは TTL 後に作り直されること。
    #[test]
    fn test_registry_drops_idle_partitions() {
        let registry = TenantCacheRegistry::new(100, 1);
        let k = key("sms-otp", None);
        let idle = registry.partition(TenantId(3));
        idle.put(&k, &locale("en-us"), template("old"));

        std::thread::sleep(Duration::from_millis(1500));

        let fresh = registry.partition(TenantId(3));
        assert!(!Arc::ptr_eq(&idle, &fresh));
        assert!(fresh.get(&k, &locale("en-us")).is_none());
    }
}
