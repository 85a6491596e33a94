use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use k1s0_tenant_client::TenantId;

use crate::domain::entity::{NotificationChannel, NotificationTemplate, Scenario, TemplateScope};
use crate::domain::repository::{ScenarioCatalog, StoreError, TemplateLocator, TemplateStore};

const ROOT: &str = "/identity";
const APPS: &str = "apps";

const PROP_DISPLAY_NAME: &str = "display-name";
const PROP_LOCALE: &str = "locale";
const PROP_CONTENT_TYPE: &str = "content-type";

/// Resource はリソースツリーの 1 ノード。コレクションは content を持たない。
#[derive(Debug, Clone, Default)]
struct Resource {
    properties: BTreeMap<String, String>,
    content: Option<String>,
}

type Tree = BTreeMap<String, Resource>;

/// ResourceTreeTemplateStore は階層型リソースツリーを模したインメモリストア。
///
/// テナントごとのツリーに以下のパスでテンプレートを配置する。
///
/// ```text
/// /identity/{channel}/{scenario-key}                      シナリオ (コレクション)
/// /identity/{channel}/{scenario-key}/{locale}             組織テンプレート
/// /identity/{channel}/{scenario-key}/apps/{app}/{locale}  アプリケーションテンプレート
/// ```
///
/// テンプレート本体は JSON 配列 (EMAIL: `[subject, body, footer]`, SMS: `[body]`) として
/// content に格納し、表示名・ロケール・content type はプロパティに持つ。
#[derive(Debug, Default)]
pub struct ResourceTreeTemplateStore {
    tenants: RwLock<HashMap<TenantId, Tree>>,
}

fn scenario_path(channel: NotificationChannel, scenario_key: &str) -> String {
    format!("{}/{}/{}", ROOT, channel.path_segment(), scenario_key)
}

fn collection_path(
    channel: NotificationChannel,
    scenario_key: &str,
    scope: &TemplateScope,
) -> String {
    let base = scenario_path(channel, scenario_key);
    match scope.application() {
        Some(app) => format!("{}/{}/{}", base, APPS, app),
        None => base,
    }
}

fn template_path(locator: &TemplateLocator) -> String {
    format!(
        "{}/{}",
        collection_path(locator.channel, locator.scenario.key(), &locator.scope),
        locator.locale
    )
}

/// `collection` の直下にあるテンプレートリソースを返す。
fn template_children<'a>(
    tree: &'a Tree,
    collection: &str,
) -> impl Iterator<Item = (&'a String, &'a Resource)> {
    let prefix = format!("{}/", collection);
    let depth = prefix.len();
    tree.range(prefix.clone()..)
        .take_while(move |(path, _)| path.starts_with(&prefix))
        .filter(move |(path, resource)| resource.content.is_some() && !path[depth..].contains('/'))
}

fn encode(template: &NotificationTemplate, display_name: &str) -> Result<Resource, StoreError> {
    let parts: Vec<&str> = match template.channel {
        NotificationChannel::Email => vec![
            template.subject.as_deref().unwrap_or_default(),
            template.body.as_str(),
            template.footer.as_deref().unwrap_or_default(),
        ],
        NotificationChannel::Sms => vec![template.body.as_str()],
    };
    let content = serde_json::to_string(&parts).map_err(|e| StoreError::Corrupted {
        location: template.scenario.clone(),
        reason: e.to_string(),
    })?;

    let mut properties = BTreeMap::new();
    properties.insert(PROP_DISPLAY_NAME.to_string(), display_name.to_string());
    properties.insert(PROP_LOCALE.to_string(), template.locale.clone());
    if let Some(content_type) = &template.content_type {
        properties.insert(PROP_CONTENT_TYPE.to_string(), content_type.clone());
    }
    Ok(Resource {
        properties,
        content: Some(content),
    })
}

fn decode(
    path: &str,
    channel: NotificationChannel,
    resource: &Resource,
) -> Result<NotificationTemplate, StoreError> {
    let corrupted = |reason: String| StoreError::Corrupted {
        location: path.to_string(),
        reason,
    };
    let property = |name: &str| {
        resource
            .properties
            .get(name)
            .cloned()
            .ok_or_else(|| corrupted(format!("missing property '{}'", name)))
    };

    let content = resource
        .content
        .as_deref()
        .ok_or_else(|| corrupted("resource has no content".to_string()))?;
    let parts: Vec<String> = serde_json::from_str(content).map_err(|e| corrupted(e.to_string()))?;
    let scenario = property(PROP_DISPLAY_NAME)?;
    let locale = property(PROP_LOCALE)?;

    let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
    let template = match channel {
        NotificationChannel::Email => {
            let [subject, body, footer] = <[String; 3]>::try_from(parts).map_err(|parts| {
                corrupted(format!("expected 3 content parts for EMAIL, got {}", parts.len()))
            })?;
            NotificationTemplate {
                scenario,
                channel,
                locale,
                subject: non_empty(subject),
                body,
                footer: non_empty(footer),
                content_type: resource.properties.get(PROP_CONTENT_TYPE).cloned(),
            }
        }
        NotificationChannel::Sms => {
            let [body] = <[String; 1]>::try_from(parts).map_err(|parts| {
                corrupted(format!("expected 1 content part for SMS, got {}", parts.len()))
            })?;
            NotificationTemplate {
                scenario,
                channel,
                locale,
                subject: None,
                body,
                footer: None,
                content_type: None,
            }
        }
    };
    Ok(template)
}

impl ResourceTreeTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_tenants(&self) -> Result<RwLockReadGuard<'_, HashMap<TenantId, Tree>>, StoreError> {
        self.tenants.read().map_err(StoreError::poisoned)
    }

    fn write_tenants(&self) -> Result<RwLockWriteGuard<'_, HashMap<TenantId, Tree>>, StoreError> {
        self.tenants.write().map_err(StoreError::poisoned)
    }

    fn list_collection(
        tree: &Tree,
        channel: NotificationChannel,
        collection: &str,
    ) -> Result<Vec<NotificationTemplate>, StoreError> {
        template_children(tree, collection)
            .map(|(path, resource)| decode(path, channel, resource))
            .collect()
    }
}

impl TemplateStore for ResourceTreeTemplateStore {
    fn read(&self, locator: &TemplateLocator) -> Result<Option<NotificationTemplate>, StoreError> {
        let tenants = self.read_tenants()?;
        let path = template_path(locator);
        tenants
            .get(&locator.scope.tenant)
            .and_then(|tree| tree.get(&path))
            .filter(|resource| resource.content.is_some())
            .map(|resource| decode(&path, locator.channel, resource))
            .transpose()
    }

    fn write(
        &self,
        template: &NotificationTemplate,
        scope: &TemplateScope,
    ) -> Result<(), StoreError> {
        let scenario_key = template.scenario_key();
        let mut tenants = self.write_tenants()?;
        let tree = tenants.entry(scope.tenant).or_default();
        let display_name = tree
            .get(&scenario_path(template.channel, &scenario_key))
            .and_then(|collection| collection.properties.get(PROP_DISPLAY_NAME))
            .cloned()
            .ok_or_else(|| StoreError::UnknownScenario(template.scenario.clone()))?;

        let collection = collection_path(template.channel, &scenario_key, scope);
        let path = format!("{}/{}", collection, template.locale);
        tree.insert(path, encode(template, &display_name)?);
        Ok(())
    }

    fn delete(&self, locator: &TemplateLocator) -> Result<bool, StoreError> {
        let mut tenants = self.write_tenants()?;
        Ok(tenants
            .get_mut(&locator.scope.tenant)
            .and_then(|tree| tree.remove(&template_path(locator)))
            .is_some())
    }

    fn list(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        scope: &TemplateScope,
    ) -> Result<Vec<NotificationTemplate>, StoreError> {
        let tenants = self.read_tenants()?;
        let Some(tree) = tenants.get(&scope.tenant) else {
            return Ok(Vec::new());
        };
        Self::list_collection(tree, channel, &collection_path(channel, scenario.key(), scope))
    }

    fn list_all(
        &self,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<Vec<NotificationTemplate>, StoreError> {
        let tenants = self.read_tenants()?;
        let Some(tree) = tenants.get(&tenant) else {
            return Ok(Vec::new());
        };
        let mut templates = Vec::new();
        for scenario_collection in scenario_collections(tree, channel).map(|(path, _)| path) {
            templates.extend(Self::list_collection(tree, channel, scenario_collection)?);
        }
        Ok(templates)
    }

    fn delete_all(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        scope: &TemplateScope,
    ) -> Result<usize, StoreError> {
        let mut tenants = self.write_tenants()?;
        let Some(tree) = tenants.get_mut(&scope.tenant) else {
            return Ok(0);
        };
        let collection = collection_path(channel, scenario.key(), scope);
        let paths: Vec<String> = template_children(tree, &collection)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &paths {
            tree.remove(path);
        }
        Ok(paths.len())
    }
}

/// チャネル直下のシナリオコレクションを列挙する。
fn scenario_collections(
    tree: &Tree,
    channel: NotificationChannel,
) -> impl Iterator<Item = (&String, &Resource)> {
    let prefix = format!("{}/{}/", ROOT, channel.path_segment());
    let depth = prefix.len();
    tree.range(prefix.clone()..)
        .take_while(move |(path, _)| path.starts_with(&prefix))
        .filter(move |(path, resource)| resource.content.is_none() && !path[depth..].contains('/'))
}

impl ScenarioCatalog for ResourceTreeTemplateStore {
    fn add(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<(), StoreError> {
        let mut tenants = self.write_tenants()?;
        let tree = tenants.entry(tenant).or_default();
        let path = scenario_path(channel, scenario.key());
        tree.entry(path).or_insert_with(|| {
            let mut properties = BTreeMap::new();
            properties.insert(PROP_DISPLAY_NAME.to_string(), scenario.display_name().to_string());
            Resource {
                properties,
                content: None,
            }
        });
        Ok(())
    }

    fn exists(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, StoreError> {
        let tenants = self.read_tenants()?;
        Ok(tenants
            .get(&tenant)
            .is_some_and(|tree| tree.contains_key(&scenario_path(channel, scenario.key()))))
    }

    fn list(
        &self,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<Vec<String>, StoreError> {
        let tenants = self.read_tenants()?;
        let Some(tree) = tenants.get(&tenant) else {
            return Ok(Vec::new());
        };
        scenario_collections(tree, channel)
            .map(|(path, resource)| {
                resource
                    .properties
                    .get(PROP_DISPLAY_NAME)
                    .cloned()
                    .ok_or_else(|| StoreError::Corrupted {
                        location: path.clone(),
                        reason: format!("missing property '{}'", PROP_DISPLAY_NAME),
                    })
            })
            .collect()
    }

    fn remove(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, StoreError> {
        let mut tenants = self.write_tenants()?;
        let Some(tree) = tenants.get_mut(&tenant) else {
            return Ok(false);
        };
        let base = scenario_path(channel, scenario.key());
        if tree.remove(&base).is_none() {
            return Ok(false);
        }
        let prefix = format!("{}/", base);
        tree.retain(|path, _| !path.starts_with(&prefix));
        Ok(true)
    }
}
