use crate::dotenv::DotEnv;
use crate::settings::FaasSettings;
use faas_core::{ConfigSource, EnvSource};
use std::fmt;
use std::sync::Arc;

/// Ordered chain of sources. The first layer holding a non-empty value wins.
#[derive(Clone, Default)]
pub struct LayeredSource {
    layers: Vec<Arc<dyn ConfigSource>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower precedence than the existing ones.
    pub fn with_layer(mut self, source: impl ConfigSource + 'static) -> Self {
        self.layers.push(Arc::new(source));
        self
    }

    /// Process environment, then the settings file credentials, then `.env`.
    pub fn standard(settings: &FaasSettings, dotenv: DotEnv) -> Self {
        Self::new()
            .with_layer(EnvSource)
            .with_layer(settings.credential_source())
            .with_layer(dotenv)
    }

    pub fn push(&mut self, source: Arc<dyn ConfigSource>) {
        self.layers.push(source);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ConfigSource for LayeredSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.layers
            .iter()
            .filter_map(|layer| layer.lookup(key))
            .find(|value| !value.is_empty())
    }
}

impl fmt::Debug for LayeredSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredSource")
            .field("layers", &self.layers.len())
            .finish()
    }
}

/// Keys from `keys` that `source` has no non-empty value for, in input order.
pub fn missing_keys<S, K>(source: &S, keys: &[K]) -> Vec<String>
where
    S: ConfigSource + ?Sized,
    K: AsRef<str>,
{
    keys.iter()
        .map(|key| key.as_ref())
        .filter(|key| source.lookup(key).map_or(true, |v| v.is_empty()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use faas_core::{keys, MapSource};

    #[test]
    fn test_first_hit_wins() {
        let source = LayeredSource::new()
            .with_layer(MapSource::new().with("A", "first").with("B", ""))
            .with_layer(MapSource::new().with("A", "second").with("B", "fallback"));

        assert_eq!(source.lookup("A").as_deref(), Some("first"));
        assert_eq!(source.lookup("B").as_deref(), Some("fallback"));
        assert_eq!(source.lookup("C"), None);
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_standard_layers() {
        let mut settings = FaasSettings::default();
        settings
            .credentials
            .insert("FAAS_SOURCE_TEST_KEY".into(), "from-file".into());
        let dotenv = DotEnv::parse("FAAS_SOURCE_TEST_KEY=from-dotenv\nFAAS_SOURCE_TEST_OTHER=x\n");

        let source = LayeredSource::standard(&settings, dotenv);
        assert_eq!(source.len(), 3);
        assert_eq!(source.lookup("FAAS_SOURCE_TEST_KEY").as_deref(), Some("from-file"));
        assert_eq!(source.lookup("FAAS_SOURCE_TEST_OTHER").as_deref(), Some("x"));
    }

    #[test]
    fn test_empty_chain() {
        assert_eq!(LayeredSource::new().lookup("A"), None);
    }

    #[test]
    fn test_missing_keys() {
        let source = MapSource::new()
            .with(keys::SENDGRID_API_KEY, "SG.x")
            .with(keys::SLACK_API_TOKEN, "");

        assert_eq!(
            missing_keys(&source, &[keys::SENDGRID_API_KEY, keys::SLACK_API_TOKEN, keys::GITHUB_TOKEN]),
            vec![keys::SLACK_API_TOKEN.to_string(), keys::GITHUB_TOKEN.to_string()]
        );
        assert!(missing_keys(&source, &[keys::SENDGRID_API_KEY]).is_empty());
    }
}
