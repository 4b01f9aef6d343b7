use crate::error::{ConfigError, ConfigResult};
use crate::settings::FaasSettings;
use std::fs;
use std::path::Path;

/// Supported settings file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Detect file format from extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }
}

/// Load and validate a settings file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> ConfigResult<FaasSettings> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;

    let settings = parse_settings(&content, format)?;
    tracing::debug!(
        path = %path.display(),
        credentials = settings.credentials.len(),
        "Loaded settings"
    );
    Ok(settings)
}

/// Parse settings content directly
pub fn parse_settings(content: &str, format: FileFormat) -> ConfigResult<FaasSettings> {
    // An empty YAML document is `null`, which should mean "all defaults"
    if content.trim().is_empty() {
        return Ok(FaasSettings::default());
    }

    let settings: FaasSettings = match format {
        FileFormat::Yaml => serde_yaml::from_str(content)?,
        FileFormat::Json => serde_json::from_str(content)?,
    };
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(FileFormat::from_path("faas.yml").unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path("a/b/faas.yaml").unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path("faas.json").unwrap(), FileFormat::Json);
        assert!(matches!(
            FileFormat::from_path("faas.toml"),
            Err(ConfigError::UnsupportedFormat(ref ext)) if ext == "toml"
        ));
        assert!(FileFormat::from_path("faas").is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
credentials:
  SENDGRID_API_KEY: SG.file
endpoints:
  docker_host: tcp://10.0.0.5:2375
http:
  timeout_secs: 30
"#;
        let settings = parse_settings(yaml, FileFormat::Yaml).unwrap();
        assert_eq!(settings.credentials["SENDGRID_API_KEY"], "SG.file");
        assert_eq!(
            settings.endpoints.docker_host.as_deref(),
            Some("tcp://10.0.0.5:2375")
        );
        assert_eq!(settings.http.timeout_secs, Some(30));
        assert_eq!(settings.docker.wait_timeout_secs, 15);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{ "docker": { "wait_timeout_secs": 60 } }"#;
        let settings = parse_settings(json, FileFormat::Json).unwrap();
        assert_eq!(settings.docker.wait_timeout_secs, 60);
    }

    #[test]
    fn test_empty_content_is_default() {
        assert_eq!(
            parse_settings("", FileFormat::Yaml).unwrap(),
            FaasSettings::default()
        );
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = parse_settings("connectors: {}\n", FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_settings("docker:\n  wait_timeout_secs: 0\n", FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
