//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Outgoing mail settings for the form relay.
    #[serde(default)]
    pub mail: MailConfig,

    /// HTTP listener settings for the form relay.
    #[serde(default)]
    pub serve: ServeConfig,

    /// Logo generator settings.
    #[serde(default)]
    pub logo: LogoConfig,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailSecurity {
    /// Plain connection upgraded with STARTTLS (port 587).
    #[default]
    Starttls,
    /// Implicit TLS from the first byte (port 465).
    Tls,
    /// No encryption. Only sensible for a local relay.
    None,
}

/// Outgoing mail settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// Connection security.
    pub security: MailSecurity,
    /// SMTP username.
    pub username: Option<String>,
    /// SMTP password. Prefer `SITEKIT_SMTP_PASSWORD`.
    pub password: Option<String>,
    /// Sender address. Falls back to the username.
    pub sender: Option<String>,
    /// Recipient addresses. Falls back to the sender.
    pub recipients: Vec<String>,
    /// Subject line of relayed messages.
    pub subject: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            security: MailSecurity::Starttls,
            username: None,
            password: None,
            sender: None,
            recipients: Vec::new(),
            subject: "Nuevo mensaje de contacto".to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Socket address to bind.
    pub bind: String,
    /// Path of the form endpoint.
    pub route: String,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            route: "/procesar_formulario".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Logo generator settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Initials drawn in the center plate.
    pub initials: String,
    /// Full name shown in the horizontal lockup.
    pub name: String,
    /// Role line shown under the name.
    pub role: String,
    /// Directory the artifacts are written to.
    pub out_dir: PathBuf,
    /// Edge length of the square mark in pixels.
    pub size: u32,
    /// Extra font files tried before the built-in candidate list.
    pub fonts: Vec<PathBuf>,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            initials: "IGP".to_string(),
            name: "IVÁN GÓMEZ PASCUAL".to_string(),
            role: "DATA SCIENTIST | PhD CANDIDATE".to_string(),
            out_dir: PathBuf::from("LOGOS"),
            size: crate::logo::DEFAULT_SIZE,
            fonts: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Apply the `SITEKIT_*` environment overrides on top of the file.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`. Empty values count as unset.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(username) = get("SITEKIT_SMTP_USERNAME") {
            self.mail.username = Some(username);
        }
        if let Some(password) = get("SITEKIT_SMTP_PASSWORD") {
            self.mail.password = Some(password);
        }
        if let Some(sender) = get("SITEKIT_MAIL_SENDER") {
            self.mail.sender = Some(sender);
        }
        if let Some(list) = get("SITEKIT_MAIL_RECIPIENTS") {
            self.mail.recipients = split_addresses(&list);
        }
        self
    }

    /// SMTP username.
    #[must_use]
    pub fn smtp_username(&self) -> Option<String> {
        self.mail.username.clone()
    }

    /// SMTP password.
    #[must_use]
    pub fn smtp_password(&self) -> Option<String> {
        self.mail.password.clone()
    }

    /// Sender address: `mail.sender`, then the username.
    #[must_use]
    pub fn mail_sender(&self) -> Option<String> {
        self.mail.sender.clone().or_else(|| self.smtp_username())
    }

    /// Recipients: `mail.recipients`, then the sender alone.
    #[must_use]
    pub fn mail_recipients(&self) -> Vec<String> {
        if !self.mail.recipients.is_empty() {
            return self.mail.recipients.clone();
        }
        self.mail_sender().into_iter().collect()
    }
}

fn split_addresses(list: &str) -> Vec<String> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `SITEKIT_CONFIG` environment variable
/// 3. `~/.config/sitekit/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("SITEKIT_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/sitekit/config.toml")
    } else {
        PathBuf::from("sitekit.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contact_form_setup() {
        let config = Config::default();
        assert_eq!(config.mail.host, "smtp.gmail.com");
        assert_eq!(config.mail.port, 587);
        assert_eq!(config.mail.security, MailSecurity::Starttls);
        assert_eq!(config.mail.subject, "Nuevo mensaje de contacto");
        assert_eq!(config.serve.route, "/procesar_formulario");
        assert_eq!(config.logo.initials, "IGP");
        assert_eq!(config.logo.size, 1024);
        assert_eq!(config.logo.out_dir, PathBuf::from("LOGOS"));
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.serve.bind, "127.0.0.1:5000");
    }

    #[test]
    fn load_partial_toml_keeps_other_defaults() {
        let dir = std::env::temp_dir().join("sitekit_config_partial_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[mail]
host = "mail.example.com"
port = 465
security = "tls"
sender = "web@example.com"
recipients = ["a@example.com", "b@example.com"]

[logo]
initials = "ABC"
fonts = ["/opt/fonts/Inter-Bold.ttf"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.mail.host, "mail.example.com");
        assert_eq!(config.mail.port, 465);
        assert_eq!(config.mail.security, MailSecurity::Tls);
        assert_eq!(config.mail.subject, "Nuevo mensaje de contacto");
        assert_eq!(config.mail.recipients.len(), 2);
        assert_eq!(config.logo.initials, "ABC");
        assert_eq!(config.logo.size, 1024);
        assert_eq!(config.logo.fonts, vec![PathBuf::from("/opt/fonts/Inter-Bold.ttf")]);
        assert_eq!(config.serve.max_body_bytes, 65536);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("sitekit_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[mail\nport = 'x'").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_security_is_rejected() {
        let parsed: Result<Config, _> = toml::from_str("[mail]\nsecurity = \"ssl3\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn recipients_fall_back_to_sender() {
        let config = Config {
            mail: MailConfig { sender: Some("me@example.com".into()), ..MailConfig::default() },
            ..Config::default()
        };
        assert_eq!(config.mail_recipients(), vec!["me@example.com".to_string()]);
    }

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| vars.iter().find(|(k, _)| *k == name).map(|(_, v)| (*v).to_string())
    }

    #[test]
    fn env_overrides_win_over_file() {
        let config = Config {
            mail: MailConfig {
                username: Some("file@example.com".into()),
                sender: Some("file@example.com".into()),
                ..MailConfig::default()
            },
            ..Config::default()
        }
        .with_overrides(env(&[
            ("SITEKIT_SMTP_USERNAME", "env@example.com"),
            ("SITEKIT_SMTP_PASSWORD", "app-password"),
            ("SITEKIT_MAIL_RECIPIENTS", "a@example.com, b@example.com"),
        ]));
        assert_eq!(config.smtp_username().as_deref(), Some("env@example.com"));
        assert_eq!(config.smtp_password().as_deref(), Some("app-password"));
        assert_eq!(config.mail_sender().as_deref(), Some("file@example.com"));
        assert_eq!(config.mail_recipients(), vec!["a@example.com".to_string(), "b@example.com".to_string()]);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let config = Config {
            mail: MailConfig { sender: Some("file@example.com".into()), ..MailConfig::default() },
            ..Config::default()
        }
        .with_overrides(env(&[("SITEKIT_MAIL_SENDER", "  "), ("SITEKIT_SMTP_PASSWORD", "")]));
        assert_eq!(config.mail_sender().as_deref(), Some("file@example.com"));
        assert!(config.smtp_password().is_none());
    }

    #[test]
    fn sender_falls_back_to_username() {
        let config = Config::default().with_overrides(env(&[("SITEKIT_SMTP_USERNAME", "me@example.com")]));
        assert_eq!(config.mail_sender().as_deref(), Some("me@example.com"));
        assert_eq!(config.mail_recipients(), vec!["me@example.com".to_string()]);
    }

    #[test]
    fn split_addresses_trims_and_skips_blanks() {
        assert_eq!(
            split_addresses(" a@example.com, ,b@example.com ,"),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
