use std::path::PathBuf;

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DATASET_NAME: &str = "transcription_factors";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_SMTP_PORT: u16 = 465;

/// Outbound mail settings for the contact form
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Address contact messages are delivered to
    pub to: String,
    /// Envelope sender; defaults to the recipient
    pub from: String,
}

/// Server configuration, read from `TFDB_*` environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub dataset_name: String,
    pub case_sensitive_symbols: bool,
    /// `None` when no SMTP host or recipient is set
    pub smtp: Option<SmtpConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let smtp = match (get("TFDB_SMTP_HOST"), get("TFDB_CONTACT_TO")) {
            (Some(host), Some(to)) => Some(SmtpConfig {
                port: get("TFDB_SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                username: get("TFDB_SMTP_USER"),
                password: get("TFDB_SMTP_PASSWORD"),
                from: get("TFDB_CONTACT_FROM").unwrap_or_else(|| to.clone()),
                host,
                to,
            }),
            _ => None,
        };

        Config {
            bind: get("TFDB_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            data_dir: PathBuf::from(
                get("TFDB_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            ),
            static_dir: PathBuf::from(
                get("TFDB_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            ),
            dataset_name: get("TFDB_DATASET_NAME")
                .unwrap_or_else(|| DEFAULT_DATASET_NAME.to_string()),
            case_sensitive_symbols: get("TFDB_SYMBOL_CASE_SENSITIVE")
                .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
            smtp,
        }
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.data_dir.join("docs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::default();
        assert_eq!(config.bind, "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.dataset_name, "transcription_factors");
        assert!(!config.case_sensitive_symbols);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn smtp_needs_host_and_recipient() {
        let config = Config::from_lookup(lookup(&[("TFDB_SMTP_HOST", "smtp.example.org")]));
        assert!(config.smtp.is_none());

        let config = Config::from_lookup(lookup(&[
            ("TFDB_SMTP_HOST", "smtp.example.org"),
            ("TFDB_CONTACT_TO", "team@example.org"),
            ("TFDB_SMTP_PORT", "587"),
            ("TFDB_SMTP_USER", "  "),
        ]));
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.from, "team@example.org");
        assert_eq!(smtp.username, None);
    }

    #[test]
    fn case_sensitivity_flag() {
        let config = Config::from_lookup(lookup(&[("TFDB_SYMBOL_CASE_SENSITIVE", "TRUE")]));
        assert!(config.case_sensitive_symbols);
    }
}
