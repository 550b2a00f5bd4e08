use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub output: OutputConfig,
    #[serde(default)]
    pub institution: InstitutionConfig,
    #[serde(default)]
    pub zenodo: ZenodoConfig,
    #[serde(default)]
    pub osf: OsfConfig,
    #[serde(default)]
    pub pangaea: SearchTermsConfig,
    #[serde(default)]
    pub figshare: FigshareConfig,
    #[serde(default)]
    pub gbif: SearchTermsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix of every output file name.
    pub file_identifier: String,
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstitutionConfig {
    #[serde(default)]
    pub ror: String,
    #[serde(default)]
    pub osf_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZenodoConfig {
    #[serde(default)]
    pub search_terms: Vec<String>,
    #[serde(default)]
    pub access_token: String,
    /// Fetch each record's metadata into extra columns.
    #[serde(default)]
    pub enrich: bool,
    pub rate_limit_per_minute: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsfConfig {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchTermsConfig {
    #[serde(default)]
    pub search_terms: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FigshareConfig {
    #[serde(default)]
    pub search_terms: Vec<String>,
    /// Unset means the default of two pages; 0 is rejected.
    pub max_pages: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl HttpConfig {
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("repo-harvest/{}", env!("CARGO_PKG_VERSION")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub datacite: String,
    pub dryad: String,
    pub zenodo: String,
    pub osf: String,
    pub pangaea: String,
    pub figshare: String,
    pub gbif: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            datacite: "https://api.datacite.org".to_string(),
            dryad: "https://datadryad.org".to_string(),
            zenodo: "https://zenodo.org/api".to_string(),
            osf: "https://api.osf.io/v2".to_string(),
            pangaea: "https://www.pangaea.de".to_string(),
            figshare: "https://api.figshare.com/v2".to_string(),
            gbif: "https://api.gbif.org/v1".to_string(),
        }
    }
}

impl EndpointsConfig {
    /// Every endpoint pointed at one base URL, for local test servers.
    pub fn all(base: &str) -> Self {
        Self {
            datacite: base.to_string(),
            dryad: base.to_string(),
            zenodo: base.to_string(),
            osf: base.to_string(),
            pangaea: base.to_string(),
            figshare: base.to_string(),
            gbif: base.to_string(),
        }
    }
}

/// Search terms with blank entries removed.
pub fn active_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl HarvestConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HarvestError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HarvestError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value. Unset variables become
    /// empty strings, which leaves the repository that needs them skipped.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HarvestError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("Environment variable {} is not set", var_name);
                String::new()
            })
        });

        Ok(result.to_string())
    }

    pub fn output_directory(&self) -> &str {
        self.output.directory.as_deref().unwrap_or(".")
    }

    pub fn figshare_max_pages(&self) -> usize {
        self.figshare.max_pages.unwrap_or(2)
    }

    pub fn zenodo_rate_limit(&self) -> u32 {
        self.zenodo.rate_limit_per_minute.unwrap_or(60)
    }
}

impl Validate for HarvestConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_file_identifier("output.file_identifier", &self.output.file_identifier)?;
        validation::validate_path("output.directory", self.output_directory())?;
        validation::validate_ror("institution.ror", self.institution.ror.trim())?;

        let endpoints = [
            ("endpoints.datacite", &self.endpoints.datacite),
            ("endpoints.dryad", &self.endpoints.dryad),
            ("endpoints.zenodo", &self.endpoints.zenodo),
            ("endpoints.osf", &self.endpoints.osf),
            ("endpoints.pangaea", &self.endpoints.pangaea),
            ("endpoints.figshare", &self.endpoints.figshare),
            ("endpoints.gbif", &self.endpoints.gbif),
        ];
        for (field, url) in endpoints {
            validation::validate_url(field, url)?;
        }

        validation::validate_positive_number("figshare.max_pages", self.figshare_max_pages(), 1)?;
        validation::validate_positive_number(
            "zenodo.rate_limit_per_minute",
            self.zenodo_rate_limit() as usize,
            1,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[output]
file_identifier = "UNI"
directory = "./harvest"

[institution]
ror = "https://ror.org/03yrm5c26"
osf_id = "uni"

[zenodo]
search_terms = ["Example University", "Univ. of Example"]
access_token = "zen"
enrich = true

[osf]
access_token = "osf"

[pangaea]
search_terms = ["Example University"]

[figshare]
search_terms = ["Example University"]
max_pages = 5

[gbif]
search_terms = ["Example University"]

[http]
timeout_seconds = 30
"#;

        let config = HarvestConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.output.file_identifier, "UNI");
        assert_eq!(config.output_directory(), "./harvest");
        assert_eq!(config.zenodo.search_terms.len(), 2);
        assert!(config.zenodo.enrich);
        assert_eq!(config.zenodo_rate_limit(), 60);
        assert_eq!(config.figshare_max_pages(), 5);
        assert_eq!(config.http.timeout_seconds, Some(30));
        assert_eq!(config.endpoints.gbif, "https://api.gbif.org/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = HarvestConfig::from_toml_str("[output]\nfile_identifier = \"X\"\n").unwrap();

        assert_eq!(config.output_directory(), ".");
        assert_eq!(config.figshare_max_pages(), 2);
        assert!(config.institution.ror.is_empty());
        assert_eq!(config.endpoints.datacite, "https://api.datacite.org");
        assert!(config.http.user_agent().starts_with("repo-harvest/"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REPO_HARVEST_TEST_TOKEN", "secret-token");

        let toml_content = r#"
[output]
file_identifier = "UNI"

[zenodo]
access_token = "${REPO_HARVEST_TEST_TOKEN}"

[osf]
access_token = "${REPO_HARVEST_TEST_UNSET_TOKEN}"
"#;

        let config = HarvestConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.zenodo.access_token, "secret-token");
        assert_eq!(config.osf.access_token, "");

        std::env::remove_var("REPO_HARVEST_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = r#"
[output]
file_identifier = "UNI"

[endpoints]
gbif = "invalid-url"
"#;
        let config = HarvestConfig::from_toml_str(bad_endpoint).unwrap();
        assert!(config.validate().is_err());

        let zero_pages = r#"
[output]
file_identifier = "UNI"

[figshare]
max_pages = 0
"#;
        let config = HarvestConfig::from_toml_str(zero_pages).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_active_terms_drop_blanks() {
        let terms = vec!["".to_string(), " Example University ".to_string(), "  ".to_string()];
        assert_eq!(active_terms(&terms), vec!["Example University"]);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nfile_identifier = \"FILE\"\n")
            .unwrap();

        let config = HarvestConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.file_identifier, "FILE");
    }
}
