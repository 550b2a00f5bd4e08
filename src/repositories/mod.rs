//! Per-repository search configurations.
//!
//! Each repository is a [`RepositorySpec`] value built from the harvest
//! configuration; the generic pipeline does the rest.

pub mod datacite;
pub mod dryad;
pub mod figshare;
pub mod gbif;
pub mod osf;
pub mod pangaea;
pub mod zenodo;

use crate::config::toml_config::active_terms;
use crate::config::HarvestConfig;
use crate::core::pipeline::RepositorySpec;
use crate::utils::error::Result;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repository {
    DataCite,
    Dryad,
    Zenodo,
    Osf,
    Pangaea,
    Figshare,
    Gbif,
}

impl Repository {
    /// Execution order.
    pub const ALL: [Repository; 7] = [
        Repository::DataCite,
        Repository::Dryad,
        Repository::Zenodo,
        Repository::Osf,
        Repository::Pangaea,
        Repository::Figshare,
        Repository::Gbif,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Repository::DataCite => "DataCite",
            Repository::Dryad => "Dryad",
            Repository::Zenodo => "Zenodo",
            Repository::Osf => "OSF",
            Repository::Pangaea => "Pangaea",
            Repository::Figshare => "Figshare",
            Repository::Gbif => "GBIF",
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Repository {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Repository::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = Repository::ALL.iter().map(|r| r.name()).collect();
                format!("unknown repository '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone)]
pub enum Plan {
    Run(Box<RepositorySpec>),
    Skip {
        repository: Repository,
        reason: String,
    },
}

fn skip(repository: Repository, reason: &str) -> Plan {
    Plan::Skip {
        repository,
        reason: reason.to_string(),
    }
}

/// Build the [`RepositorySpec`] for `repository`, or explain which parameter is missing.
pub fn plan(repository: Repository, config: &HarvestConfig) -> Result<Plan> {
    let endpoints = &config.endpoints;
    let ror = config.institution.ror.trim();

    let spec = match repository {
        Repository::DataCite => {
            if ror.is_empty() {
                return Ok(skip(repository, "institution.ror is empty"));
            }
            datacite::spec(ror, &endpoints.datacite)
        }
        Repository::Dryad => {
            if ror.is_empty() {
                return Ok(skip(repository, "institution.ror is empty"));
            }
            dryad::spec(ror, &endpoints.dryad)
        }
        Repository::Zenodo => {
            let terms = active_terms(&config.zenodo.search_terms);
            let token = config.zenodo.access_token.trim();
            if terms.is_empty() || token.is_empty() {
                return Ok(skip(
                    repository,
                    "zenodo.search_terms and zenodo.access_token are both required",
                ));
            }
            let enrichment = if config.zenodo.enrich {
                Some(zenodo::enrichment(&endpoints.zenodo, config.zenodo_rate_limit())?)
            } else {
                None
            };
            zenodo::spec(&terms, token, &endpoints.zenodo, enrichment)
        }
        Repository::Osf => {
            let osf_id = config.institution.osf_id.trim();
            let token = config.osf.access_token.trim();
            if osf_id.is_empty() || token.is_empty() {
                return Ok(skip(
                    repository,
                    "institution.osf_id and osf.access_token are both required",
                ));
            }
            osf::spec(osf_id, token, &endpoints.osf)
        }
        Repository::Pangaea => {
            let terms = active_terms(&config.pangaea.search_terms);
            if terms.is_empty() {
                return Ok(skip(repository, "pangaea.search_terms is empty"));
            }
            pangaea::spec(&terms, &endpoints.pangaea)
        }
        Repository::Figshare => {
            let terms = active_terms(&config.figshare.search_terms);
            if terms.is_empty() {
                return Ok(skip(repository, "figshare.search_terms is empty"));
            }
            figshare::spec(&terms, &endpoints.figshare, config.figshare_max_pages())
        }
        Repository::Gbif => {
            let terms = active_terms(&config.gbif.search_terms);
            if terms.is_empty() {
                return Ok(skip(repository, "gbif.search_terms is empty"));
            }
            gbif::spec(&terms, &endpoints.gbif)
        }
    };

    Ok(Plan::Run(Box::new(spec)))
}

/// Plans for every repository in execution order, restricted to `only`
/// when it is non-empty.
pub fn plan_all(config: &HarvestConfig, only: &[Repository]) -> Result<Vec<Plan>> {
    Repository::ALL
        .into_iter()
        .filter(|r| only.is_empty() || only.contains(r))
        .map(|r| plan(r, config))
        .collect()
}

/// Joins terms with `OR`, each rendered by `term`.
pub(crate) fn or_query(terms: &[String], term: impl Fn(&str) -> String) -> String {
    terms
        .iter()
        .map(|t| term(t))
        .collect::<Vec<_>>()
        .join(" OR ")
}

pub(crate) fn trimmed_base(base: &str) -> &str {
    base.trim_end_matches('/')
}
