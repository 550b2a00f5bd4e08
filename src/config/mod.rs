#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::HarvestConfig;

pub const ROR_PREFIX: &str = "https://ror.org/";

/// Bare ROR ID, whether given as `https://ror.org/<id>` or just `<id>`.
pub fn ror_id(ror: &str) -> &str {
    let ror = ror.trim();
    ror.strip_prefix(ROR_PREFIX).unwrap_or(ror)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ror_id() {
        assert_eq!(ror_id("https://ror.org/03yrm5c26"), "03yrm5c26");
        assert_eq!(ror_id("03yrm5c26"), "03yrm5c26");
    }
}
