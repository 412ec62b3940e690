use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream is not identified, context budgets
    /// are inverted, or the rate limit is unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_vertex_config()?;
        self.validate_context_config()?;
        self.validate_rate_limit_config()?;
        Ok(())
    }

    fn validate_vertex_config(&self) -> anyhow::Result<()> {
        let vertex = &self.llm.vertex;

        if vertex.project_id.trim().is_empty() {
            anyhow::bail!("llm.vertex.project_id must not be empty");
        }

        if vertex.model.trim().is_empty() {
            anyhow::bail!("llm.vertex.model must not be empty");
        }

        Ok(())
    }

    fn validate_context_config(&self) -> anyhow::Result<()> {
        let context = &self.llm.context;

        if context.max_size == 0 {
            anyhow::bail!("llm.context.max_size must be greater than 0");
        }

        if context.preferred_size > context.max_size {
            anyhow::bail!(
                "llm.context.preferred_size ({}) must not exceed max_size ({})",
                context.preferred_size,
                context.max_size
            );
        }

        Ok(())
    }

    fn validate_rate_limit_config(&self) -> anyhow::Result<()> {
        let rate_limit = &self.server.rate_limit;

        if !rate_limit.enabled {
            return Ok(());
        }

        if rate_limit.requests == 0 {
            anyhow::bail!("server.rate_limit.requests must be greater than 0");
        }

        if rate_limit.window_duration()?.is_zero() {
            anyhow::bail!("server.rate_limit.window must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{LogFormat, Origins};

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            listen_address = "127.0.0.1:9000"

            [server.cors]
            origins = "*"

            [llm.vertex]
            project_id = "demo"

            [telemetry]
            log_format = "json"
            "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.listen_address().port(), 9000);
        assert_eq!(config.server.cors.unwrap().origins, Origins::Any);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.server.health.path, "/v1/health");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Config::load(Path::new("/nonexistent/relay.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn project_id_is_required() {
        let err = Config::parse("[llm.vertex]\nproject_id = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("project_id"));
    }

    #[test]
    fn inverted_context_budgets_are_rejected() {
        let err = Config::parse(
            r#"
            [llm.vertex]
            project_id = "p"

            [llm.context]
            max_size = 100
            preferred_size = 200
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("preferred_size"));
    }

    #[test]
    fn zero_rate_limit_is_rejected_only_when_enabled() {
        let base = "[llm.vertex]\nproject_id = \"p\"\n";

        let err = Config::parse(&format!("{base}[server.rate_limit]\nrequests = 0\n")).unwrap_err();
        assert!(err.to_string().contains("requests"));

        Config::parse(&format!("{base}[server.rate_limit]\nenabled = false\nrequests = 0\n")).unwrap();
    }

    #[test]
    fn env_placeholders_are_expanded_before_parsing() {
        temp_env::with_var("RELAY_LOADER_PROJECT", Some("from-env"), || {
            let config = Config::parse("[llm.vertex]\nproject_id = \"{{ env.RELAY_LOADER_PROJECT }}\"\n").unwrap();
            assert_eq!(config.llm.vertex.project_id, "from-env");
        });
    }
}
