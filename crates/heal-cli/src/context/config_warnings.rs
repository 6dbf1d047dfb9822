use heal_config::HealConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &HealConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &HealConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.suggester.is_configured() && has_env_prefix(&env_keys, "HEALGRAPH_SUGGESTER") {
        warnings.push(
            "Suggester config appears default while HEALGRAPH_SUGGESTER* env vars exist. Use double underscores (example: HEALGRAPH_SUGGESTER__API_BASE_URL)."
                .to_string(),
        );
    }

    if config.healing.external_fallback && !config.suggester.is_configured() {
        warnings.push(
            "No suggestion provider configured: auto-heal fails for elements without healing history. Set [suggester] api_base_url and model, or [healing] external_fallback = false."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
