use noces_config::NocesConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &NocesConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &NocesConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let sections = [
        ("Store", "NOCES_STORE", config.store.is_configured(), "NOCES_STORE__URL"),
        ("Firebase", "NOCES_FIREBASE", config.firebase.is_configured(), "NOCES_FIREBASE__API_KEY"),
        ("DocuSign", "NOCES_DOCUSIGN", config.docusign.is_configured(), "NOCES_DOCUSIGN__ACCOUNT_ID"),
        ("Qonto", "NOCES_QONTO", config.qonto.is_configured(), "NOCES_QONTO__SECRET_KEY"),
        ("Cloudinary", "NOCES_CLOUDINARY", config.cloudinary.is_configured(), "NOCES_CLOUDINARY__CLOUD_NAME"),
    ];

    sections
        .into_iter()
        .filter(|(_, prefix, configured, _)| !configured && has_env_prefix(&env_keys, prefix))
        .map(|(name, prefix, _, example)| {
            format!(
                "{name} config appears default while {prefix}* env vars exist. Use double underscores (example: {example})."
            )
        })
        .collect()
}

/// `NOCES_STORE__PATH` alone configures a local store, so only keys other
/// than the path count for the store section.
fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter()
        .any(|key| key.starts_with(prefix) && key != "NOCES_STORE__PATH")
}
