use noces_core::entities::Client;
use noces_integrations::docusign::SignerInput;

/// Parse `Name <email>` or a bare email address.
pub fn parse_signer(raw: &str) -> anyhow::Result<SignerInput> {
    let raw = raw.trim();
    let (name, email) = match raw.split_once('<') {
        Some((name, rest)) => {
            let email = rest
                .strip_suffix('>')
                .ok_or_else(|| anyhow::anyhow!("invalid signer '{raw}' (expected Name <email>)"))?;
            (name.trim(), email.trim())
        }
        None => (raw, raw),
    };
    if !email.contains('@') {
        anyhow::bail!("invalid signer '{raw}': '{email}' is not an email address");
    }
    Ok(SignerInput {
        name: if name.is_empty() { email } else { name }.to_string(),
        email: email.to_string(),
    })
}

/// Signers given on the command line, or the client when none are.
pub fn resolve_signers(raw: &[String], client: &Client) -> anyhow::Result<Vec<SignerInput>> {
    if !raw.is_empty() {
        return raw.iter().map(|signer| parse_signer(signer)).collect();
    }
    let email = client.email.as_deref().filter(|email| !email.is_empty()).ok_or_else(|| {
        anyhow::anyhow!(
            "client {} has no email; pass --signer \"Name <email>\"",
            client.id
        )
    })?;
    Ok(vec![SignerInput {
        name: client.name.clone(),
        email: email.to_string(),
    }])
}

#[cfg(test)]
mod tests {
    use super::parse_signer;

    #[test]
    fn parses_name_and_email() {
        let signer = parse_signer("Camille Martin <camille@example.com>").expect("signer");
        assert_eq!(signer.name, "Camille Martin");
        assert_eq!(signer.email, "camille@example.com");
    }

    #[test]
    fn bare_email_is_its_own_name() {
        let signer = parse_signer("lou@example.com").expect("signer");
        assert_eq!(signer.name, "lou@example.com");
    }

    #[test]
    fn rejects_non_email() {
        assert!(parse_signer("Camille").is_err());
        assert!(parse_signer("Camille <camille@example.com").is_err());
    }
}
