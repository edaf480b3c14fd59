/// Compute the effective list limit: `--limit` flag, then the configured
/// default. A limit of `0` means no limit.
#[must_use]
pub fn effective_limit(flag: Option<u32>, configured: u32) -> Option<u32> {
    Some(flag.unwrap_or(configured)).filter(|limit| *limit > 0)
}
