use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;
use url::Url;

use super::VerifierError;
use crate::config::bare_domain;

/// `https://{domain}/.well-known/jwks.json`
pub fn jwks_url(domain: &str) -> Result<Url, VerifierError> {
    let base = Url::parse(&format!("https://{}/", bare_domain(domain)))?;
    Ok(base.join(".well-known/jwks.json")?)
}

/// Upper bound on the startup key fetch
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch the provider's published signing keys
pub async fn fetch_jwks(url: &Url, timeout: Duration) -> Result<JwkSet, VerifierError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let set = client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await?;
    Ok(set)
}
