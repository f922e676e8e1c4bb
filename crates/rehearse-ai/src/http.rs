//! Process-wide HTTP client shared by every provider.

use std::{sync::LazyLock, time::Duration};

/// Default per-request timeout for provider calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build tuned HTTP client, using defaults: {}", e);
            reqwest::Client::new()
        })
});

/// Get the shared client. Built on first use and reused for every round,
/// so connections and TLS sessions are pooled across requests.
pub fn shared_client() -> reqwest::Client {
    CLIENT.clone()
}

/// Build the bearer header map for an API key, plus model-specific extras.
pub(crate) fn auth_headers(
    api_key: &str,
    extra: &std::collections::HashMap<String, String>,
) -> crate::Result<reqwest::header::HeaderMap> {
    let mut headers = reqwest::header::HeaderMap::new();
    let value = format!("Bearer {}", api_key)
        .parse::<reqwest::header::HeaderValue>()
        .map_err(|_| crate::Error::InvalidApiKey)?;
    headers.insert(reqwest::header::AUTHORIZATION, value);

    for (key, value) in extra {
        if let (Ok(name), Ok(val)) = (
            key.parse::<reqwest::header::HeaderName>(),
            value.parse::<reqwest::header::HeaderValue>(),
        ) {
            headers.insert(name, val);
        }
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_auth_headers() {
        let mut extra = HashMap::new();
        extra.insert("x-trace".to_string(), "abc".to_string());
        let headers = auth_headers("sk-test", &extra).unwrap();
        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert_eq!(headers["x-trace"], "abc");
    }

    #[test]
    fn test_auth_headers_rejects_control_chars() {
        let err = auth_headers("bad\nkey", &HashMap::new()).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidApiKey));
    }
}
