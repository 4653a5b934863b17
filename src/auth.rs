//! OAuth 1.0a credentials and request signing.
//!
//! Every request to the upload and status endpoints carries an
//! `Authorization: OAuth ...` header signed with HMAC-SHA1 over the request
//! method, the base URL and all query and form parameters.

use crate::error::{MediaError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use sha1::Sha1;
use std::fmt;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters are left as-is, everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The four credential strings of a user-context OAuth 1.0a app.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl Credentials {
    /// Creates credentials from the consumer key pair and access token pair.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_secret: access_secret.into(),
        }
    }

    /// Reads credentials from `TWITTER_CONSUMER_KEY`, `TWITTER_CONSUMER_SECRET`,
    /// `TWITTER_ACCESS_TOKEN` and `TWITTER_ACCESS_SECRET`.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| MediaError::InvalidCredentials {
                message: format!("{name} is not set"),
            })
        };

        let credentials = Self::new(
            read("TWITTER_CONSUMER_KEY")?,
            read("TWITTER_CONSUMER_SECRET")?,
            read("TWITTER_ACCESS_TOKEN")?,
            read("TWITTER_ACCESS_SECRET")?,
        );
        credentials.validate()?;
        Ok(credentials)
    }

    /// Rejects empty credential strings.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_secret", &self.access_secret),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(MediaError::InvalidCredentials {
                    message: format!("{name} cannot be empty"),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

/// Produces OAuth 1.0a `Authorization` header values.
#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    credentials: Credentials,
}

impl OAuth1Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Builds the header for a request with a fresh nonce and timestamp.
    ///
    /// `params` must hold the form or query parameters sent with the request;
    /// multipart bodies are not signed and must not be passed here.
    pub fn authorization_header(
        &self,
        method: &Method,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<String> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, params, &nonce, &timestamp)
    }

    fn authorization_header_with(
        &self,
        method: &Method,
        url: &str,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.credentials.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.credentials.access_token.clone()),
            ("oauth_version", "1.0".to_string()),
        ];

        let signature = self.signature(method, url, params, &oauth_params)?;
        oauth_params.push(("oauth_signature", signature));
        oauth_params.sort_by(|a, b| a.0.cmp(b.0));

        let fields = oauth_params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {fields}"))
    }

    fn signature(
        &self,
        method: &Method,
        url: &str,
        params: &[(&str, String)],
        oauth_params: &[(&str, String)],
    ) -> Result<String> {
        let mut parsed = Url::parse(url)?;

        let mut pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (encode(&k), encode(&v)))
            .collect();
        pairs.extend(
            params
                .iter()
                .chain(oauth_params.iter())
                .map(|(k, v)| (encode(k), encode(v))),
        );
        pairs.sort();

        let parameter_string = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        parsed.set_query(None);
        parsed.set_fragment(None);

        let base_string = format!(
            "{}&{}&{}",
            method.as_str().to_uppercase(),
            encode(parsed.as_str()),
            encode(&parameter_string)
        );

        let signing_key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.access_secret)
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| MediaError::Internal(anyhow::anyhow!("HMAC key error: {e}")))?;
        mac.update(base_string.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_signer() -> OAuth1Signer {
        OAuth1Signer::new(Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        ))
    }

    #[test]
    fn test_signature_matches_reference_vector() {
        let header = reference_signer()
            .authorization_header_with(
                &Method::POST,
                "https://api.twitter.com/1.1/statuses/update.json?include_entities=true",
                &[(
                    "status",
                    "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
                )],
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
                "1318622958",
            )
            .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_version=\"1.0\""));
    }

    #[test]
    fn test_fresh_nonce_per_header() {
        let signer = reference_signer();
        let url = "https://upload.twitter.com/1.1/media/upload.json";
        let first = signer
            .authorization_header(&Method::GET, url, &[("command", "STATUS".to_string())])
            .unwrap();
        let second = signer
            .authorization_header(&Method::GET, url, &[("command", "STATUS".to_string())])
            .unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_encode_unreserved() {
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode("☃"), "%E2%98%83");
    }

    #[test]
    fn test_credentials_validation_and_redaction() {
        let creds = Credentials::new("key", "secret", "token", "token-secret");
        assert!(creds.validate().is_ok());

        let debug = format!("{creds:?}");
        assert!(!debug.contains("token-secret"));
        assert!(debug.contains("<redacted>"));

        let empty = Credentials::new("key", " ", "token", "token-secret");
        assert!(matches!(
            empty.validate(),
            Err(MediaError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = reference_signer().authorization_header(&Method::POST, "::nope", &[]);
        assert!(matches!(result, Err(MediaError::UrlParse(_))));
    }
}
