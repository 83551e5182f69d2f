use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange API key triple used for L2 (HMAC) request signing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredentials {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub secret: String,
    pub passphrase: String,
}

impl ApiCredentials {
    /// Lines to paste into `.env`.
    pub fn env_lines(&self) -> [String; 3] {
        [
            format!("POLY_API_KEY={}", self.api_key),
            format!("POLY_SECRET={}", self.secret),
            format!("POLY_PASSPHRASE={}", self.passphrase),
        ]
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secret() {
        let creds = ApiCredentials {
            api_key: "key".into(),
            secret: "c2VjcmV0".into(),
            passphrase: "pass".into(),
        };
        let shown = format!("{:?}", creds);
        assert!(shown.contains("key"));
        assert!(!shown.contains("c2VjcmV0"));
        assert!(!shown.contains("pass\""));
    }

    #[test]
    fn parses_exchange_reply() {
        let creds: ApiCredentials =
            serde_json::from_str(r#"{"apiKey":"k","secret":"s","passphrase":"p"}"#).unwrap();
        assert_eq!(creds.env_lines()[0], "POLY_API_KEY=k");
    }
}
