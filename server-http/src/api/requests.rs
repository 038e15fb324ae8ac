use serde::{Deserialize, Serialize};

/// Body accepted by the service role.
#[derive(Debug, Serialize, Deserialize)]
pub struct GreetingRequest {
    #[serde(alias = "Text")]
    pub text: String,
}

/// Body accepted by the data role.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(alias = "Hash")]
    pub hash: String,
}

/// Body accepted by the rate role.
#[derive(Debug, Serialize, Deserialize)]
pub struct RateRequest {
    pub msisdn: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalised_field_names_are_accepted() {
        let greeting: GreetingRequest = serde_json::from_str(r#"{"Text":"hi"}"#).unwrap();
        assert_eq!(greeting.text, "hi");

        let token: TokenRequest = serde_json::from_str(r#"{"Hash":"abc"}"#).unwrap();
        assert_eq!(token.hash, "abc");
    }

    #[test]
    fn test_serialises_lowercase() {
        let body = serde_json::to_string(&TokenRequest { hash: "abc".into() }).unwrap();
        assert_eq!(body, r#"{"hash":"abc"}"#);
    }
}
