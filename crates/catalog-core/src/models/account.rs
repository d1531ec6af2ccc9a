use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    #[serde(rename = "UserName")]
    pub username: String,
    #[serde(rename = "PassWord")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(alias = "Token", alias = "accessToken")]
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    #[serde(rename = "UserName")]
    pub username: String,
    #[serde(rename = "PassWord")]
    pub password: String,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "PersonalEmail")]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_uses_backend_field_names() {
        let req = SignUpRequest {
            username: "ada".to_string(),
            password: "pw".to_string(),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.org".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["UserName"], "ada");
        assert_eq!(value["PassWord"], "pw");
        assert_eq!(value["FullName"], "Ada Lovelace");
        assert_eq!(value["PersonalEmail"], "ada@example.org");
    }

    #[test]
    fn test_sign_in_response_aliases() {
        let a: SignInResponse = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        let b: SignInResponse = serde_json::from_str(r#"{"Token":"abc"}"#).unwrap();
        assert_eq!(a.token, b.token);
    }
}
