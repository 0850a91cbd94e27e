use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::ValidationError;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{4,16}$").expect("username pattern is valid"));

/// 4 to 16 ascii letters and digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Username {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if USERNAME_PATTERN.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ValidationError::InvalidUsername)
        }
    }
}

impl TryFrom<String> for Username {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: Username,
}

impl HasId for User {
    type IdType = i64;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("user1212")]
    #[case("abcd")]
    #[case("ABCDEFGHIJKLMNOP")]
    #[case("1234")]
    fn accepts(#[case] input: &str) {
        assert_eq!(input.parse::<Username>().map(String::from), Ok(input.to_owned()));
    }

    #[rstest]
    #[case("ab1")]
    #[case("abcdefghijklmnopq")]
    #[case("user_1212")]
    #[case("user 1212")]
    #[case("üser1212")]
    #[case("")]
    fn rejects(#[case] input: &str) {
        assert_eq!(input.parse::<Username>(), Err(ValidationError::InvalidUsername));
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<User>(r#"{"username":"user1212"}"#).is_ok());
        assert!(serde_json::from_str::<User>(r#"{"username":"ab1"}"#).is_err());
    }
}
