use serde::{Deserialize, Serialize};

use super::enums::Gender;

/// Locally stored user profile, written at registration or mock login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub email: String,
    pub full_name: String,
    #[serde(deserialize_with = "super::flexible::optional_age")]
    pub age: Option<u16>,
    #[serde(deserialize_with = "super::flexible::blank_as_none")]
    pub gender: Option<Gender>,
    pub city: String,
    pub chronic_diseases: String,
    pub allergies: String,
    pub bad_habits: String,
    /// Body features noted over the user's lifetime.
    pub body_features: String,
}

impl UserProfile {
    /// Name shown on feedback entries: full name, else email.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let profile = UserProfile {
            email: "a@b.kz".into(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "a@b.kz");
    }

    #[test]
    fn deserializes_partial_record() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"email":"x@y.z","fullName":"User"}"#).unwrap();
        assert_eq!(profile.full_name, "User");
        assert!(profile.age.is_none());
        assert!(profile.city.is_empty());
    }

    #[test]
    fn age_typed_as_text_is_accepted() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"email":"x@y.z","age":"34"}"#).unwrap();
        assert_eq!(profile.age, Some(34));
        let profile: UserProfile = serde_json::from_str(r#"{"age":""}"#).unwrap();
        assert_eq!(profile.age, None);
    }
}
