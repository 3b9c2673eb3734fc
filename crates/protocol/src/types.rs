use serde::{Deserialize, Serialize};

/// Identity of the user who sent a media message.
///
/// Every field is optional: bot accounts, privacy settings, and users
/// without a username can leave any of them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderIdentity {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl SenderIdentity {
    /// Returns the display string `"(@{username}) {first} {last}"`.
    ///
    /// Absent fields render as empty. The result may contain characters
    /// that are not filesystem-safe; callers that derive folder names from
    /// it must sanitize it first.
    pub fn profile_string(&self) -> String {
        format!(
            "(@{}) {} {}",
            self.username.as_deref().unwrap_or(""),
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
    }
}
