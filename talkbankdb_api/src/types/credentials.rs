use serde::{Deserialize, Serialize};

/// Login for one protected collection, sent inside `nsAuth`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Bank or collection path the login applies to (e.g. `aphasia`).
    pub path: String,

    #[serde(rename = "userID")]
    pub user_id: String,

    #[serde(rename = "pswd")]
    pub password: String,
}

impl Credentials {
    pub fn new(path: &str, user_id: &str, password: &str) -> Self {
        Self {
            path: path.to_string(),
            user_id: user_id.to_string(),
            password: password.to_string(),
        }
    }
}

// Keeps passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("path", &self.path)
            .field("user_id", &self.user_id)
            .field("password", &"***")
            .finish()
    }
}
