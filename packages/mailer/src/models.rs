use serde::Deserialize;

/// Response returned by the mail relay after accepting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
