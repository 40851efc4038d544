use serde::{Deserialize, Serialize};

/// A user record as exchanged with the backend.
///
/// `id` is absent on a draft and assigned by the backend on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: Some(id), name: Some(name.into()), email: Some(email.into()) }
    }

    /// A record with an `id` has been stored by the backend.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}

/// Body of create and update requests. Serializes as `{"name":..,"email":..}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct UserPayload<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// Response of a delete. The backend sends `{"result": "success"}`; an empty
/// body yields the default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteOutcome {
    #[serde(default)]
    pub result: Option<String>,
}

/// Response of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(rename = "Status")]
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
