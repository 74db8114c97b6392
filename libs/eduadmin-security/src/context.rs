use crate::UserId;

/// `SecurityContext` describes the authenticated caller of a single request.
///
/// It is built once per request by the host (CLI, HTTP layer) and passed explicitly
/// down the call chain; nothing here is stored globally.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    subject_id: UserId,
    subject_name: Option<String>,
    request_id: Option<String>,
}

impl SecurityContext {
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Context for a caller with no identity. Resolves to no role grants at all.
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    #[must_use]
    pub fn subject_id(&self) -> UserId {
        self.subject_id
    }

    #[must_use]
    pub fn subject_name(&self) -> Option<&str> {
        self.subject_name.as_deref()
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.subject_id == 0
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    subject_id: Option<UserId>,
    subject_name: Option<String>,
    request_id: Option<String>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn subject_id(mut self, subject_id: UserId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn subject_name(mut self, name: &str) -> Self {
        self.subject_name = Some(name.to_owned());
        self
    }

    #[must_use]
    pub fn request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject_id: self.subject_id.unwrap_or_default(),
            subject_name: self.subject_name,
            request_id: self.request_id,
        }
    }
}
