use std::fmt;

/// Fixed fields of a Fedora package review request.
pub const REVIEW_PRODUCT: &str = "Fedora";
pub const REVIEW_COMPONENT: &str = "Package Review";
pub const REVIEW_VERSION: &str = "rawhide";
pub const REVIEW_PLATFORM: &str = "Unspecified";
pub const REVIEW_OP_SYS: &str = "Unspecified";
pub const REVIEW_SEVERITY: &str = "unspecified";
pub const REVIEW_PRIORITY: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub url: String,
    pub summary: String,
    pub status: Option<String>,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            Some(status) => write!(f, "#{} {} - {}", self.id, status, self.summary),
            None => write!(f, "#{} - {}", self.id, self.summary),
        }
    }
}
