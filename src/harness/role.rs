use std::fmt::{self, Display, Formatter};

/// Authentication audience on the backend. Each role has its own
/// `authenticate_{role}` endpoint and its own session cookie.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Role {
    /// Human operator UI (`fe`)
    Frontend,
    /// Read-only device scope (`ro`), used by a Roku fetching its channel descriptor
    Roku,
    /// Display device scope (`di`)
    Display,
}

impl Role {
    /// The suffix the backend uses in endpoint names
    pub fn suffix(self) -> &'static str {
        match self {
            Role::Frontend => "fe",
            Role::Roku => "ro",
            Role::Display => "di",
        }
    }

    pub fn authenticate_endpoint(self) -> String {
        format!("authenticate_{}", self.suffix())
    }

    pub fn validate_session_endpoint(self) -> String {
        format!("validate_session_{}", self.suffix())
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
