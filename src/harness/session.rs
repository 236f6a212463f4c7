use std::collections::HashMap;

use crate::harness::Role;

/// Cache key: one token per username and role
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct SessionKey {
    pub username: String,
    pub role: Role,
}

impl SessionKey {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        SessionKey {
            username: username.into(),
            role,
        }
    }
}

/// Session tokens obtained during this run. Entries are never refreshed or removed.
#[derive(Default, Debug, Clone)]
pub struct SessionCache {
    tokens: HashMap<SessionKey, String>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SessionKey) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &SessionKey) -> bool {
        self.tokens.contains_key(key)
    }

    pub fn insert(&mut self, key: SessionKey, token: String) {
        self.tokens.insert(key, token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// The `name=value` part of a `set-cookie` header, without attributes.
pub fn extract_session_token(set_cookie: &str) -> &str {
    match set_cookie.find(';') {
        Some(end) => &set_cookie[..end],
        None => set_cookie,
    }
}
