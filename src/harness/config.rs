use std::fmt;

/// Where the backend and its frontend live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub host: String,
    pub api_port: u16,
    pub frontend_port: u16,
    pub use_https: bool,
}

impl EndpointConfig {
    /// Plain HTTP configuration
    pub fn new(host: impl Into<String>, api_port: u16, frontend_port: u16) -> Self {
        EndpointConfig {
            host: host.into(),
            api_port,
            frontend_port,
            use_https: false,
        }
    }

    /// Switch between `https` and `http`
    pub fn use_https(self, use_https: bool) -> Self {
        Self { use_https, ..self }
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_https {
            "https"
        } else {
            "http"
        }
    }

    /// `scheme://host:frontend_port`
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.frontend_port)
    }

    /// The origin followed by `/`, sent as `referer` on every request
    pub fn referer(&self) -> String {
        format!("{}/", self.origin())
    }

    /// `scheme://host:api_port/api/v1/{endpoint}`
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}://{}:{}/api/v1/{}",
            self.scheme(),
            self.host,
            self.api_port,
            endpoint
        )
    }
}

/// Username and password of the account under test
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Account {
            username: username.into(),
            password: password.into(),
        }
    }

    pub(crate) fn form(&self) -> [(&'static str, &str); 2] {
        [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_urls() {
        let config = EndpointConfig::new("192.168.86.11", 3031, 8080);
        assert_eq!(config.origin(), "http://192.168.86.11:8080");
        assert_eq!(config.referer(), "http://192.168.86.11:8080/");
        assert_eq!(
            config.url("create_account"),
            "http://192.168.86.11:3031/api/v1/create_account"
        );

        let config = config.use_https(true);
        assert_eq!(config.referer(), "https://192.168.86.11:8080/");
        assert_eq!(config.url("x"), "https://192.168.86.11:3031/api/v1/x");
    }

    #[test]
    fn test_account_debug_hides_password() {
        let account = Account::new("runningstreamllc+test10@gmail.com", "12345");
        let debug = format!("{:?}", account);
        assert!(debug.contains("runningstreamllc+test10@gmail.com"));
        assert!(!debug.contains("12345"));
    }
}
