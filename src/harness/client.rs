use log::{debug, error, info};
use reqwest::header::{COOKIE, REFERER, SET_COOKIE};
use reqwest::{Response, StatusCode};

use crate::harness::confirm::Confirmation;
use crate::harness::error::{HarnessError, HarnessResult};
use crate::harness::session::{extract_session_token, SessionCache, SessionKey};
use crate::harness::{Account, EndpointConfig, Role};

const CONFIRM_PROMPT: &str = "Press enter when you've confirmed the account.";
const CREATION_NOTICE: &str = "Creation didn't return 200.  ";

/// Client for the channel builder API, holding the account under test and the
/// session tokens obtained so far.
#[derive(Debug)]
pub struct ChannelBuilderClient<C> {
    config: EndpointConfig,
    account: Account,
    sessions: SessionCache,
    confirmation: C,
    http: reqwest::Client,
}

impl<C: Confirmation> ChannelBuilderClient<C> {
    pub fn new(config: EndpointConfig, account: Account, confirmation: C) -> HarnessResult<Self> {
        Ok(ChannelBuilderClient {
            config,
            account,
            sessions: SessionCache::new(),
            confirmation,
            http: reqwest::Client::builder().build()?,
        })
    }

    pub fn origin(&self) -> String {
        self.config.origin()
    }

    pub fn referer(&self) -> String {
        self.config.referer()
    }

    pub fn url(&self, endpoint: &str) -> String {
        self.config.url(endpoint)
    }

    pub fn sessions(&self) -> &SessionCache {
        &self.sessions
    }

    /// Signs up the held account, then waits for the operator whatever the outcome.
    pub async fn create_fresh_account(&mut self) -> HarnessResult<bool> {
        let response = self
            .http
            .post(self.url("create_account"))
            .header(REFERER, self.referer())
            .form(&self.account.form())
            .send()
            .await?;
        let status = response.status();
        debug!("create_account returned {}", status);

        let notice = if status == StatusCode::OK {
            ""
        } else {
            CREATION_NOTICE
        };
        self.confirmation
            .confirm(&format!("{}{}", notice, CONFIRM_PROMPT))
            .await?;

        Ok(status == StatusCode::OK)
    }

    pub async fn authenticate_frontend(&mut self) -> HarnessResult<bool> {
        self.authenticate(Role::Frontend, None).await
    }

    pub async fn authenticate_roku(&mut self) -> HarnessResult<bool> {
        self.authenticate(Role::Roku, None).await
    }

    /// Logs in on the role's endpoint, with `login` or the held account, and caches the
    /// session token on success.
    pub async fn authenticate(&mut self, role: Role, login: Option<&Account>) -> HarnessResult<bool> {
        let account = login.cloned().unwrap_or_else(|| self.account.clone());
        let response = self
            .http
            .post(self.url(&role.authenticate_endpoint()))
            .header(REFERER, self.referer())
            .form(&account.form())
            .send()
            .await?;
        debug!(
            "authenticate_{} returned {} with headers {:?}",
            role,
            response.status(),
            response.headers()
        );

        if response.status() != StatusCode::OK {
            return Ok(false);
        }

        // not necessarily visible ASCII
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .ok_or(HarnessError::MissingSessionCookie(role))?;
        let token = extract_session_token(&set_cookie).to_string();
        info!("authenticated {} as {}", role, account.username);

        self.sessions
            .insert(SessionKey::new(account.username, role), token);
        Ok(true)
    }

    /// The cached session token for (username, role), authenticating once on a miss.
    ///
    /// Returns an empty string when that authentication fails.
    pub async fn session_key(&mut self, role: Role, login: Option<&Account>) -> HarnessResult<String> {
        let username = match login {
            Some(account) => account.username.clone(),
            None => self.account.username.clone(),
        };
        let key = SessionKey::new(username, role);

        if let Some(token) = self.sessions.get(&key) {
            return Ok(token.to_string());
        }

        if !self.authenticate(role, login).await? {
            error!("Failed to authenticate and get session key");
            return Ok(String::new());
        }

        Ok(self
            .sessions
            .get(&key)
            .map(str::to_string)
            .unwrap_or_default())
    }

    /// Fetches the channel descriptor with the `ro` session and prints it.
    pub async fn channel_xml_roku(&mut self) -> HarnessResult<bool> {
        let session_key = self.session_key(Role::Roku, None).await?;
        let response = self.get_with_session("get_channel_xml_ro", session_key).await?;

        let status = response.status();
        println!("{}", response.text().await?);
        Ok(status == StatusCode::OK)
    }

    /// Asks the backend whether the held account's session for `role` is still valid.
    pub async fn validate_session(&mut self, role: Role) -> HarnessResult<bool> {
        let session_key = self.session_key(role, None).await?;
        let response = self
            .get_with_session(&role.validate_session_endpoint(), session_key)
            .await?;

        let status = response.status();
        debug!("validate_session_{}: {}", role, response.text().await?);
        Ok(status == StatusCode::OK)
    }

    async fn get_with_session(&self, endpoint: &str, session_key: String) -> HarnessResult<Response> {
        debug!("GET {} with cookie {:?}", endpoint, session_key);
        Ok(self
            .http
            .get(self.url(endpoint))
            .header(REFERER, self.referer())
            .header(COOKIE, session_key)
            .send()
            .await?)
    }
}
