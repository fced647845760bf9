/*!
    URL loading contract.
*/

use url::Url;

use sidechannel_types::{Error, Result};

/**
    A request to open a URL, with the optional HTTP identity to use for it.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlRequest {
    pub url: Url,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl UrlRequest {
    /**
        Parse `url` into a request with no user agent or referrer.

        Fails with `InvalidArgument` if the URL is empty or malformed.
    */
    pub fn parse(url: &str) -> Result<Self> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_argument("URL is empty"));
        }
        let url = Url::parse(trimmed)
            .map_err(|e| Error::invalid_argument(format!("invalid URL {trimmed:?}: {e}")))?;
        Ok(Self {
            url,
            user_agent: None,
            referrer: None,
        })
    }

    /**
        Set the user agent. An empty string clears it.
    */
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = non_empty(user_agent.into());
        self
    }

    /**
        Set the referrer. An empty string clears it.
    */
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = non_empty(referrer.into());
        self
    }

    /**
        Returns true for `http` and `https` URLs.
    */
    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }

    /**
        HTTP headers the I/O layer should send for this request.

        Each optional field only contributes its own header.
    */
    pub fn http_headers(&self) -> Vec<(&'static str, &str)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(user_agent) = &self.user_agent {
            headers.push(("User-Agent", user_agent.as_str()));
        }
        if let Some(referrer) = &self.referrer {
            headers.push(("Referer", referrer.as_str()));
        }
        headers
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/**
    A component that can open its input from a URL.
*/
pub trait UrlSource: Send + Sync {
    /**
        Open the input described by `request`, replacing any previous one.
    */
    fn load(&self, request: UrlRequest) -> Result<()>;

    /**
        The request the component is currently opened with, if any.
    */
    fn current_request(&self) -> Option<UrlRequest>;

    /**
        Parse `url` and open it with the given optional user agent and referrer.
    */
    fn load_url(&self, url: &str, user_agent: Option<&str>, referrer: Option<&str>) -> Result<()> {
        let mut request = UrlRequest::parse(url)?;
        if let Some(user_agent) = user_agent {
            request = request.with_user_agent(user_agent);
        }
        if let Some(referrer) = referrer {
            request = request.with_referrer(referrer);
        }
        self.load(request)
    }
}
