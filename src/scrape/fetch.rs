//! HTTP fetch of the listing page, with the site's legacy text encoding.

use std::io::Read;
use std::time::Duration;

use thiserror::Error;

/// The fixed listing page this tracker targets.
pub const LISTING_URL: &str = "https://www.okooo.com/zucai/";

/// Status the site answers with when it blocks a client.
const BLOCKED_STATUS: u16 = 405;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure classes for one extraction attempt.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The server answered with its block/rate-limit status.
    #[error("blocked by server (status {0})")]
    Blocked(u16),
    /// The request never completed (DNS, connect, read, timeout).
    #[error("network error: {0}")]
    Transport(String),
    /// The page came back but does not look like the odds listing.
    #[error("unexpected page structure: {0}")]
    Structure(String),
}

impl ScrapeError {
    /// Whether another attempt within the same tick can help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScrapeError::Blocked(_) | ScrapeError::Transport(_))
    }
}

/// Issues one GET against the listing URL and decodes the body.
pub struct PageFetcher {
    agent: ureq::Agent,
    url: String,
}

impl PageFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
        Self {
            agent,
            url: url.into(),
        }
    }

    /// Fetch the page body as text.
    ///
    /// The site serves GB2312 no matter what the response headers claim, so
    /// the body is read as raw bytes and decoded with the GBK encoding (the
    /// Encoding Standard's resolution of the gb2312 label) instead of being
    /// trusted as UTF-8.
    pub fn fetch(&self) -> Result<String, ScrapeError> {
        let response = match self.agent.get(&self.url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(BLOCKED_STATUS, _)) => {
                return Err(ScrapeError::Blocked(BLOCKED_STATUS));
            }
            Err(ureq::Error::Status(code, _)) => {
                return Err(ScrapeError::Structure(format!("unexpected status {code}")));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(ScrapeError::Transport(transport.to_string()));
            }
        };

        let mut raw = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut raw)
            .map_err(|e| ScrapeError::Transport(e.to_string()))?;

        let (text, _, _) = encoding_rs::GBK.decode(&raw);
        Ok(text.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serve exactly one canned response on a local port.
    fn one_shot_server(status: u16, body: Vec<u8>) -> String {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let addr = server.server_addr().to_ip().expect("tcp listener");
        std::thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let response = tiny_http::Response::from_data(body).with_status_code(status);
                let _ = request.respond(response);
            }
        });
        format!("http://{addr}/zucai/")
    }

    #[test]
    fn test_fetch_decodes_legacy_encoding() {
        let page = "<html><body><div class=\"top\">第2024015期</div></body></html>";
        let (encoded, _, _) = encoding_rs::GBK.encode(page);
        let url = one_shot_server(200, encoded.into_owned());

        let text = PageFetcher::new(url).fetch().unwrap();
        assert!(text.contains("第2024015期"));
    }

    #[test]
    fn test_blocked_status_is_retryable() {
        let url = one_shot_server(405, Vec::new());
        let err = PageFetcher::new(url).fetch().unwrap_err();
        assert!(matches!(err, ScrapeError::Blocked(405)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_other_status_is_structural() {
        let url = one_shot_server(500, Vec::new());
        let err = PageFetcher::new(url).fetch().unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_connect_failure_is_transport() {
        // Reserve a port, then close the listener so nothing answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = PageFetcher::new(format!("http://{addr}/zucai/"))
            .fetch()
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Transport(_)));
        assert!(err.is_retryable());
    }
}
