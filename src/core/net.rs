// src/core/net.rs
// Document sources. Every request is bounded by a timeout.

use std::{
    thread,
    time::{Duration, Instant},
};

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::config::options::{FetchOptions, RenderOptions};
use crate::core::html::{selector, visible_text};
use crate::error::FetchError;

/// fetch(url) → raw document. Anything that can hand back page HTML.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Raw bytes (images). Same failure rules as `fetch`.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

fn build_client(opts: &FetchOptions) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(opts.timeout)
        .user_agent(opts.user_agent.as_str())
        .build()
        .map_err(|e| FetchError::network("<client>", e))
}

/// Plain GET; non-2xx or timeout is a failure.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(opts: &FetchOptions) -> Result<Self, FetchError> {
        Ok(Self { client: build_client(opts)? })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, FetchError> {
        logd!("GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::network(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: s!(url), status: status.as_u16() });
        }
        Ok(resp)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let body = self.get(url)?.text().map_err(|e| FetchError::network(url, e))?;
        logd!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = self.get(url)?.bytes().map_err(|e| FetchError::network(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// Client-rendered pages via a Browserless-style `/content` endpoint.
///
/// Instead of sleeping a fixed time, re-requests the rendered DOM at
/// `poll_interval` until one of the `ready` selectors has visible text,
/// giving up after `wait_timeout` with whatever the last render held.
pub struct RenderFetcher {
    client: Client,
    plain: HttpFetcher,
    endpoint: Url,
    opts: RenderOptions,
    ready: Vec<Selector>,
}

impl RenderFetcher {
    pub fn new<S: AsRef<str>>(
        fetch: &FetchOptions,
        render: RenderOptions,
        ready_selectors: &[S],
    ) -> Result<Self, FetchError> {
        let ready = ready_selectors
            .iter()
            .filter_map(|s| selector(s.as_ref()))
            .collect();
        Ok(Self {
            client: build_client(fetch)?,
            plain: HttpFetcher::new(fetch)?,
            endpoint: content_endpoint(&render.endpoint, render.token.as_deref())?,
            opts: render,
            ready,
        })
    }

    fn render_once(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&serde_json::json!({ "url": url }))
            .send()
            .map_err(|e| FetchError::network(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(FetchError::Render { status: status.as_u16(), message });
        }
        resp.text().map_err(|e| FetchError::network(url, e))
    }
}

impl Fetcher for RenderFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        poll_rendered(
            || self.render_once(url),
            |doc| has_ready_content(doc, &self.ready),
            self.opts.wait_timeout,
            self.opts.poll_interval,
        )
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.plain.fetch_bytes(url)
    }
}

/// `{endpoint}/content`, with the token as a properly encoded query pair.
pub fn content_endpoint(endpoint: &str, token: Option<&str>) -> Result<Url, FetchError> {
    let raw = format!("{}/content", endpoint.trim_end_matches('/'));
    let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
        url: raw.clone(),
        message: e.to_string(),
    })?;
    if let Some(token) = token {
        url.query_pairs_mut().append_pair("token", token);
    }
    Ok(url)
}

/// True once any `ready` selector matches an element with visible text.
/// No selectors means any render is good enough.
pub fn has_ready_content(doc: &str, ready: &[Selector]) -> bool {
    if ready.is_empty() {
        return true;
    }
    let html = Html::parse_document(doc);
    ready
        .iter()
        .any(|sel| html.select(sel).any(|el| !visible_text(el).is_empty()))
}

/// Render until `is_ready` accepts the document or `wait_timeout` runs out.
/// A timeout is not an error: the last render is returned. Render errors are.
pub fn poll_rendered<R, C>(
    mut render: R,
    is_ready: C,
    wait_timeout: Duration,
    poll_interval: Duration,
) -> Result<String, FetchError>
where
    R: FnMut() -> Result<String, FetchError>,
    C: Fn(&str) -> bool,
{
    let started = Instant::now();
    let mut attempt = 1u32;
    loop {
        let doc = render()?;
        if is_ready(&doc) {
            logd!("Rendered content ready after {attempt} attempt(s)");
            return Ok(doc);
        }
        let waited = started.elapsed();
        if waited + poll_interval > wait_timeout {
            logw!(
                "Promo container not populated after {:.1}s; using last render",
                waited.as_secs_f32()
            );
            return Ok(doc);
        }
        thread::sleep(poll_interval);
        attempt += 1;
    }
}

/// Pick the fetcher the options ask for.
pub fn fetcher_for<S: AsRef<str>>(
    opts: &FetchOptions,
    ready_selectors: &[S],
) -> Result<Box<dyn Fetcher>, FetchError> {
    Ok(match &opts.render {
        Some(render) => Box::new(RenderFetcher::new(opts, render.clone(), ready_selectors)?),
        None => Box::new(HttpFetcher::new(opts)?),
    })
}

impl<T: Fetcher + ?Sized> Fetcher for Box<T> {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_bytes(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const FAST: Duration = Duration::from_millis(1);

    fn main_ready() -> Vec<Selector> {
        vec![Selector::parse("main").unwrap()]
    }

    #[test]
    fn ready_means_a_selector_with_text() {
        let ready = main_ready();
        assert!(!has_ready_content("<body><main>  </main></body>", &ready));
        assert!(!has_ready_content("<body><div>Loading</div></body>", &ready));
        assert!(has_ready_content("<main><p>20% off</p></main>", &ready));
        assert!(has_ready_content("<div></div>", &[]));
    }

    #[test]
    fn polls_until_container_is_populated() {
        let calls = Cell::new(0);
        let ready = main_ready();
        let doc = poll_rendered(
            || {
                calls.set(calls.get() + 1);
                Ok(if calls.get() < 3 { s!("<main></main>") } else { s!("<main>Sale on</main>") })
            },
            |doc| has_ready_content(doc, &ready),
            Duration::from_secs(5),
            FAST,
        )
        .unwrap();
        assert_eq!(calls.get(), 3);
        assert!(doc.contains("Sale on"));
    }

    #[test]
    fn timeout_returns_last_render() {
        let calls = Cell::new(0);
        let doc = poll_rendered(
            || {
                calls.set(calls.get() + 1);
                Ok(format!("<main data-n=\"{}\"></main>", calls.get()))
            },
            |_| false,
            Duration::from_millis(30),
            Duration::from_millis(5),
        )
        .unwrap();
        assert!(calls.get() >= 1);
        assert_eq!(doc, format!("<main data-n=\"{}\"></main>", calls.get()));
    }

    #[test]
    fn render_errors_stop_the_poll() {
        let calls = Cell::new(0);
        let err = poll_rendered(
            || {
                calls.set(calls.get() + 1);
                Err(FetchError::Render { status: 500, message: s!("boom") })
            },
            |_| true,
            Duration::from_secs(5),
            FAST,
        )
        .unwrap_err();
        assert_eq!(calls.get(), 1);
        assert!(matches!(err, FetchError::Render { status: 500, .. }));
    }

    #[test]
    fn token_is_query_encoded() {
        let url = content_endpoint("https://render.example.com/", Some("a b&c=d")).unwrap();
        assert_eq!(url.as_str(), "https://render.example.com/content?token=a+b%26c%3Dd");
        let bare = content_endpoint("https://render.example.com", None).unwrap();
        assert_eq!(bare.as_str(), "https://render.example.com/content");
        assert!(content_endpoint("not a url", None).is_err());
    }
}
