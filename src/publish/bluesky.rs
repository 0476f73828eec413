// src/publish/bluesky.rs
// Minimal AT Protocol client: session, blob upload, post record.

use chrono::{SecondsFormat, Utc};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::env::Credentials;
use crate::error::PublishError;
use super::compose::Facet;

const POST_NSID: &str = "app.bsky.feed.post";

const AUTH_ERRORS: &[&str] = &[
    "AuthenticationRequired",
    "AuthFactorTokenRequired",
    "AccountTakedown",
    "ExpiredToken",
    "InvalidToken",
];

#[derive(Deserialize)]
struct Session {
    #[serde(rename = "accessJwt")]
    access_jwt: String,
    did: String,
}

#[derive(Deserialize, Default)]
struct XrpcError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct UploadBlobResponse {
    blob: Value,
}

/// Where the post landed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PostRef {
    pub uri: String,
    pub cid: String,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct EmbedImage {
    pub alt: String,
    pub image: Value,
    #[serde(rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Clone, Debug, Serialize)]
pub struct External {
    pub uri: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<Value>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "$type")]
pub enum Embed {
    #[serde(rename = "app.bsky.embed.images")]
    Images { images: Vec<EmbedImage> },
    #[serde(rename = "app.bsky.embed.external")]
    External { external: External },
}

#[derive(Serialize)]
struct PostRecord<'a> {
    #[serde(rename = "$type")]
    kind: &'static str,
    text: &'a str,
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(skip_serializing_if = "is_empty")]
    facets: &'a [Facet],
    #[serde(skip_serializing_if = "Option::is_none")]
    embed: Option<&'a Embed>,
    #[serde(skip_serializing_if = "is_empty")]
    langs: &'a [String],
}

#[derive(Serialize)]
struct CreateRecord<'a> {
    repo: &'a str,
    collection: &'static str,
    record: PostRecord<'a>,
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

pub struct BlueskyClient {
    http: Client,
    pds: String,
    session: Option<Session>,
}

impl BlueskyClient {
    pub fn new(http: Client, pds: &str) -> Self {
        Self { http, pds: pds.trim_end_matches('/').to_string(), session: None }
    }

    fn xrpc(&self, method: &str) -> String {
        format!("{}/xrpc/{method}", self.pds)
    }

    fn session(&self) -> Result<&Session, PublishError> {
        self.session
            .as_ref()
            .ok_or_else(|| PublishError::Auth(s!("not logged in")))
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn login(&mut self, creds: &Credentials) -> Result<(), PublishError> {
        logd!("Creating session for {}", creds.handle);
        let resp = self
            .http
            .post(self.xrpc("com.atproto.server.createSession"))
            .json(&serde_json::json!({
                "identifier": creds.handle,
                "password": creds.app_password,
            }))
            .send()?;
        // Any refusal here is a credentials problem
        let resp = check(resp).map_err(|e| match e {
            PublishError::Rejected { message, .. } => PublishError::Auth(message),
            other => other,
        })?;
        let session: Session = resp.json()?;
        logd!("Logged in as {}", session.did);
        self.session = Some(session);
        Ok(())
    }

    pub fn upload_blob(&self, bytes: Vec<u8>, mime: &str) -> Result<Value, PublishError> {
        let session = self.session()?;
        let resp = self
            .http
            .post(self.xrpc("com.atproto.repo.uploadBlob"))
            .bearer_auth(&session.access_jwt)
            .header(reqwest::header::CONTENT_TYPE, mime)
            .body(bytes)
            .send()?;
        let uploaded: UploadBlobResponse = check(resp)?.json()?;
        Ok(uploaded.blob)
    }

    pub fn create_post(
        &self,
        text: &str,
        facets: &[Facet],
        embed: Option<&Embed>,
        langs: &[String],
    ) -> Result<PostRef, PublishError> {
        let session = self.session()?;
        let record = PostRecord {
            kind: POST_NSID,
            text,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            facets,
            embed,
            langs,
        };
        let resp = self
            .http
            .post(self.xrpc("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&CreateRecord { repo: &session.did, collection: POST_NSID, record })
            .send()?;
        Ok(check(resp)?.json()?)
    }
}

/// Pass 2xx responses through; turn anything else into a `PublishError`.
fn check(resp: Response) -> Result<Response, PublishError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(classify(status.as_u16(), &body))
}

/// Map a failed XRPC call onto the error taxonomy. The body is usually
/// `{"error": "...", "message": "..."}` but proxies may send anything.
pub fn classify(status: u16, body: &str) -> PublishError {
    let err: XrpcError = serde_json::from_str(body).unwrap_or_default();
    let message = if err.message.is_empty() { s!(body) } else { err.message };

    if status == 401 || AUTH_ERRORS.contains(&err.error.as_str()) {
        return PublishError::Auth(message);
    }
    PublishError::Rejected { status, message }
}
