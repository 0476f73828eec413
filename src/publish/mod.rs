// src/publish/mod.rs
pub mod bluesky;
pub mod compose;
pub mod media;

use reqwest::blocking::Client;

use crate::config::env::Credentials;
use crate::config::options::{FetchOptions, PostOptions};
use crate::core::net::{Fetcher, HttpFetcher};
use crate::error::PublishError;
use crate::model::PromotionCandidate;

pub use bluesky::PostRef;
use bluesky::{AspectRatio, BlueskyClient, Embed, EmbedImage, External};
use compose::{compose, Draft};
use media::{prepare, read_thumbnail, Prepared, JPEG_MIME};

/// post(candidate) → where it landed. Failures are reported, not panicked;
/// the runner decides what they mean for the run.
pub trait Publisher {
    fn publish(&mut self, candidate: &PromotionCandidate) -> Result<PostRef, PublishError>;
}

impl<T: Publisher + ?Sized> Publisher for Box<T> {
    fn publish(&mut self, candidate: &PromotionCandidate) -> Result<PostRef, PublishError> {
        (**self).publish(candidate)
    }
}

pub struct BlueskyPublisher {
    client: BlueskyClient,
    creds: Credentials,
    opts: PostOptions,
    images: Box<dyn Fetcher>,
}

impl BlueskyPublisher {
    pub fn new(
        creds: Credentials,
        opts: PostOptions,
        fetch: &FetchOptions,
    ) -> Result<Self, PublishError> {
        let http = Client::builder()
            .timeout(fetch.timeout)
            .user_agent(fetch.user_agent.as_str())
            .build()?;
        let images = HttpFetcher::new(fetch).map_err(|e| PublishError::Network(e.to_string()))?;
        Ok(Self {
            client: BlueskyClient::new(http, &creds.pds),
            creds,
            opts,
            images: Box::new(images),
        })
    }

    /// Swap the source used for banner image downloads.
    pub fn with_images(mut self, images: Box<dyn Fetcher>) -> Self {
        self.images = images;
        self
    }

    /// Download (if remote) and compress; any failure just means no image.
    fn banner_image(&self, url: &str) -> Option<Prepared> {
        let raw = self
            .images
            .fetch_bytes(url)
            .inspect_err(|e| logw!("Banner image download failed: {e}"))
            .ok()?;
        self.prepare(&raw)
    }

    fn thumbnail(&self) -> Option<Prepared> {
        let path = &self.opts.thumbnail_path;
        match read_thumbnail(path) {
            Ok(Some(raw)) => self.prepare(&raw),
            Ok(None) => {
                logd!("No thumbnail at {}", path.display());
                None
            }
            Err(e) => {
                logw!("Could not read thumbnail {}: {e}", path.display());
                None
            }
        }
    }

    fn prepare(&self, raw: &[u8]) -> Option<Prepared> {
        prepare(raw, self.opts.max_image_dim, self.opts.max_image_bytes)
            .inspect_err(|e| logw!("Posting without image: {e}"))
            .ok()
    }

    fn upload(&self, img: Prepared) -> Option<(serde_json::Value, AspectRatio)> {
        let ratio = AspectRatio { width: img.width, height: img.height };
        self.client
            .upload_blob(img.bytes, JPEG_MIME)
            .inspect_err(|e| logw!("Image upload failed, posting without it: {e}"))
            .ok()
            .map(|blob| (blob, ratio))
    }

    fn embed_for(&self, draft: &Draft) -> Option<Embed> {
        if let Some(url) = &draft.image_url {
            let (blob, ratio) = self.banner_image(url).and_then(|img| self.upload(img))?;
            let alt = draft.image_alt.clone().unwrap_or_else(|| draft.title.clone());
            return Some(Embed::Images {
                images: vec![EmbedImage { alt, image: blob, aspect_ratio: Some(ratio) }],
            });
        }

        if !self.opts.link_card {
            return None;
        }
        let thumb = self
            .thumbnail()
            .and_then(|img| self.upload(img))
            .map(|(blob, _)| blob);
        Some(Embed::External {
            external: External {
                uri: draft.link.clone(),
                title: draft.title.clone(),
                description: draft.description.clone(),
                thumb,
            },
        })
    }
}

impl Publisher for BlueskyPublisher {
    fn publish(&mut self, candidate: &PromotionCandidate) -> Result<PostRef, PublishError> {
        let draft = compose(candidate, &self.opts);

        if !self.client.is_logged_in() {
            self.client.login(&self.creds)?;
        }

        let embed = self.embed_for(&draft);
        let post = self
            .client
            .create_post(&draft.text, &draft.facets, embed.as_ref(), &self.opts.langs)?;
        logf!("Posted {}", post.uri);
        Ok(post)
    }
}

/// Stand-in when no credentials are configured (dry runs). Always refuses.
pub struct Unconfigured;

impl Publisher for Unconfigured {
    fn publish(&mut self, _candidate: &PromotionCandidate) -> Result<PostRef, PublishError> {
        Err(PublishError::Auth(s!("no credentials configured")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    struct Bytes(Result<Vec<u8>, u16>);

    impl Fetcher for Bytes {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Status { url: s!(url), status: 404 })
        }

        fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.0
                .clone()
                .map_err(|status| FetchError::Status { url: s!(url), status })
        }
    }

    fn publisher(images: Bytes) -> BlueskyPublisher {
        let creds = Credentials {
            handle: s!("bot.example.com"),
            app_password: s!("xxxx-xxxx"),
            pds: s!("https://pds.invalid"),
        };
        let mut opts = PostOptions::default();
        opts.thumbnail_path = std::env::temp_dir().join("promo_bot_missing_thumbnail.jpg");
        BlueskyPublisher::new(creds, opts, &FetchOptions::default())
            .unwrap()
            .with_images(Box::new(images))
    }

    fn banner() -> PromotionCandidate {
        PromotionCandidate::banner(
            s!("https://shop.example.com/media/hero.jpg"),
            s!("Summer sale"),
            s!("https://shop.example.com/sale"),
        )
    }

    #[test]
    fn undecodable_banner_posts_without_embed() {
        let p = publisher(Bytes(Ok(b"<html>not an image</html>".to_vec())));
        let draft = compose(&banner(), &p.opts);
        assert!(p.embed_for(&draft).is_none());
    }

    #[test]
    fn failed_banner_download_posts_without_embed() {
        let p = publisher(Bytes(Err(503)));
        let draft = compose(&banner(), &p.opts);
        assert!(p.embed_for(&draft).is_none());
    }

    #[test]
    fn missing_thumbnail_still_gets_a_link_card() {
        let p = publisher(Bytes(Err(404)));
        let deal = PromotionCandidate::headline(s!("40% Off Home Kit"), "https://shop.example.com/promos");
        let draft = compose(&deal, &p.opts);
        match p.embed_for(&draft) {
            Some(Embed::External { external }) => {
                assert_eq!(external.uri, "https://shop.example.com/promos");
                assert_eq!(external.title, "40% Off Home Kit");
                assert!(external.thumb.is_none());
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn link_card_can_be_turned_off() {
        let mut p = publisher(Bytes(Err(404)));
        p.opts.link_card = false;
        let deal = PromotionCandidate::headline(s!("Free printing on all shirts"), "https://shop.example.com/");
        let draft = compose(&deal, &p.opts);
        assert!(p.embed_for(&draft).is_none());
    }
}
