// src/runner.rs
//
// One run: load seen → fetch → extract → select → publish → persist.
// No retries; the scheduler re-invokes us. The seen file only changes after
// a confirmed post, so a failed run retries the same item next time.

use crate::{
    config::options::AppOptions,
    core::net::Fetcher,
    error::RunError,
    model::PromotionCandidate,
    progress::Progress,
    publish::{compose::compose, PostRef, Publisher},
    select::{fresh_count, select},
    specs::Extractor,
    store::SeenStore,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Ignore the seen set and post the first candidate.
    pub force: bool,
    /// Compose and report, but neither publish nor save.
    pub dry_run: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    NothingNew,
    Published { id: String, post: PostRef },
    DryRun { id: String, text: String },
}

pub struct Runner<F: Fetcher, P: Publisher> {
    opts: AppOptions,
    fetcher: F,
    publisher: P,
    store: SeenStore,
    extractor: Extractor,
}

impl<F: Fetcher, P: Publisher> Runner<F, P> {
    pub fn new(opts: AppOptions, fetcher: F, publisher: P) -> Self {
        let store = SeenStore::new(opts.store.seen_path.clone());
        let extractor = Extractor::new(&opts.scrape);
        Self { opts, fetcher, publisher, store, extractor }
    }

    pub fn extractor_mut(&mut self) -> &mut Extractor {
        &mut self.extractor
    }

    pub fn store(&self) -> &SeenStore {
        &self.store
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn run(
        &mut self,
        mode: RunMode,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<RunOutcome, RunError> {
        let mut seen = self.store.load();
        let url = self.opts.scrape.promo_url.clone();

        if let Some(p) = progress.as_deref_mut() {
            p.begin(&url);
        }
        let mut say = |msg: String| {
            logf!("{msg}");
            if let Some(p) = progress.as_deref_mut() {
                p.log(&msg);
            }
        };

        say(format!("Fetching {url}"));
        let doc = self.fetcher.fetch(&url)?;

        let candidates = self.extractor.extract(&doc);
        say(format!(
            "Found {} candidate(s), {} not yet posted",
            candidates.len(),
            fresh_count(&candidates, &seen)
        ));

        let Some(chosen) = select(&candidates, &seen, mode.force) else {
            say(s!("Everything up to date. No new promotions found."));
            return self.done(RunOutcome::NothingNew, progress);
        };
        if mode.force && seen.contains(&chosen.id) {
            say(s!("Force mode: re-posting an item already seen"));
        }

        if mode.dry_run {
            let text = compose(chosen, &self.opts.post).text;
            say(format!("Dry run, would post:\n{text}"));
            let outcome = RunOutcome::DryRun { id: chosen.id.clone(), text };
            return self.done(outcome, progress);
        }

        say(format!("Publishing: {}", preview(chosen)));
        let post = self.publisher.publish(chosen).inspect_err(|e| {
            loge!("Publish failed, seen set left untouched: {e}");
        })?;

        seen.insert(chosen.id.clone());
        self.store.save(&seen).map_err(|source| RunError::Store {
            path: self.store.path().display().to_string(),
            source,
        })?;

        let outcome = RunOutcome::Published { id: chosen.id.clone(), post };
        self.done(outcome, progress)
    }

    fn done(
        &self,
        outcome: RunOutcome,
        progress: Option<&mut dyn Progress>,
    ) -> Result<RunOutcome, RunError> {
        if let Some(p) = progress {
            p.finish(&outcome);
        }
        Ok(outcome)
    }
}

fn preview(c: &PromotionCandidate) -> String {
    let head = crate::core::sanitize::take_chars(&c.headline, 50);
    if head.len() < c.headline.len() { join!(head, "...") } else { s!(head) }
}
