// src/cli.rs
use std::path::PathBuf;

use chrono::Local;

use crate::config::env::Env;
use crate::config::options::{AppOptions, CandidateSource, RenderOptions};
use crate::core::net::fetcher_for;
use crate::error::{ConfigError, RunError};
use crate::progress::Progress;
use crate::publish::{BlueskyPublisher, Publisher, Unconfigured};
use crate::runner::{RunMode, RunOutcome, Runner};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    pub force: bool,
    pub dry_run: bool,
    pub banners: bool,
    pub rank: bool,
    pub url: Option<String>,
    pub seen: Option<PathBuf>,
    pub render: Option<String>,
    pub verbose: bool,
    pub help: bool,
}

pub fn parse_args<I>(args: I) -> Result<Params, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut params = Params::default();
    let mut args = args.into_iter();
    let value = |flag: &str, next: Option<String>| {
        next.ok_or_else(|| ConfigError::Usage(format!("Missing value for {flag}")))
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "-f" | "--force" => params.force = true,
            "-n" | "--dry-run" => params.dry_run = true,
            "--banners" => params.banners = true,
            "--rank" => params.rank = true,
            "--url" => params.url = Some(value("--url", args.next())?),
            "--seen" => params.seen = Some(PathBuf::from(value("--seen", args.next())?)),
            "--render" => params.render = Some(value("--render", args.next())?),
            "-v" | "--verbose" => params.verbose = true,
            "-h" | "--help" => params.help = true,
            _ => return Err(ConfigError::Usage(format!("Unknown arg: {a}"))),
        }
    }
    Ok(params)
}

/// Environment first, flags on top.
pub fn build_options(env: &Env, params: &Params) -> AppOptions {
    let mut opts = AppOptions::default();

    if let Some(url) = params.url.as_ref().or(env.promo_url.as_ref()) {
        opts.scrape.promo_url = url.clone();
    }
    if let Some(path) = params.seen.clone().or_else(|| env.seen_file.as_ref().map(PathBuf::from)) {
        opts.store.seen_path = path;
    }
    if params.banners {
        opts.scrape.source = CandidateSource::Banners;
    }
    opts.scrape.rank = params.rank;

    if let Some(endpoint) = params.render.as_ref().or(env.render_url.as_ref()) {
        opts.fetch.render = Some(RenderOptions::new(endpoint, env.render_token.clone()));
    }
    opts
}

pub fn mode(env: &Env, params: &Params) -> RunMode {
    RunMode { force: params.force || env.force, dry_run: params.dry_run }
}

/// Console sink: timestamped lines on stdout.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn log(&mut self, msg: &str) {
        println!("[{}] {msg}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    }

    fn finish(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::NothingNew => self.log("Done: nothing new"),
            RunOutcome::Published { post, .. } => self.log(&format!("Done: posted {}", post.uri)),
            RunOutcome::DryRun { .. } => self.log("Done: dry run, nothing posted"),
        }
    }
}

pub fn run() -> Result<RunOutcome, RunError> {
    let params = parse_args(std::env::args().skip(1))?;
    if params.help {
        eprintln!(include_str!("cli_help.txt"));
        std::process::exit(0);
    }
    crate::log::init(params.verbose);

    let env = Env::from_env()?;
    let opts = build_options(&env, &params);
    let mode = mode(&env, &params);

    // Fail fast on missing credentials, before touching the network
    let publisher: Box<dyn Publisher> = if mode.dry_run {
        Box::new(Unconfigured)
    } else {
        let creds = env.credentials()?;
        Box::new(BlueskyPublisher::new(creds, opts.post.clone(), &opts.fetch)?)
    };
    let fetcher = fetcher_for(&opts.fetch, &opts.scrape.container_selectors)?;

    let mut runner = Runner::new(opts, fetcher, publisher);
    let mut console = ConsoleProgress;
    runner.run(mode, Some(&mut console))
}
