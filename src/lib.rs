pub mod config;
pub mod credential;
pub mod input;
pub mod logging;
pub mod model;
pub mod output;
pub mod providers;

use anyhow::{Context, Result};
use reqwest::Client;
use std::env;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::info;

use config::Config;
use input::NoInput;
use model::Prompt;
use providers::gemini::{self, RemoteError};

/// One pass: collect input, load the key, ask the model, print the reply.
/// Every failure ends the pass; see [`report`] for how it is shown.
pub async fn run() -> Result<()> {
    let cfg = Config::from_env();
    info!(
        model = %cfg.model,
        base_url = %cfg.base_url,
        auth = cfg.auth.as_str(),
        timeout_secs = ?cfg.timeout_secs,
        "loaded runtime configuration"
    );

    let stdin = io::stdin();
    let piped = if stdin.is_terminal() {
        None
    } else {
        Some(stdin.lock())
    };
    let args: Vec<String> = env::args().skip(1).collect();
    let fragments = input::collect(piped, &args)?;

    let api_key = credential::load()?;
    let client = build_client(&cfg)?;
    let prompt = Prompt::new(fragments);
    let reply = gemini::generate(&client, &cfg, &api_key, &prompt).await?;

    let mut stdout = io::stdout().lock();
    output::write_reply(&mut stdout, &reply).context("failed to write reply")?;
    Ok(())
}

fn build_client(cfg: &Config) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = cfg.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("failed to initialize HTTP client")
}

/// Prints a terminal error the way the user expects to see it: nothing for
/// missing input, the raw body for a remote error, `q: <cause>` otherwise.
pub fn report(err: &anyhow::Error) {
    if err.downcast_ref::<NoInput>().is_some() {
        return;
    }

    if let Some(remote) = err.downcast_ref::<RemoteError>() {
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(&remote.body);
        let _ = stderr.flush();
        return;
    }

    eprintln!("q: {err:#}");
}
