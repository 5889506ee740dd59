use std::sync::Arc;

use anyhow::{Context, Result, bail};
use leetmark::{
    PageContext, Request,
    config::Config,
    fetcher::HttpPage,
    page::{PageSource, StaticPage},
};
use url::Url;

/// Answer one `getProblemInfo` request for a URL and print the response.
///
/// Usage: leetmark-probe <url> [html-file]
/// With an HTML file the page is served from disk (e.g. a saved, fully
/// rendered problem page); without one it is fetched over HTTP.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(raw_url) = args.next() else {
        bail!("usage: leetmark-probe <url> [html-file]");
    };
    let url = Url::parse(&raw_url).with_context(|| format!("parsing {raw_url}"))?;

    let config = Config::from_env()?;

    let page: Arc<dyn PageSource> = match args.next() {
        Some(path) => {
            let html = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {path}"))?;
            Arc::new(StaticPage::new(url.clone(), html))
        }
        None => Arc::new(HttpPage::new(url.as_str())?),
    };

    // Same form the snapshots report.
    let context = PageContext::new(page, url.to_string(), config);
    let response = context.handler.handle(Request::GetProblemInfo).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
