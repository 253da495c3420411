use std::time::Instant;

use anyhow::{bail, Context, Result};
use blogfeed::{
    client::{Client, PostId, Transport},
    dom::render::Mode,
    Feed, RenderSummary,
};
use camino::Utf8PathBuf;
use tokio::io::AsyncWriteExt;

use crate::{
    config::Config,
    shell,
    util::{plural, Elapsed, FileSize},
};

#[derive(Clone, Default, Debug)]
pub struct RenderOptions {
    /// Write the page here instead of stdout.
    pub out: Option<Utf8PathBuf>,
    /// Posts whose comments are expanded before output.
    pub show: Vec<PostId>,
}

pub async fn render(config: &Config, options: &RenderOptions) -> Result<RenderSummary> {
    let start = Instant::now();
    tracing::debug!(?config, ?options, "rendering feed");

    let client = Client::http(&config.http_options());
    let feed = Feed::new(client).with_source(config.posts);

    shell().progress("Fetching", &config.base_url);
    let (html, summary) = render_page(&feed, config, &options.show).await;
    if summary.failed {
        bail!("could not fetch posts from {}", config.base_url);
    }

    match &options.out {
        Some(path) => {
            tokio::fs::write(path, &html)
                .await
                .with_context(|| format!("failed to write `{path}`"))?;
            shell().status("Wrote", format!("{path} ({})", FileSize(html.len() as u64)));
        }
        None => {
            shell().clear_line();
            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    shell().status(
        "Finished",
        format!(
            "{} in {}",
            plural(summary.articles, "article"),
            Elapsed(start.elapsed())
        ),
    );
    Ok(summary)
}

/// Renders the feed once and returns the page as HTML.
pub async fn render_page<T: Transport>(
    feed: &Feed<T>,
    config: &Config,
    show: &[PostId],
) -> (String, RenderSummary) {
    if config.render.users && feed.populate_users().await == 0 {
        shell().warn("author menu is empty");
    }

    let summary = feed.render().await;
    if summary.unattributed > 0 {
        shell().warn(format!(
            "{} rendered without an author",
            plural(summary.unattributed, "article")
        ));
    }

    for &post_id in show {
        if !feed.surface().click(Some(post_id)) {
            shell().warn(format!("no comment toggle for post {post_id}"));
        }
    }

    let mut mode = Mode::DOCUMENT;
    if config.render.pretty {
        mode |= Mode::PRETTY;
    }
    (feed.surface().render(mode), summary)
}
