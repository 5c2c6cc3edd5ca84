use clap::Parser;
use std::process::ExitCode;
use webextract::config::{CrawlRequest, ScrapeRequest, ServiceConfig};
use webextract::{BrowserFetcher, Result};

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let fetcher = BrowserFetcher::from_config(&config);

    match args.command {
        Command::Scrape {
            url,
            fetch,
            wait_for,
            no_links,
        } => {
            let request = ScrapeRequest {
                render: fetch.render,
                screenshot: fetch.screenshot,
                wait_for,
                include_links: !no_links,
                ..ScrapeRequest::new(&url)
            };
            let page = webextract::scrape(&fetcher, &request).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Command::Crawl {
            url,
            max_pages,
            max_depth,
            allow_subdomains,
            fetch,
            output_dir,
        } => {
            let request = CrawlRequest::new(&url)
                .with_max_pages(max_pages)
                .with_max_depth(max_depth)
                .with_subdomains(allow_subdomains)
                .with_render(fetch.render)
                .with_screenshot(fetch.screenshot);

            let result = webextract::crawl(&fetcher, &request).await?;
            if let Some(dir) = output_dir {
                let written = webextract::utils::write_pages(&result, &dir)?;
                ::log::info!("Wrote {} pages to {}", written.len(), dir.display());
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            webextract::server::serve(&config, fetcher).await?;
        }
    }

    Ok(())
}

/// Config file, then `WEBDRIVER_URL`, then the command-line flag
fn load_config(args: &Args) -> Result<ServiceConfig> {
    let config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    let mut config = config.with_env();

    if let Some(url) = &args.webdriver_url {
        config.webdriver_url = url.clone();
    }
    config.validate()?;

    ::log::debug!("Using WebDriver at {}", config.webdriver_url);
    Ok(config)
}
