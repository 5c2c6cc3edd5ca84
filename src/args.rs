use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "webextract")]
#[command(about = "Extract clean, structured content from web pages and sites")]
#[command(version)]
pub struct Args {
    /// JSON service configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (e.g. ChromeDriver)
    #[arg(long, global = true, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract a single page
    Scrape {
        url: String,

        #[command(flatten)]
        fetch: FetchArgs,

        /// CSS selector to wait for before extracting
        #[arg(long)]
        wait_for: Option<String>,

        /// Omit outbound links from the output
        #[arg(long)]
        no_links: bool,
    },

    /// Crawl a site breadth-first from a start URL
    Crawl {
        url: String,

        /// Maximum number of pages to fetch
        #[arg(long, default_value_t = 10)]
        max_pages: usize,

        /// Maximum link hops from the start URL
        #[arg(long, default_value_t = 2)]
        max_depth: usize,

        /// Follow links into subdomains
        #[arg(long)]
        allow_subdomains: bool,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Also write each page as Markdown into this directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Run the HTTP service
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct FetchArgs {
    /// Load page assets and wait for client-side rendering
    #[arg(long)]
    pub render: bool,

    /// Capture a screenshot of each page
    #[arg(long)]
    pub screenshot: bool,
}
