use crate::error::Result;
use crate::results::CrawlResult;
use std::path::{Path, PathBuf};

/// Convert a URL to a sanitized file stem
pub fn sanitize_filename(url: &str) -> String {
    let mut name = url.replace("http://", "").replace("https://", "");
    name = name.trim_end_matches('/').to_string();
    name = name.replace(['/', ':', '?', '&', '=', '#', '%', '\\', '*', '"', '<', '>', '|'], "_");

    if name.chars().count() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}

/// Writes each crawled page's Markdown content to `dir`, one file per page
pub fn write_pages(result: &CrawlResult, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(result.pages.len());
    for (index, page) in result.pages.iter().enumerate() {
        // Index prefix keeps fetch order and keeps truncated names unique.
        let path = dir.join(format!("{:03}-{}.md", index + 1, sanitize_filename(&page.url)));
        let body = format!("# {}\n\n<{}>\n\n{}\n", page.title, page.url, page.content);
        std::fs::write(&path, body)?;
        ::log::debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
