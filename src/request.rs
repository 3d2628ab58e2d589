use std::io;
use std::path::Path;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Response};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};

use crate::{info_time, Config, Result};

/// Everything except `A-Z a-z 0-9 - . _ ~ /` gets percent-encoded in the `name` query parameter.
const NAME_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Download URL of a single dictionary, addressed by id and display name.
pub fn direct_download_url(origin: &str, id: u32, name: &str) -> String {
    format!(
        "{origin}/d/dict/download_cell.php?id={id}&name={}",
        utf8_percent_encode(name, NAME_QUERY)
    )
}

/// Listing page `page_number` of category `category_id`.
pub fn category_page_url(origin: &str, category_id: u32, page_number: u32) -> String {
    format!("{origin}/dict/cate/index/{category_id}/default/{page_number}")
}

/// Builds the one `Client` shared by page requests and artifact downloads.
pub fn build_client(config: &Config) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

/// Retrieves a remote artifact into a local file.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// `ArtifactFetcher` backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    /// Recreates `dest` from scratch: the parent dir is created, an existing file is deleted
    /// before the request goes out and the body is streamed into a fresh file.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        prepare_destination(dest).await?;
        info_time!("Downloading \"{}\": {} ...", dest.display(), url);

        let res = self.client.get(url).send().await?.error_for_status()?;
        if let Err(e) = stream_to_file(res, dest).await {
            // A half written artifact must not outlive the failed download.
            let _ = fs::remove_file(dest).await;
            return Err(e);
        }
        Ok(())
    }
}

async fn stream_to_file(mut res: Response, dest: &Path) -> Result<()> {
    let mut file = File::create(dest).await?;
    while let Some(chunk) = res.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Makes sure the parent directory of `dest` exists and that no earlier copy of `dest` is left.
pub(crate) async fn prepare_destination(dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    match fs::remove_file(dest).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Requests a page and returns a `Result<String>` containing the HTML.
pub(crate) async fn request_page_html(client: &Client, url: &str) -> Result<String> {
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_url_encodes_name() {
        let url = direct_download_url("https://pinyin.sogou.com", 100, "词库A");
        assert_eq!(
            url,
            "https://pinyin.sogou.com/d/dict/download_cell.php?id=100&name=%E8%AF%8D%E5%BA%93A"
        );
    }

    #[test]
    fn direct_url_keeps_unreserved_and_escapes_query_chars() {
        let url = direct_download_url("http://h", 7, "a-b_c.d/e f&g");
        assert!(url.ends_with("id=7&name=a-b_c.d/e%20f%26g"));
    }

    #[test]
    fn category_url_layout() {
        assert_eq!(
            category_page_url("https://pinyin.sogou.com", 167, 3),
            "https://pinyin.sogou.com/dict/cate/index/167/default/3"
        );
    }

    #[tokio::test]
    async fn prepare_creates_parents_and_drops_stale_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("out/scel/a.scel");

        prepare_destination(&dest).await.unwrap();
        assert!(dest.parent().unwrap().is_dir());
        assert!(!dest.exists());

        std::fs::write(&dest, b"stale").unwrap();
        prepare_destination(&dest).await.unwrap();
        assert!(!dest.exists());
    }
}
