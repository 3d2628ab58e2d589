use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;
use url::Url;

use crate::{Error, Result, RECOMMEND_MARKER};

/// Characters that can't appear in a file name on at least one of the platforms we write to.
pub const INVALID_SYMBOLS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// One dictionary offered on a category listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Text of the entry's title link, with surrounding whitespace trimmed.
    pub raw_name: String,
    pub download_url: String,
    pub recommended: bool,
}

/// What the entry part of a listing page turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// No entry names at all.
    NoDictionaries,
    /// Entry names, but not a single download link.
    NoDownloadLinks,
    Entries(Vec<CatalogEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub total_pages: u32,
    pub listing: Listing,
}

/// Parses the listing page on the blocking pool, `Html` is not `Send`.
pub(crate) async fn parse_listing_html(
    html: String,
    page_url: Url,
    page_number: u32,
) -> Result<ListingPage> {
    spawn_blocking(move || parse_listing(&html, &page_url, page_number)).await?
}

/// Attempts to parse a category listing page.
///
/// Entry names and download links sit in two separate lists of `<div>`s which are paired by
/// position. Both lists must have the same length once they're non-empty.
///
/// The pager renders as `[1][2]…[N][next]`, so the second to last link holds the page count.
/// With fewer than two links the current page is the last one.
pub fn parse_listing(html: &str, page_url: &Url, page_number: u32) -> Result<ListingPage> {
    let doc = Html::parse_document(html);

    let name_selector = create_selector("div.detail_title")?;
    let link_selector = create_selector("div.dict_dl_btn")?;
    let pager_selector = create_selector("div#dict_page_list")?;
    let anchor_selector = create_selector("a")?;

    let pager = doc
        .select(&pager_selector)
        .next()
        .ok_or(Error::MissingElement("div#dict_page_list"))?;
    let page_links = pager.select(&anchor_selector).collect::<Vec<_>>();
    let total_pages = match page_links.len() {
        0 | 1 => page_number,
        n => {
            let text = element_text(page_links[n - 2]);
            text.parse::<u32>().map_err(|_| Error::PageCount(text))?
        }
    };

    let name_divs = doc.select(&name_selector).collect::<Vec<_>>();
    let link_divs = doc.select(&link_selector).collect::<Vec<_>>();

    let listing = if name_divs.is_empty() {
        Listing::NoDictionaries
    } else if link_divs.is_empty() {
        Listing::NoDownloadLinks
    } else if name_divs.len() != link_divs.len() {
        return Err(Error::EntryLinkMismatch {
            names: name_divs.len(),
            links: link_divs.len(),
        });
    } else {
        let mut entries = Vec::with_capacity(name_divs.len());
        for (name_div, link_div) in name_divs.into_iter().zip(link_divs) {
            let raw_name =
                first_anchor(name_div, &anchor_selector, "div.detail_title a").map(element_text)?;
            let href = first_anchor(link_div, &anchor_selector, "div.dict_dl_btn a")?
                .value()
                .attr("href")
                .ok_or(Error::MissingElement("div.dict_dl_btn a[href]"))?;
            let download_url = page_url.join(href)?.to_string();

            entries.push(CatalogEntry {
                recommended: raw_name.contains(RECOMMEND_MARKER),
                raw_name,
                download_url,
            });
        }
        Listing::Entries(entries)
    };

    Ok(ListingPage {
        total_pages,
        listing,
    })
}

/// Keeps the entries that should be downloaded.
pub fn select_entries(entries: Vec<CatalogEntry>, recommend_only: bool) -> Vec<CatalogEntry> {
    entries
        .into_iter()
        .filter(|entry| !recommend_only || entry.recommended)
        .collect()
}

/// Deletes every character in `INVALID_SYMBOLS` from `name`.
#[inline]
pub fn sanitize_file_name(name: &str) -> String {
    name.replace(INVALID_SYMBOLS, "")
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

fn first_anchor<'a>(
    block: ElementRef<'a>,
    anchor_selector: &Selector,
    what: &'static str,
) -> Result<ElementRef<'a>> {
    block
        .select(anchor_selector)
        .next()
        .ok_or(Error::MissingElement(what))
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
