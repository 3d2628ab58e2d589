use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use url::Url;

use crate::convert::{handoff_file_name, Converter};
use crate::parse::{parse_listing_html, sanitize_file_name, select_entries, Listing};
use crate::request::{
    build_client, category_page_url, direct_download_url, request_page_html, ArtifactFetcher,
    HttpFetcher,
};
use crate::{info_time, Config, Result};

/// A dictionary downloaded straight by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryRef {
    pub display_name: String,
    pub identifier: u32,
}

impl DictionaryRef {
    pub fn new(display_name: impl Into<String>, identifier: u32) -> Self {
        Self {
            display_name: display_name.into(),
            identifier,
        }
    }
}

/// A catalog category. The name only shows up in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub display_name: String,
    pub identifier: u32,
}

impl CategoryRef {
    pub fn new(display_name: impl Into<String>, identifier: u32) -> Self {
        Self {
            display_name: display_name.into(),
            identifier,
        }
    }
}

/// Everything one run is asked to download.
#[derive(Debug, Clone, Default)]
pub struct HarvestPlan {
    pub dictionaries: Vec<DictionaryRef>,
    pub categories: Vec<CategoryRef>,
    pub recommend_only: bool,
}

/// Harvests a single listing page and reports how many pages the category has.
#[async_trait]
pub trait PageHarvester: Send + Sync {
    async fn harvest_page(
        &self,
        category_id: u32,
        page_number: u32,
        recommend_only: bool,
    ) -> Result<u32>;
}

pub struct CategoryPageHarvester<F> {
    config: Config,
    client: Client,
    fetcher: F,
}

impl<F: ArtifactFetcher> CategoryPageHarvester<F> {
    pub fn new(config: Config, client: Client, fetcher: F) -> Self {
        Self {
            config,
            client,
            fetcher,
        }
    }
}

#[async_trait]
impl<F: ArtifactFetcher> PageHarvester for CategoryPageHarvester<F> {
    async fn harvest_page(
        &self,
        category_id: u32,
        page_number: u32,
        recommend_only: bool,
    ) -> Result<u32> {
        let url = category_page_url(self.config.origin(), category_id, page_number);
        let page_url = Url::parse(&url)?;
        let html = request_page_html(&self.client, &url).await?;
        let page = parse_listing_html(html, page_url, page_number).await?;

        match page.listing {
            Listing::NoDictionaries => {
                info_time!("Category {category_id}: no dictionaries available, skipping ...");
            }
            Listing::NoDownloadLinks => {
                info_time!(
                    "Category {category_id}: no download links, not supported, skipping ..."
                );
            }
            Listing::Entries(entries) => {
                for entry in select_entries(entries, recommend_only) {
                    let dest = self
                        .config
                        .artifact_path(&sanitize_file_name(&entry.raw_name));
                    self.fetcher.fetch(&entry.download_url, &dest).await?;
                }
            }
        }

        Ok(page.total_pages)
    }
}

/// Downloads every dictionary in `dictionaries`, in order, to `<scel_dir>/<name>.scel`.
pub async fn resolve_direct<F: ArtifactFetcher + ?Sized>(
    fetcher: &F,
    config: &Config,
    dictionaries: &[DictionaryRef],
) -> Result<()> {
    for dict in dictionaries {
        let url = direct_download_url(config.origin(), dict.identifier, &dict.display_name);
        fetcher
            .fetch(&url, &config.artifact_path(&dict.display_name))
            .await?;
    }
    Ok(())
}

/// Walks every page of every category, one after the other.
///
/// The page count is re-read after each page, so the walk follows whatever the latest page reports.
pub async fn resolve_by_categories<H: PageHarvester + ?Sized>(
    harvester: &H,
    categories: &[CategoryRef],
    recommend_only: bool,
) -> Result<()> {
    for category in categories {
        let start_time = Local::now();
        info_time!(
            "Harvesting category {} ({})",
            category.display_name,
            category.identifier
        );

        let mut current_page = 1;
        let mut total_pages = harvester
            .harvest_page(category.identifier, current_page, recommend_only)
            .await?;
        while current_page < total_pages {
            current_page += 1;
            total_pages = harvester
                .harvest_page(category.identifier, current_page, recommend_only)
                .await?;
        }

        info_time!(
            start_time,
            "Finished category {} after {} page(s)",
            category.display_name,
            current_page
        );
    }
    Ok(())
}

/// Hands the artifact directory to `converter`, naming the output after today's date.
/// Returns the file name used.
pub async fn trigger_conversion<C: Converter + ?Sized>(
    converter: &C,
    config: &Config,
) -> Result<String> {
    trigger_conversion_on(converter, config, Local::now().date_naive()).await
}

pub async fn trigger_conversion_on<C: Converter + ?Sized>(
    converter: &C,
    config: &Config,
    date: NaiveDate,
) -> Result<String> {
    let file_name = handoff_file_name(date);
    converter
        .convert(&config.scel_dir(), &config.dict_dir(), &file_name)
        .await?;
    Ok(file_name)
}

/// Runs the three passes in order: direct dictionaries, categories, conversion.
/// Returns the path the converter was asked to write.
pub async fn process_site<C: Converter + ?Sized>(
    config: &Config,
    plan: &HarvestPlan,
    converter: &C,
) -> Result<PathBuf> {
    let client = build_client(config)?;
    let fetcher = HttpFetcher::new(client.clone());

    let start_time = Local::now();
    info_time!("Started downloading {} dictionaries", plan.dictionaries.len());
    resolve_direct(&fetcher, config, &plan.dictionaries).await?;
    info_time!(start_time, "Finished downloading dictionaries.");

    let start_time = Local::now();
    info_time!("Started harvesting {} categories", plan.categories.len());
    let harvester = CategoryPageHarvester::new(config.clone(), client, fetcher);
    resolve_by_categories(&harvester, &plan.categories, plan.recommend_only).await?;
    info_time!(start_time, "Finished harvesting categories.");

    let start_time = Local::now();
    let file_name = trigger_conversion(converter, config).await?;
    info_time!(start_time, "Converted artifacts into {file_name}");

    Ok(config.dict_dir().join(file_name))
}
