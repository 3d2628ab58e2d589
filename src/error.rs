use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("The listing page is missing an expected element: {0}")]
    MissingElement(&'static str),
    #[error("Couldn't read a page count from the pagination link: {0:?}")]
    PageCount(String),
    #[error("Listing page has {names} entry names but {links} download links.")]
    EntryLinkMismatch { names: usize, links: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Converter `{program}` exited with {status}")]
    Converter {
        program: String,
        status: std::process::ExitStatus,
    },
}
