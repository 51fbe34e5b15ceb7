//! Service layer: the banner phase engine and the directory engine.
//!
//! Everything here is a pure transform over models, except the banner
//! controller (which reads and writes the dismissal store) and the ticker
//! (which owns a tokio task).

pub mod banner;
pub mod browser;
pub mod clock;
pub mod countdown;
pub mod facets;
pub mod filters;
pub mod pagination;
pub mod phase;
pub mod retry;
pub mod ticker;


pub use banner::{is_hidden, BannerController, BannerFrame, DismissalTracker};
pub use browser::{DirectoryBrowser, DirectoryView, PageChange};
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use countdown::{format_countdown, format_duration, remaining_millis};
pub use facets::{compute_facets, Facets};
pub use filters::{apply_filters, matches_facet, matches_search, FilterState};
pub use pagination::{
    coerce_page, effective_page, page_links, paginate, parse_page_param, total_pages, Page,
    PageLink, DEFAULT_PAGE_SIZE,
};
pub use phase::{resolve_banner, BannerDecision, BannerLabels, BannerState, Phase, SuppressReason};
pub use retry::{retry_async, RetryPolicy};
pub use ticker::{spawn_banner_ticker, TickerExit, TickerHandle};
