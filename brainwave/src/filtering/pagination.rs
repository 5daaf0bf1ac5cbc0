use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

/// Query parameter rewritten when building navigation links.
pub const PAGE_PARAM: &str = "page";

/// Row offset of the first item on `page` (1-based) when pages hold `size` items.
#[must_use]
pub const fn offset_for(page: u64, size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(size)
}

/// Page metadata returned alongside a slice of search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    /// The requested page, echoed back even when it lies past the last page
    pub current: u64,
    /// Number of rows actually returned for this page
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl SearchResultPage {
    /// Build page metadata for a fetch of `requested_size` rows per page that returned
    /// `returned` rows out of `total_elements` matches.
    #[must_use]
    pub const fn compute(current: u64, requested_size: u64, returned: u64, total_elements: u64) -> Self {
        let total_pages = if requested_size == 0 {
            0
        } else {
            total_elements.div_ceil(requested_size)
        };
        Self {
            current,
            size: returned,
            total_elements,
            total_pages,
        }
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Page the `last` link points at. An empty result still has a first page to link to.
    #[must_use]
    pub const fn last_page(&self) -> u64 {
        if self.total_pages == 0 { 1 } else { self.total_pages }
    }
}

/// Rebuild `url` with its `page` query parameter set to `page`.
///
/// Every other query parameter is kept as-is and in order. An existing `page` keeps its
/// position; any repeats of it are dropped. Without one, `page` is appended.
#[must_use]
pub fn build_page_link(url: &Url, page: u64) -> String {
    let page = page.to_string();
    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(key, value)| {
            if key != PAGE_PARAM {
                return Some((key.into_owned(), value.into_owned()));
            }
            if replaced {
                return None;
            }
            replaced = true;
            Some((key.into_owned(), page.clone()))
        })
        .collect();

    let mut link = url.clone();
    link.set_fragment(None);
    {
        let mut query = link.query_pairs_mut();
        query.clear();
        query.extend_pairs(&pairs);
        if !replaced {
            query.append_pair(PAGE_PARAM, &page);
        }
    }
    link.into()
}

/// Navigation links for a page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub last: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl PageLinks {
    #[must_use]
    pub fn build(url: &Url, page: &SearchResultPage) -> Self {
        Self {
            self_link: build_page_link(url, page.current),
            first: build_page_link(url, 1),
            last: build_page_link(url, page.last_page()),
            next: page
                .has_next()
                .then(|| build_page_link(url, page.current + 1)),
            prev: page
                .has_prev()
                .then(|| build_page_link(url, page.current - 1)),
        }
    }
}

/// Response envelope for a search: the rows, where they sit, and how to move around.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResult<T> {
    pub data: Vec<T>,
    pub page: SearchResultPage,
    pub links: PageLinks,
}

impl<T> SearchResult<T> {
    /// Assemble the envelope for `data`, one page out of `total_elements` matches.
    #[must_use]
    pub fn new(data: Vec<T>, current: u64, requested_size: u64, total_elements: u64, url: &Url) -> Self {
        let page = SearchResultPage::compute(current, requested_size, data.len() as u64, total_elements);
        let links = PageLinks::build(url, &page);
        Self { data, page, links }
    }
}
