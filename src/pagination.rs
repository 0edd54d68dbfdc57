//! # Pagination
//!
//! Offset/limit paging for collection responses: parsing `page[offset]` and
//! `page[limit]` from a query string, building the `self`/`first`/`last`/`prev`/
//! `next` links, and the top-level document meta object.
//!
//! Query strings are decoded and encoded with [`url::form_urlencoded`]. Links keep
//! every query parameter of the request path except the page window, which is
//! replaced.
//!
//! The last page starts at `floor((total - 1) / limit) * limit`, or `0` for an empty
//! collection.

use crate::config::{Authors, JsonApiConfig, PaginationConfig};
use crate::constants::links;
use crate::error::Result;
use crate::links::LinkTarget;
use serde_json::{Map, Value};
use url::form_urlencoded;

const OFFSET_PARAMETER: &str = "page[offset]";
const LIMIT_PARAMETER: &str = "page[limit]";

/// Requested page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub offset: u64,
    pub limit: u64,
}

impl PageParams {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Parse `page[offset]` and `page[limit]` from a raw query string.
    ///
    /// Keys and values are fully percent-decoded. When a parameter repeats, the
    /// last occurrence holding a number wins; empty or non-numeric occurrences are
    /// ignored. Both parameters must be present and the limit positive; the limit
    /// is capped at the configured maximum.
    pub fn from_query(query: &str, config: &PaginationConfig) -> Option<Self> {
        let mut offset = None;
        let mut limit = None;

        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let slot = match &*key {
                OFFSET_PARAMETER => &mut offset,
                LIMIT_PARAMETER => &mut limit,
                _ => continue,
            };
            if let Ok(number) = value.trim().parse::<u64>() {
                *slot = Some(number);
            }
        }

        let limit = limit.filter(|limit| *limit > 0)?;
        Some(Self {
            offset: offset?,
            limit: limit.min(u64::from(config.max_limit)),
        })
    }

    /// First page with the configured default limit
    pub fn first_page(config: &PaginationConfig) -> Self {
        Self::new(0, u64::from(config.default_limit))
    }

    /// Query string selecting this window
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(OFFSET_PARAMETER, &self.offset.to_string())
            .append_pair(LIMIT_PARAMETER, &self.limit.to_string())
            .finish()
    }
}

fn is_page_parameter(key: &str) -> bool {
    key == OFFSET_PARAMETER || key == LIMIT_PARAMETER
}

/// Offset of the last page of `total_count` items
pub fn last_page_offset(total_count: u64, limit: u64) -> u64 {
    if total_count == 0 || limit == 0 {
        return 0;
    }
    ((total_count - 1) / limit) * limit
}

/// Top-level pagination links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub self_link: String,
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    /// Links for the window `params` over `total_count` items.
    ///
    /// `path` is the request path or absolute URL; its other query parameters are
    /// kept and any page window it carries is replaced. Fails with
    /// [`JsonApiError::Configuration`](crate::JsonApiError::Configuration) when
    /// `path` is not a valid URL or path.
    pub fn build(path: &str, params: PageParams, total_count: u64) -> Result<Self> {
        let target = LinkTarget::parse(path)?;
        let retained: Vec<(String, String)> = target
            .url()
            .query_pairs()
            .filter(|(key, _)| !is_page_parameter(key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let link = |offset: u64| {
            let mut url = target.url().clone();
            url.set_query(None);
            url.query_pairs_mut()
                .extend_pairs(retained.iter().map(|(key, value)| (key.as_str(), value.as_str())))
                .append_pair(OFFSET_PARAMETER, &offset.to_string())
                .append_pair(LIMIT_PARAMETER, &params.limit.to_string());
            target.render(&url)
        };

        let prev = (params.offset > 0).then(|| link(params.offset.saturating_sub(params.limit)));
        let next = (params.offset.saturating_add(params.limit) < total_count)
            .then(|| link(params.offset + params.limit));

        Ok(Self {
            self_link: link(params.offset),
            first: link(0),
            last: link(last_page_offset(total_count, params.limit)),
            prev,
            next,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(links::SELF.to_string(), Value::String(self.self_link.clone()));
        object.insert(links::FIRST.to_string(), Value::String(self.first.clone()));
        if let Some(prev) = &self.prev {
            object.insert(links::PREV.to_string(), Value::String(prev.clone()));
        }
        if let Some(next) = &self.next {
            object.insert(links::NEXT.to_string(), Value::String(next.clone()));
        }
        object.insert(links::LAST.to_string(), Value::String(self.last.clone()));
        Value::Object(object)
    }
}

/// Top-level meta: `author` or `authors`, optional `copyright` and `totalCount`
pub fn document_meta(config: &JsonApiConfig, total_count: Option<u64>) -> Value {
    let mut meta = Map::new();

    match &config.meta.author {
        Authors::One(author) => {
            meta.insert("author".to_string(), Value::String(author.clone()));
        }
        Authors::Many(authors) => {
            meta.insert(
                "authors".to_string(),
                Value::Array(authors.iter().cloned().map(Value::String).collect()),
            );
        }
    }

    if let Some(copyright) = &config.meta.copyright {
        meta.insert("copyright".to_string(), Value::String(copyright.clone()));
    }

    if let Some(total_count) = total_count {
        meta.insert("totalCount".to_string(), Value::from(total_count));
    }

    Value::Object(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_page_offset() {
        assert_eq!(last_page_offset(0, 10), 0);
        assert_eq!(last_page_offset(10, 10), 0);
        assert_eq!(last_page_offset(11, 10), 10);
        assert_eq!(last_page_offset(25, 10), 20);
        assert_eq!(last_page_offset(30, 10), 20);
        assert_eq!(last_page_offset(14, 4), 12);
    }

    #[test]
    fn test_parse_query() {
        let config = PaginationConfig::default();
        assert_eq!(
            PageParams::from_query("page[offset]=20&page[limit]=10", &config),
            Some(PageParams::new(20, 10))
        );
        assert_eq!(
            PageParams::from_query("?page%5Boffset%5D=0&page%5Blimit%5D=500", &config),
            Some(PageParams::new(0, 100))
        );
        assert_eq!(PageParams::from_query("page[limit]=10", &config), None);
        assert_eq!(PageParams::from_query("page[offset]=0&page[limit]=0", &config), None);
    }

    #[test]
    fn test_links_middle_page() {
        let links = PageLinks::build("/devices", PageParams::new(10, 10), 35).unwrap();

        assert_eq!(links.first, "/devices?page%5Boffset%5D=0&page%5Blimit%5D=10");
        assert_eq!(links.last, "/devices?page%5Boffset%5D=30&page%5Blimit%5D=10");
        assert_eq!(
            links.prev.as_deref(),
            Some("/devices?page%5Boffset%5D=0&page%5Blimit%5D=10")
        );
        assert_eq!(
            links.next.as_deref(),
            Some("/devices?page%5Boffset%5D=20&page%5Blimit%5D=10")
        );
    }

    #[test]
    fn test_links_edges() {
        let first = PageLinks::build("/devices", PageParams::new(0, 10), 20).unwrap();
        assert!(first.prev.is_none());
        assert!(first.next.is_some());

        let last = PageLinks::build("/devices", PageParams::new(10, 10), 20).unwrap();
        assert!(last.next.is_none());
        assert_eq!(last.last, last.self_link);

        let clamped = PageLinks::build("/devices", PageParams::new(5, 10), 20).unwrap();
        assert_eq!(
            clamped.prev.as_deref(),
            Some("/devices?page%5Boffset%5D=0&page%5Blimit%5D=10")
        );
        assert!(first.to_value().get("prev").is_none());
    }

    #[test]
    fn test_document_meta() {
        let mut config = JsonApiConfig::default();
        assert_eq!(document_meta(&config, None), json!({ "author": "JSON:API" }));

        config.meta.author = Authors::Many(vec!["A".into(), "B".into()]);
        config.meta.copyright = Some("ACME".into());
        assert_eq!(
            document_meta(&config, Some(3)),
            json!({ "authors": ["A", "B"], "copyright": "ACME", "totalCount": 3 })
        );
    }

    #[test]
    fn test_parse_query_decodes_values() {
        let config = PaginationConfig::default();
        assert_eq!(
            PageParams::from_query("page%5Boffset%5D=%31%30&page%5Blimit%5D=5", &config),
            Some(PageParams::new(10, 5))
        );
        assert_eq!(
            PageParams::from_query("page%5boffset%5d=+3+&page[limit]=%35", &config),
            Some(PageParams::new(3, 5))
        );
    }

    #[test]
    fn test_parse_query_repeated_keys() {
        let config = PaginationConfig::default();
        assert_eq!(
            PageParams::from_query("page[offset]=10&page[limit]=5&page[offset]=20", &config),
            Some(PageParams::new(20, 5))
        );
        assert_eq!(
            PageParams::from_query(
                "page%5Boffset%5D=%31%30&page%5Blimit%5D=5&page%5Boffset%5D=",
                &config
            ),
            Some(PageParams::new(10, 5))
        );
        assert_eq!(
            PageParams::from_query("page[offset]=abc&page[limit]=5", &config),
            None
        );
    }

    #[test]
    fn test_links_keep_existing_query() {
        let links = PageLinks::build("/devices?include=owner", PageParams::new(0, 10), 25).unwrap();

        assert_eq!(
            links.self_link,
            "/devices?include=owner&page%5Boffset%5D=0&page%5Blimit%5D=10"
        );
        assert_eq!(
            links.last,
            "/devices?include=owner&page%5Boffset%5D=20&page%5Blimit%5D=10"
        );
        assert_eq!(links.self_link.matches('?').count(), 1);
    }

    #[test]
    fn test_links_replace_requested_window() {
        let links = PageLinks::build(
            "https://api.example.com/devices?page%5Boffset%5D=10&filter[name]=lamp&page[limit]=10",
            PageParams::new(10, 10),
            30,
        )
        .unwrap();

        assert_eq!(
            links.first,
            "https://api.example.com/devices?filter%5Bname%5D=lamp&page%5Boffset%5D=0&page%5Blimit%5D=10"
        );
        assert_eq!(
            links.next.as_deref(),
            Some("https://api.example.com/devices?filter%5Bname%5D=lamp&page%5Boffset%5D=20&page%5Blimit%5D=10")
        );
    }

    #[test]
    fn test_links_reject_invalid_path() {
        assert!(PageLinks::build("http://[::1", PageParams::new(0, 10), 5).is_err());
    }
}
