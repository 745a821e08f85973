//! Product link patterns and URL helpers.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Product page path (`/dp/` or `/gp/`).
static PRODUCT_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/[dg]p/").unwrap());

/// Sponsored-click interstitial that redirects to the product.
static REDIRECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"picassoRedirect\.html").unwrap());

/// ASIN segment of a product page URL.
static PAGE_ASIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:dp|gp/product|gp/aw/d)/([^/?#]+)").unwrap());

/// Drops everything from the first `?` on.
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// True for links to a product page that are not redirect interstitials.
pub fn is_product_link(link: &str) -> bool {
    PRODUCT_PATH.is_match(link) && !REDIRECT.is_match(link)
}

/// ASIN from a product page URL such as `/Title/dp/B000000001/ref=x`.
pub fn asin_from_url(url: &str) -> Option<&str> {
    PAGE_ASIN.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Third segment of the link's path: the ASIN in `/Title/dp/ASIN/...`.
pub fn third_path_segment(link: &str) -> Option<&str> {
    let path = match link.find("://") {
        Some(scheme_end) => {
            let rest = &link[scheme_end + 3..];
            rest.find('/').map_or("", |host_end| &rest[host_end..])
        }
        None => link,
    };

    path.split('/').nth(3).filter(|segment| !segment.is_empty())
}

/// `scheme://host` of an absolute URL.
pub fn origin(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")?;
    let host_start = scheme_end + 3;
    let host_end = url[host_start..].find('/').map_or(url.len(), |i| host_start + i);
    Some(&url[..host_end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/a/dp/B1/ref=x?pf_rd=1&th=2"), "/a/dp/B1/ref=x");
        assert_eq!(strip_query("/a/dp/B1"), "/a/dp/B1");
        assert_eq!(strip_query("?only"), "");
    }

    #[test]
    fn test_is_product_link() {
        assert!(is_product_link("/Some-Book/dp/B000000001/ref=pd_sim_1"));
        assert!(is_product_link("https://www.amazon.com/gp/product/B000000001"));
        assert!(!is_product_link("/stores/page/ABC"));
        assert!(!is_product_link("/gp/sponsored/picassoRedirect.html/ref=x/dp/B1"));
        assert!(!is_product_link(""));
    }

    #[test]
    fn test_asin_from_url() {
        assert_eq!(
            asin_from_url("https://www.amazon.com/Some-Book/dp/B000000001/ref=sr_1?k=v"),
            Some("B000000001")
        );
        assert_eq!(asin_from_url("https://www.amazon.de/gp/product/3161484100"), Some("3161484100"));
        assert_eq!(asin_from_url("https://www.amazon.com/dp/B000000001?th=1"), Some("B000000001"));
        assert_eq!(asin_from_url("https://www.amazon.com/s?k=books"), None);
    }

    #[test]
    fn test_third_path_segment() {
        assert_eq!(third_path_segment("/Some-Book/dp/B000000002/ref=pd"), Some("B000000002"));
        assert_eq!(
            third_path_segment("https://www.amazon.com/Some-Book/dp/B000000002"),
            Some("B000000002")
        );
        assert_eq!(third_path_segment("/dp/B000000002"), None);
        assert_eq!(third_path_segment("https://www.amazon.com"), None);
    }

    #[test]
    fn test_origin() {
        assert_eq!(origin("https://www.amazon.com/dp/B1?x"), Some("https://www.amazon.com"));
        assert_eq!(origin("https://www.amazon.co.uk"), Some("https://www.amazon.co.uk"));
        assert_eq!(origin("/dp/B1"), None);
    }
}
