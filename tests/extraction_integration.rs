//! Integration tests for carousel extraction using fixture files.

use amz_recscrape::carousel::{CarouselLocator, SkipReason};
use amz_recscrape::config::{Config, OutputFormat};
use amz_recscrape::format::Formatter;
use amz_recscrape::{CarouselScraper, HtmlPage, PageQuery, RecommendationGraph, Recommendations};
use std::time::Duration;
use tokio::time::Instant;

const PRODUCT_FIXTURE: &str = include_str!("fixtures/product_page.html");
const SIMS_PAGE_2: &str = include_str!("fixtures/sims_page2.html");
const SIMS_PAGE_3: &str = include_str!("fixtures/sims_page3.html");
const SPONSORED_PAGE_2: &str = include_str!("fixtures/sponsored_page2.html");

const URL: &str =
    "https://www.amazon.com/Left-Hand-Darkness-Ursula-Guin/dp/0441478123/ref=sr_1_1?crid=2X&keywords=left+hand";

const SIMS: &str = "Customers who bought this item also bought";
const SPONSORED: &str = "Sponsored products related to this item";

fn fixture_page() -> HtmlPage {
    HtmlPage::parse(URL, PRODUCT_FIXTURE)
        .with_viewport(4200, 900)
        .with_page_turns("sims-consolidated-1", [SIMS_PAGE_2, SIMS_PAGE_3])
        .with_page_turns("sp_detail", [SPONSORED_PAGE_2])
}

async fn scrape(page: &HtmlPage, config: &Config) -> Recommendations {
    CarouselScraper::new(config).scrape(page).await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_extract_fixture_page() {
    let page = fixture_page();
    let result = scrape(&page, &Config::default()).await;

    assert_eq!(result.names(), vec![SIMS, SPONSORED]);
    assert!(page.scroll_metrics().at_bottom());
    assert_eq!(page.activations(), 3);

    let sims = result.get(SIMS).unwrap();
    assert!(!sims.sponsored);

    let asins: Vec<&str> = sims.items.iter().map(|i| i.asin.as_str()).collect();
    assert_eq!(
        asins,
        vec!["0441478123", "0061054887", "0547773749", "0060512741", "0553283685", "0807083690"]
    );
    let ranks: Vec<u32> = sims.items.iter().map(|i| i.rank).collect();
    assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);

    let first = &sims.items[1];
    assert_eq!(first.link, "/Dispossessed-Ursula-K-Guin/dp/0061054887/ref=pd_sim_14_1");
    assert_eq!(first.label.as_deref(), Some("The Dispossessed: An Ambiguous Utopia"));
    assert_eq!(first.author.as_deref(), Some("Ursula K. Le Guin"));
    assert_eq!(first.price.as_deref(), Some("$10.99"));
    assert_eq!(first.thumbnail.as_deref(), Some("https://images.example/I/dispossessed.jpg"));

    // Empty byline: first small text row is used
    assert_eq!(sims.items[2].author.as_deref(), Some("Clarion Books"));
    // No byline at all: the rating row is not taken as the author
    assert!(sims.items[5].author.is_none());
    assert!(sims.items[4].price.is_none());

    let sponsored = result.get(SPONSORED).unwrap();
    assert!(sponsored.sponsored);
    let asins: Vec<&str> = sponsored.items.iter().map(|i| i.asin.as_str()).collect();
    assert_eq!(asins, vec!["0441478123", "B08SPONSOR1", "B08SPONSOR2"]);
    assert_eq!(sponsored.items[1].link, "/gp/product/B08SPONSOR1/ref=sspa_dk_detail_0");
}

#[tokio::test(start_paused = true)]
async fn test_seed_item_heads_every_carousel() {
    let page = fixture_page();
    let result = scrape(&page, &Config::default()).await;

    for carousel in &result {
        let seed = &carousel.items[0];
        assert!(seed.is_seed);
        assert_eq!(seed.rank, 0);
        assert_eq!(seed.asin, "0441478123");
        assert_eq!(seed.link, "https://www.amazon.com/Left-Hand-Darkness-Ursula-Guin/dp/0441478123/ref=sr_1_1");
        assert_eq!(seed.label.as_deref(), Some("The Left Hand of Darkness"));
        assert_eq!(seed.price.as_deref(), Some("$11.49"));
        assert_eq!(seed.thumbnail.as_deref(), Some("https://images.example/I/left-hand-front.jpg"));
        assert!(seed.author.is_none());
        assert_eq!(carousel.items.iter().filter(|i| i.is_seed).count(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_unsettled_page_delays_but_completes() {
    let page = fixture_page();
    let start = Instant::now();
    scrape(&page, &Config::default()).await;

    // The last sims page keeps a placeholder card, so its wait runs out
    assert!(start.elapsed() >= Duration::from_millis(5000));
    assert!(start.elapsed() < Duration::from_secs(30));
}

#[test]
fn test_locator_skip_reasons() {
    let page = HtmlPage::parse(URL, PRODUCT_FIXTURE);
    let locator = CarouselLocator::new();

    let outcomes: Vec<Result<String, SkipReason>> = locator
        .candidates(&page)
        .unwrap()
        .iter()
        .map(|list| locator.inspect(&page, list).unwrap().map(|c| c.name))
        .collect();

    assert_eq!(
        outcomes,
        vec![
            Ok(SIMS.to_string()),
            Ok(SPONSORED.to_string()),
            Err(SkipReason::RelatedVideos),
            Err(SkipReason::Hidden),
            Err(SkipReason::PreviouslyViewed),
            Err(SkipReason::Unnamed),
            Err(SkipReason::NoContainer),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_item_cap_bounds_every_carousel() {
    let page = fixture_page();
    let config = Config { max_carousel_items: 2, ..Config::default() };
    let result = scrape(&page, &config).await;

    for carousel in &result {
        assert!(carousel.items.len() <= config.max_carousel_items + 1);
    }
    assert_eq!(result.get(SIMS).unwrap().items.len(), 3);
    assert_eq!(result.get(SPONSORED).unwrap().items.len(), 2);
    // Both carousels hit the cap on their first page
    assert_eq!(page.activations(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_page_cap_from_config() {
    let page = fixture_page();
    let config = Config { page_cap: 1, ..Config::default() };
    let result = scrape(&page, &config).await;

    assert_eq!(page.activations(), 0);
    assert_eq!(result.get(SIMS).unwrap().items.len(), 3);
    assert_eq!(result.get(SPONSORED).unwrap().items.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_not_a_product_page() {
    let page = HtmlPage::parse(
        "https://www.amazon.com/s?k=le+guin",
        r#"<html><body><div class="s-result-list">Results</div></body></html>"#,
    );
    let result = scrape(&page, &Config::default()).await;

    assert!(result.is_empty());
    assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
}

#[tokio::test(start_paused = true)]
async fn test_repeat_extraction_is_identical() {
    let first = scrape(&fixture_page(), &Config::default()).await;
    let second = scrape(&fixture_page(), &Config::default()).await;
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn test_result_json_feeds_graph() {
    let result = scrape(&fixture_page(), &Config::default()).await;
    let json = Formatter::new(OutputFormat::Json).format_recommendations(&result);
    let parsed: Recommendations = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);

    let mut graph = RecommendationGraph::new();
    graph.ingest(&parsed);

    assert_eq!(graph.node_count(), 8);
    assert_eq!(graph.edge_count(), 7);
    assert_eq!(graph.list_titles(), vec![SIMS, SPONSORED]);
    assert_eq!(
        graph.node("0061054887").unwrap().link,
        "https://www.amazon.com/Dispossessed-Ursula-K-Guin/dp/0061054887/ref=pd_sim_14_1"
    );
    assert_eq!(graph.next_seeds().len(), 7);

    let gdf = graph.to_gdf(SPONSORED).unwrap();
    assert!(gdf.contains(r#""0441478123","B08SPONSOR2",true"#));
    assert!(!gdf.contains("0061054887"));
}
