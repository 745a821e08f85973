//! Data models for carousel items and the aggregated extraction result.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One catalog entry in a carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Amazon Standard Identification Number
    #[serde(default)]
    pub asin: String,
    /// Position within the carousel (seed item is 0)
    pub rank: u32,
    /// Product page URL without query string
    pub link: String,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Display title
    pub label: Option<String>,
    /// Secondary attribution line (author, brand)
    pub author: Option<String>,
    /// Display price, as shown on the page
    pub price: Option<String>,
    /// True only for the product the page is about
    #[serde(default)]
    pub is_seed: bool,
}

impl Item {
    /// Creates the seed item for the page's own product.
    pub fn seed(
        asin: impl Into<String>,
        link: impl Into<String>,
        label: impl Into<String>,
        thumbnail: Option<String>,
        price: Option<String>,
    ) -> Self {
        Self {
            asin: asin.into(),
            rank: 0,
            link: link.into(),
            thumbnail,
            label: Some(label.into()),
            author: None,
            price,
            is_seed: true,
        }
    }
}

/// A named, ordered list of items shown under one carousel header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Carousel {
    /// First line of the header text
    pub name: String,
    /// Whether the header marks the carousel as sponsored
    pub sponsored: bool,
    /// Seed item first, then scraped entries in page order
    pub items: Vec<Item>,
}

impl Carousel {
    /// Creates a carousel holding only the seed item.
    pub fn new(name: impl Into<String>, sponsored: bool, seed: Item) -> Self {
        Self { name: name.into(), sponsored, items: vec![seed] }
    }

    /// Returns the scraped (non-seed) items.
    pub fn scraped(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| !item.is_seed)
    }
}

/// Carousels keyed by name, in the order their names first appeared.
///
/// Serializes as `{ name: { items, sponsored } }`. Inserting a carousel whose
/// name is already present replaces the earlier one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recommendations {
    carousels: Vec<Carousel>,
}

impl Recommendations {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a carousel, returning the one it replaced.
    pub fn insert(&mut self, carousel: Carousel) -> Option<Carousel> {
        match self.carousels.iter_mut().find(|c| c.name == carousel.name) {
            Some(existing) => Some(std::mem::replace(existing, carousel)),
            None => {
                self.carousels.push(carousel);
                None
            }
        }
    }

    /// Looks up a carousel by name.
    pub fn get(&self, name: &str) -> Option<&Carousel> {
        self.carousels.iter().find(|c| c.name == name)
    }

    /// Iterates carousels in result order.
    pub fn iter(&self) -> std::slice::Iter<'_, Carousel> {
        self.carousels.iter()
    }

    /// Returns carousel names in result order.
    pub fn names(&self) -> Vec<&str> {
        self.carousels.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns the number of carousels.
    pub fn len(&self) -> usize {
        self.carousels.len()
    }

    /// Returns true if no carousels were found.
    pub fn is_empty(&self) -> bool {
        self.carousels.is_empty()
    }

    /// Total number of items across all carousels, seeds included.
    pub fn item_count(&self) -> usize {
        self.carousels.iter().map(|c| c.items.len()).sum()
    }
}

impl<'a> IntoIterator for &'a Recommendations {
    type Item = &'a Carousel;
    type IntoIter = std::slice::Iter<'a, Carousel>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Serialize)]
struct CarouselBodyRef<'a> {
    items: &'a [Item],
    sponsored: bool,
}

#[derive(Deserialize)]
struct CarouselBody {
    items: Vec<Item>,
    #[serde(default)]
    sponsored: bool,
}

impl Serialize for Recommendations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.carousels.len()))?;
        for carousel in &self.carousels {
            map.serialize_entry(
                &carousel.name,
                &CarouselBodyRef { items: &carousel.items, sponsored: carousel.sponsored },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Recommendations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecommendationsVisitor;

        impl<'de> Visitor<'de> for RecommendationsVisitor {
            type Value = Recommendations;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of carousel names to carousels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut result = Recommendations::new();
                while let Some((name, body)) = map.next_entry::<String, CarouselBody>()? {
                    result.insert(Carousel { name, sponsored: body.sponsored, items: body.items });
                }
                Ok(result)
            }
        }

        deserializer.deserialize_map(RecommendationsVisitor)
    }
}
