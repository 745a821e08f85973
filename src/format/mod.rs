//! Output formatting for extraction results (table, JSON, markdown, CSV).

use crate::carousel::{Carousel, Item, Recommendations};
use crate::config::OutputFormat;

/// Formats extraction results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats all carousels of a result.
    pub fn format_recommendations(&self, result: &Recommendations) -> String {
        if result.is_empty() {
            return match self.format {
                OutputFormat::Json => "{}".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No carousels found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json(result),
            OutputFormat::Table => self.table(result),
            OutputFormat::Markdown => self.markdown(result),
            OutputFormat::Csv => self.csv(result),
        }
    }

    // JSON formatting

    fn json(&self, result: &Recommendations) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table(&self, result: &Recommendations) -> String {
        let rank_width = 4;
        let asin_width = 10;
        let price_width = 10;
        let label_width = 50;

        let mut lines = Vec::new();

        for carousel in result {
            lines.push(self.heading(carousel));
            lines.push(format!(
                "{:<rank_width$}  {:<asin_width$}  {:<price_width$}  {}",
                "Rank", "ASIN", "Price", "Title"
            ));
            lines.push(format!(
                "{:-<rank_width$}  {:-<asin_width$}  {:-<price_width$}  {:-<label_width$}",
                "", "", "", ""
            ));

            for item in &carousel.items {
                let rank = if item.is_seed { "*".to_string() } else { item.rank.to_string() };
                lines.push(format!(
                    "{:<rank_width$}  {:<asin_width$}  {:>price_width$}  {}",
                    rank,
                    item.asin,
                    item.price.as_deref().unwrap_or("N/A"),
                    truncate(item.label.as_deref().unwrap_or(""), label_width)
                ));
            }
            lines.push(String::new());
        }

        lines.push(format!(
            "Total: {} carousels, {} items",
            result.len(),
            result.item_count()
        ));

        lines.join("\n")
    }

    fn heading(&self, carousel: &Carousel) -> String {
        if carousel.sponsored {
            format!("{} [sponsored]", carousel.name)
        } else {
            carousel.name.clone()
        }
    }

    // Markdown formatting

    fn markdown(&self, result: &Recommendations) -> String {
        let mut lines = Vec::new();

        for carousel in result {
            lines.push(format!("## {}", carousel.name));
            lines.push(String::new());
            if carousel.sponsored {
                lines.push("*Sponsored*".to_string());
                lines.push(String::new());
            }

            lines.push("| Rank | ASIN | Price | Author | Title |".to_string());
            lines.push("|------|------|-------|--------|-------|".to_string());

            for item in &carousel.items {
                lines.push(self.markdown_row(item));
            }
            lines.push(String::new());
        }

        lines.push(format!("*{} carousels found*", result.len()));

        lines.join("\n")
    }

    fn markdown_row(&self, item: &Item) -> String {
        let rank = if item.is_seed { "seed".to_string() } else { item.rank.to_string() };
        let label = truncate(item.label.as_deref().unwrap_or(""), 40).replace('|', "\\|");
        format!(
            "| {} | {} | {} | {} | [{}]({}) |",
            rank,
            item.asin,
            item.price.as_deref().unwrap_or("N/A"),
            item.author.as_deref().unwrap_or(""),
            label,
            item.link
        )
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "carousel,sponsored,rank,asin,label,author,price,link,thumbnail,is_seed".to_string()
    }

    fn csv(&self, result: &Recommendations) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for carousel in result {
            let name = Self::csv_escape(&carousel.name);
            for item in &carousel.items {
                let optional = |value: &Option<String>| {
                    value.as_deref().map(Self::csv_escape).unwrap_or_default()
                };

                lines.push(format!(
                    "{},{},{},{},{},{},{},{},{},{}",
                    name,
                    carousel.sponsored,
                    item.rank,
                    item.asin,
                    optional(&item.label),
                    optional(&item.author),
                    optional(&item.price),
                    Self::csv_escape(&item.link),
                    optional(&item.thumbnail),
                    item.is_seed
                ));
            }
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Shortens to `width` characters, ending in "..." when cut.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_seed() -> Item {
        Item::seed(
            "B000000001",
            "https://www.amazon.com/Seed-Book/dp/B000000001",
            "Seed Book",
            None,
            Some("$12.99".to_string()),
        )
    }

    fn make_item(asin: &str, rank: u32) -> Item {
        Item {
            asin: asin.to_string(),
            rank,
            link: format!("/Other/dp/{}/ref=pd", asin),
            thumbnail: Some("https://images.example/x.jpg".to_string()),
            label: Some("Other, Book".to_string()),
            author: Some("Jane \"JJ\" Author".to_string()),
            price: Some("$4.99".to_string()),
            is_seed: false,
        }
    }

    fn make_result() -> Recommendations {
        let mut result = Recommendations::new();

        let mut bought = Carousel::new("Customers also bought", false, make_seed());
        bought.items.push(make_item("B000000002", 1));
        bought.items.push(make_item("B000000003", 2));
        result.insert(bought);

        let mut sponsored = Carousel::new("Sponsored products", true, make_seed());
        sponsored.items.push(make_item("B000000004", 1));
        result.insert(sponsored);

        result
    }

    #[test]
    fn test_format_empty() {
        let empty = Recommendations::new();
        assert_eq!(Formatter::new(OutputFormat::Json).format_recommendations(&empty), "{}");
        assert_eq!(
            Formatter::new(OutputFormat::Csv).format_recommendations(&empty),
            "carousel,sponsored,rank,asin,label,author,price,link,thumbnail,is_seed"
        );
        assert_eq!(
            Formatter::new(OutputFormat::Table).format_recommendations(&empty),
            "No carousels found."
        );
        assert_eq!(
            Formatter::new(OutputFormat::Markdown).format_recommendations(&empty),
            "No carousels found."
        );
    }

    #[test]
    fn test_format_json() {
        let output = Formatter::new(OutputFormat::Json).format_recommendations(&make_result());
        let parsed: Recommendations = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, make_result());
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_table() {
        let output = Formatter::new(OutputFormat::Table).format_recommendations(&make_result());
        assert!(output.contains("Customers also bought\n"));
        assert!(output.contains("Sponsored products [sponsored]"));
        assert!(output.contains("Rank"));
        assert!(output.contains("B000000003"));
        assert!(output.contains("Total: 2 carousels, 5 items"));
    }

    #[test]
    fn test_format_table_truncates_long_labels() {
        let mut result = Recommendations::new();
        let mut carousel = Carousel::new("Long", false, make_seed());
        let mut item = make_item("B000000002", 1);
        item.label = Some("x".repeat(80));
        carousel.items.push(item);
        result.insert(carousel);

        let output = Formatter::new(OutputFormat::Table).format_recommendations(&result);
        assert!(output.contains(&format!("{}...", "x".repeat(47))));
        assert!(!output.contains(&"x".repeat(48)));
    }

    #[test]
    fn test_format_markdown() {
        let output = Formatter::new(OutputFormat::Markdown).format_recommendations(&make_result());
        assert!(output.contains("## Customers also bought"));
        assert!(output.contains("*Sponsored*"));
        assert!(output.contains("| seed | B000000001 | $12.99 |"));
        assert!(output.contains("[Other, Book](/Other/dp/B000000002/ref=pd)"));
        assert!(output.contains("*2 carousels found*"));
    }

    #[test]
    fn test_format_csv() {
        let output = Formatter::new(OutputFormat::Csv).format_recommendations(&make_result());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[1],
            "Customers also bought,false,0,B000000001,Seed Book,,$12.99,https://www.amazon.com/Seed-Book/dp/B000000001,,true"
        );
        assert_eq!(
            lines[2],
            r#"Customers also bought,false,1,B000000002,"Other, Book","Jane ""JJ"" Author",$4.99,/Other/dp/B000000002/ref=pd,https://images.example/x.jpg,false"#
        );
        assert!(lines[5].starts_with("Sponsored products,true,1,B000000004"));
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("simple"), "simple");
        assert_eq!(Formatter::csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(Formatter::csv_escape("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(Formatter::csv_escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is too long", 10), "this is...");
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }
}
