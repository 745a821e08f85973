//! Slow scroll to the bottom of the page so lazy carousels render.

use crate::page::PageQuery;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, trace, warn};

/// Scrolls the document down in small steps with a pause after each one.
#[derive(Debug, Clone)]
pub struct LazyLoadScroller {
    step: u32,
    delay: Duration,
}

impl LazyLoadScroller {
    /// Creates a scroller moving `step` pixels every `delay`.
    pub fn new(step: u32, delay: Duration) -> Self {
        Self { step, delay }
    }

    /// Scrolls until the viewport reaches the bottom of the document.
    ///
    /// Returns the number of steps taken. A page that refuses to move ends
    /// the loop early rather than spinning forever.
    pub async fn scroll_to_bottom<P: PageQuery>(&self, page: &P) -> u32 {
        let mut steps = 0;

        loop {
            let metrics = page.scroll_metrics();
            if metrics.at_bottom() {
                break;
            }

            page.set_scroll_top(metrics.top.saturating_add(self.step));
            steps += 1;
            trace!("Scrolled to {}", page.scroll_metrics().top);
            sleep(self.delay).await;

            if page.scroll_metrics().top <= metrics.top {
                warn!("Page stopped scrolling at {} of {}", metrics.top, metrics.height);
                break;
            }
        }

        debug!("Scrolled to bottom in {} steps", steps);
        steps
    }
}

impl Default for LazyLoadScroller {
    fn default() -> Self {
        Self::new(100, Duration::from_millis(50))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::HtmlPage;

    #[tokio::test(start_paused = true)]
    async fn test_scrolls_in_steps_to_bottom() {
        let page = HtmlPage::parse("https://www.amazon.com/dp/B000000001", "<p></p>")
            .with_viewport(1250, 800);

        let steps = LazyLoadScroller::default().scroll_to_bottom(&page).await;

        // 450px to go: 100, 200, 300, 400, then clamped to 450
        assert_eq!(steps, 5);
        assert!(page.scroll_metrics().at_bottom());
        assert_eq!(page.scroll_metrics().top, 450);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_at_bottom_is_noop() {
        let page = HtmlPage::parse("https://www.amazon.com/dp/B000000001", "<p></p>")
            .with_viewport(600, 800);

        let steps = LazyLoadScroller::default().scroll_to_bottom(&page).await;
        assert_eq!(steps, 0);
        assert_eq!(page.scroll_metrics().top, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_run_is_idempotent() {
        let page = HtmlPage::parse("https://www.amazon.com/dp/B000000001", "<p></p>")
            .with_viewport(2000, 1000);
        let scroller = LazyLoadScroller::default();

        assert_eq!(scroller.scroll_to_bottom(&page).await, 10);
        assert_eq!(scroller.scroll_to_bottom(&page).await, 0);
    }
}
