use chrono::{DateTime, SecondsFormat, Utc};

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Time window and page size shared by every page request of one collection run.
///
/// Only the page number varies between requests, so it is supplied per call
/// to [`FetchWindow::query_for_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Inclusive lower bound on build creation time
    pub start_time: DateTime<Utc>,
    /// Inclusive upper bound on build creation time
    pub end_time: DateTime<Utc>,
    pub page_size: u32,
}

impl FetchWindow {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, page_size: u32) -> Self {
        Self {
            start_time,
            end_time,
            page_size,
        }
    }

    pub fn query_for_page(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("page", page.to_string()),
            ("per_page", self.page_size.to_string()),
            ("created_from", format_timestamp(self.start_time)),
            ("created_to", format_timestamp(self.end_time)),
        ]
    }
}

fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> FetchWindow {
        FetchWindow::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 14, 23, 59, 59).unwrap(),
            50,
        )
    }

    #[test]
    fn query_contains_page_and_window() {
        let query = window().query_for_page(3);

        assert_eq!(
            query,
            vec![
                ("page", "3".to_string()),
                ("per_page", "50".to_string()),
                ("created_from", "2024-03-01T00:00:00.000Z".to_string()),
                ("created_to", "2024-03-14T23:59:59.000Z".to_string()),
            ]
        );
    }

    #[test]
    fn only_page_changes_between_pages() {
        let window = window();
        let first = window.query_for_page(1);
        let second = window.query_for_page(2);

        assert_ne!(first[0], second[0]);
        assert_eq!(first[1..], second[1..]);
    }
}
