use std::thread;
use std::time::{Duration, Instant};

use log::info;

use crate::errors::Result;

const USER_AGENT: &str = concat!("turtlemap/", env!("CARGO_PKG_VERSION"));

/// An HTTP client that enforces a minimum interval between outbound
/// requests, to play nice with shared community endpoints. The first
/// request goes out immediately; later ones block until the spacing window
/// has elapsed. Jumps are serialized through this one capability, so there
/// is never more than one request in flight.
pub struct SlowClient {
    client: reqwest::blocking::Client,
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl SlowClient {
    pub fn new(min_interval: Duration) -> Result<SlowClient> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(SlowClient {
            client,
            min_interval,
            last_request: None,
        })
    }

    fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                info!(wait_ms = wait.as_millis() as u64; "Throttling request");
                thread::sleep(wait);
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// GET `url`, sending `referer`, honoring the spacing window and the
    /// caller's deadline. Non-2xx statuses are errors.
    pub fn get(&mut self, url: &str, referer: &str, timeout: Duration) -> Result<String> {
        self.pace();
        let response = self
            .client
            .get(url)
            .header(reqwest::header::REFERER, referer)
            .timeout(timeout)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }

    /// POST one form field, e.g. `data=<overpass query>`.
    pub fn post_form(
        &mut self,
        url: &str,
        field: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<String> {
        self.pace();
        let response = self
            .client
            .post(url)
            .form(&[(field, value)])
            .timeout(timeout)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paces_consecutive_requests() {
        let mut client = SlowClient::new(Duration::from_millis(40)).unwrap();

        // First call passes immediately, the second waits out the window.
        let start = Instant::now();
        client.pace();
        assert!(start.elapsed() < Duration::from_millis(20));
        client.pace();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn idle_time_counts_toward_the_window() {
        let mut client = SlowClient::new(Duration::from_millis(30)).unwrap();
        client.pace();
        thread::sleep(Duration::from_millis(35));
        let start = Instant::now();
        client.pace();
        assert!(start.elapsed() < Duration::from_millis(10));
    }
}
