//! Waiting for new mail.

use crate::{Client, EmailSummary, Result};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

/// Settings for [`Client::poll_for_emails`].
///
/// Defaults: 60 second timeout, 5 second interval, initial count of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Total time to keep checking.
    pub timeout: Duration,
    /// Delay between checks.
    pub interval: Duration,
    /// Mailbox total that counts as "nothing new yet".
    pub initial_count: u64,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(5),
            initial_count: 0,
        }
    }
}

impl PollOptions {
    /// Options with the default timeout, interval, and initial count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time to keep checking.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay between checks.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Only report mail once the mailbox total exceeds this count.
    pub fn initial_count(mut self, initial_count: u64) -> Self {
        self.initial_count = initial_count;
        self
    }
}

impl Client {
    /// Poll a mailbox until a new email arrives or the timeout elapses.
    ///
    /// Each check lists the newest email. The first check whose total exceeds
    /// `initial_count` and returns an email ends the poll with that email.
    /// Sleeps are cut short at the deadline, so the call returns shortly after
    /// `timeout` even when `interval` is longer.
    ///
    /// Errors from a check end the poll immediately; they are not retried.
    ///
    /// # Returns
    /// The newest email, or `None` on timeout
    ///
    /// # Examples
    /// ```no_run
    /// # use vanish_client::{Client, PollOptions};
    /// # use std::time::Duration;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), vanish_client::Error> {
    /// let client = Client::new("https://api.vanish.host")?;
    /// let options = PollOptions::new()
    ///     .timeout(Duration::from_secs(30))
    ///     .interval(Duration::from_secs(2));
    /// match client.poll_for_emails("box@vanish.host", &options).await? {
    ///     Some(email) => println!("{}", email.subject),
    ///     None => println!("nothing yet"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn poll_for_emails(
        &self,
        address: &str,
        options: &PollOptions,
    ) -> Result<Option<EmailSummary>> {
        let start = Instant::now();

        while start.elapsed() < options.timeout {
            let page = self.list_emails(address, 1, None).await?;
            trace!(address, total = page.total, "poll check");

            if page.total > options.initial_count {
                if let Some(email) = page.data.into_iter().next() {
                    debug!(address, id = %email.id, "new email arrived");
                    return Ok(Some(email));
                }
            }

            let remaining = options.timeout.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                break;
            }
            sleep(options.interval.min(remaining)).await;
        }

        debug!(address, timeout = ?options.timeout, "poll timed out");
        Ok(None)
    }

    /// Wait for the first email in a fresh mailbox using [`PollOptions::default`].
    pub async fn wait_for_email(&self, address: &str) -> Result<Option<EmailSummary>> {
        self.poll_for_emails(address, &PollOptions::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = PollOptions::new();
        assert_eq!(options.timeout, Duration::from_secs(60));
        assert_eq!(options.interval, Duration::from_secs(5));
        assert_eq!(options.initial_count, 0);
    }

    #[test]
    fn setters_chain() {
        let options = PollOptions::new()
            .timeout(Duration::from_secs(10))
            .interval(Duration::from_millis(250))
            .initial_count(3);
        assert_eq!(
            options,
            PollOptions {
                timeout: Duration::from_secs(10),
                interval: Duration::from_millis(250),
                initial_count: 3,
            }
        );
    }
}
