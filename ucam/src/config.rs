//! Driver tuning

use std::time::Duration;

use ucam_core::{VerifyCodeLayout, constants::SYNC_ATTEMPTS};

use crate::retry::RetryPolicy;

/// What to do when a data packet's verify code does not match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    /// Do not compute verify codes
    Ignore,

    /// Log and count mismatches, keep the data
    #[default]
    Advisory,

    /// Abort the transfer on the first mismatch
    Strict,
}

/// Timing of the reset and SYNC handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// SYNC frames sent before giving up
    pub attempts: usize,

    /// Wait after the hard reset before the first SYNC
    pub power_up_delay: Duration,

    /// How long the reset line is held low
    pub reset_hold: Duration,

    /// Pause after the first unanswered SYNC
    pub backoff_start: Duration,

    /// Added to the pause after every further unanswered SYNC
    pub backoff_step: Duration,

    /// Wait after a successful handshake before the first command
    pub settle_delay: Duration,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            attempts: SYNC_ATTEMPTS,
            power_up_delay: Duration::from_secs(1),
            reset_hold: Duration::from_millis(10),
            backoff_start: Duration::from_millis(5),
            backoff_step: Duration::from_millis(1),
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl HandshakeConfig {
    /// Same attempt count with every wait set to zero, for simulated cameras
    pub fn without_delays() -> Self {
        Self {
            attempts: SYNC_ATTEMPTS,
            power_up_delay: Duration::ZERO,
            reset_hold: Duration::ZERO,
            backoff_start: Duration::ZERO,
            backoff_step: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, self.backoff_start).with_step(self.backoff_step)
    }
}

/// Everything about the driver that is not camera configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConfig {
    /// Budget of send-with-ack, send-without-ack and DATA polling
    pub command_retry: RetryPolicy,

    /// Stall budget of reads during an image transfer
    pub stream_retry: RetryPolicy,

    pub handshake: HandshakeConfig,
    pub checksum: ChecksumPolicy,
    pub verify_layout: VerifyCodeLayout,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command_retry: RetryPolicy::commands(),
            stream_retry: RetryPolicy::stream(),
            handshake: HandshakeConfig::default(),
            checksum: ChecksumPolicy::default(),
            verify_layout: VerifyCodeLayout::default(),
        }
    }
}

impl CameraConfig {
    /// Every retry immediate, every wait zero
    pub fn without_delays() -> Self {
        Self {
            command_retry: RetryPolicy::immediate(RetryPolicy::commands().max_attempts),
            stream_retry: RetryPolicy::immediate(RetryPolicy::stream().max_attempts),
            handshake: HandshakeConfig::without_delays(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = CameraConfig::default();
        assert_eq!(config.command_retry.max_attempts, 10);
        assert_eq!(config.command_retry.delay, Duration::from_millis(50));
        assert_eq!(config.stream_retry.delay, Duration::from_millis(100));
        assert_eq!(config.handshake.attempts, 60);
        assert_eq!(config.checksum, ChecksumPolicy::Advisory);
        assert_eq!(config.verify_layout, VerifyCodeLayout::LowByteFirst);
    }

    #[test]
    fn test_handshake_backoff_grows_linearly() {
        let policy = HandshakeConfig::default().retry_policy();
        assert_eq!(policy.max_attempts, 60);
        assert_eq!(policy.delay_for(0), Duration::from_millis(5));
        assert_eq!(policy.delay_for(1), Duration::from_millis(6));
        assert_eq!(policy.delay_for(59), Duration::from_millis(64));
    }

    #[test]
    fn test_without_delays_keeps_budgets() {
        let config = CameraConfig::without_delays();
        assert_eq!(config.command_retry.max_attempts, 10);
        assert_eq!(config.command_retry.delay, Duration::ZERO);
        assert_eq!(config.handshake.attempts, 60);
        assert_eq!(config.handshake.power_up_delay, Duration::ZERO);
    }
}
