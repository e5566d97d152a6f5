//! Notification delivery seam and triggered-alert message formatting.

use async_trait::async_trait;
use pricewatch_core::Alert;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid notification target: {0}")]
    InvalidTarget(String),
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Delivers a message to a chat. Best-effort: failures are reported to the
/// caller but are never fatal to the core.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError>;
}

/// Format a price with precision matched to its magnitude, so sub-cent
/// coins don't render as `$0.00`.
pub fn format_price(price: f64) -> String {
    let abs = price.abs();
    if abs >= 1000.0 {
        format!("${:.2}", price)
    } else if abs >= 1.0 {
        format!("${:.4}", price)
    } else if abs >= 0.01 {
        format!("${:.6}", price)
    } else {
        format!("${:.8}", price)
    }
}

/// Message sent when an alert's threshold is crossed (HTML parse mode).
pub fn format_triggered_message(alert: &Alert, price: f64) -> String {
    format!(
        "🔔 <b>{}</b> hit your target!\n\
         • Price: <b>{}</b>\n\
         • Target: {} {}\n\
         Alert #{} is now removed.",
        alert.symbol,
        format_price(price),
        alert.direction,
        format_price(alert.target),
        alert.id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pricewatch_core::Direction;

    #[test]
    fn test_format_price_precision_tiers() {
        assert_eq!(format_price(50123.456), "$50123.46");
        assert_eq!(format_price(2.5), "$2.5000");
        assert_eq!(format_price(0.042), "$0.042000");
        assert_eq!(format_price(0.00001234), "$0.00001234");
    }

    #[test]
    fn test_triggered_message_contents() {
        let alert = Alert {
            id: 12,
            owner_id: "7".to_string(),
            chat_id: "7".to_string(),
            symbol: "BTC".to_string(),
            target: 50000.0,
            direction: Direction::Above,
            created_at: Utc::now(),
        };

        let text = format_triggered_message(&alert, 50120.5);
        assert!(text.contains("<b>BTC</b>"));
        assert!(text.contains("$50120.50"));
        assert!(text.contains("above $50000.00"));
        assert!(text.contains("#12"));
    }
}
