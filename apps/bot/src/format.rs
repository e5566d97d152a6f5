//! Human-readable market-data formatting (HTML parse mode).

use pricewatch_alerts::format_price;
use pricewatch_core::{CoinListing, Quote, Sentiment};

const UNITS: [&str; 6] = ["", "K", "M", "B", "T", "Q"];

/// Abbreviate large numbers: 1,234,567 -> 1.23M.
pub fn abbr(n: f64) -> String {
    if !n.is_finite() {
        return "-".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let tier = (n.abs().log(1000.0).floor() as i32).clamp(0, UNITS.len() as i32 - 1);
    let scaled = n / 1000f64.powi(tier);
    format!("{:.2}{}", scaled, UNITS[tier as usize])
}

/// Green for gains, red for losses.
pub fn delta_marker(pct: f64) -> &'static str {
    if pct >= 0.0 {
        "🟢"
    } else {
        "🔴"
    }
}

/// Reply body for `/price`.
pub fn price_message(symbol: &str, quote: &Quote) -> String {
    let delta = match quote.change_24h_pct {
        Some(pct) => format!("{} ({:+.2}% 24h)", delta_marker(pct), pct),
        None => "(N/A 24h)".to_string(),
    };

    format!(
        "💰 <b>{}</b>\n\
         • Price: <b>{}</b> {}\n\
         • Market Cap: ${}\n\
         • 24h Volume: ${}",
        symbol,
        format_price(quote.price),
        delta,
        quote.market_cap.map(abbr).unwrap_or_else(|| "-".to_string()),
        quote.volume_24h.map(abbr).unwrap_or_else(|| "-".to_string()),
    )
}

/// Reply body for `/top`.
pub fn top_message(listings: &[CoinListing]) -> String {
    let mut msg = String::from("📊 <b>Top movers (24h)</b>");
    for (rank, coin) in listings.iter().enumerate() {
        let change = match coin.change_24h_pct {
            Some(pct) => format!("{:+.2}%", pct),
            None => "N/A".to_string(),
        };
        msg.push_str(&format!(
            "\n{}. <b>{}</b> {} @ {}",
            rank + 1,
            coin.code,
            change,
            format_price(coin.price),
        ));
    }
    msg
}

/// Reply body for `/sentiment`.
pub fn sentiment_message(sentiment: &Sentiment) -> String {
    format!(
        "🧭 Fear &amp; Greed Index: <b>{}</b> ({})",
        sentiment.value, sentiment.classification
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbr() {
        assert_eq!(abbr(0.0), "0");
        assert_eq!(abbr(999.0), "999.00");
        assert_eq!(abbr(1_234_567.0), "1.23M");
        assert_eq!(abbr(45_600.0), "45.60K");
        assert_eq!(abbr(1.2e12), "1.20T");
        assert_eq!(abbr(-2_500_000.0), "-2.50M");
        assert_eq!(abbr(f64::NAN), "-");
    }

    #[test]
    fn test_delta_marker() {
        assert_eq!(delta_marker(2.5), "🟢");
        assert_eq!(delta_marker(0.0), "🟢");
        assert_eq!(delta_marker(-0.1), "🔴");
    }

    #[test]
    fn test_price_message_full_quote() {
        let quote = Quote {
            price: 49000.25,
            market_cap: Some(960_000_000_000.0),
            volume_24h: Some(32_000_000_000.0),
            change_24h_pct: Some(-1.84),
        };

        let msg = price_message("BTC", &quote);
        assert!(msg.contains("<b>BTC</b>"));
        assert!(msg.contains("$49000.25"));
        assert!(msg.contains("🔴 (-1.84% 24h)"));
        assert!(msg.contains("Market Cap: $960.00B"));
        assert!(msg.contains("24h Volume: $32.00B"));
    }

    #[test]
    fn test_price_message_missing_meta() {
        let quote = Quote::from_price(0.042);
        let msg = price_message("XYZ", &quote);
        assert!(msg.contains("(N/A 24h)"));
        assert!(msg.contains("Market Cap: $-"));
    }

    #[test]
    fn test_top_message_ranks_entries() {
        let listings = vec![
            CoinListing {
                code: "SOL".to_string(),
                price: 120.0,
                change_24h_pct: Some(8.2),
            },
            CoinListing {
                code: "BTC".to_string(),
                price: 49000.0,
                change_24h_pct: None,
            },
        ];

        let msg = top_message(&listings);
        assert!(msg.contains("1. <b>SOL</b> +8.20%"));
        assert!(msg.contains("2. <b>BTC</b> N/A"));
    }
}
