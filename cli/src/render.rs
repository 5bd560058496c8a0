//! Query output rendering: the default grouped ladder view and the
//! selective field-projection view, grounded in the original
//! `QueryEngine::printSnapshots`.

use obs_core::SnapshotRecord;

/// The 24 field names accepted after `<fields>` on the query CLI, in the
/// canonical order selective output is printed in regardless of the order
/// the caller listed them.
pub const ALLOWED_FIELDS: &[&str] = &[
    "symbol",
    "epoch",
    "bid1p", "bid1q", "bid2p", "bid2q", "bid3p", "bid3q", "bid4p", "bid4q", "bid5p", "bid5q",
    "ask1p", "ask1q", "ask2p", "ask2q", "ask3p", "ask3q", "ask4p", "ask4q", "ask5p", "ask5q",
    "lastTradePrice", "lastTradeQuantity",
];

#[derive(Debug)]
pub struct UnknownFieldError {
    pub field: String,
}

impl std::fmt::Display for UnknownFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown field \"{}\" in query criteria; allowed fields -> {}",
            self.field,
            ALLOWED_FIELDS.join(", ")
        )
    }
}

impl std::error::Error for UnknownFieldError {}

fn format_price(price: f64) -> String {
    if price < 0.0 {
        "N.A".to_string()
    } else {
        format!("{price:.2}")
    }
}

fn format_quantity(qty: i32) -> String {
    if qty == 0 {
        "N.A".to_string()
    } else {
        qty.to_string()
    }
}

fn format_price_level(qty: i32, price: f64) -> String {
    if price < 0.0 {
        "N.A".to_string()
    } else {
        format!("{qty}@{price:.2}")
    }
}

/// Prints the default grouped view: one line of headers, then one
/// CSV-ish line per snapshot with bids in descending (bid5..bid1) order,
/// an `X` spacer column, then asks ascending.
pub fn render_default(snapshots: &[SnapshotRecord]) {
    println!(
        "symbol, epoch, bid5q@bid5p, bid4q@bid4p, bid3q@bid3p, bid2q@bid2p, bid1q@bid1p, \
         X, ask1q@ask1p, ask2q@ask2p, ask3q@ask3p, ask4q@ask4p, ask5q@ask5p, \
         lastTradePrice, lastTradeQuantity"
    );

    for snap in snapshots {
        let mut cols = Vec::with_capacity(15);
        cols.push(snap.symbol_str().to_string());
        cols.push(snap.epoch.to_string());
        for i in (0..5).rev() {
            cols.push(format_price_level(snap.bid_quantities[i], snap.bid_prices[i]));
        }
        cols.push("X".to_string());
        for i in 0..5 {
            cols.push(format_price_level(snap.ask_quantities[i], snap.ask_prices[i]));
        }
        cols.push(if snap.last_trade_price < 0.0 {
            "N.A".to_string()
        } else {
            format_price(snap.last_trade_price)
        });
        cols.push(format_quantity(snap.last_trade_quantity));
        println!("{}", cols.join(", "));
    }
}

/// Prints only the requested columns, in [`ALLOWED_FIELDS`] order (not the
/// order the caller supplied them in). Returns an error naming the first
/// unrecognized field instead of printing anything.
pub fn render_selected(
    snapshots: &[SnapshotRecord],
    requested: &[String],
) -> Result<(), UnknownFieldError> {
    for field in requested {
        if !ALLOWED_FIELDS.contains(&field.as_str()) {
            return Err(UnknownFieldError {
                field: field.clone(),
            });
        }
    }

    let header: Vec<&str> = ALLOWED_FIELDS
        .iter()
        .copied()
        .filter(|&f| requested.iter().any(|r| r == f))
        .collect();
    if header.is_empty() {
        return Err(UnknownFieldError {
            field: String::new(),
        });
    }
    println!("{}", header.join(", "));

    for snap in snapshots {
        let cols: Vec<String> = header.iter().map(|field| field_value(snap, field)).collect();
        println!("{}", cols.join(", "));
    }
    Ok(())
}

fn field_value(snap: &SnapshotRecord, field: &str) -> String {
    match field {
        "symbol" => snap.symbol_str().to_string(),
        "epoch" => snap.epoch.to_string(),
        "lastTradePrice" => format_price(snap.last_trade_price),
        "lastTradeQuantity" => format_quantity(snap.last_trade_quantity),
        other => {
            let side = &other[0..3];
            let level: usize = other[3..4].parse().unwrap_or(1);
            let kind = &other[4..];
            let idx = level.saturating_sub(1).min(4);
            match (side, kind) {
                ("bid", "p") => format_price(snap.bid_prices[idx]),
                ("bid", "q") => format_quantity(snap.bid_quantities[idx]),
                ("ask", "p") => format_price(snap.ask_prices[idx]),
                ("ask", "q") => format_quantity(snap.ask_quantities[idx]),
                _ => "N.A".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SnapshotRecord {
        let mut rec = SnapshotRecord::empty("AAPL", 100);
        rec.bid_prices[0] = 10.5;
        rec.bid_quantities[0] = 20;
        rec.ask_prices[0] = 11.0;
        rec.ask_quantities[0] = 30;
        rec.last_trade_price = 10.75;
        rec.last_trade_quantity = 5;
        rec
    }

    #[test]
    fn format_price_level_renders_n_a_for_sentinel() {
        assert_eq!(format_price_level(0, -1.0), "N.A");
        assert_eq!(format_price_level(20, 10.5), "20@10.50");
    }

    #[test]
    fn rejects_unknown_field() {
        let err = render_selected(&[sample()], &["nope".to_string()]).unwrap_err();
        assert_eq!(err.field, "nope");
    }

    #[test]
    fn field_value_reads_requested_levels() {
        let snap = sample();
        assert_eq!(field_value(&snap, "bid1p"), "10.50");
        assert_eq!(field_value(&snap, "bid1q"), "20");
        assert_eq!(field_value(&snap, "ask1p"), "11.00");
        assert_eq!(field_value(&snap, "bid2p"), "N.A");
        assert_eq!(field_value(&snap, "lastTradePrice"), "10.75");
        assert_eq!(field_value(&snap, "lastTradeQuantity"), "5");
    }
}
