//! Feed line parsing.
//!
//! Each line is seven whitespace-separated fields: `epoch orderId symbol
//! side category price quantity`. This lives outside `obs-core` because
//! the wire format of the feed is a CLI concern — the core crate only
//! knows about [`Order`] values, not how they were read off disk.

use obs_core::{Category, Order, Side};

#[derive(Debug)]
pub struct ParseError {
    pub reason: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for ParseError {}

fn err(reason: impl Into<String>) -> ParseError {
    ParseError {
        reason: reason.into(),
    }
}

/// Parses one feed line into an [`Order`]. Returns an error describing
/// what was wrong rather than panicking, since a single malformed line in
/// a multi-million-line file must not abort ingestion.
pub fn parse_line(line: &str) -> Result<Order, ParseError> {
    let mut fields = line.split_whitespace();
    let epoch_str = fields.next().ok_or_else(|| err("missing epoch field"))?;
    let order_id = fields.next().ok_or_else(|| err("missing orderId field"))?;
    let symbol = fields.next().ok_or_else(|| err("missing symbol field"))?;
    let side_str = fields.next().ok_or_else(|| err("missing side field"))?;
    let category_str = fields
        .next()
        .ok_or_else(|| err("missing category field"))?;
    let price_str = fields.next().ok_or_else(|| err("missing price field"))?;
    let quantity_str = fields
        .next()
        .ok_or_else(|| err("missing quantity field"))?;
    if fields.next().is_some() {
        return Err(err("too many fields"));
    }

    let epoch: i64 = epoch_str
        .parse()
        .map_err(|_| err(format!("invalid epoch: {epoch_str}")))?;
    let side = match side_str {
        "BUY" => Side::Buy,
        "SELL" => Side::Sell,
        other => return Err(err(format!("invalid side: {other}"))),
    };
    let category = match category_str {
        "NEW" => Category::New,
        "CANCEL" => Category::Cancel,
        "TRADE" => Category::Trade,
        other => return Err(err(format!("invalid category: {other}"))),
    };
    let price: f64 = price_str
        .parse()
        .map_err(|_| err(format!("invalid price: {price_str}")))?;
    let quantity: i32 = quantity_str
        .parse()
        .map_err(|_| err(format!("invalid quantity: {quantity_str}")))?;

    Ok(Order {
        epoch,
        order_id: order_id.to_string(),
        symbol: symbol.to_string(),
        side,
        category,
        price,
        quantity,
    })
}
