//! The per-symbol order book state machine.
//!
//! Two independent indices are kept in sync by [`OrderBook::apply`]: a
//! resting-order table keyed by order id (needed because CANCEL/TRADE
//! reference an id) and an aggregated price ladder keyed by price (needed
//! because a snapshot only cares about the top few levels, not who
//! contributed to them). There are no pointers between the two; `apply` is
//! the only place that touches both.

use std::collections::{BTreeMap, HashMap};

use crate::model::{
    Category, Order, Price, RestingOrder, Side, SnapshotRecord, BOOK_DEPTH, SENTINEL_PRICE,
    SENTINEL_QUANTITY,
};

/// A single symbol's live book: two resting-order tables, two aggregated
/// ladders, and the last trade.
pub struct OrderBook {
    symbol: String,
    buy_orders: HashMap<String, RestingOrder>,
    sell_orders: HashMap<String, RestingOrder>,
    buy_levels: BTreeMap<Price, i64>,
    sell_levels: BTreeMap<Price, i64>,
    last_trade: Option<(f64, i32)>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            buy_orders: HashMap::new(),
            sell_orders: HashMap::new(),
            buy_levels: BTreeMap::new(),
            sell_levels: BTreeMap::new(),
            last_trade: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Applies one NEW/CANCEL/TRADE event. Never fails: unknown order ids
    /// on CANCEL/TRADE are silently ignored (feed anomaly, not a bug).
    pub fn apply(&mut self, order: &Order) {
        match order.category {
            Category::New => self.add_new(order),
            Category::Cancel => {
                self.remove(order.side, &order.order_id, order.quantity);
            }
            Category::Trade => {
                self.remove(order.side, &order.order_id, order.quantity);
                self.last_trade = Some((order.price, order.quantity));
            }
        }
    }

    fn add_new(&mut self, order: &Order) {
        let (table, levels) = self.side_mut(order.side);
        table.insert(
            order.order_id.clone(),
            RestingOrder {
                price: order.price,
                remaining: order.quantity,
            },
        );
        *levels.entry(Price(order.price)).or_insert(0) += i64::from(order.quantity);
    }

    /// Shared CANCEL/TRADE removal logic: decrements the resting order by
    /// `min(remaining, qty)`, adjusts the aggregate at the order's *stored*
    /// price (a TRADE/CANCEL event's price may be a fill price, not the
    /// resting price), and drops empty entries on both sides.
    fn remove(&mut self, side: Side, order_id: &str, qty: i32) {
        let (table, levels) = self.side_mut(side);
        let Some(existing) = table.get_mut(order_id) else {
            return;
        };
        let remove_qty = existing.remaining.min(qty);
        existing.remaining -= remove_qty;
        let stored_price = existing.price;
        let remaining = existing.remaining;

        if let Some(level_qty) = levels.get_mut(&Price(stored_price)) {
            *level_qty -= i64::from(remove_qty);
            if *level_qty <= 0 {
                levels.remove(&Price(stored_price));
            }
        }
        if remaining <= 0 {
            table.remove(order_id);
        }
    }

    fn side_mut(
        &mut self,
        side: Side,
    ) -> (&mut HashMap<String, RestingOrder>, &mut BTreeMap<Price, i64>) {
        match side {
            Side::Buy => (&mut self.buy_orders, &mut self.buy_levels),
            Side::Sell => (&mut self.sell_orders, &mut self.sell_levels),
        }
    }

    /// Materializes the current state as a fixed-depth snapshot timestamped
    /// at `epoch`. Bids are the top [`BOOK_DEPTH`] entries of the descending
    /// ladder, asks the top entries of the ascending ladder; unfilled slots
    /// carry the sentinel.
    pub fn snapshot(&self, epoch: i64) -> SnapshotRecord {
        let mut record = SnapshotRecord::empty(&self.symbol, epoch);

        for (i, (price, qty)) in self.buy_levels.iter().rev().take(BOOK_DEPTH).enumerate() {
            record.bid_prices[i] = price.0;
            record.bid_quantities[i] = *qty as i32;
        }
        for (i, (price, qty)) in self.sell_levels.iter().take(BOOK_DEPTH).enumerate() {
            record.ask_prices[i] = price.0;
            record.ask_quantities[i] = *qty as i32;
        }

        let (last_price, last_qty) = self.last_trade.unwrap_or((SENTINEL_PRICE, SENTINEL_QUANTITY as i32));
        record.last_trade_price = last_price;
        record.last_trade_quantity = last_qty;
        record
    }

    /// Total outstanding quantity resting at `price` on `side`, for tests
    /// and the aggregation-invariant property check.
    #[cfg(test)]
    pub fn level_quantity(&self, side: Side, price: f64) -> Option<i64> {
        match side {
            Side::Buy => self.buy_levels.get(&Price(price)).copied(),
            Side::Sell => self.sell_levels.get(&Price(price)).copied(),
        }
    }

    #[cfg(test)]
    pub fn resting_orders(&self, side: Side) -> &HashMap<String, RestingOrder> {
        match side {
            Side::Buy => &self.buy_orders,
            Side::Sell => &self.sell_orders,
        }
    }

    #[cfg(test)]
    pub fn levels(&self, side: Side) -> &BTreeMap<Price, i64> {
        match side {
            Side::Buy => &self.buy_levels,
            Side::Sell => &self.sell_levels,
        }
    }
}
