//! Endpoint wrappers
//!
//! Each method is a thin call into [`BittrexClient::request`] with a fixed
//! resource path. Public endpoints are unsigned; market and account endpoints
//! are signed. Results are returned untyped.

use serde_json::Value;

use super::client::BittrexClient;
use super::query::Params;
use super::transport::Transport;
use super::types::OrderBookType;
use crate::error::Result;

impl<T: Transport> BittrexClient<T> {
    fn public_get(&self, method: &str, params: Params) -> Result<Value> {
        self.request(method, params, None, false)
    }

    fn signed_get(&self, method: &str, params: Params) -> Result<Value> {
        self.request(method, params, None, true)
    }

    // ==================== PUBLIC ENDPOINTS ====================

    /// Open and available trading markets with their metadata
    pub fn markets(&self) -> Result<Value> {
        self.public_get("public/getmarkets", Params::new())
    }

    /// All supported currencies with their metadata
    pub fn currencies(&self) -> Result<Value> {
        self.public_get("public/getcurrencies", Params::new())
    }

    /// Current tick values for a market (e.g. "BTC-LTC")
    pub fn ticker(&self, market: &str) -> Result<Value> {
        self.public_get("public/getticker", Params::new().with("market", market))
    }

    /// Last 24 hour summary of all active markets
    pub fn market_summaries(&self) -> Result<Value> {
        self.public_get("public/getmarketsummaries", Params::new())
    }

    /// Last 24 hour summary of one market
    pub fn market_summary(&self, market: &str) -> Result<Value> {
        self.public_get(
            "public/getmarketsummary",
            Params::new().with("market", market),
        )
    }

    /// Latest trades for a market
    pub fn market_history(&self, market: &str) -> Result<Value> {
        self.public_get(
            "public/getmarkethistory",
            Params::new().with("market", market),
        )
    }

    pub fn order_book(&self, market: &str, book_type: OrderBookType) -> Result<Value> {
        self.public_get(
            "public/getorderbook",
            Params::new()
                .with("market", market)
                .with("type", book_type.as_str()),
        )
    }

    // ==================== MARKET ENDPOINTS ====================

    /// Place a limit buy; returns the order uuid
    pub fn buy_limit(&self, market: &str, quantity: f64, rate: f64) -> Result<Value> {
        self.signed_get(
            "market/buylimit",
            Params::new()
                .with("market", market)
                .with("quantity", quantity)
                .with("rate", rate),
        )
    }

    /// Place a limit sell; returns the order uuid
    pub fn sell_limit(&self, market: &str, quantity: f64, rate: f64) -> Result<Value> {
        self.signed_get(
            "market/selllimit",
            Params::new()
                .with("market", market)
                .with("quantity", quantity)
                .with("rate", rate),
        )
    }

    /// Cancel a buy or sell order
    pub fn cancel(&self, uuid: &str) -> Result<Value> {
        self.signed_get("market/cancel", Params::new().with("uuid", uuid))
    }

    /// Open orders, for one market or all of them
    pub fn open_orders(&self, market: Option<&str>) -> Result<Value> {
        self.signed_get(
            "market/getopenorders",
            Params::new().with_opt("market", market),
        )
    }

    // ==================== ACCOUNT ENDPOINTS ====================

    pub fn balances(&self) -> Result<Value> {
        self.signed_get("account/getbalances", Params::new())
    }

    pub fn balance(&self, currency: &str) -> Result<Value> {
        self.signed_get(
            "account/getbalance",
            Params::new().with("currency", currency),
        )
    }

    /// Existing deposit address for a currency, or a newly generated one
    pub fn deposit_address(&self, currency: &str) -> Result<Value> {
        self.signed_get(
            "account/getdepositaddress",
            Params::new().with("currency", currency),
        )
    }

    /// Withdraw funds; `payment_id` is the memo field some currencies need
    pub fn withdraw(
        &self,
        currency: &str,
        quantity: f64,
        address: &str,
        payment_id: Option<&str>,
    ) -> Result<Value> {
        self.signed_get(
            "account/withdraw",
            Params::new()
                .with("currency", currency)
                .with("quantity", quantity)
                .with("address", address)
                .with_opt("paymentid", payment_id),
        )
    }

    pub fn order(&self, uuid: &str) -> Result<Value> {
        self.signed_get("account/getorder", Params::new().with("uuid", uuid))
    }

    pub fn order_history(&self, market: Option<&str>) -> Result<Value> {
        self.signed_get(
            "account/getorderhistory",
            Params::new().with_opt("market", market),
        )
    }

    pub fn deposit_history(&self, currency: Option<&str>) -> Result<Value> {
        self.signed_get(
            "account/getdeposithistory",
            Params::new().with_opt("currency", currency),
        )
    }

    pub fn withdrawal_history(&self, currency: Option<&str>) -> Result<Value> {
        self.signed_get(
            "account/getwithdrawalhistory",
            Params::new().with_opt("currency", currency),
        )
    }
}
