//! Station payload and market price tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Station role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    /// General market
    Trading,
    /// Buys raw materials
    Mining,
    /// Sells high-tech goods
    Research,
    /// Fuel and supplies only
    Military,
}

impl StationType {
    /// Every station type.
    pub const ALL: [Self; 4] = [Self::Trading, Self::Mining, Self::Research, Self::Military];

    /// Commodities this station type trades.
    #[must_use]
    pub const fn stocked(self) -> &'static [Commodity] {
        match self {
            Self::Trading => &Commodity::ALL,
            Self::Mining => &[Commodity::Ore, Commodity::Ice, Commodity::Fuel, Commodity::Food],
            Self::Research => &[Commodity::Electronics, Commodity::Alloys, Commodity::Fuel],
            Self::Military => &[Commodity::Fuel, Commodity::Alloys, Commodity::Food],
        }
    }
}

/// Tradable commodity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Commodity {
    /// Raw ore
    Ore,
    /// Water ice
    Ice,
    /// Ship fuel
    Fuel,
    /// Refined alloys
    Alloys,
    /// Food rations
    Food,
    /// Electronics
    Electronics,
}

impl Commodity {
    /// Every commodity, in table order.
    pub const ALL: [Self; 6] = [
        Self::Ore,
        Self::Ice,
        Self::Fuel,
        Self::Alloys,
        Self::Food,
        Self::Electronics,
    ];

    /// Reference price before station markup.
    #[must_use]
    pub const fn base_price(self) -> f64 {
        match self {
            Self::Ore => 12.0,
            Self::Ice => 8.0,
            Self::Fuel => 20.0,
            Self::Alloys => 45.0,
            Self::Food => 15.0,
            Self::Electronics => 90.0,
        }
    }
}

/// Buy and sell price of one commodity at one station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Price the station charges.
    pub buy: f64,
    /// Price the station pays.
    pub sell: f64,
}

/// Station payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationData {
    /// Station role.
    pub station_type: StationType,
    /// Docking radius in world units.
    pub docking_radius: f64,
    /// Price table, keyed by commodity.
    pub prices: BTreeMap<Commodity, PriceQuote>,
}
