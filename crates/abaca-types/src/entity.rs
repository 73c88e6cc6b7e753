use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity lists served by the marketplace backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Seedling distributions from the MAO to farmers
    Seedlings,
    /// Recorded fiber harvests
    Harvests,
    /// Buyer/farmer fiber transactions
    Transactions,
    /// Farmer sales reports awaiting MAO review
    SalesReports,
    /// Fiber price listings posted by farmers
    Listings,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Seedlings,
        EntityKind::Harvests,
        EntityKind::Transactions,
        EntityKind::SalesReports,
        EntityKind::Listings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Seedlings => "seedlings",
            EntityKind::Harvests => "harvests",
            EntityKind::Transactions => "transactions",
            EntityKind::SalesReports => "sales_reports",
            EntityKind::Listings => "listings",
        }
    }

    /// REST path segment for the list endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            EntityKind::Seedlings => "seedlings",
            EntityKind::Harvests => "harvests",
            EntityKind::Transactions => "transactions",
            EntityKind::SalesReports => "sales-reports",
            EntityKind::Listings => "price-listings",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seedlings" => Ok(EntityKind::Seedlings),
            "harvests" => Ok(EntityKind::Harvests),
            "transactions" => Ok(EntityKind::Transactions),
            "sales_reports" | "sales-reports" | "reports" => Ok(EntityKind::SalesReports),
            "listings" | "price-listings" => Ok(EntityKind::Listings),
            _ => Err(format!("Unknown entity: {}", s)),
        }
    }
}
