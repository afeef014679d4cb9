//! Rating Models

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A single user's rating of a product.
#[derive(Debug, Clone, Deserialize)]
pub struct Rating {
    pub id: u64,

    #[serde(default)]
    pub product_id: Option<u64>,

    #[serde(default)]
    pub user_id: Option<u64>,

    /// Stars, 1 through 5.
    pub rating: u32,

    #[serde(default)]
    pub review: Option<String>,

    #[serde(default)]
    pub user_name: Option<String>,

    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Server-computed aggregate shown on the product page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_ratings: u32,

    /// Count of ratings per star value.
    #[serde(default)]
    pub rating_breakdown: BTreeMap<u8, u32>,
}

/// Payload for `POST /rating`. Submitting again for the same product
/// replaces the previous rating server-side.
#[derive(Debug, Clone, Serialize)]
pub struct NewRating {
    pub product_id: u64,
    pub rating: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn stats_deserialize_with_string_breakdown_keys() -> TestResult {
        let stats: RatingStats = serde_json::from_str(
            r#"{
                "average_rating": 4.2,
                "total_ratings": 5,
                "rating_breakdown": {"5": 3, "4": 1, "2": 1}
            }"#,
        )?;

        assert_eq!(stats.total_ratings, 5);
        assert_eq!(stats.rating_breakdown.get(&5), Some(&3));
        assert_eq!(stats.rating_breakdown.get(&3), None);

        Ok(())
    }
}
