//! Sponsor record with engagement metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, SponsorId};

/// A sponsor attached to a single event.
///
/// Metrics are reported figures, not derived values; the analytics
/// endpoint returns them verbatim after the sponsor password check.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Sponsor {
    /// Unique sponsor identifier (immutable after creation).
    pub id: SponsorId,

    /// Sponsor display name.
    pub name: String,

    /// The event this sponsor is attached to.
    pub event_id: EventId,

    /// Ad impressions attributed to this sponsor.
    pub impressions: u64,

    /// Booth visit count.
    pub booth_visits: u64,

    /// Engagement rate in percent.
    pub engagement_rate: f64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Sponsor {
    /// Creates a new sponsor with the given reported metrics.
    #[must_use]
    pub fn new(
        name: String,
        event_id: EventId,
        impressions: u64,
        booth_visits: u64,
        engagement_rate: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SponsorId::new(),
            name,
            event_id,
            impressions,
            booth_visits,
            engagement_rate,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update to a [`Sponsor`].
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct SponsorPatch {
    /// New display name.
    pub name: Option<String>,
    /// New impression count.
    pub impressions: Option<u64>,
    /// New booth visit count.
    pub booth_visits: Option<u64>,
    /// New engagement rate in percent.
    pub engagement_rate: Option<f64>,
}

impl SponsorPatch {
    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, sponsor: &mut Sponsor) {
        if let Some(name) = &self.name {
            sponsor.name.clone_from(name);
        }
        if let Some(impressions) = self.impressions {
            sponsor.impressions = impressions;
        }
        if let Some(booth_visits) = self.booth_visits {
            sponsor.booth_visits = booth_visits;
        }
        if let Some(rate) = self.engagement_rate {
            sponsor.engagement_rate = rate;
        }
        sponsor.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_metrics() {
        let sponsor = Sponsor::new("TechCorp".to_string(), EventId::new(), 1250, 180, 14.4);
        assert_eq!(sponsor.impressions, 1250);
        assert_eq!(sponsor.booth_visits, 180);
        assert!((sponsor.engagement_rate - 14.4).abs() < f64::EPSILON);
    }

    #[test]
    fn serde_round_trip() {
        let sponsor = Sponsor::new("TechCorp".to_string(), EventId::new(), 10, 2, 0.5);
        let Ok(json) = serde_json::to_string(&sponsor) else {
            panic!("serialization failed");
        };
        let Ok(parsed) = serde_json::from_str::<Sponsor>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(parsed.id, sponsor.id);
        assert_eq!(parsed.booth_visits, 2);
    }
}
