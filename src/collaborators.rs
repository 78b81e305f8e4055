//! # External Collaborators
//!
//! The chatbot never owns farm data — user profiles, crop photos,
//! orders, treatments, posts, consultations and weather alerts live in
//! the host application's document store. [`FarmData`] is the read-only
//! facade over those per-feature queries; the enricher and personalizer
//! consume it without knowing what backs it.
//!
//! Every method is fallible and I/O-shaped. Callers wrap each call in
//! [`COLLABORATOR_TIMEOUT`](crate::config::COLLABORATOR_TIMEOUT) and
//! recover locally — a failing collaborator is never fatal to a
//! conversation turn.
//!
//! [`InMemoryFarmData`] backs the standalone binary and the test suite.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::CollaboratorError;
use crate::model::{
    CommunityPost, Consultation, CropPhoto, DiseaseCount, ProductOrder, SolutionApplication,
    UserProfile, WeatherAlert,
};

type Result<T> = std::result::Result<T, CollaboratorError>;

/// Read-only queries against the host application's document store.
/// All history queries return newest-first, capped at `limit`.
#[async_trait]
pub trait FarmData: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<UserProfile>;

    async fn crop_photos(&self, user_id: &str, limit: usize) -> Result<Vec<CropPhoto>>;

    async fn orders(&self, user_id: &str, limit: usize) -> Result<Vec<ProductOrder>>;

    async fn treatment_applications(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<SolutionApplication>>;

    async fn community_posts(&self, user_id: &str, limit: usize) -> Result<Vec<CommunityPost>>;

    async fn consultations(&self, user_id: &str, limit: usize) -> Result<Vec<Consultation>>;

    /// Active alerts for a location, longest remaining validity first
    /// (open-ended alerts last).
    async fn weather_alerts(&self, location: &str, limit: usize) -> Result<Vec<WeatherAlert>>;

    /// Disease labels grouped and counted across all analyzed photos,
    /// descending by count.
    async fn trending_diseases(&self, limit: usize) -> Result<Vec<DiseaseCount>>;

    /// Community posts created since `since`, for the 24 h volume line.
    async fn post_count_since(&self, since: DateTime<Utc>) -> Result<u64>;

    /// Most-liked posts across the whole community.
    async fn top_posts(&self, limit: usize) -> Result<Vec<CommunityPost>>;
}

/// In-process [`FarmData`] backed by plain vectors. Used by the
/// standalone binary (empty) and seeded directly in tests.
#[derive(Default)]
pub struct InMemoryFarmData {
    pub users: RwLock<HashMap<String, UserProfile>>,
    pub photos: RwLock<Vec<CropPhoto>>,
    pub orders: RwLock<Vec<ProductOrder>>,
    pub applications: RwLock<Vec<SolutionApplication>>,
    pub posts: RwLock<Vec<CommunityPost>>,
    pub sessions: RwLock<Vec<Consultation>>,
    pub alerts: RwLock<Vec<WeatherAlert>>,
}

impl InMemoryFarmData {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F>(items: &[T], keep: F, limit: usize) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut matched: Vec<(DateTime<Utc>, T)> = items
        .iter()
        .filter_map(|item| keep(item).map(|ts| (ts, item.clone())))
        .collect();
    matched.sort_by(|a, b| b.0.cmp(&a.0));
    matched.into_iter().take(limit).map(|(_, item)| item).collect()
}

#[async_trait]
impl FarmData for InMemoryFarmData {
    async fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        self.users
            .read()
            .get(user_id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("user {user_id}")))
    }

    async fn crop_photos(&self, user_id: &str, limit: usize) -> Result<Vec<CropPhoto>> {
        Ok(newest_first(
            &self.photos.read(),
            |p| (p.user_id == user_id).then_some(p.uploaded_at),
            limit,
        ))
    }

    async fn orders(&self, user_id: &str, limit: usize) -> Result<Vec<ProductOrder>> {
        Ok(newest_first(
            &self.orders.read(),
            |o| (o.user_id == user_id).then_some(o.created_at),
            limit,
        ))
    }

    async fn treatment_applications(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<SolutionApplication>> {
        Ok(newest_first(
            &self.applications.read(),
            |a| (a.user_id == user_id).then_some(a.applied_at),
            limit,
        ))
    }

    async fn community_posts(&self, user_id: &str, limit: usize) -> Result<Vec<CommunityPost>> {
        Ok(newest_first(
            &self.posts.read(),
            |p| (p.author_id == user_id).then_some(p.created_at),
            limit,
        ))
    }

    async fn consultations(&self, user_id: &str, limit: usize) -> Result<Vec<Consultation>> {
        let sessions = self.sessions.read();
        let mut matched: Vec<Consultation> = sessions
            .iter()
            .filter(|c| c.farmer_id == user_id)
            .cloned()
            .collect();
        // Unscheduled sessions sort last
        matched.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn weather_alerts(&self, location: &str, limit: usize) -> Result<Vec<WeatherAlert>> {
        let now = Utc::now();
        let alerts = self.alerts.read();
        let mut matched: Vec<WeatherAlert> = alerts
            .iter()
            .filter(|a| {
                a.location.eq_ignore_ascii_case(location)
                    && a.valid_until.map(|v| v > now).unwrap_or(true)
            })
            .cloned()
            .collect();
        // Longest-remaining alerts first; open-ended ones sort last
        matched.sort_by(|a, b| b.valid_until.cmp(&a.valid_until));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn trending_diseases(&self, limit: usize) -> Result<Vec<DiseaseCount>> {
        let photos = self.photos.read();
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for photo in photos.iter() {
            if let Some(disease) = &photo.disease {
                *counts.entry(disease.as_str()).or_insert(0) += 1;
            }
        }
        let mut rows: Vec<DiseaseCount> = counts
            .into_iter()
            .map(|(disease, count)| DiseaseCount {
                disease: disease.to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.disease.cmp(&b.disease)));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn post_count_since(&self, since: DateTime<Utc>) -> Result<u64> {
        Ok(self.posts.read().iter().filter(|p| p.created_at >= since).count() as u64)
    }

    async fn top_posts(&self, limit: usize) -> Result<Vec<CommunityPost>> {
        let posts = self.posts.read();
        let mut all: Vec<CommunityPost> = posts.iter().cloned().collect();
        all.sort_by(|a, b| b.likes.cmp(&a.likes));
        all.truncate(limit);
        Ok(all)
    }
}

/// Test doubles shared by the enricher and orchestrator tests.
#[cfg(test)]
pub mod testing {
    use super::*;

    /// A collaborator where every query fails — exercises the
    /// recover-locally paths.
    pub struct FailingFarmData;

    /// A collaborator where every query hangs far past the per-call
    /// timeout. Pair with `#[tokio::test(start_paused = true)]` so the
    /// timeout fires without real waiting.
    pub struct SlowFarmData;

    fn down<T>() -> Result<T> {
        Err(CollaboratorError::Query("document store unavailable".to_string()))
    }

    async fn stall<T>() -> Result<T> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        down()
    }

    #[async_trait]
    impl FarmData for FailingFarmData {
        async fn get_user(&self, _user_id: &str) -> Result<UserProfile> {
            down()
        }

        async fn crop_photos(&self, _user_id: &str, _limit: usize) -> Result<Vec<CropPhoto>> {
            down()
        }

        async fn orders(&self, _user_id: &str, _limit: usize) -> Result<Vec<ProductOrder>> {
            down()
        }

        async fn treatment_applications(
            &self,
            _user_id: &str,
            _limit: usize,
        ) -> Result<Vec<SolutionApplication>> {
            down()
        }

        async fn community_posts(
            &self,
            _user_id: &str,
            _limit: usize,
        ) -> Result<Vec<CommunityPost>> {
            down()
        }

        async fn consultations(&self, _user_id: &str, _limit: usize) -> Result<Vec<Consultation>> {
            down()
        }

        async fn weather_alerts(&self, _location: &str, _limit: usize) -> Result<Vec<WeatherAlert>> {
            down()
        }

        async fn trending_diseases(&self, _limit: usize) -> Result<Vec<DiseaseCount>> {
            down()
        }

        async fn post_count_since(&self, _since: DateTime<Utc>) -> Result<u64> {
            down()
        }

        async fn top_posts(&self, _limit: usize) -> Result<Vec<CommunityPost>> {
            down()
        }
    }

    #[async_trait]
    impl FarmData for SlowFarmData {
        async fn get_user(&self, _user_id: &str) -> Result<UserProfile> {
            stall().await
        }

        async fn crop_photos(&self, _user_id: &str, _limit: usize) -> Result<Vec<CropPhoto>> {
            stall().await
        }

        async fn orders(&self, _user_id: &str, _limit: usize) -> Result<Vec<ProductOrder>> {
            stall().await
        }

        async fn treatment_applications(
            &self,
            _user_id: &str,
            _limit: usize,
        ) -> Result<Vec<SolutionApplication>> {
            stall().await
        }

        async fn community_posts(
            &self,
            _user_id: &str,
            _limit: usize,
        ) -> Result<Vec<CommunityPost>> {
            stall().await
        }

        async fn consultations(&self, _user_id: &str, _limit: usize) -> Result<Vec<Consultation>> {
            stall().await
        }

        async fn weather_alerts(&self, _location: &str, _limit: usize) -> Result<Vec<WeatherAlert>> {
            stall().await
        }

        async fn trending_diseases(&self, _limit: usize) -> Result<Vec<DiseaseCount>> {
            stall().await
        }

        async fn post_count_since(&self, _since: DateTime<Utc>) -> Result<u64> {
            stall().await
        }

        async fn top_posts(&self, _limit: usize) -> Result<Vec<CommunityPost>> {
            stall().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CropStatus;
    use chrono::Duration;

    fn photo(user: &str, disease: &str, age_mins: i64) -> CropPhoto {
        CropPhoto {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.to_string(),
            disease: Some(disease.to_string()),
            confidence_score: Some(0.9),
            status: CropStatus::Active,
            suggested_treatment: None,
            uploaded_at: Utc::now() - Duration::minutes(age_mins),
        }
    }

    #[tokio::test]
    async fn crop_photos_newest_first_and_capped() {
        let data = InMemoryFarmData::new();
        for age in [30, 10, 20] {
            data.photos.write().push(photo("u1", "Leaf Blight", age));
        }
        data.photos.write().push(photo("someone_else", "Rust", 5));

        let photos = data.crop_photos("u1", 2).await.unwrap();
        assert_eq!(photos.len(), 2);
        assert!(photos[0].uploaded_at > photos[1].uploaded_at);
    }

    #[tokio::test]
    async fn trending_diseases_groups_and_sorts() {
        let data = InMemoryFarmData::new();
        data.photos.write().push(photo("a", "Leaf Blight", 1));
        data.photos.write().push(photo("b", "Leaf Blight", 2));
        data.photos.write().push(photo("c", "Powdery Mildew", 3));

        let rows = data.trending_diseases(5).await.unwrap();
        assert_eq!(rows[0].disease, "Leaf Blight");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].count, 1);
    }

    fn alert(id: &str, location: &str, valid_mins: Option<i64>) -> WeatherAlert {
        WeatherAlert {
            id: id.to_string(),
            location: location.to_string(),
            alert_type: "Heavy Rain".to_string(),
            severity: crate::model::Severity::High,
            message: "Rain expected".to_string(),
            recommended_action: "Delay spraying".to_string(),
            valid_until: valid_mins.map(|m| Utc::now() + Duration::minutes(m)),
        }
    }

    #[tokio::test]
    async fn weather_alerts_sorted_by_remaining_validity() {
        let data = InMemoryFarmData::new();
        data.alerts.write().push(alert("short", "Guntur", Some(60)));
        data.alerts.write().push(alert("open", "Guntur", None));
        data.alerts.write().push(alert("long", "Guntur", Some(300)));
        data.alerts.write().push(alert("expired", "Guntur", Some(-5)));
        data.alerts.write().push(alert("elsewhere", "Krishna", Some(120)));

        let alerts = data.weather_alerts("guntur", 10).await.unwrap();
        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["long", "short", "open"]);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let data = InMemoryFarmData::new();
        assert!(matches!(
            data.get_user("ghost").await,
            Err(CollaboratorError::NotFound(_))
        ));
    }
}
