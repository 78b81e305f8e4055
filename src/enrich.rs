//! # Dynamic Data Enricher
//!
//! Appends live, user-specific data to the canned response of intents
//! that warrant it ("my crops", "my orders", trending diseases, ...).
//!
//! ## Dispatch
//!
//! Enrichment is a registered-handler map — intent name → async
//! handler — so a new intent gains enrichment by adding one entry to
//! [`Enricher::new`], without touching existing handlers.
//!
//! ## Contract
//!
//! - Summaries are bounded: at most [`ITEM_CAP`] numbered items.
//! - A user with zero matching records gets an explicit "nothing yet,
//!   here's how to start" message, never an empty block.
//! - Any downstream failure (or timeout) is caught here, logged, and
//!   the turn proceeds without the block. Enrichment is never fatal.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use futures_util::future::BoxFuture;

use crate::collaborators::FarmData;
use crate::config::COLLABORATOR_TIMEOUT;
use crate::error::CollaboratorError;

/// Maximum numbered items in any enrichment block.
pub const ITEM_CAP: usize = 10;

/// Trending summaries show fewer rows than personal histories.
const TRENDING_CAP: usize = 5;

type EnrichResult = Result<String, CollaboratorError>;
type Handler = for<'a> fn(&'a dyn FarmData, &'a str) -> BoxFuture<'a, EnrichResult>;

/// Intent-keyed enrichment dispatcher.
pub struct Enricher {
    handlers: HashMap<&'static str, Handler>,
    data: Arc<dyn FarmData>,
}

impl Enricher {
    /// Registers the handler per enrichable intent. Intents absent from
    /// this table simply get no enrichment block.
    pub fn new(data: Arc<dyn FarmData>) -> Self {
        let mut handlers: HashMap<&'static str, Handler> = HashMap::new();
        handlers.insert("my_crops", my_crops);
        handlers.insert("my_purchases", my_purchases);
        handlers.insert("my_treatments", my_treatments);
        handlers.insert("my_community", my_community);
        handlers.insert("my_consultations", my_consultations);
        handlers.insert("weather_alerts", weather_alerts);
        handlers.insert("trending_diseases", trending_diseases);
        handlers.insert("community_trending", community_trending);
        handlers.insert("my_badges", my_badges);
        handlers.insert("my_progress", my_progress);
        Self { handlers, data }
    }

    /// Runs the handler registered for `intent_name`, if any.
    ///
    /// `None` means "no block": either the intent has no enrichment, or
    /// the downstream query failed/timed out (logged, swallowed).
    pub async fn enrich(&self, intent_name: &str, user_id: &str) -> Option<String> {
        let handler = self.handlers.get(intent_name)?;
        let outcome =
            match tokio::time::timeout(COLLABORATOR_TIMEOUT, handler(self.data.as_ref(), user_id))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(CollaboratorError::Timeout),
            };
        match outcome {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!(intent = %intent_name, error = %e, "enrichment failed, skipping block");
                None
            }
        }
    }
}

// ─── Personal-history handlers ───────────────────────────────────

fn my_crops<'a>(data: &'a dyn FarmData, user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let photos = data.crop_photos(user_id, ITEM_CAP).await?;
        if photos.is_empty() {
            return Ok("You haven't uploaded any crop photos yet. Open 📷 Analyze Crop and \
                       scan a leaf to get your first diagnosis!"
                .to_string());
        }
        let mut lines = Vec::with_capacity(photos.len());
        for (n, photo) in photos.iter().enumerate() {
            let disease = photo.disease.as_deref().unwrap_or("Analysis pending");
            let confidence = photo
                .confidence_score
                .map(|c| format!(" ({:.0}% confidence)", c * 100.0))
                .unwrap_or_default();
            let treatment = photo
                .suggested_treatment
                .as_deref()
                .map(|t| format!(" — try {t}"))
                .unwrap_or_default();
            lines.push(format!(
                "{}. {} {}{}{}",
                n + 1,
                photo.status.glyph(),
                disease,
                confidence,
                treatment
            ));
        }
        Ok(lines.join("\n"))
    })
}

fn my_purchases<'a>(data: &'a dyn FarmData, user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let orders = data.orders(user_id, ITEM_CAP).await?;
        if orders.is_empty() {
            return Ok("You haven't ordered anything yet. Browse the 🛒 Marketplace for \
                       seeds, organic inputs and tools from local sellers."
                .to_string());
        }
        let lines: Vec<String> = orders
            .iter()
            .enumerate()
            .map(|(n, order)| {
                format!(
                    "{}. {} {} — ₹{:.0} ({})",
                    n + 1,
                    order.order_status.glyph(),
                    order.product_title,
                    order.total_price,
                    order.order_status.label()
                )
            })
            .collect();
        Ok(lines.join("\n"))
    })
}

fn my_treatments<'a>(data: &'a dyn FarmData, user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let applications = data.treatment_applications(user_id, ITEM_CAP).await?;
        if applications.is_empty() {
            return Ok("You haven't recorded any treatments yet. Pick one from 🌿 Organic \
                       Solutions and log it when you apply it — I'll track the outcome with you."
                .to_string());
        }
        let lines: Vec<String> = applications
            .iter()
            .enumerate()
            .map(|(n, app)| {
                let outcome = app
                    .outcome
                    .as_deref()
                    .map(|o| format!(", outcome: {o}"))
                    .unwrap_or_default();
                format!(
                    "{}. {} {} — {}{}",
                    n + 1,
                    app.status.glyph(),
                    app.solution_title,
                    app.status.label(),
                    outcome
                )
            })
            .collect();
        Ok(lines.join("\n"))
    })
}

fn my_community<'a>(data: &'a dyn FarmData, user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let posts = data.community_posts(user_id, ITEM_CAP).await?;
        if posts.is_empty() {
            return Ok("You haven't posted in the community yet. Ask your first question on \
                       the 👥 Community page — farmers nearby usually answer within hours."
                .to_string());
        }
        let lines: Vec<String> = posts
            .iter()
            .enumerate()
            .map(|(n, post)| {
                let glyph = if post.is_question && post.is_solved {
                    "✅"
                } else if post.is_question {
                    "❓"
                } else {
                    "💬"
                };
                format!(
                    "{}. {} \"{}\" — {} likes, {} replies",
                    n + 1,
                    glyph,
                    post.title,
                    post.likes,
                    post.comments_count
                )
            })
            .collect();
        Ok(lines.join("\n"))
    })
}

fn my_consultations<'a>(data: &'a dyn FarmData, user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let sessions = data.consultations(user_id, ITEM_CAP).await?;
        if sessions.is_empty() {
            return Ok("You haven't booked any consultations yet. A specialist session costs \
                       nothing to request — start one from the 👨‍🌾 Consultations page."
                .to_string());
        }
        let lines: Vec<String> = sessions
            .iter()
            .enumerate()
            .map(|(n, session)| {
                let specialist = session
                    .specialist_name
                    .as_deref()
                    .map(|s| format!(" with {s}"))
                    .unwrap_or_default();
                let when = session
                    .scheduled_at
                    .map(|t| format!(", {}", t.format("%d %b %Y")))
                    .unwrap_or_default();
                format!(
                    "{}. {} {}{} — {} ({}{})",
                    n + 1,
                    session.status.glyph(),
                    session.topic,
                    specialist,
                    session.status.label(),
                    session.session_type,
                    when
                )
            })
            .collect();
        Ok(lines.join("\n"))
    })
}

fn weather_alerts<'a>(data: &'a dyn FarmData, user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        // Alerts are keyed by location, so resolve the district first
        let profile = data.get_user(user_id).await?;
        let Some(district) = profile.district.filter(|d| !d.trim().is_empty()) else {
            return Ok("Set your district in your profile and I'll watch the weather for \
                       your fields."
                .to_string());
        };
        let alerts = data.weather_alerts(&district, ITEM_CAP).await?;
        if alerts.is_empty() {
            return Ok(format!(
                "No active weather alerts for {district} district right now. 👍"
            ));
        }
        let lines: Vec<String> = alerts
            .iter()
            .enumerate()
            .map(|(n, alert)| {
                format!(
                    "{}. {} {}: {} → {}",
                    n + 1,
                    alert.severity.glyph(),
                    alert.alert_type,
                    alert.message,
                    alert.recommended_action
                )
            })
            .collect();
        Ok(lines.join("\n"))
    })
}

fn my_badges<'a>(data: &'a dyn FarmData, user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let profile = data.get_user(user_id).await?;
        if profile.badges.is_empty() {
            return Ok("No badges yet — upload your first crop photo to earn 🌱 First Scan!"
                .to_string());
        }
        let lines: Vec<String> = profile
            .badges
            .iter()
            .take(ITEM_CAP)
            .enumerate()
            .map(|(n, badge)| format!("{}. 🏅 {badge}", n + 1))
            .collect();
        Ok(format!(
            "{}\n🔥 Current streak: {} days",
            lines.join("\n"),
            profile.streak_count
        ))
    })
}

fn my_progress<'a>(data: &'a dyn FarmData, user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let profile = data.get_user(user_id).await?;
        if profile.crops_monitored == 0 && profile.treatments_applied == 0 {
            return Ok("Your journey is just beginning! Scan a crop or apply an organic \
                       solution and your progress will show up here."
                .to_string());
        }
        Ok(format!(
            "🌾 Crops monitored: {}\n💊 Treatments applied: {}\n🏅 Badges earned: {}\n🔥 Streak: {} days",
            profile.crops_monitored,
            profile.treatments_applied,
            profile.badges.len(),
            profile.streak_count
        ))
    })
}

// ─── Trending handlers ───────────────────────────────────────────

fn trending_diseases<'a>(data: &'a dyn FarmData, _user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let rows = data.trending_diseases(TRENDING_CAP).await?;
        if rows.is_empty() {
            return Ok("No disease reports yet — the fields are quiet. Upload a crop photo \
                       if you spot something unusual."
                .to_string());
        }
        let lines: Vec<String> = rows
            .iter()
            .enumerate()
            .map(|(n, row)| format!("{}. 🦠 {} — {} reports", n + 1, row.disease, row.count))
            .collect();
        Ok(lines.join("\n"))
    })
}

fn community_trending<'a>(data: &'a dyn FarmData, _user_id: &'a str) -> BoxFuture<'a, EnrichResult> {
    Box::pin(async move {
        let since = Utc::now() - Duration::hours(24);
        let recent = data.post_count_since(since).await?;
        let top = data.top_posts(3).await?;
        if top.is_empty() {
            return Ok("The community is just getting started — be the first to post a \
                       question!"
                .to_string());
        }
        let mut lines = vec![format!("👥 {recent} new posts in the last 24 hours.")];
        for (n, post) in top.iter().enumerate() {
            lines.push(format!(
                "{}. \"{}\" — {} likes",
                n + 1,
                post.title,
                post.likes
            ));
        }
        Ok(lines.join("\n"))
    })
}
