//! # Domain Records
//!
//! Read models for everything the chatbot looks up or persists. The
//! per-feature records (crop photos, orders, treatment applications,
//! posts, consultations, weather alerts) live in the host application's
//! document store and reach us through the [`FarmData`] collaborator
//! trait — here they are plain data, no behavior beyond display glyphs.
//!
//! [`FarmData`]: crate::collaborators::FarmData

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lightweight user profile, fetched once per conversation turn.
/// Feeds the personalizer (name, district) and the progress enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub village: Option<String>,
    pub district: Option<String>,
    pub language_preference: String,
    /// Per-feature counters: crops monitored, treatments applied, badges.
    #[serde(default)]
    pub crops_monitored: u32,
    #[serde(default)]
    pub treatments_applied: u32,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub streak_count: u32,
}

/// Lifecycle of an analyzed crop photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropStatus {
    Active,
    Treated,
    Resolved,
}

impl CropStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            CropStatus::Active => "🔴",
            CropStatus::Treated => "💊",
            CropStatus::Resolved => "✅",
        }
    }
}

/// A crop photo the farmer uploaded for disease detection, annotated
/// with the model's prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropPhoto {
    pub id: String,
    pub user_id: String,
    pub disease: Option<String>,
    pub confidence_score: Option<f32>,
    pub status: CropStatus,
    pub suggested_treatment: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            OrderStatus::Pending => "⏳",
            OrderStatus::Confirmed => "📦",
            OrderStatus::Shipped => "🚚",
            OrderStatus::Delivered => "✅",
            OrderStatus::Cancelled => "❌",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// A marketplace order placed by the farmer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOrder {
    pub id: String,
    pub user_id: String,
    pub product_title: String,
    pub total_price: f64,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    InProgress,
    Completed,
}

impl ApplicationStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "🌱",
            ApplicationStatus::InProgress => "⏳",
            ApplicationStatus::Completed => "✅",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::InProgress => "in progress",
            ApplicationStatus::Completed => "completed",
        }
    }
}

/// An organic solution the farmer applied to a crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionApplication {
    pub id: String,
    pub user_id: String,
    pub solution_title: String,
    pub status: ApplicationStatus,
    pub outcome: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// A post authored by the farmer in the community forum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub likes: u32,
    pub comments_count: u32,
    pub is_question: bool,
    pub is_solved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl ConsultationStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            ConsultationStatus::Pending => "⏳",
            ConsultationStatus::Active => "🟢",
            ConsultationStatus::Completed => "✅",
            ConsultationStatus::Cancelled => "❌",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConsultationStatus::Pending => "pending",
            ConsultationStatus::Active => "active",
            ConsultationStatus::Completed => "completed",
            ConsultationStatus::Cancelled => "cancelled",
        }
    }
}

/// A specialist consultation session (chat, audio, or video).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: String,
    pub farmer_id: String,
    pub topic: String,
    pub specialist_name: Option<String>,
    pub session_type: String,
    pub status: ConsultationStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Urgent,
}

impl Severity {
    pub fn glyph(self) -> &'static str {
        match self {
            Severity::Low => "🟡",
            Severity::Medium => "🟠",
            Severity::High => "🔴",
            Severity::Urgent => "🚨",
        }
    }
}

/// A weather alert targeted at a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub id: String,
    pub location: String,
    pub alert_type: String,
    pub severity: Severity,
    pub message: String,
    pub recommended_action: String,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Aggregation row for the trending-diseases enrichment: how many
/// analyzed photos carried each disease label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseCount {
    pub disease: String,
    pub count: u64,
}

/// One chatbot exchange, persisted append-only on every processed
/// message (including classification fallbacks). Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub user_id: String,
    pub user_message: String,
    pub bot_response: String,
    pub intent: String,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

/// A helpful/unhelpful vote on a conversation entry. Append-only, no
/// dedup against repeated feedback on the same conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    pub helpful: bool,
    pub comment: Option<String>,
    pub timestamp: DateTime<Utc>,
}
