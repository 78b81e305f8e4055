//! # Conversation Orchestrator
//!
//! One entry point per user message. The pipeline:
//!
//! ```text
//! validate ──▶ classify ──▶ pick response ──▶ personalize
//!                 │                               │
//!                 ▼                               ▼
//!           context memory ◀── log ◀── actions ◀── enrich
//! ```
//!
//! ## Failure boundary
//!
//! Validation errors ([`ChatError`]) are the only errors a caller ever
//! sees. Past validation the turn cannot fail: a dead collaborator, a
//! log flush error, anything — the user still gets a well-formed
//! [`ConversationResult`], at worst the fixed degraded response.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::collaborators::FarmData;
use crate::config::{COLLABORATOR_TIMEOUT, MAX_MESSAGE_LEN};
use crate::context::ContextMemory;
use crate::corpus::IntentDef;
use crate::enrich::Enricher;
use crate::error::{ChatError, CollaboratorError};
use crate::model::{ConversationRecord, UserProfile};
use crate::nlu::IntentClassifier;
use crate::personalize::personalize;
use crate::store::ConversationLog;

/// Reply text for turns where the pipeline itself failed.
const DEGRADED_RESPONSE: &str =
    "I didn't quite understand that. Could you try rephrasing your question?";

/// A tappable shortcut offered alongside the reply.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SuggestedAction {
    pub label: String,
    pub action: String,
    pub icon: String,
}

/// Everything the caller needs to render one chatbot turn.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConversationResult {
    pub conversation_id: String,
    pub response: String,
    pub intent: String,
    pub confidence: f32,
    pub suggested_actions: Vec<SuggestedAction>,
    pub timestamp: String,
}

/// The assembled chatbot: classifier plus its collaborators.
pub struct ChatEngine {
    classifier: Arc<IntentClassifier>,
    context: ContextMemory,
    enricher: Enricher,
    data: Arc<dyn FarmData>,
    log: Arc<ConversationLog>,
}

impl ChatEngine {
    pub fn new(
        classifier: Arc<IntentClassifier>,
        data: Arc<dyn FarmData>,
        log: Arc<ConversationLog>,
    ) -> Self {
        Self {
            classifier,
            context: ContextMemory::new(),
            enricher: Enricher::new(Arc::clone(&data)),
            data,
            log,
        }
    }

    /// Processes one user message end to end.
    ///
    /// Errors only on input validation. Every accepted message produces
    /// a result, logged to the conversation store on a best-effort
    /// basis.
    pub async fn process_message(
        &self,
        user_id: &str,
        raw_message: &str,
    ) -> Result<ConversationResult, ChatError> {
        let message = raw_message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let len = message.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(ChatError::MessageTooLong {
                len,
                max: MAX_MESSAGE_LEN,
            });
        }

        let result = self.run_pipeline(user_id, message).await;
        self.record(user_id, message, &result);
        Ok(result)
    }

    async fn run_pipeline(&self, user_id: &str, message: &str) -> ConversationResult {
        let classification = self.classifier.classify(message);
        let intent = classification.intent;

        tracing::info!(
            user = %user_id,
            intent = %intent.name,
            confidence = classification.confidence,
            "message classified"
        );

        let Some(base) = pick_response(intent) else {
            tracing::warn!(intent = %intent.name, "intent has no responses, degrading");
            return degraded_result();
        };

        let profile = self.fetch_profile(user_id).await;
        let mut response = personalize(base, profile.as_ref());

        if let Some(block) = self.enricher.enrich(intent.name, user_id).await {
            response.push_str("\n\n");
            response.push_str(&block);
        }

        self.context.set(user_id, intent.context);

        ConversationResult {
            conversation_id: Uuid::new_v4().to_string(),
            response,
            intent: intent.name.to_string(),
            confidence: classification.confidence,
            suggested_actions: actions_for(intent.name),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Profile lookup is optional: a missing or slow user directory
    /// only disables personalization.
    async fn fetch_profile(&self, user_id: &str) -> Option<UserProfile> {
        let outcome = match tokio::time::timeout(COLLABORATOR_TIMEOUT, self.data.get_user(user_id))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout),
        };
        match outcome {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::debug!(user = %user_id, error = %e, "profile lookup failed, skipping personalization");
                None
            }
        }
    }

    fn record(&self, user_id: &str, message: &str, result: &ConversationResult) {
        self.log.record_conversation(ConversationRecord {
            id: result.conversation_id.clone(),
            user_id: user_id.to_string(),
            user_message: message.to_string(),
            bot_response: result.response.clone(),
            intent: result.intent.clone(),
            confidence: result.confidence,
            timestamp: Utc::now(),
        });
    }

    /// Users with live context tags, for the status endpoint.
    pub fn tracked_users(&self) -> usize {
        self.context.tracked_users()
    }
}

fn pick_response(intent: &IntentDef) -> Option<&'static str> {
    intent.responses.choose(&mut rand::thread_rng()).copied()
}

fn degraded_result() -> ConversationResult {
    ConversationResult {
        conversation_id: Uuid::new_v4().to_string(),
        response: DEGRADED_RESPONSE.to_string(),
        intent: "error".to_string(),
        confidence: 0.0,
        suggested_actions: default_actions(),
        timestamp: Utc::now().to_rfc3339(),
    }
}

fn action(label: &str, key: &str, icon: &str) -> SuggestedAction {
    SuggestedAction {
        label: label.to_string(),
        action: key.to_string(),
        icon: icon.to_string(),
    }
}

fn default_actions() -> Vec<SuggestedAction> {
    vec![
        action("Upload Crop Photo", "upload", "📷"),
        action("Browse Solutions", "solutions", "🌿"),
        action("Talk to Specialist", "specialist", "👨‍🌾"),
    ]
}

/// Static intent → quick-action table. Unlisted intents get the
/// default triple.
fn actions_for(intent_name: &str) -> Vec<SuggestedAction> {
    match intent_name {
        "upload_photo" | "my_crops" | "disease_info" => vec![
            action("Upload Crop Photo", "upload", "📷"),
            action("Trending Diseases", "diseases", "🦠"),
            action("Browse Solutions", "solutions", "🌿"),
        ],
        "organic_solutions" | "my_treatments" | "pest_control" | "fertilizer" => vec![
            action("Browse Solutions", "solutions", "🌿"),
            action("Traditional Practices", "traditional", "🪔"),
            action("Talk to Specialist", "specialist", "👨‍🌾"),
        ],
        "weather_forecast" | "weather_alerts" | "seasonal_calendar" => vec![
            action("Weather Forecast", "weather", "🌦️"),
            action("Weather Alerts", "alerts", "🚨"),
            action("Crop Calendar", "calendar", "📅"),
        ],
        "community" | "my_community" | "community_trending" => vec![
            action("Open Community", "community", "👥"),
            action("Ask a Question", "post", "✍️"),
            action("Success Stories", "stories", "🌟"),
        ],
        "consultation_booking" | "my_consultations" => vec![
            action("Talk to Specialist", "specialist", "👨‍🌾"),
            action("Start Chat Session", "chat", "💬"),
            action("Video Consultation", "video", "📹"),
        ],
        "marketplace" | "sell_produce" | "my_purchases" => vec![
            action("Open Marketplace", "marketplace", "🛒"),
            action("Browse Solutions", "solutions", "🌿"),
            action("Talk to Specialist", "specialist", "👨‍🌾"),
        ],
        "video_tutorials" => vec![
            action("Watch Tutorials", "videos", "🎬"),
            action("Traditional Practices", "traditional", "🪔"),
            action("Open Community", "community", "👥"),
        ],
        _ => default_actions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::testing::{FailingFarmData, SlowFarmData};
    use crate::collaborators::InMemoryFarmData;
    use crate::corpus::CORPUS;

    fn engine_with(data: Arc<dyn FarmData>) -> ChatEngine {
        ChatEngine::new(
            Arc::new(IntentClassifier::fit(CORPUS)),
            data,
            Arc::new(ConversationLog::in_memory()),
        )
    }

    fn seeded_engine() -> ChatEngine {
        let data = InMemoryFarmData::new();
        data.users.write().insert(
            "u1".to_string(),
            UserProfile {
                id: "u1".to_string(),
                name: "Ramesh".to_string(),
                village: None,
                district: Some("Guntur".to_string()),
                language_preference: "telugu".to_string(),
                crops_monitored: 0,
                treatments_applied: 0,
                badges: Vec::new(),
                streak_count: 0,
            },
        );
        engine_with(Arc::new(data))
    }

    // ─── happy path ────────────────────────────────────────────

    #[tokio::test]
    async fn greeting_is_classified_and_personalized() {
        let engine = seeded_engine();
        let result = engine.process_message("u1", "hello").await.unwrap();

        assert_eq!(result.intent, "greeting");
        assert!(result.confidence > 0.99);
        assert!(result.response.starts_with("Hello Ramesh!"));
        assert_eq!(result.suggested_actions.len(), 3);
        assert!(!result.conversation_id.is_empty());
    }

    #[tokio::test]
    async fn turn_is_logged_to_the_conversation_store() {
        let log = Arc::new(ConversationLog::in_memory());
        let engine = ChatEngine::new(
            Arc::new(IntentClassifier::fit(CORPUS)),
            Arc::new(InMemoryFarmData::new()),
            Arc::clone(&log),
        );

        let result = engine.process_message("u1", "hello").await.unwrap();
        let history = log.list_history("u1", 10);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, result.conversation_id);
        assert_eq!(history[0].intent, "greeting");
        assert_eq!(history[0].user_message, "hello");
    }

    #[tokio::test]
    async fn reply_is_drawn_from_the_intent_response_set() {
        let engine = engine_with(Arc::new(InMemoryFarmData::new()));
        let thanks = crate::corpus::intent_by_name("thanks").unwrap();
        for _ in 0..10 {
            let result = engine.process_message("u1", "thank you").await.unwrap();
            assert_eq!(result.intent, "thanks");
            assert!(thanks.responses.contains(&result.response.as_str()));
        }
    }

    #[tokio::test]
    async fn intent_specific_actions_are_offered() {
        let engine = seeded_engine();
        let result = engine
            .process_message("u1", "weather forecast")
            .await
            .unwrap();
        assert_eq!(result.intent, "weather_forecast");
        assert_eq!(result.suggested_actions[0].action, "weather");
    }

    // ─── validation boundary ───────────────────────────────────

    #[tokio::test]
    async fn empty_message_is_rejected_before_classification() {
        let engine = seeded_engine();
        assert_eq!(
            engine.process_message("u1", "   ").await.unwrap_err(),
            ChatError::EmptyMessage
        );
    }

    #[tokio::test]
    async fn oversized_message_is_rejected() {
        let engine = seeded_engine();
        let long = "a".repeat(MAX_MESSAGE_LEN + 1);
        assert!(matches!(
            engine.process_message("u1", &long).await.unwrap_err(),
            ChatError::MessageTooLong { len, max }
                if len == MAX_MESSAGE_LEN + 1 && max == MAX_MESSAGE_LEN
        ));
    }

    #[tokio::test]
    async fn boundary_length_message_is_accepted() {
        let engine = seeded_engine();
        let exact = "a".repeat(MAX_MESSAGE_LEN);
        assert!(engine.process_message("u1", &exact).await.is_ok());
    }

    // ─── degraded collaborators ────────────────────────────────

    #[tokio::test]
    async fn dead_collaborators_still_produce_a_full_turn() {
        let engine = engine_with(Arc::new(FailingFarmData));
        let result = engine.process_message("u1", "my orders").await.unwrap();

        assert_eq!(result.intent, "my_purchases");
        // Base response survives without personalization or enrichment
        assert!(!result.response.is_empty());
        assert!(!result.response.contains("Hello Ramesh"));
        assert_eq!(result.suggested_actions[0].action, "marketplace");
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_collaborators_degrade_to_unpersonalized_turn() {
        let engine = engine_with(Arc::new(SlowFarmData));
        let result = engine.process_message("u1", "hello").await.unwrap();
        assert_eq!(result.intent, "greeting");
        assert!(result.response.starts_with("Hello!"));
    }

    #[tokio::test]
    async fn unknown_user_gets_unpersonalized_greeting() {
        let engine = engine_with(Arc::new(InMemoryFarmData::new()));
        let result = engine.process_message("ghost", "hello").await.unwrap();
        assert!(result.response.starts_with("Hello!"));
    }

    #[tokio::test]
    async fn gibberish_falls_back_to_first_intent_with_zero_confidence() {
        let engine = seeded_engine();
        let result = engine
            .process_message("u1", "zzqx vvrm plok")
            .await
            .unwrap();
        assert_eq!(result.intent, "greeting");
        assert_eq!(result.confidence, 0.0);
    }
}
