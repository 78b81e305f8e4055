//! # Pattern Corpus
//!
//! The static intent table the classifier is fitted over. Each intent
//! carries example phrases ("patterns"), canned response templates, a
//! conversational context tag, and advisory follow-up hints.
//!
//! Declaration order is load-bearing: on a total similarity tie (for
//! example a message sharing no vocabulary with any pattern) the first
//! declared intent wins, so `greeting` sits at index 0 on purpose.
//!
//! Response templates may contain the placeholders the personalizer
//! rewrites: the greeting opener `"Hello!"` and the phrase `"your area"`.

/// One intent: a named category of user request.
///
/// Invariant: `patterns` and `responses` are non-empty, and every
/// intent name in [`CORPUS`] is unique (pinned by a unit test).
pub struct IntentDef {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub responses: &'static [&'static str],
    /// Tags describing the conversational state after this intent fires.
    pub context: &'static [&'static str],
    /// Plausible next intents. Advisory only, never enforced.
    pub follow_up: &'static [&'static str],
}

/// The full intent table. Rebuilt into a vector space only at process
/// start; effectively immutable at runtime.
pub static CORPUS: &[IntentDef] = &[
    IntentDef {
        name: "greeting",
        patterns: &[
            "hi",
            "hello",
            "hey",
            "namaste",
            "good morning",
            "good evening",
            "hello there",
            "hai",
        ],
        responses: &[
            "Hello! I'm your farming assistant. Ask me about crop diseases, organic \
             treatments, weather, or anything on your farm.",
            "Hello! How is your farm doing today? I can help with diseases, treatments, \
             weather and more.",
        ],
        context: &["greeting"],
        follow_up: &["help", "my_crops", "weather_forecast"],
    },
    IntentDef {
        name: "goodbye",
        patterns: &[
            "bye",
            "goodbye",
            "see you",
            "see you later",
            "talk to you later",
            "good night",
        ],
        responses: &[
            "Goodbye! Come back anytime your crops need attention. 🌾",
            "Take care! Wishing you a healthy harvest. 🌾",
        ],
        context: &["closing"],
        follow_up: &[],
    },
    IntentDef {
        name: "thanks",
        patterns: &[
            "thanks",
            "thank you",
            "thank you so much",
            "thanks a lot",
            "very helpful",
        ],
        responses: &[
            "You're welcome! Happy to help with anything else.",
            "Glad I could help! Ask me anytime.",
        ],
        context: &["closing"],
        follow_up: &["help"],
    },
    IntentDef {
        name: "help",
        patterns: &[
            "help",
            "what can you do",
            "how can you help me",
            "what do you know",
            "how to use this app",
            "show me the features",
        ],
        responses: &[
            "I can help you with:\n• 📷 Crop disease identification\n• 🌿 Organic treatments \
             and solutions\n• 🌦️ Weather forecasts and alerts\n• 👥 Community questions\n\
             • 👨‍🌾 Specialist consultations\n• 🛒 Marketplace orders\n\nJust ask in your own words!",
        ],
        context: &["help"],
        follow_up: &["upload_photo", "organic_solutions"],
    },
    IntentDef {
        name: "my_crops",
        patterns: &[
            "my crops",
            "show my crops",
            "my crop photos",
            "my uploads",
            "my plants",
            "crop analysis history",
            "photos i uploaded",
        ],
        responses: &[
            "Here's what I found in your crop records:",
            "Let me pull up your analyzed crops:",
        ],
        context: &["my_crops"],
        follow_up: &["upload_photo", "organic_solutions"],
    },
    IntentDef {
        name: "upload_photo",
        patterns: &[
            "how do i upload a crop photo",
            "upload photo",
            "scan my crop",
            "analyze my crop",
            "check my plant for disease",
            "take a photo of my crop",
        ],
        responses: &[
            "To analyze a crop: open 📷 Analyze Crop, take a clear photo of the affected \
             leaf in good light, and I'll identify the disease with a suggested organic treatment.",
        ],
        context: &["upload"],
        follow_up: &["my_crops", "disease_info"],
    },
    IntentDef {
        name: "disease_info",
        patterns: &[
            "tell me about common diseases",
            "disease symptoms",
            "what is leaf blight",
            "what causes leaf spots",
            "crop disease information",
            "plant disease details",
        ],
        responses: &[
            "Common diseases in your area include leaf blight, powdery mildew, bacterial \
             leaf spot and rust. Upload a photo of the affected leaf and I'll identify the \
             exact disease.",
            "Most leaf damage here comes from fungal infections like blight and mildew. A \
             photo of the symptoms lets me give you an exact diagnosis.",
        ],
        context: &["disease"],
        follow_up: &["upload_photo", "trending_diseases"],
    },
    IntentDef {
        name: "trending_diseases",
        patterns: &[
            "what diseases are spreading",
            "trending diseases",
            "disease outbreak near me",
            "common diseases this season",
            "which disease is most common now",
        ],
        responses: &[
            "Here are the diseases farmers are reporting most right now:",
        ],
        context: &["disease"],
        follow_up: &["organic_solutions", "upload_photo"],
    },
    IntentDef {
        name: "organic_solutions",
        patterns: &[
            "show me organic solutions",
            "organic treatment",
            "natural remedies",
            "how to treat without chemicals",
            "organic pesticide",
            "home made spray for crops",
        ],
        responses: &[
            "Popular organic solutions include neem oil spray, panchagavya, jeevamrutham \
             and buttermilk spray. Open 🌿 Organic Solutions for step-by-step preparation guides.",
            "For most fungal and pest problems, neem oil and panchagavya work well. The \
             🌿 Organic Solutions page has full recipes with local ingredient availability.",
        ],
        context: &["treatment"],
        follow_up: &["my_treatments", "cost_inquiry"],
    },
    IntentDef {
        name: "my_treatments",
        patterns: &[
            "my treatments",
            "treatments i applied",
            "my solution applications",
            "treatment history",
            "what treatments have i used",
        ],
        responses: &[
            "Here are the treatments you've applied:",
        ],
        context: &["my_treatments"],
        follow_up: &["organic_solutions"],
    },
    IntentDef {
        name: "pest_control",
        patterns: &[
            "how to control pests",
            "pest problem",
            "aphids on my crop",
            "insects eating leaves",
            "worms in my field",
            "pest attack",
        ],
        responses: &[
            "For most pests, start with neem oil spray (5ml per litre) in the early morning. \
             Sticky traps and intercropping with marigold also reduce pest pressure organically.",
            "Try a neem-based spray first; it handles aphids, whiteflies and most chewing \
             insects. If the attack is severe, a specialist can recommend a targeted remedy.",
        ],
        context: &["pest"],
        follow_up: &["organic_solutions", "consultation_booking"],
    },
    IntentDef {
        name: "soil_management",
        patterns: &[
            "soil health",
            "how to improve soil",
            "soil testing",
            "soil fertility",
            "my soil is poor",
        ],
        responses: &[
            "Healthy soil starts with organic matter: add compost or farmyard manure, rotate \
             crops, and grow green manure like dhaincha between seasons. A soil test every \
             2–3 years tells you exactly what's missing.",
        ],
        context: &["soil"],
        follow_up: &["fertilizer", "traditional_practices"],
    },
    IntentDef {
        name: "irrigation",
        patterns: &[
            "watering schedule",
            "how often to water",
            "irrigation tips",
            "drip irrigation",
            "water management for crops",
        ],
        responses: &[
            "Water needs depend on crop and stage, but the general rule is deep and \
             infrequent rather than shallow and daily. Drip irrigation saves up to 60% water \
             and keeps leaves dry, which also reduces fungal disease.",
        ],
        context: &["irrigation"],
        follow_up: &["weather_forecast", "seasonal_calendar"],
    },
    IntentDef {
        name: "fertilizer",
        patterns: &[
            "which fertilizer should i use",
            "organic fertilizer",
            "compost",
            "vermicompost",
            "natural manure",
        ],
        responses: &[
            "Good organic options: vermicompost (1–2 t/acre), farmyard manure, and \
             jeevamrutham as a soil drench every 15 days. They feed the soil biology, not \
             just the plant.",
        ],
        context: &["fertilizer"],
        follow_up: &["soil_management", "marketplace"],
    },
    IntentDef {
        name: "seeds",
        patterns: &[
            "which seeds to sow",
            "seed treatment",
            "best seeds for this season",
            "where to get good seeds",
            "seed variety recommendation",
        ],
        responses: &[
            "Choose certified seed of varieties suited to your soil and season, and treat \
             seeds with beejamrutham or trichoderma before sowing to prevent soil-borne \
             disease. The seasonal calendar shows what to sow right now in your area.",
        ],
        context: &["seeds"],
        follow_up: &["seasonal_calendar", "marketplace"],
    },
    IntentDef {
        name: "cost_inquiry",
        patterns: &[
            "how much does organic farming cost",
            "is organic farming expensive",
            "cost comparison",
            "organic vs chemical cost",
            "cost of organic treatment",
        ],
        responses: &[
            "Organic farming usually costs 30–40% less per acre than chemical farming once \
             established: most inputs (neem, compost, panchagavya) are farm-made. Typical \
             per-acre spend: organic ₹2,000–4,000 vs chemical ₹6,000–10,000 per season.",
        ],
        context: &["cost"],
        follow_up: &["organic_solutions"],
    },
    IntentDef {
        name: "weather_forecast",
        patterns: &[
            "what's the weather forecast",
            "weather today",
            "will it rain",
            "rain forecast",
            "temperature this week",
        ],
        responses: &[
            "You can see the detailed forecast for your area on the 🌦️ Weather page, \
             including rainfall probability and a farming advisory for each day.",
        ],
        context: &["weather"],
        follow_up: &["weather_alerts", "irrigation"],
    },
    IntentDef {
        name: "weather_alerts",
        patterns: &[
            "show weather alerts",
            "any weather warnings",
            "alerts for my area",
            "storm warning",
            "weather alert today",
        ],
        responses: &[
            "Checking active weather alerts for your area:",
        ],
        context: &["weather"],
        follow_up: &["weather_forecast"],
    },
    IntentDef {
        name: "seasonal_calendar",
        patterns: &[
            "show seasonal calendar",
            "what to plant this month",
            "kharif season crops",
            "rabi crops",
            "sowing time",
            "farming calendar",
        ],
        responses: &[
            "The 📅 Seasonal Calendar shows month-by-month sowing, irrigation and harvest \
             activities for your crops, with pest watch-outs for each season.",
        ],
        context: &["calendar"],
        follow_up: &["seeds", "weather_forecast"],
    },
    IntentDef {
        name: "my_community",
        patterns: &[
            "my posts",
            "my community activity",
            "my questions",
            "posts i created",
            "my forum activity",
        ],
        responses: &[
            "Here's your recent community activity:",
        ],
        context: &["community"],
        follow_up: &["community"],
    },
    IntentDef {
        name: "community",
        patterns: &[
            "how do i join the community",
            "community posts",
            "ask the community",
            "post a question",
            "connect with other farmers",
        ],
        responses: &[
            "The 👥 Community page connects you with farmers across your region. Post a \
             question with a photo, share a success story, or answer someone else's question \
             to earn badges.",
        ],
        context: &["community"],
        follow_up: &["community_trending", "my_community"],
    },
    IntentDef {
        name: "community_trending",
        patterns: &[
            "what's trending in the community",
            "popular posts",
            "success stories",
            "top discussions",
            "what are farmers talking about",
        ],
        responses: &[
            "Here's what the community is talking about:",
        ],
        context: &["community"],
        follow_up: &["community"],
    },
    IntentDef {
        name: "video_tutorials",
        patterns: &[
            "show me video tutorials",
            "videos",
            "how to videos",
            "learning videos",
            "tutorial on composting",
        ],
        responses: &[
            "The 🎬 Video Tutorials section has short videos in Telugu and English on pest \
             control, composting, irrigation and more — filtered by crop and season.",
        ],
        context: &["learning"],
        follow_up: &["traditional_practices"],
    },
    IntentDef {
        name: "traditional_practices",
        patterns: &[
            "traditional farming methods",
            "tribal practices",
            "ancient techniques",
            "old farming knowledge",
            "traditional pest control",
        ],
        responses: &[
            "The 🏺 Traditional Knowledge library collects time-tested practices from elder \
             farmers and tribal communities, each with its modern scientific explanation \
             where known.",
        ],
        context: &["learning"],
        follow_up: &["video_tutorials"],
    },
    IntentDef {
        name: "marketplace",
        patterns: &[
            "buy seeds",
            "marketplace",
            "products for sale",
            "shop for supplies",
            "buy organic fertilizer",
            "where can i buy neem oil",
        ],
        responses: &[
            "The 🛒 Marketplace lists seeds, organic inputs and tools from verified local \
             sellers, with delivery to your village.",
        ],
        context: &["marketplace"],
        follow_up: &["my_purchases", "sell_produce"],
    },
    IntentDef {
        name: "sell_produce",
        patterns: &[
            "sell my produce",
            "how to sell",
            "list my product",
            "sell vegetables online",
            "become a seller",
        ],
        responses: &[
            "To sell on the marketplace: open 🛒 Marketplace → Sell, add photos, price and \
             quantity. Buyers in your area see your listing first.",
        ],
        context: &["marketplace"],
        follow_up: &["marketplace"],
    },
    IntentDef {
        name: "my_purchases",
        patterns: &[
            "my orders",
            "order status",
            "track my order",
            "my purchases",
            "what did i buy",
            "where is my delivery",
        ],
        responses: &[
            "Here are your recent orders:",
        ],
        context: &["marketplace"],
        follow_up: &["marketplace"],
    },
    IntentDef {
        name: "consultation_booking",
        patterns: &[
            "book a consultation",
            "talk to a specialist",
            "i want expert advice",
            "schedule a video call",
            "connect me with an agronomist",
        ],
        responses: &[
            "You can book a chat, audio or video session with a crop specialist from the \
             👨‍🌾 Consultations page. Most specialists reply within a few hours.",
        ],
        context: &["consultation"],
        follow_up: &["my_consultations"],
    },
    IntentDef {
        name: "my_consultations",
        patterns: &[
            "my consultations",
            "my sessions",
            "consultation history",
            "upcoming consultation",
            "my specialist appointments",
        ],
        responses: &[
            "Here are your consultation sessions:",
        ],
        context: &["consultation"],
        follow_up: &["consultation_booking"],
    },
    IntentDef {
        name: "my_badges",
        patterns: &[
            "my badges",
            "my achievements",
            "my rewards",
            "my streak",
            "badges i earned",
        ],
        responses: &[
            "Here's your achievement progress:",
        ],
        context: &["progress"],
        follow_up: &["my_progress"],
    },
    IntentDef {
        name: "my_progress",
        patterns: &[
            "my progress",
            "my stats",
            "how am i doing",
            "my farming summary",
            "show my impact",
        ],
        responses: &[
            "Here's a summary of your farming journey so far:",
        ],
        context: &["progress"],
        follow_up: &["my_badges", "my_crops"],
    },
    IntentDef {
        name: "language_support",
        patterns: &[
            "do you speak telugu",
            "change language",
            "telugu lo cheppandi",
            "switch to telugu",
            "can you talk in my language",
        ],
        responses: &[
            "Yes! You can switch between Telugu and English from your profile settings — \
             the whole app, including me, follows your language preference.",
        ],
        context: &["settings"],
        follow_up: &["help"],
    },
];

/// Look up an intent by name. Linear scan — the corpus is ~30 entries.
pub fn intent_by_name(name: &str) -> Option<&'static IntentDef> {
    CORPUS.iter().find(|i| i.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn intent_names_are_unique() {
        let mut seen = HashSet::new();
        for intent in CORPUS {
            assert!(seen.insert(intent.name), "duplicate intent: {}", intent.name);
        }
    }

    #[test]
    fn patterns_and_responses_non_empty() {
        for intent in CORPUS {
            assert!(!intent.patterns.is_empty(), "{} has no patterns", intent.name);
            assert!(!intent.responses.is_empty(), "{} has no responses", intent.name);
        }
    }

    #[test]
    fn follow_ups_reference_declared_intents() {
        for intent in CORPUS {
            for hint in intent.follow_up {
                assert!(
                    intent_by_name(hint).is_some(),
                    "{} hints at unknown intent {}",
                    intent.name,
                    hint
                );
            }
        }
    }

    #[test]
    fn greeting_is_declared_first() {
        // Declaration order is the tie-break for zero-similarity messages.
        assert_eq!(CORPUS[0].name, "greeting");
    }
}
