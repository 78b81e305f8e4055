//! Placeholder substitution on canned responses.
//!
//! Purely textual: two recognized placeholder substrings, each rewritten
//! from the requesting user's profile. No profile, no matching
//! placeholder, or an empty field — the response passes through
//! unchanged. This function can never fail a conversation turn.

use crate::model::UserProfile;

/// Generic greeting opener rewritten to address the farmer by name.
const GREETING_PLACEHOLDER: &str = "Hello!";

/// Generic location phrase rewritten to the farmer's district.
const LOCATION_PLACEHOLDER: &str = "your area";

/// Rewrites recognized placeholders using profile attributes.
pub fn personalize(response: &str, profile: Option<&UserProfile>) -> String {
    let Some(profile) = profile else {
        return response.to_string();
    };

    let mut out = response.to_string();

    if !profile.name.trim().is_empty() && out.contains(GREETING_PLACEHOLDER) {
        out = out.replace(
            GREETING_PLACEHOLDER,
            &format!("Hello {}!", profile.name.trim()),
        );
    }

    if let Some(district) = profile.district.as_deref() {
        if !district.trim().is_empty() && out.contains(LOCATION_PLACEHOLDER) {
            out = out.replace(LOCATION_PLACEHOLDER, &format!("{} district", district.trim()));
        }
    }

    out
}
