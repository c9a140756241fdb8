//! Completion splitting
//!
//! The assistant is prompted to answer in two sections: a human-readable
//! part introduced by `[USER_FRIENDLY]`, and a machine-readable meal plan
//! wrapped in `[JSON_START]` / `[JSON_END]`. The model output is untrusted
//! free text, so splitting must degrade gracefully: a missing or malformed
//! section never fails the turn, it only reduces what the turn produces.

use crate::meal_plan::MealPlan;

/// Marker opening the human-readable section
pub const DISPLAY_MARKER: &str = "[USER_FRIENDLY]";
/// Marker opening the embedded meal-plan JSON block
pub const PLAN_START_MARKER: &str = "[JSON_START]";
/// Marker closing the embedded meal-plan JSON block
pub const PLAN_END_MARKER: &str = "[JSON_END]";

/// Result of splitting one raw completion
#[derive(Debug, Clone)]
pub struct SplitCompletion {
    /// Text to render to the user; non-empty whenever the raw text is
    pub display: String,
    /// Meal plan parsed from the JSON block, if one was present and valid
    pub plan: Option<MealPlan>,
}

/// Split a raw completion into its display text and optional meal plan
///
/// Never fails. If the display markers are missing or out of order the
/// whole trimmed completion becomes the display text. If the JSON block is
/// missing or does not parse into a [`MealPlan`], the plan is dropped (and
/// the parse failure logged) while the display text is still returned.
///
/// # Examples
///
/// ```
/// use meditrack::parser::split;
///
/// let raw = "[USER_FRIENDLY]\nEat more fiber.\n[JSON_START]\n{\"meals\":[]}\n[JSON_END]";
/// let result = split(raw);
/// assert_eq!(result.display, "Eat more fiber.");
/// assert!(result.plan.is_some());
/// ```
pub fn split(raw: &str) -> SplitCompletion {
    SplitCompletion {
        display: extract_display(raw),
        plan: extract_plan(raw),
    }
}

/// Extract the human-readable segment, falling back to the whole text
fn extract_display(raw: &str) -> String {
    let display_at = raw.find(DISPLAY_MARKER);
    let plan_at = raw.find(PLAN_START_MARKER);

    let segment = match (display_at, plan_at) {
        (Some(d), Some(p)) if d < p => raw[d + DISPLAY_MARKER.len()..p].trim(),
        _ => raw.trim(),
    };

    // A completion that is nothing but markers still gets rendered as-is
    // rather than as an empty bubble.
    if segment.is_empty() {
        raw.trim().to_string()
    } else {
        segment.to_string()
    }
}

/// Extract and parse the meal-plan block, if any
fn extract_plan(raw: &str) -> Option<MealPlan> {
    let start = raw.find(PLAN_START_MARKER)? + PLAN_START_MARKER.len();
    let end = raw[start..].find(PLAN_END_MARKER)? + start;
    let payload = raw[start..end].trim();

    match serde_json::from_str::<MealPlan>(payload) {
        Ok(plan) => Some(plan),
        Err(e) => {
            tracing::warn!("Discarding malformed meal-plan block: {}", e);
            None
        }
    }
}
