//! Meal plan data model
//!
//! These types mirror the JSON block the assistant is prompted to embed in
//! every completion. A plan is only ever forwarded to the backend store
//! when it deserialized cleanly into this shape.

use serde::{Deserialize, Serialize};

/// A structured meal plan extracted from a completion
///
/// # Examples
///
/// ```
/// use meditrack::meal_plan::MealPlan;
///
/// let plan: MealPlan = serde_json::from_str(
///     r#"{"meals":[{"meal":"Oatmeal","time":"07:00 AM","date":"2025-09-13","timestamp":"2025-09-13T07:00:00Z"}]}"#,
/// ).unwrap();
/// assert_eq!(plan.meals.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealPlan {
    /// Ordered meal entries for the plan
    pub meals: Vec<MealEntry>,
}

/// One entry in a meal plan
///
/// Field names match the wire format of the backend store and of the JSON
/// the model emits. `notes` is optional; everything else is required for
/// the entry to be considered well-formed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealEntry {
    /// Human-readable meal description
    pub meal: String,
    /// Time of day, e.g. "07:00 AM"
    pub time: String,
    /// Calendar date, e.g. "2025-09-13"
    pub date: String,
    /// Full RFC 3339 timestamp, e.g. "2025-09-13T07:00:00Z"
    pub timestamp: String,
    /// Optional free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MealPlan {
    /// Returns true when the plan carries no entries
    ///
    /// Empty plans are well-formed but not worth persisting.
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}
