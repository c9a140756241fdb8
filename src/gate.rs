//! Domain gate for incoming queries
//!
//! The gate classifies a query as in-scope or out-of-scope before any
//! network cost is spent on it. Matching is a case-insensitive substring
//! check against a fixed set of health and diet terms, so the check is
//! infallible and has no side effects.

/// Keywords that mark a query as health-related
///
/// Mirrors the vocabulary the assistant is prompted to answer about:
/// general health, diet, and recovery topics.
const HEALTH_KEYWORDS: &[&str] = &[
    "health",
    "diet",
    "meal",
    "food",
    "nutrition",
    "exercise",
    "fitness",
    "doctor",
    "medicine",
    "treatment",
    "fever",
    "cough",
    "headache",
    "pain",
    "blood",
    "diabetes",
    "pressure",
    "symptom",
    "recovery",
];

/// Pre-flight filter rejecting out-of-scope queries
///
/// A query is accepted if any keyword appears in it, ignoring case. An
/// empty query can never match and is therefore rejected.
///
/// # Examples
///
/// ```
/// use meditrack::gate::DomainGate;
///
/// let gate = DomainGate::new();
/// assert!(gate.accepts("What DIET helps with a headache?"));
/// assert!(!gate.accepts("tell me a joke"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DomainGate;

impl DomainGate {
    /// Create a new domain gate with the built-in keyword set
    pub fn new() -> Self {
        Self
    }

    /// Returns true if the query is in scope for the assistant
    ///
    /// Pure function: no side effects, no network access, cannot fail.
    pub fn accepts(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        HEALTH_KEYWORDS.iter().any(|kw| lowered.contains(kw))
    }
}
