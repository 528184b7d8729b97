//! Constants used throughout the triage core crate.
//!
//! Fixed user-facing texts, thresholds and safety defaults live here so the catalogs and the
//! synthesizer stay consistent with each other.

use std::time::Duration;

/// Prefix of every red-flag guidance string.
pub const EMERGENCY_MARKER: &str = "🚨 SEEK IMMEDIATE MEDICAL ATTENTION.";

/// Closing sentence of every template explanation.
pub const TEMPLATE_DISCLAIMER: &str = "⚠️ Important: This information is for educational purposes only. \
It is not a medical diagnosis. Please consult with a healthcare professional for proper evaluation and treatment.";

/// Guidance per urgency tier.
pub const GUIDANCE_LOW: &str =
    "Monitor your symptoms. Consider rest and over-the-counter remedies if appropriate.";
pub const GUIDANCE_MEDIUM: &str =
    "Consider scheduling an appointment with your healthcare provider within the next few days.";
pub const GUIDANCE_HIGH: &str =
    "Seek medical attention soon. Contact your doctor or visit an urgent care facility.";
pub const GUIDANCE_EMERGENCY: &str =
    "Seek immediate medical attention. Call emergency services or go to the nearest emergency room.";

/// Intensity at or above which the heuristic tier is `high`.
pub const HIGH_URGENCY_INTENSITY: u8 = 8;

/// Intensity at or above which the heuristic tier is at least `medium`.
pub const MEDIUM_URGENCY_INTENSITY: u8 = 5;

/// Intensity at or above which severe pain combines with neurological symptoms into a red flag.
pub const SEVERE_PAIN_INTENSITY: u8 = 8;

/// Intensity at or above which lower-right abdominal pain suggests appendicitis.
pub const APPENDICITIS_INTENSITY: u8 = 6;

/// Phrases that indicate diagnostic or prescriptive language.
pub const DEFAULT_FORBIDDEN_PHRASES: &[&str] = &[
    "you have",
    "you are diagnosed",
    "this is definitely",
    "you need to take",
    "take this medication",
    "the diagnosis is",
];

/// Default per-attempt timeout for the explanation provider.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Default number of provider retries after the first attempt.
pub const DEFAULT_PROVIDER_RETRIES: u8 = 1;

/// Upper bound on provider retries.
pub const MAX_PROVIDER_RETRIES: u8 = 1;

/// Instructions prepended to every explanation prompt.
pub const SAFETY_PREAMBLE: &str = "CRITICAL SAFETY INSTRUCTIONS:

You are an educational health information assistant. You MUST follow these rules:

1. NEVER provide a diagnosis
2. NEVER recommend specific medications
3. NEVER provide treatment plans
4. ALWAYS use probabilistic language (may, might, could, possibly)
5. ALWAYS include uncertainty in your responses
6. ALWAYS encourage consulting healthcare professionals
7. NEVER claim certainty about medical conditions
8. Focus on education and awareness, not diagnosis

Your role is to:
- Explain possible causes in educational terms
- Help users understand when to seek professional care
- Provide general health information
- Encourage appropriate medical consultation

Format your response as JSON:
{
    \"explanation\": \"Educational explanation with probabilistic language\",
    \"possible_causes\": [
        {
            \"name\": \"Condition name\",
            \"description\": \"Educational description\",
            \"probability\": 0.0,
            \"matching_symptoms\": [\"symptom1\", \"symptom2\"]
        }
    ],
    \"disclaimer\": \"This is not medical advice...\"
}";
