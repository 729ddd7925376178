//! Generation parameter validation
//!
//! Sanitizes caller-supplied generation settings before request building.
//! Out-of-range values clamp to their bounds, non-finite values are dropped,
//! integral fields round to the nearest integer. Validation never fails: a
//! nonsense value degrades to either the boundary or absence.

/// Valid ranges and defaults for generation parameters
pub mod ranges {
    pub const TEMPERATURE_MIN: f64 = 0.0;
    pub const TEMPERATURE_MAX: f64 = 2.0;
    pub const TEMPERATURE_DEFAULT: f64 = 0.7;

    pub const MAX_TOKENS_MIN: f64 = 1.0;
    pub const MAX_TOKENS_MAX: f64 = 128_000.0;
    pub const MAX_TOKENS_DEFAULT: u32 = 1024;

    pub const TOP_P_MIN: f64 = 0.0;
    pub const TOP_P_MAX: f64 = 1.0;
    pub const TOP_P_DEFAULT: f64 = 1.0;

    pub const TOP_K_MIN: f64 = 1.0;
    pub const TOP_K_MAX: f64 = 100.0;
    pub const TOP_K_DEFAULT: u32 = 40;

    pub const PENALTY_MIN: f64 = -2.0;
    pub const PENALTY_MAX: f64 = 2.0;
    pub const PENALTY_DEFAULT: f64 = 0.0;
}

/// Generation parameters after validation
///
/// `None` means the caller did not supply a usable value; whether a default
/// is substituted is up to each format builder (the custom format sends only
/// what was explicitly specified).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedParams {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub seed: Option<u64>,
    pub system_prompt: Option<String>,
}

fn clamp(value: Option<f64>, min: f64, max: f64) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| v.clamp(min, max))
}

fn clamp_round(value: Option<f64>, min: f64, max: f64) -> Option<u32> {
    clamp(value, min, max).map(|v| v.round() as u32)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(String::from)
}

impl ValidatedParams {
    /// Sanitize raw generation options
    pub fn sanitize(options: &crate::ai::client::CallOptions) -> Self {
        use ranges::*;

        // Seed must be a non-negative integer; negative values are dropped
        // rather than clamped.
        let seed = options
            .seed
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| s.round() as u64);

        Self {
            model: non_empty(&options.model),
            temperature: clamp(options.temperature, TEMPERATURE_MIN, TEMPERATURE_MAX),
            max_tokens: clamp_round(options.max_tokens, MAX_TOKENS_MIN, MAX_TOKENS_MAX),
            top_p: clamp(options.top_p, TOP_P_MIN, TOP_P_MAX),
            top_k: clamp_round(options.top_k, TOP_K_MIN, TOP_K_MAX),
            frequency_penalty: clamp(options.frequency_penalty, PENALTY_MIN, PENALTY_MAX),
            presence_penalty: clamp(options.presence_penalty, PENALTY_MIN, PENALTY_MAX),
            seed,
            system_prompt: non_empty(&options.system_prompt),
        }
    }
}
