//! Prompt builders for the suggestion generator.
//!
//! Both prompts embed up to [`MAX_HISTORY_LINES`] recent feedback lines
//! (newest first) and today's environment, then instruct the model to emit
//! a fixed number of plain English lines that the parsers in
//! [`crate::suggestion`] can consume positionally.

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Maximum feedback history lines embedded in a prompt.
pub const MAX_HISTORY_LINES: usize = 10;

/// Today's environment as supplied by the dashboard. Not persisted.
///
/// `rain_pop` and `weather_desc` are only meaningful for outfit prompts.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSnapshot {
    pub aqi: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub rain_pop: Option<f64>,
    pub weather_desc: Option<String>,
}

/// One past feedback submission, flattened for prompt building.
///
/// Every field is optional: users skip questions, and older records predate
/// newer form fields. Absent data simply drops out of the history line.
#[derive(Debug, Clone, Default)]
pub struct FeedbackSnapshot {
    /// Submission date, already formatted for display.
    pub date: Option<String>,
    pub env_aqi: Option<f64>,
    pub env_temp_min: Option<f64>,
    pub env_temp_max: Option<f64>,
    pub allergy_feel: Option<String>,
    /// Self-reported allergy impact, out of 10.
    pub allergy_impact: Option<i32>,
    pub allergy_symptoms: Vec<String>,
    pub outfit_top: Option<String>,
    pub outfit_outer: Option<String>,
    pub outfit_bottom: Option<String>,
    /// How the outfit felt temperature-wise (e.g. "too warm").
    pub temp_feel: Option<String>,
    /// What the user wanted to change about the outfit.
    pub desired_change: Option<String>,
    /// Outfit comfort rating, out of 5.
    pub outfit_rating: Option<i32>,
}

// ---------------------------------------------------------------------------
// History lines
// ---------------------------------------------------------------------------

/// Render one allergy history line, or `None` when the record carries
/// nothing worth mentioning.
fn allergy_history_line(fb: &FeedbackSnapshot) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(date) = &fb.date {
        parts.push(format!("Date: {date}"));
    }
    if let Some(aqi) = fb.env_aqi {
        parts.push(format!("AQI={aqi}"));
    }
    if let (Some(min), Some(max)) = (fb.env_temp_min, fb.env_temp_max) {
        parts.push(format!("T={min}~{max}°C"));
    }
    if let Some(feel) = fb.allergy_feel.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("allergy_feel={feel}"));
    }
    if let Some(impact) = fb.allergy_impact {
        parts.push(format!("impact={impact}/10"));
    }
    if !fb.allergy_symptoms.is_empty() {
        parts.push(format!("symptoms={}", fb.allergy_symptoms.join(",")));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("- {}", parts.join("; ")))
    }
}

/// Render one outfit history line, or `None` when the record is empty.
fn outfit_history_line(fb: &FeedbackSnapshot) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(date) = &fb.date {
        parts.push(format!("Date: {date}"));
    }
    if let (Some(min), Some(max)) = (fb.env_temp_min, fb.env_temp_max) {
        parts.push(format!("T={min}~{max}°C"));
    }
    if let Some(aqi) = fb.env_aqi {
        parts.push(format!("AQI={aqi}"));
    }
    let pieces: Vec<&str> = [&fb.outfit_top, &fb.outfit_outer, &fb.outfit_bottom]
        .into_iter()
        .filter_map(|piece| piece.as_deref())
        .filter(|piece| !piece.is_empty())
        .collect();
    if !pieces.is_empty() {
        parts.push(format!("outfit={}", pieces.join("/")));
    }
    if let Some(feel) = fb.temp_feel.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("felt={feel}"));
    }
    if let Some(wanted) = fb.desired_change.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("wanted={wanted}"));
    }
    if let Some(feel) = fb.allergy_feel.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("allergy_feel={feel}"));
    }
    if let Some(impact) = fb.allergy_impact {
        parts.push(format!("impact={impact}/10"));
    }
    if let Some(rating) = fb.outfit_rating {
        parts.push(format!("rating={rating}/5"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("- {}", parts.join("; ")))
    }
}

/// Join up to [`MAX_HISTORY_LINES`] rendered lines into the history block.
fn history_block(
    history: &[FeedbackSnapshot],
    render: fn(&FeedbackSnapshot) -> Option<String>,
) -> String {
    let lines: Vec<String> = history
        .iter()
        .take(MAX_HISTORY_LINES)
        .filter_map(render)
        .collect();
    if lines.is_empty() {
        "No previous feedback records.".to_string()
    } else {
        lines.join("\n")
    }
}

/// Render the "today environment" block shared by both prompts.
fn today_block(lines: Vec<String>) -> String {
    if lines.is_empty() {
        "No environment info.".to_string()
    } else {
        lines.join("\n")
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Build the allergy-suggestion prompt.
pub fn build_allergy_prompt(history: &[FeedbackSnapshot], env: &EnvironmentSnapshot) -> String {
    let mut env_lines = Vec::new();
    if let Some(aqi) = env.aqi {
        env_lines.push(format!("- Today AQI: {aqi}"));
    }
    if let (Some(min), Some(max)) = (env.temp_min, env.temp_max) {
        env_lines.push(format!("- Today temperature range: {min}°C ~ {max}°C"));
    }

    format!(
        "You are an allergy assistant for a weather and outfit recommendation dashboard.\n\
         \n\
         Your job is to give practical, concise advice about what the user should pay\n\
         attention to **when going outside today**, based on:\n\
         - Their recent allergy history\n\
         - Today's air quality and temperature\n\
         \n\
         Always respond **in English only**.\n\
         Do NOT use any Chinese characters.\n\
         \n\
         User history:\n\
         {history}\n\
         \n\
         Today environment:\n\
         {today}\n\
         \n\
         Task:\n\
         Based on the history and today's environment, give EXACTLY FIVE short\n\
         bullet-point suggestions about what the user should be careful about\n\
         when going outside today (e.g., mask, timing of going out, outdoor\n\
         activities, clothing, eye/nose protection, medicine preparation, etc.).\n\
         \n\
         Each suggestion must:\n\
         - be ONE English sentence\n\
         - be specific and practical\n\
         - be suitable to show directly on a dashboard card\n\
         - not include numbering (no \"1.\", \"2.\", \"First,\" etc.)\n\
         \n\
         Output format:\n\
         Return exactly five lines.\n\
         Each line is one suggestion sentence.\n\
         Do not add any other text before or after the five lines.",
        history = history_block(history, allergy_history_line),
        today = today_block(env_lines),
    )
}

/// Build the outfit-suggestion prompt.
pub fn build_outfit_prompt(history: &[FeedbackSnapshot], env: &EnvironmentSnapshot) -> String {
    let mut env_lines = Vec::new();
    if let (Some(min), Some(max)) = (env.temp_min, env.temp_max) {
        env_lines.push(format!("- Today temperature range: {min}°C ~ {max}°C"));
    }
    if let Some(pop) = env.rain_pop {
        env_lines.push(format!("- Rain probability: {pop}%"));
    }
    if let Some(desc) = env.weather_desc.as_deref().filter(|s| !s.is_empty()) {
        env_lines.push(format!("- Weather: {desc}"));
    }
    if let Some(aqi) = env.aqi {
        env_lines.push(format!("- Today AQI: {aqi}"));
    }

    format!(
        "You are an outfit assistant for a weather and outfit recommendation dashboard.\n\
         \n\
         Your job is to recommend what the user should wear **when going outside\n\
         today**, based on:\n\
         - Their recent outfit feedback history\n\
         - Today's temperature, rain probability, weather and air quality\n\
         \n\
         Always respond **in English only**.\n\
         Do NOT use any Chinese characters.\n\
         \n\
         User history:\n\
         {history}\n\
         \n\
         Today environment:\n\
         {today}\n\
         \n\
         Task:\n\
         Recommend ONE outfit for going outside today, taking the history into\n\
         account (avoid repeating combinations the user rated poorly or wanted\n\
         to change).\n\
         \n\
         Output format:\n\
         Return EXACTLY FOUR lines, in this order:\n\
         topwear recommendation\n\
         outerwear recommendation\n\
         bottomwear recommendation\n\
         one short practical note for today's outfit\n\
         \n\
         Each line is ONE short English sentence suitable for a dashboard card.\n\
         Do not number or label the lines.\n\
         Do not add any other text before or after the four lines.",
        history = history_block(history, outfit_history_line),
        today = today_block(env_lines),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
