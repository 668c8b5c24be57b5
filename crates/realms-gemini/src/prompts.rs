//! Prompt text and the response schema for scene generation.

use serde_json::{Value, json};

/// Behavioral instruction sent with every scene request.
pub const SYSTEM_INSTRUCTION: &str = "You are the Dungeon Master for an immersive text-based adventure game.
Your goal is to create vivid, engaging, and concise narratives.
Always respond with a valid JSON object representing the current scene.
The 'visualPrompt' field should be a descriptive prompt suitable for an AI image generator to visualize the scene (e.g., 'A dark ominous castle looming over a foggy cliff, digital art style').
Keep descriptions around 3-4 sentences. Provide 2-4 distinct choices for the player.";

/// Builds the user prompt for a scene request.
///
/// With no history the prompt opens the adventure; otherwise every history
/// entry is listed in order, followed by the latest action.
#[must_use]
pub fn scene_prompt(history: &[String], action: &str) -> String {
    if history.is_empty() {
        format!("Start the adventure. {action}")
    } else {
        format!(
            "Previous story context: {}\n\nUser's latest action: {action}",
            history.join("\n")
        )
    }
}

/// Schema the text model must follow; all four scene fields are required.
#[must_use]
pub fn scene_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "choices": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "visualPrompt": { "type": "STRING" }
        },
        "required": ["title", "description", "choices", "visualPrompt"]
    })
}
