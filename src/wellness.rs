//! The application's AI features, each a prompt template sent through the
//! proxy plus the interpretation of what comes back.

use crate::{
    client::{ClientError, ProxyClient},
    gemini::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Model, Role,
        Source, Tool,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

const DAILY_THOUGHT_PROMPT: &str = "You are an empathetic, nurturing voice for new mothers. Your task is to provide a single, short, and powerful affirmation or supportive thought for the day. Start your response with a positive, encouraging phrase like 'Your strength shines through.' or 'You are doing amazing.'. Keep the total message under 20 words.";
const DAILY_THOUGHT_QUERY: &str =
    "Generate a powerful and encouraging thought of the day for a new mother.";
const DAILY_THOUGHT_FALLBACK: &str = "You are doing amazing. Rest, and let love guide you.";
const DAILY_THOUGHT_OFFLINE: &str = "Self-care is not selfish, it is sacred.";

const CARE_PLAN_PROMPT: &str = r#"You are a warm, empathetic "Dai" (traditional midwife/caregiver) AI specializing in Indian Vedic and Ayurvedic postpartum wellness. Your goal is to provide supportive, concise, and culturally relevant advice. Based on the user's description, provide a 3-part plan (Food, Body, Mind) using traditional Indian and Ayurvedic concepts.
**Structure the output strictly as follows:**
1.  **Based on your description...** (A brief, empathetic acknowledgement of their state, using nurturing language)
2.  **Food (Ahara):** Provide 2-3 specific, warming, and easily digestible food recommendations (e.g., moong dal khichdi, haldi doodh, dry fruit laddoo).
3.  **Body (Vihara):** Provide 2-3 recommendations for physical comfort or routine (e.g., oil massage (abhyanga), warm water baths, gentle yoga).
4.  **Mind (Mana):** Provide 2-3 recommendations for emotional/mental peace (e.g., a simple breathing exercise, a culturally relevant mantra, quiet time).
The tone must be encouraging and nurturing."#;
const CARE_PLAN_FALLBACK: &str =
    "Sorry, I couldn't generate a plan right now. Please try again later.";

const MOOD_PROMPT: &str = "Analyze the user's journal entry for overall emotional state (mood) and provide a concise, empathetic, and culturally sensitive single-sentence insight or observation based on the content. The mood should be a single word (e.g., 'Tired', 'Anxious', 'Joyful').";
const MOOD_FALLBACK: &str = "Reflective";
const MOOD_INSIGHT_FALLBACK: &str = "It takes courage to write your feelings. Keep going.";

const PEER_MATCH_PROMPT: &str = r#"You are an empathetic, anonymous mother (Peer Mom) who has been matched with another new mother based on their current problem. Your goal is to start a supportive, culturally sensitive, and non-judgemental conversation.
Based on the details below, craft a first message (1-2 paragraphs) that:
1. Acknowledges their specific problem and emotional state.
2. Shares a brief, relatable struggle (real or fictional) to build rapport.
3. Ends with an open-ended question to encourage the new mom to share more.
Do NOT introduce yourself as an AI. Sign off simply as "Peer Mom.""#;
const PEER_MATCH_FALLBACK: &str = "Hello. I am here to listen. Tell me more about your day.";
const PEER_MATCH_OFFLINE: &str = "I understand you are having a tough time. It's okay to feel this way. What is the one thing you wish someone could help you with right now?";

const PEER_REPLY_PROMPT: &str = "You are an empathetic Peer Mom in an anonymous chat. Now, provide a short, supportive, and conversational reply (2-3 sentences max) to the user's latest message. Offer validation, a piece of simple advice, or ask a follow-up question. Do not introduce yourself or sign off. Keep the tone gentle.";
const PEER_REPLY_FALLBACK: &str = "That sounds incredibly hard. I'm here for you.";
const PEER_REPLY_OFFLINE: &str = "Oops! The connection dropped. I still support you, though!";

pub const MIN_CARE_PLAN_QUERY: usize = 10;
pub const MIN_JOURNAL_ENTRY: usize = 5;
pub const MIN_PEER_PROBLEM: usize = 10;

#[derive(Debug, Error)]
pub enum WellnessError {
    #[error("{field} must be at least {min} characters")]
    InputTooShort { field: &'static str, min: usize },
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarePlan {
    pub text: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodAnalysis {
    pub mood: String,
    pub insight: String,
}

impl MoodAnalysis {
    fn fallback() -> Self {
        Self {
            mood: MOOD_FALLBACK.to_string(),
            insight: MOOD_INSIGHT_FALLBACK.to_string(),
        }
    }
}

/// What a mother shares when asking to be matched with a peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchProfile {
    pub mood: String,
    pub health: String,
    pub problem: String,
    pub preference: String,
}

fn require_len(value: &str, field: &'static str, min: usize) -> Result<(), WellnessError> {
    if value.trim().chars().count() < min {
        return Err(WellnessError::InputTooShort { field, min });
    }
    Ok(())
}

fn strip_quotes(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '\u{201c}' | '\u{201d}'))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Assistant {
    client: ProxyClient,
    api_url: String,
}

impl Assistant {
    #[must_use]
    pub fn new(client: ProxyClient) -> Self {
        Self::with_model(client, Model::default())
    }

    #[must_use]
    pub fn with_model(client: ProxyClient, model: Model) -> Self {
        Self::with_api_url(client, model.url())
    }

    #[must_use]
    pub fn with_api_url(client: ProxyClient, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        self.client.call_upstream_as(&self.api_url, request).await
    }

    /// A short affirmation addressed to `name`. Never fails: upstream problems
    /// yield a fixed encouragement instead.
    pub async fn daily_thought(&self, name: &str) -> String {
        let request =
            GenerateContentRequest::new(DAILY_THOUGHT_PROMPT, vec![Content::text(DAILY_THOUGHT_QUERY)]);

        let thought = match self.generate(&request).await {
            Ok(response) => response
                .first_text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DAILY_THOUGHT_FALLBACK)
                .to_string(),
            Err(e) => {
                error!("Error generating daily thought: {e}");
                DAILY_THOUGHT_OFFLINE.to_string()
            }
        };
        format!("Hello {name}, You got this. {}", strip_quotes(&thought))
    }

    /// A three-part Food/Body/Mind plan for the described state.
    pub async fn care_plan(&self, query: &str) -> Result<CarePlan, WellnessError> {
        require_len(query, "query", MIN_CARE_PLAN_QUERY)?;

        let mut request = GenerateContentRequest::new(
            CARE_PLAN_PROMPT,
            vec![Content::text(format!("My current state is: \"{}\"", query.trim()))],
        );
        request.tools = Some(vec![Tool::GoogleSearch {}]);

        let response = self.generate(&request).await.inspect_err(|e| {
            error!("Error generating care plan: {e}");
        })?;
        let text = response
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(CARE_PLAN_FALLBACK)
            .to_string();
        Ok(CarePlan {
            text,
            sources: response.sources(),
        })
    }

    /// Single-word mood and a one-sentence insight for a journal entry.
    /// Falls back to a neutral reading when the model output is unusable.
    pub async fn analyze_mood(&self, entry: &str) -> Result<MoodAnalysis, WellnessError> {
        require_len(entry, "entry", MIN_JOURNAL_ENTRY)?;

        let mut request = GenerateContentRequest::new(
            MOOD_PROMPT,
            vec![Content::text(format!(
                "Analyze the following journal entry written by a new mother: \"{}\"",
                entry.trim()
            ))],
        );
        request.generation_config = Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(json!({
                "type": "OBJECT",
                "properties": {
                    "mood": { "type": "STRING", "description": "The primary single-word mood detected." },
                    "insight": { "type": "STRING", "description": "A single, supportive sentence of insight based on the entry." }
                },
                "propertyOrdering": ["mood", "insight"]
            })),
        });

        let analysis = match self.generate(&request).await {
            Ok(response) => match response.first_text().map(serde_json::from_str::<MoodAnalysis>) {
                Some(Ok(analysis)) => analysis,
                Some(Err(e)) => {
                    warn!("Mood analysis was not valid JSON: {e}");
                    MoodAnalysis::fallback()
                }
                None => {
                    warn!("Mood analysis response had no text");
                    MoodAnalysis::fallback()
                }
            },
            Err(e) => {
                error!("AI mood analysis error: {e}");
                MoodAnalysis::fallback()
            }
        };
        Ok(analysis)
    }

    #[must_use]
    pub fn peer_chat(&self) -> PeerChat {
        PeerChat {
            assistant: self.clone(),
            history: Vec::new(),
        }
    }
}

/// One simulated peer conversation. The history lives here rather than in any
/// shared state and is dropped with the session.
#[derive(Debug, Clone)]
pub struct PeerChat {
    assistant: Assistant,
    history: Vec<Content>,
}

impl PeerChat {
    #[must_use]
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Resets the conversation and returns the peer's opening message.
    pub async fn start(&mut self, profile: &MatchProfile) -> Result<String, WellnessError> {
        require_len(&profile.problem, "problem", MIN_PEER_PROBLEM)?;
        self.history.clear();

        let query = format!(
            "My problem is: {}. My mood is {} and my health issue is {}. I want to talk to someone about: {}",
            profile.problem.trim(),
            profile.mood,
            profile.health,
            profile.preference.trim()
        );
        let request = GenerateContentRequest::new(PEER_MATCH_PROMPT, vec![Content::text(query)]);

        match self.assistant.generate(&request).await {
            Ok(response) => {
                let opening = response
                    .first_text()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or(PEER_MATCH_FALLBACK)
                    .to_string();
                self.history.push(Content::with_role(Role::Model, opening.clone()));
                Ok(opening)
            }
            Err(e) => {
                error!("AI chat generation error: {e}");
                Ok(PEER_MATCH_OFFLINE.to_string())
            }
        }
    }

    /// Sends the user's message with the whole conversation so far. Blank
    /// messages are ignored and return `None`.
    pub async fn reply(&mut self, message: &str) -> Option<String> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        self.history.push(Content::with_role(Role::User, message));

        let request = GenerateContentRequest::new(PEER_REPLY_PROMPT, self.history.clone());
        match self.assistant.generate(&request).await {
            Ok(response) => {
                let reply = response
                    .first_text()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or(PEER_REPLY_FALLBACK)
                    .to_string();
                self.history.push(Content::with_role(Role::Model, reply.clone()));
                Some(reply)
            }
            Err(e) => {
                error!("AI chat reply error: {e}");
                Some(PEER_REPLY_OFFLINE.to_string())
            }
        }
    }
}
