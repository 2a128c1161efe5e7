// ABOUTME: Outline generation for the deckgen application
// ABOUTME: Builds tier prompts and asks a language model for slide outline text

use crate::errors::{DeckError, Result};
use crate::tier::Tier;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the caller wants the deck to be about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRequest {
    pub topic: String,
    /// Source material; takes priority over the topic when present
    pub text: String,
    pub num_slides: usize,
    pub style: String,
    pub complexity: String,
    pub audience: String,
    pub purpose: String,
    pub language: String,
    pub notes: String,
}

impl Default for ContentRequest {
    fn default() -> Self {
        Self {
            topic: String::new(),
            text: String::new(),
            num_slides: 5,
            style: "Professional, concise".to_string(),
            complexity: "Intermediate".to_string(),
            audience: "General Audience".to_string(),
            purpose: "Informative Presentation".to_string(),
            language: "English".to_string(),
            notes: String::new(),
        }
    }
}

impl ContentRequest {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Build the model prompt for one tier.
pub fn prompt_for(tier: Tier, request: &ContentRequest, author: &str, date: &str) -> String {
    let ContentRequest {
        topic,
        text,
        num_slides,
        style,
        complexity,
        audience,
        purpose,
        language,
        notes,
    } = request;
    let word_limit = if tier == Tier::Gold {
        "Each slide's content should be less than 100 words.\n"
    } else {
        ""
    };
    let header = format!(
        r#"You are an expert presentation designer.
Generate structured slide content for a PowerPoint presentation.
{word_limit}
Requirements:
- Topic: {topic}
- Target Audience: {audience}
- Purpose: {purpose}
- Number of Slides: {num_slides}
- Content Complexity: {complexity}
- Style/Tone: {style}
- Language: {language}
- Additional Notes: {notes}

Input Material:
{text}

Output Instructions:
Prioritize the Input Material. If the topic is unrelated to it, ignore the topic. If no material is provided, use the topic alone.
"#
    );

    let instructions = match tier {
        Tier::Silver => format!(
            r#"1. The first slide must be a Title Slide with the title {topic} and, if relevant, a subtitle.
2. From the second slide on, write clear bullet points.
3. Keep each slide focused (3-5 bullets).
4. Do not repeat the input verbatim; summarize and adapt.
5. Return the result exactly like:

Slide 1: Title Slide
- Title: {topic}
- Subtitle: {purpose}

Slide 2: [Title]
- Bullet 1
- Bullet 2
"#
        ),
        Tier::Gold => format!(
            r#"1. Slide 1 is the Title Slide with title, subtitle, author and date.
2. Content slides use bullets of the form '**Heading**: explanation' (3-5 per slide).
3. Use **bold** for key terms.
4. Return the result exactly like:

Slide 1: Title Slide
- Title: {topic}
- Subtitle: {purpose}
- Author: {author}
- Date: {date}
- Tagline: [optional tagline]

Slide 2: [Slide Title]
- **Bullet 1**: Explanation
- **Bullet 2**: Explanation
"#
        ),
        Tier::Platinum => format!(
            r#"1. Slide 1 is the Title Slide with title, subtitle, author, date and an optional tagline.
2. Content slides have meaningful titles and 3-5 bullets; use **bold** for key terms.
3. If questions arise naturally, add a slide titled 'Questions to Consider' with 3-5 questions.
4. Always include a 'Summary / Key Takeaways' slide with 4-6 bullets as the second-to-last slide.
5. When relevant, add one special slide after the summary: a Timeline ('Year: Description'), a Flow of 5 steps, or a Comparison ('**Aspect 1**: A - ..., B - ...').
6. End with a 'Thank You' slide.
7. No slide may exceed 70 words.
Return the result exactly like:

Slide 1: Title Slide
- Title: {topic}
- Subtitle: {purpose}
- Author: {author}
- Date: {date}
- Tagline: [optional tagline]

Slide 2: [Slide Title]
- **Bullet 1**: Explanation

Slide N-1: Summary / Key Takeaways
- **Key Point 1**
"#
        ),
    };
    header + &instructions
}

/// Anything that can turn a request into outline text.
pub trait ContentGenerator {
    fn generate(&self, tier: Tier, request: &ContentRequest) -> Result<String>;
}

/// Connection and request settings for [`GeminiGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub api_key: String,
    pub endpoint: url::Url,
    pub model: String,
    pub temperature: f32,
    pub timeout_ms: u64,
    pub max_attempts: u32,
    /// Printed on the generated title slide
    pub author: String,
    pub date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponsePart {
    text: String,
}

/// Generator backed by the Generative Language REST API.
pub struct GeminiGenerator {
    settings: GeneratorSettings,
    client: Client,
}

impl GeminiGenerator {
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;
        Ok(Self { settings, client })
    }

    fn url(&self) -> Result<url::Url> {
        let base = self.settings.endpoint.as_str().trim_end_matches('/');
        let mut url = url::Url::parse(&format!(
            "{}/models/{}:generateContent",
            base, self.settings.model
        ))
        .map_err(|e| DeckError::ConfigError(format!("Invalid model URL: {}", e)))?;
        url.query_pairs_mut().append_pair("key", &self.settings.api_key);
        Ok(url)
    }

    fn send(&self, url: &url::Url, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
            },
        };

        let response = self.client.post(url.clone()).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeckError::GenerationError(format!("HTTP error: {}", status)));
        }

        let parsed: GenerateResponse = response.json()?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(DeckError::GenerationError(
                "Model returned no text".to_string(),
            ));
        }
        Ok(text)
    }
}

impl ContentGenerator for GeminiGenerator {
    fn generate(&self, tier: Tier, request: &ContentRequest) -> Result<String> {
        let prompt = prompt_for(tier, request, &self.settings.author, &self.settings.date);
        let url = self.url()?;
        info!(
            "Requesting {} outline from model {}",
            tier, self.settings.model
        );
        debug!("Prompt is {} characters", prompt.len());

        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=self.settings.max_attempts {
            match self.send(&url, &prompt) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("Generation attempt {} failed: {}", attempt, e);
                    last_error = Some(e);
                }
            }

            if attempt < self.settings.max_attempts {
                info!("Retrying in {} ms", retry_delay);
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::GenerationError("Unknown error generating content".to_string())
        }))
    }
}

/// Returns the same outline for every request.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    outline: String,
}

impl StaticGenerator {
    pub fn new(outline: impl Into<String>) -> Self {
        Self {
            outline: outline.into(),
        }
    }
}

impl ContentGenerator for StaticGenerator {
    fn generate(&self, _tier: Tier, _request: &ContentRequest) -> Result<String> {
        Ok(self.outline.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platinum_prompt_asks_for_special_slides() {
        let request = ContentRequest::new("Rust");
        let prompt = prompt_for(Tier::Platinum, &request, "Ada", "May 1, 2024");
        assert!(prompt.contains("Summary / Key Takeaways"));
        assert!(prompt.contains("- Author: Ada"));
        assert!(prompt.contains("- Number of Slides: 5"));
    }

    #[test]
    fn silver_prompt_has_no_author_line() {
        let prompt = prompt_for(Tier::Silver, &ContentRequest::new("Rust"), "Ada", "today");
        assert!(!prompt.contains("Author:"));
        assert!(prompt.contains("Slide 1: Title Slide"));
    }

    #[test]
    fn gold_prompt_has_word_limit_and_title_block() {
        let request = ContentRequest::new("Rust").with_text("Ownership notes");
        let prompt = prompt_for(Tier::Gold, &request, "Ada", "May 1, 2024");
        assert!(prompt.contains(
            "for a PowerPoint presentation.\nEach slide's content should be less than 100 words.\n\nRequirements:"
        ));
        assert!(prompt.contains("Input Material:\nOwnership notes\n"));
        assert!(prompt.contains(
            "- Title: Rust\n- Subtitle: Informative Presentation\n- Author: Ada\n- Date: May 1, 2024\n"
        ));
        assert!(prompt.ends_with("- **Bullet 2**: Explanation\n"));

        let silver = prompt_for(Tier::Silver, &request, "Ada", "May 1, 2024");
        assert!(!silver.contains("less than 100 words"));
    }

    #[test]
    fn request_defaults_fill_missing_json_fields() {
        let request: ContentRequest = serde_json::from_str(r#"{"topic": "Rust"}"#).unwrap();
        assert_eq!(request.num_slides, 5);
        assert_eq!(request.language, "English");
        assert_eq!(request.topic, "Rust");
    }

    #[test]
    fn response_text_parts_are_read() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Slide 1: A"},{"text":"\n- b"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates[0].content.parts.len(), 2);
    }
}
