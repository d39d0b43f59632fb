use std::fmt;

use serde::{Deserialize, Serialize};

/// Image prompt used when the provider returns no usable prompt.
pub const DEFAULT_IMAGE_PROMPT: &str =
    "minimalist abstract art, clean lines, pastel colors, high quality";

/// Errors reported by a [`ContentGenerator`].
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Missing or unusable configuration.
    #[error("generator config error: {0}")]
    Config(String),

    /// The provider call failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider answered without an image.
    #[error("provider returned no image")]
    NoImage,
}

/// Caption voice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Trustworthy, businesslike.
    #[default]
    Professional,
    /// Playful, friendly.
    Fun,
    /// Promotion-focused.
    Sales,
    /// Informative.
    Educational,
}

impl Tone {
    /// All tones in display order.
    pub const ALL: [Tone; 4] = [Tone::Professional, Tone::Fun, Tone::Sales, Tone::Educational];

    /// Phrase describing the tone inside a prompt.
    pub fn describe(self) -> &'static str {
        match self {
            Tone::Professional => "professional and trustworthy",
            Tone::Fun => "fun and friendly",
            Tone::Sales => "sales and promotion focused",
            Tone::Educational => "educational and informative",
        }
    }
}

/// Illustration style.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStyle {
    /// Clean line art.
    #[default]
    CleanLine,
    /// Abstract minimal.
    AbstractMinimal,
    /// Flat geometric shapes.
    GeometricFlat,
    /// Soft watercolor.
    SoftWatercolor,
    /// Vibrant pop art.
    PopArt,
    /// Free-form style description.
    Custom(String),
}

impl ImageStyle {
    /// Style phrase inserted into image prompts.
    pub fn describe(&self) -> &str {
        match self {
            ImageStyle::CleanLine => "Clean Line Art",
            ImageStyle::AbstractMinimal => "Abstract Minimal",
            ImageStyle::GeometricFlat => "Geometric Flat",
            ImageStyle::SoftWatercolor => "Soft Watercolor",
            ImageStyle::PopArt => "Vibrant Pop Art",
            ImageStyle::Custom(s) => s.as_str(),
        }
    }
}

/// Caption plus a prompt for the accompanying illustration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Post caption text.
    pub caption: String,
    /// Image prompt. Never empty; falls back to [`DEFAULT_IMAGE_PROMPT`].
    pub image_prompt: String,
}

/// Credentials and model names for a generation provider.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Provider credential.
    pub api_key: String,
    /// Model used by [`ContentGenerator::summarize`].
    pub text_model: String,
    /// Model used by [`ContentGenerator::illustrate`].
    pub image_model: String,
}

impl GeneratorConfig {
    /// Config with the default model names.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::Config("api key is empty".to_owned()));
        }
        Ok(Self {
            api_key,
            text_model: "gemini-2.5-flash".to_owned(),
            image_model: "imagen-4.0-generate-001".to_owned(),
        })
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"<redacted>")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

/// Text and image generation provider.
///
/// Calls may be slow and may fail. Implementations do not retry; callers decide.
pub trait ContentGenerator {
    /// Write a caption for `text` in `tone`, plus an illustration prompt.
    fn summarize(&self, text: &str, tone: Tone) -> Result<Summary, GenerationError>;

    /// Generate encoded image bytes for `prompt` in `style`.
    fn illustrate(&self, prompt: &str, style: &ImageStyle) -> Result<Vec<u8>, GenerationError>;

    /// Redraw the encoded `image` in `style`, guided by `prompt`.
    fn restyle(
        &self,
        image: &[u8],
        prompt: &str,
        style: &ImageStyle,
    ) -> Result<Vec<u8>, GenerationError>;
}

/// Prompt sent to the text model by [`ContentGenerator::summarize`] implementations.
pub fn caption_prompt(text: &str, tone: Tone) -> String {
    format!(
        "Task: Write a social media caption for this content.\n\
         Content: \"{text}\"\n\
         Tone: {tone}\n\
         Format: catchy headline, short paragraphs separated by blank lines, a call to action, \
         relevant hashtags at the end.\n\
         Return ONLY a JSON object: {{\"caption\": \"...\", \"imagePrompt\": \"...\"}}",
        tone = tone.describe()
    )
}

/// Prompt sent to the image model by [`ContentGenerator::illustrate`] implementations.
pub fn illustration_prompt(prompt: &str, style: &ImageStyle) -> String {
    format!(
        "{prompt}, style: {}, high quality, 8k resolution, aesthetic lighting",
        style.describe()
    )
}

/// Instruction sent with the source image by [`ContentGenerator::restyle`] implementations.
pub fn restyle_prompt(prompt: &str, style: &ImageStyle) -> String {
    format!("Redraw this image in {} style. {prompt}", style.describe())
        .trim_end()
        .to_owned()
}

#[derive(Deserialize)]
struct RawSummary {
    #[serde(default)]
    caption: Option<String>,
    #[serde(default, rename = "imagePrompt", alias = "image_prompt")]
    image_prompt: Option<String>,
}

fn strip_fences(raw: &str) -> &str {
    let s = raw.trim();
    let s = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```"))
        .unwrap_or(s);
    s.strip_suffix("```").unwrap_or(s).trim()
}

/// Parse a text-model reply into a [`Summary`].
///
/// Markdown code fences are removed first. A reply that is not a JSON object becomes the caption
/// verbatim, paired with [`DEFAULT_IMAGE_PROMPT`].
pub fn parse_summary_response(raw: &str) -> Summary {
    let body = strip_fences(raw);
    match serde_json::from_str::<RawSummary>(body) {
        Ok(r) => Summary {
            caption: r.caption.unwrap_or_default(),
            image_prompt: r
                .image_prompt
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_owned()),
        },
        Err(err) => {
            tracing::debug!(error = %err, "summary reply is not JSON, using it as the caption");
            Summary {
                caption: body.to_owned(),
                image_prompt: DEFAULT_IMAGE_PROMPT.to_owned(),
            }
        }
    }
}

/// In-memory generator returning fixed outputs, for tests and offline runs.
#[derive(Clone, Debug, Default)]
pub struct CannedGenerator {
    /// Raw text-model reply, fed through [`parse_summary_response`].
    pub reply: String,
    /// Bytes returned by `illustrate`; `None` reports [`GenerationError::NoImage`].
    pub image: Option<Vec<u8>>,
}

impl ContentGenerator for CannedGenerator {
    fn summarize(&self, text: &str, tone: Tone) -> Result<Summary, GenerationError> {
        if text.trim().is_empty() {
            return Err(GenerationError::Provider("content is empty".to_owned()));
        }
        tracing::debug!(tone = ?tone, chars = text.len(), "canned summary");
        Ok(parse_summary_response(&self.reply))
    }

    fn illustrate(&self, _prompt: &str, _style: &ImageStyle) -> Result<Vec<u8>, GenerationError> {
        self.image.clone().ok_or(GenerationError::NoImage)
    }

    fn restyle(
        &self,
        image: &[u8],
        _prompt: &str,
        _style: &ImageStyle,
    ) -> Result<Vec<u8>, GenerationError> {
        Ok(self.image.clone().unwrap_or_else(|| image.to_vec()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/generation.rs"]
mod tests;
