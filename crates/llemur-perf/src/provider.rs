//! Provider and model selection

use crate::error::{PerfError, PerfResult};
use std::fmt;
use std::str::FromStr;

const OPENAI_MODELS: &[&str] = &["gpt-3.5-turbo", "gpt-4", "gpt-4o"];
const ANTHROPIC_MODELS: &[&str] = &["claude-v1", "claude-v1.3", "claude-v2"];

/// A model provider the prompt can be prepared for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
    /// Locally hosted model; any model id is accepted
    Local,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Local => "local",
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "ChatGPT",
            Provider::Anthropic => "Anthropic",
            Provider::Local => "local",
        }
    }

    /// Known models, or `None` when the provider accepts any id
    pub fn available_models(&self) -> Option<&'static [&'static str]> {
        match self {
            Provider::OpenAi => Some(OPENAI_MODELS),
            Provider::Anthropic => Some(ANTHROPIC_MODELS),
            Provider::Local => None,
        }
    }

    /// Check `model` against this provider.
    pub fn select(self, model: &str) -> PerfResult<ModelSelection> {
        let accepted = match self.available_models() {
            Some(models) => models.contains(&model),
            None => !model.trim().is_empty(),
        };

        if !accepted {
            let available = match self.available_models() {
                Some(models) => format!("[{}]", models.join(", ")),
                None => "any non-empty model id".to_string(),
            };
            return Err(PerfError::UnknownModel {
                provider: self.display_name().to_string(),
                model: model.to_string(),
                available,
            });
        }

        Ok(ModelSelection {
            provider: self,
            model: model.to_string(),
        })
    }
}

impl FromStr for Provider {
    type Err = PerfError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "local" => Ok(Provider::Local),
            other => Err(PerfError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated provider/model pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider: Provider,
    pub model: String,
}

impl ModelSelection {
    /// Parse the provider name and validate the model in one step.
    pub fn resolve(provider: &str, model: &str) -> PerfResult<Self> {
        provider.parse::<Provider>()?.select(model)
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}
