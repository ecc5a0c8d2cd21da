/// Chat-completion services with a known endpoint and default model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Deepseek,
    Openai,
    Grok,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    /// Environment variable a front end may read the API key from.
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Deepseek => ProviderConfig {
                api_url: "https://api.deepseek.com/v1/chat/completions",
                model: "deepseek-chat",
                env_var: "DEEPSEEK_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-4o-mini",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Deepseek => "DeepSeek",
            Provider::Openai => "OpenAI",
            Provider::Grok => "Grok",
        }
    }
}
