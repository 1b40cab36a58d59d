use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_hostname: String,
    pub api_key: Option<String>,
    pub model: String,
    pub system_message: String,
    pub max_tokens: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_hostname =
            env::var("PARLEY_LLM_HOST").unwrap_or_else(|_| "https://api.openai.com".to_string());
        let api_key = env::var("OPENAI_API_KEY").ok();
        let model =
            env::var("PARLEY_LLM_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let system_message = env::var("PARLEY_SYSTEM_MESSAGE")
            .unwrap_or_else(|_| "You are a helpful assistant.".to_string());
        let max_tokens = env::var("PARLEY_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500);

        Self {
            api_hostname,
            api_key,
            model,
            system_message,
            max_tokens,
        }
    }
}
