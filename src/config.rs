use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        google_api_key: get_env("GOOGLE_API_KEY"),
        google_cse_id: get_env("GOOGLE_CSE_ID"),
        openrouter_api_key: get_env("OPENROUTER_API_KEY"),
        openrouter_base_url: get_env_or_default(
            "OPENROUTER_BASE_URL",
            "https://openrouter.ai/api/v1",
        ),
        mongo_uri: get_env("MONGO_URI"),
        mongo_db_name: get_env_or_default("MONGO_DB_NAME", "pandu"),
    }
});

pub struct Config {
    pub google_api_key: String,
    pub google_cse_id: String,
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub mongo_uri: String,
    pub mongo_db_name: String,
}

fn get_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("Missing required environment variable: {key}"))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
