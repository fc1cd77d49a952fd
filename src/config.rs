use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub jwt_secret: String,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_advisory_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Days past its end date before a pending request is swept to expired.
    pub expire_pending_after_days: u32,
    /// Capacity of the transition-event broadcast channel.
    pub event_channel_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            rate_submit_per_min: env::var("RATE_SUBMIT_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_advisory_per_min: env::var("RATE_ADVISORY_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            expire_pending_after_days: env::var("EXPIRE_PENDING_AFTER_DAYS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap(),
            event_channel_capacity: env::var("EVENT_CHANNEL_CAPACITY")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .unwrap(),
        }
    }
}
