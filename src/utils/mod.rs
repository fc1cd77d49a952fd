pub mod score_cache;
pub mod working_days;
