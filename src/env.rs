fn get_int_env_with_default(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(value) => value.parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sentence_lab.db".to_string())
}

pub fn get_database_pool_size() -> u32 {
    get_int_env_with_default("DATABASE_POOL_SIZE", 8).clamp(1, u32::MAX as u64) as u32
}

pub fn get_default_page_size() -> i64 {
    get_int_env_with_default("DEFAULT_PAGE_SIZE", 20).min(i64::MAX as u64) as i64
}

pub fn get_maximum_page_size() -> i64 {
    get_int_env_with_default("MAXIMUM_PAGE_SIZE", 200).min(i64::MAX as u64) as i64
}
