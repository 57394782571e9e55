#[derive(Debug, Clone, PartialEq)]
pub struct KFactorSchedule {
    pub provisional_matches: u32,
    pub provisional_k: f64,
    pub intermediate_ceiling: f64,
    pub intermediate_k: f64,
    pub advanced_ceiling: f64,
    pub advanced_k: f64,
    pub elite_k: f64,
}

impl Default for KFactorSchedule {
    fn default() -> Self {
        Self {
            provisional_matches: 30,
            provisional_k: 40.0,
            intermediate_ceiling: 2100.0,
            intermediate_k: 32.0,
            advanced_ceiling: 2400.0,
            advanced_k: 24.0,
            elite_k: 16.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub default_rating: f64,
    pub win_rate_spread: f64,
    pub k_factor: KFactorSchedule,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            default_rating: 1500.0,
            win_rate_spread: 500.0,
            k_factor: KFactorSchedule::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "tennis_stats.db".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bearer token for `/api/admin/*`; admin routes reject everything when unset
    pub admin_token: Option<String>,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            admin_token: None,
            default_page_size: 100,
            max_page_size: 1000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `DATABASE_PATH` and `ADMIN_TOKEN`
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database.path = path;
        }
        config.server.admin_token = std::env::var("ADMIN_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        config
    }
}
