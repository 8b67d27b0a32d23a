pub struct Env {
    pub jwt_secret: String,
    pub database_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub run_migrations: bool,
}

pub const SEARCH_MIN_QUERY_LEN: usize = 3;
pub const SEARCH_RESULT_LIMIT: i64 = 10;

pub const INVITE_CODE_LEN: usize = 12;
/// Unambiguous characters only (no 0/O, no 1/I).
pub const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set in .env file or environment variable");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        let run_migrations = std::env::var("RUN_MIGRATIONS")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .expect("RUN_MIGRATIONS must be true or false");
        Env { jwt_secret, database_url, frontend_url, ip, port, run_migrations }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
