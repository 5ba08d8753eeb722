/// Default record table.
const DEFAULT_GAMES_TABLE: &str = "games";
/// Default storage bucket for thumbnails.
const DEFAULT_THUMBNAILS_BUCKET: &str = "thumbnails";
/// Default backend request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project URL without a trailing slash, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
    /// Table holding game records.
    pub games_table: String,
    /// Bucket holding thumbnail images.
    pub thumbnails_bucket: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Build a config with default table, bucket, and timeout.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            games_table: DEFAULT_GAMES_TABLE.to_string(),
            thumbnails_bucket: DEFAULT_THUMBNAILS_BUCKET.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load backend configuration from environment variables.
    ///
    /// | Env Var                | Required | Default      |
    /// |------------------------|----------|--------------|
    /// | `SUPABASE_URL`         | **yes**  | --           |
    /// | `SUPABASE_ANON_KEY`    | **yes**  | --           |
    /// | `GAMES_TABLE`          | no       | `games`      |
    /// | `THUMBNAILS_BUCKET`    | no       | `thumbnails` |
    /// | `BACKEND_TIMEOUT_SECS` | no       | `15`         |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let url = std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set");
        assert!(!url.trim().is_empty(), "SUPABASE_URL must not be empty");

        let anon_key = std::env::var("SUPABASE_ANON_KEY").expect("SUPABASE_ANON_KEY must be set");
        assert!(!anon_key.is_empty(), "SUPABASE_ANON_KEY must not be empty");

        let mut config = Self::new(url, anon_key);

        if let Ok(table) = std::env::var("GAMES_TABLE") {
            config.games_table = table;
        }
        if let Ok(bucket) = std::env::var("THUMBNAILS_BUCKET") {
            config.thumbnails_bucket = bucket;
        }
        config.timeout_secs = std::env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("BACKEND_TIMEOUT_SECS must be a valid u64");

        config
    }
}
