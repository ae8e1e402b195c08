use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub profiles_collection: String,
    pub performance_collection: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "mastery-local".to_string()),
            profiles_collection: env::var("PROFILES_COLLECTION")
                .unwrap_or_else(|_| "progression_profiles".to_string()),
            performance_collection: env::var("PERFORMANCE_COLLECTION")
                .unwrap_or_else(|_| "topic_performance".to_string()),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "mastery-test".to_string(),
            profiles_collection: "progression_profiles".to_string(),
            performance_collection: "topic_performance".to_string(),
        }
    }
}
