use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PostboardConfig {
    pub hostname: String,
    pub port: u16,
    /// Base URL used when building pagination links.
    pub public_url: String,
    pub database: DatabaseConfig,
    pub blobs: BlobsConfig,
    #[serde(default)]
    pub posts: PostsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlobsConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostsConfig {
    /// Posts per listing page (default: 5)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Largest accepted image upload in kilobytes (default: 2048)
    #[serde(default = "default_max_image_kb")]
    pub max_image_kb: u64,
    /// Apply the create-time image type and size rules on update as well.
    #[serde(default)]
    pub validate_image_on_update: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Request body size limit (default: 10 MiB)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_per_page() -> u32 {
    5
}

fn default_max_image_kb() -> u64 {
    2048
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            max_image_kb: default_max_image_kb(),
            validate_image_on_update: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl PostboardConfig {
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("POSTBOARD_").split("__"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_sections() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "postboard.toml",
                r#"
                hostname = "localhost"
                port = 8000
                public_url = "http://localhost:8000"

                [database]
                url = "sqlite://data/postboard.db?mode=rwc"

                [blobs]
                path = "data/blobs"
                "#,
            )?;

            let config = PostboardConfig::load("postboard.toml")?;
            assert_eq!(config.posts.per_page, 5);
            assert_eq!(config.posts.max_image_kb, 2048);
            assert!(!config.posts.validate_image_on_update);
            assert_eq!(config.server.body_limit_bytes, 10 * 1024 * 1024);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "postboard.toml",
                r#"
                hostname = "localhost"
                port = 8000
                public_url = "http://localhost:8000"

                [database]
                url = "sqlite::memory:"

                [blobs]
                "#,
            )?;
            jail.set_env("POSTBOARD_PORT", "9100");
            jail.set_env("POSTBOARD_POSTS__PER_PAGE", "10");

            let config = PostboardConfig::load("postboard.toml")?;
            assert_eq!(config.port, 9100);
            assert_eq!(config.posts.per_page, 10);
            assert!(config.blobs.path.is_none());
            Ok(())
        });
    }
}
