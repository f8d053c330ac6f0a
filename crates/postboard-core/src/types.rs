use serde::{Deserialize, Serialize};

/// Blob namespace holding post images.
pub const POSTS_NAMESPACE: &str = "posts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Name of the image blob in the `posts` namespace.
    pub image: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image: String,
}

/// Fields written by an update. `image` stays untouched when `None`.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

/// One page of posts plus the total row count.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub items: Vec<Post>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl PostPage {
    /// Number of the last page; at least 1 even when the table is empty.
    pub fn last_page(&self) -> u32 {
        if self.total == 0 || self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page as u64) as u32
    }

    /// 1-based position of the first item on this page, if any.
    pub fn from(&self) -> Option<u64> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.page as u64 - 1) * self.per_page as u64 + 1)
        }
    }

    /// 1-based position of the last item on this page, if any.
    pub fn to(&self) -> Option<u64> {
        self.from().map(|from| from + self.items.len() as u64 - 1)
    }
}
