use postboard_core::{NewPost, PostChanges, PostStore, PostboardError};
use postboard_storage_sqlite::SqlitePostStore;
use tempfile::TempDir;

async fn setup() -> (SqlitePostStore, TempDir) {
    let tempdir = TempDir::new().unwrap();
    let db_path = tempdir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let store = SqlitePostStore::connect(&db_url).await.unwrap();
    (store, tempdir)
}

fn new_post(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: format!("{title} body"),
        image: format!("{}.png", title.to_lowercase()),
    }
}

#[tokio::test]
async fn create_assigns_id() {
    let (store, _dir) = setup().await;
    let a = store.create_post(&new_post("First")).await.unwrap();
    let b = store.create_post(&new_post("Second")).await.unwrap();
    assert!(a.id > 0);
    assert!(b.id > a.id);
    assert_eq!(a.title, "First");
    assert_eq!(a.content, "First body");
    assert_eq!(a.image, "first.png");
    assert_eq!(a.created_at, a.updated_at);
}

#[tokio::test]
async fn get_nonexistent() {
    let (store, _dir) = setup().await;
    assert!(store.get_post(42).await.unwrap().is_none());
}

#[tokio::test]
async fn get_after_create() {
    let (store, _dir) = setup().await;
    let created = store.create_post(&new_post("Hello")).await.unwrap();
    let fetched = store.get_post(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_newest_first_five_per_page() {
    let (store, _dir) = setup().await;
    for i in 1..=7 {
        store.create_post(&new_post(&format!("P{i}"))).await.unwrap();
    }

    let first = store.list_posts(1, 5).await.unwrap();
    assert_eq!(first.total, 7);
    assert_eq!(first.items.len(), 5);
    let titles: Vec<_> = first.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["P7", "P6", "P5", "P4", "P3"]);

    let second = store.list_posts(2, 5).await.unwrap();
    let titles: Vec<_> = second.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["P2", "P1"]);
}

#[tokio::test]
async fn list_orders_by_created_at_not_id() {
    let (store, _dir) = setup().await;
    let old = store.create_post(&new_post("Old")).await.unwrap();
    let newer = store.create_post(&new_post("Newer")).await.unwrap();

    // Backdate the newer row so creation time disagrees with id order.
    sqlx::query("UPDATE posts SET created_at = '2000-01-01T00:00:00.000Z' WHERE id = ?")
        .bind(newer.id)
        .execute(store.pool())
        .await
        .unwrap();

    let page = store.list_posts(1, 5).await.unwrap();
    let ids: Vec<_> = page.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![old.id, newer.id]);
}

#[tokio::test]
async fn list_page_zero_reads_as_first() {
    let (store, _dir) = setup().await;
    store.create_post(&new_post("Only")).await.unwrap();
    let page = store.list_posts(0, 5).await.unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn list_past_end_is_empty() {
    let (store, _dir) = setup().await;
    store.create_post(&new_post("Only")).await.unwrap();
    let page = store.list_posts(3, 5).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn update_keeps_image_when_none() {
    let (store, _dir) = setup().await;
    let post = store.create_post(&new_post("Hello")).await.unwrap();

    let updated = store
        .update_post(
            post.id,
            &PostChanges {
                title: "Hi".into(),
                content: "World2".into(),
                image: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Hi");
    assert_eq!(updated.content, "World2");
    assert_eq!(updated.image, "hello.png");
    assert!(updated.updated_at >= post.updated_at);
}

#[tokio::test]
async fn update_replaces_image() {
    let (store, _dir) = setup().await;
    let post = store.create_post(&new_post("Hello")).await.unwrap();

    let updated = store
        .update_post(
            post.id,
            &PostChanges {
                title: "Hello".into(),
                content: "World".into(),
                image: Some("fresh.jpg".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.image, "fresh.jpg");
    assert_eq!(store.get_post(post.id).await.unwrap().unwrap().image, "fresh.jpg");
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let (store, _dir) = setup().await;
    let err = store
        .update_post(
            99,
            &PostChanges {
                title: "t".into(),
                content: "c".into(),
                image: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PostboardError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_record() {
    let (store, _dir) = setup().await;
    let post = store.create_post(&new_post("Doomed")).await.unwrap();
    store.delete_post(post.id).await.unwrap();
    assert!(store.get_post(post.id).await.unwrap().is_none());

    let err = store.delete_post(post.id).await.unwrap_err();
    assert!(matches!(err, PostboardError::NotFound(_)));
}
