mod common;

use blog_service::db::{comment_repo, post_repo, SERVICE_NAME};
use blog_service::models::{PostPatch, PostUpdate, DEFAULT_AUTHOR};
use blog_service::services::{CommentService, CommentStore, PostService, PostStore};
use chrono::{Duration, Utc};
use common::{new_comment, new_post, test_pool};

#[tokio::test]
async fn create_forces_admin_author_and_no_updated_date() {
    let posts = PostService::new(test_pool().await);

    let created = posts.create(new_post("Hello", "World")).await.unwrap();
    assert_eq!(created.post.author, DEFAULT_AUTHOR);
    assert_eq!(created.post.title, "Hello");
    assert!(created.post.updated_date.is_none());
    assert!(created.comments.is_empty());

    let loaded = posts.get_by_id(created.post.id).await.unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn get_all_is_newest_first_with_comments() {
    let pool = test_pool().await;
    let posts = PostService::new(pool.clone());
    let comments = CommentService::new(pool);

    let first = posts.create(new_post("first", "a")).await.unwrap();
    let second = posts.create(new_post("second", "b")).await.unwrap();
    let c1 = comments.create(first.post.id, new_comment("Ann", "one")).await.unwrap();
    let c2 = comments.create(first.post.id, new_comment("Bob", "two")).await.unwrap();

    let all = posts.get_all().await.unwrap();
    let ids: Vec<i64> = all.iter().map(|p| p.post.id).collect();
    assert_eq!(ids, vec![second.post.id, first.post.id]);

    assert!(all[0].comments.is_empty());
    let comment_ids: Vec<i64> = all[1].comments.iter().map(|c| c.id).collect();
    assert_eq!(comment_ids, vec![c2.id, c1.id]);
}

#[tokio::test]
async fn update_overwrites_and_stamps_updated_date() {
    let posts = PostService::new(test_pool().await);
    let created = posts.create(new_post("A", "B")).await.unwrap();

    let updated = posts
        .update(PostUpdate {
            id: created.post.id,
            title: "A".into(),
            content: "B2".into(),
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.post.title, "A");
    assert_eq!(updated.post.content, "B2");
    assert_eq!(updated.post.author, DEFAULT_AUTHOR);
    assert_eq!(updated.post.created_date, created.post.created_date);
    let stamped = updated.post.updated_date.expect("updated_date set");
    assert!(stamped >= created.post.created_date);
}

#[tokio::test]
async fn update_missing_post_returns_none() {
    let posts = PostService::new(test_pool().await);

    let result = posts
        .update(PostUpdate {
            id: 404,
            title: "t".into(),
            content: "c".into(),
        })
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn patch_applies_only_non_blank_fields() {
    let posts = PostService::new(test_pool().await);
    let created = posts.create(new_post("A", "B")).await.unwrap();

    let patched = posts
        .patch(
            created.post.id,
            PostPatch {
                title: Some("".into()),
                content: Some("C".into()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.post.title, "A");
    assert_eq!(patched.post.content, "C");
    assert!(patched.post.updated_date.is_some());

    let untouched = posts
        .patch(
            created.post.id,
            PostPatch {
                title: Some("   ".into()),
                content: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.post.title, "A");
    assert_eq!(untouched.post.content, "C");
    assert!(untouched.post.updated_date >= patched.post.updated_date);
}

#[tokio::test]
async fn patch_missing_post_returns_none() {
    let posts = PostService::new(test_pool().await);
    let result = posts.patch(9, PostPatch::default()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_reports_absence_and_cascades() {
    let pool = test_pool().await;
    let posts = PostService::new(pool.clone());
    let comments = CommentService::new(pool);

    assert!(!posts.delete(1).await.unwrap());

    let created = posts.create(new_post("gone", "soon")).await.unwrap();
    let comment = comments
        .create(created.post.id, new_comment("Ann", "hi"))
        .await
        .unwrap();

    assert!(posts.exists(created.post.id).await.unwrap());
    assert!(posts.delete(created.post.id).await.unwrap());
    assert!(!posts.exists(created.post.id).await.unwrap());
    assert!(posts.get_by_id(created.post.id).await.unwrap().is_none());
    assert!(!comments.exists(comment.id).await.unwrap());
}

#[tokio::test]
async fn get_all_orders_by_created_date_not_id() {
    let pool = test_pool().await;
    let now = Utc::now();

    // Rows are inserted newest first, so ids run opposite to creation time.
    let (newer, older, newer_comment, older_comment) = {
        let mut conn = pool.acquire().await.unwrap();
        let newer = post_repo::insert_post(&mut conn, "newer", "n", DEFAULT_AUTHOR, now)
            .await
            .unwrap();
        let older = post_repo::insert_post(
            &mut conn,
            "older",
            "o",
            DEFAULT_AUTHOR,
            now - Duration::seconds(10),
        )
        .await
        .unwrap();
        let newer_comment = comment_repo::insert_comment(
            &mut conn,
            newer.id,
            "Ann",
            "ann@example.com",
            "first written, newest",
            now,
        )
        .await
        .unwrap();
        let older_comment = comment_repo::insert_comment(
            &mut conn,
            newer.id,
            "Bob",
            "bob@example.com",
            "backdated",
            now - Duration::seconds(30),
        )
        .await
        .unwrap();
        (newer.id, older.id, newer_comment.id, older_comment.id)
    };
    assert!(newer < older);
    assert!(newer_comment < older_comment);

    let posts = PostService::new(pool);
    let all = posts.get_all().await.unwrap();
    let ids: Vec<i64> = all.iter().map(|p| p.post.id).collect();
    assert_eq!(ids, vec![newer, older]);

    let comment_ids: Vec<i64> = all[0].comments.iter().map(|c| c.id).collect();
    assert_eq!(comment_ids, vec![newer_comment, older_comment]);
}

#[tokio::test]
async fn store_calls_record_pool_acquire_latency() {
    let posts = PostService::new(test_pool().await);
    posts.create(new_post("metered", "body")).await.unwrap();
    posts.get_all().await.unwrap();

    let families = prometheus::gather();
    let acquire = families
        .iter()
        .find(|mf| mf.get_name() == "db_pool_acquire_duration_seconds")
        .expect("acquire histogram registered");

    let observed = acquire.get_metric().iter().any(|m| {
        m.get_label()
            .iter()
            .any(|l| l.get_name() == "service" && l.get_value() == SERVICE_NAME)
            && m.get_histogram().get_sample_count() >= 2
    });
    assert!(observed, "store calls should go through the metered acquire");
}
