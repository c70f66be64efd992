use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use blog_store::config::StoreConfig;
use blog_store::framework::{ManualClock, StoreError};
use blog_store::lifecycle::BlogSystem;
use blog_store::model::{Post, PostCreate, PostId, User, UserCreate, UserId, UserStatus};
use blog_store::seed::load_demo_data;
use blog_store::services::{ServiceError, UserService};
use blog_store::store::mock::{create_mock_client, expect_request};
use blog_store::store::{Database, StoreActor};

fn clocked() -> (BlogSystem, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    let system = BlogSystem::with_clock(&StoreConfig::default(), Arc::new(clock.clone()));
    (system, clock)
}

/// A write that fails after several changes leaves nothing behind.
#[tokio::test]
async fn test_failed_write_rolls_back_every_change() {
    let (actor, client) = StoreActor::new(8, Database::default());
    let handle = tokio::spawn(actor.run());
    let users = UserService::new(client.clone());

    let result = client
        .write("half_finished", |uow| -> Result<(), StoreError> {
            let kim = uow.insert::<User>(UserCreate::new("kim", "kim@x.com", 30))?;
            uow.insert::<Post>(PostCreate {
                author_id: kim.id,
                title: "doomed".into(),
                content: None,
            })?;
            // Dangling author: the foreign key refuses it.
            uow.insert::<Post>(PostCreate {
                author_id: UserId(99),
                title: "orphan".into(),
                content: None,
            })?;
            Ok(())
        })
        .await;
    assert!(matches!(result, Err(StoreError::ConstraintViolation { .. })));

    assert_eq!(users.get_user_count().await.unwrap(), 0);
    assert!(matches!(
        users.get_user_by_email("kim@x.com".into()).await,
        Err(ServiceError::NotFound { .. })
    ));

    // The unique index was rolled back with the row.
    let kim = users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();
    assert_ne!(kim.id, UserId(1), "a rolled back insert keeps its id");

    drop(users);
    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_constraint_violations_change_nothing() {
    let system = BlogSystem::new(&StoreConfig::default());
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();

    let long_title = "t".repeat(201);
    let refused = system.posts.create_post(kim.id, long_title, None).await;
    assert!(matches!(refused, Err(ServiceError::ConstraintViolation(_))));
    assert_eq!(system.posts.get_total_post_count().await.unwrap(), 0);

    let long_name = "k".repeat(51);
    let refused = system.users.update_user(kim.id, long_name, None).await;
    assert!(matches!(refused, Err(ServiceError::ConstraintViolation(_))));
    assert_eq!(system.users.get_user(kim.id).await.unwrap(), kim);

    let missing_author = system.posts.create_post(UserId(42), "hello".into(), None).await;
    assert!(matches!(
        missing_author,
        Err(ServiceError::NotFound { entity: "User", .. })
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_updates_advance_updated_at_only() {
    let (system, clock) = clocked();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30).with_phone("010-0000-0000"))
        .await
        .unwrap();
    assert_eq!(kim.timestamps.created_at, kim.timestamps.updated_at);

    clock.advance(Duration::minutes(5));
    let renamed = system
        .users
        .update_user(kim.id, "kimberly".into(), None)
        .await
        .unwrap();
    assert_eq!(renamed.username, "kimberly");
    assert_eq!(renamed.phone_number, None);
    assert_eq!(renamed.timestamps.created_at, kim.timestamps.created_at);
    assert_eq!(
        renamed.timestamps.updated_at,
        kim.timestamps.created_at + Duration::minutes(5)
    );
    assert_eq!(system.users.get_user(kim.id).await.unwrap(), renamed);

    clock.advance(Duration::minutes(5));
    let with_phone = system
        .users
        .update_user(kim.id, "Kim".into(), Some("010-0000-0000".into()))
        .await
        .unwrap();
    assert!(with_phone.timestamps.updated_at > renamed.timestamps.updated_at);
    let fetched = system.users.get_user(kim.id).await.unwrap();
    assert_eq!(fetched.username, "Kim");
    assert_eq!(fetched.phone_number.as_deref(), Some("010-0000-0000"));
    assert_eq!(fetched, with_phone);

    // Same values again: nothing is written, even though time moved on.
    clock.advance(Duration::minutes(5));
    let unchanged = system
        .users
        .update_user(kim.id, "Kim".into(), Some("010-0000-0000".into()))
        .await
        .unwrap();
    assert_eq!(unchanged, with_phone);

    // A stalled clock still yields increasing stamps.
    let first = system.users.ban_user(kim.id).await.unwrap();
    let second = system.users.activate_user(kim.id).await.unwrap();
    assert!(second.timestamps.updated_at > first.timestamps.updated_at);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_time_range_queries() {
    let (system, clock) = clocked();
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();

    let mut posts = Vec::new();
    for day in 1..=3 {
        clock.set(start + Duration::days(day));
        posts.push(
            system
                .posts
                .create_post(kim.id, format!("day {day}"), None)
                .await
                .unwrap(),
        );
    }
    clock.set(start + Duration::days(4));
    let lee = system
        .users
        .create_user(UserCreate::new("lee", "lee@x.com", 40))
        .await
        .unwrap();

    let middle = system
        .posts
        .get_posts_by_period(posts[0].timestamps.created_at, posts[1].timestamps.created_at)
        .await
        .unwrap();
    assert_eq!(middle, posts[..2].to_vec());

    let backwards = system
        .posts
        .get_posts_by_period(start + Duration::days(3), start)
        .await;
    assert!(matches!(backwards, Err(ServiceError::ValidationError(_))));

    let joined = system.users.get_users_joined_after(start).await.unwrap();
    assert_eq!(joined, vec![lee.clone()]);

    let recent = system.users.get_recent_users().await.unwrap();
    let ids: Vec<UserId> = recent.iter().map(|u| u.id).collect();
    assert_eq!(ids, [lee.id, kim.id]);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_eager_fetches_carry_their_relations() {
    let system = BlogSystem::new(&StoreConfig::default());
    let data = load_demo_data(&system).await.unwrap();

    let first = &data.posts[0];
    let loaded = system.posts.get_post_with_comments(first.id).await.unwrap();
    assert_eq!(loaded.author.id, first.author_id);
    assert_eq!(loaded.comments.len(), 3);
    assert!(loaded
        .comments
        .windows(2)
        .all(|pair| pair[0].timestamps.created_at <= pair[1].timestamps.created_at));
    // Loading relations is not a view.
    assert_eq!(loaded.post.view_count, 0);

    let with_authors = system.comments.get_comments_with_authors(first.id).await.unwrap();
    assert_eq!(with_authors.len(), 3);
    for entry in &with_authors {
        assert_eq!(entry.post.id, first.id);
        assert_eq!(entry.author.id, entry.comment.user_id);
    }

    let author = system.users.get_user_with_posts(data.users[0].id).await.unwrap();
    assert_eq!(author.posts.len(), 2);
    assert!(author.posts.iter().all(|p| p.author_id == author.user.id));

    let published = system.posts.get_published_posts_with_author().await.unwrap();
    assert_eq!(published.len(), 4);
    assert!(published.iter().all(|p| p.post.published && p.author.id == p.post.author_id));

    assert!(matches!(
        system.posts.get_post_with_comments(PostId(99)).await,
        Err(ServiceError::NotFound { .. })
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delete_users_by_status_cascades_for_each() {
    let system = BlogSystem::new(&StoreConfig::default());
    let data = load_demo_data(&system).await.unwrap();
    let banned = [data.users[0].id, data.users[1].id];
    for id in banned {
        system.users.ban_user(id).await.unwrap();
    }

    let deleted = system
        .users
        .delete_users_by_status(UserStatus::Banned)
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    assert_eq!(system.users.get_user_count().await.unwrap(), 3);
    for id in banned {
        assert_eq!(system.posts.get_post_count_by_author(id).await.unwrap(), 0);
        assert_eq!(system.comments.count_comments_by_user(id).await.unwrap(), 0);
    }
    // bob's post keeps the comments from the remaining users.
    let bobs = system.posts.get_posts_by_author(data.users[2].id).await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(system.comments.count_comments_for_post(bobs[0].id).await.unwrap(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_dropped_request_surfaces_as_communication_error() {
    let (client, mut receiver) = create_mock_client(1);
    let users = UserService::new(client);

    let call = tokio::spawn(async move { users.get_user_count().await });
    let request = expect_request(&mut receiver).await.unwrap();
    assert_eq!(request.label(), "get_user_count");
    assert!(!request.is_write());
    drop(request);

    assert!(matches!(
        call.await.unwrap(),
        Err(ServiceError::ActorCommunicationError(_))
    ));
}
