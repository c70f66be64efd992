use blog_store::config::StoreConfig;
use blog_store::framework::{PageRequest, SortDirection};
use blog_store::lifecycle::BlogSystem;
use blog_store::model::{UserCreate, UserStatus};
use blog_store::services::ServiceError;

fn start() -> BlogSystem {
    BlogSystem::new(&StoreConfig::default())
}

/// Create, refuse a duplicate, read three times, delete the author.
#[tokio::test]
async fn test_end_to_end_scenario() {
    let system = start();

    let u1 = system
        .users
        .create_user(UserCreate::new("u1", "a@x.com", 30))
        .await
        .expect("Failed to create user");

    let duplicate = system
        .users
        .create_user(UserCreate::new("u2", "a@x.com", 31))
        .await;
    assert_eq!(duplicate, Err(ServiceError::DuplicateEmail("a@x.com".into())));

    let post = system
        .posts
        .create_post(u1.id, "T".into(), Some("C".into()))
        .await
        .expect("Failed to create post");
    assert_eq!(post.view_count, 0);
    assert!(!post.published);
    assert_eq!(post.author_id, u1.id);

    for expected in 1..=3 {
        let seen = system.posts.get_post(post.id).await.unwrap();
        assert_eq!(seen.view_count, expected);
    }
    for _ in 0..3 {
        let stored = system.posts.get_post_without_view(post.id).await.unwrap();
        assert_eq!(stored.view_count, 3);
    }

    system.users.delete_user(u1.id).await.unwrap();
    assert!(matches!(
        system.posts.get_post(post.id).await,
        Err(ServiceError::NotFound { entity: "Post", .. })
    ));

    system.shutdown().await.expect("Failed to shut down");
}

#[tokio::test]
async fn test_concurrent_duplicate_emails_admit_exactly_one() {
    let system = start();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let users = system.users.clone();
            tokio::spawn(async move {
                users
                    .create_user(UserCreate::new(format!("racer{i}"), "race@x.com", 20))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(ServiceError::DuplicateEmail(email)) => {
                assert_eq!(email, "race@x.com");
                refused += 1;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!((created, refused), (1, 7));
    assert_eq!(system.users.get_user_count().await.unwrap(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_email_keeps_emails_unique() {
    let system = start();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();
    let lee = system
        .users
        .create_user(UserCreate::new("lee", "lee@x.com", 40))
        .await
        .unwrap();

    let taken = system.users.update_email(lee.id, "kim@x.com".into()).await;
    assert_eq!(taken, Err(ServiceError::DuplicateEmail("kim@x.com".into())));
    assert_eq!(system.users.get_user(lee.id).await.unwrap(), lee);

    // Re-saving your own address is fine and changes nothing.
    let same = system.users.update_email(kim.id, "kim@x.com".into()).await.unwrap();
    assert_eq!(same, kim);

    let moved = system.users.update_email(kim.id, "kim@y.com".into()).await.unwrap();
    assert_eq!(moved.email, "kim@y.com");
    assert_eq!(
        system.users.get_user_by_email("kim@y.com".into()).await.unwrap().id,
        kim.id
    );
    // The old address is free again.
    system
        .users
        .create_user(UserCreate::new("newcomer", "kim@x.com", 22))
        .await
        .unwrap();

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_user_cascade_removes_every_reference() {
    let system = start();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();
    let lee = system
        .users
        .create_user(UserCreate::new("lee", "lee@x.com", 40))
        .await
        .unwrap();

    let kims_post = system.posts.create_post(kim.id, "kim's".into(), None).await.unwrap();
    let lees_post = system.posts.create_post(lee.id, "lee's".into(), None).await.unwrap();

    // lee on kim's post, kim on lee's post, kim on kim's post.
    system.comments.create_comment(kims_post.id, lee.id, "nice".into()).await.unwrap();
    system.comments.create_comment(lees_post.id, kim.id, "thanks".into()).await.unwrap();
    system.comments.create_comment(kims_post.id, kim.id, "edit: typo".into()).await.unwrap();
    let lees_own = system
        .comments
        .create_comment(lees_post.id, lee.id, "welcome".into())
        .await
        .unwrap();

    system.users.delete_user(kim.id).await.unwrap();

    assert!(matches!(
        system.users.get_user(kim.id).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(system.posts.get_posts_by_author(kim.id).await.unwrap().is_empty());
    assert_eq!(system.comments.count_comments_by_user(kim.id).await.unwrap(), 0);
    assert_eq!(system.comments.count_comments_for_post(kims_post.id).await.unwrap(), 0);

    let remaining = system.comments.get_comments_for_post(lees_post.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, lees_own.id);
    assert_eq!(system.posts.get_total_post_count().await.unwrap(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delete_post_takes_only_its_comments() {
    let system = start();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();
    let first = system.posts.create_post(kim.id, "first".into(), None).await.unwrap();
    let second = system.posts.create_post(kim.id, "second".into(), None).await.unwrap();
    for post in [first.id, first.id, second.id] {
        system.comments.create_comment(post, kim.id, "hi".into()).await.unwrap();
    }

    system.posts.delete_post(first.id).await.unwrap();

    assert_eq!(system.comments.count_comments_by_user(kim.id).await.unwrap(), 1);
    assert_eq!(system.comments.count_comments_for_post(second.id).await.unwrap(), 1);
    assert!(system.users.get_user(kim.id).await.is_ok());
    assert!(matches!(
        system.posts.delete_post(first.id).await,
        Err(ServiceError::NotFound { .. })
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_publish_is_idempotent() {
    let system = start();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();
    let draft = system.posts.create_post(kim.id, "draft".into(), None).await.unwrap();

    let published = system.posts.publish_post(draft.id).await.unwrap();
    assert!(published.published);
    assert!(published.timestamps.updated_at > draft.timestamps.updated_at);

    let again = system.posts.publish_post(draft.id).await.unwrap();
    assert_eq!(again, published);

    let unpublished = system.posts.unpublish_post(draft.id).await.unwrap();
    assert!(!unpublished.published);
    assert_eq!(system.posts.unpublish_post(draft.id).await.unwrap(), unpublished);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_view_count_only_goes_down_on_reset() {
    let system = start();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();
    let post = system.posts.create_post(kim.id, "views".into(), None).await.unwrap();

    let mut last = 0;
    for _ in 0..5 {
        let seen = system.posts.get_post(post.id).await.unwrap();
        assert_eq!(seen.view_count, last + 1);
        last = seen.view_count;

        // Plain reads and edits leave the counter alone.
        system.posts.get_post_with_comments(post.id).await.unwrap();
        let edited = system
            .posts
            .update_post(post.id, format!("views {last}"), None)
            .await
            .unwrap();
        assert_eq!(edited.view_count, last);
    }

    let popular = system.posts.get_popular_posts(4).await.unwrap();
    assert_eq!(popular.len(), 1);
    assert!(system.posts.get_popular_posts(5).await.unwrap().is_empty());

    let reset = system.posts.reset_view_count(post.id).await.unwrap();
    assert_eq!(reset.view_count, 0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_pages_partition_the_result_set() {
    let system = start();
    for (i, name) in ["gus", "ada", "eve", "bob", "fay", "cal", "dan"].iter().enumerate() {
        system
            .users
            .create_user(UserCreate::new(*name, format!("{name}@x.com"), 20 + i as u32))
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    for page in 0..3 {
        let request = PageRequest::new(page, 3, "username", SortDirection::Asc);
        let result = system
            .users
            .get_users_by_status_paged(UserStatus::Active, request)
            .await
            .unwrap();
        assert_eq!(result.total_elements, 7);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.has_previous, page > 0);
        assert_eq!(result.has_next, page < 2);
        seen.extend(result.content.into_iter().map(|u| u.username));
    }
    assert_eq!(seen, ["ada", "bob", "cal", "dan", "eve", "fay", "gus"]);

    let beyond = system
        .users
        .get_users_by_status_paged(UserStatus::Active, PageRequest::new(9, 3, "username", SortDirection::Asc))
        .await
        .unwrap();
    assert!(beyond.is_empty());
    assert_eq!(beyond.total_elements, 7);
    assert!(!beyond.has_next);
    assert!(beyond.has_previous);

    let descending = system
        .users
        .search_users_by_username_paged("a".into(), PageRequest::new(0, 10, "age", SortDirection::Desc))
        .await
        .unwrap();
    let ages: Vec<u32> = descending.content.iter().map(|u| u.age).collect();
    assert_eq!(ages, [26, 25, 24, 21]);

    let unknown = system
        .users
        .get_users_by_status_paged(UserStatus::Active, PageRequest::new(0, 3, "password", SortDirection::Asc))
        .await;
    assert!(matches!(unknown, Err(ServiceError::ValidationError(_))));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_status_changes_are_unrestricted() {
    let system = start();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();
    assert_eq!(kim.status, UserStatus::Active);

    let banned = system.users.ban_user(kim.id).await.unwrap();
    assert_eq!(banned.status, UserStatus::Banned);
    let back = system.users.activate_user(kim.id).await.unwrap();
    assert_eq!(back.status, UserStatus::Active);
    let inactive = system.users.deactivate_user(kim.id).await.unwrap();
    assert_eq!(inactive.status, UserStatus::Inactive);

    assert_eq!(system.users.get_active_user_count().await.unwrap(), 0);
    let counts = system.users.count_users_by_status().await.unwrap();
    assert_eq!(counts.get(&UserStatus::Inactive), Some(&1));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_status_sort_follows_stored_names() {
    let system = start();
    for (name, status) in [
        ("ina", UserStatus::Inactive),
        ("ban", UserStatus::Banned),
        ("act", UserStatus::Active),
    ] {
        let user = system
            .users
            .create_user(UserCreate::new(name, format!("{name}@x.com"), 30))
            .await
            .unwrap();
        system.users.update_user_status(user.id, status).await.unwrap();
    }

    let page = system
        .users
        .search_users_by_username_paged(String::new(), PageRequest::new(0, 10, "status", SortDirection::Asc))
        .await
        .unwrap();
    let statuses: Vec<UserStatus> = page.content.iter().map(|u| u.status).collect();
    assert_eq!(
        statuses,
        [UserStatus::Active, UserStatus::Banned, UserStatus::Inactive]
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_remove_post_from_user_checks_the_owner() {
    let system = start();
    let kim = system
        .users
        .create_user(UserCreate::new("kim", "kim@x.com", 30))
        .await
        .unwrap();
    let lee = system
        .users
        .create_user(UserCreate::new("lee", "lee@x.com", 40))
        .await
        .unwrap();
    let post = system.posts.create_post(kim.id, "kim's".into(), None).await.unwrap();
    system.comments.create_comment(post.id, lee.id, "nice".into()).await.unwrap();

    let wrong_owner = system.users.remove_post_from_user(lee.id, post.id).await;
    assert!(matches!(wrong_owner, Err(ServiceError::ValidationError(_))));
    assert_eq!(system.comments.count_comments_for_post(post.id).await.unwrap(), 1);

    system.users.remove_post_from_user(kim.id, post.id).await.unwrap();
    assert!(matches!(
        system.posts.get_post_without_view(post.id).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert_eq!(system.comments.count_comments_by_user(lee.id).await.unwrap(), 0);
    assert!(system.users.get_user(kim.id).await.is_ok());

    system.shutdown().await.unwrap();
}
