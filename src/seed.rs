//! Demo fixtures: five users, six posts and nine comments.
//!
//! Loaded through the services, so every record goes through the same checks
//! as any other caller's. Loading twice fails on the first duplicate email.

use tracing::info;

use crate::lifecycle::BlogSystem;
use crate::model::{Comment, Post, User, UserCreate};
use crate::services::ServiceError;

/// Everything [`load_demo_data`] created, in creation order.
#[derive(Debug, Clone)]
pub struct DemoData {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

const USERS: [(&str, &str, u32, Option<&str>); 5] = [
    ("john_doe", "john@example.com", 28, Some("010-1234-5678")),
    ("jane_smith", "jane@example.com", 32, Some("010-2345-6789")),
    ("bob_wilson", "bob@example.com", 45, None),
    ("alice_brown", "alice@example.com", 23, Some("010-4567-8901")),
    ("charlie_lee", "charlie@example.com", 37, None),
];

/// (author index, title, content, published)
const POSTS: [(usize, &str, &str, bool); 6] = [
    (0, "Getting started with Rust", "Ownership, borrowing and lifetimes in one afternoon.", true),
    (0, "Async in practice", "Channels, tasks and what the runtime does for you.", true),
    (1, "Designing a data model", "Entities, relations and who owns what.", true),
    (1, "Draft: query tuning", "Notes that are not ready yet.", false),
    (2, "Testing with mocks", "Intercepting requests instead of faking the world.", true),
    (3, "My first post", "Hello everyone!", false),
];

/// (post index, commenter index, content)
const COMMENTS: [(usize, usize, &str); 9] = [
    (0, 1, "Great introduction, thanks!"),
    (0, 2, "The lifetimes part finally clicked."),
    (0, 3, "Could you cover smart pointers next?"),
    (1, 1, "Channels are underrated."),
    (1, 4, "What about backpressure?"),
    (2, 0, "Very clear explanation of ownership between records."),
    (2, 2, "Bookmarked."),
    (4, 0, "Mocks at the channel level are a neat trick."),
    (4, 3, "Nice, trying this tomorrow."),
];

pub async fn load_demo_data(system: &BlogSystem) -> Result<DemoData, ServiceError> {
    let mut users = Vec::with_capacity(USERS.len());
    for (username, email, age, phone) in USERS {
        let mut params = UserCreate::new(username, email, age);
        if let Some(phone) = phone {
            params = params.with_phone(phone);
        }
        users.push(system.users.create_user(params).await?);
    }

    let mut posts = Vec::with_capacity(POSTS.len());
    for (author, title, content, published) in POSTS {
        let mut post = system
            .posts
            .create_post(users[author].id, title.to_string(), Some(content.to_string()))
            .await?;
        if published {
            post = system.posts.publish_post(post.id).await?;
        }
        posts.push(post);
    }

    let mut comments = Vec::with_capacity(COMMENTS.len());
    for (post, commenter, content) in COMMENTS {
        let comment = system
            .comments
            .create_comment(posts[post].id, users[commenter].id, content.to_string())
            .await?;
        comments.push(comment);
    }

    // One dormant account for the status queries.
    let dormant = users[4].id;
    users[4] = system.users.deactivate_user(dormant).await?;

    info!(
        users = users.len(),
        posts = posts.len(),
        comments = comments.len(),
        "Demo data loaded"
    );
    Ok(DemoData { users, posts, comments })
}
