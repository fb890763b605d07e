//! # Demo
//!
//! A tiny in-memory blog served through [`RestService`]: `users` with a nested
//! `posts` relation, a `promote` action and a computed `post_count` field.
//! Runs a fixed script of requests and logs every response.

use http::{Method, StatusCode};
use rest_dispatch::framework::{
    Action, HandlerError, HandlerResult, Meta, ResourceType, TypeDefinition,
};
use rest_dispatch::lifecycle::{setup_tracing, ContextSource, IncomingRequest, RestService};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Shared state handed to every handler.
#[derive(Debug, Default)]
struct Blog {
    users: RwLock<BTreeMap<String, Value>>,
    posts: RwLock<BTreeMap<String, Value>>,
}

fn owner(meta: &Meta<Blog>) -> Result<String, HandlerError> {
    meta.referrer
        .as_ref()
        .map(|link| link.id.clone())
        .ok_or_else(|| HandlerError::from("posts are only reachable through a user"))
}

impl Blog {
    async fn list_users(&self) -> HandlerResult {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn create_user(&self, data: Option<Value>) -> HandlerResult {
        let mut users = self.users.write().await;
        let id = format!("u{}", users.len() + 1);
        let mut user = data.unwrap_or_else(|| json!({}));
        if let Some(fields) = user.as_object_mut() {
            fields.insert("id".into(), json!(id));
            fields.entry("role").or_insert(json!("member"));
        }
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> HandlerResult {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| HandlerError::Message(format!("no user {id}")))
    }

    async fn promote(&self, id: Option<String>) -> HandlerResult {
        let id = id.ok_or_else(|| HandlerError::from("promote needs a user"))?;
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| HandlerError::Message(format!("no user {id}")))?;
        if let Some(fields) = user.as_object_mut() {
            fields.insert("role".into(), json!("admin"));
        }
        Ok(user.clone())
    }

    async fn post_count(&self, id: Option<String>) -> HandlerResult {
        let posts = self.posts.read().await;
        let count = posts
            .values()
            .filter(|post| id.as_deref().is_some_and(|id| post["author"] == id))
            .count();
        Ok(json!(count))
    }

    async fn list_posts(&self, author: String) -> HandlerResult {
        let posts = self.posts.read().await;
        Ok(posts
            .values()
            .filter(|post| post["author"] == author.as_str())
            .cloned()
            .collect())
    }

    async fn create_post(&self, author: String, data: Option<Value>) -> HandlerResult {
        let mut posts = self.posts.write().await;
        let id = format!("p{}", posts.len() + 1);
        let post = json!({
            "id": id,
            "author": author,
            "title": data.as_ref().and_then(|d| d.get("title")).cloned().unwrap_or(Value::Null),
        });
        posts.insert(id, post.clone());
        Ok(post)
    }
}

fn posts() -> TypeDefinition<Blog> {
    TypeDefinition::new()
        .with_list(|_: Option<Value>, meta: Meta<Blog>| async move {
            let author = owner(&meta)?;
            meta.context.list_posts(author).await
        })
        .with_create(|data: Option<Value>, meta: Meta<Blog>| async move {
            let author = owner(&meta)?;
            meta.context.create_post(author, data).await
        })
        .with_get(|id: String, _: Option<Value>, meta: Meta<Blog>| async move {
            let post = meta.context.posts.read().await.get(&id).cloned();
            post.ok_or_else(|| HandlerError::Message(format!("no post {id}")))
        })
        .with_field("author", |_: Option<String>, meta: Meta<Blog>| async move {
            serde_json::to_value(&meta.referrer).map_err(HandlerError::failed)
        })
}

fn users() -> TypeDefinition<Blog> {
    TypeDefinition::new()
        .with_list(|_: Option<Value>, meta: Meta<Blog>| async move {
            meta.context.list_users().await
        })
        .with_create(|data: Option<Value>, meta: Meta<Blog>| async move {
            meta.context.create_user(data).await
        })
        .with_get(|id: String, _: Option<Value>, meta: Meta<Blog>| async move {
            meta.context.get_user(&id).await
        })
        .with_relation("posts", posts())
        .with_field("post_count", |id: Option<String>, meta: Meta<Blog>| async move {
            meta.context.post_count(id).await
        })
        .with_action(
            "promote",
            Action::new(
                Method::POST,
                |id: Option<String>, _: Option<Value>, meta: Meta<Blog>| async move {
                    meta.context.promote(id).await
                },
            )
            .with_description(json!({ "summary": "Grants the admin role" })),
        )
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let service = RestService::new(ContextSource::shared(Blog::default()));
    service.register_type(ResourceType::new("users", users()));

    let script = [
        IncomingRequest::new(Method::POST, "/users").with_body(json!({ "name": "Ada" })),
        IncomingRequest::new(Method::GET, "/users/u1"),
        IncomingRequest::new(Method::POST, "/users/u1/posts")
            .with_body(json!({ "title": "Notes on the Analytical Engine" })),
        IncomingRequest::new(Method::GET, "/users/u1/posts"),
        IncomingRequest::new(Method::GET, "/users/u1/posts/p1/fields/author"),
        IncomingRequest::new(Method::GET, "/users/u1/fields/post_count"),
        IncomingRequest::new(Method::GET, "/users/actions"),
        IncomingRequest::new(Method::POST, "/users/u1/actions/promote/invoke"),
        IncomingRequest::new(Method::DELETE, "/users/u1"),
        IncomingRequest::new(Method::GET, "/comments"),
    ];

    for request in script {
        let label = format!("{} {}", request.method, request.path);
        let response = service.handle(request).await.map_err(|e| e.to_string())?;
        if response.status.is_success() {
            info!(request = %label, status = %response.status, body = ?response.body, "Response");
        } else if response.status == StatusCode::METHOD_NOT_ALLOWED {
            warn!(request = %label, status = %response.status, allow = response.allow(), "Response");
        } else {
            warn!(request = %label, status = %response.status, "Response");
        }
    }

    info!(types = service.registered_types().len(), "Demo finished");
    Ok(())
}
