use blogfeed_client::{testing::StaticTransport, Client, Post};
use serde_json::{json, Value};

pub(crate) fn user(id: u64, name: &str, company: &str, phrase: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "company": { "name": company, "catchPhrase": phrase },
    })
}

pub(crate) fn post(id: u64, user_id: u64, title: &str, body: &str) -> Value {
    json!({ "id": id, "userId": user_id, "title": title, "body": body })
}

pub(crate) fn comment(post_id: u64, name: &str, email: &str, body: &str) -> Value {
    json!({ "postId": post_id, "name": name, "email": email, "body": body })
}

pub(crate) fn posts(values: &[Value]) -> Vec<Post> {
    serde_json::from_value(Value::Array(values.to_vec())).unwrap()
}

/// One post by Al with a single comment.
pub(crate) fn single_post() -> StaticTransport {
    StaticTransport::new()
        .json("/posts", &json!([post(1, 1, "T1", "B1")]))
        .json("/users", &json!([user(1, "Al", "Co", "Phrase")]))
        .json("/users/1", &user(1, "Al", "Co", "Phrase"))
        .json(
            "/posts/1/comments",
            &json!([comment(1, "C", "c@x.com", "nice")]),
        )
}

/// Three posts by two authors, each with a comment.
pub(crate) fn three_posts() -> StaticTransport {
    StaticTransport::new()
        .json(
            "/posts",
            &json!([
                post(1, 1, "First", "one"),
                post(2, 2, "Second", "two"),
                post(3, 1, "Third", "three"),
            ]),
        )
        .json(
            "/users",
            &json!([user(1, "Al", "Co", "Phrase"), user(2, "Bo", "Inc", "Motto")]),
        )
        .json("/users/1", &user(1, "Al", "Co", "Phrase"))
        .json("/users/2", &user(2, "Bo", "Inc", "Motto"))
        .json("/posts?userId=1", &json!([post(1, 1, "First", "one"), post(3, 1, "Third", "three")]))
        .json("/posts?userId=2", &json!([post(2, 2, "Second", "two")]))
        .json("/posts/1/comments", &json!([comment(1, "a", "a@x.com", "A")]))
        .json("/posts/2/comments", &json!([comment(2, "b", "b@x.com", "B")]))
        .json("/posts/3/comments", &json!([comment(3, "c", "c@x.com", "C")]))
}

pub(crate) fn client(transport: StaticTransport) -> Client<StaticTransport> {
    Client::new(transport)
}
