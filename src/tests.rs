use crate::quill;
use diesel::r2d2::{ConnectionManager, Pool};
use guid_create::GUID;
use quill_models::{
    comments::Comment,
    db_conn::DbPool,
    follows::Follow,
    groups::{Group, NewGroup},
    migrations,
    posts::{NewPost, Post},
    safe_string::SafeString,
    users::{NewUser, User, AUTH_COOKIE},
    Connection,
};
use rocket::http::{ContentType, Cookie, Status};
use rocket::local::Client;

const BOUNDARY: &str = "------------------------quilltestboundary";

/// Every test gets its own database file, so they can run in parallel.
fn setup() -> (Client, DbPool) {
    let path = std::env::temp_dir().join(format!("quill-test-{}.sqlite", GUID::rand()));
    let manager = ConnectionManager::<Connection>::new(path.to_str().unwrap());
    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .expect("Couldn't build the test pool");
    migrations::run(&pool.get().unwrap()).expect("Couldn't run migrations");
    let client = Client::new(quill(pool.clone())).expect("Couldn't create the test client");
    (client, pool)
}

fn seed(conn: &Connection) -> Vec<User> {
    ["alice", "bob", "carol"]
        .iter()
        .map(|name| {
            NewUser::new_local(
                conn,
                (*name).to_owned(),
                (*name).to_owned(),
                format!("{}@example.com", name),
                User::hash_pass(&format!("{}_password", name)).unwrap(),
            )
            .unwrap()
        })
        .collect()
}

fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn multipart_content_type() -> ContentType {
    ContentType::with_params("multipart", "form-data", ("boundary", BOUNDARY))
}

#[test]
fn anonymous_comment_is_rejected() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    let users = seed(&conn);
    let post = Post::insert(
        &conn,
        NewPost {
            text: SafeString::new("Hello"),
            author_id: users[0].id,
            group_id: None,
            image_id: None,
        },
    )
    .unwrap();

    let res = client
        .post(format!("/posts/{}/comment", post.id))
        .header(ContentType::Form)
        .body("text=sneaky")
        .dispatch();

    assert_eq!(res.status(), Status::SeeOther);
    let location = res.headers().get_one("Location").unwrap().to_string();
    assert!(location.starts_with("/auth/login?next="));
    assert!(Comment::list_by_post(&conn, post.id).unwrap().is_empty());
}

#[test]
fn authenticated_comment_is_saved() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    let users = seed(&conn);
    let post = Post::insert(
        &conn,
        NewPost {
            text: SafeString::new("Hello"),
            author_id: users[0].id,
            group_id: None,
            image_id: None,
        },
    )
    .unwrap();

    let res = client
        .post(format!("/posts/{}/comment", post.id))
        .header(ContentType::Form)
        .private_cookie(Cookie::new(AUTH_COOKIE, users[1].id.to_string()))
        .body("text=Nice+post")
        .dispatch();

    assert_eq!(res.status(), Status::SeeOther);
    assert_eq!(
        res.headers().get_one("Location").unwrap(),
        format!("/posts/{}", post.id)
    );
    let comments = Comment::list_by_post(&conn, post.id).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_id, users[1].id);
    assert_eq!(comments[0].text.get(), "Nice post");
}

#[test]
fn create_post() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    let users = seed(&conn);

    let res = client
        .post("/create")
        .header(multipart_content_type())
        .private_cookie(Cookie::new(AUTH_COOKIE, users[0].id.to_string()))
        .body(multipart_body(&[("text", "Fresh off the press"), ("group", "")]))
        .dispatch();

    assert_eq!(res.status(), Status::SeeOther);
    assert_eq!(
        res.headers().get_one("Location").unwrap(),
        "/profile/alice"
    );
    assert_eq!(Post::count(&conn).unwrap(), 1);
    let post = Post::last(&conn).unwrap();
    assert_eq!(post.author_id, users[0].id);
    assert_eq!(post.text.get(), "Fresh off the press");
    assert_eq!(post.group_id, None);
}

#[test]
fn create_post_requires_text() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    let users = seed(&conn);

    let res = client
        .post("/create")
        .header(multipart_content_type())
        .private_cookie(Cookie::new(AUTH_COOKIE, users[0].id.to_string()))
        .body(multipart_body(&[("text", "   "), ("group", "")]))
        .dispatch();

    assert_eq!(res.status(), Status::Ok);
    assert_eq!(Post::count(&conn).unwrap(), 0);
}

#[test]
fn edit_is_author_only() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    let users = seed(&conn);
    let post = Post::insert(
        &conn,
        NewPost {
            text: SafeString::new("Original"),
            author_id: users[0].id,
            group_id: None,
            image_id: None,
        },
    )
    .unwrap();

    // anonymous users are sent to the login page
    let res = client.get(format!("/posts/{}/edit", post.id)).dispatch();
    assert_eq!(res.status(), Status::SeeOther);
    assert!(res
        .headers()
        .get_one("Location")
        .unwrap()
        .starts_with("/auth/login?next="));

    // another user is sent back to the post, and nothing changes
    let res = client
        .get(format!("/posts/{}/edit", post.id))
        .private_cookie(Cookie::new(AUTH_COOKIE, users[1].id.to_string()))
        .dispatch();
    assert_eq!(res.status(), Status::SeeOther);
    assert_eq!(
        res.headers().get_one("Location").unwrap(),
        format!("/posts/{}", post.id)
    );

    let res = client
        .post(format!("/posts/{}/edit", post.id))
        .header(multipart_content_type())
        .private_cookie(Cookie::new(AUTH_COOKIE, users[1].id.to_string()))
        .body(multipart_body(&[("text", "Defaced"), ("group", "")]))
        .dispatch();
    assert_eq!(res.status(), Status::SeeOther);
    assert_eq!(
        res.headers().get_one("Location").unwrap(),
        format!("/posts/{}", post.id)
    );
    assert_eq!(Post::get(&conn, post.id).unwrap().text.get(), "Original");

    // the author can edit
    let res = client
        .post(format!("/posts/{}/edit", post.id))
        .header(multipart_content_type())
        .private_cookie(Cookie::new(AUTH_COOKIE, users[0].id.to_string()))
        .body(multipart_body(&[("text", "Updated"), ("group", "")]))
        .dispatch();
    assert_eq!(res.status(), Status::SeeOther);
    let post = Post::get(&conn, post.id).unwrap();
    assert_eq!(post.text.get(), "Updated");
    assert_eq!(post.author_id, users[0].id);
}

#[test]
fn follow_is_idempotent_and_feeds() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    let users = seed(&conn);

    for _ in 0..2 {
        let res = client
            .get("/profile/bob/follow")
            .private_cookie(Cookie::new(AUTH_COOKIE, users[0].id.to_string()))
            .dispatch();
        assert_eq!(res.status(), Status::SeeOther);
    }
    assert!(Follow::find(&conn, users[0].id, users[1].id).is_ok());
    assert_eq!(users[0].count_followed(&conn).unwrap(), 1);

    // following yourself is silently ignored
    let res = client
        .get("/profile/alice/follow")
        .private_cookie(Cookie::new(AUTH_COOKIE, users[0].id.to_string()))
        .dispatch();
    assert_eq!(res.status(), Status::SeeOther);
    assert!(Follow::find(&conn, users[0].id, users[0].id).is_err());

    Post::insert(
        &conn,
        NewPost {
            text: SafeString::new("Bob writes here"),
            author_id: users[1].id,
            group_id: None,
            image_id: None,
        },
    )
    .unwrap();
    Post::insert(
        &conn,
        NewPost {
            text: SafeString::new("Carol writes here"),
            author_id: users[2].id,
            group_id: None,
            image_id: None,
        },
    )
    .unwrap();

    let mut res = client
        .get("/follow")
        .private_cookie(Cookie::new(AUTH_COOKIE, users[0].id.to_string()))
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body = res.body_string().unwrap();
    assert!(body.contains("Bob writes here"));
    assert!(!body.contains("Carol writes here"));

    // after unfollowing, the feed is empty again; a second unfollow is a no-op
    for _ in 0..2 {
        let res = client
            .get("/profile/bob/unfollow")
            .private_cookie(Cookie::new(AUTH_COOKIE, users[0].id.to_string()))
            .dispatch();
        assert_eq!(res.status(), Status::SeeOther);
    }
    let mut res = client
        .get("/follow")
        .private_cookie(Cookie::new(AUTH_COOKIE, users[0].id.to_string()))
        .dispatch();
    let body = res.body_string().unwrap();
    assert!(!body.contains("Bob writes here"));
}

#[test]
fn feed_requires_login() {
    let (client, pool) = setup();
    let _conn = pool.get().unwrap();
    let res = client.get("/follow").dispatch();
    assert_eq!(res.status(), Status::SeeOther);
    assert!(res
        .headers()
        .get_one("Location")
        .unwrap()
        .starts_with("/auth/login?next="));
}

#[test]
fn pagination_clamps_out_of_range_pages() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    let users = seed(&conn);
    for i in 1..=12 {
        Post::insert(
            &conn,
            NewPost {
                text: SafeString::new(&format!("Post {}", i)),
                author_id: users[0].id,
                group_id: None,
                image_id: None,
            },
        )
        .unwrap();
    }

    let mut res = client.get("/?page=99").dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body = res.body_string().unwrap();
    // the last page holds the two oldest posts
    assert!(body.contains("<p>Post 1</p>"));
    assert!(body.contains("<p>Post 2</p>"));
    assert!(!body.contains("<p>Post 12</p>"));

    let mut res = client.get("/?page=1").dispatch();
    let body = res.body_string().unwrap();
    assert!(body.contains("<p>Post 12</p>"));
    assert!(!body.contains("<p>Post 1</p>"));
}

#[test]
fn group_listing() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    let users = seed(&conn);
    let group = Group::insert(
        &conn,
        NewGroup {
            title: "Test group".to_owned(),
            slug: "test-slug".to_owned(),
            description: SafeString::new(""),
        },
    )
    .unwrap();
    Post::insert(
        &conn,
        NewPost {
            text: SafeString::new("Тестовый текст"),
            author_id: users[0].id,
            group_id: Some(group.id),
            image_id: None,
        },
    )
    .unwrap();

    let mut res = client.get("/group/test-slug").dispatch();
    assert_eq!(res.status(), Status::Ok);
    assert!(res.body_string().unwrap().contains("Тестовый текст"));

    let res = client.get("/group/no-such-group").dispatch();
    assert_eq!(res.status(), Status::NotFound);
}

#[test]
fn unknown_post_is_not_found() {
    let (client, pool) = setup();
    let _conn = pool.get().unwrap();
    let res = client.get("/posts/4242").dispatch();
    assert_eq!(res.status(), Status::NotFound);
}

#[test]
fn login_sets_session_and_honors_next() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    seed(&conn);

    let res = client
        .post("/auth/login")
        .header(ContentType::Form)
        .body("ident=alice&password=alice_password&next=%2Fcreate")
        .dispatch();
    assert_eq!(res.status(), Status::SeeOther);
    assert_eq!(res.headers().get_one("Location").unwrap(), "/create");

    let mut res = client
        .post("/auth/login")
        .header(ContentType::Form)
        .body("ident=alice&password=wrong")
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    assert!(res
        .body_string()
        .unwrap()
        .contains("Invalid username, or wrong password"));
}

#[test]
fn signup_validates_fields() {
    let (client, pool) = setup();
    let conn = pool.get().unwrap();
    seed(&conn);

    let res = client
        .post("/auth/signup")
        .header(ContentType::Form)
        .body("username=dave&email=dave@example.com&password=averylongone&password_confirmation=averylongone")
        .dispatch();
    assert_eq!(res.status(), Status::SeeOther);
    assert!(User::find_by_name(&conn, "dave").is_ok());

    // short password, no user created
    let res = client
        .post("/auth/signup")
        .header(ContentType::Form)
        .body("username=eve&email=eve@example.com&password=short&password_confirmation=short")
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    assert!(User::find_by_name(&conn, "eve").is_err());

    // taken username
    let res = client
        .post("/auth/signup")
        .header(ContentType::Form)
        .body("username=alice&email=alice2@example.com&password=averylongone&password_confirmation=averylongone")
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    assert!(User::find_by_email(&conn, "alice2@example.com").is_err());
}
