use crate::routes::{errors::ErrorPage, Page, RespondOrRedirect};
use crate::template_utils::{IntoContext, Rendered};
use crate::utils;
use quill_models::{
    follows::Follow,
    posts::Post,
    quill_rocket::QuillRocket,
    users::{NewUser, User},
    Error,
};
use rocket::{
    request::LenientForm,
    response::{Flash, Redirect},
};
use std::borrow::Cow;
use std::collections::HashMap;
use validator::{Validate, ValidationError, ValidationErrors};

#[get("/profile/<name>?<page>")]
pub fn details(
    name: String,
    page: Option<Page>,
    rockets: QuillRocket,
) -> Result<Rendered, ErrorPage> {
    let conn = &*rockets.conn;
    let author = User::find_by_name(conn, &name)?;
    let n_posts = Post::count_for_author(conn, &author)?;
    let total = Page::total(n_posts as i32);
    let page = page.unwrap_or_default().clamp(total);
    let posts = Post::author_page(conn, &author, page.limits())?;
    let n_followers = author.count_followers(conn)?;
    let is_following = rockets
        .user
        .as_ref()
        .and_then(|u| u.is_following(conn, author.id).ok())
        .unwrap_or(false);
    Ok(render!(users::details(
        &rockets.to_context(),
        &author,
        is_following,
        n_posts,
        n_followers,
        &posts,
        *page,
        total
    )))
}

#[get("/profile/<name>/follow")]
pub fn follow(name: String, user: User, rockets: QuillRocket) -> Result<Redirect, ErrorPage> {
    let conn = &*rockets.conn;
    let target = User::find_by_name(conn, &name)?;
    // following yourself is silently ignored
    if user.id != target.id {
        Follow::find_or_create(conn, user.id, target.id)?;
    }
    Ok(Redirect::to(uri!(details: name = name, page = _)))
}

#[get("/profile/<name>/follow", rank = 2)]
pub fn follow_auth(name: String) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to subscribe to someone",
        uri!(follow: name = name),
    )
}

#[get("/profile/<name>/unfollow")]
pub fn unfollow(name: String, user: User, rockets: QuillRocket) -> Result<Redirect, ErrorPage> {
    let conn = &*rockets.conn;
    let target = User::find_by_name(conn, &name)?;
    // unsubscribing twice is fine, the second attempt does nothing
    if let Ok(follow) = Follow::find(conn, user.id, target.id) {
        follow.delete(conn)?;
    }
    Ok(Redirect::to(uri!(details: name = name, page = _)))
}

#[get("/profile/<name>/unfollow", rank = 2)]
pub fn unfollow_auth(name: String) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to unsubscribe from someone",
        uri!(unfollow: name = name),
    )
}

#[get("/follow?<page>")]
pub fn feed(page: Option<Page>, user: User, rockets: QuillRocket) -> Result<Rendered, ErrorPage> {
    let conn = &*rockets.conn;
    let total = Page::total(Post::count_followed(conn, &user)? as i32);
    let page = page.unwrap_or_default().clamp(total);
    let posts = Post::followed_page(conn, &user, page.limits())?;
    Ok(render!(users::feed(
        &rockets.to_context(),
        &posts,
        *page,
        total
    )))
}

#[get("/follow", rank = 2)]
pub fn feed_auth() -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to see your feed",
        uri!(feed: page = _),
    )
}

#[derive(Default, FromForm, Validate)]
#[validate(schema(
    function = "passwords_match",
    skip_on_field_errors = false,
    message = "Passwords are not matching"
))]
pub struct NewUserForm {
    #[validate(
        length(min = 1, message = "Username can't be empty"),
        custom(
            function = "validate_username",
            message = "Username is not allowed to contain any of < > & @ ' or \""
        )
    )]
    pub username: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters long"))]
    pub password_confirmation: String,
}

pub fn passwords_match(form: &NewUserForm) -> Result<(), ValidationError> {
    if form.password != form.password_confirmation {
        Err(ValidationError::new("password_match"))
    } else {
        Ok(())
    }
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.contains(&['<', '>', '&', '@', '\'', '"', ' ', '\n', '\t'][..]) {
        Err(ValidationError::new("username_illegal_char"))
    } else {
        Ok(())
    }
}

fn to_validation(_: Error) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "",
        ValidationError {
            code: Cow::from("server_error"),
            message: Some(Cow::from("An unknown error occured")),
            params: HashMap::new(),
        },
    );
    errors
}

#[get("/auth/signup")]
pub fn new(rockets: QuillRocket) -> Rendered {
    render!(users::new(
        &rockets.to_context(),
        &NewUserForm::default(),
        ValidationErrors::default()
    ))
}

#[post("/auth/signup", data = "<form>")]
pub fn create(form: LenientForm<NewUserForm>, rockets: QuillRocket) -> RespondOrRedirect {
    let conn = &*rockets.conn;
    let mut form = form.into_inner();
    form.username = form.username.trim().to_owned();
    form.email = form.email.trim().to_owned();

    let mut errors = match form.validate() {
        Ok(_) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    if User::find_by_name(conn, &form.username).is_ok() {
        let mut err = ValidationError::new("already_taken");
        err.message = Some(Cow::from("This username is already taken"));
        errors.add("username", err);
    }
    if !errors.is_empty() {
        return render!(users::new(&rockets.to_context(), &form, errors)).into();
    }

    match User::hash_pass(&form.password).and_then(|hash| {
        NewUser::new_local(
            conn,
            form.username.clone(),
            form.username.clone(),
            form.email.clone(),
            hash,
        )
    }) {
        Ok(_) => Flash::success(
            Redirect::to(uri!(super::session::new: next = _)),
            "Your account has been created, you can now log in",
        )
        .into(),
        Err(err) => render!(users::new(&rockets.to_context(), &form, to_validation(err))).into(),
    }
}
