use crate::routes::RespondOrRedirect;
use crate::template_utils::{IntoContext, Rendered};
use quill_models::{
    quill_rocket::QuillRocket,
    users::{User, AUTH_COOKIE},
};
use rocket::{
    http::{Cookie, Cookies},
    request::LenientForm,
    response::Redirect,
};
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

#[derive(Default, FromForm)]
pub struct LoginForm {
    pub ident: String,
    pub password: String,
    pub next: Option<String>,
}

#[get("/auth/login?<next>")]
pub fn new(next: Option<String>, rockets: QuillRocket) -> Rendered {
    render!(sessions::login(
        &rockets.to_context(),
        &LoginForm {
            next,
            ..LoginForm::default()
        },
        &ValidationErrors::default()
    ))
}

#[post("/auth/login", data = "<form>")]
pub fn create(
    form: LenientForm<LoginForm>,
    mut cookies: Cookies<'_>,
    rockets: QuillRocket,
) -> RespondOrRedirect {
    let form = form.into_inner();
    match User::login(&rockets.conn, &form.ident, &form.password) {
        Ok(user) => {
            cookies.add_private(Cookie::new(AUTH_COOKIE, user.id.to_string()));
            let destination = form
                .next
                .clone()
                // only relative targets, the login page is no open redirector
                .filter(|next| next.starts_with('/'))
                .unwrap_or_else(|| "/".to_owned());
            Redirect::to(destination).into()
        }
        Err(_) => {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("invalid_login");
            err.message = Some(Cow::from("Invalid username, or wrong password"));
            errors.add("ident", err);
            render!(sessions::login(&rockets.to_context(), &form, &errors)).into()
        }
    }
}

#[get("/auth/logout")]
pub fn delete(mut cookies: Cookies<'_>) -> Redirect {
    if let Some(cookie) = cookies.get_private(AUTH_COOKIE) {
        cookies.remove_private(cookie);
    }
    Redirect::to("/")
}
