use rocket::http::uri::Uri;
use rocket::response::{Flash, Redirect};

/// Redirects to the login page with a given message, asking it to come
/// back to `url` once the user has logged in.
pub fn requires_login<T: Into<Uri<'static>>>(message: &str, url: T) -> Flash<Redirect> {
    Flash::error(
        Redirect::to(format!(
            "/auth/login?next={}",
            Uri::percent_encode(&url.into().to_string())
        )),
        message,
    )
}
