use actix_web::{http::header::CONTENT_TYPE, HttpRequest};
use log::trace;

/// True if the request declares a JSON body. Media type parameters (`charset=utf-8` and so on) are ignored.
pub fn is_json_content_type(req: &HttpRequest) -> bool {
    let content_type = req.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    trace!("💻️ Request content type: {content_type:?}");
    content_type
        .and_then(|s| s.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
