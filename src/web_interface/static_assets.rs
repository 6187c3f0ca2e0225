//! Front-end files embedded into the binary and served under `/static`.

use rust_embed::RustEmbed;
use warp::{path::Tail, reply, Rejection, Reply};

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/static/"]
pub struct StaticAssets;

/// GET /static/<path>
pub async fn serve_asset(tail: Tail) -> Result<reply::Response, Rejection> {
    let path = tail.as_str();
    match StaticAssets::get(path) {
        Some(file) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Ok(reply::with_header(file.data.into_owned(), "Content-Type", mime.to_string())
                .into_response())
        }
        None => Err(warp::reject::not_found()),
    }
}
