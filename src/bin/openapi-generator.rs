//! Prints the OpenAPI document to stdout for CI artifacts and clients.

use eco_bingo_back::services::documentation::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let doc = ApiDoc::openapi();
    println!(
        "{}",
        doc.to_pretty_json().expect("OpenAPI document serializes")
    );
}
