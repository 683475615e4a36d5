//! Writes the OpenAPI document to stdout as pretty-printed JSON.

use color_eyre::eyre::{Context, Result};
use recipe_backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to serialise OpenAPI document")?;
    println!("{json}");
    Ok(())
}
