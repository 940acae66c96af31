// Export OpenAPI spec to stdout
// Usage: cargo run --bin export-openapi > openapi.json

use agentry_control_plane::openapi::ApiDoc;

fn main() -> anyhow::Result<()> {
    println!("{}", ApiDoc::to_json()?);
    Ok(())
}
