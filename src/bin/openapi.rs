//! Prints the OpenAPI document of meter-server as JSON.

use anyhow::Result;
use meter_server::docs::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
