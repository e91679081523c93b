use api_router::catalog::{self, ADMIN};
use api_router::routing::{FeatureFlags, Router};
use api_router::schema::SchemaExporter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let flags = FeatureFlags::new().with(ADMIN, true);
    let router = Router::build(&catalog::root_mounts(), &flags)?;

    // 1. Walk the table
    println!("{} entries, {} groups excluded", router.len(), router.excluded_groups());
    for entry in router.entries() {
        println!(
            "  {:<40} {:<32} {}",
            entry.template(),
            entry.name().unwrap_or("-"),
            entry.target()
        );
    }

    // 2. Resolve a request path
    let m = router.resolve("v1/membership/subscriptions/12/cancel/")?;
    println!("resolved to {} with {:?}", m.target(), m.params);

    // 3. Build a link without knowing the prefix
    let url = router.reverse("projects:export", [
        ("uuid", "3f2b8c1e-4d5a-4b6c-9d7e-8f9a0b1c2d3e"),
        ("format", "json"),
    ])?;
    println!("projects:export -> /{}", url);

    // 4. Schema snapshot
    let document = SchemaExporter::export(&router);
    println!("{}", SchemaExporter::to_json(&document)?);

    Ok(())
}
