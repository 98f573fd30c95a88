//! Basic example demonstrating the Travis API client.
//!
//! Run with:
//! ```
//! TRAVIS_TOKEN=your-token cargo run --example basic
//! ```

use std::collections::BTreeMap;

use travisapi::TravisClient;

fn main() -> travisapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating Travis client...");
    let client = TravisClient::from_env("rails", "rails")?;
    println!("Repository endpoint: {}", client.base_url());

    // Walk passed builds lazily; each page is fetched only when the
    // iterator advances past the previous one.
    println!("\n--- Listing Builds ---");
    let mut filters = BTreeMap::new();
    filters.insert("limit".to_string(), "5".to_string());
    filters.insert("state".to_string(), "passed".to_string());

    for build in client.builds(&filters)?.take(10) {
        let build = build?;
        println!(
            "  #{} on {} - {}",
            build["number"], build["branch"]["name"], build["state"]
        );
    }

    // Trigger a new build request on the default branch
    println!("\n--- Triggering a Build Request ---");
    let mut options = BTreeMap::new();
    options.insert("branch".to_string(), "main".to_string());
    options.insert("message".to_string(), "triggered via travisapi".to_string());

    let request = client.create_request(&options)?;
    println!("Accepted: {request}");

    Ok(())
}
