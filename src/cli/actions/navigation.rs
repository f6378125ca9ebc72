use super::session::{open_store, print_json};
use crate::{
    cli::commands::client::Options,
    router::{Route, RouteTarget, Router, ROUTES},
};
use anyhow::Result;
use serde_json::{json, Value};

fn describe(route: &Route) -> Value {
    match route.target {
        RouteTarget::View(name) => json!({
            "path": route.path,
            "name": name,
            "requires": route.access.requirements(),
        }),
        RouteTarget::Redirect(to) => json!({
            "path": route.path,
            "redirect": to,
        }),
    }
}

/// # Errors
/// Returns an error if the path has no route or the redirects do not settle.
pub fn navigate(options: &Options, path: &str) -> Result<()> {
    let store = open_store(options)?;
    let router = Router::new(store.subscribe());
    let navigation = router.navigate(path)?;

    print_json(&json!({
        "requested": navigation.requested,
        "redirects": navigation.redirects,
        "route": describe(navigation.route),
    }))
}

/// # Errors
/// Returns an error if the table cannot be written to stdout.
pub fn routes() -> Result<()> {
    let table: Vec<Value> = ROUTES.iter().map(describe).collect();
    print_json(&table)
}
