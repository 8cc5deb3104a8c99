use observable_store::{EventKind, Keyed, StoreError, StoreRegistry};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Serialize, Deserialize, Keyed)]
#[keyed(store = "tickets")]
struct Ticket {
    #[keyed(key)]
    id: u64,
    status: String,
}

fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("observable_store=trace")),
        )
        .init();

    let registry = StoreRegistry::new();

    // Navigation state shared by independently rendered components
    let nav = registry.init_store("navigation", json!({"loading": false, "target": null}), None)?;
    nav.watch(EventKind::Updated, |event| {
        println!("navigation changed: {}", event.payload);
        Ok(())
    })?
    .detach();
    nav.update(json!({"loading": true, "target": "/dashboard"}))?;
    nav.update(json!({"loading": false}))?;
    println!("navigation now: {}", nav.current()?);

    let tickets = registry.init_collection::<Ticket>(vec![])?;
    let closed = tickets.watch(EventKind::ItemUpdated, |ticket| {
        println!("ticket {} is now {}", ticket.id, ticket.status);
        Ok(())
    })?;

    tickets.insert(&Ticket {
        id: 1,
        status: "open".into(),
    })?;
    tickets.insert(&Ticket {
        id: 2,
        status: "open".into(),
    })?;
    tickets.update(&Ticket {
        id: 1,
        status: "closed".into(),
    })?;
    closed.unsubscribe();

    for ticket in tickets.all()? {
        println!("{:?}", ticket);
    }
    println!("stores: {:?}", registry.names()?);

    Ok(())
}
