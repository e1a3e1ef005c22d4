//! Scripted walk through every repository operation, printing the lookups
//! between steps.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::db::{ClientFilter, Database};
use crate::models::{ClientUpdate, NewClient};
use crate::report::write_clients;

async fn show<W: Write>(db: &Database, out: &mut W, title: &str, filter: ClientFilter) -> Result<()> {
    writeln!(out, "\n{}:", title)?;
    let clients = db.find_clients(&filter).await?;
    write_clients(out, &clients)
}

/// Run the demo against `db`, starting from empty tables when `reset` is set
pub async fn run<W: Write>(db: &Database, out: &mut W, reset: bool) -> Result<()> {
    if reset {
        db.reset_schema().await?;
    } else {
        db.ensure_schema().await?;
    }
    info!(reset, "running demo");

    let alena = db
        .create_client(&NewClient::new("Alena", "Smirnova", "alena@example.com").with_phones(["+79001112233"]))
        .await
        .context("demo data already present? rerun with --reset")?;
    let ivan = db
        .create_client(&NewClient::new("Ivan", "Petrov", "ivan@example.com"))
        .await?;
    let sergey = db
        .create_client(&NewClient::new("Sergey", "Pavlov", "pavlov@example.com").with_phones(["+79553459874"]))
        .await?;

    show(db, out, "All clients", ClientFilter::all()).await?;

    db.add_phone(ivan, "+79005556677").await?;
    show(db, out, "After adding a phone for Ivan", ClientFilter::all().first_name("Ivan")).await?;

    db.add_phone(ivan, "+79005523167").await?;
    show(db, out, "After adding a second phone for Ivan", ClientFilter::all().first_name("Ivan")).await?;

    show(db, out, "All clients", ClientFilter::all()).await?;

    db.update_client(
        alena,
        &ClientUpdate {
            last_name: Some("Ivanova".to_string()),
            ..Default::default()
        },
    )
    .await?;
    show(db, out, "After changing Alena's last name", ClientFilter::all().first_name("Alena")).await?;

    db.create_client(&NewClient::new("Ivan", "Sidorov", "ivan2@example.com").with_phones(["+79112223344"]))
        .await?;
    show(db, out, "After adding a second Ivan", ClientFilter::all().first_name("Ivan")).await?;

    db.update_client(
        sergey,
        &ClientUpdate {
            email: Some("pavlovserg@example.com".to_string()),
            ..Default::default()
        },
    )
    .await?;
    show(db, out, "After changing Sergey's email", ClientFilter::all().first_name("Sergey")).await?;

    db.delete_phone(ivan, "+79005556677").await?;
    show(db, out, "After deleting a phone from Ivan", ClientFilter::all().first_name("Ivan")).await?;

    db.delete_phone(ivan, "+79005523167").await?;
    show(db, out, "After deleting Ivan's second phone", ClientFilter::all().first_name("Ivan")).await?;

    show(db, out, "Found by first name", ClientFilter::all().first_name("Alena")).await?;
    show(db, out, "Found by last name", ClientFilter::all().last_name("Pavlov")).await?;
    show(db, out, "Found by email", ClientFilter::all().email("ivan@example.com")).await?;
    show(db, out, "Found by phone", ClientFilter::all().phone("+79001112233")).await?;

    db.delete_client(ivan).await?;
    show(db, out, "After deleting Ivan", ClientFilter::all()).await?;

    writeln!(out, "\nDemo finished.")?;
    Ok(())
}
