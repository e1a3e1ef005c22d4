//! The demo script end to end.
//!
//! The demo drops and recreates both tables, so it runs against its own
//! database: set `DEMO_DATABASE_URL` to run it; without it the test returns early.

use contact_manager::db::Database;
use contact_manager::demo;

/// The lines printed under `title`, from its last occurrence up to the next blank line
fn section<'a>(output: &'a str, title: &str) -> Vec<&'a str> {
    let header = format!("\n{}:\n", title);
    let start = output.rfind(&header).expect("section present") + header.len();
    output[start..].lines().take_while(|line| !line.is_empty()).collect()
}

#[tokio::test]
async fn demo_walks_through_every_operation() {
    let Ok(url) = std::env::var("DEMO_DATABASE_URL") else { return };
    let db = Database::connect(&url).await.expect("connect to demo database");

    let mut out = Vec::new();
    demo::run(&db, &mut out, true).await.unwrap();
    db.close().await;
    let output = String::from_utf8(out).unwrap();

    let all = section(&output, "All clients");
    assert_eq!(all.len(), 3);
    assert!(all[0].contains("Alena Smirnova <alena@example.com> phones: +79001112233"));
    assert!(all[1].contains("Ivan Petrov <ivan@example.com> phones: +79005556677, +79005523167"));

    let renamed = section(&output, "After changing Alena's last name");
    assert_eq!(renamed.len(), 1);
    assert!(renamed[0].contains("Alena Ivanova"));

    let email = section(&output, "After changing Sergey's email");
    assert!(email[0].contains("<pavlovserg@example.com>"));

    let ivans = section(&output, "After deleting Ivan's second phone");
    assert_eq!(ivans.len(), 2);
    assert!(ivans[0].contains("Ivan Petrov <ivan@example.com> phones: none"));

    let by_phone = section(&output, "Found by phone");
    assert_eq!(by_phone.len(), 1);
    assert!(by_phone[0].contains("Alena Ivanova"));

    let last = section(&output, "After deleting Ivan");
    assert_eq!(last.len(), 3);
    assert!(last.iter().all(|line| !line.contains("<ivan@example.com>")));
    assert!(last.iter().any(|line| line.contains("Ivan Sidorov")));

    assert!(output.ends_with("\nDemo finished.\n"));
}
