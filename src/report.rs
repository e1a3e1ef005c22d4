//! Plain-text and JSON rendering of lookup results.

use std::io::Write;

use anyhow::Result;

use crate::models::Client;

/// One line describing a client and its phones
pub fn client_line(client: &Client) -> String {
    let phones = if client.phones.is_empty() {
        "none".to_string()
    } else {
        client.phones.join(", ")
    };

    format!(
        "#{} {} <{}> phones: {}",
        client.id,
        client.full_name(),
        client.email,
        phones
    )
}

pub fn write_clients<W: Write>(out: &mut W, clients: &[Client]) -> Result<()> {
    if clients.is_empty() {
        writeln!(out, "  (no clients)")?;
        return Ok(());
    }

    for client in clients {
        writeln!(out, "  {}", client_line(client))?;
    }
    Ok(())
}

pub fn write_clients_json<W: Write>(out: &mut W, clients: &[Client]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, clients)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(phones: &[&str]) -> Client {
        Client {
            id: 3,
            first_name: "Sergey".to_string(),
            last_name: "Pavlov".to_string(),
            email: "pavlov@example.com".to_string(),
            phones: phones.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn line_lists_phones() {
        assert_eq!(
            client_line(&client(&["+79553459874", "+79001234567"])),
            "#3 Sergey Pavlov <pavlov@example.com> phones: +79553459874, +79001234567"
        );
    }

    #[test]
    fn line_without_phones() {
        assert_eq!(
            client_line(&client(&[])),
            "#3 Sergey Pavlov <pavlov@example.com> phones: none"
        );
    }

    #[test]
    fn empty_result_is_reported() {
        let mut out = Vec::new();
        write_clients(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "  (no clients)\n");
    }

    #[test]
    fn json_keeps_empty_phone_list() {
        let mut out = Vec::new();
        write_clients_json(&mut out, &[client(&[])]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["id"], 3);
        assert_eq!(value[0]["phones"], serde_json::json!([]));
    }
}
