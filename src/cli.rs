use clap::{Args, Parser, Subcommand};

use contact_manager::db::ClientFilter;
use contact_manager::models::{ClientUpdate, NewClient};

#[derive(Parser, Debug)]
#[command(name = "contact-manager", version)]
#[command(about = "Manage clients and their phone numbers in PostgreSQL")]
pub struct Cli {
    /// Database URL, overrides DATABASE_URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the clients and phones tables if missing
    Init,

    /// Add a client, printing its id
    Add {
        #[arg(long)]
        first: String,
        #[arg(long)]
        last: String,
        #[arg(long)]
        email: String,
        /// Phone number, may be repeated
        #[arg(long = "phone")]
        phones: Vec<String>,
    },

    /// Add a phone number to an existing client
    AddPhone { client_id: i32, phone: String },

    /// Change a client's name or email
    Update {
        client_id: i32,
        #[arg(long)]
        first: Option<String>,
        #[arg(long)]
        last: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Remove one phone number from a client
    DeletePhone { client_id: i32, phone: String },

    /// Remove a client and all of its phones
    Delete { client_id: i32 },

    /// Look up clients; with no criteria every client is listed
    Find(FindArgs),

    /// Run a scripted walk through every operation
    Demo {
        /// Drop and recreate the tables first
        #[arg(long)]
        reset: bool,
    },

    /// Browse and edit clients in the terminal
    Browse,
}

#[derive(Args, Debug, Default)]
pub struct FindArgs {
    #[arg(long)]
    pub first: Option<String>,
    #[arg(long)]
    pub last: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl FindArgs {
    pub fn filter(&self) -> ClientFilter {
        ClientFilter {
            first_name: self.first.clone(),
            last_name: self.last.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

pub fn new_client(first: String, last: String, email: String, phones: Vec<String>) -> NewClient {
    NewClient {
        first_name: first,
        last_name: last,
        email,
        phones,
    }
}

pub fn client_update(first: Option<String>, last: Option<String>, email: Option<String>) -> ClientUpdate {
    ClientUpdate {
        first_name: first,
        last_name: last,
        email,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_collects_repeated_phones() {
        let cli = Cli::try_parse_from([
            "contact-manager",
            "add",
            "--first",
            "A",
            "--last",
            "B",
            "--email",
            "a@x.com",
            "--phone",
            "111",
            "--phone",
            "222",
        ])
        .unwrap();

        match cli.command {
            Command::Add { phones, email, .. } => {
                assert_eq!(phones, vec!["111", "222"]);
                assert_eq!(email, "a@x.com");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn find_without_criteria_matches_all() {
        let cli = Cli::try_parse_from(["contact-manager", "find"]).unwrap();
        match cli.command {
            Command::Find(args) => assert!(args.filter().is_empty()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn find_maps_flags_to_filter() {
        let cli = Cli::try_parse_from(["contact-manager", "find", "--phone", "999", "--json"]).unwrap();
        match cli.command {
            Command::Find(args) => {
                assert!(args.json);
                assert_eq!(args.filter(), ClientFilter::all().phone("999"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn update_keeps_omitted_fields_unset() {
        let cli = Cli::try_parse_from(["contact-manager", "update", "4", "--email", "new@x.com"]).unwrap();
        match cli.command {
            Command::Update {
                client_id,
                first,
                last,
                email,
            } => {
                assert_eq!(client_id, 4);
                let update = client_update(first, last, email);
                assert_eq!(update.email.as_deref(), Some("new@x.com"));
                assert!(update.first_name.is_none());
                assert!(update.last_name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_database_url_after_subcommand() {
        let cli = Cli::try_parse_from(["contact-manager", "delete", "9", "--database-url", "postgres://h/db"]).unwrap();
        assert_eq!(cli.database_url.as_deref(), Some("postgres://h/db"));
        assert!(matches!(cli.command, Command::Delete { client_id: 9 }));
    }
}
