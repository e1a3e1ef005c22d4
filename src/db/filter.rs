//! Lookup criteria for clients and the SQL they compile to.
//!
//! Criteria are kept as typed predicates and folded into a [`QueryBuilder`];
//! every value goes through `push_bind`, so the statement text only ever
//! contains column names and `$n` placeholders.

use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};

const SELECT_CLIENTS: &str = r#"SELECT c.id, c.first_name, c.last_name, c.email,
       COALESCE(ARRAY_AGG(p.phone::text ORDER BY p.id) FILTER (WHERE p.phone IS NOT NULL), ARRAY[]::text[]) AS phones
FROM clients c
LEFT JOIN phones p ON p.client_id = c.id"#;

const GROUP_AND_ORDER: &str = "\nGROUP BY c.id, c.first_name, c.last_name, c.email\nORDER BY c.id";

/// Optional criteria for `find_clients`; unset fields are not filtered on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ClientFilter {
    /// A filter matching every client
    pub fn all() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    /// The supplied criteria, in a fixed order
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(value) = &self.first_name {
            predicates.push(Predicate::FirstName(value.clone()));
        }
        if let Some(value) = &self.last_name {
            predicates.push(Predicate::LastName(value.clone()));
        }
        if let Some(value) = &self.email {
            predicates.push(Predicate::Email(value.clone()));
        }
        if let Some(value) = &self.phone {
            predicates.push(Predicate::Phone(value.clone()));
        }
        predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }
}

/// A single equality criterion and the value it binds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    FirstName(String),
    LastName(String),
    Email(String),
    /// Client owns a phone with exactly this number
    Phone(String),
}

impl Predicate {
    fn push_to(self, clause: &mut Separated<'_, 'static, Postgres, &'static str>) {
        match self {
            Predicate::FirstName(value) => {
                clause.push("c.first_name = ");
                clause.push_bind_unseparated(value);
            }
            Predicate::LastName(value) => {
                clause.push("c.last_name = ");
                clause.push_bind_unseparated(value);
            }
            Predicate::Email(value) => {
                clause.push("c.email = ");
                clause.push_bind_unseparated(value);
            }
            // Filtering the joined rows directly would drop the client's other
            // numbers from the aggregate.
            Predicate::Phone(value) => {
                clause.push("EXISTS (SELECT 1 FROM phones f WHERE f.client_id = c.id AND f.phone = ");
                clause.push_bind_unseparated(value);
                clause.push_unseparated(")");
            }
        }
    }
}

/// Builds the lookup statement for `filter` with its values bound
pub fn find_clients_query(filter: &ClientFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_CLIENTS);

    let predicates = filter.predicates();
    if !predicates.is_empty() {
        builder.push("\nWHERE ");
        let mut clause = builder.separated(" AND ");
        for predicate in predicates {
            predicate.push_to(&mut clause);
        }
    }

    builder.push(GROUP_AND_ORDER);
    builder
}
