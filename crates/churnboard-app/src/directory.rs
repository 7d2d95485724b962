// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Customer;

/// Upper bound on cached directory entries. A truncation policy, not a
/// domain limit: the service may know more customers than the picker shows.
pub const DIRECTORY_CAPACITY: usize = 100;

/// Read-only snapshot of known customers, fetched once at startup and kept
/// in arrival order. A failed fetch leaves it empty; there is no refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerDirectory {
    customers: Vec<Customer>,
}

impl CustomerDirectory {
    pub fn from_fetched(mut customers: Vec<Customer>) -> Self {
        customers.truncate(DIRECTORY_CAPACITY);
        Self { customers }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Customer> {
        self.customers.get(index)
    }

    /// Display label for a directory entry; also the lookup key.
    pub fn label(customer: &Customer) -> String {
        format!("{} - {}", customer.customer_id, customer.surname)
    }

    /// Exact-label scan in arrival order; first match wins on duplicates.
    pub fn lookup(&self, label: &str) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|customer| Self::label(customer) == label)
    }
}

#[cfg(test)]
mod tests {
    use super::{CustomerDirectory, DIRECTORY_CAPACITY};
    use crate::Customer;

    fn customer(id: i64, surname: &str) -> Customer {
        Customer {
            customer_id: id,
            surname: surname.to_owned(),
        }
    }

    #[test]
    fn keeps_at_most_capacity_in_arrival_order() {
        let fetched: Vec<Customer> = (0..150)
            .map(|id| customer(id, &format!("Surname{id}")))
            .collect();
        let directory = CustomerDirectory::from_fetched(fetched);

        assert_eq!(directory.len(), DIRECTORY_CAPACITY);
        assert_eq!(directory.get(0).map(|c| c.customer_id), Some(0));
        assert_eq!(directory.get(99).map(|c| c.customer_id), Some(99));
    }

    #[test]
    fn small_fetches_are_kept_whole() {
        let directory = CustomerDirectory::from_fetched(vec![
            customer(7, "Okafor"),
            customer(3, "Smith"),
        ]);
        assert_eq!(directory.len(), 2);
        // Arrival order, no client-side sort.
        assert_eq!(directory.get(0).map(|c| c.customer_id), Some(7));
    }

    #[test]
    fn lookup_matches_exact_label() {
        let directory =
            CustomerDirectory::from_fetched(vec![customer(42, "Smith"), customer(43, "Smith")]);
        let found = directory.lookup("42 - Smith").expect("label should match");
        assert_eq!(found.customer_id, 42);
        assert!(directory.lookup("42 - smith").is_none());
        assert!(directory.lookup("44 - Smith").is_none());
    }

    #[test]
    fn lookup_returns_first_of_duplicate_labels() {
        let directory = CustomerDirectory::from_fetched(vec![
            customer(42, "Smith"),
            customer(42, "Smith"),
        ]);
        let found = directory.lookup("42 - Smith").expect("duplicate label");
        assert!(std::ptr::eq(found, directory.get(0).expect("first entry")));
    }
}
