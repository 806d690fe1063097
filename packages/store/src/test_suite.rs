//! Fixture records shared by backend test suites.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct User {
    pub name: String,
    pub age: String,
    pub contact: String,
    pub company: String,
    pub address: Address,
}

impl User {
    pub fn new(name: &str, company: &str) -> User {
        User {
            name: name.to_string(),
            age: "24".to_string(),
            contact: "233444444".to_string(),
            company: company.to_string(),
            address: Address {
                city: "Lagos".to_string(),
                state: "Lagos".to_string(),
                country: "Nigeria".to_string(),
                pincode: "12333".to_string(),
            },
        }
    }
}

/// A handful of distinct users, keyed by unique names.
pub fn employees() -> Vec<User> {
    vec![
        User::new("john", "Smart Programmer"),
        User::new("Temi", "Smart Programmer"),
        User::new("Folake", "Greenland"),
        User::new("Taiye", "Microsoft"),
        User::new("Badru", "Google"),
    ]
}
