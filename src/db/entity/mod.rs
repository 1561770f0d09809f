pub mod customer;
pub mod address;

pub use customer::Entity as Customer;
pub use address::Entity as Address;
