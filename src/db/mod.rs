pub mod entity;
pub mod payload;

mod customer_repository;
pub use customer_repository::{ CustomerFilter, CustomerRepository, CustomerWithAddresses };

mod address_repository;
pub use address_repository::AddressRepository;

/// Clones a mock connection by sharing its inner `Arc`. Sea-ORM only
/// derives `Clone` for `DatabaseConnection` when the `mock` feature is
/// off, so tests need this to hand one mock connection to two owners.
#[cfg(test)]
pub(crate) fn clone_connection(db: &sea_orm::DatabaseConnection) -> sea_orm::DatabaseConnection {
    match db {
        sea_orm::DatabaseConnection::MockDatabaseConnection(conn) => {
            sea_orm::DatabaseConnection::MockDatabaseConnection(std::sync::Arc::clone(conn))
        }
        _ => panic!("clone_connection only supports mock connections"),
    }
}
