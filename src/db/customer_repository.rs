use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    DatabaseConnection,
    DbErr,
    EntityTrait,
    ModelTrait,
    QueryFilter,
    Set,
    TransactionTrait,
};

use crate::db::entity::{ address, customer, Address, Customer };
use crate::db::payload::CustomerData;
use crate::enums::AccountStatus;
use crate::error::Result;
use crate::retry::RetryPolicy;

/// A customer row together with its owned address rows.
pub type CustomerWithAddresses = (customer::Model, Vec<address::Model>);

/// Exact-match list filter; street and postalcode join through addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerFilter {
    Name(String),
    FirstName(String),
    LastName(String),
    Email(String),
    PhoneNumber(String),
    Street(String),
    Postalcode(String),
}

pub struct CustomerRepository {
    db: DatabaseConnection,
    retry: RetryPolicy,
}

impl CustomerRepository {
    pub fn new(db: DatabaseConnection, retry: RetryPolicy) -> Self {
        Self { db, retry }
    }

    /// Inserts a new customer and its nested addresses in one transaction,
    /// assigning fresh ids. A failed attempt rolls back before any retry
    /// re-runs it, so no partial customer is ever committed.
    pub async fn create(&self, data: &CustomerData) -> Result<CustomerWithAddresses> {
        self.retry.run(|| async move {
            let txn = self.db.begin().await?;

            let customer = (customer::ActiveModel {
                name: Set(data.name.clone()),
                first_name: Set(data.first_name.clone()),
                last_name: Set(data.last_name.clone()),
                email: Set(data.email.clone()),
                phone_number: Set(data.phone_number.clone()),
                account_status: Set(data.account_status.clone()),
                ..Default::default()
            }).insert(&txn).await?;

            let mut addresses = Vec::with_capacity(data.addresses.len());
            for entry in &data.addresses {
                let address = (address::ActiveModel {
                    customer_id: Set(customer.id),
                    name: Set(entry.name.clone()),
                    street: Set(entry.street.clone()),
                    city: Set(entry.city.clone()),
                    state: Set(entry.state.clone()),
                    postalcode: Set(entry.postalcode.clone()),
                    ..Default::default()
                }).insert(&txn).await?;
                addresses.push(address);
            }

            txn.commit().await?;

            Ok((customer, addresses))
        }).await
    }

    /// Returns the customer matching id, or None - never errors on absence.
    pub async fn find(&self, id: i32) -> Result<Option<CustomerWithAddresses>> {
        self.retry.run(|| async move {
            let Some(customer) = Customer::find_by_id(id).one(&self.db).await? else {
                return Ok(None);
            };
            let addresses = customer.find_related(Address).all(&self.db).await?;
            Ok(Some((customer, addresses)))
        }).await
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        self.retry.run(|| async move {
            Ok(Customer::find_by_id(id).one(&self.db).await?.is_some())
        }).await
    }

    pub async fn all(&self) -> Result<Vec<CustomerWithAddresses>> {
        self.retry.run(|| async move {
            Customer::find().find_with_related(Address).all(&self.db).await
        }).await
    }

    pub async fn find_by(&self, filter: &CustomerFilter) -> Result<Vec<CustomerWithAddresses>> {
        self.retry.run(|| async move {
            let query = match filter {
                CustomerFilter::Name(value) =>
                    Customer::find().filter(customer::Column::Name.eq(value.as_str())),
                CustomerFilter::FirstName(value) =>
                    Customer::find().filter(customer::Column::FirstName.eq(value.as_str())),
                CustomerFilter::LastName(value) =>
                    Customer::find().filter(customer::Column::LastName.eq(value.as_str())),
                CustomerFilter::Email(value) =>
                    Customer::find().filter(customer::Column::Email.eq(value.as_str())),
                CustomerFilter::PhoneNumber(value) =>
                    Customer::find().filter(customer::Column::PhoneNumber.eq(value.as_str())),
                CustomerFilter::Street(value) => {
                    return self.find_by_address_column(address::Column::Street, value).await;
                }
                CustomerFilter::Postalcode(value) => {
                    return self.find_by_address_column(address::Column::Postalcode, value).await;
                }
            };

            query.find_with_related(Address).all(&self.db).await
        }).await
    }

    // Derived filters: collect owning customer ids from the address table,
    // then select customers by id, rather than materializing a joined graph.
    async fn find_by_address_column(
        &self,
        column: address::Column,
        value: &str
    ) -> std::result::Result<Vec<CustomerWithAddresses>, DbErr> {
        let customer_ids: Vec<i32> = Address::find()
            .filter(column.eq(value))
            .all(&self.db).await?
            .into_iter()
            .map(|address| address.customer_id)
            .collect();

        Customer::find()
            .filter(customer::Column::Id.is_in(customer_ids))
            .find_with_related(Address)
            .all(&self.db).await
    }

    /// Full replace of the scalar fields of an existing customer.
    /// Returns None when no row carries the given id.
    pub async fn update(&self, id: i32, data: &CustomerData) -> Result<Option<CustomerWithAddresses>> {
        self.retry.run(|| async move {
            let Some(existing) = Customer::find_by_id(id).one(&self.db).await? else {
                return Ok(None);
            };

            let mut model: customer::ActiveModel = existing.into();
            model.name = Set(data.name.clone());
            model.first_name = Set(data.first_name.clone());
            model.last_name = Set(data.last_name.clone());
            model.email = Set(data.email.clone());
            model.phone_number = Set(data.phone_number.clone());
            model.account_status = Set(data.account_status.clone());

            let updated = model.update(&self.db).await?;
            let addresses = updated.find_related(Address).all(&self.db).await?;
            Ok(Some((updated, addresses)))
        }).await
    }

    /// Targeted account_status mutation for the suspend/restore actions.
    /// Setting the current status again is a no-op commit.
    pub async fn set_status(
        &self,
        id: i32,
        status: AccountStatus
    ) -> Result<Option<CustomerWithAddresses>> {
        self.retry.run(|| async move {
            let Some(existing) = Customer::find_by_id(id).one(&self.db).await? else {
                return Ok(None);
            };

            let mut model: customer::ActiveModel = existing.into();
            model.account_status = Set(status.as_str().to_string());

            let updated = model.update(&self.db).await?;
            let addresses = updated.find_related(Address).all(&self.db).await?;
            Ok(Some((updated, addresses)))
        }).await
    }

    /// Idempotent delete; owned addresses are removed by the cascading
    /// foreign key.
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.retry.run(|| async move {
            Customer::delete_by_id(id).exec(&self.db).await?;
            Ok(())
        }).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sea_orm::{ DatabaseBackend, MockDatabase };

    use crate::db::payload::AddressData;

    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(1, Duration::from_millis(1), 2.0)
    }

    fn customer_row() -> customer::Model {
        customer::Model {
            id: 1,
            name: "jdoe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: None,
            account_status: "active".to_string(),
        }
    }

    fn address_row() -> address::Model {
        address::Model {
            id: 3,
            customer_id: 1,
            name: "Home".to_string(),
            street: "1 Main".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postalcode: "62704".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_with_addresses_commits_a_single_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![customer_row()]])
            .append_query_results([vec![address_row()]])
            .into_connection();

        let repository = CustomerRepository::new(crate::db::clone_connection(&db), policy());
        let data = CustomerData {
            name: "jdoe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: None,
            account_status: "active".to_string(),
            addresses: vec![AddressData {
                customer_id: 0,
                name: "Home".to_string(),
                street: "1 Main".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                postalcode: "62704".to_string(),
            }],
        };

        let (created, addresses) = repository.create(&data).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].customer_id, 1);

        // The customer insert and its address inserts must share one
        // committed transaction, so an interrupted attempt rolls back
        // instead of leaving a partial customer behind.
        drop(repository);
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements = format!("{:?}", log[0]);
        assert!(statements.contains("BEGIN"));
        assert!(statements.contains("COMMIT"));
        assert_eq!(statements.matches("INSERT").count(), 2);
    }
}
