use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    Set,
};

use crate::db::entity::{ address, Address };
use crate::db::payload::AddressData;
use crate::error::Result;
use crate::retry::RetryPolicy;

pub struct AddressRepository {
    db: DatabaseConnection,
    retry: RetryPolicy,
}

impl AddressRepository {
    pub fn new(db: DatabaseConnection, retry: RetryPolicy) -> Self {
        Self { db, retry }
    }

    /// Inserts an address owned by the given customer. The owning id comes
    /// from the route path, not from the payload.
    pub async fn create(&self, customer_id: i32, data: &AddressData) -> Result<address::Model> {
        self.retry.run(|| async move {
            (address::ActiveModel {
                customer_id: Set(customer_id),
                name: Set(data.name.clone()),
                street: Set(data.street.clone()),
                city: Set(data.city.clone()),
                state: Set(data.state.clone()),
                postalcode: Set(data.postalcode.clone()),
                ..Default::default()
            }).insert(&self.db).await
        }).await
    }

    pub async fn find(&self, id: i32) -> Result<Option<address::Model>> {
        self.retry.run(|| async move {
            Address::find_by_id(id).one(&self.db).await
        }).await
    }

    pub async fn list_by_customer(&self, customer_id: i32) -> Result<Vec<address::Model>> {
        self.retry.run(|| async move {
            Address::find()
                .filter(address::Column::CustomerId.eq(customer_id))
                .all(&self.db).await
        }).await
    }

    /// Full replace of an existing address. Returns None when no row carries
    /// the given id.
    pub async fn update(&self, id: i32, data: &AddressData) -> Result<Option<address::Model>> {
        self.retry.run(|| async move {
            let Some(existing) = Address::find_by_id(id).one(&self.db).await? else {
                return Ok(None);
            };

            let mut model: address::ActiveModel = existing.into();
            model.customer_id = Set(data.customer_id);
            model.name = Set(data.name.clone());
            model.street = Set(data.street.clone());
            model.city = Set(data.city.clone());
            model.state = Set(data.state.clone());
            model.postalcode = Set(data.postalcode.clone());

            Ok(Some(model.update(&self.db).await?))
        }).await
    }

    /// Idempotent delete.
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.retry.run(|| async move {
            Address::delete_by_id(id).exec(&self.db).await?;
            Ok(())
        }).await
    }
}
