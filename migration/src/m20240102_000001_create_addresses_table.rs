use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Address::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Address::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(Address::CustomerId).integer().not_null())
                .col(ColumnDef::new(Address::Name).string().not_null())
                .col(ColumnDef::new(Address::Street).string().not_null())
                .col(ColumnDef::new(Address::City).string().not_null())
                .col(ColumnDef::new(Address::State).string().not_null())
                .col(ColumnDef::new(Address::Postalcode).string().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_addresses_customer_id")
                        .from(Address::Table, Address::CustomerId)
                        .to(Customer::Table, Customer::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        // Create index on customer_id for the nested routes
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_addresses_customer_id")
                .table(Address::Table)
                .col(Address::CustomerId)
                .to_owned()
        ).await?;

        // Create index on street for the derived customer filter
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_addresses_street")
                .table(Address::Table)
                .col(Address::Street)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Address::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Address {
    Table,
    Id,
    CustomerId,
    Name,
    Street,
    City,
    State,
    Postalcode,
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
}
