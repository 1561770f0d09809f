use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Customer::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Customer::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(Customer::Name).string().not_null())
                .col(ColumnDef::new(Customer::FirstName).string().not_null())
                .col(ColumnDef::new(Customer::LastName).string().not_null())
                .col(ColumnDef::new(Customer::Email).string().not_null())
                .col(ColumnDef::new(Customer::PhoneNumber).string().null())
                .col(ColumnDef::new(Customer::AccountStatus).string().not_null())
                .to_owned()
        ).await?;

        // Create index on email for the list filter
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_customers_email")
                .table(Customer::Table)
                .col(Customer::Email)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
    Name,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    AccountStatus,
}
