use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Addresses::Address)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Hash)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Utxos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Utxos::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Utxos::TransactionId).big_integer().not_null())
                    .col(ColumnDef::new(Utxos::VoutIndex).integer().not_null())
                    .col(ColumnDef::new(Utxos::AddressId).big_integer().not_null())
                    .col(ColumnDef::new(Utxos::ValueSats).big_integer().not_null())
                    .col(ColumnDef::new(Utxos::BlockCreated).integer().not_null())
                    .col(ColumnDef::new(Utxos::BlockSpent).integer())
                    .col(ColumnDef::new(Utxos::TransactionSpentId).big_integer())
                    .to_owned(),
            )
            .await?;

        // Natural key of a utxo, also the input-resolution path
        manager
            .create_index(
                Index::create()
                    .name("utxos_transaction_vout")
                    .table(Utxos::Table)
                    .col(Utxos::TransactionId)
                    .col(Utxos::VoutIndex)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Snapshot scans filter by holder and lifetime window
        manager
            .create_index(
                Index::create()
                    .name("utxos_address_lifetime")
                    .table(Utxos::Table)
                    .col(Utxos::AddressId)
                    .col(Utxos::BlockCreated)
                    .col(Utxos::BlockSpent)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UtxoBalances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UtxoBalances::UtxoId).big_integer().not_null())
                    .col(ColumnDef::new(UtxoBalances::DuneId).big_integer().not_null())
                    .col(ColumnDef::new(UtxoBalances::Balance0).big_integer().not_null())
                    .col(ColumnDef::new(UtxoBalances::Balance1).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UtxoBalances::UtxoId)
                            .col(UtxoBalances::DuneId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Dunes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dunes::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Dunes::DuneProtocolId)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Dunes::Name).text().not_null().unique_key())
                    .col(ColumnDef::new(Dunes::Symbol).text())
                    .col(ColumnDef::new(Dunes::Decimals).small_integer().not_null())
                    .col(ColumnDef::new(Dunes::Premine0).big_integer().not_null())
                    .col(ColumnDef::new(Dunes::Premine1).big_integer().not_null())
                    .col(ColumnDef::new(Dunes::Mints0).big_integer().not_null())
                    .col(ColumnDef::new(Dunes::Mints1).big_integer().not_null())
                    .col(ColumnDef::new(Dunes::MintCap0).big_integer())
                    .col(ColumnDef::new(Dunes::MintCap1).big_integer())
                    .col(ColumnDef::new(Dunes::MintAmount0).big_integer())
                    .col(ColumnDef::new(Dunes::MintAmount1).big_integer())
                    .col(ColumnDef::new(Dunes::MintStart).integer())
                    .col(ColumnDef::new(Dunes::MintEnd).integer())
                    .col(ColumnDef::new(Dunes::MintOffsetStart).integer())
                    .col(ColumnDef::new(Dunes::MintOffsetEnd).integer())
                    .col(ColumnDef::new(Dunes::PriceAmount).big_integer())
                    .col(ColumnDef::new(Dunes::PricePayTo).text())
                    .col(ColumnDef::new(Dunes::Turbo).boolean().not_null())
                    .col(ColumnDef::new(Dunes::Unmintable).boolean().not_null())
                    .col(ColumnDef::new(Dunes::BurntAmount0).big_integer().not_null())
                    .col(ColumnDef::new(Dunes::BurntAmount1).big_integer().not_null())
                    .col(
                        ColumnDef::new(Dunes::EtchTransactionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Dunes::DeployerAddressId)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Balances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Balances::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Balances::AddressId).big_integer().not_null())
                    .col(ColumnDef::new(Balances::DuneId).big_integer().not_null())
                    .col(ColumnDef::new(Balances::Balance0).big_integer().not_null())
                    .col(ColumnDef::new(Balances::Balance1).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("balances_address_dune")
                    .table(Balances::Table)
                    .col(Balances::AddressId)
                    .col(Balances::DuneId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::EventType).small_integer().not_null())
                    .col(ColumnDef::new(Events::Block).integer().not_null())
                    .col(ColumnDef::new(Events::TransactionId).big_integer().not_null())
                    .col(ColumnDef::new(Events::DuneId).big_integer().not_null())
                    .col(ColumnDef::new(Events::Amount0).big_integer().not_null())
                    .col(ColumnDef::new(Events::Amount1).big_integer().not_null())
                    .col(
                        ColumnDef::new(Events::FromAddressId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::ToAddressId).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("events_transaction")
                    .table(Events::Table)
                    .col(Events::TransactionId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookmarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookmarks::Network)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookmarks::BlockHash).text().not_null())
                    .col(ColumnDef::new(Bookmarks::BlockHeight).integer().not_null())
                    .col(ColumnDef::new(Bookmarks::Confirmed).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlockStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlockStatuses::Height)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlockStatuses::BlockHash).text().not_null())
                    .col(ColumnDef::new(BlockStatuses::TxCount).integer().not_null())
                    .col(ColumnDef::new(BlockStatuses::EventCount).integer().not_null())
                    .col(ColumnDef::new(BlockStatuses::Confirmed).boolean().not_null())
                    .col(
                        ColumnDef::new(BlockStatuses::ProcessedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "block_statuses",
            "bookmarks",
            "events",
            "balances",
            "dunes",
            "utxo_balances",
            "utxos",
            "transactions",
            "addresses",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
    Address,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Hash,
}

#[derive(Iden)]
enum Utxos {
    Table,
    Id,
    TransactionId,
    VoutIndex,
    AddressId,
    ValueSats,
    BlockCreated,
    BlockSpent,
    TransactionSpentId,
}

#[derive(Iden)]
enum UtxoBalances {
    Table,
    UtxoId,
    DuneId,
    Balance0,
    Balance1,
}

#[derive(Iden)]
enum Dunes {
    Table,
    Id,
    DuneProtocolId,
    Name,
    Symbol,
    Decimals,
    Premine0,
    Premine1,
    Mints0,
    Mints1,
    MintCap0,
    MintCap1,
    MintAmount0,
    MintAmount1,
    MintStart,
    MintEnd,
    MintOffsetStart,
    MintOffsetEnd,
    PriceAmount,
    PricePayTo,
    Turbo,
    Unmintable,
    BurntAmount0,
    BurntAmount1,
    EtchTransactionId,
    DeployerAddressId,
}

#[derive(Iden)]
enum Balances {
    Table,
    Id,
    AddressId,
    DuneId,
    Balance0,
    Balance1,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    EventType,
    Block,
    TransactionId,
    DuneId,
    Amount0,
    Amount1,
    FromAddressId,
    ToAddressId,
}

#[derive(Iden)]
enum Bookmarks {
    Table,
    Network,
    BlockHash,
    BlockHeight,
    Confirmed,
}

#[derive(Iden)]
enum BlockStatuses {
    Table,
    Height,
    BlockHash,
    TxCount,
    EventCount,
    Confirmed,
    ProcessedAt,
}
