use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create venue table
        manager
            .create_table(
                Table::create()
                    .table(Venue::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Venue::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Venue::Name).string().not_null())
                    .col(ColumnDef::new(Venue::City).string_len(120).not_null())
                    .col(ColumnDef::new(Venue::State).string_len(120).not_null())
                    .col(ColumnDef::new(Venue::Address).string_len(120).not_null())
                    .col(ColumnDef::new(Venue::Phone).string_len(120))
                    .col(
                        ColumnDef::new(Venue::Genres)
                            .string_len(120)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Venue::Website).string_len(120))
                    .col(
                        ColumnDef::new(Venue::SeekingTalent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Venue::SeekingDescription).string_len(500))
                    .col(ColumnDef::new(Venue::ImageLink).string_len(500))
                    .col(ColumnDef::new(Venue::FacebookLink).string_len(120))
                    .to_owned(),
            )
            .await?;

        // Create artist table
        manager
            .create_table(
                Table::create()
                    .table(Artist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artist::Name).string().not_null())
                    .col(ColumnDef::new(Artist::City).string_len(120).not_null())
                    .col(ColumnDef::new(Artist::State).string_len(120).not_null())
                    .col(ColumnDef::new(Artist::Phone).string_len(120))
                    .col(
                        ColumnDef::new(Artist::Genres)
                            .string_len(120)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Artist::SeekingVenue)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Artist::SeekingDescription).string_len(500))
                    .col(ColumnDef::new(Artist::Website).string_len(120))
                    .col(ColumnDef::new(Artist::ImageLink).string_len(500))
                    .col(ColumnDef::new(Artist::FacebookLink).string_len(120))
                    .to_owned(),
            )
            .await?;

        // Create show table, linking one artist to one venue at a start time
        manager
            .create_table(
                Table::create()
                    .table(Show::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Show::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Show::VenueId).integer().not_null())
                    .col(ColumnDef::new(Show::ArtistId).integer().not_null())
                    .col(
                        ColumnDef::new(Show::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_show_venue_id")
                            .from(Show::Table, Show::VenueId)
                            .to(Venue::Table, Venue::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_show_artist_id")
                            .from(Show::Table, Show::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // (venue_id, artist_id, start_time) identifies a show
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_show_venue_artist_start_time")
                    .table(Show::Table)
                    .col(Show::VenueId)
                    .col(Show::ArtistId)
                    .col(Show::StartTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_show_artist_id")
                    .table(Show::Table)
                    .col(Show::ArtistId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order
        manager
            .drop_table(Table::drop().table(Show::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Venue::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Venue {
    Table,
    Id,
    Name,
    City,
    State,
    Address,
    Phone,
    Genres,
    Website,
    SeekingTalent,
    SeekingDescription,
    ImageLink,
    FacebookLink,
}

#[derive(DeriveIden)]
enum Artist {
    Table,
    Id,
    Name,
    City,
    State,
    Phone,
    Genres,
    SeekingVenue,
    SeekingDescription,
    Website,
    ImageLink,
    FacebookLink,
}

#[derive(DeriveIden)]
enum Show {
    Table,
    Id,
    VenueId,
    ArtistId,
    StartTime,
}
