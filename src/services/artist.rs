use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::genres::Genres;
use crate::services::error::BookingError;
use crate::services::{
    SearchResults, ShowsByTime, db_failed, search_by_name, transaction_failed,
};

/// Every mutable artist field, as submitted through the artist form.
#[derive(Clone, Debug, Default)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Genres,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub website: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
}

impl ArtistInput {
    fn apply(self, active: &mut entities::artist::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.phone = Set(self.phone);
        active.genres = Set(self.genres.to_stored());
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_description = Set(self.seeking_description);
        active.website = Set(self.website);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
    }
}

impl From<&entities::artist::Model> for ArtistInput {
    fn from(artist: &entities::artist::Model) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: artist.genre_list(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
            website: artist.website.clone(),
            image_link: artist.image_link.clone(),
            facebook_link: artist.facebook_link.clone(),
        }
    }
}

/// A show as seen from its artist's page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VenueShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct ArtistDetail {
    pub artist: entities::artist::Model,
    pub genres: Genres,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every artist, in storage order
    pub async fn list(&self) -> Result<Vec<entities::artist::Model>> {
        entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Id)
            .all(&self.db.conn)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch artists: {}", e))
    }

    pub async fn search(&self, search_term: &str) -> Result<SearchResults> {
        search_by_name::<entities::artist::Entity>(
            &self.db.conn,
            entities::artist::Column::Id,
            entities::artist::Column::Name,
            search_term,
        )
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to search artists: {}", e))
    }

    pub async fn get(&self, artist_id: i64) -> Result<entities::artist::Model> {
        entities::artist::Entity::find_by_id(artist_id)
            .one(&self.db.conn)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch artist: {}", e))?
            .ok_or_else(|| BookingError::not_found("Artist", artist_id))
    }

    pub async fn detail(&self, artist_id: i64, now: DateTime<Utc>) -> Result<ArtistDetail> {
        let artist = self.get(artist_id).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(artist_id))
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::venue::Entity)
            .all(&self.db.conn)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch artist shows: {}", e))?;

        let shows = shows.into_iter().filter_map(|(show, venue)| {
            venue.map(|venue| VenueShow {
                venue_id: venue.id,
                venue_name: venue.name,
                venue_image_link: venue.image_link,
                start_time: show.start_time,
            })
        });
        let split = ShowsByTime::partition(shows, |s| s.start_time, now);

        Ok(ArtistDetail {
            genres: artist.genre_list(),
            artist,
            past_shows_count: split.past.len(),
            upcoming_shows_count: split.upcoming.len(),
            past_shows: split.past,
            upcoming_shows: split.upcoming,
        })
    }

    pub async fn create(&self, input: ArtistInput) -> Result<entities::artist::Model> {
        let mut artist = entities::artist::ActiveModel {
            id: ActiveValue::NotSet,
            ..Default::default()
        };
        input.apply(&mut artist);

        let model = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, color_eyre::eyre::Report>(|txn| {
                Box::pin(
                    async move { artist.insert(txn).await.map_err(db_failed("create artist")) },
                )
            })
            .await
            .map_err(|e| transaction_failed("create artist", e))?;

        log::info!("Artist created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    pub async fn update(
        &self,
        artist_id: i64,
        input: ArtistInput,
    ) -> Result<entities::artist::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    let artist = entities::artist::Entity::find_by_id(artist_id)
                        .one(txn)
                        .await
                        .map_err(db_failed("fetch artist"))?
                        .ok_or_else(|| BookingError::not_found("Artist", artist_id))?;

                    let mut active: entities::artist::ActiveModel = artist.into();
                    input.apply(&mut active);
                    active.update(txn).await.map_err(db_failed("update artist"))
                })
            })
            .await
            .map_err(|e| transaction_failed("update artist", e))?;

        log::info!("Artist updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    pub async fn delete(&self, artist_id: i64) -> Result<u64> {
        let rows = self
            .db
            .conn
            .transaction::<_, u64, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    entities::artist::Entity::delete_many()
                        .filter(entities::artist::Column::Id.eq(artist_id))
                        .exec(txn)
                        .await
                        .map(|r| r.rows_affected)
                        .map_err(db_failed("delete artist"))
                })
            })
            .await
            .map_err(|e| transaction_failed("delete artist", e))?;

        log::info!("Deleted {} artist row(s) for ID {}", rows, artist_id);
        Ok(rows)
    }
}
