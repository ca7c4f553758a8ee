use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, QueryOrder, Set, TransactionTrait};

use crate::database::Database;
use crate::entities;
use crate::services::error::BookingError;
use crate::services::{db_failed, transaction_failed};

#[derive(Clone, Debug)]
pub struct ShowInput {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: DateTime<Utc>,
}

/// One row of the show listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show in storage order, no time filtering
    pub async fn list(&self) -> Result<Vec<ShowListing>> {
        let shows = entities::show::Entity::find()
            .order_by_asc(entities::show::Column::Id)
            .find_also_related(entities::venue::Entity)
            .all(&self.db.conn)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch shows: {}", e))?;

        let mut listings = Vec::with_capacity(shows.len());
        for (show, venue) in shows {
            let venue = venue.ok_or_else(|| {
                color_eyre::eyre::eyre!("Show {} has no associated venue", show.id)
            })?;
            let artist = entities::artist::Entity::find_by_id(show.artist_id)
                .one(&self.db.conn)
                .await
                .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch show artist: {}", e))?
                .ok_or_else(|| {
                    color_eyre::eyre::eyre!("Show {} has no associated artist", show.id)
                })?;

            listings.push(ShowListing {
                venue_id: venue.id,
                venue_name: venue.name,
                artist_id: artist.id,
                artist_name: artist.name,
                artist_image_link: artist.image_link,
                start_time: show.start_time,
            });
        }

        Ok(listings)
    }

    /// Book `artist_id` at `venue_id`. Both must already exist; otherwise
    /// nothing is written and the error is a `NotFound`.
    pub async fn create(&self, input: ShowInput) -> Result<entities::show::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::show::Model, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    entities::venue::Entity::find_by_id(input.venue_id)
                        .one(txn)
                        .await
                        .map_err(db_failed("fetch venue"))?
                        .ok_or_else(|| BookingError::not_found("Venue", input.venue_id))?;

                    entities::artist::Entity::find_by_id(input.artist_id)
                        .one(txn)
                        .await
                        .map_err(db_failed("fetch artist"))?
                        .ok_or_else(|| BookingError::not_found("Artist", input.artist_id))?;

                    let show = entities::show::ActiveModel {
                        id: ActiveValue::NotSet,
                        venue_id: Set(input.venue_id),
                        artist_id: Set(input.artist_id),
                        start_time: Set(input.start_time),
                    };
                    show.insert(txn).await.map_err(db_failed("create show"))
                })
            })
            .await
            .map_err(|e| transaction_failed("create show", e))?;

        log::info!(
            "Show created: artist {} at venue {} on {} (ID: {})",
            model.artist_id,
            model.venue_id,
            model.start_time,
            model.id
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genres::Genres;
    use crate::services::artist::{ArtistInput, ArtistService};
    use crate::services::error::{is_not_found, is_persistence};
    use crate::services::venue::{VenueInput, VenueService};
    use crate::test_utils::test_db;
    use chrono::TimeZone;

    async fn seed(db: Arc<Database>) -> (entities::venue::Model, entities::artist::Model) {
        let venue = VenueService::new(db.clone())
            .create(VenueInput {
                name: "The Musical Hop".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                address: "1015 Folsom Street".to_string(),
                genres: Genres::new(vec!["Jazz".to_string()]),
                ..Default::default()
            })
            .await
            .unwrap();
        let artist = ArtistService::new(db)
            .create(ArtistInput {
                name: "Guns N Petals".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                genres: Genres::new(vec!["Rock n Roll".to_string()]),
                image_link: Some("https://example.com/petals.jpg".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        (venue, artist)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_db().await;
        let (venue, artist) = seed(db.clone()).await;
        let service = ShowService::new(db);

        let start_time = Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap();
        let show = service
            .create(ShowInput {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time,
            })
            .await
            .unwrap();
        assert_eq!(show.artist_id, artist.id);
        assert_eq!(show.venue_id, venue.id);

        let listings = service.list().await.unwrap();
        assert_eq!(
            listings,
            vec![ShowListing {
                venue_id: venue.id,
                venue_name: "The Musical Hop".to_string(),
                artist_id: artist.id,
                artist_name: "Guns N Petals".to_string(),
                artist_image_link: Some("https://example.com/petals.jpg".to_string()),
                start_time,
            }]
        );
    }

    #[tokio::test]
    async fn test_create_uses_submitted_ids() {
        let db = test_db().await;
        seed(db.clone()).await;
        let (venue, artist) = seed(db.clone()).await;
        let service = ShowService::new(db);

        let show = service
            .create(ShowInput {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: Utc::now(),
            })
            .await
            .unwrap();
        assert_ne!(venue.id, 1);
        assert_eq!(show.venue_id, venue.id);
        assert_eq!(show.artist_id, artist.id);
    }

    #[tokio::test]
    async fn test_create_with_missing_parent_persists_nothing() {
        let db = test_db().await;
        let (venue, artist) = seed(db.clone()).await;
        let service = ShowService::new(db);

        let err = service
            .create(ShowInput {
                artist_id: artist.id + 100,
                venue_id: venue.id,
                start_time: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(is_not_found(&err));

        let err = service
            .create(ShowInput {
                artist_id: artist.id,
                venue_id: venue.id + 100,
                start_time: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(is_not_found(&err));

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_show_is_rejected() {
        let db = test_db().await;
        let (venue, artist) = seed(db.clone()).await;
        let service = ShowService::new(db);
        let input = ShowInput {
            artist_id: artist.id,
            venue_id: venue.id,
            start_time: Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap(),
        };

        service.create(input.clone()).await.unwrap();
        let err = service.create(input.clone()).await.unwrap_err();
        assert!(is_persistence(&err));

        // Same pair at another time is a different show
        service
            .create(ShowInput {
                start_time: input.start_time + chrono::Duration::hours(3),
                ..input
            })
            .await
            .unwrap();
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
