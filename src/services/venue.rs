use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::genres::Genres;
use crate::services::error::BookingError;
use crate::services::{
    SearchResults, ShowsByTime, db_failed, search_by_name, transaction_failed,
};

/// Every mutable venue field, as submitted through the venue form.
#[derive(Clone, Debug, Default)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Genres,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
}

impl VenueInput {
    /// Overwrite every mutable column of `active`
    fn apply(self, active: &mut entities::venue::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.address = Set(self.address);
        active.phone = Set(self.phone);
        active.genres = Set(self.genres.to_stored());
        active.website = Set(self.website);
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_description = Set(self.seeking_description);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
    }
}

impl From<&entities::venue::Model> for VenueInput {
    fn from(venue: &entities::venue::Model) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            genres: venue.genre_list(),
            website: venue.website.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
            image_link: venue.image_link.clone(),
            facebook_link: venue.facebook_link.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_shows: u64,
}

/// Venues sharing one (city, state) pair
#[derive(Clone, Debug)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// A show as seen from its venue's page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct VenueDetail {
    pub venue: entities::venue::Model,
    pub genres: Genres,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All venues grouped by (city, state), each with its total show count.
    /// Areas are ordered by state then city, venues within an area by id.
    pub async fn list_by_area(&self) -> Result<Vec<VenueArea>> {
        let rows: Vec<(i64, String, String, String, i64)> = entities::venue::Entity::find()
            .select_only()
            .column(entities::venue::Column::Id)
            .column(entities::venue::Column::Name)
            .column(entities::venue::Column::City)
            .column(entities::venue::Column::State)
            .column_as(
                Expr::from(Func::count(Expr::col(
                    entities::show::Column::Id.as_column_ref(),
                ))),
                "num_shows",
            )
            .left_join(entities::show::Entity)
            .group_by(entities::venue::Column::Id)
            .order_by_asc(entities::venue::Column::State)
            .order_by_asc(entities::venue::Column::City)
            .order_by_asc(entities::venue::Column::Id)
            .into_tuple()
            .all(&self.db.conn)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch venues by area: {}", e))?;

        let mut areas: Vec<VenueArea> = Vec::new();
        for (id, name, city, state, num_shows) in rows {
            let summary = VenueSummary {
                id,
                name,
                num_shows: num_shows as u64,
            };
            match areas.last_mut() {
                Some(area) if area.city == city && area.state == state => {
                    area.venues.push(summary)
                }
                _ => areas.push(VenueArea {
                    city,
                    state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(areas)
    }

    pub async fn search(&self, search_term: &str) -> Result<SearchResults> {
        search_by_name::<entities::venue::Entity>(
            &self.db.conn,
            entities::venue::Column::Id,
            entities::venue::Column::Name,
            search_term,
        )
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to search venues: {}", e))
    }

    pub async fn get(&self, venue_id: i64) -> Result<entities::venue::Model> {
        entities::venue::Entity::find_by_id(venue_id)
            .one(&self.db.conn)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch venue: {}", e))?
            .ok_or_else(|| BookingError::not_found("Venue", venue_id))
    }

    /// The venue with its shows split into past and upcoming relative to `now`.
    pub async fn detail(&self, venue_id: i64, now: DateTime<Utc>) -> Result<VenueDetail> {
        let venue = self.get(venue_id).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(venue_id))
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::artist::Entity)
            .all(&self.db.conn)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch venue shows: {}", e))?;

        let shows = shows.into_iter().filter_map(|(show, artist)| {
            artist.map(|artist| ArtistShow {
                artist_id: artist.id,
                artist_name: artist.name,
                artist_image_link: artist.image_link,
                start_time: show.start_time,
            })
        });
        let split = ShowsByTime::partition(shows, |s| s.start_time, now);

        Ok(VenueDetail {
            genres: venue.genre_list(),
            venue,
            past_shows_count: split.past.len(),
            upcoming_shows_count: split.upcoming.len(),
            past_shows: split.past,
            upcoming_shows: split.upcoming,
        })
    }

    pub async fn create(&self, input: VenueInput) -> Result<entities::venue::Model> {
        let mut venue = entities::venue::ActiveModel {
            id: ActiveValue::NotSet,
            ..Default::default()
        };
        input.apply(&mut venue);

        let model = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move { venue.insert(txn).await.map_err(db_failed("create venue")) })
            })
            .await
            .map_err(|e| transaction_failed("create venue", e))?;

        log::info!("Venue created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Full overwrite of every mutable field.
    pub async fn update(&self, venue_id: i64, input: VenueInput) -> Result<entities::venue::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    let venue = entities::venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await
                        .map_err(db_failed("fetch venue"))?
                        .ok_or_else(|| BookingError::not_found("Venue", venue_id))?;

                    let mut active: entities::venue::ActiveModel = venue.into();
                    input.apply(&mut active);
                    active.update(txn).await.map_err(db_failed("update venue"))
                })
            })
            .await
            .map_err(|e| transaction_failed("update venue", e))?;

        log::info!("Venue updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Delete the venue (and, through the foreign key, its shows). Deleting an
    /// unknown id affects no rows and is not an error.
    pub async fn delete(&self, venue_id: i64) -> Result<u64> {
        let rows = self
            .db
            .conn
            .transaction::<_, u64, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    entities::venue::Entity::delete_many()
                        .filter(entities::venue::Column::Id.eq(venue_id))
                        .exec(txn)
                        .await
                        .map(|r| r.rows_affected)
                        .map_err(db_failed("delete venue"))
                })
            })
            .await
            .map_err(|e| transaction_failed("delete venue", e))?;

        log::info!("Deleted {} venue row(s) for ID {}", rows, venue_id);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::artist::{ArtistInput, ArtistService};
    use crate::services::error::is_not_found;
    use crate::services::show::{ShowInput, ShowService};
    use crate::test_utils::test_db;
    use chrono::Duration;

    fn venue_input(name: &str, city: &str, state: &str) -> VenueInput {
        VenueInput {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: "1015 Folsom Street".to_string(),
            genres: Genres::new(vec!["Jazz".to_string(), "Reggae".to_string()]),
            ..Default::default()
        }
    }

    fn artist_input(name: &str) -> ArtistInput {
        ArtistInput {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            genres: Genres::new(vec!["Rock n Roll".to_string()]),
            image_link: Some("https://example.com/artist.jpg".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_detail_without_shows() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let venue = service
            .create(venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        assert_eq!(venue.genres, "Jazz,Reggae");

        let detail = service.detail(venue.id, Utc::now()).await.unwrap();
        assert_eq!(detail.venue.name, "The Musical Hop");
        assert_eq!(
            detail.genres.as_slice(),
            &["Jazz".to_string(), "Reggae".to_string()]
        );
        assert_eq!(detail.past_shows_count, 0);
        assert_eq!(detail.upcoming_shows_count, 0);
        assert!(detail.past_shows.is_empty());
        assert!(detail.upcoming_shows.is_empty());
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service.detail(42, Utc::now()).await.unwrap_err();
        assert!(is_not_found(&err));
    }

    #[tokio::test]
    async fn test_list_by_area_groups_city_and_state() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let hop = service
            .create(venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let dueling = service
            .create(venue_input("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();
        let park = service
            .create(venue_input(
                "Park Square Live Music & Coffee",
                "San Francisco",
                "CA",
            ))
            .await
            .unwrap();

        let artist = ArtistService::new(db.clone())
            .create(artist_input("Guns N Petals"))
            .await
            .unwrap();
        let shows = ShowService::new(db);
        for offset in [-48, 48] {
            shows
                .create(ShowInput {
                    artist_id: artist.id,
                    venue_id: hop.id,
                    start_time: Utc::now() + Duration::hours(offset),
                })
                .await
                .unwrap();
        }

        let areas = service.list_by_area().await.unwrap();
        assert_eq!(areas.len(), 2);

        let sf = areas
            .iter()
            .find(|a| a.city == "San Francisco" && a.state == "CA")
            .unwrap();
        assert_eq!(
            sf.venues,
            vec![
                VenueSummary {
                    id: hop.id,
                    name: "The Musical Hop".to_string(),
                    num_shows: 2,
                },
                VenueSummary {
                    id: park.id,
                    name: "Park Square Live Music & Coffee".to_string(),
                    num_shows: 0,
                },
            ]
        );

        let ny = areas.iter().find(|a| a.city == "New York").unwrap();
        assert_eq!(ny.venues.len(), 1);
        assert_eq!(ny.venues[0].id, dueling.id);
    }

    #[tokio::test]
    async fn test_same_city_different_state_is_separate_area() {
        let db = test_db().await;
        let service = VenueService::new(db);

        service
            .create(venue_input("Portland Hall", "Portland", "OR"))
            .await
            .unwrap();
        service
            .create(venue_input("Portland Barn", "Portland", "ME"))
            .await
            .unwrap();

        let areas = service.list_by_area().await.unwrap();
        assert_eq!(areas.len(), 2);
        assert!(areas.iter().all(|a| a.venues.len() == 1));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let hop = service
            .create(venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let park = service
            .create(venue_input(
                "Park Square Live Music & Coffee",
                "San Francisco",
                "CA",
            ))
            .await
            .unwrap();
        service
            .create(venue_input("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();

        let results = service.search("Music").await.unwrap();
        assert_eq!(results.count, 2);
        let ids: Vec<i64> = results.data.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![hop.id, park.id]);

        let results = service.search("hOP").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "The Musical Hop");

        let results = service.search("zzz").await.unwrap();
        assert_eq!(results.count, 0);
        assert!(results.data.is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let eclair = service
            .create(venue_input("Éclair Hall", "Montréal", "NY"))
            .await
            .unwrap();
        service
            .create(venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        for term in ["Éclair", "éclair", "ÉCLAIR", "hall"] {
            let results = service.search(term).await.unwrap();
            assert_eq!(results.count, 1, "{term}");
            assert_eq!(results.data[0].id, eclair.id);
        }
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = test_db().await;
        let service = VenueService::new(db);

        service
            .create(venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        assert_eq!(service.search("%").await.unwrap().count, 0);
        assert_eq!(service.search("_").await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let venue = service
            .create(VenueInput {
                phone: Some("123-123-1234".to_string()),
                seeking_talent: true,
                seeking_description: Some("Looking for jazz".to_string()),
                ..venue_input("The Musical Hop", "San Francisco", "CA")
            })
            .await
            .unwrap();

        let updated = service
            .update(
                venue.id,
                VenueInput {
                    genres: Genres::new(vec!["Folk".to_string()]),
                    ..venue_input("The Hop", "Oakland", "CA")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, venue.id);
        assert_eq!(updated.name, "The Hop");
        assert_eq!(updated.city, "Oakland");
        assert_eq!(updated.genres, "Folk");
        assert_eq!(updated.phone, None);
        assert!(!updated.seeking_talent);
        assert_eq!(updated.seeking_description, None);
    }

    #[tokio::test]
    async fn test_update_missing_venue() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service
            .update(7, venue_input("Nowhere", "Boise", "ID"))
            .await
            .unwrap_err();
        assert!(is_not_found(&err));
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let venue = service
            .create(venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        assert_eq!(service.delete(venue.id).await.unwrap(), 1);
        assert!(is_not_found(&service.get(venue.id).await.unwrap_err()));

        assert_eq!(service.delete(venue.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_dependent_shows() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());
        let venue = service
            .create(venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = ArtistService::new(db.clone())
            .create(artist_input("Guns N Petals"))
            .await
            .unwrap();
        let shows = ShowService::new(db);
        shows
            .create(ShowInput {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: Utc::now(),
            })
            .await
            .unwrap();

        service.delete(venue.id).await.unwrap();
        assert!(shows.list().await.unwrap().is_empty());
    }
}
