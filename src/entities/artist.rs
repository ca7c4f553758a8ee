use sea_orm::entity::prelude::*;

use crate::genres::Genres;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    /// Comma-joined, see [`Genres`]
    pub genres: String,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub website: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::show::Entity")]
    Show,
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Show.def()
    }
}

impl Model {
    pub fn genre_list(&self) -> Genres {
        Genres::from_stored(&self.genres)
    }
}

impl ActiveModelBehavior for ActiveModel {}
