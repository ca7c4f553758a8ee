/// Separator used by the `genres` column. Genre names never contain it.
pub const GENRE_SEPARATOR: char = ',';

/// The genres offered by the venue and artist forms.
pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// Ordered list of musical-style tags attached to a venue or an artist.
///
/// Only the storage boundary sees the comma-joined form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Genres(Vec<String>);

impl Genres {
    pub fn new(genres: Vec<String>) -> Self {
        Self(genres)
    }

    /// Parse the stored column value. An empty column is an empty list,
    /// not a list holding one empty genre.
    pub fn from_stored(stored: &str) -> Self {
        if stored.is_empty() {
            return Self::default();
        }

        Self(stored.split(GENRE_SEPARATOR).map(str::to_string).collect())
    }

    pub fn to_stored(&self) -> String {
        self.0.join(&GENRE_SEPARATOR.to_string())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Genres {
    fn from(genres: Vec<String>) -> Self {
        Self(genres)
    }
}

pub fn is_known_genre(genre: &str) -> bool {
    GENRE_CHOICES.contains(&genre)
}
