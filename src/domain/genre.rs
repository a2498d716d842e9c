//! Book genre enumeration
//!
//! Fixed set of genres a book may be filed under. The wire format and the
//! database column both carry the display name (e.g. "Science Fiction").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Fixed genre set for the book catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Mystery,
    Romance,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Fantasy,
    Biography,
    History,
    #[serde(rename = "Self-Help")]
    SelfHelp,
    Business,
    Technology,
    Health,
    Travel,
    Cooking,
    Art,
    Religion,
    Politics,
    Philosophy,
    Poetry,
    Drama,
    Horror,
    Thriller,
    Adventure,
    Children,
    #[serde(rename = "Young Adult")]
    YoungAdult,
    Other,
}

impl Genre {
    /// All genres, in catalog order
    pub const ALL: [Genre; 26] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::Fantasy,
        Genre::Biography,
        Genre::History,
        Genre::SelfHelp,
        Genre::Business,
        Genre::Technology,
        Genre::Health,
        Genre::Travel,
        Genre::Cooking,
        Genre::Art,
        Genre::Religion,
        Genre::Politics,
        Genre::Philosophy,
        Genre::Poetry,
        Genre::Drama,
        Genre::Horror,
        Genre::Thriller,
        Genre::Adventure,
        Genre::Children,
        Genre::YoungAdult,
        Genre::Other,
    ];

    /// Display name, also the stored database value
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Fantasy => "Fantasy",
            Genre::Biography => "Biography",
            Genre::History => "History",
            Genre::SelfHelp => "Self-Help",
            Genre::Business => "Business",
            Genre::Technology => "Technology",
            Genre::Health => "Health",
            Genre::Travel => "Travel",
            Genre::Cooking => "Cooking",
            Genre::Art => "Art",
            Genre::Religion => "Religion",
            Genre::Politics => "Politics",
            Genre::Philosophy => "Philosophy",
            Genre::Poetry => "Poetry",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::Adventure => "Adventure",
            Genre::Children => "Children",
            Genre::YoungAdult => "Young Adult",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| DomainError::InvalidGenre(s.to_string()))
    }
}
