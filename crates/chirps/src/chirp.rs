use core::str::FromStr;

use serde::{Deserialize, Serialize};

use chirpy_core::{ChirpId, DomainError, DomainResult, Entity, UserId};

/// Maximum body length, counted in characters (not bytes).
pub const MAX_BODY_CHARS: usize = 140;

/// A short message authored by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: ChirpId,
    pub body: String,
    pub author_id: UserId,
}

impl Chirp {
    /// Build a chirp, enforcing the body length limit.
    pub fn new(id: ChirpId, body: impl Into<String>, author_id: UserId) -> DomainResult<Self> {
        let body = body.into();
        validate_body(&body)?;
        Ok(Self { id, body, author_id })
    }
}

impl Entity for Chirp {
    type Id = ChirpId;

    fn id(&self) -> ChirpId {
        self.id
    }
}

pub fn validate_body(body: &str) -> DomainResult<()> {
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(DomainError::validation("Chirp is too long"));
    }
    Ok(())
}

/// Listing order by chirp identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(DomainError::validation(format!(
                "sort must be one of: asc, desc (got '{other}')"
            ))),
        }
    }
}

/// Filter + ordering for listing chirps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChirpQuery {
    pub author_id: Option<UserId>,
    pub sort: SortOrder,
}

impl ChirpQuery {
    /// Build a query from raw query-string values.
    ///
    /// Empty strings are treated as absent. An author filter that is not a
    /// valid identifier, or an unknown sort order, is a validation error.
    pub fn parse(author_id: Option<&str>, sort: Option<&str>) -> DomainResult<Self> {
        let author_id = match author_id.filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<UserId>()?),
            None => None,
        };
        let sort = match sort.filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => SortOrder::default(),
        };
        Ok(Self { author_id, sort })
    }

    pub fn matches(&self, chirp: &Chirp) -> bool {
        self.author_id.is_none_or(|a| a == chirp.author_id)
    }

    /// Filter and order `chirps` (input order does not matter).
    pub fn apply<'a, I>(&self, chirps: I) -> Vec<Chirp>
    where
        I: IntoIterator<Item = &'a Chirp>,
    {
        let mut out: Vec<Chirp> = chirps.into_iter().filter(|c| self.matches(c)).cloned().collect();
        match self.sort {
            SortOrder::Asc => out.sort_by_key(|c| c.id),
            SortOrder::Desc => out.sort_by(|a, b| b.id.cmp(&a.id)),
        }
        out
    }
}
