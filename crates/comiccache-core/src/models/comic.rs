//! Comic domain model and its remote representation.
//!
//! The remote endpoint never reports whether a comic is a favorite; that flag
//! only exists locally, so the wire type and the domain type are kept apart.

use chrono::NaiveDate;
use serde::Deserialize;

/// A comic as the rest of the application sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comic {
    pub num: u32,
    pub title: String,
    pub img: String,
    pub alt: String,
    pub day: String,
    pub month: String,
    pub year: String,
    pub is_favorite: bool,
}

impl Comic {
    /// Raw `year-month-day` date, unpadded, as the archive reports it.
    pub fn date(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }

    /// Human-friendly date such as `Jan 05, 2024`.
    /// Falls back to [`Comic::date`] when the parts are not a calendar date.
    pub fn display_date(&self) -> String {
        let parsed = match (
            self.year.trim().parse::<i32>(),
            self.month.trim().parse::<u32>(),
            self.day.trim().parse::<u32>(),
        ) {
            (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
            _ => None,
        };

        match parsed {
            Some(date) => date.format("%b %d, %Y").to_string(),
            None => self.date(),
        }
    }
}

/// Comic JSON object as served by `info.0.json`.
///
/// The endpoint sends more fields (`safe_title`, `transcript`, `link`, `news`);
/// serde ignores them.
#[derive(Debug, Clone, Deserialize)]
pub struct ComicDto {
    pub num: u32,
    pub title: String,
    pub img: String,
    pub alt: String,
    pub day: String,
    pub month: String,
    pub year: String,
}

impl From<ComicDto> for Comic {
    fn from(dto: ComicDto) -> Self {
        Self {
            num: dto.num,
            title: dto.title,
            img: dto.img,
            alt: dto.alt,
            day: dto.day,
            month: dto.month,
            year: dto.year,
            is_favorite: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
