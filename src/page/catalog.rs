//! Page catalog built from the host's picture list.
//!
//! Pictures are interior spreads identified by texture id (the host maps
//! ids to actual image URLs). The catalog fixes which picture prints on
//! which side of each sheet.

use serde::{Deserialize, Serialize};

/// Default texture id of the front cover art.
pub const COVER_TEXTURE: &str = "book-cover";
/// Default texture id of the back cover art.
pub const BACK_COVER_TEXTURE: &str = "book-back";

/// One sheet of the book and the texture printed on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub front: String,
    pub back: String,
}

/// Ordered pages of the book, front cover first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pages: Vec<Page>,
}

impl Catalog {
    /// Lay out pictures onto sheets.
    ///
    /// The first picture lands on the back of the cover, the rest pair up
    /// two per sheet, and the last picture fronts the sheet that carries
    /// the back cover. An odd picture count prints the final picture on
    /// two consecutive faces rather than leaving a blank side. No pictures
    /// at all produces the single cover sheet.
    pub fn build(pictures: &[String], cover: &str, back_cover: &str) -> Self {
        let mut pages = Vec::with_capacity(pictures.len() / 2 + 2);

        let Some(first) = pictures.first() else {
            pages.push(Page {
                front: cover.to_owned(),
                back: back_cover.to_owned(),
            });
            return Self { pages };
        };

        pages.push(Page {
            front: cover.to_owned(),
            back: first.clone(),
        });

        let mut i = 1;
        while i + 1 < pictures.len() {
            pages.push(Page {
                front: pictures[i].clone(),
                back: pictures[i + 1].clone(),
            });
            i += 2;
        }

        pages.push(Page {
            front: pictures[pictures.len() - 1].clone(),
            back: back_cover.to_owned(),
        });

        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Whether this sheet's front face is the outward cover.
    pub fn is_cover(&self, index: usize) -> bool {
        index == 0
    }

    /// Whether this sheet's back face is the outward back cover.
    pub fn is_back_cover(&self, index: usize) -> bool {
        index + 1 == self.pages.len()
    }

    /// Every face texture in first-use order with duplicates removed.
    pub fn texture_manifest(&self) -> Vec<String> {
        let mut manifest = Vec::new();
        let mut push = |id: &str| {
            if !manifest.iter().any(|seen| seen == id) {
                manifest.push(id.to_owned());
            }
        };
        for page in &self.pages {
            push(&page.front);
            push(&page.back);
        }
        manifest
    }
}
