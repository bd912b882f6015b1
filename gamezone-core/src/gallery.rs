//! Card layout for the gallery view.

use crate::template::Placeholders;
use crate::zone::Zone;

/// One clickable gallery tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub cover_url: String,
    pub featured: bool,
    /// Opens in a new tab rather than the embedded viewer
    pub external: bool,
}

impl Card {
    pub fn from_zone(zone: &Zone, placeholders: &Placeholders) -> Self {
        Self {
            id: zone.id,
            name: zone.name.clone(),
            cover_url: zone.resolved_cover(placeholders),
            featured: zone.featured,
            external: zone.is_external(),
        }
    }
}

/// Which slice of the grid to materialise. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Everything on one page.
    pub fn all() -> Self {
        Self::new(1, usize::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 50)
    }
}

/// A rendered gallery: the featured section plus one page of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    pub featured: Vec<Card>,
    pub cards: Vec<Card>,
    /// Grid entries across all pages
    pub total: usize,
    pub page: usize,
    pub pages: usize,
}

/// Lay out an already sorted and filtered view.
///
/// Featured zones get their own section and are left out of the grid. Only
/// the cards on the requested page are built.
pub fn build_gallery(view: &[&Zone], placeholders: &Placeholders, request: PageRequest) -> Gallery {
    let featured = view
        .iter()
        .filter(|z| z.featured)
        .map(|z| Card::from_zone(z, placeholders))
        .collect();

    let grid: Vec<&Zone> = view.iter().copied().filter(|z| !z.featured).collect();
    let total = grid.len();
    let pages = total.div_ceil(request.per_page).max(1);
    let page = request.page.min(pages);
    let start = (page - 1).saturating_mul(request.per_page);

    let cards = grid
        .into_iter()
        .skip(start)
        .take(request.per_page)
        .map(|z| Card::from_zone(z, placeholders))
        .collect();

    Gallery {
        featured,
        cards,
        total,
        page,
        pages,
    }
}
