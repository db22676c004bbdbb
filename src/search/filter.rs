use crate::entities::{BoundingBox, CategoryId, Coordinates, Place};

/// One conjunct of the search predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
    /// Exact spherical-distance test. `bounds`, when present, is a cheap
    /// superset check applied first so a spatial index can be used.
    WithinRadius {
        center: Coordinates,
        radius_meters: f64,
        bounds: Option<BoundingBox>,
    },
    CategoryEquals(CategoryId),
    /// Case-insensitive substring match on the place name.
    NameContains(String),
}

impl Clause {
    pub fn matches(&self, place: &Place) -> bool {
        match self {
            Self::WithinRadius {
                center,
                radius_meters,
                bounds,
            } => {
                if let Some(bounds) = bounds {
                    if !bounds.contains(&place.location) {
                        return false;
                    }
                }

                center.distance_to(&place.location) <= *radius_meters
            }
            Self::CategoryEquals(category_id) => place.category_id == *category_id,
            Self::NameContains(needle) => place
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// The AND of an ordered clause list. The same filter value drives both the
/// count and the fetch query, so their clause sets cannot drift apart.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchFilter {
    center: Coordinates,
    clauses: Vec<Clause>,
}

impl SearchFilter {
    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, place: &Place) -> bool {
        self.clauses.iter().all(|clause| clause.matches(place))
    }
}

#[derive(Clone, Debug)]
pub struct SearchFilterBuilder {
    center: Coordinates,
    radius_meters: f64,
    category_id: Option<CategoryId>,
    keyword: Option<String>,
}

impl SearchFilterBuilder {
    pub fn new(center: Coordinates, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
            category_id: None,
            keyword: None,
        }
    }

    pub fn category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Blank keywords are treated as absent.
    pub fn keyword(mut self, keyword: Option<&str>) -> Self {
        self.keyword = keyword
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(String::from);
        self
    }

    pub fn build(self) -> SearchFilter {
        let mut clauses = vec![Clause::WithinRadius {
            center: self.center,
            radius_meters: self.radius_meters,
            bounds: BoundingBox::around(self.center, self.radius_meters),
        }];

        if let Some(category_id) = self.category_id {
            clauses.push(Clause::CategoryEquals(category_id));
        }

        if let Some(keyword) = self.keyword {
            clauses.push(Clause::NameContains(keyword));
        }

        SearchFilter {
            center: self.center,
            clauses,
        }
    }
}
