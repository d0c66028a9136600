use crate::domain::article::models::ArticleId;
use crate::domain::article::models::FeaturedPosition;

const SLOT_COUNT: usize = FeaturedPosition::MAX as usize;

/// Mutation requested against the featured slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedSlotChange {
    Assign {
        article_id: ArticleId,
        position: FeaturedPosition,
    },
    Remove {
        article_id: ArticleId,
    },
}

impl FeaturedSlotChange {
    pub fn article_id(&self) -> ArticleId {
        match self {
            FeaturedSlotChange::Assign { article_id, .. } => *article_id,
            FeaturedSlotChange::Remove { article_id } => *article_id,
        }
    }
}

/// The three landing-page slots as one ordered array.
///
/// Every mutation recomputes the whole array, so an article holds at most one
/// slot and a slot holds at most one article no matter the order of calls.
/// Persisting the result is a matter of writing [`FeaturedSlots::diff`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeaturedSlots {
    slots: [Option<ArticleId>; SLOT_COUNT],
}

impl FeaturedSlots {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild the slots from stored `(article, position)` rows.
    pub fn from_assignments<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (ArticleId, FeaturedPosition)>,
    {
        let mut slots = Self::empty();
        for (article_id, position) in assignments {
            slots.slots[position.index()] = Some(article_id);
        }
        slots
    }

    pub fn position_of(&self, article_id: &ArticleId) -> Option<FeaturedPosition> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(article_id))
            .map(FeaturedPosition::from_index)
    }

    pub fn occupant(&self, position: FeaturedPosition) -> Option<ArticleId> {
        self.slots[position.index()]
    }

    /// Put `article_id` at `position`.
    ///
    /// The article first leaves its previous slot and the slots above it
    /// move down to close the gap. Whoever then sits at `position` loses the
    /// slot. Returns `false` when the article already held `position`.
    pub fn assign(&mut self, article_id: ArticleId, position: FeaturedPosition) -> bool {
        if self.position_of(&article_id) == Some(position) {
            return false;
        }

        self.remove(&article_id);
        self.slots[position.index()] = Some(article_id);
        true
    }

    /// Clear the article's slot and compact the ones above it. Returns
    /// `false` when the article was not featured.
    pub fn remove(&mut self, article_id: &ArticleId) -> bool {
        let Some(index) = self
            .slots
            .iter()
            .position(|slot| slot.as_ref() == Some(article_id))
        else {
            return false;
        };

        self.slots[index..].rotate_left(1);
        self.slots[SLOT_COUNT - 1] = None;
        true
    }

    pub fn apply(&mut self, change: FeaturedSlotChange) -> bool {
        match change {
            FeaturedSlotChange::Assign {
                article_id,
                position,
            } => self.assign(article_id, position),
            FeaturedSlotChange::Remove { article_id } => self.remove(&article_id),
        }
    }

    pub fn assignments(&self) -> Vec<(ArticleId, FeaturedPosition)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|id| (id, FeaturedPosition::from_index(index))))
            .collect()
    }

    /// Articles whose position differs between `before` and `self`, paired
    /// with their new position.
    pub fn diff(&self, before: &FeaturedSlots) -> Vec<(ArticleId, Option<FeaturedPosition>)> {
        let mut changes: Vec<(ArticleId, Option<FeaturedPosition>)> = Vec::new();

        for (article_id, _) in before.assignments() {
            let now = self.position_of(&article_id);
            if now != before.position_of(&article_id) {
                changes.push((article_id, now));
            }
        }
        for (article_id, position) in self.assignments() {
            if before.position_of(&article_id).is_none() {
                changes.push((article_id, Some(position)));
            }
        }

        changes
    }
}
