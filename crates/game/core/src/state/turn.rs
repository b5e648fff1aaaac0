use strum::Display;

use super::EntityId;

/// Top-level play mode. Combat engages when a hostile sights the player and
/// releases when no hostiles remain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameMode {
    #[default]
    Exploration,
    Combat,
}

/// Initiative-ordered turn sequence for one combat encounter.
///
/// Rebuilt when combat starts; `current` always stays in `[0, len)` while
/// any combatant remains, wrapping on advance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnQueue {
    order: Vec<EntityId>,
    current: usize,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds from `(combatant, initiative)` pairs: descending initiative,
    /// ties kept in the order the combatants were collected (stable sort).
    /// Resets the current turn to the front.
    pub fn rebuild(&mut self, mut rolls: Vec<(EntityId, u32)>) {
        rolls.sort_by_key(|&(_, initiative)| std::cmp::Reverse(initiative));
        self.order = rolls.into_iter().map(|(id, _)| id).collect();
        self.current = 0;
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.current = 0;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.order.contains(&id)
    }

    /// Combatants in turn order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// The combatant whose turn it is, if any remain.
    pub fn current(&self) -> Option<EntityId> {
        self.order.get(self.current).copied()
    }

    /// Advances to the next combatant, wrapping around.
    pub fn advance(&mut self) -> Option<EntityId> {
        if self.order.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.order.len();
        self.current()
    }

    /// Drops a combatant (death, despawn) while keeping whoever currently
    /// has the turn pointed at sensibly: removing an earlier entry shifts
    /// the index back, removing the current entry hands the turn to the
    /// next one.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(index) = self.order.iter().position(|&entry| entry == id) else {
            return false;
        };
        self.order.remove(index);

        if self.order.is_empty() {
            self.current = 0;
        } else {
            if index < self.current {
                self.current -= 1;
            }
            self.current %= self.order.len();
        }
        true
    }
}
