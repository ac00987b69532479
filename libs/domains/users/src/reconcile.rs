//! Diffing of a user's desired phone list against the stored one.

use std::collections::HashSet;
use uuid::Uuid;

use crate::models::Phone;

/// Writes needed to turn the stored phones into the desired list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonePlan {
    pub insert: Vec<Phone>,
    pub update: Vec<Phone>,
    pub delete: Vec<Uuid>,
}

impl PhonePlan {
    pub fn is_empty(&self) -> bool {
        self.insert.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Desired phones whose id is already stored are updated in place, the rest
/// are inserted. Stored ids missing from `desired` are deleted.
///
/// `persisted` must only hold ids owned by the user being reconciled.
pub fn plan_phones(persisted: &[Uuid], desired: &[Phone]) -> PhonePlan {
    let stored: HashSet<Uuid> = persisted.iter().copied().collect();
    let wanted: HashSet<Uuid> = desired.iter().map(|p| p.id).collect();

    let (update, insert): (Vec<Phone>, Vec<Phone>) = desired
        .iter()
        .cloned()
        .partition(|phone| stored.contains(&phone.id));

    let delete = persisted
        .iter()
        .filter(|id| !wanted.contains(id))
        .copied()
        .collect();

    PhonePlan {
        insert,
        update,
        delete,
    }
}
