use crate::ids::PoemId;

use super::SavedPoem;

/// Storage key of the saved-poem collection.
pub const SAVED_POEMS_KEY: &str = "savedPoems";

/// Maximum number of records kept; older ones are evicted first.
pub const MAX_SAVED_POEMS: usize = 50;

/// Returns `[poem, ..list]` truncated to `cap` entries.
///
/// The collection is newest-first, so truncation drops the oldest records.
pub fn prepend_capped(list: &[SavedPoem], poem: SavedPoem, cap: usize) -> Vec<SavedPoem> {
    let mut next = Vec::with_capacity((list.len() + 1).min(cap));
    next.push(poem);
    next.extend(list.iter().take(cap.saturating_sub(1)).cloned());
    next.truncate(cap);
    next
}

/// Returns the list without the record identified by `id`, keeping the
/// relative order of everything else.
pub fn remove_by_id(list: &[SavedPoem], id: &PoemId) -> Vec<SavedPoem> {
    list.iter().filter(|p| &p.id != id).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::{DataUri, MimeType};
    use chrono::{TimeZone, Utc};

    fn poem(n: i64) -> SavedPoem {
        SavedPoem::new(
            DataUri::encode(&MimeType::from("image/png"), &n.to_le_bytes()),
            format!("poem {n}"),
            Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap(),
        )
    }

    #[test]
    fn prepend_puts_newest_first() {
        let first = poem(1);
        let second = poem(2);
        let list = prepend_capped(&[], first.clone(), MAX_SAVED_POEMS);
        let list = prepend_capped(&list, second.clone(), MAX_SAVED_POEMS);
        assert_eq!(list, vec![second, first]);
    }

    #[test]
    fn prepend_evicts_oldest_beyond_cap() {
        let mut list = Vec::new();
        let mut inserted = Vec::new();
        for n in 0..51 {
            let p = poem(n);
            inserted.push(p.clone());
            list = prepend_capped(&list, p, MAX_SAVED_POEMS);
        }

        assert_eq!(list.len(), MAX_SAVED_POEMS);
        let expected: Vec<_> = inserted.iter().rev().take(50).cloned().collect();
        assert_eq!(list, expected);
        assert!(list.iter().all(|p| p.poem_text != "poem 0"));
    }

    #[test]
    fn prepend_with_zero_cap_keeps_nothing() {
        assert!(prepend_capped(&[poem(1)], poem(2), 0).is_empty());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let (a, b, c) = (poem(1), poem(2), poem(3));
        let list = vec![c.clone(), b.clone(), a.clone()];

        let after = remove_by_id(&list, &b.id);
        assert_eq!(after, vec![c, a]);
    }

    #[test]
    fn remove_unknown_id_changes_nothing() {
        let list = vec![poem(1), poem(2)];
        let after = remove_by_id(&list, &PoemId::from("missing"));
        assert_eq!(after, list);
    }
}
