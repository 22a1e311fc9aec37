//! Clients and the pure list helpers the UI runs over a fetched snapshot.

use serde::{Deserialize, Serialize};

use crate::ClientId;

/// A stored client row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
  pub id:   ClientId,
  pub name: String,
  pub note: Option<String>,
}

/// The mutable fields of a client; input to both
/// [`add_client`](crate::store::RecordStore::add_client) and
/// [`update_client`](crate::store::RecordStore::update_client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFields {
  pub name: String,
  #[serde(default)]
  pub note: Option<String>,
}

impl ClientFields {
  pub fn new(name: impl Into<String>, note: Option<&str>) -> Self {
    Self { name: name.into(), note: note.map(str::to_owned) }
  }
}

/// Trim a note and map an empty result to `None`.
pub fn sanitize_note(note: &str) -> Option<String> {
  let n = note.trim();
  (!n.is_empty()).then(|| n.to_owned())
}

// ─── Search / filter / sort ──────────────────────────────────────────────────

/// Trim and lowercase a free-text search query.
pub fn normalize_query(query: &str) -> String { query.trim().to_lowercase() }

/// Whether `client`'s name or note contains the already-normalized query.
pub fn matches_client(client: &Client, normalized: &str) -> bool {
  client.name.to_lowercase().contains(normalized)
    || client
      .note
      .as_deref()
      .is_some_and(|n| n.to_lowercase().contains(normalized))
}

/// Filter `list` by `query` (case-insensitive substring over name and note)
/// and sort the result newest first, i.e. by descending id.
///
/// An empty or whitespace-only query keeps every client; the sort applies
/// regardless.
pub fn filter_and_sort_clients<'a>(list: &'a [Client], query: &str) -> Vec<&'a Client> {
  let q = normalize_query(query);
  let mut out: Vec<&Client> = if q.is_empty() {
    list.iter().collect()
  } else {
    list.iter().filter(|c| matches_client(c, &q)).collect()
  };
  out.sort_by(|a, b| b.id.cmp(&a.id));
  out
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

pub fn find_client_by_id(list: &[Client], id: ClientId) -> Option<&Client> {
  list.iter().find(|c| c.id == id)
}

/// Human-readable label for a delete confirmation: `"Name (#id)"`, or just
/// `"#id"` when the client is not in `list`.
pub fn client_label_for_delete(list: &[Client], id: ClientId) -> String {
  match find_client_by_id(list, id) {
    Some(c) => format!("{} (#{})", c.name, c.id),
    None => format!("#{id}"),
  }
}

/// Drop the client with `id` from a local snapshot.
pub fn remove_client_by_id(list: &mut Vec<Client>, id: ClientId) {
  list.retain(|c| c.id != id);
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(id: ClientId, name: &str, note: Option<&str>) -> Client {
    Client { id, name: name.into(), note: note.map(str::to_owned) }
  }

  fn sample() -> Vec<Client> {
    vec![
      client(2, "Berta Klein", Some("Schlafprobleme")),
      client(5, "Ana", None),
      client(1, "Carlos", Some("referred by Berta")),
      client(4, "Dora", Some("")),
    ]
  }

  fn ids(list: &[&Client]) -> Vec<ClientId> { list.iter().map(|c| c.id).collect() }

  #[test]
  fn empty_query_sorts_by_descending_id() {
    let list = sample();
    assert_eq!(ids(&filter_and_sort_clients(&list, "")), vec![5, 4, 2, 1]);
    assert_eq!(ids(&filter_and_sort_clients(&list, "   ")), vec![5, 4, 2, 1]);
  }

  #[test]
  fn query_matches_name_or_note_case_insensitively() {
    let list = sample();
    assert_eq!(ids(&filter_and_sort_clients(&list, "BERTA")), vec![2, 1]);
    assert_eq!(ids(&filter_and_sort_clients(&list, "  schlaf ")), vec![2]);
    assert!(filter_and_sort_clients(&list, "zzz").is_empty());
  }

  #[test]
  fn filtered_matches_are_resorted_by_descending_id() {
    let list = vec![client(1, "Berta", None), client(9, "Bert", None), client(3, "Ana", None)];
    assert_eq!(ids(&filter_and_sort_clients(&list, "bert")), vec![9, 1]);
  }

  #[test]
  fn clients_without_note_only_match_on_name() {
    let list = sample();
    assert_eq!(ids(&filter_and_sort_clients(&list, "an")), vec![5]);
  }

  #[test]
  fn sanitize_note_maps_blank_to_none() {
    assert_eq!(sanitize_note(""), None);
    assert_eq!(sanitize_note(" \n\t"), None);
    assert_eq!(sanitize_note("  hi "), Some("hi".to_owned()));
  }

  #[test]
  fn delete_label_falls_back_to_id() {
    let list = sample();
    assert_eq!(client_label_for_delete(&list, 5), "Ana (#5)");
    assert_eq!(client_label_for_delete(&list, 9), "#9");
  }

  #[test]
  fn remove_by_id_drops_only_that_client() {
    let mut list = sample();
    remove_client_by_id(&mut list, 2);
    assert_eq!(list.len(), 3);
    assert!(find_client_by_id(&list, 2).is_none());
    assert!(find_client_by_id(&list, 1).is_some());
  }
}
