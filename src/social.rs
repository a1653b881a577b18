// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cheers and friendship aggregates.

use crate::model::{Cheer, DrinkLogEntry, Friendship, FriendshipStatus};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How many counterparts are kept in top-fan and top-cheered lists.
pub const TOP_USERS: usize = 5;

/// How many counterparts a report shows.
pub const TOP_USERS_SHOWN: usize = 3;

/// Maximum number of friend suggestions.
pub const MAX_SUGGESTIONS: usize = 10;

/// A user id with an interaction count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCount {
    pub user_id: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheersSummary {
    /// Cheers on the viewer's own posts.
    pub received: usize,
    /// Cheers the viewer handed out.
    pub given: usize,
    /// `received` divided by the number of viewer posts, 0 without posts.
    pub avg_per_post: f64,
    /// Users who cheered the viewer most.
    pub top_fans: Vec<UserCount>,
    /// Users the viewer cheered most.
    pub top_cheered: Vec<UserCount>,
}

/// Summarize cheers for `viewer`. `logs` resolves post ids to their authors; cheers on
/// posts not in `logs` only count toward `given`.
pub fn cheers_summary(viewer: &str, cheers: &[Cheer], logs: &[DrinkLogEntry]) -> CheersSummary {
    let owners: HashMap<&str, &str> = logs
        .iter()
        .map(|log| (log.id.as_str(), log.user_id.as_str()))
        .collect();
    let viewer_posts = logs.iter().filter(|log| log.user_id == viewer).count();

    let received: Vec<&Cheer> = cheers
        .iter()
        .filter(|c| owners.get(c.content_id.as_str()) == Some(&viewer))
        .collect();
    let given: Vec<&Cheer> = cheers.iter().filter(|c| c.actor_id == viewer).collect();

    let top_fans = top_counts(
        received
            .iter()
            .map(|c| c.actor_id.as_str())
            .filter(|actor| *actor != viewer),
        TOP_USERS,
    );
    let top_cheered = top_counts(
        given
            .iter()
            .filter_map(|c| owners.get(c.content_id.as_str()).copied())
            .filter(|owner| *owner != viewer),
        TOP_USERS,
    );

    let avg_per_post = if viewer_posts == 0 {
        0.0
    } else {
        received.len() as f64 / viewer_posts as f64
    };

    CheersSummary {
        received: received.len(),
        given: given.len(),
        avg_per_post,
        top_fans,
        top_cheered,
    }
}

/// Tally ids and keep the `limit` most frequent. Equal counts are ordered by id.
fn top_counts<'a>(ids: impl Iterator<Item = &'a str>, limit: usize) -> Vec<UserCount> {
    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for id in ids {
        *tally.entry(id).or_insert(0) += 1;
    }

    let mut ranked: Vec<UserCount> = tally
        .into_iter()
        .map(|(user_id, count)| UserCount {
            user_id: user_id.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Users with an accepted friendship with `user_id`, in either direction.
pub fn friend_ids(user_id: &str, rows: &[Friendship]) -> BTreeSet<String> {
    rows.iter()
        .filter(|row| row.status == FriendshipStatus::Accepted)
        .filter_map(|row| row.counterpart(user_id))
        .filter(|other| *other != user_id)
        .map(str::to_string)
        .collect()
}

/// Requests waiting for `viewer` to respond.
pub fn pending_incoming<'a>(viewer: &str, rows: &'a [Friendship]) -> Vec<&'a Friendship> {
    rows.iter()
        .filter(|row| row.status == FriendshipStatus::Pending && row.addressee_id == viewer)
        .collect()
}

/// A second-degree contact and how many of the viewer's friends know them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub user_id: String,
    pub mutual_count: usize,
}

/// Rank friends-of-friends by how many of `direct` list them.
///
/// The viewer and existing direct friends are never suggested.
pub fn rank_mutual_friends(
    viewer: &str,
    direct: &BTreeSet<String>,
    friends_of: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<Suggestion> {
    let candidates = direct
        .iter()
        .filter_map(|friend| friends_of.get(friend))
        .flatten()
        .map(String::as_str)
        .filter(|id| *id != viewer && !direct.contains(*id));

    top_counts(candidates, MAX_SUGGESTIONS)
        .into_iter()
        .map(|UserCount { user_id, count }| Suggestion {
            user_id,
            mutual_count: count,
        })
        .collect()
}

/// Friend suggestions for `viewer` computed from raw relationship rows.
pub fn suggest_mutual_friends(viewer: &str, rows: &[Friendship]) -> Vec<Suggestion> {
    let direct = friend_ids(viewer, rows);
    let friends_of: BTreeMap<String, BTreeSet<String>> = direct
        .iter()
        .map(|friend| (friend.clone(), friend_ids(friend, rows)))
        .collect();
    rank_mutual_friends(viewer, &direct, &friends_of)
}
