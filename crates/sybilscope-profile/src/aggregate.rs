//! Per-actor profile aggregation.
//!
//! Folds every event carrying profile fields into one record per actor:
//! scalar fields are last-write-wins, links are unioned (explicit list plus
//! links extracted from bio text), and two cross-actor indexes come out of
//! the fold - the shared-link inverted index and the duplicate-bio counter.

use crate::links::{extract_bio_links, normalize_link};
use std::collections::{HashMap, HashSet};
use sybilscope_core::event::Event;

// ============================================================================
// Profile types
// ============================================================================

/// Aggregated profile for one actor.
#[derive(Debug, Clone, Default)]
pub struct ActorProfile {
    /// Last observed bio text.
    pub bio: Option<String>,
    /// Normalized links, deduped, first occurrence preserved.
    pub links: Vec<String>,
    /// Last observed follower count.
    pub follower_count: Option<u64>,
    /// Last observed following count.
    pub following_count: Option<u64>,
    /// Account creation instant, epoch milliseconds.
    pub created_at_ms: Option<i64>,
    /// Last observed verification flag.
    pub verified: Option<bool>,
    /// Last observed location string.
    pub location: Option<String>,
    /// First time-valid sighting of the actor, epoch milliseconds.
    pub first_seen_ms: Option<i64>,
}

/// Output of the profile fold.
#[derive(Debug, Clone, Default)]
pub struct ProfileIndex {
    /// One aggregate per actor.
    pub profiles: HashMap<String, ActorProfile>,
    /// Per actor: the sublist of its links that appear in at least one other
    /// actor's list, preserving the actor's link order.
    pub shared_links: HashMap<String, Vec<String>>,
    /// Per actor: lowercased, whitespace-collapsed bio.
    pub normalized_bio: HashMap<String, String>,
    /// Per normalized bio: how many distinct actors carry it.
    pub bio_count: HashMap<String, usize>,
}

impl ProfileIndex {
    /// The aggregated profile for an actor, if any event mentioned it.
    #[must_use]
    pub fn profile(&self, actor: &str) -> Option<&ActorProfile> {
        self.profiles.get(actor)
    }

    /// How many actors share this actor's normalized bio (including itself).
    #[must_use]
    pub fn bio_duplicates(&self, actor: &str) -> usize {
        self.normalized_bio
            .get(actor)
            .and_then(|bio| self.bio_count.get(bio))
            .copied()
            .unwrap_or(0)
    }
}

/// Lowercase a bio and collapse runs of whitespace.
#[must_use]
pub fn normalize_bio(bio: &str) -> String {
    bio.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Profile Aggregator
// ============================================================================

/// Profile fold over the event log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAggregator;

impl ProfileAggregator {
    /// Fold profile fields across the log and build the cross-actor indexes.
    #[must_use]
    pub fn compute(logs: &[Event]) -> ProfileIndex {
        let mut profiles: HashMap<String, ActorProfile> = HashMap::new();
        let mut link_sets: HashMap<String, HashSet<String>> = HashMap::new();

        for event in logs {
            let profile = profiles.entry(event.actor.clone()).or_default();
            let links = link_sets.entry(event.actor.clone()).or_default();

            if let Some(ts) = event.ts_millis() {
                profile.first_seen_ms = Some(match profile.first_seen_ms {
                    Some(existing) => existing.min(ts),
                    None => ts,
                });
            }

            if let Some(bio) = &event.bio {
                if !bio.trim().is_empty() {
                    profile.bio = Some(bio.clone());
                    for link in extract_bio_links(bio) {
                        if links.insert(link.clone()) {
                            profile.links.push(link);
                        }
                    }
                }
            }
            for raw in &event.links {
                if let Some(link) = normalize_link(raw) {
                    if links.insert(link.clone()) {
                        profile.links.push(link);
                    }
                }
            }
            if event.follower_count.is_some() {
                profile.follower_count = event.follower_count;
            }
            if event.following_count.is_some() {
                profile.following_count = event.following_count;
            }
            if let Some(created) = event.actor_created_at {
                profile.created_at_ms = Some(created.timestamp_millis());
            }
            if event.verified.is_some() {
                profile.verified = event.verified;
            }
            if let Some(location) = &event.location {
                profile.location = Some(location.clone());
            }
        }

        // Inverted index: link -> distinct owners.
        let mut owners: HashMap<&str, usize> = HashMap::new();
        for profile in profiles.values() {
            for link in &profile.links {
                *owners.entry(link.as_str()).or_default() += 1;
            }
        }

        let mut shared_links: HashMap<String, Vec<String>> = HashMap::new();
        for (actor, profile) in &profiles {
            let shared: Vec<String> = profile
                .links
                .iter()
                .filter(|link| owners.get(link.as_str()).copied().unwrap_or(0) >= 2)
                .cloned()
                .collect();
            if !shared.is_empty() {
                shared_links.insert(actor.clone(), shared);
            }
        }

        // Duplicate-bio counter over normalized bios.
        let mut normalized_bio: HashMap<String, String> = HashMap::new();
        let mut bio_count: HashMap<String, usize> = HashMap::new();
        for (actor, profile) in &profiles {
            if let Some(bio) = &profile.bio {
                let normalized = normalize_bio(bio);
                if !normalized.is_empty() {
                    *bio_count.entry(normalized.clone()).or_default() += 1;
                    normalized_bio.insert(actor.clone(), normalized);
                }
            }
        }

        ProfileIndex {
            profiles,
            shared_links,
            normalized_bio,
            bio_count,
        }
    }
}
