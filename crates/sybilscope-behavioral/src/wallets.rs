//! On-chain helpers: shared funders, cross-platform linking, amount anomaly.

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use sybilscope_core::event::Event;

static HEX_ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^0x[0-9a-f]{40}$").expect("address regex"));

/// Whether a string is a 20-byte hex address.
#[must_use]
pub fn is_hex_address(value: &str) -> bool {
    HEX_ADDRESS_RE.is_match(value)
}

/// Group transfer recipients by shared funder.
///
/// Only `transfer` events where both endpoints are hex addresses count. A
/// sender whose recipient set has two or more members is a shared funder;
/// each of those recipients maps to the sorted list of its shared funders.
/// Despite the historical "wallets" name, the semantics are shared
/// *senders*, not same-address identity.
#[must_use]
pub fn detect_shared_wallets(logs: &[Event]) -> HashMap<String, Vec<String>> {
    let mut recipients_by_funder: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for event in logs {
        if event.action != "transfer" {
            continue;
        }
        if !is_hex_address(&event.actor) || !is_hex_address(&event.target) {
            continue;
        }
        recipients_by_funder
            .entry(event.actor.as_str())
            .or_default()
            .insert(event.target.as_str());
    }

    let mut funders_by_recipient: HashMap<String, BTreeSet<&str>> = HashMap::new();
    for (funder, recipients) in &recipients_by_funder {
        if recipients.len() < 2 {
            continue;
        }
        for recipient in recipients {
            funders_by_recipient
                .entry((*recipient).to_string())
                .or_default()
                .insert(*funder);
        }
    }

    funders_by_recipient
        .into_iter()
        .map(|(recipient, funders)| {
            (recipient, funders.into_iter().map(str::to_string).collect())
        })
        .collect()
}

/// Actors active on two or more platforms, with their sorted platform lists.
///
/// Pure helper exposed for ingestion collaborators.
#[must_use]
pub fn detect_cross_app_linking(logs: &[Event]) -> HashMap<String, Vec<String>> {
    let mut platforms: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for event in logs {
        if event.platform.is_empty() {
            continue;
        }
        platforms
            .entry(event.actor.as_str())
            .or_default()
            .insert(event.platform.as_str());
    }

    platforms
        .into_iter()
        .filter(|(_, set)| set.len() >= 2)
        .map(|(actor, set)| {
            (
                actor.to_string(),
                set.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

/// Transaction-amount anomaly score per actor: the variance coefficient
/// `sigma / (mu + 1)` over the actor's amount-bearing events, clamped to
/// `[0, 1]`. Actors with fewer than two amounts are absent.
#[must_use]
pub fn detect_fraudulent_transactions(logs: &[Event]) -> HashMap<String, f64> {
    let mut amounts: HashMap<&str, Vec<f64>> = HashMap::new();
    for event in logs {
        if let Some(amount) = event.amount {
            amounts.entry(event.actor.as_str()).or_default().push(amount);
        }
    }

    amounts
        .into_iter()
        .filter(|(_, values)| values.len() >= 2)
        .map(|(actor, values)| {
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let sigma = variance.sqrt();
            (actor.to_string(), (sigma / (mean + 1.0)).clamp(0.0, 1.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn addr(n: u8) -> String {
        format!("0x{:040x}", u64::from(n))
    }

    fn transfer(actor: &str, target: &str, amount: f64) -> Event {
        Event::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            "base",
            "transfer",
            actor,
            target,
        )
        .with_amount(amount)
    }

    #[test]
    fn test_shared_funder_fan_out() {
        let a = addr(1);
        let (x1, x2, x3) = (addr(2), addr(3), addr(4));
        let logs = vec![
            transfer(&a, &x1, 10.0),
            transfer(&a, &x2, 10.0),
            transfer(&a, &x3, 10.0),
        ];
        let shared = detect_shared_wallets(&logs);
        assert_eq!(shared[&x1], vec![a.clone()]);
        assert_eq!(shared[&x2], vec![a.clone()]);
        assert_eq!(shared[&x3], vec![a.clone()]);
        // The funder itself receives nothing.
        assert!(!shared.contains_key(&a));
    }

    #[test]
    fn test_single_recipient_funder_ignored() {
        let logs = vec![transfer(&addr(1), &addr(2), 10.0)];
        assert!(detect_shared_wallets(&logs).is_empty());
    }

    #[test]
    fn test_non_hex_endpoints_ignored() {
        let logs = vec![
            transfer("alice", &addr(2), 10.0),
            transfer("alice", &addr(3), 10.0),
        ];
        assert!(detect_shared_wallets(&logs).is_empty());
    }

    #[test]
    fn test_address_case_insensitive() {
        let upper = addr(1).to_uppercase().replace("0X", "0x");
        let logs = vec![
            transfer(&upper, &addr(2), 1.0),
            transfer(&upper, &addr(3), 1.0),
        ];
        assert_eq!(detect_shared_wallets(&logs).len(), 2);
    }

    #[test]
    fn test_cross_app_linking() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let logs = vec![
            Event::new(base, "farcaster", "like", "a", "t"),
            Event::new(base, "base", "transfer", "a", "t"),
            Event::new(base, "farcaster", "like", "b", "t"),
        ];
        let cross = detect_cross_app_linking(&logs);
        assert_eq!(cross["a"], vec!["base".to_string(), "farcaster".to_string()]);
        assert!(!cross.contains_key("b"));
    }

    #[test]
    fn test_fraud_score_stable_amounts() {
        let logs = vec![
            transfer(&addr(1), &addr(2), 100.0),
            transfer(&addr(1), &addr(3), 100.0),
            transfer(&addr(1), &addr(4), 100.0),
        ];
        let scores = detect_fraudulent_transactions(&logs);
        assert_eq!(scores[&addr(1)], 0.0);
    }

    #[test]
    fn test_fraud_score_erratic_amounts() {
        let logs = vec![
            transfer(&addr(1), &addr(2), 1.0),
            transfer(&addr(1), &addr(3), 500.0),
            transfer(&addr(1), &addr(4), 2.0),
        ];
        let scores = detect_fraudulent_transactions(&logs);
        assert!(scores[&addr(1)] > 0.5);
    }

    #[test]
    fn test_fraud_needs_two_amounts() {
        let logs = vec![transfer(&addr(1), &addr(2), 5.0)];
        assert!(detect_fraudulent_transactions(&logs).is_empty());
    }
}
