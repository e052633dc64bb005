//! The connection rule table.
//!
//! Validation is a pure function over `(source kind:handle, target
//! kind:handle)`. The table is extended by adding rows, not by changing the
//! algorithm. Source pairs that have a row are closed: only the listed
//! targets are accepted. Source pairs without a row fall through open, so a
//! new node kind is connectable without a table update.

use crate::error::ConnectionRejected;
use crate::graph::{NodeKind, handle};
use itertools::Itertools;

struct Rule {
    source: (NodeKind, &'static str),
    targets: &'static [(NodeKind, &'static str)],
}

const RULES: &[Rule] = &[
    Rule {
        source: (NodeKind::Text, handle::TEXT),
        targets: &[
            (NodeKind::Llm, handle::SYSTEM_PROMPT),
            (NodeKind::Llm, handle::USER_MESSAGE),
        ],
    },
    Rule {
        source: (NodeKind::Image, handle::IMAGE),
        targets: &[(NodeKind::Llm, handle::IMAGES)],
    },
    Rule {
        source: (NodeKind::Llm, handle::OUTPUT),
        targets: &[
            (NodeKind::Text, handle::TEXT),
            (NodeKind::Llm, handle::USER_MESSAGE),
        ],
    },
];

/// Checks a proposed connection against the rule table.
///
/// Returns `Ok(())` when the connection is allowed, or a
/// [`ConnectionRejected`] carrying the reason when the source's rule row
/// does not list the target. The graph itself is never consulted or
/// touched here.
pub fn validate(
    source_kind: NodeKind,
    source_handle: &str,
    target_kind: NodeKind,
    target_handle: &str,
) -> Result<(), ConnectionRejected> {
    let Some(rule) = RULES
        .iter()
        .find(|rule| rule.source.0 == source_kind && rule.source.1 == source_handle)
    else {
        // No row for this source pair: fall through open.
        return Ok(());
    };

    if rule
        .targets
        .iter()
        .any(|(kind, handle)| *kind == target_kind && *handle == target_handle)
    {
        return Ok(());
    }

    let allowed = rule
        .targets
        .iter()
        .map(|(kind, handle)| format!("{kind}:{handle}"))
        .join(", ");
    Err(ConnectionRejected {
        source_kind,
        source_handle: source_handle.to_string(),
        target_kind,
        target_handle: target_handle.to_string(),
        reason: format!("{source_kind}:{source_handle} may only connect to {allowed}"),
    })
}
