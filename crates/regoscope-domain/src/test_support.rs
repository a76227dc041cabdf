use std::collections::BTreeMap;

pub const LIBRARY: &str = r#"package lib.k8s

is_pod {
    input.kind == "Pod"
}

name := input.metadata.name
"#;

pub const POLICY_DENY: &str = r#"package main

import data.lib.k8s

deny[msg] {
    k8s.is_pod
    msg := "pods are not allowed"
}
"#;

pub const POLICY_WARN: &str = r#"package main

warn[msg] {
    not input.metadata.labels.team
    msg := "missing team label"
}
"#;

pub const POLICY_DENY_WARN: &str = r#"package mixed

deny[msg] {
    input.spec.hostNetwork
    msg := "host network is not allowed"
}

warn[msg] {
    input.spec.replicas < 2
    msg := "single replica"
}
"#;

/// A small mixed batch: one library plus three policies.
pub fn sources() -> BTreeMap<String, String> {
    [
        ("lib/k8s.rego", LIBRARY),
        ("policy/deny.rego", POLICY_DENY),
        ("policy/warn.rego", POLICY_WARN),
        ("policy/mixed.rego", POLICY_DENY_WARN),
    ]
    .into_iter()
    .map(|(p, c)| (p.to_string(), c.to_string()))
    .collect()
}
