//! Input rules: pure decisions over per-port readiness tokens.

use crate::core::{ConfigurationMap, NodeError, NodeResult, PortId, Token};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Configuration key selecting a node's input rule.
pub const INPUT_RULE_KEY: &str = "input_rule";

/// Readiness policy evaluated before every run.
pub trait InputRule {
    /// Returns true when the cycle should run. Must not depend on token order.
    fn admit(&self, tokens: &[Token]) -> bool;
}

/// Conjunctive readiness: a single pending token vetoes the cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllReady;

impl InputRule for AllReady {
    fn admit(&self, tokens: &[Token]) -> bool {
        tokens.iter().all(Token::is_ready)
    }
}

/// Runs once at least `n` tokens are ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quorum(pub usize);

impl InputRule for Quorum {
    fn admit(&self, tokens: &[Token]) -> bool {
        tokens.iter().filter(|token| token.is_ready()).count() >= self.0
    }
}

/// Runs once every priority port is ready; other ports are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Required(pub Vec<PortId>);

impl InputRule for Required {
    fn admit(&self, tokens: &[Token]) -> bool {
        ports_ready(&self.0, tokens)
    }
}

fn ports_ready(ports: &[PortId], tokens: &[Token]) -> bool {
    let ready: HashSet<&PortId> = tokens
        .iter()
        .filter(|token| token.is_ready())
        .map(Token::port_id)
        .collect();
    ports.iter().all(|port| ready.contains(port))
}

/// Rule selected through configuration.
///
/// Accepted forms: `all`, `quorum:<n>`, `required:<port>[,<port>...]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RulePolicy {
    #[default]
    AllReady,
    Quorum(usize),
    Required(Vec<PortId>),
}

impl RulePolicy {
    /// Reads the policy from the `input_rule` key, defaulting to [`RulePolicy::AllReady`].
    pub fn from_configuration(configuration: &ConfigurationMap) -> NodeResult<Self> {
        match configuration.get(INPUT_RULE_KEY) {
            None => Ok(Self::AllReady),
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| NodeError::configuration(INPUT_RULE_KEY, reason)),
        }
    }
}

impl InputRule for RulePolicy {
    fn admit(&self, tokens: &[Token]) -> bool {
        match self {
            Self::AllReady => AllReady.admit(tokens),
            Self::Quorum(n) => Quorum(*n).admit(tokens),
            Self::Required(ports) => ports_ready(ports, tokens),
        }
    }
}

impl FromStr for RulePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, argument) = match s.split_once(':') {
            Some((name, argument)) => (name.trim(), Some(argument.trim())),
            None => (s, None),
        };

        match (name, argument) {
            ("all", None) => Ok(Self::AllReady),
            ("quorum", Some(n)) => n
                .parse::<usize>()
                .map(Self::Quorum)
                .map_err(|e| format!("invalid quorum `{}`: {}", n, e)),
            ("required", Some(ports)) => {
                let ports: Vec<PortId> = ports
                    .split(',')
                    .map(str::trim)
                    .filter(|port| !port.is_empty())
                    .map(PortId::from)
                    .collect();
                if ports.is_empty() {
                    Err("required rule needs at least one port".to_string())
                } else {
                    Ok(Self::Required(ports))
                }
            }
            _ => Err(format!("unknown input rule `{}`", s)),
        }
    }
}

impl fmt::Display for RulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllReady => write!(f, "all"),
            Self::Quorum(n) => write!(f, "quorum:{}", n),
            Self::Required(ports) => {
                let ports: Vec<&str> = ports.iter().map(PortId::as_str).collect();
                write!(f, "required:{}", ports.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(ready: &[&str], pending: &[&str]) -> Vec<Token> {
        ready
            .iter()
            .map(|p| Token::ready(*p, vec![1u8]))
            .chain(pending.iter().map(|p| Token::pending(*p)))
            .collect()
    }

    #[test]
    fn test_all_ready_vetoed_by_any_pending() {
        assert!(AllReady.admit(&tokens(&["a", "b"], &[])));
        assert!(!AllReady.admit(&tokens(&["a"], &["b"])));
        assert!(!AllReady.admit(&tokens(&[], &["a", "b"])));
    }

    #[test]
    fn test_all_ready_independent_of_order() {
        let mut toks = tokens(&["a", "c"], &["b"]);
        assert!(!AllReady.admit(&toks));
        toks.reverse();
        assert!(!AllReady.admit(&toks));
        toks.rotate_left(1);
        assert!(!AllReady.admit(&toks));
    }

    #[test]
    fn test_all_ready_with_no_ports() {
        assert!(AllReady.admit(&[]));
    }

    #[test]
    fn test_quorum() {
        assert!(Quorum(2).admit(&tokens(&["a", "b"], &["c"])));
        assert!(!Quorum(2).admit(&tokens(&["a"], &["b", "c"])));
        assert!(Quorum(0).admit(&tokens(&[], &["a"])));
    }

    #[test]
    fn test_required_ports() {
        let rule = Required(vec![PortId::from("a")]);
        assert!(rule.admit(&tokens(&["a"], &["b"])));
        assert!(!rule.admit(&tokens(&["b"], &["a"])));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("all".parse::<RulePolicy>().unwrap(), RulePolicy::AllReady);
        assert_eq!("quorum: 3".parse::<RulePolicy>().unwrap(), RulePolicy::Quorum(3));
        assert_eq!(
            "required:a, b".parse::<RulePolicy>().unwrap(),
            RulePolicy::Required(vec![PortId::from("a"), PortId::from("b")])
        );
        assert!("quorum:x".parse::<RulePolicy>().is_err());
        assert!("required:".parse::<RulePolicy>().is_err());
        assert!("any".parse::<RulePolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [
            RulePolicy::AllReady,
            RulePolicy::Quorum(2),
            RulePolicy::Required(vec![PortId::from("x"), PortId::from("y")]),
        ] {
            assert_eq!(policy.to_string().parse::<RulePolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_policy_from_configuration() {
        let empty = ConfigurationMap::new();
        assert_eq!(RulePolicy::from_configuration(&empty).unwrap(), RulePolicy::AllReady);

        let bad = ConfigurationMap::new().with(INPUT_RULE_KEY, "sometimes");
        let err = RulePolicy::from_configuration(&bad).unwrap_err();
        assert!(matches!(err, NodeError::Configuration { ref key, .. } if key == INPUT_RULE_KEY));
    }
}
