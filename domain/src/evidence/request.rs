//! Oracle request strings: `[<mode>:]<id>[,<id>...][:<addendum>]`.
//!
//! | Prefix | Mode |
//! |--------|------|
//! | none / `0:` | Standard: evaluate and publish |
//! | `1:` | Commit: evaluate, store, return a commitment |
//! | `2:` | Reveal: the rest is a previously issued commitment |

use crate::commitment::CommitmentHash;
use crate::core::error::ArbitrationError;

/// Evidence identifiers of one request, primary first
///
/// Always holds at least one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceRequest {
    ids: Vec<String>,
    addendum: Option<String>,
}

impl EvidenceRequest {
    /// Blank identifiers are dropped; at least one must remain
    pub fn new<I, S>(ids: I, addendum: Option<String>) -> Result<Self, ArbitrationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<String> = ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Err(ArbitrationError::validation("missing evidence identifier"));
        }

        let addendum = addendum
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        Ok(Self { ids, addendum })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn primary(&self) -> &str {
        &self.ids[0]
    }

    pub fn secondaries(&self) -> &[String] {
        &self.ids[1..]
    }

    pub fn addendum(&self) -> Option<&str> {
        self.addendum.as_deref()
    }

    fn parse(body: &str) -> Result<Self, ArbitrationError> {
        let (ids_part, addendum) = match body.split_once(':') {
            Some((ids, addendum)) => (ids, Some(addendum)),
            None => (body, None),
        };

        Self::new(ids_part.split(','), addendum.map(str::to_string))
    }
}

/// Protocol mode selected by the one-character prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolMode {
    Standard,
    Commit,
    Reveal,
}

impl ProtocolMode {
    fn from_prefix(c: char) -> Option<Self> {
        match c {
            '0' => Some(ProtocolMode::Standard),
            '1' => Some(ProtocolMode::Commit),
            '2' => Some(ProtocolMode::Reveal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolMode::Standard => "standard",
            ProtocolMode::Commit => "commit",
            ProtocolMode::Reveal => "reveal",
        }
    }
}

/// A parsed oracle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolRequest {
    Standard(EvidenceRequest),
    Commit(EvidenceRequest),
    Reveal(CommitmentHash),
}

impl ProtocolRequest {
    pub fn mode(&self) -> ProtocolMode {
        match self {
            ProtocolRequest::Standard(_) => ProtocolMode::Standard,
            ProtocolRequest::Commit(_) => ProtocolMode::Commit,
            ProtocolRequest::Reveal(_) => ProtocolMode::Reveal,
        }
    }
}

impl std::str::FromStr for ProtocolRequest {
    type Err = ArbitrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ArbitrationError::validation("missing evidence identifier"));
        }

        let mut chars = s.chars();
        let prefixed = match (chars.next(), chars.next()) {
            (Some(c), Some(':')) => ProtocolMode::from_prefix(c).map(|mode| (mode, &s[2..])),
            _ => None,
        };
        let (mode, body) = prefixed.unwrap_or((ProtocolMode::Standard, s));

        match mode {
            ProtocolMode::Standard => Ok(ProtocolRequest::Standard(EvidenceRequest::parse(body)?)),
            ProtocolMode::Commit => Ok(ProtocolRequest::Commit(EvidenceRequest::parse(body)?)),
            ProtocolMode::Reveal => body
                .parse::<CommitmentHash>()
                .map(ProtocolRequest::Reveal)
                .map_err(|e| ArbitrationError::validation(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier_is_standard() {
        let request: ProtocolRequest = "QmPrimary".parse().unwrap();
        assert_eq!(
            request,
            ProtocolRequest::Standard(EvidenceRequest::new(["QmPrimary"], None).unwrap())
        );
    }

    #[test]
    fn test_commit_with_list_and_addendum() {
        let request: ProtocolRequest = "1:QmA, QmB:the price was 3 ETH".parse().unwrap();
        let ProtocolRequest::Commit(evidence) = request else {
            panic!("expected commit mode");
        };
        assert_eq!(evidence.primary(), "QmA");
        assert_eq!(evidence.secondaries(), &["QmB".to_string()]);
        assert_eq!(evidence.addendum(), Some("the price was 3 ETH"));
    }

    #[test]
    fn test_addendum_may_contain_colons() {
        let request: ProtocolRequest = "0:QmA:time 12:30".parse().unwrap();
        let ProtocolRequest::Standard(evidence) = request else {
            panic!("expected standard mode");
        };
        assert_eq!(evidence.addendum(), Some("time 12:30"));
    }

    #[test]
    fn test_reveal_accepts_every_notation() {
        let decimal: ProtocolRequest = "2:255".parse().unwrap();
        let hex: ProtocolRequest = "2:0xff".parse().unwrap();
        assert_eq!(decimal, hex);
        assert_eq!(decimal.mode(), ProtocolMode::Reveal);
    }

    #[test]
    fn test_unrecognized_prefix_is_standard() {
        let request: ProtocolRequest = "7:QmA".parse().unwrap();
        assert_eq!(request.mode(), ProtocolMode::Standard);
        let ProtocolRequest::Standard(evidence) = request else {
            panic!("expected standard mode");
        };
        assert_eq!(evidence.ids(), &["7".to_string()]);
        assert_eq!(evidence.addendum(), Some("QmA"));
    }

    #[test]
    fn test_constructor_requires_an_identifier() {
        assert!(EvidenceRequest::new(Vec::<String>::new(), None).is_err());
        assert!(EvidenceRequest::new([" ", ""], Some("note".into())).is_err());

        let evidence = EvidenceRequest::new([" QmA ", "", "QmB"], Some("  ".into())).unwrap();
        assert_eq!(evidence.primary(), "QmA");
        assert_eq!(evidence.secondaries(), &["QmB".to_string()]);
        assert!(evidence.addendum().is_none());
    }

    #[test]
    fn test_missing_identifier() {
        assert!("".parse::<ProtocolRequest>().is_err());
        assert!("1:".parse::<ProtocolRequest>().is_err());
        assert!("0: , :note".parse::<ProtocolRequest>().is_err());
        assert!("2:not-a-hash".parse::<ProtocolRequest>().is_err());
    }
}
