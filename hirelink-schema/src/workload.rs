use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Employment workload of a resume.
///
/// Stored as the lowercase tag (`parttime` / `fulltime`); anything else is
/// rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workload {
    Parttime,
    Fulltime,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown workload tag: {0:?}")]
pub struct UnknownWorkload(pub String);

impl Workload {
    pub const ALL: [Workload; 2] = [Workload::Parttime, Workload::Fulltime];

    pub fn as_str(self) -> &'static str {
        match self {
            Workload::Parttime => "parttime",
            Workload::Fulltime => "fulltime",
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workload {
    type Err = UnknownWorkload;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parttime" => Ok(Workload::Parttime),
            "fulltime" => Ok(Workload::Fulltime),
            other => Err(UnknownWorkload(other.to_string())),
        }
    }
}

impl TryFrom<String> for Workload {
    type Error = UnknownWorkload;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_tags() {
        assert_eq!("parttime".parse::<Workload>(), Ok(Workload::Parttime));
        assert_eq!(
            Workload::try_from("fulltime".to_string()),
            Ok(Workload::Fulltime)
        );
    }

    #[test]
    fn rejects_unknown_tags() {
        let err = "Fulltime".parse::<Workload>().unwrap_err();
        assert_eq!(err, UnknownWorkload("Fulltime".to_string()));

        let bad: Result<Workload, _> = serde_json::from_value(json!("contract"));
        assert!(bad.is_err());
    }

    #[test]
    fn serializes_as_lowercase_tag() {
        assert_eq!(
            serde_json::to_value(Workload::Parttime).unwrap(),
            json!("parttime")
        );
        assert_eq!(Workload::Fulltime.to_string(), "fulltime");
    }
}
