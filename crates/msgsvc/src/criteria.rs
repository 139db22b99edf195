use std::{collections::HashSet, fmt};

use {
    msgrelay_common::MessageHeader,
    serde::{Deserialize, Serialize},
};

/// Registration parameters for a message service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceParams {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub purpose: Vec<String>,
}

impl ServiceParams {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, msg_type: impl Into<String>) -> Self {
        self.msg_type = Some(msg_type.into());
        self
    }

    #[must_use]
    pub fn with_purpose<I, S>(mut self, purpose: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.purpose = purpose.into_iter().map(Into::into).collect();
        self
    }

    /// Whether any selection criteria are set. Without them a service
    /// accepts nothing.
    pub fn has_criteria(&self) -> bool {
        !Criteria::from(self).is_empty()
    }
}

impl fmt::Display for ServiceParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name={} type={} purpose=[{}]",
            self.name,
            self.msg_type.as_deref().unwrap_or(""),
            self.purpose.join(",")
        )
    }
}

/// Normalized selection criteria of a message service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    msg_type: Option<String>,
    purpose: HashSet<String>,
}

impl From<&ServiceParams> for Criteria {
    fn from(params: &ServiceParams) -> Self {
        Self {
            msg_type: params.msg_type.clone().filter(|t| !t.is_empty()),
            purpose: params.purpose.iter().cloned().collect(),
        }
    }
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.msg_type.is_none() && self.purpose.is_empty()
    }

    /// Decide whether a header satisfies these criteria.
    ///
    /// Comparison is exact and case-sensitive. Purpose matching needs at least
    /// one label in common; an empty header purpose list never matches.
    pub fn accept(&self, header: &MessageHeader) -> bool {
        match (&self.msg_type, self.purpose.is_empty()) {
            (None, true) => false,
            (Some(msg_type), false) => {
                self.type_matches(msg_type, header) && self.purpose_intersects(header)
            },
            (None, false) => self.purpose_intersects(header),
            (Some(msg_type), true) => self.type_matches(msg_type, header),
        }
    }

    fn type_matches(&self, msg_type: &str, header: &MessageHeader) -> bool {
        header.message_type() == Some(msg_type)
    }

    fn purpose_intersects(&self, header: &MessageHeader) -> bool {
        header.purposes().iter().any(|p| self.purpose.contains(*p))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn header(msg_type: Option<&str>, purpose: &[&str]) -> MessageHeader {
        MessageHeader {
            id: None,
            msg_type: msg_type.map(str::to_string),
            purpose: purpose.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn assert_cases(params: ServiceParams, cases: &[(MessageHeader, bool)]) {
        let criteria = Criteria::from(&params);
        for (h, expected) in cases {
            assert_eq!(
                criteria.accept(h),
                *expected,
                "header {h:?} against criteria [{params}]"
            );
        }
    }

    #[test]
    fn type_and_purpose() {
        let params = ServiceParams::new("test-01")
            .with_type("msg-type-01")
            .with_purpose(["prp-01-01", "prp-01-02"]);
        assert_cases(params, &[
            (header(Some("msg-type-01"), &["prp-01-01", "prp-01-02"]), true),
            (header(Some("msg-type-01"), &["prp-01-02"]), true),
            (header(Some("msg-type-01"), &["prp-01-01"]), true),
            (
                header(Some("msg-type-01"), &["prp-01-01", "prp-01-03", "prp-01-04"]),
                true,
            ),
            (header(None, &["prp-01-01", "prp-01-02"]), false),
            (header(None, &["prp-01-02"]), false),
            (header(Some("msg-type-01"), &[]), false),
            (header(Some("msg-type-02"), &["prp-02-01", "prp-02-02"]), false),
            (header(Some("msg-type-02"), &["prp-01-01"]), false),
        ]);
    }

    #[test]
    fn purpose_only() {
        let params = ServiceParams::new("test-01").with_purpose(["prp-01-01", "prp-01-02"]);
        assert_cases(params, &[
            (header(Some("msg-type-01"), &["prp-01-01", "prp-01-02"]), true),
            (header(Some("msg-type-01"), &["prp-01-02"]), true),
            (
                header(Some("msg-type-01"), &["prp-01-01", "prp-01-03", "prp-01-04"]),
                true,
            ),
            (header(None, &["prp-01-01", "prp-01-02"]), true),
            (header(None, &["prp-01-02"]), true),
            (header(None, &["prp-02-01", "prp-02-02"]), false),
            (header(Some("msg-type-01"), &[]), false),
            (header(Some("msg-type-02"), &["prp-02-01", "prp-02-02"]), false),
        ]);
    }

    #[test]
    fn type_only() {
        let params = ServiceParams::new("test-01").with_type("msg-type-01");
        assert_cases(params, &[
            (header(Some("msg-type-01"), &["prp-01-01", "prp-01-02"]), true),
            (header(Some("msg-type-01"), &["prp-01-02"]), true),
            (header(Some("msg-type-01"), &[]), true),
            (header(None, &["prp-01-01", "prp-01-02"]), false),
            (header(None, &["prp-01-02"]), false),
            (header(Some("msg-type-02"), &[]), false),
        ]);
    }

    #[test]
    fn no_criteria_rejects_everything() {
        let params = ServiceParams::new("test-01");
        assert!(!params.has_criteria());
        assert_cases(params, &[
            (header(Some("msg-type-01"), &["prp-01-01", "prp-01-02"]), false),
            (header(Some("msg-type-01"), &["prp-01-02"]), false),
            (header(None, &["prp-01-01", "prp-01-02"]), false),
            (header(Some("msg-type-02"), &[]), false),
            (MessageHeader::default(), false),
        ]);
    }

    #[test]
    fn repeated_header_purposes_are_a_set() {
        let criteria = Criteria::from(&ServiceParams::new("svc").with_purpose(["prp-01"]));
        assert!(criteria.accept(&header(None, &["prp-02", "prp-01", "prp-01"])));
        assert!(!criteria.accept(&header(None, &["prp-02", "prp-02"])));
    }

    #[test]
    fn empty_type_string_is_no_type() {
        let params = ServiceParams::new("test-01").with_type("");
        assert!(!params.has_criteria());
        assert!(!Criteria::from(&params).accept(&header(Some(""), &[])));
    }

    #[test]
    fn matching_is_case_sensitive_and_exact() {
        let criteria = Criteria::from(
            &ServiceParams::new("svc")
                .with_type("Msg-Type")
                .with_purpose(["prp"]),
        );
        assert!(!criteria.accept(&header(Some("msg-type"), &["prp"])));
        assert!(!criteria.accept(&header(Some("Msg-Type"), &["PRP"])));
        assert!(!criteria.accept(&header(Some("Msg-Type"), &["prp-extra"])));
        assert!(criteria.accept(&header(Some("Msg-Type"), &["prp"])));
    }

    #[test]
    fn params_deserialize_with_type_tag() {
        let params: ServiceParams = serde_json::from_str(
            r#"{"name":"s1","type":"msg-type-01","purpose":["prp-01-01","prp-01-02"]}"#,
        )
        .unwrap();
        assert_eq!(
            params,
            ServiceParams::new("s1")
                .with_type("msg-type-01")
                .with_purpose(["prp-01-01", "prp-01-02"])
        );

        let bare: ServiceParams = serde_json::from_str(r#"{"name":"s2"}"#).unwrap();
        assert!(!bare.has_criteria());
    }
}
